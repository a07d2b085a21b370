//! CPU reference of the lighting program's falloff.

use super::LightRequest;

/// Brightness at squared distance `dist_sq` from a light of `radius`.
///
/// `1 - (d²/r²)²`, clamped to `[0, 1]`: full at the centre, a soft shoulder,
/// zero at and beyond the radius.
pub fn falloff(dist_sq: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    let t = dist_sq / (radius * radius);
    (1.0 - t * t).clamp(0.0, 1.0)
}

/// Composited brightness at pixel `(x, y)`: the brightest light wins.
pub fn brightness_at(lights: &[LightRequest], x: i32, y: i32) -> f32 {
    lights
        .iter()
        .map(|l| {
            let dx = (x - l.x) as f32;
            let dy = (y - l.y) as f32;
            falloff(dx * dx + dy * dy, l.radius as f32)
        })
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light(x: i32, y: i32, radius: i32) -> LightRequest {
        LightRequest { x, y, radius }
    }

    #[test]
    fn full_at_centre_zero_at_radius() {
        assert_eq!(falloff(0.0, 10.0), 1.0);
        assert_eq!(falloff(100.0, 10.0), 0.0);
        assert_eq!(falloff(400.0, 10.0), 0.0);
        assert_eq!(falloff(0.0, 0.0), 0.0);
    }

    #[test]
    fn halfway_keeps_most_light() {
        // d = r/2 -> t = 1/4 -> 1 - 1/16
        assert!((falloff(25.0, 10.0) - 0.9375).abs() < 1e-6);
    }

    #[test]
    fn overlapping_lights_take_max_not_sum() {
        let a = light(0, 0, 10);
        let b = light(6, 0, 10);
        let at = (3, 0);

        let single = brightness_at(&[a], at.0, at.1);
        let both = brightness_at(&[a, b], at.0, at.1);
        assert!(single > 0.5);
        assert_eq!(both, single);
        assert!(both <= 1.0);
    }

    #[test]
    fn brightest_light_wins() {
        let dim = light(0, 0, 4);
        let bright = light(1, 0, 20);
        let v = brightness_at(&[dim, bright], 2, 0);
        assert_eq!(v, falloff(1.0, 20.0));
    }

    #[test]
    fn no_lights_is_dark() {
        assert_eq!(brightness_at(&[], 5, 5), 0.0);
    }
}
