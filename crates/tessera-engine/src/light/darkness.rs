//! Day/night darkness and the overlay dither pattern.

/// Darkness factor of a moonless night.
pub const MAX_DARK: f64 = 128.0;

/// Levels below this are caves: unlit means pitch black.
pub const SURFACE_LEVEL: i32 = 3;

/// Levels at or above this are dark regardless of the time of day.
pub const ALWAYS_DARK_LEVEL: i32 = 5;

/// Darkness removed on levels above the surface.
pub const SKY_REDUCTION: f64 = 10.0;

/// 4x4 ordered-dither thresholds, in tenths of a light grade.
///
/// A pixel with light grade `g` (0..=25, i.e. brightness * 255 / 10) stays
/// lit when `g` exceeds its cell's threshold. Every value 0..=15 appears
/// once, so each grade below 16 gets its own pattern.
pub const DITHER_4X4: [u8; 16] = [
    0, 80, 20, 100, //
    120, 40, 140, 60, //
    30, 110, 10, 90, //
    150, 70, 130, 50,
];

/// Quarter of the day cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DayPhase {
    Morning,
    Day,
    Evening,
    Night,
}

/// Snapshot of the world clock the overlay reads.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DayCycle {
    pub tick_count: u64,
    /// Ticks per full day; each phase lasts a quarter of it.
    pub day_length: u64,
    /// Whether the first day has ended. Morning only fades from night after it.
    pub past_day1: bool,
}

impl DayCycle {
    pub fn new(tick_count: u64, day_length: u64, past_day1: bool) -> Self {
        Self {
            tick_count,
            day_length,
            past_day1,
        }
    }

    fn phase_length(&self) -> u64 {
        (self.day_length / 4).max(1)
    }

    pub fn phase(&self) -> DayPhase {
        let day = self.day_length.max(1);
        match (self.tick_count % day) / self.phase_length() {
            0 => DayPhase::Morning,
            1 => DayPhase::Day,
            2 => DayPhase::Evening,
            _ => DayPhase::Night,
        }
    }

    /// Progress through the current phase in `[0, 1)`.
    pub fn relative_time(&self) -> f64 {
        let len = self.phase_length();
        (self.tick_count % len) as f64 / len as f64
    }
}

/// Darkness factor in `[0, MAX_DARK]` for `level` at the given time.
pub fn dark_factor(level: i32, cycle: &DayCycle) -> f64 {
    if level >= ALWAYS_DARK_LEVEL {
        return MAX_DARK;
    }
    if level < SURFACE_LEVEL {
        return 0.0;
    }

    let rel = cycle.relative_time();
    let factor = match cycle.phase() {
        DayPhase::Morning if cycle.past_day1 => (1.0 - rel) * MAX_DARK,
        DayPhase::Morning | DayPhase::Day => 0.0,
        DayPhase::Evening => rel * MAX_DARK,
        DayPhase::Night => MAX_DARK,
    };

    if level > SURFACE_LEVEL {
        factor - factor.min(SKY_REDUCTION)
    } else {
        factor
    }
}

/// Opacity of the darkness on unlit pixels.
pub fn overlay_opacity(level: i32, dark_factor: f64) -> f32 {
    if level < SURFACE_LEVEL {
        1.0
    } else {
        (dark_factor / MAX_DARK) as f32
    }
}

/// CPU reference of the overlay's lit/dark decision for one pixel.
pub fn dithered_dark(brightness: f32, x: i32, y: i32, adjust: (i32, i32)) -> bool {
    let grade = (brightness.clamp(0.0, 1.0) * 255.0).round() as i32 / 10;
    let cell = ((x + adjust.0) & 3) + ((y + adjust.1) & 3) * 4;
    grade <= i32::from(DITHER_4X4[cell as usize]) / 10
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 64800;

    fn at(phase: u64, rel: f64, past_day1: bool) -> DayCycle {
        let q = DAY / 4;
        DayCycle::new(phase * q + (rel * q as f64) as u64, DAY, past_day1)
    }

    #[test]
    fn phases_split_the_day_in_quarters() {
        assert_eq!(at(0, 0.0, true).phase(), DayPhase::Morning);
        assert_eq!(at(1, 0.5, true).phase(), DayPhase::Day);
        assert_eq!(at(2, 0.1, true).phase(), DayPhase::Evening);
        assert_eq!(at(3, 0.9, true).phase(), DayPhase::Night);
        assert_eq!(DayCycle::new(DAY + 1, DAY, true).phase(), DayPhase::Morning);
    }

    #[test]
    fn caves_have_no_factor_but_full_opacity() {
        let night = at(3, 0.5, true);
        assert_eq!(dark_factor(2, &night), 0.0);
        assert_eq!(overlay_opacity(2, dark_factor(2, &night)), 1.0);
        assert_eq!(overlay_opacity(0, 0.0), 1.0);
    }

    #[test]
    fn sky_evening_midpoint_loses_ten() {
        let evening = at(2, 0.5, true);
        assert_eq!(dark_factor(4, &evening), 54.0);
        assert_eq!(dark_factor(3, &evening), 64.0);
    }

    #[test]
    fn sky_reduction_never_goes_negative() {
        let early = at(2, 0.02, true);
        let f = dark_factor(4, &early);
        assert!(f >= 0.0);
        assert_eq!(f, 0.0);
    }

    #[test]
    fn deep_levels_are_always_max_dark() {
        for phase in 0..4 {
            let cycle = at(phase, 0.3, false);
            assert_eq!(dark_factor(ALWAYS_DARK_LEVEL, &cycle), MAX_DARK);
            assert_eq!(dark_factor(7, &cycle), MAX_DARK);
        }
        assert_eq!(overlay_opacity(ALWAYS_DARK_LEVEL, MAX_DARK), 1.0);
    }

    #[test]
    fn darkness_rises_from_day_through_night() {
        let q = DAY / 4;
        for level in [SURFACE_LEVEL, SURFACE_LEVEL + 1] {
            let mut last = -1.0;
            for tick in (q..DAY).step_by(97) {
                let f = dark_factor(level, &DayCycle::new(tick, DAY, true));
                assert!(f >= last, "level {level} tick {tick}: {f} < {last}");
                last = f;
            }
        }
    }

    #[test]
    fn first_day_never_gets_lighter() {
        for level in [SURFACE_LEVEL, SURFACE_LEVEL + 1] {
            let mut last = -1.0;
            for tick in (0..DAY).step_by(37) {
                let f = dark_factor(level, &DayCycle::new(tick, DAY, false));
                assert!(f >= last, "level {level} tick {tick}: {f} < {last}");
                last = f;
            }
            assert_eq!(dark_factor(level, &DayCycle::new(0, DAY, false)), 0.0);
            assert!(last > 100.0);
        }
    }

    #[test]
    fn later_mornings_fade_from_full_dark_to_clear() {
        let q = DAY / 4;
        let mut last = f64::INFINITY;
        for tick in (DAY..DAY + q).step_by(31) {
            let f = dark_factor(SURFACE_LEVEL, &DayCycle::new(tick, DAY, true));
            assert!(f <= last, "tick {tick}: {f} > {last}");
            last = f;
        }
        assert_eq!(dark_factor(SURFACE_LEVEL, &DayCycle::new(DAY, DAY, true)), MAX_DARK);
        let end_of_morning = dark_factor(SURFACE_LEVEL, &DayCycle::new(DAY + q - 1, DAY, true));
        assert!(end_of_morning < 0.01, "{end_of_morning}");
        assert_eq!(dark_factor(SURFACE_LEVEL, &DayCycle::new(DAY + q, DAY, true)), 0.0);
    }

    #[test]
    fn morning_fades_only_after_day_one() {
        let dawn = at(0, 0.25, false);
        assert_eq!(dark_factor(SURFACE_LEVEL, &dawn), 0.0);
        let dawn = at(0, 0.25, true);
        assert_eq!(dark_factor(SURFACE_LEVEL, &dawn), 96.0);
    }

    #[test]
    fn dither_lights_bright_pixels_everywhere() {
        for y in 0..4 {
            for x in 0..4 {
                assert!(!dithered_dark(1.0, x, y, (0, 0)));
                assert!(dithered_dark(0.0, x, y, (0, 0)));
            }
        }
    }

    #[test]
    fn dither_pattern_scrolls_with_adjust() {
        // grade 5: only cells with threshold < 5 stay lit
        let b = 50.0 / 255.0;
        assert!(!dithered_dark(b, 2, 2, (0, 0))); // threshold 1
        assert!(dithered_dark(b, 2, 2, (1, 0))); // threshold 9
    }
}
