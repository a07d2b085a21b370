/// Rates measured over the last whole wall-clock second.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames rendered per second.
    pub fps: u32,
    /// Simulation ticks per second.
    pub tps: u32,
}

impl FrameStats {
    /// Scales raw counts over `interval_ms` to per-second rates, rounded.
    pub fn from_counts(frames: u32, ticks: u32, interval_ms: u64) -> Self {
        let per_second = |n: u32| (f64::from(n) * 1000.0 / interval_ms.max(1) as f64).round() as u32;
        Self {
            fps: per_second(frames),
            tps: per_second(ticks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_scale_to_interval() {
        assert_eq!(
            FrameStats::from_counts(61, 60, 1016),
            FrameStats { fps: 60, tps: 59 }
        );
        assert_eq!(FrameStats::from_counts(30, 30, 1000).fps, 30);
    }
}
