use std::time::Duration;

use super::clock::Clock;
use super::stats::FrameStats;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Frames may start this much early.
const FRAME_SLACK: f64 = 1.01;

/// Sleeps are shortened by this factor to wake before the deadline.
const SLEEP_UNDERSHOOT: f64 = 1.2;

/// Waits shorter than this are spun through instead of slept.
const MIN_SLEEP: Duration = Duration::from_micros(1);

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SchedulerConfig {
    pub ticks_per_second: u32,
    pub max_fps: u32,
    /// Simulation speed multiplier, applied only during active play.
    pub game_speed: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
            max_fps: 60,
            game_speed: 1.0,
        }
    }
}

/// Callbacks the scheduler drives.
pub trait LoopHooks {
    /// Advances the simulation by one fixed tick.
    fn tick(&mut self);

    /// Produces one presentation frame.
    fn render(&mut self);

    /// Whether gameplay is active, as opposed to a menu being shown.
    fn in_play(&self) -> bool {
        true
    }

    fn running(&self) -> bool {
        true
    }
}

/// What one `step` did, and how long the loop may now wait.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StepReport {
    pub ticks: u32,
    pub rendered: bool,
    pub sleep: Option<Duration>,
}

/// Fixed-timestep loop state.
///
/// Elapsed time is converted into fractional ticks and accumulated; each
/// `step` runs every whole tick owed before deciding whether a frame is due,
/// so a stall is caught up on before the next frame shows the world.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    config: SchedulerConfig,

    last_tick: Duration,
    last_render: Duration,
    unprocessed: f64,

    ticks: u32,
    frames: u32,
    last_report_ms: u64,
    stats: FrameStats,
}

impl FrameScheduler {
    pub fn new<C: Clock + ?Sized>(config: SchedulerConfig, clock: &C) -> Self {
        let now = clock.now();
        Self {
            config,
            last_tick: now,
            last_render: now,
            unprocessed: 0.0,
            ticks: 0,
            frames: 0,
            last_report_ms: clock.wall_ms(),
            stats: FrameStats::default(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Fraction of a tick owed, in `[0, 1)` after every step.
    pub fn unprocessed(&self) -> f64 {
        self.unprocessed
    }

    /// Rates published at the last wall-clock second boundary.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn set_game_speed(&mut self, speed: f64) {
        if speed > 0.0 && speed.is_finite() {
            self.config.game_speed = speed;
        } else {
            log::warn!("ignoring game speed {speed}");
        }
    }

    fn tick_nanos(&self, in_play: bool) -> f64 {
        let len = NANOS_PER_SECOND / f64::from(self.config.ticks_per_second.max(1));
        if in_play {
            len / self.config.game_speed
        } else {
            len
        }
    }

    fn frame_nanos(&self) -> f64 {
        NANOS_PER_SECOND / f64::from(self.config.max_fps.max(1))
    }

    /// Runs owed ticks, renders if a frame is due, and reports how long the
    /// caller may sleep before the next step is worthwhile.
    pub fn step<C, H>(&mut self, clock: &C, hooks: &mut H) -> StepReport
    where
        C: Clock + ?Sized,
        H: LoopHooks + ?Sized,
    {
        let now = clock.now();
        let tick_len = self.tick_nanos(hooks.in_play());

        let elapsed = now.saturating_sub(self.last_tick);
        self.unprocessed += elapsed.as_nanos() as f64 / tick_len;
        self.last_tick = now;

        let mut ticks = 0;
        while self.unprocessed >= 1.0 {
            hooks.tick();
            self.unprocessed -= 1.0;
            ticks += 1;
        }
        self.ticks += ticks;

        let frame_gap = self.frame_nanos() / FRAME_SLACK;
        let next_frame = self.last_render.as_nanos() as f64 + frame_gap;
        let now = clock.now();

        let rendered = now.as_nanos() as f64 >= next_frame;
        if rendered {
            hooks.render();
            self.frames += 1;
            self.last_render = now;
        }

        self.publish_stats(clock.wall_ms());

        // Deadlines count from after ticking and rendering.
        let after = clock.now().as_nanos() as f64;
        let next_tick = self.last_tick.as_nanos() as f64 + (1.0 - self.unprocessed) * tick_len;
        let until_tick = next_tick - after;
        let until_frame = self.last_render.as_nanos() as f64 + frame_gap - after;
        let min_nanos = MIN_SLEEP.as_nanos() as f64;
        let sleep = (until_tick > min_nanos && until_frame > min_nanos).then(|| {
            Duration::from_nanos((until_tick.min(until_frame) / SLEEP_UNDERSHOOT) as u64)
        });

        StepReport {
            ticks,
            rendered,
            sleep,
        }
    }

    /// Steps until the hooks stop running, sleeping on `clock` in between.
    pub fn run<C, H>(&mut self, clock: &mut C, hooks: &mut H)
    where
        C: Clock + ?Sized,
        H: LoopHooks + ?Sized,
    {
        while hooks.running() {
            let report = self.step(&*clock, hooks);
            if let Some(duration) = report.sleep {
                clock.sleep(duration);
            }
        }
    }

    fn publish_stats(&mut self, wall_ms: u64) {
        let interval = wall_ms.saturating_sub(self.last_report_ms);
        if interval <= 1000 {
            return;
        }

        self.stats = FrameStats::from_counts(self.frames, self.ticks, interval);
        log::debug!("fps {} tps {}", self.stats.fps, self.stats.tps);

        self.frames = 0;
        self.ticks = 0;
        self.last_report_ms = wall_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::clock::manual::ManualClock;

    #[derive(Debug, PartialEq)]
    enum Event {
        Tick,
        Render,
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
        menu: bool,
        stop_after_frames: Option<usize>,
    }

    impl Recorder {
        fn frames(&self) -> usize {
            self.events.iter().filter(|e| **e == Event::Render).count()
        }
    }

    impl LoopHooks for Recorder {
        fn tick(&mut self) {
            self.events.push(Event::Tick);
        }

        fn render(&mut self) {
            self.events.push(Event::Render);
        }

        fn in_play(&self) -> bool {
            !self.menu
        }

        fn running(&self) -> bool {
            self.stop_after_frames.is_none_or(|n| self.frames() < n)
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn stall_is_caught_up_before_the_frame() {
        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(SchedulerConfig::default(), &clock);
        let mut hooks = Recorder::default();

        // 5 ticks at 60 Hz is ~83.3 ms.
        clock.advance(ms(85));
        let report = sched.step(&clock, &mut hooks);

        assert_eq!(report.ticks, 5);
        assert!(report.rendered);
        assert_eq!(
            hooks.events,
            vec![
                Event::Tick,
                Event::Tick,
                Event::Tick,
                Event::Tick,
                Event::Tick,
                Event::Render
            ]
        );
        assert!((0.0..1.0).contains(&sched.unprocessed()));
    }

    #[test]
    fn every_whole_tick_owed_runs_before_the_frame() {
        let config = SchedulerConfig {
            max_fps: 1000,
            ..SchedulerConfig::default()
        };
        let tick = 16_666_667;

        for owed in 0..=20u64 {
            let clock = ManualClock::default();
            let mut sched = FrameScheduler::new(config, &clock);
            let mut hooks = Recorder::default();

            clock.advance(Duration::from_nanos(owed * tick + tick / 2));
            let report = sched.step(&clock, &mut hooks);

            let mut expected: Vec<Event> = (0..owed).map(|_| Event::Tick).collect();
            expected.push(Event::Render);
            assert_eq!(report.ticks as u64, owed);
            assert_eq!(hooks.events, expected, "owed {owed}");
            assert!((0.0..1.0).contains(&sched.unprocessed()), "owed {owed}");
        }
    }

    #[test]
    fn no_frame_before_the_frame_gap() {
        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(SchedulerConfig::default(), &clock);
        let mut hooks = Recorder::default();

        clock.advance(ms(10));
        let report = sched.step(&clock, &mut hooks);
        assert_eq!(report.ticks, 0);
        assert!(!report.rendered);

        // 16.67 ms / 1.01 ≈ 16.5 ms.
        clock.advance(ms(7));
        let report = sched.step(&clock, &mut hooks);
        assert_eq!(report.ticks, 1);
        assert!(report.rendered);
    }

    #[test]
    fn game_speed_applies_only_in_play() {
        let config = SchedulerConfig {
            game_speed: 2.0,
            ..SchedulerConfig::default()
        };

        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(config, &clock);
        let mut hooks = Recorder::default();
        clock.advance(ms(55));
        assert_eq!(sched.step(&clock, &mut hooks).ticks, 6);

        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(config, &clock);
        let mut hooks = Recorder {
            menu: true,
            ..Recorder::default()
        };
        clock.advance(ms(55));
        assert_eq!(sched.step(&clock, &mut hooks).ticks, 3);
    }

    #[test]
    fn sleep_targets_the_nearest_deadline() {
        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(SchedulerConfig::default(), &clock);
        let mut hooks = Recorder::default();

        clock.advance(ms(20));
        let report = sched.step(&clock, &mut hooks);
        assert!(report.rendered);

        // Next tick (~13.3 ms) comes before the next frame (~16.5 ms).
        let tick_len = NANOS_PER_SECOND / 60.0;
        let expected = (1.0 - sched.unprocessed()) * tick_len / SLEEP_UNDERSHOOT;
        let slept = report.sleep.map(|d| d.as_nanos() as f64).unwrap_or(0.0);
        assert!((slept - expected).abs() < 1000.0, "slept {slept}, expected {expected}");
    }

    struct SlowRender<'a> {
        clock: &'a ManualClock,
        cost: Duration,
    }

    impl LoopHooks for SlowRender<'_> {
        fn tick(&mut self) {}

        fn render(&mut self) {
            self.clock.advance(self.cost);
        }
    }

    #[test]
    fn render_time_is_not_slept_again() {
        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(SchedulerConfig::default(), &clock);
        let mut hooks = SlowRender {
            clock: &clock,
            cost: ms(12),
        };

        clock.advance(ms(20));
        let report = sched.step(&clock, &mut hooks);
        assert!(report.rendered);
        assert_eq!(clock.get(), ms(32));

        // Next tick is due at 20 + 0.8 * 16.67 ≈ 33.33 ms.
        let tick_len = NANOS_PER_SECOND / 60.0;
        let expected = (20e6 + 0.8 * tick_len - 32e6) / SLEEP_UNDERSHOOT;
        let slept = report.sleep.map(|d| d.as_nanos() as f64).unwrap_or(0.0);
        assert!((slept - expected).abs() < 1000.0, "slept {slept}, expected {expected}");
        assert!(clock.get() + Duration::from_nanos(slept as u64) < Duration::from_nanos(33_333_334));
    }

    #[test]
    fn no_sleep_when_render_overran_the_next_tick() {
        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(SchedulerConfig::default(), &clock);
        let mut hooks = SlowRender {
            clock: &clock,
            cost: ms(15),
        };

        clock.advance(ms(20));
        let report = sched.step(&clock, &mut hooks);
        assert!(report.rendered);
        assert_eq!(report.sleep, None);
    }

    #[test]
    fn no_sleep_just_before_a_frame() {
        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(SchedulerConfig::default(), &clock);
        let mut hooks = Recorder::default();

        // Frame gap is ~16_501_650 ns.
        clock.set(Duration::from_nanos(16_501_000));
        let report = sched.step(&clock, &mut hooks);
        assert_eq!(report.ticks, 0);
        assert!(!report.rendered);
        assert_eq!(report.sleep, None);
    }

    #[test]
    fn stats_settle_at_configured_rates() {
        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(SchedulerConfig::default(), &clock);
        let mut hooks = Recorder::default();

        while clock.get() < ms(1100) {
            let report = sched.step(&clock, &mut hooks);
            clock.advance(report.sleep.unwrap_or(Duration::from_micros(100)));
        }

        let stats = sched.stats();
        assert!((55..=61).contains(&stats.fps), "fps {}", stats.fps);
        assert!((58..=61).contains(&stats.tps), "tps {}", stats.tps);
    }

    #[test]
    fn run_stops_when_hooks_stop() {
        let mut clock = ManualClock::with_per_read(Duration::from_micros(50));
        let mut sched = FrameScheduler::new(SchedulerConfig::default(), &clock);
        let mut hooks = Recorder {
            stop_after_frames: Some(3),
            ..Recorder::default()
        };

        sched.run(&mut clock, &mut hooks);

        assert_eq!(hooks.frames(), 3);
        assert!(clock.get() >= ms(33));
    }

    #[test]
    fn invalid_game_speed_is_ignored() {
        let clock = ManualClock::default();
        let mut sched = FrameScheduler::new(SchedulerConfig::default(), &clock);
        sched.set_game_speed(0.0);
        sched.set_game_speed(f64::NAN);
        assert_eq!(sched.config().game_speed, 1.0);
        sched.set_game_speed(3.0);
        assert_eq!(sched.config().game_speed, 3.0);
    }
}
