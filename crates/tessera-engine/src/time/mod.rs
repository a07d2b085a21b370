//! Time subsystem.
//!
//! Fixed-timestep scheduling decoupled from presentation:
//! - simulation advances in whole ticks at `ticks_per_second`
//! - frames are rendered at most `max_fps` times per second
//! - the loop sleeps until whichever is due first
//!
//! Time is read through `Clock` so the scheduler can be driven by hand in tests.

mod clock;
mod scheduler;
mod stats;

pub use clock::{Clock, SystemClock};
pub use scheduler::{FrameScheduler, LoopHooks, SchedulerConfig, StepReport};
pub use stats::FrameStats;
