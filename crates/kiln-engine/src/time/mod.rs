//! Time subsystem.
//!
//! Frame timing utilities, decoupled from the runtime so they can be tested
//! with explicit timestamps.
//! - one `FrameClock` per frame loop; `tick()` once per frame
//! - `FpsCounter` for the once-a-second frame rate readout

mod frame_clock;

pub use frame_clock::{FpsCounter, FrameClock, FrameTime};
