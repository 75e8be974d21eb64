use std::time::Instant;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock baseline, taken at the tick.
    pub time: f64,

    /// Seconds elapsed since the previous tick.
    pub dt: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Time is reported as seconds since the last `reset`, so the first frame
/// after a reset sees a small `dt` rather than the time since process start.
/// Delta time is not clamped; update callbacks receive real elapsed time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
    current: f64,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            current: 0.0,
            frame_index: 0,
        }
    }

    /// Seconds since the baseline.
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    /// Resets the clock baseline.
    pub fn reset(&mut self) {
        self.origin = Instant::now();
        self.current = 0.0;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = self.now();
        self.tick_at(now)
    }

    /// Advances the clock to an explicit timestamp.
    pub fn tick_at(&mut self, now: f64) -> FrameTime {
        let last = self.current;
        self.current = now;

        let ft = FrameTime {
            time: now,
            dt: now - last,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts frames and reports a rate once per elapsed second.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    reset_at: f64,
}

impl FpsCounter {
    /// Sets the start of the first counting window.
    pub fn reset(&mut self, now: f64) {
        self.frames = 0;
        self.reset_at = now;
    }

    /// Counts one frame. Returns the frame count of the window that just
    /// closed, if `now` is more than one second past its start.
    ///
    /// The window start advances by exactly one second, so a slow frame does
    /// not shift later readings.
    pub fn tick(&mut self, now: f64) -> Option<u32> {
        self.frames += 1;
        if now - self.reset_at > 1.0 {
            let fps = self.frames;
            self.reset_at += 1.0;
            self.frames = 0;
            Some(fps)
        } else {
            None
        }
    }
}
