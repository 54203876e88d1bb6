//! Frame clock for the drivers.
//!
//! The field is stateless; the clock is the only thing carried from one
//! frame to the next. It turns wall-clock ticks (or a fixed step) into the
//! monotonic `elapsed` seconds a [`FrameContext`] needs.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! loop {
//!     clock.update();
//!     let image = render_frame(&field, &clock.context(resolution))?;
//! }
//! ```

use std::time::{Duration, Instant};

use crate::frame::{FrameContext, Resolution};

/// How far the clock advances per update.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// Measured time since the previous update.
    Realtime,
    /// A constant number of seconds, for reproducible sequences.
    Fixed(f32),
}

/// Frames-per-second estimate, refreshed over a sliding window.
#[derive(Debug)]
struct FpsMeter {
    window: Duration,
    window_start: Instant,
    frames_in_window: u32,
    value: f32,
}

impl FpsMeter {
    fn new(now: Instant) -> Self {
        Self {
            window: Duration::from_millis(500),
            window_start: now,
            frames_in_window: 0,
            value: 0.0,
        }
    }

    fn tick(&mut self, now: Instant) {
        self.frames_in_window += 1;
        let span = now.duration_since(self.window_start);
        if span >= self.window {
            self.value = self.frames_in_window as f32 / span.as_secs_f32();
            self.frames_in_window = 0;
            self.window_start = now;
        }
    }
}

/// Elapsed-time source for a render loop.
///
/// Elapsed time is the sum of scaled steps, not a wall-clock reading, so
/// pausing, speed changes and fixed stepping compose without jumps.
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    elapsed: f32,
    delta: f32,
    frames: u64,
    step: Step,
    scale: f32,
    paused: bool,
    meter: FpsMeter,
}

impl FrameClock {
    /// A real-time clock at elapsed 0.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_tick: now,
            elapsed: 0.0,
            delta: 0.0,
            frames: 0,
            step: Step::Realtime,
            scale: 1.0,
            paused: false,
            meter: FpsMeter::new(now),
        }
    }

    /// A clock that advances by exactly `delta` seconds per update.
    pub fn fixed(delta: f32) -> Self {
        let mut clock = Self::new();
        clock.set_fixed_delta(Some(delta));
        clock
    }

    /// Advance one frame. Returns `(elapsed, delta)` after the step.
    ///
    /// While paused nothing advances and the frame counter holds.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let measured = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        if self.paused {
            self.delta = 0.0;
        } else {
            let raw = match self.step {
                Step::Realtime => measured,
                Step::Fixed(seconds) => seconds,
            };
            self.delta = raw * self.scale;
            self.elapsed += self.delta;
            self.frames += 1;
            self.meter.tick(now);
        }

        (self.elapsed, self.delta)
    }

    /// Snapshot of the current time for one frame at `resolution`.
    pub fn context(&self, resolution: Resolution) -> FrameContext {
        FrameContext::new(self.elapsed, resolution)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds added by the last update, after scaling.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of updates that advanced the clock.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frames
    }

    /// Measured frames per second; 0 until the first window closes.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.meter.value
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.scale
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume without counting the paused interval.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last_tick = Instant::now();
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Step by a constant `delta` (negative becomes 0), or `None` for real time.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.step = match delta {
            Some(seconds) => Step::Fixed(seconds.max(0.0)),
            None => Step::Realtime,
        };
    }

    /// Playback speed multiplier. Negative values become 0, which freezes
    /// elapsed time while frames keep counting.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }

    /// Back to elapsed 0, unpaused. Step mode and scale are kept.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last_tick = now;
        self.elapsed = 0.0;
        self.delta = 0.0;
        self.frames = 0;
        self.paused = false;
        self.meter = FpsMeter::new(now);
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
