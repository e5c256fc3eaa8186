use std::time::Duration;
use instant::Instant;

/// The framerate used when the configured one is not a positive finite number
const FALLBACK_FRAMERATE: f64 = 60.0;

/// Paces the camera updates to a fixed framerate independent of how often the window is redrawn
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    /// The time between two frames
    frame_time: Duration,
    /// The earliest time the next frame may run
    next_frame_time: Instant,
}

impl FrameClock {
    /// Creates a new clock where the first frame is due immediately
    ///
    /// # Parameters
    ///
    /// framerate: The number of frames per second
    ///
    /// now: The current time
    pub fn new(framerate: f64, now: Instant) -> Self {
        let framerate = if framerate.is_finite() && framerate > 0.0 {
            framerate
        } else {
            log::warn!("Invalid framerate {}, using {}", framerate, FALLBACK_FRAMERATE);
            FALLBACK_FRAMERATE
        };

        Self {
            frame_time: Duration::from_secs_f64(1.0 / framerate),
            next_frame_time: now,
        }
    }

    /// Returns true if a frame is due and schedules the next one
    ///
    /// When frames have been missed the schedule restarts from now instead of catching up
    ///
    /// # Parameters
    ///
    /// now: The current time
    pub fn tick(&mut self, now: Instant) -> bool {
        if now < self.next_frame_time {
            return false;
        }

        let next_frame_time = self.next_frame_time + self.frame_time;
        self.next_frame_time = if next_frame_time < now {
            now + self.frame_time
        } else {
            next_frame_time
        };

        true
    }

    /// The earliest time the next frame may run
    pub fn get_next_frame_time(&self) -> Instant {
        self.next_frame_time
    }

    /// The time between two frames
    pub fn get_frame_time(&self) -> Duration {
        self.frame_time
    }
}
