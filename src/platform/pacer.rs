//! Fixed-rate frame pacing

use std::time::{Duration, Instant};

/// Longest frame step handed to the simulation (ms)
pub const MAX_FRAME_MS: u32 = 250;

/// Blocks until the next frame boundary and reports elapsed time
#[derive(Debug)]
pub struct FramePacer {
    frame: Duration,
    last: Instant,
    late_frames: u64,
}

impl FramePacer {
    pub fn new(frame_ms: u32) -> Self {
        Self {
            frame: Duration::from_millis(u64::from(frame_ms.max(1))),
            last: Instant::now(),
            late_frames: 0,
        }
    }

    /// Target frame duration
    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Frames that overran their budget so far
    pub fn late_frames(&self) -> u64 {
        self.late_frames
    }

    /// Sleep out the rest of the current frame. Returns milliseconds since
    /// the previous call, capped at [`MAX_FRAME_MS`].
    pub fn wait(&mut self) -> u32 {
        let busy = self.last.elapsed();
        if busy < self.frame {
            spin_sleep::sleep(self.frame - busy);
        } else {
            self.late_frames += 1;
            log::warn!("Frame behind schedule by {:?}", busy - self.frame);
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        (elapsed.as_millis().min(u128::from(MAX_FRAME_MS))) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        assert_eq!(FramePacer::new(16).frame_duration(), Duration::from_millis(16));
        assert_eq!(FramePacer::new(0).frame_duration(), Duration::from_millis(1));
    }

    #[test]
    fn test_wait_covers_frame() {
        let mut pacer = FramePacer::new(10);
        let start = Instant::now();
        let dt = pacer.wait();
        assert!(start.elapsed() >= Duration::from_millis(9));
        assert!(dt >= 9);
        assert!(dt <= MAX_FRAME_MS);
    }

    #[test]
    fn test_overrun_counts_late_frame() {
        let mut pacer = FramePacer::new(1);
        std::thread::sleep(Duration::from_millis(5));
        pacer.wait();
        assert_eq!(pacer.late_frames(), 1);
    }
}
