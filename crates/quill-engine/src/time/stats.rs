use std::time::Duration;

/// Rolling frame statistics, reported once per `window`.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: Duration,
    elapsed: Duration,
    frames: u32,
}

/// Averages over one reporting window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub fps: f32,
    pub avg_frame_ms: f32,
}

impl FrameStats {
    pub fn new(window: Duration) -> Self {
        Self { window, elapsed: Duration::ZERO, frames: 0 }
    }

    /// Adds one frame of `dt` seconds. Returns a report when the window fills.
    pub fn record(&mut self, dt: f32) -> Option<FrameReport> {
        self.elapsed += Duration::from_secs_f32(dt.max(0.0));
        self.frames += 1;

        if self.elapsed < self.window {
            return None;
        }

        let secs = self.elapsed.as_secs_f32();
        let report = FrameReport {
            fps: self.frames as f32 / secs,
            avg_frame_ms: secs * 1000.0 / self.frames as f32,
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(report)
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_window() {
        let mut stats = FrameStats::new(Duration::from_millis(100));
        for _ in 0..9 {
            assert!(stats.record(0.01).is_none());
        }
        let report = stats.record(0.0101).unwrap();
        assert!((report.fps - 100.0).abs() < 1.0, "{report:?}");
        assert!(stats.record(0.01).is_none());
    }
}
