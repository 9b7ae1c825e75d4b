// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render loop frame timing

use std::time::{Duration, Instant};

/// Window over which the frame rate is averaged
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Snapshot reported by [`SceneManager::frame_stats`](crate::SceneManager::frame_stats)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    /// Seconds between the two most recent frames
    pub frame_dt: f32,
    /// Frame rate over the last completed averaging window
    pub fps: f32,
}

#[derive(Debug, Clone)]
pub struct FrameTiming {
    last_frame_time: Option<Instant>,
    window_start: Option<Instant>,
    window_frames: u32,
    frames: u64,
    frame_dt: f32,
    fps: f32,
}

impl FrameTiming {
    pub fn new() -> Self {
        Self {
            last_frame_time: None,
            window_start: None,
            window_frames: 0,
            frames: 0,
            frame_dt: 1.0 / 60.0,
            fps: 0.0,
        }
    }

    /// Record a frame presented at `now`
    pub fn record(&mut self, now: Instant) {
        if let Some(last) = self.last_frame_time {
            self.frame_dt = now.saturating_duration_since(last).as_secs_f32();
        }
        self.last_frame_time = Some(now);
        self.frames = self.frames.saturating_add(1);

        let window_start = *self.window_start.get_or_insert(now);
        self.window_frames = self.window_frames.saturating_add(1);
        let elapsed = now.saturating_duration_since(window_start);
        if elapsed >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / elapsed.as_secs_f32();
            self.window_frames = 0;
            self.window_start = Some(now);
        }
    }

    /// Forget the previous frame so a restarted loop does not report the
    /// paused interval as one long frame
    pub fn reset_cadence(&mut self) {
        self.last_frame_time = None;
        self.window_start = None;
        self.window_frames = 0;
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frames: self.frames,
            frame_dt: self.frame_dt,
            fps: self.fps,
        }
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}
