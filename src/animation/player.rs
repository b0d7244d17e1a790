//! Animation player: playback cursor over a loaded frame-set.

use std::path::Path;
use std::sync::Arc;

use crate::geometry::{LoadError, LoadPolicy, LoadReport, load_path};
use crate::schema::{FrameSet, PlaybackConfig, PointSet};
use crate::view::IntervalTimer;

/// Minimum playback rate in frames per second.
pub const MIN_FRAME_RATE: f64 = 1.0;

/// Consumer of frame transitions, typically the renderer.
pub trait FrameSink {
    /// Show `points` as the active point-set. `use_colors` selects per-point
    /// colors over the uniform fallback color.
    fn present(&mut self, points: Arc<PointSet>, use_colors: bool);

    /// Drop whatever is being shown.
    fn clear(&mut self) {}
}

/// Snapshot of the playback state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub current_frame_index: usize,
    pub is_playing: bool,
    pub loop_playback: bool,
    pub frame_interval_seconds: f64,
    pub elapsed_since_last_advance: f64,
}

/// Controller-facing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStatus {
    pub current_frame: usize,
    pub total_frames: usize,
    pub is_playing: bool,
}

/// Frame-set playback with play/pause/stop, stepping and fixed-rate ticking.
///
/// Usage:
/// ```ignore
/// let mut player = AnimationPlayer::new(PointCloudRenderer::default(), &config.playback);
/// player.set_frames(loaded.frames);
/// player.play();
/// loop {
///     player.tick(frame_delta_seconds);
///     draw(player.sink().batches());
/// }
/// ```
pub struct AnimationPlayer<S: FrameSink> {
    sink: S,
    frames: FrameSet,
    current: usize,
    playing: bool,
    loop_playback: bool,
    frame_rate: f64,
    timer: IntervalTimer,
}

impl<S: FrameSink> AnimationPlayer<S> {
    pub fn new(sink: S, config: &PlaybackConfig) -> Self {
        let frame_rate = config.frame_rate.max(MIN_FRAME_RATE);
        Self {
            sink,
            frames: FrameSet::empty(),
            current: 0,
            playing: false,
            loop_playback: config.loop_playback,
            frame_rate,
            timer: IntervalTimer::new(1.0 / frame_rate),
        }
    }

    /// Replace the frame-set, rewind to frame 0 and show it.
    ///
    /// The playing flag is left as is.
    pub fn set_frames(&mut self, frames: FrameSet) {
        self.frames = frames;
        self.current = 0;
        self.timer.reset();
        if self.frames.is_empty() {
            self.sink.clear();
        } else {
            self.render_current();
        }
    }

    /// Load a file or directory and install it. On error nothing changes.
    pub fn load<P: AsRef<Path>>(
        &mut self,
        path: P,
        policy: LoadPolicy,
    ) -> Result<LoadReport, LoadError> {
        let loaded = load_path(path, policy)?;
        self.set_frames(loaded.frames);
        Ok(loaded.report)
    }

    /// Start playing. No-op without frames.
    pub fn play(&mut self) {
        if !self.frames.is_empty() {
            self.playing = true;
            log::info!("Playback started at frame {}", self.current);
        }
    }

    /// Stop advancing, keeping the current frame.
    pub fn pause(&mut self) {
        self.playing = false;
        log::info!("Playback paused at frame {}", self.current);
    }

    /// Stop advancing and restart the frame timer. The frame index is kept.
    pub fn stop(&mut self) {
        self.playing = false;
        self.timer.reset();
        log::info!("Playback stopped at frame {}", self.current);
    }

    /// Pause if playing, otherwise play.
    pub fn toggle_play(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Rewind to frame 0, show it, and stop.
    pub fn reset_to_first_frame(&mut self) {
        self.current = 0;
        if !self.frames.is_empty() {
            self.render_current();
        }
        self.stop();
    }

    /// Accumulate `delta` seconds; advance at most one frame per call.
    ///
    /// Returns true if a frame transition happened.
    pub fn tick(&mut self, delta: f64) -> bool {
        if !self.playing || self.frames.is_empty() {
            return false;
        }
        if self.timer.tick(delta) {
            self.next_frame();
            true
        } else {
            false
        }
    }

    /// Step forward. Past the end: wrap when looping, else stay on the last
    /// frame and stop.
    pub fn next_frame(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        let last = self.frames.len() - 1;
        if self.current < last {
            self.current += 1;
        } else if self.loop_playback {
            self.current = 0;
        } else {
            self.current = last;
            self.stop();
        }
        self.render_current();
    }

    /// Step backward. Before the start: wrap when looping, else stay on frame 0.
    ///
    /// Unlike [`next_frame`](Self::next_frame), hitting the boundary does not
    /// stop playback.
    pub fn previous_frame(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        if self.current > 0 {
            self.current -= 1;
        } else if self.loop_playback {
            self.current = self.frames.len() - 1;
        }
        self.render_current();
    }

    /// Set the playback rate, clamped to at least [`MIN_FRAME_RATE`].
    pub fn set_frame_rate(&mut self, fps: f64) {
        self.frame_rate = fps.max(MIN_FRAME_RATE);
        self.timer.set_period(1.0 / self.frame_rate);
    }

    pub fn set_loop(&mut self, loop_playback: bool) {
        self.loop_playback = loop_playback;
    }

    #[inline]
    pub fn current_frame_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.loop_playback
    }

    #[inline]
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    /// The active point-set, if any frames are loaded.
    pub fn current_frame(&self) -> Option<&Arc<PointSet>> {
        self.frames.get(self.current)
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            current_frame_index: self.current,
            is_playing: self.playing,
            loop_playback: self.loop_playback,
            frame_interval_seconds: self.timer.period(),
            elapsed_since_last_advance: self.timer.elapsed(),
        }
    }

    pub fn status(&self) -> PlayerStatus {
        PlayerStatus {
            current_frame: self.current,
            total_frames: self.frames.len(),
            is_playing: self.playing,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn render_current(&mut self) {
        if let Some(frame) = self.frames.get(self.current) {
            let use_colors = self.frames.frame_uses_colors(self.current);
            log::debug!(
                "Frame {}/{} ({} points)",
                self.current + 1,
                self.frames.len(),
                frame.len()
            );
            self.sink.present(Arc::clone(frame), use_colors);
        }
    }
}
