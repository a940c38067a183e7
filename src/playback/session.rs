use std::sync::Arc;

use crate::{
    foundation::{
        core::{FALLBACK_STEP_MS, effective_step_ms},
        error::{CourtError, CourtResult},
    },
    playback::state::{PlaybackState, PlaybackStatus, TickHandle},
    scenegraph::model::Play,
    timeline::builder::Timeline,
};

/// Real-time playback over a play's steps.
///
/// The session schedules nothing. A host (display loop, test harness, batch driver) owns it
/// and calls [`PlaybackSession::tick`] with elapsed wall-clock time; `&mut self` serializes
/// those calls. Elapsed time is accumulated per step and any remainder past a step boundary
/// is carried into the next step, so `tick(a); tick(b)` lands where `tick(a + b)` does.
#[derive(Clone, Debug)]
pub struct PlaybackSession {
    play: Arc<Play>,
    state: PlaybackState,
    scene_index: usize,
    step: u32,
    speed: f64,
    looping: bool,
    accumulator_ms: f64,
    epoch: u64,
}

impl PlaybackSession {
    /// A stopped session positioned at the first step of the first scene.
    pub fn new(play: impl Into<Arc<Play>>) -> Self {
        let play = play.into();
        let step = play.scene_at(0).map(|s| s.first_step()).unwrap_or(1);
        Self {
            play,
            state: PlaybackState::Stopped,
            scene_index: 0,
            step,
            speed: 1.0,
            looping: false,
            accumulator_ms: 0.0,
            epoch: 0,
        }
    }

    /// The document being played.
    pub fn document(&self) -> &Arc<Play> {
        &self.play
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether ticks advance the position.
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Current scene, as an index into the `order`-sorted scenes.
    pub fn scene_index(&self) -> usize {
        self.scene_index
    }

    /// Current step within the scene.
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Playback rate multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether playback wraps to the first scene at the end.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Virtual time already spent in the current step.
    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Snapshot of every observable field.
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.state,
            scene_index: self.scene_index,
            step: self.step,
            accumulator_ms: self.accumulator_ms,
            speed: self.speed,
            looping: self.looping,
        }
    }

    /// Handle for ticks scheduled from now on. See [`TickHandle`].
    pub fn handle(&self) -> TickHandle {
        TickHandle { epoch: self.epoch }
    }

    fn invalidate_handles(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Start or resume playback in place. Requires at least one scene.
    ///
    /// Returns whether the session is playing afterwards.
    pub fn play(&mut self) -> bool {
        if self.state.is_playing() {
            return true;
        }
        if self.play.scenes.is_empty() {
            tracing::debug!("play ignored: document has no scenes");
            return false;
        }
        self.state = PlaybackState::Playing;
        self.accumulator_ms = 0.0;
        self.invalidate_handles();
        tracing::debug!(
            scene_index = self.scene_index,
            step = self.step,
            "playback started"
        );
        true
    }

    /// [`PlaybackSession::play`], failing when the document has no scenes.
    pub fn try_play(&mut self) -> CourtResult<()> {
        if self.play() {
            Ok(())
        } else {
            Err(CourtError::playback("cannot play a document without scenes"))
        }
    }

    /// Stop advancing and keep the current position.
    pub fn pause(&mut self) {
        self.halt("paused");
    }

    /// Same as [`PlaybackSession::pause`]: position is preserved.
    pub fn stop(&mut self) {
        self.halt("stopped");
    }

    fn halt(&mut self, why: &'static str) {
        self.invalidate_handles();
        if self.state.is_playing() {
            self.state = PlaybackState::Stopped;
            tracing::debug!(
                scene_index = self.scene_index,
                step = self.step,
                "playback {why}"
            );
        }
    }

    /// Jump to the first step of scene `index`. Always stops playback and clears the
    /// accumulator. Out-of-range indices are ignored.
    pub fn set_scene_index(&mut self, index: usize) {
        let Some(scene) = self.play.scene_at(index) else {
            return;
        };
        let step = scene.first_step();
        self.scrub_to(index, step);
    }

    /// Jump to `step` of the current scene. Always stops playback and clears the
    /// accumulator. Steps the scene does not have are ignored.
    pub fn set_step(&mut self, step: u32) {
        let Some(scene) = self.play.scene_at(self.scene_index) else {
            return;
        };
        let exists = scene.group(step).is_some() || (scene.timing_groups.is_empty() && step == 1);
        if !exists {
            return;
        }
        self.scrub_to(self.scene_index, step);
    }

    fn scrub_to(&mut self, scene_index: usize, step: u32) {
        self.scene_index = scene_index;
        self.step = step;
        self.accumulator_ms = 0.0;
        self.state = PlaybackState::Stopped;
        self.invalidate_handles();
        tracing::debug!(scene_index, step, "scrubbed");
    }

    /// Playback rate multiplier. Non-positive or non-finite values are ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed > 0.0 {
            self.speed = speed;
        }
    }

    /// Enable or disable wrap-around.
    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Swap in a new document. The session stops, clears its accumulator and clamps its
    /// position to what the new document has.
    pub fn set_play(&mut self, play: impl Into<Arc<Play>>) {
        self.play = play.into();
        let count = self.play.scenes.len();
        self.scene_index = self.scene_index.min(count.saturating_sub(1));
        self.step = match self.play.scene_at(self.scene_index) {
            Some(scene) if scene.group(self.step).is_some() => self.step,
            Some(scene) => scene.first_step(),
            None => 1,
        };
        self.accumulator_ms = 0.0;
        self.state = PlaybackState::Stopped;
        self.invalidate_handles();
    }

    /// Duration of the step the session is on, with the one-second fallback for missing or
    /// non-positive durations.
    pub fn active_step_ms(&self) -> f64 {
        self.play
            .scene_at(self.scene_index)
            .and_then(|s| s.group(self.step))
            .map(|g| effective_step_ms(g.duration_ms))
            .unwrap_or(FALLBACK_STEP_MS)
    }

    /// Advance by `delta_real_ms` of wall-clock time scaled by the speed.
    ///
    /// No-op unless playing. Returns how many step boundaries were crossed (saturating).
    ///
    /// Work per call is bounded by the number of steps in the play: when looping, whole
    /// cycles are skipped arithmetically before the remaining time is walked step by step.
    pub fn tick(&mut self, delta_real_ms: f64) -> usize {
        if !self.state.is_playing() || !delta_real_ms.is_finite() || delta_real_ms <= 0.0 {
            return 0;
        }
        self.accumulator_ms = (self.accumulator_ms + delta_real_ms * self.speed).min(f64::MAX);

        let mut crossed = 0usize;
        let mut budget = usize::MAX;
        if self.looping {
            let (cycle_ms, cycle_steps) = self.cycle();
            if cycle_ms > 0.0 && self.accumulator_ms >= cycle_ms {
                let cycles = (self.accumulator_ms / cycle_ms).floor();
                self.accumulator_ms %= cycle_ms;
                crossed = (cycles as usize).saturating_mul(cycle_steps);
                tracing::trace!(cycles, "skipped whole playback cycles");
            }
            budget = cycle_steps;
        }

        loop {
            let step_ms = self.active_step_ms();
            if self.accumulator_ms < step_ms {
                break;
            }
            if budget == 0 {
                // Rounding residue left after a full cycle.
                self.accumulator_ms = 0.0;
                break;
            }
            budget -= 1;
            self.accumulator_ms -= step_ms;
            crossed = crossed.saturating_add(1);
            if !self.advance() {
                self.accumulator_ms = 0.0;
                self.state = PlaybackState::Stopped;
                self.invalidate_handles();
                tracing::debug!(
                    scene_index = self.scene_index,
                    step = self.step,
                    "playback reached the end"
                );
                break;
            }
        }
        crossed
    }

    /// Length and step count of one pass over every step of every scene.
    fn cycle(&self) -> (f64, usize) {
        self.play
            .ordered_scenes()
            .iter()
            .fold((0.0, 0), |(ms, steps), scene| {
                let groups = scene.ordered_groups();
                if groups.is_empty() {
                    (ms + FALLBACK_STEP_MS, steps + 1)
                } else {
                    let scene_ms: f64 = groups
                        .iter()
                        .map(|g| effective_step_ms(g.duration_ms))
                        .sum();
                    (ms + scene_ms, steps + groups.len())
                }
            })
    }

    /// [`PlaybackSession::tick`] on behalf of a scheduled callback; ignored when `handle`
    /// was issued before the last play/pause/stop/scrub.
    pub fn tick_scheduled(&mut self, handle: TickHandle, delta_real_ms: f64) -> usize {
        if handle.epoch != self.epoch {
            tracing::trace!("stale tick ignored");
            return 0;
        }
        self.tick(delta_real_ms)
    }

    fn advance(&mut self) -> bool {
        let scenes = self.play.ordered_scenes();
        let Some(scene) = scenes.get(self.scene_index) else {
            return false;
        };
        if let Some(next) = scene
            .ordered_groups()
            .iter()
            .map(|g| g.step)
            .find(|&s| s > self.step)
        {
            self.step = next;
            return true;
        }
        if let Some(next_scene) = scenes.get(self.scene_index + 1) {
            self.scene_index += 1;
            self.step = next_scene.first_step();
            return true;
        }
        if self.looping
            && let Some(first) = scenes.first()
        {
            self.scene_index = 0;
            self.step = first.first_step();
            tracing::debug!("playback looped");
            return true;
        }
        false
    }

    /// Timeline instant for the current position: the start of the held step's frame plus
    /// the accumulator, clamped to that frame. `None` if `timeline` has no such frame.
    pub fn position_ms(&self, timeline: &Timeline) -> Option<f64> {
        let idx = timeline.hold_frame_index(self.scene_index, self.step)?;
        let frame = timeline.frames[idx];
        Some(frame.start_ms + self.accumulator_ms.min(frame.duration_ms))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/session.rs"]
mod tests;
