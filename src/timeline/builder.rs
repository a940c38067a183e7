use crate::{
    foundation::core::{FALLBACK_STEP_MS, effective_step_ms},
    scenegraph::model::Play,
};

/// What a timeline frame shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum FrameKind {
    /// Static display of one step of one scene.
    StepHold {
        /// Held scene.
        scene_index: usize,
        /// Held step.
        step: u32,
    },
    /// Blend from one scene into the next.
    SceneTransition {
        /// Source scene.
        scene_index: usize,
        /// Target scene, always `scene_index + 1`.
        to_scene_index: usize,
    },
}

/// One unit of the flattened timeline, `[start_ms, start_ms + duration_ms)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFrame {
    /// What the frame shows.
    #[serde(flatten)]
    pub kind: FrameKind,
    /// Inclusive start.
    pub start_ms: f64,
    /// Length; zero for an empty transition.
    pub duration_ms: f64,
}

impl TimelineFrame {
    /// Exclusive end.
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    /// Whether `ms` falls in the half-open range.
    pub fn contains(&self, ms: f64) -> bool {
        self.start_ms <= ms && ms < self.end_ms()
    }

    /// Scene the frame starts from (the held scene, or the transition's source).
    pub fn scene_index(&self) -> usize {
        match self.kind {
            FrameKind::StepHold { scene_index, .. } => scene_index,
            FrameKind::SceneTransition { scene_index, .. } => scene_index,
        }
    }

    /// Whether this is a scene-transition frame.
    pub fn is_transition(&self) -> bool {
        matches!(self.kind, FrameKind::SceneTransition { .. })
    }
}

/// A play flattened into back-to-back frames.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Frames in playback order.
    pub frames: Vec<TimelineFrame>,
    /// Sum of all frame durations.
    pub total_ms: f64,
}

impl Timeline {
    /// Whether the timeline has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Index of the step-hold frame for `(scene_index, step)`.
    pub fn hold_frame_index(&self, scene_index: usize, step: u32) -> Option<usize> {
        self.frames.iter().position(|f| {
            f.kind
                == FrameKind::StepHold {
                    scene_index,
                    step,
                }
        })
    }
}

/// Flatten `play` into a gap-free timeline.
///
/// Scenes are visited in `order`. Each scene emits one step-hold frame per timing group in
/// ascending step order, then (except after the last scene) one scene-transition frame of
/// `transition_ms`. Non-positive step durations use the one-second fallback. The function
/// is pure: equal input always yields an equal timeline.
#[tracing::instrument(skip(play), fields(scenes = play.scenes.len()))]
pub fn build_timeline(play: &Play, transition_ms: f64) -> Timeline {
    let transition_ms = if transition_ms.is_finite() && transition_ms > 0.0 {
        transition_ms
    } else {
        0.0
    };

    let scenes = play.ordered_scenes();
    let mut frames = Vec::new();
    let mut cursor = 0.0;
    let mut push = |kind: FrameKind, duration_ms: f64, frames: &mut Vec<TimelineFrame>| {
        frames.push(TimelineFrame {
            kind,
            start_ms: cursor,
            duration_ms,
        });
        cursor += duration_ms;
    };

    for (scene_index, scene) in scenes.iter().enumerate() {
        let groups = scene.ordered_groups();
        if groups.is_empty() {
            tracing::warn!(
                scene = %scene.id,
                "scene has no timing groups; holding it for the fallback duration"
            );
            push(
                FrameKind::StepHold {
                    scene_index,
                    step: 1,
                },
                FALLBACK_STEP_MS,
                &mut frames,
            );
        }
        for group in groups {
            push(
                FrameKind::StepHold {
                    scene_index,
                    step: group.step,
                },
                effective_step_ms(group.duration_ms),
                &mut frames,
            );
        }
        if scene_index + 1 < scenes.len() {
            push(
                FrameKind::SceneTransition {
                    scene_index,
                    to_scene_index: scene_index + 1,
                },
                transition_ms,
                &mut frames,
            );
        }
    }

    Timeline {
        frames,
        total_ms: cursor,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
