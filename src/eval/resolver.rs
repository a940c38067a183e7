use crate::{
    animation::{
        ease::Ease,
        interp::{SceneState, interpolate_scene},
    },
    foundation::{
        config::EngineOpts,
        core::clamp01,
        error::{CourtError, CourtResult},
    },
    scenegraph::model::{Annotation, Play},
    timeline::builder::{FrameKind, Timeline, TimelineFrame, build_timeline},
};

/// Everything a renderer needs for one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFrame {
    /// The active timeline frame.
    pub frame: TimelineFrame,
    /// Index of `frame` within the timeline.
    pub frame_index: usize,
    /// The requested instant after clamping to `[0, total_ms]`.
    pub at_ms: f64,
    /// Position within `frame`, in `[0, 1]`.
    pub progress: f64,
    /// Step-hold: exactly the held step's annotations. Transition: the source scene's.
    pub active_annotations: Vec<Annotation>,
    /// Player and ball state to draw.
    pub scene: SceneState,
}

fn locate(timeline: &Timeline, at_ms: f64) -> Option<usize> {
    if timeline.frames.is_empty() {
        return None;
    }
    Some(
        timeline
            .frames
            .iter()
            .position(|f| f.contains(at_ms))
            .unwrap_or(timeline.frames.len() - 1),
    )
}

/// Resolve the visual state of `play` at `current_ms` on `timeline`.
///
/// `current_ms` is clamped into `[0, total_ms]`; the first frame whose half-open range
/// contains it wins, and the exact end of the timeline maps to the last frame at progress 1.
/// Transition frames blend with `ease(progress)` handed to the interpolator as an already
/// eased, linear value. Returns `None` when there is nothing to render: an empty timeline,
/// or a timeline that references scenes `play` does not have.
#[tracing::instrument(skip(play, timeline), fields(frames = timeline.frames.len()))]
pub fn resolve_frame(
    play: &Play,
    timeline: &Timeline,
    current_ms: f64,
    ease: Ease,
) -> Option<ResolvedFrame> {
    let at_ms = if current_ms.is_nan() {
        0.0
    } else {
        current_ms.clamp(0.0, timeline.total_ms.max(0.0))
    };
    let frame_index = locate(timeline, at_ms)?;
    let frame = timeline.frames[frame_index];
    let progress = clamp01((at_ms - frame.start_ms) / frame.duration_ms.max(1.0));

    let (active_annotations, scene) = match frame.kind {
        FrameKind::StepHold { scene_index, step } => {
            let scene = play.scene_at(scene_index)?;
            let active = scene
                .group(step)
                .map(|g| g.annotations.clone())
                .unwrap_or_default();
            (active, SceneState::from_scene(scene))
        }
        FrameKind::SceneTransition {
            scene_index,
            to_scene_index,
        } => {
            let from = play.scene_at(scene_index)?;
            let to = play.scene_at(to_scene_index)?;
            let state = interpolate_scene(from, to, ease.apply(progress), Ease::Linear);
            (state.annotations.clone(), state)
        }
    };

    Some(ResolvedFrame {
        frame,
        frame_index,
        at_ms,
        progress,
        active_annotations,
        scene,
    })
}

/// Annotations revealed so far at `frame`: every step of the frame's scene up to and
/// including the held step. Transition frames reveal the whole source scene.
pub fn cumulative_annotations(play: &Play, frame: &TimelineFrame) -> Vec<Annotation> {
    let Some(scene) = play.scene_at(frame.scene_index()) else {
        return Vec::new();
    };
    let upto = match frame.kind {
        FrameKind::StepHold { step, .. } => step,
        FrameKind::SceneTransition { .. } => u32::MAX,
    };
    scene
        .ordered_groups()
        .into_iter()
        .filter(|g| g.step <= upto)
        .flat_map(|g| g.annotations.iter().cloned())
        .collect()
}

/// A play paired with its flattened timeline, for hosts that resolve many instants.
#[derive(Clone, Debug)]
pub struct FrameResolver {
    play: Play,
    timeline: Timeline,
    ease: Ease,
}

impl FrameResolver {
    /// Build the timeline for `play` with the transition length and ease from `opts`.
    pub fn new(play: Play, opts: &EngineOpts) -> Self {
        let timeline = build_timeline(&play, opts.transition_ms);
        Self {
            play,
            timeline,
            ease: opts.ease,
        }
    }

    /// The resolved document.
    pub fn play(&self) -> &Play {
        &self.play
    }

    /// The cached timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Total timeline length in milliseconds.
    pub fn total_ms(&self) -> f64 {
        self.timeline.total_ms
    }

    /// See [`resolve_frame`].
    pub fn resolve(&self, current_ms: f64) -> Option<ResolvedFrame> {
        resolve_frame(&self.play, &self.timeline, current_ms, self.ease)
    }

    /// [`FrameResolver::resolve`] for callers that treat "nothing to draw" as an error.
    pub fn try_resolve(&self, current_ms: f64) -> CourtResult<ResolvedFrame> {
        self.resolve(current_ms).ok_or_else(|| {
            CourtError::timeline(format!(
                "nothing to resolve at {current_ms}ms ({} frame(s), {} scene(s))",
                self.timeline.len(),
                self.play.scene_count()
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/resolver.rs"]
mod tests;
