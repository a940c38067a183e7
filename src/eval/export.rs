use crate::{
    animation::ease::Ease,
    eval::resolver::{ResolvedFrame, resolve_frame},
    foundation::math::Fnv1a64,
    scenegraph::model::{Annotation, BallState, Play, PlayerState},
    timeline::builder::{FrameKind, Timeline},
};

/// Exact sampling instants for a batch export at `fps`.
///
/// Instants are `i * 1000 / fps` for every `i` that stays within the timeline; the final
/// instant is always `total_ms`, so the last frame is captured at progress 1. An empty
/// timeline or `fps == 0` yields no instants.
pub fn export_timestamps(timeline: &Timeline, fps: u32) -> Vec<f64> {
    if timeline.is_empty() || fps == 0 {
        return Vec::new();
    }
    let fps = f64::from(fps);
    let count = (timeline.total_ms * fps / 1000.0).floor() as u64;
    let mut out: Vec<f64> = (0..=count)
        .map(|i| i as f64 * 1000.0 / fps)
        .filter(|&ms| ms <= timeline.total_ms)
        .collect();
    if out.last().is_some_and(|&last| last < timeline.total_ms) {
        out.push(timeline.total_ms);
    }
    out
}

/// Resolve every export instant, in order.
///
/// Driving the resolver with explicit instants gives the same states a real-time host would
/// see at those instants.
#[tracing::instrument(skip(play, timeline), fields(total_ms = timeline.total_ms))]
pub fn export_frames(play: &Play, timeline: &Timeline, fps: u32, ease: Ease) -> Vec<ResolvedFrame> {
    export_timestamps(timeline, fps)
        .into_iter()
        .filter_map(|ms| resolve_frame(play, timeline, ms, ease))
        .collect()
}

/// 128-bit digest of a resolved frame sequence. Displays as 32 hex digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct FrameFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl std::fmt::Display for FrameFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Stable 128-bit fingerprint of a resolved frame sequence.
pub fn fingerprint_frames(frames: &[ResolvedFrame]) -> FrameFingerprint {
    let mut a = Fnv1a64::new_default();
    let mut b = Fnv1a64::new(0x9ae1_6a3b_2f90_404f);

    for h in [&mut a, &mut b] {
        h.write_u64(frames.len() as u64);
        for frame in frames {
            write_frame(h, frame);
        }
    }

    FrameFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_frame(h: &mut Fnv1a64, r: &ResolvedFrame) {
    match r.frame.kind {
        FrameKind::StepHold { scene_index, step } => {
            h.write_u8(0);
            h.write_u64(scene_index as u64);
            h.write_u64(u64::from(step));
        }
        FrameKind::SceneTransition {
            scene_index,
            to_scene_index,
        } => {
            h.write_u8(1);
            h.write_u64(scene_index as u64);
            h.write_u64(to_scene_index as u64);
        }
    }
    h.write_f64(r.frame.start_ms);
    h.write_f64(r.frame.duration_ms);
    h.write_f64(r.at_ms);
    h.write_f64(r.progress);

    for side in [&r.scene.offense, &r.scene.defense] {
        h.write_u64(side.len() as u64);
        for p in side {
            write_player(h, p);
        }
    }
    write_ball(h, &r.scene.ball);

    h.write_u64(r.active_annotations.len() as u64);
    for a in &r.active_annotations {
        write_annotation(h, a);
    }
}

fn write_player(h: &mut Fnv1a64, p: &PlayerState) {
    h.write_u8(p.position);
    h.write_f64(p.x);
    h.write_f64(p.y);
    h.write_u8(u8::from(p.visible));
}

fn write_ball(h: &mut Fnv1a64, ball: &BallState) {
    h.write_f64(ball.x);
    h.write_f64(ball.y);
    match ball.attached_to {
        Some(key) => {
            h.write_u8(1);
            h.write_str(key.side.name());
            h.write_u8(key.position);
        }
        None => h.write_u8(0),
    }
}

fn write_annotation(h: &mut Fnv1a64, a: &Annotation) {
    h.write_str(&a.id);
    h.write_u8(a.kind as u8);
    h.write_f64(a.from.x);
    h.write_f64(a.from.y);
    h.write_f64(a.to.x);
    h.write_f64(a.to.y);
}

#[cfg(test)]
#[path = "../../tests/unit/eval/export.rs"]
mod tests;
