//! Courtplay is a deterministic playback engine for basketball play diagrams.
//!
//! A [`Play`] is an ordered list of [`Scene`]s. Each scene places ten players and the ball on
//! a normalized court and splits its annotations into numbered steps ([`TimingGroup`]s).
//! The engine turns that document into motion:
//!
//! - Flatten a play into a gap-free [`Timeline`] with [`build_timeline`]
//! - Resolve any instant into a drawable [`ResolvedFrame`] with [`resolve_frame`]
//! - Drive real-time playback with a [`PlaybackSession`]
//! - Keep editor undo/redo in a bounded [`HistoryStack`]
//!
//! See [`guide`] for a walkthrough.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod eval;
/// Narrative walkthrough of the engine.
pub mod guide;
pub(crate) mod history;
pub(crate) mod playback;
pub(crate) mod scenegraph;
pub(crate) mod timeline;

pub use crate::foundation::config::{DEFAULT_EXPORT_FPS, DEFAULT_HISTORY_CAP, EngineOpts};
pub use crate::foundation::core::{
    CourtPoint, DEFAULT_TRANSITION_MS, FALLBACK_STEP_MS, effective_step_ms,
};
pub use crate::foundation::error::{CourtError, CourtResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::interp::{ATTACHMENT_SNAP_T, Lerp, SceneState, interpolate_scene};
pub use crate::eval::export::{
    FrameFingerprint, export_frames, export_timestamps, fingerprint_frames,
};
pub use crate::eval::resolver::{
    FrameResolver, ResolvedFrame, cumulative_annotations, resolve_frame,
};
pub use crate::history::stack::{HistoryStack, Snapshot};
pub use crate::playback::session::PlaybackSession;
pub use crate::playback::state::{PlaybackState, PlaybackStatus, TickHandle};
pub use crate::scenegraph::dsl::{
    PlayBuilder, SceneBuilder, TimingGroupBuilder, annotation, default_players,
};
pub use crate::scenegraph::model::{
    Annotation, AnnotationKind, BallState, CourtType, PLAYERS_PER_SIDE, Play, PlayerRef,
    PlayerState, Players, Scene, Side, TimingGroup,
};
pub use crate::timeline::builder::{FrameKind, Timeline, TimelineFrame, build_timeline};
