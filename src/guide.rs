//! # Courtplay guide
//!
//! A short tour of how a play document becomes motion.
//!
//! ---
//!
//! ## The document
//!
//! A [`Play`](crate::Play) holds scenes sorted by their `order` field. Everything the engine
//! calls a *scene index* is a position in that sorted list, not an index into the raw vector.
//!
//! Each [`Scene`](crate::Scene) carries:
//! - five offense and five defense [`PlayerState`](crate::PlayerState)s in normalized court
//!   space (`0.0..=1.0` on both axes)
//! - a [`BallState`](crate::BallState), optionally attached to a player
//! - one or more [`TimingGroup`](crate::TimingGroup)s: numbered steps with a duration and the
//!   annotations (cuts, passes, screens, dribbles) drawn during that step
//!
//! Documents are JSON with camelCase keys. Load them with
//! [`Play::from_json_str`](crate::Play::from_json_str) and check them with
//! [`Play::validate`](crate::Play::validate), or build them in code with
//! [`PlayBuilder`](crate::PlayBuilder), which validates on `build`.
//!
//! ---
//!
//! ## The timeline
//!
//! [`build_timeline`](crate::build_timeline) flattens a play into back-to-back frames:
//!
//! ```text
//! scene 0: [step 1][step 2] [transition 0->1] scene 1: [step 1] ...
//! ```
//!
//! Step-hold frames last as long as their step. Steps without a positive duration hold for
//! [`FALLBACK_STEP_MS`](crate::FALLBACK_STEP_MS). Every gap between two scenes gets one
//! transition frame. The timeline is a pure function of the play and the transition length.
//!
//! ---
//!
//! ## Resolving an instant
//!
//! [`resolve_frame`](crate::resolve_frame) finds the frame containing an instant and returns a
//! [`ResolvedFrame`](crate::ResolvedFrame):
//! - inside a step hold, positions are the scene's own positions and the active annotations
//!   are that step's annotations. [`cumulative_annotations`](crate::cumulative_annotations)
//!   gives everything revealed so far when a renderer wants earlier steps kept on screen
//! - inside a transition, positions blend from one scene to the next with the configured
//!   [`Ease`](crate::Ease). A ball that changes hands snaps to the new holder halfway through.
//!
//! Instants before zero clamp to the start and instants past the end clamp to the final frame.
//!
//! ---
//!
//! ## Playback
//!
//! [`PlaybackSession`](crate::PlaybackSession) owns no thread or timer. The host calls
//! [`tick`](crate::PlaybackSession::tick) with elapsed wall-clock time, scaled by the speed.
//! Time that runs past a step boundary is carried into the next step, so ticking in small
//! pieces lands where one large tick would.
//!
//! Scrubbing with `set_scene_index` or `set_step` always stops playback. A host that schedules
//! ticks asynchronously should hold a [`TickHandle`](crate::TickHandle) and call
//! [`tick_scheduled`](crate::PlaybackSession::tick_scheduled); handles issued before the last
//! play, pause, or scrub are ignored.
//!
//! ---
//!
//! ## Editing history
//!
//! [`HistoryStack`](crate::HistoryStack) keeps up to 50 snapshots on each side by default.
//! Push the state *before* each edit. `undo` and `redo` take the current state and hand back
//! the one to restore.
//!
//! ---
//!
//! ## Batch export
//!
//! [`export_frames`](crate::export_frames) resolves the timeline at a fixed frame rate and
//! always includes the final instant. [`fingerprint_frames`](crate::fingerprint_frames) hashes
//! the result, which is how the tests pin determinism.
