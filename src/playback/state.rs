/// Playback state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Not advancing; position is kept.
    #[default]
    Stopped,
    /// Advancing on every tick.
    Playing,
}

impl PlaybackState {
    /// Lowercase name, as serialized.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
        }
    }

    /// Whether ticks advance the position.
    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Token a host holds for its scheduled ticks.
///
/// Every `play`, `pause`, `stop`, scrub, or document swap invalidates outstanding handles,
/// so a tick that was scheduled before one of those calls can no longer change the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle {
    pub(crate) epoch: u64,
}

/// Point-in-time view of a session, for hosts and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStatus {
    /// Playing or stopped.
    pub state: PlaybackState,
    /// Index into the `order`-sorted scenes.
    pub scene_index: usize,
    /// Current step.
    pub step: u32,
    /// Virtual time spent in the current step.
    pub accumulator_ms: f64,
    /// Rate multiplier.
    pub speed: f64,
    /// Wrap-around enabled.
    #[serde(rename = "loop")]
    pub looping: bool,
}
