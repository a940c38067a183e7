use crate::{
    animation::ease::Ease,
    foundation::core::DEFAULT_TRANSITION_MS,
    foundation::error::{CourtError, CourtResult},
};

/// Default number of snapshots retained on each side of the undo history.
pub const DEFAULT_HISTORY_CAP: usize = 50;

/// Default sampling rate for batch exports.
pub const DEFAULT_EXPORT_FPS: u32 = 30;

/// Engine-wide options shared by timeline building, resolving, history, and export.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOpts {
    /// Length of each scene-to-scene blend in milliseconds.
    pub transition_ms: f64,
    /// Easing applied to transition progress.
    pub ease: Ease,
    /// Maximum number of snapshots on each history stack.
    pub history_cap: usize,
    /// Sampling rate used by batch exports.
    pub export_fps: u32,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            transition_ms: DEFAULT_TRANSITION_MS,
            ease: Ease::default(),
            history_cap: DEFAULT_HISTORY_CAP,
            export_fps: DEFAULT_EXPORT_FPS,
        }
    }
}

impl EngineOpts {
    /// Defaults overlaid with `COURTPLAY_*` environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Overlay `COURTPLAY_TRANSITION_MS`, `COURTPLAY_HISTORY_CAP` and `COURTPLAY_EXPORT_FPS`.
    ///
    /// Unparsable values are ignored, as are negative transitions and a zero cap or rate.
    pub fn with_env(self) -> Self {
        self.with_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(ms) = var("COURTPLAY_TRANSITION_MS")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
        {
            self.transition_ms = ms;
        }
        if let Some(cap) = var("COURTPLAY_HISTORY_CAP")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.history_cap = cap;
        }
        if let Some(fps) = var("COURTPLAY_EXPORT_FPS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            self.export_fps = fps;
        }
        self
    }

    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> CourtResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject negative or non-finite transitions and a zero history cap or export rate.
    pub fn validate(&self) -> CourtResult<()> {
        if !self.transition_ms.is_finite() || self.transition_ms < 0.0 {
            return Err(CourtError::validation(
                "transitionMs must be a finite, non-negative number",
            ));
        }
        if self.history_cap == 0 {
            return Err(CourtError::validation("historyCap must be > 0"));
        }
        if self.export_fps == 0 {
            return Err(CourtError::validation("exportFps must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
