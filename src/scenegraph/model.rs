use std::collections::BTreeSet;

use crate::foundation::{
    core::CourtPoint,
    error::{CourtError, CourtResult},
};

/// Number of players each side fields in every scene.
pub const PLAYERS_PER_SIDE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Which team a player token belongs to.
pub enum Side {
    /// Team with possession.
    Offense,
    /// Team without possession.
    Defense,
}

impl Side {
    /// Lowercase name, as serialized.
    pub fn name(self) -> &'static str {
        match self {
            Self::Offense => "offense",
            Self::Defense => "defense",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
/// Lookup key for a player token: `{side, position}`.
///
/// This is a value, not a pointer. It is resolved against whichever scene is being read
/// (see [`Scene::player`]), so documents stay acyclic and serialize as plain data.
pub struct PlayerRef {
    /// Team of the referenced player.
    pub side: Side,
    /// Court position number (1..=5).
    pub position: u8,
}

impl PlayerRef {
    /// Reference a player by side and position (1..=5).
    pub const fn new(side: Side, position: u8) -> Self {
        Self { side, position }
    }

    /// Shorthand for an offense reference.
    pub const fn offense(position: u8) -> Self {
        Self::new(Side::Offense, position)
    }

    /// Shorthand for a defense reference.
    pub const fn defense(position: u8) -> Self {
        Self::new(Side::Defense, position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One player token within a scene.
pub struct PlayerState {
    /// Court position number (1..=5), unique per side.
    pub position: u8,
    /// Normalized horizontal coordinate.
    pub x: f64,
    /// Normalized vertical coordinate.
    pub y: f64,
    /// Whether the token is drawn.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl PlayerState {
    /// A visible player at `(x, y)`.
    pub fn new(position: u8, x: f64, y: f64) -> Self {
        Self {
            position,
            x,
            y,
            visible: true,
        }
    }

    /// Stored coordinates as a point.
    pub fn point(&self) -> CourtPoint {
        CourtPoint::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Both teams' tokens for one scene.
pub struct Players {
    /// Offensive players.
    pub offense: Vec<PlayerState>,
    /// Defensive players.
    pub defense: Vec<PlayerState>,
}

impl Players {
    /// Players of one side.
    pub fn side(&self, side: Side) -> &[PlayerState] {
        match side {
            Side::Offense => &self.offense,
            Side::Defense => &self.defense,
        }
    }

    /// Mutable players of one side.
    pub fn side_mut(&mut self, side: Side) -> &mut Vec<PlayerState> {
        match side {
            Side::Offense => &mut self.offense,
            Side::Defense => &mut self.defense,
        }
    }

    /// Look up a player by `{side, position}`.
    pub fn get(&self, key: PlayerRef) -> Option<&PlayerState> {
        self.side(key.side)
            .iter()
            .find(|p| p.position == key.position)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Ball token. When `attached_to` is set the ball is drawn with that player.
pub struct BallState {
    /// Normalized horizontal coordinate.
    pub x: f64,
    /// Normalized vertical coordinate.
    pub y: f64,
    /// Player holding the ball, if any.
    #[serde(default)]
    pub attached_to: Option<PlayerRef>,
}

impl BallState {
    /// Stored coordinates as a point.
    pub fn point(&self) -> CourtPoint {
        CourtPoint::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Drawing style of an annotation. Timing logic treats all kinds alike.
pub enum AnnotationKind {
    /// Off-ball movement path.
    Movement,
    /// Dribble path.
    Dribble,
    /// Pass line.
    Pass,
    /// Screen marker.
    Screen,
    /// Cut path.
    Cut,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A drawn arrow/marker that belongs to exactly one timing group.
pub struct Annotation {
    /// Document-unique identifier.
    pub id: String,
    /// Drawing style.
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    /// Start point.
    pub from: CourtPoint,
    /// End point.
    pub to: CourtPoint,
    /// Player the annotation starts at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_player: Option<PlayerRef>,
    /// Player the annotation ends at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_player: Option<PlayerRef>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A step within a scene: annotations that happen together, held for `duration_ms`.
pub struct TimingGroup {
    /// 1-based step number.
    pub step: u32,
    /// Hold duration; non-positive values fall back to one second.
    #[serde(rename = "duration")]
    pub duration_ms: f64,
    /// Annotations revealed at this step.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl TimingGroup {
    /// A step without annotations.
    pub fn new(step: u32, duration_ms: f64) -> Self {
        Self {
            step,
            duration_ms,
            annotations: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One static diagram state within a play.
pub struct Scene {
    /// Document-unique identifier.
    pub id: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// 0-based position within the play.
    pub order: u32,
    /// Steps, normally contiguous from 1.
    pub timing_groups: Vec<TimingGroup>,
    /// Player tokens.
    pub players: Players,
    /// Ball token.
    pub ball: BallState,
}

impl Scene {
    /// Timing groups sorted by ascending step.
    pub fn ordered_groups(&self) -> Vec<&TimingGroup> {
        let mut groups: Vec<&TimingGroup> = self.timing_groups.iter().collect();
        groups.sort_by_key(|g| g.step);
        groups
    }

    /// The timing group numbered `step`.
    pub fn group(&self, step: u32) -> Option<&TimingGroup> {
        self.timing_groups.iter().find(|g| g.step == step)
    }

    /// Lowest step number present, or 1 for a scene without groups.
    pub fn first_step(&self) -> u32 {
        self.timing_groups.iter().map(|g| g.step).min().unwrap_or(1)
    }

    /// Every annotation in the scene, in step order.
    pub fn annotations(&self) -> Vec<&Annotation> {
        self.ordered_groups()
            .into_iter()
            .flat_map(|g| g.annotations.iter())
            .collect()
    }

    /// Look up a player in this scene.
    pub fn player(&self, key: PlayerRef) -> Option<&PlayerState> {
        self.players.get(key)
    }

    /// Where the ball is drawn: on the attached player when the reference resolves,
    /// otherwise at the ball's own coordinates.
    pub fn ball_position(&self) -> CourtPoint {
        self.ball
            .attached_to
            .and_then(|key| self.player(key))
            .map(PlayerState::point)
            .unwrap_or_else(|| self.ball.point())
    }

    /// Sort groups by step and renumber them `1..=n`. A scene without groups gets an
    /// empty step 1.
    pub fn normalize_steps(&mut self) {
        if self.timing_groups.is_empty() {
            self.timing_groups
                .push(TimingGroup::new(1, crate::foundation::core::FALLBACK_STEP_MS));
            return;
        }
        self.timing_groups.sort_by_key(|g| g.step);
        for (i, g) in self.timing_groups.iter_mut().enumerate() {
            g.step = i as u32 + 1;
        }
    }

    fn validate(&self, annotation_ids: &mut BTreeSet<String>) -> CourtResult<()> {
        if self.timing_groups.is_empty() {
            return Err(CourtError::validation(format!(
                "scene '{}' must have at least one timing group",
                self.id
            )));
        }
        let mut steps = BTreeSet::new();
        for g in &self.timing_groups {
            if g.step == 0 {
                return Err(CourtError::validation(format!(
                    "scene '{}' has a timing group with step 0 (steps are 1-based)",
                    self.id
                )));
            }
            if !steps.insert(g.step) {
                return Err(CourtError::validation(format!(
                    "scene '{}' has duplicate step {}",
                    self.id, g.step
                )));
            }
            if g.duration_ms.is_nan() {
                return Err(CourtError::validation(format!(
                    "scene '{}' step {} has a NaN duration",
                    self.id, g.step
                )));
            }
            for a in &g.annotations {
                if !annotation_ids.insert(a.id.clone()) {
                    return Err(CourtError::validation(format!(
                        "duplicate annotation id '{}'",
                        a.id
                    )));
                }
                if !a.from.is_finite() || !a.to.is_finite() {
                    return Err(CourtError::validation(format!(
                        "annotation '{}' has non-finite endpoints",
                        a.id
                    )));
                }
                for key in [a.from_player, a.to_player].into_iter().flatten() {
                    if self.player(key).is_none() {
                        return Err(CourtError::validation(format!(
                            "annotation '{}' references missing {} player {}",
                            a.id,
                            key.side.name(),
                            key.position
                        )));
                    }
                }
            }
        }

        for side in [Side::Offense, Side::Defense] {
            let players = self.players.side(side);
            if players.len() != PLAYERS_PER_SIDE {
                return Err(CourtError::validation(format!(
                    "scene '{}' must have exactly {PLAYERS_PER_SIDE} {} players (found {})",
                    self.id,
                    side.name(),
                    players.len()
                )));
            }
            let mut seen = BTreeSet::new();
            for p in players {
                if !(1..=PLAYERS_PER_SIDE as u8).contains(&p.position) || !seen.insert(p.position)
                {
                    return Err(CourtError::validation(format!(
                        "scene '{}' has invalid or duplicate {} position {}",
                        self.id,
                        side.name(),
                        p.position
                    )));
                }
                if !p.point().is_on_court() {
                    return Err(CourtError::validation(format!(
                        "scene '{}' {} player {} is outside normalized court space",
                        self.id,
                        side.name(),
                        p.position
                    )));
                }
            }
        }

        if !self.ball.point().is_on_court() {
            return Err(CourtError::validation(format!(
                "scene '{}' ball is outside normalized court space",
                self.id
            )));
        }
        if let Some(key) = self.ball.attached_to
            && self.player(key).is_none()
        {
            return Err(CourtError::validation(format!(
                "scene '{}' ball is attached to missing {} player {}",
                self.id,
                key.side.name(),
                key.position
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Court drawing variant. Playback ignores it.
pub enum CourtType {
    /// Half court.
    #[default]
    Half,
    /// Full court.
    Full,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A complete play document: ordered scenes plus metadata.
///
/// A play is pure data. It can be built programmatically (see [`crate::PlayBuilder`]) or
/// loaded from JSON, and is only ever read by the playback engine.
pub struct Play {
    /// Document identifier.
    #[serde(default)]
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Free-form category (e.g. "Set", "BLOB").
    #[serde(default)]
    pub category: String,
    /// Court drawing variant.
    #[serde(default)]
    pub court_type: CourtType,
    /// Scenes, ordered by their `order` field.
    pub scenes: Vec<Scene>,
}

impl Play {
    /// Parse a document. Does not validate; see [`Play::validate`].
    pub fn from_json_str(s: &str) -> CourtResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> CourtResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Scenes sorted by `order` (stable for equal values).
    pub fn ordered_scenes(&self) -> Vec<&Scene> {
        let mut scenes: Vec<&Scene> = self.scenes.iter().collect();
        scenes.sort_by_key(|s| s.order);
        scenes
    }

    /// Scene at a 0-based playback index (position in `order`).
    pub fn scene_at(&self, index: usize) -> Option<&Scene> {
        self.ordered_scenes().get(index).copied()
    }

    /// Number of scenes.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Find a scene by id.
    pub fn scene_by_id(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Sort scenes by `order`, renumber `order` to `0..n` and normalize every scene's steps.
    pub fn normalize(&mut self) {
        self.scenes.sort_by_key(|s| s.order);
        for (i, scene) in self.scenes.iter_mut().enumerate() {
            scene.order = i as u32;
            scene.normalize_steps();
        }
    }

    /// Check structural invariants: contiguous `order`, unique ids, five players per side
    /// with positions 1..=5, on-court coordinates, and resolvable player references.
    pub fn validate(&self) -> CourtResult<()> {
        let mut orders: Vec<u32> = self.scenes.iter().map(|s| s.order).collect();
        orders.sort_unstable();
        if orders.iter().enumerate().any(|(i, &o)| o != i as u32) {
            return Err(CourtError::validation(
                "scene order values must be contiguous and 0-based",
            ));
        }

        let mut scene_ids = BTreeSet::new();
        let mut annotation_ids = BTreeSet::new();
        for scene in &self.scenes {
            if scene.id.trim().is_empty() {
                return Err(CourtError::validation("scene id must be non-empty"));
            }
            if !scene_ids.insert(scene.id.as_str()) {
                return Err(CourtError::validation(format!(
                    "duplicate scene id '{}'",
                    scene.id
                )));
            }
            scene.validate(&mut annotation_ids)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scenegraph/model.rs"]
mod tests;
