use crate::{
    foundation::{
        core::{CourtPoint, FALLBACK_STEP_MS},
        error::{CourtError, CourtResult},
    },
    scenegraph::model::{
        Annotation, AnnotationKind, BallState, CourtType, Play, PlayerRef, PlayerState, Players,
        Scene, Side, TimingGroup,
    },
};

/// Fluent construction of a [`Play`]. Scenes get consecutive `order` values.
pub struct PlayBuilder {
    id: String,
    title: String,
    category: String,
    court_type: CourtType,
    scenes: Vec<Scene>,
}

impl PlayBuilder {
    /// Empty half-court play.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            category: String::new(),
            court_type: CourtType::Half,
            scenes: Vec::new(),
        }
    }

    /// Set the document id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the free-form category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the court variant.
    pub fn court_type(mut self, court_type: CourtType) -> Self {
        self.court_type = court_type;
        self
    }

    /// Append a scene; its `order` is assigned from its position in the builder.
    pub fn scene(mut self, scene: SceneBuilder) -> Self {
        let order = self.scenes.len() as u32;
        self.scenes.push(scene.build_at(order));
        self
    }

    /// Assemble and validate the play.
    pub fn build(self) -> CourtResult<Play> {
        let play = Play {
            id: self.id,
            title: self.title,
            category: self.category,
            court_type: self.court_type,
            scenes: self.scenes,
        };
        play.validate()?;
        Ok(play)
    }
}

/// Fluent construction of a [`Scene`], starting from the default layout.
pub struct SceneBuilder {
    id: String,
    name: String,
    players: Players,
    ball: BallState,
    groups: Vec<TimingGroup>,
}

impl SceneBuilder {
    /// A scene with the default player layout, the ball with offense 1, and no steps yet.
    pub fn new(id: impl Into<String>) -> Self {
        let players = Players {
            offense: default_players(Side::Offense),
            defense: default_players(Side::Defense),
        };
        let handler = players.offense[0];
        Self {
            id: id.into(),
            name: String::new(),
            ball: BallState {
                x: handler.x,
                y: handler.y,
                attached_to: Some(PlayerRef::offense(handler.position)),
            },
            players,
            groups: Vec::new(),
        }
    }

    /// Start from an existing scene's positions (explicit structural copy).
    pub fn from_scene(id: impl Into<String>, scene: &Scene) -> Self {
        Self {
            id: id.into(),
            name: scene.name.clone(),
            players: scene.players.clone(),
            ball: scene.ball,
            groups: Vec::new(),
        }
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Move a player. Unknown positions are ignored.
    pub fn player(mut self, key: PlayerRef, x: f64, y: f64) -> Self {
        if let Some(p) = self
            .players
            .side_mut(key.side)
            .iter_mut()
            .find(|p| p.position == key.position)
        {
            p.x = x;
            p.y = y;
        }
        self
    }

    /// Hide a player. Unknown positions are ignored.
    pub fn hidden(mut self, key: PlayerRef) -> Self {
        if let Some(p) = self
            .players
            .side_mut(key.side)
            .iter_mut()
            .find(|p| p.position == key.position)
        {
            p.visible = false;
        }
        self
    }

    /// Replace a whole side.
    pub fn players(mut self, side: Side, players: Vec<PlayerState>) -> Self {
        *self.players.side_mut(side) = players;
        self
    }

    /// Loose ball at a fixed spot.
    pub fn ball(mut self, x: f64, y: f64) -> Self {
        self.ball = BallState {
            x,
            y,
            attached_to: None,
        };
        self
    }

    /// Ball held by `key`; the stored coordinates follow that player.
    pub fn ball_with(mut self, key: PlayerRef) -> Self {
        let at = self
            .players
            .get(key)
            .map(PlayerState::point)
            .unwrap_or_else(|| self.ball.point());
        self.ball = BallState {
            x: at.x,
            y: at.y,
            attached_to: Some(key),
        };
        self
    }

    /// Append the next step (numbered after the existing ones).
    pub fn step(mut self, group: TimingGroupBuilder) -> Self {
        let step = self.groups.len() as u32 + 1;
        self.groups.push(group.build_at(step));
        self
    }

    fn build_at(mut self, order: u32) -> Scene {
        if self.groups.is_empty() {
            self.groups.push(TimingGroup::new(1, FALLBACK_STEP_MS));
        }
        Scene {
            id: self.id,
            name: self.name,
            order,
            timing_groups: self.groups,
            players: self.players,
            ball: self.ball,
        }
    }

    /// Build a standalone scene at `order`, validating nothing beyond structure.
    pub fn build(self, order: u32) -> CourtResult<Scene> {
        if self.id.trim().is_empty() {
            return Err(CourtError::validation("scene id must be non-empty"));
        }
        Ok(self.build_at(order))
    }
}

/// One step under construction. Its number is assigned by [`SceneBuilder::step`].
pub struct TimingGroupBuilder {
    duration_ms: f64,
    annotations: Vec<Annotation>,
}

impl TimingGroupBuilder {
    /// A step lasting `duration_ms`.
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            annotations: Vec::new(),
        }
    }

    /// Add an annotation drawn during this step.
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    fn build_at(self, step: u32) -> TimingGroup {
        TimingGroup {
            step,
            duration_ms: self.duration_ms,
            annotations: self.annotations,
        }
    }
}

/// An annotation between two points, not tied to any player.
pub fn annotation(
    id: impl Into<String>,
    kind: AnnotationKind,
    from: CourtPoint,
    to: CourtPoint,
) -> Annotation {
    Annotation {
        id: id.into(),
        kind,
        from,
        to,
        from_player: None,
        to_player: None,
    }
}

/// Standard five-out starting spots for a half court (basket at the top, `y = 0`).
pub fn default_players(side: Side) -> Vec<PlayerState> {
    const OFFENSE: [(f64, f64); 5] = [
        (0.50, 0.70),
        (0.82, 0.55),
        (0.18, 0.55),
        (0.68, 0.22),
        (0.32, 0.22),
    ];
    const DEFENSE: [(f64, f64); 5] = [
        (0.50, 0.60),
        (0.74, 0.48),
        (0.26, 0.48),
        (0.62, 0.16),
        (0.38, 0.16),
    ];
    let spots = match side {
        Side::Offense => OFFENSE,
        Side::Defense => DEFENSE,
    };
    spots
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| PlayerState::new(i as u8 + 1, x, y))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scenegraph/dsl.rs"]
mod tests;
