use crate::{
    animation::ease::Ease,
    foundation::core::{CourtPoint, clamp01},
    scenegraph::model::{Annotation, BallState, PlayerRef, PlayerState, Scene, Side},
};

/// Ball attachment switches to the target scene's value once progress reaches this point.
pub const ATTACHMENT_SNAP_T: f64 = 0.5;

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    /// `a` at `t = 0`, `b` at `t = 1`. `t` is not clamped.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for CourtPoint {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        CourtPoint::new(f64::lerp(&a.x, &b.x, t), f64::lerp(&a.y, &b.y, t))
    }
}

/// Visual state of a scene at some instant: what a renderer draws.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneState {
    /// Offense players, in the source scene's order.
    pub offense: Vec<PlayerState>,
    /// Defense players, in the source scene's order.
    pub defense: Vec<PlayerState>,
    /// Ball position and holder.
    pub ball: BallState,
    /// Annotations of the scene this state was taken from (all steps).
    pub annotations: Vec<Annotation>,
}

impl SceneState {
    /// The untouched state of a single scene.
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            offense: scene.players.offense.clone(),
            defense: scene.players.defense.clone(),
            ball: scene.ball,
            annotations: scene.annotations().into_iter().cloned().collect(),
        }
    }

    /// Players of one side.
    pub fn side(&self, side: Side) -> &[PlayerState] {
        match side {
            Side::Offense => &self.offense,
            Side::Defense => &self.defense,
        }
    }

    /// Look up a player by `{side, position}`.
    pub fn player(&self, key: PlayerRef) -> Option<&PlayerState> {
        self.side(key.side)
            .iter()
            .find(|p| p.position == key.position)
    }
}

fn blend_player(from: &PlayerState, to: Option<&PlayerState>, e: f64) -> PlayerState {
    let Some(to) = to else {
        return *from;
    };
    let at = CourtPoint::lerp(&from.point(), &to.point(), e);
    PlayerState {
        position: from.position,
        x: at.x,
        y: at.y,
        visible: to.visible,
    }
}

fn blend_side(from: &Scene, to: &Scene, side: Side, e: f64) -> Vec<PlayerState> {
    from.players
        .side(side)
        .iter()
        .map(|p| blend_player(p, to.player(PlayerRef::new(side, p.position)), e))
        .collect()
}

/// Blend `from` toward `to` at progress `t` (clamped to `[0, 1]`).
///
/// Positions are matched by `{side, position}` and lerped with `ease(t)`; a player missing
/// from `to` passes through unchanged. `visible` takes the target value immediately. The
/// ball's coordinates blend like a player's but its attachment is discrete: the source
/// value below [`ATTACHMENT_SNAP_T`], the target value from there on. The returned
/// annotations are always the source scene's.
pub fn interpolate_scene(from: &Scene, to: &Scene, t: f64, ease: Ease) -> SceneState {
    let t = clamp01(t);
    let e = ease.apply(t);

    let ball_at = CourtPoint::lerp(&from.ball.point(), &to.ball.point(), e);
    let attached_to = if t >= ATTACHMENT_SNAP_T {
        to.ball.attached_to
    } else {
        from.ball.attached_to
    };

    SceneState {
        offense: blend_side(from, to, Side::Offense, e),
        defense: blend_side(from, to, Side::Defense, e),
        ball: BallState {
            x: ball_at.x,
            y: ball_at.y,
            attached_to,
        },
        annotations: from.annotations().into_iter().cloned().collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interp.rs"]
mod tests;
