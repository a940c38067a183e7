use super::*;
use crate::{
    foundation::core::CourtPoint,
    scenegraph::dsl::{PlayBuilder, SceneBuilder, TimingGroupBuilder, annotation},
    scenegraph::model::{AnnotationKind, PlayerRef},
};

fn arrow(id: &str) -> Annotation {
    annotation(
        id,
        AnnotationKind::Movement,
        CourtPoint::new(0.1, 0.1),
        CourtPoint::new(0.2, 0.2),
    )
}

fn two_scene_play() -> Play {
    PlayBuilder::new("Chin")
        .scene(
            SceneBuilder::new("s0")
                .player(PlayerRef::offense(1), 0.2, 0.5)
                .ball_with(PlayerRef::offense(1))
                .step(TimingGroupBuilder::new(1000.0).annotation(arrow("a1"))),
        )
        .scene(
            SceneBuilder::new("s1")
                .player(PlayerRef::offense(1), 0.8, 0.5)
                .ball_with(PlayerRef::offense(2))
                .step(TimingGroupBuilder::new(1000.0).annotation(arrow("b1"))),
        )
        .build()
        .unwrap()
}

fn multi_step_play() -> Play {
    PlayBuilder::new("Steps")
        .scene(
            SceneBuilder::new("s0")
                .step(TimingGroupBuilder::new(400.0).annotation(arrow("x1")))
                .step(
                    TimingGroupBuilder::new(400.0)
                        .annotation(arrow("x2"))
                        .annotation(arrow("x3")),
                )
                .step(TimingGroupBuilder::new(400.0)),
        )
        .scene(SceneBuilder::new("s1").step(TimingGroupBuilder::new(400.0).annotation(arrow("y1"))))
        .build()
        .unwrap()
}

#[test]
fn start_resolves_first_scene_at_zero() {
    let play = two_scene_play();
    let tl = build_timeline(&play, 500.0);
    let r = resolve_frame(&play, &tl, 0.0, Ease::default()).unwrap();
    assert_eq!(r.frame_index, 0);
    assert_eq!(r.frame.scene_index(), 0);
    assert_eq!(r.progress, 0.0);
    assert_eq!(r.scene.offense, play.scenes[0].players.offense);
}

#[test]
fn end_resolves_last_scene_at_one() {
    let play = two_scene_play();
    let tl = build_timeline(&play, 500.0);
    let r = resolve_frame(&play, &tl, tl.total_ms, Ease::default()).unwrap();
    assert_eq!(r.frame_index, 2);
    assert_eq!(r.frame.scene_index(), 1);
    assert_eq!(r.progress, 1.0);
    assert_eq!(r.scene.offense, play.scenes[1].players.offense);
}

#[test]
fn out_of_range_instants_are_clamped() {
    let play = two_scene_play();
    let tl = build_timeline(&play, 500.0);
    let early = resolve_frame(&play, &tl, -250.0, Ease::default()).unwrap();
    assert_eq!((early.at_ms, early.frame_index, early.progress), (0.0, 0, 0.0));
    let late = resolve_frame(&play, &tl, 1.0e9, Ease::default()).unwrap();
    assert_eq!((late.at_ms, late.frame_index, late.progress), (2500.0, 2, 1.0));
    let nan = resolve_frame(&play, &tl, f64::NAN, Ease::default()).unwrap();
    assert_eq!(nan.at_ms, 0.0);
}

#[test]
fn frame_boundaries_belong_to_the_later_frame() {
    let play = two_scene_play();
    let tl = build_timeline(&play, 500.0);
    let r = resolve_frame(&play, &tl, 1000.0, Ease::default()).unwrap();
    assert!(r.frame.is_transition());
    assert_eq!(r.progress, 0.0);
    let r = resolve_frame(&play, &tl, 1500.0, Ease::default()).unwrap();
    assert_eq!(r.frame_index, 2);
}

#[test]
fn transition_blends_with_eased_progress() {
    let play = two_scene_play();
    let tl = build_timeline(&play, 500.0);

    let mid = resolve_frame(&play, &tl, 1250.0, Ease::InOutQuad).unwrap();
    assert_eq!(mid.progress, 0.5);
    assert_eq!(mid.scene.player(PlayerRef::offense(1)).unwrap().x, 0.5);
    assert_eq!(mid.scene.ball.attached_to, Some(PlayerRef::offense(2)));

    let quarter = resolve_frame(&play, &tl, 1125.0, Ease::InOutQuad).unwrap();
    assert_eq!(quarter.progress, 0.25);
    // Eased once: ease(0.25) = 0.125, not ease(ease(0.25)).
    let x = quarter.scene.player(PlayerRef::offense(1)).unwrap().x;
    assert!((x - (0.2 + 0.6 * 0.125)).abs() < 1e-12);
    assert_eq!(quarter.scene.ball.attached_to, Some(PlayerRef::offense(1)));
}

#[test]
fn transition_shows_source_scene_annotations() {
    let play = multi_step_play();
    let tl = build_timeline(&play, 500.0);
    let r = resolve_frame(&play, &tl, 1300.0, Ease::Linear).unwrap();
    assert!(r.frame.is_transition());
    let ids: Vec<&str> = r.active_annotations.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["x1", "x2", "x3"]);
}

#[test]
fn step_hold_annotations_are_partitioned_by_step() {
    let play = multi_step_play();
    let tl = build_timeline(&play, 500.0);
    let mut ms = 0.0;
    while ms <= tl.total_ms {
        let r = resolve_frame(&play, &tl, ms, Ease::default()).unwrap();
        if let FrameKind::StepHold { scene_index, step } = r.frame.kind {
            let owner = play.scene_at(scene_index).unwrap();
            for a in &r.active_annotations {
                let group = owner
                    .timing_groups
                    .iter()
                    .find(|g| g.annotations.iter().any(|x| x.id == a.id))
                    .unwrap();
                assert_eq!(group.step, step);
            }
            assert_eq!(
                r.active_annotations.len(),
                owner.group(step).unwrap().annotations.len()
            );
        }
        ms += 50.0;
    }
}

#[test]
fn cumulative_reveal_layers_on_top() {
    let play = multi_step_play();
    let tl = build_timeline(&play, 500.0);
    let ids = |i: usize| -> Vec<String> {
        cumulative_annotations(&play, &tl.frames[i])
            .into_iter()
            .map(|a| a.id)
            .collect()
    };
    assert_eq!(ids(0), vec!["x1"]);
    assert_eq!(ids(1), vec!["x1", "x2", "x3"]);
    assert_eq!(ids(2), vec!["x1", "x2", "x3"]);
    assert_eq!(ids(3), vec!["x1", "x2", "x3"]);
    assert_eq!(ids(4), vec!["y1"]);
}

#[test]
fn empty_timeline_resolves_to_none() {
    let play = Play::default();
    let tl = build_timeline(&play, 500.0);
    assert!(resolve_frame(&play, &tl, 0.0, Ease::default()).is_none());
}

#[test]
fn timeline_from_another_play_resolves_to_none() {
    let big = multi_step_play();
    let tl = build_timeline(&big, 500.0);
    let small = PlayBuilder::new("one")
        .scene(SceneBuilder::new("only"))
        .build()
        .unwrap();
    assert!(resolve_frame(&small, &tl, tl.total_ms, Ease::default()).is_none());
}

#[test]
fn zero_length_transition_never_wins() {
    let play = two_scene_play();
    let tl = build_timeline(&play, 0.0);
    let r = resolve_frame(&play, &tl, 1000.0, Ease::default()).unwrap();
    assert_eq!(r.frame_index, 2);
}

#[test]
fn frame_resolver_caches_timeline() {
    let resolver = FrameResolver::new(two_scene_play(), &EngineOpts::default());
    assert_eq!(resolver.total_ms(), 2500.0);
    assert_eq!(resolver.timeline().len(), 3);
    let r = resolver.resolve(1250.0).unwrap();
    assert!(r.frame.is_transition());
    assert_eq!(resolver.play().scenes.len(), 2);
}

#[test]
fn try_resolve_reports_empty_documents() {
    let resolver = FrameResolver::new(Play::default(), &EngineOpts::default());
    let err = resolver.try_resolve(0.0).unwrap_err();
    assert!(matches!(err, CourtError::Timeline(_)));

    let resolver = FrameResolver::new(two_scene_play(), &EngineOpts::default());
    assert_eq!(resolver.try_resolve(10.0).unwrap().frame_index, 0);
}
