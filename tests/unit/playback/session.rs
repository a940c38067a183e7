use super::*;
use crate::{
    scenegraph::dsl::{PlayBuilder, SceneBuilder, TimingGroupBuilder},
    timeline::builder::build_timeline,
};

fn play() -> Play {
    PlayBuilder::new("Session")
        .scene(
            SceneBuilder::new("s0")
                .step(TimingGroupBuilder::new(300.0))
                .step(TimingGroupBuilder::new(400.0)),
        )
        .scene(SceneBuilder::new("s1").step(TimingGroupBuilder::new(500.0)))
        .scene(SceneBuilder::new("s2").step(TimingGroupBuilder::new(0.0)))
        .build()
        .unwrap()
}

fn at(session: &PlaybackSession) -> (usize, u32, f64) {
    (
        session.scene_index(),
        session.step(),
        session.accumulator_ms(),
    )
}

#[test]
fn new_session_is_stopped_at_start() {
    let s = PlaybackSession::new(play());
    assert_eq!(s.state(), PlaybackState::Stopped);
    assert_eq!(at(&s), (0, 1, 0.0));
    assert_eq!(s.speed(), 1.0);
    assert!(!s.is_looping());
}

#[test]
fn tick_while_stopped_is_a_no_op() {
    let mut s = PlaybackSession::new(play());
    assert_eq!(s.tick(10_000.0), 0);
    assert_eq!(at(&s), (0, 1, 0.0));
}

#[test]
fn play_requires_a_scene() {
    let mut s = PlaybackSession::new(Play::default());
    assert!(!s.play());
    assert_eq!(s.state(), PlaybackState::Stopped);
}

#[test]
fn remainder_carries_across_step_boundaries() {
    let mut s = PlaybackSession::new(play());
    s.play();
    assert_eq!(s.tick(350.0), 1);
    assert_eq!(at(&s), (0, 2, 50.0));
    assert_eq!(s.tick(450.0), 1);
    assert_eq!(at(&s), (1, 1, 100.0));
}

#[test]
fn split_ticks_match_a_single_tick() {
    let starts: [(usize, u32); 4] = [(0, 1), (0, 2), (1, 1), (2, 1)];
    for (scene, step) in starts {
        for looping in [false, true] {
            let mut whole = PlaybackSession::new(play());
            whole.set_loop(looping);
            whole.set_scene_index(scene);
            whole.set_step(step);
            let mut split = whole.clone();

            whole.play();
            whole.tick(500.0);
            split.play();
            split.tick(250.0);
            split.tick(250.0);
            assert_eq!(whole.status(), split.status(), "start {scene}/{step}");
        }
    }
}

#[test]
fn many_small_ticks_match_one_large_tick() {
    let mut whole = PlaybackSession::new(play());
    whole.set_loop(true);
    let mut split = whole.clone();
    whole.play();
    split.play();

    whole.tick(16.0 * 250.0);
    for _ in 0..250 {
        split.tick(16.0);
    }
    assert_eq!(whole.status(), split.status());
}

#[test]
fn end_without_loop_stops_on_last_step() {
    let mut s = PlaybackSession::new(play());
    s.play();
    // 300 + 400 + 500 + 1000 (fallback) = 2200
    s.tick(2199.0);
    assert!(s.is_playing());
    assert_eq!(at(&s), (2, 1, 999.0));
    s.tick(5000.0);
    assert_eq!(s.state(), PlaybackState::Stopped);
    assert_eq!(at(&s), (2, 1, 0.0));
    assert_eq!(s.tick(100.0), 0);
}

#[test]
fn loop_wraps_to_first_step_of_first_scene() {
    let mut s = PlaybackSession::new(play());
    s.set_loop(true);
    s.set_scene_index(2);
    s.play();
    s.tick(1000.0);
    assert!(s.is_playing());
    assert_eq!(at(&s), (0, 1, 0.0));
    // A full cycle later it is back at the start again.
    s.tick(2200.0);
    assert_eq!(at(&s), (0, 1, 0.0));
}

#[test]
fn speed_scales_elapsed_time() {
    let mut s = PlaybackSession::new(play());
    s.set_speed(2.0);
    s.play();
    s.tick(150.0);
    assert_eq!(at(&s), (0, 2, 0.0));
    s.set_speed(0.0);
    s.set_speed(f64::NAN);
    s.set_speed(-1.0);
    assert_eq!(s.speed(), 2.0);
    s.set_speed(0.5);
    s.tick(400.0);
    assert_eq!(at(&s), (0, 2, 200.0));
}

#[test]
fn invalid_deltas_are_ignored() {
    let mut s = PlaybackSession::new(play());
    s.play();
    s.tick(-50.0);
    s.tick(f64::NAN);
    s.tick(f64::INFINITY);
    assert_eq!(at(&s), (0, 1, 0.0));
}

#[test]
fn scrubbing_stops_and_clears_accumulator() {
    let mut s = PlaybackSession::new(play());
    s.play();
    s.tick(100.0);
    s.set_step(2);
    assert_eq!(s.state(), PlaybackState::Stopped);
    assert_eq!(at(&s), (0, 2, 0.0));

    s.play();
    s.tick(399.0);
    assert_eq!(at(&s), (0, 2, 399.0));

    s.set_scene_index(1);
    assert_eq!(s.state(), PlaybackState::Stopped);
    assert_eq!(at(&s), (1, 1, 0.0));
}

#[test]
fn scrubbing_to_missing_targets_is_a_no_op() {
    let mut s = PlaybackSession::new(play());
    s.play();
    s.tick(100.0);
    s.set_step(7);
    s.set_scene_index(9);
    assert!(s.is_playing());
    assert_eq!(at(&s), (0, 1, 100.0));
}

#[test]
fn play_resumes_in_place_with_fresh_accumulator() {
    let mut s = PlaybackSession::new(play());
    s.play();
    s.tick(350.0);
    s.pause();
    assert_eq!(at(&s), (0, 2, 50.0));
    s.play();
    assert_eq!(at(&s), (0, 2, 0.0));
    // Calling play while playing keeps the accumulator.
    s.tick(10.0);
    assert!(s.play());
    assert_eq!(s.accumulator_ms(), 10.0);
}

#[test]
fn stale_handles_cannot_tick_after_pause() {
    let mut s = PlaybackSession::new(play());
    s.play();
    let h = s.handle();
    assert_eq!(s.tick_scheduled(h, 350.0), 1);

    s.pause();
    assert_eq!(s.tick_scheduled(h, 1000.0), 0);
    s.play();
    assert_eq!(s.tick_scheduled(h, 1000.0), 0);
    assert_eq!(at(&s), (0, 2, 0.0));

    let fresh = s.handle();
    s.tick_scheduled(fresh, 100.0);
    assert_eq!(at(&s), (0, 2, 100.0));

    s.stop();
    assert_eq!(s.tick_scheduled(fresh, 100.0), 0);
    assert_eq!(at(&s), (0, 2, 100.0));
}

#[test]
fn handles_expire_when_playback_ends() {
    let mut s = PlaybackSession::new(play());
    s.play();
    let h = s.handle();
    s.tick_scheduled(h, 10_000.0);
    assert!(!s.is_playing());
    s.play();
    assert_eq!(s.tick_scheduled(h, 10.0), 0);
}

#[test]
fn set_play_clamps_position() {
    let mut s = PlaybackSession::new(play());
    s.set_scene_index(2);
    s.play();
    let smaller = PlayBuilder::new("small")
        .scene(SceneBuilder::new("only").step(TimingGroupBuilder::new(100.0)))
        .build()
        .unwrap();
    s.set_play(smaller);
    assert_eq!(s.state(), PlaybackState::Stopped);
    assert_eq!(at(&s), (0, 1, 0.0));
    assert_eq!(s.document().scenes.len(), 1);

    s.set_play(Play::default());
    assert_eq!(at(&s), (0, 1, 0.0));
    assert!(!s.play());
}

#[test]
fn active_step_uses_fallback_for_zero_duration() {
    let mut s = PlaybackSession::new(play());
    s.set_scene_index(2);
    assert_eq!(s.active_step_ms(), 1000.0);
    s.set_scene_index(1);
    assert_eq!(s.active_step_ms(), 500.0);
}

#[test]
fn position_maps_onto_the_timeline() {
    let p = play();
    let tl = build_timeline(&p, 500.0);
    let mut s = PlaybackSession::new(p);
    assert_eq!(s.position_ms(&tl), Some(0.0));
    s.play();
    s.tick(350.0);
    assert_eq!(s.position_ms(&tl), Some(350.0));
    s.tick(450.0);
    // Scene 1 starts after 700ms of steps and a 500ms transition.
    assert_eq!(s.position_ms(&tl), Some(1300.0));
}

#[test]
fn status_serializes_for_hosts() {
    let mut s = PlaybackSession::new(play());
    s.set_loop(true);
    let json = serde_json::to_value(s.status()).unwrap();
    assert_eq!(json["state"], "stopped");
    assert_eq!(json["loop"], true);
    assert_eq!(json["sceneIndex"], 0);
    assert_eq!(PlaybackState::Playing.name(), "playing");
}

#[test]
fn try_play_errors_without_scenes() {
    let mut s = PlaybackSession::new(Play::default());
    assert!(matches!(s.try_play(), Err(CourtError::Playback(_))));
    let mut s = PlaybackSession::new(play());
    s.try_play().unwrap();
    assert!(s.is_playing());
}

fn single_step(duration_ms: f64) -> Play {
    PlayBuilder::new("tiny")
        .scene(SceneBuilder::new("only").step(TimingGroupBuilder::new(duration_ms)))
        .build()
        .unwrap()
}

#[test]
fn looping_over_sub_millisecond_steps_returns() {
    let mut s = PlaybackSession::new(single_step(1e-300));
    s.set_loop(true);
    s.play();
    assert_eq!(s.tick(16.0), usize::MAX);
    assert!(s.is_playing());
    assert_eq!((s.scene_index(), s.step()), (0, 1));
    assert!(s.accumulator_ms() < 1e-300);

    s.tick(16.0);
    assert!(s.accumulator_ms() < 1e-300);
}

#[test]
fn huge_speed_while_looping_returns() {
    let mut s = PlaybackSession::new(play());
    s.set_loop(true);
    s.set_speed(1e300);
    s.play();
    s.tick(16.0);
    assert!(s.is_playing());
    assert!(s.accumulator_ms() < s.active_step_ms());

    // Overflowing virtual time saturates instead of poisoning the accumulator.
    s.set_speed(f64::MAX);
    s.tick(1e10);
    assert!(s.accumulator_ms().is_finite());
    assert!(s.accumulator_ms() < s.active_step_ms());
}

#[test]
fn huge_speed_without_loop_stops_at_the_end() {
    let mut s = PlaybackSession::new(play());
    s.set_speed(1e300);
    s.play();
    assert_eq!(s.tick(16.0), 4);
    assert_eq!(s.state(), PlaybackState::Stopped);
    assert_eq!(at(&s), (2, 1, 0.0));
}

#[test]
fn many_cycles_in_one_tick_match_split_ticks() {
    // One cycle is 300 + 400 + 500 + 1000 = 2200ms over four steps.
    let mut whole = PlaybackSession::new(play());
    whole.set_loop(true);
    let mut split = whole.clone();
    whole.play();
    split.play();

    let crossed = whole.tick(2200.0 * 1e9 + 350.0);
    assert_eq!(crossed, 4_000_000_001);
    assert_eq!(at(&whole), (0, 2, 50.0));

    let first = split.tick(1100.0 * 1e9 + 175.0);
    let second = split.tick(1100.0 * 1e9 + 175.0);
    assert_eq!(first + second, crossed);
    assert_eq!(whole.status(), split.status());
}
