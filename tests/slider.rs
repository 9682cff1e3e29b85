//! Host-side integration tests: drive the navigation engine through the same
//! event sequences the DOM shell would deliver and check the observable
//! state and effects.

use pretty_assertions::assert_eq;

use slider_wasm::config::{Direction, SliderConfig};
use slider_wasm::engine::{Effect, SliderEngine};
use slider_wasm::transform::Geometry;

fn build(n: usize, tweak: impl FnOnce(&mut SliderConfig)) -> SliderEngine {
    let mut config = SliderConfig::default();
    config.autoplay = false;
    tweak(&mut config);
    if config.infinite {
        config.loop_ = false;
    }
    let mut engine = SliderEngine::new(config, n);
    engine.set_geometry(Geometry::new(300.0, 300.0));
    engine
}

/// Step and settle through the completion event, like a healthy browser.
fn step(engine: &mut SliderEngine, fx: Vec<Effect>) {
    if fx.iter().any(|e| matches!(e, Effect::ArmSettleFallback { .. })) {
        engine.transition_ended();
    }
}

fn contains_autoplay_start(fx: &[Effect]) -> bool {
    fx.iter().any(|e| matches!(e, Effect::StartAutoplay { .. }))
}

#[test]
fn initial_index_is_a_real_slide() {
    let finite = build(4, |_| {});
    assert_eq!(finite.current_index(), 0);
    assert!(!finite.deck().record(0).unwrap().is_clone);

    let infinite = build(4, |c| c.infinite = true);
    assert_eq!(infinite.current_index(), 1);
    assert!(!infinite.deck().record(1).unwrap().is_clone);
    assert_eq!(infinite.deck().len(), 6);
}

#[test]
fn next_then_prev_round_trips() {
    let mut e = build(5, |c| c.loop_ = false);
    for _ in 0..3 {
        let fx = e.next();
        step(&mut e, fx);
    }
    assert_eq!(e.current_index(), 3);
    for _ in 0..3 {
        let fx = e.prev();
        step(&mut e, fx);
    }
    assert_eq!(e.current_index(), 0);
}

#[test]
fn go_to_current_settles_back_to_idle() {
    let mut e = build(4, |_| {});
    let before = e.current_index();
    let fx = e.go_to(before);
    assert!(!fx.is_empty());
    assert!(e.is_transitioning());
    // same-position transforms produce no transitionend; only the fallback
    // timer can settle this one
    assert!(!e.settle_timeout().is_empty());
    assert!(!e.is_transitioning());
    assert_eq!(e.current_index(), before);
}

#[test]
fn finite_without_loop_hard_stops_at_both_ends() {
    let mut e = build(3, |c| c.loop_ = false);
    assert!(e.prev().is_empty());
    assert_eq!(e.current_index(), 0);

    let fx = e.next();
    step(&mut e, fx);
    let fx = e.next();
    step(&mut e, fx);
    assert_eq!(e.current_index(), 2);
    assert!(e.next().is_empty());
    assert_eq!(e.current_index(), 2);
}

#[test]
fn three_slide_clamp_scenario() {
    let mut e = build(3, |c| c.loop_ = false);
    let fx = e.next();
    step(&mut e, fx);
    let fx = e.next();
    step(&mut e, fx);
    assert_eq!(e.current_index(), 2);
    assert!(e.next().is_empty());
    assert_eq!(e.current_index(), 2);
    let fx = e.go_to_user_index(0);
    step(&mut e, fx);
    assert_eq!(e.current_index(), 0);
}

#[test]
fn forward_wrap_uses_a_transient_clone() {
    let mut e = build(3, |c| c.loop_ = true);
    let fx = e.go_to(2);
    step(&mut e, fx);

    let fx = e.next();
    assert!(fx.contains(&Effect::AppendTransientClone { source_real: 0 }));
    assert_eq!(e.deck().len(), 4);
    assert!(e.deck().has_transient());

    let fx = e.transition_ended();
    assert!(fx.contains(&Effect::RemoveTransientClone));
    assert!(fx.contains(&Effect::SetTransform {
        x: 0.0,
        animate: false
    }));
    assert_eq!(e.current_index(), 0);
    assert_eq!(e.deck().len(), 3);
    assert!(!e.deck().has_transient());
}

#[test]
fn backward_loop_jumps_without_animation() {
    let mut e = build(3, |c| c.loop_ = true);
    let fx = e.prev();
    assert!(!fx
        .iter()
        .any(|f| matches!(f, Effect::ArmSettleFallback { .. })));
    assert!(fx.contains(&Effect::SetTransform {
        x: -600.0,
        animate: false
    }));
    assert_eq!(e.current_index(), 2);
    assert!(!e.is_transitioning());
}

#[test]
fn infinite_next_past_last_real_corrects_to_first() {
    let mut e = build(3, |c| c.infinite = true);
    // dom layout: [clone2, 0, 1, 2, clone0]; walk to the last real slide
    for _ in 0..2 {
        let fx = e.next();
        step(&mut e, fx);
    }
    assert_eq!(e.current_index(), 3);

    let fx = e.next();
    assert!(!fx.is_empty());
    let fx = e.transition_ended();
    assert!(fx.contains(&Effect::SetTransform {
        x: -300.0,
        animate: false
    }));
    assert_eq!(e.current_index(), 1);
}

#[test]
fn infinite_prev_past_first_real_corrects_to_last() {
    let mut e = build(3, |c| c.infinite = true);
    let fx = e.prev();
    assert!(!fx.is_empty());
    e.transition_ended();
    assert_eq!(e.current_index(), 3);
}

#[test]
fn rtl_user_index_resolves_matching_real_slide() {
    let mut e = build(5, |c| {
        c.direction = Direction::Rtl;
        c.loop_ = false;
    });
    let fx = e.go_to_user_index(2);
    let settle_fx = e.transition_ended();
    assert!(!fx.is_empty());
    let shown = e.deck().record(e.current_index()).unwrap();
    assert_eq!(shown.real_index, 2);
    // highlight is inverted back, so dot 2 lights up for real slide 2
    assert!(settle_fx.contains(&Effect::SetActiveDot { slot: Some(2) }));
}

#[test]
fn autoplay_start_tick_and_period() {
    let mut e = build(3, |c| {
        c.autoplay = true;
        c.delay = 100; // floored to 200
        c.speed = 300;
    });
    let fx = e.start();
    assert!(fx.contains(&Effect::StartAutoplay { period_ms: 500 }));

    let fx = e.autoplay_tick();
    assert!(!fx.is_empty());
    // a second tick while the transition is still in flight is dropped
    assert!(e.autoplay_tick().is_empty());
    e.transition_ended();
    assert_eq!(e.current_index(), 1);
}

#[test]
fn rtl_autoplay_advances_in_reading_direction() {
    let mut e = build(3, |c| {
        c.autoplay = true;
        c.infinite = true;
        c.direction = Direction::Rtl;
    });
    e.start();
    let fx = e.autoplay_tick();
    assert!(!fx.is_empty());
    e.transition_ended();
    // reading direction under rtl is a prev step: the head-clone landing
    // snaps to the last real slide
    assert_eq!(e.current_index(), 3);
}

#[test]
fn hover_pause_is_not_sticky_but_manual_pause_is() {
    let mut e = build(3, |c| c.autoplay = true);
    e.start();
    assert!(e.snapshot().playing);

    assert_eq!(e.hover_enter(), vec![Effect::StopAutoplay]);
    assert!(!e.snapshot().playing);
    assert!(contains_autoplay_start(&e.hover_leave()));

    e.pause();
    assert!(e.hover_enter().is_empty());
    assert!(e.hover_leave().is_empty(), "manual pause survives hover");
    assert!(contains_autoplay_start(&e.play()));
}

#[test]
fn drag_below_threshold_snaps_back() {
    let mut e = build(4, |c| c.loop_ = false);
    e.pointer_down(200.0);
    let fx = e.pointer_move(220.0);
    assert!(fx.contains(&Effect::SetTransform {
        x: 20.0,
        animate: false
    }));
    // threshold for 300px slides is 45px; 20px is a snap-back
    let fx = e.pointer_up(220.0);
    assert!(fx.iter().any(|f| matches!(
        f,
        Effect::SetTransform { animate: true, .. }
    )));
    e.transition_ended();
    assert_eq!(e.current_index(), 0);
}

#[test]
fn drag_past_threshold_commits_a_step() {
    let mut e = build(4, |c| c.loop_ = false);
    e.pointer_down(200.0);
    let fx = e.pointer_up(140.0); // 60px leftwards: next
    assert!(!fx.is_empty());
    e.transition_ended();
    assert_eq!(e.current_index(), 1);

    e.pointer_down(200.0);
    e.pointer_up(260.0); // 60px rightwards: prev
    e.transition_ended();
    assert_eq!(e.current_index(), 0);
}

#[test]
fn drag_at_hard_boundary_snaps_back() {
    let mut e = build(3, |c| c.loop_ = false);
    e.pointer_down(200.0);
    let fx = e.pointer_up(300.0); // prev at index 0 is a no-op
    assert!(fx.iter().any(|f| matches!(
        f,
        Effect::SetTransform { animate: true, .. }
    )));
    e.settle_timeout();
    assert_eq!(e.current_index(), 0);
}

#[test]
fn drag_release_restarts_autoplay_unless_manually_paused() {
    let mut e = build(3, |c| c.autoplay = true);
    e.start();
    let fx = e.pointer_down(100.0);
    assert!(fx.contains(&Effect::StopAutoplay));
    assert!(contains_autoplay_start(&e.pointer_up(100.0)));
    e.settle_timeout();

    e.pause();
    e.pointer_down(100.0);
    assert!(!contains_autoplay_start(&e.pointer_up(100.0)));
}

#[test]
fn resize_reapplies_transform_without_moving() {
    let mut e = build(4, |c| c.loop_ = false);
    let fx = e.next();
    step(&mut e, fx);
    assert_eq!(e.current_index(), 1);

    let fx = e.set_geometry(Geometry::new(250.0, 250.0));
    assert_eq!(
        fx,
        vec![Effect::SetTransform {
            x: -250.0,
            animate: false
        }]
    );
    assert_eq!(e.current_index(), 1);
}

#[test]
fn snapshot_reports_the_working_set() {
    let mut e = build(4, |c| c.infinite = true);
    let fx = e.next();
    step(&mut e, fx);
    let snap = e.snapshot();
    assert_eq!(snap.real_count, 4);
    assert_eq!(snap.working_count, 6);
    assert_eq!(snap.current_index, 2);
    assert!(!snap.playing);
    assert!(snap.infinite);
    assert_eq!(snap.direction, Direction::Ltr);
}
