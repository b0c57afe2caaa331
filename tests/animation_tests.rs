//! Animation tests - state machine sequences as the engine drives them

use blockfall::anim::{
    BlueprintSlotsConfig, BlueprintSlotsFilledAnimation, CollapseState, CollapsingFieldAnimation,
    FadeEffect, FadeState, FallingPieceScaleAnimation, MenuState, PreviewPiecesAnimation,
    PreviewState, ScaleState, SlidingMenuAnimation, SlotAnimation, SlotsState, StateMachine,
    UfoAnimation, UfoState,
};
use blockfall::core::RowSet;
use proptest::prelude::*;

fn rows(list: &[usize]) -> RowSet {
    list.iter().copied().collect()
}

// ============== Collapsing Field ==============

#[test]
fn test_collapse_starts_inactive_and_stays_inactive() {
    let mut anim = CollapsingFieldAnimation::default();
    assert_eq!(anim.state(), CollapseState::Inactive);
    for _ in 0..10 {
        assert_eq!(anim.update(0.1), CollapseState::Inactive);
    }
    assert!(!anim.is_collapse_done());
    assert_eq!(anim.row_offset(3), 0.0);
}

#[test]
fn test_collapse_full_sequence() {
    let mut anim = CollapsingFieldAnimation::default();
    anim.start(rows(&[9]), 10);
    assert_eq!(anim.state(), CollapseState::Waiting);
    // Every surviving row is drawn one row up until the fall
    assert_eq!(anim.row_offset(5), 1.0);

    let mut steps = 0;
    while !anim.is_collapse_done() {
        anim.update(0.02);
        steps += 1;
        assert!(steps < 200, "collapse never finished");
    }
    assert_eq!(anim.state(), CollapseState::Active);
    assert_eq!(anim.row_offset(5), 0.0);

    anim.go_to_blocks_bouncing_state();
    assert_eq!(anim.state(), CollapseState::BlocksBouncing);
    while !anim.is_settled() {
        anim.update(0.02);
    }
    anim.go_to_inactive_state();
    assert_eq!(anim.state(), CollapseState::Inactive);
}

#[test]
fn test_rows_above_gap_drop_by_removed_count() {
    let mut anim = CollapsingFieldAnimation::default();
    // Rows 6 and 8 removed from a 10 row field
    anim.start(rows(&[6, 8]), 10);
    assert_eq!(anim.row_offset(9), 0.0);
    // Old row 7 lands on row 8 and drops one row
    assert_eq!(anim.row_offset(8), 1.0);
    // Old rows 0..=5 land two rows lower
    assert_eq!(anim.row_offset(7), 2.0);
    assert_eq!(anim.row_offset(2), 2.0);
}

// ============== Blueprint Slots ==============

#[test]
fn test_slot_burst_grows_and_fades() {
    let mut anim = BlueprintSlotsFilledAnimation::new(4, 4, BlueprintSlotsConfig::default());
    anim.start_slot(1, 3);
    assert_eq!(anim.state(), SlotsState::Animating);

    anim.update(0.1);
    let slot = *anim.slot(1, 3);
    assert!(slot.active);
    assert!(slot.scale > 1.0);
    assert!(slot.opacity < 1.0);
    assert!(!anim.slot(0, 0).active);
}

#[test]
#[should_panic]
fn test_slot_out_of_range_panics() {
    let anim = BlueprintSlotsFilledAnimation::new(4, 4, BlueprintSlotsConfig::default());
    let _ = anim.slot(4, 0);
}

proptest! {
    #[test]
    fn slot_decays_to_default(steps in prop::collection::vec(0.001f32..0.1, 1..40)) {
        let config = BlueprintSlotsConfig::default();
        let mut anim = BlueprintSlotsFilledAnimation::new(6, 6, config);
        anim.start_slot(2, 5);

        let mut total = 0.0;
        for dt in steps.iter().copied().cycle() {
            anim.update(dt);
            total += dt;
            prop_assert!(anim.slot(2, 5).opacity >= 0.0);
            if total > config.duration + 0.01 {
                break;
            }
        }
        prop_assert_eq!(*anim.slot(2, 5), SlotAnimation::default());
        prop_assert_eq!(anim.state(), SlotsState::Inactive);
    }
}

// ============== Falling Piece / Preview ==============

#[test]
fn test_falling_piece_scales_up_to_full_size() {
    let mut anim = FallingPieceScaleAnimation::default();
    anim.start_scaling_up(0.6);
    assert!((anim.scale() - 0.6).abs() < 1e-6);
    for _ in 0..50 {
        anim.update(0.05);
    }
    assert_eq!(anim.state(), ScaleState::Inactive);
    assert_eq!(anim.scale(), 1.0);

    anim.start_scaling_down(0.5);
    for _ in 0..50 {
        anim.update(0.05);
    }
    assert_eq!(anim.scale(), 0.5);
}

#[test]
fn test_preview_slide_settles() {
    let mut anim = PreviewPiecesAnimation::default();
    assert_eq!(anim.slot_offset(), 0.0);
    anim.start_sliding();
    assert_eq!(anim.state(), PreviewState::Sliding);
    assert!((anim.slot_offset() - 1.0).abs() < 1e-6);
    assert_eq!(anim.new_piece_scale(), 0.0);
    for _ in 0..50 {
        anim.update(0.05);
    }
    assert_eq!(anim.state(), PreviewState::Inactive);
    assert_eq!(anim.new_piece_scale(), 1.0);
}

// ============== Overlays ==============

#[test]
fn test_menu_and_fade_open_and_close_together() {
    let mut menu = SlidingMenuAnimation::default();
    let mut fade = FadeEffect::default();
    menu.start_sliding_in();
    fade.start_fade_in();
    for _ in 0..20 {
        menu.update(0.05);
        fade.update(0.05);
    }
    assert_eq!(menu.state(), MenuState::Shown);
    assert!(menu.is_shown());
    assert_eq!(menu.offset(), 0.0);
    assert_eq!(fade.state(), FadeState::Covered);

    menu.start_sliding_out();
    fade.start_fade_out();
    for _ in 0..20 {
        menu.update(0.05);
        fade.update(0.05);
    }
    assert_eq!(menu.state(), MenuState::Inactive);
    assert_eq!(fade.opacity(), 0.0);
}

#[test]
fn test_ufo_flies_in_hovers_and_leaves() {
    let mut ufo = UfoAnimation::default();
    assert!(!ufo.is_visible());
    ufo.start_flying_in();
    for _ in 0..30 {
        ufo.update(0.05);
    }
    assert_eq!(ufo.state(), UfoState::Hovering);
    ufo.start_flying_away();
    assert_eq!(ufo.state(), UfoState::FlyingAway);
    for _ in 0..30 {
        ufo.update(0.05);
    }
    assert_eq!(ufo.state(), UfoState::Inactive);
}

// ============== StateMachine ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Light {
    Off,
    On,
}

#[test]
fn test_state_machine_timeout_carries_overshoot() {
    let mut fsm = StateMachine::new("light", Light::Off).with_timeout(Light::On, 1.0, Light::Off);
    fsm.go_to(Light::On);
    assert_eq!(fsm.update(0.4), Light::On);
    assert!((fsm.progress(1.0) - 0.4).abs() < 1e-6);
    assert_eq!(fsm.update(0.8), Light::Off);
    assert!((fsm.elapsed() - 0.2).abs() < 1e-5);
}
