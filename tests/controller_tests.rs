//! Controller tests - whole frames through the engine seam, down to the
//! terminal scene and game view

use blockfall::core::{builtin_levels, LevelConfig, LevelGoal, LogicState, StarThresholds};
use blockfall::engine::{
    Audio, GameConfig, GameController, GameListener, NullAudio, Sound, VisualKind,
};
use blockfall::term::{GameView, Hud, SceneBuffer, Viewport};
use blockfall::types::{GameAction, PieceKind};

#[derive(Default)]
struct Recorder {
    sounds: Vec<Sound>,
}

impl Audio for Recorder {
    fn play_sound(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }
}

#[derive(Default)]
struct Outcomes {
    completed: Vec<u8>,
    no_moves: u32,
}

impl GameListener for Outcomes {
    fn on_no_moves_left(&mut self) {
        self.no_moves += 1;
    }

    fn on_level_completed(&mut self, num_stars: u8) {
        self.completed.push(num_stars);
    }
}

fn one_row_level() -> LevelConfig {
    LevelConfig {
        index: 0,
        name: "one row".to_owned(),
        num_columns: 6,
        num_rows: 8,
        goal: LevelGoal::ClearRows { rows: 1 },
        pieces: vec![PieceKind::Single],
        seed: 1,
        blueprint: None,
        prefill: vec!["##.###".to_owned()],
        stars: StarThresholds::default(),
        max_moves: None,
    }
}

fn run_frames(
    c: &mut GameController,
    n: usize,
    dt: f32,
    scene: &mut SceneBuffer,
    audio: &mut Recorder,
    listener: &mut Outcomes,
) {
    for _ in 0..n {
        c.frame(dt, scene, audio, listener);
    }
}

#[test]
fn test_row_clear_completes_level_after_collapse() {
    let mut c = GameController::new(&one_row_level(), GameConfig::default()).unwrap();
    c.start();
    let mut scene = SceneBuffer::new();
    let mut audio = Recorder::default();
    let mut outcomes = Outcomes::default();

    assert!(c.apply_action(GameAction::HardDrop));
    assert_eq!(c.logic().state(), LogicState::WaitingForCollapse);

    run_frames(&mut c, 1, 0.016, &mut scene, &mut audio, &mut outcomes);
    // The collapse is still playing; the level is not over yet
    assert_eq!(c.logic().state(), LogicState::WaitingForCollapse);
    assert!(outcomes.completed.is_empty());

    run_frames(&mut c, 60, 0.05, &mut scene, &mut audio, &mut outcomes);
    assert_eq!(c.logic().state(), LogicState::LevelCompleted);
    assert_eq!(outcomes.completed, vec![3]);
    assert!(audio.sounds.contains(&Sound::Land));
    assert!(audio.sounds.contains(&Sound::RowsCleared));
    assert_eq!(audio.sounds.last(), Some(&Sound::LevelCompleted));
    assert!(c.gui().is_active(c.views().level_completed));
    assert_eq!(
        c.animations().collapse.state(),
        blockfall::anim::CollapseState::Inactive
    );
}

#[test]
fn test_move_budget_reports_no_moves_left_once() {
    let mut level = one_row_level();
    level.prefill.clear();
    level.max_moves = Some(1);
    let mut c = GameController::new(&level, GameConfig::default()).unwrap();
    c.start();
    let mut scene = SceneBuffer::new();
    let mut audio = Recorder::default();
    let mut outcomes = Outcomes::default();

    c.apply_action(GameAction::HardDrop);
    run_frames(&mut c, 30, 0.05, &mut scene, &mut audio, &mut outcomes);

    assert_eq!(c.logic().state(), LogicState::NoMovesLeft);
    assert_eq!(outcomes.no_moves, 1);
    assert!(c.gui().is_active(c.views().no_moves_left));
    assert_eq!(
        audio.sounds.iter().filter(|&&s| s == Sound::NoMovesLeft).count(),
        1
    );

    // Restart clears the dialog and plays again
    assert!(c.apply_action(GameAction::Restart));
    assert_eq!(c.gui().active_view(), None);
    assert_eq!(c.logic().state(), LogicState::Playing);
    assert_eq!(c.logic().moves(), 0);
}

#[test]
fn test_suggested_move_lands_one_piece() {
    let mut c = GameController::for_level(0, GameConfig::default()).unwrap();
    c.start();
    assert_eq!(c.play_suggested_move(), Ok(true));
    assert_eq!(c.logic().moves(), 1);
}

#[test]
fn test_pause_freezes_gravity_across_frames() {
    let mut c = GameController::for_level(0, GameConfig::default()).unwrap();
    c.start();
    let mut scene = SceneBuffer::new();
    c.frame(0.2, &mut scene, &mut NullAudio, &mut Outcomes::default());

    assert!(c.apply_action(GameAction::Pause));
    let y = c.logic().falling().map(|f| f.position.y);
    for _ in 0..20 {
        c.frame(0.1, &mut scene, &mut NullAudio, &mut Outcomes::default());
    }
    assert_eq!(c.logic().falling().map(|f| f.position.y), y);
    assert!(c.dialog().is_shown());
    assert_eq!(scene.count_visible(VisualKind::MenuWindow), 1);
    assert_eq!(scene.count_visible(VisualKind::FadeOverlay), 1);
    // Paused pieces shrink to their preview size
    assert!(c.animations().falling_scale.scale() < 1.0);
}

#[test]
fn test_scene_reflects_blueprint_level() {
    let mut c = GameController::for_level(2, GameConfig::default()).unwrap();
    c.start();
    let mut scene = SceneBuffer::new();
    c.frame(0.016, &mut scene, &mut NullAudio, &mut Outcomes::default());

    let field = c.logic().field();
    assert_eq!(
        scene.count_visible(VisualKind::BlueprintSlot),
        field.num_blueprint_slots()
    );
    let falling = c.logic().falling().copied().unwrap();
    assert_eq!(
        scene.count_visible(VisualKind::FallingBlock),
        falling.piece().num_blocks()
    );
    assert_eq!(scene.count_visible(VisualKind::FieldBlock), 0);
    assert!(scene.count_visible(VisualKind::PreviewBlock) > 0);

    // Landing a piece turns falling blocks into field blocks
    let blocks = falling.piece().num_blocks();
    c.apply_action(GameAction::HardDrop);
    c.frame(0.016, &mut scene, &mut NullAudio, &mut Outcomes::default());
    assert_eq!(scene.count_visible(VisualKind::FieldBlock), blocks);
}

#[test]
fn test_game_view_draws_field_and_hud() {
    let mut c = GameController::for_level(0, GameConfig::default()).unwrap();
    c.start();
    let mut scene = SceneBuffer::new();
    c.frame(0.5, &mut scene, &mut NullAudio, &mut Outcomes::default());

    let hud = Hud::from_controller(&c);
    assert_eq!(hud.level_name, "Warm-up");
    assert!(hud.dialog.is_empty());

    let fb = GameView::default().render(&scene, &hud, Viewport::new(80, 24));
    let text: String = fb.cells().iter().map(|cell| cell.ch).collect();
    assert!(text.contains("Warm-up"));
    assert!(text.contains("SCORE"));
    assert!(text.contains('█'));
    assert!(text.contains('┌'));
}

#[test]
fn test_pause_dialog_text_in_hud() {
    let mut c = GameController::for_level(0, GameConfig::default()).unwrap();
    c.start();
    c.apply_action(GameAction::Pause);
    let hud = Hud::from_controller(&c);
    assert_eq!(hud.dialog.first().map(String::as_str), Some("PAUSED"));
}

#[test]
fn test_config_json_overrides_levels() {
    let json = r#"{
        "max_frame_dt": 0.1,
        "levels": [{
            "index": 7,
            "name": "custom",
            "num_columns": 5,
            "num_rows": 6,
            "goal": { "type": "clear_rows", "rows": 1 },
            "pieces": ["O"]
        }]
    }"#;
    let config = GameConfig::from_json_str(json).unwrap();
    assert!(GameController::for_level(0, config.clone()).is_err());

    let mut c = GameController::for_level(7, config).unwrap();
    c.start();
    assert_eq!(c.logic().level().name, "custom");
    assert_eq!(c.logic().field().num_columns(), 5);
    assert_eq!(builtin_levels().len(), 3);
}
