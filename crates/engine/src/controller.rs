//! Frame driver - one level of play with its animations and dialogs.
//!
//! Every frame runs in a fixed order:
//!
//! 1. clamp `dt` to `max_frame_dt`
//! 2. advance the tutorial, or the game logic when no tutorial is blocking
//! 3. route logic events to animations, audio and the listener
//! 4. advance the animations
//! 5. hand a finished collapse back to the logic, route what that produced
//! 6. present
//!
//! The logic never waits on wall-clock time for the collapse: it sits in
//! `WaitingForCollapse` until step 5 sees the collapse animation done.

use log::{debug, info, warn};
use thiserror::Error;

use crate::anim::{CollapseState, FadeEffect, SlidingMenuAnimation};
use crate::config::{ConfigError, GameConfig};
use crate::core::{GameEvent, GameLogic, LevelConfig, LevelError, LogicState, MoveSearch, Piece};
use crate::gui::{GuiViewManager, ViewId};
use crate::place::{apply_move, PlaceError};
use crate::presenter::{FieldAnimations, FieldPresenter, Overlay};
use crate::scene::{Audio, GameListener, Scene, Sound};
use crate::tutorial::TutorialController;
use crate::types::GameAction;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no level with index {0}")]
    UnknownLevel(u32),
}

/// Ids of the dialog views the controller opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogViews {
    pub pause: ViewId,
    pub level_completed: ViewId,
    pub no_moves_left: ViewId,
}

pub struct GameController {
    config: GameConfig,
    logic: GameLogic,
    anims: FieldAnimations,
    dialog: SlidingMenuAnimation,
    fade: FadeEffect,
    gui: GuiViewManager,
    views: DialogViews,
    tutorial: Option<TutorialController>,
    presenter: Option<FieldPresenter>,
    frames: u64,
}

impl GameController {
    pub fn new(level: &LevelConfig, config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let logic = GameLogic::new(level, config.timing)?
            .with_move_search(MoveSearch::new(config.analyzer));
        let anims = FieldAnimations::new(logic.field(), &config);

        let mut gui = GuiViewManager::new();
        let views = DialogViews {
            pause: gui.add_view("pause"),
            level_completed: gui.add_view("level_completed"),
            no_moves_left: gui.add_view("no_moves_left"),
        };
        let tutorial = config
            .show_tutorial
            .then(|| TutorialController::new(config.ufo, config.sliding_menu, config.fade));

        Ok(Self {
            dialog: SlidingMenuAnimation::new(config.sliding_menu),
            fade: FadeEffect::new(config.fade),
            config,
            logic,
            anims,
            gui,
            views,
            tutorial,
            presenter: None,
            frames: 0,
        })
    }

    /// Controller for the level with `index` from the config's level list
    pub fn for_level(index: u32, config: GameConfig) -> Result<Self, EngineError> {
        let level = config
            .find_level(index)
            .ok_or(EngineError::UnknownLevel(index))?;
        Self::new(&level, config)
    }

    /// Spawn the first piece and start the tutorial, if configured
    pub fn start(&mut self) {
        self.logic.start();
        if let Some(tutorial) = self.tutorial.as_mut() {
            tutorial.start();
        }
    }

    pub fn logic(&self) -> &GameLogic {
        &self.logic
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn animations(&self) -> &FieldAnimations {
        &self.anims
    }

    pub fn dialog(&self) -> &SlidingMenuAnimation {
        &self.dialog
    }

    pub fn fade(&self) -> &FadeEffect {
        &self.fade
    }

    pub fn gui(&self) -> &GuiViewManager {
        &self.gui
    }

    pub fn views(&self) -> DialogViews {
        self.views
    }

    pub fn tutorial(&self) -> Option<&TutorialController> {
        self.tutorial.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn tutorial_blocking(&self) -> bool {
        self.tutorial.as_ref().is_some_and(|t| t.is_blocking())
    }

    /// Apply a player action; returns whether it changed anything
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if self.tutorial_blocking() {
            debug!("{:?} ignored while the tutorial runs", action);
            return false;
        }
        match action {
            GameAction::Restart => {
                self.restart();
                true
            }
            GameAction::Pause => {
                if !self.logic.apply_action(GameAction::Pause) {
                    return false;
                }
                if self.logic.state() == LogicState::Paused {
                    self.open_dialog(self.views.pause);
                    if let Some(f) = self.logic.falling() {
                        self.anims
                            .falling_scale
                            .start_scaling_down(f.piece().preview_scale());
                    }
                } else {
                    self.close_dialog();
                    let from = self.anims.falling_scale.scale();
                    self.anims.falling_scale.start_scaling_up(from);
                }
                true
            }
            _ => self.logic.apply_action(action),
        }
    }

    pub fn set_soft_drop(&mut self, active: bool) {
        self.logic.set_soft_drop(active);
    }

    /// Play the move search's best landing for the falling piece
    pub fn play_suggested_move(&mut self) -> Result<bool, PlaceError> {
        if self.tutorial_blocking() {
            return Ok(false);
        }
        match self.logic.suggest_move() {
            Some(mv) => apply_move(&mut self.logic, &mv).map(|()| true),
            None => Ok(false),
        }
    }

    /// Close whatever is on top: the tutorial window, the pause dialog or an
    /// outcome dialog
    pub fn dismiss(&mut self) -> bool {
        if let Some(tutorial) = self.tutorial.as_mut().filter(|t| t.is_blocking()) {
            return tutorial.dismiss();
        }
        match self.gui.active_view() {
            Some(view) if view == self.views.pause => self.apply_action(GameAction::Pause),
            Some(_) => {
                self.close_dialog();
                true
            }
            None => false,
        }
    }

    /// Reset the level, the animations and the dialogs
    pub fn restart(&mut self) {
        info!("restarting level {}", self.logic.level().index);
        self.anims.reset();
        if self.gui.active_view().is_some() {
            self.close_dialog();
        }
        self.logic.restart();
        // Spawn events of the fresh level are routed on the next frame
    }

    fn open_dialog(&mut self, view: ViewId) {
        self.gui.activate_view(view);
        self.dialog.start_sliding_in();
        self.fade.start_fade_in();
    }

    fn close_dialog(&mut self) {
        self.gui.deactivate_all();
        self.dialog.start_sliding_out();
        self.fade.start_fade_out();
    }

    /// Run one frame
    pub fn frame(
        &mut self,
        dt: f32,
        scene: &mut dyn Scene,
        audio: &mut dyn Audio,
        listener: &mut dyn GameListener,
    ) {
        // NaN and negative steps collapse to zero
        let dt = dt.max(0.0).min(self.config.max_frame_dt);
        self.frames += 1;

        let blocking = match self.tutorial.as_mut() {
            Some(tutorial) => {
                tutorial.update(dt);
                tutorial.is_blocking()
            }
            None => false,
        };
        if !blocking {
            self.logic.update(dt);
        }
        self.route_events(audio, listener);

        self.update_animations(dt);
        if self.sequence_collapse() {
            self.route_events(audio, listener);
        }

        let presenter = self
            .presenter
            .get_or_insert_with(|| FieldPresenter::new(scene, self.logic.field()));
        let overlay = match self.tutorial.as_ref().filter(|t| t.is_blocking()) {
            Some(tutorial) => Overlay {
                menu: tutorial.window(),
                fade: tutorial.fade(),
                ufo: Some(tutorial.ufo()),
            },
            None => Overlay {
                menu: &self.dialog,
                fade: &self.fade,
                ufo: self.tutorial.as_ref().map(|t| t.ufo()),
            },
        };
        presenter.present(scene, &self.logic, &self.anims, overlay);
    }

    fn route_events(&mut self, audio: &mut dyn Audio, listener: &mut dyn GameListener) {
        for event in self.logic.drain_events() {
            match event {
                GameEvent::PieceSpawned { kind } => {
                    self.anims
                        .falling_scale
                        .start_scaling_up(Piece::get(kind).preview_scale());
                    self.anims.preview.start_sliding();
                }
                GameEvent::PieceMoved => audio.play_sound(Sound::Move),
                GameEvent::PieceRotated { .. } => audio.play_sound(Sound::Rotate),
                GameEvent::PieceLanded { .. } => {
                    self.anims.falling_scale.reset();
                    audio.play_sound(Sound::Land);
                }
                GameEvent::BombExploded { .. } => audio.play_sound(Sound::Explosion),
                GameEvent::SlotsFilled { slots } => {
                    for p in &slots {
                        self.anims.slots.start_slot(p.x as usize, p.y as usize);
                    }
                    audio.play_sound(Sound::SlotFilled);
                }
                GameEvent::RowsCollapsed { rows } => {
                    self.anims.collapse.start(rows, self.logic.field().num_rows());
                    audio.play_sound(Sound::RowsCleared);
                }
                GameEvent::LevelCompleted { num_stars } => {
                    audio.play_sound(Sound::LevelCompleted);
                    self.open_dialog(self.views.level_completed);
                    listener.on_level_completed(num_stars);
                }
                GameEvent::NoMovesLeft => {
                    audio.play_sound(Sound::NoMovesLeft);
                    self.open_dialog(self.views.no_moves_left);
                    listener.on_no_moves_left();
                }
            }
        }
    }

    fn update_animations(&mut self, dt: f32) {
        self.dialog.update(dt);
        self.fade.update(dt);
        self.anims.falling_scale.update(dt);
        // The field freezes with the logic while paused
        if self.logic.state() == LogicState::Paused {
            return;
        }
        self.anims.collapse.update(dt);
        self.anims.slots.update(dt);
        self.anims.preview.update(dt);
    }

    /// Returns `true` when the logic was resumed
    fn sequence_collapse(&mut self) -> bool {
        let collapse = &mut self.anims.collapse;
        if collapse.is_settled() {
            collapse.go_to_inactive_state();
        }
        if self.logic.state() != LogicState::WaitingForCollapse {
            return false;
        }
        match collapse.state() {
            CollapseState::Active if collapse.is_collapse_done() => {
                collapse.go_to_blocks_bouncing_state();
            }
            CollapseState::Inactive => {
                warn!("logic waiting for a collapse that is not animating");
            }
            _ => return false,
        }
        self.logic.finish_collapse()
    }
}
