//! GameView: draws a recorded scene plus a text HUD into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use glam::Vec2;

use crate::core::{stars_for_moves, LevelGoal, LogicState};
use crate::engine::{GameController, VisualKind};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::scene::{SceneBuffer, VisualObject};
use crate::types::MAX_PIECE_DIM;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Text shown next to the field
#[derive(Debug, Clone, PartialEq)]
pub struct Hud<'a> {
    pub level_name: &'a str,
    pub num_columns: usize,
    pub num_rows: usize,
    pub score: u32,
    pub moves: u32,
    pub max_moves: Option<u32>,
    pub rows_cleared: u32,
    pub goal: LevelGoal,
    /// Matching cells and slot count of the blueprint
    pub blueprint: (usize, usize),
    pub state: LogicState,
    /// Lines of the dialog window, if one is up
    pub dialog: Vec<String>,
}

impl<'a> Hud<'a> {
    pub fn from_controller(controller: &'a GameController) -> Self {
        let logic = controller.logic();
        let level = logic.level();
        let field = logic.field();

        let mut dialog = Vec::new();
        if controller.tutorial().is_some_and(|t| t.is_blocking()) {
            dialog.push("Welcome aboard!".to_owned());
            dialog.push("Fill rows to clear them.".to_owned());
            dialog.push("[Enter] continue".to_owned());
        } else if let Some(view) = controller.gui().active_view() {
            let views = controller.views();
            if view == views.pause {
                dialog.push("PAUSED".to_owned());
                dialog.push("[P] resume".to_owned());
            } else if view == views.level_completed {
                let stars = stars_for_moves(logic.moves(), &level.stars) as usize;
                dialog.push("LEVEL COMPLETE".to_owned());
                dialog.push(format!("{}{}", "*".repeat(stars), ".".repeat(3 - stars.min(3))));
                dialog.push("[R] replay  [Q] quit".to_owned());
            } else if view == views.no_moves_left {
                dialog.push("NO MOVES LEFT".to_owned());
                dialog.push("[R] retry  [Q] quit".to_owned());
            }
        }

        Self {
            level_name: &level.name,
            num_columns: field.num_columns(),
            num_rows: field.num_rows(),
            score: logic.score(),
            moves: logic.moves(),
            max_moves: level.max_moves,
            rows_cleared: logic.rows_cleared(),
            goal: level.goal,
            blueprint: (field.count_cells_matching_blueprint(), field.num_blueprint_slots()),
            state: logic.state(),
            dialog,
        }
    }
}

const FIELD_BG: Rgb = Rgb::new(30, 30, 40);

/// A lightweight terminal renderer for the puzzle field.
pub struct GameView {
    /// Field cell width in terminal columns.
    cell_w: u16,
    /// Field cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Top left of the field interior, in terminal cells
#[derive(Debug, Clone, Copy)]
struct Origin {
    x: i32,
    y: i32,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w,
            cell_h,
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, scene: &SceneBuffer, hud: &Hud<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let field_w = hud.num_columns as u16 * self.cell_w;
        let field_h = hud.num_rows as u16 * self.cell_h;
        let frame_w = field_w + 2;
        let frame_h = field_h + 2;
        let preview_w = (MAX_PIECE_DIM as u16 + 1) * self.cell_w;

        let start_x = viewport.width.saturating_sub(frame_w + preview_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        let origin = Origin {
            x: start_x as i32 + 1,
            y: start_y as i32 + 1,
        };

        let bg = CellStyle {
            fg: Rgb::new(90, 90, 100),
            bg: FIELD_BG,
            bold: false,
            dim: true,
        };
        fb.fill_rect(start_x + 1, start_y + 1, field_w, field_h, ' ', bg);
        for y in 0..hud.num_rows {
            for x in 0..hud.num_columns {
                self.fill_cell(fb, origin, Vec2::new(x as f32, y as f32), '·', bg);
            }
        }
        let border = CellStyle::default();
        draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for slot in scene.visible(VisualKind::BlueprintSlot) {
            self.draw_block(fb, origin, slot, '░');
        }
        for block in scene.visible(VisualKind::FieldBlock) {
            self.draw_block(fb, origin, block, '█');
        }
        for block in scene.visible(VisualKind::GhostBlock) {
            self.draw_block(fb, origin, block, '▒');
        }
        for block in scene.visible(VisualKind::FallingBlock) {
            self.draw_block(fb, origin, block, '█');
        }
        for block in scene.visible(VisualKind::PreviewBlock) {
            self.draw_block(fb, origin, block, '█');
        }

        let panel_x = start_x.saturating_add(frame_w + preview_w).saturating_add(1);
        self.draw_side_panel(fb, hud, viewport, panel_x, start_y);

        if let Some(fade) = scene.visible(VisualKind::FadeOverlay).next() {
            fb.dim_all(fade.opacity);
        }
        if let Some(menu) = scene.visible(VisualKind::MenuWindow).next() {
            self.draw_window(fb, origin, menu.position, &hud.dialog);
        }
        if let Some(ufo) = scene.visible(VisualKind::Ufo).next() {
            let style = CellStyle {
                fg: Rgb::new(160, 255, 160),
                bold: true,
                ..CellStyle::default()
            };
            if let Some((x, y)) = self.to_screen(origin, ufo.position) {
                fb.put_str(x, y, "<=o=>", style);
            }
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, scene: &SceneBuffer, hud: &Hud<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(scene, hud, viewport, &mut fb);
        fb
    }

    fn to_screen(&self, origin: Origin, pos: Vec2) -> Option<(u16, u16)> {
        let x = origin.x + (pos.x * self.cell_w as f32).round() as i32;
        let y = origin.y + (pos.y * self.cell_h as f32).round() as i32;
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        Some((x, y))
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, origin: Origin, pos: Vec2, ch: char, style: CellStyle) {
        if let Some((x, y)) = self.to_screen(origin, pos) {
            fb.fill_rect(x, y, self.cell_w, self.cell_h, ch, style);
        }
    }

    fn draw_block(&self, fb: &mut FrameBuffer, origin: Origin, object: &VisualObject, ch: char) {
        let color = Rgb::from(object.color);
        let style = CellStyle {
            fg: FIELD_BG.blend(color, object.opacity),
            bg: FIELD_BG,
            bold: object.opacity >= 1.0,
            dim: false,
        };
        // Small blocks (scaled previews, growing slots) get a smaller glyph
        let ch = if object.scale < 0.75 { '▪' } else { ch };
        self.fill_cell(fb, origin, object.position, ch, style);
    }

    fn draw_window(&self, fb: &mut FrameBuffer, origin: Origin, center: Vec2, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        let inner_w = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 2;
        let w = inner_w + 2;
        let h = lines.len() as u16 + 2;
        let Some((cx, cy)) = self.to_screen(origin, center) else {
            return;
        };
        let x = cx.saturating_sub(w / 2);
        let y = cy.saturating_sub(h / 2);
        if y >= fb.height() {
            return;
        }

        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(20, 20, 60),
            bold: true,
            dim: false,
        };
        fb.fill_rect(x, y, w, h, ' ', style);
        draw_border(fb, x, y, w, h, style);
        for (i, line) in lines.iter().enumerate() {
            let lx = x + 1 + (inner_w - line.chars().count() as u16) / 2;
            fb.put_str(lx, y + 1 + i as u16, line, style);
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, hud: &Hud<'_>, viewport: Viewport, panel_x: u16, start_y: u16) {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }
        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle {
            fg: Rgb::new(200, 200, 200),
            ..CellStyle::default()
        };

        let mut y = start_y;
        fb.put_str(panel_x, y, hud.level_name, label);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, hud.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "MOVES", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, hud.moves, value);
        if let Some(max) = hud.max_moves {
            let w = digits(hud.moves);
            fb.put_char(panel_x + w, y, '/', value);
            fb.put_u32(panel_x + w + 1, y, max, value);
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "GOAL", label);
        y = y.saturating_add(1);
        match hud.goal {
            LevelGoal::ClearRows { rows } => {
                fb.put_str(panel_x, y, "rows", value);
                fb.put_u32(panel_x + 5, y, hud.rows_cleared.min(rows), value);
                let w = digits(hud.rows_cleared.min(rows));
                fb.put_char(panel_x + 5 + w, y, '/', value);
                fb.put_u32(panel_x + 6 + w, y, rows, value);
            }
            LevelGoal::Blueprint => {
                let (matched, total) = hud.blueprint;
                fb.put_str(panel_x, y, "slots", value);
                fb.put_u32(panel_x + 6, y, matched as u32, value);
                let w = digits(matched as u32);
                fb.put_char(panel_x + 6 + w, y, '/', value);
                fb.put_u32(panel_x + 7 + w, y, total as u32, value);
            }
        }
        y = y.saturating_add(2);

        let state = match hud.state {
            LogicState::Idle => "READY",
            LogicState::Playing | LogicState::WaitingForCollapse => "PLAYING",
            LogicState::Paused => "PAUSED",
            LogicState::LevelCompleted => "COMPLETE",
            LogicState::NoMovesLeft => "NO MOVES",
        };
        fb.put_str(panel_x, y, state, value);
        y = y.saturating_add(2);

        let dim = CellStyle { dim: true, ..value };
        for help in ["arrows move", "up/z rotate", "space drop", "t hint", "p pause"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, help, dim);
            y = y.saturating_add(1);
        }
    }
}

fn digits(value: u32) -> u16 {
    let mut n = value;
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}
