//! Field presenter - writes the logic and animation state into scene objects.
//!
//! Visual objects are acquired once, when the presenter is created, and then
//! only repositioned, recolored and shown or hidden. The presenter keeps no
//! game state of its own.

use glam::Vec2;

use crate::anim::{
    BlueprintSlotsFilledAnimation, CollapsingFieldAnimation, FadeEffect,
    FallingPieceScaleAnimation, MenuState, PreviewPiecesAnimation, SlidingMenuAnimation,
    UfoAnimation,
};
use crate::config::GameConfig;
use crate::core::{Field, GameLogic, Piece};
use crate::scene::{Scene, VisualId, VisualKind};
use crate::types::{Rotation, MAX_PIECE_DIM, PREVIEW_COUNT};

const PIECE_BLOCKS: usize = MAX_PIECE_DIM * MAX_PIECE_DIM;

/// Opacity of an empty blueprint slot
pub const SLOT_OPACITY: f32 = 0.35;
pub const GHOST_OPACITY: f32 = 0.3;
/// Vertical distance between preview slots (cells)
pub const PREVIEW_SLOT_HEIGHT: f32 = 4.0;

/// Animations that follow the field
#[derive(Debug, Clone)]
pub struct FieldAnimations {
    pub collapse: CollapsingFieldAnimation,
    pub slots: BlueprintSlotsFilledAnimation,
    pub falling_scale: FallingPieceScaleAnimation,
    pub preview: PreviewPiecesAnimation,
}

impl FieldAnimations {
    pub fn new(field: &Field, config: &GameConfig) -> Self {
        Self {
            collapse: CollapsingFieldAnimation::new(config.collapsing_field),
            slots: BlueprintSlotsFilledAnimation::new(
                field.num_columns(),
                field.num_rows(),
                config.blueprint_slots,
            ),
            falling_scale: FallingPieceScaleAnimation::new(config.falling_piece_scale),
            preview: PreviewPiecesAnimation::new(config.preview_pieces),
        }
    }

    /// Drop every running animation
    pub fn reset(&mut self) {
        self.collapse.go_to_inactive_state();
        self.slots.reset();
        self.falling_scale.reset();
        self.preview.reset();
    }
}

/// Dialog layer drawn on top of the field
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    pub menu: &'a SlidingMenuAnimation,
    pub fade: &'a FadeEffect,
    pub ufo: Option<&'a UfoAnimation>,
}

#[derive(Debug, Clone)]
pub struct FieldPresenter {
    num_columns: usize,
    num_rows: usize,
    blocks: Vec<VisualId>,
    /// One per field cell; `None` where the blueprint has no slot
    slots: Vec<Option<VisualId>>,
    falling: Vec<VisualId>,
    ghost: Vec<VisualId>,
    preview: Vec<Vec<VisualId>>,
    ufo: VisualId,
    menu: VisualId,
    fade: VisualId,
}

fn create_hidden(scene: &mut dyn Scene, kind: VisualKind) -> VisualId {
    let id = scene.create_visual_object(kind);
    scene.set_visible(id, false);
    id
}

fn create_many(scene: &mut dyn Scene, kind: VisualKind, count: usize) -> Vec<VisualId> {
    (0..count).map(|_| create_hidden(scene, kind)).collect()
}

impl FieldPresenter {
    pub fn new(scene: &mut dyn Scene, field: &Field) -> Self {
        let (cols, rows) = (field.num_columns(), field.num_rows());
        let blocks = create_many(scene, VisualKind::FieldBlock, cols * rows);
        let mut slots = Vec::with_capacity(cols * rows);
        for y in 0..rows as i32 {
            for x in 0..cols as i32 {
                slots.push(
                    field
                        .is_blueprint_slot(x, y)
                        .then(|| create_hidden(scene, VisualKind::BlueprintSlot)),
                );
            }
        }
        let falling = create_many(scene, VisualKind::FallingBlock, PIECE_BLOCKS);
        let ghost = create_many(scene, VisualKind::GhostBlock, PIECE_BLOCKS);
        let preview = (0..PREVIEW_COUNT)
            .map(|_| create_many(scene, VisualKind::PreviewBlock, PIECE_BLOCKS))
            .collect();
        let ufo = create_hidden(scene, VisualKind::Ufo);
        let menu = create_hidden(scene, VisualKind::MenuWindow);
        let fade = create_hidden(scene, VisualKind::FadeOverlay);

        Self {
            num_columns: cols,
            num_rows: rows,
            blocks,
            slots,
            falling,
            ghost,
            preview,
            ufo,
            menu,
            fade,
        }
    }

    /// Number of visual objects acquired
    pub fn num_objects(&self) -> usize {
        self.blocks.len()
            + self.slots.iter().flatten().count()
            + self.falling.len()
            + self.ghost.len()
            + self.preview.iter().map(Vec::len).sum::<usize>()
            + 3
    }

    pub fn present(
        &self,
        scene: &mut dyn Scene,
        logic: &GameLogic,
        anims: &FieldAnimations,
        overlay: Overlay<'_>,
    ) {
        self.present_field(scene, logic.field(), &anims.collapse);
        self.present_slots(scene, logic.field(), &anims.slots);
        self.present_falling(scene, logic, &anims.falling_scale);
        self.present_preview(scene, logic, &anims.preview);
        self.present_overlay(scene, overlay);
    }

    fn present_field(&self, scene: &mut dyn Scene, field: &Field, collapse: &CollapsingFieldAnimation) {
        for y in 0..self.num_rows {
            let lift = collapse.row_offset(y);
            for x in 0..self.num_columns {
                let id = self.blocks[y * self.num_columns + x];
                match field.cell(x as i32, y as i32).filter(|c| c.is_full()) {
                    Some(cell) => {
                        scene.set_visible(id, true);
                        scene.set_position(id, Vec2::new(x as f32, y as f32 - lift));
                        scene.set_color(id, cell.color);
                        scene.set_scale(id, 1.0);
                        scene.set_opacity(id, 1.0);
                    }
                    None => scene.set_visible(id, false),
                }
            }
        }
    }

    fn present_slots(
        &self,
        scene: &mut dyn Scene,
        field: &Field,
        slots: &BlueprintSlotsFilledAnimation,
    ) {
        for y in 0..self.num_rows {
            for x in 0..self.num_columns {
                let Some(id) = self.slots[y * self.num_columns + x] else {
                    continue;
                };
                let burst = slots.slot(x, y);
                let (visible, scale, opacity) = if burst.active {
                    (true, burst.scale, burst.opacity)
                } else {
                    (!field.is_full(x as i32, y as i32), 1.0, SLOT_OPACITY)
                };
                scene.set_visible(id, visible);
                if visible {
                    scene.set_position(id, Vec2::new(x as f32, y as f32));
                    scene.set_scale(id, scale);
                    scene.set_opacity(id, opacity);
                }
            }
        }
    }

    fn present_falling(
        &self,
        scene: &mut dyn Scene,
        logic: &GameLogic,
        scale: &FallingPieceScaleAnimation,
    ) {
        let Some(falling) = logic.falling() else {
            hide_all(scene, &self.falling);
            hide_all(scene, &self.ghost);
            return;
        };
        let color = falling.piece().color();
        let cells = falling.cells();
        show_blocks(
            scene,
            &self.falling,
            cells.iter().map(|p| Vec2::new(p.x as f32, p.y as f32)),
            |scene, id| {
                scene.set_color(id, color);
                scene.set_scale(id, scale.scale());
                scene.set_opacity(id, 1.0);
            },
        );

        match logic.ghost_position().filter(|&g| g != falling.position) {
            Some(ghost) => {
                let offsets = falling.piece().cells(falling.rotation);
                show_blocks(
                    scene,
                    &self.ghost,
                    offsets.iter().map(|&(dx, dy)| {
                        Vec2::new((ghost.x + dx) as f32, (ghost.y + dy) as f32)
                    }),
                    |scene, id| {
                        scene.set_color(id, color);
                        scene.set_scale(id, 1.0);
                        scene.set_opacity(id, GHOST_OPACITY);
                    },
                );
            }
            None => hide_all(scene, &self.ghost),
        }
    }

    fn present_preview(&self, scene: &mut dyn Scene, logic: &GameLogic, anim: &PreviewPiecesAnimation) {
        let left = self.num_columns as f32 + 1.0;
        let last = self.preview.len().saturating_sub(1);
        for (slot, ids) in self.preview.iter().enumerate() {
            let Some(&kind) = logic.preview().get(slot) else {
                hide_all(scene, ids);
                continue;
            };
            let piece = Piece::get(kind);
            let mut scale = piece.preview_scale();
            if slot == last {
                scale *= anim.new_piece_scale();
            }
            let top = 1.0 + (slot as f32 + anim.slot_offset()) * PREVIEW_SLOT_HEIGHT;
            let color = piece.color();
            show_blocks(
                scene,
                ids,
                piece.cells(Rotation::North).iter().map(|&(dx, dy)| {
                    Vec2::new(left + dx as f32 * scale, top + dy as f32 * scale)
                }),
                |scene, id| {
                    scene.set_color(id, color);
                    scene.set_scale(id, scale);
                    scene.set_opacity(id, 1.0);
                },
            );
        }
    }

    fn present_overlay(&self, scene: &mut dyn Scene, overlay: Overlay<'_>) {
        let center = Vec2::new(self.num_columns as f32 / 2.0, self.num_rows as f32 / 2.0);

        let fade = overlay.fade.opacity();
        scene.set_visible(self.fade, fade > 0.0);
        scene.set_opacity(self.fade, fade);

        let menu_visible = overlay.menu.state() != MenuState::Inactive;
        scene.set_visible(self.menu, menu_visible);
        if menu_visible {
            scene.set_position(self.menu, center + Vec2::Y * overlay.menu.offset());
            scene.set_opacity(self.menu, 1.0);
        }

        match overlay.ufo.filter(|u| u.is_visible()) {
            Some(ufo) => {
                scene.set_visible(self.ufo, true);
                scene.set_position(self.ufo, ufo.position());
            }
            None => scene.set_visible(self.ufo, false),
        }
    }
}

fn hide_all(scene: &mut dyn Scene, ids: &[VisualId]) {
    for &id in ids {
        scene.set_visible(id, false);
    }
}

/// Place one object per position and hide the rest
fn show_blocks(
    scene: &mut dyn Scene,
    ids: &[VisualId],
    positions: impl Iterator<Item = Vec2>,
    style: impl Fn(&mut dyn Scene, VisualId),
) {
    let mut used = 0;
    for (&id, pos) in ids.iter().zip(positions) {
        scene.set_visible(id, true);
        scene.set_position(id, pos);
        style(scene, id);
        used += 1;
    }
    hide_all(scene, &ids[used..]);
}
