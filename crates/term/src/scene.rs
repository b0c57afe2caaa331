//! SceneBuffer: a [`Scene`] that records visual objects for the game view.
//!
//! The terminal has no scene graph; objects live in a flat table indexed by
//! their [`VisualId`] and the game view reads them back when drawing.

use glam::Vec2;

use crate::engine::{Scene, VisualId, VisualKind};
use crate::types::BlockColor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualObject {
    pub kind: VisualKind,
    pub visible: bool,
    pub position: Vec2,
    pub scale: f32,
    pub opacity: f32,
    pub color: BlockColor,
}

impl VisualObject {
    fn new(kind: VisualKind) -> Self {
        Self {
            kind,
            visible: true,
            position: Vec2::ZERO,
            scale: 1.0,
            opacity: 1.0,
            color: BlockColor::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneBuffer {
    objects: Vec<VisualObject>,
}

impl SceneBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: VisualId) -> Option<&VisualObject> {
        self.objects.get(id.0 as usize)
    }

    pub fn objects(&self) -> &[VisualObject] {
        &self.objects
    }

    /// Visible objects of one kind, in creation order
    pub fn visible(&self, kind: VisualKind) -> impl Iterator<Item = &VisualObject> + '_ {
        self.objects
            .iter()
            .filter(move |o| o.visible && o.kind == kind)
    }

    pub fn count_visible(&self, kind: VisualKind) -> usize {
        self.visible(kind).count()
    }

    fn object_mut(&mut self, id: VisualId) -> &mut VisualObject {
        let len = self.objects.len();
        match self.objects.get_mut(id.0 as usize) {
            Some(object) => object,
            None => panic!("visual object {} out of range ({} objects)", id.0, len),
        }
    }
}

impl Scene for SceneBuffer {
    fn create_visual_object(&mut self, kind: VisualKind) -> VisualId {
        self.objects.push(VisualObject::new(kind));
        VisualId((self.objects.len() - 1) as u32)
    }

    fn set_visible(&mut self, id: VisualId, visible: bool) {
        self.object_mut(id).visible = visible;
    }

    fn set_position(&mut self, id: VisualId, position: Vec2) {
        self.object_mut(id).position = position;
    }

    fn set_scale(&mut self, id: VisualId, scale: f32) {
        self.object_mut(id).scale = scale;
    }

    fn set_opacity(&mut self, id: VisualId, opacity: f32) {
        self.object_mut(id).opacity = opacity;
    }

    fn set_color(&mut self, id: VisualId, color: BlockColor) {
        self.object_mut(id).color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_object_state() {
        let mut scene = SceneBuffer::new();
        let a = scene.create_visual_object(VisualKind::FieldBlock);
        let b = scene.create_visual_object(VisualKind::Ufo);
        scene.set_position(a, Vec2::new(2.0, 3.0));
        scene.set_color(a, BlockColor::Red);
        scene.set_visible(b, false);

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(a).map(|o| o.position), Some(Vec2::new(2.0, 3.0)));
        assert_eq!(scene.count_visible(VisualKind::FieldBlock), 1);
        assert_eq!(scene.count_visible(VisualKind::Ufo), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn unknown_id_panics() {
        let mut scene = SceneBuffer::new();
        scene.set_visible(VisualId(4), true);
    }
}
