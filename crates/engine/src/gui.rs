//! Dialog view bookkeeping.
//!
//! At most one dialog view is active at a time; activating a view hides the
//! previous one. View ids come from [`GuiViewManager::add_view`] and an id
//! that was never handed out is a programming error.

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
struct GuiView {
    name: String,
    active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GuiViewManager {
    views: Vec<GuiView>,
    active: Option<ViewId>,
}

impl GuiViewManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_view(&mut self, name: impl Into<String>) -> ViewId {
        self.views.push(GuiView {
            name: name.into(),
            active: false,
        });
        ViewId(self.views.len() - 1)
    }

    fn check(&self, id: ViewId) {
        assert!(
            id.0 < self.views.len(),
            "view id {} out of range ({} views)",
            id.0,
            self.views.len()
        );
    }

    fn view_mut(&mut self, id: ViewId) -> &mut GuiView {
        self.check(id);
        &mut self.views[id.0]
    }

    pub fn activate_view(&mut self, id: ViewId) {
        self.check(id);
        if let Some(prev) = self.active.filter(|&prev| prev != id) {
            self.view_mut(prev).active = false;
        }
        let view = self.view_mut(id);
        view.active = true;
        debug!("view '{}' activated", view.name);
        self.active = Some(id);
    }

    pub fn deactivate_view(&mut self, id: ViewId) {
        let view = self.view_mut(id);
        if !view.active {
            return;
        }
        view.active = false;
        debug!("view '{}' deactivated", view.name);
        if self.active == Some(id) {
            self.active = None;
        }
    }

    pub fn deactivate_all(&mut self) {
        for view in &mut self.views {
            view.active = false;
        }
        self.active = None;
    }

    pub fn active_view(&self) -> Option<ViewId> {
        self.active
    }

    pub fn is_active(&self, id: ViewId) -> bool {
        self.active == Some(id)
    }

    pub fn name(&self, id: ViewId) -> &str {
        self.check(id);
        &self.views[id.0].name
    }

    pub fn find(&self, name: &str) -> Option<ViewId> {
        self.views.iter().position(|v| v.name == name).map(ViewId)
    }
}
