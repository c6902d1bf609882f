use super::config::CanvasConfig;
use super::reconcile::CanvasAction;
use crate::types::{CropRect, RenderMode, SetupMode, Uid};
use std::cell::Cell;
use std::rc::Rc;
use uuid::Uuid;

/// Token for the native view container a canvas renders into.
///
/// Clones refer to the same container; the UI layer embeds it in its view hierarchy.
#[derive(Debug, Clone)]
pub struct PlatformView {
    inner: Rc<ViewState>,
}

#[derive(Debug)]
struct ViewState {
    id: Uuid,
    hidden: Cell<bool>,
}

impl PlatformView {
    /// A fresh container starts hidden until a canvas is attached to it
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ViewState {
                id: Uuid::new_v4(),
                hidden: Cell::new(true),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.hidden.get()
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.inner.hidden.set(hidden);
    }

    /// Whether both tokens name the same container
    pub fn same_view(&self, other: &PlatformView) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for PlatformView {
    fn default() -> Self {
        Self::new()
    }
}

/// The engine's mutable canvas resource, owned by exactly one binding
#[derive(Debug)]
pub struct VideoCanvas {
    id: Uuid,
    view: Option<PlatformView>,
    applied: CanvasConfig,
}

impl VideoCanvas {
    pub(crate) fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            view: None,
            applied: CanvasConfig::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn view(&self) -> Option<&PlatformView> {
        self.view.as_ref()
    }

    /// Values currently applied to the canvas
    pub fn config(&self) -> &CanvasConfig {
        &self.applied
    }

    pub fn target(&self) -> Uid {
        self.applied.target
    }

    pub fn render_mode(&self) -> RenderMode {
        self.applied.render_mode
    }

    pub fn crop_area(&self) -> CropRect {
        self.applied.crop_area
    }

    pub fn setup_mode(&self) -> SetupMode {
        self.applied.setup_mode
    }

    pub(crate) fn attach(&mut self, view: PlatformView) {
        self.view = Some(view);
    }

    /// Apply a field action. Engine actions leave the canvas untouched.
    pub(crate) fn apply(&mut self, action: &CanvasAction) {
        match *action {
            CanvasAction::SetRenderMode(mode) => self.applied.render_mode = mode,
            CanvasAction::SetCropArea(rect) => self.applied.crop_area = rect,
            CanvasAction::SetSetupMode(mode) => self.applied.setup_mode = mode,
            CanvasAction::SetTarget(uid) => self.applied.target = uid,
            CanvasAction::StartPreview
            | CanvasAction::SetupLocalVideo
            | CanvasAction::SetupRemoteVideo => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_ids_are_unique() {
        let a = VideoCanvas::new();
        let b = VideoCanvas::new();
        assert_ne!(a.id(), b.id());
        assert!(a.view().is_none());
    }

    #[test]
    fn test_apply_field_actions() {
        let mut canvas = VideoCanvas::new();
        canvas.apply(&CanvasAction::SetRenderMode(RenderMode::Fit));
        canvas.apply(&CanvasAction::SetTarget(12));
        canvas.apply(&CanvasAction::SetupRemoteVideo);

        assert_eq!(canvas.render_mode(), RenderMode::Fit);
        assert_eq!(canvas.target(), 12);
        assert_eq!(canvas.setup_mode(), SetupMode::Replace);
    }

    #[test]
    fn test_view_clones_share_state() {
        let view = PlatformView::new();
        let embedded = view.clone();
        assert!(embedded.is_hidden());

        view.set_hidden(false);
        assert!(!embedded.is_hidden());
        assert!(view.same_view(&embedded));
        assert!(!view.same_view(&PlatformView::new()));
    }
}
