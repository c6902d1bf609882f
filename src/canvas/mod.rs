//! Declarative video canvas bindings
//!
//! A [`CanvasBinding`] owns one engine canvas and keeps it in sync with the
//! configuration the UI declares on each render pass.

pub mod binding;
pub mod config;
pub mod handle;
pub mod reconcile;

pub use binding::CanvasBinding;
pub use config::CanvasConfig;
pub use handle::{PlatformView, VideoCanvas};
pub use reconcile::{is_local_target, mount_plan, plan, CanvasAction};

use crate::engine::{EngineHandle, RtcEngine};
use crate::types::Uid;
use std::rc::Rc;

/// What a canvas needs from the session: the engine and the local participant id
pub trait CanvasHost {
    type Engine: RtcEngine;

    /// The current engine, created on demand
    fn engine(&self) -> Rc<EngineHandle<Self::Engine>>;

    /// Assigned local uid, or `LOCAL_UID` before the first successful join
    fn local_user_id(&self) -> Uid;
}
