//! Pure diffing of declared canvas configuration against the applied one
//!
//! The UI layer decides when a render pass happens. Each pass turns the difference
//! between what is declared and what the canvas currently holds into a short list of
//! [`CanvasAction`]s. Presentation changes (render mode, crop, setup mode) are cheap
//! field writes; only a change of target participant rebinds the canvas through the
//! engine.

use super::config::CanvasConfig;
use crate::types::{CropRect, RenderMode, SetupMode, Uid, LOCAL_UID};
use serde::{Deserialize, Serialize};

/// One step required to bring a canvas in line with its declared configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CanvasAction {
    SetRenderMode(RenderMode),
    SetCropArea(CropRect),
    SetSetupMode(SetupMode),
    SetTarget(Uid),
    StartPreview,
    SetupLocalVideo,
    SetupRemoteVideo,
}

impl CanvasAction {
    /// Whether the action calls into the engine rather than writing a canvas field
    pub fn is_engine_call(&self) -> bool {
        matches!(
            self,
            CanvasAction::StartPreview
                | CanvasAction::SetupLocalVideo
                | CanvasAction::SetupRemoteVideo
        )
    }

    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            CanvasAction::SetupLocalVideo | CanvasAction::SetupRemoteVideo
        )
    }
}

/// Whether `target` designates the local camera.
///
/// The sentinel always does. Once the session has an assigned local uid, that uid
/// does too, so a canvas declared with the real local id still takes the local path.
pub fn is_local_target(target: Uid, local_uid: Uid) -> bool {
    target == LOCAL_UID || (local_uid != LOCAL_UID && target == local_uid)
}

/// Actions for the first render of a canvas: every field, then the setup call
pub fn mount_plan(declared: &CanvasConfig, local_uid: Uid) -> Vec<CanvasAction> {
    let mut actions = vec![
        CanvasAction::SetRenderMode(declared.render_mode),
        CanvasAction::SetCropArea(declared.crop_area),
        CanvasAction::SetSetupMode(declared.setup_mode),
        CanvasAction::SetTarget(declared.target),
    ];
    if is_local_target(declared.target, local_uid) {
        actions.push(CanvasAction::StartPreview);
        actions.push(CanvasAction::SetupLocalVideo);
    } else {
        actions.push(CanvasAction::SetupRemoteVideo);
    }
    actions
}

/// Actions for a later render pass. Empty when nothing changed.
pub fn plan(applied: &CanvasConfig, declared: &CanvasConfig, local_uid: Uid) -> Vec<CanvasAction> {
    let mut actions = Vec::new();
    if applied == declared {
        return actions;
    }

    if applied.render_mode != declared.render_mode {
        actions.push(CanvasAction::SetRenderMode(declared.render_mode));
    }
    if applied.crop_area != declared.crop_area {
        actions.push(CanvasAction::SetCropArea(declared.crop_area));
    }
    if applied.setup_mode != declared.setup_mode {
        actions.push(CanvasAction::SetSetupMode(declared.setup_mode));
    }
    // Target goes last so the setup call sees every other field already applied
    if applied.target != declared.target {
        actions.push(CanvasAction::SetTarget(declared.target));
        if is_local_target(declared.target, local_uid) {
            actions.push(CanvasAction::SetupLocalVideo);
        } else {
            actions.push(CanvasAction::SetupRemoteVideo);
        }
    }
    actions
}
