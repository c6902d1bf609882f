use super::config::CanvasConfig;
use super::handle::{PlatformView, VideoCanvas};
use super::reconcile::{self, CanvasAction};
use super::CanvasHost;
use crate::engine::RtcEngine;
use crate::errors::RtcError;
use crate::types::{Uid, LOCAL_UID};
use std::rc::{Rc, Weak};

/// Declarative wrapper owning one [`VideoCanvas`] for its whole mounted lifetime.
///
/// The UI layer calls [`mount`](Self::mount) once, then [`update`](Self::update) or
/// [`reconcile`](Self::reconcile) on every render pass. Passes that change nothing
/// issue no engine calls.
pub struct CanvasBinding<H: CanvasHost> {
    host: Weak<H>,
    declared: CanvasConfig,
    canvas: Option<VideoCanvas>,
    setup_calls: usize,
}

impl<H: CanvasHost> CanvasBinding<H> {
    /// The binding keeps only a weak reference to the session host
    pub fn new(host: &Rc<H>, config: CanvasConfig) -> Self {
        Self {
            host: Rc::downgrade(host),
            declared: config,
            canvas: None,
            setup_calls: 0,
        }
    }

    /// Declare the configuration for the next render pass
    pub fn declare(&mut self, config: CanvasConfig) {
        self.declared = config;
    }

    pub fn declared(&self) -> &CanvasConfig {
        &self.declared
    }

    pub fn is_mounted(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn canvas(&self) -> Option<&VideoCanvas> {
        self.canvas.as_ref()
    }

    /// Number of setup-local/setup-remote calls issued since mount
    pub fn setup_calls(&self) -> usize {
        self.setup_calls
    }

    /// Create the canvas, attach a fresh view, apply the declared config and bind it.
    ///
    /// Returns the view for embedding. A failed mount leaves the binding unmounted.
    pub fn mount(&mut self) -> Result<PlatformView, RtcError> {
        if self.canvas.is_some() {
            return Err(RtcError::AlreadyMounted);
        }
        self.declared.validate()?;
        let host = self.host()?;

        let view = PlatformView::new();
        let mut canvas = VideoCanvas::new();
        canvas.attach(view.clone());

        let local_uid = host.local_user_id();
        let actions = reconcile::mount_plan(&self.declared, local_uid);
        view.set_hidden(false);
        let setups = execute(&*host, &mut canvas, &actions)?;

        log::info!(
            "Mounted canvas {} for uid {} (local uid {})",
            canvas.id(),
            canvas.target(),
            local_uid
        );
        warn_if_unassigned(&canvas, local_uid);

        self.setup_calls += setups;
        self.canvas = Some(canvas);
        Ok(view)
    }

    /// Bring the canvas in line with the declared config, returning what was done
    pub fn reconcile(&mut self) -> Result<Vec<CanvasAction>, RtcError> {
        let canvas = self.canvas.as_mut().ok_or(RtcError::NotMounted)?;
        if *canvas.config() == self.declared {
            return Ok(Vec::new());
        }
        self.declared.validate()?;

        let host = self.host.upgrade().ok_or(RtcError::HostDropped)?;
        let local_uid = host.local_user_id();
        let actions = reconcile::plan(canvas.config(), &self.declared, local_uid);
        let setups = execute(&*host, canvas, &actions)?;
        log::debug!("Reconciled canvas {}: {:?}", canvas.id(), actions);
        if setups > 0 {
            warn_if_unassigned(canvas, local_uid);
        }

        self.setup_calls += setups;
        Ok(actions)
    }

    /// Declare `config` and reconcile in one step
    pub fn update(&mut self, config: CanvasConfig) -> Result<Vec<CanvasAction>, RtcError> {
        self.declare(config);
        self.reconcile()
    }

    /// Release the canvas handle and its view
    pub fn unmount(mut self) -> Option<VideoCanvas> {
        let canvas = self.canvas.take();
        if let Some(canvas) = &canvas {
            if let Some(view) = canvas.view() {
                view.set_hidden(true);
            }
            log::info!("Unmounted canvas {}", canvas.id());
        }
        canvas
    }

    fn host(&self) -> Result<Rc<H>, RtcError> {
        self.host.upgrade().ok_or(RtcError::HostDropped)
    }
}

fn warn_if_unassigned(canvas: &VideoCanvas, local_uid: Uid) {
    if canvas.target() == LOCAL_UID && local_uid == LOCAL_UID {
        log::warn!(
            "Canvas {} bound to the local camera before a local uid was assigned",
            canvas.id()
        );
    }
}

/// Apply `actions` in order. The engine is resolved and checked before anything is
/// written so a destroyed engine leaves the canvas untouched.
fn execute<H: CanvasHost>(
    host: &H,
    canvas: &mut VideoCanvas,
    actions: &[CanvasAction],
) -> Result<usize, RtcError> {
    let handle = if actions.iter().any(CanvasAction::is_engine_call) {
        let handle = host.engine();
        handle.live()?;
        Some(handle)
    } else {
        None
    };

    let mut setups = 0;
    for action in actions {
        canvas.apply(action);
        let Some(handle) = handle.as_ref() else {
            continue;
        };
        let engine = handle.live()?;
        match action {
            CanvasAction::StartPreview => engine.start_preview(),
            CanvasAction::SetupLocalVideo => {
                engine.setup_local_video(canvas);
                setups += 1;
            }
            CanvasAction::SetupRemoteVideo => {
                engine.setup_remote_video(canvas);
                setups += 1;
            }
            _ => {}
        }
    }
    Ok(setups)
}
