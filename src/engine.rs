//! Capability boundary toward the external real-time engine
//!
//! Transport, encoding and rendering all live inside the engine. This module only
//! names the entry points the adapter calls and the callbacks it receives back.

use crate::canvas::VideoCanvas;
use crate::errors::RtcError;
use crate::types::{ClientRole, OfflineReason, StatsCallback, Uid};
use std::cell::Cell;
use std::rc::Weak;

/// Entry points consumed from the engine. Every call is fire-and-forget.
pub trait RtcEngine {
    fn enable_video(&self);
    fn set_client_role(&self, role: ClientRole);
    /// `uid` of 0 lets the engine assign one; `info` is reserved and passed through
    fn join_channel(&self, token: Option<&str>, channel: &str, info: Option<&str>, uid: Uid);
    /// The engine invokes `on_stats` with the final channel statistics
    fn leave_channel(&self, on_stats: Option<StatsCallback>);
    fn start_preview(&self);
    fn stop_preview(&self);
    fn setup_local_video(&self, canvas: &VideoCanvas);
    fn setup_remote_video(&self, canvas: &VideoCanvas);
    /// Release the engine. The instance must not be used afterwards.
    fn destroy(&self);
}

/// Callbacks produced by the engine. The engine delivers them on the UI thread.
pub trait EngineDelegate {
    fn on_join_success(&self, channel: &str, uid: Uid, elapsed_ms: u64);
    fn on_remote_joined(&self, uid: Uid, elapsed_ms: u64);
    fn on_remote_offline(&self, uid: Uid, reason: OfflineReason);
}

/// Creates engine instances bound to a delegate
pub trait EngineProvider {
    type Engine: RtcEngine;

    fn shared_engine(&self, app_id: &str, delegate: Weak<dyn EngineDelegate>) -> Self::Engine;
}

/// One engine instance together with its generation and destroyed flag
pub struct EngineHandle<E> {
    engine: E,
    generation: u64,
    destroyed: Cell<bool>,
}

impl<E: RtcEngine> EngineHandle<E> {
    pub(crate) fn new(engine: E, generation: u64) -> Self {
        Self {
            engine,
            generation,
            destroyed: Cell::new(false),
        }
    }

    /// The engine, or an error once this generation has been destroyed
    pub fn live(&self) -> Result<&E, RtcError> {
        if self.destroyed.get() {
            return Err(RtcError::EngineDestroyed {
                generation: self.generation,
            });
        }
        Ok(&self.engine)
    }

    /// Starts at 1 and increases every time the session re-creates its engine
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    pub(crate) fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.engine.destroy();
    }
}

impl<E> std::fmt::Debug for EngineHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("generation", &self.generation)
            .field("destroyed", &self.destroyed.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EngineCall, MockEngineProvider};

    #[test]
    fn test_handle_fails_fast_after_destroy() {
        let provider = MockEngineProvider::new();
        let delegate: Weak<dyn EngineDelegate> = Weak::<crate::testing::NullDelegate>::new();
        let handle = EngineHandle::new(provider.shared_engine("app", delegate), 1);

        assert!(handle.live().is_ok());
        handle.destroy();
        handle.destroy();

        assert!(handle.is_destroyed());
        assert!(matches!(
            handle.live(),
            Err(RtcError::EngineDestroyed { generation: 1 })
        ));
        let destroys = provider
            .calls()
            .iter()
            .filter(|c| c.call == EngineCall::Destroy)
            .count();
        assert_eq!(destroys, 1);
    }
}
