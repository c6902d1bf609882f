use crate::canvas::VideoCanvas;
use crate::engine::{EngineDelegate, EngineProvider, RtcEngine};
use crate::types::{ChannelStats, ClientRole, OfflineReason, StatsCallback, Uid};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// One engine entry point invocation
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    EnableVideo,
    SetClientRole(ClientRole),
    JoinChannel {
        token: Option<String>,
        channel: String,
        info: Option<String>,
        uid: Uid,
    },
    LeaveChannel,
    StartPreview,
    StopPreview,
    SetupLocalVideo { canvas: Uuid, target: Uid },
    SetupRemoteVideo { canvas: Uuid, target: Uid },
    Destroy,
}

impl EngineCall {
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            EngineCall::SetupLocalVideo { .. } | EngineCall::SetupRemoteVideo { .. }
        )
    }
}

/// A call tagged with the engine instance (1-based) that received it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub instance: u64,
    pub call: EngineCall,
}

#[derive(Default)]
struct Shared {
    calls: RefCell<Vec<RecordedCall>>,
    created: Cell<u64>,
    delegate: RefCell<Option<Weak<dyn EngineDelegate>>>,
    leave_stats: RefCell<ChannelStats>,
}

/// Creates [`MockEngine`]s and fires delegate callbacks on their behalf.
///
/// Clones share the same call log, so a test can keep one clone while the
/// session owns another.
#[derive(Clone, Default)]
pub struct MockEngineProvider {
    shared: Rc<Shared>,
}

impl MockEngineProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics handed to the callback passed to `leave_channel`
    pub fn with_leave_stats(self, stats: ChannelStats) -> Self {
        *self.shared.leave_stats.borrow_mut() = stats;
        self
    }

    pub fn engines_created(&self) -> u64 {
        self.shared.created.get()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.shared.calls.borrow().clone()
    }

    /// Calls received by one engine instance
    pub fn calls_for(&self, instance: u64) -> Vec<EngineCall> {
        self.shared
            .calls
            .borrow()
            .iter()
            .filter(|c| c.instance == instance)
            .map(|c| c.call.clone())
            .collect()
    }

    /// Number of setup-local/setup-remote calls across all instances
    pub fn setup_count(&self) -> usize {
        self.shared
            .calls
            .borrow()
            .iter()
            .filter(|c| c.call.is_setup())
            .count()
    }

    pub fn clear_calls(&self) {
        self.shared.calls.borrow_mut().clear();
    }

    /// Deliver a join-success callback. Returns false if the delegate is gone.
    pub fn fire_join_success(&self, channel: &str, uid: Uid, elapsed_ms: u64) -> bool {
        self.with_delegate(|d| d.on_join_success(channel, uid, elapsed_ms))
    }

    pub fn fire_remote_joined(&self, uid: Uid, elapsed_ms: u64) -> bool {
        self.with_delegate(|d| d.on_remote_joined(uid, elapsed_ms))
    }

    pub fn fire_remote_offline(&self, uid: Uid, reason: OfflineReason) -> bool {
        self.with_delegate(|d| d.on_remote_offline(uid, reason))
    }

    fn with_delegate(&self, f: impl FnOnce(&dyn EngineDelegate)) -> bool {
        let delegate = self.shared.delegate.borrow().as_ref().and_then(Weak::upgrade);
        match delegate {
            Some(delegate) => {
                f(&*delegate);
                true
            }
            None => {
                log::warn!("Mock engine has no live delegate; callback dropped");
                false
            }
        }
    }
}

impl EngineProvider for MockEngineProvider {
    type Engine = MockEngine;

    fn shared_engine(&self, _app_id: &str, delegate: Weak<dyn EngineDelegate>) -> MockEngine {
        let instance = self.shared.created.get() + 1;
        self.shared.created.set(instance);
        *self.shared.delegate.borrow_mut() = Some(delegate);
        MockEngine {
            instance,
            shared: self.shared.clone(),
        }
    }
}

/// Engine that records every call and does nothing else
pub struct MockEngine {
    instance: u64,
    shared: Rc<Shared>,
}

impl MockEngine {
    pub fn instance(&self) -> u64 {
        self.instance
    }

    fn record(&self, call: EngineCall) {
        self.shared.calls.borrow_mut().push(RecordedCall {
            instance: self.instance,
            call,
        });
    }
}

impl RtcEngine for MockEngine {
    fn enable_video(&self) {
        self.record(EngineCall::EnableVideo);
    }

    fn set_client_role(&self, role: ClientRole) {
        self.record(EngineCall::SetClientRole(role));
    }

    fn join_channel(&self, token: Option<&str>, channel: &str, info: Option<&str>, uid: Uid) {
        self.record(EngineCall::JoinChannel {
            token: token.map(str::to_string),
            channel: channel.to_string(),
            info: info.map(str::to_string),
            uid,
        });
    }

    fn leave_channel(&self, on_stats: Option<StatsCallback>) {
        self.record(EngineCall::LeaveChannel);
        if let Some(on_stats) = on_stats {
            let stats = self.shared.leave_stats.borrow().clone();
            on_stats(stats);
        }
    }

    fn start_preview(&self) {
        self.record(EngineCall::StartPreview);
    }

    fn stop_preview(&self) {
        self.record(EngineCall::StopPreview);
    }

    fn setup_local_video(&self, canvas: &VideoCanvas) {
        self.record(EngineCall::SetupLocalVideo {
            canvas: canvas.id(),
            target: canvas.target(),
        });
    }

    fn setup_remote_video(&self, canvas: &VideoCanvas) {
        self.record(EngineCall::SetupRemoteVideo {
            canvas: canvas.id(),
            target: canvas.target(),
        });
    }

    fn destroy(&self) {
        self.record(EngineCall::Destroy);
    }
}

/// Delegate that ignores every callback
pub struct NullDelegate;

impl EngineDelegate for NullDelegate {
    fn on_join_success(&self, _channel: &str, _uid: Uid, _elapsed_ms: u64) {}
    fn on_remote_joined(&self, _uid: Uid, _elapsed_ms: u64) {}
    fn on_remote_offline(&self, _uid: Uid, _reason: OfflineReason) {}
}
