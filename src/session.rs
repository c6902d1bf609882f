//! Session controller
//!
//! Owns the engine instance and the observable session state, and folds engine
//! callbacks into that state. Everything runs on the UI thread, so state lives in
//! `Cell`/`RefCell` and the controller is shared through `Rc`.

use crate::canvas::CanvasHost;
use crate::config::RtcConfig;
use crate::engine::{EngineDelegate, EngineHandle, EngineProvider, RtcEngine};
use crate::errors::RtcError;
use crate::observable::Signal;
use crate::types::{ClientRole, OfflineReason, StatsCallback, Uid, LOCAL_UID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};
use tokio::sync::mpsc;

/// State changes emitted by the controller, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    EngineCreated { generation: u64 },
    RoleChanged { role: ClientRole },
    JoinRequested { channel: String, uid: Uid },
    Joined { channel: String, uid: Uid, elapsed_ms: u64 },
    RemoteJoined { uid: Uid, elapsed_ms: u64 },
    RemoteLeft { uid: Uid, reason: OfflineReason },
    Left { generation: u64 },
}

/// Serializable view of the session for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub app_id: String,
    pub role: ClientRole,
    pub local_user_id: Uid,
    pub participants: Vec<Uid>,
    pub channel: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
    pub engine_generation: u64,
    pub engine_active: bool,
}

pub struct SessionController<P: EngineProvider + 'static> {
    app_id: String,
    provider: P,
    self_ref: Weak<Self>,
    engine: RefCell<Option<Rc<EngineHandle<P::Engine>>>>,
    generation: Cell<u64>,
    role: Signal<ClientRole>,
    local_user_id: Signal<Uid>,
    participants: Signal<BTreeSet<Uid>>,
    channel: RefCell<Option<String>>,
    joined_at: Cell<Option<DateTime<Utc>>>,
    event_sender: RefCell<Option<mpsc::UnboundedSender<SessionEvent>>>,
}

impl<P: EngineProvider + 'static> SessionController<P> {
    /// Create a controller. No engine exists until it is first needed.
    pub fn new(app_id: impl Into<String>, role: ClientRole, provider: P) -> Rc<Self> {
        let app_id = app_id.into();
        log::info!("Creating session controller for app {} as {}", app_id, role.as_str());

        Rc::new_cyclic(|self_ref| Self {
            app_id,
            provider,
            self_ref: self_ref.clone(),
            engine: RefCell::new(None),
            generation: Cell::new(0),
            role: Signal::new(role),
            local_user_id: Signal::new(LOCAL_UID),
            participants: Signal::default(),
            channel: RefCell::new(None),
            joined_at: Cell::new(None),
            event_sender: RefCell::new(None),
        })
    }

    /// Create a controller from the `[session]` section of a config
    pub fn from_config(config: &RtcConfig, provider: P) -> Result<Rc<Self>, RtcError> {
        config.validate()?;
        if config.session.app_id.trim().is_empty() {
            return Err(RtcError::InvalidConfig(
                "session.app_id must be set to create a session".to_string(),
            ));
        }
        Ok(Self::new(
            config.session.app_id.clone(),
            config.session.default_role,
            provider,
        ))
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn role(&self) -> ClientRole {
        self.role.get()
    }

    pub fn local_user_id(&self) -> Uid {
        self.local_user_id.get()
    }

    /// Participants currently in the channel
    pub fn participants(&self) -> BTreeSet<Uid> {
        self.participants.get()
    }

    pub fn role_signal(&self) -> &Signal<ClientRole> {
        &self.role
    }

    pub fn local_user_id_signal(&self) -> &Signal<Uid> {
        &self.local_user_id
    }

    pub fn participants_signal(&self) -> &Signal<BTreeSet<Uid>> {
        &self.participants
    }

    /// Channel passed to the last `join`, until `leave`
    pub fn current_channel(&self) -> Option<String> {
        self.channel.borrow().clone()
    }

    /// The engine, created on first access and again after every `leave`
    pub fn engine(&self) -> Rc<EngineHandle<P::Engine>> {
        self.acquire_engine().0
    }

    pub fn has_engine(&self) -> bool {
        self.engine.borrow().is_some()
    }

    /// Set the role and pass it to the engine. The engine decides whether the
    /// transition is legal.
    pub fn set_role(&self, role: ClientRole) -> Result<(), RtcError> {
        if self.role.set(role) {
            log::info!("Client role set to {}", role.as_str());
            self.sync_local_membership(role);
            self.emit(SessionEvent::RoleChanged { role });
        }

        let (handle, created) = self.acquire_engine();
        if !created {
            handle.live()?.set_client_role(role);
        }
        Ok(())
    }

    /// Ask the engine to join `channel`. Completion arrives via `on_join_success`.
    ///
    /// `token` may be `None` only for testing projects. A `uid` of 0 lets the engine
    /// assign one. `info` is reserved by the engine and passed through untouched.
    pub fn join(
        &self,
        channel: &str,
        token: Option<&str>,
        uid: Uid,
        info: Option<&str>,
    ) -> Result<(), RtcError> {
        let handle = self.engine();
        let engine = handle.live()?;

        if token.is_none() {
            log::warn!("Joining channel {} without a token", channel);
        }
        log::info!("Joining channel {} as uid {}", channel, uid);

        *self.channel.borrow_mut() = Some(channel.to_string());
        self.emit(SessionEvent::JoinRequested {
            channel: channel.to_string(),
            uid,
        });
        engine.join_channel(token, channel, info, uid);
        Ok(())
    }

    /// Leave the channel, stop the preview, destroy the engine and clear the roster.
    ///
    /// Any join still in flight is aborted by the engine's own teardown. The next
    /// engine access creates a fresh instance.
    pub fn leave(&self, on_stats: Option<StatsCallback>) -> Result<(), RtcError> {
        let handle = self.engine.borrow_mut().take();
        match handle {
            Some(handle) => {
                let generation = handle.generation();
                log::info!("Leaving channel and destroying engine generation {}", generation);
                if let Ok(engine) = handle.live() {
                    engine.leave_channel(on_stats);
                    engine.stop_preview();
                }
                handle.destroy();
                self.emit(SessionEvent::Left { generation });
            }
            None => {
                log::warn!("Leave requested with no engine; clearing session state only");
            }
        }

        self.participants.update(|set| set.clear());
        self.local_user_id.set(LOCAL_UID);
        *self.channel.borrow_mut() = None;
        self.joined_at.set(None);
        Ok(())
    }

    /// Start queueing events for a new receiver.
    ///
    /// Events are only queued while a receiver is alive. Taking a new receiver
    /// closes the previous one; dropping it stops queueing.
    pub fn take_event_receiver(&self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.event_sender.borrow_mut() = Some(tx);
        rx
    }

    /// True while a receiver taken from [`take_event_receiver`](Self::take_event_receiver) is alive
    pub fn has_event_receiver(&self) -> bool {
        self.event_sender
            .borrow()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            app_id: self.app_id.clone(),
            role: self.role(),
            local_user_id: self.local_user_id(),
            participants: self.participants.with(|set| set.iter().copied().collect()),
            channel: self.current_channel(),
            joined_at: self.joined_at.get(),
            engine_generation: self.generation.get(),
            engine_active: self.has_engine(),
        }
    }

    fn acquire_engine(&self) -> (Rc<EngineHandle<P::Engine>>, bool) {
        if let Some(handle) = self.engine.borrow().as_ref() {
            return (handle.clone(), false);
        }

        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let delegate: Weak<dyn EngineDelegate> = self.self_ref.clone();
        let engine = self.provider.shared_engine(&self.app_id, delegate);
        engine.enable_video();
        engine.set_client_role(self.role.get());
        log::info!("Created engine generation {} for app {}", generation, self.app_id);

        let handle = Rc::new(EngineHandle::new(engine, generation));
        *self.engine.borrow_mut() = Some(handle.clone());
        self.emit(SessionEvent::EngineCreated { generation });
        (handle, true)
    }

    /// A broadcaster with an assigned uid is part of its own roster
    fn sync_local_membership(&self, role: ClientRole) {
        let uid = self.local_user_id.get();
        if uid == LOCAL_UID {
            return;
        }
        self.participants.update(|set| match role {
            ClientRole::Broadcaster => {
                set.insert(uid);
            }
            ClientRole::Audience => {
                set.remove(&uid);
            }
        });
    }

    fn emit(&self, event: SessionEvent) {
        let mut sender = self.event_sender.borrow_mut();
        let Some(tx) = sender.as_ref() else {
            return;
        };
        if tx.send(event).is_err() {
            log::debug!("Event receiver dropped; no longer queueing session events");
            *sender = None;
        }
    }
}

impl<P: EngineProvider + 'static> EngineDelegate for SessionController<P> {
    fn on_join_success(&self, channel: &str, uid: Uid, elapsed_ms: u64) {
        log::info!("Joined channel {} as uid {} after {}ms", channel, uid, elapsed_ms);
        self.local_user_id.set(uid);
        self.joined_at.set(Some(Utc::now()));
        *self.channel.borrow_mut() = Some(channel.to_string());

        if self.role.get() == ClientRole::Broadcaster {
            self.participants.update(|set| {
                set.insert(uid);
            });
        }
        self.emit(SessionEvent::Joined {
            channel: channel.to_string(),
            uid,
            elapsed_ms,
        });
    }

    fn on_remote_joined(&self, uid: Uid, elapsed_ms: u64) {
        log::debug!("Remote uid {} joined after {}ms", uid, elapsed_ms);
        self.participants.update(|set| {
            set.insert(uid);
        });
        self.emit(SessionEvent::RemoteJoined { uid, elapsed_ms });
    }

    fn on_remote_offline(&self, uid: Uid, reason: OfflineReason) {
        log::debug!("Remote uid {} went offline: {:?}", uid, reason);
        self.participants.update(|set| {
            set.remove(&uid);
        });
        self.emit(SessionEvent::RemoteLeft { uid, reason });
    }
}

impl<P: EngineProvider + 'static> CanvasHost for SessionController<P> {
    type Engine = P::Engine;

    fn engine(&self) -> Rc<EngineHandle<P::Engine>> {
        SessionController::engine(self)
    }

    fn local_user_id(&self) -> Uid {
        SessionController::local_user_id(self)
    }
}

impl<P: EngineProvider + 'static> Drop for SessionController<P> {
    fn drop(&mut self) {
        if let Some(handle) = self.engine.get_mut().take() {
            log::info!("Destroying engine generation {} with its session", handle.generation());
            handle.destroy();
        }
    }
}
