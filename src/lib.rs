//! CrabRTC: declarative video canvases and observable session state for real-time video engines
//!
//! This crate sits between a UI layer and an external real-time engine. It does not
//! move media itself; it keeps engine canvases in sync with what the UI declares and
//! turns engine callbacks into an observable participant roster.
//!
//! # Features
//! - Lazy engine lifecycle with teardown and re-creation on leave
//! - Observable role, local uid and participant set
//! - Render-pass reconciliation that only rebinds a canvas when its target changes
//! - TOML configuration for session and canvas defaults
//! - A recording mock engine for tests
//!
//! # Usage
//! ```rust,ignore
//! use crabrtc::{CanvasBinding, CanvasConfig, ClientRole, SessionController};
//!
//! let session = SessionController::new("my-app-id", ClientRole::Broadcaster, provider);
//! session.join("room1", Some(token), 0, None)?;
//!
//! let mut local = CanvasBinding::new(&session, CanvasConfig::local());
//! let view = local.mount()?;
//! // on every render pass
//! local.update(CanvasConfig::local().with_render_mode(RenderMode::Fit))?;
//! ```
pub mod canvas;
pub mod config;
pub mod engine;
pub mod errors;
pub mod observable;
pub mod session;
pub mod types;

// Testing utilities - mock engine for offline testing
pub mod testing;

// Re-exports for convenience
pub use canvas::{CanvasAction, CanvasBinding, CanvasConfig, CanvasHost, PlatformView, VideoCanvas};
pub use config::RtcConfig;
pub use engine::{EngineDelegate, EngineHandle, EngineProvider, RtcEngine};
pub use errors::RtcError;
pub use observable::{Signal, SubscriptionId};
pub use session::{SessionController, SessionEvent, SessionSnapshot};
pub use types::{
    ChannelStats, ClientRole, CropRect, OfflineReason, RenderMode, SetupMode, StatsCallback, Uid,
    LOCAL_UID,
};

/// Initialize logging for the adapter
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "crabrtc=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_crate_info() {
        let info = get_info();
        assert_eq!(info.name, "crabrtc");
        assert!(!info.version.is_empty());
        assert!(!info.description.is_empty());
    }

    #[test]
    fn test_init_logging_is_repeatable() {
        init_logging();
        init_logging();
    }
}
