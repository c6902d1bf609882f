use serde::{Deserialize, Serialize};

/// Numeric participant identifier assigned by the engine
pub type Uid = u32;

/// Sentinel target meaning "the local camera", never a remote participant
pub const LOCAL_UID: Uid = 0;

/// Session membership mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientRole {
    /// Receive-only
    #[default]
    Audience,
    /// Send and receive
    Broadcaster,
}

impl ClientRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientRole::Audience => "audience",
            ClientRole::Broadcaster => "broadcaster",
        }
    }
}

/// How the engine scales a video stream into its view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Fill the view, cropping whatever overflows
    #[default]
    Hidden,
    /// Fit the whole frame inside the view, letterboxing as needed
    Fit,
    /// Stretch the frame to the view bounds
    Fill,
}

/// Whether a setup call replaces the views bound to a stream or adds another one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupMode {
    #[default]
    Replace,
    Add,
}

/// Normalized crop rectangle, every bound expressed as a fraction of the source frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    pub const FULL_FRAME: CropRect = CropRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangle has positive size and lies inside the unit square
    pub fn is_normalized(&self) -> bool {
        let unit = 0.0..=1.0;
        unit.contains(&self.x)
            && unit.contains(&self.y)
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= 1.0
            && self.y + self.height <= 1.0
    }

    pub fn is_full_frame(&self) -> bool {
        *self == Self::FULL_FRAME
    }
}

impl Default for CropRect {
    fn default() -> Self {
        Self::FULL_FRAME
    }
}

/// Why a remote participant went offline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineReason {
    /// The participant left on purpose
    Quit,
    /// No packets received for too long
    Dropped,
    /// The participant switched from broadcaster to audience
    BecameAudience,
    Other(u32),
}

impl OfflineReason {
    /// Map the engine's numeric reason code
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => OfflineReason::Quit,
            1 => OfflineReason::Dropped,
            2 => OfflineReason::BecameAudience,
            other => OfflineReason::Other(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            OfflineReason::Quit => 0,
            OfflineReason::Dropped => 1,
            OfflineReason::BecameAudience => 2,
            OfflineReason::Other(code) => *code,
        }
    }
}

/// Final channel statistics reported by the engine when leaving
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    /// Seconds spent in the channel
    pub duration_secs: u32,
    pub tx_bytes: u64,
    pub rx_bytes: u64,
    pub tx_kbitrate: u32,
    pub rx_kbitrate: u32,
    pub user_count: u32,
}

/// Callback receiving the final statistics of a channel
pub type StatsCallback = Box<dyn FnOnce(ChannelStats)>;
