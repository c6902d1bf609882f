use crate::errors::RtcError;
use crate::types::{CropRect, RenderMode, SetupMode, Uid, LOCAL_UID};
use serde::{Deserialize, Serialize};

/// Declared configuration of one video canvas, rebuilt on every render pass
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Participant to render, `LOCAL_UID` for the local camera
    pub target: Uid,
    pub render_mode: RenderMode,
    pub crop_area: CropRect,
    pub setup_mode: SetupMode,
}

impl CanvasConfig {
    pub fn new(target: Uid) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Local camera with default rendering
    pub fn local() -> Self {
        Self::new(LOCAL_UID)
    }

    pub fn remote(uid: Uid) -> Self {
        Self::new(uid)
    }

    pub fn with_target(mut self, target: Uid) -> Self {
        self.target = target;
        self
    }

    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    pub fn with_crop_area(mut self, crop_area: CropRect) -> Self {
        self.crop_area = crop_area;
        self
    }

    pub fn with_setup_mode(mut self, setup_mode: SetupMode) -> Self {
        self.setup_mode = setup_mode;
        self
    }

    /// Reject values the engine cannot apply. A crop outside the unit square (or NaN)
    /// would also never compare equal to itself and re-apply on every pass.
    pub fn validate(&self) -> Result<(), RtcError> {
        if !self.crop_area.is_normalized() {
            return Err(RtcError::InvalidConfig(format!(
                "Crop area {:?} must lie inside the unit square with positive size",
                self.crop_area
            )));
        }
        Ok(())
    }

    /// True when both configs render the same participant
    pub fn same_target(&self, other: &CanvasConfig) -> bool {
        self.target == other.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = CanvasConfig::remote(7)
            .with_render_mode(RenderMode::Fit)
            .with_crop_area(CropRect::new(0.0, 0.0, 0.5, 0.5))
            .with_setup_mode(SetupMode::Add);

        assert_eq!(config.target, 7);
        assert_eq!(config.render_mode, RenderMode::Fit);
        assert_eq!(config.crop_area.width, 0.5);
        assert_eq!(config.setup_mode, SetupMode::Add);
        assert!(!config.same_target(&CanvasConfig::local()));
    }

    #[test]
    fn test_validate_rejects_bad_crop() {
        assert!(CanvasConfig::local().validate().is_ok());
        let nan = CanvasConfig::local().with_crop_area(CropRect::new(f32::NAN, 0.0, 0.5, 0.5));
        assert!(matches!(nan.validate(), Err(RtcError::InvalidConfig(_))));
        let outside = CanvasConfig::local().with_crop_area(CropRect::new(0.5, 0.0, 0.75, 1.0));
        assert!(outside.validate().is_err());
    }

    #[test]
    fn test_local_defaults() {
        let config = CanvasConfig::local();
        assert_eq!(config.target, LOCAL_UID);
        assert_eq!(config, CanvasConfig::default());
    }
}
