//! Property-based tests for canvas reconciliation and roster folding
//!
//! Run with: cargo test --test reconcile_props

use crabrtc::canvas::{is_local_target, plan};
use crabrtc::testing::MockEngineProvider;
use crabrtc::{
    CanvasAction, CanvasBinding, CanvasConfig, ClientRole, CropRect, OfflineReason, RenderMode,
    SessionController, SetupMode,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn render_mode() -> impl Strategy<Value = RenderMode> {
    prop_oneof![
        Just(RenderMode::Hidden),
        Just(RenderMode::Fit),
        Just(RenderMode::Fill)
    ]
}

fn setup_mode() -> impl Strategy<Value = SetupMode> {
    prop_oneof![Just(SetupMode::Replace), Just(SetupMode::Add)]
}

fn crop_area() -> impl Strategy<Value = CropRect> {
    (0u8..4, 0u8..4).prop_map(|(x, y)| CropRect::new(x as f32 * 0.25, y as f32 * 0.25, 0.25, 0.25))
}

fn canvas_config() -> impl Strategy<Value = CanvasConfig> {
    (0u32..6, render_mode(), crop_area(), setup_mode()).prop_map(|(target, render, crop, setup)| {
        CanvasConfig::new(target)
            .with_render_mode(render)
            .with_crop_area(crop)
            .with_setup_mode(setup)
    })
}

#[derive(Debug, Clone)]
enum RosterOp {
    Joined(u32),
    Offline(u32),
}

fn roster_op() -> impl Strategy<Value = RosterOp> {
    prop_oneof![
        (1u32..8).prop_map(RosterOp::Joined),
        (1u32..8).prop_map(RosterOp::Offline)
    ]
}

proptest! {
    /// INVARIANT: a plan applied to the old config yields the declared config
    #[test]
    fn plan_converges(applied in canvas_config(), declared in canvas_config(), local in 0u32..6) {
        let mut result = applied;
        for action in plan(&applied, &declared, local) {
            match action {
                CanvasAction::SetRenderMode(m) => result.render_mode = m,
                CanvasAction::SetCropArea(c) => result.crop_area = c,
                CanvasAction::SetSetupMode(m) => result.setup_mode = m,
                CanvasAction::SetTarget(t) => result.target = t,
                _ => {}
            }
        }
        prop_assert_eq!(result, declared);
    }

    /// INVARIANT: exactly one setup call iff the target changed, chosen by local resolution
    #[test]
    fn plan_rebinds_only_on_target_change(applied in canvas_config(), declared in canvas_config(), local in 0u32..6) {
        let actions = plan(&applied, &declared, local);
        let setups: Vec<_> = actions.iter().filter(|a| a.is_setup()).collect();

        if applied.target == declared.target {
            prop_assert!(setups.is_empty());
        } else {
            prop_assert_eq!(setups.len(), 1);
            let expected = if is_local_target(declared.target, local) {
                CanvasAction::SetupLocalVideo
            } else {
                CanvasAction::SetupRemoteVideo
            };
            prop_assert_eq!(actions.last(), Some(&expected));
        }
        prop_assert!(!actions.contains(&CanvasAction::StartPreview));
    }

    /// INVARIANT: a binding's setup count equals 1 + number of target changes
    #[test]
    fn binding_setup_count_tracks_target_changes(
        first in canvas_config(),
        passes in proptest::collection::vec(canvas_config(), 0..20),
    ) {
        let provider = MockEngineProvider::new();
        let session = SessionController::new("app", ClientRole::Broadcaster, provider.clone());
        let mut binding = CanvasBinding::new(&session, first);
        binding.mount().unwrap();

        let mut expected = 1;
        let mut previous = first;
        for config in passes {
            if config.target != previous.target {
                expected += 1;
            }
            binding.update(config).unwrap();
            binding.reconcile().unwrap();
            previous = config;
            prop_assert_eq!(binding.canvas().unwrap().config(), &config);
        }
        prop_assert_eq!(binding.setup_calls(), expected);
        prop_assert_eq!(provider.setup_count(), expected);
    }

    /// INVARIANT: the roster equals the set of still-joined remote uids
    #[test]
    fn roster_matches_model(ops in proptest::collection::vec(roster_op(), 0..40)) {
        let provider = MockEngineProvider::new();
        let session = SessionController::new("app", ClientRole::Audience, provider.clone());
        session.join("room", None, 0, None).unwrap();

        let mut model = BTreeSet::new();
        for op in ops {
            match op {
                RosterOp::Joined(uid) => {
                    provider.fire_remote_joined(uid, 0);
                    model.insert(uid);
                }
                RosterOp::Offline(uid) => {
                    provider.fire_remote_offline(uid, OfflineReason::Quit);
                    model.remove(&uid);
                }
            }
        }
        prop_assert_eq!(session.participants(), model);

        session.leave(None).unwrap();
        prop_assert!(session.participants().is_empty());
    }
}
