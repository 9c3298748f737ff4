use ar_placement_engine::config::ArConfig;
use ar_placement_engine::engine::scene::OverlayCanvas;
use ar_placement_engine::engine::scheduler::ArSessionDriver;
use ar_placement_engine::engine::render::BevyRenderTarget;
use ar_placement_engine::engine::session::{
    DepthDataFormat, DepthUsage, ReferenceSpaceType, SessionFeature, SessionMode, SessionState,
};
use ar_placement_engine::engine::simulation::SimulatedRuntime;
use ar_placement_engine::error::ArError;

const SHIPPED_CONFIG: &str = include_str!("../assets/config/ar_config.json");

fn try_start(config: &ArConfig) -> Result<(), ArError> {
    let mut runtime = SimulatedRuntime::new(config.simulation.clone());
    ArSessionDriver::start(
        &mut runtime,
        config,
        BevyRenderTarget::new(),
        OverlayCanvas::new(64, 64),
    )
    .map(|_| ())
}

#[test]
fn shipped_config_parses_and_starts() {
    let config = ArConfig::from_json_str(SHIPPED_CONFIG).unwrap();
    assert_eq!(config.session.mode, SessionMode::ImmersiveAr);
    assert!(config.session.requires(SessionFeature::HitTest));
    assert!(config.session.requests(SessionFeature::DepthSensing));
    assert_eq!(try_start(&config), Ok(()));
}

#[test]
fn required_depth_without_runtime_support_fails_start() {
    let mut config = ArConfig::default();
    config.session.required_features = vec![SessionFeature::HitTest, SessionFeature::DepthSensing];
    config.session.optional_features.clear();
    config.simulation.depth_usage = vec![DepthUsage::GpuOptimized];
    config.simulation.depth_formats = vec![DepthDataFormat::Float32];
    if let Some(depth) = config.session.depth_sensing.as_mut() {
        depth.usage_preference = vec![DepthUsage::CpuOptimized];
    }

    assert_eq!(try_start(&config), Err(ArError::DepthConfigurationUnsatisfiable));
}

#[test]
fn optional_depth_without_runtime_support_still_starts() {
    let mut config = ArConfig::default();
    config
        .simulation
        .supported_features
        .retain(|feature| *feature != SessionFeature::DepthSensing);

    let mut runtime = SimulatedRuntime::new(config.simulation.clone());
    let driver = ArSessionDriver::start(
        &mut runtime,
        &config,
        BevyRenderTarget::new(),
        OverlayCanvas::new(64, 64),
    )
    .unwrap();

    assert!(!driver.scheduler().has_depth());
    assert!(!driver.session().is_feature_enabled(SessionFeature::DepthSensing));
}

#[test]
fn hit_test_unsupported_is_fatal() {
    let mut config = ArConfig::default();
    config
        .simulation
        .supported_features
        .retain(|feature| *feature != SessionFeature::HitTest);

    assert_eq!(
        try_start(&config),
        Err(ArError::UnsupportedFeature(SessionFeature::HitTest))
    );
}

#[test]
fn invalid_config_never_reaches_the_runtime() {
    let mut config = ArConfig::default();
    config.depth_overlay.stride = 0;
    assert!(matches!(try_start(&config), Err(ArError::InvalidConfig(_))));

    let mut config = ArConfig::default();
    config.session.depth_sensing = None;
    assert_eq!(try_start(&config), Err(ArError::MissingDepthConfiguration));
}

#[test]
fn failed_setup_after_negotiation_ends_the_session() {
    let mut config = ArConfig::default();
    config
        .simulation
        .supported_features
        .retain(|feature| *feature != SessionFeature::Viewer);

    let mut runtime = SimulatedRuntime::new(config.simulation.clone());
    let started = ArSessionDriver::start(
        &mut runtime,
        &config,
        BevyRenderTarget::new(),
        OverlayCanvas::new(64, 64),
    );

    assert_eq!(
        started.err(),
        Some(ArError::ReferenceSpaceUnavailable(ReferenceSpaceType::Viewer))
    );
    let control = runtime.control().unwrap();
    assert_eq!(control.state(), SessionState::Ended);
    assert_eq!(control.pending_requests(), 0);
}
