use lamina::{
    AlignmentMethod, CrossingMinimizationMethod, CycleBreakingMethod, DirectionMethod, Error,
    LayerAssignmentMethod, LayoutConfig, Spacing,
};

#[test]
fn defaults_select_the_standard_pipeline() {
    let config = LayoutConfig::default();
    assert_eq!(config.cycle_breaking, CycleBreakingMethod::Dfs);
    assert_eq!(config.direction, DirectionMethod::Structural);
    assert_eq!(config.layering, LayerAssignmentMethod::NetworkSimplex);
    assert_eq!(
        config.crossing_minimization,
        CrossingMinimizationMethod::Ports
    );
    assert_eq!(config.alignment, AlignmentMethod::BrandesKoepf);
    assert_eq!(config.crossing_iterations, 5);
    assert_eq!(config.repetitions, 1);
    assert_eq!(config.workers, 1);
    assert!(config.validate().is_ok());
}

#[test]
fn json_fields_are_kebab_case_and_optional() {
    let config = LayoutConfig::from_json(
        r#"{
            "cycle-breaking": "greedy",
            "crossing-minimization": "mixed",
            "alignment": "first-comes",
            "layering": "old-network-simplex",
            "seed": 7,
            "spacing": { "vertex-distance": 30.0 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.cycle_breaking, CycleBreakingMethod::Greedy);
    assert_eq!(
        config.crossing_minimization,
        CrossingMinimizationMethod::Mixed
    );
    assert_eq!(config.alignment, AlignmentMethod::FirstComes);
    assert_eq!(config.layering, LayerAssignmentMethod::OldNetworkSimplex);
    assert_eq!(config.seed, 7);
    assert_eq!(config.spacing.vertex_distance, 30.0);
    assert_eq!(config.spacing.edge_distance, Spacing::default().edge_distance);
    assert_eq!(config.direction_iterations, 100);
}

#[test]
fn empty_json_is_the_default_config() {
    assert_eq!(
        LayoutConfig::from_json("{}").unwrap(),
        LayoutConfig::default()
    );
}

#[test]
fn unknown_method_names_are_rejected() {
    let err = LayoutConfig::from_json(r#"{ "direction": "sideways" }"#).unwrap_err();
    assert!(matches!(err, Error::ConfigJson(_)));
}

#[test]
fn zero_counts_are_invalid() {
    for json in [
        r#"{ "crossing-iterations": 0 }"#,
        r#"{ "repetitions": 0 }"#,
        r#"{ "workers": 0 }"#,
    ] {
        let err = LayoutConfig::from_json(json).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }), "{json}: {err}");
    }
}

#[test]
fn negative_spacing_is_invalid() {
    let mut config = LayoutConfig::default();
    config.spacing.edge_distance = -1.0;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("spacing.edge-distance"), "{err}");

    let mut config = LayoutConfig::default();
    config.spacing.port_width = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn loops_must_fit_between_layers() {
    let mut config = LayoutConfig::default();
    config.spacing.layer_distance = 10.0;
    config.spacing.loop_distance = 6.0;
    assert!(matches!(
        config.validate(),
        Err(Error::InvalidConfig { .. })
    ));
}

#[test]
fn config_round_trips_through_json() {
    let mut config = LayoutConfig::default();
    config.direction = DirectionMethod::Force;
    config.spacing.layer_distance = 55.0;
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"layer-distance\":55.0"), "{json}");
    assert_eq!(LayoutConfig::from_json(&json).unwrap(), config);
}
