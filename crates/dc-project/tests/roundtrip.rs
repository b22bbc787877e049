use dc_project::schema::*;
use dc_project::{load_json, load_yaml, save_json, save_yaml, validate_file};

fn ideal_file() -> ColumnFile {
    ColumnFile {
        version: 1,
        name: "Ideal column".to_string(),
        column: ColumnDef {
            num_trays: 10,
            feed_stage: 5,
            feed_flow: 100.0,
            feed_composition: 0.5,
            feed_quality: 1.0,
            reflux_ratio: 1.5,
            distillate_flow: 50.0,
            weir_constant: 1.0,
            tray_holdup: 0.1,
            reboiler_holdup: 0.5,
            condenser_holdup: 0.5,
            level_gain: 0.0,
            equilibrium: EquilibriumDef::ConstantVolatility { alpha: 2.0 },
        },
        run: RunDef::default(),
    }
}

fn rigorous_file() -> ColumnFile {
    let mut file = ideal_file();
    file.name = "Rigorous column".to_string();
    file.column.equilibrium = EquilibriumDef::BubblePoint {
        column_pressure: PressureDef {
            value: 14.696,
            unit: PressureUnit::Psi,
        },
        light_vapor_pressure: vec![83.107, -6486.2, -9.2194, 6.9844e-6, 2.0],
        heavy_vapor_pressure: vec![76.945, -6729.8, -8.179, 5.3017e-6, 2.0],
        tau12: vec![0.0, -40.0],
        tau21: vec![0.0, 60.0],
        nrtl_alpha: 0.3,
        initial_temperature_k: Some(350.0),
    };
    file.run = RunDef {
        duration: 10.0,
        integrator: IntegratorDef::Rk4,
        dt: Some(0.001),
        start: StartDef::SteadyState,
        ..RunDef::default()
    };
    file
}

#[test]
fn roundtrip_yaml_ideal_column() {
    let file = ideal_file();
    validate_file(&file).unwrap();

    let path = std::env::temp_dir().join("dc_project_roundtrip_ideal.yaml");
    save_yaml(&path, &file).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(file, loaded);
}

#[test]
fn roundtrip_yaml_rigorous_column() {
    let file = rigorous_file();

    let path = std::env::temp_dir().join("dc_project_roundtrip_rigorous.yaml");
    save_yaml(&path, &file).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(file, loaded);
}

#[test]
fn roundtrip_json_rigorous_column() {
    let file = rigorous_file();

    let path = std::env::temp_dir().join("dc_project_roundtrip_rigorous.json");
    save_json(&path, &file).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(file, loaded);
}

#[test]
fn defaults_fill_optional_fields() {
    let yaml = r#"
version: 1
name: minimal
column:
  num_trays: 4
  feed_stage: 2
  feed_flow: 10.0
  feed_composition: 0.5
  reflux_ratio: 1.0
  distillate_flow: 5.0
  equilibrium:
    model: constant_volatility
    alpha: 3.0
"#;
    let file: ColumnFile = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(file.column.feed_quality, 1.0);
    assert_eq!(file.column.tray_holdup, 0.1);
    assert_eq!(file.column.reboiler_holdup, 0.5);
    assert_eq!(file.run, RunDef::default());
    validate_file(&file).unwrap();
}
