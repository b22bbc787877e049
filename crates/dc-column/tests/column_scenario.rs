//! End-to-end column runs.

use dc_column::{ColumnConfig, ColumnError, DistillationColumn, mccabe_thiele, uniform_grid};
use dc_core::units::constants::standard_atmosphere;
use dc_sim::{IntegratorType, SimOptions};
use dc_thermo::{BubblePointModel, Nrtl, TauCorrelation, VaporPressure};
use nalgebra::DVector;

fn reference_column() -> DistillationColumn {
    let config = ColumnConfig::ideal(10, 5, 100.0, 0.5, 50.0, 2.0)
        .unwrap()
        .with_reflux_ratio(1.5)
        .with_feed_quality(1.0);
    DistillationColumn::new(config).unwrap()
}

fn assert_holdups_positive(column: &DistillationColumn, states: &[DVector<f64>]) {
    for state in states {
        let (m, _) = column.split_state(state).unwrap();
        assert!(m.iter().all(|&m| m > 0.0));
    }
}

#[test]
fn reference_run_rectifies() {
    let column = reference_column();
    let run = column.run_simulation(50.0, None).expect("reference run");

    assert_eq!(run.t_span(), (0.0, 50.0));
    assert!(run.top_composition() > 0.5);
    assert!(run.bottom_composition() < 0.5);
    assert!((run.top_composition() - 0.856).abs() < 0.01);
    assert!((run.bottom_composition() - 0.144).abs() < 0.01);
    assert_holdups_positive(&column, run.states());

    // Compositions increase up the column
    let x = run.final_compositions();
    assert!(x.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn feed_into_reboiler_or_condenser() {
    let bottom_feed = ColumnConfig::ideal(10, 0, 100.0, 0.5, 50.0, 2.0)
        .unwrap()
        .with_reflux_ratio(1.5);
    // A vapor feed keeps the condenser balance closed
    let top_feed = ColumnConfig::ideal(10, 11, 100.0, 0.5, 50.0, 2.0)
        .unwrap()
        .with_reflux_ratio(1.5)
        .with_feed_quality(0.0);

    for config in [bottom_feed, top_feed] {
        let column = DistillationColumn::new(config).unwrap();
        let dxdt = column
            .derivatives(0.0, &column.analytic_initial_state())
            .unwrap();
        let dm = dxdt.rows(0, column.num_stages());
        assert!(dm.amax() < 1e-10, "feed stage {}: {}", column.config().feed_stage, dm.amax());

        let run = column.run_simulation(50.0, None).unwrap();
        assert!(run.top_composition() > run.bottom_composition());
        assert_holdups_positive(&column, run.states());
    }
}

#[test]
fn dense_output_inside_span() {
    let column = reference_column();
    let run = column.run_simulation(5.0, None).unwrap();

    let mid = run.state_at(2.5).expect("inside span");
    assert_eq!(mid.len(), column.state_dimension());
    assert!(run.state_at(5.5).is_none());

    let samples = run.sample(10);
    assert_eq!(samples.len(), 11);
    assert!((&samples[10].1 - run.final_state()).amax() < 1e-12);
}

#[test]
fn steady_state_has_zero_derivative() {
    let column = reference_column();
    let steady = column.steady_state().expect("steady state");

    let dxdt = column.derivatives(0.0, &steady).unwrap();
    assert!(dxdt.amax() < 1e-6, "max derivative {}", dxdt.amax());

    // Matches the long-time limit of the transient
    let x = &steady.as_slice()[column.num_stages()..];
    assert!((x[0] - 0.1436).abs() < 1e-3);
    assert!((x[x.len() - 1] - 0.8564).abs() < 1e-3);
}

#[test]
fn run_from_steady_state_stays_put() {
    let column = reference_column();
    let steady = column.steady_state().unwrap();
    let run = column.run_simulation(5.0, Some(steady.clone())).unwrap();
    assert!((run.final_state() - &steady).amax() < 1e-5);
}

#[test]
fn rk4_reference_agrees_with_rosenbrock() {
    let column = reference_column();
    let opts = SimOptions {
        integrator: IntegratorType::RK4,
        dt: Some(0.001),
        ..SimOptions::default()
    };
    let explicit = column.run_simulation_with(2.0, None, &opts).unwrap();
    let implicit = column.run_simulation(2.0, None).unwrap();
    assert!((explicit.final_state() - implicit.final_state()).amax() < 1e-4);
}

#[test]
fn rigorous_equilibrium_short_run() {
    let activity = Nrtl::new(
        TauCorrelation::new(0.0, -40.0, 0.0, 0.0),
        TauCorrelation::new(0.0, 60.0, 0.0, 0.0),
        0.3,
    )
    .unwrap();
    let vle = BubblePointModel::new(
        VaporPressure::benzene(),
        VaporPressure::toluene(),
        activity,
        standard_atmosphere(),
    )
    .unwrap();
    let config = ColumnConfig::new(4, 2, 10.0, 0.5, 5.0, vle).with_reflux_ratio(2.0);
    let column = DistillationColumn::new(config).unwrap();
    assert!(column.config().column_pressure().is_some());

    let run = column.run_simulation(1.0, None).expect("rigorous run");
    assert!(run.top_composition() > run.bottom_composition());
    assert_holdups_positive(&column, run.states());
}

#[test]
fn unreachable_bubble_point_is_convergence_error() {
    let flat = VaporPressure::new(5.0, 0.0, 0.0, 0.0, 0.0).unwrap();
    let vle = BubblePointModel::new(flat, flat, Nrtl::ideal(), standard_atmosphere()).unwrap();
    let column = DistillationColumn::new(ColumnConfig::new(3, 2, 10.0, 0.5, 5.0, vle)).unwrap();

    assert!(matches!(
        column.run_simulation(1.0, None),
        Err(ColumnError::Convergence { .. })
    ));
    // The failing index is a grid point here, not a stage
    assert!(matches!(
        mccabe_thiele(&column, &[0.1, 0.5], &[0.5]),
        Err(ColumnError::Equilibrium(_))
    ));
}

#[test]
fn bad_initial_state_fails_fast() {
    let column = reference_column();
    let mut state = column.analytic_initial_state();
    state[3] = -0.2;
    assert!(matches!(
        column.run_simulation(1.0, Some(state)),
        Err(ColumnError::PhysicalState { stage: 3, what: "holdup", .. })
    ));

    assert!(matches!(
        column.run_simulation(1.0, Some(DVector::zeros(3))),
        Err(ColumnError::Configuration { .. })
    ));
    assert!(matches!(
        column.run_simulation(-1.0, None),
        Err(ColumnError::Configuration { .. })
    ));
}

#[test]
fn step_limit_is_integration_error() {
    let column = reference_column();
    let opts = SimOptions {
        max_steps: 2,
        ..SimOptions::default()
    };
    assert!(matches!(
        column.run_simulation_with(50.0, None, &opts),
        Err(ColumnError::Integration { .. })
    ));
}

#[test]
fn mccabe_thiele_from_steady_profile() {
    let column = reference_column();
    let steady = column.steady_state().unwrap();
    let stages = &steady.as_slice()[column.num_stages()..];

    let grid = uniform_grid(0.05).unwrap();
    let diagram = mccabe_thiele(&column, &grid, stages).unwrap();

    assert_eq!(diagram.equilibrium.len(), 21);
    assert_eq!(diagram.staircase.len(), 2 * (stages.len() - 1));
    assert_eq!(diagram.operating_line.len(), stages.len() - 1);
    // Every step starts on the equilibrium curve, above the diagonal
    for &(x, y) in diagram.staircase.iter().step_by(2) {
        assert!(y >= x);
    }
}
