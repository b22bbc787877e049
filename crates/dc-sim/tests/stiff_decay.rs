//! Accuracy and stiffness tests on linear problems with known solutions.

use dc_sim::{IntegratorType, SimError, SimOptions, TransientModel, run_sim, run_sim_from};
use nalgebra::DVector;

/// Diagonal linear system dx_i/dt = rates_i * x_i.
struct LinearDecay {
    rates: Vec<f64>,
}

impl TransientModel for LinearDecay {
    fn dimension(&self) -> usize {
        self.rates.len()
    }

    fn initial_state(&self) -> DVector<f64> {
        DVector::from_element(self.rates.len(), 1.0)
    }

    fn rhs(&self, _t: f64, x: &DVector<f64>) -> dc_sim::SimResult<DVector<f64>> {
        Ok(DVector::from_iterator(
            x.len(),
            x.iter().zip(&self.rates).map(|(xi, r)| r * xi),
        ))
    }
}

#[test]
fn rk4_matches_exponential() {
    let model = LinearDecay { rates: vec![-1.0] };
    let opts = SimOptions {
        t_end: 2.0,
        dt: Some(0.01),
        integrator: IntegratorType::RK4,
        ..SimOptions::default()
    };

    let record = run_sim(&model, &opts).expect("rk4 run");
    let exact = (-2.0f64).exp();
    assert!((record.final_state()[0] - exact).abs() < 1e-9);
    assert_eq!(record.t_span(), (0.0, 2.0));
}

#[test]
fn rosenbrock_matches_exponential() {
    let model = LinearDecay { rates: vec![-0.5] };
    let opts = SimOptions {
        t_end: 4.0,
        ..SimOptions::default()
    };

    let record = run_sim(&model, &opts).expect("rosenbrock run");
    let exact = (-2.0f64).exp();
    assert!((record.final_state()[0] - exact).abs() < 1e-4);
}

#[test]
fn rosenbrock_handles_two_time_scales() {
    let model = LinearDecay {
        rates: vec![-1.0e4, -1.0],
    };
    let opts = SimOptions {
        t_end: 1.0,
        ..SimOptions::default()
    };

    let record = run_sim(&model, &opts).expect("stiff run");
    let x = record.final_state();
    assert!(x[0].abs() < 1e-6);
    assert!((x[1] - (-1.0f64).exp()).abs() < 1e-4);
    // An explicit method would need tens of thousands of steps here
    assert!(record.stats().accepted_steps < 1_000);
}

#[test]
fn dense_output_reproduces_nodes() {
    let model = LinearDecay { rates: vec![-1.0, -3.0] };
    let opts = SimOptions {
        t_end: 1.0,
        ..SimOptions::default()
    };

    let record = run_sim(&model, &opts).expect("run");
    for (t, x) in record.times().iter().zip(record.states()) {
        let dense = record.evaluate(*t).expect("inside span");
        assert!((dense - x).amax() < 1e-12);
    }

    let mid = record.evaluate(0.5).expect("inside span");
    assert!((mid[0] - (-0.5f64).exp()).abs() < 1e-4);
    assert!((mid[1] - (-1.5f64).exp()).abs() < 1e-4);
}

#[test]
fn wrong_dimension_is_rejected() {
    let model = LinearDecay { rates: vec![-1.0] };
    let result = run_sim_from(&model, DVector::zeros(3), &SimOptions::default());
    assert!(matches!(
        result,
        Err(SimError::DimensionMismatch {
            expected: 1,
            got: 3
        })
    ));
}

#[test]
fn step_limit_is_enforced() {
    let model = LinearDecay { rates: vec![-1.0] };
    let opts = SimOptions {
        t_end: 10.0,
        dt: Some(0.01),
        integrator: IntegratorType::RK4,
        max_steps: 5,
        ..SimOptions::default()
    };

    assert!(matches!(
        run_sim(&model, &opts),
        Err(SimError::MaxStepsExceeded { steps: 5, .. })
    ));
}
