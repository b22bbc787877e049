//! Rigorous equilibrium via bubble-point temperature search.
//!
//! For each liquid composition `x` the bubble-point temperature `T` solves
//!
//! `x*gamma1*p1(T) + (1 - x)*gamma2*p2(T) = P`
//!
//! and the vapor fraction follows as `y = x*gamma1*p1(T) / P`. Newton's method
//! runs on the logarithm of the pressure balance, which is close to linear in
//! `1/T`; elements are independent and are solved in parallel.

use crate::activity::Nrtl;
use crate::equilibrium::{VaporLiquidEquilibrium, check_consistent};
use crate::error::{ThermoError, ThermoResult};
use crate::vapor_pressure::VaporPressure;
use dc_core::units::{Pressure, Temperature, k, to_k, to_pa};
use dc_solver::{RootMethod, ScalarConfig, SolverError, find_root};
use rayon::prelude::*;

/// Default Newton starting temperature (K).
pub const DEFAULT_INITIAL_TEMPERATURE_K: f64 = 298.15;

/// Result of one bubble-point solve.
#[derive(Clone, Copy, Debug)]
pub struct BubblePoint {
    pub temperature: Temperature,
    /// Equilibrium vapor mole fraction of the light component
    pub y: f64,
    pub iterations: usize,
    pub method: RootMethod,
}

/// Binary bubble-point equilibrium model. Component 1 is the light component.
#[derive(Clone, Debug)]
pub struct BubblePointModel {
    light: VaporPressure,
    heavy: VaporPressure,
    activity: Nrtl,
    pressure: Pressure,
    initial_temperature: Temperature,
    solver: ScalarConfig,
}

impl BubblePointModel {
    pub fn new(
        light: VaporPressure,
        heavy: VaporPressure,
        activity: Nrtl,
        pressure: Pressure,
    ) -> ThermoResult<Self> {
        let p = to_pa(pressure);
        if !(p.is_finite() && p > 0.0) {
            return Err(ThermoError::InvalidArg {
                what: "column pressure must be positive",
            });
        }
        Ok(Self {
            light,
            heavy,
            activity,
            pressure,
            initial_temperature: k(DEFAULT_INITIAL_TEMPERATURE_K),
            solver: ScalarConfig {
                max_iterations: 50,
                x_tol: 1e-12,
                f_tol: 1e-11,
                derivative_step: 1e-6,
                min_x: 1.0,
                bracket: (200.0, 600.0),
                expand_factor: 1.5,
                max_expansions: 20,
                max_bisections: 200,
            },
        })
    }

    /// Newton starting temperature used for every element.
    pub fn with_initial_temperature(mut self, t: Temperature) -> ThermoResult<Self> {
        let t_k = to_k(t);
        if !(t_k.is_finite() && t_k > self.solver.min_x) {
            return Err(ThermoError::InvalidArg {
                what: "initial temperature must be positive",
            });
        }
        self.initial_temperature = t;
        Ok(self)
    }

    /// Override the root-finder settings.
    pub fn with_solver_config(mut self, solver: ScalarConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    pub fn light(&self) -> &VaporPressure {
        &self.light
    }

    pub fn heavy(&self) -> &VaporPressure {
        &self.heavy
    }

    pub fn activity(&self) -> &Nrtl {
        &self.activity
    }

    pub fn initial_temperature(&self) -> Temperature {
        self.initial_temperature
    }

    /// Partial pressures `(x*gamma1*p1, (1-x)*gamma2*p2)` in pascal.
    fn partial_pressures(&self, x: f64, t_k: f64) -> (f64, f64) {
        let (gamma1, gamma2) = self.activity.gammas(x, t_k);
        (
            x * gamma1 * self.light.pressure_pa(t_k),
            (1.0 - x) * gamma2 * self.heavy.pressure_pa(t_k),
        )
    }

    /// Bubble-point pressure residual `sum(partial) - P` in pascal.
    pub fn pressure_residual(&self, x: f64, t: Temperature) -> f64 {
        let (p1, p2) = self.partial_pressures(x, to_k(t));
        p1 + p2 - to_pa(self.pressure)
    }

    /// Solve for the bubble point of liquid composition `x`.
    pub fn bubble_point(&self, x: f64) -> ThermoResult<BubblePoint> {
        if !x.is_finite() {
            return Err(ThermoError::NonPhysical {
                what: "liquid mole fraction",
                value: x,
            });
        }
        let p_pa = to_pa(self.pressure);
        let ln_p = p_pa.ln();

        let residual = |t_k: f64| -> dc_solver::SolverResult<f64> {
            let (p1, p2) = self.partial_pressures(x, t_k);
            Ok((p1 + p2).ln() - ln_p)
        };

        let root = match find_root(residual, to_k(self.initial_temperature), &self.solver) {
            Ok(root) => root,
            Err(SolverError::ConvergenceFailed { last_x, .. }) => {
                let residual_pa = self.pressure_residual(x, k(last_x));
                tracing::warn!(x, last_t_k = last_x, residual_pa, "bubble-point search failed");
                return Err(ThermoError::Convergence {
                    index: 0,
                    x,
                    residual_pa,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let (p1, _) = self.partial_pressures(x, root.x);
        let y = check_consistent(x, p1 / p_pa)?;

        Ok(BubblePoint {
            temperature: k(root.x),
            y,
            iterations: root.iterations,
            method: root.method,
        })
    }

    /// Bubble points for every element of `xs`, solved in parallel.
    pub fn bubble_points(&self, xs: &[f64]) -> ThermoResult<Vec<BubblePoint>> {
        xs.par_iter()
            .enumerate()
            .map(|(i, &x)| self.bubble_point(x).map_err(|e| e.at_index(i)))
            .collect()
    }
}

impl VaporLiquidEquilibrium for BubblePointModel {
    fn name(&self) -> &str {
        "bubble-point-nrtl"
    }

    fn vapor_fraction(&self, x: f64) -> ThermoResult<f64> {
        self.bubble_point(x).map(|bp| bp.y)
    }

    fn vapor_fractions(&self, xs: &[f64]) -> ThermoResult<Vec<f64>> {
        Ok(self.bubble_points(xs)?.into_iter().map(|bp| bp.y).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::TauCorrelation;
    use dc_core::units::constants::standard_atmosphere;

    fn raoult() -> BubblePointModel {
        BubblePointModel::new(
            VaporPressure::benzene(),
            VaporPressure::toluene(),
            Nrtl::ideal(),
            standard_atmosphere(),
        )
        .unwrap()
    }

    #[test]
    fn pure_light_boils_at_its_normal_boiling_point() {
        let bp = raoult().bubble_point(1.0).unwrap();
        assert!((to_k(bp.temperature) - 353.3).abs() < 0.5);
        assert!((bp.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pure_heavy_boils_at_its_normal_boiling_point() {
        let bp = raoult().bubble_point(0.0).unwrap();
        assert!((to_k(bp.temperature) - 383.8).abs() < 0.5);
        assert_eq!(bp.y, 0.0);
    }

    #[test]
    fn residual_vanishes_at_solution() {
        let model = raoult();
        let bp = model.bubble_point(0.4).unwrap();
        assert!(model.pressure_residual(0.4, bp.temperature).abs() < 1e-3);
        assert_eq!(bp.method, RootMethod::Newton);
    }

    #[test]
    fn parallel_matches_serial() {
        let model = raoult();
        let xs: Vec<f64> = (0..=10).map(|i| i as f64 / 10.0).collect();
        let parallel = model.vapor_fractions(&xs).unwrap();
        for (x, y) in xs.iter().zip(parallel) {
            assert_eq!(y, model.vapor_fraction(*x).unwrap());
        }
    }

    #[test]
    fn non_ideal_interaction_shifts_bubble_point() {
        // Positive deviation from Raoult's law lowers the bubble point
        let ideal = raoult();
        let non_ideal = BubblePointModel::new(
            VaporPressure::benzene(),
            VaporPressure::toluene(),
            Nrtl::new(
                TauCorrelation::new(0.0, 150.0, 0.0, 0.0),
                TauCorrelation::new(0.0, 150.0, 0.0, 0.0),
                0.3,
            )
            .unwrap(),
            standard_atmosphere(),
        )
        .unwrap();
        let t_ideal = to_k(ideal.bubble_point(0.5).unwrap().temperature);
        let t_non_ideal = to_k(non_ideal.bubble_point(0.5).unwrap().temperature);
        assert!(t_non_ideal < t_ideal);
    }

    #[test]
    fn unreachable_pressure_reports_convergence_error() {
        // Vapor pressure capped far below the column pressure: no bubble point
        let flat = VaporPressure::new(5.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        let model = BubblePointModel::new(flat, flat, Nrtl::ideal(), standard_atmosphere()).unwrap();
        let err = model.vapor_fractions(&[0.2, 0.7]).unwrap_err();
        assert!(matches!(err, ThermoError::Convergence { index, .. } if index < 2));
    }
}
