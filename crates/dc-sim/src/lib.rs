//! Transient simulation framework.
//!
//! Provides:
//! - `TransientModel` trait for ODE systems `dx/dt = f(t, x)`
//! - Adaptive linearly-implicit Rosenbrock (2,3) integrator for stiff systems
//! - Fixed-step RK4 integrator
//! - Step-size control with cutback on non-physical trial states
//! - Dense-output `Trajectory`

pub mod error;
pub mod integrator;
pub mod model;
pub mod sim;
pub mod trajectory;

pub use error::{SimError, SimResult};
pub use integrator::{Integrator, RK4, Rosenbrock23, StepAttempt};
pub use model::TransientModel;
pub use sim::{IntegratorType, SimOptions, run_sim, run_sim_from};
pub use trajectory::{IntegrationStats, Trajectory};
