#![warn(clippy::all)]
use std::time::{Duration, Instant};

/// Print messages with level `Verbosity::Iter` or higher.
#[macro_export]
macro_rules! log_iter {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::Verbosity::Iter {
            println!($($arg)*);
        }
    }
}

/// Print messages with level `Verbosity::Result` or higher.
#[macro_export]
macro_rules! log_result {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::Verbosity::Result {
            println!($($arg)*);
        }
    }
}

pub mod cache;
pub mod cubic;
mod errors;
pub mod helmholtz;
pub mod parameter;
mod solver;
pub use cache::{CacheIndex, PropertyCache};
pub use errors::{check_positive, check_range, GasError, GasResult};
pub use helmholtz::{
    FluidConstants, HelmholtzEos, HelmholtzSurface, Saturation, VaporPressureCurve,
};
pub use solver::{Converged, DampedNewton, IterationBudget};

/// Molar gas constant in J/(mol K).
pub const RGAS: f64 = 8.314462618;
/// Reference pressure of the standard state in Pa.
pub const P_REF: f64 = 1e5;
/// Reference temperature for enthalpies of formation in K.
pub const T_REF: f64 = 298.15;

/// Level of detail in the iteration output.
#[derive(Copy, Clone, PartialOrd, PartialEq, Eq, Debug, Default)]
pub enum Verbosity {
    /// Do not print output.
    #[default]
    None,
    /// Print information about the success or failure of the iteration.
    Result,
    /// Print a detailed output for every iteration.
    Iter,
}

/// Options for the iterative solvers.
///
/// If the values are [None], solver specific default
/// values are used.
#[derive(Copy, Clone, Default, Debug)]
pub struct SolverOptions {
    /// Maximum number of iterations.
    pub max_iter: Option<usize>,
    /// Tolerance.
    pub tol: Option<f64>,
    /// Iteration output indicated by the [Verbosity] enum.
    pub verbosity: Verbosity,
    /// Wall-clock budget of a single solver call.
    pub max_duration: Option<Duration>,
}

impl SolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = Some(tol);
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    pub fn unwrap_or(self, max_iter: usize, tol: f64) -> (usize, f64, Verbosity) {
        (
            self.max_iter.unwrap_or(max_iter),
            self.tol.unwrap_or(tol),
            self.verbosity,
        )
    }

    /// Point in time after which a solver started now has to give up.
    pub fn deadline(&self) -> Option<Instant> {
        self.max_duration.map(|d| Instant::now() + d)
    }
}
