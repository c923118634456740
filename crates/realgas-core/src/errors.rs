use thiserror::Error;

/// Error type for improperly defined states and convergence problems.
#[derive(Error, Debug)]
pub enum GasError {
    // errors related to algorithms
    #[error("`{solver}` did not converge within {iterations} iterations (residual {residual:e}).")]
    NotConverged {
        solver: String,
        iterations: usize,
        residual: f64,
    },
    #[error("`{solver}` exceeded its time budget after {iterations} iterations.")]
    Timeout { solver: String, iterations: usize },
    #[error("`{0}` encountered illegal values during the iteration.")]
    IterationFailed(String),
    #[error("Iteration resulted in trivial solution.")]
    TrivialSolution,
    #[error("Invalid state in {0}: {1} = {2}.")]
    InvalidState(String, String, f64),
    #[error("{property} = {value} is outside of the valid range [{min}, {max}].")]
    OutOfRange {
        property: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Singular linear system in {0}.")]
    SingularMatrix(String),
    #[error("The gas is initialized for {0} species while the input specifies {1} species.")]
    IncompatibleComponents(usize, usize),

    // json errors
    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    // errors related to parameter handling
    #[error("The following species were not found: {0}")]
    ComponentsNotFound(String),
    #[error("Incompatible parameters: {0}")]
    IncompatibleParameters(String),
}

impl GasError {
    pub(crate) fn not_converged(solver: &str, iterations: usize, residual: f64) -> Self {
        Self::NotConverged {
            solver: solver.to_owned(),
            iterations,
            residual,
        }
    }

    /// Returns `true` for errors raised by an iterative solver.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            Self::NotConverged { .. }
                | Self::Timeout { .. }
                | Self::IterationFailed(_)
                | Self::TrivialSolution
        )
    }
}

/// Convenience type for `Result<T, GasError>`.
pub type GasResult<T> = Result<T, GasError>;

/// Check that a state variable is finite and positive.
pub fn check_positive(context: &str, name: &str, value: f64) -> GasResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GasError::InvalidState(
            context.to_owned(),
            name.to_owned(),
            value,
        ))
    }
}

/// Check that a value lies inside a validity range.
pub fn check_range(name: &str, value: f64, min: f64, max: f64) -> GasResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GasError::OutOfRange {
            property: name.to_owned(),
            value,
            min,
            max,
        })
    }
}
