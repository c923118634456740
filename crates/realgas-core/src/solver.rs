//! Damped Newton iteration shared by all inversions.
use crate::errors::{GasError, GasResult};
use crate::{SolverOptions, Verbosity};
use std::time::Instant;

/// Result of a successful scalar iteration.
#[derive(Clone, Copy, Debug)]
pub struct Converged {
    pub x: f64,
    pub iterations: usize,
    pub residual: f64,
}

/// Iteration cap and deadline of a single solver call.
#[derive(Clone, Debug)]
pub struct IterationBudget {
    solver: &'static str,
    max_iter: usize,
    deadline: Option<Instant>,
    iterations: usize,
}

impl IterationBudget {
    pub fn new(solver: &'static str, max_iter: usize, options: &SolverOptions) -> Self {
        Self {
            solver,
            max_iter,
            deadline: options.deadline(),
            iterations: 0,
        }
    }

    /// Account for one more iteration. Fails if the cap is reached or the
    /// deadline has passed; `residual` is reported in the error.
    pub fn tick(&mut self, residual: f64) -> GasResult<usize> {
        if self.iterations >= self.max_iter {
            return Err(GasError::not_converged(
                self.solver,
                self.iterations,
                residual,
            ));
        }
        if self.deadline.is_some_and(|d| Instant::now() > d) {
            return Err(GasError::Timeout {
                solver: self.solver.to_owned(),
                iterations: self.iterations,
            });
        }
        self.iterations += 1;
        Ok(self.iterations)
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn solver(&self) -> &'static str {
        self.solver
    }
}

/// Newton iteration with step limitation and bounds.
///
/// The residual closure returns the residual and its derivative. The
/// iteration stops as soon as `|residual| < tol`, so residuals should be
/// scaled by the caller. With a step tolerance it also stops once the
/// Newton step is smaller than `step_tol * |x|`, which is needed where the
/// residual cannot be evaluated more accurately than `tol`.
#[derive(Clone, Debug)]
pub struct DampedNewton {
    solver: &'static str,
    lower: f64,
    upper: f64,
    max_step: f64,
    max_iter: usize,
    tol: f64,
    step_tol: f64,
    verbosity: Verbosity,
    options: SolverOptions,
}

impl DampedNewton {
    /// Create a solver; `max_iter` and `tol` are used unless `options`
    /// override them.
    pub fn new(solver: &'static str, options: SolverOptions, max_iter: usize, tol: f64) -> Self {
        let (max_iter, tol, verbosity) = options.unwrap_or(max_iter, tol);
        Self {
            solver,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            max_step: f64::INFINITY,
            max_iter,
            tol,
            step_tol: 0.0,
            verbosity,
            options,
        }
    }

    pub fn bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    pub fn max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }

    /// Relative step size below which the iteration counts as converged.
    pub fn step_tolerance(mut self, step_tol: f64) -> Self {
        self.step_tol = step_tol;
        self
    }

    pub fn tol(&self) -> f64 {
        self.tol
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Budget for a vector iteration driven by the caller.
    pub fn budget(&self) -> IterationBudget {
        IterationBudget::new(self.solver, self.max_iter, &self.options)
    }

    /// Largest factor `0 < omega <= 1` such that `x + omega * dx` does not
    /// cross the lower bound and no component moves further than the
    /// maximum step.
    pub fn relaxation(&self, x: &[f64], dx: &[f64]) -> f64 {
        let mut omega: f64 = 1.0;
        for (&xi, &dxi) in x.iter().zip(dx) {
            if xi + dxi <= self.lower && dxi < 0.0 {
                omega = omega.min(0.99 * (xi - self.lower) / -dxi);
            }
            if dxi.abs() * omega > self.max_step {
                omega = self.max_step / dxi.abs();
            }
        }
        omega
    }

    /// Solve `f(x) = 0` starting from `x0`.
    pub fn solve<F>(&self, x0: f64, mut f: F) -> GasResult<Converged>
    where
        F: FnMut(f64) -> GasResult<(f64, f64)>,
    {
        let mut budget = self.budget();
        let mut x = x0.clamp(self.lower, self.upper);

        log_iter!(self.verbosity, " iter |    residual    |        x");
        log_iter!(self.verbosity, "{:-<40}", "");
        loop {
            let (res, dres) = f(x)?;
            if !res.is_finite() || !dres.is_finite() {
                return Err(GasError::IterationFailed(self.solver.to_owned()));
            }
            log_iter!(
                self.verbosity,
                " {:4} | {:14.8e} | {:16.10e}",
                budget.iterations(),
                res,
                x
            );
            if res.abs() < self.tol {
                log_result!(
                    self.verbosity,
                    "{}: calculation converged in {} step(s)\n",
                    self.solver,
                    budget.iterations()
                );
                return Ok(Converged {
                    x,
                    iterations: budget.iterations(),
                    residual: res,
                });
            }
            budget.tick(res)?;
            if dres == 0.0 {
                return Err(GasError::IterationFailed(self.solver.to_owned()));
            }

            let mut dx = -res / dres;
            if dx.abs() <= self.step_tol * x.abs() {
                let x = (x + dx).clamp(self.lower, self.upper);
                log_result!(
                    self.verbosity,
                    "{}: step size converged in {} step(s)\n",
                    self.solver,
                    budget.iterations()
                );
                return Ok(Converged {
                    x,
                    iterations: budget.iterations(),
                    residual: res,
                });
            }
            if dx.abs() > self.max_step {
                dx = self.max_step * dx.signum();
            }
            // go at most half the way towards a bound
            if x + dx < self.lower {
                dx = 0.5 * (self.lower - x);
            } else if x + dx > self.upper {
                dx = 0.5 * (self.upper - x);
            }
            x += dx;
        }
    }
}
