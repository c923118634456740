use super::Gas;
use itertools::Itertools;
use nalgebra::{DMatrix, DVector};
use realgas_core::{check_positive, log_iter, log_result, DampedNewton, GasError, GasResult, P_REF};
use std::fmt;

const MAX_ITER_EQUILIBRIUM: usize = 500;
const TOL_EQUILIBRIUM: f64 = 1e-10;
/// Initial amount of species that are absent from the initial composition.
const SEED: f64 = 1e-6;
/// Amounts below this threshold are removed from the iteration.
const FLOOR: f64 = 1e-9;

/// Result of a chemical equilibrium calculation.
#[derive(Clone, Debug)]
pub struct EquilibriumSolution {
    /// temperature in K
    pub temperature: f64,
    /// pressure in Pa
    pub pressure: f64,
    /// equilibrium mole fractions
    pub molefracs: DVector<f64>,
    /// amounts of substance per mole of the initial mixture
    pub moles: DVector<f64>,
    pub iterations: usize,
    pub residual: f64,
}

impl fmt::Display for EquilibriumSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EquilibriumSolution(T={} K, p={} Pa, x={:.6?}, iterations={})",
            self.temperature,
            self.pressure,
            self.molefracs.as_slice(),
            self.iterations
        )
    }
}

impl Gas {
    /// Symbols of all elements of the species, sorted alphabetically.
    pub fn elements(&self) -> Vec<String> {
        self.parameters
            .pure
            .iter()
            .flat_map(|r| r.elements.keys())
            .sorted()
            .dedup()
            .cloned()
            .collect()
    }

    /// Number of atoms of every element (columns, ordered as
    /// [Self::elements]) in every species (rows).
    pub fn stoichiometry(&self) -> DMatrix<f64> {
        let elements = self.elements();
        let pure = &self.parameters.pure;
        DMatrix::from_fn(pure.len(), elements.len(), |i, k| {
            pure[i].elements.get(&elements[k]).copied().unwrap_or(0.0)
        })
    }

    /// Chemical equilibrium at constant temperature and pressure.
    ///
    /// The Gibbs energy of the ideal gas mixture is minimized subject to
    /// the element balance of the current composition using the RAND
    /// method. Species that are absent initially are seeded with a trace
    /// amount unless they contain an element that is not present at all.
    /// On success the gas is remixed to the equilibrium composition.
    pub fn compute_equilibrium(&mut self, t: f64, p: f64) -> GasResult<EquilibriumSolution> {
        check_positive("Gas::compute_equilibrium", "temperature", t)?;
        check_positive("Gas::compute_equilibrium", "pressure", p)?;
        let n = self.components();
        if n == 1 {
            return Ok(EquilibriumSolution {
                temperature: t,
                pressure: p,
                molefracs: DVector::from_element(1, 1.0),
                moles: DVector::from_element(1, 1.0),
                iterations: 0,
                residual: 0.0,
            });
        }

        let x0 = self.molefracs().clone();
        let stoichiometry = self.stoichiometry();
        let abundance = stoichiometry.transpose() * &x0;
        let present: Vec<usize> = (0..abundance.len())
            .filter(|&k| abundance[k] > 0.0)
            .collect();
        let feasible: Vec<bool> = (0..n)
            .map(|i| {
                (0..abundance.len()).all(|k| stoichiometry[(i, k)] == 0.0 || abundance[k] > 0.0)
            })
            .collect();
        let a = stoichiometry.select_columns(present.iter());
        let b_target = abundance.select_rows(present.iter());

        let mut y = DVector::from_fn(n, |i, _| if feasible[i] { x0[i].max(SEED) } else { 0.0 });
        let c = self
            .ideal_gas
            .standard_chemical_potentials(t)
            .add_scalar((p / P_REF).ln());

        let newton = DampedNewton::new(
            "Gas::compute_equilibrium",
            self.options,
            MAX_ITER_EQUILIBRIUM,
            TOL_EQUILIBRIUM,
        )
        .bounds(0.0, f64::INFINITY);
        let verbosity = newton.verbosity();
        let mut budget = newton.budget();

        log_iter!(verbosity, " iter |    residual    | relaxation | active species");
        log_iter!(verbosity, "{:-<53}", "");

        let mut residual = f64::INFINITY;
        loop {
            let iter = budget.tick(residual)?;
            let active: Vec<usize> = (0..n).filter(|&i| y[i] > 0.0).collect();
            let elements = independent_columns(&a, &active);
            let ne = elements.len();
            let y_total = y.sum();
            let mu = DVector::from_fn(n, |i, _| {
                if y[i] > 0.0 {
                    c[i] + (y[i] / y_total).ln()
                } else {
                    0.0
                }
            });
            let f = y.component_mul(&mu);
            let b = a.transpose() * &y;

            // Newton step for the element potentials and the total amount
            let mut m = DMatrix::zeros(ne + 1, ne + 1);
            let mut r = DVector::zeros(ne + 1);
            for (k, &ek) in elements.iter().enumerate() {
                for (j, &ej) in elements.iter().enumerate() {
                    m[(k, j)] = active.iter().map(|&i| a[(i, ek)] * a[(i, ej)] * y[i]).sum();
                }
                m[(k, ne)] = b[ek];
                m[(ne, k)] = b[ek];
                r[k] = b_target[ek] + active.iter().map(|&i| a[(i, ek)] * f[i]).sum::<f64>();
            }
            r[ne] = active.iter().map(|&i| f[i]).sum();
            let solution = m
                .lu()
                .solve(&r)
                .ok_or_else(|| GasError::SingularMatrix("Gas::compute_equilibrium".to_owned()))?;
            let u = solution[ne];

            let dy = DVector::from_fn(n, |i, _| {
                if y[i] > 0.0 {
                    let pi: f64 = elements
                        .iter()
                        .enumerate()
                        .map(|(k, &ek)| a[(i, ek)] * solution[k])
                        .sum();
                    y[i] * (u + pi - mu[i]) - y[i]
                } else {
                    0.0
                }
            });
            if dy.iter().any(|d| !d.is_finite()) {
                return Err(GasError::IterationFailed(
                    "Gas::compute_equilibrium".to_owned(),
                ));
            }
            residual = dy.amax();
            let omega = newton.relaxation(y.as_slice(), dy.as_slice());
            y.axpy(omega, &dy, 1.0);
            y.apply(|yi| {
                if *yi < FLOOR {
                    *yi = 0.0
                }
            });

            log_iter!(
                verbosity,
                " {:4} | {:14.8e} | {:10.6} | {}",
                iter,
                residual,
                omega,
                active.len()
            );
            if residual < newton.tol() {
                log_result!(
                    verbosity,
                    "Gas::compute_equilibrium: calculation converged in {} step(s)\n",
                    iter
                );
                let molefracs = &y / y.sum();
                self.remix(molefracs.as_slice())?;
                return Ok(EquilibriumSolution {
                    temperature: t,
                    pressure: p,
                    molefracs,
                    moles: y,
                    iterations: iter,
                    residual,
                });
            }
        }
    }
}

/// Columns of `a` that are linearly independent on the given rows.
///
/// Elements that only occur in a fixed ratio to other elements (H and O
/// if water is the only species containing them) add no constraint.
fn independent_columns(a: &DMatrix<f64>, rows: &[usize]) -> Vec<usize> {
    let sub = a.select_rows(rows.iter());
    let mut columns = Vec::with_capacity(a.ncols());
    for k in 0..a.ncols() {
        columns.push(k);
        if sub.select_columns(columns.iter()).rank(1e-8) < columns.len() {
            columns.pop();
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::super::GasModel;
    use super::*;
    use approx::assert_relative_eq;

    fn hydrogen_oxygen() -> GasResult<Gas> {
        Gas::new(
            GasModel::Ideal,
            &["H2", "O2", "H2O", "OH", "H", "O"],
            &[2.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        )
    }

    #[test]
    fn stoichiometry() -> GasResult<()> {
        let gas = hydrogen_oxygen()?;
        assert_eq!(gas.elements(), vec!["H".to_owned(), "O".to_owned()]);
        let a = gas.stoichiometry();
        assert_eq!(a.shape(), (6, 2));
        assert_eq!((a[(2, 0)], a[(2, 1)]), (2.0, 1.0));
        assert_eq!((a[(5, 0)], a[(5, 1)]), (0.0, 1.0));
        Ok(())
    }

    #[test]
    fn dissociation_of_water() -> GasResult<()> {
        let mut gas = hydrogen_oxygen()?;
        let res = gas.compute_equilibrium(3000.0, 1e5)?;
        let x = &res.molefracs;
        assert_relative_eq!(x[2], 0.64495, max_relative = 1e-3);
        assert_relative_eq!(x[3], 0.09223, max_relative = 1e-3);
        assert_relative_eq!(x[4], 0.05789, max_relative = 1e-3);
        assert_relative_eq!(x.sum(), 1.0, max_relative = 1e-12);
        assert!(res.iterations < 50);
        assert_relative_eq!(gas.molefracs()[2], x[2], max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn excess_oxygen() -> GasResult<()> {
        let mut gas = Gas::new(GasModel::Ideal, &["H2", "O2", "H2O"], &[0.2, 0.3, 0.5])?;
        let res = gas.compute_equilibrium(1000.0, 1e5)?;
        assert_eq!(res.molefracs[0], 0.0);
        assert_relative_eq!(res.molefracs[1], 2.0 / 9.0, max_relative = 1e-6);
        assert_relative_eq!(res.molefracs[2], 7.0 / 9.0, max_relative = 1e-6);
        Ok(())
    }

    #[test]
    fn lower_pressure_favors_dissociation() -> GasResult<()> {
        let mut gas = hydrogen_oxygen()?;
        let x_high = gas.compute_equilibrium(3000.0, 1e6)?.molefracs;
        let mut gas = hydrogen_oxygen()?;
        let x_low = gas.compute_equilibrium(3000.0, 1e4)?.molefracs;
        assert!(x_low[2] < x_high[2]);
        assert!(x_low[4] > x_high[4]);
        Ok(())
    }

    #[test]
    fn absent_elements_stay_absent() -> GasResult<()> {
        let mut gas = Gas::new(
            GasModel::Ideal,
            &["H2", "O2", "H2O", "OH", "CH4", "CO2", "N2"],
            &[2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        )?;
        let res = gas.compute_equilibrium(2500.0, 1e5)?;
        assert_eq!(res.molefracs[4], 0.0);
        assert_eq!(res.molefracs[5], 0.0);
        assert_eq!(res.molefracs[6], 0.0);
        assert!(res.molefracs[2] > 0.5);
        Ok(())
    }

    #[test]
    fn inert_mixture_is_unchanged() -> GasResult<()> {
        for (species, x0, t) in [
            (&["H2O", "N2"][..], &[0.4, 0.6][..], 1000.0),
            (&["CO2", "N2", "AR"][..], &[0.1, 0.7, 0.2][..], 500.0),
        ] {
            let mut gas = Gas::new(GasModel::Ideal, species, x0)?;
            let res = gas.compute_equilibrium(t, 1e5)?;
            for (x, x0) in res.molefracs.iter().zip(x0) {
                assert_relative_eq!(*x, *x0, max_relative = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn dependent_elements() {
        // H and O only occur as water, N only as N2
        let a = DMatrix::from_row_slice(3, 3, &[2.0, 0.0, 1.0, 0.0, 2.0, 0.0, 2.0, 0.0, 2.0]);
        assert_eq!(independent_columns(&a, &[0, 1]), vec![0, 1]);
        assert_eq!(independent_columns(&a, &[0, 1, 2]), vec![0, 1, 2]);
    }

    #[test]
    fn single_species() -> GasResult<()> {
        let mut gas = Gas::pure(GasModel::Ideal, "N2")?;
        let res = gas.compute_equilibrium(2000.0, 1e5)?;
        assert_eq!(res.molefracs.as_slice(), &[1.0]);
        assert_eq!(res.iterations, 0);
        Ok(())
    }

    #[test]
    fn iteration_limit() -> GasResult<()> {
        use realgas_core::SolverOptions;
        let mut gas = hydrogen_oxygen()?.with_options(SolverOptions::new().max_iter(2));
        let err = gas.compute_equilibrium(3000.0, 1e5).unwrap_err();
        assert!(err.is_convergence_failure());
        // the composition is unchanged after a failure
        assert_relative_eq!(gas.molefracs()[0], 2.0 / 3.0, max_relative = 1e-12);
        Ok(())
    }
}
