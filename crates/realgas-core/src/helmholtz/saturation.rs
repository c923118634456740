use super::{HelmholtzEos, HelmholtzSurface, Partial};
use crate::errors::{GasError, GasResult};
use crate::IterationBudget;

const MAX_ITER_SATURATION: usize = 50;
const TOL_SATURATION: f64 = 1e-10;
const TRIVIAL_REL_DEVIATION: f64 = 1e-5;

/// Vapor and liquid of a pure fluid in phase equilibrium.
#[derive(Clone, Copy, Debug)]
pub struct Saturation {
    /// temperature in K
    pub temperature: f64,
    /// pressure in Pa
    pub pressure: f64,
    /// vapor density in kg/m³
    pub vapor_density: f64,
    /// liquid density in kg/m³
    pub liquid_density: f64,
}

impl<S: HelmholtzSurface> HelmholtzEos<S> {
    /// Phase equilibrium at temperature `t` from equal pressures and Gibbs
    /// energies of both phases.
    ///
    /// The iteration starts at the ancillary vapor pressure and does not
    /// change the current state of the equation of state.
    pub fn saturation(&mut self, t: f64) -> GasResult<Saturation> {
        self.check_temperature(t)?;
        let mut pressure = self.p_vap(t)?;
        let rho_crit = self.constants.rho_crit;
        let tau = self.constants.t_crit / t;
        let rt = self.r * t;
        let mut vapor_density = self.density_iteration(t, pressure, false)? * rho_crit;
        let mut liquid_density = self.density_iteration(t, pressure, true)? * rho_crit;

        let (max_iter, tol, verbosity) = self
            .options
            .unwrap_or(MAX_ITER_SATURATION, TOL_SATURATION);
        let mut budget = IterationBudget::new("HelmholtzEos::saturation", max_iter, &self.options);

        log_iter!(
            verbosity,
            " iter |    residual    |   pressure   | liquid density | vapor density | Newton steps"
        );
        log_iter!(verbosity, "{:-<87}", "");
        log_iter!(
            verbosity,
            " {:4} |                | {:12.4} | {:14.6} | {:13.6} |",
            0,
            pressure,
            liquid_density,
            vapor_density
        );

        let mut res = f64::INFINITY;
        loop {
            let i = budget.tick(res)?;
            let (phir_l, p_l, p_rho_l) = self.phir_p_dpdrho(tau, liquid_density / rho_crit);
            let (phir_v, p_v, p_rho_v) = self.phir_p_dpdrho(tau, vapor_density / rho_crit);

            // Estimate the new pressure
            let v_v = vapor_density.recip();
            let v_l = liquid_density.recip();
            let delta_v = v_v - v_l;
            let delta_a = rt * (phir_v - phir_l + (vapor_density / liquid_density).ln());
            let mut p_new = -delta_a / delta_v;

            // If the pressure becomes negative, assume the gas phase is ideal.
            if p_new.is_sign_negative() {
                p_new = p_v * ((-delta_a - p_v * v_v) / rt).exp();
            }

            // Improve the estimate by exploiting the almost ideal behavior of the gas phase
            let mut newton_iter = 0;
            let newton_tol = pressure * delta_v * tol;
            for _ in 0..20 {
                let p_frac = p_new / pressure;
                let f = p_new * delta_v + delta_a + (p_frac.ln() + 1.0 - p_frac) * rt;
                let df_dp = delta_v + (1.0 / p_new - 1.0 / pressure) * rt;
                p_new -= f / df_dp;
                newton_iter += 1;
                if f.abs() < newton_tol {
                    break;
                }
            }

            if !p_new.is_finite() {
                return Err(GasError::IterationFailed(
                    "HelmholtzEos::saturation".to_owned(),
                ));
            }

            liquid_density += (p_new - p_l) / p_rho_l;
            vapor_density += (p_new - p_v) / p_rho_v;
            if (vapor_density / liquid_density - 1.0).abs() < TRIVIAL_REL_DEVIATION {
                return Err(GasError::TrivialSolution);
            }

            res = (p_new - pressure).abs();
            log_iter!(
                verbosity,
                " {:4} | {:14.8e} | {:12.4} | {:14.6} | {:13.6} | {}",
                i,
                res,
                p_new,
                liquid_density,
                vapor_density,
                newton_iter
            );
            if res < pressure * tol {
                log_result!(
                    verbosity,
                    "HelmholtzEos::saturation: calculation converged in {} step(s)\n",
                    i
                );
                return Ok(Saturation {
                    temperature: t,
                    pressure: p_new,
                    vapor_density,
                    liquid_density,
                });
            }
            pressure = p_new;
        }
    }

    fn phir_p_dpdrho(&mut self, tau: f64, delta: f64) -> (f64, f64, f64) {
        let phir = self.surface.phir(tau, delta, Partial::Value);
        let (p, dpdrho) = self.p_dpdrho(tau, delta);
        (phir, p, dpdrho)
    }
}
