//! Viscosity and thermal conductivity of oxygen from
//! [Lemmon and Jacobsen, 2004](https://doi.org/10.1023/B:IJOT.0000022327.04529.f3).
use super::TransportProperties;
use crate::multiparameter::{Oxygen, OXYGEN};
use realgas_core::{GasResult, HelmholtzEos};
use std::f64::consts::PI;

const KB: f64 = 1.380649e-23;

// dilute gas
const SIGMA: f64 = 0.3428;
const EPSILON_K: f64 = 118.5;
const OMEGA: [f64; 5] = [0.431, -0.4623, 0.08406, 0.005341, -0.00331];

// residual contributions (N, t, d, l)
const VISCOSITY: [(f64, f64, i32, i32); 5] = [
    (17.67, 0.05, 1, 0),
    (0.4042, 0.0, 5, 0),
    (0.0001077, 2.1, 12, 0),
    (0.3510, 0.0, 8, 1),
    (-13.67, 0.5, 1, 2),
];
const CONDUCTIVITY: [(f64, f64, i32, i32); 6] = [
    (15.31, 0.0, 1, 0),
    (8.898, 0.0, 3, 0),
    (-0.7336, 0.3, 4, 0),
    (6.728, 4.3, 5, 2),
    (-4.374, 0.5, 7, 2),
    (-0.4747, 1.8, 10, 2),
];

// critical enhancement
const XI0: f64 = 0.24e-9;
const GAMMA_CAP: f64 = 0.055;
const Q_D_INV: f64 = 0.51e-9;
const T_REF: f64 = 309.162;
const NU: f64 = 0.63;
const GAMMA: f64 = 1.2415;
const R0: f64 = 1.01;

fn residual_sum(terms: &[(f64, f64, i32, i32)], tau: f64, delta: f64) -> f64 {
    terms
        .iter()
        .map(|&(n, t, d, l)| {
            let e = if l == 0 { 1.0 } else { (-delta.powi(l)).exp() };
            n * tau.powf(t) * delta.powi(d) * e
        })
        .sum()
}

/// Dilute gas viscosity in µPa s.
fn dilute_viscosity(t: f64) -> f64 {
    let ln_t = (t / EPSILON_K).ln();
    let omega = OMEGA
        .iter()
        .rev()
        .fold(0.0, |acc, b| acc * ln_t + b)
        .exp();
    0.0266958 * (OXYGEN.molar_weight * 1e3 * t).sqrt() / (SIGMA * SIGMA * omega)
}

/// Viscosity in Pa s at temperature and density.
pub fn viscosity(t: f64, rho: f64) -> f64 {
    let tau = OXYGEN.t_crit / t;
    let delta = rho / OXYGEN.rho_crit;
    (dilute_viscosity(t) + residual_sum(&VISCOSITY, tau, delta)) * 1e-6
}

/// Background (dilute gas and residual) thermal conductivity in W/(m K).
pub fn background_conductivity(t: f64, rho: f64) -> f64 {
    let tau = OXYGEN.t_crit / t;
    let delta = rho / OXYGEN.rho_crit;
    let dilute = 1.036 * dilute_viscosity(t) + 6.283 * tau.powf(-0.9) - 4.262 * tau.powf(-0.6);
    (dilute + residual_sum(&CONDUCTIVITY, tau, delta)) * 1e-3
}

/// Simplified Olchowy-Sengers crossover term in W/(m K).
fn critical_enhancement(
    eos: &mut HelmholtzEos<Oxygen>,
    t: f64,
    p: f64,
    viscosity: f64,
) -> GasResult<f64> {
    let v = eos.v(t, p)?;
    let rho = v.recip();
    let cp = eos.cp(t, p)?;
    let cv = eos.cv(t, p)?;
    let chi = |dpdv: f64| -OXYGEN.p_crit * rho / OXYGEN.rho_crit.powi(2) / (v * v * dpdv);
    let chi_t = chi(eos.dpdv(t, v)?);
    let chi_ref = chi(eos.dpdv(T_REF, v)?);
    let delta_chi = chi_t - chi_ref * T_REF / t;
    if delta_chi <= 0.0 {
        return Ok(0.0);
    }
    let xi = XI0 * (delta_chi / GAMMA_CAP).powf(NU / GAMMA);
    let y = xi / Q_D_INV;
    let omega = 2.0 / PI * ((cp - cv) / cp * y.atan() + cv / cp * y);
    let omega0 =
        2.0 / PI * (1.0 - (-1.0 / (y.recip() + y * y / 3.0 * (OXYGEN.rho_crit / rho).powi(2))).exp());
    Ok(rho * cp * R0 * KB * t / (6.0 * PI * viscosity * xi) * (omega - omega0))
}

impl TransportProperties for HelmholtzEos<Oxygen> {
    fn viscosity(&mut self, t: f64, p: f64) -> GasResult<f64> {
        let rho = self.rho(t, p)?;
        Ok(viscosity(t, rho))
    }

    fn thermal_conductivity(&mut self, t: f64, p: f64) -> GasResult<f64> {
        let rho = self.rho(t, p)?;
        let eta = viscosity(t, rho);
        let enhancement = critical_enhancement(self, t, p, eta)?;
        Ok(background_conductivity(t, rho) + enhancement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dilute_gas() -> GasResult<()> {
        let mut eos = HelmholtzEos::new(Oxygen::new());
        assert_relative_eq!(eos.viscosity(300.0, 1e5)?, 20.65e-6, max_relative = 2e-3);
        assert_relative_eq!(
            eos.thermal_conductivity(300.0, 1e5)?,
            26.49e-3,
            max_relative = 5e-3
        );
        Ok(())
    }

    #[test]
    fn saturated_liquid() {
        assert_relative_eq!(viscosity(90.19, 1141.17), 194.7e-6, max_relative = 5e-3);
        assert_relative_eq!(
            background_conductivity(90.19, 1141.17),
            150.8e-3,
            max_relative = 5e-3
        );
    }

    #[test]
    fn enhancement_near_critical_point() -> GasResult<()> {
        let mut eos = HelmholtzEos::new(Oxygen::new());
        let (t, p) = (160.0, 5.5e6);
        let rho = eos.rho(t, p)?;
        let total = eos.thermal_conductivity(t, p)?;
        assert!(total > background_conductivity(t, rho));
        Ok(())
    }
}
