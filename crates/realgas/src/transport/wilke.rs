//! Mixing rules for dilute gas viscosity and thermal conductivity.
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Tabulated interaction function `phi_ij(T) = c0 + c1 T + c2 T²` of a
/// pair of species.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct ViscosityInteractionRecord {
    pub c0: f64,
    #[serde(default)]
    pub c1: f64,
    #[serde(default)]
    pub c2: f64,
}

impl ViscosityInteractionRecord {
    pub fn new(c0: f64, c1: f64, c2: f64) -> Self {
        Self { c0, c1, c2 }
    }

    pub fn phi(&self, t: f64) -> f64 {
        self.c0 + t * (self.c1 + t * self.c2)
    }
}

const MASON_SAXENA: f64 = 1.065;

/// Interaction function of [Wilke, 1950](https://doi.org/10.1063/1.1747673).
pub fn wilke_phi(mu_i: f64, mu_j: f64, m_i: f64, m_j: f64) -> f64 {
    let num = 1.0 + (mu_i / mu_j).sqrt() * (m_j / m_i).powf(0.25);
    num * num / (8.0 * (1.0 + m_i / m_j)).sqrt()
}

/// Matrix of interaction functions.
///
/// Tabulated values `phi_ij` take precedence, `phi_ji` then follows from
/// `phi_ji = phi_ij mu_j/mu_i M_i/M_j`.
pub fn interaction_matrix<F>(
    viscosities: &DVector<f64>,
    molar_weights: &DVector<f64>,
    tabulated: F,
) -> DMatrix<f64>
where
    F: Fn(usize, usize) -> Option<f64>,
{
    let n = viscosities.len();
    let (mu, m) = (viscosities, molar_weights);
    DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            return 1.0;
        }
        if let Some(phi) = tabulated(i, j) {
            phi
        } else if let Some(phi) = tabulated(j, i) {
            phi * mu[i] / mu[j] * m[j] / m[i]
        } else {
            wilke_phi(mu[i], mu[j], m[i], m[j])
        }
    })
}

/// `sum_i x_i f_i / sum_j x_j phi_ij` for the species present.
fn mix(molefracs: &DVector<f64>, values: &DVector<f64>, phi: &DMatrix<f64>) -> f64 {
    (0..molefracs.len())
        .filter(|&i| molefracs[i] > 0.0)
        .map(|i| {
            let den: f64 = (0..molefracs.len()).map(|j| molefracs[j] * phi[(i, j)]).sum();
            molefracs[i] * values[i] / den
        })
        .sum()
}

/// Wilke mixture viscosity.
pub fn mixture_viscosity(
    molefracs: &DVector<f64>,
    viscosities: &DVector<f64>,
    phi: &DMatrix<f64>,
) -> f64 {
    mix(molefracs, viscosities, phi)
}

/// Mixture thermal conductivity of
/// [Mason and Saxena, 1958](https://doi.org/10.1063/1.1724352).
///
/// The off-diagonal viscosity interaction functions are scaled by 1.065.
pub fn mixture_conductivity(
    molefracs: &DVector<f64>,
    conductivities: &DVector<f64>,
    phi: &DMatrix<f64>,
) -> f64 {
    let phi = phi.map_with_location(|i, j, p| if i == j { p } else { MASON_SAXENA * p });
    mix(molefracs, conductivities, &phi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    #[test]
    fn identical_species() {
        let mu = dvector![2e-5, 2e-5];
        let m = dvector![28.0, 28.0];
        let phi = interaction_matrix(&mu, &m, |_, _| None);
        assert_relative_eq!(phi[(0, 1)], 1.0, max_relative = 1e-12);
        assert_relative_eq!(
            mixture_viscosity(&dvector![0.3, 0.7], &mu, &phi),
            2e-5,
            max_relative = 1e-12
        );
    }

    #[test]
    fn pure_limit() {
        let mu = dvector![2e-5, 1e-5];
        let m = dvector![32.0, 2.0];
        let phi = interaction_matrix(&mu, &m, |_, _| None);
        assert_relative_eq!(mixture_viscosity(&dvector![1.0, 0.0], &mu, &phi), 2e-5);
        assert_relative_eq!(mixture_viscosity(&dvector![0.0, 1.0], &mu, &phi), 1e-5);
    }

    #[test]
    fn conductivity_interaction() {
        let mu = dvector![2e-5, 1e-5];
        let m = dvector![32.0, 2.0];
        let lambda = dvector![0.03, 0.02];
        let phi = interaction_matrix(&mu, &m, |_, _| None);
        let x = dvector![0.5, 0.5];
        let expected = 0.03 / (1.0 + 1.065 * phi[(0, 1)]) + 0.02 / (1.0 + 1.065 * phi[(1, 0)]);
        assert_relative_eq!(mixture_conductivity(&x, &lambda, &phi), expected, max_relative = 1e-12);
        assert!(mixture_conductivity(&x, &lambda, &phi) < mixture_viscosity(&x, &lambda, &phi));
        assert_relative_eq!(mixture_conductivity(&dvector![0.0, 1.0], &lambda, &phi), 0.02);
    }

    #[test]
    fn tabulated_interaction() {
        let mu = dvector![2e-5, 1e-5];
        let m = dvector![32.0, 2.0];
        let record = ViscosityInteractionRecord::new(0.5, 1e-3, 0.0);
        let phi = interaction_matrix(&mu, &m, |i, j| {
            if (i, j) == (0, 1) {
                Some(record.phi(300.0))
            } else {
                None
            }
        });
        assert_relative_eq!(phi[(0, 1)], 0.8);
        assert_relative_eq!(phi[(1, 0)], 0.8 * 0.5 * 16.0);
    }
}
