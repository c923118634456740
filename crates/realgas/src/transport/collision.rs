//! Dilute gas transport properties from kinetic theory.
use serde::{Deserialize, Serialize};

/// Lennard-Jones potential parameters of a species.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LennardJonesRecord {
    /// collision diameter in Å
    pub sigma: f64,
    /// well depth divided by the Boltzmann constant in K
    pub epsilon_k: f64,
}

impl LennardJonesRecord {
    pub fn new(sigma: f64, epsilon_k: f64) -> Self {
        Self { sigma, epsilon_k }
    }

    /// Chapman-Enskog viscosity in Pa s.
    ///
    /// `molarweight` in g/mol.
    pub fn viscosity(&self, molarweight: f64, t: f64) -> f64 {
        let omega = collision_integral_22(t / self.epsilon_k);
        2.669e-6 * (molarweight * t).sqrt() / (self.sigma * self.sigma * omega)
    }
}

/// Reduced collision integral Ω(2,2) from the fit of
/// [Neufeld et al., 1972](https://doi.org/10.1063/1.1678363).
pub fn collision_integral_22(t_star: f64) -> f64 {
    1.16145 * t_star.powf(-0.14874)
        + 0.52487 * (-0.77320 * t_star).exp()
        + 2.16178 * (-2.43787 * t_star).exp()
}

/// Modified Eucken thermal conductivity in W/(m K).
///
/// `cp` and `r` are mass specific.
pub fn eucken_conductivity(viscosity: f64, cp: f64, r: f64) -> f64 {
    viscosity * (cp + 1.25 * r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn neufeld_fit() {
        // tabulated values of Hirschfelder, Curtiss and Bird
        assert_relative_eq!(collision_integral_22(1.0), 1.587, max_relative = 5e-3);
        assert_relative_eq!(collision_integral_22(3.0), 1.039, max_relative = 2e-3);
        assert_relative_eq!(collision_integral_22(10.0), 0.8242, max_relative = 2e-3);
    }

    #[test]
    fn nitrogen_viscosity() {
        let n2 = LennardJonesRecord::new(3.621, 97.53);
        // 17.9 µPa s at 300 K
        assert_relative_eq!(n2.viscosity(28.0134, 300.0), 17.9e-6, max_relative = 0.02);
    }
}
