//! Oxygen from [Schmidt and Wagner, 1985](https://doi.org/10.1016/0378-3812(85)87016-3).
//!
//! The ideal gas part follows from the NASA-7 polynomial of O₂ so that
//! caloric properties share the reference state of the mixture layer.
use crate::ideal_gas::Nasa7Record;
use realgas_core::helmholtz::terms::{ResidualTerm, ResidualTerms};
use realgas_core::helmholtz::Partial;
use realgas_core::{FluidConstants, HelmholtzSurface, P_REF};

pub const OXYGEN: FluidConstants = FluidConstants {
    name: "oxygen",
    molar_weight: 0.0319988,
    gas_constant: 8.31434,
    t_crit: 154.581,
    rho_crit: 436.1442,
    p_crit: 5.043e6,
    t_triple: 54.361,
    t_min: 54.361,
    t_max: 1000.0,
    p_max: 82e6,
    rho_max: 1500.0,
};

const OXYGEN_NASA: Nasa7Record = Nasa7Record::new(
    1000.0,
    [
        3.78245636,
        -2.99673416e-3,
        9.84730201e-6,
        -9.68129509e-9,
        3.24372837e-12,
        -1063.94356,
        3.65767573,
    ],
    [
        3.28253784,
        1.48308754e-3,
        -7.57966669e-7,
        2.09470555e-10,
        -2.16717794e-14,
        -1088.45772,
        5.45323129,
    ],
);

const VAPOR_PRESSURE: [(f64, f64); 4] = [
    (-6.0558613, 1.0),
    (1.2083934, 1.5),
    (-1.04471744, 3.0),
    (-1.27673679, 6.0),
];

#[rustfmt::skip]
const RESIDUAL: [ResidualTerm; 32] = [
    ResidualTerm::power(0.3983768749, 0.0, 1),
    ResidualTerm::power(-0.1846157454e1, 1.5, 1),
    ResidualTerm::power(0.4183473197, 2.5, 1),
    ResidualTerm::power(0.2370620711e-1, -0.5, 2),
    ResidualTerm::power(0.9771730573e-1, 1.5, 2),
    ResidualTerm::power(0.3017891294e-1, 2.0, 2),
    ResidualTerm::power(0.2273353212e-1, 0.0, 3),
    ResidualTerm::power(0.1357254086e-1, 1.0, 3),
    ResidualTerm::power(-0.4052698943e-1, 2.5, 3),
    ResidualTerm::power(0.5454628515e-3, 0.0, 6),
    ResidualTerm::power(0.5113182277e-3, 2.0, 7),
    ResidualTerm::power(0.2953466883e-6, 5.0, 7),
    ResidualTerm::power(-0.8687645072e-4, 2.0, 8),
    ResidualTerm::exponential(-0.2127082589, 5.0, 1, 2),
    ResidualTerm::exponential(0.8735941958e-1, 6.0, 1, 2),
    ResidualTerm::exponential(0.1275509190, 3.5, 2, 2),
    ResidualTerm::exponential(-0.9067701064e-1, 5.5, 2, 2),
    ResidualTerm::exponential(-0.3540084206e-1, 3.0, 3, 2),
    ResidualTerm::exponential(-0.3623278059e-1, 7.0, 3, 2),
    ResidualTerm::exponential(0.1327699290e-1, 6.0, 5, 2),
    ResidualTerm::exponential(-0.3254111865e-3, 8.5, 6, 2),
    ResidualTerm::exponential(-0.8313582932e-2, 4.0, 7, 2),
    ResidualTerm::exponential(0.2124570559e-2, 6.5, 8, 2),
    ResidualTerm::exponential(-0.8325206232e-3, 5.5, 10, 2),
    ResidualTerm::exponential(-0.2626173276e-4, 22.0, 2, 4),
    ResidualTerm::exponential(0.2599581482e-2, 11.0, 3, 4),
    ResidualTerm::exponential(0.9984649663e-2, 18.0, 3, 4),
    ResidualTerm::exponential(0.2199923153e-2, 11.0, 4, 4),
    ResidualTerm::exponential(-0.2591350486e-1, 23.0, 4, 4),
    ResidualTerm::exponential(-0.1259630848, 17.0, 5, 4),
    ResidualTerm::exponential(0.1478355637, 18.0, 5, 4),
    ResidualTerm::exponential(-0.1011251078e-1, 23.0, 5, 4),
];

/// Helmholtz energy surface of oxygen.
#[derive(Clone, Debug)]
pub struct Oxygen {
    residual: ResidualTerms,
}

impl Oxygen {
    pub fn new() -> Self {
        Self {
            residual: ResidualTerms::new(RESIDUAL.to_vec()),
        }
    }

    pub fn residual_terms(&self) -> &ResidualTerms {
        &self.residual
    }
}

impl Default for Oxygen {
    fn default() -> Self {
        Self::new()
    }
}

impl HelmholtzSurface for Oxygen {
    fn constants(&self) -> &FluidConstants {
        &OXYGEN
    }

    fn vapor_pressure_coefficients(&self) -> &'static [(f64, f64)] {
        &VAPOR_PRESSURE
    }

    // phi0 = h/(RT) - s(T, p0)/R - 1 + ln(rho R T / p0)
    fn phi0(&mut self, tau: f64, delta: f64, partial: Partial) -> f64 {
        let t = OXYGEN.t_crit / tau;
        match partial {
            Partial::Value => {
                let p_ideal = delta * OXYGEN.rho_crit * OXYGEN.specific_gas_constant() * t;
                OXYGEN_NASA.g(t) - 1.0 + (p_ideal / P_REF).ln()
            }
            Partial::Delta => delta.recip(),
            Partial::DeltaDelta => -delta.powi(-2),
            Partial::Tau => (OXYGEN_NASA.h(t) - 1.0) / tau,
            Partial::TauTau => -(OXYGEN_NASA.cp(t) - 1.0) / (tau * tau),
            Partial::DeltaTau => 0.0,
        }
    }

    fn phir(&mut self, tau: f64, delta: f64, partial: Partial) -> f64 {
        self.residual.partial(tau, delta, partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use realgas_core::{GasResult, HelmholtzEos};

    #[test]
    fn liquid_and_gas_density() -> GasResult<()> {
        let mut eos = HelmholtzEos::new(Oxygen::new());
        assert_relative_eq!(eos.rho(55.0, 1e6)?, 1304.569, max_relative = 1e-4);
        assert_relative_eq!(eos.rho(1000.0, 1e6)?, 3.8388, max_relative = 1e-3);
        Ok(())
    }

    #[test]
    fn ideal_part_matches_nasa_polynomial() -> GasResult<()> {
        let mut eos = HelmholtzEos::new(Oxygen::new());
        let t = 300.0;
        let cp0 = OXYGEN_NASA.cp(t) * OXYGEN.specific_gas_constant();
        assert_relative_eq!(eos.ideal_cp(t)?, cp0, max_relative = 1e-12);
        assert_relative_eq!(eos.cp(t, 1.0)?, cp0, max_relative = 1e-4);
        Ok(())
    }

    #[test]
    fn ideal_tau_derivatives() {
        let mut o2 = Oxygen::new();
        let (tau, delta, h) = (0.6, 0.01, 1e-5);
        let fd = (o2.phi0(tau + h, delta, Partial::Value) - o2.phi0(tau - h, delta, Partial::Value))
            / (2.0 * h);
        assert_relative_eq!(o2.phi0(tau, delta, Partial::Tau), fd, max_relative = 1e-7);
        let fd = (o2.phi0(tau + h, delta, Partial::Tau) - o2.phi0(tau - h, delta, Partial::Tau))
            / (2.0 * h);
        assert_relative_eq!(o2.phi0(tau, delta, Partial::TauTau), fd, max_relative = 1e-6);
    }
}
