//! Methane from [Setzmann and Wagner, 1991](https://doi.org/10.1063/1.555898).
use realgas_core::helmholtz::terms::{IdealTerm, IdealTerms, ResidualTerm, ResidualTerms};
use realgas_core::helmholtz::Partial;
use realgas_core::{FluidConstants, HelmholtzSurface};

pub const METHANE: FluidConstants = FluidConstants {
    name: "methane",
    molar_weight: 0.0160428,
    gas_constant: 8.31451,
    t_crit: 190.564,
    rho_crit: 162.66,
    p_crit: 4.5992e6,
    t_triple: 90.6941,
    t_min: 90.6941,
    t_max: 625.0,
    p_max: 100e6,
    rho_max: 540.0,
};

const VAPOR_PRESSURE: [(f64, f64); 4] = [
    (-6.036219, 1.0),
    (1.409353, 1.5),
    (-0.4945199, 2.0),
    (-1.443048, 4.5),
];

const fn bell(n: f64, t: f64, d: i32, eta: f64, beta: f64, gamma: f64) -> ResidualTerm {
    ResidualTerm::Gaussian {
        n,
        t,
        d,
        eta,
        epsilon: 1.0,
        beta,
        gamma,
    }
}

#[rustfmt::skip]
const RESIDUAL: [ResidualTerm; 40] = [
    ResidualTerm::power(0.4367901028e-1, -0.5, 1),
    ResidualTerm::power(0.6709236199, 0.5, 1),
    ResidualTerm::power(-0.1765577859e1, 1.0, 1),
    ResidualTerm::power(0.8582330241, 0.5, 2),
    ResidualTerm::power(-0.1206513052e1, 1.0, 2),
    ResidualTerm::power(0.5120467220, 1.5, 2),
    ResidualTerm::power(-0.4000010791e-3, 4.5, 2),
    ResidualTerm::power(-0.1247842423e-1, 0.0, 3),
    ResidualTerm::power(0.3100269701e-1, 1.0, 4),
    ResidualTerm::power(0.1754748522e-2, 3.0, 4),
    ResidualTerm::power(-0.3171921605e-5, 1.0, 8),
    ResidualTerm::power(-0.2240346840e-5, 3.0, 9),
    ResidualTerm::power(0.2947056156e-6, 3.0, 10),
    ResidualTerm::exponential(0.1830487909, 0.0, 1, 1),
    ResidualTerm::exponential(0.1511883679, 1.0, 1, 1),
    ResidualTerm::exponential(-0.4289363877, 2.0, 1, 1),
    ResidualTerm::exponential(0.6894002446e-1, 0.0, 2, 1),
    ResidualTerm::exponential(-0.1408313996e-1, 0.0, 4, 1),
    ResidualTerm::exponential(-0.3063054830e-1, 2.0, 5, 1),
    ResidualTerm::exponential(-0.2969906708e-1, 2.0, 6, 1),
    ResidualTerm::exponential(-0.1932040831e-1, 5.0, 1, 2),
    ResidualTerm::exponential(-0.1105739959, 5.0, 2, 2),
    ResidualTerm::exponential(0.9952548995e-1, 5.0, 3, 2),
    ResidualTerm::exponential(0.8548437825e-2, 2.0, 4, 2),
    ResidualTerm::exponential(-0.6150555662e-1, 4.0, 4, 2),
    ResidualTerm::exponential(-0.4291792423e-1, 12.0, 3, 3),
    ResidualTerm::exponential(-0.1813207290e-1, 8.0, 5, 3),
    ResidualTerm::exponential(0.3445904760e-1, 10.0, 5, 3),
    ResidualTerm::exponential(-0.2385919450e-2, 10.0, 8, 3),
    ResidualTerm::exponential(-0.1159094939e-1, 10.0, 2, 4),
    ResidualTerm::exponential(0.6641693602e-1, 14.0, 3, 4),
    ResidualTerm::exponential(-0.2371549590e-1, 12.0, 4, 4),
    ResidualTerm::exponential(-0.3961624905e-1, 18.0, 4, 4),
    ResidualTerm::exponential(-0.1387292044e-1, 22.0, 4, 4),
    ResidualTerm::exponential(0.3389489599e-1, 18.0, 5, 4),
    ResidualTerm::exponential(-0.2927378753e-2, 14.0, 6, 4),
    bell(0.9324799946e-4, 2.0, 2, 20.0, 200.0, 1.07),
    bell(-0.6287171518e1, 0.0, 0, 40.0, 250.0, 1.11),
    bell(0.1271069467e2, 1.0, 0, 40.0, 250.0, 1.11),
    bell(-0.6423953466e1, 2.0, 0, 40.0, 250.0, 1.11),
];

const IDEAL: [IdealTerm; 7] = [
    IdealTerm::Lead {
        a1: 9.91243972,
        a2: -6.33270087,
    },
    IdealTerm::LogTau { a: 3.0016 },
    IdealTerm::PlanckEinstein {
        n: 0.008449,
        t: 3.4004324,
    },
    IdealTerm::PlanckEinstein {
        n: 4.6942,
        t: 10.26951575,
    },
    IdealTerm::PlanckEinstein {
        n: 3.4865,
        t: 20.43932747,
    },
    IdealTerm::PlanckEinstein {
        n: 1.6572,
        t: 29.93744884,
    },
    IdealTerm::PlanckEinstein {
        n: 1.4115,
        t: 79.13351945,
    },
];

/// Helmholtz energy surface of methane.
#[derive(Clone, Debug)]
pub struct Methane {
    residual: ResidualTerms,
    ideal: IdealTerms,
}

impl Methane {
    pub fn new() -> Self {
        Self {
            residual: ResidualTerms::new(RESIDUAL.to_vec()),
            ideal: IdealTerms::new(IDEAL.to_vec()),
        }
    }

    pub fn residual_terms(&self) -> &ResidualTerms {
        &self.residual
    }

    pub fn ideal_terms(&self) -> &IdealTerms {
        &self.ideal
    }
}

impl Default for Methane {
    fn default() -> Self {
        Self::new()
    }
}

impl HelmholtzSurface for Methane {
    fn constants(&self) -> &FluidConstants {
        &METHANE
    }

    fn vapor_pressure_coefficients(&self) -> &'static [(f64, f64)] {
        &VAPOR_PRESSURE
    }

    fn phi0(&mut self, tau: f64, delta: f64, partial: Partial) -> f64 {
        self.ideal.partial(tau, delta, partial)
    }

    fn phir(&mut self, tau: f64, delta: f64, partial: Partial) -> f64 {
        self.residual.partial(tau, delta, partial)
    }
}
