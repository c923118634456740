//! Normal hydrogen and parahydrogen from
//! [Leachman et al., 2009](https://doi.org/10.1063/1.3160306).
use realgas_core::helmholtz::terms::{IdealTerm, IdealTerms, ResidualTerm, ResidualTerms};
use realgas_core::helmholtz::Partial;
use realgas_core::{FluidConstants, HelmholtzSurface};

const MOLAR_WEIGHT: f64 = 0.00201588;
const GAS_CONSTANT: f64 = 8.314472;

pub const NORMAL_HYDROGEN: FluidConstants = FluidConstants {
    name: "hydrogen",
    molar_weight: MOLAR_WEIGHT,
    gas_constant: GAS_CONSTANT,
    t_crit: 33.145,
    rho_crit: 15.508 * 2.01588,
    p_crit: 1.2964e6,
    t_triple: 13.957,
    t_min: 13.957,
    t_max: 1000.0,
    p_max: 100e6,
    rho_max: 115.0,
};

pub const PARAHYDROGEN: FluidConstants = FluidConstants {
    name: "parahydrogen",
    molar_weight: MOLAR_WEIGHT,
    gas_constant: GAS_CONSTANT,
    t_crit: 32.938,
    rho_crit: 15.538 * 2.01588,
    p_crit: 1.2858e6,
    t_triple: 13.8033,
    t_min: 13.8033,
    t_max: 1000.0,
    p_max: 100e6,
    rho_max: 115.0,
};

/// Spin isomer composition of hydrogen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinIsomer {
    /// equilibrium mixture at room temperature, 75 % ortho and 25 % para
    Normal,
    Para,
}

const VAPOR_PRESSURE_NORMAL: [(f64, f64); 4] = [
    (-4.89789, 1.0),
    (0.988558, 1.5),
    (0.349689, 2.0),
    (0.499356, 2.85),
];

const VAPOR_PRESSURE_PARA: [(f64, f64); 4] = [
    (-4.87767, 1.0),
    (1.03359, 1.5),
    (0.82668, 2.65),
    (-0.129412, 7.4),
];

// Gaussian bells are published as exp(phi (delta - D)² + beta (tau - gamma)²)
const fn bell(n: f64, t: f64, d: i32, phi: f64, beta: f64, gamma: f64, epsilon: f64) -> ResidualTerm {
    ResidualTerm::Gaussian {
        n,
        t,
        d,
        eta: -phi,
        epsilon,
        beta: -beta,
        gamma,
    }
}

#[rustfmt::skip]
const RESIDUAL_NORMAL: [ResidualTerm; 14] = [
    ResidualTerm::power(-6.93643, 0.6844, 1),
    ResidualTerm::power(0.01, 1.0, 4),
    ResidualTerm::power(2.1101, 0.989, 1),
    ResidualTerm::power(4.52059, 0.489, 1),
    ResidualTerm::power(0.732564, 0.803, 2),
    ResidualTerm::power(-1.34086, 1.1444, 2),
    ResidualTerm::power(0.130985, 1.409, 3),
    ResidualTerm::exponential(-0.777414, 1.754, 1, 1),
    ResidualTerm::exponential(0.351944, 1.311, 3, 1),
    bell(-0.0211716, 4.187, 2, -1.685, -0.171, 0.7164, 1.506),
    bell(0.0226312, 5.646, 1, -0.489, -0.2245, 1.3444, 0.156),
    bell(0.032187, 0.791, 3, -0.103, -0.1304, 1.4517, 1.736),
    bell(-0.0231752, 7.249, 1, -2.506, -0.2785, 0.7204, 0.67),
    bell(0.0557346, 2.986, 1, -1.607, -0.3967, 1.5445, 1.662),
];

#[rustfmt::skip]
const RESIDUAL_PARA: [ResidualTerm; 14] = [
    ResidualTerm::power(-7.33375, 0.6855, 1),
    ResidualTerm::power(0.01, 1.0, 4),
    ResidualTerm::power(2.60375, 1.0, 1),
    ResidualTerm::power(4.66279, 0.489, 1),
    ResidualTerm::power(0.68239, 0.774, 2),
    ResidualTerm::power(-1.47078, 1.133, 2),
    ResidualTerm::power(0.135801, 1.386, 3),
    ResidualTerm::exponential(-1.05327, 1.619, 1, 1),
    ResidualTerm::exponential(0.328239, 1.162, 3, 1),
    bell(-0.0577833, 3.96, 2, -1.7437, -0.194, 0.8048, 1.5487),
    bell(0.0449743, 5.276, 1, -0.5516, -0.2019, 1.5248, 0.1785),
    bell(0.0703464, 0.99, 3, -0.0634, -0.0301, 0.6648, 1.28),
    bell(-0.0401766, 6.791, 1, -2.1341, -0.2383, 0.6832, 0.6319),
    bell(0.11951, 3.19, 1, -1.777, -0.3253, 1.493, 1.7104),
];

const IDEAL_NORMAL: [IdealTerm; 7] = [
    IdealTerm::Lead {
        a1: -1.4579856475,
        a2: 1.888076782,
    },
    IdealTerm::LogTau { a: 1.5 },
    IdealTerm::PlanckEinstein {
        n: 1.616,
        t: 16.0205159149,
    },
    IdealTerm::PlanckEinstein {
        n: -0.4117,
        t: 22.6580178006,
    },
    IdealTerm::PlanckEinstein {
        n: -0.792,
        t: 60.0090511389,
    },
    IdealTerm::PlanckEinstein {
        n: 0.758,
        t: 74.9434303817,
    },
    IdealTerm::PlanckEinstein {
        n: 1.217,
        t: 206.9392065168,
    },
];

const IDEAL_PARA: [IdealTerm; 9] = [
    IdealTerm::Lead {
        a1: -1.4485891134,
        a2: 1.884521239,
    },
    IdealTerm::LogTau { a: 1.5 },
    IdealTerm::PlanckEinstein {
        n: 4.30256,
        t: 15.1496751472,
    },
    IdealTerm::PlanckEinstein {
        n: 13.0289,
        t: 25.0925982148,
    },
    IdealTerm::PlanckEinstein {
        n: -47.7365,
        t: 29.4735563787,
    },
    IdealTerm::PlanckEinstein {
        n: 50.0013,
        t: 35.4059141417,
    },
    IdealTerm::PlanckEinstein {
        n: -18.6261,
        t: 40.724998482,
    },
    IdealTerm::PlanckEinstein {
        n: 0.993973,
        t: 163.7925799988,
    },
    IdealTerm::PlanckEinstein {
        n: 0.536078,
        t: 309.2173173842,
    },
];

/// Helmholtz energy surface of hydrogen.
#[derive(Clone, Debug)]
pub struct Hydrogen {
    isomer: SpinIsomer,
    residual: ResidualTerms,
    ideal: IdealTerms,
}

impl Hydrogen {
    pub fn new(isomer: SpinIsomer) -> Self {
        let (residual, ideal) = match isomer {
            SpinIsomer::Normal => (RESIDUAL_NORMAL.to_vec(), IDEAL_NORMAL.to_vec()),
            SpinIsomer::Para => (RESIDUAL_PARA.to_vec(), IDEAL_PARA.to_vec()),
        };
        Self {
            isomer,
            residual: ResidualTerms::new(residual),
            ideal: IdealTerms::new(ideal),
        }
    }

    pub fn normal() -> Self {
        Self::new(SpinIsomer::Normal)
    }

    pub fn para() -> Self {
        Self::new(SpinIsomer::Para)
    }

    pub fn isomer(&self) -> SpinIsomer {
        self.isomer
    }

    pub fn residual_terms(&self) -> &ResidualTerms {
        &self.residual
    }

    pub fn ideal_terms(&self) -> &IdealTerms {
        &self.ideal
    }
}

impl HelmholtzSurface for Hydrogen {
    fn constants(&self) -> &FluidConstants {
        match self.isomer {
            SpinIsomer::Normal => &NORMAL_HYDROGEN,
            SpinIsomer::Para => &PARAHYDROGEN,
        }
    }

    fn vapor_pressure_coefficients(&self) -> &'static [(f64, f64)] {
        match self.isomer {
            SpinIsomer::Normal => &VAPOR_PRESSURE_NORMAL,
            SpinIsomer::Para => &VAPOR_PRESSURE_PARA,
        }
    }

    fn phi0(&mut self, tau: f64, delta: f64, partial: Partial) -> f64 {
        self.ideal.partial(tau, delta, partial)
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
    fn normal_boiling_point() -> GasResult<()> {
        let mut eos = HelmholtzEos::new(Hydrogen::normal());
        assert_relative_eq!(eos.p_vap(20.369)?, 101328.0, max_relative = 2e-3);
        let sat = eos.saturation(20.369)?;
        assert_relative_eq!(sat.liquid_density, 70.848, max_relative = 2e-3);
        assert_relative_eq!(sat.pressure, 101325.0, max_relative = 2e-3);
        Ok(())
    }

    #[test]
    fn parahydrogen_boiling_point() -> GasResult<()> {
        let mut eos = HelmholtzEos::new(Hydrogen::para());
        assert_relative_eq!(eos.p_vap(20.271)?, 101317.0, max_relative = 2e-3);
        assert_relative_eq!(eos.t_vap(101325.0)?, 20.271, epsilon = 0.02);
        Ok(())
    }

    #[test]
    fn isomers_differ_at_low_temperature() -> GasResult<()> {
        let mut normal = HelmholtzEos::new(Hydrogen::normal());
        let mut para = HelmholtzEos::new(Hydrogen::para());
        let (cp_n, cp_p) = (normal.ideal_cp(100.0)?, para.ideal_cp(100.0)?);
        assert!((cp_n - cp_p).abs() / cp_n > 0.01);
        assert_relative_eq!(normal.ideal_cp(800.0)?, para.ideal_cp(800.0)?, max_relative = 5e-3);
        Ok(())
    }
}
