//! Multiparameter equations of state of hydrogen, oxygen and methane.
//!
//! Each fluid implements [HelmholtzSurface](realgas_core::HelmholtzSurface)
//! on top of the term tables of `realgas_core`. [HelmholtzFluid] closes the set of fluids into an enum
//! so that mixtures and pure fluids can share one accessor surface
//! without dynamic dispatch.
use realgas_core::{FluidConstants, GasResult, HelmholtzEos, Saturation, SolverOptions};
use serde::{Deserialize, Serialize};
use std::fmt;

mod hydrogen;
mod methane;
mod oxygen;
pub use hydrogen::{Hydrogen, SpinIsomer, NORMAL_HYDROGEN, PARAHYDROGEN};
pub use methane::{Methane, METHANE};
pub use oxygen::{Oxygen, OXYGEN};

/// Fluids with a multiparameter equation of state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fluid {
    Hydrogen,
    ParaHydrogen,
    Oxygen,
    Methane,
}

impl Fluid {
    /// Formula of the species in the species database.
    pub fn formula(self) -> &'static str {
        match self {
            Self::Hydrogen | Self::ParaHydrogen => "H2",
            Self::Oxygen => "O2",
            Self::Methane => "CH4",
        }
    }

    pub fn constants(self) -> &'static FluidConstants {
        match self {
            Self::Hydrogen => &NORMAL_HYDROGEN,
            Self::ParaHydrogen => &PARAHYDROGEN,
            Self::Oxygen => &OXYGEN,
            Self::Methane => &METHANE,
        }
    }
}

impl fmt::Display for Fluid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constants().name)
    }
}

/// A multiparameter equation of state of one of the [Fluid]s.
#[derive(Clone, Debug)]
pub enum HelmholtzFluid {
    Hydrogen(HelmholtzEos<Hydrogen>),
    Oxygen(HelmholtzEos<Oxygen>),
    Methane(HelmholtzEos<Methane>),
}

macro_rules! dispatch {
    ($self:expr, $eos:ident => $body:expr) => {
        match $self {
            HelmholtzFluid::Hydrogen($eos) => $body,
            HelmholtzFluid::Oxygen($eos) => $body,
            HelmholtzFluid::Methane($eos) => $body,
        }
    };
}

macro_rules! impl_state_functions {
    ($($(#[$attr:meta])* $name:ident($a:ident, $b:ident)),* $(,)?) => {
        $(
            $(#[$attr])*
            pub fn $name(&mut self, $a: f64, $b: f64) -> GasResult<f64> {
                dispatch!(self, eos => eos.$name($a, $b))
            }
        )*
    };
}

impl HelmholtzFluid {
    pub fn new(fluid: Fluid) -> Self {
        match fluid {
            Fluid::Hydrogen => Self::Hydrogen(HelmholtzEos::new(Hydrogen::normal())),
            Fluid::ParaHydrogen => Self::Hydrogen(HelmholtzEos::new(Hydrogen::para())),
            Fluid::Oxygen => Self::Oxygen(HelmholtzEos::new(Oxygen::new())),
            Fluid::Methane => Self::Methane(HelmholtzEos::new(Methane::new())),
        }
    }

    pub fn with_options(self, options: SolverOptions) -> Self {
        match self {
            Self::Hydrogen(eos) => Self::Hydrogen(eos.with_options(options)),
            Self::Oxygen(eos) => Self::Oxygen(eos.with_options(options)),
            Self::Methane(eos) => Self::Methane(eos.with_options(options)),
        }
    }

    pub fn fluid(&self) -> Fluid {
        match self {
            Self::Hydrogen(eos) => match eos.surface().isomer() {
                SpinIsomer::Normal => Fluid::Hydrogen,
                SpinIsomer::Para => Fluid::ParaHydrogen,
            },
            Self::Oxygen(_) => Fluid::Oxygen,
            Self::Methane(_) => Fluid::Methane,
        }
    }

    pub fn constants(&self) -> &FluidConstants {
        dispatch!(self, eos => eos.constants())
    }

    /// Specific gas constant in J/(kg K).
    pub fn gas_constant(&self) -> f64 {
        dispatch!(self, eos => eos.gas_constant())
    }

    pub fn update_tv(&mut self, t: f64, v: f64) -> GasResult<()> {
        dispatch!(self, eos => eos.update_tv(t, v))
    }

    pub fn update_tp(&mut self, t: f64, p: f64) -> GasResult<()> {
        dispatch!(self, eos => eos.update_tp(t, p))
    }

    impl_state_functions!(
        /// Pressure in Pa.
        p(t, v),
        /// Specific volume in m³/kg.
        v(t, p),
        /// Density in kg/m³.
        rho(t, p),
        /// Temperature in K.
        t(p, v),
        dpdv(t, v),
        dpdt(t, v),
        dvdt(t, v),
        cv(t, p),
        cp(t, p),
        gamma(t, p),
        s(t, p),
        h(t, p),
        u(t, p),
        /// Speed of sound in m/s.
        w(t, p),
    );

    pub fn ideal_gas_hs(&mut self, t: f64, p: f64) -> GasResult<(f64, f64)> {
        dispatch!(self, eos => eos.ideal_gas_hs(t, p))
    }

    pub fn set_reference_state(&mut self, t: f64, p: f64, h: f64, s: f64) -> GasResult<()> {
        dispatch!(self, eos => eos.set_reference_state(t, p, h, s))
    }

    pub fn ideal_cp(&mut self, t: f64) -> GasResult<f64> {
        dispatch!(self, eos => eos.ideal_cp(t))
    }

    pub fn p_vap(&self, t: f64) -> GasResult<f64> {
        dispatch!(self, eos => eos.p_vap(t))
    }

    pub fn t_vap(&self, p: f64) -> GasResult<f64> {
        dispatch!(self, eos => eos.t_vap(p))
    }

    pub fn is_liquid(&self, t: f64, p: f64) -> GasResult<bool> {
        dispatch!(self, eos => eos.is_liquid(t, p))
    }

    pub fn hvap(&mut self, t: f64) -> GasResult<f64> {
        dispatch!(self, eos => eos.hvap(t))
    }

    pub fn saturation(&mut self, t: f64) -> GasResult<Saturation> {
        dispatch!(self, eos => eos.saturation(t))
    }
}

/// Analytic partial derivatives of every fluid against automatic differentiation.
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_dual::HyperDual64;
    use realgas_core::helmholtz::terms::ResidualTerms;
    use realgas_core::helmholtz::Partial;

    fn hyperdual(terms: &ResidualTerms, tau: f64, delta: f64, partial: Partial) -> f64 {
        let (i, j) = partial.orders();
        let (d_eps1, t_eps1) = if i > 0 { (1.0, 0.0) } else { (0.0, 1.0) };
        let (d_eps2, t_eps2) = match (i, j) {
            (2, 0) => (1.0, 0.0),
            (0, 2) | (1, 1) => (0.0, 1.0),
            _ => (0.0, 0.0),
        };
        let delta = HyperDual64::new(delta, d_eps1, d_eps2, 0.0);
        let tau = HyperDual64::new(tau, t_eps1, t_eps2, 0.0);
        let phi = terms.evaluate(delta, tau);
        match i + j {
            0 => phi.re,
            1 => phi.eps1,
            _ => phi.eps1eps2,
        }
    }

    fn check(terms: &mut ResidualTerms, tau: f64, delta: f64) {
        for partial in Partial::ALL {
            let analytic = terms.partial(tau, delta, partial);
            let ad = hyperdual(terms, tau, delta, partial);
            assert_relative_eq!(analytic, ad, max_relative = 1e-10, epsilon = 1e-12);
        }
    }

    #[test]
    fn residual_partials() {
        for (tau, delta) in [(0.5, 0.2), (1.1, 2.3), (2.5, 0.01)] {
            check(&mut Hydrogen::normal().residual_terms().clone(), tau, delta);
            check(&mut Hydrogen::para().residual_terms().clone(), tau, delta);
            check(&mut Oxygen::new().residual_terms().clone(), tau, delta);
            check(&mut Methane::new().residual_terms().clone(), tau, delta);
        }
    }

    #[test]
    fn fluid_round_trip() {
        for fluid in [
            Fluid::Hydrogen,
            Fluid::ParaHydrogen,
            Fluid::Oxygen,
            Fluid::Methane,
        ] {
            assert_eq!(HelmholtzFluid::new(fluid).fluid(), fluid);
        }
    }
}
