//! Gas mixtures with ideal, cubic or multiparameter real gas behavior.
//!
//! A [Gas] combines the species data of the embedded database with one
//! of the models selected by [GasModel]. All accessors are mass specific
//! and memoize their results for the last requested state.
use crate::ideal_gas::IdealGasMixture;
use crate::multiparameter::{Fluid, HelmholtzFluid};
use nalgebra::DVector;
use realgas_core::cubic::{CubicEos, CubicKind};
use realgas_core::parameter::Identifier;
use realgas_core::{
    CacheIndex, GasError, GasResult, PropertyCache, SolverOptions, P_REF, RGAS, T_REF,
};
use std::fmt;

mod composition;
mod database;
mod equilibrium;
mod properties;
pub use composition::Composition;
pub use database::{
    available_species, species_parameters, BinarySpeciesRecord, SpeciesParameters, SpeciesRecord,
};
pub use equilibrium::EquilibriumSolution;

/// Selection of the equation of state of a [Gas].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GasModel {
    /// Ideal gas mixture of NASA-7 species.
    Ideal,
    /// Cubic equation of state with van der Waals one-fluid mixing.
    Cubic(CubicKind),
    /// Multiparameter equation of state of a pure fluid.
    Helmholtz(Fluid),
}

impl fmt::Display for GasModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ideal => write!(f, "ideal gas"),
            Self::Cubic(CubicKind::PengRobinson) => write!(f, "Peng-Robinson"),
            Self::Cubic(CubicKind::SoaveRedlichKwong) => write!(f, "Soave-Redlich-Kwong"),
            Self::Helmholtz(fluid) => write!(f, "multiparameter ({fluid})"),
        }
    }
}

#[derive(Clone, Debug)]
enum RealGas {
    Ideal,
    Cubic(CubicEos),
    Helmholtz(HelmholtzFluid),
}

/// Properties cached at (T, p).
#[derive(Clone, Copy)]
enum GasProperty {
    Volume,
    Cp,
    Cv,
    Enthalpy,
    Entropy,
    SpeedOfSound,
    Viscosity,
    Conductivity,
}

impl CacheIndex for GasProperty {
    const COUNT: usize = 8;

    fn index(self) -> usize {
        self as usize
    }
}

/// Properties cached at (T, v).
#[derive(Clone, Copy)]
enum StateProperty {
    Pressure,
    DpDv,
    DpDt,
}

impl CacheIndex for StateProperty {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        self as usize
    }
}

/// A gas mixture of species from the embedded database.
#[derive(Clone, Debug)]
pub struct Gas {
    model: GasModel,
    eos: RealGas,
    parameters: SpeciesParameters,
    ideal_gas: IdealGasMixture,
    composition: Composition,
    tp_cache: PropertyCache<GasProperty>,
    tv_cache: PropertyCache<StateProperty>,
    options: SolverOptions,
}

impl Gas {
    /// Mixture of `species` (formulas of the species database) with the
    /// given mole fractions, which are normalized.
    pub fn new<S: AsRef<str>>(
        model: GasModel,
        species: &[S],
        molefracs: &[f64],
    ) -> GasResult<Self> {
        let parameters = species_parameters(species)?;
        Self::from_parameters(model, parameters, molefracs)
    }

    /// A single species.
    pub fn pure(model: GasModel, species: &str) -> GasResult<Self> {
        Self::new(model, &[species], &[1.0])
    }

    /// A pure fluid described by its multiparameter equation of state.
    pub fn helmholtz(fluid: Fluid) -> GasResult<Self> {
        Self::pure(GasModel::Helmholtz(fluid), fluid.formula())
    }

    /// Mixture from user supplied species parameters.
    pub fn from_parameters(
        model: GasModel,
        parameters: SpeciesParameters,
        molefracs: &[f64],
    ) -> GasResult<Self> {
        let composition = Composition::new(parameters.molar_weight.clone(), molefracs)?;
        let ideal_gas = IdealGasMixture::new(parameters.pure.iter().map(|r| r.nasa7).collect());
        let eos = match model {
            GasModel::Ideal => RealGas::Ideal,
            GasModel::Cubic(kind) => {
                let records = parameters.pure.iter().map(|r| r.critical).collect();
                let k_ij = parameters.binary_matrix(|b| b.k_ij);
                RealGas::Cubic(CubicEos::new(
                    kind,
                    records,
                    Some(k_ij),
                    composition.molefracs(),
                    composition.molar_weight(),
                )?)
            }
            GasModel::Helmholtz(fluid) => {
                let formula = parameters.identifiers.first().and_then(|id| id.formula.as_deref());
                if parameters.components() != 1 || formula != Some(fluid.formula()) {
                    return Err(GasError::IncompatibleParameters(format!(
                        "the equation of state of {fluid} only describes pure {}",
                        fluid.formula()
                    )));
                }
                // enthalpy and entropy on the basis of the species database
                let x = composition.molefracs();
                let m = composition.molar_weight();
                let h = ideal_gas.molar_enthalpy(T_REF, x) / m;
                let s = ideal_gas.molar_entropy(T_REF, P_REF, x) / m;
                let mut eos = HelmholtzFluid::new(fluid);
                eos.set_reference_state(T_REF, P_REF, h, s)?;
                RealGas::Helmholtz(eos)
            }
        };
        Ok(Self {
            model,
            eos,
            parameters,
            ideal_gas,
            composition,
            tp_cache: PropertyCache::new(),
            tv_cache: PropertyCache::new(),
            options: SolverOptions::default(),
        })
    }

    /// Options of all solvers called by this gas.
    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self.eos = match self.eos {
            RealGas::Ideal => RealGas::Ideal,
            RealGas::Cubic(eos) => RealGas::Cubic(eos.with_options(options)),
            RealGas::Helmholtz(eos) => RealGas::Helmholtz(eos.with_options(options)),
        };
        self
    }

    pub fn model(&self) -> GasModel {
        self.model
    }

    pub fn species(&self) -> &[Identifier] {
        &self.parameters.identifiers
    }

    pub fn parameters(&self) -> &SpeciesParameters {
        &self.parameters
    }

    pub fn components(&self) -> usize {
        self.composition.components()
    }

    pub fn molefracs(&self) -> &DVector<f64> {
        self.composition.molefracs()
    }

    pub fn massfracs(&self) -> &DVector<f64> {
        self.composition.massfracs()
    }

    /// Molar weight of the mixture in kg/mol.
    pub fn molar_weight(&self) -> f64 {
        self.composition.molar_weight()
    }

    /// Specific gas constant in J/(kg K).
    pub fn gas_constant(&self) -> f64 {
        match &self.eos {
            RealGas::Helmholtz(eos) => eos.gas_constant(),
            _ => RGAS / self.molar_weight(),
        }
    }

    /// Change the mole fractions; they are normalized to one.
    pub fn remix(&mut self, molefracs: &[f64]) -> GasResult<()> {
        self.composition.remix(molefracs)?;
        self.composition_changed()
    }

    /// Change the mass fractions; they are normalized to one.
    pub fn remix_mass(&mut self, massfracs: &[f64]) -> GasResult<()> {
        self.composition.remix_mass(massfracs)?;
        self.composition_changed()
    }

    fn composition_changed(&mut self) -> GasResult<()> {
        if let RealGas::Cubic(eos) = &mut self.eos {
            eos.set_molefracs(
                self.composition.molefracs(),
                self.composition.molar_weight(),
            )?;
        }
        self.tp_cache.invalidate();
        self.tv_cache.invalidate();
        Ok(())
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gas({}", self.model)?;
        for (id, x) in self.species().iter().zip(self.molefracs().iter()) {
            write!(f, ", {}: {x:.6}", id.as_readable_str().unwrap_or("?"))?;
        }
        write!(f, ")")
    }
}
