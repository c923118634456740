//! Species data compiled into the crate.
use crate::ideal_gas::Nasa7Record;
use crate::transport::{LennardJonesRecord, ViscosityInteractionRecord};
use indexmap::IndexMap;
use num_traits::Zero;
use realgas_core::cubic::CriticalRecord;
use realgas_core::parameter::{Identifier, IdentifierOption, Parameters, PureRecord};
use realgas_core::GasResult;
use serde::{Deserialize, Serialize};
use std::fmt;

const SPECIES_JSON: &str = include_str!("../../parameters/species.json");
const BINARY_JSON: &str = include_str!("../../parameters/binary.json");

/// Data of a single species.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpeciesRecord {
    /// number of atoms per element symbol
    pub elements: IndexMap<String, f64>,
    pub nasa7: Nasa7Record,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<CriticalRecord>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lennard_jones: Option<LennardJonesRecord>,
}

impl fmt::Display for SpeciesRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpeciesRecord(elements={:?}", self.elements)?;
        if let Some(c) = &self.critical {
            write!(f, ", tc={}, pc={}, acentric_factor={}", c.tc, c.pc, c.acentric_factor)?;
        }
        if let Some(lj) = &self.lennard_jones {
            write!(f, ", sigma={}, epsilon_k={}", lj.sigma, lj.epsilon_k)?;
        }
        write!(f, ")")
    }
}

/// Interaction parameters of a pair of species.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub struct BinarySpeciesRecord {
    /// binary interaction parameter of the cubic equations of state
    #[serde(default)]
    #[serde(skip_serializing_if = "f64::is_zero")]
    pub k_ij: f64,
    /// tabulated interaction function of the viscosity mixing rule
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viscosity: Option<ViscosityInteractionRecord>,
}

pub type SpeciesParameters = Parameters<SpeciesRecord, BinarySpeciesRecord>;

/// Parameters of `species` (identified by formula) from the embedded database.
pub fn species_parameters<S: AsRef<str>>(species: &[S]) -> GasResult<SpeciesParameters> {
    Parameters::from_json_str(
        species,
        SPECIES_JSON,
        Some(BINARY_JSON),
        IdentifierOption::Formula,
    )
}

/// Identifiers of all species in the embedded database.
pub fn available_species() -> GasResult<Vec<Identifier>> {
    let records: Vec<PureRecord<SpeciesRecord>> = serde_json::from_str(SPECIES_JSON)?;
    Ok(records.into_iter().map(|r| r.identifier).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use realgas_core::GasError;

    #[test]
    fn database_is_complete() -> GasResult<()> {
        let species = available_species()?;
        assert_eq!(species.len(), 11);
        for id in &species {
            let formula = id.formula.as_deref().unwrap_or_default();
            let p = species_parameters(&[formula])?;
            let record = &p.pure[0];
            assert!(!record.elements.is_empty());
            assert!(record.lennard_jones.is_some());
            // h(T) is continuous at t_mid
            let n = record.nasa7;
            assert_relative_eq!(n.h(999.9999), n.h(1000.0), max_relative = 1e-3);
        }
        Ok(())
    }

    #[test]
    fn radicals_have_no_critical_point() -> GasResult<()> {
        let p = species_parameters(&["OH", "H", "O", "H2O"])?;
        assert!(p.pure[..3].iter().all(|r| r.critical.is_none()));
        assert!(p.pure[3].critical.is_some());
        Ok(())
    }

    #[test]
    fn molar_weight_matches_elements() -> GasResult<()> {
        let atomic = [("H", 1.00794), ("O", 15.9994), ("C", 12.0107), ("N", 14.0067)];
        let p = species_parameters(&["H2O", "CH4", "CO2", "N2", "OH"])?;
        for (record, m) in p.pure.iter().zip(p.molar_weight.iter()) {
            let sum: f64 = record
                .elements
                .iter()
                .map(|(e, n)| n * atomic.iter().find(|a| a.0 == e.as_str()).map_or(0.0, |a| a.1))
                .sum();
            assert_relative_eq!(sum * 1e-3, *m, max_relative = 1e-4);
        }
        Ok(())
    }

    #[test]
    fn binary_parameters() -> GasResult<()> {
        let p = species_parameters(&["N2", "CO2", "CH4"])?;
        let k = p.binary_matrix(|b| b.k_ij);
        assert_relative_eq!(k[(2, 0)], 0.0311);
        assert_relative_eq!(k[(1, 2)], 0.0919);
        assert!(matches!(
            species_parameters(&["N2", "XE"]),
            Err(GasError::ComponentsNotFound(_))
        ));
        Ok(())
    }
}
