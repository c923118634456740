//! Records and parameter sets that species models are built from.
use crate::errors::{GasError, GasResult};
use itertools::Itertools;
use nalgebra::{DMatrix, DVector};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

mod identifier;
mod model_record;

pub use identifier::{Identifier, IdentifierOption};
pub use model_record::{BinaryRecord, PureRecord};

/// Binary parameters resolved to species indices.
#[derive(Clone, Copy, Debug)]
pub struct Binary<B> {
    pub id1: usize,
    pub id2: usize,
    pub model_record: B,
}

/// Pure and binary records of an ordered list of species.
#[derive(Clone, Debug)]
pub struct Parameters<P, B> {
    pub pure: Vec<P>,
    pub binary: Vec<Binary<B>>,
    pub identifiers: Vec<Identifier>,
    /// molar weights in kg/mol
    pub molar_weight: DVector<f64>,
}

impl<P: Clone, B: Clone> Parameters<P, B> {
    pub fn new(pure_records: Vec<PureRecord<P>>, binary: Vec<Binary<B>>) -> GasResult<Self> {
        let n = pure_records.len();
        if let Some(b) = binary.iter().find(|b| b.id1 >= n || b.id2 >= n) {
            return Err(GasError::IncompatibleComponents(n, b.id1.max(b.id2) + 1));
        }
        let (identifiers, (molar_weight, pure)): (Vec<_>, (Vec<_>, Vec<_>)) = pure_records
            .into_iter()
            .map(|pr| (pr.identifier, (pr.molarweight * 1e-3, pr.model_record)))
            .unzip();
        Ok(Self {
            pure,
            binary,
            identifiers,
            molar_weight: DVector::from_vec(molar_weight),
        })
    }

    /// Creates parameters from records for pure species and possibly binary parameters.
    pub fn from_records(
        pure_records: Vec<PureRecord<P>>,
        binary_records: &[BinaryRecord<Identifier, B>],
        identifier_option: IdentifierOption,
    ) -> GasResult<Self> {
        let binary = Self::binary_from_records(&pure_records, binary_records, identifier_option);
        Self::new(pure_records, binary)
    }

    /// Creates parameters from json documents, keeping the order of `substances`.
    pub fn from_json_str<S: AsRef<str>>(
        substances: &[S],
        pure_json: &str,
        binary_json: Option<&str>,
        identifier_option: IdentifierOption,
    ) -> GasResult<Self>
    where
        P: DeserializeOwned,
        B: DeserializeOwned,
    {
        let records = PureRecord::from_json_str(substances, pure_json, identifier_option)?;
        let binary_records: Vec<BinaryRecord<Identifier, B>> = match binary_json {
            Some(json) => serde_json::from_str(json)?,
            None => Vec::new(),
        };
        Self::from_records(records, &binary_records, identifier_option)
    }

    /// Binary records for every pair of `pure_records` that has a tabulated entry.
    fn binary_from_records(
        pure_records: &[PureRecord<P>],
        binary_records: &[BinaryRecord<Identifier, B>],
        identifier_option: IdentifierOption,
    ) -> Vec<Binary<B>> {
        let binary_map: HashMap<_, _> = binary_records
            .iter()
            .filter_map(|br| {
                let id1 = br.id1.as_str(identifier_option)?;
                let id2 = br.id2.as_str(identifier_option)?;
                Some(((id1, id2), &br.model_record))
            })
            .collect();

        pure_records
            .iter()
            .enumerate()
            .tuple_combinations()
            .filter_map(|((i1, p1), (i2, p2))| {
                let id1 = p1.identifier.as_str(identifier_option)?;
                let id2 = p2.identifier.as_str(identifier_option)?;
                // keep the orientation of the record for asymmetric parameters
                let (id1, id2, b) = match binary_map.get(&(id1, id2)) {
                    Some(&b) => (i1, i2, b),
                    None => (i2, i1, *binary_map.get(&(id2, id1))?),
                };
                Some(Binary {
                    id1,
                    id2,
                    model_record: b.clone(),
                })
            })
            .collect()
    }

    pub fn components(&self) -> usize {
        self.pure.len()
    }

    /// Symmetric matrix of a binary parameter, zero where nothing is tabulated.
    pub fn binary_matrix<F>(&self, f: F) -> DMatrix<f64>
    where
        F: Fn(&B) -> f64,
    {
        let n = self.pure.len();
        let mut m = DMatrix::zeros(n, n);
        for br in &self.binary {
            let b = f(&br.model_record);
            m[(br.id1, br.id2)] = b;
            m[(br.id2, br.id1)] = b;
        }
        m
    }

    /// Binary record of the pair (i, j) regardless of its orientation.
    ///
    /// Use [Self::binary] directly for parameters that depend on the orientation.
    pub fn binary_record(&self, i: usize, j: usize) -> Option<&B> {
        self.binary
            .iter()
            .find(|b| (b.id1, b.id2) == (i, j) || (b.id1, b.id2) == (j, i))
            .map(|b| &b.model_record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, Clone)]
    struct Pure {
        a: f64,
    }

    #[derive(Serialize, Deserialize, Debug, Clone)]
    struct Kij {
        k_ij: f64,
    }

    const PURE: &str = r#"[
        {"identifier": {"formula": "N2"}, "molarweight": 28.0134, "a": 1.0},
        {"identifier": {"formula": "CO2"}, "molarweight": 44.0095, "a": 2.0},
        {"identifier": {"formula": "CH4"}, "molarweight": 16.0428, "a": 3.0}
    ]"#;

    const BINARY: &str = r#"[
        {"id1": {"formula": "CH4"}, "id2": {"formula": "N2"}, "k_ij": 0.03},
        {"id1": {"formula": "CO2"}, "id2": {"formula": "CH4"}, "k_ij": 0.1}
    ]"#;

    #[test]
    fn binary_matrix_is_symmetric() -> GasResult<()> {
        let p: Parameters<Pure, Kij> = Parameters::from_json_str(
            &["N2", "CH4", "AR"][..2],
            PURE,
            Some(BINARY),
            IdentifierOption::Formula,
        )?;
        let k = p.binary_matrix(|b| b.k_ij);
        assert_relative_eq!(k[(0, 1)], 0.03);
        assert_relative_eq!(k[(1, 0)], 0.03);
        assert_eq!(k[(0, 0)], 0.0);
        assert!(p.binary_record(1, 0).is_some());
        assert_eq!((p.binary[0].id1, p.binary[0].id2), (1, 0));
        assert_relative_eq!(p.molar_weight[0], 0.0280134);
        Ok(())
    }

    #[test]
    fn requested_order() -> GasResult<()> {
        let p: Parameters<Pure, Kij> = Parameters::from_json_str(
            &["CH4", "CO2", "N2"],
            PURE,
            Some(BINARY),
            IdentifierOption::Formula,
        )?;
        let a: Vec<f64> = p.pure.iter().map(|r| r.a).collect();
        assert_eq!(a, vec![3.0, 2.0, 1.0]);
        assert_eq!(p.binary.len(), 2);
        assert_relative_eq!(p.binary_matrix(|b| b.k_ij)[(0, 1)], 0.1);
        Ok(())
    }
}
