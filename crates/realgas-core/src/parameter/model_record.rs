use super::{Identifier, IdentifierOption};
use crate::errors::{GasError, GasResult};
use indexmap::{IndexMap, IndexSet};
use num_traits::Zero;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A collection of parameters of a single species.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PureRecord<M> {
    pub identifier: Identifier,
    /// molar weight in g/mol
    #[serde(skip_serializing_if = "f64::is_zero")]
    #[serde(default)]
    pub molarweight: f64,
    #[serde(flatten)]
    pub model_record: M,
}

impl<M> PureRecord<M> {
    pub fn new(identifier: Identifier, molarweight: f64, model_record: M) -> Self {
        Self {
            identifier,
            molarweight,
            model_record,
        }
    }

    /// Select records for `substances` from a json array, keeping the order of `substances`.
    pub fn from_json_str<S: AsRef<str>>(
        substances: &[S],
        json: &str,
        identifier_option: IdentifierOption,
    ) -> GasResult<Vec<Self>>
    where
        M: DeserializeOwned,
    {
        let queried: IndexSet<&str> = substances.iter().map(|s| s.as_ref()).collect();
        if queried.len() != substances.len() {
            return Err(GasError::IncompatibleParameters(
                "A species was defined more than once.".to_string(),
            ));
        }

        let file_records: Vec<Self> = serde_json::from_str(json)?;
        let mut records: IndexMap<String, Self> = file_records
            .into_iter()
            .filter_map(|r| {
                r.identifier
                    .as_str(identifier_option)
                    .map(str::to_owned)
                    .map(|id| (id, r))
            })
            .filter(|(id, _)| queried.contains(id.as_str()))
            .collect();

        let missing: Vec<_> = queried
            .iter()
            .filter(|id| !records.contains_key(**id))
            .collect();
        if !missing.is_empty() {
            return Err(GasError::ComponentsNotFound(format!("{missing:?}")));
        }

        queried
            .iter()
            .map(|id| {
                records
                    .shift_remove(*id)
                    .ok_or_else(|| GasError::ComponentsNotFound(id.to_string()))
            })
            .collect()
    }
}

impl<M: fmt::Display> fmt::Display for PureRecord<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PureRecord(")?;
        write!(f, "\n\tidentifier={},", self.identifier)?;
        write!(f, "\n\tmolarweight={},", self.molarweight)?;
        write!(f, "\n\tmodel_record={},", self.model_record)?;
        write!(f, "\n)")
    }
}

/// A collection of parameters that model interactions between two species.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BinaryRecord<I, B> {
    /// Identifier of the first species
    pub id1: I,
    /// Identifier of the second species
    pub id2: I,
    /// Binary interaction parameter(s)
    #[serde(flatten)]
    pub model_record: B,
}

impl<I, B> BinaryRecord<I, B> {
    pub fn new(id1: I, id2: I, model_record: B) -> Self {
        Self {
            id1,
            id2,
            model_record,
        }
    }
}

impl<I: fmt::Display, B: fmt::Display> fmt::Display for BinaryRecord<I, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryRecord(")?;
        write!(f, "\n\tid1={},", self.id1)?;
        write!(f, "\n\tid2={},", self.id2)?;
        write!(f, "\n\tmodel_record={},", self.model_record)?;
        write!(f, "\n)")
    }
}
