use serde::{Deserialize, Serialize};
use std::fmt;

/// Possible variants to identify a species.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierOption {
    Cas,
    #[default]
    Name,
    Formula,
}

impl fmt::Display for IdentifierOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str = match self {
            IdentifierOption::Cas => "CAS",
            IdentifierOption::Name => "name",
            IdentifierOption::Formula => "formula",
        };
        write!(f, "{str}")
    }
}

/// A collection of identifiers for a species.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifier {
    /// CAS number
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cas: Option<String>,
    /// Commonly used english name
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Chemical formula, radicals included (`OH`, `H`)
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl Identifier {
    pub fn new(cas: Option<&str>, name: Option<&str>, formula: Option<&str>) -> Identifier {
        Identifier {
            cas: cas.map(Into::into),
            name: name.map(Into::into),
            formula: formula.map(Into::into),
        }
    }

    pub fn as_str(&self, option: IdentifierOption) -> Option<&str> {
        match option {
            IdentifierOption::Cas => self.cas.as_deref(),
            IdentifierOption::Name => self.name.as_deref(),
            IdentifierOption::Formula => self.formula.as_deref(),
        }
    }

    /// Returns the formula if present, the name otherwise.
    pub fn as_readable_str(&self) -> Option<&str> {
        self.formula
            .as_deref()
            .or(self.name.as_deref())
            .or(self.cas.as_deref())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids = Vec::new();
        if let Some(n) = &self.cas {
            ids.push(format!("cas={n}"));
        }
        if let Some(n) = &self.name {
            ids.push(format!("name={n}"));
        }
        if let Some(n) = &self.formula {
            ids.push(format!("formula={n}"));
        }
        write!(f, "Identifier({})", ids.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt() {
        let id = Identifier::new(None, Some("water"), Some("H2O"));
        assert_eq!(id.to_string(), "Identifier(name=water, formula=H2O)");
    }

    #[test]
    fn lookup() {
        let id = Identifier::new(Some("7782-44-7"), Some("oxygen"), Some("O2"));
        assert_eq!(id.as_str(IdentifierOption::Formula), Some("O2"));
        assert_eq!(id.as_str(IdentifierOption::Name), Some("oxygen"));
        assert_eq!(id.as_readable_str(), Some("O2"));
        let id = Identifier::new(Some("7440-37-1"), None, None);
        assert_eq!(id.as_readable_str(), Some("7440-37-1"));
    }
}
