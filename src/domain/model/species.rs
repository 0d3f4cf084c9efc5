//! Class labels and the fixed class-index table

use std::fmt;

use serde::{Deserialize, Serialize};

/// Version of the index-to-name table. Stored in every artifact so a model
/// fitted against a different ordering is rejected on load.
pub const LABEL_TABLE_VERSION: u32 = 1;

/// Iris species predicted by every model kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Setosa,
    Versicolor,
    Virginica,
}

impl Species {
    /// Index order shared by fitting and prediction: 0, 1, 2
    pub const ALL: [Species; 3] = [Self::Setosa, Self::Versicolor, Self::Virginica];

    pub fn index(self) -> u32 {
        match self {
            Self::Setosa => 0,
            Self::Versicolor => 1,
            Self::Virginica => 2,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Setosa => "setosa",
            Self::Versicolor => "versicolor",
            Self::Virginica => "virginica",
        }
    }

    /// Parses a label cell from a dataset.
    ///
    /// Accepts the class name (`setosa`), the UCI form (`Iris-setosa`) or the
    /// class index (`0`), case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().trim_matches('"').to_lowercase();
        let name = normalized.strip_prefix("iris-").unwrap_or(&normalized);

        if let Ok(index) = name.parse::<u32>() {
            return Self::from_index(index);
        }

        Self::ALL.into_iter().find(|species| species.as_str() == name)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
