//! Identifiers for the four source tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KbliError;

/// The source tables the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Code-to-cluster assignments; feeds the membership index
    Assignments,
    /// Full KBLI reference with descriptions
    Reference,
    /// Classification results for unclassified job descriptions
    Unclassified,
    /// UMKM job list with clusters
    Jobs,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Assignments,
        TableKind::Reference,
        TableKind::Unclassified,
        TableKind::Jobs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Assignments => "assignments",
            TableKind::Reference => "reference",
            TableKind::Unclassified => "unclassified",
            TableKind::Jobs => "jobs",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableKind {
    type Err = KbliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| KbliError::InvalidInput(format!("unknown table: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for kind in TableKind::ALL {
            assert_eq!(kind.as_str().parse::<TableKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "sheets".parse::<TableKind>().unwrap_err();
        assert!(matches!(err, KbliError::InvalidInput(_)));
    }
}
