use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulated opposing-force affiliation of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coalition {
    Blue,
    Red,
    Neutral,
}

impl Coalition {
    /// The coalition whose aircraft are hostile to this one.
    /// Neutrals oppose nobody and nobody opposes them.
    pub fn opposing(self) -> Option<Coalition> {
        match self {
            Coalition::Blue => Some(Coalition::Red),
            Coalition::Red => Some(Coalition::Blue),
            Coalition::Neutral => None,
        }
    }
}

impl fmt::Display for Coalition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coalition::Blue => write!(f, "blue"),
            Coalition::Red => write!(f, "red"),
            Coalition::Neutral => write!(f, "neutral"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposing_coalitions() {
        assert_eq!(Coalition::Blue.opposing(), Some(Coalition::Red));
        assert_eq!(Coalition::Red.opposing(), Some(Coalition::Blue));
        assert_eq!(Coalition::Neutral.opposing(), None);
    }
}
