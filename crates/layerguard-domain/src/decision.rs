use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict for a single dependency edge.
///
/// The two values form a lattice under [`Decision::and`] with `Deny` absorbing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn and(self, other: Decision) -> Decision {
        match (self, other) {
            (Decision::Allow, Decision::Allow) => Decision::Allow,
            _ => Decision::Deny,
        }
    }

    pub fn is_allow(self) -> bool {
        self == Decision::Allow
    }

    pub fn is_deny(self) -> bool {
        self == Decision::Deny
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny => "deny",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
