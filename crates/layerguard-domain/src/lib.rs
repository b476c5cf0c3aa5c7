//! Pure layer policy evaluation (no IO).
//!
//! The core is [`Policy`]: declared [`Layer`]s plus the [`Rule`]s between them, answering
//! "may layer X depend on identifier Y?" with a [`Decision`].
//!
//! Input to [`evaluate`]: a workspace model constructed elsewhere.
//! Output: findings + verdict + summary data.

#![forbid(unsafe_code)]

pub mod config;
pub mod decision;
pub mod error;
pub mod fingerprint;
pub mod layer;
pub mod model;
pub mod ordered_set;
pub mod pattern;
pub mod policy;
pub mod report;
pub mod rule;

mod checks;
mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use config::{EffectiveConfig, FailOn, Scope};
pub use decision::Decision;
pub use engine::evaluate;
pub use error::PatternCompileError;
pub use layer::{Layer, Package};
pub use ordered_set::{Keyed, OrderedSet};
pub use pattern::{PackagePattern, PackagePatternSet};
pub use policy::{ConfigIssue, DecisionTrace, Policy};
pub use report::{DomainReport, SeverityCounts};
pub use rule::{Rule, WILDCARD};
