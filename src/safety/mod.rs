//! Per-tick safety monitoring of the live aspects.
//!
//! The transition rules are designed never to show conflicting greens, but
//! the controller does not take that on trust: after every tick it checks
//! the live aspect map and reports each violation it finds. Checks use
//! Stillwater's `Validation` so every violation of a tick is reported, not
//! just the first.
//!
//! Violations are reported, not corrected. The host decides whether to
//! alarm, log or switch the installation dark.

mod rules;
mod violations;

pub use rules::{check, collect_violations};
pub use violations::SafetyViolation;
