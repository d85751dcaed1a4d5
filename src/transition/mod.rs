//! Safety-interlocked transition between two stages.
//!
//! Every change of stage passes through three phases:
//!
//! - **Yellow**: terminating groups show yellow for a fixed time
//! - **AllRed**: every departing green shows red for the clearance time
//! - **RedYellow**: initiating groups show red-yellow for a fixed time
//!
//! after which the destination stage is shown verbatim. The all-red
//! duration comes from the intergreen matrix through [`crate::clearance`].

mod machine;
mod phase;

pub use machine::TransitionMachine;
pub use phase::{Phase, PhaseStep};
