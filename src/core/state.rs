//! Core State trait for the enumerated states of the controller.
//!
//! Signal aspects, transition phases and controller modes are all plain
//! enums. They share this trait so history, logging and snapshots can treat
//! them uniformly.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for enumerated controller states.
///
/// All methods are pure. States are small `Copy` values describing one
/// position in a state machine.
///
/// # Required Traits
///
/// - `Copy`: states are recorded in history and snapshots by value
/// - `PartialEq`: states are compared when deciding transition rules
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states appear in serialized tick reports
///
/// # Example
///
/// ```rust
/// use interstage::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
/// enum Lamp {
///     Off,
///     Flashing,
/// }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::Off => "Off",
///             Self::Flashing => "Flashing",
///         }
///     }
/// }
///
/// assert_eq!(Lamp::Flashing.name(), "Flashing");
/// assert!(!Lamp::Off.is_final());
/// ```
pub trait State:
    Copy + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is the last state of a bounded sequence.
    ///
    /// Cyclic machines never reach a final state; bounded ones (such as the
    /// three transition phases) use this to mark their last step.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}
