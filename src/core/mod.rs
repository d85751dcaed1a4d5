//! Core types shared by every part of the controller.
//!
//! This module contains the pure building blocks:
//! - The `State` trait and the `state_enum!` macro
//! - Signal aspects, signal group identifiers and the live aspect map
//! - Bounded history of state changes
//!
//! Nothing in this module performs I/O or logging.

mod aspect;
mod history;
mod macros;
mod state;

pub use aspect::{Aspect, AspectChange, AspectMap, SignalGroupId};
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use state::State;
