//! Decision Policy
//!
//! One policy instance per agent type: a state-keyed value table with
//! epsilon-greedy selection and an exploration schedule that decays as the
//! policy learns.

pub mod decision;
pub mod types;

pub use decision::{DecisionPolicy, PolicyConfig};
pub use types::{ActionChoice, PolicyMetrics};
