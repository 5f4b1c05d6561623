//! Policy rule and decision value types.

pub mod decision;
pub mod rule;

pub use decision::Decision;
pub use rule::{Effect, PolicyRule};
