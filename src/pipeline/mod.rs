//! Validation, conversion and aggregation stages plus their orchestration

pub mod aggregator;
pub mod converter;
pub mod core;
pub mod validator;

pub use aggregator::*;
pub use converter::*;
pub use self::core::*;
pub use validator::*;
