//! External-facing report shapes

pub mod formatter;

pub use formatter::*;
