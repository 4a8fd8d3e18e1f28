//! Exchange rate handling

pub mod table;

pub use table::*;
