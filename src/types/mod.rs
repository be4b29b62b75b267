//! Canonical type definitions shared by every venue

pub mod account;
pub mod filters;
pub mod market;
pub mod orders;

// Re-export commonly used types
pub use account::*;
pub use filters::*;
pub use market::*;
pub use orders::*;
