//! Pure pricing core: quote derivation and configuration merging.

pub mod merge;
pub mod quote;

pub use merge::merge;
pub use quote::compute;
