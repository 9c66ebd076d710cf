mod model;

pub mod address;
pub mod crypto;

#[cfg(feature = "json")]
pub mod json;

pub use model::*;
