mod model;

pub mod address;

pub use model::*;
