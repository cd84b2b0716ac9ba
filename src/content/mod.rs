//! Content: the template database and the tabular row loaders that fill it.

pub mod error;
mod registry;
mod rows;

pub use error::ContentError;
pub use registry::Database;
pub use rows::{EffectOwner, EffectRow, RowLoader};
