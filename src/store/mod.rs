pub mod entity;
pub mod index;

pub use entity::{Entity, EntityKind};
pub use index::Index;
