//! Value objects - Immutable objects defined by their attributes

mod vector;

pub use vector::Vector3;
