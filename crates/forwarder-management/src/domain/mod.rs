//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for the forwarder registry.
//! NO I/O, NO async.
//!
//! - This is the **inner layer** of the hexagonal architecture.
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).

pub mod custom_array;
pub mod entities;
pub mod invariants;
pub mod membership;
pub mod registry;
pub mod services;
pub mod value_objects;

pub use custom_array::*;
pub use entities::*;
pub use invariants::*;
pub use membership::*;
pub use registry::*;
pub use services::*;
pub use value_objects::*;
