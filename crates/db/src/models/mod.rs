//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An `into_domain` conversion to the matching `nftgen_core::catalog` type
//!   where the generator reads it

pub mod collection;
pub mod composite_group;
pub mod conflict;
pub mod image_composite;
pub mod image_layer;
pub mod project;
pub mod trait_;
pub mod trait_set;
pub mod trait_value;
