//! Domain logic for generative collection artwork.
//!
//! Everything in this crate is pure: no database, network or filesystem
//! access. The pipeline crate wires these functions to storage.

pub mod catalog;
pub mod conflict;
pub mod error;
pub mod generation;
pub mod group;
pub mod hashing;
pub mod layering;
pub mod metadata;
pub mod pool;
pub mod rarity;
pub mod types;
