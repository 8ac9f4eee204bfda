//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod collection_repo;
pub mod composite_group_repo;
pub mod conflict_repo;
pub mod image_composite_repo;
pub mod image_layer_repo;
pub mod project_repo;
pub mod trait_repo;
pub mod trait_set_repo;
pub mod trait_value_repo;

pub use collection_repo::CollectionRepo;
pub use composite_group_repo::CompositeGroupRepo;
pub use conflict_repo::ConflictRepo;
pub use image_composite_repo::ImageCompositeRepo;
pub use image_layer_repo::ImageLayerRepo;
pub use project_repo::ProjectRepo;
pub use trait_repo::TraitRepo;
pub use trait_set_repo::TraitSetRepo;
pub use trait_value_repo::TraitValueRepo;
