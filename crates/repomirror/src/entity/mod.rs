//! SeaORM entity definitions for the mirrored tables.

pub mod prelude;
pub mod repo;
pub mod repo_cache;
