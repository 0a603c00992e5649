//! Static reference data: levels, stardust bands, creatures, types, and the
//! catalog that owns them after startup.

pub mod catalog;
pub mod creature;
pub mod level;
pub mod registry;
pub mod stardust;
pub mod types;
pub mod validate;

pub use catalog::{normalize_name, Catalog};
pub use creature::{BaseStats, MoveRef, StatBlock, TypeRef};
pub use level::{Level, LEVEL_COUNT, MAX_LEVEL, MIN_LEVEL};
pub use stardust::levels_for_stardust;
pub use types::{TypeChart, TypeEntry};
