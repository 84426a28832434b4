//! Pure helpers shared by services and consumers.

mod shard_grouping;

pub use shard_grouping::group_shard_files;
