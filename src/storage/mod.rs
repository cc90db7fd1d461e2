//! On-disk storage for parameter sets
//!
//! Versioned snapshots with checksums; see [`ParameterArchive`].

mod archive;

pub use archive::{ParameterArchive, SnapshotMeta};
