// crates/trellis-layout/src/lib.rs
//! Flat-array box layout.
//!
//! Controls live in a [`RecordStore`] as index-linked records and are laid out by a
//! [`LayoutContext`] in four steps per update: size X, arrange X, size Y, arrange Y.

mod arrange;
mod constraints;
mod context;
mod query;
mod record;
mod size;
mod snapshot;
mod tree;

pub use arrange::BREAK_EPSILON;
pub use constraints::CONSTRAINT_EPSILON;
pub use context::LayoutContext;
pub use record::{LayoutRecord, RecordStore};
pub use snapshot::{LayoutSnapshot, NodeSnapshot, SNAPSHOT_VERSION};
pub use tree::Children;

pub use trellis_core::*;
