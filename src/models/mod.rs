pub mod config;
pub mod diff;
pub mod error;
pub mod geometry;

pub use config::{BatchConfig, NoiseTarget, XmlTarget};
pub use diff::{AttrChange, AttrChangeSet, TagAdd, TagAddList, TagRm, TagRmList};
pub use error::{BatchError, BatchResult};
pub use geometry::{ArenaExtent, Vector3D};
