pub mod document;
pub mod persistence;
pub mod writer;

pub use document::{Element, ExpDef, ExpDiff, parse_document};
pub use writer::{TagSpec, WriteSpec, Writer, WriterConfig};
