//! Text model - the tagged buffer and the document built around it

pub mod buffer;
pub mod document;
pub mod tag_table;

pub use buffer::LatexBuffer;
pub use document::LatexDocument;
pub use tag_table::{TagRuns, TagTable};
