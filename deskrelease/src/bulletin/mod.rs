//! Bulletin documents: the per-release component lists.
//!
//! A bulletin is published gzip-compressed next to the files it describes, so
//! every item it yields shares the bulletin's directory.

mod item;
mod node;
mod parser;

pub use item::{Checksum, DownloadableItem};
pub use node::{first_non_empty, TextNode};
pub use parser::{parse_bulletin, resolve_name};
