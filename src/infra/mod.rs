//! Note storage: directory scanning, front matter, link extraction

mod frontmatter;
mod fs;
mod links;
mod slug;
mod store;

pub use frontmatter::{Frontmatter, ParseError, ParsedNote, first_heading, parse, serialize};
pub use fs::{DirectoryStore, read_note_file, scan_notes_directory};
pub use links::extract_links;
pub use slug::{slugify, zettel_filename};
pub use store::{NoteStore, RawLink, StoreError, StoredNote};
