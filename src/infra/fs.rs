//! Directory-backed note store with atomic writes.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::domain::{Tag, ValidationIssue, Zettel, ZettelId};
use crate::infra::frontmatter::{self, Frontmatter};
use crate::infra::{NoteStore, StoreError, StoredNote, extract_links, zettel_filename};

impl StoreError {
    /// Creates an appropriate StoreError from an io::Error.
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied { path: path.into() },
            _ => StoreError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// A zettelkasten stored as `<id>.md` files under one directory.
///
/// The directory is scanned once on [`DirectoryStore::open`]; the file stem
/// of each markdown file is its zettel ID.
///
/// # Examples
///
/// ```no_run
/// use neuron::infra::{DirectoryStore, NoteStore};
///
/// let store = DirectoryStore::open("notes").unwrap();
/// for id in store.list_ids().unwrap() {
///     println!("{}", store.read_note(&id).unwrap().zettel);
/// }
/// ```
#[derive(Debug)]
pub struct DirectoryStore {
    root: PathBuf,
    paths: BTreeMap<ZettelId, PathBuf>,
    duplicates: Vec<ValidationIssue>,
}

impl DirectoryStore {
    /// Opens a notes directory and indexes its zettel files.
    ///
    /// Files whose stem is not a valid zettel ID are skipped with a warning.
    /// When two files share an ID, the first in path order wins and the
    /// other is reported through [`NoteStore::scan_issues`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DirectoryNotFound` or `StoreError::NotADirectory`
    /// if `root` is not an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let mut relative: Vec<PathBuf> = scan_notes_directory(&root)?.collect();
        relative.sort();

        let mut paths: BTreeMap<ZettelId, PathBuf> = BTreeMap::new();
        let mut duplicates = Vec::new();

        for rel in relative {
            let Some(stem) = rel.file_stem().and_then(|s| s.to_str()) else {
                warn!(path = %rel.display(), "skipping file with non-UTF-8 name");
                continue;
            };
            let id = match ZettelId::parse(stem) {
                Ok(id) => id,
                Err(e) => {
                    warn!(path = %rel.display(), error = %e, "skipping file with invalid zettel ID");
                    continue;
                }
            };
            match paths.get(&id) {
                Some(first) => {
                    duplicates.push(ValidationIssue::duplicate_id(id, first.clone(), rel));
                }
                None => {
                    paths.insert(id, rel);
                }
            }
        }

        debug!(root = %root.display(), zettels = paths.len(), "scanned notes directory");
        Ok(Self {
            root,
            paths,
            duplicates,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, id: &ZettelId) -> bool {
        self.paths.contains_key(id)
    }

    /// Returns the absolute path of a zettel's file.
    pub fn path_of(&self, id: &ZettelId) -> Option<PathBuf> {
        self.paths.get(id).map(|rel| self.root.join(rel))
    }

    /// Creates a new zettel file at `<root>/<id>.md`.
    ///
    /// Uses a temporary file and atomic rename, and never replaces an
    /// existing file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the ID is taken.
    /// Returns `StoreError::AtomicWrite` if the rename fails.
    pub fn create_note(
        &mut self,
        id: &ZettelId,
        title: &str,
        date: Option<NaiveDate>,
        tags: &[Tag],
        body: &str,
    ) -> Result<PathBuf, StoreError> {
        let rel = PathBuf::from(zettel_filename(id));
        let path = self.root.join(&rel);

        if let Some(existing) = self.path_of(id) {
            return Err(StoreError::AlreadyExists {
                id: id.clone(),
                path: existing,
            });
        }

        let frontmatter = Frontmatter {
            title: Some(title.trim().to_string()).filter(|t| !t.is_empty()),
            date,
            tags: tags.to_vec(),
        };
        let content =
            frontmatter::serialize(&frontmatter, body).map_err(|e| StoreError::Serialize {
                path: path.clone(),
                source: e,
            })?;

        let mut temp =
            NamedTempFile::new_in(&self.root).map_err(|e| StoreError::from_io(&path, e))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| StoreError::from_io(&path, e))?;
        temp.persist_noclobber(&path).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                StoreError::AlreadyExists {
                    id: id.clone(),
                    path: path.clone(),
                }
            } else {
                StoreError::AtomicWrite {
                    path: path.clone(),
                    source: e.error,
                }
            }
        })?;

        debug!(id = %id, path = %path.display(), "created zettel");
        self.paths.insert(id.clone(), rel);
        Ok(path)
    }
}

impl NoteStore for DirectoryStore {
    fn read_note(&self, id: &ZettelId) -> Result<StoredNote, StoreError> {
        let path = self
            .path_of(id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;
        read_note_file(id, &path)
    }

    fn list_ids(&self) -> Result<Vec<ZettelId>, StoreError> {
        Ok(self.paths.keys().cloned().collect())
    }

    fn scan_issues(&self) -> Vec<ValidationIssue> {
        self.duplicates.clone()
    }
}

/// Reads and parses one zettel file.
///
/// The title comes from front matter, else the first `# ` heading, else the
/// ID.
///
/// # Errors
///
/// Returns `StoreError::InvalidEncoding` for non-UTF-8 content.
/// Returns `StoreError::Parse` if the front matter is invalid.
pub fn read_note_file(id: &ZettelId, path: &Path) -> Result<StoredNote, StoreError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound { id: id.clone() },
        _ => StoreError::from_io(path, e),
    })?;
    let content = decode(bytes, path)?;

    let parsed = frontmatter::parse(&content).map_err(|e| StoreError::Parse {
        path: path.into(),
        source: e,
    })?;

    let Frontmatter { title, date, tags } = parsed.frontmatter;
    let title = title
        .or_else(|| frontmatter::first_heading(&parsed.body).map(str::to_string))
        .unwrap_or_default();

    let zettel = Zettel::builder(id.clone(), title).date(date).tags(tags).build();
    let links = extract_links(&parsed.body);

    Ok(StoredNote {
        zettel,
        body: parsed.body,
        links,
    })
}

/// Decodes file bytes as UTF-8, stripping a UTF-8 BOM.
fn decode(bytes: Vec<u8>, path: &Path) -> Result<String, StoreError> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(StoreError::InvalidEncoding {
            path: path.into(),
            encoding: "UTF-16 LE detected (byte order mark FF FE); convert to UTF-8".into(),
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(StoreError::InvalidEncoding {
            path: path.into(),
            encoding: "UTF-16 BE detected (byte order mark FE FF); convert to UTF-8".into(),
        });
    }

    let content = String::from_utf8(bytes).map_err(|e| StoreError::InvalidEncoding {
        path: path.into(),
        encoding: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
    })?;

    Ok(match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Scans a directory recursively for markdown (.md) files.
///
/// Skips hidden files and directories (starting with `.`). Returns paths
/// relative to the input directory.
///
/// # Errors
///
/// Returns `StoreError::DirectoryNotFound` if the directory doesn't exist.
/// Returns `StoreError::NotADirectory` if the path is not a directory.
pub fn scan_notes_directory(dir: &Path) -> Result<impl Iterator<Item = PathBuf>, StoreError> {
    if !dir.exists() {
        return Err(StoreError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(StoreError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let dir_owned = dir.to_path_buf();
    let iter = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(has_md_extension)
        .filter_map(move |e| {
            e.path()
                .strip_prefix(&dir_owned)
                .ok()
                .map(Path::to_path_buf)
        });

    Ok(iter)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

fn has_md_extension(entry: &DirEntry) -> bool {
    entry.path().extension().is_some_and(|e| e == "md")
}
