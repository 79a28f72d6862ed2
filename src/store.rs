//! File-backed note storage.
//!
//! The whole collection lives in one JSON file. Every operation loads the
//! full array, works on it in memory, and (for mutations) rewrites the whole
//! file. [`Store`] owns the file path behind a reader/writer lock, so the only
//! way to touch the file is through [`Store::read`] or [`Store::write`].

use super::models::{Note, NoteCollection};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::{fs, sync::RwLock};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access notes file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("notes file {} is not a JSON array of notes", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot serialize notes for {}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no ids left after {max}")]
    IdsExhausted { max: i64 },
}

#[derive(Debug)]
pub struct Store {
    file: RwLock<PathBuf>,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: RwLock::new(path.into()),
        }
    }

    /// Run `op` against a snapshot of the collection while holding the lock
    /// in shared mode. Any number of readers may run at once.
    pub async fn read<T, E>(
        &self,
        op: impl FnOnce(&[Note]) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let path = self.file.read().await;
        let notes = load_all(&path).await?;
        op(&notes)
    }

    /// Load, mutate, save, all under the exclusive lock. The file is only
    /// rewritten when `op` succeeds; an error from `op` leaves it untouched.
    ///
    /// The guard is dropped on every return path, early `?` exits included.
    pub async fn write<T, E>(
        &self,
        op: impl FnOnce(&mut NoteCollection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let path = self.file.write().await;
        let mut notes = load_all(&path).await?;
        let out = op(&mut notes)?;
        save_all(&path, &notes).await?;
        Ok(out)
    }

    /// Make sure the file is there and parses. Returns the number of notes.
    pub async fn check(&self) -> Result<usize, StoreError> {
        self.read(|notes| Ok(notes.len())).await
    }
}

pub async fn load_all(path: &Path) -> Result<NoteCollection, StoreError> {
    let content = fs::read(path).await.map_err(|source| StoreError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| StoreError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Serialize fully in memory, then overwrite the file in a single write.
pub async fn save_all(path: &Path, notes: &[Note]) -> Result<(), StoreError> {
    let content = serde_json::to_vec_pretty(notes).map_err(|source| {
        StoreError::Serialize {
            path: path.to_owned(),
            source,
        }
    })?;
    fs::write(path, content)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_owned(),
            source,
        })
}

pub fn find_by_id(notes: &[Note], id: i64) -> Option<usize> {
    notes.iter().position(|n| n.id == id)
}

/// One past the highest id in the collection, so ids never collide with a
/// live note even when the array is empty or out of order.
pub fn next_id(notes: &[Note]) -> Result<i64, StoreError> {
    let max = notes.iter().map(|n| n.id).max().unwrap_or(0);
    max.checked_add(1).ok_or(StoreError::IdsExhausted { max })
}

/// Append a new note and return the id it was given.
pub fn insert(
    notes: &mut NoteCollection,
    title: String,
    description: String,
) -> Result<i64, StoreError> {
    let id = next_id(notes)?;
    notes.push(Note {
        id,
        title,
        description,
    });
    Ok(id)
}

/// Overwrite title and description in place. The id never changes.
pub fn update_at(
    notes: &mut [Note],
    index: usize,
    title: String,
    description: String,
) {
    let note = &mut notes[index];
    note.title = title;
    note.description = description;
}

pub fn delete_at(notes: &mut NoteCollection, index: usize) -> Note {
    notes.remove(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn note(id: i64, title: &str) -> Note {
        Note {
            id,
            title: title.to_string(),
            description: format!("about {title}"),
        }
    }

    fn notes_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = load_all(&dir.path().join("nope.json")).await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[tokio::test]
    async fn test_load_garbage_is_parse_error() {
        for content in ["", "not json", "{}", r#"[{"id": "one"}]"#] {
            let file = notes_file(content);
            let result = load_all(file.path()).await;
            assert!(
                matches!(result, Err(StoreError::Parse { .. })),
                "{content:?} should not parse"
            );
        }
    }

    #[tokio::test]
    async fn test_load_empty_array() {
        let file = notes_file("[]");
        let notes = load_all(file.path()).await.expect("load");
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_notes() {
        let file = notes_file("[]");
        let notes = vec![note(1, "a"), note(5, "b"), note(2, "c")];
        save_all(file.path(), &notes).await.expect("save");
        assert_eq!(load_all(file.path()).await.expect("load"), notes);
    }

    #[tokio::test]
    async fn test_save_of_loaded_content_is_stable() {
        let file = notes_file("[]");
        save_all(file.path(), &[note(1, "a"), note(2, "b")])
            .await
            .expect("save");
        let before = std::fs::read_to_string(file.path()).expect("read");

        let loaded = load_all(file.path()).await.expect("load");
        save_all(file.path(), &loaded).await.expect("save");
        let after = std::fs::read_to_string(file.path()).expect("read");

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_save_uses_two_space_indent() {
        let file = notes_file("[]");
        save_all(file.path(), &[note(1, "a")]).await.expect("save");
        let content = std::fs::read_to_string(file.path()).expect("read");
        assert_eq!(
            content,
            "[\n  {\n    \"id\": 1,\n    \"title\": \"a\",\n    \"description\": \"about a\"\n  }\n]"
        );
    }

    #[test]
    fn test_find_by_id() {
        let notes = vec![note(4, "a"), note(7, "b"), note(7, "dup")];
        assert_eq!(find_by_id(&notes, 4), Some(0));
        assert_eq!(find_by_id(&notes, 7), Some(1));
        assert_eq!(find_by_id(&notes, 9), None);
        assert_eq!(find_by_id(&[], 1), None);
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[]).expect("id"), 1);
        assert_eq!(next_id(&[note(1, "a"), note(2, "b")]).expect("id"), 3);
        // highest id is not last
        assert_eq!(next_id(&[note(9, "a"), note(3, "b")]).expect("id"), 10);
    }

    #[test]
    fn test_next_id_at_i64_max_is_an_error() {
        let mut notes = vec![note(1, "a"), note(i64::MAX, "b")];
        assert!(matches!(
            next_id(&notes),
            Err(StoreError::IdsExhausted { max: i64::MAX })
        ));
        assert!(insert(&mut notes, "c".into(), "c".into()).is_err());
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_insert_after_deleting_highest() {
        let mut notes = vec![note(1, "a"), note(2, "b"), note(3, "c")];
        delete_at(&mut notes, 2);
        let id = insert(&mut notes, "d".into(), "d".into()).expect("insert");
        assert_eq!(id, 3);
        assert_eq!(notes.iter().filter(|n| n.id == id).count(), 1);
    }

    #[test]
    fn test_delete_at_keeps_order() {
        let mut notes = vec![note(1, "a"), note(2, "b"), note(3, "c")];
        let removed = delete_at(&mut notes, 1);
        assert_eq!(removed.id, 2);
        assert_eq!(notes, vec![note(1, "a"), note(3, "c")]);
    }

    #[test]
    fn test_update_at_keeps_id() {
        let mut notes = vec![note(1, "a"), note(2, "b")];
        update_at(&mut notes, 1, String::new(), "new".into());
        assert_eq!(
            notes[1],
            Note {
                id: 2,
                title: String::new(),
                description: "new".into()
            }
        );
        assert_eq!(notes[0], note(1, "a"));
    }

    #[tokio::test]
    async fn test_failed_write_op_leaves_file_alone() {
        let content = r#"[{"id":1,"title":"a","description":"b"}]"#;
        let file = notes_file(content);
        let store = Store::new(file.path());

        let result: Result<(), anyhow::Error> = store
            .write(|notes| {
                notes.clear();
                Err(anyhow!("bail out"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(
            std::fs::read_to_string(file.path()).expect("read"),
            content
        );
    }

    #[tokio::test]
    async fn test_write_persists_mutation() {
        let file = notes_file("[]");
        let store = Store::new(file.path());

        let id = store
            .write(|notes| insert(notes, "t".into(), "d".into()))
            .await
            .expect("write");

        assert_eq!(id, 1);
        assert_eq!(store.check().await.expect("check"), 1);
    }

    #[tokio::test]
    async fn test_check_reports_corrupt_file() {
        let file = notes_file("[{");
        let store = Store::new(file.path());
        assert!(matches!(
            store.check().await,
            Err(StoreError::Parse { .. })
        ));
    }
}
