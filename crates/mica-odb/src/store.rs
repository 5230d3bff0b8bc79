//! Filesystem-backed object store.

use crate::{zlib, Object, ObjectId, OdbError, Result};
use bytes::Bytes;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Content-addressed object store rooted at an explicit base directory.
///
/// Objects live at `<base>/objects/<id[0..2]>/<id[2..]>`, zlib-compressed.
/// The two-level shard bounds per-directory entry counts. The base path is
/// always supplied by the caller; the store never assumes a process-wide
/// repository root.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    base: PathBuf,
}

impl ObjectStore {
    /// Creates a store rooted at `base`. No filesystem access happens
    /// until the first operation.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Returns the base directory this store operates under.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Returns the sharded path an object id maps to.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.base.join("objects").join(&hex[..2]).join(&hex[2..])
    }

    /// Checks whether an object is present. Does not validate content.
    pub fn exists(&self, id: &ObjectId) -> bool {
        self.object_path(id).is_file()
    }

    /// Persists an object, returning its id.
    ///
    /// Idempotent: if the sharded path already exists the write is a
    /// no-op, since content addressing guarantees the bytes on disk are
    /// identical. New objects are written to a temporary file in the
    /// shard directory and renamed into place, so a failed or interrupted
    /// write never leaves a partial object visible under its final name.
    /// Concurrent writers of the same content race benignly on the rename.
    pub fn write(&self, object: &Object) -> Result<ObjectId> {
        let id = object.id;
        let hex = id.to_hex();
        let dir = self.base.join("objects").join(&hex[..2]);
        let path = dir.join(&hex[2..]);

        if path.exists() {
            tracing::trace!(id = %id, "object already stored");
            return Ok(id);
        }

        // Tolerates the shard directory being created concurrently.
        fs::create_dir_all(&dir)?;

        let compressed = zlib::compress(&object.encode())?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&compressed)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| OdbError::Io(e.error))?;

        tracing::debug!(id = %id, size = object.size(), "stored object");
        Ok(id)
    }

    /// Persists a blob payload and returns its id.
    pub fn write_blob(&self, content: impl Into<Bytes>) -> Result<ObjectId> {
        self.write(&Object::blob(content))
    }

    /// Loads an object by id.
    ///
    /// Fails with [`OdbError::NotFound`] only when no file exists at the
    /// sharded path; a file that fails to decompress or decode surfaces
    /// the corruption as its own error kind so callers can tell the two
    /// apart.
    pub fn read(&self, id: &ObjectId) -> Result<Object> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OdbError::NotFound(id.to_hex()));
            }
            Err(e) => return Err(e.into()),
        };

        let encoded = zlib::decompress(&compressed)?;
        let object = Object::decode(&encoded)?;
        tracing::trace!(id = %id, size = object.size(), "read object");
        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectKind;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, ObjectStore) {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_write_read_roundtrip() {
        let (_dir, store) = temp_store();
        let id = store.write_blob(b"file content".to_vec()).unwrap();

        let obj = store.read(&id).unwrap();
        assert_eq!(obj.kind, ObjectKind::Blob);
        assert_eq!(obj.data.as_ref(), b"file content");
        assert_eq!(obj.id, id);
    }

    #[test]
    fn test_write_read_empty_payload() {
        let (_dir, store) = temp_store();
        let id = store.write_blob(b"".to_vec()).unwrap();
        assert_eq!(id.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");

        let obj = store.read(&id).unwrap();
        assert!(obj.data.is_empty());
    }

    #[test]
    fn test_object_path_sharding() {
        let store = ObjectStore::new("/repo/.git");
        let id = ObjectId::from_hex("bd9dbf5aae1a3862dd1526723246b20206e5fc3e").unwrap();
        assert_eq!(
            store.object_path(&id),
            Path::new("/repo/.git/objects/bd/9dbf5aae1a3862dd1526723246b20206e5fc3e")
        );
    }

    #[test]
    fn test_exists() {
        let (_dir, store) = temp_store();
        let id = store.write_blob(b"present".to_vec()).unwrap();
        assert!(store.exists(&id));

        let absent = ObjectId::from_bytes([0x42; 20]);
        assert!(!store.exists(&absent));
    }

    #[test]
    fn test_idempotent_write() {
        let (_dir, store) = temp_store();
        let first = store.write_blob(b"same content".to_vec()).unwrap();
        let second = store.write_blob(b"same content".to_vec()).unwrap();
        assert_eq!(first, second);

        // Exactly one file in the shard directory, no leftover temp files.
        let shard = store.object_path(&first);
        let entries: Vec<_> = fs::read_dir(shard.parent().unwrap())
            .unwrap()
            .collect::<std::io::Result<_>>()
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path(), shard);
    }

    #[test]
    fn test_read_unknown_id() {
        let (_dir, store) = temp_store();
        let id = ObjectId::from_bytes([0xaa; 20]);
        let err = store.read(&id).unwrap_err();
        assert!(matches!(err, OdbError::NotFound(hex) if hex == id.to_hex()));
    }

    #[test]
    fn test_read_corrupt_compressed_stream() {
        let (_dir, store) = temp_store();
        let id = store.write_blob(b"to be corrupted".to_vec()).unwrap();

        let path = store.object_path(&id);
        let mut bytes = fs::read(&path).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xff;
        fs::write(&path, &bytes).unwrap();

        // Corruption must not be reported as NotFound or return wrong bytes.
        let err = store.read(&id).unwrap_err();
        match err {
            OdbError::Compression(_)
            | OdbError::MalformedHeader(_)
            | OdbError::SizeMismatch { .. }
            | OdbError::UnsupportedType(_) => {}
            other => panic!("expected corruption error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_truncated_object_file() {
        let (_dir, store) = temp_store();
        let id = store.write_blob(b"truncate me, a payload long enough to matter".to_vec()).unwrap();

        let path = store.object_path(&id);
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        let err = store.read(&id).unwrap_err();
        assert!(matches!(err, OdbError::Compression(_)));
    }

    #[test]
    fn test_read_valid_zlib_bad_header() {
        let (_dir, store) = temp_store();
        let id = ObjectId::from_bytes([0x11; 20]);
        let path = store.object_path(&id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        // A well-formed zlib stream whose contents are not a valid object.
        fs::write(&path, zlib::compress(b"blob five\0hello").unwrap()).unwrap();
        let err = store.read(&id).unwrap_err();
        assert!(matches!(err, OdbError::MalformedHeader(_)));
    }

    #[test]
    fn test_read_declared_size_mismatch_on_disk() {
        let (_dir, store) = temp_store();
        let id = ObjectId::from_bytes([0x22; 20]);
        let path = store.object_path(&id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        fs::write(&path, zlib::compress(b"blob 99\0short").unwrap()).unwrap();
        let err = store.read(&id).unwrap_err();
        assert!(matches!(err, OdbError::SizeMismatch { declared: 99, actual: 5 }));
    }

    #[test]
    fn test_two_stores_same_base() {
        let (dir, store_a) = temp_store();
        let store_b = ObjectStore::new(dir.path());

        let id = store_a.write_blob(b"shared".to_vec()).unwrap();
        // A second writer of identical content is a no-op on the same file.
        assert_eq!(store_b.write_blob(b"shared".to_vec()).unwrap(), id);
        assert_eq!(store_b.read(&id).unwrap().data.as_ref(), b"shared");
    }

    #[test]
    fn test_stored_bytes_are_compressed_encoding() {
        let (_dir, store) = temp_store();
        let obj = Object::blob(b"what is up, doc?".to_vec());
        let id = store.write(&obj).unwrap();

        let on_disk = fs::read(store.object_path(&id)).unwrap();
        assert_eq!(zlib::decompress(&on_disk).unwrap(), obj.encode());
    }
}
