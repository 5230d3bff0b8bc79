//! CLI command implementations.

use mica_odb::{ObjectId, ObjectStore, OdbError};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Odb(#[from] OdbError),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Directory the object database lives under, relative to the repository.
const REPO_DIR: &str = ".git";

fn repo_dir(path: Option<&Path>) -> PathBuf {
    path.unwrap_or_else(|| Path::new(".")).join(REPO_DIR)
}

/// Initialize a repository: object and ref directories plus a HEAD
/// pointing at the default branch. Safe to run over an existing tree.
pub fn init(path: Option<&Path>) -> Result<()> {
    let base = repo_dir(path);

    tracing::info!(path = %base.display(), "initializing repository");

    std::fs::create_dir_all(base.join("objects"))?;
    std::fs::create_dir_all(base.join("refs"))?;
    std::fs::write(base.join("HEAD"), b"ref: refs/heads/master\n")?;

    println!("Initialized git directory");
    Ok(())
}

/// Hash a file as a blob, optionally storing it, and print the id.
pub fn hash_object(file: &Path, write: bool) -> Result<()> {
    let content = std::fs::read(file)?;
    let store = ObjectStore::new(repo_dir(None));

    let id = if write {
        store.write_blob(content)?
    } else {
        mica_odb::Object::blob(content).id
    };

    println!("{id}");
    Ok(())
}

/// Print a stored object's payload verbatim on stdout.
pub fn cat_file(object: &str) -> Result<()> {
    let id = ObjectId::from_hex(object)?;
    let store = ObjectStore::new(repo_dir(None));

    let obj = store.read(&id)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&obj.data)?;
    stdout.flush()?;
    Ok(())
}
