/*!
 * SQLite connection handling.
 *
 * A single connection guarded by a mutex serves the whole process; clones
 * of the handle share it. Repository calls run their closures on the
 * blocking pool so database work never stalls the async runtime.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::Connection;

use super::schema;

/// Database file name under the data directory
const DB_FILENAME: &str = "translex.db";

/// Directory under the platform data dir that holds the database
const DB_DIRNAME: &str = "translex";

/// Shared handle to one open SQLite database
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Location of the database file, `:memory:` for throwaway databases
    path: PathBuf,

    /// The connection every clone of this handle shares
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open the database at the platform default location
    pub fn new_default() -> Result<Self> {
        Self::new(default_database_path()?)
    }

    /// Open or create the database at `path` and bring its schema current
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {:?}", parent))?;
        }

        info!("Opening database at {:?}", path);
        let connection = Connection::open(&path)
            .with_context(|| format!("Failed to open database {:?}", path))?;
        schema::apply(&connection)?;

        Ok(Self {
            path,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Open a throwaway in-memory database
    pub fn new_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");
        let connection =
            Connection::open_in_memory().context("Failed to open in-memory database")?;
        schema::apply(&connection)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the connection on the calling thread
    ///
    /// Prefer [`execute_async`](Self::execute_async) from async code; this
    /// variant blocks until the connection is free.
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let connection = self.connection.lock();
        f(&connection)
    }

    /// Run `f` against the connection on the blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let connection = connection.lock();
            f(&connection)
        })
        .await
        .context("Database task panicked")?
    }
}

/// Database location under the platform data directory
fn default_database_path() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .ok_or_else(|| anyhow::anyhow!("Could not determine a data directory"))?;

    Ok(base.join(DB_DIRNAME).join(DB_FILENAME))
}
