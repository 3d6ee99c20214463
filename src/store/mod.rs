//! Flat file subscriber storage.
//!
//! Every subscriber lives in its own file named after the raw email, inside `dir`.
//! A single `Mutex` serializes all file access of this process, and successful reads are memoized
//! in a cache that lives as long as the `Store` and is never invalidated.
//!
//! NOTE: the lock only covers this process. Several processes sharing one directory are not
//! coordinated.

use std::{
    collections::HashMap,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError, RwLock},
};

use tracing::{debug, info, warn};

use crate::model::{DeserSubscriber, ModelError, Subscriber, ValidEmail};

#[derive(Debug)]
pub struct Store {
    dir: PathBuf,
    lock: Mutex<()>,
    cache: RwLock<HashMap<String, Subscriber>>,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        info!("{:<20} - {}", "Subscriber storage:", dir.display());

        Store {
            dir,
            lock: Mutex::new(()),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists a new subscriber.
    ///
    /// Fails with `StoreError::AlreadyExists` if a record for the email is already stored, the
    /// stored record is left untouched. The existence check and the file creation happen in one
    /// exclusive-create call while holding the lock, so two concurrent writes of the same new
    /// email can't both succeed.
    pub fn write(&self, subscriber: &Subscriber) -> StoreResult<()> {
        let email = subscriber.email().as_ref();
        let json = subscriber.to_json()?;

        let _guard = self.lock();
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(email);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(er) if er.kind() == io::ErrorKind::AlreadyExists => {
                info!("Subscriber: {subscriber} already existed");
                return Err(StoreError::AlreadyExists(email.to_owned()));
            }
            Err(er) => return Err(er.into()),
        };

        if let Err(er) = file
            .write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
        {
            drop(file);
            // Don't leave a truncated record behind, it would block the email forever.
            if let Err(rm_er) = fs::remove_file(&path) {
                warn!("failed to remove partial record {}: {rm_er}", path.display());
            }
            return Err(er.into());
        }

        debug!("{:<20} - {}", "Stored subscriber:", path.display());
        Ok(())
    }

    /// The boolean flavour of `write`: `true` when the record was created, `false` on a
    /// duplicate or on any storage failure.
    pub fn try_write(&self, subscriber: &Subscriber) -> bool {
        match self.write(subscriber) {
            Ok(()) => true,
            Err(StoreError::AlreadyExists(_)) => false,
            Err(er) => {
                warn!("Failed adding subscriber: {subscriber}: {er}");
                false
            }
        }
    }

    /// Looks a subscriber up by email, from the cache if it has been read before.
    pub fn read(&self, email: &str) -> StoreResult<Subscriber> {
        if let Some(subscriber) = self.cached(email) {
            debug!("{:<20} - {email}", "Cache hit:");
            return Ok(subscriber);
        }

        // The key becomes a file name, anything that isn't an email can't name a record.
        if !ValidEmail::is_valid(email) {
            return Err(StoreError::NotFound(email.to_owned()));
        }

        let content = {
            let _guard = self.lock();
            match fs::read(self.dir.join(email)) {
                Ok(content) => content,
                Err(er) if er.kind() == io::ErrorKind::NotFound => {
                    return Err(StoreError::NotFound(email.to_owned()));
                }
                Err(er) => return Err(er.into()),
            }
        };

        let record: DeserSubscriber = serde_json::from_slice(&content)
            .map_err(|er| StoreError::Deserialize(email.to_owned(), er))?;
        let subscriber = Subscriber::try_from(record)
            .map_err(|er| StoreError::InvalidRecord(email.to_owned(), er))?;

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(email.to_owned(), subscriber.clone());

        Ok(subscriber)
    }

    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cached(&self, email: &str) -> Option<Subscriber> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(email)
            .cloned()
    }

    /// The lock guards no data, a panic while holding it can't leave anything half updated.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type StoreResult<T> = core::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("subscriber already exists: {0}")]
    AlreadyExists(String),
    #[error("subscriber not found: {0}")]
    NotFound(String),
    #[error("malformed record for {0}: {1}")]
    Deserialize(String, #[source] serde_json::Error),
    #[error("invalid record for {0}: {1}")]
    InvalidRecord(String, #[source] ModelError),

    #[error("failed to serialize subscriber: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
