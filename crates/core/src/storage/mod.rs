//! Storage
//!
//! A small string-keyed medium for persisted client state. The cart only ever
//! needs `get` and `set` on one key, so anything that can hold a few kilobytes
//! of text under a name can back it: a shared in-memory map for tests and
//! embedding, or a directory of files for the command line.

use std::io;

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying filesystem failed.
    #[error("Storage IO error: {0}")]
    Io(#[from] io::Error),

    /// Writing the value would exceed the medium's size quota.
    #[error("Storage quota exceeded writing {key}: {requested} bytes requested, {quota} allowed")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Total bytes the medium would hold after the write
        requested: usize,
        /// Configured quota in bytes
        quota: usize,
    },

    /// The key cannot be represented by this medium.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The medium cannot be reached at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String-keyed storage medium.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Returns whether a value was present.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the medium cannot be written.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove(key)
    }
}
