//! Document store boundary.
//!
//! The assistant never touches files directly: it goes through a
//! [`DocumentStore`], so any host that can create, append to and rename named
//! Markdown documents can carry the vault. [`FsVault`] is the plain-directory
//! implementation used by the CLI.

mod fs;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::VaultResult;

pub use fs::FsVault;

/// Structured fields attached to a document, merged key by key.
pub type FieldMap = BTreeMap<String, serde_json::Value>;

/// A store of named Markdown documents.
///
/// Names are logical (no extension). Implementations must be safe to call
/// from concurrent tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Whether [`set_structured_fields`](Self::set_structured_fields) is available.
    fn supports_structured_fields(&self) -> bool;

    /// Whether a document named `name` exists.
    async fn exists(&self, name: &str) -> VaultResult<bool>;

    /// Read a document's full text, structured fields included.
    async fn read_document(&self, name: &str) -> VaultResult<String>;

    /// Create a document.
    ///
    /// Fails with `AlreadyExists` when it exists and `overwrite` is false.
    async fn create_document(&self, name: &str, text: &str, overwrite: bool) -> VaultResult<()>;

    /// Append text to a document, creating it when missing.
    async fn append(&self, name: &str, text: &str) -> VaultResult<()>;

    /// Merge `fields` into the document's structured fields.
    ///
    /// Fails with `NotFound` when the document does not exist.
    async fn set_structured_fields(&self, name: &str, fields: &FieldMap) -> VaultResult<()>;

    /// Rename a document.
    ///
    /// Fails with `NotFound` when `from` is missing and `AlreadyExists` when
    /// `to` is taken.
    async fn rename_document(&self, from: &str, to: &str) -> VaultResult<()>;
}
