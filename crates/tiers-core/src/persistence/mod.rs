//! Persistence collaborator interface
//!
//! The engine never owns storage. It reads whole documents and changes them
//! through read-modify-write edits that the backend must apply atomically
//! per document. Nothing here coordinates edits across documents.

mod documents;
mod memory;

use async_trait::async_trait;

use crate::error::StorageError;

pub use documents::{ServerDocument, ServerSettings, SettingValues, UserDocument, UserSettings};
pub use memory::InMemoryPersistence;

/// Mutation applied to a user document inside one atomic edit
pub type UserEdit = Box<dyn FnOnce(&mut UserDocument) + Send>;

/// Mutation applied to a server document inside one atomic edit
pub type ServerEdit = Box<dyn FnOnce(&mut ServerDocument) + Send>;

/// Document store backing the settings engine
///
/// Reads of an entity that was never written return an empty document.
/// Edits create the document on first write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsPersistence: Send + Sync {
    async fn get_data_for_user(&self, user_id: &str) -> Result<UserDocument, StorageError>;

    async fn get_data_for_server(&self, server_id: &str) -> Result<ServerDocument, StorageError>;

    /// Atomically read, mutate and write back a user document
    async fn edit_data_for_user(&self, user_id: &str, edit: UserEdit) -> Result<(), StorageError>;

    /// Atomically read, mutate and write back a server document
    async fn edit_data_for_server(
        &self,
        server_id: &str,
        edit: ServerEdit,
    ) -> Result<(), StorageError>;
}
