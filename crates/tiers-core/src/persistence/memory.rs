//! In-process document store

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StorageError;

use super::{ServerDocument, ServerEdit, SettingsPersistence, UserDocument, UserEdit};

/// Keeps every document in memory
///
/// Each edit holds the store's write lock for the whole read-modify-write,
/// which makes edits to the same document serialize.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    users: RwLock<HashMap<String, UserDocument>>,
    servers: RwLock<HashMap<String, ServerDocument>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a document was ever written for this user
    pub async fn has_user(&self, user_id: &str) -> bool {
        self.users.read().await.contains_key(user_id)
    }

    /// Whether a document was ever written for this server
    pub async fn has_server(&self, server_id: &str) -> bool {
        self.servers.read().await.contains_key(server_id)
    }
}

#[async_trait]
impl SettingsPersistence for InMemoryPersistence {
    async fn get_data_for_user(&self, user_id: &str) -> Result<UserDocument, StorageError> {
        Ok(self
            .users
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_data_for_server(&self, server_id: &str) -> Result<ServerDocument, StorageError> {
        Ok(self
            .servers
            .read()
            .await
            .get(server_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn edit_data_for_user(&self, user_id: &str, edit: UserEdit) -> Result<(), StorageError> {
        let mut users = self.users.write().await;
        edit(users.entry(user_id.to_string()).or_default());
        Ok(())
    }

    async fn edit_data_for_server(
        &self,
        server_id: &str,
        edit: ServerEdit,
    ) -> Result<(), StorageError> {
        let mut servers = self.servers.write().await;
        edit(servers.entry(server_id.to_string()).or_default());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reads_never_create_documents() {
        let store = InMemoryPersistence::new();
        let doc = store.get_data_for_user("u1").await.unwrap();
        assert_eq!(doc, UserDocument::default());
        assert!(!store.has_user("u1").await);
    }

    #[tokio::test]
    async fn test_edit_creates_and_updates() {
        let store = InMemoryPersistence::new();
        store
            .edit_data_for_server(
                "s1",
                Box::new(|doc: &mut ServerDocument| {
                    doc.set_channel_setting("c1", "volume", json!(2))
                }),
            )
            .await
            .unwrap();
        assert!(store.has_server("s1").await);

        let doc = store.get_data_for_server("s1").await.unwrap();
        assert_eq!(doc.channel_setting("c1", "volume"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_concurrent_edits_do_not_lose_writes() {
        let store = Arc::new(InMemoryPersistence::new());
        let mut tasks = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store
                    .edit_data_for_user(
                        "u1",
                        Box::new(move |doc: &mut UserDocument| {
                            doc.set_setting(format!("setting_{i}"), json!(i))
                        }),
                    )
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let doc = store.get_data_for_user("u1").await.unwrap();
        assert_eq!(doc.settings.global.len(), 32);
    }
}
