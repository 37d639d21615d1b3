//! SQLite API key store.
//!
//! Keys are never stored in plaintext: only the lowercase hex SHA-256 of the
//! key is kept in `api_keys.key_hash`. A key resolves to the user id it was
//! minted for and an admin flag.

use aes_gcm::aead::{OsRng, rand_core::RngCore};
use livesession_types::error::RepositoryError;
use sha2::{Digest, Sha256};
use sqlx::Row;

use super::pool::DatabasePool;

/// Prefix for every minted key, to make them recognizable in logs and configs.
pub const API_KEY_PREFIX: &str = "lsk_";

/// Identity an API key resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyRecord {
    pub id: String,
    pub user_id: String,
    pub is_admin: bool,
}

/// SQLite-backed API key lookups.
#[derive(Clone)]
pub struct SqliteApiKeyStore {
    pool: DatabasePool,
}

impl SqliteApiKeyStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Mint a new key for `user_id` and store its hash.
    ///
    /// Returns the plaintext key; it cannot be recovered later.
    pub async fn create_key(
        &self,
        user_id: &str,
        name: &str,
        is_admin: bool,
    ) -> Result<String, RepositoryError> {
        let plaintext_key = generate_api_key();
        let id = uuid::Uuid::now_v7().to_string();
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            "INSERT INTO api_keys (id, key_hash, user_id, is_admin, name, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(hash_api_key(&plaintext_key))
        .bind(user_id)
        .bind(is_admin)
        .bind(name)
        .bind(now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tracing::info!(user_id = %user_id, is_admin, "API key created");
        Ok(plaintext_key)
    }

    /// Resolve a plaintext key to its record.
    pub async fn find_by_key(&self, plaintext_key: &str) -> Result<Option<ApiKeyRecord>, RepositoryError> {
        let row = sqlx::query("SELECT id, user_id, is_admin FROM api_keys WHERE key_hash = ?")
            .bind(hash_api_key(plaintext_key))
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| -> Result<ApiKeyRecord, sqlx::Error> {
            Ok(ApiKeyRecord {
                id: row.try_get("id")?,
                user_id: row.try_get("user_id")?,
                is_admin: row.try_get("is_admin")?,
            })
        })
        .transpose()
        .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    /// Record that a key was just used.
    pub async fn touch(&self, id: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE api_keys SET last_used_at = ? WHERE id = ?")
            .bind(chrono::Utc::now().timestamp())
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }
}

/// Compute SHA-256 hash of an API key (lowercase hex).
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)
}

fn generate_api_key() -> String {
    let mut key_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut key_bytes);
    format!(
        "{API_KEY_PREFIX}{}",
        key_bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;

    #[test]
    fn test_hash_is_stable_hex() {
        let hash = hash_api_key("lsk_abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_api_key("lsk_abc"));
        assert_ne!(hash, hash_api_key("lsk_abd"));
    }

    #[test]
    fn test_generated_keys_are_prefixed_and_unique() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert!(a.starts_with(API_KEY_PREFIX));
        assert_eq!(a.len(), API_KEY_PREFIX.len() + 64);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_create_and_resolve_key() {
        let store = SqliteApiKeyStore::new(test_pool().await);
        let key = store.create_key("alice", "laptop", false).await.unwrap();
        let admin_key = store.create_key("root", "default", true).await.unwrap();

        let record = store.find_by_key(&key).await.unwrap().unwrap();
        assert_eq!(record.user_id, "alice");
        assert!(!record.is_admin);

        let admin = store.find_by_key(&admin_key).await.unwrap().unwrap();
        assert!(admin.is_admin);

        assert!(store.find_by_key("lsk_unknown").await.unwrap().is_none());
        store.touch(&record.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_plaintext_is_not_stored() {
        let store = SqliteApiKeyStore::new(test_pool().await);
        let key = store.create_key("alice", "default", false).await.unwrap();

        let stored: (String,) = sqlx::query_as("SELECT key_hash FROM api_keys")
            .fetch_one(&store.pool.reader)
            .await
            .unwrap();
        assert_ne!(stored.0, key);
        assert_eq!(stored.0, hash_api_key(&key));
    }
}
