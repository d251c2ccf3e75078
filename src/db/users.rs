use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::User;

/// Outcome of an upsert on the credential store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new user was created with the next sequential id
    Created(User),
    /// The username already existed and its password hash was replaced
    PasswordReset(User),
}

/// Credential store boundary
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Create the user, or replace the password hash if the username exists
    async fn upsert(&self, username: &str, password_hash: String) -> Result<UpsertOutcome>;

    /// Create the user; an existing username is `UserAlreadyExists` and stays untouched
    async fn insert(&self, username: &str, password_hash: String) -> Result<User>;

    /// Confirm the backing store is readable
    async fn ping(&self) -> Result<()>;
}

/// Credential store backed by a single JSON array file
///
/// Every mutation rewrites the whole file. A mutex serializes the
/// read-modify-write so concurrent signups in this process cannot race; the
/// file is replaced via a temporary sibling and a rename.
pub struct JsonFileUserStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileUserStore {
    /// Open the store, creating the file (and parent directory) with `[]` if missing
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        tracing::info!("Opening user store at: {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !tokio::fs::try_exists(parent).await? {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, b"[]").await?;
            tracing::info!("Created empty user store");
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    async fn read_all(&self) -> Result<Vec<User>> {
        let bytes = tokio::fs::read(&self.path).await?;
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Append a user with the next sequential id and persist; caller holds the lock
    async fn push_new(
        &self,
        users: &mut Vec<User>,
        username: &str,
        password_hash: String,
    ) -> Result<User> {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id: next_id,
            username: username.to_string(),
            password_hash,
        };
        users.push(user.clone());
        self.write_all(users).await?;

        tracing::info!("New user created with id {}", user.id);
        Ok(user)
    }

    async fn write_all(&self, users: &[User]) -> Result<()> {
        let json = serde_json::to_vec_pretty(users)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for JsonFileUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let _guard = self.lock.lock().await;
        let users = self.read_all().await?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    async fn upsert(&self, username: &str, password_hash: String) -> Result<UpsertOutcome> {
        let _guard = self.lock.lock().await;
        let mut users = self.read_all().await?;

        if let Some(existing) = users.iter_mut().find(|u| u.username == username) {
            existing.password_hash = password_hash;
            let user = existing.clone();
            self.write_all(&users).await?;
            tracing::info!("Password reset for user {}", user.id);
            return Ok(UpsertOutcome::PasswordReset(user));
        }

        let user = self.push_new(&mut users, username, password_hash).await?;
        Ok(UpsertOutcome::Created(user))
    }

    async fn insert(&self, username: &str, password_hash: String) -> Result<User> {
        let _guard = self.lock.lock().await;
        let mut users = self.read_all().await?;

        if users.iter().any(|u| u.username == username) {
            tracing::info!("Signup rejected for existing username");
            return Err(AppError::UserAlreadyExists);
        }

        self.push_new(&mut users, username, password_hash).await
    }

    async fn ping(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.read_all().await.map(|_| ())
    }
}
