//! Secret providers.

use std::collections::HashMap;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cronvault_protocols::{SecretError, SecretProvider};
use parking_lot::RwLock;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

type Secrets = HashMap<String, HashMap<String, String>>;

/// In-memory secret provider for testing and single-process deployments.
pub struct MemorySecretProvider {
    secrets: RwLock<Secrets>,
}

impl MemorySecretProvider {
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
        }
    }

    /// Seed a secret.
    pub fn with_secret(self, name: impl Into<String>, fields: HashMap<String, String>) -> Self {
        self.secrets.write().insert(name.into(), fields);
        self
    }

    /// Fields of `name`, if stored.
    pub fn secret(&self, name: &str) -> Option<HashMap<String, String>> {
        self.secrets.read().get(name).cloned()
    }
}

impl Default for MemorySecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretProvider for MemorySecretProvider {
    async fn get_secret(&self, name: &str) -> Result<HashMap<String, String>, SecretError> {
        self.secret(name)
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }

    async fn store_secret(
        &self,
        name: &str,
        secrets: HashMap<String, String>,
    ) -> Result<(), SecretError> {
        self.secrets.write().insert(name.to_string(), secrets);
        Ok(())
    }
}

/// Secret provider backed by one JSON file: `{ "<name>": { "<field>": "<value>" } }`.
///
/// Writes go to a sibling temp file (mode 0600 on unix) that is renamed
/// over the original.
pub struct FileSecretProvider {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSecretProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Secrets, SecretError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(SecretError::Unavailable(format!(
                    "Failed to read secret file {:?}: {}",
                    self.path, e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            SecretError::Unavailable(format!(
                "Failed to parse secret file {:?}: {}",
                self.path, e
            ))
        })
    }

    async fn write_all(&self, secrets: &Secrets) -> Result<(), SecretError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                SecretError::Unavailable(format!("Failed to create secret directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(secrets).map_err(|e| {
            SecretError::Unavailable(format!("Failed to serialize secrets: {}", e))
        })?;

        let tmp = self.path.with_extension("tmp");
        write_private(&tmp, content.as_bytes()).await.map_err(|e| {
            SecretError::Unavailable(format!("Failed to write secret file: {}", e))
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            SecretError::Unavailable(format!("Failed to replace secret file: {}", e))
        })?;

        Ok(())
    }
}

/// Write `content` to `path`, readable by the owner only on unix.
async fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    // A leftover file keeps its old mode through `open`.
    #[cfg(unix)]
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
        .await?;
    file.write_all(content).await?;
    file.sync_all().await?;
    Ok(())
}

#[async_trait]
impl SecretProvider for FileSecretProvider {
    async fn get_secret(&self, name: &str) -> Result<HashMap<String, String>, SecretError> {
        let mut secrets = self.read_all().await?;
        secrets
            .remove(name)
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }

    async fn store_secret(
        &self,
        name: &str,
        fields: HashMap<String, String>,
    ) -> Result<(), SecretError> {
        let _guard = self.write_lock.lock().await;

        let mut secrets = self.read_all().await?;
        secrets.insert(name.to_string(), fields);
        self.write_all(&secrets).await?;

        debug!("Stored secret '{}' in {:?}", name, self.path);
        Ok(())
    }
}
