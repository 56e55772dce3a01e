use anyhow::Result;
use chrono::{DateTime, Utc};
use group_review_models::{SessionIdentity, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

const TOKEN_KEY: &str = "token";
const USER_ID_KEY: &str = "user_id";
const TOKEN_SAVED_AT_KEY: &str = "token_saved_at";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Flat key/value store backing the signed-in session.
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_token(&self) -> Option<&String> {
        self.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Store a bearer token and remember when it was saved.
    pub fn set_token(&mut self, token: String) {
        self.set(TOKEN_KEY.to_string(), token);
        self.set(TOKEN_SAVED_AT_KEY.to_string(), Utc::now().to_rfc3339());
    }

    pub fn get_token_saved_at(&self) -> Option<DateTime<Utc>> {
        self.get(TOKEN_SAVED_AT_KEY)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn get_user_id(&self) -> Option<UserId> {
        self.get(USER_ID_KEY).and_then(|s| s.trim().parse().ok())
    }

    pub fn set_user_id(&mut self, user_id: UserId) {
        self.set(USER_ID_KEY.to_string(), user_id.to_string());
    }

    /// The stored session, if a user id has been recorded. The token may be absent.
    pub fn session(&self) -> Option<SessionIdentity> {
        let user_id = self.get_user_id()?;
        Some(SessionIdentity::new(user_id, self.get_token().cloned()))
    }

    pub fn clear_session(&mut self) {
        self.remove(TOKEN_KEY);
        self.remove(TOKEN_SAVED_AT_KEY);
        self.remove(USER_ID_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_credential_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        store.set_token("test_token".to_string());
        store.set_user_id(42);
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        assert_eq!(loaded_store.get_token(), Some(&"test_token".to_string()));
        assert_eq!(loaded_store.get_user_id(), Some(42));
        assert!(loaded_store.get_token_saved_at().is_some());

        let session = loaded_store.session().unwrap();
        assert_eq!(session.user_id, 42);
        assert_eq!(session.token.as_deref(), Some("test_token"));
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::new(dir.path().join("credentials.toml"));
        store.load().unwrap();
        assert!(store.get_token().is_none());
        assert!(store.session().is_none());
    }

    #[test]
    fn test_session_without_token() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/test"));
        store.set_user_id(7);
        let session = store.session().unwrap();
        assert_eq!(session.user_id, 7);
        assert!(session.token.is_none());
    }

    #[test]
    fn test_clear_session() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/test"));
        store.set_token("abc".to_string());
        store.set_user_id(1);
        store.set("other".to_string(), "kept".to_string());

        store.clear_session();
        assert!(store.get_token().is_none());
        assert!(store.get_user_id().is_none());
        assert!(store.get_token_saved_at().is_none());
        assert_eq!(store.get("other"), Some(&"kept".to_string()));
    }

    #[test]
    fn test_unparseable_user_id_is_ignored() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/test"));
        store.set("user_id".to_string(), "not-a-number".to_string());
        assert!(store.get_user_id().is_none());
    }
}
