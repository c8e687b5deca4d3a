// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session blob persistence.
//!
//! One JSON blob under a single path; absent, unreadable, or malformed data
//! is treated as "no session" and discarded so a half-written file can never
//! produce a half-valid session.

use std::path::PathBuf;

use haulio_core::error::HaulioError;
use haulio_core::types::Session;
use tracing::{debug, warn};

use haulio_config::model::SessionConfig;

/// Reads and writes the persisted session blob.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Resolves the blob path from config, defaulting to
    /// `<data_dir>/haulio/session.json`.
    pub fn from_config(config: &SessionConfig) -> Result<Self, HaulioError> {
        let path = match &config.file {
            Some(path) => PathBuf::from(path),
            None => dirs::data_dir()
                .ok_or_else(|| {
                    HaulioError::Config(
                        "no data directory available; set session.file explicitly".to_string(),
                    )
                })?
                .join("haulio/session.json"),
        };
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Loads the persisted session.
    ///
    /// Returns `None` -- and removes the blob -- for anything that is not a
    /// structurally complete session: unreadable file, malformed JSON,
    /// missing fields, or an empty user id.
    pub fn load(&self) -> Option<Session> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "session blob unreadable, discarding");
                self.clear();
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if session.is_complete() => Some(session),
            Ok(_) => {
                warn!(path = %self.path.display(), "session blob incomplete, discarding");
                self.clear();
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "session blob malformed, discarding");
                self.clear();
                None
            }
        }
    }

    /// Writes the session blob, creating parent directories as needed.
    pub fn save(&self, session: &Session) -> Result<(), HaulioError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| HaulioError::Storage {
                message: format!("failed to create {}: {e}", parent.display()),
                source: Some(Box::new(e)),
            })?;
        }

        let raw = serde_json::to_string(session).map_err(|e| HaulioError::Storage {
            message: format!("failed to encode session: {e}"),
            source: Some(Box::new(e)),
        })?;

        std::fs::write(&self.path, raw).map_err(|e| HaulioError::Storage {
            message: format!("failed to write {}: {e}", self.path.display()),
            source: Some(Box::new(e)),
        })?;

        // The blob holds token material; keep it owner-readable only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) =
                std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
            {
                warn!(path = %self.path.display(), error = %e, "failed to restrict session blob permissions");
            }
        }

        debug!(path = %self.path.display(), "session blob written");
        Ok(())
    }

    /// Removes the blob. Missing files are fine; other failures are logged
    /// and otherwise ignored -- clearing must never turn into an error path.
    pub fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "session blob removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove session blob");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn file_in_temp() -> (SessionFile, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("session.json"));
        (file, dir)
    }

    fn session() -> Session {
        Session {
            user_id: "u1".into(),
            email: Some("mover@example.com".into()),
            access_token: "at".into(),
            refresh_token: "rt".into(),
            expires_at: 1_900_000_000,
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let (file, _dir) = file_in_temp();
        file.save(&session()).unwrap();

        let loaded = file.load().unwrap();
        assert_eq!(loaded, session());
    }

    #[test]
    fn missing_file_is_no_session() {
        let (file, _dir) = file_in_temp();
        assert!(file.load().is_none());
    }

    #[test]
    fn malformed_json_is_discarded() {
        let (file, _dir) = file_in_temp();
        std::fs::write(file.path(), "{not json").unwrap();

        assert!(file.load().is_none());
        assert!(!file.path().exists(), "malformed blob should be removed");
    }

    #[test]
    fn missing_fields_are_discarded() {
        let (file, _dir) = file_in_temp();
        std::fs::write(file.path(), r#"{"user_id":"u1","access_token":"at"}"#).unwrap();

        assert!(file.load().is_none());
        assert!(!file.path().exists());
    }

    #[test]
    fn empty_user_id_is_discarded() {
        let (file, _dir) = file_in_temp();
        let mut bad = session();
        bad.user_id = String::new();
        std::fs::write(file.path(), serde_json::to_string(&bad).unwrap()).unwrap();

        assert!(file.load().is_none());
        assert!(!file.path().exists());
    }

    #[test]
    fn clear_is_idempotent() {
        let (file, _dir) = file_in_temp();
        file.save(&session()).unwrap();
        file.clear();
        file.clear();
        assert!(!file.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn blob_is_owner_readable_only() {
        use std::os::unix::fs::PermissionsExt;
        let (file, _dir) = file_in_temp();
        file.save(&session()).unwrap();
        let mode = std::fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
