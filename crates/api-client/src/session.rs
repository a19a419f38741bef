use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::{fs, io};

use tracing::warn;

use rewarddesk_api::{ApiError, Identity, LoginRequest, LoginResponse};

use crate::error;
use crate::gateway::ApiGateway;

/// Storage key for the opaque session token.
pub const TOKEN_KEY: &str = "admin-token";
/// Storage key for the serialized operator identity.
pub const IDENTITY_KEY: &str = "identity.json";

/// Holds `{token, identity}` or nothing, survives process restarts, and keeps
/// the gateway credential in step with the persisted state.
///
/// Invariant: the session is either fully present (token and identity both
/// set, credential installed) or fully absent. No intermediate state is
/// observable outside an in-flight [`login`](Self::login).
pub struct SessionStore {
    gateway: Arc<ApiGateway>,
    dir: PathBuf,
    current: RwLock<Option<Identity>>,
}

impl SessionStore {
    /// `dir` is the directory owning the two storage keys; injected so tests
    /// run against a scratch directory instead of the operator's home.
    pub fn new(gateway: Arc<ApiGateway>, dir: impl Into<PathBuf>) -> Self {
        Self {
            gateway,
            dir: dir.into(),
            current: RwLock::new(None),
        }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }

    fn identity_path(&self) -> PathBuf {
        self.dir.join(IDENTITY_KEY)
    }

    /// Restore a persisted session on startup. Returns whether a session was
    /// restored. Absent or malformed records leave the session empty; this
    /// never fails.
    pub fn restore(&self) -> bool {
        let token = match fs::read_to_string(self.token_path()) {
            Ok(raw) => raw.trim().to_string(),
            Err(_) => return false,
        };
        if token.is_empty() {
            return false;
        }
        let identity: Identity = match fs::read_to_string(self.identity_path())
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
        {
            Some(identity) => identity,
            None => {
                warn!("persisted identity record missing or malformed, starting unauthenticated");
                return false;
            }
        };
        self.gateway.set_credential(&token);
        *self.current.write().expect("session lock poisoned") = Some(identity);
        true
    }

    /// Exchange credentials for a session token. On success the token and
    /// identity are persisted and the gateway credential installed; on any
    /// failure the normalized error propagates and state is untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self
            .gateway
            .post("/admin-auth/login", &req)
            .await
            .map_err(error::from_transport)?;
        let login: LoginResponse = error::read_json(resp).await?;

        self.persist(&login.token, &login.user)
            .map_err(|err| ApiError::new(format!("failed to persist session: {err}")))?;
        self.gateway.set_credential(&login.token);
        *self.current.write().expect("session lock poisoned") = Some(login.user.clone());
        Ok(login.user)
    }

    /// Clear the persisted session and the gateway credential. Idempotent: a
    /// logout on an already-empty session is a no-op.
    pub fn logout(&self) {
        for path in [self.token_path(), self.identity_path()] {
            if let Err(err) = fs::remove_file(&path) {
                if err.kind() != io::ErrorKind::NotFound {
                    warn!("could not remove {}: {err}", path.display());
                }
            }
        }
        self.gateway.clear_credential();
        *self.current.write().expect("session lock poisoned") = None;
    }

    pub fn identity(&self) -> Option<Identity> {
        self.current.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .expect("session lock poisoned")
            .is_some()
    }

    fn persist(&self, token: &str, identity: &Identity) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.token_path(), token)?;
        let raw = serde_json::to_string(identity).map_err(io::Error::other)?;
        if let Err(err) = fs::write(self.identity_path(), raw) {
            // Both keys or neither: drop the token again rather than leave a
            // half-written session on disk.
            let _ = fs::remove_file(self.token_path());
            return Err(err);
        }
        Ok(())
    }
}
