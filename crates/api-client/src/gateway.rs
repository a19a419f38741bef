use std::sync::RwLock;
use std::time::Duration;

use serde::Serialize;

use rewarddesk_api::ApiError;

use crate::error;

/// Single point of HTTP egress: fixed base address, mutable bearer credential.
///
/// The credential is injected state with exactly two mutation entry points,
/// [`set_credential`](Self::set_credential) and
/// [`clear_credential`](Self::clear_credential) — both driven by the session
/// store. Requests attach `Authorization: Bearer <token>` while a credential
/// is installed and omit the header otherwise.
///
/// The gateway does not retry and does not cache; raw transport/HTTP outcomes
/// go back to the resource clients for normalization.
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: String,
    credential: RwLock<Option<String>>,
}

impl ApiGateway {
    /// Create a gateway with the given base URL and request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(error::from_transport)?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_credential(&self, token: &str) {
        *self.credential.write().expect("credential lock poisoned") = Some(token.to_string());
    }

    pub fn clear_credential(&self) {
        *self.credential.write().expect("credential lock poisoned") = None;
    }

    pub fn has_credential(&self) -> bool {
        self.credential
            .read()
            .expect("credential lock poisoned")
            .is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self
            .credential
            .read()
            .expect("credential lock poisoned")
            .as_deref()
        {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn get(&self, path: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.authorize(self.client.get(self.url(path))).send().await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.authorize(self.client.post(self.url(path)))
            .json(body)
            .send()
            .await
    }

    pub async fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.authorize(self.client.put(self.url(path)))
            .json(body)
            .send()
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.authorize(self.client.delete(self.url(path)))
            .send()
            .await
    }
}
