use crate::config::Config;
use crate::domain::auth::TokenPair;
use crate::error::{Error, Result};
use crate::storage::TokenStore;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::watch;

use super::dto::{RefreshRequest, RotatedTokens};
use super::envelope::{self, Payload};
use super::refresh::{RefreshGate, RefreshOutcome, Ticket};

const REFRESH_ENDPOINT: &str = "/auth/token/refresh/";

/// Whether the client currently holds a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    SignedIn,
    SignedOut,
}

/// HTTP client for the FitTrack API.
///
/// Every request gets the bearer token attached and its response envelope
/// unwrapped. A 401 triggers one transparent token refresh; concurrent 401s
/// share a single refresh and the original requests are retried once with
/// the new access token.
///
/// Cloning is cheap. Clones share the token store, the refresh gate and the
/// auth state channel.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base: String,
    store: TokenStore,
    gate: RefreshGate,
    auth_tx: watch::Sender<AuthState>,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_store(config.api_base(), TokenStore::new(config.session.resolve_session_path()))
    }

    /// Client over an explicit store, for callers that manage persistence
    /// themselves.
    #[must_use]
    pub fn with_store(base: String, store: TokenStore) -> Self {
        let initial = if store.is_authenticated() {
            AuthState::SignedIn
        } else {
            AuthState::SignedOut
        };
        let (auth_tx, _) = watch::channel(initial);
        Self {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                base,
                store,
                gate: RefreshGate::default(),
                auth_tx,
            }),
        }
    }

    /// Observe sign-in and sign-out transitions, including the forced
    /// sign-out when a refresh token is rejected mid-request.
    #[must_use]
    pub fn auth_state(&self) -> watch::Receiver<AuthState> {
        self.inner.auth_tx.subscribe()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.store.is_authenticated()
    }

    pub(crate) fn store(&self) -> &TokenStore {
        &self.inner.store
    }

    /// Installs a fresh token pair after an explicit sign-in.
    pub(crate) fn install_session(&self, pair: &TokenPair) {
        self.inner.store.set_pair(pair);
        self.inner.auth_tx.send_replace(AuthState::SignedIn);
    }

    /// Clears the session and then tells observers. Used on sign-out and
    /// when the refresh flow concludes the session is gone.
    pub(crate) fn drop_session(&self) {
        self.inner.store.clear();
        self.inner.auth_tx.send_replace(AuthState::SignedOut);
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Ok(self.request::<T, ()>(Method::GET, path, None, None).await?.data)
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        Ok(self.request::<T, ()>(Method::GET, path, Some(query), None).await?.data)
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        Ok(self.request(Method::POST, path, None, Some(body)).await?.data)
    }

    /// POST that keeps the envelope's message and warning alongside the data.
    pub(crate) async fn post_payload<T, B>(&self, path: &str, body: &B) -> Result<Payload<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, None, Some(body)).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Ok(self.request::<T, ()>(Method::POST, path, None, None).await?.data)
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        Ok(self.request(Method::PUT, path, None, Some(body)).await?.data)
    }

    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        Ok(self.request(Method::PATCH, path, None, Some(body)).await?.data)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.request::<(), ()>(Method::DELETE, path, None, None).await?;
        Ok(())
    }

    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&B>,
    ) -> Result<Payload<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let access = self.inner.store.access();
        let response = self.send(method.clone(), path, query, body, access).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return envelope::decode(path, response).await;
        }

        // The access token was rejected. Obtain a fresh one, from the
        // in-flight refresh if there is one, and retry exactly once.
        let access = self.refreshed_access().await?;
        tracing::debug!(path, "retrying request with refreshed access token");
        let retry = self.send(method, path, query, body, Some(access)).await?;
        envelope::decode(path, retry).await
    }

    /// Resolves a usable access token after a 401, refreshing or waiting on
    /// the refresh already under way.
    async fn refreshed_access(&self) -> Result<String> {
        let Some(refresh) = self.inner.store.refresh() else {
            // No refresh token, nothing to recover. The session is gone.
            self.drop_session();
            return Err(Error::Unauthorized);
        };
        match self.inner.gate.begin_or_wait() {
            Ticket::Wait(outcome) => match outcome.await {
                Ok(RefreshOutcome::Refreshed(access)) => Ok(access),
                Ok(RefreshOutcome::Failed(cause)) => Err(Error::SessionExpired(cause)),
                Err(_) => Err(Error::Unauthorized),
            },
            Ticket::Lead(guard) => match self.exchange_refresh(&refresh).await {
                Ok(tokens) => {
                    self.inner.store.set_access(Some(tokens.access.clone()));
                    if let Some(rotated) = &tokens.refresh {
                        self.inner.store.set_refresh(Some(rotated));
                    }
                    guard.settle(&RefreshOutcome::Refreshed(tokens.access.clone()));
                    Ok(tokens.access)
                }
                Err(error) => {
                    tracing::warn!(%error, "token refresh failed, signing out");
                    let cause = Arc::new(error);
                    guard.settle(&RefreshOutcome::Failed(Arc::clone(&cause)));
                    self.drop_session();
                    Err(Error::SessionExpired(cause))
                }
            },
        }
    }

    /// Exchanges the refresh token for fresh tokens. Deliberately sends no
    /// bearer header: the stale access token must not taint this call.
    async fn exchange_refresh(&self, refresh: &str) -> Result<RotatedTokens> {
        let response = self
            .send(Method::POST, REFRESH_ENDPOINT, None, Some(&RefreshRequest { refresh }), None)
            .await?;
        Ok(envelope::decode(REFRESH_ENDPOINT, response).await?.data)
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&B>,
        bearer: Option<String>,
    ) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{path}", self.inner.base);
        let mut request = self.inner.http.request(method, url);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }
}
