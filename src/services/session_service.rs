use crate::api::ApiClient;
use crate::api::dto::{
    GoogleLoginRequest, LoginRequest, LogoutRequest, PasswordChangeRequest,
    PasswordResetConfirmRequest, PasswordResetRequest, RegisterRequest, VerifyEmailRequest,
};
use crate::domain::auth::{
    self, TokenPair, validate_login, validate_new_password, validate_password_change,
    validate_registration,
};
use crate::domain::user::{ProfilePatch, User};
use crate::error::Result;
use std::sync::{Arc, PoisonError, RwLock};

/// Sign-in, sign-out and account lifecycle, plus a cache of the signed-in
/// user's profile.
///
/// The cache is process-local convenience state. It is cleared whenever the
/// session ends, whether by an explicit sign-out or by a failed refresh.
#[derive(Clone, Debug)]
pub struct SessionService {
    client: ApiClient,
    profile: Arc<RwLock<Option<User>>>,
}

impl SessionService {
    #[must_use]
    pub fn new(client: &ApiClient) -> Self {
        Self {
            client: client.clone(),
            profile: Arc::new(RwLock::new(None)),
        }
    }

    /// Exchanges credentials for a token pair, installs the session and
    /// returns the freshly fetched profile.
    ///
    /// Bad credentials come back as an authentication error. They never
    /// tear down an existing session.
    #[tracing::instrument(skip(self, email, password), err(level = "warn"))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        validate_login(email, password)?;
        let tokens: TokenPair = self
            .client
            .post("/auth/login/", &LoginRequest { email, password })
            .await?;
        self.client.install_session(&tokens);
        self.load_profile().await
    }

    /// Same exchange as [`Self::login`], with a provider-issued identity
    /// token instead of credentials.
    #[tracing::instrument(skip(self, token), err(level = "warn"))]
    pub async fn login_with_google(&self, token: &str) -> Result<User> {
        let tokens: TokenPair = self
            .client
            .post("/auth/google/", &GoogleLoginRequest { token })
            .await?;
        self.client.install_session(&tokens);
        self.load_profile().await
    }

    /// Creates an account. The caller still has to verify the address and
    /// sign in; registration alone issues no tokens.
    #[tracing::instrument(skip(self, email, password, password_confirm), err(level = "warn"))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<()> {
        validate_registration(email, password, password_confirm)?;
        self.client
            .post(
                "/auth/register/",
                &RegisterRequest { email, password, password_confirm },
            )
            .await
    }

    /// Ends the session. Server-side token invalidation is best effort; the
    /// local session is cleared no matter what the server says.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) {
        if let Some(refresh) = self.client.store().refresh() {
            let request = LogoutRequest { refresh: &refresh };
            if let Err(error) = self.client.post::<(), _>("/auth/logout/", &request).await {
                tracing::debug!(%error, "server-side logout failed, clearing local session anyway");
            }
        }
        self.clear_cached_profile();
        self.client.drop_session();
    }

    /// Fetches the profile of the signed-in user, caching it on success.
    ///
    /// Failures are absorbed: the cache is cleared and `None` comes back.
    /// This doubles as the startup probe for whether a persisted session is
    /// still usable.
    pub async fn fetch_profile(&self) -> Option<User> {
        match self.load_profile().await {
            Ok(user) => Some(user),
            Err(error) => {
                tracing::debug!(%error, "profile fetch failed");
                self.clear_cached_profile();
                None
            }
        }
    }

    /// The last profile fetched in this process, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.profile.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether a token pair is held locally. Says nothing about whether the
    /// server still accepts it; [`Self::fetch_profile`] answers that.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    #[tracing::instrument(skip(self, token), err(level = "warn"))]
    pub async fn verify_email(&self, token: &str) -> Result<()> {
        self.client
            .post("/auth/verify-email/", &VerifyEmailRequest { token })
            .await
    }

    /// Asks the server to send a fresh verification mail to the signed-in
    /// user. Any resend cooldown is the caller's concern.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn resend_verification(&self) -> Result<()> {
        self.client.post_empty("/auth/verify-email/resend/").await
    }

    #[tracing::instrument(skip(self, email), err(level = "warn"))]
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        auth::validate_email(email)?;
        self.client
            .post("/auth/password-reset/", &PasswordResetRequest { email })
            .await
    }

    #[tracing::instrument(skip(self, token, password, password_confirm), err(level = "warn"))]
    pub async fn confirm_password_reset(
        &self,
        token: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<()> {
        validate_new_password(password, password_confirm)?;
        self.client
            .post(
                "/auth/password-reset/confirm/",
                &PasswordResetConfirmRequest { token, password, password_confirm },
            )
            .await
    }

    #[tracing::instrument(
        skip(self, current_password, new_password, new_password_confirm),
        err(level = "warn")
    )]
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        new_password_confirm: &str,
    ) -> Result<()> {
        validate_password_change(current_password, new_password, new_password_confirm)?;
        let request = PasswordChangeRequest {
            current_password,
            new_password,
            new_password_confirm,
        };
        self.client.put("/auth/password-change/", &request).await
    }

    #[tracing::instrument(skip(self, patch), err(level = "warn"))]
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<User> {
        patch.validate()?;
        let user: User = self.client.patch("/users/me/", patch).await?;
        self.cache_profile(&user);
        Ok(user)
    }

    /// Soft-deletes the account server-side, then tears the session down
    /// locally like a sign-out.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn deactivate_account(&self) -> Result<()> {
        self.client.delete("/users/me/").await?;
        self.clear_cached_profile();
        self.client.drop_session();
        Ok(())
    }

    async fn load_profile(&self) -> Result<User> {
        let user: User = self.client.get("/users/me/").await?;
        self.cache_profile(&user);
        Ok(user)
    }

    fn cache_profile(&self, user: &User) {
        *self.profile.write().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
    }

    fn clear_cached_profile(&self) {
        *self.profile.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
