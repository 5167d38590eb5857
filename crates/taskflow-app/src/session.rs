use taskflow_core::UserId;
use taskflow_store::{RestStore, StoreError};

/// Authenticated user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User id; also the profile id.
    pub id: UserId,
    /// Login email, when known.
    pub email: Option<String>,
}

/// Who the dashboard is acting for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// A user is signed in.
    SignedIn(User),
    /// Nobody is signed in; nothing is fetched or rendered.
    #[default]
    SignedOut,
}

impl Session {
    /// Session for `id` without an email.
    #[must_use]
    pub const fn signed_in(id: UserId) -> Self {
        Self::SignedIn(User { id, email: None })
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::SignedOut => None,
        }
    }

    /// Id of the signed-in user, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user().map(|user| user.id)
    }
}

/// Authentication collaborator able to end the current session.
#[allow(async_fn_in_trait)]
pub trait AuthProvider {
    /// End the session on the provider side.
    ///
    /// # Errors
    /// Returns the provider error when the session could not be ended.
    async fn sign_out(&self) -> Result<(), StoreError>;
}

impl AuthProvider for RestStore {
    async fn sign_out(&self) -> Result<(), StoreError> {
        Self::sign_out(self).await
    }
}
