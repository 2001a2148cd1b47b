//! Profile store.

use tracing::{error, info, instrument};

use super::backend::ProfileBackend;
use super::{Mirror, Snapshot};
use crate::types::{PasswordChange, User, UserUpdate};

const LOAD_FAILED: &str = "Could not load your profile.";
const UPDATE_FAILED: &str = "Could not update your profile.";
const PASSWORD_FAILED: &str = "Could not change the password.";

/// The signed-in user's profile.
#[derive(Debug)]
pub struct ProfileStore<B> {
    backend: B,
    mirror: Mirror<Option<User>>,
}

impl<B: ProfileBackend> ProfileStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            mirror: Mirror::new(),
        }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[instrument(skip(self))]
    pub async fn load(&self) {
        let id = self.mirror.begin().await;
        let result = self.backend.fetch_profile().await.map(Some).map_err(|e| {
            error!(error = %e, "failed to load profile");
            LOAD_FAILED.to_string()
        });
        self.mirror.finish(id, result).await;
    }

    /// Save name/phone and keep the server's answer. Returns whether the
    /// update succeeded.
    #[instrument(skip(self, update))]
    pub async fn update(&self, update: &UserUpdate) -> bool {
        match self.backend.save_profile(update).await {
            Ok(user) => {
                self.mirror.clear_error().await;
                self.mirror.apply(|slot| *slot = Some(user)).await;
                true
            }
            Err(e) => {
                error!(error = %e, "failed to update profile");
                self.mirror.set_error(UPDATE_FAILED).await;
                false
            }
        }
    }

    /// Change the password after checking the form locally. A guard failure
    /// is reported through `error()` without calling the server.
    #[instrument(skip(self, change))]
    pub async fn change_password(&self, change: PasswordChange) -> bool {
        let request = match change.into_request() {
            Ok(request) => request,
            Err(message) => {
                self.mirror.set_error(message).await;
                return false;
            }
        };

        match self.backend.change_password(&request).await {
            Ok(()) => {
                self.mirror.clear_error().await;
                info!("password changed");
                true
            }
            Err(e) => {
                error!(error = %e, "failed to change password");
                self.mirror.set_error(PASSWORD_FAILED).await;
                false
            }
        }
    }

    /// Sign out and forget the profile. Local state is cleared even if the
    /// server call fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.backend.sign_out().await {
            error!(error = %e, "logout call failed");
        }
        self.mirror.apply(|slot| *slot = None).await;
        self.mirror.clear_error().await;
    }

    pub async fn user(&self) -> Option<User> {
        self.mirror.read(Clone::clone).await
    }

    pub async fn snapshot(&self) -> Snapshot<Option<User>> {
        self.mirror.snapshot().await
    }

    pub async fn error(&self) -> Option<String> {
        self.mirror.snapshot().await.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::types::ChangePassword;
    use async_trait::async_trait;
    use emarket_core::{UserId, UserRole};
    use tokio::sync::RwLock;

    #[derive(Default)]
    struct MockProfile {
        user: RwLock<Option<User>>,
        password_calls: RwLock<Vec<String>>,
        signed_out: RwLock<bool>,
        fail_sign_out: bool,
    }

    #[async_trait]
    impl ProfileBackend for MockProfile {
        async fn fetch_profile(&self) -> Result<User, ApiError> {
            self.user.read().await.clone().ok_or_else(|| ApiError::Status {
                status: reqwest::StatusCode::UNAUTHORIZED,
                message: "Not authenticated".to_string(),
            })
        }

        async fn save_profile(&self, update: &UserUpdate) -> Result<User, ApiError> {
            let mut slot = self.user.write().await;
            let user = slot.as_mut().ok_or_else(|| ApiError::validation("no user"))?;
            if let Some(name) = &update.full_name {
                user.full_name = Some(name.clone());
            }
            if let Some(phone) = &update.phone {
                user.phone = Some(phone.clone());
            }
            Ok(user.clone())
        }

        async fn change_password(&self, request: &ChangePassword) -> Result<(), ApiError> {
            self.password_calls
                .write()
                .await
                .push(request.new_password.clone());
            Ok(())
        }

        async fn sign_out(&self) -> Result<(), ApiError> {
            *self.signed_out.write().await = true;
            if self.fail_sign_out {
                return Err(ApiError::validation("offline"));
            }
            Ok(())
        }
    }

    fn user() -> User {
        User {
            id: UserId::new(9),
            email: "me@mail.vn".to_string(),
            full_name: Some("Pham Van D".to_string()),
            phone: None,
            role: UserRole::Customer,
            is_active: true,
        }
    }

    async fn loaded(backend: MockProfile) -> ProfileStore<MockProfile> {
        *backend.user.write().await = Some(user());
        let store = ProfileStore::new(backend);
        store.load().await;
        store
    }

    #[tokio::test]
    async fn test_load_and_update() {
        let store = loaded(MockProfile::default()).await;
        assert_eq!(store.user().await.map(|u| u.id), Some(UserId::new(9)));

        let ok = store
            .update(&UserUpdate {
                phone: Some("0901234567".to_string()),
                ..UserUpdate::default()
            })
            .await;
        assert!(ok);
        assert_eq!(
            store.user().await.and_then(|u| u.phone).as_deref(),
            Some("0901234567")
        );
    }

    #[tokio::test]
    async fn test_load_failure_sets_error() {
        let store = ProfileStore::new(MockProfile::default());
        store.load().await;
        assert_eq!(store.error().await.as_deref(), Some(LOAD_FAILED));
        assert!(store.user().await.is_none());
    }

    #[tokio::test]
    async fn test_password_guard_blocks_network() {
        let store = loaded(MockProfile::default()).await;
        let change = PasswordChange {
            current: "secret1".to_string(),
            new: "abc".to_string(),
            confirm: "abc".to_string(),
        };
        assert!(!store.change_password(change).await);
        assert!(store.error().await.is_some());
        assert!(store.backend().password_calls.read().await.is_empty());

        let change = PasswordChange {
            current: "secret1".to_string(),
            new: "secret2".to_string(),
            confirm: "secret2".to_string(),
        };
        assert!(store.change_password(change).await);
        assert_eq!(store.error().await, None);
        assert_eq!(store.backend().password_calls.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let store = loaded(MockProfile {
            fail_sign_out: true,
            ..MockProfile::default()
        })
        .await;

        store.logout().await;
        assert!(store.user().await.is_none());
        assert!(*store.backend().signed_out.read().await);
    }
}
