//! Registration, login and logout

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use std::sync::Arc;
use tracing::info;

use crate::{
    error::{AuthError, AuthResult},
    models::{Credentials, NewUser, Session, User},
    repositories::UserRepository,
    session::SessionManager,
    validation::{validate_password, validate_username},
};

/// Hash a password with Argon2 and a random salt, producing a PHC string
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verify a password against a stored PHC string
pub fn verify_password(password: &str, password_hash: &str) -> AuthResult<bool> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: SessionManager,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: SessionManager) -> Self {
        Self { users, sessions }
    }

    /// Register a new user
    pub async fn register(&self, credentials: &Credentials) -> AuthResult<User> {
        validate_username(&credentials.username).map_err(AuthError::Validation)?;
        validate_password(&credentials.password).map_err(AuthError::Validation)?;

        if self
            .users
            .find_by_username(&credentials.username)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateUser(credentials.username.clone()));
        }

        let new_user = NewUser {
            username: credentials.username.clone(),
            password_hash: hash_password(&credentials.password)?,
        };

        // A concurrent registration may win between the lookup and the insert
        self.users.create(new_user).await.map_err(|e| {
            if e.is_unique_violation() {
                AuthError::DuplicateUser(credentials.username.clone())
            } else {
                AuthError::Database(e)
            }
        })
    }

    /// Verify credentials and open a session. A session the client already
    /// holds is destroyed first.
    pub async fn login(
        &self,
        credentials: &Credentials,
        previous_session: Option<&str>,
    ) -> AuthResult<Session> {
        info!("Login attempt for user: {}", credentials.username);

        let user = self
            .users
            .find_by_username(&credentials.username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(credentials.username.clone()))?;

        if !verify_password(&credentials.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if let Some(previous) = previous_session {
            self.sessions.delete_session(previous).await?;
        }

        let session = self.sessions.create_session(user.id).await?;
        Ok(session)
    }

    /// Terminate a session. Missing or unknown sessions are not an error.
    pub async fn logout(&self, session_id: Option<&str>) -> AuthResult<()> {
        if let Some(id) = session_id {
            self.sessions.delete_session(id).await?;
            info!("Session terminated");
        }
        Ok(())
    }

    /// Resolve a session identifier presented by a client
    pub async fn current_session(&self, session_id: &str) -> AuthResult<Option<Session>> {
        Ok(self.sessions.get_session(session_id).await?)
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repositories::InMemoryUserRepository, session::InMemorySessionStore};
    use async_trait::async_trait;
    use common::error::{DatabaseError, DatabaseResult};
    use tokio_test::{assert_err, assert_ok};

    /// Loses every registration race: the lookup sees no user, the insert
    /// hits the unique constraint.
    struct RacingUserRepository;

    #[async_trait]
    impl UserRepository for RacingUserRepository {
        async fn create(&self, _new_user: NewUser) -> DatabaseResult<User> {
            Err(DatabaseError::UniqueViolation {
                constraint: "users_username_key".to_string(),
            })
        }

        async fn find_by_username(&self, _username: &str) -> DatabaseResult<Option<User>> {
            Ok(None)
        }
    }

    fn service() -> AuthService {
        let sessions = SessionManager::new(Arc::new(InMemorySessionStore::new()), 3600);
        AuthService::new(Arc::new(InMemoryUserRepository::new()), sessions)
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let first = hash_password("pw1").unwrap();
        let second = hash_password("pw1").unwrap();

        assert_ne!(first, "pw1");
        assert_ne!(first, second);
        assert!(verify_password("pw1", &first).unwrap());
        assert!(!verify_password("pw2", &first).unwrap());
        assert_err!(verify_password("pw1", "not a phc string"));
    }

    #[tokio::test]
    async fn test_register_twice_is_duplicate() {
        let auth = service();

        let user = assert_ok!(auth.register(&credentials("alice", "pw1")).await);
        assert_ne!(user.password_hash, "pw1");

        let err = auth.register(&credentials("alice", "other")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser(name) if name == "alice"));
    }

    #[tokio::test]
    async fn test_register_losing_insert_race_is_duplicate() {
        let sessions = SessionManager::new(Arc::new(InMemorySessionStore::new()), 3600);
        let auth = AuthService::new(Arc::new(RacingUserRepository), sessions);

        let err = auth.register(&credentials("alice", "pw1")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser(ref name) if name == "alice"));
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_requires_both_fields() {
        let auth = service();

        let err = auth.register(&credentials("", "pw1")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = auth.register(&credentials("alice", "")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_errors() {
        let auth = service();
        auth.register(&credentials("alice", "pw1")).await.unwrap();

        let err = auth.login(&credentials("bob", "pw1"), None).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound(_)));

        let err = auth.login(&credentials("alice", "wrong"), None).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_binds_session_and_logout_ends_it() {
        let auth = service();
        let user = auth.register(&credentials("alice", "pw1")).await.unwrap();

        let session = auth.login(&credentials("alice", "pw1"), None).await.unwrap();
        assert_eq!(session.user_id, user.id);
        assert!(auth.current_session(&session.id).await.unwrap().is_some());

        auth.logout(Some(&session.id)).await.unwrap();
        assert!(auth.current_session(&session.id).await.unwrap().is_none());

        assert_ok!(auth.logout(Some(&session.id)).await);
        assert_ok!(auth.logout(None).await);
    }

    #[tokio::test]
    async fn test_login_replaces_previous_session() {
        let auth = service();
        auth.register(&credentials("alice", "pw1")).await.unwrap();

        let first = auth.login(&credentials("alice", "pw1"), None).await.unwrap();
        let second = auth
            .login(&credentials("alice", "pw1"), Some(&first.id))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert!(auth.current_session(&first.id).await.unwrap().is_none());
        assert!(auth.current_session(&second.id).await.unwrap().is_some());
    }
}
