use crate::error::{Error, Result};
use crate::models::user::User;
use crate::store::{document_store, next_id, Document, DocumentStore};
use crate::utils::crypto::{hash_password, verify_password};
use chrono::Utc;

impl Document for User {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct UserService {
    store: DocumentStore,
}

impl UserService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    async fn users(&self) -> Vec<User> {
        self.store.load(document_store::USERS, Vec::new()).await
    }

    pub async fn get_by_id(&self, user_id: i64) -> Option<User> {
        self.users().await.into_iter().find(|u| u.id == user_id)
    }

    pub async fn get_by_email(&self, email: &str) -> Option<User> {
        self.users().await.into_iter().find(|u| u.email == email)
    }

    /// Case-insensitive username substring search, for the admin console.
    pub async fn search_by_name(&self, term: &str) -> Vec<User> {
        let needle = term.to_lowercase();
        self.users()
            .await
            .into_iter()
            .filter(|u| u.username.to_lowercase().contains(&needle))
            .collect()
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let mut users = self.users().await;
        if users.iter().any(|u| u.email == email) {
            return Err(Error::BadRequest("Email already registered".to_string()));
        }

        let password_hash = hash_password(password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {e}")))?;
        let user = User {
            id: next_id(&users),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            subscription_type: None,
            subscription_expires: None,
            is_superuser: false,
            created_at: Utc::now().to_rfc3339(),
        };
        users.push(user.clone());

        if !self.store.save(document_store::USERS, &users).await {
            return Err(Error::Internal("Failed to persist user".to_string()));
        }
        Ok(user)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .get_by_email(email)
            .await
            .ok_or_else(|| Error::Unauthorized("Invalid email or password".to_string()))?;
        let ok = verify_password(password, &user.password_hash).unwrap_or(false);
        if !ok {
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }
        Ok(user)
    }

    pub async fn update_subscription(
        &self,
        user_id: i64,
        subscription_type: &str,
        expires_at: chrono::DateTime<Utc>,
    ) -> bool {
        let mut users = self.users().await;
        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            return false;
        };
        user.subscription_type = Some(subscription_type.to_string());
        user.subscription_expires = Some(expires_at.to_rfc3339());
        self.store.save(document_store::USERS, &users).await
    }
}
