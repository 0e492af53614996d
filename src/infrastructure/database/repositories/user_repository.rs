//! Credential store: user accounts keyed by phone number.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::auth::password::hash_password;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user::{self, Role};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new user with a bcrypt-hashed secret.
    ///
    /// The plaintext password is never persisted. Fails with `Conflict`
    /// when the phone number is already registered.
    pub async fn create(
        &self,
        name: &str,
        phone: &str,
        password: &str,
        role: Role,
    ) -> DomainResult<user::Model> {
        let existing = user::Entity::find()
            .filter(user::Column::Phone.eq(phone))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "Phone number '{}' is already registered",
                phone
            )));
        }

        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;

        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            phone: Set(phone.to_string()),
            password_hash: Set(password_hash),
            role: Set(role),
            created_at: Set(Utc::now()),
        };

        Ok(new_user.insert(&self.db).await?)
    }

    pub async fn find_by_phone(&self, phone: &str) -> DomainResult<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Phone.eq(phone))
            .one(&self.db)
            .await?)
    }

    pub async fn find_by_id(&self, id: &str) -> DomainResult<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Staff directory, sorted by name.
    pub async fn list_staff(&self) -> DomainResult<Vec<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Role.eq(Role::Staff))
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Change a user's role (admin elevation operation).
    pub async fn set_role(&self, user_id: &str, role: Role) -> DomainResult<user::Model> {
        let user = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::not_found("user"))?;

        let mut active: user::ActiveModel = user.into();
        active.role = Set(role);
        Ok(active.update(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::infrastructure::database::repositories::test_support;

    #[tokio::test]
    async fn test_create_hashes_secret() {
        let repo = UserRepository::new(test_support::connect().await);

        let user = repo
            .create("Alice", "+998900000001", "hunter22", Role::Staff)
            .await
            .unwrap();

        assert_ne!(user.password_hash, "hunter22");
        assert!(verify_password("hunter22", &user.password_hash).unwrap());
        assert_eq!(user.role, Role::Staff);
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let repo = UserRepository::new(test_support::connect().await);

        repo.create("Alice", "+998900000001", "pw-one", Role::User)
            .await
            .unwrap();
        let err = repo
            .create("Mallory", "+998900000001", "pw-two", Role::User)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));

        // Second call never created a second record
        let found = repo.find_by_phone("+998900000001").await.unwrap().unwrap();
        assert_eq!(found.name, "Alice");
    }

    #[tokio::test]
    async fn test_list_staff_excludes_other_roles() {
        let repo = UserRepository::new(test_support::connect().await);

        repo.create("Admin", "+998900000001", "pw", Role::Admin)
            .await
            .unwrap();
        repo.create("Alice", "+998900000002", "pw", Role::Staff)
            .await
            .unwrap();
        repo.create("Bob", "+998900000003", "pw", Role::User)
            .await
            .unwrap();

        let staff = repo.list_staff().await.unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_set_role_elevates() {
        let repo = UserRepository::new(test_support::connect().await);

        let user = repo
            .create("Bob", "+998900000001", "pw", Role::User)
            .await
            .unwrap();
        let updated = repo.set_role(&user.id, Role::Staff).await.unwrap();
        assert_eq!(updated.role, Role::Staff);

        let err = repo.set_role("no-such-id", Role::Admin).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
