//! Assignment ledger: maps end users to the feeder they follow.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user::{self, Role};
use crate::infrastructure::database::entities::{assignment, feeder};

pub struct AssignmentRepository {
    db: DatabaseConnection,
}

impl AssignmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Map a user to a feeder. Upsert keyed by user: an existing mapping
    /// has its feeder reference overwritten, never duplicated.
    pub async fn assign_user(
        &self,
        feeder_id: &str,
        user_id: &str,
    ) -> DomainResult<assignment::Model> {
        let feeder = feeder::Entity::find_by_id(feeder_id).one(&self.db).await?;
        if feeder.is_none() {
            return Err(DomainError::not_found("feeder"));
        }

        let user = user::Entity::find_by_id(user_id)
            .filter(user::Column::Role.eq(Role::User))
            .one(&self.db)
            .await?;
        if user.is_none() {
            return Err(DomainError::validation(
                "user_id does not reference an existing end user",
            ));
        }

        let existing = assignment::Entity::find()
            .filter(assignment::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        match existing {
            Some(mapping) => {
                let mut active: assignment::ActiveModel = mapping.into();
                active.feeder_id = Set(feeder_id.to_string());
                Ok(active.update(&self.db).await?)
            }
            None => {
                let mapping = assignment::ActiveModel {
                    id: Set(uuid::Uuid::new_v4().to_string()),
                    user_id: Set(user_id.to_string()),
                    feeder_id: Set(feeder_id.to_string()),
                };
                Ok(mapping.insert(&self.db).await?)
            }
        }
    }

    /// The single active mapping for a user, if any.
    pub async fn find_for_user(&self, user_id: &str) -> DomainResult<Option<assignment::Model>> {
        Ok(assignment::Entity::find()
            .filter(assignment::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::entities::feeder::FeederStatus;
    use crate::infrastructure::database::repositories::test_support;
    use crate::infrastructure::database::repositories::{FeederRepository, UserRepository};
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_reassignment_overwrites_single_row() {
        let db = test_support::connect().await;
        let ledger = AssignmentRepository::new(db.clone());
        let feeders = FeederRepository::new(db.clone());
        let bob = UserRepository::new(db.clone())
            .create("Bob", "+998900000001", "pw", Role::User)
            .await
            .unwrap();

        let first = feeders
            .create("Sector-7", "North", FeederStatus::Working, None)
            .await
            .unwrap();
        let second = feeders
            .create("Sector-9", "South", FeederStatus::Working, None)
            .await
            .unwrap();

        ledger.assign_user(&first.id, &bob.id).await.unwrap();
        ledger.assign_user(&second.id, &bob.id).await.unwrap();

        let rows = assignment::Entity::find().count(&db).await.unwrap();
        assert_eq!(rows, 1);

        let mapping = ledger.find_for_user(&bob.id).await.unwrap().unwrap();
        assert_eq!(mapping.feeder_id, second.id);
    }

    #[tokio::test]
    async fn test_assignment_requires_end_user_and_feeder() {
        let db = test_support::connect().await;
        let ledger = AssignmentRepository::new(db.clone());
        let feeders = FeederRepository::new(db.clone());
        let alice = UserRepository::new(db.clone())
            .create("Alice", "+998900000001", "pw", Role::Staff)
            .await
            .unwrap();

        let feeder = feeders
            .create("Sector-7", "North", FeederStatus::Working, None)
            .await
            .unwrap();

        // Staff member cannot be the subject of a mapping
        let err = ledger.assign_user(&feeder.id, &alice.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = ledger
            .assign_user("no-such-feeder", &alice.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
