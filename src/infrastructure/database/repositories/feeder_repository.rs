//! Feeder registry: feeder records, status transitions and update history.
//!
//! A status transition writes the feeder row and its history row inside
//! one transaction, so `feeder.status` always equals the status of the
//! latest `feeder_updates` row once one exists.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::feeder::{self, FeederStatus};
use crate::infrastructure::database::entities::user::{self, Role};
use crate::infrastructure::database::entities::{assignment, feeder_update};

pub struct FeederRepository {
    db: DatabaseConnection,
}

impl FeederRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new feeder (admin operation).
    pub async fn create(
        &self,
        name: &str,
        area: &str,
        status: FeederStatus,
        expected_restore: Option<DateTime<Utc>>,
    ) -> DomainResult<feeder::Model> {
        let now = Utc::now();
        let new_feeder = feeder::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            area: Set(area.to_string()),
            status: Set(status),
            expected_restore: Set(expected_restore),
            staff_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(new_feeder.insert(&self.db).await?)
    }

    /// All feeders with their assigned staff, oldest first (admin view).
    pub async fn list_all_with_staff(
        &self,
    ) -> DomainResult<Vec<(feeder::Model, Option<user::Model>)>> {
        Ok(feeder::Entity::find()
            .find_also_related(user::Entity)
            .order_by_asc(feeder::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Feeders assigned to one staff member (staff view).
    pub async fn list_for_staff(&self, staff_id: &str) -> DomainResult<Vec<feeder::Model>> {
        Ok(feeder::Entity::find()
            .filter(feeder::Column::StaffId.eq(staff_id))
            .order_by_asc(feeder::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Single feeder with its assigned staff (end-user view).
    pub async fn find_with_staff(
        &self,
        feeder_id: &str,
    ) -> DomainResult<Option<(feeder::Model, Option<user::Model>)>> {
        Ok(feeder::Entity::find_by_id(feeder_id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?)
    }

    /// Record a status change reported by the assigned staff member.
    ///
    /// The lookup filters by feeder id *and* `staff_id`, so "feeder does
    /// not exist" and "feeder is not assigned to the caller" are
    /// indistinguishable `NotFound` outcomes. On success the feeder row
    /// and the appended history row commit together or not at all.
    pub async fn update_status(
        &self,
        feeder_id: &str,
        staff_id: &str,
        status: FeederStatus,
        remarks: Option<String>,
        expected_restore: Option<DateTime<Utc>>,
    ) -> DomainResult<feeder::Model> {
        let txn = self.db.begin().await?;

        let feeder = feeder::Entity::find()
            .filter(feeder::Column::Id.eq(feeder_id))
            .filter(feeder::Column::StaffId.eq(staff_id))
            .one(&txn)
            .await?
            .ok_or(DomainError::not_found("feeder"))?;

        let now = Utc::now();

        let mut active: feeder::ActiveModel = feeder.into();
        active.status = Set(status);
        if expected_restore.is_some() {
            active.expected_restore = Set(expected_restore);
        }
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        let history = feeder_update::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            feeder_id: Set(updated.id.clone()),
            updated_by: Set(staff_id.to_string()),
            status: Set(status),
            remarks: Set(remarks),
            timestamp: Set(now),
        };
        history.insert(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Assign a staff member to a feeder (admin operation).
    ///
    /// The referenced user must exist and hold the staff role; the check
    /// is application-level so it holds regardless of backend constraints.
    pub async fn assign_staff(
        &self,
        feeder_id: &str,
        staff_id: &str,
    ) -> DomainResult<feeder::Model> {
        let feeder = feeder::Entity::find_by_id(feeder_id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::not_found("feeder"))?;

        let staff = user::Entity::find_by_id(staff_id)
            .filter(user::Column::Role.eq(Role::Staff))
            .one(&self.db)
            .await?;
        if staff.is_none() {
            return Err(DomainError::validation(
                "staff_id does not reference an existing staff user",
            ));
        }

        let mut active: feeder::ActiveModel = feeder.into();
        active.staff_id = Set(Some(staff_id.to_string()));
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    /// Delete a feeder and everything referencing it (admin operation).
    ///
    /// Removes assignment rows, history rows and the feeder itself in one
    /// transaction.
    pub async fn delete(&self, feeder_id: &str) -> DomainResult<()> {
        let txn = self.db.begin().await?;

        let feeder = feeder::Entity::find_by_id(feeder_id)
            .one(&txn)
            .await?
            .ok_or(DomainError::not_found("feeder"))?;

        assignment::Entity::delete_many()
            .filter(assignment::Column::FeederId.eq(feeder_id))
            .exec(&txn)
            .await?;

        feeder_update::Entity::delete_many()
            .filter(feeder_update::Column::FeederId.eq(feeder_id))
            .exec(&txn)
            .await?;

        feeder::Entity::delete_by_id(&feeder.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Update history for a feeder, newest first.
    pub async fn history(&self, feeder_id: &str) -> DomainResult<Vec<feeder_update::Model>> {
        let exists = feeder::Entity::find_by_id(feeder_id).one(&self.db).await?;
        if exists.is_none() {
            return Err(DomainError::not_found("feeder"));
        }

        Ok(feeder_update::Entity::find()
            .filter(feeder_update::Column::FeederId.eq(feeder_id))
            .order_by_desc(feeder_update::Column::Timestamp)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::test_support;
    use crate::infrastructure::database::repositories::UserRepository;
    use sea_orm::DatabaseConnection;

    async fn staff_user(db: &DatabaseConnection, name: &str, phone: &str) -> user::Model {
        UserRepository::new(db.clone())
            .create(name, phone, "pw", Role::Staff)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_update_status_appends_history() {
        let db = test_support::connect().await;
        let repo = FeederRepository::new(db.clone());
        let alice = staff_user(&db, "Alice", "+998900000001").await;

        let feeder = repo
            .create("Sector-7", "North", FeederStatus::Working, None)
            .await
            .unwrap();
        repo.assign_staff(&feeder.id, &alice.id).await.unwrap();

        let updated = repo
            .update_status(
                &feeder.id,
                &alice.id,
                FeederStatus::Outage,
                Some("transformer fault".to_string()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(updated.status, FeederStatus::Outage);

        let history = repo.history(&feeder.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, updated.status);
        assert_eq!(history[0].updated_by, alice.id);
        assert_eq!(history[0].remarks.as_deref(), Some("transformer fault"));
    }

    #[tokio::test]
    async fn test_update_status_by_wrong_staff_changes_nothing() {
        let db = test_support::connect().await;
        let repo = FeederRepository::new(db.clone());
        let alice = staff_user(&db, "Alice", "+998900000001").await;
        let eve = staff_user(&db, "Eve", "+998900000002").await;

        let feeder = repo
            .create("Sector-7", "North", FeederStatus::Working, None)
            .await
            .unwrap();
        repo.assign_staff(&feeder.id, &alice.id).await.unwrap();

        let err = repo
            .update_status(&feeder.id, &eve.id, FeederStatus::Outage, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        // Absent feeder produces the same outward error
        let err = repo
            .update_status("no-such-feeder", &eve.id, FeederStatus::Outage, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let (current, _) = repo.find_with_staff(&feeder.id).await.unwrap().unwrap();
        assert_eq!(current.status, FeederStatus::Working);
        assert!(repo.history(&feeder.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latest_history_tracks_status() {
        let db = test_support::connect().await;
        let repo = FeederRepository::new(db.clone());
        let alice = staff_user(&db, "Alice", "+998900000001").await;

        let feeder = repo
            .create("Sector-7", "North", FeederStatus::Working, None)
            .await
            .unwrap();
        repo.assign_staff(&feeder.id, &alice.id).await.unwrap();

        for status in [
            FeederStatus::Outage,
            FeederStatus::Maintenance,
            FeederStatus::Working,
        ] {
            repo.update_status(&feeder.id, &alice.id, status, None, None)
                .await
                .unwrap();

            let (current, _) = repo.find_with_staff(&feeder.id).await.unwrap().unwrap();
            let history = repo.history(&feeder.id).await.unwrap();
            assert_eq!(history[0].status, current.status);
        }

        assert_eq!(repo.history(&feeder.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_assign_staff_validates_role() {
        let db = test_support::connect().await;
        let repo = FeederRepository::new(db.clone());
        let bob = UserRepository::new(db.clone())
            .create("Bob", "+998900000003", "pw", Role::User)
            .await
            .unwrap();

        let feeder = repo
            .create("Sector-7", "North", FeederStatus::Working, None)
            .await
            .unwrap();

        let err = repo.assign_staff(&feeder.id, &bob.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = repo.assign_staff("no-such-feeder", &bob.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let db = test_support::connect().await;
        let repo = FeederRepository::new(db.clone());
        let alice = staff_user(&db, "Alice", "+998900000001").await;
        let bob = UserRepository::new(db.clone())
            .create("Bob", "+998900000002", "pw", Role::User)
            .await
            .unwrap();

        let feeder = repo
            .create("Sector-7", "North", FeederStatus::Working, None)
            .await
            .unwrap();
        repo.assign_staff(&feeder.id, &alice.id).await.unwrap();
        repo.update_status(&feeder.id, &alice.id, FeederStatus::Outage, None, None)
            .await
            .unwrap();

        let ledger = super::super::AssignmentRepository::new(db.clone());
        ledger.assign_user(&feeder.id, &bob.id).await.unwrap();

        repo.delete(&feeder.id).await.unwrap();

        assert!(repo.find_with_staff(&feeder.id).await.unwrap().is_none());
        assert!(matches!(
            repo.history(&feeder.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(ledger.find_for_user(&bob.id).await.unwrap().is_none());

        let err = repo.delete(&feeder.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
