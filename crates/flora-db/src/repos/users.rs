//! Reviewer roster repository.

use chrono::Utc;
use tracing::info;

use flora_core::entities::{ReviewerContact, User};
use flora_core::enums::UserRole;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::CatalogService;

const USER_COLS: &str = "id, display_name, email, role, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get::<String>(0)?,
        display_name: row.get::<String>(1)?,
        email: get_opt_string(row, 2)?,
        role: parse_enum(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

/// Role of a registered user, `None` if unknown.
pub(crate) async fn user_role(
    conn: &libsql::Connection,
    user_id: &str,
) -> Result<Option<UserRole>, DatabaseError> {
    let mut rows = conn
        .query("SELECT role FROM users WHERE id = ?1", [user_id])
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(parse_enum(&row.get::<String>(0)?)?)),
        None => Ok(None),
    }
}

/// Fail with `Forbidden` unless `user_id` may vote or edit under review.
pub(crate) async fn require_reviewer(
    conn: &libsql::Connection,
    user_id: &str,
) -> Result<UserRole, DatabaseError> {
    match user_role(conn, user_id).await? {
        Some(role) if role.can_review() => Ok(role),
        Some(role) => Err(DatabaseError::Forbidden(format!(
            "{user_id} has role {role} and cannot review"
        ))),
        None => Err(DatabaseError::Forbidden(format!(
            "{user_id} is not a registered reviewer"
        ))),
    }
}

/// Reviewers to notify about a record, never including its author.
pub(crate) async fn reviewer_roster(
    conn: &libsql::Connection,
    exclude: &str,
) -> Result<Vec<ReviewerContact>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {USER_COLS} FROM users
                 WHERE role IN ('reviewer', 'admin') AND id != ?1 ORDER BY id"
            ),
            [exclude],
        )
        .await?;
    let mut contacts = Vec::new();
    while let Some(row) = rows.next().await? {
        contacts.push(row_to_user(&row)?.contact());
    }
    Ok(contacts)
}

impl CatalogService {
    /// Register a user, or update the name, email and role of an existing one.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for a blank id or name.
    pub async fn register_user(
        &self,
        user_id: &str,
        display_name: &str,
        email: Option<&str>,
        role: UserRole,
    ) -> Result<User, DatabaseError> {
        if user_id.trim().is_empty() || display_name.trim().is_empty() {
            return Err(DatabaseError::Validation(
                "user id and display name are required".into(),
            ));
        }

        let conn = self.db().lock().await;
        conn.execute(
            "INSERT INTO users (id, display_name, email, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (id) DO UPDATE SET
                 display_name = excluded.display_name,
                 email = excluded.email,
                 role = excluded.role",
            libsql::params![
                user_id,
                display_name,
                email,
                role.as_str(),
                Utc::now().to_rfc3339()
            ],
        )
        .await?;

        let mut rows = conn
            .query(&format!("SELECT {USER_COLS} FROM users WHERE id = ?1"), [user_id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let user = row_to_user(&row)?;
        info!(user_id, role = %user.role, "user registered");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the user is not registered.
    pub async fn get_user(&self, user_id: &str) -> Result<User, DatabaseError> {
        let conn = self.db().lock().await;
        let mut rows = conn
            .query(&format!("SELECT {USER_COLS} FROM users WHERE id = ?1"), [user_id])
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity_type: "user".into(),
            id: user_id.to_string(),
        })?;
        row_to_user(&row)
    }

    /// Every user allowed to review, by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_reviewers(&self) -> Result<Vec<User>, DatabaseError> {
        let conn = self.db().lock().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {USER_COLS} FROM users WHERE role IN ('reviewer', 'admin') ORDER BY id"
                ),
                (),
            )
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{
        ADMIN, AUTHOR, REVIEWER_A, REVIEWER_B, VISITOR, seeded_service, test_service,
    };
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn register_is_an_upsert() {
        let (svc, _) = test_service().await;
        svc.register_user("usr-1", "Ana", None, UserRole::Contributor)
            .await
            .unwrap();
        let promoted = svc
            .register_user("usr-1", "Ana Souza", Some("ana@example.org"), UserRole::Reviewer)
            .await
            .unwrap();

        assert_eq!(promoted.role, UserRole::Reviewer);
        assert_eq!(promoted.email.as_deref(), Some("ana@example.org"));
        assert_eq!(svc.get_user("usr-1").await.unwrap(), promoted);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (svc, _) = test_service().await;
        assert!(matches!(
            svc.register_user("usr-1", "  ", None, UserRole::Reviewer).await,
            Err(DatabaseError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (svc, _) = test_service().await;
        assert!(matches!(
            svc.get_user("usr-nobody").await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn reviewers_include_admins_only_once() {
        let (svc, _) = seeded_service().await;
        let ids: Vec<String> = svc
            .list_reviewers()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![ADMIN, REVIEWER_A, REVIEWER_B]);
    }

    #[tokio::test]
    async fn roster_excludes_the_author() {
        let (svc, _) = seeded_service().await;
        svc.register_user(AUTHOR, "Author", None, UserRole::Reviewer)
            .await
            .unwrap();
        let conn = svc.db().lock().await;
        let roster = reviewer_roster(&conn, AUTHOR).await.unwrap();
        assert_eq!(roster.len(), 3);
        assert!(roster.iter().all(|c| c.user_id != AUTHOR));
    }

    #[tokio::test]
    async fn contributors_cannot_review() {
        let (svc, _) = seeded_service().await;
        let conn = svc.db().lock().await;
        assert_eq!(
            require_reviewer(&conn, REVIEWER_A).await.unwrap(),
            UserRole::Reviewer
        );
        assert!(matches!(
            require_reviewer(&conn, VISITOR).await,
            Err(DatabaseError::Forbidden(_))
        ));
        assert!(matches!(
            require_reviewer(&conn, "usr-ghost").await,
            Err(DatabaseError::Forbidden(_))
        ));
    }
}
