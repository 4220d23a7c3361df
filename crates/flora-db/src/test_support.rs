//! Shared test utilities for flora-db unit tests.

pub(crate) mod helpers {
    use std::sync::Arc;

    use flora_config::DispatchMode;
    use flora_core::entities::Species;
    use flora_core::enums::UserRole;
    use flora_core::fields::FieldMap;
    use flora_notify::RecordingDispatcher;
    use serde_json::json;

    use crate::FloraDb;
    use crate::service::CatalogService;

    pub const AUTHOR: &str = "usr-author";
    pub const REVIEWER_A: &str = "usr-rev-a";
    pub const REVIEWER_B: &str = "usr-rev-b";
    pub const ADMIN: &str = "usr-admin";
    pub const VISITOR: &str = "usr-visitor";

    /// In-memory service with a recording dispatcher and inline dispatch.
    pub async fn test_service() -> (CatalogService, Arc<RecordingDispatcher>) {
        let db = FloraDb::open_local(":memory:").await.unwrap();
        let recorder = Arc::new(RecordingDispatcher::default());
        let svc = CatalogService::from_db(db, recorder.clone(), DispatchMode::Inline);
        (svc, recorder)
    }

    /// Service with the standard roster registered.
    pub async fn seeded_service() -> (CatalogService, Arc<RecordingDispatcher>) {
        let (svc, recorder) = test_service().await;
        for (id, name, role) in [
            (AUTHOR, "Author", UserRole::Contributor),
            (REVIEWER_A, "Reviewer A", UserRole::Reviewer),
            (REVIEWER_B, "Reviewer B", UserRole::Reviewer),
            (ADMIN, "Admin", UserRole::Admin),
            (VISITOR, "Visitor", UserRole::Contributor),
        ] {
            svc.register_user(id, name, None, role).await.unwrap();
        }
        (svc, recorder)
    }

    pub fn jatoba() -> FieldMap {
        FieldMap::from([
            ("name".to_string(), json!("Jatobá")),
            ("scientificName".to_string(), json!("Hymenaea courbaril")),
            ("heightMeters".to_string(), json!(12)),
        ])
    }

    /// A draft by `AUTHOR`, submitted for review.
    pub async fn submitted(svc: &CatalogService) -> Species {
        let draft = svc.create_draft(AUTHOR, &jatoba()).await.unwrap();
        svc.submit(&draft.id, AUTHOR).await.unwrap()
    }
}
