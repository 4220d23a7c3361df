//! Serde roundtrip and JsonSchema validation tests for entity types.

use chrono::Utc;
use schemars::schema_for;
use serde_json::json;
use flora_core::activity_detail::{EditDetail, StatusChangedDetail, VoteDetail};
use flora_core::entities::*;
use flora_core::enums::*;
use flora_core::fields::{FieldMap, SpeciesFields};
use flora_core::overlay::DraftOverlay;
use flora_core::responses::ReviewStatus;
use flora_core::transitions::EditTarget;

fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn jatoba_fields() -> SpeciesFields {
    SpeciesFields {
        name: Some("Jatobá".into()),
        scientific_name: Some("Hymenaea courbaril".into()),
        family: Some("Fabaceae".into()),
        height_meters: Some(12.0),
        flowering_months: Some(vec!["oct".into(), "nov".into()]),
        ..Default::default()
    }
}

roundtrip_and_validate!(
    draft_species_roundtrip,
    Species,
    Species {
        id: "spc-a3f8b2c1".into(),
        status: SpeciesStatus::Draft,
        review_context: ReviewContext::None,
        fields: jatoba_fields(),
        draft_overlay: DraftOverlay::None,
        revision: None,
        created_by: "usr-author".into(),
        submitted_at: None,
        published_at: None,
        version: 1,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    revising_species_roundtrip,
    Species,
    Species {
        id: "spc-b7c9d0e1".into(),
        status: SpeciesStatus::InReview,
        review_context: ReviewContext::RevisionRequest,
        fields: jatoba_fields(),
        draft_overlay: DraftOverlay::from_fields(FieldMap::from([(
            "heightMeters".to_string(),
            json!(15)
        )])),
        revision: Some(RevisionMarker {
            requested_by: "usr-visitor".into(),
            reason: "height is wrong".into(),
            requested_at: Utc::now(),
        }),
        created_by: "usr-author".into(),
        submitted_at: Some(Utc::now()),
        published_at: Some(Utc::now()),
        version: 4,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    review_entry_roundtrip,
    ReviewEntry,
    ReviewEntry {
        species_id: "spc-a3f8b2c1".into(),
        reviewer_id: "usr-reviewer".into(),
        decision: ReviewDecision::Approved,
        comments: Some("looks right".into()),
        reviewed_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    change_entry_roundtrip,
    ChangeEntry,
    ChangeEntry {
        id: "chg-c4d5e6f7".into(),
        species_id: "spc-a3f8b2c1".into(),
        field: "heightMeters".into(),
        previous_value: json!(12),
        new_value: json!(15),
        changed_by: "usr-reviewer".into(),
        reason: "measured again".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    activity_entry_roundtrip,
    ActivityEntry,
    ActivityEntry {
        id: "act-d4e5f6a7".into(),
        species_id: "spc-a3f8b2c1".into(),
        actor_id: "usr-reviewer".into(),
        action: ActivityAction::Voted,
        detail: Some(json!({"decision": "approved", "approvals": 1, "rejections": 0})),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    photo_roundtrip,
    Photo,
    Photo {
        id: "pho-e5f6a7b8".into(),
        species_id: "spc-a3f8b2c1".into(),
        url: "https://img.example.org/jatoba.jpg".into(),
        status: PhotoStatus::Pending,
        uploaded_by: "usr-author".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    user_roundtrip,
    User,
    User {
        id: "usr-reviewer".into(),
        display_name: "Ana".into(),
        email: None,
        role: UserRole::Reviewer,
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    review_status_roundtrip,
    ReviewStatus,
    ReviewStatus {
        species_id: "spc-a3f8b2c1".into(),
        status: SpeciesStatus::InReview,
        approval_count: 1,
        rejection_count: 0,
        quorum: flora_core::APPROVAL_QUORUM,
        entries: vec![],
    }
);

roundtrip_and_validate!(
    status_changed_detail_roundtrip,
    StatusChangedDetail,
    StatusChangedDetail {
        from: SpeciesStatus::Published,
        to: SpeciesStatus::InReview,
        reason: Some("height is wrong".into()),
    }
);

roundtrip_and_validate!(
    vote_detail_roundtrip,
    VoteDetail,
    VoteDetail {
        decision: ReviewDecision::Rejected,
        approvals: 1,
        rejections: 1,
    }
);

roundtrip_and_validate!(
    edit_detail_roundtrip,
    EditDetail,
    EditDetail {
        fields: vec!["heightMeters".into()],
        target: EditTarget::Overlay,
        reason: Some("measured again".into()),
    }
);

#[test]
fn species_fields_schema_rejects_unknown_keys() {
    let schema = serde_json::to_value(schema_for!(SpeciesFields)).unwrap();
    let errors = validate_against_schema(&schema, &json!({"name": "Ipê", "legacyColumn": 1}));
    assert!(!errors.is_empty());
}

#[test]
fn species_fields_schema_rejects_wrong_types() {
    let schema = serde_json::to_value(schema_for!(SpeciesFields)).unwrap();
    let errors = validate_against_schema(&schema, &json!({"heightMeters": "tall"}));
    assert!(!errors.is_empty());
}
