//! Integration tests for the JSON seed import.

use logicton_db::repositories::{ServiceRepo, TeamMemberRepo};
use logicton_db::seed::{import_services, import_team};
use serde_json::json;
use sqlx::PgPool;

async fn write_json(dir: &std::path::Path, name: &str, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(name);
    tokio::fs::write(&path, serde_json::to_vec(&value).unwrap())
        .await
        .unwrap();
    path
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_services_is_idempotent(pool: PgPool) {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_json(
        tmp.path(),
        "services.json",
        json!({"services": [{
            "id": "mobile-apps",
            "title": {"th": "แอปมือถือ", "en": "Mobile Apps"},
            "description": {"th": "ท", "en": "d"},
            "features": {"th": ["ก"], "en": ["Native"]},
            "technologies": ["Flutter"],
            "category": "mobile",
            "order": 2,
            "howWeWork": {
                "th": [{"title": "ค้นหา", "description": "ประชุม"}],
                "en": [{"title": "Discover", "description": "Meet"}]
            }
        }]}),
    )
    .await;

    assert_eq!(import_services(&pool, &path).await.unwrap(), 1);
    assert_eq!(import_services(&pool, &path).await.unwrap(), 1);

    let services = ServiceRepo::list_active(&pool).await.unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].icon, "Code");
    assert_eq!(
        services[0].how_we_work_en.as_ref().map(|j| j.0.len()),
        Some(1)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_team(pool: PgPool) {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_json(
        tmp.path(),
        "team.json",
        json!({"members": [{
            "id": "ceo",
            "name": {"th": "สมชาย", "en": "Somchai"},
            "role": {"th": "ผู้บริหาร", "en": "CEO"},
            "order": 1
        }]}),
    )
    .await;

    assert_eq!(import_team(&pool, &path).await.unwrap(), 1);
    let members = TeamMemberRepo::list_active(&pool).await.unwrap();
    assert_eq!(members[0].name_en, "Somchai");
    assert_eq!(members[0].bio_en, "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_file_is_reported(pool: PgPool) {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_json(tmp.path(), "services.json", json!({"services": 3})).await;
    let err = import_services(&pool, &path).await.unwrap_err();
    assert!(err.to_string().contains("Failed to parse"));
}
