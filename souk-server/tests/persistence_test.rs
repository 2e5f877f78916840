//! On-disk engine test
//!
//! The other suites run on the in-memory engine; this one checks the
//! RocksDB path survives a close/reopen cycle.

use shared::types::AppRole;
use souk_server::db::DbService;
use souk_server::db::models::ProfileCreate;
use souk_server::db::repository::ProfileRepository;

#[tokio::test]
async fn profiles_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("db");
    let path = path.to_str().expect("utf-8 path");

    {
        let db = DbService::new(path).await.expect("open");
        let repo = ProfileRepository::new(db.db.clone());
        repo.create(
            ProfileCreate {
                username: "amina".into(),
                password: "hunter2!hunter2!".into(),
                display_name: "Amina".into(),
                phone: None,
                role: AppRole::Customer,
            },
            0,
        )
        .await
        .expect("create");
    }

    let db = DbService::new(path).await.expect("reopen");
    let repo = ProfileRepository::new(db.db.clone());
    let found = repo
        .find_by_username("amina")
        .await
        .expect("query")
        .expect("row persisted");
    assert_eq!(found.display_name, "Amina");
    assert!(found.verify_password("hunter2!hunter2!").expect("verify"));
}
