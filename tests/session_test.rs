mod common;

use chrono::{Duration, Utc};
use rive::models::{CategoryFilter, SessionPeriod};
use rive::services::{LibraryService, SessionService};

use common::{create_template, exercise_id, setup_test_db};

#[tokio::test]
async fn test_list_sessions_by_period() {
    let pool = setup_test_db();
    let template = create_template(&pool, "user1", "Leg Day", &["back_squat"]).await;
    let service = SessionService::new(pool.clone());
    let recent = service.start_session("user1", &template.id).await.unwrap();
    let old = service.start_session("user1", &template.id).await.unwrap();
    {
        let conn = pool.get().unwrap();
        conn.execute(
            "UPDATE workout_sessions SET started_at = ? WHERE id = ?",
            rusqlite::params![Utc::now() - Duration::days(90), old.id],
        )
        .unwrap();
    }
    let today = Utc::now().date_naive();

    let week = service
        .list_sessions("user1", SessionPeriod::Week, today)
        .await
        .unwrap();
    let all = service
        .list_sessions("user1", SessionPeriod::All, today)
        .await
        .unwrap();

    assert_eq!(week.len(), 1);
    assert_eq!(week[0].id, recent.id);
    assert_eq!(week[0].name, "Leg Day");
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].id, old.id);
}

#[tokio::test]
async fn test_cancelled_session_disappears_from_list() {
    let pool = setup_test_db();
    let template = create_template(&pool, "user1", "Leg Day", &["back_squat"]).await;
    let service = SessionService::new(pool);
    let session = service.start_session("user1", &template.id).await.unwrap();

    service.cancel_session("user1", &session.id).await.unwrap();

    let today = Utc::now().date_naive();
    assert!(service
        .list_sessions("user1", SessionPeriod::All, today)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_favorites_round_trip_through_library() {
    let pool = setup_test_db();
    let curl = exercise_id(&pool, "hammer_curl");
    let library = LibraryService::new(pool);

    assert!(library.toggle_favorite("user1", curl).await.unwrap());
    let options = library
        .search("user1", "curl", &CategoryFilter::Arms, None)
        .await
        .unwrap();
    assert!(options.iter().any(|o| o.exercise.id == curl && o.favorite));
    assert_eq!(library.favorites("user1").await.unwrap()[0].name, "hammer_curl");

    assert!(!library.toggle_favorite("user1", curl).await.unwrap());
    assert!(library.favorites("user1").await.unwrap().is_empty());
}
