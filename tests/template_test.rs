mod common;

use rive::error::AppError;
use rive::models::ExerciseOrder;
use rive::services::{SessionService, TemplateService};

use common::{
    count, create_template, exercise_id, fail_writes, fail_writes_when, session_rows,
    setup_test_db, template_rows,
};

#[tokio::test]
async fn test_add_exercise_reaches_incomplete_sessions_only() {
    let pool = setup_test_db();
    let template = create_template(&pool, "user1", "Push Day", &["bench_press"]).await;
    let bench = exercise_id(&pool, "bench_press");
    let dip = exercise_id(&pool, "dip");
    let sessions = SessionService::new(pool.clone());
    let open_a = sessions.start_session("user1", &template.id).await.unwrap();
    let open_b = sessions.start_session("user1", &template.id).await.unwrap();
    let done = sessions.start_session("user1", &template.id).await.unwrap();
    sessions.complete_session("user1", &done.id).await.unwrap();

    let propagation = TemplateService::new(pool.clone())
        .add_exercise_to_template(&template.id, dip, None)
        .await
        .unwrap();

    assert_eq!(propagation.sessions, 2);
    assert!(propagation.is_complete());
    assert_eq!(template_rows(&pool, &template.id), vec![(bench, 1), (dip, 2)]);
    assert_eq!(session_rows(&pool, &open_a.id), vec![(bench, 1), (dip, 2)]);
    assert_eq!(session_rows(&pool, &open_b.id), vec![(bench, 1), (dip, 2)]);
    assert_eq!(session_rows(&pool, &done.id), vec![(bench, 1)]);
}

#[tokio::test]
async fn test_add_exercise_to_empty_template_starts_at_one() {
    let pool = setup_test_db();
    let template = create_template(&pool, "user1", "Empty", &[]).await;
    let dip = exercise_id(&pool, "dip");

    TemplateService::new(pool.clone())
        .add_exercise_to_template(&template.id, dip, None)
        .await
        .unwrap();

    assert_eq!(template_rows(&pool, &template.id), vec![(dip, 1)]);
}

#[tokio::test]
async fn test_add_exercise_with_explicit_order() {
    let pool = setup_test_db();
    let template = create_template(&pool, "user1", "Push Day", &["bench_press"]).await;
    let bench = exercise_id(&pool, "bench_press");
    let dip = exercise_id(&pool, "dip");
    let sessions = SessionService::new(pool.clone());
    let open = sessions.start_session("user1", &template.id).await.unwrap();
    let done = sessions.start_session("user1", &template.id).await.unwrap();
    sessions.complete_session("user1", &done.id).await.unwrap();

    TemplateService::new(pool.clone())
        .add_exercise_to_template(&template.id, dip, Some(7))
        .await
        .unwrap();

    assert_eq!(template_rows(&pool, &template.id)[1], (dip, 7));
    assert_eq!(session_rows(&pool, &open.id), vec![(bench, 1), (dip, 7)]);
    assert_eq!(session_rows(&pool, &done.id), vec![(bench, 1)]);
}

#[tokio::test]
async fn test_add_then_remove_restores_template() {
    let pool = setup_test_db();
    let template =
        create_template(&pool, "user1", "Push Day", &["bench_press", "back_squat"]).await;
    let dip = exercise_id(&pool, "dip");
    let session = SessionService::new(pool.clone())
        .start_session("user1", &template.id)
        .await
        .unwrap();
    let before = template_rows(&pool, &template.id);
    let session_before = session_rows(&pool, &session.id);
    let service = TemplateService::new(pool.clone());

    service
        .add_exercise_to_template(&template.id, dip, None)
        .await
        .unwrap();
    service
        .remove_exercise_from_template(&template.id, dip)
        .await
        .unwrap();

    assert_eq!(template_rows(&pool, &template.id), before);
    assert_eq!(session_rows(&pool, &session.id), session_before);
}

#[tokio::test]
async fn test_add_exercise_primary_failure_leaves_sessions_alone() {
    let pool = setup_test_db();
    let template = create_template(&pool, "user1", "Push Day", &["bench_press"]).await;
    let dip = exercise_id(&pool, "dip");
    let session = SessionService::new(pool.clone())
        .start_session("user1", &template.id)
        .await
        .unwrap();
    fail_writes(&pool, "workout_exercises", "INSERT");

    let result = TemplateService::new(pool.clone())
        .add_exercise_to_template(&template.id, dip, None)
        .await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(template_rows(&pool, &template.id).len(), 1);
    assert_eq!(session_rows(&pool, &session.id).len(), 1);
}

#[tokio::test]
async fn test_add_exercise_session_failure_is_swallowed() {
    let pool = setup_test_db();
    let template = create_template(&pool, "user1", "Push Day", &["bench_press"]).await;
    let dip = exercise_id(&pool, "dip");
    let session = SessionService::new(pool.clone())
        .start_session("user1", &template.id)
        .await
        .unwrap();
    fail_writes(&pool, "session_exercises", "INSERT");

    let propagation = TemplateService::new(pool.clone())
        .add_exercise_to_template(&template.id, dip, None)
        .await
        .unwrap();

    assert!(!propagation.is_complete());
    assert_eq!(template_rows(&pool, &template.id).len(), 2);
    assert_eq!(session_rows(&pool, &session.id).len(), 1);
}

#[tokio::test]
async fn test_remove_exercise_reaches_incomplete_sessions_only() {
    let pool = setup_test_db();
    let template =
        create_template(&pool, "user1", "Push Day", &["bench_press", "dip"]).await;
    let bench = exercise_id(&pool, "bench_press");
    let dip = exercise_id(&pool, "dip");
    let sessions = SessionService::new(pool.clone());
    let open = sessions.start_session("user1", &template.id).await.unwrap();
    let done = sessions.start_session("user1", &template.id).await.unwrap();
    sessions.complete_session("user1", &done.id).await.unwrap();

    TemplateService::new(pool.clone())
        .remove_exercise_from_template(&template.id, dip)
        .await
        .unwrap();

    assert_eq!(template_rows(&pool, &template.id), vec![(bench, 1)]);
    assert_eq!(session_rows(&pool, &open.id), vec![(bench, 1)]);
    assert_eq!(session_rows(&pool, &done.id), vec![(bench, 1), (dip, 2)]);
}

#[tokio::test]
async fn test_remove_exercise_removes_every_duplicate() {
    let pool = setup_test_db();
    let template = create_template(&pool, "user1", "Push Day", &["dip"]).await;
    let dip = exercise_id(&pool, "dip");
    let service = TemplateService::new(pool.clone());
    service
        .add_exercise_to_template(&template.id, dip, None)
        .await
        .unwrap();
    assert_eq!(template_rows(&pool, &template.id).len(), 2);

    service
        .remove_exercise_from_template(&template.id, dip)
        .await
        .unwrap();

    assert!(template_rows(&pool, &template.id).is_empty());
}

#[tokio::test]
async fn test_remove_exercise_session_failure_is_swallowed() {
    let pool = setup_test_db();
    let template =
        create_template(&pool, "user1", "Push Day", &["bench_press", "dip"]).await;
    let dip = exercise_id(&pool, "dip");
    let session = SessionService::new(pool.clone())
        .start_session("user1", &template.id)
        .await
        .unwrap();
    fail_writes(&pool, "session_exercises", "DELETE");

    let propagation = TemplateService::new(pool.clone())
        .remove_exercise_from_template(&template.id, dip)
        .await
        .unwrap();

    assert_eq!(propagation.failures, 1);
    assert_eq!(template_rows(&pool, &template.id).len(), 1);
    assert_eq!(session_rows(&pool, &session.id).len(), 2);
}

#[tokio::test]
async fn test_reorder_mirrors_into_incomplete_sessions() {
    let pool = setup_test_db();
    let template =
        create_template(&pool, "user1", "Push Day", &["bench_press", "dip"]).await;
    let bench = exercise_id(&pool, "bench_press");
    let dip = exercise_id(&pool, "dip");
    let sessions = SessionService::new(pool.clone());
    let open = sessions.start_session("user1", &template.id).await.unwrap();
    let done = sessions.start_session("user1", &template.id).await.unwrap();
    sessions.complete_session("user1", &done.id).await.unwrap();

    let orders = [
        ExerciseOrder {
            exercise_id: dip,
            order_index: 1,
        },
        ExerciseOrder {
            exercise_id: bench,
            order_index: 2,
        },
    ];
    let propagation = TemplateService::new(pool.clone())
        .reorder_template_exercises(&template.id, &orders)
        .await
        .unwrap();

    assert!(propagation.is_complete());
    assert_eq!(template_rows(&pool, &template.id), vec![(dip, 1), (bench, 2)]);
    assert_eq!(session_rows(&pool, &open.id), vec![(dip, 1), (bench, 2)]);
    assert_eq!(session_rows(&pool, &done.id), vec![(bench, 1), (dip, 2)]);
}

#[tokio::test]
async fn test_reorder_stops_at_first_template_failure() {
    let pool = setup_test_db();
    let template =
        create_template(&pool, "user1", "Push Day", &["bench_press", "dip"]).await;
    let bench = exercise_id(&pool, "bench_press");
    let dip = exercise_id(&pool, "dip");
    let session = SessionService::new(pool.clone())
        .start_session("user1", &template.id)
        .await
        .unwrap();
    fail_writes_when(
        &pool,
        "workout_exercises",
        "UPDATE",
        &format!("NEW.exercise_id = {bench}"),
    );

    let orders = [
        ExerciseOrder {
            exercise_id: dip,
            order_index: 10,
        },
        ExerciseOrder {
            exercise_id: bench,
            order_index: 20,
        },
    ];
    let result = TemplateService::new(pool.clone())
        .reorder_template_exercises(&template.id, &orders)
        .await;

    assert!(result.is_err());
    // The update before the failure stays applied; sessions are untouched.
    assert_eq!(template_rows(&pool, &template.id), vec![(bench, 1), (dip, 10)]);
    assert_eq!(session_rows(&pool, &session.id), vec![(bench, 1), (dip, 2)]);
}

#[tokio::test]
async fn test_reorder_session_failure_is_swallowed() {
    let pool = setup_test_db();
    let template =
        create_template(&pool, "user1", "Push Day", &["bench_press", "dip"]).await;
    let bench = exercise_id(&pool, "bench_press");
    let dip = exercise_id(&pool, "dip");
    SessionService::new(pool.clone())
        .start_session("user1", &template.id)
        .await
        .unwrap();
    fail_writes(&pool, "session_exercises", "UPDATE");

    let orders = [
        ExerciseOrder {
            exercise_id: dip,
            order_index: 1,
        },
        ExerciseOrder {
            exercise_id: bench,
            order_index: 2,
        },
    ];
    let propagation = TemplateService::new(pool.clone())
        .reorder_template_exercises(&template.id, &orders)
        .await
        .unwrap();

    assert_eq!(propagation.sessions, 1);
    assert_eq!(propagation.failures, 2);
    assert_eq!(template_rows(&pool, &template.id), vec![(dip, 1), (bench, 2)]);
}

#[tokio::test]
async fn test_delete_template_removes_sessions_and_exercises() {
    let pool = setup_test_db();
    let template =
        create_template(&pool, "user1", "Push Day", &["bench_press", "dip"]).await;
    let sessions = SessionService::new(pool.clone());
    sessions.start_session("user1", &template.id).await.unwrap();
    sessions.start_session("user1", &template.id).await.unwrap();
    let service = TemplateService::new(pool.clone());
    assert_eq!(service.count_sessions(&template.id).await.unwrap(), 2);

    service.delete_template(&template.id).await.unwrap();

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM workouts", []), 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM workout_exercises", []), 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM workout_sessions", []), 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM session_exercises", []), 0);
}

#[tokio::test]
async fn test_list_templates_counts_exercises_newest_first() {
    let pool = setup_test_db();
    create_template(&pool, "user1", "Older", &["bench_press"]).await;
    create_template(&pool, "user1", "Newer", &["bench_press", "dip"]).await;
    create_template(&pool, "user2", "Someone Else", &[]).await;

    let templates = TemplateService::new(pool)
        .list_templates("user1")
        .await
        .unwrap();

    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0].name, "Newer");
    assert_eq!(templates[0].exercise_count, 2);
    assert_eq!(templates[1].exercise_count, 1);
}

#[tokio::test]
async fn test_update_template() {
    let pool = setup_test_db();
    let template = create_template(&pool, "user1", "Push Day", &[]).await;
    let service = TemplateService::new(pool);

    service
        .update_template(&template.id, " Pull Day ", Some(""))
        .await
        .unwrap();

    let details = service.workout_details(&template.id).await.unwrap();
    assert_eq!(details.name, "Pull Day");
    assert_eq!(details.description, None);
    assert!(matches!(
        service.update_template("missing", "Name", None).await,
        Err(AppError::NotFound(_))
    ));
}
