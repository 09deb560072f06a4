//! Integration tests for the curriculum and progression repositories:
//! positional sync, cursor arithmetic against real rows, the atomic
//! cursor advance, and returning decisions under races.

use buildup_core::curriculum::Cursor;
use buildup_db::models::builder::CreateBuilder;
use buildup_db::models::project::CreateProject;
use buildup_db::models::returning::CreateReturning;
use buildup_db::models::user::CreateUser;
use buildup_db::repositories::{BuildOnRepo, BuilderRepo, ProjectRepo, ReturningRepo, UserRepo};
use chrono::Utc;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(name: &str) -> CreateUser {
    CreateUser {
        first_name: name.to_string(),
        last_name: "Durand".to_string(),
        birthdate: Utc::now(),
        email: format!("{name}@example.com"),
        discord_tag: format!("{name}#0001"),
        username: name.to_string(),
        role: "builder".to_string(),
        password_hash: "aa".repeat(64),
        password_salt: "bb".repeat(128),
    }
}

fn new_project(builder_id: &str) -> CreateProject {
    CreateProject {
        builder_id: builder_id.to_string(),
        name: "Pluctis".to_string(),
        categorie: None,
        description: "Ne laissez plus jamais mourir vos plantes".to_string(),
        keywords: "plantes, application".to_string(),
        team: "Solo".to_string(),
        launch_date: Utc::now(),
        is_lucratif: true,
        is_declared: false,
    }
}

fn comment_returning(project_id: &str, step_id: &str, comment: &str) -> CreateReturning {
    CreateReturning {
        project_id: project_id.to_string(),
        build_on_step_id: step_id.to_string(),
        returning_type: "comment".to_string(),
        file_name: None,
        file_id: None,
        comment: Some(comment.to_string()),
    }
}

/// Seed two build-ons (two steps, then one step) and return the step
/// ids in curriculum order.
async fn seed_curriculum(pool: &PgPool) -> (Cursor, Cursor, Cursor) {
    let a = BuildOnRepo::insert(pool, 0, "Premiers pas", "Découvrir le programme")
        .await
        .unwrap();
    let b = BuildOnRepo::insert(pool, 1, "Prototype", "Construire un prototype")
        .await
        .unwrap();

    let s0 = BuildOnRepo::insert_step(pool, &a.id, 0, "Pitch", "Décrire le projet", "comment", "Un commentaire", None)
        .await
        .unwrap();
    let s1 = BuildOnRepo::insert_step(pool, &a.id, 1, "Etude", "Etudier le marché", "file", "Un fichier PDF", None)
        .await
        .unwrap();
    let s2 = BuildOnRepo::insert_step(pool, &b.id, 0, "Maquette", "Présenter la maquette", "external", "Un lien", None)
        .await
        .unwrap();

    (
        Cursor { build_on_id: a.id.clone(), build_on_step_id: s0.id },
        Cursor { build_on_id: a.id, build_on_step_id: s1.id },
        Cursor { build_on_id: b.id, build_on_step_id: s2.id },
    )
}

async fn seed_project(pool: &PgPool, name: &str, cursor: &Cursor) -> String {
    let user = UserRepo::create(pool, &new_user(name)).await.unwrap();
    let builder = BuilderRepo::create(
        pool,
        &CreateBuilder {
            user_id: user.id,
            department: Some(35),
            situation: "Étudiant".to_string(),
            description: "Projet mobile".to_string(),
            form: Vec::new(),
        },
    )
    .await
    .unwrap();
    let project = ProjectRepo::create(pool, &new_project(&builder.id), Some(cursor))
        .await
        .unwrap();
    project.id
}

// ---------------------------------------------------------------------------
// Test: positional sync (insert + update end up with list indices)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_sync_positions_follow_list_order(pool: PgPool) {
    // Two existing rows, deliberately created in reverse order.
    let first = BuildOnRepo::insert(&pool, 1, "Ancien premier", "description")
        .await
        .unwrap();
    let second = BuildOnRepo::insert(&pool, 0, "Ancien second", "description")
        .await
        .unwrap();

    // Resubmit: [first, second, new] - two updates and one insert.
    BuildOnRepo::update(&pool, &first.id, 0, "Premiers pas", "mis à jour")
        .await
        .unwrap()
        .expect("existing row");
    BuildOnRepo::update(&pool, &second.id, 1, "Prototype", "mis à jour")
        .await
        .unwrap()
        .expect("existing row");
    BuildOnRepo::insert(&pool, 2, "Lancement", "nouveau")
        .await
        .unwrap();

    let all = BuildOnRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].name, "Premiers pas");
    assert_eq!(all[1].name, "Prototype");
    assert_eq!(all[2].name, "Lancement");
    assert_eq!((all[0].index, all[1].index, all[2].index), (0, 1, 2));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_build_on_returns_none(pool: PgPool) {
    let ghost = BuildOnRepo::update(&pool, "0123456789abcdef01234567", 0, "x", "y")
        .await
        .unwrap();
    assert!(ghost.is_none());
}

// ---------------------------------------------------------------------------
// Test: curriculum index over real rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_curriculum_index_orders_steps(pool: PgPool) {
    let (s0, s1, s2) = seed_curriculum(&pool).await;

    let index = BuildOnRepo::curriculum_index(&pool).await.unwrap();
    assert_eq!(index.first_step(), Some(s0.clone()));
    assert_eq!(index.successor(&s0).unwrap(), Some(s1.clone()));
    // Crossing the build-on boundary.
    assert_eq!(index.successor(&s1).unwrap(), Some(s2.clone()));
    // Last step of the last build-on completes the program.
    assert_eq!(index.successor(&s2).unwrap(), None);
}

// ---------------------------------------------------------------------------
// Test: atomic cursor advance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_advance_cursor_once(pool: PgPool) {
    let (s0, s1, _) = seed_curriculum(&pool).await;
    let project_id = seed_project(&pool, "rachel", &s0).await;

    let moved = ProjectRepo::advance_cursor(&pool, &project_id, &s0, Some(&s1))
        .await
        .unwrap();
    assert!(moved);

    let project = ProjectRepo::find_by_id(&pool, &project_id).await.unwrap().unwrap();
    assert_eq!(project.current_build_on.as_deref(), Some(s1.build_on_id.as_str()));
    assert_eq!(
        project.current_build_on_step.as_deref(),
        Some(s1.build_on_step_id.as_str())
    );

    // A second advance expecting the old position loses.
    let raced = ProjectRepo::advance_cursor(&pool, &project_id, &s0, Some(&s1))
        .await
        .unwrap();
    assert!(!raced, "Advance with a stale expected cursor should not apply");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_advance_cursor_to_completion(pool: PgPool) {
    let (s0, s1, s2) = seed_curriculum(&pool).await;
    let project_id = seed_project(&pool, "sam", &s0).await;

    assert!(ProjectRepo::advance_cursor(&pool, &project_id, &s0, Some(&s1)).await.unwrap());
    assert!(ProjectRepo::advance_cursor(&pool, &project_id, &s1, Some(&s2)).await.unwrap());
    assert!(ProjectRepo::advance_cursor(&pool, &project_id, &s2, None).await.unwrap());

    let project = ProjectRepo::find_by_id(&pool, &project_id).await.unwrap().unwrap();
    assert!(project.current_build_on.is_none());
    assert!(project.current_build_on_step.is_none());

    // Nothing left to advance from.
    let past_end = ProjectRepo::advance_cursor(&pool, &project_id, &s2, None)
        .await
        .unwrap();
    assert!(!past_end);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_project_created_without_curriculum_has_no_cursor(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("tess")).await.unwrap();
    let builder = BuilderRepo::create(
        &pool,
        &CreateBuilder {
            user_id: user.id,
            department: None,
            situation: "Étudiante".to_string(),
            description: "Projet web".to_string(),
            form: Vec::new(),
        },
    )
    .await
    .unwrap();
    let project = ProjectRepo::create(&pool, &new_project(&builder.id), None)
        .await
        .unwrap();
    assert!(project.current_build_on.is_none());
    assert!(project.current_build_on_step.is_none());
}

// ---------------------------------------------------------------------------
// Test: pending returning uniqueness and decisions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_single_pending_returning_per_step(pool: PgPool) {
    let (s0, _, _) = seed_curriculum(&pool).await;
    let project_id = seed_project(&pool, "ugo", &s0).await;

    let returning = ReturningRepo::create(
        &pool,
        &comment_returning(&project_id, &s0.build_on_step_id, "x"),
    )
    .await
    .unwrap();
    assert_eq!(returning.status, "waiting");
    assert_eq!(returning.comment.as_deref(), Some("x"));

    let duplicate = ReturningRepo::create(
        &pool,
        &comment_returning(&project_id, &s0.build_on_step_id, "y"),
    )
    .await;
    assert!(duplicate.is_err(), "Second pending returning for the step should fail");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_decide_returning_is_single_shot(pool: PgPool) {
    let (s0, _, _) = seed_curriculum(&pool).await;
    let project_id = seed_project(&pool, "val", &s0).await;

    let returning = ReturningRepo::create(
        &pool,
        &comment_returning(&project_id, &s0.build_on_step_id, "ma preuve"),
    )
    .await
    .unwrap();

    let decided = ReturningRepo::decide(&pool, &returning.id, "validated", "admin", None)
        .await
        .unwrap()
        .expect("First decision applies");
    assert_eq!(decided.status, "validated");
    assert_eq!(decided.reviewed_by.as_deref(), Some("admin"));

    // The losing side of the race gets nothing to decide.
    let raced = ReturningRepo::decide(&pool, &returning.id, "validated", "coach", None)
        .await
        .unwrap();
    assert!(raced.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refused_returning_allows_resubmission(pool: PgPool) {
    let (s0, _, _) = seed_curriculum(&pool).await;
    let project_id = seed_project(&pool, "willa", &s0).await;

    let first = ReturningRepo::create(
        &pool,
        &comment_returning(&project_id, &s0.build_on_step_id, "brouillon"),
    )
    .await
    .unwrap();

    let refused = ReturningRepo::decide(&pool, &first.id, "refused", "coach", Some("Trop court"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refused.status, "refused");
    assert_eq!(refused.refusing_reason.as_deref(), Some("Trop court"));

    // The step is free again for a new submission.
    let second = ReturningRepo::create(
        &pool,
        &comment_returning(&project_id, &s0.build_on_step_id, "version complète"),
    )
    .await
    .unwrap();
    assert_eq!(second.status, "waiting");

    let history = ReturningRepo::list_by_project(&pool, &project_id).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_transfer_moves_between_queues(pool: PgPool) {
    let (s0, _, _) = seed_curriculum(&pool).await;
    let project_id = seed_project(&pool, "yann", &s0).await;

    let returning = ReturningRepo::create(
        &pool,
        &comment_returning(&project_id, &s0.build_on_step_id, "preuve"),
    )
    .await
    .unwrap();

    let transferred = ReturningRepo::transfer(&pool, &returning.id, "waiting_coach")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(transferred.status, "waiting_coach");

    // Pending listings see the transferred row only in the coach set.
    let admin_queue = ReturningRepo::list_pending(&pool, &["waiting", "waiting_admin"])
        .await
        .unwrap();
    assert!(admin_queue.is_empty());
    let coach_queue = ReturningRepo::list_pending(&pool, &["waiting", "waiting_coach"])
        .await
        .unwrap();
    assert_eq!(coach_queue.len(), 1);

    // A decided returning cannot be transferred back.
    ReturningRepo::decide(&pool, &returning.id, "validated", "coach", None)
        .await
        .unwrap()
        .unwrap();
    let stale = ReturningRepo::transfer(&pool, &returning.id, "waiting").await.unwrap();
    assert!(stale.is_none());
}
