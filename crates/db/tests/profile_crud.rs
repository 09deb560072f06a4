//! Integration tests for the identity and profile repositories:
//! user CRUD, one-profile-per-user enforcement, candidature forms,
//! notifications, coach requests and blob storage.

use buildup_db::models::builder::CreateBuilder;
use buildup_db::models::coach::CreateCoach;
use buildup_db::models::form::FormEntryInput;
use buildup_db::models::ntf_referent::{CreateNtfReferent, UpdateNtfReferent};
use buildup_db::models::user::{CreateUser, UpdateUser};
use buildup_db::repositories::{
    BuilderRepo, CoachRepo, CoachRequestRepo, FileRepo, FormRepo, NotificationRepo,
    NtfReferentRepo, UserRepo,
};
use chrono::Utc;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(name: &str, role: &str) -> CreateUser {
    CreateUser {
        first_name: name.to_string(),
        last_name: "Martin".to_string(),
        birthdate: Utc::now(),
        email: format!("{name}@example.com"),
        discord_tag: format!("{name}#0001"),
        username: name.to_string(),
        role: role.to_string(),
        password_hash: "aa".repeat(64),
        password_salt: "bb".repeat(128),
    }
}

fn new_builder(user_id: &str) -> CreateBuilder {
    CreateBuilder {
        user_id: user_id.to_string(),
        department: Some(35),
        situation: "Étudiant".to_string(),
        description: "Je travaille sur une application mobile".to_string(),
        form: Vec::new(),
    }
}

fn new_coach(user_id: &str) -> CreateCoach {
    CreateCoach {
        user_id: user_id.to_string(),
        department: Some(44),
        situation: "Entrepreneur".to_string(),
        description: "Dix ans d'accompagnement de projets".to_string(),
        form: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Test: User CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_find_user(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("alice", "builder"))
        .await
        .unwrap();
    assert_eq!(user.id.len(), 24);
    assert_eq!(user.role, "builder");

    let by_id = UserRepo::find_by_id(&pool, &user.id).await.unwrap();
    assert!(by_id.is_some());

    let by_login = UserRepo::find_by_username_or_email(&pool, "alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_login.id, user.id);

    let by_username = UserRepo::find_by_username_or_email(&pool, "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_username.id, user.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("bob", "builder"))
        .await
        .unwrap();

    let mut duplicate = new_user("bob2", "builder");
    duplicate.email = "bob@example.com".to_string();
    let result = UserRepo::create(&pool, &duplicate).await;
    assert!(result.is_err(), "Duplicate email should fail");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_user_partial(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("carol", "coach"))
        .await
        .unwrap();

    let updated = UserRepo::update(
        &pool,
        &user.id,
        &UpdateUser {
            discord_tag: Some("carol#9999".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("Update should return the row");

    assert_eq!(updated.discord_tag, "carol#9999");
    // Untouched fields keep their values.
    assert_eq!(updated.username, "carol");
    assert_eq!(updated.email, "carol@example.com");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_password_replaces_salt(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("dave", "builder"))
        .await
        .unwrap();

    let updated = UserRepo::update_password(&pool, &user.id, &"cc".repeat(64), &"dd".repeat(128))
        .await
        .unwrap();
    assert!(updated);

    let reloaded = UserRepo::find_by_id(&pool, &user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.password_hash, "cc".repeat(64));
    assert_eq!(reloaded.password_salt, "dd".repeat(128));
}

// ---------------------------------------------------------------------------
// Test: one Builder per User
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_builder_profile_unique_per_user(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("eva", "builder"))
        .await
        .unwrap();

    let builder = BuilderRepo::create(&pool, &new_builder(&user.id)).await.unwrap();
    assert_eq!(builder.status, "candidating");
    assert_eq!(builder.step, "preselected");
    assert!(builder.coach_id.is_none());

    let result = BuilderRepo::create(&pool, &new_builder(&user.id)).await;
    assert!(result.is_err(), "Second builder profile for the same user should fail");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_coach_profile_unique_per_user(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("frank", "coach"))
        .await
        .unwrap();

    let coach = CoachRepo::create(&pool, &new_coach(&user.id)).await.unwrap();
    assert_eq!(coach.status, "candidating");
    assert_eq!(coach.step, "preselected");

    let result = CoachRepo::create(&pool, &new_coach(&user.id)).await;
    assert!(result.is_err(), "Second coach profile for the same user should fail");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_status_rejected_by_schema(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("gus", "builder"))
        .await
        .unwrap();
    BuilderRepo::create(&pool, &new_builder(&user.id)).await.unwrap();

    let result = sqlx::query("UPDATE builders SET status = 'nonsense' WHERE user_id = $1")
        .bind(&user.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "Unknown status should violate the check constraint");
}

// ---------------------------------------------------------------------------
// Test: listings joined with user identity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_builders_by_status(pool: PgPool) {
    let u1 = UserRepo::create(&pool, &new_user("hugo", "builder"))
        .await
        .unwrap();
    let u2 = UserRepo::create(&pool, &new_user("iris", "builder"))
        .await
        .unwrap();
    BuilderRepo::create(&pool, &new_builder(&u1.id)).await.unwrap();
    let b2 = BuilderRepo::create(&pool, &new_builder(&u2.id)).await.unwrap();

    sqlx::query("UPDATE builders SET status = 'validated' WHERE id = $1")
        .bind(&b2.id)
        .execute(&pool)
        .await
        .unwrap();

    let candidating = BuilderRepo::list_by_status(&pool, "candidating").await.unwrap();
    assert_eq!(candidating.len(), 1);
    assert_eq!(candidating[0].first_name, "hugo");

    let validated = BuilderRepo::list_by_status(&pool, "validated").await.unwrap();
    assert_eq!(validated.len(), 1);
    assert_eq!(validated[0].first_name, "iris");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_builders_by_coach(pool: PgPool) {
    let coach_user = UserRepo::create(&pool, &new_user("jack", "coach"))
        .await
        .unwrap();
    let coach = CoachRepo::create(&pool, &new_coach(&coach_user.id)).await.unwrap();

    let u1 = UserRepo::create(&pool, &new_user("kim", "builder"))
        .await
        .unwrap();
    let u2 = UserRepo::create(&pool, &new_user("lea", "builder"))
        .await
        .unwrap();
    let b1 = BuilderRepo::create(&pool, &new_builder(&u1.id)).await.unwrap();
    BuilderRepo::create(&pool, &new_builder(&u2.id)).await.unwrap();

    BuilderRepo::set_coach(&pool, &b1.id, Some(&coach.id)).await.unwrap();

    let assigned = BuilderRepo::list_by_coach(&pool, &coach.id).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].first_name, "kim");
}

// ---------------------------------------------------------------------------
// Test: candidature forms
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_form_entries_keep_order(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("mia", "coach"))
        .await
        .unwrap();

    let entries = vec![
        FormEntryInput {
            question: "Quelles sont vos compétences clés ?".to_string(),
            answer: "Marketing, gestion".to_string(),
        },
        FormEntryInput {
            question: "Pourquoi souhaites-tu devenir Coach ?".to_string(),
            answer: "Transmettre".to_string(),
        },
        FormEntryInput {
            question: "Quel serait le Builder idéal pour toi ?".to_string(),
            answer: "Motivé".to_string(),
        },
    ];
    FormRepo::create(&pool, &user.id, &entries).await.unwrap();

    let stored = FormRepo::list_entries_for_user(&pool, &user.id).await.unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].question, "Quelles sont vos compétences clés ?");
    assert_eq!(stored[1].answer, "Transmettre");
    assert_eq!(stored[2].index, 2);

    let answer =
        FormRepo::answer_for_question(&pool, &user.id, "Pourquoi souhaites-tu devenir Coach ?")
            .await
            .unwrap();
    assert_eq!(answer.as_deref(), Some("Transmettre"));

    let missing = FormRepo::answer_for_question(&pool, &user.id, "Question inconnue ?")
        .await
        .unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Test: notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_notification_lifecycle(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("nora", "builder"))
        .await
        .unwrap();

    NotificationRepo::create(&pool, &user.id, "builder", "Votre preuve a été validée !")
        .await
        .unwrap();
    let second = NotificationRepo::create(&pool, &user.id, "builder", "Nouvelle étape disponible")
        .await
        .unwrap();

    assert_eq!(NotificationRepo::unseen_count(&pool, &user.id).await.unwrap(), 2);

    let marked = NotificationRepo::mark_seen(&pool, &second.id, &user.id).await.unwrap();
    assert!(marked);
    // Marking twice is a no-op.
    let marked_again = NotificationRepo::mark_seen(&pool, &second.id, &user.id).await.unwrap();
    assert!(!marked_again);

    let unseen = NotificationRepo::list_for_owner(&pool, &user.id, true, 50, 0)
        .await
        .unwrap();
    assert_eq!(unseen.len(), 1);
    assert_eq!(unseen[0].content, "Votre preuve a été validée !");

    // Another user cannot mark someone else's notification.
    let other = UserRepo::create(&pool, &new_user("omar", "builder"))
        .await
        .unwrap();
    let foreign = NotificationRepo::mark_seen(&pool, &unseen[0].id, &other.id).await.unwrap();
    assert!(!foreign);
}

// ---------------------------------------------------------------------------
// Test: coach requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_coach_request_single_open_per_pair(pool: PgPool) {
    let coach_user = UserRepo::create(&pool, &new_user("paul", "coach"))
        .await
        .unwrap();
    let coach = CoachRepo::create(&pool, &new_coach(&coach_user.id)).await.unwrap();
    let builder_user = UserRepo::create(&pool, &new_user("quentin", "builder"))
        .await
        .unwrap();
    let builder = BuilderRepo::create(&pool, &new_builder(&builder_user.id))
        .await
        .unwrap();

    let request = CoachRequestRepo::create(&pool, &coach.id, &builder.id)
        .await
        .unwrap();
    assert_eq!(request.status, "waiting");

    let duplicate = CoachRequestRepo::create(&pool, &coach.id, &builder.id).await;
    assert!(duplicate.is_err(), "Second open request for the pair should fail");

    // Deciding closes the request; the pair can then open a new one.
    let decided = CoachRequestRepo::decide(&pool, &request.id, "refused")
        .await
        .unwrap();
    assert_eq!(decided.unwrap().status, "refused");

    // A second decision on the same request loses.
    let raced = CoachRequestRepo::decide(&pool, &request.id, "accepted")
        .await
        .unwrap();
    assert!(raced.is_none());

    CoachRequestRepo::create(&pool, &coach.id, &builder.id)
        .await
        .expect("New request after the previous one closed");

    let waiting = CoachRequestRepo::list_waiting_for_coach(&pool, &coach.id)
        .await
        .unwrap();
    assert_eq!(waiting.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: NTF referents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_ntf_referent_crud(pool: PgPool) {
    let referent = NtfReferentRepo::create(
        &pool,
        &CreateNtfReferent {
            first_name: "Victor".to_string(),
            last_name: "Denis".to_string(),
            email: "victor@example.com".to_string(),
            discord_tag: "victor#8497".to_string(),
            competence: None,
        },
    )
    .await
    .unwrap();

    let updated = NtfReferentRepo::update(
        &pool,
        &referent.id,
        &UpdateNtfReferent {
            competence: Some("SEO, Design".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("Update should return the row");
    assert_eq!(updated.competence.as_deref(), Some("SEO, Design"));
    assert_eq!(updated.email, "victor@example.com");

    let all = NtfReferentRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: blob storage replace-by-name
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_file_upsert_replaces_content(pool: PgPool) {
    let first = FileRepo::upsert(&pool, "profile_abc", "image/png", b"first bytes")
        .await
        .unwrap();
    let second = FileRepo::upsert(&pool, "profile_abc", "image/jpeg", b"second bytes")
        .await
        .unwrap();

    // Replace keeps the blob id stable.
    assert_eq!(first.id, second.id);
    assert_eq!(second.content_type, "image/jpeg");

    let stored = FileRepo::find_by_name(&pool, "profile_abc")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.data, b"second bytes");

    let by_id = FileRepo::find_by_id(&pool, &first.id).await.unwrap().unwrap();
    assert_eq!(by_id.content_type, "image/jpeg");
}
