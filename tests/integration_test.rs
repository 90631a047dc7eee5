//! Database integration tests
//!
//! These run against the database configured in config.toml and are ignored
//! by default. Run with: cargo test -- --ignored

use animoa::chat::persistence;
use animoa::database::Database;
use animoa::models::MoodType;
use animoa::models::Sender;
use animoa::AppConfig;
use animoa::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

async fn setup_test_db() -> Result<Database> {
    let config = AppConfig::load()?;
    let pool = PgPool::connect(config.database_url()).await?;
    let db = Database::new(pool);
    db.init_schema().await?;
    Ok(db)
}

async fn create_test_user(db: &Database) -> Result<Uuid> {
    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO profiles (id, email, full_name) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(format!("{user_id}@test.example"))
        .bind("Test User")
        .execute(db.pool())
        .await?;
    Ok(user_id)
}

#[tokio::test]
#[ignore = "requires a configured database"]
async fn test_first_message_titles_session_once() -> Result<()> {
    let db = setup_test_db().await?;
    let user_id = create_test_user(&db).await?;
    let session = db.create_session(user_id, "New Chat").await?;

    let first_message = "I have been feeling anxious about work deadlines lately";
    persistence::on_turn_complete(
        std::sync::Arc::new(db.clone()),
        session.id,
        user_id,
        first_message.to_string(),
        "That sounds stressful.".to_string(),
    )
    .await;

    let sessions = db.list_sessions(user_id).await?;
    let titled = sessions.iter().find(|s| s.id == session.id).unwrap();
    assert_eq!(titled.title, persistence::derive_session_title(first_message));
    assert!(titled.title.ends_with("..."));

    // A second turn must not rename the session
    persistence::on_turn_complete(
        std::sync::Arc::new(db.clone()),
        session.id,
        user_id,
        "Another message that is much longer than the first one was".to_string(),
        "Tell me more.".to_string(),
    )
    .await;

    let sessions = db.list_sessions(user_id).await?;
    let after = sessions.iter().find(|s| s.id == session.id).unwrap();
    assert_eq!(after.title, titled.title);

    assert_eq!(db.count_user_messages(session.id).await?, 2);

    db.delete_session(user_id, session.id).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a configured database"]
async fn test_feedback_upsert_keeps_single_row() -> Result<()> {
    let db = setup_test_db().await?;
    let user_id = create_test_user(&db).await?;
    let session = db.create_session(user_id, "New Chat").await?;

    db.upsert_feedback(user_id, session.id, 2, "🙂").await?;
    db.upsert_feedback(user_id, session.id, 2, "🎉").await?;

    let messages = db.list_messages(user_id, session.id).await?;
    let feedback: Vec<_> = messages
        .iter()
        .filter(|m| m.sender == Sender::Feedback && m.feedback_for_message_index == Some(2))
        .collect();

    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].message, "🎉");

    db.delete_session(user_id, session.id).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a configured database"]
async fn test_mood_upsert_by_date() -> Result<()> {
    let db = setup_test_db().await?;
    let user_id = create_test_user(&db).await?;
    let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

    db.upsert_mood(user_id, date, MoodType::Sad, None).await?;
    let updated = db
        .upsert_mood(user_id, date, MoodType::Happy, Some("turned around"))
        .await?;

    assert_eq!(updated.mood, MoodType::Happy);
    assert_eq!(updated.note.as_deref(), Some("turned around"));

    let moods = db.list_moods(user_id, Some(date), Some(date)).await?;
    assert_eq!(moods.len(), 1);

    db.delete_mood(user_id, updated.id).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a configured database"]
async fn test_session_delete_removes_messages() -> Result<()> {
    let db = setup_test_db().await?;
    let user_id = create_test_user(&db).await?;
    let session = db.create_session(user_id, "New Chat").await?;

    db.insert_message(user_id, session.id, "hello", Sender::User)
        .await?;
    db.insert_message(user_id, session.id, "hi!", Sender::Bot)
        .await?;

    assert!(db.delete_session(user_id, session.id).await?);
    let messages = db.list_messages(user_id, session.id).await?;
    assert!(messages.is_empty());

    Ok(())
}
