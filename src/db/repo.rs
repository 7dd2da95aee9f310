use sqlx::SqlitePool;

use crate::db::models::{User, UserProfile};

pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT UNIQUE NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            profile_type TEXT NOT NULL,
            preferences TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (user_id, profile_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn username_or_email_taken(
    pool: &SqlitePool,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let hit: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM users WHERE username = ? OR email = ? LIMIT 1")
            .bind(username)
            .bind(email)
            .fetch_optional(pool)
            .await?;

    Ok(hit.is_some())
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, first_name, last_name FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn get_user_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, first_name, last_name FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_user(pool: &SqlitePool, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, first_name, last_name)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_profile(
    pool: &SqlitePool,
    user_id: &str,
    profile_type: &str,
) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        "SELECT user_id, profile_type, preferences FROM user_profiles WHERE user_id = ? AND profile_type = ?",
    )
    .bind(user_id)
    .bind(profile_type)
    .fetch_optional(pool)
    .await
}

pub async fn insert_profile(
    pool: &SqlitePool,
    user_id: &str,
    profile_type: &str,
    preferences: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO user_profiles (user_id, profile_type, preferences) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(profile_type)
    .bind(preferences)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_profile_preferences(
    pool: &SqlitePool,
    user_id: &str,
    profile_type: &str,
    preferences: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE user_profiles
        SET preferences = ?, updated_at = CURRENT_TIMESTAMP
        WHERE user_id = ? AND profile_type = ?
        "#,
    )
    .bind(preferences)
    .bind(user_id)
    .bind(profile_type)
    .execute(pool)
    .await?;

    Ok(())
}

/// Round-trips to the database and returns its clock.
pub async fn database_time(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    let (now,): (String,) = sqlx::query_as("SELECT CURRENT_TIMESTAMP")
        .fetch_one(pool)
        .await?;

    Ok(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect;
    use crate::db::models::USER_PROFILE;

    fn sample_user(id: &str, username: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn test_user_lookup_by_name_and_id() {
        let pool = connect("sqlite::memory:").await.unwrap();
        insert_user(&pool, &sample_user("u1", "ada", "ada@example.com"))
            .await
            .unwrap();

        let by_name = get_user_by_username(&pool, "ada").await.unwrap().unwrap();
        assert_eq!(by_name.id, "u1");
        assert_eq!(by_name.last_name, "Lovelace");

        assert!(get_user_by_id(&pool, "u1").await.unwrap().is_some());
        assert!(get_user_by_id(&pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_taken_matches_username_or_email() {
        let pool = connect("sqlite::memory:").await.unwrap();
        insert_user(&pool, &sample_user("u1", "ada", "ada@example.com"))
            .await
            .unwrap();

        assert!(username_or_email_taken(&pool, "ada", "other@example.com").await.unwrap());
        assert!(username_or_email_taken(&pool, "other", "ada@example.com").await.unwrap());
        assert!(!username_or_email_taken(&pool, "bob", "bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_unique_constraints_reject_duplicates() {
        let pool = connect("sqlite::memory:").await.unwrap();
        insert_user(&pool, &sample_user("u1", "ada", "ada@example.com"))
            .await
            .unwrap();
        assert!(
            insert_user(&pool, &sample_user("u2", "ada", "x@example.com"))
                .await
                .is_err()
        );

        insert_profile(&pool, "u1", USER_PROFILE, "{}").await.unwrap();
        assert!(insert_profile(&pool, "u1", USER_PROFILE, "{}").await.is_err());
    }

    #[tokio::test]
    async fn test_profile_update_in_place() {
        let pool = connect("sqlite::memory:").await.unwrap();
        insert_user(&pool, &sample_user("u1", "ada", "ada@example.com"))
            .await
            .unwrap();
        insert_profile(&pool, "u1", USER_PROFILE, "{}").await.unwrap();
        update_profile_preferences(&pool, "u1", USER_PROFILE, r#"{"theme":"dark"}"#)
            .await
            .unwrap();

        let profile = get_profile(&pool, "u1", USER_PROFILE).await.unwrap().unwrap();
        assert_eq!(profile.preferences.as_deref(), Some(r#"{"theme":"dark"}"#));
    }

    #[tokio::test]
    async fn test_database_time_is_returned() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let now = database_time(&pool).await.unwrap();
        assert!(!now.is_empty());
    }
}
