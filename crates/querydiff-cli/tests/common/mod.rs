#![allow(dead_code)]

use querydiff_cli::SqliteSource;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// In-memory database with `users_a` and `users_b` tables and a `typed`
/// table covering every storage class.
pub async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");

    for sql in [
        "CREATE TABLE users_a (id INTEGER PRIMARY KEY, name TEXT)",
        "CREATE TABLE users_b (user_id INTEGER PRIMARY KEY, name TEXT)",
        "INSERT INTO users_a (id, name) VALUES (1, 'A'), (2, 'B')",
        "INSERT INTO users_b (user_id, name) VALUES (1, 'A'), (2, 'C'), (3, 'D')",
        "CREATE TABLE typed (
            i INTEGER, r REAL, t TEXT, b BLOB, flag BOOLEAN, at DATETIME, n TEXT
        )",
        "INSERT INTO typed VALUES
            (42, 1.5, 'hello', x'00ff', 1, '2024-01-02 03:04:05', NULL)",
    ] {
        sqlx::query(sql)
            .execute(&pool)
            .await
            .unwrap_or_else(|e| panic!("Failed to run fixture SQL: {e}"));
    }

    pool
}

pub async fn source() -> SqliteSource {
    SqliteSource::new(pool().await)
}
