use crate::core::db::Database;
use crate::core::error::StoreError;
use crate::models::user::User;
use rusqlite::{ErrorCode, OptionalExtension, Row};

/// Account table backed by SQLite
#[derive(Clone)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register a new account
    pub fn create(&self, username: &str, password: &str) -> Result<User, StoreError> {
        let conn = self.db.connection();
        let conn = conn.lock();

        conn.execute(
            "INSERT INTO users (username, password, rfid_uid) VALUES (?1, ?2, NULL)",
            rusqlite::params![username, password],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateUsername
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(User::new(
            conn.last_insert_rowid(),
            username.to_string(),
            password.to_string(),
            None,
        ))
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_one(
            "SELECT id, username, password, rfid_uid FROM users WHERE username = ?1",
            username,
        )
    }

    pub fn find_by_rfid(&self, rfid_uid: &str) -> Result<Option<User>, StoreError> {
        self.find_one(
            "SELECT id, username, password, rfid_uid FROM users WHERE rfid_uid = ?1",
            rfid_uid,
        )
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let conn = self.db.connection();
        let conn = conn.lock();

        let user = conn
            .query_row(
                "SELECT id, username, password, rfid_uid FROM users WHERE id = ?1",
                rusqlite::params![id],
                user_from_row,
            )
            .optional()?;

        Ok(user)
    }

    /// Bind an RFID card to `user`.
    /// Fails without touching either record when another account owns the card.
    pub fn set_rfid(&self, user: &User, rfid_uid: &str) -> Result<(), StoreError> {
        if let Some(owner) = self.find_by_rfid(rfid_uid)? {
            if owner.id != user.id {
                return Err(StoreError::DuplicateRfid);
            }
            return Ok(());
        }

        let conn = self.db.connection();
        let conn = conn.lock();

        conn.execute(
            "UPDATE users SET rfid_uid = ?1 WHERE id = ?2",
            rusqlite::params![rfid_uid, user.id],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateRfid
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(())
    }

    fn find_one(&self, sql: &str, value: &str) -> Result<Option<User>, StoreError> {
        let conn = self.db.connection();
        let conn = conn.lock();

        let user = conn
            .query_row(sql, rusqlite::params![value], user_from_row)
            .optional()?;

        Ok(user)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User::new(row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}
