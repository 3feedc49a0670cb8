use crate::core::db::Database;
use crate::core::error::StoreError;
use crate::models::user::Session;
use crate::utils::time::{current_timestamp, has_passed};
use rusqlite::OptionalExtension;
use tracing::debug;

/// Login sessions, persisted next to the user table so they survive a restart
#[derive(Clone)]
pub struct SessionStore {
    db: Database,
    ttl_secs: i64,
}

impl SessionStore {
    pub fn new(db: Database, ttl_secs: i64) -> Self {
        Self { db, ttl_secs }
    }

    /// Open a new session for `user_id` with a fresh random token.
    /// Sessions that have already expired are swept first, since their
    /// cookies are gone and nobody will present them again.
    pub fn create(&self, user_id: i64) -> Result<Session, StoreError> {
        let now = current_timestamp();
        let session = Session {
            token: hex::encode(rand::random::<[u8; 32]>()),
            user_id,
            created_at: now,
            expires_at: now.saturating_add(self.ttl_secs),
        };

        let conn = self.db.connection();
        let conn = conn.lock();

        let swept = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            rusqlite::params![now],
        )?;
        if swept > 0 {
            debug!(count = swept, "Removed expired sessions");
        }

        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                session.token,
                session.user_id,
                session.created_at,
                session.expires_at
            ],
        )?;

        Ok(session)
    }

    /// Look up a live session. Expired sessions are deleted on sight.
    pub fn get(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let conn = self.db.connection();
        let conn = conn.lock();

        let session = conn
            .query_row(
                "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?1",
                rusqlite::params![token],
                |row| {
                    Ok(Session {
                        token: row.get(0)?,
                        user_id: row.get(1)?,
                        created_at: row.get(2)?,
                        expires_at: row.get(3)?,
                    })
                },
            )
            .optional()?;

        match session {
            Some(s) if has_passed(s.expires_at, current_timestamp()) => {
                conn.execute(
                    "DELETE FROM sessions WHERE token = ?1",
                    rusqlite::params![token],
                )?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub fn delete(&self, token: &str) -> Result<(), StoreError> {
        let conn = self.db.connection();
        conn.lock().execute(
            "DELETE FROM sessions WHERE token = ?1",
            rusqlite::params![token],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::user_store::UserStore;

    fn setup(ttl_secs: i64) -> (SessionStore, i64) {
        let db = Database::open_in_memory().unwrap();
        let user = UserStore::new(db.clone()).create("alice", "x").unwrap();
        (SessionStore::new(db, ttl_secs), user.id)
    }

    #[test]
    fn test_create_and_get() {
        let (store, user_id) = setup(3600);
        let session = store.create(user_id).unwrap();

        assert_eq!(session.token.len(), 64);
        assert_eq!(session.expires_at - session.created_at, 3600);

        let found = store.get(&session.token).unwrap().unwrap();
        assert_eq!(found, session);
    }

    #[test]
    fn test_tokens_are_unique() {
        let (store, user_id) = setup(3600);
        let a = store.create(user_id).unwrap();
        let b = store.create(user_id).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_unknown_token() {
        let (store, _) = setup(3600);
        assert!(store.get("not-a-token").unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let (store, user_id) = setup(3600);
        let session = store.create(user_id).unwrap();

        store.delete(&session.token).unwrap();
        assert!(store.get(&session.token).unwrap().is_none());

        // Deleting twice is harmless
        assert!(store.delete(&session.token).is_ok());
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let (store, user_id) = setup(-1);
        let session = store.create(user_id).unwrap();

        assert!(store.get(&session.token).unwrap().is_none());
    }

    fn session_rows(store: &SessionStore) -> i64 {
        let conn = store.db.connection();
        let count = conn
            .lock()
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .unwrap();
        count
    }

    #[test]
    fn test_create_sweeps_expired_sessions() {
        let (store, user_id) = setup(3600);
        {
            let conn = store.db.connection();
            let conn = conn.lock();
            for i in 0..50 {
                conn.execute(
                    "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, 0, 1)",
                    rusqlite::params![format!("stale-{i}"), user_id],
                )
                .unwrap();
            }
        }
        assert_eq!(session_rows(&store), 50);

        let live = store.create(user_id).unwrap();

        assert_eq!(session_rows(&store), 1);
        assert!(store.get(&live.token).unwrap().is_some());
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let (store, user_id) = setup(i64::MAX);
        let session = store.create(user_id).unwrap();

        assert_eq!(session.expires_at, i64::MAX);
        assert!(store.get(&session.token).unwrap().is_some());
    }
}
