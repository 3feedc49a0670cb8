#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// Row id in the `users` table
    pub id: i64,
    pub username: String,
    /// Stored exactly as submitted at registration
    pub password: String,
    /// RFID card bound to this account, if any
    pub rfid_uid: Option<String>,
}

impl User {
    pub fn new(id: i64, username: String, password: String, rfid_uid: Option<String>) -> Self {
        Self {
            id,
            username,
            password,
            rfid_uid,
        }
    }
}

/// A logged-in browser session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Hex-encoded random token carried in the session cookie
    pub token: String,
    pub user_id: i64,
    pub created_at: i64,
    pub expires_at: i64,
}
