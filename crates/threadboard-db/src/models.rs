//! Database row types. These map directly to SQLite rows.
use chrono::NaiveDateTime;

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// A post joined with its author's username.
///
/// Top-level posts have no `parent_id`; replies have no `title`.
#[derive(Debug, Clone)]
pub struct PostRow {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub created: NaiveDateTime,
    pub title: Option<String>,
    pub content: String,
    pub userid: i64,
    pub username: String,
}

impl PostRow {
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.userid == user_id
    }

    /// Title for display; replies have none.
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}
