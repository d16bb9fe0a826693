use crate::Database;
use crate::models::{PostRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, Row};

const POST_COLUMNS: &str = "posts.id, posts.parent_id, posts.created, posts.title, posts.content, posts.userid, users.username";

impl Database {
    // -- Users --

    /// Duplicate usernames surface as the UNIQUE constraint error.
    pub fn insert_user(&self, username: &str, password: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                (username, password),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // -- Posts --

    pub fn get_post(&self, id: i64) -> Result<Option<PostRow>> {
        self.with_conn(|conn| query_post(conn, id))
    }

    /// Direct replies to `parent_id`, in storage order.
    pub fn get_replies(&self, parent_id: i64) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| query_replies(conn, parent_id))
    }

    /// Posts without a parent, newest first.
    pub fn get_top_level_posts(&self) -> Result<Vec<PostRow>> {
        self.with_conn(query_top_level_posts)
    }

    /// Inserts a top-level post, or a reply when `parent_id` is set.
    pub fn insert_post(
        &self,
        title: Option<&str>,
        content: &str,
        userid: i64,
        parent_id: Option<i64>,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (title, content, userid, parent_id) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![title, content, userid, parent_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// No ownership check here; callers decide who may edit.
    pub fn update_post(&self, id: i64, title: &str, content: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE posts SET title = ?1, content = ?2 WHERE id = ?3",
                rusqlite::params![title, content, id],
            )?;
            Ok(())
        })
    }

    /// Replies to the deleted post are left in place.
    pub fn delete_post(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(())
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_post(conn: &Connection, id: i64) -> Result<Option<PostRow>> {
    let sql = format!(
        "SELECT {POST_COLUMNS}
         FROM posts
         JOIN users ON posts.userid = users.id
         WHERE posts.id = ?1"
    );

    let row = conn.query_row(&sql, [id], post_from_row).optional()?;
    Ok(row)
}

fn query_replies(conn: &Connection, parent_id: i64) -> Result<Vec<PostRow>> {
    let sql = format!(
        "SELECT {POST_COLUMNS}
         FROM posts
         JOIN users ON posts.userid = users.id
         WHERE posts.parent_id = ?1"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([parent_id], post_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_top_level_posts(conn: &Connection) -> Result<Vec<PostRow>> {
    // id breaks ties between posts created within the same millisecond
    let sql = format!(
        "SELECT {POST_COLUMNS}
         FROM posts
         JOIN users ON posts.userid = users.id
         WHERE posts.parent_id IS NULL
         ORDER BY posts.created DESC, posts.id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], post_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        parent_id: row.get(1)?,
        created: row.get(2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        userid: row.get(5)?,
        username: row.get(6)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_user(name: &str) -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_user(name, "secret").unwrap();
        (db, id)
    }

    #[test]
    fn index_lists_newest_first() {
        let (db, uid) = db_with_user("alice");
        db.insert_post(Some("A"), "first", uid, None).unwrap();
        db.insert_post(Some("B"), "second", uid, None).unwrap();

        let titles: Vec<_> = db
            .get_top_level_posts()
            .unwrap()
            .into_iter()
            .map(|p| p.title.unwrap())
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn replies_stay_out_of_index() {
        let (db, uid) = db_with_user("alice");
        let parent = db.insert_post(Some("Topic"), "body", uid, None).unwrap();
        let reply = db.insert_post(None, "a reply", uid, Some(parent)).unwrap();

        let index = db.get_top_level_posts().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].id, parent);

        let replies = db.get_replies(parent).unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].id, reply);
        assert_eq!(replies[0].parent_id, Some(parent));
        assert_eq!(replies[0].title, None);
        assert_eq!(replies[0].username, "alice");
    }

    #[test]
    fn get_post_joins_author() {
        let (db, uid) = db_with_user("alice");
        let id = db.insert_post(Some("Hello"), "world", uid, None).unwrap();

        let post = db.get_post(id).unwrap().unwrap();
        assert_eq!(post.title.as_deref(), Some("Hello"));
        assert_eq!(post.content, "world");
        assert_eq!(post.userid, uid);
        assert_eq!(post.username, "alice");
        assert!(post.is_authored_by(uid));
        assert_eq!(post.parent_id, None);
    }

    #[test]
    fn missing_post_is_none() {
        let (db, _) = db_with_user("alice");
        assert!(db.get_post(42).unwrap().is_none());
        assert!(db.get_replies(42).unwrap().is_empty());
    }

    #[test]
    fn update_changes_title_and_content() {
        let (db, uid) = db_with_user("alice");
        let id = db.insert_post(Some("Old"), "old body", uid, None).unwrap();
        db.update_post(id, "New", "new body").unwrap();

        let post = db.get_post(id).unwrap().unwrap();
        assert_eq!(post.title.as_deref(), Some("New"));
        assert_eq!(post.content, "new body");
    }

    #[test]
    fn delete_leaves_replies_orphaned() {
        let (db, uid) = db_with_user("alice");
        let parent = db.insert_post(Some("Topic"), "body", uid, None).unwrap();
        db.insert_post(None, "reply", uid, Some(parent)).unwrap();

        db.delete_post(parent).unwrap();

        assert!(db.get_post(parent).unwrap().is_none());
        let orphans = db.get_replies(parent).unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].parent_id, Some(parent));
    }

    #[test]
    fn duplicate_username_is_an_error() {
        let (db, _) = db_with_user("alice");
        assert!(db.insert_user("alice", "other").is_err());
    }

    #[test]
    fn user_lookup_by_username() {
        let (db, uid) = db_with_user("alice");
        let user = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(user.id, uid);
        assert_eq!(user.username, "alice");
        assert_eq!(user.password, "secret");
        assert!(db.get_user_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn post_requires_existing_author() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.insert_post(Some("t"), "c", 99, None).is_err());
    }
}
