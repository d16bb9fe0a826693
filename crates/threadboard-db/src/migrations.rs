use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE CHECK (username <> ''),
            password    TEXT NOT NULL,
            created     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        );

        -- parent_id has no foreign key: deleting a post leaves
        -- its replies in place.
        CREATE TABLE IF NOT EXISTS posts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            parent_id   INTEGER,
            created     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            title       TEXT,
            content     TEXT NOT NULL CHECK (content <> ''),
            userid      INTEGER NOT NULL REFERENCES users(id)
        );

        CREATE INDEX IF NOT EXISTS idx_posts_parent
            ON posts(parent_id);

        CREATE INDEX IF NOT EXISTS idx_posts_created
            ON posts(created);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
