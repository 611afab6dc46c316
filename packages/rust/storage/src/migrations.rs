//! SQL migration definitions for the kbload database.
//!
//! Migrations are applied in order on database open. Each migration has a
//! version number and a batch of SQL statements.

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial schema: kb, kb_mappings",
        sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Knowledge base metadata
CREATE TABLE IF NOT EXISTS kb (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- Key/value mappings; duplicate keys are allowed
CREATE TABLE IF NOT EXISTS kb_mappings (
    id         TEXT PRIMARY KEY,
    kb_id      TEXT NOT NULL REFERENCES kb(id) ON DELETE CASCADE,
    m_key      TEXT NOT NULL,
    m_value    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_kb_mappings_kb_id ON kb_mappings(kb_id);
CREATE INDEX IF NOT EXISTS idx_kb_mappings_key ON kb_mappings(kb_id, m_key);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
    }]
}
