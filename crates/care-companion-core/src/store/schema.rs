//! SQLite schema definition.

/// Schema for the on-device key-value table.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Key-Value Records
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                         -- JSON document
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
