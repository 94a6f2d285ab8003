//! SQLite schema definition.

/// Database schema for the local client store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Key-value settings (search history, UI flags)
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                         -- opaque, usually JSON
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
