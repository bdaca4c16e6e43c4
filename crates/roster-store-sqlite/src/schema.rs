//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids strictly increasing; a deleted id is never reused.
CREATE TABLE IF NOT EXISTS persons (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    surname     TEXT    NOT NULL,
    patronymic  TEXT    NOT NULL DEFAULT '',
    age         INTEGER NOT NULL,
    gender      TEXT    NOT NULL,   -- 'male' | 'female'
    nationality TEXT    NOT NULL    -- two-letter country code
);

CREATE INDEX IF NOT EXISTS persons_gender_idx      ON persons(gender);
CREATE INDEX IF NOT EXISTS persons_age_idx         ON persons(age);
CREATE INDEX IF NOT EXISTS persons_nationality_idx ON persons(nationality);

PRAGMA user_version = 1;
";
