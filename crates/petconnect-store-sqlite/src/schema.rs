//! SQL schema for the PetConnect SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    role        TEXT NOT NULL DEFAULT 'adopter',  -- 'adopter' | 'owner' | 'admin'
    created_at  TEXT NOT NULL
);

-- Adoption state lives on the pet row itself. Every lifecycle transition is
-- a single conditional UPDATE keyed on the current status; no separate
-- request table exists.
CREATE TABLE IF NOT EXISTS pets (
    pet_id       TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    category     TEXT NOT NULL,
    owner_email  TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'not_adopted',  -- 'not_adopted' | 'requested' | 'adopted'
    requester    TEXT,            -- JSON RequesterDetails; set iff requested/adopted
    age          TEXT,
    location     TEXT,
    description  TEXT,
    image_url    TEXT,
    created_at   TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    requested_at TEXT,
    adopted_at   TEXT
);

CREATE TABLE IF NOT EXISTS campaigns (
    campaign_id         TEXT PRIMARY KEY,
    title               TEXT NOT NULL,
    description         TEXT,
    organizer_email     TEXT NOT NULL,
    max_donation_amount TEXT NOT NULL,                 -- exact decimal string
    donated_amount      TEXT NOT NULL DEFAULT '0',     -- ledger sum, updated in the donation tx
    status              TEXT NOT NULL DEFAULT 'active', -- 'active' | 'paused' | 'completed'
    donors              TEXT NOT NULL DEFAULT '[]',    -- JSON array, append-only
    created_at          TEXT NOT NULL
);

-- The donation ledger is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table, and rows survive
-- campaign deletion, so campaign_id is deliberately not a foreign key.
CREATE TABLE IF NOT EXISTS donations (
    donation_id  TEXT PRIMARY KEY,
    donor_email  TEXT NOT NULL,
    amount       TEXT NOT NULL,   -- exact decimal string
    campaign_id  TEXT NOT NULL,
    external_ref TEXT,
    donated_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS pets_owner_idx          ON pets(owner_email);
CREATE INDEX IF NOT EXISTS pets_status_idx         ON pets(status);
CREATE INDEX IF NOT EXISTS pets_category_idx       ON pets(category);
CREATE INDEX IF NOT EXISTS campaigns_organizer_idx ON campaigns(organizer_email);
CREATE INDEX IF NOT EXISTS donations_campaign_idx  ON donations(campaign_id);
CREATE INDEX IF NOT EXISTS donations_donor_idx     ON donations(donor_email);

PRAGMA user_version = 1;
";
