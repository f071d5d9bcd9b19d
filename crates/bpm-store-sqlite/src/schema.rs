//! SQL schema for the master-data SQLite store.
//!
//! Executed once at connection startup. The UNIQUE constraints and the
//! contract trigger are the final guard behind the engine's own checks, for
//! writers that race between check and insert.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS bp_master (
    bp_id               INTEGER PRIMARY KEY AUTOINCREMENT,
    bp_code             TEXT NOT NULL UNIQUE,
    bp_name             TEXT NOT NULL,
    bp_type             TEXT NOT NULL,
    business_reg_no     TEXT UNIQUE,
    representative_name TEXT,
    address             TEXT,
    phone_number        TEXT,
    email               TEXT,
    primary_pf_code     TEXT,
    status              TEXT NOT NULL DEFAULT 'ACTIVE',
    erp_usage_fee       TEXT,             -- decimal text
    commission_rate     TEXT,             -- decimal text
    created_date        TEXT,             -- RFC 3339
    created_by          TEXT,
    updated_date        TEXT,
    updated_by          TEXT
);

CREATE TABLE IF NOT EXISTS pf_code_master (
    pf_id           INTEGER PRIMARY KEY AUTOINCREMENT,
    pf_code         TEXT NOT NULL UNIQUE,
    pf_name         TEXT NOT NULL,
    pf_description  TEXT,
    has_master_data TEXT NOT NULL DEFAULT 'N',   -- 'Y' | 'N'
    can_own_stores  TEXT NOT NULL DEFAULT 'N',
    can_franchise   TEXT NOT NULL DEFAULT 'N',
    billing_capable TEXT NOT NULL DEFAULT 'N',
    status          TEXT NOT NULL DEFAULT 'ACTIVE',
    created_date    TEXT,
    created_by      TEXT,
    updated_date    TEXT,
    updated_by      TEXT
);

CREATE TABLE IF NOT EXISTS bp_contract_info (
    contract_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    contract_code       TEXT NOT NULL UNIQUE,
    contractor_bp_id    INTEGER NOT NULL,
    contractee_bp_id    INTEGER NOT NULL,
    contract_type       TEXT NOT NULL,
    pf_id               INTEGER NOT NULL,
    contract_start_date TEXT NOT NULL,   -- YYYY-MM-DD
    contract_end_date   TEXT,            -- NULL = open-ended
    contract_terms      TEXT,
    fee_rate            TEXT,
    status              TEXT NOT NULL DEFAULT 'ACTIVE',
    created_date        TEXT,
    created_by          TEXT,
    updated_date        TEXT,
    updated_by          TEXT
);

-- No two ACTIVE contracts in one (contractor, contractee, platform) scope
-- may share a day.
CREATE TRIGGER IF NOT EXISTS bp_contract_info_no_overlap
BEFORE INSERT ON bp_contract_info
WHEN EXISTS (
    SELECT 1 FROM bp_contract_info c
    WHERE c.contractor_bp_id = NEW.contractor_bp_id
      AND c.contractee_bp_id = NEW.contractee_bp_id
      AND c.pf_id            = NEW.pf_id
      AND c.status           = 'ACTIVE'
      AND (NEW.contract_end_date IS NULL
           OR c.contract_start_date <= NEW.contract_end_date)
      AND (c.contract_end_date IS NULL
           OR c.contract_end_date >= NEW.contract_start_date)
)
BEGIN
    SELECT RAISE(ABORT, 'overlapping active contract in scope');
END;

CREATE TABLE IF NOT EXISTS bp_store_info (
    store_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    store_code   TEXT NOT NULL UNIQUE,
    bp_id        INTEGER NOT NULL,
    store_name   TEXT NOT NULL,
    store_type   TEXT,
    address      TEXT,
    phone_number TEXT,
    manager_name TEXT,
    opening_date TEXT,
    closing_date TEXT,
    status       TEXT NOT NULL DEFAULT 'ACTIVE',
    created_date TEXT,
    created_by   TEXT,
    updated_date TEXT,
    updated_by   TEXT,
    UNIQUE (bp_id, store_code)
);

CREATE TABLE IF NOT EXISTS bp_pf_mapping (
    mapping_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    bp_id          INTEGER NOT NULL,
    pf_id          INTEGER NOT NULL,
    target_bp_id   INTEGER,
    parent_bp_id   INTEGER,
    mapping_type   TEXT NOT NULL,
    effective_date TEXT NOT NULL,
    expiry_date    TEXT,
    status         TEXT NOT NULL DEFAULT 'ACTIVE',
    created_date   TEXT,
    created_by     TEXT,
    updated_date   TEXT,
    updated_by     TEXT
);

-- A missing target only collides with another missing target.
DROP INDEX IF EXISTS bp_pf_mapping_scope_uq;
CREATE UNIQUE INDEX IF NOT EXISTS bp_pf_mapping_targeted_uq
    ON bp_pf_mapping(bp_id, pf_id, target_bp_id, effective_date)
    WHERE target_bp_id IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS bp_pf_mapping_untargeted_uq
    ON bp_pf_mapping(bp_id, pf_id, effective_date)
    WHERE target_bp_id IS NULL;

CREATE TABLE IF NOT EXISTS bp_master_data_permission (
    permission_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_bp_id     INTEGER NOT NULL,
    user_bp_id      INTEGER NOT NULL,
    data_type       TEXT NOT NULL,
    permission_type TEXT NOT NULL,
    effective_date  TEXT NOT NULL,
    expiry_date     TEXT,
    status          TEXT NOT NULL DEFAULT 'ACTIVE',
    created_date    TEXT,
    created_by      TEXT,
    updated_date    TEXT,
    updated_by      TEXT,
    UNIQUE (owner_bp_id, user_bp_id, data_type, effective_date)
);

CREATE INDEX IF NOT EXISTS bp_contract_info_scope_idx
    ON bp_contract_info(contractor_bp_id, contractee_bp_id, pf_id);
CREATE INDEX IF NOT EXISTS bp_store_info_bp_idx ON bp_store_info(bp_id);
CREATE INDEX IF NOT EXISTS bp_pf_mapping_bp_idx ON bp_pf_mapping(bp_id);
";
