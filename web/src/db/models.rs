//! Modelos de persistência do orquestrador (C6) — `nfce_requests`,
//! `nfce_events`, `nfce_sequences`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado de uma `Request`, um dos sete estados do ciclo de vida da emissão.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Processing,
    Authorized,
    Rejected,
    Retrying,
    Contingency,
    Canceled,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Authorized | RequestStatus::Rejected | RequestStatus::Canceled)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Processing => "processing",
            RequestStatus::Authorized => "authorized",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Retrying => "retrying",
            RequestStatus::Contingency => "contingency",
            RequestStatus::Canceled => "canceled",
        };
        write!(f, "{}", s)
    }
}

/// Linha de `nfce_requests`: a unidade de trabalho do pipeline de emissão.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RequestRow {
    pub id: uuid::Uuid,
    pub idempotency_key: String,
    pub company_id: uuid::Uuid,
    pub payload: serde_json::Value,
    pub status: RequestStatus,
    pub access_key: Option<String>,
    pub protocol: Option<String>,
    pub number: Option<i64>,
    pub series: Option<i32>,
    pub reject_code: Option<String>,
    pub reject_reason: Option<String>,
    pub sefaz_status: Option<i32>,
    pub sefaz_message: Option<String>,
    pub retry_count: i32,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub contingency: bool,
    pub contingency_type: Option<String>,
    pub xml_url: Option<String>,
    pub pdf_url: Option<String>,
    pub qr_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub authorized_at: Option<DateTime<Utc>>,
}

/// Linha append-only de `nfce_events`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRow {
    pub id: uuid::Uuid,
    pub request_id: uuid::Uuid,
    pub status_from: Option<RequestStatus>,
    pub status_to: RequestStatus,
    pub sefaz_status: Option<i32>,
    pub message: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS nfce_requests (
    id UUID PRIMARY KEY,
    idempotency_key TEXT UNIQUE NOT NULL,
    company_id UUID NOT NULL,
    payload JSONB NOT NULL,
    status TEXT NOT NULL,
    access_key VARCHAR(44),
    protocol VARCHAR(32),
    number BIGINT,
    series INTEGER,
    reject_code TEXT,
    reject_reason TEXT,
    sefaz_status INTEGER,
    sefaz_message TEXT,
    retry_count INTEGER NOT NULL DEFAULT 0,
    next_retry_at TIMESTAMPTZ,
    contingency BOOLEAN NOT NULL DEFAULT FALSE,
    contingency_type TEXT,
    xml_url TEXT,
    pdf_url TEXT,
    qr_url TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    processed_at TIMESTAMPTZ,
    authorized_at TIMESTAMPTZ
);

CREATE INDEX IF NOT EXISTS idx_nfce_requests_status ON nfce_requests(status);
CREATE INDEX IF NOT EXISTS idx_nfce_requests_company ON nfce_requests(company_id);
CREATE INDEX IF NOT EXISTS idx_nfce_requests_next_retry ON nfce_requests(next_retry_at) WHERE status = 'retrying';

CREATE TABLE IF NOT EXISTS nfce_events (
    id UUID PRIMARY KEY,
    request_id UUID NOT NULL REFERENCES nfce_requests(id),
    status_from TEXT,
    status_to TEXT NOT NULL,
    sefaz_status INTEGER,
    message TEXT,
    metadata JSONB NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS idx_nfce_events_request ON nfce_events(request_id, created_at);

CREATE TABLE IF NOT EXISTS nfce_sequences (
    company_id UUID NOT NULL,
    series INTEGER NOT NULL,
    next_number BIGINT NOT NULL DEFAULT 1,
    PRIMARY KEY (company_id, series)
);
"#;

/// Insere a requisição em `pending`. Conflito em `idempotency_key` é
/// resolvido pelo chamador antes de chegar aqui — esta query falha
/// com violação de unicidade se a checagem de idempotência foi pulada.
pub const INSERT_REQUEST: &str = r#"
INSERT INTO nfce_requests (id, idempotency_key, company_id, payload, status, retry_count, contingency, created_at, updated_at)
VALUES ($1, $2, $3, $4, 'pending', 0, FALSE, now(), now())
RETURNING *
"#;

pub const FIND_BY_IDEMPOTENCY_KEY: &str = "SELECT * FROM nfce_requests WHERE idempotency_key = $1";

pub const FIND_BY_ID: &str = "SELECT * FROM nfce_requests WHERE id = $1";

/// Transição de estado via compare-and-swap em `(id, from_status)` — a
/// única forma de mutar `status`.
pub const CAS_STATUS: &str = r#"
UPDATE nfce_requests
SET status = $3, updated_at = now()
WHERE id = $1 AND status = $2
RETURNING *
"#;

pub const APPEND_EVENT: &str = r#"
INSERT INTO nfce_events (id, request_id, status_from, status_to, sefaz_status, message, metadata, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, now())
"#;

pub const LIST_EVENTS: &str = "SELECT * FROM nfce_events WHERE request_id = $1 ORDER BY created_at ASC";

/// Alocação atômica de `(series, number)` em um único round-trip — nunca
/// ler-então-escrever a partir do código da aplicação.
pub const ALLOCATE_SEQUENCE: &str = r#"
INSERT INTO nfce_sequences (company_id, series, next_number)
VALUES ($1, $2, 2)
ON CONFLICT (company_id, series) DO UPDATE
    SET next_number = nfce_sequences.next_number + 1
RETURNING next_number - 1
"#;
