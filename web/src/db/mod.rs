//! Módulo de banco de dados
//!
//! Persistência Postgres do orquestrador: `nfce_requests`, `nfce_events`,
//! `nfce_sequences` (C6).

pub mod models;
pub mod postgres;

pub use models::*;
pub use postgres::PostgresClient;
