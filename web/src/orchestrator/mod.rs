//! Orquestrador de emissão e cancelamento de NFC-e.
//!
//! Três submódulos: `pipeline` (construir/assinar/validar/enviar/persistir),
//! `retry` (política de backoff) e `cancel` (evento de cancelamento).

pub mod cancel;
pub mod pipeline;
pub mod retry;

pub use cancel::{validar_justificativa, CancelOutcome};
pub use pipeline::{Ambiente, EmitInput, EmitItem, EmitOptions, EmitOutcome, EmitPayment, IssuerProfile, Orchestrator};
