//! Módulo de PDF para geração de DANFE
//!
//! - Geração de DANFE profissional

mod danfe;

pub use danfe::*;
