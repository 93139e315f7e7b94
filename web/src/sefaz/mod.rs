//! Transporte SOAP com a SEFAZ
//!
//! Seleção de endpoint por UF/ambiente/contingência, envelope SOAP 1.2 e
//! classificação da resposta (C5).

mod consulta;
pub mod endpoints;
mod webservice;

pub use consulta::*;
pub use endpoints::{autorizacao, svc_an, svc_rs, EndpointPar, UnsupportedState};
pub use webservice::*;
