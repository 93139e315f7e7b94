//! # nfce-service
//!
//! Serviço de emissão assíncrona de NFC-e (modelo 65): monta o XML, assina
//! com certificado A1, valida contra os XSDs oficiais, transmite à SEFAZ por
//! SOAP e orquestra o ciclo de vida da requisição (retry, contingência,
//! cancelamento) de forma idempotente.
//!
//! ## Módulos
//!
//! - [`config`]: configuração do processo via variáveis de ambiente
//! - [`certificado`]: certificado digital A1 e assinatura XMLDSig
//! - [`sefaz`]: tabela de endpoints por UF, classificação de cStat, transporte SOAP
//! - [`db`]: persistência das requisições/eventos em Postgres
//! - [`queue`]: filas AMQP de emissão e cancelamento
//! - [`storage`]: upload de artefatos (XML/PDF/QR) a um object store S3-compatível
//! - [`orchestrator`]: máquina de estados que liga todas as peças acima
//! - [`pdf`]: geração do DANFE
//! - [`api`]: rotas HTTP de intake
//! - [`error`]: tipos de erro tipados por camada

#![doc(html_root_url = "https://docs.rs/nfce-service/0.3.0")]

pub mod api;
pub mod certificado;
pub mod config;
pub mod db;
pub mod error;
pub mod orchestrator;
pub mod pdf;
pub mod queue;
pub mod sefaz;
pub mod storage;

pub use certificado::{AssinadorXml, CertificadoA1, CertificadoInfo};
pub use config::Config;
pub use orchestrator::{EmitInput, IssuerProfile, Orchestrator};
pub use sefaz::{gerar_url_consulta_portal, validar_chave_acesso, ChaveAcessoInfo, ResultadoConsulta};
