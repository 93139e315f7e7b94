//! Fluxo de cancelamento de NFC-e autorizada: monta, assina e envia o evento
//! de cancelamento (tpEvento 110111) e interpreta o cStat de resposta.
//!
//! Grounded no mesmo par `AssinadorXml::assinar_evento`/`SefazClient` usado
//! pela emissão (C5/C1), com o envelope de evento montado no mesmo estilo
//! `format!` usado em `sefaz::webservice` para o envelope de autorização.

use chrono::Utc;
use uuid::Uuid;

use crate::certificado::AssinadorXml;
use crate::certificado::assinatura::validar_xsd;
use crate::db::RequestStatus;
use crate::error::OrchestratorError;
use crate::sefaz::{AmbienteNfe, Rota, SefazClient};

use super::pipeline::{IssuerProfile, Orchestrator};

const JUSTIFICATIVA_MIN: usize = 15;
const JUSTIFICATIVA_MAX: usize = 255;
const TP_EVENTO_CANCELAMENTO: &str = "110111";
const CSTAT_EVENTO_HOMOLOGADO: u16 = 135;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    Canceled,
    Denied,
    LostRace,
}

pub fn validar_justificativa(texto: &str) -> Result<(), OrchestratorError> {
    let tamanho = texto.chars().count();
    if !(JUSTIFICATIVA_MIN..=JUSTIFICATIVA_MAX).contains(&tamanho) {
        return Err(OrchestratorError::InvalidInput(format!(
            "justificativa deve ter entre {JUSTIFICATIVA_MIN} e {JUSTIFICATIVA_MAX} caracteres, recebeu {tamanho}"
        )));
    }
    Ok(())
}

impl Orchestrator {
    /// Cancela uma NFC-e já autorizada. A transição `authorized -> processing`
    /// serve de trava: se outro worker já estiver processando este
    /// cancelamento (ou qualquer outra transição), a CAS falha e devolvemos
    /// [`CancelOutcome::LostRace`] sem efeito colateral.
    pub async fn process_cancellation(
        &self,
        request_id: Uuid,
        issuer: &IssuerProfile,
        justificativa: &str,
    ) -> Result<CancelOutcome, OrchestratorError> {
        validar_justificativa(justificativa)?;

        let Some(row) = self
            .db
            .cas_status(request_id, RequestStatus::Authorized, RequestStatus::Processing)
            .await?
        else {
            return Ok(CancelOutcome::LostRace);
        };

        let access_key = row
            .access_key
            .clone()
            .ok_or_else(|| OrchestratorError::InvalidInput("requisição autorizada sem chave de acesso".into()))?;
        let protocolo = row.protocol.clone().unwrap_or_default();

        let c_uf: u8 = access_key[0..2].parse().unwrap_or(0);
        let uf = nfce_core::estados::por_codigo(c_uf)?;

        let input: crate::orchestrator::pipeline::EmitInput = serde_json::from_value(row.payload.clone())
            .map_err(|e| OrchestratorError::InvalidInput(e.to_string()))?;
        let ambiente_nfe = match input.environment {
            crate::orchestrator::pipeline::Ambiente::Producao => AmbienteNfe::Producao,
            crate::orchestrator::pipeline::Ambiente::Homologacao => AmbienteNfe::Homologacao,
        };

        let evento_xml = montar_evento_cancelamento(&access_key, &issuer.cnpj, &protocolo, justificativa, ambiente_nfe, c_uf);

        let assinador = AssinadorXml::new(issuer.certificado.clone());
        let evento_assinado = assinador
            .assinar_evento(&evento_xml)
            .map_err(|e| OrchestratorError::SignFailed(e.to_string()))?;

        let schema_path = format!("{}/evento_cancelamento_v1.00.xsd", self.config.schema_dir.trim_end_matches('/'));
        validar_xsd(&evento_assinado, &schema_path).map_err(|e| OrchestratorError::InvalidInput(e.to_string()))?;

        let client = SefazClient::new(issuer.certificado.clone(), ambiente_nfe, self.config.sefaz_timeout)
            .map_err(|e| OrchestratorError::SefazTransient(e.to_string()))?;

        let resultado = match client.enviar_evento_assinado(&evento_assinado, c_uf, Rota::Estado(uf.sigla)).await {
            Ok(r) => r,
            Err(e) => {
                // Uma falha de transporte no cancelamento não deve deixar a nota
                // presa em `processing`: volta para `authorized` e o chamador decide
                // se tenta de novo.
                self.db
                    .cas_status(request_id, RequestStatus::Processing, RequestStatus::Authorized)
                    .await?;
                return Err(OrchestratorError::SefazTransient(e.to_string()));
            }
        };

        if resultado.cstat == CSTAT_EVENTO_HOMOLOGADO {
            self.db
                .cas_status(request_id, RequestStatus::Processing, RequestStatus::Canceled)
                .await?;
            self.db
                .append_event(
                    request_id,
                    Some(RequestStatus::Processing),
                    RequestStatus::Canceled,
                    Some(resultado.cstat as i32),
                    Some(&resultado.motivo),
                    serde_json::json!({ "justificativa": justificativa }),
                )
                .await?;
            Ok(CancelOutcome::Canceled)
        } else {
            self.db
                .cas_status(request_id, RequestStatus::Processing, RequestStatus::Authorized)
                .await?;
            self.db
                .append_event(
                    request_id,
                    Some(RequestStatus::Processing),
                    RequestStatus::Authorized,
                    Some(resultado.cstat as i32),
                    Some(&resultado.motivo),
                    serde_json::json!({ "justificativa": justificativa, "cancelamento_negado": true }),
                )
                .await?;
            Ok(CancelOutcome::Denied)
        }
    }
}

fn montar_evento_cancelamento(
    access_key: &str,
    cnpj: &str,
    protocolo: &str,
    justificativa: &str,
    ambiente: AmbienteNfe,
    c_uf: u8,
) -> String {
    let tp_amb = match ambiente {
        AmbienteNfe::Producao => 1,
        AmbienteNfe::Homologacao => 2,
    };
    let dh_evento = Utc::now().to_rfc3339();
    let id = format!("ID{TP_EVENTO_CANCELAMENTO}{access_key}01");
    let justificativa_escapada = escapar_texto_xml(justificativa);

    format!(
        concat!(
            r#"<evento versao="1.00" xmlns="http://www.portalfiscal.inf.br/nfe">"#,
            r#"<infEvento Id="{id}">"#,
            r#"<cOrgao>{c_uf}</cOrgao>"#,
            r#"<tpAmb>{tp_amb}</tpAmb>"#,
            r#"<CNPJ>{cnpj}</CNPJ>"#,
            r#"<chNFe>{access_key}</chNFe>"#,
            r#"<dhEvento>{dh_evento}</dhEvento>"#,
            r#"<tpEvento>{tp_evento}</tpEvento>"#,
            r#"<nSeqEvento>1</nSeqEvento>"#,
            r#"<verEvento>1.00</verEvento>"#,
            r#"<detEvento versao="1.00">"#,
            r#"<descEvento>Cancelamento</descEvento>"#,
            r#"<nProt>{protocolo}</nProt>"#,
            r#"<xJust>{justificativa}</xJust>"#,
            r#"</detEvento>"#,
            r#"</infEvento>"#,
            r#"</evento>"#,
        ),
        id = id,
        c_uf = c_uf,
        tp_amb = tp_amb,
        cnpj = cnpj,
        access_key = access_key,
        dh_evento = dh_evento,
        tp_evento = TP_EVENTO_CANCELAMENTO,
        protocolo = protocolo,
        justificativa = justificativa_escapada,
    )
}

/// Escapa os cinco caracteres especiais de XML 1.0, na ordem que evita
/// escapar `&` introduzido pelas próprias entidades já emitidas.
fn escapar_texto_xml(texto: &str) -> String {
    texto
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn justificativa_curta_e_rejeitada() {
        assert!(validar_justificativa("muito curta").is_err());
    }

    #[test]
    fn justificativa_longa_e_rejeitada() {
        let texto = "x".repeat(256);
        assert!(validar_justificativa(&texto).is_err());
    }

    #[test]
    fn justificativa_no_limite_e_aceita() {
        let texto = "Erro de digitacao do valor total do item 3";
        assert!(texto.chars().count() >= JUSTIFICATIVA_MIN);
        assert!(validar_justificativa(texto).is_ok());
    }

    #[test]
    fn evento_carrega_chave_e_protocolo() {
        let xml = montar_evento_cancelamento(
            "35260112345678000190650010000000011234567890",
            "12345678000190",
            "135260000001234",
            "Erro de digitacao do valor total do pedido original",
            AmbienteNfe::Homologacao,
            35,
        );
        assert!(xml.contains("<chNFe>35260112345678000190650010000000011234567890</chNFe>"));
        assert!(xml.contains("<nProt>135260000001234</nProt>"));
        assert!(xml.contains("<tpEvento>110111</tpEvento>"));
    }

    #[test]
    fn justificativa_com_caracteres_especiais_e_escapada() {
        let justificativa = "Erro no pedido</xJust><det>injetado</det><xJust> & valor <errado>";
        let xml = montar_evento_cancelamento(
            "35260112345678000190650010000000011234567890",
            "12345678000190",
            "135260000001234",
            justificativa,
            AmbienteNfe::Homologacao,
            35,
        );

        assert!(!xml.contains("<det>injetado</det>"));
        assert!(xml.contains("&amp;"));
        assert!(xml.contains("&lt;errado&gt;"));
        // exatamente uma abertura e um fechamento de <xJust>, nunca um par extra injetado
        assert_eq!(xml.matches("<xJust>").count(), 1);
        assert_eq!(xml.matches("</xJust>").count(), 1);
    }
}
