//! NFC-e - Nota Fiscal de Consumidor Eletrônica (Modelo 65)
//!
//! Estruturas e funções específicas para NFC-e: geração do payload do QR
//! Code e validações do modelo 65.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// Dados necessários para montar o QR Code de uma NFC-e autorizada,
/// conforme a Nota Técnica 2025.001.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrCodePayload {
    /// Chave de acesso (44 dígitos, sem prefixo "NFe").
    pub chave_acesso: String,
    /// Ambiente (1=Produção, 2=Homologação).
    pub tipo_ambiente: u8,
    /// CPF ou CNPJ do destinatário, quando identificado.
    pub destinatario_documento: Option<String>,
    /// Data/hora de emissão.
    pub data_emissao: DateTime<Utc>,
    /// Valor total da NFC-e.
    pub valor_total: f64,
    /// Valor total do ICMS.
    pub valor_icms: f64,
    /// Digest value da assinatura (base64, extraído do XML assinado).
    pub digest_value: String,
    /// Id do token CSC usado para o hash.
    pub id_token_csc: String,
    /// Código de Segurança do Contribuinte (segredo, nunca exposto fora do hash).
    pub csc: String,
}

impl QrCodePayload {
    /// Monta a string pipe-separada `chNFe|tpAmb|dest|dhEmi|vNF|vICMS|digVal|cIdToken`
    /// exigida pela NT 2025.001 como entrada do hash — nunca exposta como
    /// parte da URL, só usada para alimentar `SHA1(payload || csc)`.
    fn payload_para_hash(&self) -> String {
        let dest = self.destinatario_documento.clone().unwrap_or_default();
        [
            self.chave_acesso.clone(),
            self.tipo_ambiente.to_string(),
            dest,
            self.data_emissao.to_rfc3339(),
            format!("{:.2}", self.valor_total),
            format!("{:.2}", self.valor_icms),
            self.digest_value.clone(),
            self.id_token_csc.clone(),
        ]
        .join("|")
    }

    /// Monta a query string `chNFe=...&tpAmb=...&...` e anexa
    /// `cHashQRCode = SHA1(payload_pipe_separado || csc)` em hex maiúsculo.
    pub fn query_string(&self) -> String {
        let dest = self.destinatario_documento.clone().unwrap_or_default();
        let campos = [
            ("chNFe", self.chave_acesso.clone()),
            ("tpAmb", self.tipo_ambiente.to_string()),
            ("dest", dest),
            ("dhEmi", self.data_emissao.to_rfc3339()),
            ("vNF", format!("{:.2}", self.valor_total)),
            ("vICMS", format!("{:.2}", self.valor_icms)),
            ("digVal", self.digest_value.clone()),
            ("cIdToken", self.id_token_csc.clone()),
        ];

        let query = campos
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha1::new();
        hasher.update(self.payload_para_hash().as_bytes());
        hasher.update(self.csc.as_bytes());
        let hash_hex = hex::encode(hasher.finalize()).to_uppercase();

        format!("{}&cHashQRCode={}", query, hash_hex)
    }

    /// Monta a URL completa do QR Code a partir da URL base do portal de
    /// consulta pública (dado de configuração por UF, não embutido aqui).
    pub fn gerar_url(&self, base_url: &str) -> String {
        format!("{}?{}", base_url, self.query_string())
    }
}

/// Validações específicas do modelo 65 (NFC-e).
#[derive(Debug)]
pub struct ValidadorNfce;

impl ValidadorNfce {
    /// Valida se a NFC-e atende aos requisitos do modelo 65.
    pub fn validar(
        modelo: u8,
        valor_total: f64,
        qtd_itens: usize,
        tem_destinatario: bool,
        cfop: &str,
    ) -> Result<(), Vec<String>> {
        let mut erros = Vec::new();

        if modelo != 65 {
            erros.push("NFC-e deve usar modelo 65".to_string());
        }

        if qtd_itens == 0 {
            erros.push("NFC-e deve conter ao menos um item".to_string());
        }

        if qtd_itens > 990 {
            erros.push(format!(
                "NFC-e permite no máximo 990 itens (encontrado: {})",
                qtd_itens
            ));
        }

        if valor_total > 10_000.0 && !tem_destinatario {
            erros.push(
                "Destinatário é obrigatório para NFC-e com valor acima de R$ 10.000,00"
                    .to_string(),
            );
        }

        if !cfop.starts_with('5') && !cfop.starts_with('6') {
            erros.push(format!(
                "CFOP {} não permitido para NFC-e (use CFOP de saída)",
                cfop
            ));
        }

        if erros.is_empty() {
            Ok(())
        } else {
            Err(erros)
        }
    }

    /// Valida se a chave de acesso é de uma NFC-e (modelo 65), lendo o
    /// segmento `mod` (posições 20-21, 0-indexado) da chave.
    pub fn validar_chave(chave: &str) -> bool {
        if chave.len() != 44 {
            return false;
        }
        chave[20..22].parse::<u8>().map(|m| m == 65).unwrap_or(false)
    }
}

/// Modos de emissão da NFC-e.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModoEmissaoNfce {
    /// Normal - transmissão online.
    Normal = 1,
    /// Contingência offline.
    ContingenciaOffline = 9,
}

/// Formas de pagamento aceitas em NFC-e (grupo `detPag`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum FormaPagamentoNfce {
    Dinheiro = 1,
    Cheque = 2,
    CartaoCredito = 3,
    CartaoDebito = 4,
    CreditoLoja = 5,
    ValeAlimentacao = 10,
    ValeRefeicao = 11,
    ValePresente = 12,
    ValeCombustivel = 13,
    BoletoBancario = 15,
    DepositoBancario = 16,
    Pix = 17,
    TransferenciaBancaria = 18,
    CashbackDebito = 19,
    SemPagamento = 90,
    Outros = 99,
}

impl FormaPagamentoNfce {
    pub fn descricao(&self) -> &'static str {
        match self {
            Self::Dinheiro => "Dinheiro",
            Self::Cheque => "Cheque",
            Self::CartaoCredito => "Cartão de Crédito",
            Self::CartaoDebito => "Cartão de Débito",
            Self::CreditoLoja => "Crédito Loja",
            Self::ValeAlimentacao => "Vale Alimentação",
            Self::ValeRefeicao => "Vale Refeição",
            Self::ValePresente => "Vale Presente",
            Self::ValeCombustivel => "Vale Combustível",
            Self::BoletoBancario => "Boleto Bancário",
            Self::DepositoBancario => "Depósito Bancário",
            Self::Pix => "PIX",
            Self::TransferenciaBancaria => "Transferência Bancária",
            Self::CashbackDebito => "Cashback Débito",
            Self::SemPagamento => "Sem Pagamento",
            Self::Outros => "Outros",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> QrCodePayload {
        QrCodePayload {
            chave_acesso: "35240508665074000100550010000000011270815480".to_string(),
            tipo_ambiente: 2,
            destinatario_documento: None,
            data_emissao: "2024-05-08T10:00:00-03:00".parse().unwrap(),
            valor_total: 99.90,
            valor_icms: 5.0,
            digest_value: "abc123==".to_string(),
            id_token_csc: "000001".to_string(),
            csc: "CSCSECRETO".to_string(),
        }
    }

    #[test]
    fn query_string_contem_todos_os_campos_e_hash() {
        let qs = payload().query_string();
        assert!(qs.contains("chNFe=35240508665074000100550010000000011270815480"));
        assert!(qs.contains("tpAmb=2"));
        assert!(qs.contains("vNF=99.90"));
        assert!(qs.contains("cHashQRCode="));
    }

    #[test]
    fn payload_de_hash_segue_o_layout_pipe_separado_da_nt() {
        let p = payload();
        assert_eq!(
            p.payload_para_hash(),
            "35240508665074000100550010000000011270815480|2||2024-05-08T13:00:00+00:00|99.90|5.00|abc123==|000001"
        );
    }

    #[test]
    fn hash_muda_quando_csc_muda() {
        let mut p1 = payload();
        let mut p2 = payload();
        p2.csc = "OUTRO".to_string();
        assert_ne!(p1.query_string(), p2.query_string());
        p1.csc = "OUTRO".to_string();
        assert_eq!(p1.query_string(), p2.query_string());
    }

    #[test]
    fn gerar_url_antepoe_a_base() {
        let url = payload().gerar_url("https://example/qr");
        assert!(url.starts_with("https://example/qr?chNFe="));
    }

    #[test]
    fn validar_chave_reconhece_modelo_65() {
        assert!(ValidadorNfce::validar_chave(
            "35240508665074000100550010000000011270815480"
        ));
    }

    #[test]
    fn validador_exige_destinatario_acima_do_limite() {
        let erros = ValidadorNfce::validar(65, 10_001.0, 1, false, "5102").unwrap_err();
        assert!(erros.iter().any(|e| e.contains("Destinatário")));
    }
}
