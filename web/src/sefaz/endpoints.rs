//! Tabela de endpoints SOAP de autorização por UF/ambiente.
//!
//! Generaliza o match de 4 estados de `SefazClient::get_base_url` (teacher)
//! para as 27 UFs mais SVC-AN/SVC-RS, tratada como dado de configuração
//! externo ao core (o "_ => svrs" do teacher vira erro explícito em vez de
//! fallback silencioso).

use thiserror::Error;

#[derive(Debug, Error)]
#[error("UF não suportada pelo transporte SEFAZ: {0}")]
pub struct UnsupportedState(pub String);

/// Par de URLs de autorização (`NFeAutorizacao4`) de um serviço SEFAZ.
#[derive(Debug, Clone, Copy)]
pub struct EndpointPar {
    pub producao: &'static str,
    pub homologacao: &'static str,
}

impl EndpointPar {
    pub fn url(&self, producao: bool) -> &'static str {
        if producao {
            self.producao
        } else {
            self.homologacao
        }
    }
}

const SVRS: EndpointPar = EndpointPar {
    producao: "https://nfe.svrs.rs.gov.br/ws/NFeAutorizacao/NFeAutorizacao4.asmx",
    homologacao: "https://nfe-homologacao.svrs.rs.gov.br/ws/NFeAutorizacao/NFeAutorizacao4.asmx",
};

/// Endpoint de autorização por UF, indexado pela sigla.
fn endpoint_por_uf(uf: &str) -> Option<EndpointPar> {
    Some(match uf.to_uppercase().as_str() {
        "SP" => EndpointPar {
            producao: "https://nfe.fazenda.sp.gov.br/ws/NFeAutorizacao4.asmx",
            homologacao: "https://homologacao.nfe.fazenda.sp.gov.br/ws/NFeAutorizacao4.asmx",
        },
        "MG" => EndpointPar {
            producao: "https://nfe.fazenda.mg.gov.br/nfe2/services/NFeAutorizacao4",
            homologacao: "https://hnfe.fazenda.mg.gov.br/nfe2/services/NFeAutorizacao4",
        },
        "PR" => EndpointPar {
            producao: "https://nfe.sefa.pr.gov.br/nfe/NFeAutorizacao4",
            homologacao: "https://homologacao.nfe.sefa.pr.gov.br/nfe/NFeAutorizacao4",
        },
        "RS" => EndpointPar {
            producao: "https://nfe.sefazrs.rs.gov.br/ws/NfeAutorizacao/NFeAutorizacao4.asmx",
            homologacao: "https://nfe-homologacao.sefazrs.rs.gov.br/ws/NfeAutorizacao/NFeAutorizacao4.asmx",
        },
        "BA" => EndpointPar {
            producao: "https://nfe.sefaz.ba.gov.br/webservices/NFeAutorizacao4/NFeAutorizacao4.asmx",
            homologacao: "https://hnfe.sefaz.ba.gov.br/webservices/NFeAutorizacao4/NFeAutorizacao4.asmx",
        },
        "MT" => EndpointPar {
            producao: "https://nfe.sefaz.mt.gov.br/nfews/v2/services/NfeAutorizacao4",
            homologacao: "https://homologacao.sefaz.mt.gov.br/nfews/v2/services/NfeAutorizacao4",
        },
        "MS" => EndpointPar {
            producao: "https://nfe.sefaz.ms.gov.br/ws/NFeAutorizacao4",
            homologacao: "https://hom.nfe.sefaz.ms.gov.br/ws/NFeAutorizacao4",
        },
        "GO" => EndpointPar {
            producao: "https://nfe.sefaz.go.gov.br/nfe/services/NFeAutorizacao4",
            homologacao: "https://homolog.sefaz.go.gov.br/nfe/services/NFeAutorizacao4",
        },
        "PE" => EndpointPar {
            producao: "https://nfe.sefaz.pe.gov.br/nfe-service/services/NFeAutorizacao4",
            homologacao: "https://nfehomolog.sefaz.pe.gov.br/nfe-service/services/NFeAutorizacao4",
        },
        "AM" => EndpointPar {
            producao: "https://nfe.sefaz.am.gov.br/services2/services/NFeAutorizacao4",
            homologacao: "https://homnfe.sefaz.am.gov.br/services2/services/NFeAutorizacao4",
        },
        "CE" => EndpointPar {
            producao: "https://nfe.sefaz.ce.gov.br/nfe4/services/NFeAutorizacao4",
            homologacao: "https://nfeh.sefaz.ce.gov.br/nfe4/services/NFeAutorizacao4",
        },
        "PA" => EndpointPar {
            producao: "https://appnfe.sefa.pa.gov.br/nfe4/services/NFeAutorizacao4",
            homologacao: "https://appnfe.sefa.pa.gov.br/nfe4-homologacao/services/NFeAutorizacao4",
        },
        // Demais UFs usam o ambiente SVRS (SEFAZ Virtual Rio Grande do Sul):
        "AC" | "AL" | "AP" | "DF" | "ES" | "MA" | "PB" | "PI" | "RJ" | "RN" | "RO" | "RR" | "SC"
        | "SE" | "TO" => SVRS,
        _ => return None,
    })
}

/// Resolve o endpoint de `NFeAutorizacao4` para a UF informada.
pub fn autorizacao(uf: &str) -> Result<EndpointPar, UnsupportedState> {
    endpoint_por_uf(uf).ok_or_else(|| UnsupportedState(uf.to_string()))
}

/// Endpoint do SEFAZ Virtual de Contingência - Ambiente Nacional.
pub fn svc_an() -> EndpointPar {
    EndpointPar {
        producao: "https://www.svc.fazenda.gov.br/NFeAutorizacao4/NFeAutorizacao4.asmx",
        homologacao: "https://hom.svc.fazenda.gov.br/NFeAutorizacao4/NFeAutorizacao4.asmx",
    }
}

/// Endpoint do SEFAZ Virtual de Contingência - Rio Grande do Sul, usado
/// pelos estados cujo convênio aponta o SVC-RS como contingência.
pub fn svc_rs() -> EndpointPar {
    EndpointPar {
        producao: "https://nfe.svrs.rs.gov.br/ws/NFeAutorizacao/NFeAutorizacao4.asmx",
        homologacao: "https://nfe-homologacao.svrs.rs.gov.br/ws/NFeAutorizacao/NFeAutorizacao4.asmx",
    }
}

/// URL base do portal de consulta pública de QR Code da UF, sobre a qual o
/// orquestrador monta a query string do QR Code. Cada UF publica o seu
/// próprio portal de consumidor; na ausência de um catálogo completo, usamos
/// o padrão de domínio adotado pela maioria das SEFAZ (exceções conhecidas
/// entram conforme confirmadas).
pub fn qr_portal_url(uf: &str) -> String {
    match uf.to_uppercase().as_str() {
        "SP" => "https://www.nfce.fazenda.sp.gov.br/qrcode".to_string(),
        "MG" => "https://portalsped.fazenda.mg.gov.br/portalnfce/sistema/qrcode.xhtml".to_string(),
        "PR" => "https://www.fazenda.pr.gov.br/nfce/qrcode".to_string(),
        uf => format!("https://www.sefaz.{}.gov.br/nfce/qrcode", uf.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_sp_e_distinto_de_svrs() {
        let sp = autorizacao("SP").unwrap();
        assert_ne!(sp.producao, SVRS.producao);
    }

    #[test]
    fn uf_desconhecida_e_erro() {
        assert!(autorizacao("XX").is_err());
    }

    #[test]
    fn uf_minuscula_e_aceita() {
        assert!(autorizacao("sp").is_ok());
    }

    #[test]
    fn pa_resolve_para_endpoint_proprio_nao_svrs() {
        let pa = autorizacao("PA").unwrap();
        assert_ne!(pa.producao, SVRS.producao);
    }

    #[test]
    fn todas_as_27_ufs_resolvem() {
        const UFS: [&str; 27] = [
            "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA",
            "PB", "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
        ];
        for uf in UFS {
            assert!(autorizacao(uf).is_ok(), "UF {uf} deveria resolver um endpoint");
        }
    }
}
