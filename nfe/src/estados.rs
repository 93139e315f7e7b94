//! Tabela de Unidades Federativas e seus códigos IBGE (`cUF`).
//!
//! Consolida em um único lugar a tabela que o projeto original repetia em
//! `sefaz::consulta::AmbienteSefaz` e `sefaz::webservice::SefazClient::get_codigo_uf`.

use std::fmt;

/// Código IBGE de uma UF (usado no campo `cUF` da chave de acesso e do XML).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uf {
    pub sigla: &'static str,
    pub codigo: u8,
    pub nome: &'static str,
}

/// Erro retornado quando a sigla de UF informada não é reconhecida.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("UF não suportada: {0}")]
pub struct UfDesconhecida(pub String);

impl fmt::Display for Uf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sigla)
    }
}

const UFS: &[Uf] = &[
    Uf { sigla: "AC", codigo: 12, nome: "Acre" },
    Uf { sigla: "AL", codigo: 27, nome: "Alagoas" },
    Uf { sigla: "AP", codigo: 16, nome: "Amapá" },
    Uf { sigla: "AM", codigo: 13, nome: "Amazonas" },
    Uf { sigla: "BA", codigo: 29, nome: "Bahia" },
    Uf { sigla: "CE", codigo: 23, nome: "Ceará" },
    Uf { sigla: "DF", codigo: 53, nome: "Distrito Federal" },
    Uf { sigla: "ES", codigo: 32, nome: "Espírito Santo" },
    Uf { sigla: "GO", codigo: 52, nome: "Goiás" },
    Uf { sigla: "MA", codigo: 21, nome: "Maranhão" },
    Uf { sigla: "MT", codigo: 51, nome: "Mato Grosso" },
    Uf { sigla: "MS", codigo: 50, nome: "Mato Grosso do Sul" },
    Uf { sigla: "MG", codigo: 31, nome: "Minas Gerais" },
    Uf { sigla: "PA", codigo: 15, nome: "Pará" },
    Uf { sigla: "PB", codigo: 25, nome: "Paraíba" },
    Uf { sigla: "PR", codigo: 41, nome: "Paraná" },
    Uf { sigla: "PE", codigo: 26, nome: "Pernambuco" },
    Uf { sigla: "PI", codigo: 22, nome: "Piauí" },
    Uf { sigla: "RJ", codigo: 33, nome: "Rio de Janeiro" },
    Uf { sigla: "RN", codigo: 24, nome: "Rio Grande do Norte" },
    Uf { sigla: "RS", codigo: 43, nome: "Rio Grande do Sul" },
    Uf { sigla: "RO", codigo: 11, nome: "Rondônia" },
    Uf { sigla: "RR", codigo: 14, nome: "Roraima" },
    Uf { sigla: "SC", codigo: 42, nome: "Santa Catarina" },
    Uf { sigla: "SP", codigo: 35, nome: "São Paulo" },
    Uf { sigla: "SE", codigo: 28, nome: "Sergipe" },
    Uf { sigla: "TO", codigo: 17, nome: "Tocantins" },
];

/// Busca a UF pela sigla (ex: "SP"). Case-insensitive.
pub fn por_sigla(sigla: &str) -> Result<Uf, UfDesconhecida> {
    UFS.iter()
        .find(|uf| uf.sigla.eq_ignore_ascii_case(sigla))
        .copied()
        .ok_or_else(|| UfDesconhecida(sigla.to_string()))
}

/// Busca a UF pelo código `cUF` de dois dígitos.
pub fn por_codigo(codigo: u8) -> Result<Uf, UfDesconhecida> {
    UFS.iter()
        .find(|uf| uf.codigo == codigo)
        .copied()
        .ok_or_else(|| UfDesconhecida(codigo.to_string()))
}

/// Lista completa das 27 UFs.
pub fn todas() -> &'static [Uf] {
    UFS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contem_as_vinte_e_sete_unidades() {
        assert_eq!(todas().len(), 27);
    }

    #[test]
    fn busca_por_sigla_e_case_insensitive() {
        assert_eq!(por_sigla("sp").unwrap().codigo, 35);
        assert_eq!(por_sigla("SP").unwrap().codigo, 35);
    }

    #[test]
    fn sigla_desconhecida_retorna_erro() {
        assert!(por_sigla("XX").is_err());
    }

    #[test]
    fn busca_por_codigo_funciona() {
        assert_eq!(por_codigo(43).unwrap().sigla, "RS");
    }
}
