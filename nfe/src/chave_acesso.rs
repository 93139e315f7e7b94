//! Construção e validação da chave de acesso de 44 dígitos.
//!
//! A chave de acesso identifica unicamente um documento fiscal eletrônico e é
//! formada por: UF(2) + AAMM(4) + CNPJ(14) + MOD(2) + SERIE(3) + NNF(9) +
//! TPEMIS(1) + CNF(8) + DV(1).

use rand::Rng;

/// Componentes necessários para montar a chave de acesso antes do dígito
/// verificador.
#[derive(Debug, Clone)]
pub struct ComponentesChave {
    pub codigo_uf: u8,
    pub ano_mes: String,
    pub cnpj_emitente: String,
    pub modelo: u8,
    pub serie: u16,
    pub numero: u32,
    pub tipo_emissao: u8,
    pub codigo_numerico: String,
}

/// Gera um código numérico aleatório de 8 dígitos (`cNF`) uniformemente
/// distribuído em `[0, 99_999_999]`.
pub fn gerar_codigo_numerico() -> String {
    let valor: u32 = rand::thread_rng().gen_range(0..=99_999_999);
    format!("{:08}", valor)
}

/// Calcula o dígito verificador módulo 11 da chave de acesso.
///
/// Os pesos cicham de 2 a 9 da direita para a esquerda; resto 0 ou 1 produz
/// dígito 0, caso contrário o dígito é `11 - resto`.
pub fn calcular_dv(chave_43_digitos: &str) -> u8 {
    let pesos = [2, 3, 4, 5, 6, 7, 8, 9];
    let mut soma = 0u32;

    for (i, c) in chave_43_digitos.chars().rev().enumerate() {
        let digito = c.to_digit(10).unwrap_or(0);
        soma += digito * pesos[i % pesos.len()];
    }

    let resto = soma % 11;
    if resto < 2 {
        0
    } else {
        (11 - resto) as u8
    }
}

/// Monta a chave de acesso completa (44 dígitos, incluindo o DV) a partir
/// dos componentes.
pub fn montar_chave(componentes: &ComponentesChave) -> String {
    let chave_sem_dv = format!(
        "{:02}{}{:0>14}{:02}{:03}{:09}{:01}{}",
        componentes.codigo_uf,
        componentes.ano_mes,
        componentes.cnpj_emitente,
        componentes.modelo,
        componentes.serie,
        componentes.numero,
        componentes.tipo_emissao,
        componentes.codigo_numerico,
    );
    debug_assert_eq!(chave_sem_dv.len(), 43, "chave sem DV deve ter 43 dígitos");
    let dv = calcular_dv(&chave_sem_dv);
    format!("{}{}", chave_sem_dv, dv)
}

/// Verifica se uma chave de acesso de 44 dígitos tem um dígito verificador
/// consistente.
pub fn validar_dv(chave_44_digitos: &str) -> bool {
    if chave_44_digitos.len() != 44 || !chave_44_digitos.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let (corpo, dv) = chave_44_digitos.split_at(43);
    let dv_esperado = calcular_dv(corpo);
    dv.parse::<u8>().map(|d| d == dv_esperado).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dv_e_consistente_com_a_chave_montada() {
        let componentes = ComponentesChave {
            codigo_uf: 35,
            ano_mes: "2407".to_string(),
            cnpj_emitente: "12345678000190".to_string(),
            modelo: 65,
            serie: 1,
            numero: 123,
            tipo_emissao: 1,
            codigo_numerico: "00000001".to_string(),
        };
        let chave = montar_chave(&componentes);
        assert_eq!(chave.len(), 44);
        assert!(validar_dv(&chave));
    }

    #[test]
    fn dv_zero_quando_resto_menor_que_dois() {
        // chave sintética cuja soma ponderada produz resto 0 ou 1
        let chave = "0000000000000000000000000000000000000000";
        let dv = calcular_dv(chave);
        assert_eq!(dv, 0);
    }

    #[test]
    fn codigo_numerico_tem_sempre_oito_digitos() {
        for _ in 0..50 {
            let c = gerar_codigo_numerico();
            assert_eq!(c.len(), 8);
            assert!(c.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn chave_invalida_por_tamanho_e_rejeitada() {
        assert!(!validar_dv("123"));
    }
}
