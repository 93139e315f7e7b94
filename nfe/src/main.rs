//! Exemplo de uso da biblioteca `nfce-core`
//!
//! Demonstra o parsing de um XML de NFC-e autorizada no layout 4.00 da
//! SEFAZ e a exibição formatada dos dados extraídos.

use nfce_core::Nfe;
use std::io;

/// Carrega um arquivo XML para uma string, removendo o namespace padrão da
/// SEFAZ, que o quick-xml não resolve na deserialização.
fn load_xml_to_buffer(file_path: &str) -> Result<String, io::Error> {
    let buffer = std::fs::read_to_string(file_path)?;
    Ok(buffer.replace("xmlns=\"http://www.portalfiscal.inf.br/nfe\"", ""))
}

/// Mascara dados sensíveis em uma string para exibição segura (logs, debug).
fn mask_sensitive_data(data: &mut String, mask_start: &str, mask_len: usize) {
    if let Some(start) = data.find(mask_start) {
        let start = start + mask_start.len();
        if data.len() > start + mask_len {
            let replacement = "*".repeat(mask_len);
            data.replace_range(start..start + mask_len, &replacement);
        }
    }
}

fn display_nfe(nfe: &Nfe) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 NFC-e - NOTA FISCAL DE CONSUMIDOR             ║");
    println!("╠══════════════════════════════════════════════════════════════╣");

    println!("║ Chave de Acesso: {}...", &nfe.chave_acesso[..20.min(nfe.chave_acesso.len())]);
    println!("║ Versão Layout: {:?}", nfe.versao);
    println!(
        "║ Modelo: {:?} | Série: {} | Número: {}",
        nfe.ide.modelo, nfe.ide.serie, nfe.ide.numero
    );
    println!("║ Ambiente: {:?}", nfe.ide.ambiente);
    println!("║ Natureza da Operação: {}", nfe.ide.operacao.natureza);

    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║ EMITENTE");
    if let Some(ref cnpj) = nfe.emit.cnpj {
        println!("║ CNPJ: {}", cnpj);
    }
    if let Some(ref razao) = nfe.emit.razao_social {
        println!("║ Razão Social: {}", razao);
    }
    println!(
        "║ Cidade: {} - {}",
        nfe.emit.endereco.nome_municipio, nfe.emit.endereco.sigla_uf
    );

    if let Some(ref dest) = nfe.dest {
        println!("╟──────────────────────────────────────────────────────────────╢");
        println!("║ DESTINATÁRIO");
        println!("║ CNPJ/CPF: {}", dest.cnpj);
    }

    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║ ITENS ({} produtos)", nfe.itens.len());
    for item in &nfe.itens {
        println!("║ {}. {}", item.numero, item.produto.descricao);
        println!(
            "║    Qtd: {} {} x R$ {:.2} = R$ {:.2}",
            item.produto.quantidade,
            item.produto.unidade,
            item.produto.valor_unitario,
            item.produto.valor_bruto
        );
    }

    println!("╟──────────────────────────────────────────────────────────────╢");
    println!("║ Valor Total da Nota: R$ {:.2}", nfe.totais.valor_total);
    println!("╚══════════════════════════════════════════════════════════════╝");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let xml_path = std::env::args().nth(1).unwrap_or_else(|| "xmls/nfce.xml".to_string());

    println!("Carregando NFC-e de: {}", xml_path);
    let xml_data = load_xml_to_buffer(&xml_path)?;

    let nfe_start = xml_data.find("<NFe");
    let nfe_end = xml_data.find("</NFe>");

    if let (Some(start), Some(end)) = (nfe_start, nfe_end) {
        let nfe_xml = &xml_data[start..end + 6];
        match nfe_xml.parse::<Nfe>() {
            Ok(nfe) => display_nfe(&nfe),
            Err(e) => {
                eprintln!("Erro ao fazer parsing da NFC-e: {}", e);
                eprintln!("Verifique se o arquivo está no layout 4.00 da SEFAZ.");
            }
        }
    } else {
        eprintln!("Não foi possível encontrar a tag <NFe> no arquivo XML.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mascara_dados_sensiveis() {
        let mut data = "NFe35150300822602000124550010009923461099234656".to_string();
        mask_sensitive_data(&mut data, "NFe", 10);
        assert!(data.contains("**********"));
        assert!(data.starts_with("NFe"));
    }

    #[test]
    fn mascara_ignora_prefixo_ausente() {
        let mut data = "SemPrefixo12345".to_string();
        let original = data.clone();
        mask_sensitive_data(&mut data, "NFe", 5);
        assert_eq!(data, original);
    }
}
