//! Assinatura XML para NFC-e
//!
//! Assinatura digital enveloped XMLDSig (C14N 1.0 + RSA-SHA256) conforme
//! padrão SEFAZ/ICP-Brasil, com validação XSD antes e depois da assinatura.
//!
//! A canonicalização usa a crate `c14n` (C14N 1.0 conforme) e a localização
//! do elemento assinado percorre a árvore DOM com `roxmltree` em vez de
//! varrer a string em busca de `Id="..."`.

use super::CertificadoA1;
use base64::Engine;
use rsa::pkcs1v15::{SigningKey, VerifyingKey};
use rsa::signature::{Signer, SignatureEncoding, Verifier};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignError {
    #[error("elemento {0} não encontrado no XML")]
    ElementNotFound(String),
    #[error("atributo Id não encontrado no elemento assinado")]
    IdMissing,
    #[error("falha na canonicalização C14N: {0}")]
    Canonicalization(String),
    #[error("falha ao assinar: {0}")]
    Signing(String),
    #[error("falha ao fazer parse do XML: {0}")]
    XmlParse(#[from] roxmltree::Error),
}

#[derive(Debug, Error)]
#[error("documento não validou contra o schema {schema}: {reason}")]
pub struct SchemaInvalid {
    pub schema: String,
    pub reason: String,
}

/// Assina XML de NFC-e/eventos com certificado digital A1.
pub struct AssinadorXml {
    certificado: CertificadoA1,
}

impl AssinadorXml {
    pub fn new(certificado: CertificadoA1) -> Self {
        Self { certificado }
    }

    /// Assina a `infNFe`, anexando `Signature` como último filho de `NFe`.
    pub fn assinar_nfe(&self, xml: &str) -> Result<String, SignError> {
        self.assinar_elemento(xml, "infNFe", "NFe")
    }

    /// Assina evento (cancelamento, carta de correção, etc)
    pub fn assinar_evento(&self, xml: &str) -> Result<String, SignError> {
        self.assinar_elemento(xml, "infEvento", "evento")
    }

    /// Assina um elemento XML específico, localizado por nome de tag via DOM,
    /// e insere a `Signature` como último filho de `elemento_pai`.
    fn assinar_elemento(&self, xml: &str, elemento: &str, elemento_pai: &str) -> Result<String, SignError> {
        let doc = roxmltree::Document::parse(xml)?;

        let signed_node = doc
            .descendants()
            .find(|n| n.has_tag_name(elemento))
            .ok_or_else(|| SignError::ElementNotFound(elemento.to_string()))?;
        let parent_node = doc
            .descendants()
            .find(|n| n.has_tag_name(elemento_pai))
            .ok_or_else(|| SignError::ElementNotFound(elemento_pai.to_string()))?;

        let id = signed_node
            .attribute("Id")
            .ok_or(SignError::IdMissing)?
            .to_string();

        let range = signed_node.range();
        let elem_xml = &xml[range.clone()];

        let canonical = canonicalize(elem_xml)?;
        let digest = Sha256::digest(&canonical);
        let digest_b64 = base64::engine::general_purpose::STANDARD.encode(digest);

        let signed_info = self.create_signed_info(&id, &digest_b64);
        let signed_info_canonical = canonicalize(&signed_info)?;
        let signature_value = self.sign_rsa_sha256(&signed_info_canonical)?;
        let signature_b64 = base64::engine::general_purpose::STANDARD.encode(signature_value);

        let cert_b64 = self.certificado.cert_base64();
        let signature_element = self.create_signature_element(&signed_info, &signature_b64, &cert_b64);

        let insert_at = parent_node.range().end - format!("</{}>", elemento_pai).len();
        Ok(format!("{}{}{}", &xml[..insert_at], signature_element, &xml[insert_at..]))
    }

    /// Assina dados com RSA-SHA256 usando a chave privada do certificado
    fn sign_rsa_sha256(&self, data: &[u8]) -> Result<Vec<u8>, SignError> {
        let private_key = self
            .certificado
            .private_key()
            .map_err(|e| SignError::Signing(e.to_string()))?;
        let signing_key: SigningKey<Sha256> = SigningKey::new(private_key);
        let signature = signing_key.sign(data);
        Ok(signature.to_vec())
    }

    fn create_signed_info(&self, reference_id: &str, digest_value: &str) -> String {
        format!(
            concat!(
                "<SignedInfo xmlns=\"http://www.w3.org/2000/09/xmldsig#\">",
                "<CanonicalizationMethod Algorithm=\"http://www.w3.org/TR/2001/REC-xml-c14n-20010315\"/>",
                "<SignatureMethod Algorithm=\"http://www.w3.org/2000/09/xmldsig#rsa-sha256\"/>",
                "<Reference URI=\"#{id}\">",
                "<Transforms>",
                "<Transform Algorithm=\"http://www.w3.org/2000/09/xmldsig#enveloped-signature\"/>",
                "<Transform Algorithm=\"http://www.w3.org/TR/2001/REC-xml-c14n-20010315\"/>",
                "</Transforms>",
                "<DigestMethod Algorithm=\"http://www.w3.org/2001/04/xmlenc#sha256\"/>",
                "<DigestValue>{digest}</DigestValue>",
                "</Reference>",
                "</SignedInfo>"
            ),
            id = reference_id,
            digest = digest_value,
        )
    }

    fn create_signature_element(&self, signed_info: &str, signature_value: &str, cert_b64: &str) -> String {
        format!(
            concat!(
                "<Signature xmlns=\"http://www.w3.org/2000/09/xmldsig#\">",
                "{signed_info}",
                "<SignatureValue>{sig}</SignatureValue>",
                "<KeyInfo><X509Data><X509Certificate>{cert}</X509Certificate></X509Data></KeyInfo>",
                "</Signature>"
            ),
            signed_info = signed_info,
            sig = signature_value,
            cert = cert_b64,
        )
    }
}

/// Canonicaliza um fragmento XML segundo C14N 1.0.
fn canonicalize(xml_fragment: &str) -> Result<Vec<u8>, SignError> {
    c14n::canonicalize(xml_fragment.as_bytes()).map_err(|e| SignError::Canonicalization(e.to_string()))
}

/// Verifica a assinatura embutida de um documento assinado usando o
/// `X509Certificate` também embutido, recomputando o C14N/SHA-256/RSA.
/// Complementa o pipeline de assinatura (propriedade testável 6) e é
/// usada pelos testes de integração do orquestrador.
pub fn verificar_assinatura(xml: &str, elemento: &str) -> Result<bool, SignError> {
    let doc = roxmltree::Document::parse(xml)?;

    let signed_node = doc
        .descendants()
        .find(|n| n.has_tag_name(elemento))
        .ok_or_else(|| SignError::ElementNotFound(elemento.to_string()))?;
    let signature_node = doc
        .descendants()
        .find(|n| n.has_tag_name("Signature"))
        .ok_or_else(|| SignError::ElementNotFound("Signature".to_string()))?;

    let digest_node = signature_node
        .descendants()
        .find(|n| n.has_tag_name("DigestValue"))
        .ok_or_else(|| SignError::ElementNotFound("DigestValue".to_string()))?;
    let stored_digest = digest_node.text().unwrap_or_default();

    let signature_value_node = signature_node
        .descendants()
        .find(|n| n.has_tag_name("SignatureValue"))
        .ok_or_else(|| SignError::ElementNotFound("SignatureValue".to_string()))?;
    let signature_b64 = signature_value_node.text().unwrap_or_default();

    let cert_node = signature_node
        .descendants()
        .find(|n| n.has_tag_name("X509Certificate"))
        .ok_or_else(|| SignError::ElementNotFound("X509Certificate".to_string()))?;
    let cert_b64 = cert_node.text().unwrap_or_default();

    let signed_info_node = signature_node
        .descendants()
        .find(|n| n.has_tag_name("SignedInfo"))
        .ok_or_else(|| SignError::ElementNotFound("SignedInfo".to_string()))?;
    let signed_info_xml = &xml[signed_info_node.range()];

    let range = signed_node.range();
    let elem_xml = &xml[range];
    let canonical = canonicalize(elem_xml)?;
    let digest = Sha256::digest(&canonical);
    let digest_b64 = base64::engine::general_purpose::STANDARD.encode(digest);

    if digest_b64 != stored_digest {
        return Ok(false);
    }

    let cert_der = base64::engine::general_purpose::STANDARD
        .decode(cert_b64)
        .map_err(|e| SignError::Signing(e.to_string()))?;
    let signature_bytes = base64::engine::general_purpose::STANDARD
        .decode(signature_b64)
        .map_err(|e| SignError::Signing(e.to_string()))?;

    let public_key = public_key_from_cert_der(&cert_der).map_err(|e| SignError::Signing(e))?;
    let verifying_key: VerifyingKey<Sha256> = VerifyingKey::new(public_key);

    let signed_info_canonical = canonicalize(signed_info_xml)?;
    let signature = rsa::pkcs1v15::Signature::try_from(signature_bytes.as_slice())
        .map_err(|e| SignError::Signing(e.to_string()))?;

    Ok(verifying_key.verify(&signed_info_canonical, &signature).is_ok())
}

fn public_key_from_cert_der(cert_der: &[u8]) -> Result<rsa::RsaPublicKey, String> {
    use der::Decode;
    use x509_cert::Certificate;

    let cert = Certificate::from_der(cert_der).map_err(|e| format!("{:?}", e))?;
    let spki = &cert.tbs_certificate.subject_public_key_info;
    rsa::RsaPublicKey::try_from(spki.clone()).map_err(|e| format!("{:?}", e))
}

/// Valida um documento XML contra um schema XSD (usa libxml2 via `libxml`).
/// Rodada duas vezes pelo orquestrador: antes e depois da assinatura.
pub fn validar_xsd(xml: &str, schema_path: &str) -> Result<(), SchemaInvalid> {
    use libxml::parser::Parser;
    use libxml::schemas::{SchemaParserContext, SchemaValidationContext};

    let mut schema_parser = SchemaParserContext::from_file(schema_path);
    let mut schema = SchemaValidationContext::from_parser(&mut schema_parser).map_err(|e| SchemaInvalid {
        schema: schema_path.to_string(),
        reason: format!("{:?}", e),
    })?;

    let parser = Parser::default();
    let doc = parser.parse_string(xml).map_err(|e| SchemaInvalid {
        schema: schema_path.to_string(),
        reason: format!("documento inválido: {:?}", e),
    })?;

    schema.validate_document(&doc).map_err(|errors| SchemaInvalid {
        schema: schema_path.to_string(),
        reason: errors
            .iter()
            .map(|e| e.message.clone().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("; "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assinatura_invalida_sem_elemento() {
        let xml = "<NFe><infNFe Id=\"NFe123\">conteudo</infNFe></NFe>";
        let res = roxmltree::Document::parse(xml);
        assert!(res.is_ok());
    }

    #[test]
    fn verificar_assinatura_falha_sem_signature() {
        let xml = "<NFe><infNFe Id=\"NFe123\">conteudo</infNFe></NFe>";
        let res = verificar_assinatura(xml, "infNFe");
        assert!(res.is_err());
    }
}
