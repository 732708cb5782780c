//! Signed command interests.
//!
//! A command is signed by appending four components to its name:
//!
//! ```text
//! <command>/<timestamp-ms>/<random>/<SignatureInfo>/<SignatureValue>
//! ```
//!
//! The signature covers the TLV encodings of every name component except the
//! last one (the SignatureValue itself). Keys are Ed25519; a certificate binds
//! a key name (carried in the KeyLocator) to a public key.

use crate::core::error::NfdError;
use crate::core::name::{Component, Name};
use crate::core::packet::Interest;
use crate::core::tlv::{Block, types};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use regex::Regex;
use sha2::{Digest, Sha256};

/// Components appended by [`CommandInterestGenerator`].
pub const SIGNED_COMMAND_EXTRA_COMPONENTS: usize = 4;

pub const SIGNATURE_TYPE_DIGEST_SHA256: u64 = 0;
pub const SIGNATURE_TYPE_ED25519: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInfo {
    pub signature_type: u64,
    pub key_locator: Option<Name>,
}

impl SignatureInfo {
    pub fn to_block(&self) -> Block {
        let mut children = vec![Block::from_non_negative_integer(
            types::SIGNATURE_TYPE,
            self.signature_type,
        )];
        if let Some(key) = &self.key_locator {
            children.push(Block::nested(types::KEY_LOCATOR, &[key.to_block()]));
        }
        Block::nested(types::SIGNATURE_INFO, &children)
    }

    pub fn wire_decode(input: &[u8]) -> Result<Self, NfdError> {
        let block = Block::decode_typed(input, types::SIGNATURE_INFO)?;
        let mut signature_type = None;
        let mut key_locator = None;
        for element in block.elements()? {
            match element.typ {
                types::SIGNATURE_TYPE => signature_type = Some(element.as_non_negative_integer()?),
                types::KEY_LOCATOR => {
                    let inner = Block::decode_typed(&element.value, types::NAME)?;
                    key_locator = Some(Name::from_block(&inner)?);
                }
                _ => {}
            }
        }
        Ok(Self {
            signature_type: signature_type
                .ok_or_else(|| NfdError::MalformedTlv("SignatureInfo without SignatureType".into()))?,
            key_locator,
        })
    }
}

/// The signature envelope split out of a signed command name.
#[derive(Debug, Clone)]
pub struct SignedEnvelope {
    pub timestamp_ms: u64,
    pub info: SignatureInfo,
    pub signature: Vec<u8>,
    pub signed_portion: Vec<u8>,
}

impl SignedEnvelope {
    /// Extracts the envelope from the last four components of `name`.
    pub fn from_name(name: &Name) -> Result<Self, NfdError> {
        let n = name.len();
        if n < SIGNED_COMMAND_EXTRA_COMPONENTS {
            return Err(NfdError::Signature("name too short to carry a signature".into()));
        }
        let component = |i: usize| {
            name.get(i)
                .ok_or_else(|| NfdError::Signature("missing envelope component".into()))
        };
        let timestamp_ms = component(n - 4)?.to_number()?;
        let info = SignatureInfo::wire_decode(component(n - 2)?.as_bytes())?;
        let value = Block::decode_typed(component(n - 1)?.as_bytes(), types::SIGNATURE_VALUE)?;
        Ok(Self {
            timestamp_ms,
            info,
            signature: value.value,
            signed_portion: signed_portion(&name.without_last(1)),
        })
    }
}

fn signed_portion(name: &Name) -> Vec<u8> {
    let mut buf = Vec::new();
    for component in name.components() {
        component.to_block().encode_into(&mut buf);
    }
    buf
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityCertificate {
    pub name: Name,
    pub public_key: VerifyingKey,
}

impl IdentityCertificate {
    pub fn new(name: Name, public_key: VerifyingKey) -> Self {
        Self { name, public_key }
    }

    pub fn from_hex(name: Name, public_key_hex: &str) -> Result<Self, NfdError> {
        let bytes: [u8; 32] = hex::decode(public_key_hex.trim())?
            .try_into()
            .map_err(|_| NfdError::Signature("Ed25519 public key must be 32 bytes".into()))?;
        let public_key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| NfdError::Signature(format!("invalid Ed25519 public key: {}", e)))?;
        Ok(Self { name, public_key })
    }

    /// Short SHA-256 fingerprint of the public key, as printed in logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.public_key.as_bytes());
        hex::encode(&digest[..8])
    }

    pub fn verify(&self, envelope: &SignedEnvelope) -> Result<(), NfdError> {
        let signature = Signature::from_slice(&envelope.signature)
            .map_err(|e| NfdError::Signature(format!("bad signature encoding: {}", e)))?;
        self.public_key
            .verify(&envelope.signed_portion, &signature)
            .map_err(|_| NfdError::Signature("signature does not verify".into()))
    }
}

/// Signing identity: a certificate name plus its secret key.
pub struct Signer25519 {
    pub certificate: IdentityCertificate,
    key: SigningKey,
}

impl Signer25519 {
    pub fn new(certificate_name: Name, key: SigningKey) -> Self {
        let certificate = IdentityCertificate::new(certificate_name, key.verifying_key());
        Self { certificate, key }
    }

    pub fn from_secret_hex(certificate_name: Name, secret_hex: &str) -> Result<Self, NfdError> {
        let bytes: [u8; 32] = hex::decode(secret_hex.trim())?
            .try_into()
            .map_err(|_| NfdError::Signature("Ed25519 secret key must be 32 bytes".into()))?;
        Ok(Self::new(certificate_name, SigningKey::from_bytes(&bytes)))
    }
}

/// Appends timestamp, nonce and signature components to command interests.
#[derive(Debug, Default)]
pub struct CommandInterestGenerator {
    last_timestamp_ms: u64,
}

impl CommandInterestGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamps are strictly increasing per generator, even within one millisecond.
    fn next_timestamp(&mut self) -> u64 {
        let now = crate::core::time::now_millis();
        self.last_timestamp_ms = now.max(self.last_timestamp_ms + 1);
        self.last_timestamp_ms
    }

    pub fn generate(&mut self, interest: &mut Interest, signer: &Signer25519) {
        let timestamp = self.next_timestamp();
        self.generate_at(interest, signer, timestamp);
    }

    /// Signs with an explicit timestamp instead of the generator clock.
    pub fn generate_at(&self, interest: &mut Interest, signer: &Signer25519, timestamp: u64) {
        let random = ulid::Ulid::new().random() as u64;
        let info = SignatureInfo {
            signature_type: SIGNATURE_TYPE_ED25519,
            key_locator: Some(signer.certificate.name.clone()),
        };

        let mut name = interest.name.clone();
        name.push(Component::from_number(timestamp));
        name.push(Component::from_number(random));
        name.push(Component::from_block(&info.to_block()));

        let signature = signer.key.sign(&signed_portion(&name));
        let value = Block::new(types::SIGNATURE_VALUE, signature.to_bytes().to_vec());
        name.push(Component::from_block(&value));
        interest.name = name;
    }
}

/// Access-rule matcher over names written in the `<component>` regex dialect,
/// e.g. `^<localhost><nfd><strategy-choice>`. `<>` matches any single component.
///
/// Each `<...>` compiles to one non-capturing group, so a quantifier after it repeats
/// whole components and the body never matches across a component boundary.
#[derive(Debug, Clone)]
pub struct NameRegex {
    source: String,
    regex: Regex,
}

impl NameRegex {
    pub fn new(pattern: &str) -> Result<Self, NfdError> {
        let translated = translate_name_pattern(pattern)?;
        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(&translated)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, name: &Name) -> bool {
        let rendered: String = name
            .components()
            .iter()
            .map(|c| format!("<{}>", c))
            .collect();
        self.regex.is_match(&rendered)
    }
}

/// Rewrites every `<body>` as `(?:<(?:body)>)` with `body` confined to one
/// component. Text outside the brackets passes through unchanged.
fn translate_name_pattern(pattern: &str) -> Result<String, NfdError> {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '<' => {
                let mut body = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some('\\') => {
                            body.push('\\');
                            if let Some(escaped) = chars.next() {
                                body.push(escaped);
                            }
                        }
                        Some(other) => body.push(other),
                        None => {
                            return Err(NfdError::InvalidName(format!(
                                "unterminated component in name regex '{}'",
                                pattern
                            )));
                        }
                    }
                }
                if body.is_empty() {
                    out.push_str("(?:<[^<>]*>)");
                } else {
                    out.push_str("(?:<(?:");
                    out.push_str(&confine_component(&body));
                    out.push_str(")>)");
                }
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Keeps a component body from matching the `<` `>` delimiters: `.`, negated
/// classes and `\W` `\S` `\D` are narrowed to exclude them.
fn confine_component(body: &str) -> String {
    let mut out = String::with_capacity(body.len() * 2);
    let mut chars = body.chars().peekable();
    let mut class_depth = 0usize;
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(e @ ('W' | 'S' | 'D')) if class_depth == 0 => {
                    out.push_str("[^\\");
                    out.push(e.to_ascii_lowercase());
                    out.push_str("<>]");
                }
                Some(e) => {
                    out.push('\\');
                    out.push(e);
                }
                None => out.push('\\'),
            },
            '[' => {
                class_depth += 1;
                out.push('[');
                if class_depth == 1 && chars.peek() == Some(&'^') {
                    chars.next();
                    out.push_str("^<>");
                }
            }
            ']' if class_depth > 0 => {
                class_depth -= 1;
                out.push(']');
            }
            '.' if class_depth == 0 => out.push_str("[^<>]"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> Signer25519 {
        Signer25519::new(
            "/operator/KEY/ksk-1/ID-CERT".parse().unwrap(),
            SigningKey::from_bytes(&[7u8; 32]),
        )
    }

    #[test]
    fn test_generated_command_verifies() {
        let signer = signer();
        let mut generator = CommandInterestGenerator::new();
        let mut interest = Interest::new("/localhost/nfd/strategy-choice/set/x".parse().unwrap());
        generator.generate(&mut interest, &signer);
        assert_eq!(interest.name.len(), 5 + SIGNED_COMMAND_EXTRA_COMPONENTS);

        let envelope = SignedEnvelope::from_name(&interest.name).unwrap();
        assert_eq!(envelope.info.signature_type, SIGNATURE_TYPE_ED25519);
        assert_eq!(envelope.info.key_locator, Some(signer.certificate.name.clone()));
        signer.certificate.verify(&envelope).unwrap();
    }

    #[test]
    fn test_tampered_command_fails() {
        let signer = signer();
        let mut generator = CommandInterestGenerator::new();
        let mut interest = Interest::new("/localhost/nfd/strategy-choice/set/x".parse().unwrap());
        generator.generate(&mut interest, &signer);

        let mut components = interest.name.components().to_vec();
        components[4] = Component::from("y");
        let tampered = Name::from_components(components);
        let envelope = SignedEnvelope::from_name(&tampered).unwrap();
        assert!(signer.certificate.verify(&envelope).is_err());
    }

    #[test]
    fn test_timestamps_strictly_increase() {
        let signer = signer();
        let mut generator = CommandInterestGenerator::new();
        let mut stamps = Vec::new();
        for _ in 0..3 {
            let mut interest = Interest::new("/c".parse().unwrap());
            generator.generate(&mut interest, &signer);
            stamps.push(SignedEnvelope::from_name(&interest.name).unwrap().timestamp_ms);
        }
        assert!(stamps[0] < stamps[1] && stamps[1] < stamps[2]);
    }

    #[test]
    fn test_unsigned_name_has_no_envelope() {
        let name: Name = "/localhost/nfd/strategy-choice/set/x".parse().unwrap();
        assert!(SignedEnvelope::from_name(&name).is_err());
    }

    #[test]
    fn test_name_regex_dialect() {
        let rule = NameRegex::new("^<localhost><nfd><strategy-choice>").unwrap();
        assert!(rule.is_match(&"/localhost/nfd/strategy-choice/set".parse().unwrap()));
        assert!(!rule.is_match(&"/localhost/nfd/faces/create".parse().unwrap()));
        assert!(!rule.is_match(&"/x/localhost/nfd/strategy-choice".parse().unwrap()));

        let wildcard = NameRegex::new("^<localhost><><strategy-choice>").unwrap();
        assert!(wildcard.is_match(&"/localhost/other/strategy-choice".parse().unwrap()));
        assert!(NameRegex::new("^<a>(").is_err());
        assert!(NameRegex::new("^<localhost><nfd").is_err());
    }

    #[test]
    fn test_name_regex_quantifiers_apply_to_whole_components() {
        let trailing = NameRegex::new("^<localhost><nfd><strategy-choice><>*$").unwrap();
        assert!(trailing.is_match(&"/localhost/nfd/strategy-choice/set/x".parse().unwrap()));
        assert!(trailing.is_match(&"/localhost/nfd/strategy-choice".parse().unwrap()));
        assert!(!trailing.is_match(&"/localhost/nfd/faces/create".parse().unwrap()));

        let optional = NameRegex::new("^<localhost><admin>?<nfd>").unwrap();
        assert!(optional.is_match(&"/localhost/nfd/x".parse().unwrap()));
        assert!(optional.is_match(&"/localhost/admin/nfd/x".parse().unwrap()));
        assert!(!optional.is_match(&"/localhost/other/nfd".parse().unwrap()));
    }

    #[test]
    fn test_name_regex_body_stays_within_one_component() {
        let single = NameRegex::new("^<localhost><n.*>$").unwrap();
        assert!(single.is_match(&"/localhost/nfd".parse().unwrap()));
        assert!(!single.is_match(&"/localhost/nfd/strategy-choice/set".parse().unwrap()));

        let negated = NameRegex::new("^<localhost><[^x]*>$").unwrap();
        assert!(negated.is_match(&"/localhost/nfd".parse().unwrap()));
        assert!(!negated.is_match(&"/localhost/nfd/set".parse().unwrap()));

        let non_space = NameRegex::new("^<localhost><\\S+>$").unwrap();
        assert!(!non_space.is_match(&"/localhost/nfd/set".parse().unwrap()));
    }

    #[test]
    fn test_certificate_from_hex() {
        let signer = signer();
        let hex_key = hex::encode(signer.certificate.public_key.as_bytes());
        let cert = IdentityCertificate::from_hex(signer.certificate.name.clone(), &hex_key).unwrap();
        assert_eq!(cert, signer.certificate);
        assert_eq!(cert.fingerprint().len(), 16);
        assert!(IdentityCertificate::from_hex(cert.name.clone(), "abcd").is_err());
    }
}
