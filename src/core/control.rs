//! ControlParameters and ControlResponse, the management protocol records.

use crate::core::error::NfdError;
use crate::core::name::Name;
use crate::core::tlv::{Block, types};
use serde::Serialize;

/// Options carried by a strategy-choice command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlParameters {
    pub name: Option<Name>,
    pub strategy: Option<Name>,
}

impl ControlParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: Name) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_strategy(mut self, strategy: Name) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn to_block(&self) -> Block {
        let mut children = Vec::new();
        if let Some(name) = &self.name {
            children.push(name.to_block());
        }
        if let Some(strategy) = &self.strategy {
            children.push(Block::nested(types::STRATEGY, &[strategy.to_block()]));
        }
        Block::nested(types::CONTROL_PARAMETERS, &children)
    }

    pub fn wire_encode(&self) -> Vec<u8> {
        self.to_block().encode()
    }

    /// Decodes a ControlParameters element. Unrecognised fields are skipped; a
    /// repeated field is malformed.
    pub fn wire_decode(input: &[u8]) -> Result<Self, NfdError> {
        let block = Block::decode_typed(input, types::CONTROL_PARAMETERS)?;
        let mut params = Self::default();
        for element in block.elements()? {
            match element.typ {
                types::NAME => {
                    if params.name.is_some() {
                        return Err(NfdError::MalformedTlv("duplicate Name".into()));
                    }
                    params.name = Some(Name::from_block(&element)?);
                }
                types::STRATEGY => {
                    if params.strategy.is_some() {
                        return Err(NfdError::MalformedTlv("duplicate Strategy".into()));
                    }
                    let inner = Block::decode_typed(&element.value, types::NAME)?;
                    params.strategy = Some(Name::from_block(&inner)?);
                }
                _ => {}
            }
        }
        Ok(params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlResponse {
    pub code: u32,
    pub text: String,
    /// Verbatim echo of the command's encoded parameters; omitted on the wire when empty.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "hex_body")]
    pub body: Option<Vec<u8>>,
}

fn hex_body<S>(body: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match body {
        Some(bytes) => serializer.serialize_str(&hex::encode(bytes)),
        None => serializer.serialize_none(),
    }
}

impl ControlResponse {
    pub fn new(code: u32, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = if body.is_empty() { None } else { Some(body) };
        self
    }

    pub fn wire_encode(&self) -> Vec<u8> {
        let mut value = Vec::new();
        Block::from_non_negative_integer(types::STATUS_CODE, self.code as u64)
            .encode_into(&mut value);
        Block::new(types::STATUS_TEXT, self.text.as_bytes().to_vec()).encode_into(&mut value);
        if let Some(body) = &self.body {
            value.extend_from_slice(body);
        }
        Block::new(types::CONTROL_RESPONSE, value).encode()
    }

    /// Decodes a ControlResponse; everything after StatusText is the body.
    pub fn wire_decode(input: &[u8]) -> Result<Self, NfdError> {
        let block = Block::decode_typed(input, types::CONTROL_RESPONSE)?;
        let (code_block, used) = Block::decode(&block.value)?;
        code_block.expect_type(types::STATUS_CODE)?;
        let code = u32::try_from(code_block.as_non_negative_integer()?)
            .map_err(|_| NfdError::MalformedTlv("StatusCode exceeds 32 bits".into()))?;
        let rest = &block.value[used..];
        let (text_block, used) = Block::decode(rest)?;
        text_block.expect_type(types::STATUS_TEXT)?;
        let text = String::from_utf8(text_block.value)
            .map_err(|e| NfdError::MalformedTlv(format!("StatusText is not UTF-8: {}", e)))?;
        let body = &rest[used..];
        Ok(Self {
            code,
            text,
            body: if body.is_empty() { None } else { Some(body.to_vec()) },
        })
    }
}
