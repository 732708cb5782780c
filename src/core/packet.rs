//! Interest and Data packets, reduced to the fields the management protocol uses.

use crate::core::error::NfdError;
use crate::core::name::Name;
use crate::core::tlv::{Block, types};

pub const DEFAULT_INTEREST_LIFETIME_MS: u64 = 4000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    pub name: Name,
    pub nonce: u32,
    pub lifetime_ms: u64,
}

impl Interest {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            nonce: (ulid::Ulid::new().random() & u32::MAX as u128) as u32,
            lifetime_ms: DEFAULT_INTEREST_LIFETIME_MS,
        }
    }

    pub fn wire_encode(&self) -> Vec<u8> {
        Block::nested(
            types::INTEREST,
            &[
                self.name.to_block(),
                Block::new(types::NONCE, self.nonce.to_be_bytes().to_vec()),
                Block::from_non_negative_integer(types::INTEREST_LIFETIME, self.lifetime_ms),
            ],
        )
        .encode()
    }

    pub fn wire_decode(input: &[u8]) -> Result<Self, NfdError> {
        let outer = Block::decode_typed(input, types::INTEREST)?;
        let mut name = None;
        let mut nonce = None;
        let mut lifetime_ms = DEFAULT_INTEREST_LIFETIME_MS;
        for element in outer.elements()? {
            match element.typ {
                types::NAME => name = Some(Name::from_block(&element)?),
                types::NONCE => {
                    let bytes: [u8; 4] = element.value.as_slice().try_into().map_err(|_| {
                        NfdError::MalformedTlv("Nonce must be 4 bytes".into())
                    })?;
                    nonce = Some(u32::from_be_bytes(bytes));
                }
                types::INTEREST_LIFETIME => lifetime_ms = element.as_non_negative_integer()?,
                _ => {}
            }
        }
        Ok(Self {
            name: name.ok_or_else(|| NfdError::MalformedTlv("Interest without Name".into()))?,
            nonce: nonce.unwrap_or(0),
            lifetime_ms,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    pub name: Name,
    pub content: Vec<u8>,
}

impl Data {
    pub fn new(name: Name, content: Vec<u8>) -> Self {
        Self { name, content }
    }

    pub fn wire_encode(&self) -> Vec<u8> {
        Block::nested(
            types::DATA,
            &[
                self.name.to_block(),
                Block::new(types::CONTENT, self.content.clone()),
            ],
        )
        .encode()
    }

    pub fn wire_decode(input: &[u8]) -> Result<Self, NfdError> {
        let outer = Block::decode_typed(input, types::DATA)?;
        let mut name = None;
        let mut content = Vec::new();
        for element in outer.elements()? {
            match element.typ {
                types::NAME => name = Some(Name::from_block(&element)?),
                types::CONTENT => content = element.value,
                _ => {}
            }
        }
        Ok(Self {
            name: name.ok_or_else(|| NfdError::MalformedTlv("Data without Name".into()))?,
            content,
        })
    }
}
