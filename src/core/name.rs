//! Hierarchical names.
//!
//! A [`Name`] is an ordered sequence of opaque [`Component`]s. The zero-length
//! name is the root and is a prefix of every name.

use crate::core::error::NfdError;
use crate::core::tlv::{self, Block, types};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Component(Vec<u8>);

impl Component {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Component holding a nonNegativeInteger (timestamps, nonces).
    pub fn from_number(n: u64) -> Self {
        Self(tlv::encode_non_negative_integer(n))
    }

    /// Component whose value is the wire encoding of `block`.
    pub fn from_block(block: &Block) -> Self {
        Self(block.encode())
    }

    pub fn to_number(&self) -> Result<u64, NfdError> {
        tlv::decode_non_negative_integer(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_block(&self) -> Block {
        Block::new(types::NAME_COMPONENT, self.0.clone())
    }

    fn parse_uri(segment: &str) -> Result<Self, NfdError> {
        let raw = segment.as_bytes();
        let mut out = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'%' {
                let hex = raw
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .ok_or_else(|| {
                        NfdError::InvalidName(format!("truncated percent escape in '{}'", segment))
                    })?;
                // from_str_radix alone would accept a sign such as "+1".
                if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(NfdError::InvalidName(format!("bad percent escape '%{}'", hex)));
                }
                let byte = u8::from_str_radix(hex, 16).map_err(|_| {
                    NfdError::InvalidName(format!("bad percent escape '%{}'", hex))
                })?;
                out.push(byte);
                i += 3;
            } else {
                out.push(raw[i]);
                i += 1;
            }
        }
        // "..." and longer runs of dots escape the reserved "." and ".." forms.
        if !out.is_empty() && out.iter().all(|b| *b == b'.') {
            if out.len() < 3 {
                return Err(NfdError::InvalidName(format!(
                    "reserved component '{}'",
                    segment
                )));
            }
            out.truncate(out.len() - 3);
        }
        Ok(Self(out))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| *b == b'.') {
            write!(f, "...")?;
        }
        for b in &self.0 {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
                write!(f, "{}", *b as char)?;
            } else {
                write!(f, "%{:02X}", b)?;
            }
        }
        Ok(())
    }
}

impl From<&str> for Component {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name {
    components: Vec<Component>,
}

impl Name {
    /// The root (zero-length) name.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_components(components: Vec<Component>) -> Self {
        Self { components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn append(mut self, component: impl Into<Component>) -> Self {
        self.components.push(component.into());
        self
    }

    pub fn push(&mut self, component: impl Into<Component>) {
        self.components.push(component.into());
    }

    /// First `len` components (the whole name if `len` exceeds it).
    pub fn prefix(&self, len: usize) -> Name {
        Name {
            components: self.components[..len.min(self.len())].to_vec(),
        }
    }

    /// Name with the last `n` components removed.
    pub fn without_last(&self, n: usize) -> Name {
        self.prefix(self.len().saturating_sub(n))
    }

    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.len() <= other.len() && self.components[..] == other.components[..self.len()]
    }

    pub fn to_block(&self) -> Block {
        let children: Vec<Block> = self.components.iter().map(Component::to_block).collect();
        Block::nested(types::NAME, &children)
    }

    pub fn wire_encode(&self) -> Vec<u8> {
        self.to_block().encode()
    }

    pub fn from_block(block: &Block) -> Result<Self, NfdError> {
        block.expect_type(types::NAME)?;
        let components = block
            .elements()?
            .into_iter()
            .map(|c| {
                c.expect_type(types::NAME_COMPONENT)?;
                Ok(Component(c.value))
            })
            .collect::<Result<Vec<_>, NfdError>>()?;
        Ok(Self { components })
    }

    pub fn wire_decode(input: &[u8]) -> Result<Self, NfdError> {
        Self::from_block(&Block::decode_exact(input)?)
    }
}

impl FromStr for Name {
    type Err = NfdError;

    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        let trimmed = uri.trim();
        let path = trimmed.strip_prefix("ndn:").unwrap_or(trimmed);
        // Authority form "//host/..." is accepted and the host dropped.
        let path = match path.strip_prefix("//") {
            Some(rest) => rest.find('/').map(|i| &rest[i..]).unwrap_or(""),
            None => path,
        };
        let components = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Component::parse_uri)
            .collect::<Result<Vec<_>, NfdError>>()?;
        Ok(Self { components })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "/");
        }
        for c in &self.components {
            write!(f, "/{}", c)?;
        }
        Ok(())
    }
}
