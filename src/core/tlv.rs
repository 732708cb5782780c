//! NDN TLV primitives.
//!
//! Every element on the wire is `TYPE LENGTH VALUE` where TYPE and LENGTH are
//! `VAR-NUMBER`s: one byte below 253, otherwise a marker byte (253, 254, 255)
//! followed by a big-endian u16, u32 or u64.

use crate::core::error::NfdError;

/// Assigned TLV types used by the strategy-choice protocol.
pub mod types {
    pub const INTEREST: u64 = 5;
    pub const DATA: u64 = 6;
    pub const NAME: u64 = 7;
    pub const NAME_COMPONENT: u64 = 8;
    pub const NONCE: u64 = 10;
    pub const INTEREST_LIFETIME: u64 = 12;
    pub const CONTENT: u64 = 21;
    pub const SIGNATURE_INFO: u64 = 22;
    pub const SIGNATURE_VALUE: u64 = 23;
    pub const SIGNATURE_TYPE: u64 = 27;
    pub const KEY_LOCATOR: u64 = 28;
    pub const CONTROL_RESPONSE: u64 = 101;
    pub const STATUS_CODE: u64 = 102;
    pub const STATUS_TEXT: u64 = 103;
    pub const CONTROL_PARAMETERS: u64 = 104;
    pub const STRATEGY: u64 = 107;
}

pub fn write_var_number(buf: &mut Vec<u8>, n: u64) {
    if n < 253 {
        buf.push(n as u8);
    } else if n <= u16::MAX as u64 {
        buf.push(253);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= u32::MAX as u64 {
        buf.push(254);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(255);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Reads a `VAR-NUMBER` at `*pos`, advancing `pos` past it.
pub fn read_var_number(input: &[u8], pos: &mut usize) -> Result<u64, NfdError> {
    let first = *input
        .get(*pos)
        .ok_or_else(|| NfdError::MalformedTlv("unexpected end of input".into()))?;
    let width = match first {
        253 => 2,
        254 => 4,
        255 => 8,
        n => {
            *pos += 1;
            return Ok(n as u64);
        }
    };
    let start = *pos + 1;
    let bytes = input
        .get(start..start + width)
        .ok_or_else(|| NfdError::MalformedTlv("truncated VAR-NUMBER".into()))?;
    *pos = start + width;
    Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64))
}

/// Shortest big-endian encoding in 1, 2, 4 or 8 bytes.
pub fn encode_non_negative_integer(n: u64) -> Vec<u8> {
    if n <= u8::MAX as u64 {
        vec![n as u8]
    } else if n <= u16::MAX as u64 {
        (n as u16).to_be_bytes().to_vec()
    } else if n <= u32::MAX as u64 {
        (n as u32).to_be_bytes().to_vec()
    } else {
        n.to_be_bytes().to_vec()
    }
}

pub fn decode_non_negative_integer(value: &[u8]) -> Result<u64, NfdError> {
    match value.len() {
        1 | 2 | 4 | 8 => Ok(value.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64)),
        n => Err(NfdError::MalformedTlv(format!(
            "nonNegativeInteger must be 1, 2, 4 or 8 bytes, got {}",
            n
        ))),
    }
}

/// A single TLV element with its value kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub typ: u64,
    pub value: Vec<u8>,
}

impl Block {
    pub fn new(typ: u64, value: Vec<u8>) -> Self {
        Self { typ, value }
    }

    /// Block holding the concatenated encodings of `children`.
    pub fn nested(typ: u64, children: &[Block]) -> Self {
        let mut value = Vec::new();
        for child in children {
            child.encode_into(&mut value);
        }
        Self { typ, value }
    }

    pub fn from_non_negative_integer(typ: u64, n: u64) -> Self {
        Self::new(typ, encode_non_negative_integer(n))
    }

    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        write_var_number(buf, self.typ);
        write_var_number(buf, self.value.len() as u64);
        buf.extend_from_slice(&self.value);
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.value.len() + 4);
        self.encode_into(&mut buf);
        buf
    }

    /// Decodes the element at the front of `input`, returning it with the number of
    /// bytes consumed.
    pub fn decode(input: &[u8]) -> Result<(Block, usize), NfdError> {
        let mut pos = 0;
        let typ = read_var_number(input, &mut pos)?;
        let len = read_var_number(input, &mut pos)?;
        let len = usize::try_from(len)
            .map_err(|_| NfdError::MalformedTlv("length exceeds address space".into()))?;
        let end = pos
            .checked_add(len)
            .ok_or_else(|| NfdError::MalformedTlv("length overflow".into()))?;
        let value = input
            .get(pos..end)
            .ok_or_else(|| {
                NfdError::MalformedTlv(format!(
                    "TLV-LENGTH {} exceeds remaining {} bytes",
                    len,
                    input.len().saturating_sub(pos)
                ))
            })?
            .to_vec();
        Ok((Block { typ, value }, end))
    }

    /// Decodes exactly one element; trailing bytes are an error.
    pub fn decode_exact(input: &[u8]) -> Result<Block, NfdError> {
        let (block, used) = Self::decode(input)?;
        if used != input.len() {
            return Err(NfdError::MalformedTlv(format!(
                "{} trailing bytes after TLV type {}",
                input.len() - used,
                block.typ
            )));
        }
        Ok(block)
    }

    /// Decodes exactly one element of the expected type.
    pub fn decode_typed(input: &[u8], typ: u64) -> Result<Block, NfdError> {
        let block = Self::decode_exact(input)?;
        block.expect_type(typ)?;
        Ok(block)
    }

    pub fn expect_type(&self, typ: u64) -> Result<(), NfdError> {
        if self.typ != typ {
            return Err(NfdError::MalformedTlv(format!(
                "expected TLV type {}, found {}",
                typ, self.typ
            )));
        }
        Ok(())
    }

    /// Parses the value as a sequence of nested elements.
    pub fn elements(&self) -> Result<Vec<Block>, NfdError> {
        let mut out = Vec::new();
        let mut rest = &self.value[..];
        while !rest.is_empty() {
            let (block, used) = Block::decode(rest)?;
            out.push(block);
            rest = &rest[used..];
        }
        Ok(out)
    }

    pub fn as_non_negative_integer(&self) -> Result<u64, NfdError> {
        decode_non_negative_integer(&self.value)
    }
}
