use crate::engine::error::CodecError;

/// A packed bit sequence, most significant bit first within each byte.
///
/// Bit data is not self-terminating, so the exact bit length travels with the
/// bytes. Padding bits in the final byte are always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedBits {
    bytes: Vec<u8>,
    bit_len: u64,
}

impl PackedBits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: u64) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8) as usize),
            bit_len: 0,
        }
    }

    /// Reassemble a sequence read back from storage. The byte count must be
    /// exactly what `bit_len` needs.
    pub fn from_parts(bytes: Vec<u8>, bit_len: u64) -> Result<Self, CodecError> {
        let available = bytes.len() as u64 * 8;
        if bit_len > available || bit_len.div_ceil(8) != bytes.len() as u64 {
            return Err(CodecError::DecodeCorruption {
                consumed: available,
                bit_len,
            });
        }

        let mut packed = Self { bytes, bit_len };
        packed.clear_padding();
        Ok(packed)
    }

    pub fn push(&mut self, bit: bool) {
        let offset = (self.bit_len % 8) as u32;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << (7 - offset);
            }
        }
        self.bit_len += 1;
    }

    pub fn extend_code(&mut self, code: &[bool]) {
        for &bit in code {
            self.push(bit);
        }
    }

    pub fn get(&self, index: u64) -> Option<bool> {
        if index >= self.bit_len {
            return None;
        }
        let byte = self.bytes[(index / 8) as usize];
        Some((byte >> (7 - index % 8)) & 1 == 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_len).map(move |index| {
            let byte = self.bytes[(index / 8) as usize];
            (byte >> (7 - index % 8)) & 1 == 1
        })
    }

    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn clear_padding(&mut self) {
        let used = (self.bit_len % 8) as u32;
        if used != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xFFu8 << (8 - used);
            }
        }
    }
}
