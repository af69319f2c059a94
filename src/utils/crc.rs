use crc32fast::Hasher;

/// CRC-32 of an archive payload
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

pub fn verify_crc32(data: &[u8], expected: u32) -> bool {
    crc32(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert!(verify_crc32(b"123456789", 0xCBF4_3926));
        assert!(!verify_crc32(b"123456780", 0xCBF4_3926));
    }
}
