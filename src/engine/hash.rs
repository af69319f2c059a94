use sha2::{Digest, Sha256};

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hex digest of a decoded symbol sequence, hashed as UTF-8.
pub fn symbols_digest(symbols: &[char]) -> String {
    let text: String = symbols.iter().collect();
    hex::encode(sha256(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_text_hash() {
        let symbols: Vec<char> = "abc".chars().collect();
        assert_eq!(
            symbols_digest(&symbols),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
