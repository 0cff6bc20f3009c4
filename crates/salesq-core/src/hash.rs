//! Stable digests for plans, operator bindings, and result batches.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// 256-bit blake3 digest, displayed as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        use std::fmt::Write as _;
        self.0.iter().fold(String::with_capacity(64), |mut s, b| {
            let _ = write!(s, "{:02x}", b);
            s
        })
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Hash any serde-serializable value deterministically (via its JSON bytes).
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256, Error> {
    let bytes = serde_json::to_vec(v).map_err(|e| Error::Hash(e.to_string()))?;
    Ok(Hash256(blake3::hash(&bytes).into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_hash_is_stable_and_tracks_value_changes() {
        let a = hash_serde(&vec![1i64, 2, 3]).unwrap();
        let b = hash_serde(&vec![1i64, 2, 3]).unwrap();
        let c = hash_serde(&vec![1i64, 2, 4]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn hex_rendering_is_64_lowercase_chars() {
        let h = hash_serde(&"Customer").unwrap();
        let hex = h.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(format!("{}", h), hex);
    }
}
