use serde::{Deserialize, Serialize};

/// Parsed (possibly partial) `<chain>.<storeId>.<rootHash>` identifier, the
/// intermediate value the resolver's grammar step produces before
/// completion/redirect decisions are made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Udi {
    pub chain: Option<String>,
    pub store_id: Option<String>,
    pub root_hash: Option<String>,
}

impl Udi {
    pub fn is_store_id_valid(store_id: &str) -> bool {
        store_id.len() == 64 && store_id.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

/// Opaque cookie payload persisted as `udiData`, mirroring the wire shape
/// the client is expected to round-trip verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdiCookie {
    #[serde(rename = "chainName")]
    pub chain_name: String,
    #[serde(rename = "storeId")]
    pub store_id: String,
    #[serde(rename = "rootHash")]
    pub root_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_store_id_length_and_charset() {
        let valid = "a".repeat(64);
        assert!(Udi::is_store_id_valid(&valid));
        assert!(!Udi::is_store_id_valid(&"a".repeat(63)));
        assert!(!Udi::is_store_id_valid(&"a".repeat(65)));
        assert!(!Udi::is_store_id_valid(&format!("{}z", "a".repeat(63))));
    }

    #[test]
    fn cookie_round_trips_through_json() {
        let cookie = UdiCookie {
            chain_name: "chia".to_string(),
            store_id: "a".repeat(64),
            root_hash: "beef".to_string(),
        };
        let json = serde_json::to_string(&cookie).unwrap();
        let decoded: UdiCookie = serde_json::from_str(&json).unwrap();
        assert_eq!(cookie, decoded);
    }
}
