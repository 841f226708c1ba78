use crate::clock::Timestamp;
use rand::Rng;

pub const MARK_PREFIX: &str = "mark";
pub const DOCUMENT_PREFIX: &str = "doc";
pub const VERSION_PREFIX: &str = "ver";
pub const SYNC_PREFIX: &str = "sync";

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Build an identifier of the form `prefix_timestamp_suffix`.
///
/// The timestamp keeps ids sortable by creation time; the random base-36
/// suffix keeps ids created in the same millisecond apart.
pub fn generate_id(prefix: &str, timestamp: Timestamp) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, timestamp, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_shape() {
        let id = generate_id(MARK_PREFIX, 1700000000000);
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "mark");
        assert_eq!(parts[1], "1700000000000");
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_ids_in_same_millisecond_differ() {
        let ids: HashSet<String> = (0..500).map(|_| generate_id(DOCUMENT_PREFIX, 42)).collect();
        assert_eq!(ids.len(), 500);
    }
}
