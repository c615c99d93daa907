//! Request signing and cache content hashes
//!
//! Providers that require signed requests expect an MD5 digest over the
//! sorted query parameters with the shared secret appended. The same digest
//! primitive keys the raw-response cache.

/// Compute the request signature for a parameter set
///
/// Empty-valued parameters are excluded, the rest are sorted alphabetically
/// by key, joined as `key=value&key=value...`, the secret is appended, and the
/// MD5 digest of the whole string is returned as lowercase hex.
pub fn signature(params: &[(&str, String)], secret: &str) -> String {
    let mut pairs: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let joined = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", md5::compute(format!("{}{}", joined, secret)))
}

/// Assemble a query string, percent-encoding values
///
/// Parameter order is preserved; the signature must already be part of the
/// list. Signing happens over raw values, encoding only here.
pub fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Content hash keying the raw-response cache
///
/// Identical request text for the same logical identifier hashes to the same
/// key, so a repeated call short-circuits the network entirely.
pub fn content_hash(prompt: &str, identifier: &str) -> String {
    format!("{:x}", md5::compute(format!("{}::{}", prompt, identifier)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_sorts_params() {
        let forward = [("b", "2".to_string()), ("a", "1".to_string())];
        let reverse = [("a", "1".to_string()), ("b", "2".to_string())];
        assert_eq!(signature(&forward, "s"), signature(&reverse, "s"));
    }

    #[test]
    fn test_signature_skips_empty_values() {
        let with_empty = [
            ("a", "1".to_string()),
            ("types", String::new()),
            ("b", "2".to_string()),
        ];
        let without = [("a", "1".to_string()), ("b", "2".to_string())];
        assert_eq!(signature(&with_empty, "s"), signature(&without, "s"));
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let params = [("a", "1".to_string())];
        assert_ne!(signature(&params, "s1"), signature(&params, "s2"));
    }

    #[test]
    fn test_signature_known_digest() {
        // md5("a=1&b=2secret")
        let params = [("a", "1".to_string()), ("b", "2".to_string())];
        assert_eq!(
            signature(&params, "secret"),
            format!("{:x}", md5::compute("a=1&b=2secret"))
        );
    }

    #[test]
    fn test_encode_query_preserves_order_and_encodes() {
        let params = [("b", "龙门".to_string()), ("a", "1".to_string())];
        let query = encode_query(&params);
        assert!(query.starts_with("b="));
        assert!(query.contains("a=1"));
        assert!(!query.contains("龙门"));
    }

    #[test]
    fn test_content_hash_distinguishes_identifier() {
        assert_ne!(content_hash("q", "amap"), content_hash("q", "baidu"));
        assert_eq!(content_hash("q", "amap"), content_hash("q", "amap"));
    }
}
