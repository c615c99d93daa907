//! Key-term extraction and query planning
//!
//! The full area name is the strongest search term, but provider recall on
//! exact names is poor, so shorter substrings of the name widen the net.
//! Names are CJK; all windowing is done over chars, never bytes.

/// Generic tourism suffixes stripped before substring generation
///
/// Longest first, so "风景名胜区" wins over "景区".
const GENERIC_SUFFIXES: &[&str] = &[
    "风景名胜区",
    "旅游度假区",
    "风景区",
    "旅游区",
    "度假区",
    "景区",
];

/// Suffix appended to widen queries toward tourist results
const SPOT_SUFFIX: &str = "景点";

/// Strip one generic suffix when the remainder keeps at least 2 chars
///
/// Short proper names survive intact: "景区" itself is never reduced to
/// nothing.
fn strip_generic_suffix(name: &str) -> &str {
    for suffix in GENERIC_SUFFIXES {
        if let Some(base) = name.strip_suffix(suffix) {
            if base.chars().count() >= 2 {
                return base;
            }
        }
    }
    name
}

/// Derive the ranked key terms for a scenic-area name
///
/// The full name always comes first; contiguous 3-char and 2-char windows of
/// the (possibly suffix-stripped) name follow; names of 3 chars or fewer also
/// contribute single chars. First-seen order is preserved, duplicates dropped.
pub fn key_terms(name: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let mut push = |term: String| {
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    };

    push(name.to_string());

    let base = strip_generic_suffix(name);
    push(base.to_string());

    let chars: Vec<char> = base.chars().collect();
    for size in [3, 2] {
        if chars.len() >= size {
            for window in chars.windows(size) {
                push(window.iter().collect());
            }
        }
    }
    if chars.len() <= 3 {
        for c in &chars {
            push(c.to_string());
        }
    }

    terms
}

/// Compose the ranked search queries for an area name
///
/// `"<name> 景点"` first, then the bare name, up to two `"<term> 景点"` from
/// the top key terms, and a generic `"景点"` last resort. Deduplicated,
/// order preserved.
pub fn enhanced_queries(name: &str) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();
    let mut push = |query: String| {
        if !queries.contains(&query) {
            queries.push(query);
        }
    };

    push(format!("{} {}", name, SPOT_SUFFIX));
    push(name.to_string());

    for term in key_terms(name).iter().filter(|t| t.as_str() != name).take(2) {
        push(format!("{} {}", term, SPOT_SUFFIX));
    }

    push(SPOT_SUFFIX.to_string());
    queries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_is_first_term() {
        let terms = key_terms("龙门石窟");
        assert_eq!(terms[0], "龙门石窟");
    }

    #[test]
    fn test_suffix_stripping() {
        let terms = key_terms("龙门石窟风景区");
        assert_eq!(terms[0], "龙门石窟风景区");
        assert_eq!(terms[1], "龙门石窟");
    }

    #[test]
    fn test_suffix_not_stripped_for_short_remainder() {
        // Stripping "景区" would leave a single char
        assert_eq!(strip_generic_suffix("西景区"), "西景区");
        assert_eq!(strip_generic_suffix("景区"), "景区");
    }

    #[test]
    fn test_substring_windows() {
        let terms = key_terms("龙门石窟");
        // 3-char windows
        assert!(terms.contains(&"龙门石".to_string()));
        assert!(terms.contains(&"门石窟".to_string()));
        // 2-char windows
        assert!(terms.contains(&"龙门".to_string()));
        assert!(terms.contains(&"石窟".to_string()));
        // 4 chars: no single-char terms
        assert!(!terms.contains(&"龙".to_string()));
    }

    #[test]
    fn test_short_name_emits_single_chars() {
        let terms = key_terms("西湖");
        assert!(terms.contains(&"西".to_string()));
        assert!(terms.contains(&"湖".to_string()));
    }

    #[test]
    fn test_terms_are_deduplicated_in_order() {
        let terms = key_terms("故宫");
        let mut sorted = terms.clone();
        sorted.dedup();
        assert_eq!(terms, sorted);
        assert_eq!(terms[0], "故宫");
    }

    #[test]
    fn test_enhanced_queries_shape() {
        let queries = enhanced_queries("龙门石窟");
        assert_eq!(queries[0], "龙门石窟 景点");
        assert_eq!(queries[1], "龙门石窟");
        assert_eq!(queries.last().unwrap(), "景点");
        // name + generic + up to two term queries
        assert!(queries.len() <= 5);
        let unique: std::collections::HashSet<_> = queries.iter().collect();
        assert_eq!(unique.len(), queries.len());
    }

    #[test]
    fn test_enhanced_queries_skip_full_name_term() {
        let queries = enhanced_queries("西湖");
        assert!(!queries.contains(&"西湖 景点 景点".to_string()));
        assert!(queries.iter().any(|q| q != "西湖" && q.ends_with(SPOT_SUFFIX)));
    }
}
