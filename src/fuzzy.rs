/// Returns `true` when every character of `query` appears somewhere in
/// `text`, in order, case-insensitively. A subsequence test, not a substring
/// test: `"p2"` matches `"proj2"`. There is no scoring; callers filter with
/// this predicate and keep their own ordering.
pub fn matches(query: &str, text: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    let text = text.to_lowercase();
    let mut pending = query.chars().peekable();
    for c in text.chars() {
        if pending.peek() == Some(&c) {
            pending.next();
        }
    }
    pending.peek().is_none()
}

#[cfg(test)]
mod tests {
    use super::matches;

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches("", ""));
        assert!(matches("", "anything"));
    }

    #[test]
    fn empty_text_matches_nothing_else() {
        assert!(!matches("a", ""));
    }

    #[test]
    fn subsequence_not_substring() {
        assert!(matches("p2", "proj2"));
        assert!(matches("prj", "project"));
        assert!(!matches("p2", "proj1"));
        assert!(!matches("jrp", "proj"));
    }

    #[test]
    fn case_insensitive() {
        assert!(matches("RS", "rust-stuff"));
        assert!(matches("rs", "RuSt"));
    }

    #[test]
    fn query_longer_than_text() {
        assert!(!matches("project", "proj"));
    }
}
