/// Splits the comma-separated tag field of the editor form.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Inverse of [`parse_tags`] for prefilling the edit form.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("a, b"), vec!["a", "b"]);
        assert_eq!(parse_tags(" кража ,, хищение ,"), vec!["кража", "хищение"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_join_keeps_entry_order() {
        let tags = vec!["протокол".to_string(), "оформление".to_string()];
        assert_eq!(join_tags(&tags), "протокол, оформление");
        assert_eq!(parse_tags(&join_tags(&tags)), tags);
    }
}
