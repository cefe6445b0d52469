/// Trim user-entered text, returning `None` when nothing is left
pub fn non_empty_trimmed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_trimmed() {
        assert_eq!(non_empty_trimmed("  Ideas "), Some("Ideas".to_string()));
        assert_eq!(non_empty_trimmed("   "), None);
        assert_eq!(non_empty_trimmed(""), None);
    }
}
