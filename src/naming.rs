//! Field and relationship name conversion
//!
//! Rust-side names are snake_case; the service uses camelCase attribute and
//! filter names and dasherized relationship names.

/// `age_rating` → `ageRating`
pub fn to_camel_case(snake: &str) -> String {
    let mut parts = snake.split('_');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// `source_result` → `source-result`
pub fn to_dasherized(snake: &str) -> String {
    snake.replace('_', "-")
}

/// `source-result` → `source_result`
pub fn to_snake_case_from_dasherized(dasherized: &str) -> String {
    dasherized.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("age_rating", "ageRating")]
    #[test_case("is_original", "isOriginal")]
    #[test_case("title", "title")]
    #[test_case("verification_status", "verificationStatus")]
    #[test_case("created_at_ms", "createdAtMs")]
    fn test_to_camel_case(input: &str, expected: &str) {
        assert_eq!(to_camel_case(input), expected);
    }

    #[test]
    fn test_dasherize_round_trip() {
        assert_eq!(to_dasherized("source_result"), "source-result");
        assert_eq!(to_dasherized("uploader"), "uploader");
        assert_eq!(
            to_snake_case_from_dasherized("source-result"),
            "source_result"
        );
    }
}
