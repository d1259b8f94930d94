/// URL slug from a display name.
///
/// Lowercases, turns whitespace runs into `-`, drops everything except ASCII
/// alphanumerics, `-` and `_`, collapses repeated `-` and trims `-` at both ends.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_name() {
        assert_eq!(slugify("Home & Garden"), "home-garden");
        assert_eq!(slugify("  Men's   Shoes "), "mens-shoes");
    }

    #[test]
    fn test_collapses_and_trims_dashes() {
        assert_eq!(slugify("--Hello---World--"), "hello-world");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn test_keeps_underscore_and_digits() {
        assert_eq!(slugify("Phone_Cases 2025"), "phone_cases-2025");
    }

    #[test]
    fn test_non_ascii_dropped() {
        assert_eq!(slugify("Café Crème"), "caf-crme");
        assert_eq!(slugify("!!!"), "");
    }
}
