use deunicode::deunicode_char;

/// Ascii slug of a name: lowercased, non-alphanumerics collapsed to a
/// single dash, unicode transliterated. Used for item slugs and location
/// ids.
pub fn slugify<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();
    let mut slug = String::with_capacity(s.len());
    let mut pending_dash = false;

    let mut push_char = |c: char, slug: &mut String| match c {
        'a'..='z' | '0'..='9' => {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
        'A'..='Z' => {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        }
        _ => pending_dash = true,
    };

    for c in s.chars() {
        if c.is_ascii() {
            push_char(c, &mut slug);
        } else {
            for ascii in deunicode_char(c).unwrap_or("-").chars() {
                push_char(ascii, &mut slug);
            }
        }
    }

    slug.shrink_to_fit();
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Main Depot"), "main-depot");
        assert_eq!(slugify("hello world"), "hello-world");
    }

    #[test]
    fn test_collapses_separators() {
        assert_eq!(slugify("hello -- world"), "hello-world");
        assert_eq!(slugify("hello & world"), "hello-world");
    }

    #[test]
    fn test_unicode() {
        assert_eq!(slugify("Werkstatt Süd"), "werkstatt-sud");
        assert_eq!(slugify("café"), "cafe");
    }

    #[test]
    fn test_edges() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("  !! "), "");
        assert_eq!(slugify("-leading and trailing-"), "leading-and-trailing");
    }
}
