//! RUN (rol único nacional) checksum validation and formatting.

/// Keep only `[0-9kK]` and uppercase the result.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'k' || *c == 'K')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Check digit for a RUN body: weighted modulo-11 sum, weights cycling 2..7
/// from the rightmost digit.
fn verifier(body: &str) -> Option<char> {
    let mut sum = 0u32;
    let mut multiplier = 2u32;

    for c in body.chars().rev() {
        sum += c.to_digit(10)? * multiplier;
        multiplier = if multiplier == 7 { 2 } else { multiplier + 1 };
    }

    match 11 - (sum % 11) {
        11 => Some('0'),
        10 => Some('K'),
        remainder => char::from_digit(remainder, 10),
    }
}

/// Whether `raw` sanitizes to a 7–8 digit body plus its matching check
/// character.
pub fn is_valid(raw: &str) -> bool {
    let normalized = sanitize(raw);
    let Some(body) = normalized.get(..normalized.len().saturating_sub(1)) else {
        return false;
    };

    if !(7..=8).contains(&body.len()) || !body.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    verifier(body) == normalized.chars().last()
}

/// Display form with dotted thousands and dashed check digit, e.g.
/// `19.011.022-K`. Returns `None` for inputs that do not validate.
pub fn format(raw: &str) -> Option<String> {
    if !is_valid(raw) {
        return None;
    }

    let normalized = sanitize(raw);
    let (body, check) = normalized.split_at(normalized.len() - 1);

    let mut dotted = String::with_capacity(body.len() + 3);
    for (index, c) in body.chars().enumerate() {
        let remaining = body.len() - index;
        if index > 0 && remaining % 3 == 0 {
            dotted.push('.');
        }
        dotted.push(c);
    }

    Some(format!("{dotted}-{check}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("19.011.022-k"), "19011022K");
        assert_eq!(sanitize(" 12 345 678-5 "), "123456785");
        assert_eq!(sanitize("sin run"), "");
    }

    #[test]
    fn test_known_pairings() {
        assert!(is_valid("19011022K"));
        assert!(is_valid("19.011.022-k"));
        assert!(is_valid("12345678-5"));
        assert!(is_valid("9876543-3"));
    }

    #[test]
    fn test_check_digit_is_unique() {
        // only K closes the 19011022 body.
        for c in "0123456789".chars() {
            assert!(!is_valid(&format!("19011022{c}")));
        }
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(!is_valid(""));
        assert!(!is_valid("123456-5")); // 6-digit body.
        assert!(!is_valid("123456789-5")); // 9-digit body.
        assert!(!is_valid("K2345678-5"));
    }

    #[test]
    fn test_format() {
        assert_eq!(format("19011022k").as_deref(), Some("19.011.022-K"));
        assert_eq!(format("9876543-3").as_deref(), Some("9.876.543-3"));
        assert_eq!(format("19011021k"), None);
    }
}
