pub const MIN_LENGTH: usize = 15;
pub const MAX_LENGTH: usize = 34;

// Reduce once the accumulator holds this many decimal digits; keeps it below 10^9.
const REDUCE_AT_DIGITS: usize = 9;

pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !is_separator(*ch))
        .flat_map(char::to_uppercase)
        .collect()
}

/// Whitespace stripped from pasted IBANs: Unicode white space plus the byte
/// order mark, except NEL (U+0085).
fn is_separator(ch: char) -> bool {
    ch == '\u{FEFF}' || (ch.is_whitespace() && ch != '\u{0085}')
}

pub fn is_structurally_valid(canonical: &str) -> bool {
    structural_issue(canonical).is_none()
}

fn structural_issue(canonical: &str) -> Option<&'static str> {
    let length = canonical.chars().count();
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Some("IBAN length must be between 15 and 34 characters");
    }
    let mut chars = canonical.chars();
    let country_ok = chars.by_ref().take(2).all(|ch| ch.is_ascii_uppercase());
    if !country_ok {
        return Some("IBAN must start with a two-letter country code");
    }
    let digits_ok = chars.take(2).all(|ch| ch.is_ascii_digit());
    if !digits_ok {
        return Some("IBAN check digits must be numeric");
    }
    None
}

/// Returns the canonical IBAN, or the first rule it breaks.
pub fn check_iban(input: &str) -> Result<String, String> {
    let canonical = normalize(input);
    if let Some(issue) = structural_issue(&canonical) {
        return Err(issue.to_string());
    }
    if !canonical.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Err("IBAN must contain only letters and digits".to_string());
    }
    let rearranged = format!("{}{}", &canonical[4..], &canonical[..4]);
    match mod97(&rearranged) {
        Some(1) => Ok(canonical),
        _ => Err("IBAN checksum is invalid".to_string()),
    }
}

pub fn validate_iban(input: &str) -> bool {
    check_iban(input).is_ok()
}

pub fn format_iban(input: &str) -> String {
    let canonical: Vec<char> = normalize(input).chars().collect();
    canonical
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check digits that would make a well-formed IBAN pass the checksum.
///
/// Returns `None` when the input fails the structural gate or contains
/// characters outside `[A-Z0-9]`.
pub fn expected_check_digits(input: &str) -> Option<String> {
    let canonical = normalize(input);
    if !is_structurally_valid(&canonical) || !canonical.chars().all(|ch| ch.is_ascii_alphanumeric())
    {
        return None;
    }
    let combined = format!("{}{}00", &canonical[4..], &canonical[..2]);
    let remainder = mod97(&combined)?;
    Some(format!("{:02}", 98 - remainder))
}

/// ISO 7064 MOD-97-10 remainder of the letter-expanded string.
///
/// Letters expand to two digits (A=10 .. Z=35). The accumulator is reduced
/// whenever it reaches nine digits, so it always fits in a `u64`.
fn mod97(source: &str) -> Option<u64> {
    let mut accumulator: u64 = 0;
    let mut width = 0usize;
    for ch in source.chars() {
        let value = ch.to_digit(36)?;
        let expanded = [value / 10, value % 10];
        let digits = if value < 10 { &expanded[1..] } else { &expanded[..] };
        for digit in digits {
            accumulator = accumulator * 10 + u64::from(*digit);
            width += 1;
            if width >= REDUCE_AT_DIGITS {
                accumulator %= 97;
                width = decimal_width(accumulator);
            }
        }
    }
    Some(accumulator % 97)
}

fn decimal_width(value: u64) -> usize {
    if value < 10 {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_whitespace_and_uppercases() {
        assert_eq!(normalize(" tr33 0006\t1005\n"), "TR3300061005");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("de-89"), "DE-89");
    }

    #[test]
    fn pasted_byte_order_mark_is_stripped() {
        assert_eq!(normalize("\u{FEFF}de89\u{00A0}3704"), "DE893704");
        assert!(validate_iban("\u{FEFF}DE89 3704 0044 0532 0130 00"));
        assert_eq!(normalize("DE\u{0085}89"), "DE\u{0085}89");
        assert!(!validate_iban("DE89\u{0085}370400440532013000"));
    }

    #[test]
    fn known_good_vectors_validate() {
        assert!(validate_iban("TR330006100519786457841326"));
        assert!(validate_iban("GB82WEST12345698765432"));
        assert!(validate_iban("DE89370400440532013000"));
        assert!(validate_iban("de89 3704 0044 0532 0130 00"));
    }

    #[test]
    fn known_bad_vectors_fail() {
        assert!(!validate_iban("TR330006100519786457841327"));
        assert!(!validate_iban("XX330006100519786457841326"));
        assert!(!validate_iban(""));
    }

    #[test]
    fn structural_gate_runs_in_order() {
        assert_eq!(
            check_iban("TR33").unwrap_err(),
            "IBAN length must be between 15 and 34 characters"
        );
        assert_eq!(
            check_iban("1R330006100519786457841326").unwrap_err(),
            "IBAN must start with a two-letter country code"
        );
        assert_eq!(
            check_iban("TRA30006100519786457841326").unwrap_err(),
            "IBAN check digits must be numeric"
        );
        assert_eq!(
            check_iban("TR33-006100519786457841326").unwrap_err(),
            "IBAN must contain only letters and digits"
        );
        assert_eq!(
            check_iban("TR330006100519786457841327").unwrap_err(),
            "IBAN checksum is invalid"
        );
    }

    #[test]
    fn length_bounds_are_inclusive() {
        // Norway uses the minimum length of 15.
        assert!(validate_iban("NO9386011117947"));
        assert!(!validate_iban("NO938601111794"));
        let too_long = format!("DE89{}", "0".repeat(31));
        assert_eq!(too_long.len(), 35);
        assert!(!is_structurally_valid(&too_long));
    }

    #[test]
    fn non_ascii_input_never_panics() {
        assert!(!validate_iban("ÄÖ330006100519786457841326"));
        assert!(!validate_iban("TR33ß006100519786457841326"));
        assert_eq!(normalize("ß"), "SS");
    }

    #[test]
    fn format_groups_in_blocks_of_four() {
        assert_eq!(
            format_iban("TR330006100519786457841326"),
            "TR33 0006 1005 1978 6457 8413 26"
        );
        assert_eq!(format_iban("gb82 west"), "GB82 WEST");
        assert_eq!(format_iban(""), "");
        assert_eq!(format_iban("abcd"), "ABCD");
    }

    #[test]
    fn expected_check_digits_repairs_checksum() {
        assert_eq!(
            expected_check_digits("TR000006100519786457841326").as_deref(),
            Some("33")
        );
        assert_eq!(
            expected_check_digits("GB00WEST12345698765432").as_deref(),
            Some("82")
        );
        assert_eq!(expected_check_digits("short"), None);
    }

    #[test]
    fn streaming_remainder_matches_long_division() {
        let source = "370400440532013000131489";
        let mut expected = 0u64;
        for ch in source.chars() {
            expected = (expected * 10 + u64::from(ch.to_digit(10).unwrap())) % 97;
        }
        assert_eq!(mod97(source), Some(expected));
        assert_eq!(mod97("WEST12345698765432GB82"), Some(1));
        assert_eq!(mod97("12-3"), None);
    }
}
