//! Property checks over seeded random inputs.
//!
//! Inputs mix known-good IBANs with random spacing and case, random
//! alphanumeric strings and a few non-ASCII letters. Seeds are fixed.

use iban_book::iban::{is_structurally_valid, normalize, MAX_LENGTH, MIN_LENGTH};
use iban_book::{format_iban, get_iban_info, validate_iban};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const KNOWN_GOOD: &[&str] = &[
    "TR330006100519786457841326",
    "GB82WEST12345698765432",
    "DE89370400440532013000",
    "NO9386011117947",
];

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 \t-";

fn random_string<R: Rng>(rng: &mut R, max_len: usize) -> String {
    let len = rng.gen_range(0..=max_len);
    (0..len)
        .map(|_| {
            if rng.gen_bool(0.05) {
                char::from_u32(rng.gen_range(0xA0..0x250)).unwrap_or('é')
            } else {
                char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())])
            }
        })
        .collect()
}

fn scramble<R: Rng>(rng: &mut R, iban: &str) -> String {
    let mut out = String::new();
    for ch in iban.chars() {
        if rng.gen_bool(0.2) {
            out.push(if rng.gen_bool(0.5) { ' ' } else { '\t' });
        }
        if rng.gen_bool(0.5) {
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[test]
fn format_is_idempotent() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..2_000 {
        let input = random_string(&mut rng, 48);
        let once = format_iban(&input);
        assert_eq!(format_iban(&once), once, "input {:?}", input);
        assert!(!once.ends_with(' '));
    }
}

#[test]
fn validity_is_normalization_invariant() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..2_000 {
        let input = random_string(&mut rng, 40);
        assert_eq!(validate_iban(&input), validate_iban(&normalize(&input)));
    }
    for iban in KNOWN_GOOD {
        for _ in 0..50 {
            let variant = scramble(&mut rng, iban);
            assert!(validate_iban(&variant), "variant {:?}", variant);
        }
    }
}

#[test]
fn single_digit_substitutions_break_the_checksum() {
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    for iban in KNOWN_GOOD {
        for _ in 0..50 {
            let mut chars: Vec<char> = iban.chars().collect();
            let idx = rng.gen_range(4..chars.len());
            let Some(digit) = chars[idx].to_digit(10) else {
                continue;
            };
            let replacement = (digit + rng.gen_range(1..10)) % 10;
            chars[idx] = char::from_digit(replacement, 10).unwrap();
            let altered: String = chars.into_iter().collect();
            assert!(!validate_iban(&altered), "altered {:?}", altered);
        }
    }
}

#[test]
fn length_outside_bounds_is_always_invalid() {
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    for _ in 0..500 {
        let len = if rng.gen_bool(0.5) {
            rng.gen_range(0..MIN_LENGTH)
        } else {
            rng.gen_range(MAX_LENGTH + 1..60)
        };
        let body: String = (0..len.saturating_sub(4))
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        let candidate: String = format!("DE89{}", body).chars().take(len).collect();
        assert!(!is_structurally_valid(&candidate));
        assert!(!validate_iban(&candidate));
    }
}

#[test]
fn malformed_country_or_check_digits_are_invalid() {
    let body = "370400440532013000";
    for prefix in ["1E89", "D189", "DEA9", "DE8B", "de8 "] {
        let candidate = format!("{prefix}{body}");
        assert!(!validate_iban(&candidate), "prefix {prefix}");
    }
    // Lowercase country codes are fixed by normalization.
    assert!(validate_iban(&format!("de89{body}")));
}

#[test]
fn info_never_panics_on_arbitrary_input() {
    let mut rng = ChaCha8Rng::seed_from_u64(41);
    for _ in 0..2_000 {
        let input = random_string(&mut rng, 12);
        let info = get_iban_info(&input);
        assert!(info.country_code.chars().count() <= 2);
        assert!(info.bank_code.chars().count() <= 8);
    }
}
