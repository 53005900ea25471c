use crate::iban::{normalize, validate_iban};
use crate::reference::{country_metadata, turkish_bank, UNKNOWN_BANK};
use serde::Serialize;

pub const UNSUPPORTED_BANK_COUNTRY: &str = "Only TR IBANs are supported";

const BANK_CODE_OFFSET: usize = 4;
const TURKISH_BANK_CODE_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IbanInfo {
    pub country_code: String,
    pub country_name: String,
    pub bank_code: String,
    pub is_valid: bool,
}

/// Country and bank code of an IBAN, sliced from whatever the input provides.
///
/// Inputs shorter than the country code or bank code yield truncated or empty
/// slices rather than padding.
pub fn get_iban_info(input: &str) -> IbanInfo {
    let canonical = normalize(input);
    let country_code = country_prefix(&canonical);
    let country = country_metadata(&country_code);
    let bank_code = if country.bank_code_length > 0 {
        slice_chars(&canonical, BANK_CODE_OFFSET, country.bank_code_length)
    } else {
        String::new()
    };

    IbanInfo {
        country_code,
        country_name: country.name.to_string(),
        bank_code,
        is_valid: validate_iban(input),
    }
}

pub fn get_bank_name(input: &str) -> String {
    let canonical = normalize(input);
    if !canonical.starts_with("TR") {
        return UNSUPPORTED_BANK_COUNTRY.to_string();
    }
    let bank_code = slice_chars(&canonical, BANK_CODE_OFFSET, TURKISH_BANK_CODE_LENGTH);
    turkish_bank(&bank_code).unwrap_or(UNKNOWN_BANK).to_string()
}

pub fn country_prefix(canonical: &str) -> String {
    slice_chars(canonical, 0, 2)
}

fn slice_chars(value: &str, offset: usize, len: usize) -> String {
    value.chars().skip(offset).take(len).collect()
}
