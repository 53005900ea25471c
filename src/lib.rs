//! IBAN validation, formatting and bank lookup, plus a small CSV-backed book
//! of saved IBANs.
//!
//! The core functions never fail: [`validate_iban`] answers with a boolean and
//! the others fall back to sentinel values.

pub mod book;
pub mod iban;
pub mod info;
pub mod logging;
pub mod models;
pub mod preflight;
pub mod reference;

pub use book::IbanBook;
pub use iban::{check_iban, expected_check_digits, format_iban, normalize, validate_iban};
pub use info::{get_bank_name, get_iban_info, IbanInfo};
pub use models::{Category, IbanRecord};
