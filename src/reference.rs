#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryMetadata {
    pub name: &'static str,
    pub bank_code_length: usize,
}

pub const UNKNOWN_COUNTRY: CountryMetadata = CountryMetadata {
    name: "Unknown",
    bank_code_length: 0,
};

pub const UNKNOWN_BANK: &str = "Unknown Bank";

pub const COUNTRIES: &[(&str, CountryMetadata)] = &[
    ("TR", CountryMetadata { name: "Turkey", bank_code_length: 5 }),
    ("DE", CountryMetadata { name: "Germany", bank_code_length: 8 }),
    ("FR", CountryMetadata { name: "France", bank_code_length: 5 }),
    ("GB", CountryMetadata { name: "United Kingdom", bank_code_length: 4 }),
    ("IT", CountryMetadata { name: "Italy", bank_code_length: 5 }),
    ("ES", CountryMetadata { name: "Spain", bank_code_length: 4 }),
    ("NL", CountryMetadata { name: "Netherlands", bank_code_length: 4 }),
    ("BE", CountryMetadata { name: "Belgium", bank_code_length: 3 }),
    ("AT", CountryMetadata { name: "Austria", bank_code_length: 5 }),
    ("CH", CountryMetadata { name: "Switzerland", bank_code_length: 5 }),
];

pub const TURKISH_BANKS: &[(&str, &str)] = &[
    ("00001", "T.C. Merkez Bankası"),
    ("00012", "Türkiye Halk Bankası A.Ş."),
    ("00015", "T. Vakıflar Bankası T.A.O."),
    ("00017", "T. Emlak Bankası A.Ş."),
    ("00032", "Türkiye İş Bankası A.Ş."),
    ("00046", "Akbank T.A.Ş."),
    ("00059", "Şekerbank T.A.Ş."),
    ("00062", "T. Garanti Bankası A.Ş."),
    ("00064", "T. İş Bankası A.Ş. (İş Bankası)"),
    ("00067", "Yapı ve Kredi Bankası A.Ş."),
    ("00111", "Finansbank A.Ş."),
    ("00123", "Türkiye Ekonomi Bankası A.Ş."),
    ("00124", "Turkish Bank A.Ş."),
    ("00125", "Bank Mellat"),
    ("00134", "Denizbank A.Ş."),
    ("00135", "Türk Eximbank"),
    ("00143", "HSBC Bank A.Ş."),
    ("00146", "Odea Bank A.Ş."),
    ("00147", "Citibank A.Ş."),
    ("00148", "JPMorgan Chase Bank N.A."),
    ("00149", "ING Bank A.Ş."),
    ("00203", "QNB Finansbank A.Ş."),
];

pub fn country_metadata(code: &str) -> CountryMetadata {
    COUNTRIES
        .iter()
        .find(|(country, _)| *country == code)
        .map(|(_, meta)| *meta)
        .unwrap_or(UNKNOWN_COUNTRY)
}

pub fn is_known_country(code: &str) -> bool {
    COUNTRIES.iter().any(|(country, _)| *country == code)
}

pub fn turkish_bank(code: &str) -> Option<&'static str> {
    TURKISH_BANKS
        .iter()
        .find(|(bank_code, _)| *bank_code == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_countries_resolve_with_bank_code_length() {
        assert_eq!(country_metadata("DE").bank_code_length, 8);
        assert_eq!(country_metadata("BE").bank_code_length, 3);
        assert_eq!(country_metadata("TR").name, "Turkey");
        assert_eq!(COUNTRIES.len(), 10);
    }

    #[test]
    fn missing_country_falls_back_to_unknown() {
        assert_eq!(country_metadata("ZZ"), UNKNOWN_COUNTRY);
        assert_eq!(country_metadata(""), UNKNOWN_COUNTRY);
        assert_eq!(country_metadata("de"), UNKNOWN_COUNTRY);
        assert!(!is_known_country("XX"));
    }

    #[test]
    fn turkish_bank_table_lookup() {
        assert_eq!(TURKISH_BANKS.len(), 22);
        assert_eq!(turkish_bank("00046"), Some("Akbank T.A.Ş."));
        assert_eq!(turkish_bank("99999"), None);
    }
}
