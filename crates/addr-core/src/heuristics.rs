use addr_standards::countries;

/// Whether `input` should go to the international parser first: it contains
/// non-ASCII characters, or names a country other than the US (and does not
/// also name the US).
pub fn is_probably_international(input: &str) -> bool {
    if !input.is_ascii() {
        return true;
    }
    countries::find_country(input).is_some() && !countries::mentions_domestic_country(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domestic_addresses_pass_through() {
        assert!(!is_probably_international("123 Main St, Austin TX 78749"));
        assert!(!is_probably_international("1 Canada Way, Portland OR 97201, USA"));
    }

    #[test]
    fn foreign_country_or_script() {
        assert!(is_probably_international("10 Downing Street, London, United Kingdom"));
        assert!(is_probably_international("Тверская улица 1, Москва"));
        assert!(is_probably_international("Calle Mayor 5, Madrid, España"));
        assert!(is_probably_international("Friedrichstraße 43, Berlin"));
    }

    #[test]
    fn country_words_must_be_whole() {
        assert!(!is_probably_international("12 Franceville Rd, Dallas TX 75201"));
    }

    #[test]
    fn military_mail_and_city_names_stay_domestic() {
        assert!(!is_probably_international("PSC 1234 Box 5678, APO AE 09204"));
        assert!(!is_probably_international("USS Nimitz, FPO AP 96620"));
        assert!(!is_probably_international("200 Main St, Paris TX 75460"));
        assert!(!is_probably_international("15 London Rd, London KY 40741"));
    }
}
