use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating personnel numbers (NIP / NIP_BARU)
    /// Digits only, as issued by BKN
    /// - Valid: "198503302009011009", "150123456"
    /// - Invalid: "1985 0330", "19850330-2009", "", "NIP123"
    pub static ref NIP_REGEX: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nip_regex_valid() {
        assert!(NIP_REGEX.is_match("198503302009011009"));
        assert!(NIP_REGEX.is_match("150123456"));
        assert!(NIP_REGEX.is_match("0"));
    }

    #[test]
    fn test_nip_regex_invalid() {
        assert!(!NIP_REGEX.is_match("1985 0330")); // space
        assert!(!NIP_REGEX.is_match("19850330-2009")); // hyphen
        assert!(!NIP_REGEX.is_match("")); // empty
        assert!(!NIP_REGEX.is_match("NIP123")); // letters
        assert!(!NIP_REGEX.is_match(" 1985")); // leading space
    }
}
