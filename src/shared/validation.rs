use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for Chinese administrative division codes (adcode)
    /// Exactly six ASCII digits
    /// - Valid: "310101", "110000"
    /// - Invalid: "31010", "3101011", "31010a", ""
    pub static ref ADCODE_REGEX: Regex = Regex::new(r"^[0-9]{6}$").unwrap();
}
