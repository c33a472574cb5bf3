//! Numeric token parsing.
//!
//! One parser handles prices ("100.000", "200k", "50 mil") and capacities
//! ("128gb", "1 tb"). Capacities are always expressed in gigabytes.

/// Gigabytes per terabyte.
pub const GB_PER_TB: f64 = 1024.0;

/// A unit word that may follow or be glued to a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suffix {
    /// "k", "mil", "lucas"
    Thousand,
    /// "millon", "millones"
    Million,
    /// "gb", "giga", "gigas"
    Gigabyte,
    /// "tb", "tera", "teras"
    Terabyte,
    /// "clp", "pesos"
    Currency,
}

impl Suffix {
    /// Recognize a normalized unit word.
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "k" | "mil" | "lucas" => Some(Self::Thousand),
            "millon" | "millones" => Some(Self::Million),
            "gb" | "giga" | "gigas" => Some(Self::Gigabyte),
            "tb" | "tera" | "teras" => Some(Self::Terabyte),
            "clp" | "pesos" => Some(Self::Currency),
            _ => None,
        }
    }

    fn multiplier(self) -> Option<f64> {
        match self {
            Self::Thousand => Some(1_000.0),
            Self::Million => Some(1_000_000.0),
            Self::Terabyte => Some(GB_PER_TB),
            Self::Gigabyte | Self::Currency => None,
        }
    }

    fn is_capacity(self) -> bool {
        matches!(self, Self::Gigabyte | Self::Terabyte)
    }
}

/// A number found in a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberToken {
    /// Value after applying the multiplier (gigabytes for capacities)
    pub value: f64,
    /// Value as written
    pub base: f64,
    /// Multiplier taken from a suffix, if any
    pub multiplier: Option<f64>,
    /// Whether a gigabyte/terabyte unit applies
    pub capacity: bool,
    /// Whether a suffix has been attached already
    pub suffixed: bool,
}

impl NumberToken {
    pub fn plain(base: f64) -> Self {
        Self {
            value: base,
            base,
            multiplier: None,
            capacity: false,
            suffixed: false,
        }
    }

    /// Attach a unit word.
    pub fn with_suffix(mut self, suffix: Suffix) -> Self {
        if let Some(m) = suffix.multiplier() {
            self.value = self.base * m;
            self.multiplier = Some(m);
        }
        self.capacity = suffix.is_capacity();
        self.suffixed = true;
        self
    }

    /// Adopt the unit of the other bound of a range ("128 a 256 gb",
    /// "100 y 200 mil").
    pub fn adopt_unit_of(&mut self, other: &NumberToken) {
        if self.suffixed {
            return;
        }
        if other.capacity {
            self.capacity = true;
        }
        if let Some(m) = other.multiplier {
            if self.base <= other.base {
                self.value = self.base * m;
                self.multiplier = Some(m);
            }
        }
    }
}

/// Parse a run of digits with `.`/`,` separators.
///
/// A separator followed by exactly three digits is a thousands separator;
/// otherwise the last separator is a decimal point.
pub fn parse_digits(text: &str) -> Option<f64> {
    let text = text.trim_matches(|c| c == '.' || c == ',');
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let groups: Vec<&str> = text.split(['.', ',']).collect();
    if groups.iter().any(|g| g.is_empty()) {
        return None;
    }
    if groups.len() == 1 {
        return groups[0].parse().ok();
    }

    let thousands = groups[1..].iter().all(|g| g.len() == 3);
    if thousands {
        return groups.concat().parse().ok();
    }

    let (last, rest) = groups.split_last()?;
    format!("{}.{}", rest.concat(), last).parse().ok()
}

/// Parse a single word as a number, possibly with a glued suffix
/// ("200k", "128gb", "1.5tb").
pub fn parse_number_word(word: &str) -> Option<NumberToken> {
    let digits_end = word
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == ','))
        .map(|(i, _)| i)
        .unwrap_or(word.len());
    let (digits, rest) = word.split_at(digits_end);
    if !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let token = NumberToken::plain(parse_digits(digits)?);
    if rest.is_empty() {
        return Some(token);
    }
    Suffix::parse(rest).map(|suffix| token.with_suffix(suffix))
}

/// Parse a price cell ("$1.234.567", "150k", "200 mil", "12.990 CLP").
///
/// A leading `$` or `clp` is dropped and the rest goes through the query
/// number parser. Cells it cannot read fall back to their digits only.
pub fn parse_money(raw: &str) -> Option<f64> {
    let lowered = raw.trim().to_lowercase();
    let trimmed = lowered.trim_start_matches(|c: char| c == '$' || c.is_whitespace());
    let trimmed = trimmed
        .strip_prefix("clp")
        .unwrap_or(trimmed)
        .trim_start_matches(|c: char| c == '$' || c.is_whitespace());

    let mut parts = trimmed.split_whitespace();
    if let Some(mut token) = parts.next().and_then(parse_number_word) {
        match parts.next() {
            Some(word) if word.starts_with(|c: char| c.is_ascii_digit()) => {}
            Some(word) => {
                if let Some(suffix) = Suffix::parse(word).filter(|_| !token.suffixed) {
                    token = token.with_suffix(suffix);
                }
                if !token.capacity {
                    return Some(token.value);
                }
            }
            None if !token.capacity => return Some(token.value),
            None => {}
        }
    }
    digits_only(raw)
}

fn digits_only(raw: &str) -> Option<f64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse a capacity cell in gigabytes ("256 GB", "1TB", "128").
pub fn parse_capacity(raw: &str) -> Option<f64> {
    let lowered = raw.trim().to_lowercase();
    let mut parts = lowered.split_whitespace();
    let first = parts.next()?;
    let mut token = parse_number_word(first)?;
    if !token.suffixed {
        if let Some(suffix) = parts.next().and_then(Suffix::parse) {
            token = token.with_suffix(suffix);
        }
    }
    Some(token.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_separators() {
        assert_eq!(parse_digits("100.000"), Some(100_000.0));
        assert_eq!(parse_digits("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_digits("1.234.567"), Some(1_234_567.0));
        assert_eq!(parse_digits("300"), Some(300.0));
    }

    #[test]
    fn test_decimal_separator() {
        assert_eq!(parse_digits("1.5"), Some(1.5));
        assert_eq!(parse_digits("2,75"), Some(2.75));
        assert_eq!(parse_digits("1.234,5"), Some(1234.5));
    }

    #[test]
    fn test_rejects_non_numbers() {
        assert_eq!(parse_digits(""), None);
        assert_eq!(parse_digits("1..2"), None);
        assert_eq!(parse_number_word("s23"), None);
        assert_eq!(parse_number_word("5g"), None);
    }

    #[test]
    fn test_glued_suffixes() {
        assert_eq!(parse_number_word("200k").map(|t| t.value), Some(200_000.0));
        assert_eq!(parse_number_word("1.5k").map(|t| t.value), Some(1_500.0));
        let gb = parse_number_word("128gb").unwrap();
        assert_eq!(gb.value, 128.0);
        assert!(gb.capacity);
        assert_eq!(parse_number_word("2tb").map(|t| t.value), Some(2048.0));
    }

    #[test]
    fn test_adopt_unit_of_upper_bound() {
        let mut low = NumberToken::plain(128.0);
        low.adopt_unit_of(&NumberToken::plain(256.0).with_suffix(Suffix::Gigabyte));
        assert!(low.capacity);
        assert_eq!(low.value, 128.0);

        let mut low = NumberToken::plain(100.0);
        low.adopt_unit_of(&NumberToken::plain(200.0).with_suffix(Suffix::Thousand));
        assert_eq!(low.value, 100_000.0);

        let mut big = NumberToken::plain(100_000.0);
        big.adopt_unit_of(&NumberToken::plain(200.0).with_suffix(Suffix::Thousand));
        assert_eq!(big.value, 100_000.0);
    }

    #[test]
    fn test_cell_parsers() {
        assert_eq!(parse_money("$1.234.567"), Some(1_234_567.0));
        assert_eq!(parse_money("N/D"), None);
        assert_eq!(parse_money("1 234 567"), Some(1_234_567.0));
        assert_eq!(parse_capacity("256 GB"), Some(256.0));
        assert_eq!(parse_capacity("1TB"), Some(1024.0));
        assert_eq!(parse_capacity("128"), Some(128.0));
        assert_eq!(parse_capacity("sin dato"), None);
    }

    #[test]
    fn test_price_cells_apply_multipliers() {
        assert_eq!(parse_money("150k"), Some(150_000.0));
        assert_eq!(parse_money("200 mil"), Some(200_000.0));
        assert_eq!(parse_money("1,5 millones"), Some(1_500_000.0));
        assert_eq!(parse_money("$ 12.990 CLP"), Some(12_990.0));
        assert_eq!(parse_money("CLP $329.990"), Some(329_990.0));
    }
}
