//! Engine configuration shared by the converter, the validator and the typed projection.

/// Number formatting conventions used when coercing caller text into numbers.
#[derive(Clone, Debug, PartialEq)]
pub struct Culture {
    /// Decimal separator (e.g. '.' or ',')
    pub decimal_separator: char,
    /// Digit group separator, ignored while parsing
    pub group_separator: Option<char>,
}

impl Culture {
    /// Invariant culture: '.' decimals, no grouping.
    pub const fn invariant() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: None,
        }
    }

    /// Continental culture: ',' decimals, '.' grouping.
    pub const fn comma_decimal() -> Self {
        Self {
            decimal_separator: ',',
            group_separator: Some('.'),
        }
    }

    /// Parses a number with the culture separators, falling back to the invariant form.
    pub fn parse_number(&self, text: &str) -> Option<f64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let normalized: String = text
            .chars()
            .filter(|character| Some(*character) != self.group_separator)
            .map(|character| if character == self.decimal_separator { '.' } else { character })
            .collect();
        normalized.parse::<f64>().or_else(|_| text.parse::<f64>()).ok()
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

/// Engine options.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineOptions {
    /// Culture used for numeric coercion and number validation
    pub culture: Culture,
    /// chrono pattern used to render calendar values into Date cells
    pub date_format: String,
}

impl EngineOptions {
    pub const DEFAULT_DATE_FORMAT: &'static str = "%d/%m/%Y";

    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            culture: Culture::invariant(),
            date_format: Self::DEFAULT_DATE_FORMAT.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_culture_parses_plain_numbers() {
        let culture = Culture::invariant();
        assert_eq!(culture.parse_number("22.5"), Some(22.5));
        assert_eq!(culture.parse_number(" 22 "), Some(22.0));
        assert_eq!(culture.parse_number("22,5"), None);
        assert_eq!(culture.parse_number(""), None);
        assert_eq!(culture.parse_number("abc"), None);
    }

    #[test]
    fn comma_culture_parses_grouped_numbers() {
        let culture = Culture::comma_decimal();
        assert_eq!(culture.parse_number("22,5"), Some(22.5));
        assert_eq!(culture.parse_number("1.234,5"), Some(1234.5));
        assert_eq!(culture.parse_number("1.234"), Some(1234.0));
        assert_eq!(culture.parse_number("22.5"), Some(225.0));
    }

    #[test]
    fn options_builders() {
        let options = EngineOptions::default()
            .with_culture(Culture::comma_decimal())
            .with_date_format("%Y-%m-%d");
        assert_eq!(options.culture.decimal_separator, ',');
        assert_eq!(options.date_format, "%Y-%m-%d");
        assert_eq!(EngineOptions::default().date_format, "%d/%m/%Y");
    }
}
