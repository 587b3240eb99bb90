//! Locale-aware currency strings for the revenue and monetary metrics.
//!
//! Formatting never feeds back into the numbers it displays.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported {kind} '{value}'")]
pub struct UnsupportedCode {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Currency {
    #[serde(rename = "AUD")]
    Aud,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "IDR")]
    Idr,
    #[serde(rename = "COP")]
    Cop,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Aud => "AUD",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Idr => "IDR",
            Currency::Cop => "COP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = UnsupportedCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AUD" => Ok(Currency::Aud),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "IDR" => Ok(Currency::Idr),
            "COP" => Ok(Currency::Cop),
            _ => Err(UnsupportedCode {
                kind: "currency",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Locale {
    #[serde(rename = "es_CO")]
    EsCo,
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "en_AU")]
    EnAu,
    #[serde(rename = "id_ID")]
    IdId,
    #[serde(rename = "de_DE")]
    DeDe,
}

struct NumberStyle {
    group: char,
    decimal: char,
    symbol_first: bool,
    spaced: bool,
}

impl Locale {
    pub fn tag(self) -> &'static str {
        match self {
            Locale::EsCo => "es_CO",
            Locale::EnUs => "en_US",
            Locale::EnAu => "en_AU",
            Locale::IdId => "id_ID",
            Locale::DeDe => "de_DE",
        }
    }

    fn style(self) -> NumberStyle {
        match self {
            Locale::EsCo => NumberStyle {
                group: '.',
                decimal: ',',
                symbol_first: true,
                spaced: true,
            },
            Locale::EnUs | Locale::EnAu => NumberStyle {
                group: ',',
                decimal: '.',
                symbol_first: true,
                spaced: false,
            },
            Locale::IdId => NumberStyle {
                group: '.',
                decimal: ',',
                symbol_first: true,
                spaced: false,
            },
            Locale::DeDe => NumberStyle {
                group: '.',
                decimal: ',',
                symbol_first: false,
                spaced: true,
            },
        }
    }

    fn symbol(self, currency: Currency) -> &'static str {
        match (self, currency) {
            (Locale::EnUs, Currency::Usd) | (Locale::EnAu, Currency::Aud) => "$",
            (Locale::EsCo, Currency::Cop) => "$",
            (Locale::IdId, Currency::Idr) => "Rp",
            (Locale::EnUs, Currency::Aud) => "A$",
            (Locale::EnAu, Currency::Usd) => "USD",
            (_, Currency::Aud) => "AU$",
            (_, Currency::Usd) => "US$",
            (_, Currency::Eur) => "€",
            (_, currency) => currency.code(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().replace('-', "_").as_str() {
            "es_CO" => Ok(Locale::EsCo),
            "en_US" => Ok(Locale::EnUs),
            "en_AU" => Ok(Locale::EnAu),
            "id_ID" => Ok(Locale::IdId),
            "de_DE" => Ok(Locale::DeDe),
            _ => Err(UnsupportedCode {
                kind: "locale",
                value: value.to_string(),
            }),
        }
    }
}

/// Formats `amount` with two fraction digits, the locale's separators and the
/// currency symbol the locale uses for it.
pub fn format_currency(amount: f64, currency: Currency, locale: Locale) -> String {
    let style = locale.style();
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(style.group);
        }
        grouped.push(ch);
    }
    let number: String = grouped.chars().rev().collect();
    let number = format!("{number}{}{fraction}", style.decimal);

    let sign = if amount < 0.0 && fixed.chars().any(|ch| ch != '0' && ch != '.') {
        "-"
    } else {
        ""
    };
    let gap = if style.spaced { "\u{a0}" } else { "" };
    let symbol = locale.symbol(currency);

    if style.symbol_first {
        format!("{sign}{symbol}{gap}{number}")
    } else {
        format!("{sign}{number}{gap}{symbol}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_default_pair() {
        assert_eq!(
            format_currency(150.0, Currency::Aud, Locale::EsCo),
            "AU$\u{a0}150,00"
        );
        assert_eq!(
            format_currency(16_436_035.0, Currency::Aud, Locale::EsCo),
            "AU$\u{a0}16.436.035,00"
        );
    }

    #[test]
    fn follows_locale_separators_and_placement() {
        assert_eq!(format_currency(1234.5, Currency::Usd, Locale::EnUs), "$1,234.50");
        assert_eq!(format_currency(1234.5, Currency::Aud, Locale::EnAu), "$1,234.50");
        assert_eq!(format_currency(1234.5, Currency::Idr, Locale::IdId), "Rp1.234,50");
        assert_eq!(
            format_currency(1234.5, Currency::Eur, Locale::DeDe),
            "1.234,50\u{a0}€"
        );
    }

    #[test]
    fn rounds_and_keeps_sign() {
        assert_eq!(format_currency(999.999, Currency::Usd, Locale::EnUs), "$1,000.00");
        assert_eq!(format_currency(-12.0, Currency::Usd, Locale::EnUs), "-$12.00");
        assert_eq!(format_currency(-0.001, Currency::Usd, Locale::EnUs), "$0.00");
        assert_eq!(format_currency(0.0, Currency::Aud, Locale::EsCo), "AU$\u{a0}0,00");
    }

    #[test]
    fn parses_codes() {
        assert_eq!("aud".parse::<Currency>(), Ok(Currency::Aud));
        assert_eq!("es-CO".parse::<Locale>(), Ok(Locale::EsCo));
        assert!("XYZ".parse::<Currency>().is_err());
        assert!("fr_FR".parse::<Locale>().is_err());
    }
}
