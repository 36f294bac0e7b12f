use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// A relative chart period ending "today".
///
/// Serialized as its short token (`"3m"`, `"1y"`, `"ytd"`), which is also
/// the value sent to the market-data API's `range` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    OneMonth,
    #[default]
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    YearToDate,
}

/// Span of a fixed-length period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    Months(u32),
    Years(u32),
}

impl Period {
    /// Order in which the period buttons are offered.
    pub const BUTTONS: [Period; 7] = [
        Period::FiveYears,
        Period::TwoYears,
        Period::OneYear,
        Period::YearToDate,
        Period::SixMonths,
        Period::ThreeMonths,
        Period::OneMonth,
    ];

    /// Fixed-length periods, longest first. `ytd` has no fixed length.
    pub const FIXED_DESCENDING: [Period; 6] = [
        Period::FiveYears,
        Period::TwoYears,
        Period::OneYear,
        Period::SixMonths,
        Period::ThreeMonths,
        Period::OneMonth,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Period::OneMonth => "1m",
            Period::ThreeMonths => "3m",
            Period::SixMonths => "6m",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::YearToDate => "ytd",
        }
    }

    /// Amount + unit, or `None` for `ytd`.
    pub fn span(self) -> Option<Span> {
        match self {
            Period::OneMonth => Some(Span::Months(1)),
            Period::ThreeMonths => Some(Span::Months(3)),
            Period::SixMonths => Some(Span::Months(6)),
            Period::OneYear => Some(Span::Years(1)),
            Period::TwoYears => Some(Span::Years(2)),
            Period::FiveYears => Some(Span::Years(5)),
            Period::YearToDate => None,
        }
    }

    /// Whether the chart covers a year or more (the renderer scrolls to the
    /// latest data for these).
    pub fn is_yearly(self) -> bool {
        matches!(self.span(), Some(Span::Years(_)))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(Period::OneMonth),
            "3m" => Ok(Period::ThreeMonths),
            "6m" => Ok(Period::SixMonths),
            "1y" => Ok(Period::OneYear),
            "2y" => Ok(Period::TwoYears),
            "5y" => Ok(Period::FiveYears),
            "ytd" => Ok(Period::YearToDate),
            _ => Err(CoreError::InvalidPeriod(s.to_string())),
        }
    }
}

impl TryFrom<String> for Period {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.token().to_string()
    }
}
