//! Supported report formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;
use crate::{kingdom_news, province_logs, province_news};

/// One of the three page types a user can paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    KingdomNews,
    ProvinceLogs,
    ProvinceNews,
}

impl ReportType {
    pub const ALL: [ReportType; 3] = [
        ReportType::KingdomNews,
        ReportType::ProvinceLogs,
        ReportType::ProvinceNews,
    ];

    /// Context label, also used by the settings document.
    pub fn tag(&self) -> &'static str {
        match self {
            ReportType::KingdomNews => "kingdom-news",
            ReportType::ProvinceLogs => "province-logs",
            ReportType::ProvinceNews => "province-news",
        }
    }

    /// Section headers in rendered order.
    pub fn section_headers(&self) -> &'static [&'static str] {
        match self {
            ReportType::KingdomNews => kingdom_news::SECTION_HEADERS,
            ReportType::ProvinceLogs => province_logs::SECTION_HEADERS,
            ReportType::ProvinceNews => province_news::SECTION_HEADERS,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ReportType {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        ReportType::ALL
            .into_iter()
            .find(|rt| rt.tag() == wanted)
            .ok_or_else(|| FormatError::UnknownReportType(s.to_string()))
    }
}
