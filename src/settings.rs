//! User display preferences and the reorder layer that applies them.
//!
//! Settings never touch extraction. [`apply_settings`] re-slices rendered
//! text at section headers, so changing a preference only needs a re-render.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FormatError, FormatResult};
use crate::extract::parse_number;
use crate::render::format_number;
use crate::report::ReportType;

/// Accepted range for the kingdom news time window, in game days.
pub const WINDOW_DAYS_RANGE: std::ops::RangeInclusive<u32> = 1..=168;

static TOTAL_LINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d[\d,]*) .+? for a total of (\d[\d,]*) .+$").unwrap());

/// Preferences for one report type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    /// Section headers to show first, in this order.
    pub order: Vec<String>,
    /// Section headers to drop.
    pub hidden: Vec<String>,
    /// Append "(avg N)" to "... for a total of ..." lines.
    pub show_averages: bool,
    /// Kingdom news only: keep the last N days.
    pub window_days: Option<u32>,
}

impl ReportSettings {
    /// Reject unknown headers and out-of-range numbers.
    pub fn validate(&self, report_type: ReportType) -> FormatResult<()> {
        let known = report_type.section_headers();
        for header in self.order.iter().chain(self.hidden.iter()) {
            if !known.contains(&header.as_str()) {
                return Err(FormatError::invalid_setting(format!(
                    "unknown section {header:?} for {report_type}"
                )));
            }
        }
        if let Some(days) = self.window_days {
            if !WINDOW_DAYS_RANGE.contains(&days) {
                return Err(FormatError::invalid_setting(format!(
                    "window_days must be within {}..={}, got {days}",
                    WINDOW_DAYS_RANGE.start(),
                    WINDOW_DAYS_RANGE.end()
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsDocument {
    #[serde(rename = "kingdom-news")]
    kingdom_news: ReportSettings,
    #[serde(rename = "province-logs")]
    province_logs: ReportSettings,
    #[serde(rename = "province-news")]
    province_news: ReportSettings,
}

/// Independent settings per report type, owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsStore {
    kingdom_news: ReportSettings,
    province_logs: ReportSettings,
    province_news: ReportSettings,
}

impl SettingsStore {
    /// Load from a TOML document with one table per report tag.
    pub fn from_toml_str(doc: &str) -> FormatResult<Self> {
        let parsed: SettingsDocument = toml::from_str(doc)?;
        let store = Self {
            kingdom_news: parsed.kingdom_news,
            province_logs: parsed.province_logs,
            province_news: parsed.province_news,
        };
        for report_type in ReportType::ALL {
            store.get(report_type).validate(report_type)?;
        }
        Ok(store)
    }

    pub fn get(&self, report_type: ReportType) -> &ReportSettings {
        match report_type {
            ReportType::KingdomNews => &self.kingdom_news,
            ReportType::ProvinceLogs => &self.province_logs,
            ReportType::ProvinceNews => &self.province_news,
        }
    }

    /// Replace one report type's settings. Invalid input keeps the old value.
    pub fn set(&mut self, report_type: ReportType, settings: ReportSettings) -> FormatResult<()> {
        if let Err(err) = settings.validate(report_type) {
            warn!(report = report_type.tag(), error = %err, "rejected settings");
            return Err(err);
        }
        *self.slot(report_type) = settings;
        Ok(())
    }

    pub fn set_order(&mut self, report_type: ReportType, order: Vec<String>) -> FormatResult<()> {
        let settings = ReportSettings { order, ..self.get(report_type).clone() };
        self.set(report_type, settings)
    }

    pub fn set_visible(&mut self, report_type: ReportType, header: &str, visible: bool) -> FormatResult<()> {
        let mut settings = self.get(report_type).clone();
        settings.hidden.retain(|h| h != header);
        if !visible {
            settings.hidden.push(header.to_string());
        }
        self.set(report_type, settings)
    }

    pub fn set_show_averages(&mut self, report_type: ReportType, show: bool) {
        self.slot(report_type).show_averages = show;
    }

    pub fn set_window_days(&mut self, report_type: ReportType, days: Option<u32>) -> FormatResult<()> {
        let settings = ReportSettings { window_days: days, ..self.get(report_type).clone() };
        self.set(report_type, settings)
    }

    fn slot(&mut self, report_type: ReportType) -> &mut ReportSettings {
        match report_type {
            ReportType::KingdomNews => &mut self.kingdom_news,
            ReportType::ProvinceLogs => &mut self.province_logs,
            ReportType::ProvinceNews => &mut self.province_news,
        }
    }
}

fn with_average(line: &str) -> String {
    if line.contains(" (avg ") {
        return line.to_string();
    }
    let Some(caps) = TOTAL_LINE_PATTERN.captures(line) else {
        return line.to_string();
    };
    let count = caps.get(1).and_then(|m| parse_number(m.as_str()));
    let total = caps.get(2).and_then(|m| parse_number(m.as_str()));
    match (count, total) {
        (Some(count), Some(total)) if count > 0 => {
            let avg = total / count + u64::from(total % count >= count - count / 2);
            format!("{line} (avg {})", format_number(avg))
        }
        _ => line.to_string(),
    }
}

/// Reorder, hide and annotate sections of rendered text.
///
/// Text before the first known header stays on top. Without any known
/// header the text is returned unchanged.
pub fn apply_settings(text: &str, report_type: ReportType, settings: &ReportSettings) -> String {
    let known = report_type.section_headers();

    let mut preamble: Vec<&str> = Vec::new();
    let mut sections: Vec<(&str, Vec<&str>)> = Vec::new();
    for line in text.lines() {
        if let Some(header) = known.iter().copied().find(|h| *h == line.trim()) {
            sections.push((header, Vec::new()));
        } else if let Some((_, body)) = sections.last_mut() {
            body.push(line);
        } else {
            preamble.push(line);
        }
    }
    if sections.is_empty() {
        return text.to_string();
    }

    let mut ordered: Vec<(&str, Vec<&str>)> = Vec::new();
    for wanted in &settings.order {
        if let Some(pos) = sections.iter().position(|(h, _)| h == wanted) {
            ordered.push(sections.remove(pos));
        }
    }
    ordered.extend(sections);

    let mut blocks: Vec<String> = Vec::new();
    let preamble = preamble.join("\n");
    if !preamble.trim().is_empty() {
        blocks.push(preamble.trim().to_string());
    }
    for (header, body) in ordered {
        if settings.hidden.iter().any(|h| h == header) {
            continue;
        }
        let mut block = header.to_string();
        for line in body.iter().filter(|l| !l.trim().is_empty()) {
            block.push('\n');
            if settings.show_averages {
                block.push_str(&with_average(line));
            } else {
                block.push_str(line);
            }
        }
        blocks.push(block);
    }
    blocks.join("\n\n").trim().to_string()
}
