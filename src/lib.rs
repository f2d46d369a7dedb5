//! Summaries for pasted Utopia game pages.
//!
//! Turns raw province logs, province news and kingdom news into a grouped,
//! totalled summary:
//! 1. Text normalization (markup, entities, whitespace, line breaks)
//! 2. Line classification against static rule tables
//! 3. Magnitude extraction into per-rule accumulators
//! 4. Deterministic rendering
//! 5. Section reordering/hiding per user settings

pub mod date;
pub mod error;
pub mod extract;
pub mod gap;
pub mod kingdom_news;
pub mod logging;
pub mod normalize;
pub mod province_logs;
pub mod province_news;
pub mod render;
pub mod report;
pub mod rules;
pub mod settings;

#[cfg(feature = "python")]
mod python;

use tracing::instrument;

pub use error::{FormatError, FormatResult};
pub use gap::{GapSink, NullSink, TracingSink};
pub use report::ReportType;
pub use settings::{apply_settings, ReportSettings, SettingsStore};

/// Run the whole pipeline on one pasted text.
///
/// Structural problems (a news page without any dated line) fail the whole
/// call; no partial summary is returned.
#[instrument(skip(raw, settings, sink), fields(input_len = raw.len()))]
pub fn format_report(
    raw: &str,
    report_type: ReportType,
    settings: &ReportSettings,
    sink: &dyn GapSink,
) -> FormatResult<String> {
    let cleaned = normalize::normalize_text(raw);
    let lines = normalize::split_lines(&cleaned);

    let rendered = match report_type {
        ReportType::ProvinceLogs => {
            province_logs::render_province_logs(&province_logs::parse_province_logs(&lines, sink))
        }
        ReportType::ProvinceNews => {
            province_news::render_province_news(&province_news::parse_province_news(&lines, sink)?)
        }
        ReportType::KingdomNews => kingdom_news::render_kingdom_news(
            &kingdom_news::parse_kingdom_news(&lines, settings.window_days, sink)?,
        ),
    };

    Ok(apply_settings(&rendered, report_type, settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_theft() {
        let raw = "<tr><td>Early indications show that our operation was a success, and our thieves were able to steal 500 gold coins from the enemy.</td></tr>";
        let out = format_report(raw, ReportType::ProvinceLogs, &ReportSettings::default(), &NullSink).unwrap();
        assert_eq!(
            out,
            "Thievery Summary\n1 Rob the Vaults for a total of 500 gold coins\n\nResources Stolen\n500 gold coins stolen"
        );
    }

    #[test]
    fn test_structural_failure_on_empty_news() {
        for report_type in [ReportType::KingdomNews, ReportType::ProvinceNews] {
            let err = format_report("", report_type, &ReportSettings::default(), &NullSink).unwrap_err();
            assert!(matches!(err, FormatError::MissingAnchor(_)), "{report_type}");
        }
    }

    #[test]
    fn test_empty_province_logs_is_empty_summary() {
        let out = format_report("", ReportType::ProvinceLogs, &ReportSettings::default(), &NullSink).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_hidden_section_via_store() {
        let raw = "March 1 of YR2\tWe have sent 1,000 gold coins to Foo (1:2)\r\n\
                   March 2 of YR2\tYour wizards gather 100 runes and begin casting. The Plague has spread to Foo (1:2).";
        let mut store = SettingsStore::default();
        store.set_visible(ReportType::ProvinceLogs, "Aid Summary", false).unwrap();

        let out = format_report(raw, ReportType::ProvinceLogs, store.get(ReportType::ProvinceLogs), &NullSink).unwrap();
        assert_eq!(out, "Spell Summary\n1 Plague");
    }

    #[test]
    fn test_averages_on_saturated_totals() {
        let gate = "Early indications show that our operation was a success.";
        let raw = format!("{gate} 18,446,744,073,709,551,615 gold coins.\n{gate} 5 gold coins.");
        let settings = ReportSettings { show_averages: true, ..ReportSettings::default() };
        let out = format_report(&raw, ReportType::ProvinceLogs, &settings, &NullSink).unwrap();
        assert_eq!(
            out,
            "Thievery Summary\n2 Rob the Vaults for a total of 18,446,744,073,709,551,615 gold coins (avg 9,223,372,036,854,775,808)"
        );
    }

    #[test]
    fn test_kingdom_news_window_from_settings() {
        let raw = "January 1 of YR3 Foo (1:2) captured 10 acres of land from Bar (3:4).\n\
                   February 1 of YR3 Foo (1:2) captured 20 acres of land from Bar (3:4).";
        let settings = ReportSettings { window_days: Some(24), ..ReportSettings::default() };
        let out = format_report(raw, ReportType::KingdomNews, &settings, &TracingSink::default()).unwrap();
        assert!(out.contains("1 Traditional March for a total of 20 acres"));
        assert!(out.starts_with("Kingdom News for (1:2) from February 1 of YR3"));
    }
}
