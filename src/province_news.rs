//! Province news: what other provinces did to us.

use tracing::{debug, instrument};

use crate::date::{strip_date_prefix, GameDate};
use crate::error::{FormatError, FormatResult};
use crate::extract::{Accumulator, ResourceTotals};
use crate::gap::GapSink;
use crate::render::{assemble, plural, resource_lines, rule_lines};
use crate::report::ReportType;
use crate::rules::{
    AID_RESOURCES, NEWS_AID_GATE, NEWS_ATTACKS, NEWS_ATTACK_GATE, NEWS_SPELLS, NEWS_THIEVERY,
};

pub const ATTACKS_HEADER: &str = "Attacks Received";
pub const AID_HEADER: &str = "Aid Received";
pub const THIEVERY_HEADER: &str = "Enemy Thievery";
pub const SPELLS_HEADER: &str = "Enemy Spells";

pub static SECTION_HEADERS: &[&str] = &[ATTACKS_HEADER, AID_HEADER, THIEVERY_HEADER, SPELLS_HEADER];

#[derive(Debug, Clone)]
pub struct ProvinceNewsSummary {
    pub first: GameDate,
    pub last: GameDate,
    pub attacks: Accumulator,
    pub aid: ResourceTotals,
    pub thievery: Accumulator,
    pub spells: Accumulator,
}

impl ProvinceNewsSummary {
    fn new(first: GameDate) -> Self {
        Self {
            first,
            last: first,
            attacks: Accumulator::new(NEWS_ATTACKS),
            aid: ResourceTotals::new(AID_RESOURCES),
            thievery: Accumulator::new(NEWS_THIEVERY),
            spells: Accumulator::new(NEWS_SPELLS),
        }
    }

    fn record(&mut self, text: &str) -> bool {
        if text.contains(NEWS_ATTACK_GATE) {
            return self.attacks.record(text).is_some();
        }
        if text.contains(NEWS_AID_GATE) {
            self.aid.add_all(text);
            return true;
        }
        self.thievery.record(text).is_some() || self.spells.record(text).is_some()
    }
}

/// Extract province news. Fails when no line carries a game date.
#[instrument(skip_all, fields(lines = lines.len()))]
pub fn parse_province_news(lines: &[&str], sink: &dyn GapSink) -> FormatResult<ProvinceNewsSummary> {
    let mut summary: Option<ProvinceNewsSummary> = None;
    let mut pending: Vec<&str> = Vec::new();

    for line in lines {
        let (date, text) = strip_date_prefix(line);
        if let Some(date) = date {
            let summary = summary.get_or_insert_with(|| ProvinceNewsSummary::new(date));
            summary.first = summary.first.min(date);
            summary.last = summary.last.max(date);
        }
        if text.is_empty() {
            continue;
        }
        match summary.as_mut() {
            Some(summary) => {
                if !summary.record(text) {
                    debug!(line = text, "no rule claimed province news line");
                    sink.report(line, ReportType::ProvinceNews);
                }
            }
            // Lines above the first date still count once a date shows up.
            None => pending.push(line),
        }
    }

    let mut summary = summary
        .ok_or_else(|| FormatError::missing_anchor("province news needs at least one dated line"))?;
    for line in pending {
        if !summary.record(line) {
            sink.report(line, ReportType::ProvinceNews);
        }
    }
    Ok(summary)
}

pub fn render_province_news(summary: &ProvinceNewsSummary) -> String {
    let aid = if summary.aid.is_empty() {
        Vec::new()
    } else {
        let mut lines = vec![plural(
            summary.aid.shipments,
            "aid shipment received",
            "aid shipments received",
        )];
        lines.extend(resource_lines(&summary.aid, "received"));
        lines
    };

    assemble(
        Some(format!("Province News from {} to {}", summary.first, summary.last)),
        vec![
            (ATTACKS_HEADER, rule_lines(&summary.attacks)),
            (AID_HEADER, aid),
            (THIEVERY_HEADER, rule_lines(&summary.thievery)),
            (SPELLS_HEADER, rule_lines(&summary.spells)),
        ],
    )
}
