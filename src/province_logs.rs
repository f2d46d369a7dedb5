//! Province logs: what our province did this age.
//!
//! Each line is tried against the dragon and ritual anchors first, then the
//! thievery and spell gates. Resource thefts and aid are detected on any
//! other line.

use tracing::{debug, instrument};

use crate::date::strip_date_prefix;
use crate::extract::{extract_amount, Accumulator, ResourceTotals};
use crate::gap::GapSink;
use crate::render::{assemble, format_number, plural, resource_lines, rule_lines};
use crate::report::ReportType;
use crate::rules::{
    AID_GATE, AID_RESOURCES, DRAGON_DONATION, DRAGON_GATE, OPERATIONS, RITUAL_GATE, SPELLS,
    SPELL_GATE, STOLEN_RESOURCES, THEFT_ANCHORS, THIEVERY_GATE,
};

pub const THIEVERY_HEADER: &str = "Thievery Summary";
pub const STOLEN_HEADER: &str = "Resources Stolen";
pub const SPELL_HEADER: &str = "Spell Summary";
pub const AID_HEADER: &str = "Aid Summary";
pub const DRAGON_HEADER: &str = "Dragon Summary";
pub const RITUAL_HEADER: &str = "Ritual Summary";

pub static SECTION_HEADERS: &[&str] = &[
    THIEVERY_HEADER,
    STOLEN_HEADER,
    SPELL_HEADER,
    AID_HEADER,
    DRAGON_HEADER,
    RITUAL_HEADER,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragonTotals {
    pub gold: u64,
    pub bushels: u64,
    pub troops: u64,
    pub points: u64,
}

impl DragonTotals {
    fn record(&mut self, line: &str) {
        if line.contains(DRAGON_DONATION) {
            self.gold = self.gold.saturating_add(extract_amount(line, "gold coins").unwrap_or(0));
            self.bushels = self.bushels.saturating_add(extract_amount(line, "bushels").unwrap_or(0));
        } else {
            self.troops = self.troops.saturating_add(extract_amount(line, "troops").unwrap_or(0));
            self.points = self.points.saturating_add(extract_amount(line, "points").unwrap_or(0));
        }
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.gold > 0 {
            lines.push(format!("{} gold coins donated", format_number(self.gold)));
        }
        if self.bushels > 0 {
            lines.push(format!("{} bushels donated", format_number(self.bushels)));
        }
        if self.troops > 0 {
            lines.push(format!("{} troops sent to fight the dragon", format_number(self.troops)));
        }
        if self.points > 0 {
            lines.push(format!("{} points of damage dealt", format_number(self.points)));
        }
        lines
    }
}

/// Everything extracted from one pasted province log.
#[derive(Debug, Clone)]
pub struct ProvinceLogSummary {
    pub thievery: Accumulator,
    pub spells: Accumulator,
    pub stolen: ResourceTotals,
    pub aid: ResourceTotals,
    pub dragon: DragonTotals,
    pub ritual_casts: u64,
}

impl Default for ProvinceLogSummary {
    fn default() -> Self {
        Self {
            thievery: Accumulator::new(OPERATIONS),
            spells: Accumulator::new(SPELLS),
            stolen: ResourceTotals::new(STOLEN_RESOURCES),
            aid: ResourceTotals::new(AID_RESOURCES),
            dragon: DragonTotals::default(),
            ritual_casts: 0,
        }
    }
}

impl ProvinceLogSummary {
    /// Classify one line. Returns false when nothing claimed it.
    fn record(&mut self, text: &str) -> bool {
        if text.contains(DRAGON_GATE) {
            self.dragon.record(text);
            return true;
        }
        if text.contains(RITUAL_GATE) {
            self.ritual_casts += 1;
            return true;
        }

        let mut claimed = false;
        if THEFT_ANCHORS.iter().any(|anchor| text.contains(anchor)) {
            self.stolen.add_first(text);
            claimed = true;
        }

        // A gate whose catalog claims nothing lets the line fall through.
        if text.contains(THIEVERY_GATE) && self.thievery.record(text).is_some() {
            claimed = true;
        } else if text.contains(SPELL_GATE) && self.spells.record(text).is_some() {
            claimed = true;
        }

        if text.contains(AID_GATE) {
            self.aid.add_all(text);
            claimed = true;
        }
        claimed
    }
}

/// Extract accumulators from normalized, split province log lines.
///
/// Never fails: lines nobody claims go to `sink`.
#[instrument(skip_all, fields(lines = lines.len()))]
pub fn parse_province_logs(lines: &[&str], sink: &dyn GapSink) -> ProvinceLogSummary {
    let mut summary = ProvinceLogSummary::default();

    for line in lines {
        let (_, text) = strip_date_prefix(line);
        if text.is_empty() {
            continue;
        }
        if !summary.record(text) {
            debug!(line = text, "no rule claimed province log line");
            sink.report(line, ReportType::ProvinceLogs);
        }
    }
    summary
}

/// Render sections in fixed order, omitting empty ones.
pub fn render_province_logs(summary: &ProvinceLogSummary) -> String {
    let aid = if summary.aid.is_empty() {
        Vec::new()
    } else {
        let mut lines = vec![plural(summary.aid.shipments, "aid shipment sent", "aid shipments sent")];
        lines.extend(resource_lines(&summary.aid, "sent"));
        lines
    };
    let ritual = if summary.ritual_casts > 0 {
        vec![plural(summary.ritual_casts, "ritual cast", "ritual casts")]
    } else {
        Vec::new()
    };

    assemble(
        None,
        vec![
            (THIEVERY_HEADER, rule_lines(&summary.thievery)),
            (STOLEN_HEADER, resource_lines(&summary.stolen, "stolen")),
            (SPELL_HEADER, rule_lines(&summary.spells)),
            (AID_HEADER, aid),
            (DRAGON_HEADER, summary.dragon.lines()),
            (RITUAL_HEADER, ritual),
        ],
    )
}
