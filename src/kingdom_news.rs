//! Kingdom news: attacks between our kingdom and everyone else.
//!
//! Every attack line names two provinces with kingdom coordinates, attacker
//! first: "Foo (1:2) captured 45 acres of land from Bar (3:4)."

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::date::{strip_date_prefix, GameDate};
use crate::error::{FormatError, FormatResult};
use crate::extract::{extract_amount, parse_number, Accumulator};
use crate::gap::GapSink;
use crate::render::{assemble, format_number, plural, rule_lines};
use crate::report::ReportType;
use crate::rules::{find_rule, KINGDOM_ATTACKS};

static COORDINATE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d{1,2}):(\d{1,2})\)").unwrap());

pub const MADE_HEADER: &str = "Attacks Made";
pub const SUFFERED_HEADER: &str = "Attacks Suffered";
pub const TOP_HEADER: &str = "Top Attackers";

pub static SECTION_HEADERS: &[&str] = &[MADE_HEADER, SUFFERED_HEADER, TOP_HEADER];

/// Kingdom coordinates, "(kingdom:island)".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub kingdom: u32,
    pub island: u32,
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}:{})", self.kingdom, self.island)
    }
}

#[derive(Debug, Clone)]
struct AttackEvent<'a> {
    date: Option<GameDate>,
    text: &'a str,
    attacker: &'a str,
    from: Coordinate,
    to: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackerStats {
    /// Province name with its coordinate.
    pub name: String,
    pub attacks: u64,
    pub acres: u64,
}

#[derive(Debug, Clone)]
pub struct KingdomNewsSummary {
    pub home: Option<Coordinate>,
    pub first: GameDate,
    pub last: GameDate,
    pub made: Accumulator,
    pub suffered: Accumulator,
    /// Home attackers in first-seen order.
    pub attackers: Vec<AttackerStats>,
}

fn parse_event<'a>(date: Option<GameDate>, text: &'a str) -> Option<AttackEvent<'a>> {
    find_rule(KINGDOM_ATTACKS, text)?;

    let mut coords = COORDINATE_PATTERN.captures_iter(text);
    let first = coords.next()?;
    let second = coords.next()?;
    let coordinate = |cap: &regex::Captures| -> Option<Coordinate> {
        Some(Coordinate {
            kingdom: parse_number(cap.get(1)?.as_str())? as u32,
            island: parse_number(cap.get(2)?.as_str())? as u32,
        })
    };

    let start = first.get(0)?.start();
    Some(AttackEvent {
        date,
        text,
        attacker: text[..start].trim(),
        from: coordinate(&first)?,
        to: coordinate(&second)?,
    })
}

/// The coordinate named most often; ties go to the one seen first.
fn home_kingdom(events: &[AttackEvent<'_>]) -> Option<Coordinate> {
    let mut counts: Vec<(Coordinate, usize)> = Vec::new();
    for event in events {
        for coord in [event.from, event.to] {
            match counts.iter_mut().find(|(c, _)| *c == coord) {
                Some((_, n)) => *n += 1,
                None => counts.push((coord, 1)),
            }
        }
    }
    let best = counts.iter().map(|(_, n)| *n).max()?;
    counts.into_iter().find(|(_, n)| *n == best).map(|(c, _)| c)
}

/// Extract kingdom news.
///
/// Fails when no line carries a game date. With `window_days`, only events
/// dated within that many days of the latest date are kept.
#[instrument(skip_all, fields(lines = lines.len(), window_days = ?window_days))]
pub fn parse_kingdom_news(
    lines: &[&str],
    window_days: Option<u32>,
    sink: &dyn GapSink,
) -> FormatResult<KingdomNewsSummary> {
    let mut current: Option<GameDate> = None;
    let mut latest: Option<GameDate> = None;
    let mut events = Vec::new();

    for line in lines {
        let (date, text) = strip_date_prefix(line);
        if date.is_some() {
            current = date;
            latest = latest.max(date);
        }
        if text.is_empty() {
            continue;
        }
        match parse_event(current, text) {
            Some(event) => events.push(event),
            None => {
                debug!(line = text, "no rule claimed kingdom news line");
                sink.report(line, ReportType::KingdomNews);
            }
        }
    }

    let latest = latest
        .ok_or_else(|| FormatError::missing_anchor("kingdom news needs at least one dated line"))?;

    if let Some(window) = window_days {
        let cutoff = latest.day_index().saturating_sub(window.saturating_sub(1));
        events.retain(|event| event.date.is_some_and(|d| d.day_index() >= cutoff));
    }

    let dates = events.iter().filter_map(|e| e.date);
    let first = dates.clone().min().unwrap_or(latest);
    let last = dates.max().unwrap_or(latest);

    let home = home_kingdom(&events);
    let mut made = Accumulator::new(KINGDOM_ATTACKS);
    let mut suffered = Accumulator::new(KINGDOM_ATTACKS);
    let mut attackers: Vec<AttackerStats> = Vec::new();

    for event in &events {
        if Some(event.from) == home {
            made.record(event.text);

            let name = format!("{} {}", event.attacker, event.from);
            let acres = extract_amount(event.text, "acres").unwrap_or(0);
            match attackers.iter_mut().find(|a| a.name == name) {
                Some(stats) => {
                    stats.attacks += 1;
                    stats.acres = stats.acres.saturating_add(acres);
                }
                None => attackers.push(AttackerStats { name, attacks: 1, acres }),
            }
        } else if Some(event.to) == home {
            suffered.record(event.text);
        }
    }

    Ok(KingdomNewsSummary { home, first, last, made, suffered, attackers })
}

pub fn render_kingdom_news(summary: &KingdomNewsSummary) -> String {
    let title = match summary.home {
        Some(home) => format!("Kingdom News for {home} from {} to {}", summary.first, summary.last),
        None => format!("Kingdom News from {} to {}", summary.first, summary.last),
    };

    let mut ranked: Vec<&AttackerStats> = summary.attackers.iter().collect();
    ranked.sort_by(|a, b| b.acres.cmp(&a.acres));
    let top = ranked
        .into_iter()
        .map(|stats| {
            format!(
                "{}: {}, {} acres",
                stats.name,
                plural(stats.attacks, "attack", "attacks"),
                format_number(stats.acres)
            )
        })
        .collect();

    assemble(
        Some(title),
        vec![
            (MADE_HEADER, rule_lines(&summary.made)),
            (SUFFERED_HEADER, rule_lines(&summary.suffered)),
            (TOP_HEADER, top),
        ],
    )
}
