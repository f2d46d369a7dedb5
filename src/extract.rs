//! Magnitude extraction and per-rule accumulation.
//!
//! Numbers in game text carry thousands separators ("12,345 gold coins").
//! A rule's impact is the integer directly followed by its unit text, matched
//! case-insensitively.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::rules::{find_rule, Distribution, Rule, Shape};

// "<number> <words>" with the words running up to the next digit.
static NUMBER_PHRASE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d[\d,]*) ([A-Za-z][^\d]*)").unwrap());

static AMOUNT_PATTERNS: Lazy<Mutex<HashMap<String, Regex>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Strip separators and parse. `None` for empty or overflowing input.
pub fn parse_number(raw: &str) -> Option<u64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<u64>().ok()
}

fn amount_pattern(unit: &str) -> Regex {
    let mut cache = AMOUNT_PATTERNS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    cache
        .entry(unit.to_string())
        .or_insert_with(|| {
            Regex::new(&format!(r"(?i)\b(\d[\d,]*)\s+{}", regex::escape(unit)))
                .expect("escaped unit always forms a valid pattern")
        })
        .clone()
}

/// First "<number> <unit>" amount in `text`.
pub fn extract_amount(text: &str, unit: &str) -> Option<u64> {
    amount_pattern(unit)
        .captures(text)
        .and_then(|cap| cap.get(1))
        .and_then(|m| parse_number(m.as_str()))
}

/// Sum of every "<number> <unit>" amount in `text`.
pub fn sum_amounts(text: &str, unit: &str) -> u64 {
    amount_pattern(unit)
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).and_then(|m| parse_number(m.as_str())))
        .fold(0, u64::saturating_add)
}

/// Amount for a rule's unit, preferring text at or after the anchor so a
/// preamble like "gather 300 runes" does not shadow the spell's own figure.
fn rule_amount(line: &str, rule: &Rule, unit: &str) -> Option<u64> {
    line.find(rule.anchor)
        .and_then(|pos| extract_amount(&line[pos..], unit))
        .or_else(|| extract_amount(line, unit))
}

/// The sentence holding the rule's anchor, from the anchor onward.
fn anchored_clause<'a>(line: &'a str, anchor: &str) -> &'a str {
    let Some(pos) = line.find(anchor) else {
        return line;
    };
    let rest = &line[pos..];
    match rest.find(['.', '!', '?']) {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Add each "<number> <target>" amount of the rule's own clause to its
/// vocabulary bucket. `buckets` holds one slot per vocabulary term plus one
/// for the fallback.
fn distribute(line: &str, rule: &Rule, dist: &Distribution, buckets: &mut [u64]) {
    let prefix = dist.prefix.to_lowercase();

    for cap in NUMBER_PHRASE_PATTERN.captures_iter(anchored_clause(line, rule.anchor)) {
        let (Some(num), Some(tail)) = (cap.get(1), cap.get(2)) else {
            continue;
        };
        let Some(value) = parse_number(num.as_str()) else {
            continue;
        };
        let tail = tail.as_str().to_lowercase();
        let target = if prefix.is_empty() {
            tail.as_str()
        } else {
            match tail.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.trim_start(),
                None => continue,
            }
        };

        let slot = dist
            .vocabulary
            .iter()
            .position(|term| target.starts_with(&term.to_lowercase()))
            .or_else(|| dist.fallback.map(|_| dist.vocabulary.len()));
        if let Some(slot) = slot {
            buckets[slot] = buckets[slot].saturating_add(value);
        }
    }
}

/// Running totals for one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub count: u64,
    /// Summed magnitude; for distribution rules, the sum of all buckets.
    pub impact: u64,
    /// Distribution buckets, vocabulary order then fallback. Empty otherwise.
    pub buckets: Vec<u64>,
}

/// One tally per rule of a catalog, seeded to zero.
#[derive(Debug, Clone)]
pub struct Accumulator {
    rules: &'static [Rule],
    tallies: Vec<Tally>,
}

impl Accumulator {
    pub fn new(rules: &'static [Rule]) -> Self {
        let tallies = rules
            .iter()
            .map(|rule| match &rule.shape {
                Shape::Distribution(dist) => Tally {
                    buckets: vec![0; dist.vocabulary.len() + 1],
                    ..Tally::default()
                },
                _ => Tally::default(),
            })
            .collect();
        Self { rules, tallies }
    }

    /// Match `line` against the catalog and record it under the first rule
    /// claiming it. Returns that rule's name.
    pub fn record(&mut self, line: &str) -> Option<&'static str> {
        let (idx, rule) = find_rule(self.rules, line)?;
        let tally = &mut self.tallies[idx];
        tally.count += 1;

        match &rule.shape {
            Shape::Distribution(dist) => {
                distribute(line, rule, dist, &mut tally.buckets);
                tally.impact = tally.buckets.iter().fold(0, |a, b| a.saturating_add(*b));
            }
            Shape::Tally { .. } => {}
            Shape::Generic | Shape::Qualified(_) => {
                if let Some(amount) = rule.unit.and_then(|unit| rule_amount(line, rule, unit)) {
                    tally.impact = tally.impact.saturating_add(amount);
                }
            }
        }
        Some(rule.name)
    }

    pub fn get(&self, name: &str) -> Option<&Tally> {
        self.rules
            .iter()
            .position(|rule| rule.name == name)
            .map(|idx| &self.tallies[idx])
    }

    /// Rules with their tallies, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static Rule, &Tally)> {
        self.rules.iter().zip(self.tallies.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.iter().all(|t| t.count == 0)
    }
}

/// Totals per resource name, for aid and theft sections.
#[derive(Debug, Clone)]
pub struct ResourceTotals {
    names: &'static [&'static str],
    amounts: Vec<u64>,
    /// Lines contributing to these totals.
    pub shipments: u64,
}

impl ResourceTotals {
    pub fn new(names: &'static [&'static str]) -> Self {
        Self {
            names,
            amounts: vec![0; names.len()],
            shipments: 0,
        }
    }

    /// Add every listed resource found on the line.
    pub fn add_all(&mut self, line: &str) {
        for (name, amount) in self.names.iter().zip(self.amounts.iter_mut()) {
            *amount = amount.saturating_add(sum_amounts(line, name));
        }
        self.shipments += 1;
    }

    /// Add only the first resource (in priority order) named on the line.
    pub fn add_first(&mut self, line: &str) {
        let Some(idx) = self.names.iter().position(|name| line.contains(name)) else {
            return;
        };
        if let Some(value) = extract_amount(line, self.names[idx]) {
            self.amounts[idx] = self.amounts[idx].saturating_add(value);
        }
        self.shipments += 1;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.names
            .iter()
            .position(|n| *n == name)
            .map_or(0, |idx| self.amounts[idx])
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.names.iter().copied().zip(self.amounts.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.shipments == 0 && self.amounts.iter().all(|a| *a == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{AID_RESOURCES, BUILDINGS, OPERATIONS, SPELLS, STOLEN_RESOURCES};

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12,345"), Some(12345));
        assert_eq!(parse_number("7"), Some(7));
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_extract_amount_case_insensitive() {
        assert_eq!(extract_amount("We have sent 1,234 Gold Coins", "gold coins"), Some(1234));
        assert_eq!(extract_amount("storms for 7 days", "day"), Some(7));
        assert_eq!(extract_amount("no figures here", "day"), None);
    }

    #[test]
    fn test_sum_amounts() {
        assert_eq!(sum_amounts("sent 100 runes and then 250 runes", "runes"), 350);
    }

    #[test]
    fn test_seeded_to_zero() {
        let acc = Accumulator::new(SPELLS);
        assert_eq!(acc.entries().count(), SPELLS.len());
        assert!(acc.is_empty());
        assert_eq!(acc.get("Storms"), Some(&Tally::default()));
    }

    #[test]
    fn test_generic_rule_prefers_text_after_anchor() {
        let mut acc = Accumulator::new(SPELLS);
        let name = acc.record(
            "Your wizards gather 300 runes and begin casting. Lightning strikes the Towers in Foo (1:2) and incinerates 1,500 runes!",
        );
        assert_eq!(name, Some("Lightning Strike"));
        assert_eq!(acc.get("Lightning Strike").unwrap().impact, 1500);
    }

    #[test]
    fn test_miss_still_counts() {
        let mut acc = Accumulator::new(SPELLS);
        acc.record("Your wizards begin casting. Storms ravage the lands of Foo (1:2)!");
        let storms = acc.get("Storms").unwrap();
        assert_eq!(storms.count, 1);
        assert_eq!(storms.impact, 0);
    }

    #[test]
    fn test_distribution_buildings() {
        let mut acc = Accumulator::new(OPERATIONS);
        acc.record(
            "Early indications show that our operation was a success. Our thieves destroyed 50 acres of Farms and 20 acres of Mills.",
        );
        let arson = acc.get("Greater Arson").unwrap();
        assert_eq!(arson.count, 1);
        assert_eq!(arson.buckets[1], 50);
        assert_eq!(arson.buckets[2], 20);
        assert_eq!(arson.impact, 70);
    }

    #[test]
    fn test_distribution_troops_fallback() {
        let mut acc = Accumulator::new(OPERATIONS);
        acc.record(
            "Our thieves assassinated 50 soldiers, 30 offensive specialists and 12 Elf Lords of Foo (3:4)!",
        );
        let strike = acc.get("Night Strike").unwrap();
        assert_eq!(strike.buckets, vec![50, 30, 0, 12]);
        assert_eq!(strike.impact, 92);
    }

    #[test]
    fn test_fallback_ignores_figures_outside_the_clause() {
        let mut acc = Accumulator::new(OPERATIONS);
        acc.record(
            "Early indications show that our operation was a success. Our thieves assassinated 40 soldiers. We lost 3 thieves in the operation.",
        );
        let strike = acc.get("Night Strike").unwrap();
        assert_eq!(strike.buckets, vec![40, 0, 0, 0]);
        assert_eq!(strike.impact, 40);
    }

    #[test]
    fn test_unknown_building_goes_to_other() {
        let mut acc = Accumulator::new(OPERATIONS);
        acc.record("Our thieves destroyed 30 acres of Ruins and 10 acres of Homes. We lost 4 thieves.");
        let arson = acc.get("Greater Arson").unwrap();
        assert_eq!(arson.buckets[0], 10);
        assert_eq!(arson.buckets[BUILDINGS.len()], 30);
        assert_eq!(arson.impact, 40);
    }

    #[test]
    fn test_shared_anchor_counts_once() {
        let mut acc = Accumulator::new(OPERATIONS);
        assert_eq!(acc.record("Our thieves assassinated 50 soldiers of Foo (3:4)!"), Some("Night Strike"));
        assert_eq!(acc.record("Our thieves assassinated 25 wizards of Foo (3:4)!"), Some("Assassinate Wizards"));

        let strike = acc.get("Night Strike").unwrap();
        let wizards = acc.get("Assassinate Wizards").unwrap();
        assert_eq!((strike.count, strike.impact), (1, 50));
        assert_eq!((wizards.count, wizards.impact), (1, 25));
        assert_eq!(strike.buckets.iter().sum::<u64>(), 50);
    }

    #[test]
    fn test_tally_rule_has_no_impact() {
        let mut acc = Accumulator::new(OPERATIONS);
        acc.record("Our thieves have bribed an enemy general for 5,000 gold");
        let bribe = acc.get("Bribe Generals").unwrap();
        assert_eq!((bribe.count, bribe.impact), (1, 0));
    }

    #[test]
    fn test_first_resource_only() {
        let mut stolen = ResourceTotals::new(STOLEN_RESOURCES);
        stolen.add_first("our thieves were able to steal 500 gold coins and 20 runes");
        assert_eq!(stolen.get("gold coins"), 500);
        assert_eq!(stolen.get("runes"), 0);
    }

    #[test]
    fn test_add_all_resources() {
        let mut aid = ResourceTotals::new(AID_RESOURCES);
        aid.add_all("We have sent 1,234 gold coins and 5,000 bushels to Foo (1:2)");
        assert_eq!(aid.get("gold coins"), 1234);
        assert_eq!(aid.get("bushels"), 5000);
        assert_eq!(aid.shipments, 1);
    }
}
