//! Shared summary formatting: number grouping, unit display, rule sections.

use std::cmp::Reverse;

use crate::extract::{Accumulator, ResourceTotals};
use crate::rules::Shape;

/// Format an integer with thousands separators: 1234567 -> "1,234,567".
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Unit label as shown to the reader.
pub fn display_unit(unit: &str, total: u64) -> &str {
    match unit {
        "day" if total > 1 => "days",
        "of the men in the armies" => "troops",
        _ => unit,
    }
}

/// "1 ritual cast" / "3 ritual casts".
pub fn plural(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{} {plural}", format_number(count))
    }
}

/// Render every non-zero rule of `acc`, by descending count. Ties keep
/// catalog order.
pub fn rule_lines(acc: &Accumulator) -> Vec<String> {
    let mut entries: Vec<_> = acc.entries().filter(|(_, t)| t.count > 0).collect();
    entries.sort_by_key(|(_, tally)| Reverse(tally.count));

    let mut lines = Vec::new();
    for (rule, tally) in entries {
        let count = format_number(tally.count);
        match &rule.shape {
            Shape::Tally { phrase } => lines.push(format!("{phrase}: {count}")),
            Shape::Distribution(dist) => {
                let labels = dist.vocabulary.iter().copied().chain(dist.fallback);
                let mut buckets: Vec<(&str, u64)> = labels
                    .zip(tally.buckets.iter().copied())
                    .filter(|(_, amount)| *amount > 0)
                    .collect();
                if buckets.is_empty() {
                    lines.push(format!("{count} {}", rule.name));
                    continue;
                }
                buckets.sort_by_key(|(_, amount)| Reverse(*amount));

                lines.push(format!("{count} {}:", rule.name));

                for (label, amount) in buckets {
                    if dist.prefix.is_empty() {
                        lines.push(format!("    {} {label}", format_number(amount)));
                    } else {
                        lines.push(format!("    {} {} {label}", format_number(amount), dist.prefix));
                    }
                }
            }
            Shape::Generic | Shape::Qualified(_) => match rule.unit {
                Some(unit) if tally.impact > 0 => lines.push(format!(
                    "{count} {} for a total of {} {}",
                    rule.name,
                    format_number(tally.impact),
                    display_unit(unit, tally.impact)
                )),
                _ => lines.push(format!("{count} {}", rule.name)),
            },
        }
    }
    lines
}

/// "<amount> <resource> <verb>" for every non-zero resource.
pub fn resource_lines(totals: &ResourceTotals, verb: &str) -> Vec<String> {
    totals
        .entries()
        .filter(|(_, amount)| *amount > 0)
        .map(|(name, amount)| format!("{} {name} {verb}", format_number(amount)))
        .collect()
}

/// Join a title and non-empty sections into the final text.
pub fn assemble(title: Option<String>, sections: Vec<(&str, Vec<String>)>) -> String {
    let mut blocks: Vec<String> = Vec::new();
    if let Some(title) = title {
        blocks.push(title);
    }
    for (header, lines) in sections {
        if lines.is_empty() {
            continue;
        }
        let mut block = String::from(header);
        for line in lines {
            block.push('\n');
            block.push_str(&line);
        }
        blocks.push(block);
    }
    blocks.join("\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{OPERATIONS, SPELLS};

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_day_pluralization() {
        assert_eq!(display_unit("day", 1), "day");
        assert_eq!(display_unit("day", 2), "days");
        assert_eq!(display_unit("of the men in the armies", 300), "troops");
        assert_eq!(display_unit("acres", 1), "acres");
    }

    #[test]
    fn test_single_day_total() {
        let mut acc = Accumulator::new(SPELLS);
        acc.record("Your wizards begin casting. Storms ravage the lands of Foo (1:2) for 1 day!");
        assert_eq!(rule_lines(&acc), vec!["1 Storms for a total of 1 day"]);

        acc.record("Your wizards begin casting. Storms ravage the lands of Foo (1:2) for 6 days!");
        assert_eq!(rule_lines(&acc), vec!["2 Storms for a total of 7 days"]);
    }

    #[test]
    fn test_zero_counts_omitted_and_stable_ties() {
        let mut acc = Accumulator::new(SPELLS);
        // Vermin is declared after Drought; cast it first to check tie order.
        acc.record("begin casting. Vermin will feast on Foo (1:2) for 4 days");
        acc.record("begin casting. A drought reigns over Foo (1:2) for 5 days");
        let lines = rule_lines(&acc);
        assert_eq!(
            lines,
            vec![
                "1 Drought for a total of 5 days",
                "1 Vermin for a total of 4 days",
            ]
        );
    }

    #[test]
    fn test_sorted_by_count() {
        let mut acc = Accumulator::new(SPELLS);
        acc.record("begin casting. A drought reigns for 5 days");
        acc.record("begin casting. The Plague has spread");
        acc.record("begin casting. The Plague has spread");
        let lines = rule_lines(&acc);
        assert_eq!(lines[0], "2 Plague");
        assert_eq!(lines[1], "1 Drought for a total of 5 days");
    }

    #[test]
    fn test_distribution_rendering() {
        let mut acc = Accumulator::new(OPERATIONS);
        acc.record("Our thieves destroyed 20 acres of Mills and 50 acres of Farms");
        assert_eq!(
            rule_lines(&acc),
            vec![
                "1 Greater Arson:",
                "    50 acres of Farms",
                "    20 acres of Mills",
            ]
        );
    }

    #[test]
    fn test_distribution_without_amounts_has_no_bare_header() {
        let mut acc = Accumulator::new(OPERATIONS);
        acc.record("Our thieves destroyed the enemy's stores");
        acc.record("Our thieves destroyed 15 acres of Ruins");
        assert_eq!(
            rule_lines(&acc),
            vec!["2 Greater Arson:", "    15 acres of other buildings"]
        );

        let mut acc = Accumulator::new(OPERATIONS);
        acc.record("Our thieves destroyed the enemy's stores");
        assert_eq!(rule_lines(&acc), vec!["1 Greater Arson"]);
    }

    #[test]
    fn test_tally_rendering() {
        let mut acc = Accumulator::new(OPERATIONS);
        acc.record("Our thieves have bribed members of the thieves' guild");
        acc.record("Our thieves have bribed members of the thieves' guild");
        assert_eq!(rule_lines(&acc), vec!["Thieves' guilds bribed: 2"]);
    }

    #[test]
    fn test_assemble_skips_empty_sections() {
        let text = assemble(
            Some("Title".to_string()),
            vec![("Empty", vec![]), ("Full", vec!["1 thing".to_string()])],
        );
        assert_eq!(text, "Title\n\nFull\n1 thing");
    }
}
