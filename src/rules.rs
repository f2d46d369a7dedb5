//! Rule tables — the anchor phrases and impact units behind every summary.
//!
//! Catalogs are plain static data. Declaration order matters twice: the first
//! rule claiming a line wins, and rendering breaks count ties by position.

// ── Rule record ─────────────────────────────────────────────────────

/// One entry of a rule catalog.
#[derive(Debug)]
pub struct Rule {
    /// Canonical name shown in the summary.
    pub name: &'static str,
    /// Case-sensitive substring identifying the rule inside its category.
    pub anchor: &'static str,
    /// Noun phrase following the magnitude, e.g. "gold coins".
    pub unit: Option<&'static str>,
    pub shape: Shape,
}

/// How a matched line contributes to its rule's accumulator.
#[derive(Debug)]
pub enum Shape {
    /// One occurrence plus an optional single magnitude.
    Generic,
    /// Like `Generic`, but the rule only claims lines passing the qualifier.
    Qualified(Qualifier),
    /// Magnitudes are split across a closed vocabulary of targets.
    Distribution(Distribution),
    /// Occurrences only; rendered as a fixed phrase with the count.
    Tally { phrase: &'static str },
}

/// Extra word test for rules that share an anchor with another rule.
#[derive(Debug)]
pub enum Qualifier {
    Requires(&'static str),
}

impl Qualifier {
    pub fn holds(&self, line: &str) -> bool {
        match self {
            Qualifier::Requires(word) => line.contains(word),
        }
    }
}

#[derive(Debug)]
pub struct Distribution {
    pub vocabulary: &'static [&'static str],
    /// Words between the number and the vocabulary term ("acres of").
    pub prefix: &'static str,
    /// Bucket for amounts naming no vocabulary term.
    pub fallback: Option<&'static str>,
}

impl Rule {
    const fn generic(name: &'static str, anchor: &'static str, unit: Option<&'static str>) -> Self {
        Rule { name, anchor, unit, shape: Shape::Generic }
    }
}

// ── Closed vocabularies ─────────────────────────────────────────────

pub const BUILDINGS: &[&str] = &[
    "Homes", "Farms", "Mills", "Banks", "Training Grounds", "Armouries",
    "Military Barracks", "Forts", "Guard Stations", "Hospitals", "Guilds",
    "Towers", "Thieves' Dens", "Watch Towers", "Libraries", "Schools",
    "Stables", "Dungeons",
];

/// Race-neutral troop names. Elite units are named per race, so anything
/// else lands in the "elites" fallback bucket.
pub const TROOP_TYPES: &[&str] = &[
    "soldiers", "offensive specialists", "defensive specialists",
];

// ── Province logs: spells ───────────────────────────────────────────

pub const SPELL_GATE: &str = "begin casting";

pub static SPELLS: &[Rule] = &[
    // Self spells
    Rule::generic("Minor Protection", "sphere of protection", Some("day")),
    Rule::generic("Greater Protection", "greater protection", Some("day")),
    Rule::generic("Magic Shield", "magic shield", Some("day")),
    Rule::generic("Fertile Lands", "fertile", Some("day")),
    Rule::generic("Nature's Blessing", "Nature's Blessing", Some("day")),
    Rule::generic("Fool's Gold", "Fool's Gold", Some("day")),
    Rule::generic("Paradise", "Paradise", Some("acres")),
    // Offensive spells
    Rule::generic("Storms", "Storms ravage", Some("day")),
    Rule::generic("Drought", "A drought", Some("day")),
    Rule::generic("Vermin", "Vermin", Some("day")),
    Rule::generic("Gluttony", "gluttony", Some("day")),
    Rule::generic("Greed", "greed", Some("day")),
    Rule::generic("Pitfalls", "pitfalls", Some("day")),
    Rule::generic("Chastity", "chastity", Some("day")),
    Rule::generic("Explosions", "Explosions", Some("day")),
    Rule::generic("Meteor Showers", "Meteors", Some("day")),
    Rule::generic("Plague", "Plague has spread", None),
    Rule::generic("Fireball", "fireball", Some("peasants")),
    Rule::generic("Lightning Strike", "Lightning strikes", Some("runes")),
    Rule::generic("Tornadoes", "Tornadoes", Some("buildings")),
    Rule::generic("Land Lust", "Land Lust", Some("acres")),
    Rule::generic("Nightmare", "nightmares", Some("of the men in the armies")),
    Rule::generic("Amnesia", "forgotten", Some("books of knowledge")),
    Rule::generic("Mystic Vortex", "vortex", Some("active spells")),
    Rule::generic("Expose Thieves", "exposed", Some("thieves")),
];

// ── Province logs: thievery ─────────────────────────────────────────

pub const THIEVERY_GATE: &str = "Early indications show that our operation was a success";

pub static OPERATIONS: &[Rule] = &[
    Rule::generic("Rob the Vaults", "gold coins", Some("gold coins")),
    Rule::generic("Rob the Granaries", "bushels", Some("bushels")),
    Rule::generic("Rob the Towers", "runes", Some("runes")),
    Rule::generic("Steal War Horses", "war horses", Some("war horses")),
    Rule::generic("Kidnapping", "kidnapped", Some("peasants")),
    Rule {
        name: "Assassinate Wizards",
        anchor: "assassinated",
        unit: Some("wizards"),
        shape: Shape::Qualified(Qualifier::Requires("wizards")),
    },
    Rule {
        name: "Night Strike",
        anchor: "assassinated",
        unit: None,
        shape: Shape::Distribution(Distribution {
            vocabulary: TROOP_TYPES,
            prefix: "",
            fallback: Some("elites"),
        }),
    },
    Rule {
        name: "Greater Arson",
        anchor: "destroyed",
        unit: Some("acres"),
        shape: Shape::Distribution(Distribution {
            vocabulary: BUILDINGS,
            prefix: "acres of",
            fallback: Some("other buildings"),
        }),
    },
    Rule::generic("Arson", "burned down", Some("acres")),
    Rule::generic("Free Prisoners", "freed", Some("prisoners")),
    Rule::generic("Propaganda", "converted", None),
    Rule::generic("Incite Riots", "riots", Some("day")),
    Rule {
        name: "Bribe Generals",
        anchor: "bribed an enemy general",
        unit: None,
        shape: Shape::Tally { phrase: "Generals bribed" },
    },
    Rule {
        name: "Bribe Thieves",
        anchor: "bribed members of",
        unit: None,
        shape: Shape::Tally { phrase: "Thieves' guilds bribed" },
    },
];

// ── Province logs: resources, aid, dragon, ritual ───────────────────

/// Either phrase marks a resource theft, whatever category claimed the line.
pub static THEFT_ANCHORS: &[&str] = &["thieves were able to steal", "thieves have returned with"];

/// Priority order: only the first resource present on a line is extracted.
pub static STOLEN_RESOURCES: &[&str] = &["gold coins", "bushels", "runes", "war horses"];

pub const AID_GATE: &str = "We have sent";

pub static AID_RESOURCES: &[&str] = &["gold coins", "bushels", "runes", "soldiers"];

pub const DRAGON_GATE: &str = "the dragon";
pub const DRAGON_DONATION: &str = "donated";

pub const RITUAL_GATE: &str = "the ritual";

// ── Province news ───────────────────────────────────────────────────

pub const NEWS_ATTACK_GATE: &str = "Forces from";

pub static NEWS_ATTACKS: &[Rule] = &[
    Rule::generic("Traditional March", "invaded our lands", Some("acres")),
    Rule::generic("Ambush", "ambushed our armies", Some("acres")),
    Rule::generic("Raze", "razed", Some("acres")),
    Rule::generic("Massacre", "massacred", Some("people")),
    Rule::generic("Plunder", "plundered", None),
    Rule {
        name: "Repelled Attack",
        anchor: "were repelled",
        unit: None,
        shape: Shape::Tally { phrase: "Attacks repelled" },
    },
];

pub const NEWS_AID_GATE: &str = "We have received a shipment of";

pub static NEWS_THIEVERY: &[Rule] = &[
    Rule::generic("Rob the Vaults", "stolen from our coffers", Some("gold coins")),
    Rule::generic("Rob the Granaries", "stolen from our granaries", Some("bushels")),
    Rule::generic("Rob the Towers", "stolen from our towers", Some("runes")),
    Rule::generic("Arson", "burned to the ground", Some("acres")),
    Rule::generic("Kidnapping", "were kidnapped", Some("peasants")),
    Rule::generic("Assassinate Wizards", "wizards were assassinated", Some("wizards")),
    Rule::generic("Night Strike", "killed in their sleep", Some("troops")),
    Rule {
        name: "Incite Riots",
        anchor: "Riots have broken out",
        unit: None,
        shape: Shape::Tally { phrase: "Riots incited" },
    },
    Rule {
        name: "Thieves Caught",
        anchor: "We caught thieves",
        unit: None,
        shape: Shape::Tally { phrase: "Enemy thieves caught" },
    },
];

pub static NEWS_SPELLS: &[Rule] = &[
    Rule::generic("Storms", "Storms have begun", Some("day")),
    Rule::generic("Drought", "drought", Some("day")),
    Rule::generic("Vermin", "Vermin", Some("day")),
    Rule::generic("Gluttony", "gluttony", Some("day")),
    Rule::generic("Greed", "greed", Some("day")),
    Rule::generic("Pitfalls", "pitfalls", Some("day")),
    Rule::generic("Fireball", "fireball", Some("peasants")),
    Rule::generic("Lightning Strike", "Lightning", Some("runes")),
    Rule::generic("Tornadoes", "Tornadoes", Some("buildings")),
    Rule::generic("Land Lust", "Land Lust", Some("acres")),
    Rule::generic("Nightmare", "nightmares", Some("of the men in the armies")),
    Rule::generic("Amnesia", "forgotten", Some("books of knowledge")),
    Rule::generic("Mystic Vortex", "vortex", Some("active spells")),
    Rule::generic("Meteor Showers", "Meteors", Some("day")),
];

// ── Kingdom news ────────────────────────────────────────────────────

pub static KINGDOM_ATTACKS: &[Rule] = &[
    Rule::generic("Ambush", " recaptured ", Some("acres")),
    Rule::generic("Traditional March", " captured ", Some("acres")),
    Rule::generic("Raze", " razed ", Some("acres")),
    Rule::generic("Massacre", " killed ", Some("people")),
    Rule::generic("Plunder", " plundered ", None),
    Rule::generic("Failed Attack", " attempted an invasion of ", None),
];

/// Find the first rule in `catalog` claiming `line`.
pub fn find_rule(catalog: &'static [Rule], line: &str) -> Option<(usize, &'static Rule)> {
    catalog.iter().enumerate().find(|(_, rule)| {
        line.contains(rule.anchor)
            && match &rule.shape {
                Shape::Qualified(qualifier) => qualifier.holds(line),
                _ => true,
            }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_unique_names(catalog: &[Rule]) {
        let mut seen = HashSet::new();
        for rule in catalog {
            assert!(seen.insert(rule.name), "duplicate rule {}", rule.name);
            assert!(!rule.anchor.is_empty(), "empty anchor for {}", rule.name);
        }
    }

    #[test]
    fn test_catalog_names_unique() {
        for catalog in [SPELLS, OPERATIONS, NEWS_ATTACKS, NEWS_THIEVERY, NEWS_SPELLS, KINGDOM_ATTACKS] {
            assert_unique_names(catalog);
        }
    }

    #[test]
    fn test_qualifier_disambiguates_shared_anchor() {
        let (_, rule) = find_rule(OPERATIONS, "Our thieves assassinated 40 wizards of the enemy's guilds!").unwrap();
        assert_eq!(rule.name, "Assassinate Wizards");

        let (_, rule) = find_rule(OPERATIONS, "Our thieves assassinated 50 soldiers of the enemy!").unwrap();
        assert_eq!(rule.name, "Night Strike");
    }

    #[test]
    fn test_recapture_is_not_a_march() {
        let (_, rule) = find_rule(KINGDOM_ATTACKS, "Foo (1:2) recaptured 30 acres of land from Bar (3:4).").unwrap();
        assert_eq!(rule.name, "Ambush");
        let (_, rule) = find_rule(KINGDOM_ATTACKS, "Foo (1:2) captured 30 acres of land from Bar (3:4).").unwrap();
        assert_eq!(rule.name, "Traditional March");
    }

    #[test]
    fn test_no_rule() {
        assert!(find_rule(SPELLS, "nothing to see here").is_none());
    }
}
