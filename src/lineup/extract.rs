use std::collections::HashSet;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

use super::{reference_lineup, PlayerRecord, MIN_USABLE_RECORDS};
use crate::config::LineupConfig;
use crate::drawing::TeamSide;
use crate::formation::Formation;

/// `Name NN` or `NN Name` on one line.
const PAIR_PATTERN: &str = r"\b(?:([A-Z][a-zA-Z]+)\s+([0-9]{1,2})|([0-9]{1,2})\s+([A-Z][a-zA-Z]+))\b";
const NUMBER_PATTERN: &str = r"\b[0-9]{1,2}\b";
const NAME_PATTERN: &str = r"\b[A-Z][a-zA-Z]+\b";
/// Capitalised word of at least three letters.
const CAPITALISED_PATTERN: &str = r"\b[A-Z][a-zA-Z]{2,}\b";

const MAX_NAME_CHARS: usize = 12;
const FALLBACK_NAME_CHARS: usize = 8;
const MIN_PAIR_NAME_CHARS: usize = 2;

const STOPLIST: [&str; 11] = [
    "player",
    "team",
    "lineup",
    "formation",
    "soccer",
    "football",
    "field",
    "coach",
    "manager",
    "bench",
    "substitutes",
];

const HOME_NAMES_FORMATION: Formation = Formation::F433;
const AWAY_NAMES_FORMATION: Formation = Formation::F442;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    NumberedPairs,
    Names,
    Reference,
}

impl ExtractionSource {
    pub fn label(self) -> &'static str {
        match self {
            ExtractionSource::NumberedPairs => "numbered pairs",
            ExtractionSource::Names => "names",
            ExtractionSource::Reference => "reference lineup",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub source: ExtractionSource,
    pub records: Vec<PlayerRecord>,
}

impl Extraction {
    pub fn reference() -> Self {
        Self {
            source: ExtractionSource::Reference,
            records: reference_lineup(),
        }
    }
}

/// Multi-pass text to lineup extractor. Passes run in order and the first
/// one with at least [`MIN_USABLE_RECORDS`] records wins.
pub struct LineupExtractor {
    pair: Regex,
    number: Regex,
    name: Regex,
    capitalised: Regex,
    config: LineupConfig,
}

impl LineupExtractor {
    pub fn new(config: LineupConfig) -> Result<Self> {
        Ok(Self {
            pair: Regex::new(PAIR_PATTERN)?,
            number: Regex::new(NUMBER_PATTERN)?,
            name: Regex::new(NAME_PATTERN)?,
            capitalised: Regex::new(CAPITALISED_PATTERN)?,
            config,
        })
    }

    pub fn extract(&self, text: &str) -> Extraction {
        let pairs = self.numbered_pairs(text);
        if pairs.len() >= MIN_USABLE_RECORDS {
            return Extraction {
                source: ExtractionSource::NumberedPairs,
                records: pairs,
            };
        }

        let names = self.candidate_names(text);
        log::debug!(
            "{} numbered pairs, {} candidate names",
            pairs.len(),
            names.len()
        );
        if names.len() >= MIN_USABLE_RECORDS {
            return Extraction {
                source: ExtractionSource::Names,
                records: layout_names(&names),
            };
        }

        let mut extraction = Extraction::reference();
        if self.config.overlay_names_on_reference {
            overlay_names(&mut extraction.records, &names);
        }
        extraction
    }

    /// First pass: explicit number/name pairs, then standalone numbers
    /// matched with a nearby capitalised word. Teams alternate in discovery
    /// order and positions come from the configured seed.
    pub fn numbered_pairs(&self, text: &str) -> Vec<PlayerRecord> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut found: Vec<(String, Option<String>)> = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if line.chars().count() < 2 {
                continue;
            }

            let mut has_pair = false;
            for caps in self.pair.captures_iter(line) {
                has_pair = true;
                let (name, number) = match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
                    (Some(name), Some(number), _, _) => (name.as_str(), number.as_str()),
                    (_, _, Some(number), Some(name)) => (name.as_str(), number.as_str()),
                    _ => continue,
                };
                if seen.contains(number) {
                    continue;
                }
                let name = clean_player_name(name);
                if name.chars().count() >= MIN_PAIR_NAME_CHARS {
                    seen.insert(number.to_string());
                    found.push((number.to_string(), Some(name)));
                }
            }
            if has_pair {
                continue;
            }

            for number in self.number.find_iter(line) {
                let number = number.as_str();
                if seen.contains(number) {
                    continue;
                }
                seen.insert(number.to_string());
                found.push((number.to_string(), self.nearby_name(&lines, i)));
            }
        }

        let mut rng = StdRng::seed_from_u64(self.config.layout_seed);
        found
            .into_iter()
            .enumerate()
            .map(|(index, (number, name))| {
                let side = if index % 2 == 0 {
                    TeamSide::Home
                } else {
                    TeamSide::Away
                };
                let x = match side {
                    TeamSide::Home => rng.random_range(0.2..0.5),
                    TeamSide::Away => rng.random_range(0.5..0.8),
                };
                let y = rng.random_range(0.1..0.9);
                PlayerRecord {
                    side,
                    name,
                    number: Some(number),
                    position: [x, y],
                }
            })
            .collect()
    }

    /// Second pass: every capitalised word that is not a stoplist token,
    /// cleansed and deduplicated case-insensitively, in reading order.
    pub fn candidate_names(&self, text: &str) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut names = Vec::new();

        for word in text
            .lines()
            .flat_map(|line| self.capitalised.find_iter(line))
        {
            let name = clean_player_name(word.as_str());
            if name.is_empty() {
                continue;
            }
            let lower = name.to_lowercase();
            if STOPLIST.iter().any(|stop| lower.contains(stop)) {
                continue;
            }
            if seen.insert(lower) {
                names.push(name);
            }
        }
        names
    }

    fn nearby_name(&self, lines: &[&str], index: usize) -> Option<String> {
        let mut candidates = vec![index];
        if index > 0 {
            candidates.push(index - 1);
        }
        if index + 1 < lines.len() {
            candidates.push(index + 1);
        }

        candidates.into_iter().find_map(|i| {
            let word = self.name.find(lines[i])?;
            let name = clean_player_name(word.as_str());
            (name.chars().count() >= MIN_PAIR_NAME_CHARS).then_some(name)
        })
    }
}

/// Splits names between the teams, home first, and places them on fixed
/// formation templates numbered from 1.
fn layout_names(names: &[String]) -> Vec<PlayerRecord> {
    let home_count = names.len().div_ceil(2);
    let (home, away) = names.split_at(home_count);

    let mut records = team_records(TeamSide::Home, HOME_NAMES_FORMATION, home);
    records.extend(team_records(TeamSide::Away, AWAY_NAMES_FORMATION, away));
    records
}

fn team_records(side: TeamSide, formation: Formation, names: &[String]) -> Vec<PlayerRecord> {
    formation
        .template(side)
        .iter()
        .enumerate()
        .map(|(index, position)| PlayerRecord {
            side,
            name: names.get(index).cloned(),
            number: Some((index + 1).to_string()),
            position: *position,
        })
        .collect()
}

/// Writes names onto home players by number 1.., then the rest onto away
/// players.
fn overlay_names(records: &mut [PlayerRecord], names: &[String]) {
    let home_count = records
        .iter()
        .filter(|r| r.side == TeamSide::Home)
        .count();
    let split = home_count.min(names.len());
    let (home, away) = names.split_at(split);

    for (side, names) in [(TeamSide::Home, home), (TeamSide::Away, away)] {
        for (index, name) in names.iter().enumerate() {
            let number = (index + 1).to_string();
            if let Some(record) = records
                .iter_mut()
                .find(|r| r.side == side && r.number.as_deref() == Some(number.as_str()))
            {
                record.name = Some(name.clone());
            }
        }
    }
}

/// Normalises an OCR'd name: trims non-letters from both ends and shortens
/// run-together names ("RaduIdzesSchingtienne" becomes "Radu").
pub fn clean_player_name(raw: &str) -> String {
    let name = raw.trim_matches(|c: char| !c.is_alphabetic());

    let shortened: String = if name.chars().count() > MAX_NAME_CHARS {
        match camel_case_cut(name) {
            Some(cut) if cut.chars().count() <= MAX_NAME_CHARS => cut.to_string(),
            _ => name.chars().take(FALLBACK_NAME_CHARS).collect(),
        }
    } else {
        name.to_string()
    };

    shortened
        .trim_end_matches(|c: char| !c.is_alphabetic())
        .to_string()
}

/// Prefix ending at the first lowercase letter that is followed by an
/// uppercase one.
fn camel_case_cut(name: &str) -> Option<&str> {
    let mut chars = name.char_indices().peekable();
    while let Some((_, ch)) = chars.next() {
        if let Some(&(next_index, next)) = chars.peek() {
            if ch.is_lowercase() && next.is_uppercase() {
                return Some(&name[..next_index]);
            }
        }
    }
    None
}
