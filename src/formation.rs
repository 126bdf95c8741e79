//! Formation presets.
//!
//! Templates are relative positions in the unit square, scaled into the
//! playable area of the pitch when applied:
//! - X: 0 = left goal line, 1 = right goal line
//! - Y: 0 = top touchline, 1 = bottom touchline

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::drawing::{Color, DrawingElement, Point, TeamSide};

pub const PITCH_MARGIN: f32 = 30.0;
pub const PLAYERS_PER_SIDE: usize = 11;

type Template = [Point; PLAYERS_PER_SIDE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formation {
    #[serde(rename = "4-4-2")]
    F442,
    #[serde(rename = "4-3-3")]
    F433,
    #[serde(rename = "3-5-2")]
    F352,
    #[serde(rename = "5-3-2")]
    F532,
    #[serde(rename = "4-2-3-1")]
    F4231,
}

impl Formation {
    pub const ALL: [Formation; 5] = [
        Formation::F442,
        Formation::F433,
        Formation::F352,
        Formation::F532,
        Formation::F4231,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Formation::F442 => "4-4-2",
            Formation::F433 => "4-3-3",
            Formation::F352 => "3-5-2",
            Formation::F532 => "5-3-2",
            Formation::F4231 => "4-2-3-1",
        }
    }

    /// Next formation in catalogue order, wrapping around.
    pub fn next(self) -> Formation {
        let index = Formation::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Formation::ALL[(index + 1) % Formation::ALL.len()]
    }

    /// Relative positions for one side, goalkeeper first.
    pub fn template(self, side: TeamSide) -> &'static Template {
        match (self, side) {
            (Formation::F442, TeamSide::Home) => &F442_HOME,
            (Formation::F442, TeamSide::Away) => &F442_AWAY,
            (Formation::F433, TeamSide::Home) => &F433_HOME,
            (Formation::F433, TeamSide::Away) => &F433_AWAY,
            (Formation::F352, TeamSide::Home) => &F352_HOME,
            (Formation::F352, TeamSide::Away) => &F352_AWAY,
            (Formation::F532, TeamSide::Home) => &F532_HOME,
            (Formation::F532, TeamSide::Away) => &F532_AWAY,
            (Formation::F4231, TeamSide::Home) => &F4231_HOME,
            (Formation::F4231, TeamSide::Away) => &F4231_AWAY,
        }
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Formation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "4-4-2" | "442" => Ok(Formation::F442),
            "4-3-3" | "433" => Ok(Formation::F433),
            "3-5-2" | "352" => Ok(Formation::F352),
            "5-3-2" | "532" => Ok(Formation::F532),
            "4-2-3-1" | "4231" => Ok(Formation::F4231),
            other => Err(anyhow!("unknown formation: {other}")),
        }
    }
}

/// Maps a relative position into surface pixels inside the pitch margin.
pub fn to_surface(relative: Point, surface: [f32; 2], margin: f32) -> Point {
    [
        margin + relative[0] * (surface[0] - 2.0 * margin),
        margin + relative[1] * (surface[1] - 2.0 * margin),
    ]
}

/// Builds the 11 players of `side` for `formation`, numbered from 1 in
/// template order.
pub fn generate(
    formation: Formation,
    side: TeamSide,
    surface: [f32; 2],
    margin: f32,
    color: Color,
) -> Vec<DrawingElement> {
    formation
        .template(side)
        .iter()
        .enumerate()
        .map(|(index, relative)| DrawingElement::Player {
            side,
            position: to_surface(*relative, surface, margin),
            name: None,
            number: Some((index + 1).to_string()),
            color,
        })
        .collect()
}

const F442_HOME: Template = [
    [0.1, 0.5],
    [0.2, 0.2],
    [0.2, 0.4],
    [0.2, 0.6],
    [0.2, 0.8],
    [0.4, 0.2],
    [0.4, 0.4],
    [0.4, 0.6],
    [0.4, 0.8],
    [0.6, 0.35],
    [0.6, 0.65],
];

const F442_AWAY: Template = [
    [0.9, 0.5],
    [0.8, 0.2],
    [0.8, 0.4],
    [0.8, 0.6],
    [0.8, 0.8],
    [0.6, 0.2],
    [0.6, 0.4],
    [0.6, 0.6],
    [0.6, 0.8],
    [0.4, 0.35],
    [0.4, 0.65],
];

const F433_HOME: Template = [
    [0.1, 0.5],
    [0.2, 0.2],
    [0.2, 0.4],
    [0.2, 0.6],
    [0.2, 0.8],
    [0.4, 0.3],
    [0.4, 0.5],
    [0.4, 0.7],
    [0.6, 0.25],
    [0.6, 0.5],
    [0.6, 0.75],
];

const F433_AWAY: Template = [
    [0.9, 0.5],
    [0.8, 0.2],
    [0.8, 0.4],
    [0.8, 0.6],
    [0.8, 0.8],
    [0.6, 0.3],
    [0.6, 0.5],
    [0.6, 0.7],
    [0.4, 0.25],
    [0.4, 0.5],
    [0.4, 0.75],
];

const F352_HOME: Template = [
    [0.1, 0.5],
    [0.2, 0.3],
    [0.2, 0.5],
    [0.2, 0.7],
    [0.35, 0.2],
    [0.4, 0.35],
    [0.4, 0.5],
    [0.4, 0.65],
    [0.35, 0.8],
    [0.6, 0.35],
    [0.6, 0.65],
];

const F352_AWAY: Template = [
    [0.9, 0.5],
    [0.8, 0.3],
    [0.8, 0.5],
    [0.8, 0.7],
    [0.65, 0.2],
    [0.6, 0.35],
    [0.6, 0.5],
    [0.6, 0.65],
    [0.65, 0.8],
    [0.4, 0.35],
    [0.4, 0.65],
];

const F532_HOME: Template = [
    [0.1, 0.5],
    [0.2, 0.1],
    [0.2, 0.3],
    [0.2, 0.5],
    [0.2, 0.7],
    [0.2, 0.9],
    [0.4, 0.3],
    [0.4, 0.5],
    [0.4, 0.7],
    [0.6, 0.35],
    [0.6, 0.65],
];

const F532_AWAY: Template = [
    [0.9, 0.5],
    [0.8, 0.1],
    [0.8, 0.3],
    [0.8, 0.5],
    [0.8, 0.7],
    [0.8, 0.9],
    [0.6, 0.3],
    [0.6, 0.5],
    [0.6, 0.7],
    [0.4, 0.35],
    [0.4, 0.65],
];

const F4231_HOME: Template = [
    [0.1, 0.5],
    [0.2, 0.2],
    [0.2, 0.4],
    [0.2, 0.6],
    [0.2, 0.8],
    [0.35, 0.35],
    [0.35, 0.65],
    [0.5, 0.25],
    [0.5, 0.5],
    [0.5, 0.75],
    [0.65, 0.5],
];

const F4231_AWAY: Template = [
    [0.9, 0.5],
    [0.8, 0.2],
    [0.8, 0.4],
    [0.8, 0.6],
    [0.8, 0.8],
    [0.65, 0.35],
    [0.65, 0.65],
    [0.5, 0.25],
    [0.5, 0.5],
    [0.5, 0.75],
    [0.35, 0.5],
];

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_goalkeeper_scaling_442_home() {
        let players = generate(Formation::F442, TeamSide::Home, [700.0, 490.0], 30.0, RED);
        assert_eq!(players.len(), PLAYERS_PER_SIDE);
        let gk = players[0].anchor();
        assert!((gk[0] - (30.0 + 0.1 * (700.0 - 60.0))).abs() < 1e-3);
        assert!((gk[1] - (30.0 + 0.5 * (490.0 - 60.0))).abs() < 1e-3);
    }

    #[test]
    fn test_numbers_follow_template_order() {
        for formation in Formation::ALL {
            for side in [TeamSide::Home, TeamSide::Away] {
                let players = generate(formation, side, [800.0, 560.0], PITCH_MARGIN, RED);
                let numbers: Vec<_> = players
                    .iter()
                    .map(|p| match p {
                        DrawingElement::Player { number, side: s, .. } => {
                            assert_eq!(*s, side);
                            number.clone().unwrap()
                        }
                        _ => panic!("formation produced a non-player"),
                    })
                    .collect();
                let expected: Vec<_> = (1..=11).map(|n| n.to_string()).collect();
                assert_eq!(numbers, expected);
            }
        }
    }

    #[test]
    fn test_templates_stay_inside_unit_square() {
        for formation in Formation::ALL {
            for side in [TeamSide::Home, TeamSide::Away] {
                for p in formation.template(side) {
                    assert!((0.0..=1.0).contains(&p[0]) && (0.0..=1.0).contains(&p[1]));
                }
            }
        }
    }

    #[test]
    fn test_parse_and_display_roundtrip() {
        for formation in Formation::ALL {
            assert_eq!(formation.name().parse::<Formation>().unwrap(), formation);
            assert_eq!(formation.to_string(), formation.name());
        }
        assert_eq!("4231".parse::<Formation>().unwrap(), Formation::F4231);
        assert!("4-6-0".parse::<Formation>().is_err());
    }

    #[test]
    fn test_next_cycles_through_catalogue() {
        let mut formation = Formation::F442;
        for _ in 0..Formation::ALL.len() {
            formation = formation.next();
        }
        assert_eq!(formation, Formation::F442);
        assert_eq!(Formation::F4231.next(), Formation::F442);
    }

    #[test]
    fn test_serde_uses_formation_names() {
        let json = serde_json::to_string(&Formation::F4231).unwrap();
        assert_eq!(json, "\"4-2-3-1\"");
        let parsed: Formation = serde_json::from_str("\"5-3-2\"").unwrap();
        assert_eq!(parsed, Formation::F532);
    }
}
