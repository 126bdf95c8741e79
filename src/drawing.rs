use serde::{Deserialize, Serialize};

pub type Point = [f32; 2];
pub type Color = [f32; 4];

pub const PLAYER_RADIUS: f32 = 15.0;
pub const BALL_RADIUS: f32 = 8.0;
pub const PATH_HIT_RADIUS: f32 = 15.0;
pub const PATH_WIDTH: f32 = 3.0;
pub const PATH_COLOR: Color = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn other(self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TeamSide::Home => "Home",
            TeamSide::Away => "Away",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    HomePlayer,
    AwayPlayer,
    Ball,
    Line,
    Arrow,
    Eraser,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::HomePlayer,
        Tool::AwayPlayer,
        Tool::Ball,
        Tool::Line,
        Tool::Arrow,
        Tool::Eraser,
    ];

    /// The team a player tool places, if any.
    pub fn team(self) -> Option<TeamSide> {
        match self {
            Tool::HomePlayer => Some(TeamSide::Home),
            Tool::AwayPlayer => Some(TeamSide::Away),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawingElement {
    Player {
        side: TeamSide,
        position: Point,
        name: Option<String>,
        number: Option<String>,
        color: Color,
    },
    Ball {
        position: Point,
    },
    Line {
        points: Vec<Point>,
        color: Color,
        width: f32,
    },
    Arrow {
        start: Point,
        control: Option<Point>,
        end: Point,
        color: Color,
        width: f32,
    },
}

impl DrawingElement {
    pub fn player(side: TeamSide, position: Point, color: Color) -> Self {
        DrawingElement::Player {
            side,
            position,
            name: None,
            number: None,
            color,
        }
    }

    /// Point used for hit-testing and dragging.
    pub fn anchor(&self) -> Point {
        match self {
            DrawingElement::Player { position, .. } | DrawingElement::Ball { position } => {
                *position
            }
            DrawingElement::Line { points, .. } => points.first().copied().unwrap_or([0.0, 0.0]),
            DrawingElement::Arrow { start, .. } => *start,
        }
    }

    pub fn hit_radius(&self) -> f32 {
        match self {
            DrawingElement::Player { .. } => PLAYER_RADIUS,
            DrawingElement::Ball { .. } => BALL_RADIUS,
            DrawingElement::Line { .. } | DrawingElement::Arrow { .. } => PATH_HIT_RADIUS,
        }
    }

    pub fn team(&self) -> Option<TeamSide> {
        match self {
            DrawingElement::Player { side, .. } => Some(*side),
            _ => None,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, DrawingElement::Player { .. })
    }

    /// Moves the element so that its anchor lands on `target`. Paths are
    /// translated as a whole.
    pub fn move_to(&mut self, target: Point) {
        let anchor = self.anchor();
        let dx = target[0] - anchor[0];
        let dy = target[1] - anchor[1];
        match self {
            DrawingElement::Player { position, .. } | DrawingElement::Ball { position } => {
                *position = target;
            }
            DrawingElement::Line { points, .. } => {
                for point in points.iter_mut() {
                    point[0] += dx;
                    point[1] += dy;
                }
            }
            DrawingElement::Arrow {
                start, control, end, ..
            } => {
                *start = target;
                if let Some(control) = control {
                    control[0] += dx;
                    control[1] += dy;
                }
                end[0] += dx;
                end[1] += dy;
            }
        }
    }
}

pub fn distance(a: Point, b: Point) -> f32 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

/// Parses `#rrggbb` or `#rrggbbaa` into straight RGBA.
pub fn parse_hex_color(text: &str) -> Option<Color> {
    let hex = text.trim().strip_prefix('#')?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some([
        channel(0)? as f32 / 255.0,
        channel(2)? as f32 / 255.0,
        channel(4)? as f32 / 255.0,
        alpha as f32 / 255.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_line_translates_every_point() {
        let mut line = DrawingElement::Line {
            points: vec![[10.0, 10.0], [20.0, 15.0]],
            color: PATH_COLOR,
            width: PATH_WIDTH,
        };
        line.move_to([15.0, 20.0]);
        match line {
            DrawingElement::Line { points, .. } => {
                assert_eq!(points, vec![[15.0, 20.0], [25.0, 25.0]]);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_move_arrow_keeps_shape() {
        let mut arrow = DrawingElement::Arrow {
            start: [0.0, 0.0],
            control: Some([5.0, -2.0]),
            end: [10.0, 0.0],
            color: PATH_COLOR,
            width: PATH_WIDTH,
        };
        arrow.move_to([100.0, 50.0]);
        assert_eq!(
            arrow,
            DrawingElement::Arrow {
                start: [100.0, 50.0],
                control: Some([105.0, 48.0]),
                end: [110.0, 50.0],
                color: PATH_COLOR,
                width: PATH_WIDTH,
            }
        );
    }

    #[test]
    fn test_parse_hex_color() {
        let blue = parse_hex_color("#3b82f6").unwrap();
        assert!((blue[0] - 59.0 / 255.0).abs() < 1e-6);
        assert!((blue[3] - 1.0).abs() < 1e-6);
        assert!(parse_hex_color("3b82f6").is_none());
        assert!(parse_hex_color("#xyz").is_none());
        assert!(parse_hex_color("#0000007f").is_some());
    }
}
