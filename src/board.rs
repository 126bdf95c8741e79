use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::drawing::{Color, DrawingElement, PATH_COLOR, PATH_WIDTH, Point, TeamSide, Tool};
use crate::formation::{self, Formation, PITCH_MARGIN};
use crate::lineup::PlayerRecord;
use crate::store::ElementStore;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        pub use web_time::Instant;
    } else {
        pub use std::time::Instant;
    }
}

pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);
pub const MIN_FONT_SIZE: f32 = 10.0;
pub const MAX_FONT_SIZE: f32 = 24.0;
/// Vertical bend of an arrow per pixel of horizontal drag.
pub const ARROW_BEND: f32 = 0.25;

pub const TEAM_PALETTE: [Color; 8] = [
    [0.231, 0.510, 0.965, 1.0],
    [0.937, 0.267, 0.267, 1.0],
    [0.133, 0.773, 0.369, 1.0],
    [0.961, 0.620, 0.043, 1.0],
    [0.545, 0.361, 0.965, 1.0],
    [0.925, 0.282, 0.600, 1.0],
    [0.067, 0.094, 0.153, 1.0],
    [0.976, 0.980, 0.984, 1.0],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn next(self) -> FontStyle {
        match self {
            FontStyle::Normal => FontStyle::Bold,
            FontStyle::Bold => FontStyle::Italic,
            FontStyle::Italic => FontStyle::BoldItalic,
            FontStyle::BoldItalic => FontStyle::Normal,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSettings {
    pub size: f32,
    pub style: FontStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamColors {
    pub home: Color,
    pub away: Color,
}

impl TeamColors {
    pub fn get(&self, side: TeamSide) -> Color {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }

    pub fn set(&mut self, side: TeamSide, color: Color) {
        match side {
            TeamSide::Home => self.home = color,
            TeamSide::Away => self.away = color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Number,
}

/// Pending name/number edit of a player marker.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEdit {
    pub index: usize,
    pub side: TeamSide,
    pub name: String,
    pub number: String,
    pub field: EditField,
}

impl PlayerEdit {
    fn focused_mut(&mut self) -> &mut String {
        match self.field {
            EditField::Name => &mut self.name,
            EditField::Number => &mut self.number,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Idle,
    Dragging { index: usize },
    DrawingPath(DrawingElement),
    EditingDialog(PlayerEdit),
}

/// Everything the board view owns: contents, tool selection and the
/// transient pointer state.
#[derive(Debug, Clone)]
pub struct BoardState {
    pub elements: ElementStore,
    pub tool: Tool,
    pub colors: TeamColors,
    pub font: FontSettings,
    pub home_formation: Formation,
    pub away_formation: Formation,
    pub surface_size: [f32; 2],
    pub margin: f32,
    pub interaction: Interaction,
    last_click: Option<Instant>,
}

impl BoardState {
    pub fn new(surface_size: [f32; 2], colors: TeamColors, font: FontSettings) -> Self {
        Self {
            elements: ElementStore::new(),
            tool: Tool::HomePlayer,
            colors,
            font,
            home_formation: Formation::F442,
            away_formation: Formation::F433,
            surface_size,
            margin: PITCH_MARGIN,
            interaction: Interaction::Idle,
            last_click: None,
        }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn resize(&mut self, surface_size: [f32; 2]) {
        self.surface_size = surface_size;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.interaction, Interaction::EditingDialog(_))
    }

    pub fn edit(&self) -> Option<&PlayerEdit> {
        match &self.interaction {
            Interaction::EditingDialog(edit) => Some(edit),
            _ => None,
        }
    }

    pub fn edit_mut(&mut self) -> Option<&mut PlayerEdit> {
        match &mut self.interaction {
            Interaction::EditingDialog(edit) => Some(edit),
            _ => None,
        }
    }

    /// Element being dragged, if any.
    pub fn drag_target(&self) -> Option<usize> {
        match self.interaction {
            Interaction::Dragging { index } => Some(index),
            _ => None,
        }
    }

    /// Line or arrow that is being drawn but not yet committed.
    pub fn in_progress(&self) -> Option<&DrawingElement> {
        match &self.interaction {
            Interaction::DrawingPath(element) => Some(element),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, pos: Point, now: Instant) {
        if self.is_editing() {
            return;
        }

        let is_double_click = self
            .last_click
            .is_some_and(|last| now.saturating_duration_since(last) < DOUBLE_CLICK_WINDOW);
        self.last_click = Some(now);

        let hit = self.elements.hit_test(pos);

        if self.tool == Tool::Eraser {
            if let Some(index) = hit {
                self.elements.remove_at(index);
                log::debug!("erased element {index}");
            }
            self.interaction = Interaction::Idle;
            return;
        }

        if let Some(index) = hit {
            if is_double_click {
                if let Some(DrawingElement::Player {
                    side, name, number, ..
                }) = self.elements.get(index)
                {
                    log::debug!("editing player {index}");
                    self.interaction = Interaction::EditingDialog(PlayerEdit {
                        index,
                        side: *side,
                        name: name.clone().unwrap_or_default(),
                        number: number.clone().unwrap_or_default(),
                        field: EditField::Name,
                    });
                    return;
                }
            }
            self.interaction = Interaction::Dragging { index };
            return;
        }

        match self.tool {
            Tool::HomePlayer | Tool::AwayPlayer => {
                let side = self.tool.team().unwrap_or(TeamSide::Home);
                self.elements
                    .append(DrawingElement::player(side, pos, self.colors.get(side)));
            }
            Tool::Ball => {
                self.elements.append(DrawingElement::Ball { position: pos });
            }
            Tool::Line => {
                self.interaction = Interaction::DrawingPath(DrawingElement::Line {
                    points: vec![pos],
                    color: PATH_COLOR,
                    width: PATH_WIDTH,
                });
            }
            Tool::Arrow => {
                self.interaction = Interaction::DrawingPath(DrawingElement::Arrow {
                    start: pos,
                    control: Some(pos),
                    end: pos,
                    color: PATH_COLOR,
                    width: PATH_WIDTH,
                });
            }
            Tool::Eraser => {}
        }
    }

    pub fn pointer_move(&mut self, pos: Point) {
        match &mut self.interaction {
            Interaction::Dragging { index } => {
                if let Some(element) = self.elements.get_mut(*index) {
                    element.move_to(pos);
                }
            }
            Interaction::DrawingPath(DrawingElement::Line { points, .. }) => {
                points.push(pos);
            }
            Interaction::DrawingPath(DrawingElement::Arrow {
                start, control, end, ..
            }) => {
                *control = Some([
                    (start[0] + pos[0]) / 2.0,
                    pos[1] - (pos[0] - start[0]).abs() * ARROW_BEND,
                ]);
                *end = pos;
            }
            _ => {}
        }
    }

    /// Pointer release, also used when the pointer leaves the surface.
    pub fn pointer_up(&mut self) {
        match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::DrawingPath(element) => {
                if is_committable(&element) {
                    self.elements.append(element);
                }
            }
            Interaction::EditingDialog(edit) => {
                self.interaction = Interaction::EditingDialog(edit);
            }
            Interaction::Dragging { .. } | Interaction::Idle => {}
        }
    }

    pub fn edit_insert(&mut self, text: &str) {
        if let Some(edit) = self.edit_mut() {
            edit.focused_mut()
                .extend(text.chars().filter(|ch| !ch.is_control()));
        }
    }

    pub fn edit_backspace(&mut self) {
        if let Some(edit) = self.edit_mut() {
            edit.focused_mut().pop();
        }
    }

    pub fn edit_switch_field(&mut self) {
        if let Some(edit) = self.edit_mut() {
            edit.field = match edit.field {
                EditField::Name => EditField::Number,
                EditField::Number => EditField::Name,
            };
        }
    }

    pub fn edit_focus(&mut self, field: EditField) {
        if let Some(edit) = self.edit_mut() {
            edit.field = field;
        }
    }

    /// Writes the dialog contents into the edited player.
    pub fn confirm_edit(&mut self) {
        let Interaction::EditingDialog(edit) =
            std::mem::replace(&mut self.interaction, Interaction::Idle)
        else {
            return;
        };
        let team_color = self.colors.get(edit.side);
        if let Some(DrawingElement::Player {
            name,
            number,
            color,
            ..
        }) = self.elements.get_mut(edit.index)
        {
            *name = non_empty(&edit.name);
            *number = non_empty(&edit.number);
            *color = team_color;
        }
    }

    pub fn cancel_edit(&mut self) {
        if self.is_editing() {
            self.interaction = Interaction::Idle;
        }
    }

    pub fn undo(&mut self) {
        if self.elements.remove_last().is_some() {
            self.reset_stale_interaction();
        }
    }

    pub fn apply_formation(&mut self, side: TeamSide, formation: Formation) {
        let players = formation::generate(
            formation,
            side,
            self.surface_size,
            self.margin,
            self.colors.get(side),
        );
        self.elements.retain(|element| element.team() != Some(side));
        self.elements.extend(players);
        self.drop_indexed_interaction();
        log::info!("applied {formation} to {} team", side.label());
    }

    pub fn apply_selected_formation(&mut self, side: TeamSide) {
        let formation = self.selected_formation(side);
        self.apply_formation(side, formation);
    }

    pub fn selected_formation(&self, side: TeamSide) -> Formation {
        match side {
            TeamSide::Home => self.home_formation,
            TeamSide::Away => self.away_formation,
        }
    }

    pub fn cycle_formation(&mut self, side: TeamSide) {
        match side {
            TeamSide::Home => self.home_formation = self.home_formation.next(),
            TeamSide::Away => self.away_formation = self.away_formation.next(),
        }
    }

    /// Replaces every player marker with the extracted lineup, keeping
    /// balls, lines and arrows.
    pub fn merge_lineup(&mut self, records: &[PlayerRecord]) {
        let players: Vec<DrawingElement> = records
            .iter()
            .map(|record| DrawingElement::Player {
                side: record.side,
                position: formation::to_surface(record.position, self.surface_size, self.margin),
                name: record.name.clone(),
                number: record.number.clone(),
                color: self.colors.get(record.side),
            })
            .collect();
        self.elements.retain(|element| !element.is_player());
        self.elements.extend(players);
        self.drop_indexed_interaction();
    }

    pub fn cycle_team_color(&mut self, side: TeamSide) {
        let current = self.colors.get(side);
        let next = TEAM_PALETTE
            .iter()
            .position(|c| *c == current)
            .map(|i| TEAM_PALETTE[(i + 1) % TEAM_PALETTE.len()])
            .unwrap_or(TEAM_PALETTE[0]);
        self.colors.set(side, next);
    }

    pub fn adjust_font_size(&mut self, delta: f32) {
        self.font.size = (self.font.size + delta).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    pub fn cycle_font_style(&mut self) {
        self.font.style = self.font.style.next();
    }

    /// Ends a drag or edit after the store was reordered. A path being
    /// drawn holds no index and carries on.
    fn drop_indexed_interaction(&mut self) {
        if matches!(
            self.interaction,
            Interaction::Dragging { .. } | Interaction::EditingDialog(_)
        ) {
            self.interaction = Interaction::Idle;
        }
    }

    fn reset_stale_interaction(&mut self) {
        let len = self.elements.len();
        let stale = match &self.interaction {
            Interaction::Dragging { index } => *index >= len,
            Interaction::EditingDialog(edit) => edit.index >= len,
            _ => false,
        };
        if stale {
            self.interaction = Interaction::Idle;
        }
    }
}

fn is_committable(element: &DrawingElement) -> bool {
    match element {
        DrawingElement::Line { points, .. } => points.len() >= 2,
        DrawingElement::Arrow { start, end, .. } => start != end,
        _ => true,
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
