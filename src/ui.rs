use crate::board::{BoardState, EditField, FontSettings, FontStyle, PlayerEdit};
use crate::drawing::{Color, Point, TeamSide, Tool};
use crate::mesh::Mesh;
use crate::text_renderer::{LabelFont, VerticalAnchor};

pub const TOOLBAR_HEIGHT: f32 = 60.0;

const BUTTON_SIZE: [f32; 2] = [40.0, 40.0];
const FORMATION_BUTTON_SIZE: [f32; 2] = [76.0, 40.0];
const SWATCH_SIZE: [f32; 2] = [24.0, 40.0];
const BUTTON_TOP: f32 = 10.0;
const DIALOG_SIZE: [f32; 2] = [320.0, 190.0];

const TOOLBAR_COLOR: Color = [0.95, 0.95, 0.95, 1.0];
const BUTTON_COLOR: Color = [0.8, 0.8, 0.8, 1.0];
const SELECTED_COLOR: Color = [0.5, 0.7, 1.0, 1.0];
const ICON_COLOR: Color = [0.2, 0.2, 0.2, 1.0];
const TEXT_COLOR: Color = [0.1, 0.1, 0.1, 1.0];
const SCRIM_COLOR: Color = [0.0, 0.0, 0.0, 0.5];
const PANEL_COLOR: Color = [1.0, 1.0, 1.0, 1.0];
const FIELD_COLOR: Color = [0.97, 0.97, 0.97, 1.0];
const FIELD_BORDER: Color = [0.7, 0.7, 0.7, 1.0];
const PROGRESS_TRACK: Color = [0.8, 0.8, 0.8, 1.0];
const PROGRESS_FILL: Color = [0.13, 0.55, 0.24, 1.0];

const UI_FONT: FontSettings = FontSettings {
    size: 14.0,
    style: FontStyle::Normal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    SelectTool(Tool),
    Undo,
    Export,
    ApplyFormation(TeamSide),
    CycleFormation(TeamSide),
    CycleColor(TeamSide),
    FocusField(EditField),
    ConfirmEdit,
    CancelEdit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    position: Point,
    size: [f32; 2],
}

impl Rect {
    fn new(position: Point, size: [f32; 2]) -> Self {
        Self { position, size }
    }

    fn contains(&self, p: Point) -> bool {
        p[0] >= self.position[0]
            && p[0] <= self.position[0] + self.size[0]
            && p[1] >= self.position[1]
            && p[1] <= self.position[1] + self.size[1]
    }

    fn center(&self) -> Point {
        [
            self.position[0] + self.size[0] / 2.0,
            self.position[1] + self.size[1] / 2.0,
        ]
    }
}

struct ToolbarButton {
    action: UiAction,
    rect: Rect,
    key_binding: &'static str,
}

struct DialogLayout {
    panel: Rect,
    name_field: Rect,
    number_field: Rect,
    ok: Rect,
    cancel: Rect,
}

impl DialogLayout {
    fn new(screen: [f32; 2]) -> Self {
        let origin = [
            ((screen[0] - DIALOG_SIZE[0]) / 2.0).max(0.0),
            ((screen[1] - DIALOG_SIZE[1]) / 2.0).max(0.0),
        ];
        let field_size = [DIALOG_SIZE[0] - 110.0, 28.0];
        let button_size = [80.0, 30.0];
        Self {
            panel: Rect::new(origin, DIALOG_SIZE),
            name_field: Rect::new([origin[0] + 90.0, origin[1] + 50.0], field_size),
            number_field: Rect::new([origin[0] + 90.0, origin[1] + 92.0], field_size),
            ok: Rect::new(
                [origin[0] + DIALOG_SIZE[0] - 190.0, origin[1] + 144.0],
                button_size,
            ),
            cancel: Rect::new(
                [origin[0] + DIALOG_SIZE[0] - 100.0, origin[1] + 144.0],
                button_size,
            ),
        }
    }
}

/// What the overlay shows besides the board itself.
pub struct UiView<'a> {
    pub board: &'a BoardState,
    pub lineup_progress: Option<f32>,
    pub status: Option<&'a str>,
}

/// Toolbar, editing dialog and status overlay, in window pixels.
pub struct UiRenderer {
    buttons: Vec<ToolbarButton>,
}

impl UiRenderer {
    pub fn new() -> Self {
        let mut buttons = Vec::new();
        let mut x = 10.0;
        let mut push = |action, size: [f32; 2], key_binding, gap: f32| {
            buttons.push(ToolbarButton {
                action,
                rect: Rect::new([x, BUTTON_TOP], size),
                key_binding,
            });
            x += size[0] + gap;
        };

        const TOOL_KEYS: [&str; 6] = ["1", "2", "3", "4", "5", "6"];
        for (tool, key) in Tool::ALL.into_iter().zip(TOOL_KEYS) {
            push(UiAction::SelectTool(tool), BUTTON_SIZE, key, 10.0);
        }
        push(UiAction::Undo, BUTTON_SIZE, "Ctrl+Z", 10.0);
        push(UiAction::Export, BUTTON_SIZE, "Ctrl+S", 30.0);
        for (side, key) in [(TeamSide::Home, "H"), (TeamSide::Away, "A")] {
            push(UiAction::CycleColor(side), SWATCH_SIZE, "C", 4.0);
            push(UiAction::ApplyFormation(side), FORMATION_BUTTON_SIZE, key, 4.0);
            push(UiAction::CycleFormation(side), [20.0, 40.0], "Shift", 20.0);
        }

        Self { buttons }
    }

    pub fn handle_click(&self, pos: Point, screen: [f32; 2], editing: bool) -> Option<UiAction> {
        if editing {
            let layout = DialogLayout::new(screen);
            return [
                (layout.ok, UiAction::ConfirmEdit),
                (layout.cancel, UiAction::CancelEdit),
                (layout.name_field, UiAction::FocusField(EditField::Name)),
                (layout.number_field, UiAction::FocusField(EditField::Number)),
            ]
            .into_iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, action)| action);
        }

        self.buttons
            .iter()
            .find(|button| button.rect.contains(pos))
            .map(|button| button.action)
    }

    /// Whether `pos` falls on the toolbar strip rather than the board.
    pub fn in_toolbar(&self, pos: Point) -> bool {
        pos[1] < TOOLBAR_HEIGHT
    }

    pub fn build(&self, view: &UiView, screen: [f32; 2], font: Option<&LabelFont>) -> Mesh {
        let mut mesh = Mesh::new();
        mesh.rect([0.0, 0.0], [screen[0], TOOLBAR_HEIGHT], TOOLBAR_COLOR);

        let board = view.board;
        for button in &self.buttons {
            self.draw_button(&mut mesh, button, board, font);
        }

        if let Some(progress) = view.lineup_progress {
            let track = Rect::new([screen[0] - 170.0, 26.0], [150.0, 8.0]);
            mesh.rect(track.position, track.size, PROGRESS_TRACK);
            mesh.rect(
                track.position,
                [track.size[0] * progress.clamp(0.0, 1.0), track.size[1]],
                PROGRESS_FILL,
            );
            if let Some(font) = font {
                let anchor = [track.center()[0], 40.0];
                font.draw(&mut mesh, "Reading lineup", anchor, VerticalAnchor::Top, UI_FONT, TEXT_COLOR);
            }
        } else if let (Some(status), Some(font)) = (view.status, font) {
            let width = font.measure(status, UI_FONT);
            let anchor = [screen[0] - 20.0 - width / 2.0, TOOLBAR_HEIGHT / 2.0];
            font.draw(&mut mesh, status, anchor, VerticalAnchor::Middle, UI_FONT, TEXT_COLOR);
        }

        if let Some(edit) = board.edit() {
            draw_dialog(&mut mesh, edit, screen, font);
        }
        mesh
    }

    fn draw_button(
        &self,
        mesh: &mut Mesh,
        button: &ToolbarButton,
        board: &BoardState,
        font: Option<&LabelFont>,
    ) {
        let rect = button.rect;
        let center = rect.center();
        let selected = button.action == UiAction::SelectTool(board.tool);

        match button.action {
            UiAction::CycleColor(side) => {
                mesh.rect(rect.position, rect.size, board.colors.get(side));
                mesh.rect_outline(rect.position, rect.size, 1.0, FIELD_BORDER);
                return;
            }
            UiAction::ApplyFormation(side) => {
                mesh.rect(rect.position, rect.size, BUTTON_COLOR);
                if let Some(font) = font {
                    let name = board.selected_formation(side).name();
                    font.draw(mesh, name, center, VerticalAnchor::Middle, UI_FONT, TEXT_COLOR);
                }
                return;
            }
            _ => {}
        }

        let fill = if selected { SELECTED_COLOR } else { BUTTON_COLOR };
        mesh.rect(rect.position, rect.size, fill);

        match button.action {
            UiAction::SelectTool(Tool::HomePlayer) => player_icon(mesh, center, board.colors.home),
            UiAction::SelectTool(Tool::AwayPlayer) => player_icon(mesh, center, board.colors.away),
            UiAction::SelectTool(Tool::Ball) => {
                mesh.circle(center, 7.0, [1.0, 1.0, 1.0, 1.0]);
                mesh.ring(center, 7.0, 1.0, [0.0, 0.0, 0.0, 1.0]);
            }
            UiAction::SelectTool(Tool::Line) => {
                mesh.line(
                    [center[0] - 8.0, center[1] + 8.0],
                    [center[0] + 8.0, center[1] - 8.0],
                    2.0,
                    ICON_COLOR,
                );
            }
            UiAction::SelectTool(Tool::Arrow) => {
                mesh.quadratic(
                    [center[0] - 9.0, center[1] + 6.0],
                    [center[0], center[1] - 10.0],
                    [center[0] + 9.0, center[1] + 2.0],
                    2.0,
                    ICON_COLOR,
                );
                let angle = (12.0f32).atan2(9.0);
                mesh.arrow_head([center[0] + 9.0, center[1] + 2.0], angle, 7.0, 2.0, ICON_COLOR);
            }
            UiAction::SelectTool(Tool::Eraser) => {
                mesh.rect([center[0] - 6.0, center[1] - 4.0], [12.0, 8.0], ICON_COLOR);
            }
            UiAction::Undo => {
                let start: f32 = -2.6;
                mesh.arc(center, 8.0, start, 1.2, 2.0, ICON_COLOR);
                // Head points against the sweep, counter-clockwise.
                let tip = [center[0] + 8.0 * start.cos(), center[1] + 8.0 * start.sin()];
                let heading = (-start.cos()).atan2(start.sin());
                mesh.arrow_head(tip, heading, 6.0, 2.0, ICON_COLOR);
            }
            UiAction::Export => {
                mesh.line([center[0], center[1] - 9.0], [center[0], center[1] + 3.0], 2.0, ICON_COLOR);
                mesh.arrow_head([center[0], center[1] + 3.0], std::f32::consts::FRAC_PI_2, 6.0, 2.0, ICON_COLOR);
                mesh.line([center[0] - 9.0, center[1] + 9.0], [center[0] + 9.0, center[1] + 9.0], 2.0, ICON_COLOR);
            }
            UiAction::CycleFormation(_) => {
                mesh.line([center[0] - 4.0, center[1] - 6.0], [center[0] + 3.0, center[1]], 2.0, ICON_COLOR);
                mesh.line([center[0] + 3.0, center[1]], [center[0] - 4.0, center[1] + 6.0], 2.0, ICON_COLOR);
            }
            _ => {}
        }

        if let (Some(font), UiAction::SelectTool(_)) = (font, button.action) {
            let key_pos = [rect.position[0] + rect.size[0] - 5.0, rect.position[1] + 1.0];
            let small = FontSettings {
                size: 10.0,
                style: FontStyle::Normal,
            };
            font.draw(mesh, button.key_binding, key_pos, VerticalAnchor::Top, small, ICON_COLOR);
        }
    }
}

fn player_icon(mesh: &mut Mesh, center: Point, color: Color) {
    mesh.circle(center, 10.0, color);
    mesh.ring(center, 10.0, 2.0, [1.0, 1.0, 1.0, 1.0]);
}

fn draw_dialog(mesh: &mut Mesh, edit: &PlayerEdit, screen: [f32; 2], font: Option<&LabelFont>) {
    let layout = DialogLayout::new(screen);
    mesh.rect([0.0, 0.0], screen, SCRIM_COLOR);
    mesh.rect(layout.panel.position, layout.panel.size, PANEL_COLOR);

    for (field, rect) in [
        (EditField::Name, layout.name_field),
        (EditField::Number, layout.number_field),
    ] {
        mesh.rect(rect.position, rect.size, FIELD_COLOR);
        let border = if edit.field == field {
            SELECTED_COLOR
        } else {
            FIELD_BORDER
        };
        mesh.rect_outline(rect.position, rect.size, 2.0, border);
    }
    mesh.rect(layout.ok.position, layout.ok.size, SELECTED_COLOR);
    mesh.rect(layout.cancel.position, layout.cancel.size, BUTTON_COLOR);

    let Some(font) = font else {
        return;
    };
    let panel = layout.panel;
    let title = format!("Edit {} player", edit.side.label());
    font.draw(
        mesh,
        &title,
        [panel.center()[0], panel.position[1] + 16.0],
        VerticalAnchor::Top,
        UI_FONT,
        TEXT_COLOR,
    );

    for (label, value, rect) in [
        ("Name", &edit.name, layout.name_field),
        ("Number", &edit.number, layout.number_field),
    ] {
        let middle = rect.center()[1];
        let label_width = font.measure(label, UI_FONT);
        font.draw(
            mesh,
            label,
            [panel.position[0] + 20.0 + label_width / 2.0, middle],
            VerticalAnchor::Middle,
            UI_FONT,
            TEXT_COLOR,
        );
        let value_width = font.measure(value, UI_FONT);
        font.draw(
            mesh,
            value,
            [rect.position[0] + 8.0 + value_width / 2.0, middle],
            VerticalAnchor::Middle,
            UI_FONT,
            TEXT_COLOR,
        );
    }
    font.draw(mesh, "OK", layout.ok.center(), VerticalAnchor::Middle, UI_FONT, TEXT_COLOR);
    font.draw(mesh, "Cancel", layout.cancel.center(), VerticalAnchor::Middle, UI_FONT, TEXT_COLOR);
}
