//! Board tessellation: pitch, committed elements in store order, then the
//! path currently being drawn. Pure function of the board state so the
//! window and PNG export share it.

use crate::board::{BoardState, FontSettings};
use crate::drawing::{Color, DrawingElement, Point, BALL_RADIUS, PLAYER_RADIUS};
use crate::mesh::Mesh;
use crate::pitch::pitch_mesh;
use crate::text_renderer::{LabelFont, VerticalAnchor};

const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
const LABEL_BACKGROUND: Color = [0.0, 0.0, 0.0, 0.5];
const LABEL_PADDING: [f32; 2] = [8.0, 4.0];
const NAME_OFFSET: f32 = 20.0;

const PLAYER_OUTLINE_WIDTH: f32 = 2.0;
const BALL_OUTLINE_WIDTH: f32 = 1.0;
const DRAG_RING_RADIUS: f32 = 18.0;
const DRAG_RING_WIDTH: f32 = 3.0;
const ARROW_HEAD_LENGTH: f32 = 15.0;

pub fn board_mesh(board: &BoardState, font: Option<&LabelFont>) -> Mesh {
    let mut mesh = pitch_mesh(board.surface_size, board.margin);
    let dragging = board.drag_target();

    for (index, element) in board.elements.all().iter().enumerate() {
        draw_element(&mut mesh, element, board.font, font);
        if dragging == Some(index) && element.is_player() {
            mesh.ring(element.anchor(), DRAG_RING_RADIUS, DRAG_RING_WIDTH, WHITE);
        }
    }

    if let Some(element) = board.in_progress() {
        draw_element(&mut mesh, element, board.font, font);
    }
    mesh
}

pub fn draw_element(
    mesh: &mut Mesh,
    element: &DrawingElement,
    settings: FontSettings,
    font: Option<&LabelFont>,
) {
    match element {
        DrawingElement::Player {
            position,
            name,
            number,
            color,
            ..
        } => {
            mesh.circle(*position, PLAYER_RADIUS, *color);
            mesh.ring(*position, PLAYER_RADIUS, PLAYER_OUTLINE_WIDTH, WHITE);
            if let Some(font) = font {
                if let Some(number) = number {
                    label(mesh, font, number, *position, VerticalAnchor::Middle, settings);
                }
                if let Some(name) = name {
                    let below = [position[0], position[1] + NAME_OFFSET];
                    label(mesh, font, name, below, VerticalAnchor::Top, settings);
                }
            }
        }
        DrawingElement::Ball { position } => {
            mesh.circle(*position, BALL_RADIUS, WHITE);
            mesh.ring(*position, BALL_RADIUS, BALL_OUTLINE_WIDTH, BLACK);
        }
        DrawingElement::Line {
            points,
            color,
            width,
        } => {
            mesh.polyline(points, *width, *color);
        }
        DrawingElement::Arrow {
            start,
            control,
            end,
            color,
            width,
        } => {
            match control {
                Some(control) => mesh.quadratic(*start, *control, *end, *width, *color),
                None => mesh.line(*start, *end, *width, *color),
            }
            let from = control.unwrap_or(*start);
            let angle = (end[1] - from[1]).atan2(end[0] - from[0]);
            mesh.arrow_head(*end, angle, ARROW_HEAD_LENGTH, *width, *color);
        }
    }
}

/// Text on a translucent dark plate.
fn label(
    mesh: &mut Mesh,
    font: &LabelFont,
    text: &str,
    anchor: Point,
    vertical: VerticalAnchor,
    settings: FontSettings,
) {
    let width = font.measure(text, settings);
    let top = match vertical {
        VerticalAnchor::Middle => anchor[1] - settings.size / 2.0,
        VerticalAnchor::Top => anchor[1],
    };
    mesh.rect(
        [anchor[0] - width / 2.0 - LABEL_PADDING[0], top - LABEL_PADDING[1]],
        [width + 2.0 * LABEL_PADDING[0], settings.size + 2.0 * LABEL_PADDING[1]],
        LABEL_BACKGROUND,
    );
    font.draw(mesh, text, anchor, vertical, settings, WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{FontStyle, TeamColors};
    use crate::drawing::{TeamSide, Tool};
    use crate::board::Instant;

    const BLUE: Color = [0.0, 0.0, 1.0, 1.0];

    fn board() -> BoardState {
        BoardState::new(
            [700.0, 490.0],
            TeamColors {
                home: BLUE,
                away: [1.0, 0.0, 0.0, 1.0],
            },
            FontSettings {
                size: 14.0,
                style: FontStyle::Normal,
            },
        )
    }

    #[test]
    fn test_empty_board_is_just_the_pitch() {
        let board = board();
        let mesh = board_mesh(&board, None);
        let pitch = pitch_mesh(board.surface_size, board.margin);
        assert_eq!(mesh.vertices, pitch.vertices);
        assert_eq!(mesh.indices, pitch.indices);
    }

    #[test]
    fn test_player_disc_is_drawn_in_team_color() {
        let mut board = board();
        board
            .elements
            .append(DrawingElement::player(TeamSide::Home, [100.0, 100.0], BLUE));
        let mesh = board_mesh(&board, None);
        assert!(mesh
            .vertices
            .iter()
            .any(|v| v.position == [100.0, 100.0] && v.color == BLUE));
    }

    #[test]
    fn test_drag_highlight_adds_ring() {
        let mut board = board();
        board
            .elements
            .append(DrawingElement::player(TeamSide::Home, [100.0, 100.0], BLUE));
        let idle = board_mesh(&board, None);

        board.pointer_down([100.0, 100.0], Instant::now());
        let dragging = board_mesh(&board, None);
        assert!(dragging.vertices.len() > idle.vertices.len());
    }

    #[test]
    fn test_path_in_progress_is_drawn() {
        let mut board = board();
        board.set_tool(Tool::Line);
        board.pointer_down([10.0, 10.0], Instant::now());
        board.pointer_move([200.0, 10.0]);
        let before_release = board_mesh(&board, None);
        board.pointer_up();
        let after_release = board_mesh(&board, None);
        assert_eq!(before_release.vertices, after_release.vertices);
    }
}
