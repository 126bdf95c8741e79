use crate::app_state::{board_size, State};
use crate::board::Instant;
use crate::drawing::{Point, TeamSide, Tool};
use crate::state::ScreenUniforms;
use crate::ui::{UiAction, TOOLBAR_HEIGHT};

use winit::event::*;
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

const FONT_SIZE_STEP: f32 = 1.0;

impl State {
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.gpu.config.width = new_size.width;
            self.gpu.config.height = new_size.height;
            self.gpu
                .surface
                .configure(&self.gpu.device, &self.gpu.config);

            self.gpu.queue.write_buffer(
                &self.screen.uniform,
                0,
                bytemuck::cast_slice(&[ScreenUniforms::new(new_size.width, new_size.height)]),
            );
            self.board.resize(board_size(new_size));
        }
    }

    fn screen_size(&self) -> [f32; 2] {
        [self.size.width as f32, self.size.height as f32]
    }

    fn board_pos(&self) -> Point {
        [self.input.mouse_pos[0], self.input.mouse_pos[1] - TOOLBAR_HEIGHT]
    }

    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.input.modifiers = modifiers.state();
                false
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                match state {
                    ElementState::Pressed => self.mouse_pressed(),
                    ElementState::Released => {
                        if self.input.board_pressed {
                            self.input.board_pressed = false;
                            self.board.pointer_up();
                        }
                    }
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.mouse_pos = [position.x as f32, position.y as f32];
                if self.input.board_pressed {
                    let pos = self.board_pos();
                    self.board.pointer_move(pos);
                }
                true
            }
            WindowEvent::CursorLeft { .. } => {
                if self.input.board_pressed {
                    self.input.board_pressed = false;
                    self.board.pointer_up();
                }
                true
            }
            WindowEvent::DroppedFile(path) => {
                if self.lineup.submit(path.clone()) {
                    self.status = None;
                } else {
                    self.set_status("Lineup already processing");
                }
                true
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if key_event.state != ElementState::Pressed {
                    return false;
                }
                let PhysicalKey::Code(keycode) = key_event.physical_key else {
                    return self.board.is_editing();
                };

                if self.board.is_editing() {
                    match keycode {
                        KeyCode::Escape => self.board.cancel_edit(),
                        KeyCode::Enter | KeyCode::NumpadEnter => self.board.confirm_edit(),
                        KeyCode::Tab => self.board.edit_switch_field(),
                        KeyCode::Backspace => self.board.edit_backspace(),
                        _ => {
                            if let Some(text) = &key_event.text {
                                self.board.edit_insert(text);
                            }
                        }
                    }
                    return true;
                }

                self.shortcut(keycode)
            }
            WindowEvent::Ime(Ime::Commit(text)) => {
                if self.board.is_editing() {
                    self.board.edit_insert(text);
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    fn mouse_pressed(&mut self) {
        let pos = self.input.mouse_pos;
        let screen = self.screen_size();
        let editing = self.board.is_editing();

        if editing || self.ui_renderer.in_toolbar(pos) {
            if let Some(action) = self.ui_renderer.handle_click(pos, screen, editing) {
                self.apply_action(action);
            }
            return;
        }

        self.input.board_pressed = true;
        let pos = self.board_pos();
        self.board.pointer_down(pos, Instant::now());
    }

    pub fn apply_action(&mut self, action: UiAction) {
        log::debug!("ui action {action:?}");
        match action {
            UiAction::SelectTool(tool) => self.board.set_tool(tool),
            UiAction::Undo => self.board.undo(),
            UiAction::Export => self.export_png(),
            UiAction::ApplyFormation(side) => self.board.apply_selected_formation(side),
            UiAction::CycleFormation(side) => self.board.cycle_formation(side),
            UiAction::CycleColor(side) => self.board.cycle_team_color(side),
            UiAction::FocusField(field) => self.board.edit_focus(field),
            UiAction::ConfirmEdit => self.board.confirm_edit(),
            UiAction::CancelEdit => self.board.cancel_edit(),
        }
    }

    /// Keyboard shortcuts outside the dialog. Escape is left unhandled so
    /// the window closes.
    fn shortcut(&mut self, keycode: KeyCode) -> bool {
        if let Some(action) = shortcut_action(keycode, self.input.modifiers) {
            self.apply_action(action);
            return true;
        }
        match keycode {
            KeyCode::BracketLeft => self.board.adjust_font_size(-FONT_SIZE_STEP),
            KeyCode::BracketRight => self.board.adjust_font_size(FONT_SIZE_STEP),
            KeyCode::KeyB => self.board.cycle_font_style(),
            _ => return false,
        }
        true
    }
}

fn shortcut_action(keycode: KeyCode, modifiers: ModifiersState) -> Option<UiAction> {
    let is_ctrl_or_cmd = modifiers.control_key() || modifiers.super_key();
    let shift = modifiers.shift_key();

    let action = match keycode {
        KeyCode::Digit1 => UiAction::SelectTool(Tool::HomePlayer),
        KeyCode::Digit2 => UiAction::SelectTool(Tool::AwayPlayer),
        KeyCode::Digit3 => UiAction::SelectTool(Tool::Ball),
        KeyCode::Digit4 => UiAction::SelectTool(Tool::Line),
        KeyCode::Digit5 => UiAction::SelectTool(Tool::Arrow),
        KeyCode::Digit6 => UiAction::SelectTool(Tool::Eraser),
        KeyCode::KeyZ if is_ctrl_or_cmd => UiAction::Undo,
        KeyCode::KeyS if is_ctrl_or_cmd => UiAction::Export,
        // Reserved with Ctrl/Cmd.
        KeyCode::KeyH | KeyCode::KeyA if is_ctrl_or_cmd => return None,
        KeyCode::KeyH if shift => UiAction::CycleFormation(TeamSide::Home),
        KeyCode::KeyH => UiAction::ApplyFormation(TeamSide::Home),
        KeyCode::KeyA if shift => UiAction::CycleFormation(TeamSide::Away),
        KeyCode::KeyA => UiAction::ApplyFormation(TeamSide::Away),
        KeyCode::KeyC if shift => UiAction::CycleColor(TeamSide::Away),
        KeyCode::KeyC => UiAction::CycleColor(TeamSide::Home),
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_keys_map_to_actions() {
        let none = ModifiersState::empty();
        assert_eq!(
            shortcut_action(KeyCode::Digit4, none),
            Some(UiAction::SelectTool(Tool::Line))
        );
        assert_eq!(
            shortcut_action(KeyCode::KeyA, none),
            Some(UiAction::ApplyFormation(TeamSide::Away))
        );
        assert_eq!(
            shortcut_action(KeyCode::KeyH, ModifiersState::SHIFT),
            Some(UiAction::CycleFormation(TeamSide::Home))
        );
        assert_eq!(shortcut_action(KeyCode::KeyZ, none), None);
    }

    #[test]
    fn test_ctrl_or_cmd_letters_do_not_apply_formations() {
        for modifiers in [ModifiersState::CONTROL, ModifiersState::SUPER] {
            assert_eq!(shortcut_action(KeyCode::KeyA, modifiers), None);
            assert_eq!(shortcut_action(KeyCode::KeyH, modifiers), None);
            assert_eq!(shortcut_action(KeyCode::KeyZ, modifiers), Some(UiAction::Undo));
            assert_eq!(shortcut_action(KeyCode::KeyS, modifiers), Some(UiAction::Export));
        }
        assert_eq!(
            shortcut_action(KeyCode::KeyA, ModifiersState::CONTROL | ModifiersState::SHIFT),
            None
        );
    }
}
