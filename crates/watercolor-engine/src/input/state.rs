use std::collections::HashSet;

use glam::Vec2;

use super::frame::InputFrame;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for a single window.
///
/// Holds "is down" information and current pointer position.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // On focus loss, clear "down" sets so drags do not stick.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                if let Some((px, py)) = self.pointer_pos {
                    frame.pointer_delta += Vec2::new(*x - px, *y - py);
                }
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y }) => {
                self.pointer_pos = Some((*x, *y));

                match state {
                    MouseButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { delta } => {
                frame.wheel_lines += delta.lines_y();
            }
        }

        frame.push_event(ev);
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseWheelDelta;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn button(state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x: 0.0,
            y: 0.0,
        })
    }

    #[test]
    fn first_move_has_no_delta() {
        let (mut st, mut fr) = (InputState::default(), InputFrame::default());
        st.apply_event(&mut fr, moved(10.0, 10.0));
        assert_eq!(fr.pointer_delta, Vec2::ZERO);
        assert_eq!(st.pointer_pos, Some((10.0, 10.0)));
    }

    #[test]
    fn moves_accumulate_delta() {
        let (mut st, mut fr) = (InputState::default(), InputFrame::default());
        st.apply_event(&mut fr, moved(10.0, 10.0));
        st.apply_event(&mut fr, moved(15.0, 8.0));
        st.apply_event(&mut fr, moved(20.0, 8.0));
        assert_eq!(fr.pointer_delta, Vec2::new(10.0, -2.0));
        fr.clear();
        assert_eq!(fr.pointer_delta, Vec2::ZERO);
        assert!(fr.events.is_empty());
    }

    #[test]
    fn button_transitions_are_recorded_once() {
        let (mut st, mut fr) = (InputState::default(), InputFrame::default());
        st.apply_event(&mut fr, button(MouseButtonState::Pressed));
        st.apply_event(&mut fr, button(MouseButtonState::Pressed));
        assert!(st.button_down(MouseButton::Left));
        assert_eq!(fr.buttons_pressed.len(), 1);
        st.apply_event(&mut fr, button(MouseButtonState::Released));
        assert!(!st.button_down(MouseButton::Left));
        assert!(fr.buttons_released.contains(&MouseButton::Left));
    }

    #[test]
    fn focus_loss_releases_buttons() {
        let (mut st, mut fr) = (InputState::default(), InputFrame::default());
        st.apply_event(&mut fr, button(MouseButtonState::Pressed));
        st.apply_event(&mut fr, InputEvent::Focused(false));
        assert!(st.buttons_down.is_empty());
    }

    #[test]
    fn wheel_pixels_normalize_to_lines() {
        let (mut st, mut fr) = (InputState::default(), InputFrame::default());
        st.apply_event(&mut fr, InputEvent::MouseWheel {
            delta: MouseWheelDelta::Pixel { x: 0.0, y: 50.0 },
        });
        st.apply_event(&mut fr, InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
        });
        assert!((fr.wheel_lines - 1.5).abs() < 1e-6);
    }
}
