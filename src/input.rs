use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use log::trace;
use ratatui::layout::Rect;
use std::time::Duration;

/// The five logical controls the simulation reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Fire,
}

impl Control {
    const ALL: [Control; 5] = [
        Control::MoveLeft,
        Control::MoveRight,
        Control::MoveUp,
        Control::MoveDown,
        Control::Fire,
    ];

    /// Physical key bound to each control. Anything else is ignored.
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(Control::MoveLeft),
            KeyCode::Right => Some(Control::MoveRight),
            KeyCode::Up => Some(Control::MoveUp),
            KeyCode::Down => Some(Control::MoveDown),
            KeyCode::Char('z') | KeyCode::Char('Z') => Some(Control::Fire),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Pressed/released state of every control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub fire: bool,
}

impl InputState {
    pub fn set(&mut self, control: Control, pressed: bool) {
        match control {
            Control::MoveLeft => self.move_left = pressed,
            Control::MoveRight => self.move_right = pressed,
            Control::MoveUp => self.move_up = pressed,
            Control::MoveDown => self.move_down = pressed,
            Control::Fire => self.fire = pressed,
        }
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        match control {
            Control::MoveLeft => self.move_left,
            Control::MoveRight => self.move_right,
            Control::MoveUp => self.move_up,
            Control::MoveDown => self.move_down,
            Control::Fire => self.fire,
        }
    }
}

/// Requests that go to the frame driver instead of the input state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Pointer dragged to this surface position; the player jumps there
    MovePlayerTo { x: f32, y: f32 },
    Quit,
}

/// Turns crossterm key and mouse events into [`InputState`] updates
pub struct InputManager {
    state: InputState,
    /// Terminal reports key releases (keyboard enhancement is active)
    release_events: bool,
    hold_frames: u64,
    /// Frame of the latest key press per control, for the hold fallback
    last_press: [Option<u64>; 5],
    frame: u64,
    /// Terminal cells the surface was last drawn into
    viewport: Rect,
    surface_size: (f32, f32),
}

impl InputManager {
    pub fn new(release_events: bool, hold_frames: u64, surface_size: (f32, f32)) -> Self {
        Self {
            state: InputState::default(),
            release_events,
            hold_frames,
            last_press: [None; 5],
            frame: 0,
            viewport: Rect::default(),
            surface_size,
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Where the surface sits on screen, used to map pointer positions
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Starts a new frame. Without release events, keys not pressed again
    /// within the hold window count as released.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        if self.release_events {
            return;
        }

        for control in Control::ALL {
            if let Some(pressed_at) = self.last_press[control.index()]
                && self.frame.saturating_sub(pressed_at) > self.hold_frames
            {
                self.last_press[control.index()] = None;
                self.state.set(control, false);
            }
        }
    }

    /// Drains every pending terminal event without blocking
    pub fn poll_events(&mut self) -> color_eyre::Result<Vec<InputAction>> {
        let mut actions = Vec::new();
        while event::poll(Duration::from_millis(0))? {
            if let Some(action) = self.handle_event(event::read()?) {
                actions.push(action);
            }
        }
        Ok(actions)
    }

    pub fn handle_event(&mut self, event: Event) -> Option<InputAction> {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event),
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
            // Resize is picked up by the next draw
            _ => None,
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> Option<InputAction> {
        trace!("key {:?} {:?}", key_event.code, key_event.kind);

        match key_event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if is_quit_key(&key_event) {
                    return Some(InputAction::Quit);
                }
                if let Some(control) = Control::from_key(key_event.code) {
                    self.state.set(control, true);
                    self.last_press[control.index()] = Some(self.frame);
                }
            }
            KeyEventKind::Release => {
                if let Some(control) = Control::from_key(key_event.code) {
                    self.state.set(control, false);
                    self.last_press[control.index()] = None;
                }
            }
        }
        None
    }

    fn handle_mouse_event(&mut self, mouse_event: MouseEvent) -> Option<InputAction> {
        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.state.fire = true;
                // Button-up always arrives, so pointer fire never expires
                self.last_press[Control::Fire.index()] = None;
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.state.fire = false;
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => self
                .to_surface(mouse_event.column, mouse_event.row)
                .map(|(x, y)| InputAction::MovePlayerTo { x, y }),
            _ => None,
        }
    }

    /// Maps the center of a terminal cell onto surface coordinates. Cells
    /// outside the viewport map outside the surface.
    pub fn to_surface(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return None;
        }
        let (surface_width, surface_height) = self.surface_size;
        let x = (f32::from(column) - f32::from(self.viewport.x) + 0.5) * surface_width
            / f32::from(self.viewport.width);
        let y = (f32::from(row) - f32::from(self.viewport.y) + 0.5) * surface_height
            / f32::from(self.viewport.height);
        Some((x, y))
    }
}

fn is_quit_key(key_event: &KeyEvent) -> bool {
    matches!(
        key_event.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (matches!(key_event.code, KeyCode::Char('c') | KeyCode::Char('C'))
        && key_event.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn manager() -> InputManager {
        let mut manager = InputManager::new(true, 8, (800.0, 800.0));
        manager.set_viewport(Rect::new(0, 0, 80, 40));
        manager
    }

    #[test]
    fn test_press_and_release() {
        let mut manager = manager();
        manager.handle_event(key(KeyCode::Left, KeyEventKind::Press));
        manager.handle_event(key(KeyCode::Char('z'), KeyEventKind::Press));
        assert!(manager.state().move_left);
        assert!(manager.state().fire);

        manager.handle_event(key(KeyCode::Left, KeyEventKind::Release));
        assert!(!manager.state().move_left);
        assert!(manager.state().fire);
    }

    #[test]
    fn test_all_controls_bound() {
        let mut manager = manager();
        for code in [
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Char('z'),
        ] {
            manager.handle_event(key(code, KeyEventKind::Press));
        }
        for control in Control::ALL {
            assert!(manager.state().is_pressed(control));
        }
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut manager = manager();
        assert_eq!(
            manager.handle_event(key(KeyCode::Char('x'), KeyEventKind::Press)),
            None
        );
        assert_eq!(*manager.state(), InputState::default());
    }

    #[test]
    fn test_quit_keys() {
        let mut manager = manager();
        assert_eq!(
            manager.handle_event(key(KeyCode::Esc, KeyEventKind::Press)),
            Some(InputAction::Quit)
        );
        assert_eq!(
            manager.handle_event(key(KeyCode::Char('q'), KeyEventKind::Press)),
            Some(InputAction::Quit)
        );
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(manager.handle_event(ctrl_c), Some(InputAction::Quit));
    }

    #[test]
    fn test_last_writer_wins() {
        let mut manager = manager();
        manager.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 1, 1));
        manager.handle_event(key(KeyCode::Char('z'), KeyEventKind::Release));
        assert!(!manager.state().fire);
    }

    #[test]
    fn test_pointer_button_fires() {
        let mut manager = manager();
        manager.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        assert!(manager.state().fire);
        manager.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, 10));
        assert!(!manager.state().fire);
    }

    #[test]
    fn test_pointer_drag_maps_to_surface() {
        let mut manager = manager();
        let action = manager.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 20));
        // Cell centers: (40.5 * 10, 20.5 * 20)
        assert_eq!(action, Some(InputAction::MovePlayerTo { x: 405.0, y: 410.0 }));
    }

    #[test]
    fn test_pointer_outside_viewport_maps_off_surface() {
        let mut manager = InputManager::new(true, 8, (800.0, 800.0));
        manager.set_viewport(Rect::new(10, 5, 80, 40));
        let (x, y) = manager.to_surface(0, 0).unwrap();
        assert!(x < 0.0);
        assert!(y < 0.0);
    }

    #[test]
    fn test_pointer_ignored_before_first_draw() {
        let manager = InputManager::new(true, 8, (800.0, 800.0));
        assert_eq!(manager.to_surface(3, 3), None);
    }

    #[test]
    fn test_hold_fallback_expires_keys() {
        let mut manager = InputManager::new(false, 3, (800.0, 800.0));
        manager.begin_frame();
        manager.handle_event(key(KeyCode::Right, KeyEventKind::Press));

        for _ in 0..3 {
            manager.begin_frame();
            assert!(manager.state().move_right);
        }
        manager.begin_frame();
        assert!(!manager.state().move_right);
    }

    #[test]
    fn test_hold_fallback_refreshed_by_repeat() {
        let mut manager = InputManager::new(false, 2, (800.0, 800.0));
        manager.handle_event(key(KeyCode::Up, KeyEventKind::Press));
        for _ in 0..10 {
            manager.begin_frame();
            manager.handle_event(key(KeyCode::Up, KeyEventKind::Repeat));
            assert!(manager.state().move_up);
        }
    }

    #[test]
    fn test_release_events_disable_fallback() {
        let mut manager = InputManager::new(true, 1, (800.0, 800.0));
        manager.handle_event(key(KeyCode::Down, KeyEventKind::Press));
        for _ in 0..10 {
            manager.begin_frame();
        }
        assert!(manager.state().move_down);
    }
}
