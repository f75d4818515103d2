use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    Restart,
    Quit,
    None,
}

pub fn command_for(ev: &KeyEvent) -> Command {
    if is_ctrl_c(ev) {
        return Command::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Command::Steer(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Command::Steer(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Command::Steer(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Command::Steer(Right),
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
        _ => Command::None,
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

/// What the player asked for since the last simulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub restart: bool,
}

impl Intent {
    pub fn press(&mut self, direction: Direction) {
        match direction {
            Up => self.up = true,
            Down => self.down = true,
            Left => self.left = true,
            Right => self.right = true,
        }
    }

    /// Active directions in the fixed up, down, left, right order.
    pub fn directions(&self) -> impl Iterator<Item = Direction> {
        let held = [(self.up, Up), (self.down, Down), (self.left, Left), (self.right, Right)];
        held.into_iter().filter(|(on, _)| *on).map(|(_, dir)| dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn arrows_and_wasd_steer() {
        assert_eq!(command_for(&key(KeyCode::Up)), Command::Steer(Up));
        assert_eq!(command_for(&key(KeyCode::Char('a'))), Command::Steer(Left));
        assert_eq!(command_for(&key(KeyCode::Char('S'))), Command::Steer(Down));
        assert_eq!(command_for(&key(KeyCode::Right)), Command::Steer(Right));
    }

    #[test]
    fn control_keys() {
        assert_eq!(command_for(&key(KeyCode::Char('r'))), Command::Restart);
        assert_eq!(command_for(&key(KeyCode::Esc)), Command::Quit);
        assert_eq!(command_for(&KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL }), Command::Quit);
        assert_eq!(command_for(&key(KeyCode::Char('c'))), Command::None);
    }

    #[test]
    fn directions_come_out_in_priority_order() {
        let mut intent = Intent::default();
        intent.press(Right);
        intent.press(Up);
        intent.press(Left);
        assert_eq!(intent.directions().collect::<Vec<_>>(), vec![Up, Left, Right]);
    }

    #[test]
    fn no_keys_no_directions() {
        let intent = Intent { restart: true, ..Intent::default() };
        assert_eq!(intent.directions().count(), 0);
    }
}
