use crate::config::{MAGNET_TICKS, SHIELD_TICKS};
use crate::Position;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Snake {
    /// Head first
    body: Vec<Position>,
    /// Direction used by the last advance
    direction: Direction,
    /// Direction the next advance will use
    pending: Direction,
    shield_ticks: u32,
    magnet_ticks: u32,
}

impl Snake {
    /// Builds a straight snake of `size` cells whose head is at `pos`,
    /// trailing away from `direction`.
    pub fn new(pos: Position, size: usize, direction: Direction) -> Self {
        let diff = direction.delta();

        let body = (0..size.max(1) as i32)
            .map(|i| (pos.0 - diff.0 * i, pos.1 - diff.1 * i))
            .collect();
        Snake { body, direction, pending: direction, shield_ticks: 0, magnet_ticks: 0 }
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn occupies(&self, cell: Position) -> bool {
        self.body.contains(&cell)
    }

    /// True when the head shares a cell with any other segment.
    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body[1..].contains(&head)
    }

    /// Queues a turn for the next advance. Reversing onto the body is ignored,
    /// checked against the direction actually travelled, so several requests
    /// within one tick can never add up to a reversal.
    pub fn change_direction(&mut self, new_direction: Direction) {
        if new_direction != self.direction.opposite() {
            self.pending = new_direction;
        }
    }

    /// Moves one cell and runs down the status effect timers. Call once per tick.
    pub fn advance(&mut self) {
        self.direction = self.pending;

        let (dx, dy) = self.direction.delta();
        let old_head = self.head();
        self.body.insert(0, (old_head.0 + dx, old_head.1 + dy));
        self.body.pop();

        self.shield_ticks = self.shield_ticks.saturating_sub(1);
        self.magnet_ticks = self.magnet_ticks.saturating_sub(1);
    }

    /// Duplicates the tail; the copy unfolds on the following advances.
    pub fn grow(&mut self) {
        let tail = self.body[self.body.len() - 1];
        self.body.push(tail);
    }

    pub fn has_shield(&self) -> bool {
        self.shield_ticks > 0
    }

    pub fn has_magnet(&self) -> bool {
        self.magnet_ticks > 0
    }

    pub fn activate_shield(&mut self) {
        self.shield_ticks = SHIELD_TICKS;
    }

    pub fn activate_magnet(&mut self) {
        self.magnet_ticks = MAGNET_TICKS;
    }

    pub fn remove_shield(&mut self) {
        self.shield_ticks = 0;
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
