use glam::Vec2;

// ── Direction ─────────────────────────────────────────────────────────────────

/// Logical movement directions as the player sees them on screen.
///
/// The grid is rotated 45° against the screen, so each direction maps to a
/// diagonal in grid space (see `InputState::direction_vector`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

// ── InputState ────────────────────────────────────────────────────────────────

/// Held-direction snapshot for one frame.
///
/// The external input layer mutates this between ticks (`press`/`release`
/// from its key events); the motion controller only ever reads it.  A plain
/// value object — no callbacks, no event queue.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, direction: Direction) {
        self.set(direction, true);
    }

    pub fn release(&mut self, direction: Direction) {
        self.set(direction, false);
    }

    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    pub fn any_held(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Grid-space unit velocity direction for the held set.
    ///
    /// Screen "up" decreases both col and row, "down" increases both,
    /// "left" is -col/+row and "right" is +col/-row — the 45° rotation that
    /// makes visual up point away from the viewer.  The summed vector is
    /// normalised to unit length, so every held combination moves at the
    /// same speed (a lone "up" is itself a grid diagonal and would
    /// otherwise run `sqrt(2)` times too fast).
    pub fn direction_vector(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir += Vec2::new(-1.0, -1.0);
        }
        if self.down {
            dir += Vec2::new(1.0, 1.0);
        }
        if self.left {
            dir += Vec2::new(-1.0, 1.0);
        }
        if self.right {
            dir += Vec2::new(1.0, -1.0);
        }
        dir.normalize_or_zero()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
