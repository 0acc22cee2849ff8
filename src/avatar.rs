use glam::Vec2;

use crate::input::InputState;

// ── Avatar ────────────────────────────────────────────────────────────────────

/// The player-controlled entity walking the grid.
///
/// Position is continuous (col, row) so motion between cells is smooth; the
/// grid store only ever sees it floored.  There is no movement state
/// machine: while a direction is held the position integrates velocity, and
/// when nothing is held it exponentially settles onto the nearest cell.
#[derive(Clone, Debug)]
pub struct Avatar {
    /// Continuous grid position.
    pub position: Vec2,
    /// Movement speed in tiles per second.
    speed: f32,
    /// Settle rate toward the nearest cell when idle.
    snap_speed: f32,
}

impl Avatar {
    pub fn new(start: Vec2, speed: f32, snap_speed: f32) -> Self {
        Self { position: start, speed, snap_speed }
    }

    /// Advance one frame.
    ///
    /// Held input integrates as `pos += dir * speed * dt`, clamped into
    /// `[0, cols-1] × [0, rows-1]`.  With no input held the position lerps
    /// toward `round(pos)` at the snap rate; the `min(.., 1)` keeps a large
    /// `dt` from stepping past the target cell.
    pub fn update(&mut self, dt: f32, input: &InputState, cols: u32, rows: u32) {
        let dir = input.direction_vector();

        if dir != Vec2::ZERO {
            self.position += dir * self.speed * dt;
        } else {
            let target = self.position.round();
            self.position = self
                .position
                .lerp(target, (self.snap_speed * dt).min(1.0));
        }

        self.position.x = self.position.x.clamp(0.0, cols.saturating_sub(1) as f32);
        self.position.y = self.position.y.clamp(0.0, rows.saturating_sub(1) as f32);
    }

    /// The integer cell the avatar is closest to.
    pub fn nearest_cell(&self) -> (i32, i32) {
        (
            self.position.x.round() as i32,
            self.position.y.round() as i32,
        )
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
