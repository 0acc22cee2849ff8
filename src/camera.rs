use glam::Vec2;

use crate::config::WorldConfig;

// ── CameraMode ────────────────────────────────────────────────────────────────

/// What the camera is currently doing.
///
/// Transitions:
/// - any mode → `Dragging` on drag-start;
/// - `Dragging` → `Free` on drag-end (the camera stays where the drag left
///   it — following does not resume by itself);
/// - `Free` ↔ `Following` on the lock toggle;
/// - any mode → `Following` on reset, with a one-shot immediate recenter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CameraMode {
    /// Smoothly tracking the avatar (default).
    Following,
    /// Pointer drag in progress; position comes from the drag math.
    Dragging,
    /// Unlocked: neither following nor dragging.
    Free,
}

// ── Camera ────────────────────────────────────────────────────────────────────

/// 2D camera: a world-space focus point with smoothed follow, free drag
/// panning and discrete zoom stepping.
#[derive(Clone, Debug)]
pub struct Camera {
    /// Current world-space focus point.
    pub position: Vec2,
    /// Focus point the follow mode is steering toward.
    target: Vec2,
    /// Screen-space offset between the avatar and the focus point.
    follow_offset: Vec2,
    /// Follow interpolation fraction, applied once per frame.
    lag: f32,
    mode: CameraMode,
    /// Pointer position when the current drag started.
    drag_origin: Vec2,
    /// Camera position when the current drag started.
    drag_start_pos: Vec2,
    /// Discrete zoom level; scale is `1 + level * zoom_step`.
    zoom_level: i32,
    zoom_step: f32,
    zoom_min: i32,
    zoom_max: i32,
    /// Armed by `reset`; the next update teleports instead of lerping.
    snap_pending: bool,
}

impl Camera {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            position: Vec2::ZERO,
            target: Vec2::ZERO,
            follow_offset: config.follow_offset,
            lag: config.camera_lag,
            mode: CameraMode::Following,
            drag_origin: Vec2::ZERO,
            drag_start_pos: Vec2::ZERO,
            zoom_level: 0,
            zoom_step: config.zoom_step,
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
            snap_pending: false,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    /// Continuous scale factor for the current zoom level.
    pub fn scale(&self) -> f32 {
        1.0 + self.zoom_level as f32 * self.zoom_step
    }

    /// Current focus point — what a renderer centers its view on.
    pub fn focus(&self) -> Vec2 {
        self.position
    }

    // ── commands ─────────────────────────────────────────────────────────────

    /// Step the zoom level by `steps` (usually ±1), saturating at the
    /// configured bounds.  Zooming never moves the focus point: zoom is
    /// center-anchored, not cursor-anchored.
    pub fn zoom(&mut self, steps: i32) {
        self.zoom_level = (self.zoom_level + steps).clamp(self.zoom_min, self.zoom_max);
    }

    /// Begin a pointer drag at `pointer` (screen pixels).
    pub fn start_drag(&mut self, pointer: Vec2) {
        self.mode = CameraMode::Dragging;
        self.drag_origin = pointer;
        self.drag_start_pos = self.position;
    }

    /// Continue a drag.  Ignored when no drag is in progress.
    ///
    /// The pointer delta is divided by the current scale so a drag feels
    /// the same at every zoom level — one screen pixel covers more world
    /// pixels the further out the camera is.
    pub fn drag(&mut self, pointer: Vec2) {
        if self.mode != CameraMode::Dragging {
            return;
        }
        self.position = self.drag_start_pos - (pointer - self.drag_origin) / self.scale();
    }

    /// End a drag, leaving the camera unlocked where the drag put it.
    pub fn end_drag(&mut self) {
        if self.mode == CameraMode::Dragging {
            self.mode = CameraMode::Free;
        }
    }

    /// Flip between `Free` and `Following`.  Cancels an active drag.
    pub fn toggle_lock(&mut self) {
        self.mode = match self.mode {
            CameraMode::Following => CameraMode::Free,
            CameraMode::Dragging | CameraMode::Free => CameraMode::Following,
        };
    }

    /// Re-center on the avatar: zoom back to level 0, cancel any drag,
    /// resume following, and arm a one-shot snap so the very next update
    /// jumps straight to the target instead of easing there.
    pub fn reset(&mut self) {
        self.zoom_level = 0;
        self.mode = CameraMode::Following;
        self.snap_pending = true;
    }

    // ── per-frame update ─────────────────────────────────────────────────────

    /// Advance one frame toward `avatar_screen` (the avatar's projected
    /// position).
    ///
    /// The lag fraction is applied per frame, not per second — the same
    /// smoothing the original sandbox shipped with, kept for behavioral
    /// fidelity even though it ties the ease-in feel to the frame rate.
    pub fn update(&mut self, avatar_screen: Vec2) {
        self.target = avatar_screen + self.follow_offset;

        if self.snap_pending {
            self.snap_pending = false;
            self.position = self.target;
            return;
        }

        if self.mode == CameraMode::Following {
            self.position = self.position.lerp(self.target, self.lag);
        }
        // Dragging positions come from `drag`; Free holds still.
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(&WorldConfig::default())
    }

    // ── follow ───────────────────────────────────────────────────────────────

    #[test]
    fn following_eases_toward_the_avatar() {
        let mut cam = camera();
        let avatar = Vec2::new(200.0, 100.0);
        let goal = avatar + Vec2::new(0.0, -150.0);

        cam.update(avatar);
        let first_hop = cam.position;
        assert!(first_hop.distance(goal) > 0.0, "one frame should not arrive");

        for _ in 0..400 {
            cam.update(avatar);
        }
        assert!(cam.position.distance(goal) < 0.5);
    }

    #[test]
    fn free_camera_holds_position() {
        let mut cam = camera();
        cam.toggle_lock();
        assert_eq!(cam.mode(), CameraMode::Free);
        let before = cam.position;
        cam.update(Vec2::new(500.0, 500.0));
        assert_eq!(cam.position, before);
    }

    // ── drag ─────────────────────────────────────────────────────────────────

    #[test]
    fn drag_moves_against_the_pointer() {
        let mut cam = camera();
        cam.start_drag(Vec2::new(100.0, 100.0));
        cam.drag(Vec2::new(130.0, 80.0));
        assert_eq!(cam.position, Vec2::new(-30.0, 20.0));
    }

    #[test]
    fn drag_delta_is_scaled_by_zoom() {
        let mut cam = camera();
        cam.zoom(2); // scale 1.5
        cam.start_drag(Vec2::ZERO);
        cam.drag(Vec2::new(30.0, 0.0));
        assert_eq!(cam.position, Vec2::new(-20.0, 0.0));
    }

    #[test]
    fn drag_end_leaves_the_camera_free_where_it_is() {
        let mut cam = camera();
        cam.start_drag(Vec2::ZERO);
        cam.drag(Vec2::new(50.0, 50.0));
        let dropped = cam.position;
        cam.end_drag();
        assert_eq!(cam.mode(), CameraMode::Free);
        cam.update(Vec2::new(999.0, 999.0));
        assert_eq!(cam.position, dropped);
    }

    #[test]
    fn drag_without_start_is_ignored() {
        let mut cam = camera();
        cam.toggle_lock();
        let before = cam.position;
        cam.drag(Vec2::new(40.0, 40.0));
        assert_eq!(cam.position, before);
    }

    #[test]
    fn drag_overrides_following_until_released() {
        let mut cam = camera();
        cam.start_drag(Vec2::ZERO);
        assert_eq!(cam.mode(), CameraMode::Dragging);
        cam.drag(Vec2::new(10.0, 0.0));
        let dragged = cam.position;
        // Following math must not fight the drag.
        cam.update(Vec2::new(300.0, 300.0));
        assert_eq!(cam.position, dragged);
    }

    // ── zoom ─────────────────────────────────────────────────────────────────

    #[test]
    fn zoom_steps_change_scale_linearly() {
        let mut cam = camera();
        assert_eq!(cam.scale(), 1.0);
        cam.zoom(1);
        assert_eq!(cam.scale(), 1.25);
        cam.zoom(-2);
        assert_eq!(cam.scale(), 0.75);
    }

    #[test]
    fn zoom_saturates_at_both_bounds() {
        let mut cam = camera();
        for _ in 0..10 {
            cam.zoom(1);
        }
        assert_eq!(cam.zoom_level(), 3);
        assert_eq!(cam.scale(), 1.75);
        for _ in 0..20 {
            cam.zoom(-1);
        }
        assert_eq!(cam.zoom_level(), -3);
        assert_eq!(cam.scale(), 0.25);
    }

    #[test]
    fn zoom_does_not_move_the_focus() {
        let mut cam = camera();
        cam.toggle_lock();
        let before = cam.position;
        cam.zoom(3);
        assert_eq!(cam.position, before);
    }

    // ── reset ────────────────────────────────────────────────────────────────

    #[test]
    fn reset_recenters_immediately_and_rezooms() {
        let mut cam = camera();
        cam.zoom(-3);
        cam.start_drag(Vec2::ZERO);
        cam.drag(Vec2::new(400.0, 400.0));
        cam.reset();
        assert_eq!(cam.zoom_level(), 0);
        assert_eq!(cam.mode(), CameraMode::Following);

        // The snap is consumed by the very next update: no easing.
        let avatar = Vec2::new(64.0, 96.0);
        cam.update(avatar);
        assert_eq!(cam.position, avatar + Vec2::new(0.0, -150.0));

        // And it is one-shot — subsequent updates ease again.
        cam.position = Vec2::ZERO;
        cam.update(avatar);
        assert!(cam.position.distance(avatar + Vec2::new(0.0, -150.0)) > 1.0);
    }

    #[test]
    fn lock_toggle_returns_to_following() {
        let mut cam = camera();
        cam.start_drag(Vec2::ZERO);
        cam.end_drag();
        cam.toggle_lock();
        assert_eq!(cam.mode(), CameraMode::Following);
    }
}
