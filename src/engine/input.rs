use glam::Vec2;

/// One frame of merged input from the platform collaborator. Direction
/// flags arrive already debounced and merged (keyboard or touch d-pad);
/// `clicked` and `respawn_requested` are single-frame edges, not levels.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputFrame {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer position in normalized device coordinates, +Y up.
    pub pointer_ndc: Vec2,
    pub clicked: bool,
    pub respawn_requested: bool,
}
