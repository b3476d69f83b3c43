use glam::{Vec2, Vec3};

// Frustum half-height of the orthographic view before zoom; half-width is
// this times the aspect ratio.
const FRUSTUM_HALF_HEIGHT: f32 = 50.0;
const ZOOM: f32 = 2.0;

// Fixed third-person offset from the player.
const FOLLOW_OFFSET: Vec3 = Vec3::new(-35.0, 50.0, -60.0);

// Exponential smoothing factor applied to both position and orbit target.
const FOLLOW_LERP: f32 = 0.1;

/// Orthographic follow camera. Owns nothing but its own position and orbit
/// target; the player controller must have finished its tick before
/// `follow` reads the resulting position.
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    half_extents: Vec2,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(-30.0, 50.0, -55.0),
            target: Vec3::new(5.0, 5.0, -5.0),
            half_extents: Vec2::new(aspect * FRUSTUM_HALF_HEIGHT / ZOOM, FRUSTUM_HALF_HEIGHT / ZOOM),
        }
    }

    /// Ease toward the player: 10% of the remaining error per frame, for
    /// both the camera position and the orbit target.
    pub fn follow(&mut self, player_position: Vec3) {
        let desired = player_position + FOLLOW_OFFSET;
        self.position = self.position.lerp(desired, FOLLOW_LERP);
        self.target = self.target.lerp(player_position, FOLLOW_LERP);
    }

    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        (forward, right, up)
    }

    /// Ray through a pointer position in normalized device coordinates.
    /// Orthographic projection: the origin slides across the view plane and
    /// the direction is constant.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let (forward, right, up) = self.basis();
        let origin =
            self.position + right * (ndc.x * self.half_extents.x) + up * (ndc.y * self.half_extents.y);
        (origin, forward)
    }

    /// Project a world point back into normalized device coordinates.
    pub fn world_to_ndc(&self, point: Vec3) -> Vec2 {
        let (_, right, up) = self.basis();
        let delta = point - self.position;
        Vec2::new(
            delta.dot(right) / self.half_extents.x,
            delta.dot(up) / self.half_extents.y,
        )
    }
}
