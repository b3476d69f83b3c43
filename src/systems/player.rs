use glam::Vec3;

use crate::engine::input::InputFrame;
use crate::spatial::{Capsule, Contact, Octree};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const GRAVITY: f32 = 30.0;
pub const CAPSULE_RADIUS: f32 = 0.8;
pub const CAPSULE_HEIGHT: f32 = 1.2;
pub const JUMP_HEIGHT: f32 = 18.0;
pub const MOVE_SPEED: f32 = 16.0;
pub const HOP_COOLDOWN_MS: u32 = 300;

// Hops are softer than a full jump.
const HOP_SCALE: f32 = 0.8;

// Below this height the player has fallen out of the world.
const RESPAWN_Y: f32 = -20.0;

// Fraction of the remaining angular error applied per tick.
const HEADING_EASE: f32 = 0.2;

// Airborne damping is scaled down for reduced air control.
const AIR_DAMPING_SCALE: f32 = 0.1;

// ---------------------------------------------------------------------------
// Input mapping
// ---------------------------------------------------------------------------

/// Camera-relative mapping from direction flags to movement axes and target
/// headings. This is configuration, not physics: the values below reproduce
/// the shipped camera convention (up walks along +X, headings measured
/// clockwise from +X with up = 0).
#[derive(Clone, Copy, Debug)]
pub struct ControlMap {
    pub up_axis: Vec3,
    pub down_axis: Vec3,
    pub left_axis: Vec3,
    pub right_axis: Vec3,
    pub heading_up: f32,
    pub heading_down: f32,
    pub heading_left: f32,
    pub heading_right: f32,
    pub heading_up_left: f32,
    pub heading_up_right: f32,
    pub heading_down_left: f32,
    pub heading_down_right: f32,
}

impl Default for ControlMap {
    fn default() -> Self {
        use std::f32::consts::PI;
        Self {
            up_axis: Vec3::X,
            down_axis: -Vec3::X,
            left_axis: -Vec3::Z,
            right_axis: Vec3::Z,
            heading_up: 0.0,
            heading_down: PI,
            heading_left: PI / 2.0,
            heading_right: -PI / 2.0,
            heading_up_left: PI / 4.0,
            heading_up_right: -PI / 4.0,
            heading_down_left: PI * 0.75,
            heading_down_right: -PI * 0.75,
        }
    }
}

impl ControlMap {
    /// Movement direction for the pressed flags, normalized to unit length
    /// (zero when nothing is pressed).
    pub fn movement(&self, input: &InputFrame) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if input.up {
            dir += self.up_axis;
        }
        if input.down {
            dir += self.down_axis;
        }
        if input.left {
            dir += self.left_axis;
        }
        if input.right {
            dir += self.right_axis;
        }
        dir.normalize_or_zero()
    }

    /// 8-way target heading. Cardinals require the orthogonal flags to be
    /// clear, so diagonals win when two orthogonal flags are set. Returns
    /// `None` for combinations with no defined heading (heading then stays
    /// unchanged).
    pub fn target_heading(&self, input: &InputFrame) -> Option<f32> {
        if input.up && !input.left && !input.right {
            Some(self.heading_up)
        } else if input.down && !input.left && !input.right {
            Some(self.heading_down)
        } else if input.left && !input.up && !input.down {
            Some(self.heading_left)
        } else if input.right && !input.up && !input.down {
            Some(self.heading_right)
        } else if input.up && input.right {
            Some(self.heading_up_right)
        } else if input.up && input.left {
            Some(self.heading_up_left)
        } else if input.down && input.right {
            Some(self.heading_down_right)
        } else if input.down && input.left {
            Some(self.heading_down_left)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Player state
// ---------------------------------------------------------------------------

/// Kinematic state of the player. Created once when the scene scan finds
/// the Character node; reset via respawn, never recreated.
pub struct Player {
    pub capsule: Capsule,
    pub velocity: Vec3,
    pub on_floor: bool,
    pub spawn_position: Vec3,
    pub last_hop_ms: u64,
    pub hop_cooldown_ms: u32,
    pub heading: f32,
    pub target_heading: f32,
}

impl Player {
    pub fn spawn_at(position: Vec3) -> Self {
        Self {
            capsule: Capsule::new(
                position + Vec3::new(0.0, CAPSULE_RADIUS, 0.0),
                position + Vec3::new(0.0, CAPSULE_HEIGHT, 0.0),
                CAPSULE_RADIUS,
            ),
            velocity: Vec3::ZERO,
            on_floor: false,
            spawn_position: position,
            last_hop_ms: 0,
            hop_cooldown_ms: HOP_COOLDOWN_MS,
            heading: 0.0,
            target_heading: 0.0,
        }
    }

    /// Character feet position: the capsule's lower sphere center dropped
    /// by the radius.
    pub fn position(&self) -> Vec3 {
        self.capsule.start - Vec3::new(0.0, CAPSULE_RADIUS, 0.0)
    }

    pub fn respawn(&mut self) {
        self.capsule.start = self.spawn_position + Vec3::new(0.0, CAPSULE_RADIUS, 0.0);
        self.capsule.end = self.spawn_position + Vec3::new(0.0, CAPSULE_HEIGHT, 0.0);
        self.velocity = Vec3::ZERO;
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Advance the player one frame. Returns `true` when a hop fired this tick
/// (the caller turns that into a sound cue).
pub fn player_tick(
    player: &mut Player,
    world_collider: &Octree,
    input: &InputFrame,
    controls: &ControlMap,
    dt: f32,
    now_ms: u64,
) -> bool {
    // Fell out of the world, or the respawn key: snap back and skip the
    // rest of this tick.
    if input.respawn_requested || player.position().y < RESPAWN_Y {
        player.respawn();
        return false;
    }

    let mut damping = (-4.0 * dt).exp() - 1.0;
    if !player.on_floor {
        player.velocity.y -= GRAVITY * dt;
        damping *= AIR_DAMPING_SCALE;
    }
    player.velocity += player.velocity * damping;

    let move_dir = controls.movement(input);
    let mut hopped = false;
    if move_dir != Vec3::ZERO {
        // Locomotion is a chain of small hops: re-launch whenever grounded
        // and the cooldown has elapsed.
        if player.on_floor && now_ms.saturating_sub(player.last_hop_ms) > player.hop_cooldown_ms as u64
        {
            player.velocity.y = JUMP_HEIGHT * HOP_SCALE;
            player.last_hop_ms = now_ms;
            hopped = true;
        }
        if let Some(heading) = controls.target_heading(input) {
            player.target_heading = heading;
        }
    }

    // Two-phase resolution: horizontal sweep, then vertical, each followed
    // by a full collision correction.
    player.capsule.translate(move_dir * (MOVE_SPEED * dt));
    resolve_collisions(player, world_collider);

    player
        .capsule
        .translate(Vec3::new(0.0, player.velocity.y * dt, 0.0));
    resolve_collisions(player, world_collider);

    // Turn 20% of the shortest angular path toward the target heading.
    let diff = wrap_angle(player.target_heading - player.heading);
    player.heading += diff * HEADING_EASE;

    hopped
}

/// Wrap an angle into [-pi, pi).
fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::PI;
    ((angle % (2.0 * PI)) + 3.0 * PI) % (2.0 * PI) - PI
}

fn resolve_collisions(player: &mut Player, world_collider: &Octree) {
    player.on_floor = false;
    if let Some(contact) = world_collider.capsule_intersect(&player.capsule) {
        apply_contact(player, &contact);
    }
}

/// Respond to a single contact: classify floor vs wall by the normal's
/// vertical component, slide along walls, always push the capsule out.
pub fn apply_contact(player: &mut Player, contact: &Contact) {
    player.on_floor = contact.normal.y > 0.0;
    if !player.on_floor {
        // Remove only the penetrating velocity component; tangential
        // velocity survives so the player slides along the surface.
        player.velocity -= contact.normal * contact.normal.dot(player.velocity);
    }
    player.capsule.translate(contact.normal * contact.depth);
}
