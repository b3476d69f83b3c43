use glam::Vec3;
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::NodeTransform;
use crate::objects::{ObjectName, ObjectStateStore, RestState};

/// Fixed integration step. The app advances each live sim once per rendered
/// frame, so the playful physics run slightly slow on high-refresh displays
/// rather than exploding on dropped frames.
pub const BOUNCE_DT: f32 = 1.0 / 60.0;

const LAUNCH_VERTICAL: f32 = 15.0;
const LAUNCH_HORIZONTAL: f32 = 8.0;
const GRAVITY: f32 = 25.0;
const GROUND_RESTITUTION: f32 = 0.7;
const WALL_RESTITUTION: f32 = 0.8;
const WANDER_LIMIT: f32 = 4.0;
const SPIN_IMPULSE: f32 = 0.5;
const SLOW_SPEED: f32 = 3.0;
const SLOW_DAMPING: f32 = 0.8;
const SETTLE_SPEED: f32 = 1.0;
const SETTLE_HEIGHT: f32 = 0.2;
const SETTLE_VERTICAL: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BounceStatus {
    Running,
    Settled,
}

/// One decorative object mid-bounce. The sim owns the object's transform
/// until it settles; the rest state recorded at launch anchors both the
/// ground plane and how far the object may wander.
pub struct BounceSim {
    pub name: ObjectName,
    node: Entity,
    position: Vec3,
    velocity: Vec3,
    rotation: Vec3,
    anchor: Vec3,
    ground_level: f32,
    bounce_count: u32,
    rng: StdRng,
}

impl BounceSim {
    /// Launch an object. The anchor comes from the rest store when the
    /// object has settled before, otherwise from where it stands now.
    pub fn start(
        name: ObjectName,
        node: Entity,
        world: &World,
        store: &ObjectStateStore,
        seed: u64,
    ) -> Option<Self> {
        let transform = world.get::<&NodeTransform>(node).ok()?;
        let anchor = store
            .get(name)
            .map(|rest| rest.position)
            .unwrap_or(transform.position);

        let mut rng = StdRng::seed_from_u64(seed);
        let velocity = Vec3::new(
            (rng.gen::<f32>() - 0.5) * LAUNCH_HORIZONTAL,
            LAUNCH_VERTICAL,
            (rng.gen::<f32>() - 0.5) * LAUNCH_HORIZONTAL,
        );

        Some(Self {
            name,
            node,
            position: transform.position,
            velocity,
            rotation: transform.rotation,
            anchor,
            ground_level: anchor.y,
            bounce_count: 0,
            rng,
        })
    }

    pub fn node(&self) -> Entity {
        self.node
    }

    /// One fixed step. Returns `Settled` once the object has come to rest,
    /// after snapping it to the ground and recording the pose in the store.
    pub fn advance(&mut self, world: &mut World, store: &mut ObjectStateStore) -> BounceStatus {
        if self.is_settled() {
            self.position.y = self.ground_level;
            let rest = RestState {
                position: self.position,
                rotation: self.rotation,
                scale: Vec3::ONE,
            };
            self.write_transform(world, rest.position, rest.rotation, rest.scale);
            store.set(self.name, rest);
            return BounceStatus::Settled;
        }

        let pre_step_speed = self.velocity.length();

        self.velocity.y -= GRAVITY * BOUNCE_DT;
        self.position += self.velocity * BOUNCE_DT;

        // Ground impacts only count while descending; an upward pass through
        // ground level is left alone.
        if self.position.y <= self.ground_level && self.velocity.y < 0.0 {
            self.position.y = self.ground_level;
            self.velocity.y = -self.velocity.y * GROUND_RESTITUTION;
            self.velocity.x *= GROUND_RESTITUTION;
            self.velocity.z *= GROUND_RESTITUTION;
            self.bounce_count += 1;

            // Each impact nudges the object sideways a little less than the
            // last, and kicks off some tumble.
            let fade = (1.0 - 0.2 * self.bounce_count as f32).max(0.1);
            self.velocity.x += (self.rng.gen::<f32>() - 0.5) * 2.0 * fade;
            self.velocity.z += (self.rng.gen::<f32>() - 0.5) * 2.0 * fade;
            self.rotation.x += (self.rng.gen::<f32>() - 0.5) * SPIN_IMPULSE;
            self.rotation.z += (self.rng.gen::<f32>() - 0.5) * SPIN_IMPULSE;

            // Slow impacts bleed off extra horizontal motion so the object
            // can come to rest instead of skating.
            if pre_step_speed < SLOW_SPEED {
                self.velocity.x *= SLOW_DAMPING;
                self.velocity.z *= SLOW_DAMPING;
            }
        }

        // Keep the object within a small pen around its anchor.
        for axis in [0, 2] {
            let low = self.anchor[axis] - WANDER_LIMIT;
            let high = self.anchor[axis] + WANDER_LIMIT;
            if self.position[axis] < low {
                self.position[axis] = low;
                self.velocity[axis] = -self.velocity[axis] * WALL_RESTITUTION;
            } else if self.position[axis] > high {
                self.position[axis] = high;
                self.velocity[axis] = -self.velocity[axis] * WALL_RESTITUTION;
            }
        }

        self.rotation.x += self.velocity.z * BOUNCE_DT;
        self.rotation.z += self.velocity.x * BOUNCE_DT;
        self.rotation.y += (self.velocity.x + self.velocity.z) * BOUNCE_DT * 0.5;

        let scale = if self.position.y <= self.ground_level + 0.1 {
            Vec3::new(1.3, 0.7, 1.3)
        } else {
            let stretch = (1.0 + self.velocity.y.abs() / 15.0 * 0.4).min(1.4);
            let squash = (1.0 - self.velocity.length() / 20.0 * 0.4).max(0.6);
            Vec3::new(squash, stretch, squash)
        };

        self.write_transform(world, self.position, self.rotation, scale);
        BounceStatus::Running
    }

    fn is_settled(&self) -> bool {
        self.velocity.length() < SETTLE_SPEED
            && self.position.y <= self.ground_level + SETTLE_HEIGHT
            && self.velocity.y.abs() < SETTLE_VERTICAL
    }

    fn write_transform(&self, world: &mut World, position: Vec3, rotation: Vec3, scale: Vec3) {
        if let Ok(mut transform) = world.get::<&mut NodeTransform>(self.node) {
            transform.position = position;
            transform.rotation = rotation;
            transform.scale = scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_prop(world: &mut World, position: Vec3) -> Entity {
        world.spawn((NodeTransform::new(position),))
    }

    fn run_to_rest(
        sim: &mut BounceSim,
        world: &mut World,
        store: &mut ObjectStateStore,
    ) -> usize {
        for step in 0..5000 {
            if sim.advance(world, store) == BounceStatus::Settled {
                return step;
            }
        }
        panic!("bounce never settled");
    }

    #[test]
    fn settles_in_finite_steps_and_snaps_to_ground() {
        let mut world = World::new();
        let start = Vec3::new(10.0, 0.0, -4.0);
        let node = spawn_prop(&mut world, start);
        let mut store = ObjectStateStore::default();

        let mut sim =
            BounceSim::start(ObjectName::Chicken, node, &world, &store, 11).unwrap();
        run_to_rest(&mut sim, &mut world, &mut store);

        let transform = world.get::<&NodeTransform>(node).unwrap();
        assert_eq!(transform.position.y, start.y);
        assert_eq!(transform.scale, Vec3::ONE);
    }

    #[test]
    fn stays_inside_the_wander_pen() {
        let mut world = World::new();
        let start = Vec3::new(-6.0, 2.0, 8.0);
        let node = spawn_prop(&mut world, start);
        let mut store = ObjectStateStore::default();

        let mut sim =
            BounceSim::start(ObjectName::Pikachu, node, &world, &store, 99).unwrap();
        for _ in 0..5000 {
            let status = sim.advance(&mut world, &mut store);
            let transform = world.get::<&NodeTransform>(node).unwrap();
            assert!((transform.position.x - start.x).abs() <= WANDER_LIMIT + 1e-4);
            assert!((transform.position.z - start.z).abs() <= WANDER_LIMIT + 1e-4);
            drop(transform);
            if status == BounceStatus::Settled {
                return;
            }
        }
        panic!("bounce never settled");
    }

    #[test]
    fn settling_records_the_rest_pose() {
        let mut world = World::new();
        let node = spawn_prop(&mut world, Vec3::new(0.0, 0.0, 0.0));
        let mut store = ObjectStateStore::default();

        let mut sim =
            BounceSim::start(ObjectName::Squirtle, node, &world, &store, 3).unwrap();
        run_to_rest(&mut sim, &mut world, &mut store);

        let rest = store.get(ObjectName::Squirtle).expect("rest pose stored");
        assert_eq!(rest.position.y, 0.0);
        assert_eq!(rest.scale, Vec3::ONE);
    }

    #[test]
    fn airborne_steps_do_not_damp_horizontal_velocity() {
        let mut world = World::new();
        let node = spawn_prop(&mut world, Vec3::ZERO);
        let mut store = ObjectStateStore::default();

        let mut sim = BounceSim::start(ObjectName::Snorlax, node, &world, &store, 5).unwrap();
        sim.position.y = 2.0;
        sim.velocity = Vec3::new(1.0, 1.0, 1.0);

        assert_eq!(sim.advance(&mut world, &mut store), BounceStatus::Running);
        // Only ground impacts damp sideways motion; in the air it carries.
        assert_eq!(sim.velocity.x, 1.0);
        assert_eq!(sim.velocity.z, 1.0);
    }

    #[test]
    fn ascending_through_ground_level_is_not_an_impact() {
        let mut world = World::new();
        let node = spawn_prop(&mut world, Vec3::ZERO);
        let mut store = ObjectStateStore::default();

        // Slightly below ground but moving up fast enough to stay ascending
        // after one step of gravity.
        let mut sim = BounceSim::start(ObjectName::Bulbasaur, node, &world, &store, 5).unwrap();
        sim.position.y = -0.002;
        sim.velocity = Vec3::new(0.0, 0.5, 0.0);

        assert_eq!(sim.advance(&mut world, &mut store), BounceStatus::Running);
        assert_eq!(sim.bounce_count, 0);
        assert!(sim.velocity.y > 0.0);
    }

    #[test]
    fn later_launches_anchor_on_the_stored_pose() {
        let mut world = World::new();
        let node = spawn_prop(&mut world, Vec3::new(1.0, 0.0, 1.0));
        let mut store = ObjectStateStore::default();
        store.set(
            ObjectName::Bulbasaur,
            RestState {
                position: Vec3::new(3.0, 0.5, -2.0),
                rotation: Vec3::ZERO,
                scale: Vec3::ONE,
            },
        );

        let mut sim =
            BounceSim::start(ObjectName::Bulbasaur, node, &world, &store, 42).unwrap();
        run_to_rest(&mut sim, &mut world, &mut store);

        // Ground level comes from the stored pose, not the launch position.
        let transform = world.get::<&NodeTransform>(node).unwrap();
        assert_eq!(transform.position.y, 0.5);
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let mut store = ObjectStateStore::default();
        let mut world_a = World::new();
        let mut world_b = World::new();
        let node_a = spawn_prop(&mut world_a, Vec3::ZERO);
        let node_b = spawn_prop(&mut world_b, Vec3::ZERO);

        let mut sim_a =
            BounceSim::start(ObjectName::Charmander, node_a, &world_a, &store, 7).unwrap();
        let mut sim_b =
            BounceSim::start(ObjectName::Charmander, node_b, &world_b, &store, 7).unwrap();

        for _ in 0..120 {
            sim_a.advance(&mut world_a, &mut store);
            sim_b.advance(&mut world_b, &mut store);
            let a = world_a.get::<&NodeTransform>(node_a).unwrap();
            let b = world_b.get::<&NodeTransform>(node_b).unwrap();
            assert_eq!(a.position, b.position);
            assert_eq!(a.rotation, b.rotation);
        }
    }
}
