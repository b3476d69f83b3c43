use glam::{Vec2, Vec3};
use hecs::{Entity, World};

use crate::camera::Camera;
use crate::components::{world_position, NodeTransform};
use crate::engine::input::InputFrame;
use crate::objects::{Interaction, InteractiveObject, ObjectName, ObjectStateStore};
use crate::scene::SceneScan;
use crate::spatial::Octree;
use crate::systems::bounce::{BounceSim, BounceStatus};
use crate::systems::interact;
use crate::systems::player::{player_tick, ControlMap, Player};

/// Session lifecycle. Movement, camera follow and click dispatch all wait
/// for the visitor to press start; hover feedback runs in every phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Ready,
    Started,
}

/// Audio cue requests for the platform collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundId {
    Hop,
    Bounce,
    Panel,
}

/// Everything one frame asks the embedding shell to do.
#[derive(Debug, Default)]
pub struct FrameEvents {
    pub sounds: Vec<SoundId>,
    pub panels: Vec<ObjectName>,
    pub pointer_cursor: bool,
}

pub struct ParkApp {
    pub world: World,
    pub camera: Camera,
    pub player: Option<Player>,
    character_node: Option<Entity>,
    world_collider: Octree,
    pub controls: ControlMap,
    pub registry: Vec<InteractiveObject>,
    pub store: ObjectStateStore,
    bounces: Vec<BounceSim>,
    phase: SessionPhase,
    seed: u64,
    triggered: u64,
}

impl ParkApp {
    pub fn new(world: World, scan: SceneScan, aspect: f32, seed: u64) -> Self {
        Self {
            world,
            camera: Camera::new(aspect),
            player: scan.player,
            character_node: scan.character_node,
            world_collider: scan.world_collider,
            controls: ControlMap::default(),
            registry: scan.registry,
            store: scan.store,
            bounces: Vec::new(),
            phase: SessionPhase::Loading,
            seed,
            triggered: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Assets are in. The start prompt may now be shown.
    pub fn finish_loading(&mut self) {
        if self.phase == SessionPhase::Loading {
            self.phase = SessionPhase::Ready;
        }
    }

    /// The visitor pressed start. Only valid from `Ready`.
    pub fn start(&mut self) -> bool {
        if self.phase == SessionPhase::Ready {
            self.phase = SessionPhase::Started;
            return true;
        }
        false
    }

    /// Advance the whole park by one frame: player, camera, hover, click
    /// dispatch, then every live bounce.
    pub fn frame(&mut self, input: &InputFrame, dt: f32, now_ms: u64) -> FrameEvents {
        let mut events = FrameEvents::default();

        // The park is static until the visitor presses start: no movement,
        // no camera drift, just hover feedback.
        if self.phase == SessionPhase::Started {
            if let Some(player) = &mut self.player {
                if player_tick(player, &self.world_collider, input, &self.controls, dt, now_ms) {
                    events.sounds.push(SoundId::Hop);
                }
                let position = player.position();
                let heading = player.heading;
                if let Some(node) = self.character_node {
                    if let Ok(mut transform) = self.world.get::<&mut NodeTransform>(node) {
                        transform.position = position;
                        transform.rotation.y = heading;
                    }
                }
                self.camera.follow(position);
            }
        }

        events.pointer_cursor =
            interact::hover(&self.world, &mut self.registry, &self.camera, input.pointer_ndc);

        if input.clicked && self.phase == SessionPhase::Started {
            if let Some((name, interaction)) =
                interact::click(&self.world, &mut self.registry, &self.camera, input.pointer_ndc)
            {
                match interaction {
                    Interaction::Bounce => {
                        if self.trigger_bounce(name) {
                            events.sounds.push(SoundId::Bounce);
                        }
                    }
                    Interaction::Panel => {
                        events.panels.push(name);
                        events.sounds.push(SoundId::Panel);
                    }
                }
            }
        }

        self.bounces
            .retain_mut(|sim| sim.advance(&mut self.world, &mut self.store) == BounceStatus::Running);

        events
    }

    /// Launch a bounce for `name`. A click on an object that is already
    /// mid-bounce is ignored; the running sim keeps the transform.
    fn trigger_bounce(&mut self, name: ObjectName) -> bool {
        if self.bounces.iter().any(|sim| sim.name == name) {
            return false;
        }
        let Some(node) = self.registry.iter().find(|o| o.name == name).map(|o| o.node) else {
            return false;
        };
        let seed = self.seed.wrapping_add(self.triggered);
        self.triggered += 1;
        if let Some(sim) = BounceSim::start(name, node, &self.world, &self.store, seed) {
            self.bounces.push(sim);
            return true;
        }
        false
    }

    pub fn bounces_running(&self) -> usize {
        self.bounces.len()
    }

    /// Pointer coordinates that would land a click on `name`. Used by the
    /// scripted demo loop and by tests.
    pub fn ndc_of(&self, name: ObjectName) -> Option<Vec2> {
        let node = self.registry.iter().find(|o| o.name == name)?.node;
        let point = world_position(&self.world, node) + Vec3::new(0.0, 1.0, 0.0);
        Some(self.camera.world_to_ndc(point))
    }
}
