pub mod park;

use hecs::{Entity, World};
use thiserror::Error;

use crate::components::{CollisionMesh, Hidden, Name, NodeTransform};
use crate::objects::{InteractiveObject, ObjectName, ObjectStateStore, RestState};
use crate::spatial::Octree;
use crate::systems::player::Player;

/// Reserved node name: the playable character's scene node.
pub const CHARACTER_NODE: &str = "Character";
/// Reserved node name: the invisible walkable-world collision mesh.
pub const GROUND_COLLIDER_NODE: &str = "Ground_Collider";

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("collider node `{0}` carries no collision triangles")]
    EmptyColliderMesh(String),
    #[error("interactive node `{0}` appears more than once")]
    DuplicateObject(&'static str),
}

/// Everything the app needs out of a loaded scene: the spatial index, the
/// interactive registry with its initial rest poses, and the character if
/// the asset ships one.
pub struct SceneScan {
    pub player: Option<Player>,
    pub character_node: Option<Entity>,
    pub world_collider: Octree,
    pub registry: Vec<InteractiveObject>,
    pub store: ObjectStateStore,
}

/// Walk every named node once and sort it into its role. Reserved names are
/// consumed (the collider is hidden in place), interactive names populate
/// the registry, anything else is decoration and is left alone.
///
/// A scene without a `Character` node still scans; movement is simply
/// unavailable and a warning is logged.
pub fn scan(world: &mut World) -> Result<SceneScan, SceneError> {
    let mut player = None;
    let mut character_node = None;
    let mut collider = None;
    let mut registry: Vec<InteractiveObject> = Vec::new();
    let mut store = ObjectStateStore::default();

    for (entity, (name, transform)) in world.query::<(&Name, &NodeTransform)>().iter() {
        if name.0 == CHARACTER_NODE {
            player = Some(Player::spawn_at(transform.position));
            character_node = Some(entity);
            continue;
        }
        if name.0 == GROUND_COLLIDER_NODE {
            collider = Some(entity);
            continue;
        }
        let Some(object) = ObjectName::parse(&name.0) else {
            continue;
        };
        if registry.iter().any(|o| o.name == object) {
            return Err(SceneError::DuplicateObject(object.as_str()));
        }
        registry.push(InteractiveObject {
            name: object,
            node: entity,
            highlighted: false,
        });
        store.set(
            object,
            RestState {
                position: transform.position,
                rotation: transform.rotation,
                scale: transform.scale,
            },
        );
    }

    let world_collider = match collider {
        Some(entity) => {
            let triangles = world
                .get::<&CollisionMesh>(entity)
                .map(|mesh| mesh.0.clone())
                .unwrap_or_default();
            if triangles.is_empty() {
                return Err(SceneError::EmptyColliderMesh(
                    GROUND_COLLIDER_NODE.to_string(),
                ));
            }
            let _ = world.insert_one(entity, Hidden);
            Octree::build(triangles)
        }
        None => {
            log::warn!("scene has no `{GROUND_COLLIDER_NODE}` node, collisions disabled");
            Octree::empty()
        }
    };

    if player.is_none() {
        log::warn!("scene has no `{CHARACTER_NODE}` node, movement disabled");
    }

    registry.sort_by_key(|o| o.name.as_str());
    log::info!(
        "scene scan: {} interactive objects, {} collision triangles",
        registry.len(),
        world_collider.triangle_count()
    );

    Ok(SceneScan {
        player,
        character_node,
        world_collider,
        registry,
        store,
    })
}
