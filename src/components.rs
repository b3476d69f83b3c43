use glam::Vec3;
use hecs::{Entity, World};

use crate::spatial::Triangle;

/// Node transform as authored in the scene asset. Rotation is kept as Euler
/// angles because the bounce simulation accumulates per-axis spin and the
/// rest-state store records plain 3-tuples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl NodeTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Node name as authored in the scene asset.
pub struct Name(pub String);

/// Points to the parent entity in the scene hierarchy.
pub struct Parent(pub Entity);

/// Lists child entities in the scene hierarchy.
pub struct Children(pub Vec<Entity>);

/// Attach `child` under `parent` in the scene hierarchy.
pub fn add_child(world: &mut World, parent: Entity, child: Entity) {
    let has_children = world.get::<&Children>(parent).is_ok();
    if has_children {
        let mut children = world.get::<&mut Children>(parent).unwrap();
        if !children.0.contains(&child) {
            children.0.push(child);
        }
    } else {
        world.insert_one(parent, Children(vec![child])).unwrap();
    }

    let _ = world.insert_one(child, Parent(parent));
}

/// Marker: node is excluded from rendering. The collision mesh stays
/// queryable after the scene scan hides it.
pub struct Hidden;

/// World-space triangle soup used to build the spatial index.
pub struct CollisionMesh(pub Vec<Triangle>);

/// Picking volume for the pointer raycast, local to the owning node.
/// `half_extents` are scaled by the node's current scale at query time so a
/// mid-squash prop still picks correctly.
#[derive(Clone, Copy, Debug)]
pub struct PickBounds {
    pub center: Vec3,
    pub half_extents: Vec3,
}

/// Sum translations up the Parent chain. Rotation and scale of ancestors are
/// ignored; interactive props sit at the hierarchy root so this is exact for
/// every picking query we issue.
pub fn world_position(world: &World, entity: Entity) -> Vec3 {
    let mut position = Vec3::ZERO;
    let mut current = Some(entity);
    while let Some(e) = current {
        if let Ok(transform) = world.get::<&NodeTransform>(e) {
            position += transform.position;
        }
        current = world.get::<&Parent>(e).ok().map(|p| p.0);
    }
    position
}
