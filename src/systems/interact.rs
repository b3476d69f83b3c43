use glam::{Vec2, Vec3};
use hecs::{Entity, World};

use crate::camera::Camera;
use crate::components::{world_position, Children, NodeTransform, PickBounds};
use crate::objects::{Interaction, InteractiveObject, ObjectName};

/// Cast the pointer ray against the interactive registry. Tree-inclusive:
/// the named node and every descendant mesh count as a hit on the named
/// ancestor. Returns the nearest hit's owning object, or `None`.
pub fn pick(
    world: &World,
    registry: &[InteractiveObject],
    camera: &Camera,
    pointer_ndc: Vec2,
) -> Option<ObjectName> {
    let (origin, dir) = camera.ray_from_ndc(pointer_ndc);

    let mut best: Option<(ObjectName, f32)> = None;
    let mut nodes = Vec::new();
    for object in registry {
        nodes.clear();
        collect_tree(world, object.node, &mut nodes);
        for &node in &nodes {
            let Ok(bounds) = world.get::<&PickBounds>(node) else {
                continue;
            };
            let scale = world
                .get::<&NodeTransform>(node)
                .map(|t| t.scale)
                .unwrap_or(Vec3::ONE);
            let center = world_position(world, node) + bounds.center;
            let half = bounds.half_extents * scale;

            if let Some(t) = ray_aabb_intersection(origin, dir, center, half) {
                if t > 0.0 && best.map_or(true, |(_, d)| t < d) {
                    best = Some((object.name, t));
                }
            }
        }
    }
    best.map(|(name, _)| name)
}

/// Re-evaluate hover for this frame: highlight exactly the hovered object
/// (if any) and report whether the pointer-cursor affordance should show.
pub fn hover(
    world: &World,
    registry: &mut [InteractiveObject],
    camera: &Camera,
    pointer_ndc: Vec2,
) -> bool {
    let hit = pick(world, registry, camera, pointer_ndc);
    for object in registry.iter_mut() {
        object.highlighted = hit == Some(object.name);
    }
    hit.is_some()
}

/// Resolve a click: pick the object under the pointer, clear its highlight,
/// and classify it for the caller. The caller is responsible for gating
/// clicks on session state.
pub fn click(
    world: &World,
    registry: &mut [InteractiveObject],
    camera: &Camera,
    pointer_ndc: Vec2,
) -> Option<(ObjectName, Interaction)> {
    let name = pick(world, registry, camera, pointer_ndc)?;
    if let Some(object) = registry.iter_mut().find(|o| o.name == name) {
        object.highlighted = false;
    }
    Some((name, name.interaction()))
}

fn collect_tree(world: &World, root: Entity, out: &mut Vec<Entity>) {
    out.push(root);
    if let Ok(children) = world.get::<&Children>(root) {
        for &child in &children.0 {
            collect_tree(world, child, out);
        }
    }
}

/// Slab test against an AABB given as center + half-extents. Infinities
/// from zero direction components fall out of the min/max chain naturally.
fn ray_aabb_intersection(origin: Vec3, dir: Vec3, center: Vec3, half: Vec3) -> Option<f32> {
    let min = center - half;
    let max = center + half;
    let inv_dir = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);

    let t1 = (min.x - origin.x) * inv_dir.x;
    let t2 = (max.x - origin.x) * inv_dir.x;
    let t3 = (min.y - origin.y) * inv_dir.y;
    let t4 = (max.y - origin.y) * inv_dir.y;
    let t5 = (min.z - origin.z) * inv_dir.z;
    let t6 = (max.z - origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }
    // Ray starting inside the box hits at tmax.
    Some(if tmin < 0.0 { tmax } else { tmin })
}
