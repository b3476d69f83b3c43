use glam::Vec3;
use hecs::World;

use crate::components::{add_child, CollisionMesh, Name, NodeTransform, PickBounds};
use crate::objects::ObjectName;
use crate::scene::{CHARACTER_NODE, GROUND_COLLIDER_NODE};
use crate::spatial::Triangle;

const FLOOR_EXTENT: f32 = 40.0;
const FLOOR_CELLS: usize = 8;

/// Populate the world with the built-in park: an 80x80 walkable floor with
/// a raised platform, the character spawn, and every interactive prop.
pub fn build_park(world: &mut World) {
    let mut triangles = floor_grid();
    platform(&mut triangles, Vec3::new(14.0, 0.0, 14.0), Vec3::new(22.0, 2.0, 22.0));

    world.spawn((
        Name(GROUND_COLLIDER_NODE.to_string()),
        NodeTransform::new(Vec3::ZERO),
        CollisionMesh(triangles),
    ));
    world.spawn((
        Name(CHARACTER_NODE.to_string()),
        NodeTransform::new(Vec3::ZERO),
    ));

    let props: [(ObjectName, Vec3); 11] = [
        (ObjectName::Project1, Vec3::new(-20.0, 0.0, -10.0)),
        (ObjectName::Project2, Vec3::new(-20.0, 0.0, 0.0)),
        (ObjectName::Project3, Vec3::new(-20.0, 0.0, 10.0)),
        (ObjectName::Chicken, Vec3::new(8.0, 0.0, -12.0)),
        (ObjectName::Snorlax, Vec3::new(24.0, 0.0, -6.0)),
        (ObjectName::Pikachu, Vec3::new(12.0, 0.0, 6.0)),
        (ObjectName::Bulbasaur, Vec3::new(-6.0, 0.0, 20.0)),
        (ObjectName::Charmander, Vec3::new(4.0, 0.0, 26.0)),
        (ObjectName::Squirtle, Vec3::new(-12.0, 0.0, -24.0)),
        (ObjectName::Chest, Vec3::new(28.0, 0.0, 24.0)),
        (ObjectName::Picnic, Vec3::new(0.0, 0.0, -30.0)),
    ];
    for (name, position) in props {
        spawn_prop(world, name, position);
    }
}

/// Props are two-level: a named root node and a child mesh node, both with
/// picking volumes, matching how the authored asset nests its meshes.
fn spawn_prop(world: &mut World, name: ObjectName, position: Vec3) {
    let root = world.spawn((
        Name(name.as_str().to_string()),
        NodeTransform::new(position),
        PickBounds {
            center: Vec3::new(0.0, 1.0, 0.0),
            half_extents: Vec3::new(1.2, 1.0, 1.2),
        },
    ));
    let mesh = world.spawn((
        NodeTransform::new(Vec3::ZERO),
        PickBounds {
            center: Vec3::new(0.0, 1.0, 0.0),
            half_extents: Vec3::new(1.0, 1.0, 1.0),
        },
    ));
    add_child(world, root, mesh);
}

/// Two triangles spanning `a b c d`; winding decides the normal.
fn quad(out: &mut Vec<Triangle>, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
    out.push(Triangle { a, b, c });
    out.push(Triangle { a, b: c, c: d });
}

/// The floor is tessellated into a grid so the spatial index has real
/// subdivision work to do instead of one pair of giant triangles.
fn floor_grid() -> Vec<Triangle> {
    let mut triangles = Vec::new();
    let step = FLOOR_EXTENT * 2.0 / FLOOR_CELLS as f32;
    for i in 0..FLOOR_CELLS {
        for j in 0..FLOOR_CELLS {
            let x0 = -FLOOR_EXTENT + i as f32 * step;
            let z0 = -FLOOR_EXTENT + j as f32 * step;
            let (x1, z1) = (x0 + step, z0 + step);
            quad(
                &mut triangles,
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0, 0.0, z1),
                Vec3::new(x1, 0.0, z1),
                Vec3::new(x1, 0.0, z0),
            );
        }
    }
    triangles
}

/// Axis-aligned box standing on the floor: a walkable top and four
/// outward-facing side walls. No bottom face, nothing collides from below.
fn platform(out: &mut Vec<Triangle>, min: Vec3, max: Vec3) {
    let top = max.y;
    quad(
        out,
        Vec3::new(min.x, top, min.z),
        Vec3::new(min.x, top, max.z),
        Vec3::new(max.x, top, max.z),
        Vec3::new(max.x, top, min.z),
    );
    // South (-Z), north (+Z), west (-X), east (+X).
    quad(
        out,
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(min.x, top, min.z),
        Vec3::new(max.x, top, min.z),
        Vec3::new(max.x, min.y, min.z),
    );
    quad(
        out,
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, top, max.z),
        Vec3::new(min.x, top, max.z),
        Vec3::new(min.x, min.y, max.z),
    );
    quad(
        out,
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(min.x, top, max.z),
        Vec3::new(min.x, top, min.z),
        Vec3::new(min.x, min.y, min.z),
    );
    quad(
        out,
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, top, min.z),
        Vec3::new(max.x, top, max.z),
        Vec3::new(max.x, min.y, max.z),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_triangles_face_up() {
        for triangle in floor_grid() {
            assert!(triangle.normal().y > 0.99);
        }
    }

    #[test]
    fn platform_walls_face_outward() {
        let mut triangles = Vec::new();
        let min = Vec3::new(14.0, 0.0, 14.0);
        let max = Vec3::new(22.0, 2.0, 22.0);
        platform(&mut triangles, min, max);
        let center = (min + max) / 2.0;

        for triangle in triangles {
            let n = triangle.normal();
            let midpoint = (triangle.a + triangle.b + triangle.c) / 3.0;
            assert!(n.dot(midpoint - center) > 0.0);
        }
    }

    #[test]
    fn every_interactive_name_is_placed_once() {
        let mut world = World::new();
        build_park(&mut world);

        for name in ObjectName::ALL {
            let count = world
                .query::<(&Name,)>()
                .iter()
                .filter(|(_, (n,))| n.0 == name.as_str())
                .count();
            assert_eq!(count, 1, "{}", name.as_str());
        }
    }
}
