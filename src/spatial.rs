use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self { min, max }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Swept-sphere collision volume for the player's body. Vertical by
/// construction: `end.y > start.y`, radius fixed for the capsule's lifetime.
#[derive(Clone, Debug)]
pub struct Capsule {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl Capsule {
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        debug_assert!(end.y > start.y);
        Self { start, end, radius }
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.start += delta;
        self.end += delta;
    }

    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&[self.start, self.end]).expanded(self.radius)
    }
}

/// A single contact reported by the spatial index: push the capsule out
/// along `normal * depth` to separate it from the world.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    pub normal: Vec3,
    pub depth: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest points between segments `p1..q1` and `p2..q2`.
fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    const EPS: f32 = 1e-10;
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    if a <= EPS && e <= EPS {
        return (p1, p2);
    }
    if a <= EPS {
        let t = (f / e).clamp(0.0, 1.0);
        return (p1, p2 + d2 * t);
    }
    let c = d1.dot(r);
    if e <= EPS {
        let s = (-c / a).clamp(0.0, 1.0);
        return (p1 + d1 * s, p2);
    }

    let b = d1.dot(d2);
    let denom = a * e - b * b;
    let mut s = if denom.abs() > EPS {
        ((b * f - c * e) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut t = (b * s + f) / e;
    if t < 0.0 {
        t = 0.0;
        s = (-c / a).clamp(0.0, 1.0);
    } else if t > 1.0 {
        t = 1.0;
        s = ((b - c) / a).clamp(0.0, 1.0);
    }
    (p1 + d1 * s, p2 + d2 * t)
}

impl Triangle {
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&[self.a, self.b, self.c])
    }

    /// Barycentric point-in-triangle test for a point already on (or near)
    /// the triangle's plane.
    fn contains_point(&self, p: Vec3) -> bool {
        let v0 = self.c - self.a;
        let v1 = self.b - self.a;
        let v2 = p - self.a;
        let dot00 = v0.dot(v0);
        let dot01 = v0.dot(v1);
        let dot02 = v0.dot(v2);
        let dot11 = v1.dot(v1);
        let dot12 = v1.dot(v2);
        let denom = dot00 * dot11 - dot01 * dot01;
        if denom.abs() < 1e-12 {
            return false;
        }
        let inv = 1.0 / denom;
        let u = (dot11 * dot02 - dot01 * dot12) * inv;
        let v = (dot00 * dot12 - dot01 * dot02) * inv;
        u >= 0.0 && v >= 0.0 && u + v <= 1.0
    }

    /// Capsule-vs-triangle intersection. Tries the face first (deepest point
    /// of the capsule segment against the triangle's plane), then falls back
    /// to the three edges.
    pub fn capsule_intersect(&self, capsule: &Capsule) -> Option<Contact> {
        let normal = self.normal();
        if normal == Vec3::ZERO {
            return None;
        }
        let plane_d = normal.dot(self.a);
        let d1 = normal.dot(capsule.start) - plane_d - capsule.radius;
        let d2 = normal.dot(capsule.end) - plane_d - capsule.radius;
        if (d1 > 0.0 && d2 > 0.0) || (d1 < -capsule.radius && d2 < -capsule.radius) {
            return None;
        }

        let span = d1.abs() + d2.abs();
        let delta = if span > 1e-12 { (d1 / span).abs() } else { 0.0 };
        let deepest = capsule.start.lerp(capsule.end, delta);
        if self.contains_point(deepest) {
            return Some(Contact {
                normal,
                depth: d1.min(d2).abs(),
            });
        }

        let r_sq = capsule.radius * capsule.radius;
        let edges = [(self.a, self.b), (self.b, self.c), (self.c, self.a)];
        for (ea, eb) in edges {
            let (on_capsule, on_edge) =
                closest_points_between_segments(capsule.start, capsule.end, ea, eb);
            let dist_sq = on_capsule.distance_squared(on_edge);
            if dist_sq < r_sq {
                let dist = dist_sq.sqrt();
                if dist < 1e-6 {
                    continue;
                }
                return Some(Contact {
                    normal: (on_capsule - on_edge) / dist,
                    depth: capsule.radius - dist,
                });
            }
        }
        None
    }
}

const MAX_TRIS_PER_CELL: usize = 8;
const MAX_DEPTH: u32 = 4;

struct Cell {
    bounds: Aabb,
    // Leaf cells hold triangle indices; interior cells hold eight children.
    triangles: Vec<u32>,
    children: Vec<Cell>,
}

impl Cell {
    fn build(bounds: Aabb, indices: Vec<u32>, triangles: &[Triangle], depth: u32) -> Self {
        if indices.len() <= MAX_TRIS_PER_CELL || depth >= MAX_DEPTH {
            return Self {
                bounds,
                triangles: indices,
                children: Vec::new(),
            };
        }

        let center = bounds.center();
        let mut children = Vec::with_capacity(8);
        let mut made_progress = false;
        for octant in 0..8u32 {
            let corner = Vec3::new(
                if octant & 1 == 0 { bounds.min.x } else { bounds.max.x },
                if octant & 2 == 0 { bounds.min.y } else { bounds.max.y },
                if octant & 4 == 0 { bounds.min.z } else { bounds.max.z },
            );
            let child_bounds = Aabb::from_points(&[center, corner]);
            let child_indices: Vec<u32> = indices
                .iter()
                .copied()
                .filter(|&i| triangles[i as usize].aabb().intersects(&child_bounds))
                .collect();
            if child_indices.len() < indices.len() {
                made_progress = true;
            }
            children.push(Cell::build(child_bounds, child_indices, triangles, depth + 1));
        }

        // Degenerate geometry that lands in every octant would recurse forever.
        if !made_progress {
            return Self {
                bounds,
                triangles: indices,
                children: Vec::new(),
            };
        }

        Self {
            bounds,
            triangles: Vec::new(),
            children,
        }
    }

    fn gather(&self, query: &Aabb, out: &mut Vec<u32>) {
        if !self.bounds.intersects(query) {
            return;
        }
        out.extend_from_slice(&self.triangles);
        for child in &self.children {
            child.gather(query, out);
        }
    }
}

/// Static partition of the world collision mesh. Built once at load time
/// from the `Ground_Collider` triangle soup, read-only thereafter.
pub struct Octree {
    triangles: Vec<Triangle>,
    root: Option<Cell>,
}

impl Octree {
    pub fn build(triangles: Vec<Triangle>) -> Self {
        if triangles.is_empty() {
            return Self {
                triangles,
                root: None,
            };
        }
        let mut points = Vec::with_capacity(triangles.len() * 3);
        for t in &triangles {
            points.extend_from_slice(&[t.a, t.b, t.c]);
        }
        let bounds = Aabb::from_points(&points).expanded(0.1);
        let indices: Vec<u32> = (0..triangles.len() as u32).collect();
        let root = Cell::build(bounds, indices, &triangles, 0);
        Self {
            triangles,
            root: Some(root),
        }
    }

    pub fn empty() -> Self {
        Self::build(Vec::new())
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Intersect a capsule against the world. Resolves the capsule against
    /// every candidate triangle in turn and reports the net displacement as
    /// a single contact, or `None` when the capsule is free.
    pub fn capsule_intersect(&self, capsule: &Capsule) -> Option<Contact> {
        let root = self.root.as_ref()?;

        let mut candidates = Vec::new();
        root.gather(&capsule.aabb(), &mut candidates);
        candidates.sort_unstable();
        candidates.dedup();

        let mut probe = capsule.clone();
        let mut hit = false;
        for index in candidates {
            if let Some(contact) = self.triangles[index as usize].capsule_intersect(&probe) {
                hit = true;
                probe.translate(contact.normal * contact.depth);
            }
        }
        if !hit {
            return None;
        }

        let displacement = probe.center() - capsule.center();
        let depth = displacement.length();
        if depth < 1e-6 {
            return None;
        }
        Some(Contact {
            normal: displacement / depth,
            depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_quad(size: f32, y: f32) -> Vec<Triangle> {
        let s = size * 0.5;
        let a = Vec3::new(-s, y, -s);
        let b = Vec3::new(-s, y, s);
        let c = Vec3::new(s, y, s);
        let d = Vec3::new(s, y, -s);
        // Wound so both normals point up.
        vec![Triangle { a, b, c }, Triangle { a: c, b: d, c: a }]
    }

    fn standing_capsule(feet: Vec3) -> Capsule {
        Capsule::new(
            feet + Vec3::new(0.0, 0.8, 0.0),
            feet + Vec3::new(0.0, 1.2, 0.0),
            0.8,
        )
    }

    #[test]
    fn floor_contact_reports_upward_normal() {
        let octree = Octree::build(floor_quad(40.0, 0.0));
        // Feet 0.1 below the surface: bottom sphere penetrates the floor.
        let capsule = standing_capsule(Vec3::new(0.0, -0.1, 0.0));

        let contact = octree.capsule_intersect(&capsule).expect("contact");
        assert!(contact.normal.y > 0.9);
        assert_relative_eq!(contact.depth, 0.1, epsilon = 1e-4);
    }

    #[test]
    fn free_capsule_reports_no_contact() {
        let octree = Octree::build(floor_quad(40.0, 0.0));
        let capsule = standing_capsule(Vec3::new(0.0, 5.0, 0.0));
        assert!(octree.capsule_intersect(&capsule).is_none());
    }

    #[test]
    fn empty_index_never_reports_contact() {
        let octree = Octree::empty();
        let capsule = standing_capsule(Vec3::new(0.0, -100.0, 0.0));
        assert!(octree.capsule_intersect(&capsule).is_none());
    }

    #[test]
    fn wall_contact_reports_horizontal_normal() {
        // Vertical quad in the XY plane at z = 0, normal facing -Z.
        let a = Vec3::new(-5.0, 0.0, 0.0);
        let b = Vec3::new(5.0, 0.0, 0.0);
        let c = Vec3::new(5.0, 5.0, 0.0);
        let d = Vec3::new(-5.0, 5.0, 0.0);
        let octree = Octree::build(vec![Triangle { a, b: d, c }, Triangle { a, b: c, c: b }]);

        let capsule = standing_capsule(Vec3::new(0.0, 0.5, -0.5));
        let contact = octree.capsule_intersect(&capsule).expect("contact");
        assert!(contact.normal.y.abs() < 0.1);
        assert!(contact.normal.z < -0.9);
        assert_relative_eq!(contact.depth, 0.3, epsilon = 1e-3);
    }

    #[test]
    fn octree_matches_brute_force_on_dense_floor() {
        // Many small tiles so the tree actually subdivides.
        let mut triangles = Vec::new();
        for ix in -10..10 {
            for iz in -10..10 {
                let x0 = ix as f32 * 2.0;
                let z0 = iz as f32 * 2.0;
                let a = Vec3::new(x0, 0.0, z0);
                let b = Vec3::new(x0, 0.0, z0 + 2.0);
                let c = Vec3::new(x0 + 2.0, 0.0, z0 + 2.0);
                let d = Vec3::new(x0 + 2.0, 0.0, z0);
                triangles.push(Triangle { a, b, c });
                triangles.push(Triangle { a: c, b: d, c: a });
            }
        }
        let octree = Octree::build(triangles);
        let capsule = standing_capsule(Vec3::new(3.3, -0.05, -7.1));
        let contact = octree.capsule_intersect(&capsule).expect("contact");
        assert!(contact.normal.y > 0.9);
        assert_relative_eq!(contact.depth, 0.05, epsilon = 1e-3);
    }
}
