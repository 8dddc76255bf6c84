//! Procedural crystal meshes: base polyhedra, subdivision, organic
//! deformation and a store that tracks every live mesh.

use atelier_core::noise::{flow_noise, organic_noise};
use atelier_core::{SeededRng, SlotId, Vec3};
use serde::Serialize;

use crate::arena::Arena;

/// Base shape a crystal mesh was built from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Blob,
    DenseBlob,
    Icosahedron,
    Octahedron,
    Dodecahedron,
    Tetrahedron,
    Sphere,
    Cone,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Blob,
        ShapeKind::DenseBlob,
        ShapeKind::Icosahedron,
        ShapeKind::Octahedron,
        ShapeKind::Dodecahedron,
        ShapeKind::Tetrahedron,
        ShapeKind::Sphere,
        ShapeKind::Cone,
    ];
}

/// A triangle-soup mesh with flat face normals
#[derive(Clone, Debug)]
pub struct Geometry {
    pub kind: ShapeKind,
    /// Three positions per triangle
    pub positions: Vec<Vec3>,
    /// One normal per triangle
    pub normals: Vec<Vec3>,
    bounding_radius: f32,
}

impl Geometry {
    fn from_positions(kind: ShapeKind, positions: Vec<Vec3>) -> Self {
        let mut geometry = Self {
            kind,
            positions,
            normals: Vec::new(),
            bounding_radius: 0.0,
        };
        geometry.recompute();
        geometry
    }

    /// Platonic solid subdivided `detail` times and projected onto the unit sphere
    pub fn polyhedron(kind: ShapeKind, vertices: &[f32], indices: &[u32], detail: u32) -> Self {
        let vertex = |i: u32| {
            let i = i as usize * 3;
            Vec3::new(vertices[i], vertices[i + 1], vertices[i + 2])
        };
        let mut positions = Vec::new();
        for face in indices.chunks_exact(3) {
            subdivide_face(
                vertex(face[0]),
                vertex(face[1]),
                vertex(face[2]),
                detail,
                &mut positions,
            );
        }
        for p in &mut positions {
            *p = p.normalized();
        }
        Self::from_positions(kind, positions)
    }

    pub fn icosahedron(detail: u32) -> Self {
        Self::polyhedron(ShapeKind::Icosahedron, &ICOSAHEDRON_VERTICES, &ICOSAHEDRON_INDICES, detail)
    }

    pub fn octahedron(detail: u32) -> Self {
        Self::polyhedron(ShapeKind::Octahedron, &OCTAHEDRON_VERTICES, &OCTAHEDRON_INDICES, detail)
    }

    pub fn tetrahedron(detail: u32) -> Self {
        Self::polyhedron(ShapeKind::Tetrahedron, &TETRAHEDRON_VERTICES, &TETRAHEDRON_INDICES, detail)
    }

    pub fn dodecahedron(detail: u32) -> Self {
        Self::polyhedron(
            ShapeKind::Dodecahedron,
            &dodecahedron_vertices(),
            &DODECAHEDRON_INDICES,
            detail,
        )
    }

    /// Latitude/longitude sphere
    pub fn uv_sphere(width_segments: u32, height_segments: u32) -> Self {
        let w = width_segments.max(3);
        let h = height_segments.max(2);
        let point = |ix: u32, iy: u32| {
            let u = ix as f32 / w as f32 * std::f32::consts::TAU;
            let v = iy as f32 / h as f32 * std::f32::consts::PI;
            Vec3::new(-u.cos() * v.sin(), v.cos(), u.sin() * v.sin())
        };
        let mut positions = Vec::new();
        for iy in 0..h {
            for ix in 0..w {
                let a = point(ix + 1, iy);
                let b = point(ix, iy);
                let c = point(ix, iy + 1);
                let d = point(ix + 1, iy + 1);
                if iy != 0 {
                    positions.extend_from_slice(&[a, b, d]);
                }
                if iy != h - 1 {
                    positions.extend_from_slice(&[b, c, d]);
                }
            }
        }
        Self::from_positions(ShapeKind::Sphere, positions)
    }

    /// Capped frustum centred on the origin
    pub fn cone(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = height / 2.0;
        let ring = |i: u32, radius: f32, y: f32| {
            let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
            Vec3::new(radius * theta.sin(), y, radius * theta.cos())
        };
        let top_center = Vec3::new(0.0, half, 0.0);
        let bottom_center = Vec3::new(0.0, -half, 0.0);
        let mut positions = Vec::new();
        for i in 0..segments {
            let t0 = ring(i, radius_top, half);
            let t1 = ring(i + 1, radius_top, half);
            let b0 = ring(i, radius_bottom, -half);
            let b1 = ring(i + 1, radius_bottom, -half);
            positions.extend_from_slice(&[t0, b0, t1]);
            positions.extend_from_slice(&[b0, b1, t1]);
            positions.extend_from_slice(&[top_center, t0, t1]);
            positions.extend_from_slice(&[bottom_center, b1, b0]);
        }
        Self::from_positions(ShapeKind::Cone, positions)
    }

    /// Push every vertex along its radial direction by layered noise
    pub fn deform(&mut self, intensity: f32, seed: f32) {
        for p in &mut self.positions {
            let length = p.length();
            if length < 1e-6 {
                continue;
            }
            let noise = organic_noise(p.x + seed, p.y + seed * 1.3, p.z + seed * 0.7, 0.8, 4);
            let flow = flow_noise(*p, seed);
            *p = p.normalized() * (length + (noise + flow) * intensity);
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.normals = self
            .positions
            .chunks_exact(3)
            .map(|t| (t[1] - t[0]).cross(&(t[2] - t[0])).normalized())
            .collect();
        self.bounding_radius = self
            .positions
            .iter()
            .map(Vec3::length)
            .fold(0.0, f32::max);
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = ([Vec3; 3], Vec3)> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.normals.iter())
            .map(|(t, n)| ([t[0], t[1], t[2]], *n))
    }

    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    pub fn is_finite(&self) -> bool {
        self.positions.iter().all(Vec3::is_finite)
    }
}

/// Split triangle `abc` into `(detail + 1)^2` triangles
fn subdivide_face(a: Vec3, b: Vec3, c: Vec3, detail: u32, out: &mut Vec<Vec3>) {
    let cols = detail as usize + 1;
    let mut grid: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);
    for i in 0..=cols {
        let t = i as f32 / cols as f32;
        let aj = a.lerp(&c, t);
        let bj = b.lerp(&c, t);
        let rows = cols - i;
        let row = (0..=rows)
            .map(|j| {
                if rows == 0 {
                    aj
                } else {
                    aj.lerp(&bj, j as f32 / rows as f32)
                }
            })
            .collect();
        grid.push(row);
    }
    for i in 0..cols {
        for j in 0..2 * (cols - i) - 1 {
            let k = j / 2;
            if j % 2 == 0 {
                out.extend_from_slice(&[grid[i][k + 1], grid[i + 1][k], grid[i][k]]);
            } else {
                out.extend_from_slice(&[grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]);
            }
        }
    }
}

/// Build the random mesh for a crystal: a base shape, deformed with a
/// shape-specific intensity and a seed tied to the crystal index.
pub fn build_crystal_geometry(index: usize, rng: &mut SeededRng) -> Geometry {
    let kind = ShapeKind::ALL[rng.range_usize(0, ShapeKind::ALL.len())];
    let i = index as f32;
    let (mut geometry, intensity, seed) = match kind {
        ShapeKind::Blob => (Geometry::icosahedron(2), rng.range(0.4, 0.7), rng.range(0.0, 100.0)),
        ShapeKind::DenseBlob => (Geometry::icosahedron(3), rng.range(0.4, 0.7), rng.range(0.0, 100.0)),
        ShapeKind::Icosahedron => (Geometry::icosahedron(2), rng.range(0.3, 0.5), i * 10.0),
        ShapeKind::Octahedron => (Geometry::octahedron(2), rng.range(0.25, 0.4), i * 15.0),
        ShapeKind::Dodecahedron => (Geometry::dodecahedron(1), rng.range(0.2, 0.3), i * 8.0),
        ShapeKind::Tetrahedron => (Geometry::tetrahedron(2), rng.range(0.4, 0.6), i * 12.0),
        ShapeKind::Sphere => (Geometry::uv_sphere(16, 12), rng.range(0.6, 0.9), i * 7.0),
        ShapeKind::Cone => (Geometry::cone(0.4, 1.0, 1.5, 12), rng.range(0.35, 0.6), i * 9.0),
    };
    geometry.kind = kind;
    geometry.deform(intensity, seed);
    geometry
}

/// The slightly puffier shell drawn behind a crystal
pub fn build_glow_geometry(base: &Geometry, index: usize) -> Geometry {
    let mut glow = base.clone();
    glow.deform(0.1, index as f32 * 5.0 + 50.0);
    glow
}

/// Handle to a mesh in the `GeometryStore`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub SlotId);

/// Owns every live mesh. Meshes must be released explicitly.
#[derive(Default)]
pub struct GeometryStore {
    meshes: Arena<Geometry>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, geometry: Geometry) -> GeometryHandle {
        GeometryHandle(self.meshes.insert(geometry))
    }

    pub fn get(&self, handle: GeometryHandle) -> Option<&Geometry> {
        self.meshes.get(handle.0)
    }

    /// Returns false for handles that were already released
    pub fn release(&mut self, handle: GeometryHandle) -> bool {
        self.meshes.remove(handle.0).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.meshes.len()
    }
}

const TETRAHEDRON_VERTICES: [f32; 12] = [1.0, 1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0, -1.0];
const TETRAHEDRON_INDICES: [u32; 12] = [2, 1, 0, 0, 3, 2, 1, 3, 0, 2, 3, 1];

#[rustfmt::skip]
const OCTAHEDRON_VERTICES: [f32; 18] = [
    1.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
    0.0, -1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, -1.0,
];
#[rustfmt::skip]
const OCTAHEDRON_INDICES: [u32; 24] = [
    0, 2, 4, 0, 4, 3, 0, 3, 5, 0, 5, 2,
    1, 2, 5, 1, 5, 3, 1, 3, 4, 1, 4, 2,
];

const PHI: f32 = 1.618_034;

#[rustfmt::skip]
const ICOSAHEDRON_VERTICES: [f32; 36] = [
    -1.0, PHI, 0.0, 1.0, PHI, 0.0, -1.0, -PHI, 0.0, 1.0, -PHI, 0.0,
    0.0, -1.0, PHI, 0.0, 1.0, PHI, 0.0, -1.0, -PHI, 0.0, 1.0, -PHI,
    PHI, 0.0, -1.0, PHI, 0.0, 1.0, -PHI, 0.0, -1.0, -PHI, 0.0, 1.0,
];
#[rustfmt::skip]
const ICOSAHEDRON_INDICES: [u32; 60] = [
    0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11,
    1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1, 8,
    3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9,
    4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
];

fn dodecahedron_vertices() -> [f32; 60] {
    let t = PHI;
    let r = 1.0 / PHI;
    #[rustfmt::skip]
    let v = [
        -1.0, -1.0, -1.0, -1.0, -1.0, 1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0,
        1.0, -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0, -1.0, 1.0, 1.0, 1.0,
        0.0, -r, -t, 0.0, -r, t, 0.0, r, -t, 0.0, r, t,
        -r, -t, 0.0, -r, t, 0.0, r, -t, 0.0, r, t, 0.0,
        -t, 0.0, -r, t, 0.0, -r, -t, 0.0, r, t, 0.0, r,
    ];
    v
}

#[rustfmt::skip]
const DODECAHEDRON_INDICES: [u32; 108] = [
    3, 11, 7, 3, 7, 15, 3, 15, 13,
    7, 19, 17, 7, 17, 6, 7, 6, 15,
    17, 4, 8, 17, 8, 10, 17, 10, 6,
    8, 0, 16, 8, 16, 2, 8, 2, 10,
    0, 12, 1, 0, 1, 18, 0, 18, 16,
    6, 10, 2, 6, 2, 13, 6, 13, 15,
    2, 16, 18, 2, 18, 3, 2, 3, 13,
    18, 1, 9, 18, 9, 11, 18, 11, 3,
    4, 14, 12, 4, 12, 0, 4, 0, 8,
    11, 9, 5, 11, 5, 19, 11, 19, 7,
    19, 5, 14, 19, 14, 4, 19, 4, 17,
    1, 12, 14, 1, 14, 5, 1, 5, 9,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdivided_triangle_counts() {
        assert_eq!(Geometry::icosahedron(0).triangle_count(), 20);
        assert_eq!(Geometry::icosahedron(2).triangle_count(), 20 * 9);
        assert_eq!(Geometry::icosahedron(3).triangle_count(), 20 * 16);
        assert_eq!(Geometry::octahedron(2).triangle_count(), 8 * 9);
        assert_eq!(Geometry::tetrahedron(2).triangle_count(), 4 * 9);
        assert_eq!(Geometry::dodecahedron(1).triangle_count(), 36 * 4);
    }

    #[test]
    fn polyhedra_lie_on_unit_sphere() {
        let g = Geometry::dodecahedron(1);
        for p in &g.positions {
            assert!((p.length() - 1.0).abs() < 1e-4);
        }
        assert!((g.bounding_radius() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn sphere_and_cone_counts() {
        assert_eq!(Geometry::uv_sphere(16, 12).triangle_count(), 16 * 22);
        assert_eq!(Geometry::cone(0.4, 1.0, 1.5, 12).triangle_count(), 48);
    }

    #[test]
    fn every_random_crystal_is_finite() {
        let mut rng = SeededRng::new(77);
        for index in 0..40 {
            let g = build_crystal_geometry(index, &mut rng);
            assert!(g.is_finite());
            assert!(g.triangle_count() > 0);
            assert!(g.bounding_radius() > 0.5 && g.bounding_radius() < 2.5);
            let glow = build_glow_geometry(&g, index);
            assert_eq!(glow.triangle_count(), g.triangle_count());
            assert!(glow.is_finite());
        }
    }

    #[test]
    fn deformation_is_deterministic() {
        let mut a = Geometry::octahedron(1);
        let mut b = Geometry::octahedron(1);
        a.deform(0.3, 15.0);
        b.deform(0.3, 15.0);
        assert_eq!(a.positions, b.positions);
    }

    #[test]
    fn store_tracks_live_meshes() {
        let mut store = GeometryStore::new();
        let a = store.insert(Geometry::tetrahedron(0));
        let b = store.insert(Geometry::tetrahedron(0));
        assert_eq!(store.live_count(), 2);
        assert!(store.release(a));
        assert!(!store.release(a));
        assert!(store.get(a).is_none());
        assert!(store.get(b).is_some());
        assert_eq!(store.live_count(), 1);
    }
}
