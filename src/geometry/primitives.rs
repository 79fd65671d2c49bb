// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Fixture solids used by tests, benches and `builtin:` CLI inputs

use super::MeshBuffer;
use nalgebra::{Matrix4, Point3, Vector3};
use std::f64::consts::PI;

/// Closed convex solids with outward-wound triangles
#[derive(Debug, Clone, Copy)]
pub enum Primitive {
    Cube { size: Vector3<f64>, center: bool },
    TessellatedCube { size: f64, divisions: u32 },
    Tetrahedron { radius: f64 },
    Octahedron { radius: f64 },
    Icosahedron { radius: f64 },
    Prism { sides: u32, radius: f64, height: f64 },
}

impl Primitive {
    pub fn cube(size: Vector3<f64>, center: bool) -> Self {
        Self::Cube { size, center }
    }

    pub fn tessellated_cube(size: f64, divisions: u32) -> Self {
        Self::TessellatedCube {
            size,
            divisions: divisions.max(1),
        }
    }

    pub fn tetrahedron(radius: f64) -> Self {
        Self::Tetrahedron { radius }
    }

    pub fn octahedron(radius: f64) -> Self {
        Self::Octahedron { radius }
    }

    pub fn icosahedron(radius: f64) -> Self {
        Self::Icosahedron { radius }
    }

    pub fn prism(sides: u32, radius: f64, height: f64) -> Self {
        Self::Prism {
            sides: sides.max(3),
            radius,
            height,
        }
    }

    pub fn to_mesh(&self) -> MeshBuffer {
        match self {
            Self::Cube { size, center } => generate_cube_mesh(*size, *center),
            Self::TessellatedCube { size, divisions } => {
                generate_tessellated_cube_mesh(*size, *divisions)
            }
            Self::Tetrahedron { radius } => generate_tetrahedron_mesh(*radius),
            Self::Octahedron { radius } => generate_octahedron_mesh(*radius),
            Self::Icosahedron { radius } => generate_icosahedron_mesh(*radius),
            Self::Prism {
                sides,
                radius,
                height,
            } => generate_prism_mesh(*sides, *radius, *height),
        }
    }
}

/// Names accepted after `builtin:` on the command line
pub const BUILTIN_NAMES: &[&str] = &[
    "cube",
    "tessellated-cube",
    "tetrahedron",
    "octahedron",
    "icosahedron",
    "triangular-prism",
    "hexagonal-prism",
    "octagonal-prism",
    "two-cubes",
];

/// Look up a named fixture solid
pub fn builtin(name: &str) -> Option<MeshBuffer> {
    let mesh = match name {
        "cube" => Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_mesh(),
        "tessellated-cube" => Primitive::tessellated_cube(1.0, 4).to_mesh(),
        "tetrahedron" => Primitive::tetrahedron(1.0).to_mesh(),
        "octahedron" => Primitive::octahedron(1.0).to_mesh(),
        "icosahedron" => Primitive::icosahedron(1.0).to_mesh(),
        "triangular-prism" => Primitive::prism(3, 1.0, 1.0).to_mesh(),
        "hexagonal-prism" => Primitive::prism(6, 1.0, 1.0).to_mesh(),
        "octagonal-prism" => Primitive::prism(8, 1.0, 1.0).to_mesh(),
        "two-cubes" => {
            let mut mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_mesh();
            let mut other = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_mesh();
            other.transform(&Matrix4::new_translation(&Vector3::new(3.0, 0.0, 0.0)));
            mesh.merge(&other);
            mesh
        }
        _ => return None,
    };
    Some(mesh)
}

fn flatten(points: &[Point3<f64>]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}

/// Flip any triangle whose normal points towards `center`
fn orient_outward(points: &[Point3<f64>], faces: &mut [[u32; 3]], center: &Point3<f64>) {
    for face in faces.iter_mut() {
        let [a, b, c] = face.map(|i| points[i as usize]);
        let normal = (b - a).cross(&(c - a));
        let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
        if normal.dot(&(centroid - center)) < 0.0 {
            face.swap(1, 2);
        }
    }
}

fn indexed_mesh(points: &[Point3<f64>], mut faces: Vec<[u32; 3]>, center: Point3<f64>) -> MeshBuffer {
    orient_outward(points, &mut faces, &center);
    MeshBuffer::indexed(flatten(points), faces.into_iter().flatten().collect())
}

fn generate_cube_mesh(size: Vector3<f64>, center: bool) -> MeshBuffer {
    let min = if center { -size / 2.0 } else { Vector3::zeros() };
    let max = min + size;

    // 8 vertices of the cube
    let positions = [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];

    // 6 faces, two triangles each
    let faces = vec![
        // Front (z+)
        [4, 5, 6],
        [4, 6, 7],
        // Back (z-)
        [1, 0, 3],
        [1, 3, 2],
        // Right (x+)
        [5, 1, 2],
        [5, 2, 6],
        // Left (x-)
        [0, 4, 7],
        [0, 7, 3],
        // Top (y+)
        [7, 6, 2],
        [7, 2, 3],
        // Bottom (y-)
        [0, 1, 5],
        [0, 5, 4],
    ];

    indexed_mesh(&positions, faces, Point3::from((min + max) / 2.0))
}

fn generate_tessellated_cube_mesh(size: f64, divisions: u32) -> MeshBuffer {
    let half = size / 2.0;
    let step = size / divisions as f64;
    let axes = [Vector3::x(), Vector3::y(), Vector3::z()];

    let mut positions = Vec::new();
    for axis in 0..3 {
        let normal = axes[axis];
        let u = axes[(axis + 1) % 3];
        let v = axes[(axis + 2) % 3];
        for sign in [1.0, -1.0] {
            let origin = Point3::from(normal * sign * half - u * half - v * half);
            let grid = |i: u32, j: u32| origin + u * (i as f64 * step) + v * (j as f64 * step);
            for i in 0..divisions {
                for j in 0..divisions {
                    let (a, b, c, d) = (grid(i, j), grid(i + 1, j), grid(i + 1, j + 1), grid(i, j + 1));
                    for tri in [[a, b, c], [a, c, d]] {
                        let outward = (tri[1] - tri[0]).cross(&(tri[2] - tri[0])).dot(&normal) * sign;
                        let tri = if outward < 0.0 { [tri[0], tri[2], tri[1]] } else { tri };
                        positions.extend(flatten(&tri));
                    }
                }
            }
        }
    }

    MeshBuffer::non_indexed(positions)
}

fn generate_tetrahedron_mesh(radius: f64) -> MeshBuffer {
    let scale = radius / 3f64.sqrt();
    let points: Vec<Point3<f64>> = [
        [1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
    ]
    .iter()
    .map(|p| Point3::new(p[0] * scale, p[1] * scale, p[2] * scale))
    .collect();

    indexed_mesh(
        &points,
        vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]],
        Point3::origin(),
    )
}

fn generate_octahedron_mesh(radius: f64) -> MeshBuffer {
    let points = vec![
        Point3::new(radius, 0.0, 0.0),
        Point3::new(-radius, 0.0, 0.0),
        Point3::new(0.0, radius, 0.0),
        Point3::new(0.0, -radius, 0.0),
        Point3::new(0.0, 0.0, radius),
        Point3::new(0.0, 0.0, -radius),
    ];

    let mut faces = Vec::with_capacity(8);
    for x in [0, 1] {
        for y in [2, 3] {
            for z in [4, 5] {
                faces.push([x, y, z]);
            }
        }
    }

    indexed_mesh(&points, faces, Point3::origin())
}

fn generate_icosahedron_mesh(radius: f64) -> MeshBuffer {
    let phi = (1.0 + 5f64.sqrt()) / 2.0;
    let scale = radius / (1.0 + phi * phi).sqrt();
    let points: Vec<Point3<f64>> = [
        [-1.0, phi, 0.0],
        [1.0, phi, 0.0],
        [-1.0, -phi, 0.0],
        [1.0, -phi, 0.0],
        [0.0, -1.0, phi],
        [0.0, 1.0, phi],
        [0.0, -1.0, -phi],
        [0.0, 1.0, -phi],
        [phi, 0.0, -1.0],
        [phi, 0.0, 1.0],
        [-phi, 0.0, -1.0],
        [-phi, 0.0, 1.0],
    ]
    .iter()
    .map(|p| Point3::new(p[0] * scale, p[1] * scale, p[2] * scale))
    .collect();

    let faces = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    indexed_mesh(&points, faces, Point3::origin())
}

fn generate_prism_mesh(sides: u32, radius: f64, height: f64) -> MeshBuffer {
    let half = height / 2.0;
    let mut points = Vec::with_capacity(2 * sides as usize);
    for z in [-half, half] {
        for i in 0..sides {
            let angle = 2.0 * PI * i as f64 / sides as f64;
            points.push(Point3::new(radius * angle.cos(), radius * angle.sin(), z));
        }
    }

    let mut faces = Vec::new();
    // Caps as fans from their first vertex
    for i in 1..sides - 1 {
        faces.push([0, i, i + 1]);
        faces.push([sides, sides + i, sides + i + 1]);
    }
    // Side quads
    for i in 0..sides {
        let j = (i + 1) % sides;
        faces.push([i, j, sides + j]);
        faces.push([i, sides + j, sides + i]);
    }

    indexed_mesh(&points, faces, Point3::origin())
}
