// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-face rigid transforms for one unfold frame

use crate::analysis::{FaceId, PolyAnalysis};
use crate::geometry::BoundingBox;
use ahash::AHashMap;
use nalgebra::{Isometry3, Matrix4, Point3, UnitQuaternion, Vector3};

/// World pose of one face at a given progress
#[derive(Debug, Clone, PartialEq)]
pub struct FaceTransform {
    pub face: FaceId,
    /// Rigid pose applied to the face's original vertices
    pub pose: Isometry3<f64>,
    /// Full dihedral angle of the hinge to the parent, 0 for roots
    pub dihedral: f64,
    /// Angle applied this frame (progress times dihedral)
    pub angle: f64,
}

impl FaceTransform {
    /// Homogeneous 4×4 matrix form
    pub fn matrix(&self) -> Matrix4<f64> {
        self.pose.to_homogeneous()
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.pose.translation.vector
    }

    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.pose.rotation
    }

    /// Always unit: hinge composition is rigid
    pub fn scale(&self) -> Vector3<f64> {
        Vector3::new(1.0, 1.0, 1.0)
    }

    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.pose.transform_point(point)
    }

    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.pose.transform_vector(vector)
    }
}

/// Transforms of every reachable face at one progress value
///
/// A face missing from the frame must not be drawn.
#[derive(Debug, Clone, Default)]
pub struct UnfoldFrame {
    progress: f64,
    transforms: Vec<FaceTransform>,
    index: AHashMap<FaceId, usize>,
}

impl UnfoldFrame {
    pub(crate) fn with_capacity(progress: f64, capacity: usize) -> Self {
        Self {
            progress,
            transforms: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, transform: FaceTransform) {
        self.index.insert(transform.face, self.transforms.len());
        self.transforms.push(transform);
    }

    /// Clamped progress this frame was solved for
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn get(&self, face: FaceId) -> Option<&FaceTransform> {
        self.index.get(&face).map(|&i| &self.transforms[i])
    }

    pub fn contains(&self, face: FaceId) -> bool {
        self.index.contains_key(&face)
    }

    /// Transforms in solve order: tree by tree, parents before children
    pub fn iter(&self) -> impl Iterator<Item = &FaceTransform> {
        self.transforms.iter()
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Transformed corners of every triangle of `face`
    pub fn face_triangles(
        &self,
        analysis: &PolyAnalysis,
        face: FaceId,
    ) -> Option<Vec<[Point3<f64>; 3]>> {
        let transform = self.get(face)?;
        let poly = analysis.face(face)?;
        Some(
            poly.triangles
                .iter()
                .map(|&t| {
                    analysis.triangles()[t]
                        .vertices
                        .map(|v| transform.transform_point(&v))
                })
                .collect(),
        )
    }

    /// Transformed unit normal of `face`
    pub fn face_normal(&self, analysis: &PolyAnalysis, face: FaceId) -> Option<Vector3<f64>> {
        let transform = self.get(face)?;
        let poly = analysis.face(face)?;
        Some(transform.transform_vector(&poly.normal))
    }

    /// Bounding box of all transformed faces
    pub fn bounds(&self, analysis: &PolyAnalysis) -> BoundingBox {
        let mut bounds = BoundingBox::empty();
        for transform in &self.transforms {
            if let Some(triangles) = self.face_triangles(analysis, transform.face) {
                for corner in triangles.iter().flatten() {
                    bounds.expand_to_include(corner);
                }
            }
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Translation3;

    #[test]
    fn test_decomposition() {
        let pose = Isometry3::from_parts(
            Translation3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2),
        );
        let transform = FaceTransform {
            face: FaceId(0),
            pose,
            dihedral: 0.0,
            angle: 0.0,
        };

        assert_eq!(transform.translation(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale(), Vector3::new(1.0, 1.0, 1.0));
        let moved = transform.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Point3::new(1.0, 3.0, 3.0), epsilon = 1e-12);
        let matrix = transform.matrix();
        assert_relative_eq!(matrix[(0, 3)], 1.0);
        assert_relative_eq!(matrix[(3, 3)], 1.0);
        // Vectors ignore translation
        let rotated = transform.transform_vector(&Vector3::x());
        assert_relative_eq!(rotated, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_frame_lookup() {
        let mut frame = UnfoldFrame::with_capacity(0.5, 2);
        frame.push(FaceTransform {
            face: FaceId(4),
            pose: Isometry3::identity(),
            dihedral: 0.0,
            angle: 0.0,
        });

        assert_eq!(frame.len(), 1);
        assert_eq!(frame.progress(), 0.5);
        assert!(frame.contains(FaceId(4)));
        assert!(frame.get(FaceId(0)).is_none());
    }
}
