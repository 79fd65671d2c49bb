// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Hinge transform solver
//!
//! Each non-root face rotates about its hinge by `t` times the dihedral angle,
//! composed onto its parent's pose. The walk is an explicit stack so deep
//! forests never grow the call stack.

use super::layout::Layout;
use super::transform::{FaceTransform, UnfoldFrame};
use crate::analysis::{HingeNode, PolyAnalysis, PolyEdge};
use nalgebra::{Isometry3, Point3, Translation3, Unit, UnitQuaternion, Vector3};

/// Rotation that folds a child face flat onto its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HingeRotation {
    pub axis: Unit<Vector3<f64>>,
    /// Full dihedral angle in radians
    pub angle: f64,
    /// Point on the hinge line
    pub pivot: Point3<f64>,
}

impl HingeRotation {
    /// Axis `n_child × n_parent`, angle `atan2(|n_child × n_parent|, n_child · n_parent)`
    ///
    /// Near-parallel (or antiparallel) normals give the hinge direction as
    /// axis and a zero angle.
    pub fn between(
        parent_normal: &Vector3<f64>,
        child_normal: &Vector3<f64>,
        edge: &PolyEdge,
        axis_epsilon: f64,
    ) -> Self {
        let cross = child_normal.cross(parent_normal);
        let magnitude = cross.norm();
        let pivot = edge.endpoints[0];

        if magnitude < axis_epsilon {
            let axis = Unit::try_new(edge.direction(), f64::EPSILON).unwrap_or(Vector3::x_axis());
            return Self {
                axis,
                angle: 0.0,
                pivot,
            };
        }

        Self {
            axis: Unit::new_unchecked(cross / magnitude),
            angle: magnitude.atan2(child_normal.dot(parent_normal)),
            pivot,
        }
    }

    /// `T(pivot) · R(axis, t · angle) · T(-pivot)`
    pub fn local(&self, t: f64) -> Isometry3<f64> {
        let rotation = UnitQuaternion::from_axis_angle(&self.axis, t * self.angle);
        Translation3::from(self.pivot.coords) * rotation * Translation3::from(-self.pivot.coords)
    }
}

/// Clamp progress into `[0, 1]`, NaN counts as folded
pub fn clamp_progress(t: f64) -> f64 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

/// Solve every tree of the forest at progress `t`
pub fn solve(analysis: &PolyAnalysis, layout: &Layout, t: f64, axis_epsilon: f64) -> UnfoldFrame {
    let t = clamp_progress(t);
    let forest = analysis.forest();
    let mut frame = UnfoldFrame::with_capacity(t, forest.nodes().len());

    for (component, &root) in forest.roots().iter().enumerate() {
        solve_tree(
            analysis,
            root,
            layout.root_pose(component),
            t,
            axis_epsilon,
            &mut frame,
        );
    }

    frame
}

/// Solve one tree under `root`, appending its transforms to `frame`
pub(crate) fn solve_tree(
    analysis: &PolyAnalysis,
    root: usize,
    root_pose: Isometry3<f64>,
    t: f64,
    axis_epsilon: f64,
    frame: &mut UnfoldFrame,
) {
    let nodes = analysis.forest().nodes();
    let Some(root_node) = nodes.get(root) else {
        return;
    };

    let mut stack = vec![(root, root_pose, 0.0)];
    while let Some((index, pose, dihedral)) = stack.pop() {
        let node = &nodes[index];
        frame.push(FaceTransform {
            face: node.face,
            pose,
            dihedral,
            angle: t * dihedral,
        });

        // Reversed so the first child is solved first
        for &child in node.children.iter().rev() {
            match hinge_for(analysis, node, &nodes[child], axis_epsilon) {
                Some(hinge) => stack.push((child, pose * hinge.local(t), hinge.angle)),
                None => tracing::warn!(
                    face = %nodes[child].face,
                    root = %root_node.face,
                    "hinge or parent face missing, skipping branch"
                ),
            }
        }
    }
}

fn hinge_for(
    analysis: &PolyAnalysis,
    parent: &HingeNode,
    child: &HingeNode,
    axis_epsilon: f64,
) -> Option<HingeRotation> {
    let edge = analysis.dual().edge(child.hinge?)?;
    let parent_face = analysis.face(child.parent?)?;
    let child_face = analysis.face(child.face)?;
    if parent_face.id != parent.face || !edge.joins(parent.face, child.face) {
        return None;
    }
    Some(HingeRotation::between(
        &parent_face.normal,
        &child_face.normal,
        edge,
        axis_epsilon,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, FaceId};
    use crate::config::AnalysisConfig;
    use crate::geometry::EdgeKey;
    use crate::geometry::VertexKey;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn edge_along_x() -> PolyEdge {
        PolyEdge {
            key: EdgeKey::new(VertexKey([0, 0, 0]), VertexKey([1, 0, 0])),
            faces: [FaceId(0), FaceId(2)],
            endpoints: [Point3::new(0.0, 0.5, 0.5), Point3::new(1.0, 0.5, 0.5)],
        }
    }

    #[test]
    fn test_right_angle_hinge() {
        let hinge = HingeRotation::between(&Vector3::y(), &Vector3::z(), &edge_along_x(), 1e-6);
        assert_relative_eq!(hinge.angle, FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(hinge.axis.into_inner(), -Vector3::x(), epsilon = 1e-12);

        let flat = hinge.local(1.0);
        assert_relative_eq!(flat.transform_vector(&Vector3::z()), Vector3::y(), epsilon = 1e-12);
        // Pivot stays put at any progress
        let pivot = hinge.local(0.37).transform_point(&hinge.pivot);
        assert_relative_eq!(pivot, hinge.pivot, epsilon = 1e-12);
    }

    #[test]
    fn test_coplanar_hinge_uses_edge_direction() {
        let hinge = HingeRotation::between(&Vector3::y(), &Vector3::y(), &edge_along_x(), 1e-6);
        assert_eq!(hinge.angle, 0.0);
        assert_relative_eq!(hinge.axis.into_inner(), Vector3::x(), epsilon = 1e-12);
        assert_eq!(hinge.local(1.0), Isometry3::identity());

        let folded = HingeRotation::between(&Vector3::y(), &-Vector3::y(), &edge_along_x(), 1e-6);
        assert_eq!(folded.angle, 0.0);
    }

    #[test]
    fn test_progress_clamping() {
        assert_eq!(clamp_progress(-0.5), 0.0);
        assert_eq!(clamp_progress(1.5), 1.0);
        assert_eq!(clamp_progress(f64::NAN), 0.0);
        assert_eq!(clamp_progress(0.25), 0.25);
    }

    #[test]
    fn test_cube_frames() {
        let mesh = crate::geometry::builtin("cube").unwrap();
        let analysis = analyze(&mesh, &AnalysisConfig::default()).unwrap();
        let layout = Layout::identity();

        let folded = solve(&analysis, &layout, 0.0, 1e-6);
        assert_eq!(folded.len(), 6);
        for transform in folded.iter() {
            assert_eq!(transform.angle, 0.0);
            assert_relative_eq!(transform.matrix(), nalgebra::Matrix4::identity(), epsilon = 1e-12);
        }

        let flat = solve(&analysis, &layout, 1.0, 1e-6);
        let root = analysis.faces()[0].id;
        let up = flat.face_normal(&analysis, root).unwrap();
        for face in analysis.faces() {
            let normal = flat.face_normal(&analysis, face.id).unwrap();
            assert_relative_eq!(normal, up, epsilon = 1e-9);
        }
        for transform in flat.iter().filter(|t| t.face != root) {
            assert_relative_eq!(transform.dihedral, FRAC_PI_2, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_broken_hinge_skips_branch() {
        let mut analysis =
            analyze(&crate::geometry::builtin("cube").unwrap(), &AnalysisConfig::default()).unwrap();
        let nodes = analysis.forest().nodes().to_vec();
        let root = analysis.forest().roots()[0];
        let child = nodes[root].children[0];
        let past_end = analysis.dual().edges().len();

        assert!(hinge_for(&analysis, &nodes[root], &nodes[child], 1e-6).is_some());
        // Parent node that does not own the child
        assert!(hinge_for(&analysis, &nodes[child], &nodes[child], 1e-6).is_none());
        let mut dangling = nodes[child].clone();
        dangling.hinge = Some(past_end);
        assert!(hinge_for(&analysis, &nodes[root], &dangling, 1e-6).is_none());

        let subtree: Vec<FaceId> = analysis
            .forest()
            .preorder_from(child)
            .into_iter()
            .map(|index| nodes[index].face)
            .collect();
        analysis.forest_mut().nodes_mut()[child].hinge = Some(past_end);

        let mut frame = UnfoldFrame::with_capacity(1.0, nodes.len());
        solve_tree(&analysis, root, Isometry3::identity(), 1.0, 1e-6, &mut frame);
        assert_eq!(frame.len(), nodes.len() - subtree.len());
        assert!(frame.contains(nodes[root].face));
        for face in &subtree {
            assert!(!frame.contains(*face));
            assert!(frame.get(*face).is_none());
        }

        let frame = solve(&analysis, &Layout::identity(), 0.5, 1e-6);
        let report = crate::io::FrameReport::new(&analysis, &frame);
        let mut skipped: Vec<usize> = subtree.iter().map(|face| face.0).collect();
        skipped.sort();
        assert_eq!(report.skipped, skipped);
        assert_eq!(report.faces.len(), frame.len());
    }
}
