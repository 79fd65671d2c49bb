// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Root placement for each spanning tree

use super::solver::solve_tree;
use super::transform::UnfoldFrame;
use crate::analysis::{PolyAnalysis, PolyFace};
use crate::config::{RootPlacement, UnfoldConfig};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// One root pose per forest component, fixed for the lifetime of an analysis
#[derive(Debug, Clone)]
pub struct Layout {
    placement: RootPlacement,
    roots: Vec<Isometry3<f64>>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::identity()
    }
}

impl Layout {
    /// Every root keeps its mesh pose
    pub fn identity() -> Self {
        Self {
            placement: RootPlacement::Identity,
            roots: Vec::new(),
        }
    }

    pub fn new(analysis: &PolyAnalysis, config: &UnfoldConfig) -> Self {
        let forest = analysis.forest();
        let nodes = forest.nodes();

        let grounded = || -> Vec<Isometry3<f64>> {
            forest
                .roots()
                .iter()
                .map(|&root| {
                    analysis
                        .face(nodes[root].face)
                        .map(ground_alignment)
                        .unwrap_or_else(Isometry3::identity)
                })
                .collect()
        };

        let roots = match config.root_placement {
            RootPlacement::Identity => Vec::new(),
            RootPlacement::Ground => grounded(),
            RootPlacement::Spread => {
                let mut cursor = 0.0;
                grounded()
                    .into_iter()
                    .zip(forest.roots())
                    .map(|(pose, &root)| {
                        let mut flat = UnfoldFrame::with_capacity(1.0, nodes.len());
                        solve_tree(analysis, root, pose, 1.0, config.axis_epsilon, &mut flat);
                        let bounds = flat.bounds(analysis);
                        if bounds.is_empty() {
                            return pose;
                        }
                        let shift = cursor - bounds.min.x;
                        cursor += bounds.size().x + config.component_margin;
                        Translation3::new(shift, 0.0, 0.0) * pose
                    })
                    .collect()
            }
        };

        Self {
            placement: config.root_placement,
            roots,
        }
    }

    pub fn placement(&self) -> RootPlacement {
        self.placement
    }

    /// Pose of the root of tree `component`; identity when unplaced
    pub fn root_pose(&self, component: usize) -> Isometry3<f64> {
        self.roots
            .get(component)
            .copied()
            .unwrap_or_else(Isometry3::identity)
    }
}

/// Move the face centroid to the origin and turn its normal onto +Y
pub fn ground_alignment(face: &PolyFace) -> Isometry3<f64> {
    let rotation = UnitQuaternion::rotation_between(&face.normal, &Vector3::y())
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI));
    Isometry3::from_parts(Translation3::from(-(rotation * face.centroid.coords)), rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::config::AnalysisConfig;
    use crate::geometry::builtin;
    use crate::unfold::solve;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn config_with(placement: RootPlacement) -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.unfold.root_placement = placement;
        config
    }

    #[test]
    fn test_ground_alignment() {
        for name in ["cube", "icosahedron", "hexagonal-prism"] {
            let analysis = analyze(&builtin(name).unwrap(), &AnalysisConfig::default()).unwrap();
            for face in analysis.faces() {
                let pose = ground_alignment(face);
                assert_relative_eq!(pose * face.normal, Vector3::y(), epsilon = 1e-9);
                assert_relative_eq!(pose * face.centroid, Point3::origin(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_grounded_cube_net_is_flat() {
        let config = config_with(RootPlacement::Ground);
        let analysis = analyze(&builtin("cube").unwrap(), &config).unwrap();
        let layout = Layout::new(&analysis, &config.unfold);
        let frame = solve(&analysis, &layout, 1.0, config.unfold.axis_epsilon);

        let bounds = frame.bounds(&analysis);
        assert_relative_eq!(bounds.min.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.y, 0.0, epsilon = 1e-9);
        // Six unit squares laid out in a net
        let size = bounds.size();
        assert!(size.x >= 2.0 - 1e-9 && size.z >= 2.0 - 1e-9);
    }

    #[test]
    fn test_spread_separates_components() {
        let config = config_with(RootPlacement::Spread);
        let analysis = analyze(&builtin("two-cubes").unwrap(), &config).unwrap();
        let layout = Layout::new(&analysis, &config.unfold);
        assert_eq!(layout.placement(), RootPlacement::Spread);

        let frame = solve(&analysis, &layout, 1.0, config.unfold.axis_epsilon);
        let forest = analysis.forest();
        let bounds: Vec<_> = forest
            .roots()
            .iter()
            .map(|&root| {
                let mut bounds = crate::geometry::BoundingBox::empty();
                for node in forest.preorder_from(root) {
                    let face = forest.nodes()[node].face;
                    for corner in frame.face_triangles(&analysis, face).unwrap().iter().flatten() {
                        bounds.expand_to_include(corner);
                    }
                }
                bounds
            })
            .collect();

        assert_eq!(bounds.len(), 2);
        assert_relative_eq!(bounds[0].min.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(
            bounds[1].min.x - bounds[0].max.x,
            config.unfold.component_margin,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_identity_layout() {
        let layout = Layout::identity();
        assert_eq!(layout.root_pose(3), Isometry3::identity());
        assert_eq!(Layout::default().placement(), RootPlacement::Identity);
    }
}
