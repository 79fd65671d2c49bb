// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Continuous unfolding of an analyzed polyhedron into its net

mod layout;
mod solver;
mod transform;

pub use layout::{ground_alignment, Layout};
pub use solver::{clamp_progress, solve, HingeRotation};
pub use transform::{FaceTransform, UnfoldFrame};

use crate::analysis::PolyAnalysis;
use crate::config::UnfoldConfig;

/// Lay out roots per `config` and solve one frame
///
/// Sessions that solve many frames should build the [`Layout`] once and call
/// [`solve`] directly.
pub fn unfold(analysis: &PolyAnalysis, config: &UnfoldConfig, t: f64) -> UnfoldFrame {
    let layout = Layout::new(analysis, config);
    solve(analysis, &layout, t, config.axis_epsilon)
}
