// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Unfolding session API

use crate::analysis::{analyze, FaceRender, PolyAnalysis};
use crate::config::{AnalysisConfig, RootPlacement};
use crate::error::Result;
use crate::geometry::MeshBuffer;
use crate::unfold::{solve, Layout, UnfoldFrame};
use std::sync::Arc;

/// Holds the analysis of the current mesh and solves frames against it
///
/// The analysis is an immutable snapshot; it is rebuilt wholesale when the
/// mesh identity changes and may be shared across threads through
/// [`Unfolder::analysis`].
pub struct Unfolder {
    config: AnalysisConfig,
    analysis: Option<Arc<PolyAnalysis>>,
    layout: Layout,
    fingerprint: Option<String>,
}

impl Unfolder {
    /// Create a new session with default configuration
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
            analysis: None,
            layout: Layout::identity(),
            fingerprint: None,
        }
    }

    /// Create a session with a validated configuration
    pub fn with_config(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Set the mesh, re-analysing only if its fingerprint changed
    ///
    /// Returns whether a rebuild happened. On error the previous snapshot is
    /// kept.
    pub fn set_mesh(&mut self, mesh: &MeshBuffer) -> Result<bool> {
        let fingerprint = mesh.fingerprint();
        if self.fingerprint.as_deref() == Some(fingerprint.as_str()) {
            return Ok(false);
        }

        let analysis = analyze(mesh, &self.config)?;
        tracing::debug!(fingerprint = %&fingerprint[..12], "mesh changed, analysis rebuilt");

        self.layout = Layout::new(&analysis, &self.config.unfold);
        self.analysis = Some(Arc::new(analysis));
        self.fingerprint = Some(fingerprint);
        Ok(true)
    }

    /// Drop the current mesh
    pub fn clear(&mut self) {
        self.analysis = None;
        self.layout = Layout::identity();
        self.fingerprint = None;
    }

    /// Shared snapshot of the current analysis
    pub fn analysis(&self) -> Option<Arc<PolyAnalysis>> {
        self.analysis.clone()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Change root placement; roots are re-laid without re-analysis
    pub fn set_placement(&mut self, placement: RootPlacement) {
        self.config.unfold.root_placement = placement;
        if let Some(analysis) = &self.analysis {
            self.layout = Layout::new(analysis, &self.config.unfold);
        }
    }

    /// Solve the transforms at progress `t`; empty when no mesh is set
    pub fn frame(&self, t: f64) -> UnfoldFrame {
        match &self.analysis {
            Some(analysis) => solve(analysis, &self.layout, t, self.config.unfold.axis_epsilon),
            None => UnfoldFrame::default(),
        }
    }

    /// Per-face render data of the current mesh
    pub fn render_faces(&self) -> Vec<FaceRender<'_>> {
        self.analysis
            .as_deref()
            .map(|analysis| analysis.render_faces().collect())
            .unwrap_or_default()
    }
}

impl Default for Unfolder {
    fn default() -> Self {
        Self::new()
    }
}
