// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Analysis and unfolding configuration

use crate::error::UnfoldError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up by [`AnalysisConfig::load`]
pub const CONFIG_FILE: &str = "polyfold.toml";

/// How the root face of each spanning tree is placed in world space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootPlacement {
    /// Roots keep their mesh pose
    Identity,
    /// Root centroid moved to the origin, root normal rotated onto +Y
    Ground,
    /// Ground alignment with components laid side by side along +X
    Spread,
}

impl RootPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootPlacement::Identity => "identity",
            RootPlacement::Ground => "ground",
            RootPlacement::Spread => "spread",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "identity" => Some(RootPlacement::Identity),
            "ground" => Some(RootPlacement::Ground),
            "spread" => Some(RootPlacement::Spread),
            _ => None,
        }
    }
}

/// Tolerances for triangle tile classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Relative tolerance for two sides being equal
    pub equal_tolerance: f64,
    /// Relative tolerance on s1² + s2² = s3²
    pub right_tolerance: f64,
    /// Leg/base ratio above which an isosceles triangle is tall
    pub tall_ratio: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            equal_tolerance: 0.05,
            right_tolerance: 0.10,
            tall_ratio: 1.2,
        }
    }
}

/// Unfold solver options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnfoldConfig {
    /// Below this cross-product magnitude two faces count as coplanar
    pub axis_epsilon: f64,
    /// Root placement policy
    pub root_placement: RootPlacement,
    /// Gap between component nets under [`RootPlacement::Spread`]
    pub component_margin: f64,
}

impl Default for UnfoldConfig {
    fn default() -> Self {
        Self {
            axis_epsilon: 1e-6,
            root_placement: RootPlacement::Identity,
            component_margin: 0.5,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Decimal places kept when quantizing vertex positions into keys
    pub key_decimals: u32,
    /// Minimum normal dot product for two triangles to merge
    pub coplanar_dot: f64,
    /// Cross-product magnitude below which a triangle is degenerate
    pub degenerate_epsilon: f64,
    /// Distance under which two vertices across a seam coincide
    pub seam_tolerance: f64,
    pub classifier: ClassifierConfig,
    pub unfold: UnfoldConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            key_decimals: 4,
            coplanar_dot: 0.99,
            degenerate_epsilon: 1e-10,
            seam_tolerance: 1e-3,
            classifier: ClassifierConfig::default(),
            unfold: UnfoldConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: AnalysisConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };

        if let Ok(decimals) = std::env::var("POLYFOLD_KEY_DECIMALS") {
            config.key_decimals = decimals
                .parse()
                .with_context(|| format!("Invalid POLYFOLD_KEY_DECIMALS: {}", decimals))?;
        }

        if let Ok(dot) = std::env::var("POLYFOLD_COPLANAR_DOT") {
            config.coplanar_dot = dot
                .parse()
                .with_context(|| format!("Invalid POLYFOLD_COPLANAR_DOT: {}", dot))?;
        }

        if let Ok(tolerance) = std::env::var("POLYFOLD_SEAM_TOLERANCE") {
            config.seam_tolerance = tolerance
                .parse()
                .with_context(|| format!("Invalid POLYFOLD_SEAM_TOLERANCE: {}", tolerance))?;
        }

        if let Ok(placement) = std::env::var("POLYFOLD_ROOT_PLACEMENT") {
            config.unfold.root_placement = RootPlacement::from_str(&placement)
                .with_context(|| format!("Invalid POLYFOLD_ROOT_PLACEMENT: {}", placement))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        // 10^key_decimals must stay well inside i64 after scaling coordinates.
        if self.key_decimals > 9 {
            return Err(UnfoldError::InvalidConfig(format!(
                "key_decimals must be at most 9, got {}",
                self.key_decimals
            )));
        }
        if !(self.coplanar_dot > 0.0 && self.coplanar_dot <= 1.0) {
            return Err(UnfoldError::InvalidConfig(format!(
                "coplanar_dot must be in (0, 1], got {}",
                self.coplanar_dot
            )));
        }

        let positive = [
            ("degenerate_epsilon", self.degenerate_epsilon),
            ("seam_tolerance", self.seam_tolerance),
            ("classifier.equal_tolerance", self.classifier.equal_tolerance),
            ("classifier.right_tolerance", self.classifier.right_tolerance),
            ("classifier.tall_ratio", self.classifier.tall_ratio),
            ("unfold.axis_epsilon", self.unfold.axis_epsilon),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(UnfoldError::InvalidConfig(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        if !(self.unfold.component_margin.is_finite() && self.unfold.component_margin >= 0.0) {
            return Err(UnfoldError::InvalidConfig(format!(
                "unfold.component_margin must be non-negative, got {}",
                self.unfold.component_margin
            )));
        }

        Ok(())
    }

    /// Scale applied to coordinates before rounding them into keys
    pub fn key_scale(&self) -> f64 {
        10f64.powi(self.key_decimals as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.key_scale(), 10_000.0);
    }

    #[test]
    fn test_rejects_bad_coplanar_dot() {
        let config = AnalysisConfig {
            coplanar_dot: 1.5,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(UnfoldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AnalysisConfig = toml::from_str(
            r#"
            coplanar_dot = 0.95

            [unfold]
            root_placement = "spread"
            "#,
        )
        .unwrap();

        assert_eq!(config.coplanar_dot, 0.95);
        assert_eq!(config.key_decimals, 4);
        assert_eq!(config.unfold.root_placement, RootPlacement::Spread);
        assert_eq!(config.classifier.tall_ratio, 1.2);
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let mut config = AnalysisConfig::default();
        config.seam_tolerance = 2e-3;
        config.unfold.root_placement = RootPlacement::Ground;

        let file = NamedTempFile::with_suffix(".toml")?;
        config.save(file.path())?;
        let loaded = AnalysisConfig::from_file(file.path())?;

        assert_eq!(loaded.seam_tolerance, 2e-3);
        assert_eq!(loaded.unfold.root_placement, RootPlacement::Ground);
        Ok(())
    }

    #[test]
    fn test_placement_from_str() {
        assert_eq!(RootPlacement::from_str("Ground"), Some(RootPlacement::Ground));
        assert_eq!(RootPlacement::from_str("diagonal"), None);
        assert_eq!(RootPlacement::Spread.as_str(), "spread");
    }
}
