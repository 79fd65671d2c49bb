// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Semantic tile classification of polygonal faces

use super::merge::PolyFace;
use crate::config::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tile category of a face, from side count and edge-length ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileType {
    Quad,
    Hexagon,
    Octagon,
    Equilateral,
    RightTriangle,
    IsoscelesTall,
    IsoscelesShort,
    Other,
}

impl TileType {
    pub const ALL: [TileType; 8] = [
        TileType::Quad,
        TileType::Hexagon,
        TileType::Octagon,
        TileType::Equilateral,
        TileType::RightTriangle,
        TileType::IsoscelesTall,
        TileType::IsoscelesShort,
        TileType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TileType::Quad => "quad",
            TileType::Hexagon => "hexagon",
            TileType::Octagon => "octagon",
            TileType::Equilateral => "equilateral",
            TileType::RightTriangle => "right-triangle",
            TileType::IsoscelesTall => "isosceles-tall",
            TileType::IsoscelesShort => "isosceles-short",
            TileType::Other => "other",
        }
    }

    pub fn is_triangle(&self) -> bool {
        matches!(
            self,
            TileType::Equilateral
                | TileType::RightTriangle
                | TileType::IsoscelesTall
                | TileType::IsoscelesShort
        )
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a face by its outline
pub fn classify_face(face: &PolyFace, config: &ClassifierConfig) -> TileType {
    match face.side_count() {
        3 => {
            let lengths = [
                face.boundary[0].length(),
                face.boundary[1].length(),
                face.boundary[2].length(),
            ];
            classify_triangle(lengths, config)
        }
        4 => TileType::Quad,
        6 => TileType::Hexagon,
        8 => TileType::Octagon,
        _ => TileType::Other,
    }
}

/// Decision list over sorted side lengths: equilateral, right, isosceles,
/// then equilateral as the fallback
pub fn classify_triangle(mut lengths: [f64; 3], config: &ClassifierConfig) -> TileType {
    lengths.sort_by(|a, b| a.total_cmp(b));
    let [s1, s2, s3] = lengths;
    if !(s3 > 0.0) || !s3.is_finite() {
        return TileType::Other;
    }

    let near = |a: f64, b: f64| (b - a).abs() <= config.equal_tolerance * a.max(b);

    if s1 >= (1.0 - config.equal_tolerance) * s3 {
        return TileType::Equilateral;
    }

    let hypotenuse = s3 * s3;
    if (s1 * s1 + s2 * s2 - hypotenuse).abs() <= config.right_tolerance * hypotenuse {
        return TileType::RightTriangle;
    }

    if near(s2, s3) {
        // Short base, two long legs
        return if s3 / s1 > config.tall_ratio {
            TileType::IsoscelesTall
        } else {
            TileType::IsoscelesShort
        };
    }
    if near(s1, s2) {
        return TileType::IsoscelesShort;
    }

    TileType::Equilateral
}
