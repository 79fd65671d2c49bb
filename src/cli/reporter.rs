// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::analysis::{MeshStats, TileType};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report analysis result with colors
    pub fn report_analysis(input: &str, stats: &MeshStats, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Analyzed:".bold(), input.cyan());
        println!("{}", "━".repeat(80).bright_black());

        let euler = stats.euler_characteristic();
        if stats.is_closed_sphere() {
            println!("{} {}", "✅".green(), "Closed genus-0 surface".green().bold());
        } else {
            println!(
                "{} {}",
                "⚠️".yellow(),
                format!(
                    "Euler characteristic {} over {} component(s)",
                    euler, stats.component_count
                )
                .yellow()
                .bold()
            );
        }

        println!("\n{}", "Topology:".bold());
        Self::print_count("Triangles", stats.triangle_count);
        if stats.degenerate_count > 0 {
            Self::print_warning_count("Degenerate", stats.degenerate_count);
        }
        for (name, value) in Self::topology_counts(stats) {
            Self::print_count(name, value);
        }
        println!(
            "  {} {}",
            "V - E + F (outline):".bright_black(),
            if euler == 2 {
                euler.to_string().green()
            } else {
                euler.to_string().yellow()
            }
        );
        if stats.non_manifold_edges > 0 {
            Self::print_warning_count("Non-manifold edges", stats.non_manifold_edges);
        }

        println!("\n{}", "Net:".bold());
        Self::print_count("Hinges", stats.hinge_count);
        Self::print_count("Cuts", stats.cut_count);
        Self::print_count("Components", stats.component_count);

        println!("\n{}", "Tiles:".bold());
        for tile in TileType::ALL {
            if let Some(count) = stats.tiles.get(&tile) {
                Self::print_count(tile.as_str(), *count);
            }
        }

        println!("\n{}", "Performance:".bold());
        println!(
            "  {} {}",
            "Analysis:".bright_black(),
            Self::format_duration(duration).cyan()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Vertex, edge and face rows of the topology section, matching the
    /// serialized stats field for field
    pub fn topology_counts(stats: &MeshStats) -> [(&'static str, usize); 4] {
        [
            ("Vertices", stats.vertex_count),
            ("Outline vertices", stats.outline_vertex_count),
            ("Edges", stats.edge_count),
            ("Faces", stats.face_count),
        ]
    }

    /// Report an exported unfold frame
    pub fn report_unfold(
        input: &str,
        output: &str,
        progress: f64,
        faces: usize,
        skipped: usize,
        duration: Duration,
    ) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Unfolded:".bold(), input.cyan());
        println!("{}", "━".repeat(80).bright_black());
        println!(
            "  {} {}",
            "Progress:".bright_black(),
            format!("{:.0}%", progress * 100.0).cyan()
        );
        Self::print_count("Faces", faces);
        if skipped > 0 {
            Self::print_warning_count("Skipped", skipped);
        }
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("  {} {}", "Output:".bright_black(), output.cyan());
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    fn print_count(name: &str, value: usize) {
        println!(
            "  {} {}",
            format!("{}:", name).bright_black(),
            value.to_string().cyan()
        );
    }

    fn print_warning_count(name: &str, value: usize) {
        println!(
            "  {} {}",
            format!("{}:", name).bright_black(),
            value.to_string().yellow()
        );
    }

    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::config::AnalysisConfig;
    use crate::geometry::Primitive;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }

    #[test]
    fn test_topology_counts_on_tessellated_cube() {
        let mesh = Primitive::tessellated_cube(1.0, 3).to_mesh();
        let stats = analyze(&mesh, &AnalysisConfig::default()).unwrap().stats();
        let counts = Reporter::topology_counts(&stats);

        assert_eq!(counts[0], ("Vertices", stats.vertex_count));
        assert_eq!(counts[1], ("Outline vertices", stats.outline_vertex_count));
        assert!(counts[0].1 > counts[1].1);
    }
}
