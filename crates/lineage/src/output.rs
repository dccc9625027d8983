//! Output formatting for CLI commands.
//!
//! Every report is written either as coloured text for people or as pretty
//! JSON for scripts, to any [`Write`]. Colouring follows the `colored` crate's
//! `NO_COLOR`/`CLICOLOR` handling.

use crate::commands::{CycleReport, DownstreamReport, InitResult, OrderReport};
use crate::document::LoadWarning;
use colored::Colorize;
use lineage_graph::NodeId;
use serde::Serialize;
use std::io::{self, Write};

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Write a downstream report in the specified format
pub fn write_downstream<W: Write>(
    w: &mut W,
    report: &DownstreamReport,
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => downstream_text(w, report),
        OutputMode::Json => write_json(w, report),
    }
}

/// Write an order report in the specified format
pub fn write_order<W: Write>(w: &mut W, report: &OrderReport, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => order_text(w, report),
        OutputMode::Json => write_json(w, report),
    }
}

/// Write detected cycles in the specified format
pub fn write_cycles<W: Write>(
    w: &mut W,
    cycles: &[CycleReport],
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => cycles_text(w, cycles),
        OutputMode::Json => write_json(w, cycles),
    }
}

/// Write the outcome of `lineage init`
pub fn write_init<W: Write>(w: &mut W, result: &InitResult) -> io::Result<()> {
    writeln!(
        w,
        "{} {}",
        "Created".green().bold(),
        result.config_file.display()
    )?;
    if result.created_data_file {
        writeln!(
            w,
            "{} {}",
            "Created".green().bold(),
            result.data_file.display()
        )?;
    } else {
        writeln!(
            w,
            "{} {}",
            "Using existing".dimmed(),
            result.data_file.display()
        )?;
    }
    Ok(())
}

/// Print load warnings to stderr
pub fn print_warnings(warnings: &[LoadWarning]) -> io::Result<()> {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    write_warnings(&mut handle, warnings)
}

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)
}

fn join(nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Display a loop as `a → b → a`.
fn loop_path(path: &[NodeId]) -> String {
    let mut text = path
        .iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(" → ");
    if let Some(first) = path.first() {
        text.push_str(" → ");
        text.push_str(first.as_str());
    }
    text
}

fn write_unknown_roots<W: Write>(w: &mut W, unknown: &[NodeId]) -> io::Result<()> {
    if unknown.is_empty() {
        return Ok(());
    }
    writeln!(
        w,
        "{}: not declared in the lineage document: {}",
        "warning".yellow(),
        join(unknown)
    )
}

fn downstream_text<W: Write>(w: &mut W, report: &DownstreamReport) -> io::Result<()> {
    write_unknown_roots(w, &report.unknown_roots)?;

    if report.roots.is_empty() {
        writeln!(w, "{}", "No roots given.".dimmed())?;
        return Ok(());
    }
    if report.is_empty() {
        writeln!(
            w,
            "{} {}.",
            "No declared nodes downstream of".dimmed(),
            join(&report.roots).cyan().bold()
        )?;
        return Ok(());
    }

    writeln!(
        w,
        "Downstream of {} ({} nodes):",
        join(&report.roots).cyan().bold(),
        report.len().to_string().green()
    )?;
    for node in &report.affected {
        writeln!(w, "  {node}")?;
    }

    if !report.external.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "  {} ({}):",
            "Outside the document".white().bold(),
            report.external.len().to_string().yellow()
        )?;
        for node in &report.external {
            writeln!(w, "    {}", node.as_str().dimmed())?;
        }
    }
    Ok(())
}

fn order_text<W: Write>(w: &mut W, report: &OrderReport) -> io::Result<()> {
    write_unknown_roots(w, &report.unknown_roots)?;

    writeln!(
        w,
        "Order ({} nodes):",
        report.order.len().to_string().green()
    )?;
    let width = report.order.len().to_string().len();
    for (i, node) in report.order.iter().enumerate() {
        writeln!(w, "  {:>width$}. {node}", i + 1)?;
    }

    if !report.is_complete() {
        writeln!(w)?;
        writeln!(
            w,
            "{}: {} nodes could not be ordered: {}",
            "warning".yellow(),
            report.unresolved.len().to_string().red().bold(),
            join(&report.unresolved)
        )?;
        write_cycle_list(w, &report.cycles)?;
    }
    Ok(())
}

fn cycles_text<W: Write>(w: &mut W, cycles: &[CycleReport]) -> io::Result<()> {
    if cycles.is_empty() {
        writeln!(w, "{}", "No circular dependencies detected.".green())?;
        return Ok(());
    }

    writeln!(
        w,
        "Found {} circular dependencies:",
        cycles.len().to_string().red().bold()
    )?;
    writeln!(w)?;
    write_cycle_list(w, cycles)
}

fn write_cycle_list<W: Write>(w: &mut W, cycles: &[CycleReport]) -> io::Result<()> {
    for (i, cycle) in cycles.iter().enumerate() {
        writeln!(w, "  {} {}:", "Cycle".yellow().bold(), i + 1)?;
        writeln!(w, "    {}", loop_path(&cycle.path).dimmed())?;
    }
    Ok(())
}

fn write_warnings<W: Write>(w: &mut W, warnings: &[LoadWarning]) -> io::Result<()> {
    for warning in warnings {
        writeln!(w, "{}: {warning}", "warning".yellow())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|name| NodeId::from(*name)).collect()
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(write: F) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn loop_path_closes_on_first_node() {
        assert_eq!(loop_path(&ids(&["a", "b", "c"])), "a → b → c → a");
        assert_eq!(loop_path(&ids(&["self"])), "self → self");
    }

    #[test]
    fn downstream_text_lists_external_nodes_last() {
        let report = DownstreamReport {
            roots: ids(&["stg"]),
            affected: ids(&["stg", "mart"]),
            external: ids(&["dashboard"]),
            unknown_roots: Vec::new(),
        };

        let text = render(|w| downstream_text(w, &report));

        assert_eq!(
            text,
            "Downstream of stg (3 nodes):\n  stg\n  mart\n\n  Outside the document (1):\n    dashboard\n"
        );
    }

    #[test]
    fn order_text_numbers_nodes_and_reports_cycles() {
        let report = OrderReport {
            order: ids(&["seed"]),
            unresolved: ids(&["a", "b"]),
            cycles: vec![CycleReport {
                nodes: ids(&["a", "b"]),
                path: ids(&["a", "b"]),
            }],
            unknown_roots: Vec::new(),
        };

        let text = render(|w| order_text(w, &report));

        assert!(text.starts_with("Order (1 nodes):\n  1. seed\n"));
        assert!(text.contains("warning: 2 nodes could not be ordered: a, b"));
        assert!(text.contains("Cycle 1:\n    a → b → a\n"));
    }

    #[test]
    fn empty_report_for_given_roots_names_them() {
        let report = DownstreamReport {
            roots: ids(&["ghost"]),
            affected: Vec::new(),
            external: Vec::new(),
            unknown_roots: ids(&["ghost"]),
        };

        let text = render(|w| downstream_text(w, &report));

        assert_eq!(
            text,
            "warning: not declared in the lineage document: ghost\nNo declared nodes downstream of ghost.\n"
        );
    }

    #[test]
    fn no_roots_message() {
        let report = DownstreamReport {
            roots: Vec::new(),
            affected: Vec::new(),
            external: Vec::new(),
            unknown_roots: Vec::new(),
        };

        let text = render(|w| downstream_text(w, &report));

        assert_eq!(text, "No roots given.\n");
    }

    #[test]
    fn no_cycles_message() {
        let text = render(|w| cycles_text(w, &[]));
        assert_eq!(text, "No circular dependencies detected.\n");
    }

    #[test]
    fn json_output_is_parseable() {
        let report = DownstreamReport {
            roots: ids(&["a"]),
            affected: ids(&["a", "b"]),
            external: Vec::new(),
            unknown_roots: Vec::new(),
        };

        let text = render(|w| write_downstream(w, &report, OutputMode::Json));

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["affected"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn warnings_are_prefixed() {
        let warnings = vec![LoadWarning::MalformedJson {
            line_number: 3,
            error: "expected value".to_string(),
        }];

        let text = render(|w| write_warnings(w, &warnings));

        assert_eq!(text, "warning: skipped malformed line 3: expected value\n");
    }
}
