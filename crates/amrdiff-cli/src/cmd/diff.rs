//! Implementation of `amrdiff diff <bundle>`.
//!
//! Decodes a bundle holding both graphs and their correspondence, builds the
//! annotated diff graph, and writes it to stdout. The gold side is either raw
//! triples (`gold`) or the tables printed by `amrdiff tables`
//! (`gold_tables`).
//!
//! - `--format json`: the graph as a single JSON object of `nodes` and
//!   `edges`.
//! - `--format human`: mark counts, then one line per element that does not
//!   agree.
//!
//! Exit codes: 0 = graph built, 1 = the diff rejected the bundle, 2 = the
//! bundle could not be read.
use std::collections::HashMap;
use std::io::Write;
use std::time::Instant;

use amrdiff_core::{
    AmrTriples, Correspondence, DiffBuilder, DiffConfig, DiffGraph, GoldTables, Mark,
    MarkCounts, TableRelabel,
};
use serde::Deserialize;

use crate::OutputFormat;
use crate::error::CliError;

/// The reference graph of a bundle.
#[derive(Debug, Clone)]
pub enum GoldSource {
    /// Raw gold triples, indexed on every run.
    Triples(AmrTriples),
    /// Tables precomputed by `amrdiff tables`.
    Tables(GoldTables),
}

/// The `diff` input file.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawBundle")]
pub struct Bundle {
    /// The graph under evaluation.
    pub test: AmrTriples,
    /// The reference graph.
    pub gold: GoldSource,
    /// Gold index per test instance; negative for unmatched.
    pub correspondence: Correspondence,
    /// Test constant to gold constant; unlisted constants compare as-is.
    pub constant_map: HashMap<String, String>,
}

/// Wire form of [`Bundle`] before the gold source is checked.
#[derive(Deserialize)]
struct RawBundle {
    test: AmrTriples,
    #[serde(default)]
    gold: Option<AmrTriples>,
    #[serde(default)]
    gold_tables: Option<GoldTables>,
    #[serde(rename = "match")]
    correspondence: Correspondence,
    #[serde(default)]
    constant_map: HashMap<String, String>,
}

impl TryFrom<RawBundle> for Bundle {
    type Error = String;

    fn try_from(raw: RawBundle) -> Result<Self, Self::Error> {
        let gold = match (raw.gold, raw.gold_tables) {
            (Some(triples), None) => GoldSource::Triples(triples),
            (None, Some(tables)) => GoldSource::Tables(tables),
            (Some(_), Some(_)) => {
                return Err("bundle has both `gold` and `gold_tables`".to_owned());
            }
            (None, None) => return Err("missing field `gold` or `gold_tables`".to_owned()),
        };
        Ok(Self {
            test: raw.test,
            gold,
            correspondence: raw.correspondence,
            constant_map: raw.constant_map,
        })
    }
}

/// Runs the `diff` command.
///
/// # Errors
///
/// - [`CliError::DiffFailed`] if the bundle is inconsistent.
/// - [`CliError::IoError`] if writing stdout or stderr fails.
pub fn run(
    bundle: Bundle,
    root_marker: &str,
    format: OutputFormat,
    verbose: bool,
) -> Result<(), CliError> {
    let Bundle {
        test,
        gold,
        correspondence,
        constant_map,
    } = bundle;
    let config = DiffConfig {
        root_marker: root_marker.to_owned(),
    };

    let start = Instant::now();
    let relabel = TableRelabel::new(constant_map);
    let builder = match gold {
        GoldSource::Triples(triples) => {
            DiffBuilder::new(&test, &triples, &correspondence, relabel)?
        }
        GoldSource::Tables(tables) => {
            tracing::debug!(nodes = tables.node_count(), "using precomputed gold tables");
            DiffBuilder::from_tables(&test, tables, &correspondence, relabel)?
        }
    };
    let graph = builder.with_config(config).build()?;
    let elapsed = start.elapsed();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => write_json(&mut out, &graph),
        OutputFormat::Human => write_human(&mut out, &graph),
    }
    .map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })?;

    if verbose {
        let stderr = std::io::stderr();
        let mut err = stderr.lock();
        writeln!(err, "diffed in {}ms", elapsed.as_millis()).map_err(|e| CliError::IoError {
            source: "stderr".to_owned(),
            detail: e.to_string(),
        })?;
    }
    Ok(())
}

/// Writes the graph as one pretty-printed JSON object.
pub fn write_json<W: Write>(w: &mut W, graph: &DiffGraph) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, graph)?;
    writeln!(w)
}

/// Writes mark counts followed by every test-only and gold-only element.
pub fn write_human<W: Write>(w: &mut W, graph: &DiffGraph) -> std::io::Result<()> {
    let summary = graph.summary();
    write_counts(w, "nodes", &summary.nodes)?;
    write_counts(w, "edges", &summary.edges)?;

    for node in graph.nodes() {
        if let Some(tag) = tag(node.mark) {
            writeln!(w, "{tag}  node {}  {}", node.id, node.label)?;
        }
    }
    for edge in graph.edges() {
        if let Some(tag) = tag(edge.mark) {
            writeln!(
                w,
                "{tag}  edge {} -{}-> {}",
                edge.source, edge.label, edge.target
            )?;
        }
    }
    Ok(())
}

fn write_counts<W: Write>(w: &mut W, what: &str, counts: &MarkCounts) -> std::io::Result<()> {
    writeln!(
        w,
        "{what}: {} (agree {}, test {}, gold {})",
        counts.total(),
        counts.agree,
        counts.test,
        counts.gold
    )
}

fn tag(mark: Mark) -> Option<&'static str> {
    match mark {
        Mark::Agree => None,
        Mark::Test => Some("test"),
        Mark::Gold => Some("gold"),
    }
}
