//! Implementation of `amrdiff tables <gold>`.
//!
//! Builds the positional lookup tables for a gold graph and prints them. The
//! JSON form goes into a `diff` bundle as `gold_tables` when the same gold
//! graph is diffed against many test graphs.
use std::io::Write;

use amrdiff_core::{AmrTriples, GoldTables, build_tables};

use crate::OutputFormat;
use crate::error::CliError;

/// Runs the `tables` command.
///
/// # Errors
///
/// - [`CliError::DiffFailed`] if the gold triples reference an undeclared
///   variable.
/// - [`CliError::IoError`] if writing stdout fails.
pub fn run(gold: &AmrTriples, format: OutputFormat) -> Result<(), CliError> {
    let tables = build_tables(gold)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => write_json(&mut out, &tables),
        OutputFormat::Human => write_human(&mut out, &tables),
    }
    .map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })
}

fn write_json<W: Write>(w: &mut W, tables: &GoldTables) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, tables)?;
    writeln!(w)
}

/// One line per table entry, grouped by table.
fn write_human<W: Write>(w: &mut W, tables: &GoldTables) -> std::io::Result<()> {
    for (index, concept) in &tables.instances {
        writeln!(w, "instance  {index}  {concept}")?;
    }
    for ((index, constant), labels) in &tables.attributes {
        for label in labels {
            writeln!(w, "attribute {index}  {label}  {constant}")?;
        }
    }
    for ((source, target), labels) in &tables.relations {
        for label in labels {
            writeln!(w, "relation  {source}  {label}  {target}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use amrdiff_core::{AttributeTriple, InstanceTriple, RelationTriple};

    use super::*;

    fn gold() -> AmrTriples {
        AmrTriples {
            instances: vec![
                InstanceTriple::new("w", "want-01"),
                InstanceTriple::new("b", "boy"),
            ],
            attributes: vec![AttributeTriple::new("polarity", "w", "-")],
            relations: vec![RelationTriple::new("ARG0", "w", "b")],
        }
    }

    #[test]
    fn human_lists_every_entry() {
        let tables = build_tables(&gold()).expect("tables");
        let mut buf = Vec::new();
        write_human(&mut buf, &tables).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            text,
            "instance  0  want-01\n\
             instance  1  boy\n\
             attribute 0  polarity  -\n\
             relation  0  ARG0  1\n"
        );
    }

    #[test]
    fn json_round_trips() {
        let tables = build_tables(&gold()).expect("tables");
        let mut buf = Vec::new();
        write_json(&mut buf, &tables).expect("write");
        let back: GoldTables = serde_json::from_slice(&buf).expect("parse");
        assert_eq!(back, tables);
    }

    #[test]
    fn undeclared_variable_is_a_diff_failure() {
        let mut g = gold();
        g.relations.push(RelationTriple::new("ARG1", "w", "zz"));
        let err = run(&g, OutputFormat::Json).expect_err("must fail");
        assert_eq!(err.exit_code(), 1);
    }
}
