//! Comparison table construction
//!
//! Pure table builders over pre-resolved condition lists, so the grouping
//! and ranking rules are testable without any directory layout.
//!
//! Row identity is (base name, consensus) for known motifs and consensus
//! alone for de novo motifs. Each row carries one percent/p-value column
//! pair per condition plus two derived columns computed over the non-merged
//! conditions: the count of conditions where the motif appears with a
//! positive percentage and the mean of those percentages. Derived values are
//! computed from the two-decimal rendered percents, matching the historical
//! tables digit for digit.

use crate::formats::homer::{DenovoMotif, KnownMotif};
use crate::motifs::discovery::{Condition, MERGED_CONDITION};
use std::collections::{BTreeSet, HashMap};
use std::io::{self, Write};

/// Placeholder for a motif absent from a condition
const ABSENT: &str = "-";

/// Normalized form of a non-significant p-value
const NOT_SIGNIFICANT: &str = "-1";

/// A finished comparison table
#[derive(Debug)]
pub struct MotifTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Union cardinality of row keys across all conditions, counted before
    /// the significance filter
    pub motif_count: usize,
    pub condition_count: usize,
}

impl MotifTable {
    /// Write the table as TSV, header first
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.header.join("\t"))?;
        for row in &self.rows {
            writeln!(writer, "{}", row.join("\t"))?;
        }
        Ok(())
    }
}

/// Row under construction, keeping the ranking keys alongside the cells
struct RankedRow {
    cells: Vec<String>,
    conditions_found: usize,
    avg_sort: f64,
    significant: bool,
}

/// p-values Homer emits for entirely unenriched motifs
fn is_nonsignificant(pvalue: &str) -> bool {
    matches!(pvalue, "1e0" | "1.0" | "1")
}

fn format_percent(percent: f64) -> String {
    format!("{percent:.2}%")
}

/// Parse a rendered percent cell back to a number; `-` yields None
fn parse_percent_cell(cell: &str) -> Option<f64> {
    if cell == ABSENT {
        None
    } else {
        cell.trim_end_matches('%').parse().ok()
    }
}

/// Count and mean of strictly positive rendered percents
fn derive_aggregates(percent_cells: &[&str]) -> (usize, f64) {
    let positives: Vec<f64> = percent_cells
        .iter()
        .filter_map(|cell| parse_percent_cell(cell))
        .filter(|p| *p > 0.0)
        .collect();
    if positives.is_empty() {
        (0, 0.0)
    } else {
        (
            positives.len(),
            positives.iter().sum::<f64>() / positives.len() as f64,
        )
    }
}

fn rank(rows: &mut Vec<RankedRow>) {
    rows.sort_by(|a, b| {
        b.conditions_found
            .cmp(&a.conditions_found)
            .then(b.avg_sort.total_cmp(&a.avg_sort))
    });
}

/// Build the known-motif comparison table.
///
/// Rows where every p-value cell is non-significant or absent are dropped:
/// only motifs significant in at least one condition survive.
pub fn build_known_table(conditions: &[Condition<KnownMotif>]) -> MotifTable {
    let mut header = vec!["Motif".to_string(), "Consensus".to_string()];
    for cond in conditions {
        header.push(cond.name.clone());
        header.push(format!("{}_pval", cond.name));
    }
    header.push("Conditions_Found".to_string());
    header.push("Avg_Target".to_string());

    let keys: BTreeSet<(&str, &str)> = conditions
        .iter()
        .flat_map(|c| c.motifs.iter())
        .map(|m| (m.name.as_str(), m.consensus.as_str()))
        .collect();
    let motif_count = keys.len();

    let mut rows = Vec::with_capacity(motif_count);
    for (name, consensus) in keys {
        let mut cells = vec![name.to_string(), consensus.to_string()];
        let mut percent_cells = Vec::new();
        let mut significant = false;

        for cond in conditions {
            let found = cond
                .motifs
                .iter()
                .find(|m| m.name == name && m.consensus == consensus);
            match found {
                Some(motif) => {
                    let percent = format_percent(motif.percent_target);
                    let pvalue = if is_nonsignificant(&motif.pvalue) {
                        NOT_SIGNIFICANT.to_string()
                    } else {
                        motif.pvalue.clone()
                    };
                    significant |= pvalue != NOT_SIGNIFICANT;
                    if cond.name != MERGED_CONDITION {
                        percent_cells.push(percent.clone());
                    }
                    cells.push(percent);
                    cells.push(pvalue);
                }
                None => {
                    cells.push(ABSENT.to_string());
                    cells.push(ABSENT.to_string());
                }
            }
        }

        let refs: Vec<&str> = percent_cells.iter().map(String::as_str).collect();
        let (conditions_found, avg) = derive_aggregates(&refs);
        let avg_cell = format_percent(avg);
        let avg_sort = parse_percent_cell(&avg_cell).unwrap_or(0.0);
        cells.push(conditions_found.to_string());
        cells.push(avg_cell);

        rows.push(RankedRow {
            cells,
            conditions_found,
            avg_sort,
            significant,
        });
    }

    rows.retain(|row| row.significant);
    rank(&mut rows);

    MotifTable {
        header,
        rows: rows.into_iter().map(|r| r.cells).collect(),
        motif_count,
        condition_count: conditions.len(),
    }
}

/// Build the de novo comparison table.
///
/// Rows are keyed by consensus alone, no significance filter is applied,
/// and a final column carries the first logo path seen for each consensus
/// in condition-scan order.
pub fn build_denovo_table(conditions: &[Condition<DenovoMotif>]) -> MotifTable {
    let mut header = vec!["Consensus".to_string()];
    for cond in conditions {
        header.push(cond.name.clone());
        header.push(format!("{}_pval", cond.name));
    }
    header.push("Conditions_Found".to_string());
    header.push("Avg_Target".to_string());
    header.push("SVG_Path".to_string());

    let keys: BTreeSet<&str> = conditions
        .iter()
        .flat_map(|c| c.motifs.iter())
        .map(|m| m.consensus.as_str())
        .collect();
    let motif_count = keys.len();

    // First logo seen wins, scanning conditions in discovery order
    let mut logos: HashMap<&str, String> = HashMap::new();
    for cond in conditions {
        for motif in &cond.motifs {
            if let Some(logo) = &motif.logo {
                logos
                    .entry(motif.consensus.as_str())
                    .or_insert_with(|| logo.display().to_string());
            }
        }
    }

    let mut rows = Vec::with_capacity(motif_count);
    for consensus in keys {
        let mut cells = vec![consensus.to_string()];
        let mut percent_cells = Vec::new();

        for cond in conditions {
            let found = cond.motifs.iter().find(|m| m.consensus == consensus);
            match found {
                Some(motif) => {
                    let percent = format_percent(motif.percent_target);
                    let pvalue = match &motif.pvalue {
                        Some(p) if is_nonsignificant(p) => NOT_SIGNIFICANT.to_string(),
                        Some(p) => p.clone(),
                        None => ABSENT.to_string(),
                    };
                    if cond.name != MERGED_CONDITION {
                        percent_cells.push(percent.clone());
                    }
                    cells.push(percent);
                    cells.push(pvalue);
                }
                None => {
                    cells.push(ABSENT.to_string());
                    cells.push(ABSENT.to_string());
                }
            }
        }

        let refs: Vec<&str> = percent_cells.iter().map(String::as_str).collect();
        let (conditions_found, avg) = derive_aggregates(&refs);
        let avg_cell = format_percent(avg);
        let avg_sort = parse_percent_cell(&avg_cell).unwrap_or(0.0);
        cells.push(conditions_found.to_string());
        cells.push(avg_cell);
        cells.push(logos.get(consensus).cloned().unwrap_or_else(|| ABSENT.to_string()));

        rows.push(RankedRow {
            cells,
            conditions_found,
            avg_sort,
            significant: true,
        });
    }

    rank(&mut rows);

    MotifTable {
        header,
        rows: rows.into_iter().map(|r| r.cells).collect(),
        motif_count,
        condition_count: conditions.len(),
    }
}
