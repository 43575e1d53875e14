//! Homer motif comparison tables
//!
//! Aggregates per-condition Homer results into two cross-condition tables
//! written back into the scanned root directory. Discovery of the fixed
//! directory convention is separated from table construction so the
//! comparison logic operates on pre-resolved condition lists.

pub mod discovery;
pub mod table;

pub use discovery::{discover_denovo, discover_known, Condition, MERGED_CONDITION};
pub use table::{build_denovo_table, build_known_table, MotifTable};

use crate::core::MotifError;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Output file name for the known-motif table
pub const KNOWN_TABLE_NAME: &str = "Known_Motifs_Comparison_Table.tsv";

/// Output file name for the de novo table
pub const DENOVO_TABLE_NAME: &str = "DeNovo_Motifs_Comparison_Table.tsv";

/// What one table run produced
#[derive(Debug)]
pub struct TableSummary {
    pub path: PathBuf,
    pub motifs: usize,
    pub conditions: usize,
}

/// Outcome of a full `motif-tables` invocation.
/// `None` means no condition with the corresponding result file was found.
#[derive(Debug)]
pub struct RunSummary {
    pub known: Option<TableSummary>,
    pub denovo: Option<TableSummary>,
}

/// Build and write both comparison tables under `root`.
///
/// A missing root is fatal; a mode with no discoverable condition is simply
/// absent from the summary and writes nothing.
pub fn run(root: &Path) -> Result<RunSummary, MotifError> {
    if !root.exists() {
        return Err(MotifError::RootNotFound(root.to_path_buf()));
    }

    let known = {
        let conditions = discover_known(root)?;
        if conditions.is_empty() {
            None
        } else {
            let table = build_known_table(&conditions);
            let path = root.join(KNOWN_TABLE_NAME);
            let mut writer = BufWriter::new(File::create(&path)?);
            table.write_tsv(&mut writer)?;
            Some(TableSummary {
                path,
                motifs: table.motif_count,
                conditions: table.condition_count,
            })
        }
    };

    let denovo = {
        let conditions = discover_denovo(root)?;
        if conditions.is_empty() {
            None
        } else {
            let table = build_denovo_table(&conditions);
            let path = root.join(DENOVO_TABLE_NAME);
            let mut writer = BufWriter::new(File::create(&path)?);
            table.write_tsv(&mut writer)?;
            Some(TableSummary {
                path,
                motifs: table.motif_count,
                conditions: table.condition_count,
            })
        }
    };

    Ok(RunSummary { known, denovo })
}
