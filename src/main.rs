//! peakpipe CLI entry point
//!
//! Post-processing converters for peak-calling pipelines: annotation to
//! BED12, Homer motif comparison tables, and IGV session generation.

use clap::{Parser, Subcommand};
use peakpipe::formats::{convert_gff_to_bed, convert_gtf_to_bed};
use peakpipe::motifs;
use peakpipe::session;
use peakpipe::ConversionStats;
use peakpipe::ParseMode;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "peakpipe")]
#[command(about = "Post-processing converters for peak-calling pipelines")]
#[command(version)]
struct Cli {
    /// Fail on malformed input lines instead of silently skipping them
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a GFF file to BED12 (CDS grouped by gene name)
    Gff2bed {
        /// Input GFF file (.gff or .gff.gz)
        input: PathBuf,
        /// Output BED file
        output: PathBuf,
    },
    /// Convert a GTF file to BED12 (exon/CDS grouped by Parent attribute)
    Gtf2bed {
        /// Input GTF file (.gtf or .gtf.gz)
        input: PathBuf,
        /// Output BED file
        output: PathBuf,
    },
    /// Build Homer motif comparison tables across conditions
    MotifTables {
        /// Root directory holding consensus_peaks/ and merged_peaks/ results
        root: PathBuf,
    },
    /// Create an IGV session XML from a list of track files and colours
    IgvSession {
        /// XML output file
        xml_out: PathBuf,
        /// Tab-delimited list file: file_name<TAB>colour per line
        list_file: PathBuf,
        /// Genome fasta path or IGV genome id, e.g. hg19
        genome: String,
        /// Annotation file shown at the top of the data panel
        annotation: String,
        /// Path prefix prepended to every file in the list
        #[arg(long = "path_prefix", default_value = "")]
        path_prefix: String,
    },
}

fn print_annotation_stats(stats: &ConversionStats, elapsed_secs: f64) {
    eprintln!("\n=== Conversion Statistics ===");
    eprintln!("Input lines:     {}", stats.lines);
    eprintln!("Sub-features:    {}", stats.records);
    eprintln!("Skipped:         {}", stats.skipped);
    eprintln!("Transcripts:     {}", stats.transcripts);
    eprintln!("Time elapsed:    {:.2}s", elapsed_secs);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let mode = if cli.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };

    match cli.command {
        Commands::Gff2bed { input, output } => {
            eprintln!("Converting GFF file: {:?} -> {:?}", input, output);
            let stats = convert_gff_to_bed(&input, &output, mode)?;
            print_annotation_stats(&stats, start.elapsed().as_secs_f64());
        }

        Commands::Gtf2bed { input, output } => {
            eprintln!("Converting GTF file: {:?} -> {:?}", input, output);
            let stats = convert_gtf_to_bed(&input, &output, mode)?;
            print_annotation_stats(&stats, start.elapsed().as_secs_f64());
        }

        Commands::MotifTables { root } => {
            eprintln!("Processing known motifs...");
            let summary = motifs::run(&root)?;

            match &summary.known {
                Some(table) => {
                    eprintln!("Created known motif comparison table: {:?}", table.path);
                    eprintln!(
                        "  {} unique motifs across {} conditions",
                        table.motifs, table.conditions
                    );
                }
                None => eprintln!("No known motif results found"),
            }
            eprintln!("\nProcessing de novo motifs...");
            match &summary.denovo {
                Some(table) => {
                    eprintln!("Created de novo motif comparison table: {:?}", table.path);
                    eprintln!(
                        "  {} unique motifs across {} conditions",
                        table.motifs, table.conditions
                    );
                }
                None => eprintln!("No de novo motif results found"),
            }
            eprintln!("\nTime elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::IgvSession {
            xml_out,
            list_file,
            genome,
            annotation,
            path_prefix,
        } => {
            eprintln!("Creating IGV session: {:?}", xml_out);
            let entries = session::read_track_list(&list_file, &path_prefix)?;
            let document = session::render_session(&entries, &genome, &annotation)?;

            if let Some(parent) = xml_out.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&xml_out, document)?;
            eprintln!("Session with {} resources written", entries.len() + 1);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
