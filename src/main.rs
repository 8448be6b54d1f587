//! Truss - structure definition checker
//!
//! Highlights and parses a truss definition, reports its line errors, and
//! summarises a recorded solver response.
//!
//! # Usage
//!
//! ```bash
//! truss bridge.truss --html > bridge.html
//! truss bridge.truss --solution bridge.solution.json --margin 20
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use truss_core::{
    analytics::{structure_bounds, SizeOptions},
    dsl,
    error::{Result, TrussError},
    report,
    solution::{solve_structure, RecordedSolver},
};

/// Truss structure definition checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the structure definition file
    #[arg(value_name = "STRUCTURE_FILE")]
    structure_file: PathBuf,

    /// Recorded solver response (JSON) to analyse
    #[arg(long, value_name = "SOLUTION_FILE")]
    solution: Option<PathBuf>,

    /// Print the highlighted definition as HTML
    #[arg(long)]
    html: bool,

    /// Fail when the definition has errors
    #[arg(long)]
    strict: bool,

    /// Blank space around the drawing
    #[arg(long, default_value_t = 0.0)]
    margin: f64,

    /// Geometry scale
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Drawn length per unit of load
    #[arg(long, default_value_t = 1.0)]
    loads_scale: f64,

    /// Displacement amplification [default: suggested scale]
    #[arg(long)]
    solution_scale: Option<f64>,

    /// Drawn length per unit of reaction [default: suggested scale]
    #[arg(long)]
    reactions_scale: Option<f64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Parse the definition file
    let (lines, outcome) = dsl::parse_file(&args.structure_file)?;
    info!(
        nodes = outcome.structure.nodes().len(),
        bars = outcome.structure.bars().len(),
        errors = outcome.errors.len(),
        "parsed structure definition"
    );

    // Highlight it
    for marked in dsl::highlight(&lines) {
        if args.html {
            println!("{}", marked.to_html());
        } else {
            println!("{marked}");
        }
    }

    eprint!("{}", report::render_errors(&outcome.errors));
    if args.strict {
        if let Some(err) = TrussError::from_parse_errors(&outcome.errors) {
            return Err(err);
        }
    }

    let Some(solution_path) = &args.solution else {
        return Ok(());
    };

    // Replay the recorded solver response
    let solver = RecordedSolver::ok(read_text(solution_path)?);
    let solved = solve_structure(&solver, &outcome.structure, &lines)?;
    debug!(?solved.meta, "analysed solution");

    let options = SizeOptions::new()
        .with_margin(args.margin)
        .with_scale(args.scale)
        .with_loads_scale(args.loads_scale)
        .with_solution_scale(
            args.solution_scale
                .unwrap_or(solved.meta.displacement.suggested_scale),
        )
        .with_reactions_scale(
            args.reactions_scale
                .unwrap_or(solved.meta.reaction.suggested_scale),
        );
    let bounds = structure_bounds(&outcome.structure, Some(&solved.solution), &options);

    print!("{}", report::render_summary(&solved.meta, &bounds));

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| TrussError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}
