use clap::Parser;
use gridfill_csp::backtracking_search::{find_fill, FillFailure, FillOptions};
use gridfill_csp::puzzle_graph::{render_grid, PuzzleGraph};
use gridfill_csp::vocabulary::Vocabulary;
use std::fmt::{Debug, Formatter};
use std::fs;
use std::time::Duration;

/// gridfill: fill a puzzle structure with words from a vocabulary file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the structure file, as text with _ representing open cells and # representing blocks
    structure: String,

    /// Path to the vocabulary file, with one word per line
    words: String,

    /// Path to write the filled grid to, in addition to printing it
    output: Option<String>,

    /// Give up after this many seconds [default: none]
    #[arg(long)]
    timeout: Option<u64>,

    /// Give up after visiting this many search states [default: none]
    #[arg(long)]
    max_states: Option<usize>,

    /// Seed for breaking ties between equally good variables at random [default: lowest position]
    #[arg(long)]
    seed: Option<u64>,
}

struct Error(String);

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0) // Print error unquoted
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let args = Args::parse();

    let graph = PuzzleGraph::from_template_file(&args.structure)
        .map_err(|error| Error(format!("{error}")))?;

    let vocabulary =
        Vocabulary::from_file(&args.words).map_err(|error| Error(format!("{error}")))?;

    let options = FillOptions {
        timeout: args.timeout.map(Duration::from_secs),
        max_states: args.max_states,
        abort: None,
        tie_break_seed: args.seed,
    };

    let result = match find_fill(&graph, &vocabulary, &options) {
        Ok(result) => result,
        Err(FillFailure::HardFailure) => {
            println!("No solution.");
            return Ok(());
        }
        Err(failure) => return Err(Error(format!("{failure}"))),
    };

    log::info!(target: "search", "{:?}", result.statistics);

    let rendered = render_grid(&graph, &vocabulary, &result.assignment);
    println!("{rendered}");

    if let Some(output) = args.output {
        fs::write(&output, rendered + "\n")
            .map_err(|_| Error(format!("Couldn't write file '{output}'")))?;
    }

    Ok(())
}
