use std::path::{Path, PathBuf};

use clap::Parser;
use regex_puzzle::puzzle::Puzzle;

#[derive(Parser)]
#[command(name = "regex-puzzle", bin_name = "regex-puzzle")]
#[command(about = "Find the shortest string matched by every regex of a puzzle")]
struct Cli {
    /// Puzzle file with one regex per line
    #[arg(default_value = "regexes.txt")]
    file: PathBuf,

    /// Also write Graphviz renderings of every NFA and DFA into this directory
    #[arg(long, value_name = "DIR")]
    dot: Option<PathBuf>,
}

fn write_dot_files(puzzle: &Puzzle, dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    for (idx, (nfa, dfa)) in puzzle.nfas.iter().zip(&puzzle.dfas).enumerate() {
        let base = dir.join(format!("regex-{}", idx + 1));
        std::fs::write(base.with_extension("nfa.dot"), nfa.to_dot())?;
        std::fs::write(base.with_extension("dfa.dot"), dfa.to_dot())?;
        log::debug!("wrote {}.{{nfa,dfa}}.dot for {}", base.display(), puzzle.sources[idx]);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let puzzle = match Puzzle::from_file(&cli.file) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("error: {}: {}", cli.file.display(), e);
            std::process::exit(1);
        }
    };

    if let Some(dir) = &cli.dot {
        if let Err(e) = write_dot_files(&puzzle, dir) {
            eprintln!("error: {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    }

    match puzzle.solve() {
        Some(answer) => println!("{answer}"),
        None => println!("no common string"),
    }
}
