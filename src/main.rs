// vim: set ai et ts=4 sts=4 sw=4:
use std::io;
use std::process;
use std::path::{Path, PathBuf};
use std::convert::TryFrom;
use clap::{App, Arg};
use log::{error, info};

use nonogram::format::PuzzleFile;
use nonogram::puzzle::Style;
use nonogram::util::is_a_tty;
use nonogram::{Solver, SolverState, Outcome, LogObserver, Error};

pub struct Args {
    pub files: Vec<PathBuf>,
    pub style: Style,
    pub steps: bool,        // print the grid after every pass
    pub emit_color: bool,
    pub verbosity: u64,
}

fn parse_args() -> Result<Args, String> {
    let matches = App::new("nonogram")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Solves nonogram puzzles by line constraint propagation")
        .arg(Arg::with_name("FILE")
                 .help("Puzzle files (.yaml, .json, or column/row clue text)")
                 .required(true)
                 .multiple(true)
                 .index(1))
        .arg(Arg::with_name("verbose")
                 .short("v")
                 .multiple(true)
                 .help("Log more (-v info, -vv debug, -vvv trace)"))
        .arg(Arg::with_name("style")
                 .short("s")
                 .long("style")
                 .takes_value(true)
                 .possible_values(&["grid", "emoji", "plain"])
                 .default_value("grid")
                 .help("How to draw the puzzle"))
        .arg(Arg::with_name("steps")
                 .long("steps")
                 .help("Draw the puzzle after every pass"))
        .arg(Arg::with_name("no-color")
                 .long("no-color")
                 .help("Never emit color escape sequences"))
        .get_matches();

    let files = matches.values_of_os("FILE")
                       .map(|values| values.map(PathBuf::from).collect())
                       .unwrap_or_default();
    Ok(Args {
        files,
        style:      Style::try_from(matches.value_of("style").unwrap_or("grid"))?,
        steps:      matches.is_present("steps"),
        emit_color: !matches.is_present("no-color") && is_a_tty(io::stdout()),
        verbosity:  matches.occurrences_of("verbose"),
    })
}

fn setup_logger(verbosity: u64) -> Result<(), fern::InitError> {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}][{}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(io::stderr())
        .apply()?;
    Ok(())
}

/// Solves one puzzle file and prints the result. Returns whether it passed: a file with an
/// expected solution passes when it is solved exactly, any other file when no error occurs.
fn run_file(path: &Path, args: &Args) -> Result<bool, Error> {
    let file = PuzzleFile::load(path)?;
    let puzzle = file.to_puzzle()?;
    info!("{}: {}x{} puzzle", path.display(), puzzle.width(), puzzle.height());

    let mut solver = Solver::with_observer(puzzle, Box::new(LogObserver))?;
    if args.steps {
        while solver.state() == SolverState::Running {
            solver.pass()?;
            println!("after pass {}:\n{}", solver.iterations, solver.puzzle.render(args.style, args.emit_color));
        }
    }
    let outcome = solver.solve()?;

    println!("{}", solver.puzzle.render(args.style, args.emit_color));
    println!("{}: {} after {} pass(es)", path.display(), outcome, solver.iterations);

    match &file.solution {
        None => Ok(true),
        Some(expected) => {
            let mismatches = solver.puzzle.count_mismatches(expected);
            let passed = mismatches == 0 && outcome == Outcome::Solved;
            match passed {
                true  => println!("Passed \u{2705}"),
                false => println!("Failed \u{274C} ({} wrong, {} unknown)", mismatches, solver.puzzle.grid.count_unknown()),
            }
            Ok(passed)
        }
    }
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(2);
        }
    };
    if let Err(e) = setup_logger(args.verbosity) {
        eprintln!("could not set up logging: {}", e);
    }

    let mut passed: usize = 0;
    for path in &args.files {
        match run_file(path, &args) {
            Ok(true)  => passed += 1,
            Ok(false) => {},
            Err(e)    => {
                error!("{}: {}", path.display(), e);
                println!("{}: {}", path.display(), e);
            }
        }
    }
    if args.files.len() > 1 {
        println!("{}/{} puzzle(s) passed", passed, args.files.len());
    }
    if passed < args.files.len() {
        process::exit(1);
    }
}
