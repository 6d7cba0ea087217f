use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser, ValueEnum};
use clipboard_rs::{Clipboard, ClipboardContext};
use log::info;
use water_sort::{
    Configuration, GoalRule, Move, SearchOutcome, SearchReport, SearchStrategy, SolveOptions,
    search, solve_both,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Bfs,
    BestFirst,
    Both,
}

#[derive(Parser)]
#[command(
    name = "water_sort",
    about = "Find pour sequences that solve water sort puzzles",
    version
)]
struct Cli {
    /// Board in letter notation, bottom to top per tube, e.g. "AB BA .."
    board: Option<String>,

    /// Read the board from a file
    #[arg(short, long, conflicts_with = "board")]
    file: Option<PathBuf>,

    /// Read the board from the clipboard
    #[arg(long, conflicts_with_all = ["board", "file"])]
    paste: bool,

    /// Tube capacity (default: longest tube as written)
    #[arg(short, long)]
    capacity: Option<usize>,

    #[arg(short, long, value_enum, default_value_t = StrategyArg::Bfs)]
    strategy: StrategyArg,

    /// Only count full single-color tubes as solved
    #[arg(long)]
    complete: bool,

    /// Give up after recording this many boards
    #[arg(long)]
    max_states: Option<usize>,

    /// Copy the found moves to the clipboard
    #[arg(long)]
    copy: bool,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_board(cli: &Cli) -> Result<String> {
    if let Some(board) = &cli.board {
        return Ok(board.clone());
    }
    if let Some(path) = &cli.file {
        return fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    if cli.paste {
        let ctx = ClipboardContext::new().map_err(|e| anyhow!("clipboard unavailable: {e}"))?;
        return ctx
            .get_text()
            .map_err(|e| anyhow!("clipboard holds no text: {e}"));
    }
    bail!("no board given; pass BOARD, --file or --paste")
}

fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_report(report: &SearchReport) {
    println!("strategy: {}", report.strategy);
    println!("found: {}", report.found());
    match &report.outcome {
        SearchOutcome::Solved(path) => {
            println!("move count: {}", path.len());
            if !path.is_empty() {
                println!("{}", format_moves(path));
            }
        }
        SearchOutcome::Unsolvable => println!("no sequence of moves solves this board"),
        SearchOutcome::Aborted => println!("search gave up at the state cap"),
        SearchOutcome::Cancelled => println!("search cancelled"),
    }
    println!(
        "states explored: {}, seen: {}",
        report.states_explored, report.states_seen
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let text = read_board(&cli)?;
    let board = Configuration::parse(&text, cli.capacity).context("invalid board")?;
    info!("Loaded board {board}");

    let goal = if cli.complete {
        GoalRule::Complete
    } else {
        GoalRule::Uniform
    };
    let options = SolveOptions::default()
        .with_goal(goal)
        .with_max_states(cli.max_states);

    let reports = match cli.strategy {
        StrategyArg::Bfs => vec![search(&board, SearchStrategy::BreadthFirst, &options)],
        StrategyArg::BestFirst => vec![search(&board, SearchStrategy::BestFirst, &options)],
        StrategyArg::Both => {
            let (breadth, best) = solve_both(&board, &options);
            vec![breadth, best]
        }
    };
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_report(report);
    }

    if cli.copy
        && let Some(moves) = reports.iter().find_map(SearchReport::moves)
    {
        let ctx = ClipboardContext::new().map_err(|e| anyhow!("clipboard unavailable: {e}"))?;
        ctx.set_text(format_moves(moves))
            .map_err(|e| anyhow!("could not copy moves: {e}"))?;
    }
    Ok(())
}
