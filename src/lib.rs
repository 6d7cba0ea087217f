//! Search engine for water sort puzzles.
//!
//! A board is a row of tubes, each a stack of colored units with a shared
//! capacity. Pouring moves the same-colored run on top of one tube onto an
//! empty tube or a matching top, as far as space allows. The board is solved
//! when no tube mixes colors.
//!
//! ```
//! use water_sort::{Configuration, solve};
//!
//! let board: Configuration = "AB BA ..".parse().unwrap();
//! let moves = solve(&board).unwrap();
//! assert_eq!(moves.len(), 2);
//! assert!(board.replay(&moves).unwrap().is_solved());
//! ```
//!
//! ## Modules
//! - `model`: tubes, boards, moves and the pour rules.
//! - `repr`: the letter notation boards are shared in.
//! - `ledger`: the per-search set of visited boards.
//! - `solver`: breadth-first and best-first search.

pub mod error;
pub mod ledger;
pub mod model;
pub mod repr;
pub mod solver;

pub use error::{ConfigurationError, IllegalMoveError, MoveRejection};
pub use ledger::VisitedLedger;
pub use model::{ColorId, Configuration, GoalRule, Move, PuzzleParameters, Tube};
pub use solver::{
    SearchOutcome, SearchPath, SearchReport, SearchStrategy, SolveOptions, heuristic,
    optimal_solve, search, solve, solve_batch, solve_both, verify_solution,
};
