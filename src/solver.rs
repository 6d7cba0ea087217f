use std::cmp::Ordering as CmpOrdering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use log::{debug, trace};
use rayon::prelude::*;

use crate::error::IllegalMoveError;
use crate::ledger::{Mark, VisitedLedger};
use crate::model::*;

pub type SearchPath = Vec<Move>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// FIFO frontier. The first solution found uses the fewest moves.
    #[default]
    BreadthFirst,
    /// Frontier ordered by moves made plus [`heuristic`].
    BestFirst,
}
impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::BreadthFirst => f.write_str("breadth-first"),
            SearchStrategy::BestFirst => f.write_str("best-first"),
        }
    }
}

/// Per-call search settings.
#[derive(Clone, Debug, Default)]
pub struct SolveOptions {
    pub goal: GoalRule,
    /// Stop with [`SearchOutcome::Aborted`] once this many configurations are recorded.
    pub max_states: Option<usize>,
    /// Polled once per dequeued configuration.
    pub cancel: Option<Arc<AtomicBool>>,
}
impl SolveOptions {
    pub fn with_goal(mut self, goal: GoalRule) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_max_states(mut self, max_states: Option<usize>) -> Self {
        self.max_states = max_states;
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved(SearchPath),
    /// Every reachable configuration was explored and none is solved.
    Unsolvable,
    /// The state cap was hit first.
    Aborted,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub strategy: SearchStrategy,
    /// Configurations taken off the frontier.
    pub states_explored: usize,
    /// Configurations recorded in the ledger.
    pub states_seen: usize,
}
impl SearchReport {
    pub fn found(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Solved(_))
    }

    pub fn moves(&self) -> Option<&[Move]> {
        match &self.outcome {
            SearchOutcome::Solved(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<SearchPath> {
        match self.outcome {
            SearchOutcome::Solved(path) => Some(path),
            _ => None,
        }
    }
}

/// Remaining-work estimate: sum over non-empty tubes of distinct colors minus one.
///
/// Not proven to be a lower bound on moves left, so best-first search may
/// return a longer path than breadth-first search.
pub fn heuristic(state: &Configuration) -> usize {
    state.fragmentation()
}

struct StateWithHistory {
    state: Configuration,
    history: SearchPath,
}

trait Frontier {
    fn push(&mut self, node: StateWithHistory);
    fn pop(&mut self) -> Option<StateWithHistory>;
    fn len(&self) -> usize;
}

#[derive(Default)]
struct FifoFrontier {
    queue: VecDeque<StateWithHistory>,
}
impl Frontier for FifoFrontier {
    fn push(&mut self, node: StateWithHistory) {
        self.queue.push_back(node);
    }
    fn pop(&mut self) -> Option<StateWithHistory> {
        self.queue.pop_front()
    }
    fn len(&self) -> usize {
        self.queue.len()
    }
}

struct Prioritized {
    cost: usize,
    sequence: u64,
    node: StateWithHistory,
}
impl PartialEq for Prioritized {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.sequence == other.sequence
    }
}
impl Eq for Prioritized {}
impl PartialOrd for Prioritized {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}
impl Ord for Prioritized {
    // BinaryHeap is a max-heap: lowest cost first, then earliest pushed.
    fn cmp(&self, other: &Self) -> CmpOrdering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Default)]
struct PriorityFrontier {
    heap: BinaryHeap<Prioritized>,
    pushed: u64,
}
impl Frontier for PriorityFrontier {
    fn push(&mut self, node: StateWithHistory) {
        let cost = node.history.len() + heuristic(&node.state);
        self.heap.push(Prioritized {
            cost,
            sequence: self.pushed,
            node,
        });
        self.pushed += 1;
    }
    fn pop(&mut self) -> Option<StateWithHistory> {
        self.heap.pop().map(|p| p.node)
    }
    fn len(&self) -> usize {
        self.heap.len()
    }
}

fn explore<F: Frontier>(
    initial: &Configuration,
    options: &SolveOptions,
    strategy: SearchStrategy,
    mut frontier: F,
) -> SearchReport {
    let mut ledger = VisitedLedger::new(options.max_states);
    let mut explored = 0;
    let report = |outcome, explored, ledger: &VisitedLedger| SearchReport {
        outcome,
        strategy,
        states_explored: explored,
        states_seen: ledger.len(),
    };
    if ledger.mark(initial) == Mark::Full {
        return report(SearchOutcome::Aborted, explored, &ledger);
    }
    frontier.push(StateWithHistory {
        state: initial.clone(),
        history: vec![],
    });

    while let Some(current) = frontier.pop() {
        if options.is_cancelled() {
            debug!("{strategy} search cancelled after {explored} states");
            return report(SearchOutcome::Cancelled, explored, &ledger);
        }
        explored += 1;
        if current.state.satisfies(options.goal) {
            return report(SearchOutcome::Solved(current.history), explored, &ledger);
        }
        for (mv, next) in current.state.successors() {
            match ledger.mark(&next) {
                Mark::Seen => continue,
                Mark::Full => {
                    debug!("{strategy} search hit the cap of {} states", ledger.len());
                    return report(SearchOutcome::Aborted, explored, &ledger);
                }
                Mark::New => {}
            }
            let mut history = current.history.clone();
            history.push(mv);
            frontier.push(StateWithHistory {
                state: next,
                history,
            });
        }
        trace!("explored {explored}, frontier {}", frontier.len());
    }
    report(SearchOutcome::Unsolvable, explored, &ledger)
}

impl Configuration {
    /// True when the colors cannot be arranged one color per tube at all,
    /// whatever moves are made.
    fn fast_is_definitely_unsolvable(&self, goal: GoalRule) -> bool {
        let capacity = self.get_capacity();
        let mut tubes_needed = 0;
        for (_, count) in self.get_available_colors_with_count() {
            if goal == GoalRule::Complete && count % capacity != 0 {
                return true;
            }
            tubes_needed += count.div_ceil(capacity);
        }
        tubes_needed > self.tube_count()
    }
}

/// Runs one search with explicit options.
pub fn search(
    initial: &Configuration,
    strategy: SearchStrategy,
    options: &SolveOptions,
) -> SearchReport {
    debug!(
        "{strategy} search over {} tubes of capacity {}",
        initial.tube_count(),
        initial.get_capacity()
    );
    if initial.fast_is_definitely_unsolvable(options.goal) {
        debug!("Colors cannot fit one per tube, skipping search.");
        return SearchReport {
            outcome: SearchOutcome::Unsolvable,
            strategy,
            states_explored: 0,
            states_seen: 0,
        };
    }
    let report = match strategy {
        SearchStrategy::BreadthFirst => {
            explore(initial, options, strategy, FifoFrontier::default())
        }
        SearchStrategy::BestFirst => {
            explore(initial, options, strategy, PriorityFrontier::default())
        }
    };
    debug!(
        "{strategy} search finished: found={} explored={} seen={}",
        report.found(),
        report.states_explored,
        report.states_seen
    );
    report
}

/// Breadth-first search with default options. The returned path is move-count minimal.
pub fn solve(initial: &Configuration) -> Option<SearchPath> {
    search(initial, SearchStrategy::BreadthFirst, &SolveOptions::default()).into_path()
}

/// Best-first search with default options.
pub fn optimal_solve(initial: &Configuration) -> Option<SearchPath> {
    search(initial, SearchStrategy::BestFirst, &SolveOptions::default()).into_path()
}

/// Solves independent boards in parallel, keeping input order.
pub fn solve_batch(
    boards: &[Configuration],
    strategy: SearchStrategy,
    options: &SolveOptions,
) -> Vec<SearchReport> {
    boards
        .par_iter()
        .map(|board| search(board, strategy, options))
        .collect()
}

/// Runs both strategies on the same board at once: (breadth-first, best-first).
pub fn solve_both(initial: &Configuration, options: &SolveOptions) -> (SearchReport, SearchReport) {
    rayon::join(
        || search(initial, SearchStrategy::BreadthFirst, options),
        || search(initial, SearchStrategy::BestFirst, options),
    )
}

/// Checks that `moves` are all legal from `initial` and end on a board meeting `goal`.
///
/// # Errors
/// Returns the first illegal move.
pub fn verify_solution(
    initial: &Configuration,
    moves: &[Move],
    goal: GoalRule,
) -> Result<bool, IllegalMoveError> {
    Ok(initial.replay(moves)?.satisfies(goal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(text: &str) -> Configuration {
        text.parse().unwrap()
    }

    #[test]
    fn already_solved_board_needs_no_moves() {
        let state = board("AA BB ..");
        for strategy in [SearchStrategy::BreadthFirst, SearchStrategy::BestFirst] {
            let report = search(&state, strategy, &SolveOptions::default());
            assert_eq!(report.outcome, SearchOutcome::Solved(vec![]));
            assert_eq!(report.states_explored, 1);
        }
    }

    #[test]
    fn breadth_first_finds_two_move_solution() {
        let state = board("AB BA ..");
        let path = solve(&state).unwrap();
        assert_eq!(path, vec![Move::new(0, 2), Move::new(1, 0)]);
        assert!(verify_solution(&state, &path, GoalRule::Uniform).unwrap());
    }

    #[test]
    fn complete_goal_needs_full_tubes() {
        let state = board("AB BA ..");
        let options = SolveOptions::default().with_goal(GoalRule::Complete);
        let report = search(&state, SearchStrategy::BreadthFirst, &options);
        let path = report.moves().unwrap();
        assert_eq!(path.len(), 3);
        assert!(verify_solution(&state, path, GoalRule::Complete).unwrap());
    }

    #[test]
    fn stuck_board_is_unsolvable() {
        let state = board("AB BA");
        for strategy in [SearchStrategy::BreadthFirst, SearchStrategy::BestFirst] {
            let report = search(&state, strategy, &SolveOptions::default());
            assert_eq!(report.outcome, SearchOutcome::Unsolvable);
            assert!(!report.found());
        }
    }

    #[test]
    fn fast_check_skips_search_when_colors_cannot_fit() {
        // three colors, two tubes
        let state = Configuration::parse("AB C.", Some(2)).unwrap();
        let report = search(&state, SearchStrategy::BreadthFirst, &SolveOptions::default());
        assert_eq!(report.outcome, SearchOutcome::Unsolvable);
        assert_eq!(report.states_explored, 0);

        let partial = Configuration::parse("AA A. ..", Some(2)).unwrap();
        assert!(!partial.fast_is_definitely_unsolvable(GoalRule::Uniform));
        assert!(partial.fast_is_definitely_unsolvable(GoalRule::Complete));
    }

    #[test]
    fn state_cap_aborts() {
        let state = board("ABC CAB BCA ... ...");
        let options = SolveOptions::default().with_max_states(Some(3));
        let report = search(&state, SearchStrategy::BreadthFirst, &options);
        assert_eq!(report.outcome, SearchOutcome::Aborted);
        assert_eq!(report.states_seen, 3);
    }

    #[test]
    fn raised_cancel_flag_stops_search() {
        let state = board("AB BA ..");
        let flag = Arc::new(AtomicBool::new(true));
        let options = SolveOptions::default().with_cancel(flag);
        let report = search(&state, SearchStrategy::BestFirst, &options);
        assert_eq!(report.outcome, SearchOutcome::Cancelled);
        assert_eq!(report.states_explored, 0);
    }

    #[test]
    fn flag_raised_mid_search_stops_it() {
        // far too many states to finish before the flag goes up
        let state = board("ABCDEF BCDEFA CDEFAB DEFABC EFABCD FABCDE ...... ......");
        let flag = Arc::new(AtomicBool::new(false));
        let raiser = {
            let flag = Arc::clone(&flag);
            std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(20));
                flag.store(true, Ordering::Relaxed);
            })
        };
        let options = SolveOptions::default().with_cancel(Arc::clone(&flag));
        let report = search(&state, SearchStrategy::BreadthFirst, &options);
        raiser.join().unwrap();
        assert_eq!(report.outcome, SearchOutcome::Cancelled);
        assert!(report.states_seen >= report.states_explored);
    }

    #[test]
    fn priority_frontier_breaks_ties_in_push_order() {
        let mut frontier = PriorityFrontier::default();
        let solved = board("AA BB ..");
        for source in 0..3 {
            frontier.push(StateWithHistory {
                state: solved.clone(),
                history: vec![Move::new(source, 2)],
            });
        }
        frontier.push(StateWithHistory {
            state: solved,
            history: vec![],
        });
        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop())
            .map(|n| n.history.first().map_or(usize::MAX, |m| m.source))
            .collect();
        assert_eq!(order, vec![usize::MAX, 0, 1, 2]);
    }

    #[test]
    fn heuristic_is_zero_on_uniform_tubes() {
        assert_eq!(heuristic(&board("AA B. ..")), 0);
        assert_eq!(heuristic(&board("AB BA ..")), 2);
    }
}
