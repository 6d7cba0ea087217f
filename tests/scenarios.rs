use water_sort::{
    Configuration, GoalRule, Move, SearchOutcome, SearchStrategy, SolveOptions, optimal_solve,
    search, solve, solve_both, verify_solution,
};

const STRATEGIES: [SearchStrategy; 2] = [SearchStrategy::BreadthFirst, SearchStrategy::BestFirst];

fn board(tubes: &[&[usize]], capacity: usize) -> Configuration {
    Configuration::new(tubes.iter().map(|t| t.to_vec()).collect(), capacity).unwrap()
}

#[test]
fn sorted_tubes_with_spare_are_already_solved() {
    let state = board(&[&[0, 0], &[1, 1], &[]], 2);
    assert_eq!(solve(&state), Some(vec![]));
    assert_eq!(optimal_solve(&state), Some(vec![]));
}

#[test]
fn swapped_pairs_solve_in_two_moves() {
    let state = board(&[&[0, 1], &[1, 0], &[]], 2);
    for strategy in STRATEGIES {
        let report = search(&state, strategy, &SolveOptions::default());
        assert!(report.found(), "{strategy} found nothing");
        let moves = report.moves().unwrap();
        assert!(moves.len() <= 2);
        assert!(verify_solution(&state, moves, GoalRule::Uniform).unwrap());
    }
}

#[test]
fn single_full_tube_is_solved() {
    let state = board(&[&[0, 0, 0]], 3);
    for strategy in STRATEGIES {
        let report = search(&state, strategy, &SolveOptions::default());
        assert_eq!(report.outcome, SearchOutcome::Solved(vec![]));
    }
}

#[test]
fn interleaved_tubes_without_space_have_no_solution() {
    let state = board(&[&[0, 1], &[1, 0]], 2);
    assert!(state.legal_moves().is_empty());
    for strategy in STRATEGIES {
        let report = search(&state, strategy, &SolveOptions::default());
        assert!(!report.found());
        assert_eq!(report.outcome, SearchOutcome::Unsolvable);
    }
}

#[test]
fn both_strategies_agree_on_a_larger_board() {
    let state: Configuration = "ABCA BCAB CABC ... ...".parse().unwrap();
    let (breadth, best) = solve_both(&state, &SolveOptions::default());
    assert!(breadth.found());
    assert!(best.found());
    let shortest = breadth.moves().unwrap().len();
    assert!(shortest <= best.moves().unwrap().len());
    for report in [&breadth, &best] {
        assert!(verify_solution(&state, report.moves().unwrap(), GoalRule::Uniform).unwrap());
    }
}

#[test]
fn solution_replays_as_index_pairs() {
    let state = board(&[&[0, 1], &[1, 0], &[]], 2);
    let pairs: Vec<(usize, usize)> = solve(&state).unwrap().iter().map(Move::as_pair).collect();
    let replayed: Vec<Move> = pairs.into_iter().map(Move::from).collect();
    assert!(state.replay(&replayed).unwrap().is_solved());
}
