#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use std::collections::BTreeSet;
use std::time::Duration;
use std::time::Instant;

use choco_solver::prelude::*;
use helpers::knapsack;
use helpers::pigeons;
use helpers::values;

#[test]
fn all_different_over_three_values_has_six_permutations() {
    let runtime = Runtime::reference();
    let (model, vars) = pigeons(&runtime, 3);
    let mut solver = model.solver().unwrap();

    let solutions = solver
        .find_all_solutions(&SearchLimits::default())
        .unwrap();
    let found = solutions
        .iter()
        .map(|solution| values(solution, &vars))
        .collect::<BTreeSet<_>>();

    assert_eq!(solutions.len(), 6);
    assert_eq!(found.len(), 6);
    for permutation in &found {
        let mut sorted = permutation.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }
}

#[test]
fn three_pigeons_do_not_fit_in_two_holes() {
    let runtime = Runtime::reference();
    let (model, _vars) = pigeons(&runtime, 2);
    let mut solver = model.solver().unwrap();

    assert!(solver
        .find_solution(&SearchLimits::default())
        .unwrap()
        .is_none());
    assert!(!solver.solve(&SearchLimits::default()).unwrap());
    assert!(solver
        .find_all_solutions(&SearchLimits::default())
        .unwrap()
        .is_empty());
}

#[test]
fn solve_enumerates_what_find_all_solutions_finds() {
    let runtime = Runtime::reference();
    let (model, vars) = pigeons(&runtime, 4);
    let mut solver = model.solver().unwrap();

    let mut enumerated = Vec::new();
    while solver.solve(&SearchLimits::default()).unwrap() {
        enumerated.push(
            vars.iter()
                .map(|var| var.value().unwrap())
                .collect::<Vec<_>>(),
        );
    }

    let all = solver
        .find_all_solutions(&SearchLimits::default())
        .unwrap()
        .iter()
        .map(|solution| values(solution, &vars))
        .collect::<Vec<_>>();
    assert_eq!(enumerated.len(), 24);
    assert_eq!(enumerated, all);
}

#[test]
fn solution_limit_bounds_the_enumeration() {
    let runtime = Runtime::reference();
    let (model, _vars) = pigeons(&runtime, 3);
    let mut solver = model.solver().unwrap();

    for limit in 1..=6 {
        let solutions = solver
            .find_all_solutions(&SearchLimits::default().with_solution_limit(limit))
            .unwrap();
        assert_eq!(solutions.len() as u64, limit);
    }
}

#[test]
fn the_first_limit_reached_stops_the_search() {
    let runtime = Runtime::reference();
    let (model, _vars) = pigeons(&runtime, 5);
    let mut solver = model.solver().unwrap();

    let limits = SearchLimits::default()
        .with_solution_limit(50)
        .with_node_limit(10)
        .with_time_limit(Duration::from_secs(60));
    let solutions = solver.find_all_solutions(&limits).unwrap();
    let statistics = solver.search_statistics().unwrap();

    assert!(statistics.nodes <= 10);
    assert!(solutions.len() < 50);
}

/// `pigeons` variables over `pigeons - 1` values which all have to differ.
fn crowded_pigeonhole(runtime: &Runtime, pigeons: usize) -> Model {
    let model = runtime.create_model(Some("crowded")).unwrap();
    let holes = pigeons as i32 - 1;
    let vars = model.intvars(pigeons, 0, holes - 1).unwrap();
    model.all_different(&vars).unwrap().post().unwrap();
    model
}

#[test]
fn a_fail_limit_stops_the_enumeration() {
    let runtime = Runtime::reference();
    let (model, _vars) = pigeons(&runtime, 4);
    let mut solver = model.solver().unwrap();
    let unlimited = solver
        .find_all_solutions(&SearchLimits::default())
        .unwrap()
        .len();
    assert_eq!(unlimited, 24);

    let solutions = solver
        .find_all_solutions(&SearchLimits::default().with_fail_limit(3))
        .unwrap();
    let statistics = solver.search_statistics().unwrap();
    assert!(statistics.fails <= 3);
    assert!(solutions.len() < unlimited);
}

#[test]
fn a_backtrack_limit_stops_the_enumeration() {
    let runtime = Runtime::reference();
    let (model, _vars) = pigeons(&runtime, 4);
    let mut solver = model.solver().unwrap();

    let solutions = solver
        .find_all_solutions(&SearchLimits::default().with_backtrack_limit(3))
        .unwrap();
    let statistics = solver.search_statistics().unwrap();
    assert!(statistics.backtracks <= 3);
    assert!(solutions.len() < 24);
}

#[test]
fn a_restart_limit_does_not_cut_a_search_without_restarts() {
    let runtime = Runtime::reference();
    let (model, _vars) = pigeons(&runtime, 4);
    let mut solver = model.solver().unwrap();

    let solutions = solver
        .find_all_solutions(&SearchLimits::default().with_restart_limit(1))
        .unwrap();
    assert_eq!(solutions.len(), 24);
    assert_eq!(solver.search_statistics().unwrap().restarts, 0);
}

#[test]
fn a_time_limit_stops_a_hopeless_search() {
    let runtime = Runtime::reference();
    let model = crowded_pigeonhole(&runtime, 12);
    let mut solver = model.solver().unwrap();

    let started = Instant::now();
    let limits = SearchLimits::default()
        .with_time_limit(Duration::from_millis(100));
    assert!(solver.find_solution(&limits).unwrap().is_none());
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(solver.search_statistics().unwrap().solutions, 0);
}

#[test]
fn limits_combine_with_or_semantics() {
    let runtime = Runtime::reference();
    let (model, _vars) = pigeons(&runtime, 4);
    let mut solver = model.solver().unwrap();

    let limits = SearchLimits::default()
        .with_fail_limit(1_000)
        .with_backtrack_limit(1_000)
        .with_solution_limit(2);
    let solutions = solver.find_all_solutions(&limits).unwrap();
    assert_eq!(solutions.len(), 2);

    let limits = SearchLimits::default()
        .with_solution_limit(1_000)
        .with_fail_limit(1);
    let solutions = solver.find_all_solutions(&limits).unwrap();
    assert!(solutions.is_empty());
    assert_eq!(solver.search_statistics().unwrap().fails, 1);
}

#[test]
fn full_range_domains_are_searched_lazily() {
    let runtime = Runtime::reference();
    let model = runtime.create_model(None).unwrap();
    let x = model.intvar(i32::MIN, i32::MAX).unwrap();
    let y = model.intvar(0, 100_000_000).unwrap();
    model.arithm(&x, Operator::Gt, &y).unwrap().post().unwrap();
    let mut solver = model.solver().unwrap();

    let solution = solver
        .find_solution(&SearchLimits::default().with_node_limit(1_000))
        .unwrap();
    assert!(solution.is_none());

    solver
        .set_search(SearchStrategy::InputOrderUb, &[&x, &y])
        .unwrap();
    let solution = solver
        .find_solution(&SearchLimits::default())
        .unwrap()
        .unwrap();
    assert_eq!(values(&solution, &[x, y]), vec![i32::MAX, 100_000_000]);
}

#[test]
fn an_unlimited_optimisation_finds_the_optimum() {
    let runtime = Runtime::reference();
    let (model, take, value) = knapsack(&runtime);
    let mut solver = model.solver().unwrap();

    let best = solver
        .find_optimal_solution(&value, Direction::Maximise, &SearchLimits::default())
        .unwrap()
        .unwrap();
    assert_eq!(best.int_value(&value).unwrap(), 15);
    let selected = values(&best, &take);
    assert!(selected == vec![1, 0, 0, 1] || selected == vec![0, 1, 1, 0]);
}

#[test]
fn widening_limits_never_worsens_the_objective() {
    let runtime = Runtime::reference();
    let (model, _take, value) = knapsack(&runtime);
    let mut solver = model.solver().unwrap();

    let mut previous = i32::MIN;
    for nodes in [5, 20, 80, 320, 1280, 100_000] {
        let limits = SearchLimits::default().with_node_limit(nodes);
        if let Some(solution) = solver
            .find_optimal_solution(&value, Direction::Maximise, &limits)
            .unwrap()
        {
            let objective = solution.int_value(&value).unwrap();
            assert!(objective >= previous);
            previous = objective;
        }
    }
    assert_eq!(previous, 15);
}

#[test]
fn every_optimal_solution_is_reported() {
    let runtime = Runtime::reference();
    let (model, take, value) = knapsack(&runtime);
    let mut solver = model.solver().unwrap();

    let optima = solver
        .find_all_optimal_solutions(&value, Direction::Maximise, &SearchLimits::default())
        .unwrap();
    assert_eq!(optima.len(), 2);
    for solution in &optima {
        assert_eq!(solution.int_value(&value).unwrap(), 15);
    }
    let selections = optima
        .iter()
        .map(|solution| values(solution, &take))
        .collect::<BTreeSet<_>>();
    assert_eq!(
        selections,
        BTreeSet::from([vec![0, 1, 1, 0], vec![1, 0, 0, 1]])
    );
}

#[test]
fn minimisation_finds_the_smallest_value() {
    let runtime = Runtime::reference();
    let model = runtime.create_model(None).unwrap();
    let x = model.intvar(-5, 5).unwrap();
    let y = model.intvar(-5, 5).unwrap();
    model
        .arithm3(&x, Operator::Plus, &y, Operator::Eq, 3)
        .unwrap()
        .post()
        .unwrap();
    let mut solver = model.solver().unwrap();

    let best = solver
        .find_optimal_solution(&x, Direction::Minimise, &SearchLimits::default())
        .unwrap()
        .unwrap();
    assert_eq!(best.int_value(&x).unwrap(), -2);
    assert_eq!(best.int_value(&y).unwrap(), 5);
}

#[test]
fn a_model_without_variables_has_one_trivial_solution() {
    let runtime = Runtime::reference();
    let model = runtime.create_model(None).unwrap();
    let mut solver = model.solver().unwrap();

    assert!(solver
        .find_solution(&SearchLimits::default())
        .unwrap()
        .is_some());
    assert_eq!(
        solver
            .find_all_solutions(&SearchLimits::default())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn strategies_decide_the_enumeration_order() {
    let runtime = Runtime::reference();
    let (model, vars) = pigeons(&runtime, 3);
    let mut solver = model.solver().unwrap();
    solver
        .set_search(SearchStrategy::InputOrderUb, &vars)
        .unwrap();

    let first = solver
        .find_solution(&SearchLimits::default())
        .unwrap()
        .unwrap();
    assert_eq!(values(&first, &vars), vec![2, 1, 0]);

    solver
        .set_search(SearchStrategy::Random { seed: 42 }, &vars)
        .unwrap();
    let shuffled = solver
        .find_all_solutions(&SearchLimits::default())
        .unwrap();
    assert_eq!(shuffled.len(), 6);
}

#[test]
fn statistics_output_does_not_change_the_result() {
    let runtime = Runtime::reference();
    let (model, _vars) = pigeons(&runtime, 3);
    let mut solver = model.solver().unwrap();
    solver.show_statistics().unwrap();
    assert_eq!(
        solver
            .find_all_solutions(&SearchLimits::default())
            .unwrap()
            .len(),
        6
    );
    solver.show_short_statistics().unwrap();
    assert!(solver.solve(&SearchLimits::default()).unwrap());

    let statistics = solver.search_statistics().unwrap();
    assert!(statistics.solutions >= 1);
}
