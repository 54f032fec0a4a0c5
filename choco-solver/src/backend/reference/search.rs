//! The depth-first generate-and-test search of the reference engine.
//!
//! The search keeps an explicit stack of decisions so that it can be resumed after reporting a
//! solution, which is what an enumeration through successive `solve` calls needs.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use log::debug;
use log::trace;

use super::model::ModelState;
use super::relation::Relation;
use super::relation::VarId;
use super::strategy::DecisionPlan;
use super::strategy::ValueSequence;
use crate::search::CriterionKind;
use crate::statistics::SearchStatistics;

/// The stopping criteria of one search call, combined with OR semantics.
#[derive(Clone, Debug)]
pub(super) struct ActiveCriteria {
    limits: Vec<(CriterionKind, i64)>,
    interrupt: Option<Arc<AtomicBool>>,
    started: Instant,
}

impl ActiveCriteria {
    pub(super) fn new(limits: Vec<(CriterionKind, i64)>) -> ActiveCriteria {
        ActiveCriteria {
            limits,
            interrupt: None,
            started: Instant::now(),
        }
    }

    /// Additionally stops as soon as `interrupt` is raised.
    pub(super) fn interruptible(mut self, interrupt: Arc<AtomicBool>) -> ActiveCriteria {
        self.interrupt = Some(interrupt);
        self
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn is_met(&self, statistics: &SearchStatistics) -> bool {
        if self
            .interrupt
            .as_ref()
            .is_some_and(|interrupt| interrupt.load(Ordering::Acquire))
        {
            trace!("search interrupted");
            return true;
        }
        self.limits.iter().any(|&(kind, limit)| {
            let limit = u64::try_from(limit).unwrap_or(0);
            let reached = match kind {
                CriterionKind::Time => self.elapsed().as_millis() >= u128::from(limit),
                CriterionKind::Solutions => statistics.solutions >= limit,
                CriterionKind::Nodes => statistics.nodes >= limit,
                CriterionKind::Fails => statistics.fails >= limit,
                CriterionKind::Restarts => statistics.restarts >= limit,
                CriterionKind::Backtracks => statistics.backtracks >= limit,
            };
            if reached {
                debug!("{kind} limit of {limit} reached");
            }
            reached
        })
    }
}

/// What one step of the search produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Step {
    Solution(Vec<i32>),
    Exhausted,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Bound {
    /// Every solution has to strictly improve on the bound, once there is one.
    Improve(Option<i64>),
    Equal(i64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Objective {
    var: VarId,
    maximize: bool,
    bound: Bound,
}

impl Objective {
    fn admits(&self, value: i64) -> bool {
        match self.bound {
            Bound::Improve(None) => true,
            Bound::Improve(Some(bound)) if self.maximize => value > bound,
            Bound::Improve(Some(bound)) => value < bound,
            Bound::Equal(bound) => value == bound,
        }
    }
}

#[derive(Debug)]
pub(super) struct Search {
    order: Vec<VarId>,
    values: Vec<ValueSequence>,
    relations: Vec<Relation>,
    /// The relations to check after the decision at each depth.
    checks: Vec<Vec<usize>>,
    /// The relations without variables, checked once before the first decision.
    unconditional: Vec<usize>,
    assignment: Vec<Option<i32>>,
    /// The position of the next value to try at each depth.
    cursor: Vec<u64>,
    depth: usize,
    root_checked: bool,
    at_solution: bool,
    exhausted: bool,
    objective: Option<Objective>,
    /// The revision of the model the search was built for.
    pub(super) revision: u64,
    pub(super) statistics: SearchStatistics,
}

impl Search {
    pub(super) fn new(model: &ModelState, plan: DecisionPlan, relations: Vec<Relation>) -> Search {
        let mut position = vec![usize::MAX; model.vars.len()];
        for (depth, &var) in plan.order.iter().enumerate() {
            position[var] = depth;
        }

        let mut checks = vec![Vec::new(); plan.order.len()];
        let mut unconditional = Vec::new();
        for (index, relation) in relations.iter().enumerate() {
            let mut depths = relation
                .scope()
                .into_iter()
                .filter_map(|var| position.get(var).copied())
                .filter(|&depth| depth < checks.len())
                .collect::<Vec<_>>();
            depths.sort_unstable();
            depths.dedup();
            if depths.is_empty() {
                unconditional.push(index);
            }
            for depth in depths {
                checks[depth].push(index);
            }
        }

        Search {
            cursor: vec![0; plan.order.len()],
            assignment: vec![None; model.vars.len()],
            order: plan.order,
            values: plan.values,
            relations,
            checks,
            unconditional,
            depth: 0,
            root_checked: false,
            at_solution: false,
            exhausted: false,
            objective: None,
            revision: model.revision,
            statistics: SearchStatistics::default(),
        }
    }

    /// Restricts the search to solutions improving on every solution found so far.
    fn minimizing_or_maximizing(mut self, var: VarId, maximize: bool) -> Search {
        self.objective = Some(Objective {
            var,
            maximize,
            bound: Bound::Improve(None),
        });
        self
    }

    /// Restricts the search to solutions whose objective equals `value`.
    fn with_objective_value(mut self, var: VarId, maximize: bool, value: i64) -> Search {
        self.objective = Some(Objective {
            var,
            maximize,
            bound: Bound::Equal(value),
        });
        self
    }

    fn tighten(&mut self, value: i64) {
        if let Some(objective) = self.objective.as_mut() {
            objective.bound = Bound::Improve(Some(value));
        }
    }

    fn objective_value(&self, solution: &[i32]) -> Option<i64> {
        self.objective
            .and_then(|objective| solution.get(objective.var))
            .map(|&value| i64::from(value))
    }

    /// Runs the search up to the next solution, the end of the search space, or a met criterion.
    pub(super) fn next(&mut self, criteria: &ActiveCriteria) -> Step {
        let started = Instant::now();
        let step = self.advance(criteria);
        self.statistics.time += started.elapsed();
        step
    }

    fn advance(&mut self, criteria: &ActiveCriteria) -> Step {
        if self.exhausted {
            return Step::Exhausted;
        }
        if self.at_solution {
            self.at_solution = false;
            if !self.backtrack() {
                self.exhausted = true;
                return Step::Exhausted;
            }
        } else if !self.root_checked {
            self.root_checked = true;
            let root_holds = self
                .unconditional
                .iter()
                .all(|&index| self.relations[index].evaluate(&self.assignment) != Some(false));
            if !root_holds {
                self.statistics.fails += 1;
                self.exhausted = true;
                return Step::Exhausted;
            }
        }

        loop {
            if criteria.is_met(&self.statistics) {
                return Step::Stopped;
            }
            if self.depth == self.order.len() {
                self.at_solution = true;
                self.statistics.solutions += 1;
                let solution = self
                    .assignment
                    .iter()
                    .map(|value| value.unwrap_or_default())
                    .collect();
                return Step::Solution(solution);
            }

            let depth = self.depth;
            let Some(value) = self.values[depth].get(self.cursor[depth]) else {
                if !self.backtrack() {
                    self.exhausted = true;
                    return Step::Exhausted;
                }
                continue;
            };
            self.cursor[depth] += 1;
            self.statistics.nodes += 1;

            let var = self.order[depth];
            self.assignment[var] = Some(value);
            if self.consistent(depth, var, value) {
                self.depth += 1;
                if let Some(next) = self.cursor.get_mut(self.depth) {
                    *next = 0;
                }
            } else {
                self.statistics.fails += 1;
                self.assignment[var] = None;
            }
        }
    }

    fn consistent(&self, depth: usize, var: VarId, value: i32) -> bool {
        if let Some(objective) = self.objective {
            if objective.var == var && !objective.admits(i64::from(value)) {
                return false;
            }
        }
        self.checks[depth]
            .iter()
            .all(|&index| self.relations[index].evaluate(&self.assignment) != Some(false))
    }

    /// Abandons the decision below the current depth; false if there is none left.
    fn backtrack(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        self.depth -= 1;
        self.assignment[self.order[self.depth]] = None;
        self.statistics.backtracks += 1;
        true
    }
}

fn fresh_search(model: &ModelState) -> Search {
    let relations = model.active_relations();
    let plan = super::strategy::plan(model, model.solver.strategy.as_ref(), &relations);
    Search::new(model, plan, relations)
}

/// Advances the enumeration of the model by one solution.
pub(super) fn solve(model: &mut ModelState, criteria: &ActiveCriteria) -> bool {
    let mut search = match model.solver.enumeration.take() {
        Some(search) if search.revision == model.revision => search,
        _ => fresh_search(model),
    };
    let step = search.next(criteria);
    model.solver.last_statistics = search.statistics;
    match step {
        Step::Solution(solution) => {
            model.solver.instantiation = Some(solution);
            model.solver.enumeration = Some(search);
            true
        }
        Step::Exhausted | Step::Stopped => {
            model.solver.instantiation = None;
            false
        }
    }
}

pub(super) fn find_solution(model: &mut ModelState, criteria: &ActiveCriteria) -> Option<Vec<i32>> {
    model.touch();
    let mut search = fresh_search(model);
    let step = search.next(criteria);
    model.solver.last_statistics = search.statistics;
    match step {
        Step::Solution(solution) => Some(solution),
        Step::Exhausted | Step::Stopped => None,
    }
}

pub(super) fn find_all_solutions(
    model: &mut ModelState,
    criteria: &ActiveCriteria,
) -> Vec<Vec<i32>> {
    model.touch();
    let mut search = fresh_search(model);
    let solutions = enumerate(&mut search, criteria);
    model.solver.last_statistics = search.statistics;
    solutions
}

fn enumerate(search: &mut Search, criteria: &ActiveCriteria) -> Vec<Vec<i32>> {
    let mut solutions = Vec::new();
    while let Step::Solution(solution) = search.next(criteria) {
        solutions.push(solution);
    }
    solutions
}

/// Branch and bound: returns the best solution found and whether the search space was exhausted,
/// which proves it optimal.
fn optimize(search: &mut Search, criteria: &ActiveCriteria) -> (Option<Vec<i32>>, bool) {
    let mut best = None;
    loop {
        match search.next(criteria) {
            Step::Solution(solution) => {
                if let Some(value) = search.objective_value(&solution) {
                    debug!("found a solution with objective {value}");
                    search.tighten(value);
                }
                best = Some(solution);
            }
            Step::Exhausted => return (best, true),
            Step::Stopped => return (best, false),
        }
    }
}

pub(super) fn find_optimal_solution(
    model: &mut ModelState,
    objective: VarId,
    maximize: bool,
    criteria: &ActiveCriteria,
) -> Option<Vec<i32>> {
    model.touch();
    let mut search = fresh_search(model).minimizing_or_maximizing(objective, maximize);
    let (best, _) = optimize(&mut search, criteria);
    model.solver.last_statistics = search.statistics;
    best
}

/// Proves the optimum first, then enumerates every solution reaching it. When stopped before the
/// optimum is proven, only the best solution found is returned.
pub(super) fn find_all_optimal_solutions(
    model: &mut ModelState,
    objective: VarId,
    maximize: bool,
    criteria: &ActiveCriteria,
) -> Vec<Vec<i32>> {
    model.touch();
    let mut search = fresh_search(model).minimizing_or_maximizing(objective, maximize);
    let (best, proven) = optimize(&mut search, criteria);
    let Some(optimum) = best
        .as_ref()
        .and_then(|solution| search.objective_value(solution))
    else {
        model.solver.last_statistics = search.statistics;
        return best.into_iter().collect();
    };
    if !proven {
        model.solver.last_statistics = search.statistics;
        return best.into_iter().collect();
    }

    let mut second = fresh_search(model).with_objective_value(objective, maximize, optimum);
    second.statistics = search.statistics;
    second.statistics.solutions = 0;
    let solutions = enumerate(&mut second, criteria);
    second.statistics.solutions += search.statistics.solutions;
    model.solver.last_statistics = second.statistics;
    solutions
}

#[cfg(test)]
mod tests {
    use super::find_all_optimal_solutions;
    use super::find_all_solutions;
    use super::find_optimal_solution;
    use super::find_solution;
    use super::solve;
    use super::ActiveCriteria;
    use crate::backend::reference::model::ConstraintStatus;
    use crate::backend::reference::model::ModelState;
    use crate::backend::reference::relation::Relation;
    use crate::backend::reference::relation::Term;
    use crate::constraints::Operator;
    use crate::search::CriterionKind;

    fn permutations(n: usize, domain: i32) -> ModelState {
        let mut model = ModelState::new("m".to_owned());
        let vars = (0..n)
            .map(|_| model.add_var(None, 0, domain - 1, false))
            .collect::<Vec<_>>();
        let c = model.add_constraint("ALLDIFFERENT", Relation::AllDifferent(vars));
        model.constraints[c].status = ConstraintStatus::Posted;
        model
    }

    fn unlimited() -> ActiveCriteria {
        ActiveCriteria::new(Vec::new())
    }

    #[test]
    fn enumerates_every_permutation() {
        let mut model = permutations(3, 3);
        let solutions = find_all_solutions(&mut model, &unlimited());
        assert_eq!(solutions.len(), 6);
        assert_eq!(solutions[0], vec![0, 1, 2]);
        assert_eq!(model.solver.last_statistics.solutions, 6);
    }

    #[test]
    fn pigeonhole_has_no_solution() {
        let mut model = permutations(3, 2);
        assert_eq!(find_solution(&mut model, &unlimited()), None);
        assert!(model.solver.last_statistics.fails > 0);
    }

    #[test]
    fn solve_resumes_where_it_stopped() {
        let mut model = permutations(3, 3);
        let mut count = 0;
        while solve(&mut model, &unlimited()) {
            count += 1;
            assert!(model.solver.instantiation.is_some());
        }
        assert_eq!(count, 6);
        assert!(model.solver.instantiation.is_none());
        assert!(model.solver.enumeration.is_none());
    }

    #[test]
    fn node_limit_stops_the_search() {
        let mut model = permutations(4, 4);
        let criteria = ActiveCriteria::new(vec![(CriterionKind::Nodes, 5)]);
        let solutions = find_all_solutions(&mut model, &criteria);
        assert!(solutions.len() < 24);
        assert_eq!(model.solver.last_statistics.nodes, 5);
    }

    #[test]
    fn empty_model_has_one_trivial_solution() {
        let mut model = ModelState::new("m".to_owned());
        assert_eq!(find_all_solutions(&mut model, &unlimited()), vec![Vec::<i32>::new()]);
    }

    #[test]
    fn branch_and_bound_finds_the_optimum() {
        // x + y = z, x != y, maximise z
        let mut model = ModelState::new("m".to_owned());
        let x = model.add_var(None, 0, 3, false);
        let y = model.add_var(None, 0, 3, false);
        let z = model.add_var(None, 0, 10, false);
        for relation in [
            Relation::Arithm3 {
                x: Term::Var(x),
                op1: Operator::Plus,
                y: Term::Var(y),
                op2: Operator::Eq,
                z: Term::Var(z),
            },
            Relation::Compare {
                x: Term::Var(x),
                op: Operator::Ne,
                y: Term::Var(y),
            },
        ] {
            let c = model.add_constraint("ARITHM", relation);
            model.constraints[c].status = ConstraintStatus::Posted;
        }

        let best = find_optimal_solution(&mut model, z, true, &unlimited());
        assert_eq!(best.map(|solution| solution[z]), Some(5));

        let optima = find_all_optimal_solutions(&mut model, z, true, &unlimited());
        assert_eq!(optima.len(), 2);
        assert!(optima.iter().all(|solution| solution[z] == 5));
    }
}
