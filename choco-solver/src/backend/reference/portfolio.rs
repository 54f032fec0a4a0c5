//! A race of several models on scoped threads.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use log::debug;

use super::search::ActiveCriteria;
use super::search::Search;
use super::search::Step;
use super::store::lock;
use super::store::SharedModel;
use super::strategy;
use super::strategy::StrategyState;

#[derive(Debug)]
pub(super) struct Worker {
    pub(super) model: SharedModel,
    pub(super) reliable: bool,
}

#[derive(Debug, Default)]
pub(super) struct PortfolioState {
    pub(super) search_auto_conf: bool,
    pub(super) steal_nogoods: bool,
    pub(super) workers: Vec<Worker>,
    /// The model which found the solution of the last race, and that solution.
    pub(super) best: Option<(SharedModel, Vec<i32>)>,
    pub(super) raced: bool,
}

impl PortfolioState {
    pub(super) fn new(search_auto_conf: bool) -> PortfolioState {
        PortfolioState {
            search_auto_conf,
            ..PortfolioState::default()
        }
    }

    /// Registers a model; registering the same model twice has no effect.
    pub(super) fn add(&mut self, model: SharedModel, reliable: bool) {
        if let Some(worker) = self
            .workers
            .iter_mut()
            .find(|worker| Arc::ptr_eq(&worker.model, &model))
        {
            debug!("model already part of the portfolio");
            worker.reliable |= reliable;
            return;
        }
        self.workers.push(Worker { model, reliable });
    }

    /// Runs one search per model in parallel, returning whether a solution was found.
    ///
    /// The first worker to find a solution wins and interrupts the others; so does a reliable
    /// worker which exhausts its search space, since that proves the absence of a solution.
    pub(super) fn race(&mut self) -> bool {
        self.raced = true;
        let interrupt = Arc::new(AtomicBool::new(false));
        let winner: Mutex<Option<(usize, Vec<i32>)>> = Mutex::new(None);

        thread::scope(|scope| {
            for (index, worker) in self.workers.iter().enumerate() {
                let interrupt = Arc::clone(&interrupt);
                let winner = &winner;
                let search_auto_conf = self.search_auto_conf;
                let _ = scope.spawn(move || {
                    let mut model = lock(&worker.model);
                    let relations = model.active_relations();
                    let diversified = search_auto_conf
                        .then(|| strategy::diversified(index))
                        .flatten()
                        .map(|strategy| StrategyState {
                            strategy,
                            vars: (0..model.vars.len()).collect(),
                        });
                    let strategy = diversified.as_ref().or(model.solver.strategy.as_ref());
                    let plan = strategy::plan(&model, strategy, &relations);
                    let mut search = Search::new(&model, plan, relations);
                    model.touch();

                    let criteria =
                        ActiveCriteria::new(Vec::new()).interruptible(Arc::clone(&interrupt));
                    let step = search.next(&criteria);
                    model.solver.last_statistics = search.statistics;
                    match step {
                        Step::Solution(solution) => {
                            let mut winner = lock(winner);
                            if winner.is_none() {
                                debug!("portfolio worker {index} found a solution first");
                                model.solver.instantiation = Some(solution.clone());
                                *winner = Some((index, solution));
                                interrupt.store(true, Ordering::Release);
                            }
                        }
                        Step::Exhausted if worker.reliable => {
                            debug!("portfolio worker {index} proved the absence of solutions");
                            interrupt.store(true, Ordering::Release);
                        }
                        Step::Exhausted | Step::Stopped => {}
                    }
                });
            }
        });

        let winner = winner.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.best = winner.and_then(|(index, solution)| {
            self.workers
                .get(index)
                .map(|worker| (Arc::clone(&worker.model), solution))
        });
        self.best.is_some()
    }
}
