//! Shared fixtures of the integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::ffi::CStr;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use choco_solver::backend::ArrayKind;
use choco_solver::backend::Backend;
use choco_solver::backend::BackendResult;
use choco_solver::backend::ConstraintCall;
use choco_solver::backend::ReferenceBackend;
use choco_solver::prelude::*;
use choco_solver::runtime::NativeHandle;
use choco_solver::search::CriterionKind;
use choco_solver::statistics::SearchStatistics;
use fnv::FnvHashMap;

/// A backend which forwards to a [`ReferenceBackend`] while recording every release and every
/// search invocation.
#[derive(Clone, Debug, Default)]
pub(crate) struct CountingBackend {
    pub(crate) inner: ReferenceBackend,
    releases: Arc<Mutex<FnvHashMap<NativeHandle, usize>>>,
    searches: Arc<AtomicUsize>,
    cleanups: Arc<AtomicUsize>,
}

impl CountingBackend {
    /// How often each handle has been released.
    pub(crate) fn releases(&self) -> FnvHashMap<NativeHandle, usize> {
        self.releases.lock().unwrap().clone()
    }

    pub(crate) fn total_releases(&self) -> usize {
        self.releases.lock().unwrap().values().sum()
    }

    pub(crate) fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub(crate) fn cleanups(&self) -> usize {
        self.cleanups.load(Ordering::SeqCst)
    }

    fn searched(&self) {
        let _ = self.searches.fetch_add(1, Ordering::SeqCst);
    }
}

impl Backend for CountingBackend {
    fn init(&self) {
        self.inner.init();
    }

    fn cleanup(&self) {
        let _ = self.cleanups.fetch_add(1, Ordering::SeqCst);
        self.inner.cleanup();
    }

    fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    fn destroy_handle(&self, handle: NativeHandle) {
        *self.releases.lock().unwrap().entry(handle).or_insert(0) += 1;
        self.inner.destroy_handle(handle);
    }

    fn create_model(&self, name: Option<&CStr>) -> BackendResult<NativeHandle> {
        self.inner.create_model(name)
    }

    fn model_name(&self, model: NativeHandle) -> BackendResult<String> {
        self.inner.model_name(model)
    }

    fn solver(&self, model: NativeHandle) -> BackendResult<NativeHandle> {
        self.inner.solver(model)
    }

    fn int_var(
        &self,
        model: NativeHandle,
        name: Option<&CStr>,
        lb: i32,
        ub: i32,
    ) -> BackendResult<NativeHandle> {
        self.inner.int_var(model, name, lb, ub)
    }

    fn bool_var(
        &self,
        model: NativeHandle,
        name: Option<&CStr>,
        value: Option<bool>,
    ) -> BackendResult<NativeHandle> {
        self.inner.bool_var(model, name, value)
    }

    fn variable_name(&self, var: NativeHandle) -> BackendResult<String> {
        self.inner.variable_name(var)
    }

    fn is_instantiated(&self, var: NativeHandle) -> BackendResult<bool> {
        self.inner.is_instantiated(var)
    }

    fn int_var_lb(&self, var: NativeHandle) -> BackendResult<i32> {
        self.inner.int_var_lb(var)
    }

    fn int_var_ub(&self, var: NativeHandle) -> BackendResult<i32> {
        self.inner.int_var_ub(var)
    }

    fn int_var_value(&self, var: NativeHandle) -> BackendResult<i32> {
        self.inner.int_var_value(var)
    }

    fn constraint(
        &self,
        model: NativeHandle,
        call: &ConstraintCall,
    ) -> BackendResult<NativeHandle> {
        self.inner.constraint(model, call)
    }

    fn constraint_name(&self, constraint: NativeHandle) -> BackendResult<String> {
        self.inner.constraint_name(constraint)
    }

    fn post(&self, constraint: NativeHandle) -> BackendResult<()> {
        self.inner.post(constraint)
    }

    fn reify(&self, constraint: NativeHandle) -> BackendResult<NativeHandle> {
        self.inner.reify(constraint)
    }

    fn is_satisfied(&self, constraint: NativeHandle) -> BackendResult<i32> {
        self.inner.is_satisfied(constraint)
    }

    fn create_array(&self, kind: ArrayKind, len: usize) -> BackendResult<NativeHandle> {
        self.inner.create_array(kind, len)
    }

    fn array_set(
        &self,
        kind: ArrayKind,
        array: NativeHandle,
        index: usize,
        element: NativeHandle,
    ) -> BackendResult<()> {
        self.inner.array_set(kind, array, index, element)
    }

    fn int_array_set(&self, array: NativeHandle, index: usize, value: i32) -> BackendResult<()> {
        self.inner.int_array_set(array, index, value)
    }

    fn array_length(&self, kind: ArrayKind, array: NativeHandle) -> BackendResult<usize> {
        self.inner.array_length(kind, array)
    }

    fn criterion(
        &self,
        kind: CriterionKind,
        owner: NativeHandle,
        limit: i64,
    ) -> BackendResult<NativeHandle> {
        self.inner.criterion(kind, owner, limit)
    }

    fn solve(&self, solver: NativeHandle, criteria: NativeHandle) -> BackendResult<bool> {
        self.searched();
        self.inner.solve(solver, criteria)
    }

    fn find_solution(
        &self,
        solver: NativeHandle,
        criteria: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        self.searched();
        self.inner.find_solution(solver, criteria)
    }

    fn find_all_solutions(
        &self,
        solver: NativeHandle,
        criteria: NativeHandle,
    ) -> BackendResult<NativeHandle> {
        self.searched();
        self.inner.find_all_solutions(solver, criteria)
    }

    fn find_optimal_solution(
        &self,
        solver: NativeHandle,
        objective: NativeHandle,
        maximize: bool,
        criteria: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        self.searched();
        self.inner
            .find_optimal_solution(solver, objective, maximize, criteria)
    }

    fn find_all_optimal_solutions(
        &self,
        solver: NativeHandle,
        objective: NativeHandle,
        maximize: bool,
        criteria: NativeHandle,
    ) -> BackendResult<NativeHandle> {
        self.searched();
        self.inner
            .find_all_optimal_solutions(solver, objective, maximize, criteria)
    }

    fn list_size(&self, list: NativeHandle) -> BackendResult<usize> {
        self.inner.list_size(list)
    }

    fn list_solution(&self, list: NativeHandle, index: usize) -> BackendResult<NativeHandle> {
        self.inner.list_solution(list, index)
    }

    fn solution_int_value(
        &self,
        solution: NativeHandle,
        var: NativeHandle,
    ) -> BackendResult<i32> {
        self.inner.solution_int_value(solution, var)
    }

    fn show_statistics(&self, solver: NativeHandle) -> BackendResult<()> {
        self.inner.show_statistics(solver)
    }

    fn show_short_statistics(&self, solver: NativeHandle) -> BackendResult<()> {
        self.inner.show_short_statistics(solver)
    }

    fn set_search(
        &self,
        solver: NativeHandle,
        strategy: SearchStrategy,
        vars: NativeHandle,
    ) -> BackendResult<()> {
        self.inner.set_search(solver, strategy, vars)
    }

    fn set_default_search(&self, solver: NativeHandle) -> BackendResult<()> {
        self.inner.set_default_search(solver)
    }

    fn search_statistics(&self, solver: NativeHandle) -> BackendResult<SearchStatistics> {
        self.inner.search_statistics(solver)
    }

    fn create_portfolio(&self, search_auto_conf: bool) -> BackendResult<NativeHandle> {
        self.inner.create_portfolio(search_auto_conf)
    }

    fn steal_nogoods_on_restarts(&self, portfolio: NativeHandle) -> BackendResult<()> {
        self.inner.steal_nogoods_on_restarts(portfolio)
    }

    fn portfolio_add_model(
        &self,
        portfolio: NativeHandle,
        model: NativeHandle,
        reliable: bool,
    ) -> BackendResult<()> {
        self.inner.portfolio_add_model(portfolio, model, reliable)
    }

    fn portfolio_solve(&self, portfolio: NativeHandle) -> BackendResult<bool> {
        self.searched();
        self.inner.portfolio_solve(portfolio)
    }

    fn portfolio_best_model(
        &self,
        portfolio: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        self.inner.portfolio_best_model(portfolio)
    }

    fn portfolio_best_solution(
        &self,
        portfolio: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        self.inner.portfolio_best_solution(portfolio)
    }
}

/// Three variables over `[0, n)` which all have to differ.
pub(crate) fn pigeons(runtime: &Runtime, holes: i32) -> (Model, Vec<IntVar>) {
    let model = runtime.create_model(Some("pigeons")).unwrap();
    let vars = model.intvars(3, 0, holes - 1).unwrap();
    model.all_different(&vars).unwrap().post().unwrap();
    (model, vars)
}

/// The values of `vars` in `solution`.
pub(crate) fn values(solution: &Solution, vars: &[IntVar]) -> Vec<i32> {
    vars.iter()
        .map(|var| solution.int_value(var).unwrap())
        .collect()
}

/// A knapsack over four items; the best value is 15, reached by exactly two selections.
pub(crate) fn knapsack(runtime: &Runtime) -> (Model, Vec<IntVar>, IntVar) {
    let model = runtime.create_model(Some("knapsack")).unwrap();
    let take = model.intvars(4, 0, 1).unwrap();
    let value = model.named_intvar("value", 0, 100).unwrap();
    model
        .scalar(&take, &[3, 4, 5, 6], Operator::Le, 9)
        .unwrap()
        .post()
        .unwrap();
    model
        .scalar(&take, &[5, 7, 8, 10], Operator::Eq, &value)
        .unwrap()
        .post()
        .unwrap();
    (model, take, value)
}
