//! An in-process backend standing in for the native solver.
//!
//! The [`ReferenceBackend`] honours the same handle contract as the native library: every object
//! is reached through an opaque handle from a handle table and stays there until the handle is
//! destroyed. Its search is a plain depth-first generate-and-test over the variable domains,
//! checking each constraint once its scope is assigned. It is meant to exercise the proxies of
//! this crate, not to compete with the native solver.

mod model;
mod portfolio;
mod relation;
mod search;
mod store;
mod strategy;

use std::ffi::CStr;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use fnv::FnvHashSet;
use log::debug;
use log::warn;

use self::model::ConstraintStatus;
use self::model::ModelState;
use self::model::StatisticsOutput;
use self::portfolio::PortfolioState;
use self::relation::Relation;
use self::relation::Term;
use self::search::ActiveCriteria;
use self::store::ensure_same_model;
use self::store::lock;
use self::store::ConstraintRef;
use self::store::Criterion;
use self::store::Object;
use self::store::SharedModel;
use self::store::SolutionRecord;
use self::store::Store;
use self::store::VarRef;
use self::strategy::StrategyState;
use super::ArrayKind;
use super::Backend;
use super::BackendError;
use super::BackendResult;
use super::ConstraintCall;
use crate::runtime::NativeHandle;
use crate::search::CriterionKind;
use crate::search::CriterionScope;
use crate::search::SearchStrategy;
use crate::statistics::log_search_statistics;
use crate::statistics::SearchStatistics;

/// The in-process backend. Clones share the same handle table.
#[derive(Clone, Debug, Default)]
pub struct ReferenceBackend {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    store: Mutex<Store>,
    initialized: AtomicBool,
}

impl ReferenceBackend {
    /// The number of handles which have been issued and not destroyed yet.
    pub fn live_handles(&self) -> usize {
        self.store().len()
    }

    /// The number of handles which have been destroyed.
    pub fn released_handles(&self) -> usize {
        self.store().released
    }

    /// The number of destroy calls for handles which were not live.
    pub fn invalid_releases(&self) -> usize {
        self.store().invalid_releases
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        lock(&self.shared.store)
    }

    fn insert(&self, object: Object) -> BackendResult<NativeHandle> {
        self.store().insert(object)
    }

    fn with_model<T>(
        &self,
        model: NativeHandle,
        f: impl FnOnce(&mut ModelState) -> T,
    ) -> BackendResult<T> {
        let model = self.store().model(model)?;
        let mut state = lock(&model);
        Ok(f(&mut state))
    }

    fn with_solver<T>(
        &self,
        solver: NativeHandle,
        f: impl FnOnce(&mut ModelState) -> T,
    ) -> BackendResult<T> {
        let model = self.store().solver(solver)?;
        let mut state = lock(&model);
        Ok(f(&mut state))
    }

    fn with_variable<T>(
        &self,
        var: NativeHandle,
        f: impl FnOnce(&ModelState, &VarRef) -> Option<T>,
    ) -> BackendResult<T> {
        let var_ref = self.store().variable(var)?;
        let state = lock(&var_ref.model);
        f(&state, &var_ref).ok_or(BackendError::InvalidHandle(var))
    }

    fn with_constraint<T>(
        &self,
        constraint: NativeHandle,
        f: impl FnOnce(&mut ModelState, &ConstraintRef) -> BackendResult<T>,
    ) -> BackendResult<T> {
        let constraint_ref = self.store().constraint(constraint)?;
        let mut state = lock(&constraint_ref.model);
        if constraint_ref.id >= state.constraints.len() {
            return Err(BackendError::InvalidHandle(constraint));
        }
        f(&mut state, &constraint_ref)
    }

    fn add_var(
        &self,
        model: NativeHandle,
        name: Option<&CStr>,
        lb: i32,
        ub: i32,
        boolean: bool,
    ) -> BackendResult<NativeHandle> {
        let model = self.store().model(model)?;
        let name = name.map(|name| name.to_string_lossy().into_owned());
        let id = lock(&model).add_var(name, lb, ub, boolean);
        self.insert(Object::Variable(VarRef { model, id }))
    }

    /// Resolves the solver and its stopping criteria, then runs `search` on the model with the
    /// handle table unlocked.
    fn run_search<T>(
        &self,
        solver: NativeHandle,
        criteria: NativeHandle,
        objective: Option<NativeHandle>,
        search: impl FnOnce(&mut ModelState, Option<usize>, &ActiveCriteria) -> T,
    ) -> BackendResult<(SharedModel, T)> {
        let (model, objective, criteria) = {
            let store = self.store();
            let model = store.solver(solver)?;
            let objective = objective
                .map(|objective| store.variable_of(&model, objective))
                .transpose()?;
            let criteria = store.criteria(criteria)?;
            for criterion in &criteria {
                ensure_same_model(&model, &criterion.owner)?;
            }
            let limits = criteria
                .iter()
                .map(|criterion| (criterion.kind, criterion.limit))
                .collect::<Vec<_>>();
            (model, objective, ActiveCriteria::new(limits))
        };

        let mut state = lock(&model);
        debug!("searching model '{}' with {criteria:?}", state.name);
        let result = search(&mut state, objective, &criteria);
        match state.solver.statistics_output {
            Some(StatisticsOutput::Full) => {
                log_search_statistics(&state.name, &state.solver.last_statistics, false);
            }
            Some(StatisticsOutput::Short) => {
                log_search_statistics(&state.name, &state.solver.last_statistics, true);
            }
            None => {}
        }
        drop(state);
        Ok((model, result))
    }

    fn record_solution(&self, model: SharedModel, values: Vec<i32>) -> BackendResult<NativeHandle> {
        self.insert(Object::Solution(Arc::new(SolutionRecord { model, values })))
    }

    fn record_solutions(
        &self,
        model: &SharedModel,
        solutions: Vec<Vec<i32>>,
    ) -> BackendResult<NativeHandle> {
        let records = solutions
            .into_iter()
            .map(|values| {
                Arc::new(SolutionRecord {
                    model: Arc::clone(model),
                    values,
                })
            })
            .collect();
        self.insert(Object::SolutionList(records))
    }
}

/// Translates a constraint factory call into the relation checked by the search.
fn relation(store: &Store, model: &SharedModel, call: &ConstraintCall) -> BackendResult<Relation> {
    let var = |handle| store.variable_of(model, handle);
    let term = |handle| store.variable_of(model, handle).map(Term::Var);
    let vars = |handle| store.var_array_of(model, handle);
    let values = |handle| {
        store
            .int_array(handle)
            .map(|values| values.into_iter().collect::<FnvHashSet<_>>())
    };
    let constant = |value: i32| Term::Const(i64::from(value));

    let relation = match *call {
        ConstraintCall::ArithmConst { x, op, cst } => Relation::Compare {
            x: term(x)?,
            op,
            y: constant(cst),
        },
        ConstraintCall::Arithm { x, op, y } => Relation::Compare {
            x: term(x)?,
            op,
            y: term(y)?,
        },
        ConstraintCall::Arithm3Const {
            x,
            op1,
            y,
            op2,
            cst,
        } => Relation::Arithm3 {
            x: term(x)?,
            op1,
            y: term(y)?,
            op2,
            z: constant(cst),
        },
        ConstraintCall::Arithm3 { x, op1, y, op2, z } => Relation::Arithm3 {
            x: term(x)?,
            op1,
            y: term(y)?,
            op2,
            z: term(z)?,
        },
        ConstraintCall::MemberTable { x, table } => Relation::Member {
            x: var(x)?,
            values: values(table)?,
            negated: false,
        },
        ConstraintCall::MemberRange { x, lb, ub } => Relation::InRange {
            x: var(x)?,
            lb,
            ub,
            negated: false,
        },
        ConstraintCall::NotMemberTable { x, table } => Relation::Member {
            x: var(x)?,
            values: values(table)?,
            negated: true,
        },
        ConstraintCall::NotMemberRange { x, lb, ub } => Relation::InRange {
            x: var(x)?,
            lb,
            ub,
            negated: true,
        },
        ConstraintCall::AllDifferent { vars: array } => Relation::AllDifferent(vars(array)?),
        ConstraintCall::AllEqual { vars: array } => Relation::AllEqual(vars(array)?),
        ConstraintCall::NotAllEqual { vars: array } => Relation::NotAllEqual(vars(array)?),
        ConstraintCall::ModConst { x, modulo, res } => Relation::Modulo {
            x: term(x)?,
            modulo: constant(modulo),
            res: constant(res),
        },
        ConstraintCall::ModConstVar { x, modulo, res } => Relation::Modulo {
            x: term(x)?,
            modulo: constant(modulo),
            res: term(res)?,
        },
        ConstraintCall::ModVar { x, modulo, res } => Relation::Modulo {
            x: term(x)?,
            modulo: term(modulo)?,
            res: term(res)?,
        },
        ConstraintCall::Not { constraint } => {
            let constraint = store.constraint(constraint)?;
            ensure_same_model(model, &constraint.model)?;
            let state = lock(model);
            let inner = state
                .constraints
                .get(constraint.id)
                .map(|inner| inner.relation.clone())
                .ok_or(BackendError::IndexOutOfBounds {
                    index: constraint.id,
                    len: state.constraints.len(),
                })?;
            Relation::Not(Box::new(inner))
        }
        ConstraintCall::Absolute { x, y } => Relation::Absolute {
            x: var(x)?,
            y: var(y)?,
        },
        ConstraintCall::DistanceConst { x, y, op, cst } => Relation::Distance {
            x: var(x)?,
            y: var(y)?,
            op,
            z: constant(cst),
        },
        ConstraintCall::DistanceVar { x, y, op, z } => Relation::Distance {
            x: var(x)?,
            y: var(y)?,
            op,
            z: term(z)?,
        },
        ConstraintCall::ElementConst {
            value,
            table,
            index,
            offset,
        } => Relation::Element {
            value: var(value)?,
            table: store.int_array(table)?.into_iter().map(constant).collect(),
            index: var(index)?,
            offset,
        },
        ConstraintCall::ElementVar {
            value,
            table,
            index,
            offset,
        } => Relation::Element {
            value: var(value)?,
            table: vars(table)?.into_iter().map(Term::Var).collect(),
            index: var(index)?,
            offset,
        },
        ConstraintCall::Square { x, y } => Relation::Times {
            x: term(y)?,
            y: term(y)?,
            z: term(x)?,
        },
        ConstraintCall::TimesConstFactor { x, y, z } => Relation::Times {
            x: term(x)?,
            y: constant(y),
            z: term(z)?,
        },
        ConstraintCall::TimesConstResult { x, y, z } => Relation::Times {
            x: term(x)?,
            y: term(y)?,
            z: constant(z),
        },
        ConstraintCall::Times { x, y, z } => Relation::Times {
            x: term(x)?,
            y: term(y)?,
            z: term(z)?,
        },
        ConstraintCall::Div {
            dividend,
            divisor,
            result,
        } => Relation::Div {
            dividend: var(dividend)?,
            divisor: var(divisor)?,
            result: var(result)?,
        },
        ConstraintCall::Max { x, y, z } => Relation::Max {
            x: var(x)?,
            vars: vec![var(y)?, var(z)?],
        },
        ConstraintCall::MaxOf { x, vars: array } => Relation::Max {
            x: var(x)?,
            vars: vars(array)?,
        },
        ConstraintCall::Min { x, y, z } => Relation::Min {
            x: var(x)?,
            vars: vec![var(y)?, var(z)?],
        },
        ConstraintCall::MinOf { x, vars: array } => Relation::Min {
            x: var(x)?,
            vars: vars(array)?,
        },
        ConstraintCall::Among {
            nb_var,
            vars: array,
            values: table,
        } => Relation::Among {
            nb_var: var(nb_var)?,
            vars: vars(array)?,
            values: values(table)?,
        },
        ConstraintCall::And { bools } => Relation::And(vars(bools)?),
        ConstraintCall::Or { bools } => Relation::Or(vars(bools)?),
        ConstraintCall::CountConst {
            value,
            vars: array,
            limit,
        } => Relation::Count {
            value: constant(value),
            vars: vars(array)?,
            limit: var(limit)?,
        },
        ConstraintCall::CountVar {
            value,
            vars: array,
            limit,
        } => Relation::Count {
            value: term(value)?,
            vars: vars(array)?,
            limit: var(limit)?,
        },
        ConstraintCall::NValues {
            vars: array,
            n_values,
        } => Relation::NValues {
            vars: vars(array)?,
            n_values: var(n_values)?,
        },
        ConstraintCall::ScalarConst {
            vars: array,
            coeffs,
            op,
            cst,
        } => Relation::Scalar {
            vars: vars(array)?,
            coeffs: store.int_array(coeffs)?.into_iter().map(i64::from).collect(),
            op,
            rhs: constant(cst),
        },
        ConstraintCall::ScalarVar {
            vars: array,
            coeffs,
            op,
            z,
        } => Relation::Scalar {
            vars: vars(array)?,
            coeffs: store.int_array(coeffs)?.into_iter().map(i64::from).collect(),
            op,
            rhs: term(z)?,
        },
        ConstraintCall::SumConst {
            vars: array,
            op,
            cst,
        }
        | ConstraintCall::SumBoolsConst {
            bools: array,
            op,
            cst,
        } => {
            let vars = vars(array)?;
            Relation::Scalar {
                coeffs: vec![1; vars.len()],
                vars,
                op,
                rhs: constant(cst),
            }
        }
        ConstraintCall::SumVar { vars: array, op, z }
        | ConstraintCall::SumBoolsVar {
            bools: array,
            op,
            z,
        } => {
            let vars = vars(array)?;
            Relation::Scalar {
                coeffs: vec![1; vars.len()],
                vars,
                op,
                rhs: term(z)?,
            }
        }
        ConstraintCall::LexLess { vars1, vars2 } => Relation::Lex {
            vars1: vars(vars1)?,
            vars2: vars(vars2)?,
            strict: true,
        },
        ConstraintCall::LexLessEq { vars1, vars2 } => Relation::Lex {
            vars1: vars(vars1)?,
            vars2: vars(vars2)?,
            strict: false,
        },
        ConstraintCall::Argmax {
            z,
            offset,
            vars: array,
        } => Relation::Arg {
            z: var(z)?,
            offset,
            vars: vars(array)?,
            maximum: true,
        },
        ConstraintCall::Argmin {
            z,
            offset,
            vars: array,
        } => Relation::Arg {
            z: var(z)?,
            offset,
            vars: vars(array)?,
            maximum: false,
        },
    };
    Ok(relation)
}

impl Backend for ReferenceBackend {
    fn init(&self) {
        self.shared.initialized.store(true, Ordering::Release);
    }

    fn cleanup(&self) {
        self.shared.initialized.store(false, Ordering::Release);
    }

    fn is_initialized(&self) -> bool {
        self.shared.initialized.load(Ordering::Acquire)
    }

    fn destroy_handle(&self, handle: NativeHandle) {
        if !self.store().remove(handle) {
            warn!("destroying unknown handle {handle}");
        }
    }

    fn create_model(&self, name: Option<&CStr>) -> BackendResult<NativeHandle> {
        let mut store = self.store();
        let name = match name {
            Some(name) => name.to_string_lossy().into_owned(),
            None => format!("Model-{}", store.models_created),
        };
        store.models_created += 1;
        store.insert(Object::Model(Arc::new(Mutex::new(ModelState::new(name)))))
    }

    fn model_name(&self, model: NativeHandle) -> BackendResult<String> {
        self.with_model(model, |state| state.name.clone())
    }

    fn solver(&self, model: NativeHandle) -> BackendResult<NativeHandle> {
        let model = self.store().model(model)?;
        self.insert(Object::Solver(model))
    }

    fn int_var(
        &self,
        model: NativeHandle,
        name: Option<&CStr>,
        lb: i32,
        ub: i32,
    ) -> BackendResult<NativeHandle> {
        self.add_var(model, name, lb, ub, false)
    }

    fn bool_var(
        &self,
        model: NativeHandle,
        name: Option<&CStr>,
        value: Option<bool>,
    ) -> BackendResult<NativeHandle> {
        let (lb, ub) = match value {
            Some(value) => (i32::from(value), i32::from(value)),
            None => (0, 1),
        };
        self.add_var(model, name, lb, ub, true)
    }

    fn variable_name(&self, var: NativeHandle) -> BackendResult<String> {
        self.with_variable(var, |state, var| {
            state.vars.get(var.id).map(|info| info.name.clone())
        })
    }

    fn is_instantiated(&self, var: NativeHandle) -> BackendResult<bool> {
        self.with_variable(var, |state, var| state.bounds(var.id).map(|(lb, ub)| lb == ub))
    }

    fn int_var_lb(&self, var: NativeHandle) -> BackendResult<i32> {
        self.with_variable(var, |state, var| state.bounds(var.id).map(|(lb, _)| lb))
    }

    fn int_var_ub(&self, var: NativeHandle) -> BackendResult<i32> {
        self.with_variable(var, |state, var| state.bounds(var.id).map(|(_, ub)| ub))
    }

    fn int_var_value(&self, var: NativeHandle) -> BackendResult<i32> {
        self.int_var_lb(var)
    }

    fn constraint(
        &self,
        model: NativeHandle,
        call: &ConstraintCall,
    ) -> BackendResult<NativeHandle> {
        let mut store = self.store();
        let model = store.model(model)?;
        let relation = relation(&store, &model, call)?;
        let id = lock(&model).add_constraint(call.default_name(), relation);
        store.insert(Object::Constraint(ConstraintRef { model, id }))
    }

    fn constraint_name(&self, constraint: NativeHandle) -> BackendResult<String> {
        self.with_constraint(constraint, |state, constraint| {
            Ok(state.constraints[constraint.id].name.clone())
        })
    }

    fn post(&self, constraint: NativeHandle) -> BackendResult<()> {
        self.with_constraint(constraint, |state, constraint| {
            let entry = &mut state.constraints[constraint.id];
            if entry.status != ConstraintStatus::Free {
                return Err(BackendError::ConstraintAlreadyUsed(entry.name.clone()));
            }
            entry.status = ConstraintStatus::Posted;
            state.touch();
            Ok(())
        })
    }

    fn reify(&self, constraint: NativeHandle) -> BackendResult<NativeHandle> {
        let constraint_ref = self.store().constraint(constraint)?;
        let b = self.with_constraint(constraint, |state, constraint| {
            let entry = &state.constraints[constraint.id];
            if entry.status != ConstraintStatus::Free {
                return Err(BackendError::ConstraintAlreadyUsed(entry.name.clone()));
            }
            let b = state.add_var(None, 0, 1, true);
            state.constraints[constraint.id].status = ConstraintStatus::Reified(b);
            Ok(b)
        })?;
        self.insert(Object::Variable(VarRef {
            model: constraint_ref.model,
            id: b,
        }))
    }

    fn is_satisfied(&self, constraint: NativeHandle) -> BackendResult<i32> {
        self.with_constraint(constraint, |state, constraint| {
            let assignment = state.current_assignment();
            Ok(
                match state.constraints[constraint.id].relation.evaluate(&assignment) {
                    Some(false) => 0,
                    Some(true) => 1,
                    None => 2,
                },
            )
        })
    }

    fn create_array(&self, kind: ArrayKind, len: usize) -> BackendResult<NativeHandle> {
        self.insert(match kind {
            ArrayKind::IntVar | ArrayKind::BoolVar => Object::VarArray(vec![None; len]),
            ArrayKind::Constraint => Object::ConstraintArray(vec![None; len]),
            ArrayKind::Int => Object::IntArray(vec![0; len]),
            ArrayKind::Criterion => Object::CriterionArray(vec![None; len]),
        })
    }

    fn array_set(
        &self,
        kind: ArrayKind,
        array: NativeHandle,
        index: usize,
        element: NativeHandle,
    ) -> BackendResult<()> {
        if kind == ArrayKind::Int {
            return Err(BackendError::Unsupported("storing a handle in an int array"));
        }
        self.store().set_element(array, index, element)
    }

    fn int_array_set(&self, array: NativeHandle, index: usize, value: i32) -> BackendResult<()> {
        self.store().set_int(array, index, value)
    }

    fn array_length(&self, _kind: ArrayKind, array: NativeHandle) -> BackendResult<usize> {
        self.store().array_length(array)
    }

    fn criterion(
        &self,
        kind: CriterionKind,
        owner: NativeHandle,
        limit: i64,
    ) -> BackendResult<NativeHandle> {
        let mut store = self.store();
        let owner = match kind.scope() {
            CriterionScope::Model => store.model(owner)?,
            CriterionScope::Solver => store.solver(owner)?,
        };
        store.insert(Object::Criterion(Criterion { kind, limit, owner }))
    }

    fn solve(&self, solver: NativeHandle, criteria: NativeHandle) -> BackendResult<bool> {
        let (_, found) = self.run_search(solver, criteria, None, |state, _, criteria| {
            search::solve(state, criteria)
        })?;
        Ok(found)
    }

    fn find_solution(
        &self,
        solver: NativeHandle,
        criteria: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        let (model, solution) = self.run_search(solver, criteria, None, |state, _, criteria| {
            search::find_solution(state, criteria)
        })?;
        solution
            .map(|values| self.record_solution(model, values))
            .transpose()
    }

    fn find_all_solutions(
        &self,
        solver: NativeHandle,
        criteria: NativeHandle,
    ) -> BackendResult<NativeHandle> {
        let (model, solutions) = self.run_search(solver, criteria, None, |state, _, criteria| {
            search::find_all_solutions(state, criteria)
        })?;
        self.record_solutions(&model, solutions)
    }

    fn find_optimal_solution(
        &self,
        solver: NativeHandle,
        objective: NativeHandle,
        maximize: bool,
        criteria: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        let (model, solution) =
            self.run_search(solver, criteria, Some(objective), |state, objective, criteria| {
                objective.and_then(|objective| {
                    search::find_optimal_solution(state, objective, maximize, criteria)
                })
            })?;
        solution
            .map(|values| self.record_solution(model, values))
            .transpose()
    }

    fn find_all_optimal_solutions(
        &self,
        solver: NativeHandle,
        objective: NativeHandle,
        maximize: bool,
        criteria: NativeHandle,
    ) -> BackendResult<NativeHandle> {
        let (model, solutions) =
            self.run_search(solver, criteria, Some(objective), |state, objective, criteria| {
                objective
                    .map(|objective| {
                        search::find_all_optimal_solutions(state, objective, maximize, criteria)
                    })
                    .unwrap_or_default()
            })?;
        self.record_solutions(&model, solutions)
    }

    fn list_size(&self, list: NativeHandle) -> BackendResult<usize> {
        self.store().solution_list(list).map(<[_]>::len)
    }

    fn list_solution(&self, list: NativeHandle, index: usize) -> BackendResult<NativeHandle> {
        let mut store = self.store();
        let solutions = store.solution_list(list)?;
        let solution = solutions
            .get(index)
            .map(Arc::clone)
            .ok_or(BackendError::IndexOutOfBounds {
                index,
                len: solutions.len(),
            })?;
        store.insert(Object::Solution(solution))
    }

    fn solution_int_value(
        &self,
        solution: NativeHandle,
        var: NativeHandle,
    ) -> BackendResult<i32> {
        let store = self.store();
        let record = store.solution(solution)?;
        let var = store.variable(var)?;
        ensure_same_model(&record.model, &var.model)?;
        record
            .values
            .get(var.id)
            .copied()
            .ok_or(BackendError::IndexOutOfBounds {
                index: var.id,
                len: record.values.len(),
            })
    }

    fn show_statistics(&self, solver: NativeHandle) -> BackendResult<()> {
        self.with_solver(solver, |state| {
            state.solver.statistics_output = Some(StatisticsOutput::Full);
        })
    }

    fn show_short_statistics(&self, solver: NativeHandle) -> BackendResult<()> {
        self.with_solver(solver, |state| {
            state.solver.statistics_output = Some(StatisticsOutput::Short);
        })
    }

    fn set_search(
        &self,
        solver: NativeHandle,
        strategy: SearchStrategy,
        vars: NativeHandle,
    ) -> BackendResult<()> {
        let (model, vars) = {
            let store = self.store();
            let model = store.solver(solver)?;
            let vars = store.var_array_of(&model, vars)?;
            (model, vars)
        };
        let mut state = lock(&model);
        state.solver.strategy = Some(StrategyState { strategy, vars });
        state.touch();
        Ok(())
    }

    fn set_default_search(&self, solver: NativeHandle) -> BackendResult<()> {
        self.with_solver(solver, |state| {
            state.solver.strategy = None;
            state.touch();
        })
    }

    fn search_statistics(&self, solver: NativeHandle) -> BackendResult<SearchStatistics> {
        self.with_solver(solver, |state| state.solver.last_statistics)
    }

    fn create_portfolio(&self, search_auto_conf: bool) -> BackendResult<NativeHandle> {
        self.insert(Object::Portfolio(Arc::new(Mutex::new(PortfolioState::new(
            search_auto_conf,
        )))))
    }

    fn steal_nogoods_on_restarts(&self, portfolio: NativeHandle) -> BackendResult<()> {
        let portfolio = self.store().portfolio(portfolio)?;
        debug!("the reference engine never restarts, so no nogoods will be shared");
        lock(&portfolio).steal_nogoods = true;
        Ok(())
    }

    fn portfolio_add_model(
        &self,
        portfolio: NativeHandle,
        model: NativeHandle,
        reliable: bool,
    ) -> BackendResult<()> {
        let (portfolio, model) = {
            let store = self.store();
            (store.portfolio(portfolio)?, store.model(model)?)
        };
        lock(&portfolio).add(model, reliable);
        Ok(())
    }

    fn portfolio_solve(&self, portfolio: NativeHandle) -> BackendResult<bool> {
        let portfolio = self.store().portfolio(portfolio)?;
        let mut state = lock(&portfolio);
        Ok(state.race())
    }

    fn portfolio_best_model(
        &self,
        portfolio: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        let portfolio = self.store().portfolio(portfolio)?;
        let best = lock(&portfolio)
            .best
            .as_ref()
            .map(|(model, _)| Arc::clone(model));
        best.map(|model| self.insert(Object::Model(model)))
            .transpose()
    }

    fn portfolio_best_solution(
        &self,
        portfolio: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        let portfolio = self.store().portfolio(portfolio)?;
        let best = {
            let mut state = lock(&portfolio);
            if !state.raced {
                let _ = state.race();
            }
            state
                .best
                .as_ref()
                .map(|(model, values)| (Arc::clone(model), values.clone()))
        };
        best.map(|(model, values)| self.record_solution(model, values))
            .transpose()
    }
}
