use super::relation::Relation;
use super::relation::VarId;
use super::search::Search;
use super::strategy::StrategyState;
use crate::statistics::SearchStatistics;

/// Index of a constraint in its model.
pub(super) type ConstraintId = usize;

#[derive(Clone, Debug)]
pub(super) struct VarInfo {
    pub(super) name: String,
    pub(super) lb: i32,
    pub(super) ub: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ConstraintStatus {
    Free,
    Posted,
    Reified(VarId),
}

#[derive(Debug)]
pub(super) struct ConstraintState {
    pub(super) name: String,
    pub(super) relation: Relation,
    pub(super) status: ConstraintStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum StatisticsOutput {
    Full,
    Short,
}

/// What the solver of a model remembers between searches.
#[derive(Debug, Default)]
pub(super) struct SolverState {
    pub(super) strategy: Option<StrategyState>,
    pub(super) statistics_output: Option<StatisticsOutput>,
    pub(super) last_statistics: SearchStatistics,
    /// The enumeration driven by successive `solve` calls.
    pub(super) enumeration: Option<Search>,
    /// The solution the variables are currently instantiated to, if any.
    pub(super) instantiation: Option<Vec<i32>>,
}

#[derive(Debug)]
pub(super) struct ModelState {
    pub(super) name: String,
    pub(super) vars: Vec<VarInfo>,
    pub(super) constraints: Vec<ConstraintState>,
    pub(super) solver: SolverState,
    /// Bumped on every change which invalidates an ongoing enumeration.
    pub(super) revision: u64,
}

impl ModelState {
    pub(super) fn new(name: String) -> ModelState {
        ModelState {
            name,
            vars: Vec::new(),
            constraints: Vec::new(),
            solver: SolverState::default(),
            revision: 0,
        }
    }

    pub(super) fn add_var(
        &mut self,
        name: Option<String>,
        lb: i32,
        ub: i32,
        boolean: bool,
    ) -> VarId {
        let id = self.vars.len();
        let name = name.unwrap_or_else(|| match (boolean, lb == ub) {
            (_, true) => format!("cste -- {lb}"),
            (true, false) => format!("BV_{id}"),
            (false, false) => format!("IV_{id}"),
        });
        self.vars.push(VarInfo { name, lb, ub });
        self.touch();
        id
    }

    pub(super) fn add_constraint(&mut self, name: &str, relation: Relation) -> ConstraintId {
        self.constraints.push(ConstraintState {
            name: name.to_owned(),
            relation,
            status: ConstraintStatus::Free,
        });
        self.constraints.len() - 1
    }

    /// Invalidates the current enumeration and instantiation.
    pub(super) fn touch(&mut self) {
        self.revision += 1;
        self.solver.enumeration = None;
        self.solver.instantiation = None;
    }

    /// The relations the search has to satisfy: every posted constraint and the equivalence of
    /// every reified constraint with its boolean variable.
    pub(super) fn active_relations(&self) -> Vec<Relation> {
        self.constraints
            .iter()
            .filter_map(|constraint| match constraint.status {
                ConstraintStatus::Free => None,
                ConstraintStatus::Posted => Some(constraint.relation.clone()),
                ConstraintStatus::Reified(b) => Some(Relation::Equivalent {
                    b,
                    inner: Box::new(constraint.relation.clone()),
                }),
            })
            .collect()
    }

    /// The current domain of `var` as an inclusive range.
    pub(super) fn bounds(&self, var: VarId) -> Option<(i32, i32)> {
        if let Some(value) = self
            .solver
            .instantiation
            .as_ref()
            .and_then(|values| values.get(var))
        {
            return Some((*value, *value));
        }
        self.vars.get(var).map(|info| (info.lb, info.ub))
    }

    /// The current assignment; variables with a singleton domain count as assigned.
    pub(super) fn current_assignment(&self) -> Vec<Option<i32>> {
        (0..self.vars.len())
            .map(|var| match self.bounds(var) {
                Some((lb, ub)) if lb == ub => Some(lb),
                _ => None,
            })
            .collect()
    }
}
