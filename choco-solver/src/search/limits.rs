use std::fmt::Display;
use std::fmt::Formatter;
use std::time::Duration;

use crate::error::ChocoError;
use crate::error::ChocoResult;

/// The object a stopping criterion is created against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CriterionScope {
    Model,
    Solver,
}

/// The measures a stopping criterion can bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CriterionKind {
    /// Wall-clock time, in milliseconds.
    Time,
    Solutions,
    Nodes,
    Fails,
    Restarts,
    Backtracks,
}

impl CriterionKind {
    /// Time, solution, node and fail criteria are created against the model, the others
    /// against the solver.
    pub fn scope(self) -> CriterionScope {
        match self {
            CriterionKind::Time
            | CriterionKind::Solutions
            | CriterionKind::Nodes
            | CriterionKind::Fails => CriterionScope::Model,
            CriterionKind::Restarts | CriterionKind::Backtracks => CriterionScope::Solver,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CriterionKind::Time => "time",
            CriterionKind::Solutions => "solution",
            CriterionKind::Nodes => "node",
            CriterionKind::Fails => "fail",
            CriterionKind::Restarts => "restart",
            CriterionKind::Backtracks => "backtrack",
        }
    }
}

impl Display for CriterionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One bound on a search; a search stops as soon as any of its criteria is met.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoppingCriterion {
    pub kind: CriterionKind,
    /// The threshold in the unit the backend expects (milliseconds for time).
    pub threshold: i64,
}

/// The limits of one search call. Every limit is optional; none at all means an unbounded search.
///
/// ```
/// # use std::time::Duration;
/// # use choco_solver::search::SearchLimits;
/// let limits = SearchLimits::default()
///     .with_time_limit(Duration::from_secs(10))
///     .with_solution_limit(3);
/// assert_eq!(limits.criteria().unwrap().len(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SearchLimits {
    pub time_limit: Option<Duration>,
    pub solution_limit: Option<u64>,
    pub node_limit: Option<u64>,
    pub fail_limit: Option<u64>,
    pub restart_limit: Option<u64>,
    pub backtrack_limit: Option<u64>,
}

impl SearchLimits {
    pub fn with_time_limit(mut self, time_limit: Duration) -> SearchLimits {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn with_solution_limit(mut self, solution_limit: u64) -> SearchLimits {
        self.solution_limit = Some(solution_limit);
        self
    }

    pub fn with_node_limit(mut self, node_limit: u64) -> SearchLimits {
        self.node_limit = Some(node_limit);
        self
    }

    pub fn with_fail_limit(mut self, fail_limit: u64) -> SearchLimits {
        self.fail_limit = Some(fail_limit);
        self
    }

    pub fn with_restart_limit(mut self, restart_limit: u64) -> SearchLimits {
        self.restart_limit = Some(restart_limit);
        self
    }

    pub fn with_backtrack_limit(mut self, backtrack_limit: u64) -> SearchLimits {
        self.backtrack_limit = Some(backtrack_limit);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        *self == SearchLimits::default()
    }

    /// The criteria of the present limits, in the order time, solutions, nodes, fails, restarts,
    /// backtracks.
    ///
    /// Every limit has to be positive. A time limit is converted to milliseconds, rounding up so
    /// that a positive duration never becomes zero.
    pub fn criteria(&self) -> ChocoResult<Vec<StoppingCriterion>> {
        let time = self
            .time_limit
            .map(|limit| {
                if limit.is_zero() {
                    return Err(ChocoError::InvalidLimit(CriterionKind::Time.name()));
                }
                let millis = limit.as_nanos().div_ceil(1_000_000);
                Ok(i64::try_from(millis).unwrap_or(i64::MAX))
            })
            .transpose()?;

        let counted = [
            (CriterionKind::Solutions, self.solution_limit),
            (CriterionKind::Nodes, self.node_limit),
            (CriterionKind::Fails, self.fail_limit),
            (CriterionKind::Restarts, self.restart_limit),
            (CriterionKind::Backtracks, self.backtrack_limit),
        ];

        let mut criteria = Vec::new();
        if let Some(threshold) = time {
            criteria.push(StoppingCriterion {
                kind: CriterionKind::Time,
                threshold,
            });
        }
        for (kind, limit) in counted {
            match limit {
                Some(0) => return Err(ChocoError::InvalidLimit(kind.name())),
                Some(limit) => criteria.push(StoppingCriterion {
                    kind,
                    threshold: i64::try_from(limit).unwrap_or(i64::MAX),
                }),
                None => {}
            }
        }
        Ok(criteria)
    }
}
