//! Configuration of searches: their limits, the direction of optimisation and the search
//! strategies.

mod limits;

pub use limits::CriterionKind;
pub use limits::CriterionScope;
pub use limits::SearchLimits;
pub use limits::StoppingCriterion;
use log::debug;

use crate::backend::ArrayKind;
use crate::error::ChocoResult;
use crate::model::Model;
use crate::runtime::NativeHandle;
use crate::runtime::OwnedHandle;

/// Whether an objective is minimised or maximised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Minimise,
    Maximise,
}

impl Direction {
    pub fn is_maximise(self) -> bool {
        self == Direction::Maximise
    }
}

/// The search strategies which can be installed on a solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// Random variable and value selection with the given seed.
    Random { seed: i64 },
    DomOverWDeg,
    DomOverWDegRef,
    ActivityBased,
    MinDomLb,
    MinDomUb,
    ConflictHistory,
    InputOrderLb,
    InputOrderUb,
    FailureLengthBased,
    FailureRateBased,
}

/// The native criterion array of one search call, together with the criteria it holds.
#[derive(Debug)]
pub(crate) struct CriterionArray {
    array: OwnedHandle,
    criteria: Vec<OwnedHandle>,
}

impl CriterionArray {
    pub(crate) fn raw(&self) -> NativeHandle {
        self.array.raw()
    }

    pub(crate) fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Creates one criterion per present limit, each against its scope owner, and stores them in
    /// a fresh criterion array. Limits are validated before anything is created.
    pub(crate) fn assemble(
        model: &Model,
        solver: NativeHandle,
        limits: &SearchLimits,
    ) -> ChocoResult<CriterionArray> {
        let stopping_criteria = limits.criteria()?;
        let runtime = model.runtime();
        let backend = runtime.backend()?;

        let array =
            runtime.adopt(backend.create_array(ArrayKind::Criterion, stopping_criteria.len())?);
        let mut criteria = Vec::with_capacity(stopping_criteria.len());
        for (index, criterion) in stopping_criteria.iter().enumerate() {
            let owner = match criterion.kind.scope() {
                CriterionScope::Model => model.raw(),
                CriterionScope::Solver => solver,
            };
            let handle =
                runtime.adopt(backend.criterion(criterion.kind, owner, criterion.threshold)?);
            backend.array_set(ArrayKind::Criterion, array.raw(), index, handle.raw())?;
            criteria.push(handle);
        }
        debug!("assembled {} stopping criteria: {stopping_criteria:?}", criteria.len());
        Ok(CriterionArray { array, criteria })
    }
}

#[cfg(test)]
mod tests {
    use super::CriterionArray;
    use super::SearchLimits;
    use crate::backend::ArrayKind;
    use crate::backend::Backend;
    use crate::backend::ReferenceBackend;
    use crate::error::ChocoError;
    use crate::runtime::Runtime;

    #[test]
    fn one_criterion_per_present_limit() {
        let backend = ReferenceBackend::default();
        let runtime = Runtime::new(backend.clone());
        let model = runtime.create_model(None).unwrap();
        let solver = model.solver().unwrap();

        let limits = SearchLimits::default()
            .with_solution_limit(10)
            .with_backtrack_limit(3);
        let criteria = CriterionArray::assemble(&model, solver.raw(), &limits).unwrap();
        assert_eq!(criteria.len(), 2);
        assert_eq!(
            backend.array_length(ArrayKind::Criterion, criteria.raw()),
            Ok(2)
        );

        let empty =
            CriterionArray::assemble(&model, solver.raw(), &SearchLimits::default()).unwrap();
        assert_eq!(backend.array_length(ArrayKind::Criterion, empty.raw()), Ok(0));
    }

    #[test]
    fn invalid_limits_allocate_nothing() {
        let backend = ReferenceBackend::default();
        let runtime = Runtime::new(backend.clone());
        let model = runtime.create_model(None).unwrap();
        let solver = model.solver().unwrap();
        let live = backend.live_handles();

        let limits = SearchLimits::default().with_fail_limit(0);
        assert!(matches!(
            CriterionArray::assemble(&model, solver.raw(), &limits),
            Err(ChocoError::InvalidLimit("fail"))
        ));
        assert_eq!(backend.live_handles(), live);
    }

    #[test]
    fn criteria_are_released_with_the_array() {
        let backend = ReferenceBackend::default();
        let runtime = Runtime::new(backend.clone());
        let model = runtime.create_model(None).unwrap();
        let solver = model.solver().unwrap();
        let live = backend.live_handles();

        let limits = SearchLimits::default().with_node_limit(1).with_restart_limit(1);
        let criteria = CriterionArray::assemble(&model, solver.raw(), &limits).unwrap();
        assert_eq!(backend.live_handles(), live + 3);
        drop(criteria);
        assert_eq!(backend.live_handles(), live);
    }
}
