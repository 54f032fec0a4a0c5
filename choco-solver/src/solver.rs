use log::debug;

use crate::error::ChocoResult;
use crate::marshal::int_var_array;
use crate::marshal::var_handle;
use crate::model::Model;
use crate::runtime::NativeHandle;
use crate::runtime::OwnedHandle;
use crate::search::CriterionArray;
use crate::search::Direction;
use crate::search::SearchLimits;
use crate::search::SearchStrategy;
use crate::solution::Solution;
use crate::statistics::SearchStatistics;
use crate::variables::IntVar;

/// The solver of a [`Model`].
///
/// Each search method runs exactly one search under the given [`SearchLimits`]; a search which
/// stops on a limit before finding anything reports no solution, just like a search which proves
/// that there is none. [`Solver::search_statistics`] tells the two apart when the backend reports
/// statistics.
///
/// Searching mutates the state of the solver, hence every search method takes `&mut self`.
#[derive(Debug)]
pub struct Solver {
    handle: OwnedHandle,
    model: Model,
}

impl Solver {
    pub(crate) fn new(handle: OwnedHandle, model: Model) -> Solver {
        Solver { handle, model }
    }

    /// Advances the search to its next solution and returns whether there was one.
    ///
    /// The search position is kept between calls, so all solutions can be enumerated with
    /// ```
    /// # use choco_solver::prelude::*;
    /// # let model = Runtime::reference().create_model(None).unwrap();
    /// # let x = model.intvar(0, 2).unwrap();
    /// # let mut solver = model.solver().unwrap();
    /// let mut count = 0;
    /// while solver.solve(&SearchLimits::default()).unwrap() {
    ///     count += 1;
    /// }
    /// assert_eq!(count, 3);
    /// ```
    /// After a successful call the variables of the model are instantiated to the solution.
    pub fn solve(&mut self, limits: &SearchLimits) -> ChocoResult<bool> {
        let criteria = self.criteria(limits)?;
        debug!("solve with {} stopping criteria", criteria.len());
        Ok(self.model.backend()?.solve(self.raw(), criteria.raw())?)
    }

    /// Searches for one solution.
    pub fn find_solution(&mut self, limits: &SearchLimits) -> ChocoResult<Option<Solution>> {
        let criteria = self.criteria(limits)?;
        debug!("find_solution with {} stopping criteria", criteria.len());
        let solution = self
            .model
            .backend()?
            .find_solution(self.raw(), criteria.raw())?;
        Ok(self.solution(solution))
    }

    /// Enumerates the solutions, in the order in which the search finds them.
    pub fn find_all_solutions(&mut self, limits: &SearchLimits) -> ChocoResult<Vec<Solution>> {
        let criteria = self.criteria(limits)?;
        debug!("find_all_solutions with {} stopping criteria", criteria.len());
        let list = self
            .model
            .backend()?
            .find_all_solutions(self.raw(), criteria.raw())?;
        self.walk_list(list)
    }

    /// Searches for a solution optimising `objective`. With a limit which stops the search early,
    /// the best solution found so far is returned.
    pub fn find_optimal_solution(
        &mut self,
        objective: &impl AsRef<IntVar>,
        direction: Direction,
        limits: &SearchLimits,
    ) -> ChocoResult<Option<Solution>> {
        let objective = var_handle(&self.model, objective.as_ref())?;
        let criteria = self.criteria(limits)?;
        debug!(
            "find_optimal_solution ({direction:?}) with {} stopping criteria",
            criteria.len()
        );
        let solution = self.model.backend()?.find_optimal_solution(
            self.raw(),
            objective,
            direction.is_maximise(),
            criteria.raw(),
        )?;
        Ok(self.solution(solution))
    }

    /// Enumerates every solution with the optimal value of `objective`.
    pub fn find_all_optimal_solutions(
        &mut self,
        objective: &impl AsRef<IntVar>,
        direction: Direction,
        limits: &SearchLimits,
    ) -> ChocoResult<Vec<Solution>> {
        let objective = var_handle(&self.model, objective.as_ref())?;
        let criteria = self.criteria(limits)?;
        debug!(
            "find_all_optimal_solutions ({direction:?}) with {} stopping criteria",
            criteria.len()
        );
        let list = self.model.backend()?.find_all_optimal_solutions(
            self.raw(),
            objective,
            direction.is_maximise(),
            criteria.raw(),
        )?;
        self.walk_list(list)
    }

    /// Reports the statistics of every following search.
    pub fn show_statistics(&mut self) -> ChocoResult<()> {
        Ok(self.model.backend()?.show_statistics(self.raw())?)
    }

    /// Reports a one-line summary of the statistics of every following search.
    pub fn show_short_statistics(&mut self) -> ChocoResult<()> {
        Ok(self.model.backend()?.show_short_statistics(self.raw())?)
    }

    /// Installs `strategy` over `vars` as the search of this solver.
    pub fn set_search(
        &mut self,
        strategy: SearchStrategy,
        vars: &[impl AsRef<IntVar>],
    ) -> ChocoResult<()> {
        let vars = int_var_array(&self.model, vars)?;
        debug!("installing search strategy {strategy:?}");
        Ok(self
            .model
            .backend()?
            .set_search(self.raw(), strategy, vars.raw())?)
    }

    pub fn set_default_search(&mut self) -> ChocoResult<()> {
        Ok(self.model.backend()?.set_default_search(self.raw())?)
    }

    /// The statistics of the most recent search, if the backend reports them.
    pub fn search_statistics(&self) -> ChocoResult<SearchStatistics> {
        Ok(self.model.backend()?.search_statistics(self.raw())?)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub(crate) fn raw(&self) -> NativeHandle {
        self.handle.raw()
    }

    fn criteria(&self, limits: &SearchLimits) -> ChocoResult<CriterionArray> {
        CriterionArray::assemble(&self.model, self.raw(), limits)
    }

    fn solution(&self, handle: Option<NativeHandle>) -> Option<Solution> {
        self.model
            .runtime()
            .adopt_option(handle)
            .map(|handle| Solution::new(handle, self.model.clone()))
    }

    /// Adopts every solution of a solution list; the list itself is released afterwards.
    fn walk_list(&self, list: NativeHandle) -> ChocoResult<Vec<Solution>> {
        let list = self.model.adopt(list);
        let backend = self.model.backend()?;
        let size = backend.list_size(list.raw())?;
        let solutions = (0..size)
            .map(|index| {
                let handle = backend.list_solution(list.raw(), index)?;
                Ok(Solution::new(self.model.adopt(handle), self.model.clone()))
            })
            .collect::<ChocoResult<Vec<_>>>()?;
        debug!("search found {} solutions", solutions.len());
        Ok(solutions)
    }
}
