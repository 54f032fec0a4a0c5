//! Racing several models of the same problem against each other.
//!
//! A [`ParallelPortfolio`] solves each of its models on its own thread; the first model to find a
//! solution wins the race. The race runs entirely inside the backend.
//!
//! # Example
//! ```
//! # use choco_solver::prelude::*;
//! let runtime = Runtime::reference();
//! let mut portfolio = ParallelPortfolio::new(&runtime, true).unwrap();
//! for _ in 0..3 {
//!     let model = runtime.create_model(None).unwrap();
//!     let vars = model.intvars(4, 0, 3).unwrap();
//!     model.all_different(&vars).unwrap().post().unwrap();
//!     portfolio.add_model(&model, true).unwrap();
//! }
//!
//! assert!(portfolio.solve().unwrap());
//! assert!(portfolio.best_model().unwrap().is_some());
//! ```

use log::debug;

use crate::backend::BackendError;
use crate::error::ChocoResult;
use crate::model::Model;
use crate::runtime::OwnedHandle;
use crate::runtime::Runtime;
use crate::solution::Solution;

/// A parallel portfolio of models.
#[derive(Debug)]
pub struct ParallelPortfolio {
    handle: OwnedHandle,
    runtime: Runtime,
    /// The registered models, kept alive for as long as the portfolio may race them.
    models: Vec<Model>,
}

impl ParallelPortfolio {
    /// Creates an empty portfolio. With `search_auto_conf`, the backend diversifies the search
    /// strategies of the models.
    pub fn new(runtime: &Runtime, search_auto_conf: bool) -> ChocoResult<ParallelPortfolio> {
        let handle = runtime.backend()?.create_portfolio(search_auto_conf)?;
        Ok(ParallelPortfolio {
            handle: runtime.adopt(handle),
            runtime: runtime.clone(),
            models: Vec::new(),
        })
    }

    /// Lets the models share the nogoods they learn whenever they restart.
    pub fn steal_nogoods_on_restarts(&mut self) -> ChocoResult<()> {
        Ok(self
            .runtime
            .backend()?
            .steal_nogoods_on_restarts(self.handle.raw())?)
    }

    /// Adds a model to the race. An exhausted search of a `reliable` model ends the race, as it
    /// proves that none of the models has a solution.
    ///
    /// The model has to belong to the runtime of the portfolio.
    pub fn add_model(&mut self, model: &Model, reliable: bool) -> ChocoResult<()> {
        if !model.runtime().same_runtime(&self.runtime) {
            return Err(BackendError::ForeignObject.into());
        }
        self.runtime
            .backend()?
            .portfolio_add_model(self.handle.raw(), model.raw(), reliable)?;
        self.models.push(model.clone());
        debug!("portfolio now holds {} models", self.models.len());
        Ok(())
    }

    /// Races the models and returns whether one of them found a solution.
    pub fn solve(&mut self) -> ChocoResult<bool> {
        debug!("racing {} models", self.models.len());
        Ok(self.runtime.backend()?.portfolio_solve(self.handle.raw())?)
    }

    /// The model which won the last race.
    pub fn best_model(&self) -> ChocoResult<Option<Model>> {
        let model = self
            .runtime
            .backend()?
            .portfolio_best_model(self.handle.raw())?;
        Ok(self.runtime.adopt_option(model).map(Model::from_handle))
    }

    /// The solution of the model which won the last race, racing first if needed.
    pub fn find_best_solution(&mut self) -> ChocoResult<Option<Solution>> {
        let backend = self.runtime.backend()?;
        let Some(solution) = self
            .runtime
            .adopt_option(backend.portfolio_best_solution(self.handle.raw())?)
        else {
            return Ok(None);
        };
        Ok(self
            .best_model()?
            .map(|model| Solution::new(solution, model)))
    }
}
