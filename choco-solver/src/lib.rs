//! # choco-solver
//! Rust bindings for the [Choco](https://choco-solver.org) constraint programming solver.
//!
//! Every object of the solver (models, variables, constraints, solutions, ...) lives inside a
//! backend and is reached through an opaque handle. The proxies of this crate own those handles:
//! dropping a proxy releases its handle exactly once, and nothing is released any more once the
//! [`Runtime`] has been torn down.
//!
//! Two backends are available:
//! * [`backend::ReferenceBackend`], a small in-process engine which needs no native library;
//! * `backend::NativeBackend` (feature `native`), which calls into the native Choco library
//!   through `choco-capi-sys`.
//!
//! # Using choco-solver
//! The first step is **creating a model and its variables**:
//! ```rust
//! # use choco_solver::prelude::*;
//! let runtime = Runtime::reference();
//! let model = runtime.create_model(Some("sum")).unwrap();
//!
//! let x = model.intvar(5, 10).unwrap();
//! let y = model.intvar(-3, 15).unwrap();
//! let z = model.intvar(7, 25).unwrap();
//! ```
//!
//! Then we can **post constraints**:
//! ```rust
//! # use choco_solver::prelude::*;
//! # let model = Runtime::reference().create_model(None).unwrap();
//! # let x = model.intvar(5, 10).unwrap();
//! # let y = model.intvar(-3, 15).unwrap();
//! # let z = model.intvar(7, 25).unwrap();
//! // x + y + z = 17
//! model
//!     .sum(&[&x, &y, &z], Operator::Eq, 17)
//!     .unwrap()
//!     .post()
//!     .unwrap();
//! ```
//!
//! **Finding a solution** is done through the [`Solver`] of the model, under optional
//! [`search::SearchLimits`]:
//! ```rust
//! # use choco_solver::prelude::*;
//! # let model = Runtime::reference().create_model(None).unwrap();
//! # let x = model.intvar(5, 10).unwrap();
//! # let y = model.intvar(-3, 15).unwrap();
//! # let z = model.intvar(7, 25).unwrap();
//! # model.sum(&[&x, &y, &z], Operator::Eq, 17).unwrap().post().unwrap();
//! let mut solver = model.solver().unwrap();
//! let solution = solver
//!     .find_solution(&SearchLimits::default())
//!     .unwrap()
//!     .expect("the problem is satisfiable");
//!
//! let (x, y, z) = (
//!     solution.int_value(&x).unwrap(),
//!     solution.int_value(&y).unwrap(),
//!     solution.int_value(&z).unwrap(),
//! );
//! assert_eq!(x + y + z, 17);
//! ```
//!
//! **Optimising** an objective works the same way:
//! ```rust
//! # use std::time::Duration;
//! # use choco_solver::prelude::*;
//! # let model = Runtime::reference().create_model(None).unwrap();
//! # let x = model.intvar(5, 10).unwrap();
//! # let y = model.intvar(-3, 15).unwrap();
//! # let z = model.intvar(7, 25).unwrap();
//! # model.sum(&[&x, &y, &z], Operator::Eq, 17).unwrap().post().unwrap();
//! # let mut solver = model.solver().unwrap();
//! let limits = SearchLimits::default().with_time_limit(Duration::from_secs(10));
//! let best = solver
//!     .find_optimal_solution(&x, Direction::Maximise, &limits)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(best.int_value(&x).unwrap(), 10);
//! ```
//!
//! A search stopped by a limit and a search which proved that there is no solution both report
//! no solution; [`Solver::search_statistics`] tells them apart when the backend provides
//! statistics.

pub mod backend;
pub mod constraints;
pub mod error;
mod marshal;
pub mod model;
pub mod portfolio;
pub mod runtime;
pub mod search;
pub mod solution;
pub mod solver;
pub mod statistics;
pub mod variables;

pub use crate::error::ChocoError;
pub use crate::error::ChocoResult;
pub use crate::model::Model;
pub use crate::portfolio::ParallelPortfolio;
pub use crate::runtime::Runtime;
pub use crate::solution::Solution;
pub use crate::solver::Solver;

/// The types and traits needed by most users of the crate.
pub mod prelude {
    pub use crate::constraints::Constraint;
    pub use crate::constraints::ESat;
    pub use crate::constraints::IntConstraintFactory;
    pub use crate::constraints::LogicalConstraintFactory;
    pub use crate::constraints::Operator;
    pub use crate::error::ChocoError;
    pub use crate::error::ChocoResult;
    pub use crate::model::Model;
    pub use crate::portfolio::ParallelPortfolio;
    pub use crate::runtime::Runtime;
    pub use crate::search::Direction;
    pub use crate::search::SearchLimits;
    pub use crate::search::SearchStrategy;
    pub use crate::solution::Solution;
    pub use crate::solver::Solver;
    pub use crate::variables::BoolVar;
    pub use crate::variables::IntVar;
    pub use crate::variables::VariableFactory;
}
