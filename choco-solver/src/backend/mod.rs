//! The call surface of the solver library.
//!
//! Every proxy of this crate forwards its operations to a [`Backend`]. The trait mirrors the C
//! surface of the Choco solver shim: objects are referred to by opaque [`NativeHandle`]s, every
//! allocation returns a fresh handle, and a handle stays valid until it is passed to
//! [`Backend::destroy_handle`]. Destroying a handle releases the reference, not necessarily the
//! object; a variable stays part of its model after its handle has been destroyed.
//!
//! Two implementations are provided:
//! - [`ReferenceBackend`], an in-process engine which is always available;
//! - `NativeBackend` (feature `native`), which forwards to the native Choco library.

mod constraint_call;
#[cfg(feature = "native")]
mod native;
mod reference;

use std::ffi::CStr;
use std::fmt::Debug;

pub use constraint_call::ConstraintCall;
#[cfg(feature = "native")]
pub use native::NativeBackend;
pub use reference::ReferenceBackend;
use thiserror::Error;

use crate::runtime::NativeHandle;
use crate::search::CriterionKind;
use crate::search::SearchStrategy;
use crate::statistics::SearchStatistics;

/// The result type of backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors surfaced by a backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("handle {0} does not refer to a live object")]
    InvalidHandle(NativeHandle),
    #[error("handle {handle} refers to a {found}, expected a {expected}")]
    UnexpectedObject {
        handle: NativeHandle,
        expected: &'static str,
        found: &'static str,
    },
    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("objects of different models cannot be combined")]
    ForeignObject,
    #[error("constraint '{0}' has already been posted or reified")]
    ConstraintAlreadyUsed(String),
    #[error("{0} returned a null handle")]
    NullHandle(&'static str),
    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),
}

/// The element type of a backend array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    IntVar,
    BoolVar,
    Constraint,
    Int,
    Criterion,
}

/// The operations every solver backend provides.
///
/// Methods taking a handle expect one issued by the same backend; passing any other value is
/// reported as [`BackendError::InvalidHandle`] by backends which are able to detect it.
pub trait Backend: Send + Sync + Debug {
    /// Prepares the backend for use; calling it more than once has no additional effect.
    fn init(&self);
    fn cleanup(&self);
    fn is_initialized(&self) -> bool;
    /// Releases a handle. Releasing an unknown handle is not an error.
    fn destroy_handle(&self, handle: NativeHandle);

    fn create_model(&self, name: Option<&CStr>) -> BackendResult<NativeHandle>;
    fn model_name(&self, model: NativeHandle) -> BackendResult<String>;
    /// The solver of `model`; every model has exactly one.
    fn solver(&self, model: NativeHandle) -> BackendResult<NativeHandle>;

    /// Creates an integer variable; a singleton domain creates a constant.
    fn int_var(
        &self,
        model: NativeHandle,
        name: Option<&CStr>,
        lb: i32,
        ub: i32,
    ) -> BackendResult<NativeHandle>;
    /// Creates a boolean variable, or a boolean constant when `value` is given.
    fn bool_var(
        &self,
        model: NativeHandle,
        name: Option<&CStr>,
        value: Option<bool>,
    ) -> BackendResult<NativeHandle>;
    fn variable_name(&self, var: NativeHandle) -> BackendResult<String>;
    fn is_instantiated(&self, var: NativeHandle) -> BackendResult<bool>;
    fn int_var_lb(&self, var: NativeHandle) -> BackendResult<i32>;
    fn int_var_ub(&self, var: NativeHandle) -> BackendResult<i32>;
    fn int_var_value(&self, var: NativeHandle) -> BackendResult<i32>;

    fn constraint(
        &self,
        model: NativeHandle,
        call: &ConstraintCall,
    ) -> BackendResult<NativeHandle>;
    fn constraint_name(&self, constraint: NativeHandle) -> BackendResult<String>;
    fn post(&self, constraint: NativeHandle) -> BackendResult<()>;
    /// Reifies the constraint, returning the boolean variable equivalent to its satisfaction.
    fn reify(&self, constraint: NativeHandle) -> BackendResult<NativeHandle>;
    /// The satisfaction state: 0 for false, 1 for true, anything else for undefined.
    fn is_satisfied(&self, constraint: NativeHandle) -> BackendResult<i32>;

    fn create_array(&self, kind: ArrayKind, len: usize) -> BackendResult<NativeHandle>;
    /// Stores an object handle at `index` of an array of kind `kind` (which is not
    /// [`ArrayKind::Int`]).
    fn array_set(
        &self,
        kind: ArrayKind,
        array: NativeHandle,
        index: usize,
        element: NativeHandle,
    ) -> BackendResult<()>;
    fn int_array_set(&self, array: NativeHandle, index: usize, value: i32) -> BackendResult<()>;
    fn array_length(&self, kind: ArrayKind, array: NativeHandle) -> BackendResult<usize>;

    /// Creates a stopping criterion; `owner` is the model or the solver depending on
    /// [`CriterionKind::scope`].
    fn criterion(
        &self,
        kind: CriterionKind,
        owner: NativeHandle,
        limit: i64,
    ) -> BackendResult<NativeHandle>;

    /// Advances the search to the next solution, returning whether one was found.
    fn solve(&self, solver: NativeHandle, criteria: NativeHandle) -> BackendResult<bool>;
    fn find_solution(
        &self,
        solver: NativeHandle,
        criteria: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>>;
    /// Returns a handle to the list of solutions.
    fn find_all_solutions(
        &self,
        solver: NativeHandle,
        criteria: NativeHandle,
    ) -> BackendResult<NativeHandle>;
    fn find_optimal_solution(
        &self,
        solver: NativeHandle,
        objective: NativeHandle,
        maximize: bool,
        criteria: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>>;
    fn find_all_optimal_solutions(
        &self,
        solver: NativeHandle,
        objective: NativeHandle,
        maximize: bool,
        criteria: NativeHandle,
    ) -> BackendResult<NativeHandle>;
    fn list_size(&self, list: NativeHandle) -> BackendResult<usize>;
    fn list_solution(&self, list: NativeHandle, index: usize) -> BackendResult<NativeHandle>;
    fn solution_int_value(&self, solution: NativeHandle, var: NativeHandle)
        -> BackendResult<i32>;

    fn show_statistics(&self, solver: NativeHandle) -> BackendResult<()>;
    fn show_short_statistics(&self, solver: NativeHandle) -> BackendResult<()>;
    /// Installs a search strategy over the variables of the integer variable array `vars`.
    fn set_search(
        &self,
        solver: NativeHandle,
        strategy: SearchStrategy,
        vars: NativeHandle,
    ) -> BackendResult<()>;
    fn set_default_search(&self, solver: NativeHandle) -> BackendResult<()>;
    /// The counters of the most recent search of `solver`.
    fn search_statistics(&self, _solver: NativeHandle) -> BackendResult<SearchStatistics> {
        Err(BackendError::Unsupported("search_statistics"))
    }

    fn create_portfolio(&self, search_auto_conf: bool) -> BackendResult<NativeHandle>;
    fn steal_nogoods_on_restarts(&self, portfolio: NativeHandle) -> BackendResult<()>;
    fn portfolio_add_model(
        &self,
        portfolio: NativeHandle,
        model: NativeHandle,
        reliable: bool,
    ) -> BackendResult<()>;
    fn portfolio_solve(&self, portfolio: NativeHandle) -> BackendResult<bool>;
    fn portfolio_best_model(&self, portfolio: NativeHandle)
        -> BackendResult<Option<NativeHandle>>;
    fn portfolio_best_solution(
        &self,
        portfolio: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>>;
}
