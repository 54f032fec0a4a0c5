use std::sync::Arc;

use log::debug;

use crate::backend::Backend;
use crate::error::ChocoResult;
use crate::marshal::c_string;
use crate::runtime::NativeHandle;
use crate::runtime::OwnedHandle;
use crate::runtime::Runtime;
use crate::solver::Solver;

/// A constraint model: the variables and constraints of one problem, and its solver.
///
/// Variables are created through [`VariableFactory`](crate::variables::VariableFactory) and
/// constraints through [`IntConstraintFactory`](crate::constraints::IntConstraintFactory) and
/// [`LogicalConstraintFactory`](crate::constraints::LogicalConstraintFactory), all implemented
/// by `Model`.
///
/// Cloning a model clones a reference to it; every variable and constraint keeps its model alive,
/// and the model is released once the last of them is dropped.
///
/// ```
/// # use choco_solver::prelude::*;
/// let runtime = Runtime::reference();
/// let model = runtime.create_model(Some("pair")).unwrap();
/// let x = model.intvar(0, 5).unwrap();
/// let y = model.intvar(0, 5).unwrap();
/// model.arithm(&x, Operator::Lt, &y).unwrap().post().unwrap();
///
/// let mut solver = model.solver().unwrap();
/// let solution = solver
///     .find_solution(&SearchLimits::default())
///     .unwrap()
///     .unwrap();
/// assert!(solution.int_value(&x).unwrap() < solution.int_value(&y).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct Model {
    handle: Arc<OwnedHandle>,
}

impl Model {
    pub(crate) fn new(runtime: &Runtime, name: Option<&str>) -> ChocoResult<Model> {
        let name = name.map(c_string).transpose()?;
        let handle = runtime.backend()?.create_model(name.as_deref())?;
        let model = Model::from_handle(runtime.adopt(handle));
        debug!("created model {}", model.raw());
        Ok(model)
    }

    pub(crate) fn from_handle(handle: OwnedHandle) -> Model {
        Model {
            handle: Arc::new(handle),
        }
    }

    pub fn name(&self) -> ChocoResult<String> {
        Ok(self.backend()?.model_name(self.raw())?)
    }

    /// The solver of this model. Every call returns a new proxy to the same solver.
    pub fn solver(&self) -> ChocoResult<Solver> {
        let handle = self.backend()?.solver(self.raw())?;
        Ok(Solver::new(self.runtime().adopt(handle), self.clone()))
    }

    pub fn runtime(&self) -> &Runtime {
        self.handle.runtime()
    }

    pub(crate) fn raw(&self) -> NativeHandle {
        self.handle.raw()
    }

    pub(crate) fn backend(&self) -> ChocoResult<&dyn Backend> {
        self.runtime().backend()
    }

    /// Adopts a handle freshly issued by the backend of this model.
    pub(crate) fn adopt(&self, handle: NativeHandle) -> OwnedHandle {
        self.runtime().adopt(handle)
    }
}
