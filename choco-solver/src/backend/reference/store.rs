use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use slotmap::DefaultKey;
use slotmap::Key;
use slotmap::KeyData;
use slotmap::SlotMap;

use super::model::ConstraintId;
use super::model::ModelState;
use super::portfolio::PortfolioState;
use super::relation::VarId;
use crate::backend::BackendError;
use crate::backend::BackendResult;
use crate::runtime::NativeHandle;
use crate::search::CriterionKind;

pub(super) type SharedModel = Arc<Mutex<ModelState>>;

/// Locks a mutex, ignoring poisoning; the guarded state stays consistent between calls.
pub(super) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(super) fn ensure_same_model(lhs: &SharedModel, rhs: &SharedModel) -> BackendResult<()> {
    if Arc::ptr_eq(lhs, rhs) {
        Ok(())
    } else {
        Err(BackendError::ForeignObject)
    }
}

#[derive(Clone, Debug)]
pub(super) struct VarRef {
    pub(super) model: SharedModel,
    pub(super) id: VarId,
}

#[derive(Clone, Debug)]
pub(super) struct ConstraintRef {
    pub(super) model: SharedModel,
    pub(super) id: ConstraintId,
}

#[derive(Clone, Debug)]
pub(super) struct Criterion {
    pub(super) kind: CriterionKind,
    pub(super) limit: i64,
    pub(super) owner: SharedModel,
}

/// A solution recorded by a search, indexed by variable.
#[derive(Debug)]
pub(super) struct SolutionRecord {
    pub(super) model: SharedModel,
    pub(super) values: Vec<i32>,
}

/// An object a handle refers to. Several handles may refer to the same object; destroying a
/// handle never destroys anything else than the entry of the handle table.
#[derive(Debug)]
pub(super) enum Object {
    Model(SharedModel),
    Solver(SharedModel),
    Variable(VarRef),
    Constraint(ConstraintRef),
    Criterion(Criterion),
    IntArray(Vec<i32>),
    VarArray(Vec<Option<VarRef>>),
    ConstraintArray(Vec<Option<ConstraintRef>>),
    CriterionArray(Vec<Option<Criterion>>),
    SolutionList(Vec<Arc<SolutionRecord>>),
    Solution(Arc<SolutionRecord>),
    Portfolio(Arc<Mutex<PortfolioState>>),
}

impl Object {
    fn kind(&self) -> &'static str {
        match self {
            Object::Model(_) => "model",
            Object::Solver(_) => "solver",
            Object::Variable(_) => "variable",
            Object::Constraint(_) => "constraint",
            Object::Criterion(_) => "criterion",
            Object::IntArray(_) => "int array",
            Object::VarArray(_) => "variable array",
            Object::ConstraintArray(_) => "constraint array",
            Object::CriterionArray(_) => "criterion array",
            Object::SolutionList(_) => "solution list",
            Object::Solution(_) => "solution",
            Object::Portfolio(_) => "parallel portfolio",
        }
    }
}

/// The handle table of the reference engine.
#[derive(Debug, Default)]
pub(super) struct Store {
    objects: SlotMap<DefaultKey, Object>,
    pub(super) released: usize,
    pub(super) invalid_releases: usize,
    pub(super) models_created: usize,
}

fn key(handle: NativeHandle) -> DefaultKey {
    KeyData::from_ffi(handle.get()).into()
}

fn unexpected(handle: NativeHandle, expected: &'static str, found: &Object) -> BackendError {
    BackendError::UnexpectedObject {
        handle,
        expected,
        found: found.kind(),
    }
}

fn element<T: Clone>(
    entries: &[Option<T>],
    index: usize,
    what: &'static str,
) -> BackendResult<T> {
    entries
        .get(index)
        .ok_or(BackendError::IndexOutOfBounds {
            index,
            len: entries.len(),
        })?
        .clone()
        .ok_or(BackendError::NullHandle(what))
}

impl Store {
    pub(super) fn insert(&mut self, object: Object) -> BackendResult<NativeHandle> {
        let key = self.objects.insert(object);
        // Occupied slots carry an odd version, so the key is never zero.
        NativeHandle::new(key.data().as_ffi()).ok_or(BackendError::NullHandle("handle table"))
    }

    /// Removes a handle from the table, returning whether it was known.
    pub(super) fn remove(&mut self, handle: NativeHandle) -> bool {
        if self.objects.remove(key(handle)).is_some() {
            self.released += 1;
            true
        } else {
            self.invalid_releases += 1;
            false
        }
    }

    pub(super) fn len(&self) -> usize {
        self.objects.len()
    }

    pub(super) fn get(&self, handle: NativeHandle) -> BackendResult<&Object> {
        self.objects
            .get(key(handle))
            .ok_or(BackendError::InvalidHandle(handle))
    }

    fn get_mut(&mut self, handle: NativeHandle) -> BackendResult<&mut Object> {
        self.objects
            .get_mut(key(handle))
            .ok_or(BackendError::InvalidHandle(handle))
    }

    pub(super) fn model(&self, handle: NativeHandle) -> BackendResult<SharedModel> {
        match self.get(handle)? {
            Object::Model(model) => Ok(Arc::clone(model)),
            other => Err(unexpected(handle, "model", other)),
        }
    }

    pub(super) fn solver(&self, handle: NativeHandle) -> BackendResult<SharedModel> {
        match self.get(handle)? {
            Object::Solver(model) => Ok(Arc::clone(model)),
            other => Err(unexpected(handle, "solver", other)),
        }
    }

    pub(super) fn variable(&self, handle: NativeHandle) -> BackendResult<VarRef> {
        match self.get(handle)? {
            Object::Variable(var) => Ok(var.clone()),
            other => Err(unexpected(handle, "variable", other)),
        }
    }

    /// Resolves a variable handle which has to belong to `model`.
    pub(super) fn variable_of(
        &self,
        model: &SharedModel,
        handle: NativeHandle,
    ) -> BackendResult<VarId> {
        let var = self.variable(handle)?;
        ensure_same_model(model, &var.model)?;
        Ok(var.id)
    }

    pub(super) fn constraint(&self, handle: NativeHandle) -> BackendResult<ConstraintRef> {
        match self.get(handle)? {
            Object::Constraint(constraint) => Ok(constraint.clone()),
            other => Err(unexpected(handle, "constraint", other)),
        }
    }

    pub(super) fn int_array(&self, handle: NativeHandle) -> BackendResult<Vec<i32>> {
        match self.get(handle)? {
            Object::IntArray(values) => Ok(values.clone()),
            other => Err(unexpected(handle, "int array", other)),
        }
    }

    /// Resolves a variable array whose elements all have to belong to `model`.
    pub(super) fn var_array_of(
        &self,
        model: &SharedModel,
        handle: NativeHandle,
    ) -> BackendResult<Vec<VarId>> {
        match self.get(handle)? {
            Object::VarArray(entries) => (0..entries.len())
                .map(|index| {
                    let var = element(entries, index, "variable array element")?;
                    ensure_same_model(model, &var.model)?;
                    Ok(var.id)
                })
                .collect(),
            other => Err(unexpected(handle, "variable array", other)),
        }
    }

    pub(super) fn criteria(&self, handle: NativeHandle) -> BackendResult<Vec<Criterion>> {
        match self.get(handle)? {
            Object::CriterionArray(entries) => (0..entries.len())
                .map(|index| element(entries, index, "criterion array element"))
                .collect(),
            other => Err(unexpected(handle, "criterion array", other)),
        }
    }

    pub(super) fn solution(&self, handle: NativeHandle) -> BackendResult<Arc<SolutionRecord>> {
        match self.get(handle)? {
            Object::Solution(solution) => Ok(Arc::clone(solution)),
            other => Err(unexpected(handle, "solution", other)),
        }
    }

    pub(super) fn solution_list(
        &self,
        handle: NativeHandle,
    ) -> BackendResult<&[Arc<SolutionRecord>]> {
        match self.get(handle)? {
            Object::SolutionList(solutions) => Ok(solutions),
            other => Err(unexpected(handle, "solution list", other)),
        }
    }

    pub(super) fn portfolio(
        &self,
        handle: NativeHandle,
    ) -> BackendResult<Arc<Mutex<PortfolioState>>> {
        match self.get(handle)? {
            Object::Portfolio(portfolio) => Ok(Arc::clone(portfolio)),
            other => Err(unexpected(handle, "parallel portfolio", other)),
        }
    }

    /// Stores `element` at `index` of the array `handle`.
    pub(super) fn set_element(
        &mut self,
        array: NativeHandle,
        index: usize,
        element: NativeHandle,
    ) -> BackendResult<()> {
        fn slot<T>(entries: &mut [T], index: usize) -> BackendResult<&mut T> {
            let len = entries.len();
            entries
                .get_mut(index)
                .ok_or(BackendError::IndexOutOfBounds { index, len })
        }

        let resolved = match self.get(element)? {
            Object::Variable(var) => Object::Variable(var.clone()),
            Object::Constraint(constraint) => Object::Constraint(constraint.clone()),
            Object::Criterion(criterion) => Object::Criterion(criterion.clone()),
            other => return Err(unexpected(element, "array element", other)),
        };
        match (self.get_mut(array)?, resolved) {
            (Object::VarArray(entries), Object::Variable(var)) => {
                *slot(entries, index)? = Some(var);
            }
            (Object::ConstraintArray(entries), Object::Constraint(constraint)) => {
                *slot(entries, index)? = Some(constraint);
            }
            (Object::CriterionArray(entries), Object::Criterion(criterion)) => {
                *slot(entries, index)? = Some(criterion);
            }
            (Object::VarArray(_), other)
            | (Object::ConstraintArray(_), other)
            | (Object::CriterionArray(_), other) => {
                return Err(unexpected(element, "element of the array's type", &other));
            }
            (other, _) => return Err(unexpected(array, "array", other)),
        }
        Ok(())
    }

    pub(super) fn set_int(
        &mut self,
        array: NativeHandle,
        index: usize,
        value: i32,
    ) -> BackendResult<()> {
        match self.get_mut(array)? {
            Object::IntArray(values) => {
                let len = values.len();
                *values
                    .get_mut(index)
                    .ok_or(BackendError::IndexOutOfBounds { index, len })? = value;
                Ok(())
            }
            other => Err(unexpected(array, "int array", other)),
        }
    }

    pub(super) fn array_length(&self, array: NativeHandle) -> BackendResult<usize> {
        match self.get(array)? {
            Object::IntArray(values) => Ok(values.len()),
            Object::VarArray(entries) => Ok(entries.len()),
            Object::ConstraintArray(entries) => Ok(entries.len()),
            Object::CriterionArray(entries) => Ok(entries.len()),
            other => Err(unexpected(array, "array", other)),
        }
    }
}
