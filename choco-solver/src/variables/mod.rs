//! Integer and boolean decision variables.
//!
//! Variables are created through the [`VariableFactory`] implemented by
//! [`Model`](crate::model::Model). A boolean variable is an integer variable over `{0, 1}`, so a
//! [`BoolVar`] can be used wherever an [`IntVar`] is expected through [`BoolVar::as_int_var`] or
//! its [`AsRef<IntVar>`] implementation.
//!
//! # Example
//! ```
//! # use choco_solver::prelude::*;
//! let model = Runtime::reference().create_model(None).unwrap();
//!
//! let x = model.named_intvar("x", -3, 7).unwrap();
//! assert_eq!(x.name().unwrap(), "x");
//! assert_eq!((x.lb().unwrap(), x.ub().unwrap()), (-3, 7));
//! assert!(!x.is_instantiated().unwrap());
//!
//! let five = model.constant(5).unwrap();
//! assert_eq!(five.value().unwrap(), 5);
//! ```

use log::trace;

use crate::error::ChocoError;
use crate::error::ChocoResult;
use crate::marshal::c_string;
use crate::model::Model;
use crate::runtime::NativeHandle;
use crate::runtime::OwnedHandle;

/// The variable-creating capability of a [`Model`].
pub trait VariableFactory {
    /// An integer variable over the domain `[lb, ub]`; the backend picks its name.
    fn intvar(&self, lb: i32, ub: i32) -> ChocoResult<IntVar>;
    fn named_intvar(&self, name: &str, lb: i32, ub: i32) -> ChocoResult<IntVar>;
    /// An integer variable whose domain is the single value `value`.
    fn constant(&self, value: i32) -> ChocoResult<IntVar>;
    /// `n` unnamed integer variables over `[lb, ub]`.
    fn intvars(&self, n: usize, lb: i32, ub: i32) -> ChocoResult<Vec<IntVar>>;

    fn boolvar(&self) -> ChocoResult<BoolVar>;
    fn named_boolvar(&self, name: &str) -> ChocoResult<BoolVar>;
    fn bool_constant(&self, value: bool) -> ChocoResult<BoolVar>;
    fn boolvars(&self, n: usize) -> ChocoResult<Vec<BoolVar>>;
}

impl Model {
    fn new_int_var(&self, name: Option<&str>, lb: i32, ub: i32) -> ChocoResult<IntVar> {
        if lb > ub {
            return Err(ChocoError::EmptyDomain { lb, ub });
        }
        let name = name.map(c_string).transpose()?;
        let handle = self.backend()?.int_var(self.raw(), name.as_deref(), lb, ub)?;
        Ok(IntVar::new(self.adopt(handle), self.clone()))
    }

    fn new_bool_var(&self, name: Option<&str>, value: Option<bool>) -> ChocoResult<BoolVar> {
        let name = name.map(c_string).transpose()?;
        let handle = self
            .backend()?
            .bool_var(self.raw(), name.as_deref(), value)?;
        Ok(BoolVar::new(self.adopt(handle), self.clone()))
    }
}

impl VariableFactory for Model {
    fn intvar(&self, lb: i32, ub: i32) -> ChocoResult<IntVar> {
        self.new_int_var(None, lb, ub)
    }

    fn named_intvar(&self, name: &str, lb: i32, ub: i32) -> ChocoResult<IntVar> {
        self.new_int_var(Some(name), lb, ub)
    }

    fn constant(&self, value: i32) -> ChocoResult<IntVar> {
        self.new_int_var(None, value, value)
    }

    fn intvars(&self, n: usize, lb: i32, ub: i32) -> ChocoResult<Vec<IntVar>> {
        if lb > ub {
            return Err(ChocoError::EmptyDomain { lb, ub });
        }
        (0..n).map(|_| self.new_int_var(None, lb, ub)).collect()
    }

    fn boolvar(&self) -> ChocoResult<BoolVar> {
        self.new_bool_var(None, None)
    }

    fn named_boolvar(&self, name: &str) -> ChocoResult<BoolVar> {
        self.new_bool_var(Some(name), None)
    }

    fn bool_constant(&self, value: bool) -> ChocoResult<BoolVar> {
        self.new_bool_var(None, Some(value))
    }

    fn boolvars(&self, n: usize) -> ChocoResult<Vec<BoolVar>> {
        (0..n).map(|_| self.new_bool_var(None, None)).collect()
    }
}

/// An integer variable of a [`Model`].
///
/// Its bounds reflect the state of the solver: once a search has instantiated the model, `lb`,
/// `ub` and `value` report the assigned value.
#[derive(Debug)]
pub struct IntVar {
    handle: OwnedHandle,
    model: Model,
}

impl IntVar {
    pub(crate) fn new(handle: OwnedHandle, model: Model) -> IntVar {
        trace!("new integer variable {}", handle.raw());
        IntVar { handle, model }
    }

    pub fn name(&self) -> ChocoResult<String> {
        Ok(self.model.backend()?.variable_name(self.raw())?)
    }

    pub fn lb(&self) -> ChocoResult<i32> {
        Ok(self.model.backend()?.int_var_lb(self.raw())?)
    }

    pub fn ub(&self) -> ChocoResult<i32> {
        Ok(self.model.backend()?.int_var_ub(self.raw())?)
    }

    /// The value of the variable, which has to be instantiated.
    pub fn value(&self) -> ChocoResult<i32> {
        let backend = self.model.backend()?;
        if !backend.is_instantiated(self.raw())? {
            return Err(ChocoError::NotInstantiated(self.name()?));
        }
        Ok(backend.int_var_value(self.raw())?)
    }

    pub fn is_instantiated(&self) -> ChocoResult<bool> {
        Ok(self.model.backend()?.is_instantiated(self.raw())?)
    }

    /// The model this variable belongs to.
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub(crate) fn raw(&self) -> NativeHandle {
        self.handle.raw()
    }
}

impl AsRef<IntVar> for IntVar {
    fn as_ref(&self) -> &IntVar {
        self
    }
}

/// A boolean variable, i.e. an integer variable over `{0, 1}`.
#[derive(Debug)]
pub struct BoolVar(IntVar);

impl BoolVar {
    pub(crate) fn new(handle: OwnedHandle, model: Model) -> BoolVar {
        BoolVar(IntVar::new(handle, model))
    }

    pub fn as_int_var(&self) -> &IntVar {
        &self.0
    }

    pub fn name(&self) -> ChocoResult<String> {
        self.0.name()
    }

    pub fn is_instantiated(&self) -> ChocoResult<bool> {
        self.0.is_instantiated()
    }

    pub fn value(&self) -> ChocoResult<bool> {
        self.0.value().map(|value| value != 0)
    }

    pub fn model(&self) -> &Model {
        self.0.model()
    }
}

impl AsRef<IntVar> for BoolVar {
    fn as_ref(&self) -> &IntVar {
        &self.0
    }
}

impl AsRef<BoolVar> for BoolVar {
    fn as_ref(&self) -> &BoolVar {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::VariableFactory;
    use crate::backend::ReferenceBackend;
    use crate::error::ChocoError;
    use crate::runtime::Runtime;

    #[test]
    fn empty_domains_are_rejected_locally() {
        let backend = ReferenceBackend::default();
        let runtime = Runtime::new(backend.clone());
        let model = runtime.create_model(None).unwrap();
        let live = backend.live_handles();

        assert!(matches!(
            model.intvar(3, 2),
            Err(ChocoError::EmptyDomain { lb: 3, ub: 2 })
        ));
        assert!(matches!(
            model.intvars(4, 1, 0),
            Err(ChocoError::EmptyDomain { .. })
        ));
        assert_eq!(backend.live_handles(), live);
    }

    #[test]
    fn uninstantiated_variables_have_no_value() {
        let model = Runtime::reference().create_model(None).unwrap();
        let x = model.named_intvar("x", 0, 4).unwrap();
        match x.value() {
            Err(ChocoError::NotInstantiated(name)) => assert_eq!(name, "x"),
            other => panic!("expected NotInstantiated, got {other:?}"),
        }
    }

    #[test]
    fn boolean_constants_are_instantiated() {
        let model = Runtime::reference().create_model(None).unwrap();
        let t = model.bool_constant(true).unwrap();
        let f = model.bool_constant(false).unwrap();
        assert!(t.value().unwrap());
        assert!(!f.value().unwrap());

        let b = model.named_boolvar("b").unwrap();
        assert_eq!(b.name().unwrap(), "b");
        assert_eq!((b.as_int_var().lb().unwrap(), b.as_int_var().ub().unwrap()), (0, 1));
        assert_eq!(model.boolvars(3).unwrap().len(), 3);
    }

    #[test]
    fn variables_keep_their_model_alive() {
        let backend = ReferenceBackend::default();
        let runtime = Runtime::new(backend.clone());
        let x = runtime.create_model(None).unwrap().intvar(0, 1).unwrap();
        assert_eq!(backend.live_handles(), 2);
        drop(x);
        assert_eq!(backend.live_handles(), 0);
    }
}
