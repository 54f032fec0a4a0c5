//! Constraints over the variables of a [`Model`].
//!
//! A constraint is a relation over variables which every solution has to respect. Creating a
//! constraint through one of the factories ([`IntConstraintFactory`],
//! [`LogicalConstraintFactory`]) does not yet add it to the model: it has to be posted, reified
//! or combined into another constraint first.
//!
//! # Example
//! ```
//! # use choco_solver::prelude::*;
//! let model = Runtime::reference().create_model(None).unwrap();
//! let x = model.intvar(0, 3).unwrap();
//! let y = model.intvar(0, 3).unwrap();
//!
//! // x + y = 3
//! model
//!     .arithm3(&x, Operator::Plus, &y, Operator::Eq, 3)
//!     .unwrap()
//!     .post()
//!     .unwrap();
//!
//! // b <-> x < y
//! let b = model.arithm(&x, Operator::Lt, &y).unwrap().reify().unwrap();
//! # let _ = b;
//! ```

mod int_constraint_factory;
mod logical;
mod operator;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

pub use int_constraint_factory::IntConstraintFactory;
use log::trace;
use log::warn;
pub use logical::LogicalConstraintFactory;
pub use operator::Operand;
pub use operator::Operator;

use crate::backend::ConstraintCall;
use crate::error::ChocoResult;
use crate::model::Model;
use crate::runtime::NativeHandle;
use crate::runtime::OwnedHandle;
use crate::variables::BoolVar;

/// The satisfaction state of a constraint under the current state of the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ESat {
    True,
    False,
    /// Not all variables of the constraint are instantiated yet.
    Undefined,
}

impl ESat {
    pub(crate) fn from_native(value: i32) -> ESat {
        match value {
            0 => ESat::False,
            1 => ESat::True,
            _ => ESat::Undefined,
        }
    }
}

/// A constraint of a [`Model`].
///
/// A constraint can be used once: it is either posted, reified, or negated into another
/// constraint. Dropping a constraint which was never used logs a warning.
#[derive(Debug)]
pub struct Constraint {
    handle: OwnedHandle,
    model: Model,
    used: AtomicBool,
}

impl Constraint {
    pub(crate) fn new(handle: OwnedHandle, model: Model) -> Constraint {
        Constraint {
            handle,
            model,
            used: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> ChocoResult<String> {
        Ok(self.model.backend()?.constraint_name(self.raw())?)
    }

    /// Adds the constraint to its model.
    pub fn post(&self) -> ChocoResult<()> {
        self.model.backend()?.post(self.raw())?;
        self.mark_used();
        Ok(())
    }

    /// Reifies the constraint, returning the boolean variable which is true exactly when the
    /// constraint holds.
    pub fn reify(&self) -> ChocoResult<BoolVar> {
        let handle = self.model.backend()?.reify(self.raw())?;
        self.mark_used();
        Ok(BoolVar::new(self.model.adopt(handle), self.model.clone()))
    }

    pub fn is_satisfied(&self) -> ChocoResult<ESat> {
        let state = self.model.backend()?.is_satisfied(self.raw())?;
        Ok(ESat::from_native(state))
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub(crate) fn raw(&self) -> NativeHandle {
        self.handle.raw()
    }

    pub(crate) fn mark_used(&self) {
        self.used.store(true, Ordering::Relaxed);
    }
}

impl Drop for Constraint {
    fn drop(&mut self) {
        if !*self.used.get_mut() {
            warn!(
                "Constraint {} is never posted, reified or negated, this is likely a mistake.",
                self.handle.raw()
            );
        }
    }
}

impl Model {
    /// Forwards one constraint factory call and wraps its result.
    pub(crate) fn new_constraint(&self, call: &ConstraintCall) -> ChocoResult<Constraint> {
        let handle = self.backend()?.constraint(self.raw(), call)?;
        trace!("created constraint {handle} ({})", call.default_name());
        Ok(Constraint::new(self.adopt(handle), self.clone()))
    }
}
