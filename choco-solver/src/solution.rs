use crate::error::ChocoResult;
use crate::marshal::var_handle;
use crate::model::Model;
use crate::runtime::OwnedHandle;
use crate::variables::IntVar;

/// A solution recorded by a search: the value of every variable of its model at the time it was
/// found. Later searches do not change it.
#[derive(Debug)]
pub struct Solution {
    handle: OwnedHandle,
    model: Model,
}

impl Solution {
    pub(crate) fn new(handle: OwnedHandle, model: Model) -> Solution {
        Solution { handle, model }
    }

    /// The value `var` takes in this solution.
    pub fn int_value(&self, var: &impl AsRef<IntVar>) -> ChocoResult<i32> {
        let var = var_handle(&self.model, var.as_ref())?;
        Ok(self
            .model
            .backend()?
            .solution_int_value(self.handle.raw(), var)?)
    }

    /// The model this solution is a solution of.
    pub fn model(&self) -> &Model {
        &self.model
    }
}
