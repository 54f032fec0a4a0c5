//! Conversion of proxy arguments into backend arguments.
//!
//! Every temporary array built here is adopted right away, so it is released as soon as the call
//! which needed it returns.

use std::ffi::CString;

use crate::backend::ArrayKind;
use crate::backend::BackendError;
use crate::error::ChocoError;
use crate::error::ChocoResult;
use crate::model::Model;
use crate::runtime::NativeHandle;
use crate::runtime::OwnedHandle;
use crate::variables::BoolVar;
use crate::variables::IntVar;

pub(crate) fn c_string(value: &str) -> ChocoResult<CString> {
    CString::new(value).map_err(|_| ChocoError::InvalidString(value.to_owned()))
}

/// The handle of `var`, provided that it was issued by the runtime of `model`.
///
/// Variables of another model of the same runtime are left to the backend to reject.
pub(crate) fn var_handle(model: &Model, var: &IntVar) -> ChocoResult<NativeHandle> {
    if var.model().runtime().same_runtime(model.runtime()) {
        Ok(var.raw())
    } else {
        Err(BackendError::ForeignObject.into())
    }
}

pub(crate) fn int_var_array(
    model: &Model,
    vars: &[impl AsRef<IntVar>],
) -> ChocoResult<OwnedHandle> {
    var_array(model, ArrayKind::IntVar, vars.iter().map(AsRef::as_ref))
}

pub(crate) fn bool_var_array(
    model: &Model,
    vars: &[impl AsRef<BoolVar>],
) -> ChocoResult<OwnedHandle> {
    var_array(
        model,
        ArrayKind::BoolVar,
        vars.iter().map(|var| var.as_ref().as_int_var()),
    )
}

fn var_array<'a>(
    model: &Model,
    kind: ArrayKind,
    vars: impl ExactSizeIterator<Item = &'a IntVar>,
) -> ChocoResult<OwnedHandle> {
    let runtime = model.runtime();
    let backend = runtime.backend()?;
    let array = runtime.adopt(backend.create_array(kind, vars.len())?);
    for (index, var) in vars.enumerate() {
        backend.array_set(kind, array.raw(), index, var_handle(model, var)?)?;
    }
    Ok(array)
}

pub(crate) fn int_array(model: &Model, values: &[i32]) -> ChocoResult<OwnedHandle> {
    let runtime = model.runtime();
    let backend = runtime.backend()?;
    let array = runtime.adopt(backend.create_array(ArrayKind::Int, values.len())?);
    for (index, &value) in values.iter().enumerate() {
        backend.int_array_set(array.raw(), index, value)?;
    }
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::c_string;
    use super::int_array;
    use super::int_var_array;
    use crate::backend::ArrayKind;
    use crate::backend::Backend;
    use crate::backend::BackendError;
    use crate::backend::ReferenceBackend;
    use crate::error::ChocoError;
    use crate::runtime::Runtime;
    use crate::variables::VariableFactory;

    #[test]
    fn interior_nul_is_rejected() {
        assert!(matches!(c_string("a\0b"), Err(ChocoError::InvalidString(_))));
        assert_eq!(c_string("queens").unwrap().as_bytes(), b"queens");
    }

    #[test]
    fn arrays_hold_every_element() {
        let backend = ReferenceBackend::default();
        let runtime = Runtime::new(backend.clone());
        let model = runtime.create_model(None).unwrap();
        let vars = model.intvars(4, 0, 3).unwrap();

        let array = int_var_array(&model, &vars).unwrap();
        assert_eq!(backend.array_length(ArrayKind::IntVar, array.raw()), Ok(4));
        let values = int_array(&model, &[1, 2, 3]).unwrap();
        assert_eq!(backend.array_length(ArrayKind::Int, values.raw()), Ok(3));
    }

    #[test]
    fn variables_of_another_runtime_are_foreign() {
        let model = Runtime::reference().create_model(None).unwrap();
        let other = Runtime::reference().create_model(None).unwrap();
        let x = other.intvar(0, 1).unwrap();
        assert!(matches!(
            int_var_array(&model, &[x]),
            Err(ChocoError::Backend(BackendError::ForeignObject))
        ));
    }
}
