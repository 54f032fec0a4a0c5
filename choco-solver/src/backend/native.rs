//! The backend forwarding to the native Choco library through `choco-capi-sys`.

use std::ffi::c_char;
use std::ffi::c_int;
use std::ffi::c_long;
use std::ffi::c_void;
use std::ffi::CStr;
use std::ptr;

use choco_capi_sys as sys;

use super::ArrayKind;
use super::Backend;
use super::BackendError;
use super::BackendResult;
use super::ConstraintCall;
use crate::runtime::NativeHandle;
use crate::search::CriterionKind;
use crate::search::SearchStrategy;

/// Forwards every call to the native library. All instances share the single native isolate.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeBackend;

fn raw(handle: NativeHandle) -> *mut c_void {
    handle.get() as usize as *mut c_void
}

fn from_raw(ptr: *mut c_void) -> Option<NativeHandle> {
    NativeHandle::new(ptr as usize as u64)
}

fn required(ptr: *mut c_void, operation: &'static str) -> BackendResult<NativeHandle> {
    from_raw(ptr).ok_or(BackendError::NullHandle(operation))
}

fn c_index(index: usize) -> BackendResult<c_int> {
    c_int::try_from(index).map_err(|_| BackendError::IndexOutOfBounds {
        index,
        len: c_int::MAX as usize,
    })
}

fn c_len(value: c_int) -> usize {
    usize::try_from(value).unwrap_or(0)
}

fn name_ptr(name: Option<&CStr>) -> *const c_char {
    name.map_or(ptr::null(), CStr::as_ptr)
}

/// Copies a string returned by the native library.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string which stays valid during the call.
unsafe fn owned_string(ptr: *mut c_char, operation: &'static str) -> BackendResult<String> {
    if ptr.is_null() {
        return Err(BackendError::NullHandle(operation));
    }
    // SAFETY: non-null and NUL-terminated per the contract of this function.
    Ok(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

impl Backend for NativeBackend {
    fn init(&self) {
        // SAFETY: creating the isolate or attaching the current thread has no precondition.
        unsafe { sys::chocosolver_init() }
    }

    fn cleanup(&self) {
        // SAFETY: the cleanup hook has no precondition.
        unsafe { sys::chocosolver_cleanup() }
    }

    fn is_initialized(&self) -> bool {
        // SAFETY: only reads the state of the isolate.
        unsafe { sys::chocosolver_is_initialized() != 0 }
    }

    fn destroy_handle(&self, handle: NativeHandle) {
        // SAFETY: the handle was issued by the library and is destroyed by its single owner.
        unsafe { sys::chocosolver_handles_destroy(raw(handle)) }
    }

    fn create_model(&self, name: Option<&CStr>) -> BackendResult<NativeHandle> {
        // SAFETY: the name, if any, is a valid C string for the duration of the call.
        let model = unsafe {
            match name {
                Some(name) => sys::create_model_s(name.as_ptr()),
                None => sys::create_model(),
            }
        };
        required(model, "create_model")
    }

    fn model_name(&self, model: NativeHandle) -> BackendResult<String> {
        // SAFETY: `model` is a live handle; the returned string is owned by the isolate.
        unsafe { owned_string(sys::get_model_name(raw(model)), "get_model_name") }
    }

    fn solver(&self, model: NativeHandle) -> BackendResult<NativeHandle> {
        // SAFETY: `model` is a live model handle.
        required(unsafe { sys::get_solver(raw(model)) }, "get_solver")
    }

    fn int_var(
        &self,
        model: NativeHandle,
        name: Option<&CStr>,
        lb: i32,
        ub: i32,
    ) -> BackendResult<NativeHandle> {
        let model = raw(model);
        // SAFETY: `model` is a live model handle and the name a valid C string.
        let var = unsafe {
            match (name, lb == ub) {
                (Some(name), true) => sys::intvar_si(model, name.as_ptr(), lb),
                (Some(name), false) => sys::intvar_sii(model, name.as_ptr(), lb, ub),
                (None, true) => sys::intvar_i(model, lb),
                (None, false) => sys::intvar_ii(model, lb, ub),
            }
        };
        required(var, "intvar")
    }

    fn bool_var(
        &self,
        model: NativeHandle,
        name: Option<&CStr>,
        value: Option<bool>,
    ) -> BackendResult<NativeHandle> {
        let model = raw(model);
        // SAFETY: `model` is a live model handle and the name a valid C string.
        let var = unsafe {
            match (name, value) {
                (Some(name), Some(value)) => sys::boolvar_sb(model, name.as_ptr(), value),
                (Some(name), None) => sys::boolvar_s(model, name.as_ptr()),
                (None, Some(value)) => sys::boolvar_b(model, value),
                (None, None) => sys::boolvar(model),
            }
        };
        required(var, "boolvar")
    }

    fn variable_name(&self, var: NativeHandle) -> BackendResult<String> {
        // SAFETY: `var` is a live variable handle.
        unsafe { owned_string(sys::get_variable_name(raw(var)), "get_variable_name") }
    }

    fn is_instantiated(&self, var: NativeHandle) -> BackendResult<bool> {
        // SAFETY: `var` is a live variable handle.
        Ok(unsafe { sys::is_instantiated(raw(var)) })
    }

    fn int_var_lb(&self, var: NativeHandle) -> BackendResult<i32> {
        // SAFETY: `var` is a live integer variable handle.
        Ok(unsafe { sys::get_intvar_lb(raw(var)) })
    }

    fn int_var_ub(&self, var: NativeHandle) -> BackendResult<i32> {
        // SAFETY: `var` is a live integer variable handle.
        Ok(unsafe { sys::get_intvar_ub(raw(var)) })
    }

    fn int_var_value(&self, var: NativeHandle) -> BackendResult<i32> {
        // SAFETY: `var` is a live, instantiated integer variable handle.
        Ok(unsafe { sys::get_intvar_value(raw(var)) })
    }

    fn constraint(
        &self,
        model: NativeHandle,
        call: &ConstraintCall,
    ) -> BackendResult<NativeHandle> {
        let m = raw(model);
        // SAFETY: every handle of `call` is live and of the kind the factory expects; operators
        // are static C strings.
        let constraint = unsafe {
            match *call {
                ConstraintCall::ArithmConst { x, op, cst } => {
                    sys::arithm_iv_cst(m, raw(x), op.as_c_str().as_ptr(), cst)
                }
                ConstraintCall::Arithm { x, op, y } => {
                    sys::arithm_iv_iv(m, raw(x), op.as_c_str().as_ptr(), raw(y))
                }
                ConstraintCall::Arithm3Const {
                    x,
                    op1,
                    y,
                    op2,
                    cst,
                } => sys::arithm_iv_iv_cst(
                    m,
                    raw(x),
                    op1.as_c_str().as_ptr(),
                    raw(y),
                    op2.as_c_str().as_ptr(),
                    cst,
                ),
                ConstraintCall::Arithm3 { x, op1, y, op2, z } => sys::arithm_iv_iv_iv(
                    m,
                    raw(x),
                    op1.as_c_str().as_ptr(),
                    raw(y),
                    op2.as_c_str().as_ptr(),
                    raw(z),
                ),
                ConstraintCall::MemberTable { x, table } => {
                    sys::member_iv_iarray(m, raw(x), raw(table))
                }
                ConstraintCall::MemberRange { x, lb, ub } => sys::member_iv_i_i(m, raw(x), lb, ub),
                ConstraintCall::NotMemberTable { x, table } => {
                    sys::not_member_iv_iarray(m, raw(x), raw(table))
                }
                ConstraintCall::NotMemberRange { x, lb, ub } => {
                    sys::not_member_iv_i_i(m, raw(x), lb, ub)
                }
                ConstraintCall::AllDifferent { vars } => sys::all_different(m, raw(vars)),
                ConstraintCall::AllEqual { vars } => sys::all_equal(m, raw(vars)),
                ConstraintCall::NotAllEqual { vars } => sys::not_all_equal(m, raw(vars)),
                ConstraintCall::ModConst { x, modulo, res } => {
                    sys::mod_iv_i_i(m, raw(x), modulo, res)
                }
                ConstraintCall::ModConstVar { x, modulo, res } => {
                    sys::mod_iv_i_iv(m, raw(x), modulo, raw(res))
                }
                ConstraintCall::ModVar { x, modulo, res } => {
                    sys::mod_iv_iv_iv(m, raw(x), raw(modulo), raw(res))
                }
                ConstraintCall::Not { constraint } => sys::not_(m, raw(constraint)),
                ConstraintCall::Absolute { x, y } => sys::absolute(m, raw(x), raw(y)),
                ConstraintCall::DistanceConst { x, y, op, cst } => {
                    sys::distance_iv_iv_i(m, raw(x), raw(y), op.as_c_str().as_ptr(), cst)
                }
                ConstraintCall::DistanceVar { x, y, op, z } => {
                    sys::distance_iv_iv_iv(m, raw(x), raw(y), op.as_c_str().as_ptr(), raw(z))
                }
                ConstraintCall::ElementConst {
                    value,
                    table,
                    index,
                    offset,
                } => sys::element_iv_iarray_iv_i(m, raw(value), raw(table), raw(index), offset),
                ConstraintCall::ElementVar {
                    value,
                    table,
                    index,
                    offset,
                } => sys::element_iv_ivarray_iv_i(m, raw(value), raw(table), raw(index), offset),
                ConstraintCall::Square { x, y } => sys::square(m, raw(x), raw(y)),
                ConstraintCall::TimesConstFactor { x, y, z } => {
                    sys::times_iv_i_iv(m, raw(x), y, raw(z))
                }
                ConstraintCall::TimesConstResult { x, y, z } => {
                    sys::times_iv_iv_i(m, raw(x), raw(y), z)
                }
                ConstraintCall::Times { x, y, z } => sys::times_iv_iv_iv(m, raw(x), raw(y), raw(z)),
                ConstraintCall::Div {
                    dividend,
                    divisor,
                    result,
                } => sys::div_(m, raw(dividend), raw(divisor), raw(result)),
                ConstraintCall::Max { x, y, z } => sys::max_iv_iv_iv(m, raw(x), raw(y), raw(z)),
                ConstraintCall::MaxOf { x, vars } => sys::max_iv_ivarray(m, raw(x), raw(vars)),
                ConstraintCall::Min { x, y, z } => sys::min_iv_iv_iv(m, raw(x), raw(y), raw(z)),
                ConstraintCall::MinOf { x, vars } => sys::min_iv_ivarray(m, raw(x), raw(vars)),
                ConstraintCall::Among {
                    nb_var,
                    vars,
                    values,
                } => sys::among(m, raw(nb_var), raw(vars), raw(values)),
                ConstraintCall::And { bools } => sys::and_bv_bv(m, raw(bools)),
                ConstraintCall::Or { bools } => sys::or_bv_bv(m, raw(bools)),
                ConstraintCall::CountConst { value, vars, limit } => {
                    sys::count_i(m, value, raw(vars), raw(limit))
                }
                ConstraintCall::CountVar { value, vars, limit } => {
                    sys::count_iv(m, raw(value), raw(vars), raw(limit))
                }
                ConstraintCall::NValues { vars, n_values } => {
                    sys::n_values(m, raw(vars), raw(n_values))
                }
                ConstraintCall::ScalarConst {
                    vars,
                    coeffs,
                    op,
                    cst,
                } => sys::scalar_i(m, raw(vars), raw(coeffs), op.as_c_str().as_ptr(), cst),
                ConstraintCall::ScalarVar {
                    vars,
                    coeffs,
                    op,
                    z,
                } => sys::scalar_iv(m, raw(vars), raw(coeffs), op.as_c_str().as_ptr(), raw(z)),
                ConstraintCall::SumConst { vars, op, cst } => {
                    sys::sum_iv_i(m, raw(vars), op.as_c_str().as_ptr(), cst)
                }
                ConstraintCall::SumVar { vars, op, z } => {
                    sys::sum_iv_iv(m, raw(vars), op.as_c_str().as_ptr(), raw(z))
                }
                ConstraintCall::SumBoolsConst { bools, op, cst } => {
                    sys::sum_bv_i(m, raw(bools), op.as_c_str().as_ptr(), cst)
                }
                ConstraintCall::SumBoolsVar { bools, op, z } => {
                    sys::sum_bv_iv(m, raw(bools), op.as_c_str().as_ptr(), raw(z))
                }
                ConstraintCall::LexLess { vars1, vars2 } => {
                    sys::lex_less(m, raw(vars1), raw(vars2))
                }
                ConstraintCall::LexLessEq { vars1, vars2 } => {
                    sys::lex_less_eq(m, raw(vars1), raw(vars2))
                }
                ConstraintCall::Argmax { z, offset, vars } => {
                    sys::argmax(m, raw(z), offset, raw(vars))
                }
                ConstraintCall::Argmin { z, offset, vars } => {
                    sys::argmin(m, raw(z), offset, raw(vars))
                }
            }
        };
        required(constraint, call.default_name())
    }

    fn constraint_name(&self, constraint: NativeHandle) -> BackendResult<String> {
        // SAFETY: `constraint` is a live constraint handle.
        unsafe { owned_string(sys::get_constraint_name(raw(constraint)), "get_constraint_name") }
    }

    fn post(&self, constraint: NativeHandle) -> BackendResult<()> {
        // SAFETY: `constraint` is a live constraint handle.
        unsafe { sys::post(raw(constraint)) };
        Ok(())
    }

    fn reify(&self, constraint: NativeHandle) -> BackendResult<NativeHandle> {
        // SAFETY: `constraint` is a live constraint handle.
        required(unsafe { sys::reify(raw(constraint)) }, "reify")
    }

    fn is_satisfied(&self, constraint: NativeHandle) -> BackendResult<i32> {
        // SAFETY: `constraint` is a live constraint handle.
        Ok(unsafe { sys::is_satisfied(raw(constraint)) })
    }

    fn create_array(&self, kind: ArrayKind, len: usize) -> BackendResult<NativeHandle> {
        let len = c_index(len)?;
        // SAFETY: allocating an array has no precondition.
        let array = unsafe {
            match kind {
                ArrayKind::IntVar => sys::create_intvar_array(len),
                ArrayKind::BoolVar => sys::create_boolvar_array(len),
                ArrayKind::Constraint => sys::create_constraint_array(len),
                ArrayKind::Int => sys::create_int_array(len),
                ArrayKind::Criterion => sys::create_criterion_array(len),
            }
        };
        required(array, "create_array")
    }

    fn array_set(
        &self,
        kind: ArrayKind,
        array: NativeHandle,
        index: usize,
        element: NativeHandle,
    ) -> BackendResult<()> {
        let index = c_index(index)?;
        let (array, element) = (raw(array), raw(element));
        // SAFETY: `array` is a live array of kind `kind` and `element` a live handle of its
        // element type.
        unsafe {
            match kind {
                ArrayKind::IntVar => sys::intvar_array_set(array, element, index),
                ArrayKind::BoolVar => sys::boolvar_array_set(array, element, index),
                ArrayKind::Constraint => sys::constraint_array_set(array, element, index),
                ArrayKind::Criterion => sys::criterion_array_set(array, element, index),
                ArrayKind::Int => {
                    return Err(BackendError::Unsupported("storing a handle in an int array"))
                }
            }
        }
        Ok(())
    }

    fn int_array_set(&self, array: NativeHandle, index: usize, value: i32) -> BackendResult<()> {
        let index = c_index(index)?;
        // SAFETY: `array` is a live int array.
        unsafe { sys::int_array_set(raw(array), value, index) };
        Ok(())
    }

    fn array_length(&self, kind: ArrayKind, array: NativeHandle) -> BackendResult<usize> {
        // SAFETY: `array` is a live array of kind `kind`.
        let len = unsafe {
            match kind {
                ArrayKind::IntVar => sys::intvar_array_length(raw(array)),
                ArrayKind::Int => sys::int_array_length(raw(array)),
                ArrayKind::BoolVar | ArrayKind::Constraint | ArrayKind::Criterion => {
                    sys::array_length(raw(array))
                }
            }
        };
        Ok(c_len(len))
    }

    fn criterion(
        &self,
        kind: CriterionKind,
        owner: NativeHandle,
        limit: i64,
    ) -> BackendResult<NativeHandle> {
        let limit = c_long::try_from(limit).unwrap_or(c_long::MAX);
        let owner = raw(owner);
        // SAFETY: `owner` is the live model or solver handle the criterion kind is scoped to.
        let criterion = unsafe {
            match kind {
                CriterionKind::Time => sys::time_counter(owner, limit),
                CriterionKind::Solutions => sys::solution_counter(owner, limit),
                CriterionKind::Nodes => sys::node_counter(owner, limit),
                CriterionKind::Fails => sys::fail_counter(owner, limit),
                CriterionKind::Restarts => sys::restart_counter(owner, limit),
                CriterionKind::Backtracks => sys::backtrack_counter(owner, limit),
            }
        };
        required(criterion, "criterion")
    }

    fn solve(&self, solver: NativeHandle, criteria: NativeHandle) -> BackendResult<bool> {
        // SAFETY: `solver` is a live solver and `criteria` a live criterion array.
        Ok(unsafe { sys::solve(raw(solver), raw(criteria)) })
    }

    fn find_solution(
        &self,
        solver: NativeHandle,
        criteria: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        // SAFETY: `solver` is a live solver and `criteria` a live criterion array.
        Ok(from_raw(unsafe { sys::find_solution(raw(solver), raw(criteria)) }))
    }

    fn find_all_solutions(
        &self,
        solver: NativeHandle,
        criteria: NativeHandle,
    ) -> BackendResult<NativeHandle> {
        // SAFETY: `solver` is a live solver and `criteria` a live criterion array.
        let list = unsafe { sys::find_all_solutions(raw(solver), raw(criteria)) };
        required(list, "find_all_solutions")
    }

    fn find_optimal_solution(
        &self,
        solver: NativeHandle,
        objective: NativeHandle,
        maximize: bool,
        criteria: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        // SAFETY: `solver`, `objective` and `criteria` are live handles of the expected kinds.
        Ok(from_raw(unsafe {
            sys::find_optimal_solution(raw(solver), raw(objective), maximize, raw(criteria))
        }))
    }

    fn find_all_optimal_solutions(
        &self,
        solver: NativeHandle,
        objective: NativeHandle,
        maximize: bool,
        criteria: NativeHandle,
    ) -> BackendResult<NativeHandle> {
        // SAFETY: `solver`, `objective` and `criteria` are live handles of the expected kinds.
        let list = unsafe {
            sys::find_all_optimal_solutions(raw(solver), raw(objective), maximize, raw(criteria))
        };
        required(list, "find_all_optimal_solutions")
    }

    fn list_size(&self, list: NativeHandle) -> BackendResult<usize> {
        // SAFETY: `list` is a live solution list.
        Ok(c_len(unsafe { sys::list_size(raw(list)) }))
    }

    fn list_solution(&self, list: NativeHandle, index: usize) -> BackendResult<NativeHandle> {
        let index = c_index(index)?;
        // SAFETY: `list` is a live solution list and `index` below its size.
        required(unsafe { sys::list_solution_get(raw(list), index) }, "list_solution_get")
    }

    fn solution_int_value(
        &self,
        solution: NativeHandle,
        var: NativeHandle,
    ) -> BackendResult<i32> {
        // SAFETY: `solution` is a live solution and `var` a live integer variable.
        Ok(unsafe { sys::get_int_val(raw(solution), raw(var)) })
    }

    fn show_statistics(&self, solver: NativeHandle) -> BackendResult<()> {
        // SAFETY: `solver` is a live solver handle.
        unsafe { sys::show_statistics(raw(solver)) };
        Ok(())
    }

    fn show_short_statistics(&self, solver: NativeHandle) -> BackendResult<()> {
        // SAFETY: `solver` is a live solver handle.
        unsafe { sys::show_short_statistics(raw(solver)) };
        Ok(())
    }

    fn set_search(
        &self,
        solver: NativeHandle,
        strategy: SearchStrategy,
        vars: NativeHandle,
    ) -> BackendResult<()> {
        let (solver, vars) = (raw(solver), raw(vars));
        // SAFETY: `solver` is a live solver and `vars` a live integer variable array.
        unsafe {
            match strategy {
                SearchStrategy::Random { seed } => {
                    sys::set_random_search(solver, vars, c_long::try_from(seed).unwrap_or(0))
                }
                SearchStrategy::DomOverWDeg => sys::set_dom_over_w_deg_search(solver, vars),
                SearchStrategy::DomOverWDegRef => sys::set_dom_over_w_deg_ref_search(solver, vars),
                SearchStrategy::ActivityBased => sys::set_activity_based_search(solver, vars),
                SearchStrategy::MinDomLb => sys::set_min_dom_lb_search(solver, vars),
                SearchStrategy::MinDomUb => sys::set_min_dom_ub_search(solver, vars),
                SearchStrategy::ConflictHistory => sys::set_conflict_history_search(solver, vars),
                SearchStrategy::InputOrderLb => sys::set_input_order_lb_search(solver, vars),
                SearchStrategy::InputOrderUb => sys::set_input_order_ub_search(solver, vars),
                SearchStrategy::FailureLengthBased => {
                    sys::set_failure_length_based_search(solver, vars)
                }
                SearchStrategy::FailureRateBased => {
                    sys::set_failure_rate_based_search(solver, vars)
                }
            }
        }
        Ok(())
    }

    fn set_default_search(&self, solver: NativeHandle) -> BackendResult<()> {
        // SAFETY: `solver` is a live solver handle.
        unsafe { sys::set_default_search(raw(solver)) };
        Ok(())
    }

    fn create_portfolio(&self, search_auto_conf: bool) -> BackendResult<NativeHandle> {
        // SAFETY: creating a portfolio has no precondition.
        required(
            unsafe { sys::create_parallel_portfolio(search_auto_conf) },
            "create_parallel_portfolio",
        )
    }

    fn steal_nogoods_on_restarts(&self, portfolio: NativeHandle) -> BackendResult<()> {
        // SAFETY: `portfolio` is a live portfolio handle.
        unsafe { sys::steal_nogoods_on_restarts(raw(portfolio)) };
        Ok(())
    }

    fn portfolio_add_model(
        &self,
        portfolio: NativeHandle,
        model: NativeHandle,
        reliable: bool,
    ) -> BackendResult<()> {
        // SAFETY: `portfolio` and `model` are live handles of the expected kinds.
        unsafe { sys::add_model(raw(portfolio), raw(model), reliable) };
        Ok(())
    }

    fn portfolio_solve(&self, portfolio: NativeHandle) -> BackendResult<bool> {
        // SAFETY: `portfolio` is a live portfolio handle.
        Ok(unsafe { sys::pf_solve(raw(portfolio)) })
    }

    fn portfolio_best_model(
        &self,
        portfolio: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        // SAFETY: `portfolio` is a live portfolio handle.
        Ok(from_raw(unsafe { sys::get_best_model(raw(portfolio)) }))
    }

    fn portfolio_best_solution(
        &self,
        portfolio: NativeHandle,
    ) -> BackendResult<Option<NativeHandle>> {
        // SAFETY: `portfolio` is a live portfolio handle.
        Ok(from_raw(unsafe { sys::get_best_solution(raw(portfolio)) }))
    }
}
