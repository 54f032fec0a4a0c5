//! Raw bindings to the C shim around the Choco solver native image.
//!
//! Every function takes and returns opaque `void*` object handles issued by the GraalVM isolate
//! that hosts the solver. A handle stays valid until it is passed to
//! [`chocosolver_handles_destroy`]; the objects it refers to are owned by the isolate. Nothing in
//! this crate is safe to call before [`chocosolver_init`] has been called on the process.
//!
//! The safe, ownership-tracking layer lives in the `choco-solver` crate.

#![allow(non_camel_case_types, reason = "mirrors the C header")]

use std::ffi::c_char;
use std::ffi::c_int;
use std::ffi::c_long;
use std::ffi::c_void;

/// An opaque object handle.
pub type choco_handle = *mut c_void;

extern "C" {
    // Library lifecycle

    pub fn chocosolver_init();

    pub fn chocosolver_cleanup();

    pub fn chocosolver_is_initialized() -> c_int;

    // Handle API

    pub fn chocosolver_handles_destroy(handle: choco_handle);

    // Model API

    pub fn create_model() -> choco_handle;

    pub fn create_model_s(name: *const c_char) -> choco_handle;

    pub fn get_model_name(model: choco_handle) -> *mut c_char;

    pub fn get_solver(model: choco_handle) -> choco_handle;

    // Solver API

    pub fn solve(solver: choco_handle, criteria: choco_handle) -> bool;

    pub fn find_solution(solver: choco_handle, criteria: choco_handle) -> choco_handle;

    pub fn find_all_solutions(solver: choco_handle, criteria: choco_handle) -> choco_handle;

    pub fn find_optimal_solution(
        solver: choco_handle,
        objective: choco_handle,
        maximize: bool,
        criteria: choco_handle,
    ) -> choco_handle;

    pub fn find_all_optimal_solutions(
        solver: choco_handle,
        objective: choco_handle,
        maximize: bool,
        criteria: choco_handle,
    ) -> choco_handle;

    pub fn show_statistics(solver: choco_handle);

    pub fn show_short_statistics(solver: choco_handle);

    // Solution API

    pub fn get_int_val(solution: choco_handle, var: choco_handle) -> c_int;

    // Criterion API

    pub fn time_counter(model: choco_handle, limit: c_long) -> choco_handle;

    pub fn solution_counter(model: choco_handle, limit: c_long) -> choco_handle;

    pub fn node_counter(model: choco_handle, limit: c_long) -> choco_handle;

    pub fn fail_counter(model: choco_handle, limit: c_long) -> choco_handle;

    pub fn restart_counter(solver: choco_handle, limit: c_long) -> choco_handle;

    pub fn backtrack_counter(solver: choco_handle, limit: c_long) -> choco_handle;

    // Variables

    pub fn get_variable_name(var: choco_handle) -> *mut c_char;

    pub fn is_instantiated(var: choco_handle) -> bool;

    pub fn intvar_sii(model: choco_handle, name: *const c_char, lb: c_int, ub: c_int)
        -> choco_handle;

    pub fn intvar_ii(model: choco_handle, lb: c_int, ub: c_int) -> choco_handle;

    pub fn intvar_i(model: choco_handle, value: c_int) -> choco_handle;

    pub fn intvar_si(model: choco_handle, name: *const c_char, value: c_int) -> choco_handle;

    pub fn get_intvar_lb(var: choco_handle) -> c_int;

    pub fn get_intvar_ub(var: choco_handle) -> c_int;

    pub fn get_intvar_value(var: choco_handle) -> c_int;

    pub fn boolvar_s(model: choco_handle, name: *const c_char) -> choco_handle;

    pub fn boolvar(model: choco_handle) -> choco_handle;

    pub fn boolvar_b(model: choco_handle, value: bool) -> choco_handle;

    pub fn boolvar_sb(model: choco_handle, name: *const c_char, value: bool) -> choco_handle;

    // Constraints

    pub fn get_constraint_name(constraint: choco_handle) -> *mut c_char;

    pub fn post(constraint: choco_handle);

    pub fn reify(constraint: choco_handle) -> choco_handle;

    pub fn is_satisfied(constraint: choco_handle) -> c_int;

    pub fn arithm_iv_cst(
        model: choco_handle,
        x: choco_handle,
        op: *const c_char,
        cst: c_int,
    ) -> choco_handle;

    pub fn arithm_iv_iv(
        model: choco_handle,
        x: choco_handle,
        op: *const c_char,
        y: choco_handle,
    ) -> choco_handle;

    pub fn arithm_iv_iv_cst(
        model: choco_handle,
        x: choco_handle,
        op1: *const c_char,
        y: choco_handle,
        op2: *const c_char,
        cst: c_int,
    ) -> choco_handle;

    pub fn arithm_iv_iv_iv(
        model: choco_handle,
        x: choco_handle,
        op1: *const c_char,
        y: choco_handle,
        op2: *const c_char,
        z: choco_handle,
    ) -> choco_handle;

    pub fn member_iv_iarray(model: choco_handle, x: choco_handle, table: choco_handle)
        -> choco_handle;

    pub fn member_iv_i_i(model: choco_handle, x: choco_handle, lb: c_int, ub: c_int)
        -> choco_handle;

    pub fn not_member_iv_iarray(
        model: choco_handle,
        x: choco_handle,
        table: choco_handle,
    ) -> choco_handle;

    pub fn not_member_iv_i_i(
        model: choco_handle,
        x: choco_handle,
        lb: c_int,
        ub: c_int,
    ) -> choco_handle;

    pub fn all_different(model: choco_handle, vars: choco_handle) -> choco_handle;

    pub fn mod_iv_i_i(model: choco_handle, x: choco_handle, modulo: c_int, res: c_int)
        -> choco_handle;

    pub fn mod_iv_i_iv(
        model: choco_handle,
        x: choco_handle,
        modulo: c_int,
        res: choco_handle,
    ) -> choco_handle;

    pub fn mod_iv_iv_iv(
        model: choco_handle,
        x: choco_handle,
        modulo: choco_handle,
        res: choco_handle,
    ) -> choco_handle;

    pub fn not_(model: choco_handle, constraint: choco_handle) -> choco_handle;

    pub fn absolute(model: choco_handle, x: choco_handle, y: choco_handle) -> choco_handle;

    pub fn distance_iv_iv_i(
        model: choco_handle,
        x: choco_handle,
        y: choco_handle,
        op: *const c_char,
        cst: c_int,
    ) -> choco_handle;

    pub fn distance_iv_iv_iv(
        model: choco_handle,
        x: choco_handle,
        y: choco_handle,
        op: *const c_char,
        z: choco_handle,
    ) -> choco_handle;

    pub fn element_iv_iarray_iv_i(
        model: choco_handle,
        value: choco_handle,
        table: choco_handle,
        index: choco_handle,
        offset: c_int,
    ) -> choco_handle;

    pub fn element_iv_ivarray_iv_i(
        model: choco_handle,
        value: choco_handle,
        table: choco_handle,
        index: choco_handle,
        offset: c_int,
    ) -> choco_handle;

    pub fn square(model: choco_handle, x: choco_handle, y: choco_handle) -> choco_handle;

    pub fn times_iv_i_iv(
        model: choco_handle,
        x: choco_handle,
        y: c_int,
        z: choco_handle,
    ) -> choco_handle;

    pub fn times_iv_iv_i(
        model: choco_handle,
        x: choco_handle,
        y: choco_handle,
        z: c_int,
    ) -> choco_handle;

    pub fn times_iv_iv_iv(
        model: choco_handle,
        x: choco_handle,
        y: choco_handle,
        z: choco_handle,
    ) -> choco_handle;

    pub fn div_(
        model: choco_handle,
        dividend: choco_handle,
        divisor: choco_handle,
        result: choco_handle,
    ) -> choco_handle;

    pub fn max_iv_iv_iv(
        model: choco_handle,
        x: choco_handle,
        y: choco_handle,
        z: choco_handle,
    ) -> choco_handle;

    pub fn max_iv_ivarray(model: choco_handle, x: choco_handle, vars: choco_handle)
        -> choco_handle;

    pub fn min_iv_iv_iv(
        model: choco_handle,
        x: choco_handle,
        y: choco_handle,
        z: choco_handle,
    ) -> choco_handle;

    pub fn min_iv_ivarray(model: choco_handle, x: choco_handle, vars: choco_handle)
        -> choco_handle;

    pub fn all_equal(model: choco_handle, vars: choco_handle) -> choco_handle;

    pub fn not_all_equal(model: choco_handle, vars: choco_handle) -> choco_handle;

    pub fn among(
        model: choco_handle,
        nb_var: choco_handle,
        vars: choco_handle,
        values: choco_handle,
    ) -> choco_handle;

    pub fn and_bv_bv(model: choco_handle, bools: choco_handle) -> choco_handle;

    pub fn or_bv_bv(model: choco_handle, bools: choco_handle) -> choco_handle;

    pub fn count_i(
        model: choco_handle,
        value: c_int,
        vars: choco_handle,
        limit: choco_handle,
    ) -> choco_handle;

    pub fn count_iv(
        model: choco_handle,
        value: choco_handle,
        vars: choco_handle,
        limit: choco_handle,
    ) -> choco_handle;

    pub fn n_values(model: choco_handle, vars: choco_handle, n_values: choco_handle)
        -> choco_handle;

    pub fn lex_less(model: choco_handle, vars1: choco_handle, vars2: choco_handle)
        -> choco_handle;

    pub fn lex_less_eq(
        model: choco_handle,
        vars1: choco_handle,
        vars2: choco_handle,
    ) -> choco_handle;

    pub fn argmax(
        model: choco_handle,
        z: choco_handle,
        offset: c_int,
        vars: choco_handle,
    ) -> choco_handle;

    pub fn argmin(
        model: choco_handle,
        z: choco_handle,
        offset: c_int,
        vars: choco_handle,
    ) -> choco_handle;

    pub fn scalar_i(
        model: choco_handle,
        vars: choco_handle,
        coeffs: choco_handle,
        op: *const c_char,
        cst: c_int,
    ) -> choco_handle;

    pub fn scalar_iv(
        model: choco_handle,
        vars: choco_handle,
        coeffs: choco_handle,
        op: *const c_char,
        z: choco_handle,
    ) -> choco_handle;

    pub fn sum_iv_i(
        model: choco_handle,
        vars: choco_handle,
        op: *const c_char,
        cst: c_int,
    ) -> choco_handle;

    pub fn sum_iv_iv(
        model: choco_handle,
        vars: choco_handle,
        op: *const c_char,
        z: choco_handle,
    ) -> choco_handle;

    pub fn sum_bv_i(
        model: choco_handle,
        bools: choco_handle,
        op: *const c_char,
        cst: c_int,
    ) -> choco_handle;

    pub fn sum_bv_iv(
        model: choco_handle,
        bools: choco_handle,
        op: *const c_char,
        z: choco_handle,
    ) -> choco_handle;

    // Array API

    pub fn create_intvar_array(size: c_int) -> choco_handle;

    pub fn intvar_array_length(array: choco_handle) -> c_int;

    pub fn intvar_array_set(array: choco_handle, var: choco_handle, index: c_int);

    pub fn create_boolvar_array(size: c_int) -> choco_handle;

    pub fn boolvar_array_set(array: choco_handle, var: choco_handle, index: c_int);

    pub fn create_constraint_array(size: c_int) -> choco_handle;

    pub fn constraint_array_set(array: choco_handle, constraint: choco_handle, index: c_int);

    pub fn create_int_array(size: c_int) -> choco_handle;

    pub fn int_array_length(array: choco_handle) -> c_int;

    pub fn int_array_set(array: choco_handle, value: c_int, index: c_int);

    pub fn create_criterion_array(size: c_int) -> choco_handle;

    pub fn criterion_array_set(array: choco_handle, criterion: choco_handle, index: c_int);

    pub fn array_length(array: choco_handle) -> c_int;

    // List API

    pub fn list_size(list: choco_handle) -> c_int;

    pub fn list_solution_get(list: choco_handle, index: c_int) -> choco_handle;

    // Search strategies

    pub fn set_random_search(solver: choco_handle, vars: choco_handle, seed: c_long);

    pub fn set_dom_over_w_deg_search(solver: choco_handle, vars: choco_handle);

    pub fn set_dom_over_w_deg_ref_search(solver: choco_handle, vars: choco_handle);

    pub fn set_activity_based_search(solver: choco_handle, vars: choco_handle);

    pub fn set_min_dom_lb_search(solver: choco_handle, vars: choco_handle);

    pub fn set_min_dom_ub_search(solver: choco_handle, vars: choco_handle);

    pub fn set_conflict_history_search(solver: choco_handle, vars: choco_handle);

    pub fn set_default_search(solver: choco_handle);

    pub fn set_input_order_lb_search(solver: choco_handle, vars: choco_handle);

    pub fn set_input_order_ub_search(solver: choco_handle, vars: choco_handle);

    pub fn set_failure_length_based_search(solver: choco_handle, vars: choco_handle);

    pub fn set_failure_rate_based_search(solver: choco_handle, vars: choco_handle);

    // Parallel portfolio

    pub fn create_parallel_portfolio(search_auto_conf: bool) -> choco_handle;

    pub fn steal_nogoods_on_restarts(portfolio: choco_handle);

    pub fn add_model(portfolio: choco_handle, model: choco_handle, reliable: bool);

    pub fn pf_solve(portfolio: choco_handle) -> bool;

    pub fn get_best_model(portfolio: choco_handle) -> choco_handle;

    pub fn get_best_solution(portfolio: choco_handle) -> choco_handle;
}
