#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use choco_solver::backend::BackendError;
use choco_solver::prelude::*;
use helpers::values;

fn count_solutions(model: &Model) -> usize {
    model
        .solver()
        .unwrap()
        .find_all_solutions(&SearchLimits::default())
        .unwrap()
        .len()
}

#[test]
fn operators_parse_from_their_notation() {
    for (text, operator) in [
        ("=", Operator::Eq),
        ("!=", Operator::Ne),
        ("<", Operator::Lt),
        (">", Operator::Gt),
        ("<=", Operator::Le),
        (">=", Operator::Ge),
        ("+", Operator::Plus),
        ("-", Operator::Minus),
        ("*", Operator::Times),
        ("/", Operator::Div),
    ] {
        assert_eq!(text.parse::<Operator>().unwrap(), operator);
        assert_eq!(operator.to_string(), text);
    }
    assert!(matches!(
        "==".parse::<Operator>(),
        Err(ChocoError::InvalidOperator(op)) if op == "=="
    ));
}

#[test]
fn element_selects_from_a_table() {
    let model = Runtime::reference().create_model(None).unwrap();
    let index = model.intvar(0, 10).unwrap();
    let value = model.intvar(0, 100).unwrap();
    model
        .element(&value, &[10, 40, 20, 40], &index, 1)
        .unwrap()
        .post()
        .unwrap();
    model.arithm(&value, Operator::Eq, 40).unwrap().post().unwrap();

    let mut solver = model.solver().unwrap();
    let indices = solver
        .find_all_solutions(&SearchLimits::default())
        .unwrap()
        .iter()
        .map(|solution| solution.int_value(&index).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(indices, vec![2, 4]);
}

#[test]
fn element_over_variables() {
    let model = Runtime::reference().create_model(None).unwrap();
    let table = [
        model.constant(7).unwrap(),
        model.constant(3).unwrap(),
        model.constant(9).unwrap(),
    ];
    let index = model.intvar(0, 2).unwrap();
    let value = model.intvar(0, 5).unwrap();
    model
        .element_vars(&value, &table, &index, 0)
        .unwrap()
        .post()
        .unwrap();

    let mut solver = model.solver().unwrap();
    let solution = solver
        .find_solution(&SearchLimits::default())
        .unwrap()
        .unwrap();
    assert_eq!(values(&solution, &[index, value]), vec![1, 3]);
}

#[test]
fn modulo_division_and_minimum() {
    let model = Runtime::reference().create_model(None).unwrap();
    let x = model.intvar(0, 20).unwrap();
    let q = model.intvar(0, 20).unwrap();
    let four = model.constant(4).unwrap();
    let low = model.intvar(0, 20).unwrap();

    model.modulo(&x, 4, 3).unwrap().post().unwrap();
    model.div(&x, &four, &q).unwrap().post().unwrap();
    model.arithm(&q, Operator::Eq, 2).unwrap().post().unwrap();
    model.min(&low, &x, &q).unwrap().post().unwrap();

    let mut solver = model.solver().unwrap();
    let solution = solver
        .find_solution(&SearchLimits::default())
        .unwrap()
        .unwrap();
    assert_eq!(values(&solution, &[x, q, low]), vec![11, 2, 2]);
}

#[test]
fn counting_constraints() {
    let model = Runtime::reference().create_model(None).unwrap();
    let vars = model.intvars(3, 0, 2).unwrap();
    let two = model.constant(2).unwrap();

    model.count(2, &vars, &two).unwrap().post().unwrap();
    assert_eq!(count_solutions(&model), 6);

    model.n_values(&vars, &two).unwrap().post().unwrap();
    assert_eq!(count_solutions(&model), 6);

    let one = model.constant(1).unwrap();
    model.among(&one, &vars, &[0]).unwrap().post().unwrap();
    assert_eq!(count_solutions(&model), 3);
}

#[test]
fn count_of_a_variable_value() {
    let model = Runtime::reference().create_model(None).unwrap();
    let vars = model.intvars(3, 0, 1).unwrap();
    let value = model.intvar(0, 1).unwrap();
    let limit = model.constant(3).unwrap();
    model
        .count_var(&value, &vars, &limit)
        .unwrap()
        .post()
        .unwrap();
    assert_eq!(count_solutions(&model), 2);
}

#[test]
fn equality_of_many_variables() {
    let equal = Runtime::reference().create_model(None).unwrap();
    let vars = equal.intvars(3, 0, 1).unwrap();
    equal.all_equal(&vars).unwrap().post().unwrap();
    assert_eq!(count_solutions(&equal), 2);

    let unequal = Runtime::reference().create_model(None).unwrap();
    let vars = unequal.intvars(3, 0, 1).unwrap();
    unequal.not_all_equal(&vars).unwrap().post().unwrap();
    assert_eq!(count_solutions(&unequal), 6);
}

#[test]
fn ranges_and_exclusions() {
    let model = Runtime::reference().create_model(None).unwrap();
    let x = model.intvar(0, 9).unwrap();
    model.member_range(&x, 2, 7).unwrap().post().unwrap();
    model.not_member_range(&x, 4, 5).unwrap().post().unwrap();
    model.not_member(&x, &[6]).unwrap().post().unwrap();

    let mut solver = model.solver().unwrap();
    let found = solver
        .find_all_solutions(&SearchLimits::default())
        .unwrap()
        .iter()
        .map(|solution| solution.int_value(&x).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(found, vec![2, 3, 7]);
}

#[test]
fn sums_of_booleans_and_variables() {
    let model = Runtime::reference().create_model(None).unwrap();
    let bools = model.boolvars(4).unwrap();
    model
        .sum_bools(&bools, Operator::Eq, 2)
        .unwrap()
        .post()
        .unwrap();
    assert_eq!(count_solutions(&model), 6);

    let model = Runtime::reference().create_model(None).unwrap();
    let vars = model.intvars(2, 0, 3).unwrap();
    let total = model.intvar(0, 1).unwrap();
    model
        .sum(&vars, Operator::Eq, &total)
        .unwrap()
        .post()
        .unwrap();
    assert_eq!(count_solutions(&model), 3);
}

#[test]
fn lexicographic_ordering() {
    let model = Runtime::reference().create_model(None).unwrap();
    let x = model.intvars(1, 0, 2).unwrap();
    let y = model.intvars(1, 0, 2).unwrap();
    model.lex_less_eq(&x, &y).unwrap().post().unwrap();
    assert_eq!(count_solutions(&model), 6);
}

#[test]
fn argmin_points_at_the_first_minimum() {
    let model = Runtime::reference().create_model(None).unwrap();
    let vars = [
        model.constant(4).unwrap(),
        model.constant(1).unwrap(),
        model.constant(1).unwrap(),
    ];
    let index = model.intvar(0, 10).unwrap();
    let low = model.intvar(0, 10).unwrap();
    model.argmin(&index, 5, &vars).unwrap().post().unwrap();
    model.min_of(&low, &vars).unwrap().post().unwrap();

    let mut solver = model.solver().unwrap();
    let solution = solver
        .find_solution(&SearchLimits::default())
        .unwrap()
        .unwrap();
    assert_eq!(values(&solution, &[index, low]), vec![6, 1]);
}

#[test]
fn reified_constraints_can_be_combined() {
    let model = Runtime::reference().create_model(None).unwrap();
    let x = model.intvar(0, 5).unwrap();
    let low = model.arithm(&x, Operator::Lt, 2).unwrap().reify().unwrap();
    let high = model.arithm(&x, Operator::Gt, 3).unwrap().reify().unwrap();
    model.or(&[low, high]).unwrap().post().unwrap();

    let mut solver = model.solver().unwrap();
    let found = solver
        .find_all_solutions(&SearchLimits::default())
        .unwrap()
        .iter()
        .map(|solution| solution.int_value(&x).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(found, vec![0, 1, 4, 5]);
}

#[test]
fn invalid_arguments_are_rejected_before_forwarding() {
    let model = Runtime::reference().create_model(None).unwrap();
    let vars = model.intvars(2, 0, 3).unwrap();

    assert!(matches!(
        model.arithm(&vars[0], Operator::Times, &vars[1]),
        Err(ChocoError::InvalidOperatorCombination(_))
    ));
    assert!(matches!(
        model.scalar(&vars, &[1, 2, 3], Operator::Le, 5),
        Err(ChocoError::LengthMismatch {
            expected: 2,
            actual: 3
        })
    ));
    assert!(matches!(
        model.lex_less_eq(&vars, &vars[1..]),
        Err(ChocoError::LengthMismatch { .. })
    ));
    assert!(matches!(
        model.named_intvar("x\0y", 0, 1),
        Err(ChocoError::InvalidString(_))
    ));
}

#[test]
fn variables_of_another_model_are_rejected() {
    let runtime = Runtime::reference();
    let model = runtime.create_model(None).unwrap();
    let other = runtime.create_model(None).unwrap();
    let x = model.intvar(0, 3).unwrap();
    let y = other.intvar(0, 3).unwrap();

    assert!(matches!(
        model.arithm(&x, Operator::Lt, &y),
        Err(ChocoError::Backend(BackendError::ForeignObject))
    ));
}
