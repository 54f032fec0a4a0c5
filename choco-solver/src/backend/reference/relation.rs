//! The relations the reference engine checks during search.
//!
//! A relation is evaluated against a partial assignment. It reports `None` while it cannot be
//! decided yet, which for most relations means that part of its scope is unassigned.

use fnv::FnvHashSet;

use crate::constraints::Operator;

/// Index of a variable in its model.
pub(super) type VarId = usize;

/// A partial assignment, indexed by [`VarId`].
pub(super) type Assignment = [Option<i32>];

/// A constant or a variable operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Term {
    Const(i64),
    Var(VarId),
}

impl Term {
    fn value(self, assignment: &Assignment) -> Option<i64> {
        match self {
            Term::Const(value) => Some(value),
            Term::Var(var) => assignment.get(var).copied().flatten().map(i64::from),
        }
    }

    fn collect_scope(self, scope: &mut Vec<VarId>) {
        if let Term::Var(var) = self {
            scope.push(var);
        }
    }
}

#[derive(Clone, Debug)]
pub(super) enum Relation {
    /// `x op y`
    Compare { x: Term, op: Operator, y: Term },
    /// `x op1 y op2 z`, one operator being a comparison
    Arithm3 {
        x: Term,
        op1: Operator,
        y: Term,
        op2: Operator,
        z: Term,
    },
    Member {
        x: VarId,
        values: FnvHashSet<i32>,
        negated: bool,
    },
    InRange {
        x: VarId,
        lb: i32,
        ub: i32,
        negated: bool,
    },
    AllDifferent(Vec<VarId>),
    AllEqual(Vec<VarId>),
    NotAllEqual(Vec<VarId>),
    /// `x % modulo = res`
    Modulo { x: Term, modulo: Term, res: Term },
    Not(Box<Relation>),
    /// `x = |y|`
    Absolute { x: VarId, y: VarId },
    /// `|x - y| op z`
    Distance {
        x: VarId,
        y: VarId,
        op: Operator,
        z: Term,
    },
    /// `value = table[index - offset]`
    Element {
        value: VarId,
        table: Vec<Term>,
        index: VarId,
        offset: i32,
    },
    /// `x * y = z`
    Times { x: Term, y: Term, z: Term },
    Div {
        dividend: VarId,
        divisor: VarId,
        result: VarId,
    },
    Max { x: VarId, vars: Vec<VarId> },
    Min { x: VarId, vars: Vec<VarId> },
    Among {
        nb_var: VarId,
        vars: Vec<VarId>,
        values: FnvHashSet<i32>,
    },
    And(Vec<VarId>),
    Or(Vec<VarId>),
    Count {
        value: Term,
        vars: Vec<VarId>,
        limit: VarId,
    },
    NValues { vars: Vec<VarId>, n_values: VarId },
    /// `sum(coeffs[i] * vars[i]) op rhs`
    Scalar {
        vars: Vec<VarId>,
        coeffs: Vec<i64>,
        op: Operator,
        rhs: Term,
    },
    Lex {
        vars1: Vec<VarId>,
        vars2: Vec<VarId>,
        strict: bool,
    },
    Arg {
        z: VarId,
        offset: i32,
        vars: Vec<VarId>,
        maximum: bool,
    },
    /// `b <=> inner`, the result of reifying a constraint
    Equivalent { b: VarId, inner: Box<Relation> },
}

fn values_of(vars: &[VarId], assignment: &Assignment) -> Option<Vec<i64>> {
    vars.iter()
        .map(|&var| Term::Var(var).value(assignment))
        .collect()
}

impl Relation {
    /// Every variable the relation depends on, possibly with repetitions.
    pub(super) fn scope(&self) -> Vec<VarId> {
        let mut scope = Vec::new();
        match self {
            Relation::Compare { x, y, .. } => {
                x.collect_scope(&mut scope);
                y.collect_scope(&mut scope);
            }
            Relation::Arithm3 { x, y, z, .. }
            | Relation::Modulo {
                x,
                modulo: y,
                res: z,
            }
            | Relation::Times { x, y, z } => {
                x.collect_scope(&mut scope);
                y.collect_scope(&mut scope);
                z.collect_scope(&mut scope);
            }
            Relation::Member { x, .. } | Relation::InRange { x, .. } => scope.push(*x),
            Relation::AllDifferent(vars)
            | Relation::AllEqual(vars)
            | Relation::NotAllEqual(vars)
            | Relation::And(vars)
            | Relation::Or(vars) => scope.extend(vars),
            Relation::Not(inner) => scope = inner.scope(),
            Relation::Absolute { x, y } => scope.extend([*x, *y]),
            Relation::Distance { x, y, z, .. } => {
                scope.extend([*x, *y]);
                z.collect_scope(&mut scope);
            }
            Relation::Element {
                value,
                table,
                index,
                ..
            } => {
                scope.extend([*value, *index]);
                table.iter().for_each(|term| term.collect_scope(&mut scope));
            }
            Relation::Div {
                dividend,
                divisor,
                result,
            } => scope.extend([*dividend, *divisor, *result]),
            Relation::Max { x, vars } | Relation::Min { x, vars } => {
                scope.push(*x);
                scope.extend(vars);
            }
            Relation::Among { nb_var, vars, .. } => {
                scope.push(*nb_var);
                scope.extend(vars);
            }
            Relation::Count { value, vars, limit } => {
                value.collect_scope(&mut scope);
                scope.extend(vars);
                scope.push(*limit);
            }
            Relation::NValues { vars, n_values } => {
                scope.extend(vars);
                scope.push(*n_values);
            }
            Relation::Scalar { vars, rhs, .. } => {
                scope.extend(vars);
                rhs.collect_scope(&mut scope);
            }
            Relation::Lex { vars1, vars2, .. } => {
                scope.extend(vars1);
                scope.extend(vars2);
            }
            Relation::Arg { z, vars, .. } => {
                scope.push(*z);
                scope.extend(vars);
            }
            Relation::Equivalent { b, inner } => {
                scope = inner.scope();
                scope.push(*b);
            }
        }
        scope
    }

    /// Whether the relation is satisfied by `assignment`, or `None` if that cannot be decided
    /// yet.
    pub(super) fn evaluate(&self, assignment: &Assignment) -> Option<bool> {
        match self {
            Relation::Compare { x, op, y } => {
                Some(op.compare(x.value(assignment)?, y.value(assignment)?))
            }
            Relation::Arithm3 { x, op1, y, op2, z } => {
                let (x, y, z) = (
                    x.value(assignment)?,
                    y.value(assignment)?,
                    z.value(assignment)?,
                );
                let holds = if op1.is_comparison() {
                    op2.apply(y, z).is_some_and(|rhs| op1.compare(x, rhs))
                } else {
                    op1.apply(x, y).is_some_and(|lhs| op2.compare(lhs, z))
                };
                Some(holds)
            }
            Relation::Member {
                x,
                values,
                negated,
            } => {
                let value = assignment.get(*x).copied().flatten()?;
                Some(values.contains(&value) != *negated)
            }
            Relation::InRange {
                x,
                lb,
                ub,
                negated,
            } => {
                let value = assignment.get(*x).copied().flatten()?;
                Some((*lb..=*ub).contains(&value) != *negated)
            }
            Relation::AllDifferent(vars) => {
                // Decided as soon as two assigned variables collide.
                let mut seen = FnvHashSet::default();
                let mut complete = true;
                for &var in vars {
                    match assignment.get(var).copied().flatten() {
                        Some(value) => {
                            if !seen.insert(value) {
                                return Some(false);
                            }
                        }
                        None => complete = false,
                    }
                }
                complete.then_some(true)
            }
            Relation::AllEqual(vars) => {
                let values = values_of(vars, assignment)?;
                Some(values.windows(2).all(|pair| pair[0] == pair[1]))
            }
            Relation::NotAllEqual(vars) => {
                let values = values_of(vars, assignment)?;
                Some(values.windows(2).any(|pair| pair[0] != pair[1]))
            }
            Relation::Modulo { x, modulo, res } => {
                let (x, modulo, res) = (
                    x.value(assignment)?,
                    modulo.value(assignment)?,
                    res.value(assignment)?,
                );
                Some(x.checked_rem(modulo) == Some(res))
            }
            Relation::Not(inner) => inner.evaluate(assignment).map(|holds| !holds),
            Relation::Absolute { x, y } => {
                let (x, y) = (
                    Term::Var(*x).value(assignment)?,
                    Term::Var(*y).value(assignment)?,
                );
                Some(x == y.abs())
            }
            Relation::Distance { x, y, op, z } => {
                let (x, y, z) = (
                    Term::Var(*x).value(assignment)?,
                    Term::Var(*y).value(assignment)?,
                    z.value(assignment)?,
                );
                Some(op.compare((x - y).abs(), z))
            }
            Relation::Element {
                value,
                table,
                index,
                offset,
            } => {
                let value = Term::Var(*value).value(assignment)?;
                let index = Term::Var(*index).value(assignment)? - i64::from(*offset);
                let Some(entry) = usize::try_from(index).ok().and_then(|i| table.get(i)) else {
                    return Some(false);
                };
                Some(entry.value(assignment)? == value)
            }
            Relation::Times { x, y, z } => {
                let (x, y, z) = (
                    x.value(assignment)?,
                    y.value(assignment)?,
                    z.value(assignment)?,
                );
                Some(x.checked_mul(y) == Some(z))
            }
            Relation::Div {
                dividend,
                divisor,
                result,
            } => {
                let values = values_of(&[*dividend, *divisor, *result], assignment)?;
                Some(values[0].checked_div(values[1]) == Some(values[2]))
            }
            Relation::Max { x, vars } => {
                let x = Term::Var(*x).value(assignment)?;
                let values = values_of(vars, assignment)?;
                Some(values.into_iter().max() == Some(x))
            }
            Relation::Min { x, vars } => {
                let x = Term::Var(*x).value(assignment)?;
                let values = values_of(vars, assignment)?;
                Some(values.into_iter().min() == Some(x))
            }
            Relation::Among {
                nb_var,
                vars,
                values,
            } => {
                let nb_var = Term::Var(*nb_var).value(assignment)?;
                let assigned = values_of(vars, assignment)?;
                let count = assigned
                    .iter()
                    .filter(|&&value| i32::try_from(value).is_ok_and(|v| values.contains(&v)))
                    .count();
                Some(i64::try_from(count).is_ok_and(|count| count == nb_var))
            }
            Relation::And(bools) => {
                let values = values_of(bools, assignment)?;
                Some(values.iter().all(|&value| value == 1))
            }
            Relation::Or(bools) => {
                let values = values_of(bools, assignment)?;
                Some(values.iter().any(|&value| value == 1))
            }
            Relation::Count { value, vars, limit } => {
                let value = value.value(assignment)?;
                let limit = Term::Var(*limit).value(assignment)?;
                let values = values_of(vars, assignment)?;
                let count = values.iter().filter(|&&v| v == value).count();
                Some(i64::try_from(count).is_ok_and(|count| count == limit))
            }
            Relation::NValues { vars, n_values } => {
                let n_values = Term::Var(*n_values).value(assignment)?;
                let values = values_of(vars, assignment)?;
                let distinct = values.into_iter().collect::<FnvHashSet<_>>().len();
                Some(i64::try_from(distinct).is_ok_and(|distinct| distinct == n_values))
            }
            Relation::Scalar {
                vars,
                coeffs,
                op,
                rhs,
            } => {
                let rhs = rhs.value(assignment)?;
                let values = values_of(vars, assignment)?;
                let sum = values
                    .iter()
                    .zip(coeffs)
                    .map(|(&value, &coeff)| i128::from(value) * i128::from(coeff))
                    .sum::<i128>();
                // The right-hand side is an i32, so a saturated sum compares the same way.
                let saturated = if sum < 0 { i64::MIN } else { i64::MAX };
                let sum = i64::try_from(sum).unwrap_or(saturated);
                Some(op.compare(sum, rhs))
            }
            Relation::Lex {
                vars1,
                vars2,
                strict,
            } => {
                let values1 = values_of(vars1, assignment)?;
                let values2 = values_of(vars2, assignment)?;
                Some(if *strict {
                    values1 < values2
                } else {
                    values1 <= values2
                })
            }
            Relation::Arg {
                z,
                offset,
                vars,
                maximum,
            } => {
                let z = Term::Var(*z).value(assignment)?;
                let values = values_of(vars, assignment)?;
                let best = if *maximum {
                    values.iter().max()
                } else {
                    values.iter().min()
                };
                let first = best.and_then(|best| values.iter().position(|value| value == best));
                let first = first.and_then(|index| i64::try_from(index).ok());
                Some(first == Some(z - i64::from(*offset)))
            }
            Relation::Equivalent { b, inner } => {
                let b = Term::Var(*b).value(assignment)?;
                inner.evaluate(assignment).map(|holds| holds == (b == 1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use fnv::FnvHashSet;

    use super::Relation;
    use super::Term;
    use crate::constraints::Operator;

    #[test]
    fn all_different_fails_on_partial_collision() {
        let relation = Relation::AllDifferent(vec![0, 1, 2]);
        assert_eq!(relation.evaluate(&[Some(1), Some(1), None]), Some(false));
        assert_eq!(relation.evaluate(&[Some(1), Some(2), None]), None);
        assert_eq!(relation.evaluate(&[Some(1), Some(2), Some(0)]), Some(true));
    }

    #[test]
    fn arithm3_puts_the_arithmetic_on_the_right_side() {
        // x = y + z
        let relation = Relation::Arithm3 {
            x: Term::Var(0),
            op1: Operator::Eq,
            y: Term::Var(1),
            op2: Operator::Plus,
            z: Term::Const(2),
        };
        assert_eq!(relation.evaluate(&[Some(5), Some(3)]), Some(true));
        assert_eq!(relation.evaluate(&[Some(5), Some(4)]), Some(false));

        // x - y >= z
        let relation = Relation::Arithm3 {
            x: Term::Var(0),
            op1: Operator::Minus,
            y: Term::Var(1),
            op2: Operator::Ge,
            z: Term::Const(2),
        };
        assert_eq!(relation.evaluate(&[Some(5), Some(3)]), Some(true));
        assert_eq!(relation.evaluate(&[Some(5), None]), None);
    }

    #[test]
    fn element_outside_the_table_does_not_hold() {
        let relation = Relation::Element {
            value: 0,
            table: vec![Term::Const(4), Term::Const(8)],
            index: 1,
            offset: 1,
        };
        assert_eq!(relation.evaluate(&[Some(8), Some(2)]), Some(true));
        assert_eq!(relation.evaluate(&[Some(4), Some(0)]), Some(false));
        assert_eq!(relation.evaluate(&[Some(4), Some(3)]), Some(false));
    }

    #[test]
    fn argmax_points_at_the_first_maximum() {
        let relation = Relation::Arg {
            z: 0,
            offset: 0,
            vars: vec![1, 2, 3],
            maximum: true,
        };
        assert_eq!(
            relation.evaluate(&[Some(1), Some(2), Some(5), Some(5)]),
            Some(true)
        );
        assert_eq!(
            relation.evaluate(&[Some(2), Some(2), Some(5), Some(5)]),
            Some(false)
        );
    }

    #[test]
    fn reification_follows_the_inner_relation() {
        let relation = Relation::Equivalent {
            b: 1,
            inner: Box::new(Relation::Member {
                x: 0,
                values: FnvHashSet::from_iter([1, 3]),
                negated: false,
            }),
        };
        assert_eq!(relation.evaluate(&[Some(3), Some(1)]), Some(true));
        assert_eq!(relation.evaluate(&[Some(2), Some(1)]), Some(false));
        assert_eq!(relation.evaluate(&[Some(2), Some(0)]), Some(true));
        assert_eq!(relation.evaluate(&[Some(2), None]), None);
    }

    #[test]
    fn division_by_zero_does_not_hold() {
        let relation = Relation::Div {
            dividend: 0,
            divisor: 1,
            result: 2,
        };
        assert_eq!(relation.evaluate(&[Some(7), Some(2), Some(3)]), Some(true));
        assert_eq!(relation.evaluate(&[Some(7), Some(0), Some(0)]), Some(false));
    }

    #[test]
    fn scalar_products_beyond_i64_do_not_overflow() {
        let max = i64::from(i32::MAX);
        let relation = |op| Relation::Scalar {
            vars: vec![0, 1, 2],
            coeffs: vec![max; 3],
            op,
            rhs: Term::Const(0),
        };
        let assignment = [Some(i32::MAX); 3];
        assert_eq!(relation(Operator::Ge).evaluate(&assignment), Some(true));
        assert_eq!(relation(Operator::Eq).evaluate(&assignment), Some(false));

        let assignment = [Some(i32::MIN); 3];
        assert_eq!(relation(Operator::Lt).evaluate(&assignment), Some(true));
    }
}
