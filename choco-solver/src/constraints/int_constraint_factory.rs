use super::Constraint;
use super::Operand;
use super::Operator;
use crate::backend::ConstraintCall;
use crate::error::ChocoError;
use crate::error::ChocoResult;
use crate::marshal::bool_var_array;
use crate::marshal::int_array;
use crate::marshal::int_var_array;
use crate::marshal::var_handle;
use crate::model::Model;
use crate::runtime::NativeHandle;
use crate::variables::BoolVar;
use crate::variables::IntVar;
use crate::variables::VariableFactory;

/// The integer constraints a [`Model`] can create.
///
/// Operator arguments are validated before anything is forwarded to the backend; an operator
/// which does not fit the constraint yields [`ChocoError::InvalidOperatorCombination`].
pub trait IntConstraintFactory {
    /// Creates the constraint `x op y`, where `op` is a comparison.
    fn arithm<'a>(
        &self,
        x: &impl AsRef<IntVar>,
        op: Operator,
        y: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint `x op1 y op2 z`; exactly one of the two operators is a comparison,
    /// e.g. `x + y = z` or `x = y * z`.
    fn arithm3<'a>(
        &self,
        x: &impl AsRef<IntVar>,
        op1: Operator,
        y: &impl AsRef<IntVar>,
        op2: Operator,
        z: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint `x ∈ table`.
    fn member(&self, x: &impl AsRef<IntVar>, table: &[i32]) -> ChocoResult<Constraint>;
    /// Creates the constraint `lb <= x <= ub`.
    fn member_range(&self, x: &impl AsRef<IntVar>, lb: i32, ub: i32) -> ChocoResult<Constraint>;
    fn not_member(&self, x: &impl AsRef<IntVar>, table: &[i32]) -> ChocoResult<Constraint>;
    fn not_member_range(
        &self,
        x: &impl AsRef<IntVar>,
        lb: i32,
        ub: i32,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint `x % modulo = res`.
    fn modulo<'a>(
        &self,
        x: &impl AsRef<IntVar>,
        modulo: impl Into<Operand<'a>>,
        res: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint `x = |y|`.
    fn absolute(&self, x: &impl AsRef<IntVar>, y: &impl AsRef<IntVar>) -> ChocoResult<Constraint>;

    /// Creates the constraint `|x - y| op z`, where `op` is one of `=`, `!=`, `<` and `>`.
    fn distance<'a>(
        &self,
        x: &impl AsRef<IntVar>,
        y: &impl AsRef<IntVar>,
        op: Operator,
        z: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint `value = table[index - offset]`.
    fn element(
        &self,
        value: &impl AsRef<IntVar>,
        table: &[i32],
        index: &impl AsRef<IntVar>,
        offset: i32,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint `value = table[index - offset]` over a table of variables.
    fn element_vars(
        &self,
        value: &impl AsRef<IntVar>,
        table: &[impl AsRef<IntVar>],
        index: &impl AsRef<IntVar>,
        offset: i32,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint `x = y²`.
    fn square(&self, x: &impl AsRef<IntVar>, y: &impl AsRef<IntVar>) -> ChocoResult<Constraint>;

    /// Creates the constraint `x * y = z`.
    fn times<'a>(
        &self,
        x: &impl AsRef<IntVar>,
        y: impl Into<Operand<'a>>,
        z: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint `dividend / divisor = result`, rounding towards zero.
    fn div(
        &self,
        dividend: &impl AsRef<IntVar>,
        divisor: &impl AsRef<IntVar>,
        result: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint `x = max(y, z)`.
    fn max(
        &self,
        x: &impl AsRef<IntVar>,
        y: &impl AsRef<IntVar>,
        z: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint>;
    fn max_of(&self, x: &impl AsRef<IntVar>, vars: &[impl AsRef<IntVar>])
        -> ChocoResult<Constraint>;
    fn min(
        &self,
        x: &impl AsRef<IntVar>,
        y: &impl AsRef<IntVar>,
        z: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint>;
    fn min_of(&self, x: &impl AsRef<IntVar>, vars: &[impl AsRef<IntVar>])
        -> ChocoResult<Constraint>;

    fn all_different(&self, vars: &[impl AsRef<IntVar>]) -> ChocoResult<Constraint>;
    fn all_equal(&self, vars: &[impl AsRef<IntVar>]) -> ChocoResult<Constraint>;
    fn not_all_equal(&self, vars: &[impl AsRef<IntVar>]) -> ChocoResult<Constraint>;

    /// Creates the constraint stating that `nb_var` variables of `vars` take a value of `values`.
    fn among(
        &self,
        nb_var: &impl AsRef<IntVar>,
        vars: &[impl AsRef<IntVar>],
        values: &[i32],
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint stating that `limit` variables of `vars` are equal to `value`.
    fn count(
        &self,
        value: i32,
        vars: &[impl AsRef<IntVar>],
        limit: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint>;
    fn count_var(
        &self,
        value: &impl AsRef<IntVar>,
        vars: &[impl AsRef<IntVar>],
        limit: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint stating that `vars` take exactly `n_values` distinct values.
    fn n_values(
        &self,
        vars: &[impl AsRef<IntVar>],
        n_values: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint `Σ coeffs[i] * vars[i] op rhs`.
    fn scalar<'a>(
        &self,
        vars: &[impl AsRef<IntVar>],
        coeffs: &[i32],
        op: Operator,
        rhs: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint `Σ vars[i] op rhs`.
    fn sum<'a>(
        &self,
        vars: &[impl AsRef<IntVar>],
        op: Operator,
        rhs: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint>;
    fn sum_bools<'a>(
        &self,
        bools: &[impl AsRef<BoolVar>],
        op: Operator,
        rhs: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint stating that `vars1` is lexicographically strictly smaller than
    /// `vars2`.
    fn lex_less(
        &self,
        vars1: &[impl AsRef<IntVar>],
        vars2: &[impl AsRef<IntVar>],
    ) -> ChocoResult<Constraint>;
    fn lex_less_eq(
        &self,
        vars1: &[impl AsRef<IntVar>],
        vars2: &[impl AsRef<IntVar>],
    ) -> ChocoResult<Constraint>;

    /// Creates the constraint stating that `z - offset` is the index of the first maximum of
    /// `vars`.
    fn argmax(
        &self,
        z: &impl AsRef<IntVar>,
        offset: i32,
        vars: &[impl AsRef<IntVar>],
    ) -> ChocoResult<Constraint>;
    fn argmin(
        &self,
        z: &impl AsRef<IntVar>,
        offset: i32,
        vars: &[impl AsRef<IntVar>],
    ) -> ChocoResult<Constraint>;
}

impl Model {
    fn var(&self, var: &impl AsRef<IntVar>) -> ChocoResult<NativeHandle> {
        var_handle(self, var.as_ref())
    }
}

fn ensure_same_length(expected: usize, actual: usize) -> ChocoResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ChocoError::LengthMismatch { expected, actual })
    }
}

impl IntConstraintFactory for Model {
    fn arithm<'a>(
        &self,
        x: &impl AsRef<IntVar>,
        op: Operator,
        y: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint> {
        let op = op.expect_comparison("arithm")?;
        let x = self.var(x)?;
        let call = match y.into() {
            Operand::Const(cst) => ConstraintCall::ArithmConst { x, op, cst },
            Operand::Var(y) => ConstraintCall::Arithm {
                x,
                op,
                y: self.var(y)?,
            },
        };
        self.new_constraint(&call)
    }

    fn arithm3<'a>(
        &self,
        x: &impl AsRef<IntVar>,
        op1: Operator,
        y: &impl AsRef<IntVar>,
        op2: Operator,
        z: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint> {
        if op1.is_comparison() == op2.is_comparison() {
            return Err(ChocoError::InvalidOperatorCombination(format!(
                "arithm requires one comparison and one arithmetic operator, got '{op1}' and \
                 '{op2}'"
            )));
        }
        let (x, y) = (self.var(x)?, self.var(y)?);
        let call = match z.into() {
            Operand::Const(cst) => ConstraintCall::Arithm3Const {
                x,
                op1,
                y,
                op2,
                cst,
            },
            Operand::Var(z) => ConstraintCall::Arithm3 {
                x,
                op1,
                y,
                op2,
                z: self.var(z)?,
            },
        };
        self.new_constraint(&call)
    }

    fn member(&self, x: &impl AsRef<IntVar>, table: &[i32]) -> ChocoResult<Constraint> {
        let table = int_array(self, table)?;
        self.new_constraint(&ConstraintCall::MemberTable {
            x: self.var(x)?,
            table: table.raw(),
        })
    }

    fn member_range(&self, x: &impl AsRef<IntVar>, lb: i32, ub: i32) -> ChocoResult<Constraint> {
        self.new_constraint(&ConstraintCall::MemberRange {
            x: self.var(x)?,
            lb,
            ub,
        })
    }

    fn not_member(&self, x: &impl AsRef<IntVar>, table: &[i32]) -> ChocoResult<Constraint> {
        let table = int_array(self, table)?;
        self.new_constraint(&ConstraintCall::NotMemberTable {
            x: self.var(x)?,
            table: table.raw(),
        })
    }

    fn not_member_range(
        &self,
        x: &impl AsRef<IntVar>,
        lb: i32,
        ub: i32,
    ) -> ChocoResult<Constraint> {
        self.new_constraint(&ConstraintCall::NotMemberRange {
            x: self.var(x)?,
            lb,
            ub,
        })
    }

    fn modulo<'a>(
        &self,
        x: &impl AsRef<IntVar>,
        modulo: impl Into<Operand<'a>>,
        res: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint> {
        let x = self.var(x)?;
        match (modulo.into(), res.into()) {
            (Operand::Const(modulo), Operand::Const(res)) => {
                self.new_constraint(&ConstraintCall::ModConst { x, modulo, res })
            }
            (Operand::Const(modulo), Operand::Var(res)) => {
                self.new_constraint(&ConstraintCall::ModConstVar {
                    x,
                    modulo,
                    res: self.var(res)?,
                })
            }
            (Operand::Var(modulo), Operand::Var(res)) => {
                self.new_constraint(&ConstraintCall::ModVar {
                    x,
                    modulo: self.var(modulo)?,
                    res: self.var(res)?,
                })
            }
            (Operand::Var(modulo), Operand::Const(res)) => {
                let res = self.constant(res)?;
                self.new_constraint(&ConstraintCall::ModVar {
                    x,
                    modulo: self.var(modulo)?,
                    res: res.raw(),
                })
            }
        }
    }

    fn absolute(&self, x: &impl AsRef<IntVar>, y: &impl AsRef<IntVar>) -> ChocoResult<Constraint> {
        self.new_constraint(&ConstraintCall::Absolute {
            x: self.var(x)?,
            y: self.var(y)?,
        })
    }

    fn distance<'a>(
        &self,
        x: &impl AsRef<IntVar>,
        y: &impl AsRef<IntVar>,
        op: Operator,
        z: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint> {
        if !matches!(
            op,
            Operator::Eq | Operator::Ne | Operator::Lt | Operator::Gt
        ) {
            return Err(ChocoError::InvalidOperatorCombination(format!(
                "distance accepts '=', '!=', '<' and '>', got '{op}'"
            )));
        }
        let (x, y) = (self.var(x)?, self.var(y)?);
        let call = match z.into() {
            Operand::Const(cst) => ConstraintCall::DistanceConst { x, y, op, cst },
            Operand::Var(z) => ConstraintCall::DistanceVar {
                x,
                y,
                op,
                z: self.var(z)?,
            },
        };
        self.new_constraint(&call)
    }

    fn element(
        &self,
        value: &impl AsRef<IntVar>,
        table: &[i32],
        index: &impl AsRef<IntVar>,
        offset: i32,
    ) -> ChocoResult<Constraint> {
        let table = int_array(self, table)?;
        self.new_constraint(&ConstraintCall::ElementConst {
            value: self.var(value)?,
            table: table.raw(),
            index: self.var(index)?,
            offset,
        })
    }

    fn element_vars(
        &self,
        value: &impl AsRef<IntVar>,
        table: &[impl AsRef<IntVar>],
        index: &impl AsRef<IntVar>,
        offset: i32,
    ) -> ChocoResult<Constraint> {
        let table = int_var_array(self, table)?;
        self.new_constraint(&ConstraintCall::ElementVar {
            value: self.var(value)?,
            table: table.raw(),
            index: self.var(index)?,
            offset,
        })
    }

    fn square(&self, x: &impl AsRef<IntVar>, y: &impl AsRef<IntVar>) -> ChocoResult<Constraint> {
        self.new_constraint(&ConstraintCall::Square {
            x: self.var(x)?,
            y: self.var(y)?,
        })
    }

    fn times<'a>(
        &self,
        x: &impl AsRef<IntVar>,
        y: impl Into<Operand<'a>>,
        z: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint> {
        let x = self.var(x)?;
        match (y.into(), z.into()) {
            (Operand::Var(y), Operand::Var(z)) => self.new_constraint(&ConstraintCall::Times {
                x,
                y: self.var(y)?,
                z: self.var(z)?,
            }),
            (Operand::Const(y), Operand::Var(z)) => {
                self.new_constraint(&ConstraintCall::TimesConstFactor {
                    x,
                    y,
                    z: self.var(z)?,
                })
            }
            (Operand::Var(y), Operand::Const(z)) => {
                self.new_constraint(&ConstraintCall::TimesConstResult {
                    x,
                    y: self.var(y)?,
                    z,
                })
            }
            (Operand::Const(y), Operand::Const(z)) => {
                let z = self.constant(z)?;
                self.new_constraint(&ConstraintCall::TimesConstFactor { x, y, z: z.raw() })
            }
        }
    }

    fn div(
        &self,
        dividend: &impl AsRef<IntVar>,
        divisor: &impl AsRef<IntVar>,
        result: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint> {
        self.new_constraint(&ConstraintCall::Div {
            dividend: self.var(dividend)?,
            divisor: self.var(divisor)?,
            result: self.var(result)?,
        })
    }

    fn max(
        &self,
        x: &impl AsRef<IntVar>,
        y: &impl AsRef<IntVar>,
        z: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint> {
        self.new_constraint(&ConstraintCall::Max {
            x: self.var(x)?,
            y: self.var(y)?,
            z: self.var(z)?,
        })
    }

    fn max_of(
        &self,
        x: &impl AsRef<IntVar>,
        vars: &[impl AsRef<IntVar>],
    ) -> ChocoResult<Constraint> {
        let vars = int_var_array(self, vars)?;
        self.new_constraint(&ConstraintCall::MaxOf {
            x: self.var(x)?,
            vars: vars.raw(),
        })
    }

    fn min(
        &self,
        x: &impl AsRef<IntVar>,
        y: &impl AsRef<IntVar>,
        z: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint> {
        self.new_constraint(&ConstraintCall::Min {
            x: self.var(x)?,
            y: self.var(y)?,
            z: self.var(z)?,
        })
    }

    fn min_of(
        &self,
        x: &impl AsRef<IntVar>,
        vars: &[impl AsRef<IntVar>],
    ) -> ChocoResult<Constraint> {
        let vars = int_var_array(self, vars)?;
        self.new_constraint(&ConstraintCall::MinOf {
            x: self.var(x)?,
            vars: vars.raw(),
        })
    }

    fn all_different(&self, vars: &[impl AsRef<IntVar>]) -> ChocoResult<Constraint> {
        let vars = int_var_array(self, vars)?;
        self.new_constraint(&ConstraintCall::AllDifferent { vars: vars.raw() })
    }

    fn all_equal(&self, vars: &[impl AsRef<IntVar>]) -> ChocoResult<Constraint> {
        let vars = int_var_array(self, vars)?;
        self.new_constraint(&ConstraintCall::AllEqual { vars: vars.raw() })
    }

    fn not_all_equal(&self, vars: &[impl AsRef<IntVar>]) -> ChocoResult<Constraint> {
        let vars = int_var_array(self, vars)?;
        self.new_constraint(&ConstraintCall::NotAllEqual { vars: vars.raw() })
    }

    fn among(
        &self,
        nb_var: &impl AsRef<IntVar>,
        vars: &[impl AsRef<IntVar>],
        values: &[i32],
    ) -> ChocoResult<Constraint> {
        let vars = int_var_array(self, vars)?;
        let values = int_array(self, values)?;
        self.new_constraint(&ConstraintCall::Among {
            nb_var: self.var(nb_var)?,
            vars: vars.raw(),
            values: values.raw(),
        })
    }

    fn count(
        &self,
        value: i32,
        vars: &[impl AsRef<IntVar>],
        limit: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint> {
        let vars = int_var_array(self, vars)?;
        self.new_constraint(&ConstraintCall::CountConst {
            value,
            vars: vars.raw(),
            limit: self.var(limit)?,
        })
    }

    fn count_var(
        &self,
        value: &impl AsRef<IntVar>,
        vars: &[impl AsRef<IntVar>],
        limit: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint> {
        let vars = int_var_array(self, vars)?;
        self.new_constraint(&ConstraintCall::CountVar {
            value: self.var(value)?,
            vars: vars.raw(),
            limit: self.var(limit)?,
        })
    }

    fn n_values(
        &self,
        vars: &[impl AsRef<IntVar>],
        n_values: &impl AsRef<IntVar>,
    ) -> ChocoResult<Constraint> {
        let vars = int_var_array(self, vars)?;
        self.new_constraint(&ConstraintCall::NValues {
            vars: vars.raw(),
            n_values: self.var(n_values)?,
        })
    }

    fn scalar<'a>(
        &self,
        vars: &[impl AsRef<IntVar>],
        coeffs: &[i32],
        op: Operator,
        rhs: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint> {
        let op = op.expect_comparison("scalar")?;
        ensure_same_length(vars.len(), coeffs.len())?;
        let vars = int_var_array(self, vars)?;
        let coeffs = int_array(self, coeffs)?;
        let call = match rhs.into() {
            Operand::Const(cst) => ConstraintCall::ScalarConst {
                vars: vars.raw(),
                coeffs: coeffs.raw(),
                op,
                cst,
            },
            Operand::Var(z) => ConstraintCall::ScalarVar {
                vars: vars.raw(),
                coeffs: coeffs.raw(),
                op,
                z: self.var(z)?,
            },
        };
        self.new_constraint(&call)
    }

    fn sum<'a>(
        &self,
        vars: &[impl AsRef<IntVar>],
        op: Operator,
        rhs: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint> {
        let op = op.expect_comparison("sum")?;
        let vars = int_var_array(self, vars)?;
        let call = match rhs.into() {
            Operand::Const(cst) => ConstraintCall::SumConst {
                vars: vars.raw(),
                op,
                cst,
            },
            Operand::Var(z) => ConstraintCall::SumVar {
                vars: vars.raw(),
                op,
                z: self.var(z)?,
            },
        };
        self.new_constraint(&call)
    }

    fn sum_bools<'a>(
        &self,
        bools: &[impl AsRef<BoolVar>],
        op: Operator,
        rhs: impl Into<Operand<'a>>,
    ) -> ChocoResult<Constraint> {
        let op = op.expect_comparison("sum")?;
        let bools = bool_var_array(self, bools)?;
        let call = match rhs.into() {
            Operand::Const(cst) => ConstraintCall::SumBoolsConst {
                bools: bools.raw(),
                op,
                cst,
            },
            Operand::Var(z) => ConstraintCall::SumBoolsVar {
                bools: bools.raw(),
                op,
                z: self.var(z)?,
            },
        };
        self.new_constraint(&call)
    }

    fn lex_less(
        &self,
        vars1: &[impl AsRef<IntVar>],
        vars2: &[impl AsRef<IntVar>],
    ) -> ChocoResult<Constraint> {
        ensure_same_length(vars1.len(), vars2.len())?;
        let vars1 = int_var_array(self, vars1)?;
        let vars2 = int_var_array(self, vars2)?;
        self.new_constraint(&ConstraintCall::LexLess {
            vars1: vars1.raw(),
            vars2: vars2.raw(),
        })
    }

    fn lex_less_eq(
        &self,
        vars1: &[impl AsRef<IntVar>],
        vars2: &[impl AsRef<IntVar>],
    ) -> ChocoResult<Constraint> {
        ensure_same_length(vars1.len(), vars2.len())?;
        let vars1 = int_var_array(self, vars1)?;
        let vars2 = int_var_array(self, vars2)?;
        self.new_constraint(&ConstraintCall::LexLessEq {
            vars1: vars1.raw(),
            vars2: vars2.raw(),
        })
    }

    fn argmax(
        &self,
        z: &impl AsRef<IntVar>,
        offset: i32,
        vars: &[impl AsRef<IntVar>],
    ) -> ChocoResult<Constraint> {
        let vars = int_var_array(self, vars)?;
        self.new_constraint(&ConstraintCall::Argmax {
            z: self.var(z)?,
            offset,
            vars: vars.raw(),
        })
    }

    fn argmin(
        &self,
        z: &impl AsRef<IntVar>,
        offset: i32,
        vars: &[impl AsRef<IntVar>],
    ) -> ChocoResult<Constraint> {
        let vars = int_var_array(self, vars)?;
        self.new_constraint(&ConstraintCall::Argmin {
            z: self.var(z)?,
            offset,
            vars: vars.raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::IntConstraintFactory;
    use crate::backend::ReferenceBackend;
    use crate::constraints::ESat;
    use crate::constraints::Operator;
    use crate::error::ChocoError;
    use crate::model::Model;
    use crate::runtime::Runtime;
    use crate::search::SearchLimits;
    use crate::variables::IntVar;
    use crate::variables::VariableFactory;

    #[test]
    fn arithm_requires_a_comparison() {
        let model = Runtime::reference().create_model(None).unwrap();
        let x = model.intvar(0, 3).unwrap();
        assert!(matches!(
            model.arithm(&x, Operator::Plus, 1),
            Err(ChocoError::InvalidOperatorCombination(_))
        ));
    }

    #[test]
    fn arithm3_requires_one_operator_of_each_kind() {
        let backend = ReferenceBackend::default();
        let runtime = Runtime::new(backend.clone());
        let model = runtime.create_model(None).unwrap();
        let x = model.intvar(0, 3).unwrap();
        let y = model.intvar(0, 3).unwrap();
        let live = backend.live_handles();

        for (op1, op2) in [
            (Operator::Eq, Operator::Le),
            (Operator::Plus, Operator::Times),
        ] {
            assert!(matches!(
                model.arithm3(&x, op1, &y, op2, 2),
                Err(ChocoError::InvalidOperatorCombination(_))
            ));
        }
        assert_eq!(backend.live_handles(), live);

        model
            .arithm3(&x, Operator::Eq, &y, Operator::Minus, 1)
            .unwrap()
            .post()
            .unwrap();
    }

    #[test]
    fn distance_rejects_non_strict_inequalities() {
        let model = Runtime::reference().create_model(None).unwrap();
        let x = model.intvar(0, 3).unwrap();
        let y = model.intvar(0, 3).unwrap();
        assert!(matches!(
            model.distance(&x, &y, Operator::Le, 1),
            Err(ChocoError::InvalidOperatorCombination(_))
        ));
        model
            .distance(&x, &y, Operator::Gt, 1)
            .unwrap()
            .post()
            .unwrap();
    }

    #[test]
    fn lengths_are_checked_before_any_allocation() {
        let backend = ReferenceBackend::default();
        let runtime = Runtime::new(backend.clone());
        let model = runtime.create_model(None).unwrap();
        let vars = model.intvars(3, 0, 2).unwrap();
        let live = backend.live_handles();

        assert!(matches!(
            model.scalar(&vars, &[1, 2], Operator::Eq, 4),
            Err(ChocoError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert!(matches!(
            model.lex_less(&vars, &vars[..1]),
            Err(ChocoError::LengthMismatch { .. })
        ));
        assert!(matches!(
            model.sum(&vars, Operator::Minus, 4),
            Err(ChocoError::InvalidOperatorCombination(_))
        ));
        assert_eq!(backend.live_handles(), live);
    }

    #[test]
    fn temporary_arrays_are_released() {
        let backend = ReferenceBackend::default();
        let runtime = Runtime::new(backend.clone());
        let model = runtime.create_model(None).unwrap();
        let vars = model.intvars(3, 0, 2).unwrap();
        let live = backend.live_handles();

        let c = model.scalar(&vars, &[1, 2, 3], Operator::Le, 4).unwrap();
        assert_eq!(backend.live_handles(), live + 1);
        c.post().unwrap();
    }

    fn only_solution(model: &Model, vars: &[&IntVar]) -> Vec<i32> {
        let mut solver = model.solver().unwrap();
        let solutions = solver.find_all_solutions(&SearchLimits::default()).unwrap();
        assert_eq!(solutions.len(), 1);
        vars.iter()
            .map(|var| solutions[0].int_value(*var).unwrap())
            .collect()
    }

    #[test]
    fn arithmetic_constraints_constrain_their_variables() {
        let model = Runtime::reference().create_model(None).unwrap();
        let x = model.intvar(-4, 4).unwrap();
        let y = model.intvar(0, 4).unwrap();
        let z = model.intvar(0, 20).unwrap();

        model.arithm(&x, Operator::Lt, 0).unwrap().post().unwrap();
        model.absolute(&y, &x).unwrap().post().unwrap();
        model.square(&z, &x).unwrap().post().unwrap();
        model.times(&y, 4, &z).unwrap().post().unwrap();

        assert_eq!(only_solution(&model, &[&x, &y, &z]), vec![-4, 4, 16]);
    }

    #[test]
    fn global_constraints_constrain_their_variables() {
        let model = Runtime::reference().create_model(None).unwrap();
        let vars = model.intvars(3, 1, 3).unwrap();
        let index = model.intvar(0, 2).unwrap();
        let top = model.intvar(0, 10).unwrap();

        model.all_different(&vars).unwrap().post().unwrap();
        model
            .lex_less(&vars[..1], &vars[1..2])
            .unwrap()
            .post()
            .unwrap();
        model
            .lex_less(&vars[1..2], &vars[2..])
            .unwrap()
            .post()
            .unwrap();
        model.max_of(&top, &vars).unwrap().post().unwrap();
        model.argmax(&index, 0, &vars).unwrap().post().unwrap();

        assert_eq!(
            only_solution(&model, &[&vars[0], &vars[1], &vars[2], &index, &top]),
            vec![1, 2, 3, 2, 3]
        );
    }

    #[test]
    fn scalar_over_extreme_constants_is_decided() {
        let model = Runtime::reference().create_model(None).unwrap();
        let vars = (0..3)
            .map(|_| model.constant(i32::MAX).unwrap())
            .collect::<Vec<_>>();

        let positive = model
            .scalar(&vars, &[i32::MAX; 3], Operator::Ge, 0)
            .unwrap();
        assert_eq!(positive.is_satisfied().unwrap(), ESat::True);
        positive.post().unwrap();

        let negative = model
            .scalar(&vars, &[i32::MIN; 3], Operator::Ge, 0)
            .unwrap();
        assert_eq!(negative.is_satisfied().unwrap(), ESat::False);
        negative.post().unwrap();
    }
}
