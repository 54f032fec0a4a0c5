use crate::constraints::Operator;
use crate::runtime::NativeHandle;

/// The arguments of one native constraint factory call.
///
/// Each variant corresponds to exactly one factory function of the C surface. Variable arguments
/// are variable handles, `*s` fields are handles of variable arrays (integer or boolean, as the
/// factory requires), and `table`/`values`/`coeffs` fields are handles of integer arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintCall {
    /// `x op cst`
    ArithmConst {
        x: NativeHandle,
        op: Operator,
        cst: i32,
    },
    /// `x op y`
    Arithm {
        x: NativeHandle,
        op: Operator,
        y: NativeHandle,
    },
    /// `x op1 y op2 cst`, one of the operators being a comparison
    Arithm3Const {
        x: NativeHandle,
        op1: Operator,
        y: NativeHandle,
        op2: Operator,
        cst: i32,
    },
    /// `x op1 y op2 z`, one of the operators being a comparison
    Arithm3 {
        x: NativeHandle,
        op1: Operator,
        y: NativeHandle,
        op2: Operator,
        z: NativeHandle,
    },
    MemberTable {
        x: NativeHandle,
        table: NativeHandle,
    },
    MemberRange {
        x: NativeHandle,
        lb: i32,
        ub: i32,
    },
    NotMemberTable {
        x: NativeHandle,
        table: NativeHandle,
    },
    NotMemberRange {
        x: NativeHandle,
        lb: i32,
        ub: i32,
    },
    AllDifferent {
        vars: NativeHandle,
    },
    AllEqual {
        vars: NativeHandle,
    },
    NotAllEqual {
        vars: NativeHandle,
    },
    /// `x % modulo = res`
    ModConst {
        x: NativeHandle,
        modulo: i32,
        res: i32,
    },
    ModConstVar {
        x: NativeHandle,
        modulo: i32,
        res: NativeHandle,
    },
    ModVar {
        x: NativeHandle,
        modulo: NativeHandle,
        res: NativeHandle,
    },
    /// The opposite of an existing constraint.
    Not {
        constraint: NativeHandle,
    },
    /// `x = |y|`
    Absolute {
        x: NativeHandle,
        y: NativeHandle,
    },
    /// `|x - y| op cst`
    DistanceConst {
        x: NativeHandle,
        y: NativeHandle,
        op: Operator,
        cst: i32,
    },
    DistanceVar {
        x: NativeHandle,
        y: NativeHandle,
        op: Operator,
        z: NativeHandle,
    },
    /// `value = table[index - offset]`
    ElementConst {
        value: NativeHandle,
        table: NativeHandle,
        index: NativeHandle,
        offset: i32,
    },
    ElementVar {
        value: NativeHandle,
        table: NativeHandle,
        index: NativeHandle,
        offset: i32,
    },
    /// `x = y * y`
    Square {
        x: NativeHandle,
        y: NativeHandle,
    },
    /// `x * y = z`
    TimesConstFactor {
        x: NativeHandle,
        y: i32,
        z: NativeHandle,
    },
    TimesConstResult {
        x: NativeHandle,
        y: NativeHandle,
        z: i32,
    },
    Times {
        x: NativeHandle,
        y: NativeHandle,
        z: NativeHandle,
    },
    /// `dividend / divisor = result`, rounding towards zero
    Div {
        dividend: NativeHandle,
        divisor: NativeHandle,
        result: NativeHandle,
    },
    /// `x = max(y, z)`
    Max {
        x: NativeHandle,
        y: NativeHandle,
        z: NativeHandle,
    },
    MaxOf {
        x: NativeHandle,
        vars: NativeHandle,
    },
    Min {
        x: NativeHandle,
        y: NativeHandle,
        z: NativeHandle,
    },
    MinOf {
        x: NativeHandle,
        vars: NativeHandle,
    },
    /// `nb_var` is the number of variables of `vars` taking a value of `values`
    Among {
        nb_var: NativeHandle,
        vars: NativeHandle,
        values: NativeHandle,
    },
    And {
        bools: NativeHandle,
    },
    Or {
        bools: NativeHandle,
    },
    /// `limit` is the number of variables of `vars` equal to `value`
    CountConst {
        value: i32,
        vars: NativeHandle,
        limit: NativeHandle,
    },
    CountVar {
        value: NativeHandle,
        vars: NativeHandle,
        limit: NativeHandle,
    },
    NValues {
        vars: NativeHandle,
        n_values: NativeHandle,
    },
    /// `sum(coeffs[i] * vars[i]) op cst`
    ScalarConst {
        vars: NativeHandle,
        coeffs: NativeHandle,
        op: Operator,
        cst: i32,
    },
    ScalarVar {
        vars: NativeHandle,
        coeffs: NativeHandle,
        op: Operator,
        z: NativeHandle,
    },
    SumConst {
        vars: NativeHandle,
        op: Operator,
        cst: i32,
    },
    SumVar {
        vars: NativeHandle,
        op: Operator,
        z: NativeHandle,
    },
    SumBoolsConst {
        bools: NativeHandle,
        op: Operator,
        cst: i32,
    },
    SumBoolsVar {
        bools: NativeHandle,
        op: Operator,
        z: NativeHandle,
    },
    LexLess {
        vars1: NativeHandle,
        vars2: NativeHandle,
    },
    LexLessEq {
        vars1: NativeHandle,
        vars2: NativeHandle,
    },
    /// `z - offset` is the index of the first maximal element of `vars`
    Argmax {
        z: NativeHandle,
        offset: i32,
        vars: NativeHandle,
    },
    Argmin {
        z: NativeHandle,
        offset: i32,
        vars: NativeHandle,
    },
}

impl ConstraintCall {
    /// The name a freshly created constraint of this kind carries.
    pub fn default_name(&self) -> &'static str {
        match self {
            ConstraintCall::ArithmConst { .. }
            | ConstraintCall::Arithm { .. }
            | ConstraintCall::Arithm3Const { .. }
            | ConstraintCall::Arithm3 { .. } => "ARITHM",
            ConstraintCall::MemberTable { .. } | ConstraintCall::MemberRange { .. } => "MEMBER",
            ConstraintCall::NotMemberTable { .. } | ConstraintCall::NotMemberRange { .. } => {
                "NOTMEMBER"
            }
            ConstraintCall::AllDifferent { .. } => "ALLDIFFERENT",
            ConstraintCall::AllEqual { .. } => "ATLEASTNVALUES",
            ConstraintCall::NotAllEqual { .. } => "ATMOSTNVALUES",
            ConstraintCall::ModConst { .. }
            | ConstraintCall::ModConstVar { .. }
            | ConstraintCall::ModVar { .. } => "MOD",
            ConstraintCall::Not { .. } => "OPPOSITE",
            ConstraintCall::Absolute { .. } => "ABSOLUTE",
            ConstraintCall::DistanceConst { .. } | ConstraintCall::DistanceVar { .. } => {
                "DISTANCE"
            }
            ConstraintCall::ElementConst { .. } | ConstraintCall::ElementVar { .. } => "ELEMENT",
            ConstraintCall::Square { .. } => "SQUARE",
            ConstraintCall::TimesConstFactor { .. }
            | ConstraintCall::TimesConstResult { .. }
            | ConstraintCall::Times { .. } => "TIMES",
            ConstraintCall::Div { .. } => "DIVISION",
            ConstraintCall::Max { .. } | ConstraintCall::MaxOf { .. } => "MAX",
            ConstraintCall::Min { .. } | ConstraintCall::MinOf { .. } => "MIN",
            ConstraintCall::Among { .. } => "AMONG",
            ConstraintCall::And { .. } => "AND",
            ConstraintCall::Or { .. } => "OR",
            ConstraintCall::CountConst { .. } | ConstraintCall::CountVar { .. } => "COUNT",
            ConstraintCall::NValues { .. } => "NVALUES",
            ConstraintCall::ScalarConst { .. } | ConstraintCall::ScalarVar { .. } => "SCALAR",
            ConstraintCall::SumConst { .. }
            | ConstraintCall::SumVar { .. }
            | ConstraintCall::SumBoolsConst { .. }
            | ConstraintCall::SumBoolsVar { .. } => "SUM",
            ConstraintCall::LexLess { .. } | ConstraintCall::LexLessEq { .. } => "LEX",
            ConstraintCall::Argmax { .. } => "ARGMAX",
            ConstraintCall::Argmin { .. } => "ARGMIN",
        }
    }
}
