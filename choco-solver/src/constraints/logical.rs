use super::Constraint;
use crate::backend::BackendError;
use crate::backend::ConstraintCall;
use crate::error::ChocoResult;
use crate::marshal::bool_var_array;
use crate::model::Model;
use crate::variables::BoolVar;

/// The logical constraints a [`Model`] can create.
pub trait LogicalConstraintFactory {
    /// Creates the opposite of `constraint`, which counts as used afterwards.
    fn not(&self, constraint: &Constraint) -> ChocoResult<Constraint>;
    /// Creates the constraint stating that every variable of `bools` is true.
    fn and(&self, bools: &[impl AsRef<BoolVar>]) -> ChocoResult<Constraint>;
    /// Creates the constraint stating that at least one variable of `bools` is true.
    fn or(&self, bools: &[impl AsRef<BoolVar>]) -> ChocoResult<Constraint>;
}

impl LogicalConstraintFactory for Model {
    fn not(&self, constraint: &Constraint) -> ChocoResult<Constraint> {
        if !constraint.model().runtime().same_runtime(self.runtime()) {
            return Err(BackendError::ForeignObject.into());
        }
        let opposite = self.new_constraint(&ConstraintCall::Not {
            constraint: constraint.raw(),
        })?;
        constraint.mark_used();
        Ok(opposite)
    }

    fn and(&self, bools: &[impl AsRef<BoolVar>]) -> ChocoResult<Constraint> {
        let bools = bool_var_array(self, bools)?;
        self.new_constraint(&ConstraintCall::And { bools: bools.raw() })
    }

    fn or(&self, bools: &[impl AsRef<BoolVar>]) -> ChocoResult<Constraint> {
        let bools = bool_var_array(self, bools)?;
        self.new_constraint(&ConstraintCall::Or { bools: bools.raw() })
    }
}

#[cfg(test)]
mod tests {
    use super::LogicalConstraintFactory;
    use crate::backend::BackendError;
    use crate::constraints::IntConstraintFactory;
    use crate::constraints::Operator;
    use crate::error::ChocoError;
    use crate::runtime::Runtime;
    use crate::search::SearchLimits;
    use crate::variables::VariableFactory;

    #[test]
    fn negation_excludes_the_solutions_of_the_inner_constraint() {
        let model = Runtime::reference().create_model(None).unwrap();
        let x = model.intvar(0, 4).unwrap();
        let member = model.member(&x, &[1, 3]).unwrap();
        model.not(&member).unwrap().post().unwrap();

        let mut solver = model.solver().unwrap();
        let values = solver
            .find_all_solutions(&SearchLimits::default())
            .unwrap()
            .iter()
            .map(|solution| solution.int_value(&x).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(values, vec![0, 2, 4]);
    }

    #[test]
    fn conjunction_and_disjunction() {
        let model = Runtime::reference().create_model(None).unwrap();
        let bools = model.boolvars(3).unwrap();
        model.and(&bools[1..]).unwrap().post().unwrap();
        let neither = model.or(&bools[..2]).unwrap();
        model.not(&neither).unwrap().post().unwrap();

        let mut solver = model.solver().unwrap();
        assert!(solver
            .find_solution(&SearchLimits::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn disjunction_needs_one_true_variable() {
        let model = Runtime::reference().create_model(None).unwrap();
        let bools = model.boolvars(3).unwrap();
        model.or(&bools).unwrap().post().unwrap();

        let mut solver = model.solver().unwrap();
        let solutions = solver.find_all_solutions(&SearchLimits::default()).unwrap();
        assert_eq!(solutions.len(), 7);
    }

    #[test]
    fn constraints_of_another_runtime_cannot_be_negated() {
        let model = Runtime::reference().create_model(None).unwrap();
        let other = Runtime::reference().create_model(None).unwrap();
        let x = other.intvar(0, 4).unwrap();
        let foreign = other.arithm(&x, Operator::Lt, 2).unwrap();

        assert!(matches!(
            model.not(&foreign),
            Err(ChocoError::Backend(BackendError::ForeignObject))
        ));
        foreign.post().unwrap();
    }
}
