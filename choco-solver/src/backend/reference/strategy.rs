//! Static decision orders standing in for the search strategies of the native solver.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;

use super::model::ModelState;
use super::relation::Relation;
use super::relation::VarId;
use crate::search::SearchStrategy;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct StrategyState {
    pub(super) strategy: SearchStrategy,
    pub(super) vars: Vec<VarId>,
}

/// The variables in decision order, each with the values to try in order.
#[derive(Clone, Debug, Default)]
pub(super) struct DecisionPlan {
    pub(super) order: Vec<VarId>,
    pub(super) values: Vec<ValueSequence>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ValueOrder {
    Ascending,
    Descending,
    Shuffled(u64),
}

/// The domain of a variable in the order the search tries its values. Values are computed from
/// their position, so the domain is never materialised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct ValueSequence {
    lb: i32,
    len: u64,
    walk: Walk,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Walk {
    Forward,
    Backward,
    /// `index -> (step * index + shift) % len`, a permutation as `step` and `len` are coprime.
    Affine { step: u64, shift: u64 },
}

impl ValueSequence {
    fn new(lb: i32, ub: i32, order: ValueOrder, var: VarId) -> ValueSequence {
        let len = u64::from(ub.abs_diff(lb)) + 1;
        let walk = match order {
            ValueOrder::Ascending => Walk::Forward,
            ValueOrder::Descending => Walk::Backward,
            ValueOrder::Shuffled(seed) => {
                let mut rng = SmallRng::seed_from_u64(seed ^ var as u64);
                let mut step = rng.gen_range(1..=len);
                while gcd(step, len) != 1 {
                    step += 1;
                }
                Walk::Affine {
                    step,
                    shift: rng.gen_range(0..len),
                }
            }
        };
        ValueSequence { lb, len, walk }
    }

    pub(super) fn len(&self) -> u64 {
        self.len
    }

    /// The value tried at position `index`, or `None` past the end of the domain.
    pub(super) fn get(&self, index: u64) -> Option<i32> {
        if index >= self.len {
            return None;
        }
        let offset = match self.walk {
            Walk::Forward => index,
            Walk::Backward => self.len - 1 - index,
            Walk::Affine { step, shift } => {
                let position = (u128::from(step) * u128::from(index) + u128::from(shift))
                    % u128::from(self.len);
                u64::try_from(position).ok()?
            }
        };
        i32::try_from(i64::from(self.lb) + i64::try_from(offset).ok()?).ok()
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl SearchStrategy {
    fn value_order(self) -> ValueOrder {
        match self {
            SearchStrategy::MinDomUb | SearchStrategy::InputOrderUb => ValueOrder::Descending,
            SearchStrategy::Random { seed } => ValueOrder::Shuffled(seed as u64),
            SearchStrategy::DomOverWDeg
            | SearchStrategy::DomOverWDegRef
            | SearchStrategy::ActivityBased
            | SearchStrategy::MinDomLb
            | SearchStrategy::ConflictHistory
            | SearchStrategy::InputOrderLb
            | SearchStrategy::FailureLengthBased
            | SearchStrategy::FailureRateBased => ValueOrder::Ascending,
        }
    }
}

/// The strategy given to the worker at `index` of a self-configuring portfolio; the first worker
/// keeps the strategy of its model.
pub(super) fn diversified(index: usize) -> Option<SearchStrategy> {
    const ROTATION: [SearchStrategy; 4] = [
        SearchStrategy::InputOrderUb,
        SearchStrategy::MinDomLb,
        SearchStrategy::DomOverWDeg,
        SearchStrategy::MinDomUb,
    ];
    match index {
        0 => None,
        index if index % (ROTATION.len() + 1) == 0 => Some(SearchStrategy::Random {
            seed: index as i64,
        }),
        index => Some(ROTATION[(index - 1) % (ROTATION.len() + 1)]),
    }
}

/// Builds the decision plan of `model`: the strategy variables first, ordered and valued as the
/// strategy prescribes, then every other variable in declaration order with ascending values.
pub(super) fn plan(
    model: &ModelState,
    strategy: Option<&StrategyState>,
    relations: &[Relation],
) -> DecisionPlan {
    let mut degree = vec![0_usize; model.vars.len()];
    for relation in relations {
        for var in relation.scope() {
            if let Some(d) = degree.get_mut(var) {
                *d += 1;
            }
        }
    }
    let domain_size = |var: VarId| {
        model
            .vars
            .get(var)
            .map_or(0, |info| u64::from(info.ub.abs_diff(info.lb)) + 1)
    };

    let mut decided = vec![false; model.vars.len()];
    let mut order = Vec::with_capacity(model.vars.len());
    let mut value_orders = Vec::with_capacity(model.vars.len());

    if let Some(state) = strategy {
        let mut vars = state
            .vars
            .iter()
            .copied()
            .filter(|&var| {
                var < decided.len() && !std::mem::replace(&mut decided[var], true)
            })
            .collect::<Vec<_>>();
        match state.strategy {
            SearchStrategy::MinDomLb | SearchStrategy::MinDomUb => {
                vars.sort_by_key(|&var| domain_size(var));
            }
            SearchStrategy::DomOverWDeg
            | SearchStrategy::DomOverWDegRef
            | SearchStrategy::ActivityBased
            | SearchStrategy::ConflictHistory
            | SearchStrategy::FailureLengthBased
            | SearchStrategy::FailureRateBased => {
                // dom / (deg + 1), compared without division
                vars.sort_by(|&a, &b| {
                    let lhs = u128::from(domain_size(a)) * (degree[b] as u128 + 1);
                    let rhs = u128::from(domain_size(b)) * (degree[a] as u128 + 1);
                    lhs.cmp(&rhs)
                });
            }
            SearchStrategy::Random { seed } => {
                vars.shuffle(&mut SmallRng::seed_from_u64(seed as u64));
            }
            SearchStrategy::InputOrderLb | SearchStrategy::InputOrderUb => {}
        }
        let value_order = state.strategy.value_order();
        value_orders.extend(vars.iter().map(|_| value_order));
        order.extend(vars);
    }

    for var in 0..model.vars.len() {
        if !decided[var] {
            order.push(var);
            value_orders.push(ValueOrder::Ascending);
        }
    }

    let values = order
        .iter()
        .zip(value_orders)
        .map(|(&var, value_order)| {
            let info = &model.vars[var];
            ValueSequence::new(info.lb, info.ub, value_order, var)
        })
        .collect();

    DecisionPlan { order, values }
}
