//! Strategy definitions, execution and the name registry

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::choice::{co_players, Choice, Combination};
use crate::config::Configs;
use crate::error::{ArenaError, Result};
use crate::matrix::PayoffMatrix;
use crate::prediction::predict;
use crate::random::SeededRng;

/// A participant bound to one slot of a match.
///
/// `choose` is called once per round with the history of all completed
/// rounds. It must depend only on its slot, the history, the matrix and the
/// configs it was built from.
pub trait Strategy {
    /// Slot of this strategy in every combination
    fn order(&self) -> usize;

    fn choose(&self, history: &[Combination], matrix: &PayoffMatrix) -> Choice;
}

/// Base strategy type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyBase {
    /// Always cooperate, never defect.
    AllCooperate,
    /// Always defect, never cooperate.
    AllDefect,
    /// Defect if a co-player defected last round. Start with cooperate.
    TitForTat,
    /// Tit-for-Tat but start with defect.
    SuspiciousTitForTat,
    /// Defect only if a co-player defected in each of the last two rounds.
    TitForTwoTats,
    /// Cooperate until co-players defect, then always defect.
    GrimTrigger,
    /// Win-stay, lose-switch.
    Pavlov,
    /// Retaliate with increasing defection streaks, then forgive.
    Gradual,
    /// Random choice each round.
    Random,
    /// Pick the choice with the higher expected payoff given how the
    /// co-players have played so far.
    Prediction,
}

impl StrategyBase {
    pub const ALL: [StrategyBase; 10] = [
        StrategyBase::AllCooperate,
        StrategyBase::AllDefect,
        StrategyBase::TitForTat,
        StrategyBase::SuspiciousTitForTat,
        StrategyBase::TitForTwoTats,
        StrategyBase::GrimTrigger,
        StrategyBase::Pavlov,
        StrategyBase::Gradual,
        StrategyBase::Random,
        StrategyBase::Prediction,
    ];

    /// Registered name
    pub fn name(self) -> &'static str {
        match self {
            StrategyBase::AllCooperate => "AllCooperate",
            StrategyBase::AllDefect => "AllDefect",
            StrategyBase::TitForTat => "TitForTat",
            StrategyBase::SuspiciousTitForTat => "SuspiciousTitForTat",
            StrategyBase::TitForTwoTats => "TitForTwoTats",
            StrategyBase::GrimTrigger => "GrimTrigger",
            StrategyBase::Pavlov => "Pavlov",
            StrategyBase::Gradual => "Gradual",
            StrategyBase::Random => "Random",
            StrategyBase::Prediction => "Prediction",
        }
    }
}

/// Strategy parameters for fine-tuning behavior, read from config tokens
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Percentage chance to cooperate instead of retaliating (0-100)
    pub forgiveness: u8,
    /// Tit-for-Tat answers the round this many rounds before the last one
    pub retaliation_delay: u8,
    /// Number of co-player defections to ignore before retaliating
    pub noise_tolerance: u8,
    /// Bitmask of first 8 moves (1 = defect, 0 = use strategy)
    pub initial_moves: u8,
    /// Bias toward cooperation for Random strategy (0-100)
    pub cooperate_bias: u8,
    /// Seed for forgiveness and Random
    pub seed: u64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            forgiveness: 0,
            retaliation_delay: 0,
            noise_tolerance: 0,
            initial_moves: 0,
            cooperate_bias: 50,
            seed: 0,
        }
    }
}

impl StrategyParams {
    /// Read `key=value` tokens for the named strategy, keeping defaults for the rest
    pub fn from_configs(strategy: &str, configs: &Configs) -> Self {
        let d = Self::default();
        Self {
            forgiveness: configs.parsed_for(strategy, "forgiveness", d.forgiveness).min(100),
            retaliation_delay: configs.parsed_for(
                strategy,
                "retaliation_delay",
                d.retaliation_delay,
            ),
            noise_tolerance: configs.parsed_for(strategy, "noise_tolerance", d.noise_tolerance),
            initial_moves: configs.parsed_for(strategy, "initial_moves", d.initial_moves),
            cooperate_bias: configs
                .parsed_for(strategy, "cooperate_bias", d.cooperate_bias)
                .min(100),
            seed: configs.parsed_for(strategy, "seed", d.seed),
        }
    }
}

/// A built-in strategy bound to a slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Builtin {
    pub base: StrategyBase,
    pub order: usize,
    pub params: StrategyParams,
}

impl Builtin {
    /// Create a new strategy with default parameters
    pub fn new(base: StrategyBase, order: usize) -> Self {
        Self { base, order, params: StrategyParams::default() }
    }

    pub fn with_params(base: StrategyBase, order: usize, params: StrategyParams) -> Self {
        Self { base, order, params }
    }

    pub fn from_configs(base: StrategyBase, order: usize, configs: &Configs) -> Self {
        Self::with_params(base, order, StrategyParams::from_configs(base.name(), configs))
    }
}

impl Strategy for Builtin {
    fn order(&self) -> usize {
        self.order
    }

    fn choose(&self, history: &[Combination], matrix: &PayoffMatrix) -> Choice {
        execute_strategy(self, history, matrix)
    }
}

/// Execute a built-in strategy for the round after `history`
pub fn execute_strategy(
    strategy: &Builtin,
    history: &[Combination],
    matrix: &PayoffMatrix,
) -> Choice {
    let round = history.len();
    let order = strategy.order;
    let params = &strategy.params;

    // Check initial_moves override (first 8 rounds)
    if round < 8 && (params.initial_moves >> round) & 1 == 1 {
        return Choice::Defect;
    }

    match strategy.base {
        StrategyBase::AllCooperate => Choice::Cooperate,
        StrategyBase::AllDefect => Choice::Defect,
        StrategyBase::TitForTat => execute_tit_for_tat(history, order, params, Choice::Cooperate),
        StrategyBase::SuspiciousTitForTat => {
            execute_tit_for_tat(history, order, params, Choice::Defect)
        }
        StrategyBase::TitForTwoTats => execute_tit_for_two_tats(history, order),
        StrategyBase::GrimTrigger => execute_grim_trigger(history, order, params),
        StrategyBase::Pavlov => execute_pavlov(history, order, matrix),
        StrategyBase::Gradual => execute_gradual(history, order),
        StrategyBase::Random => {
            if round_rng(params, order, round).next_percent() < params.cooperate_bias {
                Choice::Cooperate
            } else {
                Choice::Defect
            }
        }
        StrategyBase::Prediction => predict(history, matrix, order),
    }
}

fn round_rng(params: &StrategyParams, order: usize, round: usize) -> SeededRng {
    SeededRng::new(params.seed, order as u32).for_round(round as u32)
}

/// True when either co-player of `order` defected in this combination
fn co_player_defected(combination: &Combination, order: usize) -> bool {
    co_players(order)
        .iter()
        .any(|slot| combination[*slot] == Choice::Defect)
}

/// Total co-player defections over the history
fn co_player_defections(history: &[Combination], order: usize) -> usize {
    let others = co_players(order);
    history
        .iter()
        .map(|c| others.iter().filter(|slot| c[**slot] == Choice::Defect).count())
        .sum()
}

/// Tit-for-Tat: answer co-player defections in kind.
///
/// With `retaliation_delay = n` the answer is to the round `n` rounds
/// before the last one; until such a round exists, play `opening`.
fn execute_tit_for_tat(
    history: &[Combination],
    order: usize,
    params: &StrategyParams,
    opening: Choice,
) -> Choice {
    let Some(seen) = history.len().checked_sub(1 + params.retaliation_delay as usize) else {
        return opening;
    };
    if !co_player_defected(&history[seen], order) {
        return Choice::Cooperate;
    }
    // Forgiveness: chance to cooperate anyway
    if params.forgiveness > 0
        && round_rng(params, order, history.len()).next_percent() < params.forgiveness
    {
        Choice::Cooperate
    } else {
        Choice::Defect
    }
}

/// Tit-for-Two-Tats: only defect after two consecutive rounds with a defection
fn execute_tit_for_two_tats(history: &[Combination], order: usize) -> Choice {
    if history.len() < 2 {
        return Choice::Cooperate;
    }
    let last_two = &history[history.len() - 2..];
    if last_two.iter().all(|c| co_player_defected(c, order)) {
        Choice::Defect
    } else {
        Choice::Cooperate
    }
}

/// Grim Trigger: cooperate until co-player defections exceed the tolerance
fn execute_grim_trigger(history: &[Combination], order: usize, params: &StrategyParams) -> Choice {
    if co_player_defections(history, order) > params.noise_tolerance as usize {
        Choice::Defect
    } else {
        Choice::Cooperate
    }
}

/// Pavlov: win-stay, lose-switch
/// - If last round paid at least the all-cooperate payoff, repeat the move
/// - Otherwise switch
fn execute_pavlov(history: &[Combination], order: usize, matrix: &PayoffMatrix) -> Choice {
    let Some(last) = history.last() else {
        return Choice::Cooperate;
    };
    let my_last = last[order];
    let my_score = matrix.score(last, order);
    let good = matrix.score(&[Choice::Cooperate; 3], order);

    if my_score >= good {
        my_last
    } else {
        my_last.flip()
    }
}

/// Gradual: Escalating retaliation
/// After N co-player defections, play N(N+1)/2 defections in total
fn execute_gradual(history: &[Combination], order: usize) -> Choice {
    let their_defections = co_player_defections(history, order);
    let my_defections = history.iter().filter(|c| c[order] == Choice::Defect).count();
    let expected = their_defections * (their_defections + 1) / 2;

    if my_defections < expected {
        Choice::Defect
    } else {
        Choice::Cooperate
    }
}

/// Get a human-readable description of a strategy
pub fn describe_strategy(base: StrategyBase, params: &StrategyParams) -> String {
    let base_desc = match base {
        StrategyBase::AllCooperate => "Never defects. Always cooperates.",
        StrategyBase::AllDefect => "Never cooperates. Always defects.",
        StrategyBase::TitForTat => {
            "Defects after a round in which a co-player defected. Starts by cooperating."
        }
        StrategyBase::SuspiciousTitForTat => "Like Tit-for-Tat, but starts with defect.",
        StrategyBase::TitForTwoTats => {
            "Only retaliates after two consecutive rounds with a defection."
        }
        StrategyBase::GrimTrigger => "Cooperates until betrayed, then always defects.",
        StrategyBase::Pavlov => "Repeats move if outcome was good, switches if bad.",
        StrategyBase::Gradual => "Retaliates with increasing severity, then forgives.",
        StrategyBase::Random => "Randomly cooperates or defects each round.",
        StrategyBase::Prediction => {
            "Plays the move with the best expected payoff against the co-players' observed habits."
        }
    };

    let mut desc = base_desc.to_string();

    if params.forgiveness > 0 {
        desc.push_str(&format!(" {}% chance to forgive.", params.forgiveness));
    }

    if params.noise_tolerance > 0 {
        desc.push_str(&format!(" Tolerates {} accidental defections.", params.noise_tolerance));
    }

    if base == StrategyBase::Random && params.cooperate_bias != 50 {
        desc.push_str(&format!(" Cooperates {}% of the time.", params.cooperate_bias));
    }

    desc
}

/// Builds a strategy for a slot from the shared config tokens
pub type Constructor = Box<dyn Fn(usize, &Configs) -> Box<dyn Strategy>>;

/// Explicit mapping from strategy name to constructor.
///
/// Built once and passed to whatever creates matches; there is no global
/// registry.
pub struct Registry {
    constructors: BTreeMap<String, Constructor>,
}

impl Registry {
    pub fn empty() -> Self {
        Self { constructors: BTreeMap::new() }
    }

    /// Registry holding every [`StrategyBase`] under its name
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for base in StrategyBase::ALL {
            registry.register(base.name(), move |order, configs| {
                Box::new(Builtin::from_configs(base, order, configs))
            });
        }
        registry
    }

    /// Add or replace a constructor
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(usize, &Configs) -> Box<dyn Strategy> + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Build the named strategy for `order`
    pub fn create(&self, name: &str, order: usize, configs: &Configs) -> Result<Box<dyn Strategy>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| ArenaError::WrongStrategyName(name.to_owned()))?;
        Ok(constructor(order, configs))
    }

    /// Fail on the first unregistered name
    pub fn check_names<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        match names.iter().find(|n| !self.contains(n.as_ref())) {
            Some(unknown) => Err(ArenaError::WrongStrategyName(unknown.as_ref().to_owned())),
            None => Ok(()),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.constructors.keys()).finish()
    }
}
