//! Player state: life, zones and the essence pool.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CostType, Essence};
use crate::core::{PlayerId, RulesConfig};
use crate::zones::{Board, Pile, Zone};

/// One unit of essence in a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EssenceToken {
    Colored(Essence),
    /// Pays only generic costs.
    Generic,
}

/// A player's essence, in the order it was added.
pub type EssencePool = SmallVec<[EssenceToken; 8]>;

/// Most tokens a pool holds.
pub const MAX_ESSENCE: usize = 1024;

/// Remove the essence `costs` need from `pool`.
///
/// Colored symbols are paid first. Each generic point then takes a
/// generic token if there is one, else the first token left. Returns
/// `false` if the pool runs out; the pool is then partially consumed, so
/// callers check on a copy first.
pub fn pay_from_pool(pool: &mut EssencePool, costs: &[CostType], x: i64) -> bool {
    for cost in costs {
        if let CostType::Essence(e) = cost {
            match pool.iter().position(|t| *t == EssenceToken::Colored(*e)) {
                Some(i) => {
                    pool.remove(i);
                }
                None => return false,
            }
        }
    }
    for cost in costs {
        if let CostType::Generic(q) = cost {
            for _ in 0..q.value(x).max(0) {
                let index = pool
                    .iter()
                    .position(|t| *t == EssenceToken::Generic)
                    .or_else(|| (!pool.is_empty()).then_some(0));
                match index {
                    Some(i) => {
                        pool.remove(i);
                    }
                    None => return false,
                }
            }
        }
    }
    true
}

/// Seat state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub life: i64,
    pub deck: Pile,
    pub hand: Pile,
    pub pile: Pile,
    pub board: Board,
    pub essence: EssencePool,

    /// Turns this player takes after the current one.
    pub extra_turns: u32,

    pub lost: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, config: &RulesConfig) -> Self {
        Self {
            id,
            life: config.start_life,
            deck: Pile::new(),
            hand: Pile::new(),
            pile: Pile::new(),
            board: Board::new(config.board_size),
            essence: EssencePool::new(),
            extra_turns: 0,
            lost: false,
        }
    }

    /// The ordered zone for `zone`. `None` for the board and the stack.
    #[must_use]
    pub fn pile_of(&self, zone: Zone) -> Option<&Pile> {
        match zone {
            Zone::Deck => Some(&self.deck),
            Zone::Hand => Some(&self.hand),
            Zone::Pile => Some(&self.pile),
            Zone::Board | Zone::Stack => None,
        }
    }

    pub fn pile_of_mut(&mut self, zone: Zone) -> Option<&mut Pile> {
        match zone {
            Zone::Deck => Some(&mut self.deck),
            Zone::Hand => Some(&mut self.hand),
            Zone::Pile => Some(&mut self.pile),
            Zone::Board | Zone::Stack => None,
        }
    }

    /// Add essence for an `add` effect. Generic symbols add generic tokens.
    ///
    /// The pool holds at most [`MAX_ESSENCE`] tokens; the rest is lost.
    pub fn add_essence(&mut self, cost: CostType, x: i64) {
        let room = MAX_ESSENCE.saturating_sub(self.essence.len());
        match cost {
            CostType::Essence(e) if room > 0 => self.essence.push(EssenceToken::Colored(e)),
            CostType::Generic(q) => {
                let count = usize::try_from(q.value(x)).unwrap_or(0).min(room);
                self.essence.extend(std::iter::repeat(EssenceToken::Generic).take(count));
            }
            CostType::Essence(_) => {}
            CostType::Activate | CostType::Deactivate => {}
        }
    }

    #[must_use]
    pub fn essence_count(&self) -> usize {
        self.essence.len()
    }

    #[must_use]
    pub fn can_afford(&self, costs: &[CostType], x: i64) -> bool {
        let mut pool = self.essence.clone();
        pay_from_pool(&mut pool, costs, x)
    }
}
