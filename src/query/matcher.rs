//! Predicate evaluation for card, player and any-matches.

use super::MatchMode;
use crate::cards::CardInstance;
use crate::core::{CardId, ObjectRef, PlayerId};
use crate::effects::{
    AbilityInstance, AnyMatch, CardFilter, CardMatch, CardTypeMatch, Count, Match, Numerical, PlayerMatch,
    PlayerTypeMatch, Prefix, Selector, With,
};
use crate::game::Game;

impl Game {
    /// Whether `object` satisfies `m` for `inst`.
    #[must_use]
    pub fn matches(&self, inst: &AbilityInstance, m: &Match, object: ObjectRef, mode: MatchMode) -> bool {
        match m {
            Match::Player(pm) => object.as_player().is_some_and(|p| self.player_matches(inst, pm, p)),
            Match::Card(cm) => object.as_card().is_some_and(|c| self.card_matches(inst, cm, c, mode)),
            Match::Any(am) => self.any_matches(inst, am, object, mode),
        }
    }

    /// Alternatives of a card match are a disjunction.
    #[must_use]
    pub fn card_matches(&self, inst: &AbilityInstance, m: &CardMatch, card: CardId, mode: MatchMode) -> bool {
        m.0.iter().any(|alt| self.card_type_matches(inst, alt, card, mode))
    }

    pub(crate) fn card_type_matches(
        &self,
        inst: &AbilityInstance,
        m: &CardTypeMatch,
        card: CardId,
        mode: MatchMode,
    ) -> bool {
        match m {
            CardTypeMatch::Named => card == inst.source,
            CardTypeMatch::This if inst.this.is_empty() => card == inst.source,
            CardTypeMatch::This => inst.this.contains(&ObjectRef::Card(card)),
            CardTypeMatch::Filter(filter) => self.filter_matches(inst, filter, card, mode),
        }
    }

    pub(crate) fn filter_matches(&self, inst: &AbilityInstance, f: &CardFilter, card: CardId, mode: MatchMode) -> bool {
        let Some(instance) = self.get_card(card) else {
            return false;
        };
        let selected = match f.selector {
            None => true,
            Some(Selector::Sacrificed) => inst.sacrificed.contains(&card),
            Some(Selector::Target) => mode == MatchMode::Candidates || inst.targets(card.into()),
        };
        if !selected || !f.prefixes.iter().all(|p| prefix_matches(instance, p)) {
            return false;
        }
        if f.without.is_some_and(|k| instance.has_keyword(k)) {
            return false;
        }
        let with = match &f.with {
            None => true,
            Some(With::Keywords(keywords)) => keywords.iter().all(|&k| instance.has_keyword(k)),
            Some(With::Compare { numerical, compare }) => {
                compare.holds(numerical_value(instance, *numerical), self.count_value(inst, &compare.count, mode))
            }
        };
        with && f.targets.iter().all(|m| self.sources_targeting(inst, card, m, mode))
    }

    /// Whether a stack entry sourced by `card` targets a card matching `m`.
    fn sources_targeting(&self, inst: &AbilityInstance, card: CardId, m: &CardMatch, mode: MatchMode) -> bool {
        self.stack.sourced_by(card).any(|entry| {
            entry
                .targeting
                .iter()
                .filter_map(|t| t.as_card())
                .any(|target| self.card_matches(inst, m, target, mode))
        })
    }

    /// Evaluate a count. An attribute of a missing card is 0.
    #[must_use]
    pub fn count_value(&self, inst: &AbilityInstance, count: &Count, mode: MatchMode) -> i64 {
        match count {
            Count::NumberOf(m) => self.query(inst, Some(&Match::Card(m.clone())), None, None, mode).len() as i64,
            Count::Attribute { owner, numerical } => self
                .query(inst, Some(&Match::Card(owner.clone())), None, None, mode)
                .into_iter()
                .find_map(ObjectRef::as_card)
                .and_then(|c| self.get_card(c))
                .map_or(0, |c| numerical_value(c, *numerical)),
            Count::Value(q) => q.value(inst.x),
        }
    }

    #[must_use]
    pub fn player_matches(&self, inst: &AbilityInstance, m: &PlayerMatch, player: PlayerId) -> bool {
        m.0.iter().any(|alt| match alt {
            PlayerTypeMatch::Each => true,
            PlayerTypeMatch::You => player == inst.controller,
            PlayerTypeMatch::Opponent => player != inst.controller,
            PlayerTypeMatch::Controller => self.controllers_of_this(inst).any(|p| p == player),
        })
    }

    /// Controllers of the cards bound as "this", or of the source if none are.
    fn controllers_of_this<'a>(&'a self, inst: &'a AbilityInstance) -> impl Iterator<Item = PlayerId> + 'a {
        let bound: Vec<CardId> = inst.this.iter().filter_map(|o| o.as_card()).collect();
        let cards = if bound.is_empty() { vec![inst.source] } else { bound };
        cards.into_iter().filter_map(|c| self.get_card(c)).map(|c| c.controller)
    }

    #[must_use]
    pub fn any_matches(&self, inst: &AbilityInstance, m: &AnyMatch, object: ObjectRef, mode: MatchMode) -> bool {
        match m {
            AnyMatch::Player(pm) => object.as_player().is_some_and(|p| self.player_matches(inst, pm, p)),
            AnyMatch::Card(cm) => object.as_card().is_some_and(|c| self.card_matches(inst, cm, c, mode)),
            AnyMatch::AnyTarget => mode == MatchMode::Candidates || inst.targets(object),
        }
    }
}

fn prefix_matches(card: &CardInstance, prefix: &Prefix) -> bool {
    match prefix {
        Prefix::Color(color) => card.card.has_color(*color),
        Prefix::NonColor(color) => !card.card.has_color(*color),
        Prefix::Type(t) => card.has_kind(t.kind),
        Prefix::NonType(t) => !card.has_kind(t.kind),
        Prefix::Activated => card.activated,
        Prefix::Deactivated => !card.activated,
        Prefix::Stats(stats) => card.card.stats == Some(*stats),
    }
}

/// "damage" reads current power, "health" current health.
pub(crate) fn numerical_value(card: &CardInstance, numerical: Numerical) -> i64 {
    match numerical {
        Numerical::Damage => card.power(),
        Numerical::Health => card.health(),
    }
}
