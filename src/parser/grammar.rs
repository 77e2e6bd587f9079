//! Ability and effect productions.

use super::parser::{PResult, Parser};
use crate::cards::{CardKind, Keyword};
use crate::effects::{
    Ability, AbilityCost, Activated, CardEffect, CardSubject, Composed, Effect, PlayerEffect,
    PlayerSubject, PutPosition, Sign, Triggered,
};

type Production<T> = fn(&mut Parser) -> PResult<T>;

/// Player effects in the order they are tried.
const PLAYER_EFFECTS: [Production<PlayerEffect>; 16] = [
    Parser::draw,
    Parser::token,
    Parser::destroy,
    Parser::add,
    Parser::gain_life,
    Parser::lose_life,
    Parser::discard,
    Parser::shuffle,
    Parser::extra_turn,
    Parser::look,
    Parser::put,
    Parser::activate,
    Parser::deactivate,
    Parser::sacrifice,
    Parser::pay_essence,
    Parser::pay_life,
];

impl Parser {
    /// `Keyword | Composed | Activated | Triggered`
    pub(crate) fn ability(&mut self) -> PResult<Ability> {
        if let Some(k) = self.attempt(Self::keyword) {
            return Ok(Ability::Keyword(k));
        }
        if let Some(c) = self.attempt(Self::composed) {
            return Ok(Ability::Composed(c));
        }
        if let Some(a) = self.attempt(Self::activated) {
            return Ok(Ability::Activated(a));
        }
        self.triggered().map(Ability::Triggered)
    }

    pub(crate) fn keyword(&mut self) -> PResult<Keyword> {
        self.word_as("keyword", Keyword::from_word)
    }

    /// `Effect ("," ("then" | "and")? Effect)* "."`
    pub(crate) fn composed(&mut self) -> PResult<Composed> {
        let mut effects = vec![self.effect()?];
        while let Some(effect) = self.attempt(|p| {
            p.continuation()?;
            p.effect()
        }) {
            effects.push(effect);
        }
        self.expect_punct('.')?;
        Ok(Composed::new(effects))
    }

    /// `AbilityCost+ ":" Composed`
    pub(crate) fn activated(&mut self) -> PResult<Activated> {
        let costs = self.many1(Self::ability_cost)?;
        self.expect_punct(':')?;
        let effect = self.composed()?;
        Ok(Activated::new(costs, effect))
    }

    fn ability_cost(&mut self) -> PResult<AbilityCost> {
        if let Some(cost) = self.attempt(Self::cost_type) {
            return Ok(AbilityCost::Cost(cost));
        }
        self.effect().map(AbilityCost::Effect)
    }

    /// `Trigger "," Composed`
    pub(crate) fn triggered(&mut self) -> PResult<Triggered> {
        let trigger = self.trigger()?;
        self.expect_punct(',')?;
        let effect = self.composed()?;
        Ok(Triggered { trigger, effect })
    }

    /// `"," ("then" | "and")?`
    fn continuation(&mut self) -> PResult<()> {
        self.expect_punct(',')?;
        self.eat_one_of(&["then", "and"]);
        Ok(())
    }

    // ── Effects ──────────────────────────────────────────────────

    pub(crate) fn effect(&mut self) -> PResult<Effect> {
        if let Some(p) = self.attempt(Self::player_subject) {
            return Ok(Effect::Player(p));
        }
        self.card_subject().map(Effect::Card)
    }

    fn player_subject(&mut self) -> PResult<PlayerSubject> {
        let mut optional = false;
        let subject = self.attempt(|p| {
            let m = p.player_match()?;
            optional = p.eat_word("may");
            Ok(m)
        });
        if subject.is_none() {
            optional = false;
        }
        let mut effects = vec![self.player_effect()?];
        while let Some(effect) = self.attempt(|p| {
            p.continuation()?;
            p.player_effect()
        }) {
            effects.push(effect);
        }
        Ok(PlayerSubject {
            subject,
            optional,
            effects,
        })
    }

    fn card_subject(&mut self) -> PResult<CardSubject> {
        let subject = self.attempt(Self::card_match);
        let mut effects = vec![self.card_effect()?];
        while let Some(effect) = self.attempt(|p| {
            p.continuation()?;
            p.card_effect()
        }) {
            effects.push(effect);
        }
        Ok(CardSubject { subject, effects })
    }

    pub(crate) fn player_effect(&mut self) -> PResult<PlayerEffect> {
        for production in PLAYER_EFFECTS {
            if let Some(effect) = self.attempt(production) {
                return Ok(effect);
            }
        }
        Err(())
    }

    fn draw(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["draw", "draws"])?;
        let count = self.quantity()?;
        self.expect_one_of(&["card", "cards"])?;
        Ok(PlayerEffect::Draw { count })
    }

    fn token(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["create", "creates"])?;
        let count = self.quantity()?;
        let stats = self.attempt(Self::stats);
        let types = self.many(|p| {
            let t = p.card_type()?;
            if t.kind == CardKind::Token {
                return Err(());
            }
            Ok(t)
        });
        let subtypes = self.many(Self::sub_type);
        self.expect_one_of(&["token", "tokens"])?;
        Ok(PlayerEffect::Token {
            count,
            stats,
            types,
            subtypes,
        })
    }

    fn destroy(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["destroy", "destroys"])?;
        let target = self.card_match()?;
        Ok(PlayerEffect::Destroy { target })
    }

    fn add(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["add", "adds"])?;
        let essence = self.many1(Self::cost_type)?;
        Ok(PlayerEffect::Add { essence })
    }

    fn gain_life(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["gain", "gains"])?;
        let amount = self.quantity()?;
        self.expect_word("life")?;
        Ok(PlayerEffect::GainLife { amount })
    }

    fn lose_life(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["lose", "loses"])?;
        let amount = self.quantity()?;
        self.expect_word("life")?;
        Ok(PlayerEffect::LoseLife { amount })
    }

    fn discard(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["discard", "discards"])?;
        let count = self.quantity()?;
        let filter = self.attempt(Self::card_match);
        Ok(PlayerEffect::Discard { count, filter })
    }

    fn shuffle(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["shuffle", "shuffles"])?;
        let objects = self.attempt(|p| {
            let m = p.card_match()?;
            p.expect_word("into")?;
            Ok(m)
        });
        let zone = self.zone_match()?;
        Ok(PlayerEffect::Shuffle { objects, zone })
    }

    fn extra_turn(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["take", "takes"])?;
        let count = self.quantity()?;
        self.expect_word("extra")?;
        self.expect_one_of(&["turn", "turns"])?;
        Ok(PlayerEffect::ExtraTurn { count })
    }

    fn look(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["look", "looks"])?;
        self.expect_words(&["at", "the", "top"])?;
        let count = self.quantity()?;
        self.expect_one_of(&["card", "cards"])?;
        self.expect_word("of")?;
        let zone = self.zone_match()?;
        Ok(PlayerEffect::Look { count, zone })
    }

    fn put(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["put", "puts"])?;
        let objects = self.card_match()?;
        let position = if self.eat_words(&["on", "top", "of"]) {
            PutPosition::Top
        } else if self.eat_words(&["on", "the", "bottom", "of"]) {
            PutPosition::Bottom
        } else {
            self.expect_word("into")?;
            PutPosition::Into
        };
        let zone = self.zone_match()?;
        let any_order = self.eat_words(&["in", "any", "order"]);
        let random_order = self.eat_words(&["in", "random", "order"]);
        let deactivated = self.eat_word("deactivated");
        Ok(PlayerEffect::Put {
            objects,
            position,
            zone,
            any_order,
            random_order,
            deactivated,
        })
    }

    fn activate(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["activate", "activates"])?;
        let objects = self.card_match()?;
        Ok(PlayerEffect::Activate { objects })
    }

    fn deactivate(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["deactivate", "deactivates"])?;
        let objects = self.card_match()?;
        Ok(PlayerEffect::Deactivate { objects })
    }

    fn sacrifice(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["sacrifice", "sacrifices"])?;
        let objects = self.card_match()?;
        Ok(PlayerEffect::Sacrifice { objects })
    }

    fn pay_essence(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["spend", "spends"])?;
        let costs = self.many1(Self::cost_type)?;
        Ok(PlayerEffect::PayEssence { costs })
    }

    fn pay_life(&mut self) -> PResult<PlayerEffect> {
        self.expect_one_of(&["spend", "spends"])?;
        let amount = self.quantity()?;
        self.expect_word("life")?;
        Ok(PlayerEffect::PayLife { amount })
    }

    pub(crate) fn card_effect(&mut self) -> PResult<CardEffect> {
        if let Some(effect) = self.attempt(Self::damage) {
            return Ok(effect);
        }
        self.gets()
    }

    fn damage(&mut self) -> PResult<CardEffect> {
        self.expect_one_of(&["deal", "deals"])?;
        let amount = self.quantity()?;
        self.expect_words(&["damage", "to"])?;
        let target = self.any_match()?;
        Ok(CardEffect::Damage { amount, target })
    }

    /// `(get | gets) Sign Quantity "/" Sign Quantity`
    fn gets(&mut self) -> PResult<CardEffect> {
        self.expect_one_of(&["get", "gets"])?;
        let power_sign = self.sign()?;
        let power = self.quantity()?;
        self.expect_punct('/')?;
        let health_sign = self.sign()?;
        let health = self.quantity()?;
        Ok(CardEffect::Gets {
            power_sign,
            power,
            health_sign,
            health,
        })
    }

    fn sign(&mut self) -> PResult<Sign> {
        if self.eat_punct('+') {
            Ok(Sign::Plus)
        } else if self.eat_punct('-') {
            Ok(Sign::Minus)
        } else {
            Err(())
        }
    }
}
