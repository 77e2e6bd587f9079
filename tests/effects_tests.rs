//! Effect resolution integration tests.
//!
//! Each test casts or activates a card through the public game API and
//! checks the state after the stack resolves.

use std::cell::RefCell;
use std::rc::Rc;

use ccg_rules::cards::{CardRegistry, CostType, Essence, Quantity};
use ccg_rules::core::{CardId, EngineError, ObjectRef, PlayerId, RulesConfig};
use ccg_rules::effects::{
    AbilityCost, Activated, AnyMatch, CardEffect, CardFilter, CardMatch, CardSubject, Composed, Effect,
    PlayerEffect, PlayerSubject, Selector, Sign, ZoneMatch,
};
use ccg_rules::game::{Answer, Choice, ChoiceResult, Game, PlayerSetup, ScriptedChoice};
use ccg_rules::rules::Phase;
use ccg_rules::triggers::EventType;
use ccg_rules::zones::{Zone, ZonePosition};
use proptest::prelude::*;

const CARDS: &str = "\
Land
Source
{t}: Add {s}.

Knight
Unit - Human Soldier
2/3

Bolt
Spell
Deal 3 damage to target unit.

Shock
Spell
Deal 2 damage to any target.

Fireball {x}
Spell
Deal x damage to any target.

Recruit
Spell
Create 2 1/1 unit human soldier tokens.

Mindrot
Spell
Your opponent discards 2 cards.

Meditate
Spell
You may draw a card.

Growth
Spell
Target unit gets +2/+2.

Altar
Item
Sacrifice a unit: draw 2 cards.

Scry
Spell
Look at the top 2 cards of your deck.

Recall
Spell
Put target unit on top of your deck.

Boon
Spell
Gain 9223372036854775807 life.

Smite
Spell
Deal 9223372036854775807 damage to target unit.

Scatter
Spell
Shuffle units into your board.

Reshuffle
Spell
Shuffle target unit into your deck.

Surge {x}
Spell
Draw x cards.
";

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);

fn game_with(config: RulesConfig, p0: &[&str], p1: &[&str], choice: Box<dyn Choice>) -> Game {
    let (registry, errors) = CardRegistry::load(CARDS);
    assert!(errors.is_empty(), "{errors:?}");
    Game::new(
        config,
        vec![
            PlayerSetup::new(registry.deck(p0)).with_choice(choice),
            PlayerSetup::new(registry.deck(p1)),
        ],
    ).unwrap()
    .with_builtins(registry.builtins().clone())
}

fn game(p0: &[&str], p1: &[&str], script: ScriptedChoice) -> Game {
    game_with(RulesConfig::default(), p0, p1, Box::new(script))
}

fn put(game: &mut Game, card: u32, zone: Zone) {
    game.move_card(CardId(card), zone, ZonePosition::Top).unwrap();
}

fn zone_of(game: &Game, card: u32) -> Zone {
    game.get_card(CardId(card)).unwrap().zone
}

/// Cast `card` for player 0 in their play phase and resolve the stack.
fn cast_and_resolve(game: &mut Game, card: u32) {
    game.enter_phase(Phase::Play).unwrap();
    game.cast(P0, CardId(card), None).unwrap();
    while game.resolve_top().unwrap() {}
}

// =============================================================================
// Damage and destruction
// =============================================================================

#[test]
fn test_bolt_destroys_target() {
    let mut game = game(&["Bolt"], &["Knight"], ScriptedChoice::picks([0]));
    put(&mut game, 0, Zone::Hand);
    put(&mut game, 1, Zone::Board);

    game.enter_phase(Phase::Play).unwrap();
    game.cast(P0, CardId(0), None).unwrap();
    assert_eq!(game.stack().len(), 1);
    assert_eq!(game.stack().entries()[0].targeting, vec![ObjectRef::Card(CardId(1))]);

    assert!(game.resolve_top().unwrap());
    assert_eq!(zone_of(&game, 1), Zone::Pile);
    assert_eq!(zone_of(&game, 0), Zone::Pile);
    assert!(game.stack().is_empty());
}

#[test]
fn test_shock_player() {
    // Candidates: player 0, player 1.
    let mut game = game(&["Shock"], &["Knight"], ScriptedChoice::picks([1]));
    put(&mut game, 0, Zone::Hand);

    let hits = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&hits);
    game.on(EventType::PlayerDamage, move |e| seen.borrow_mut().push(e.subject));

    cast_and_resolve(&mut game, 0);
    assert_eq!(game.player(P1).unwrap().life, 18);
    assert_eq!(*hits.borrow(), vec![ObjectRef::Player(P1)]);
}

#[test]
fn test_x_cost_sets_damage() {
    // x = 1, then target player 1.
    let script = ScriptedChoice::new([Answer::Pick(1), Answer::Pick(1)]);
    let mut game = game(&["Land", "Fireball"], &["Knight"], script);
    put(&mut game, 0, Zone::Board);
    put(&mut game, 1, Zone::Hand);

    game.enter_phase(Phase::Start).unwrap();
    game.activate(P0, CardId(0), 0).unwrap();
    assert_eq!(game.player(P0).unwrap().essence_count(), 1);
    assert!(!game.get_card(CardId(0)).unwrap().activated);

    cast_and_resolve(&mut game, 1);
    assert_eq!(game.player(P1).unwrap().life, 19);
    assert_eq!(game.player(P0).unwrap().essence_count(), 0);
}

// =============================================================================
// Player effects
// =============================================================================

#[test]
fn test_tokens_fill_free_slots() {
    let mut game = game(&["Recruit"], &[], ScriptedChoice::default());
    put(&mut game, 0, Zone::Hand);
    cast_and_resolve(&mut game, 0);

    let tokens: Vec<_> = game.cards().iter().filter(|c| c.zone == Zone::Board).collect();
    assert_eq!(tokens.len(), 2);
    for token in tokens {
        assert_eq!(token.name(), "Human Soldier Token");
        assert!(token.is_unit());
        assert_eq!((token.power(), token.health()), (1, 1));
        assert_eq!(token.owner, P0);
    }
}

#[test]
fn test_tokens_stop_at_full_board() {
    let mut game = game_with(
        RulesConfig::default().with_board_size(1),
        &["Recruit"],
        &[],
        Box::new(ScriptedChoice::default()),
    );
    put(&mut game, 0, Zone::Hand);
    cast_and_resolve(&mut game, 0);
    assert_eq!(game.player(P0).unwrap().board.len(), 1);
}

#[test]
fn test_discard_is_mandatory() {
    let mut game = game(&["Mindrot"], &["Knight", "Knight", "Knight"], ScriptedChoice::default());
    put(&mut game, 0, Zone::Hand);
    for card in 1..=3 {
        put(&mut game, card, Zone::Hand);
    }

    let discards = Rc::new(RefCell::new(0));
    let seen = Rc::clone(&discards);
    game.on(EventType::Discard, move |_| *seen.borrow_mut() += 1);

    cast_and_resolve(&mut game, 0);
    let opponent = game.player(P1).unwrap();
    assert_eq!(opponent.hand.len(), 1);
    assert_eq!(opponent.pile.len(), 2);
    assert_eq!(*discards.borrow(), 2);
}

#[test]
fn test_may_clause_accepted() {
    let mut game = game(&["Meditate", "Knight"], &[], ScriptedChoice::picks([0]));
    put(&mut game, 0, Zone::Hand);
    cast_and_resolve(&mut game, 0);
    assert_eq!(game.player(P0).unwrap().hand.to_vec(), vec![CardId(1)]);
}

#[test]
fn test_may_clause_declined() {
    let mut game = game(&["Meditate", "Knight"], &[], ScriptedChoice::new([Answer::Skip]));
    put(&mut game, 0, Zone::Hand);
    cast_and_resolve(&mut game, 0);
    assert!(game.player(P0).unwrap().hand.is_empty());
    assert_eq!(game.player(P0).unwrap().deck.len(), 1);
}

#[test]
fn test_put_on_top_of_deck() {
    let mut game = game(&["Recall"], &["Knight"], ScriptedChoice::picks([0]));
    put(&mut game, 0, Zone::Hand);
    put(&mut game, 1, Zone::Board);
    cast_and_resolve(&mut game, 0);

    let opponent = game.player(P1).unwrap();
    assert!(opponent.board.is_empty());
    assert_eq!(opponent.deck.top(), Some(CardId(1)));
}

/// Records revealed cards and counts prompts. Declines everything.
#[derive(Default)]
struct Watcher {
    revealed: Rc<RefCell<Vec<CardId>>>,
    modes: Rc<RefCell<usize>>,
    targets: Rc<RefCell<usize>>,
}

impl Watcher {
    fn shared(&self) -> Self {
        Self {
            revealed: Rc::clone(&self.revealed),
            modes: Rc::clone(&self.modes),
            targets: Rc::clone(&self.targets),
        }
    }
}

impl Choice for Watcher {
    fn card(&mut self, _: PlayerId, _: &[CardId]) -> ChoiceResult<usize> {
        Ok(None)
    }
    fn mode(&mut self, _: PlayerId, _: &[String]) -> ChoiceResult<usize> {
        *self.modes.borrow_mut() += 1;
        Ok(None)
    }
    fn field(&mut self, _: PlayerId, _: &[usize]) -> ChoiceResult<usize> {
        Ok(None)
    }
    fn ability(&mut self, _: PlayerId, _: CardId, _: &[String]) -> ChoiceResult<usize> {
        Ok(None)
    }
    fn target(&mut self, _: PlayerId, _: &[ObjectRef], _: usize) -> ChoiceResult<Vec<usize>> {
        *self.targets.borrow_mut() += 1;
        Ok(None)
    }
    fn discard(&mut self, _: PlayerId, _: &[CardId], _: usize) -> ChoiceResult<Vec<usize>> {
        Ok(None)
    }
    fn reveal(&mut self, _: PlayerId, cards: &[CardId]) {
        self.revealed.borrow_mut().extend_from_slice(cards);
    }
}

#[test]
fn test_look_reveals_top_cards() {
    let watcher = Watcher::default();
    let mut game = game_with(
        RulesConfig::default(),
        &["Scry", "Knight", "Knight", "Knight"],
        &[],
        Box::new(watcher.shared()),
    );
    put(&mut game, 0, Zone::Hand);
    cast_and_resolve(&mut game, 0);

    assert_eq!(*watcher.revealed.borrow(), vec![CardId(1), CardId(2)]);
    assert_eq!(game.player(P0).unwrap().deck.len(), 3);
}

// =============================================================================
// Card effects and costs
// =============================================================================

#[test]
fn test_gets_applies_to_targeted_subject() {
    let mut game = game(&["Growth", "Knight"], &[], ScriptedChoice::picks([0]));
    put(&mut game, 0, Zone::Hand);
    put(&mut game, 1, Zone::Board);
    cast_and_resolve(&mut game, 0);

    let knight = game.get_card(CardId(1)).unwrap();
    assert_eq!((knight.power(), knight.health()), (4, 5));
}

#[test]
fn test_sacrifice_cost_is_paid_before_stack() {
    let mut game = game(&["Altar", "Knight", "Knight", "Knight"], &[], ScriptedChoice::default());
    put(&mut game, 0, Zone::Board);
    put(&mut game, 1, Zone::Board);

    let sacrificed = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&sacrificed);
    game.on(EventType::Sacrifice, move |e| seen.borrow_mut().push(e.subject));

    game.enter_phase(Phase::Play).unwrap();
    game.activate(P0, CardId(0), 0).unwrap();
    assert_eq!(zone_of(&game, 1), Zone::Pile);
    assert_eq!(*sacrificed.borrow(), vec![ObjectRef::Card(CardId(1))]);
    assert_eq!(game.stack().len(), 1);

    while game.resolve_top().unwrap() {}
    assert_eq!(game.player(P0).unwrap().hand.len(), 2);
}

#[test]
fn test_essence_ability_skips_stack() {
    let mut game = game(&["Land"], &[], ScriptedChoice::default());
    put(&mut game, 0, Zone::Board);
    game.enter_phase(Phase::Start).unwrap();

    game.activate(P0, CardId(0), 0).unwrap();
    assert!(game.stack().is_empty());
    assert_eq!(game.player(P0).unwrap().essence_count(), 1);

    // Deactivated now, so it cannot pay {t} again.
    assert!(game.activate(P0, CardId(0), 0).is_err());
    assert_eq!(game.player(P0).unwrap().essence_count(), 1);
}

#[test]
fn test_unpayable_sacrifice_is_rejected() {
    let mut game = game(&["Altar"], &["Knight"], ScriptedChoice::default());
    put(&mut game, 0, Zone::Board);
    put(&mut game, 1, Zone::Board);
    game.enter_phase(Phase::Play).unwrap();

    // The only unit belongs to the opponent.
    assert!(game.usable_abilities(P0, CardId(0)).is_empty());
    let err = game.activate(P0, CardId(0), 0).unwrap_err();
    assert_eq!(err, EngineError::InsufficientResources { card: CardId(0) });
    assert!(game.stack().is_empty());
    assert_eq!(zone_of(&game, 1), Zone::Board);
}

#[test]
fn test_x_without_essence_is_not_asked() {
    let watcher = Watcher::default();
    let mut game = game_with(RulesConfig::default(), &["Surge", "Knight"], &[], Box::new(watcher.shared()));
    put(&mut game, 0, Zone::Hand);
    cast_and_resolve(&mut game, 0);

    assert_eq!(*watcher.modes.borrow(), 0);
    assert_eq!(game.player(P0).unwrap().deck.len(), 1);
    assert_eq!(zone_of(&game, 0), Zone::Pile);
}

// =============================================================================
// Extreme amounts and failed resolution
// =============================================================================

#[test]
fn test_huge_life_gain_saturates() {
    let mut game = game(&["Boon", "Boon"], &[], ScriptedChoice::default());
    put(&mut game, 0, Zone::Hand);
    put(&mut game, 1, Zone::Hand);
    cast_and_resolve(&mut game, 0);
    assert_eq!(game.player(P0).unwrap().life, i64::MAX);

    cast_and_resolve(&mut game, 1);
    assert_eq!(game.player(P0).unwrap().life, i64::MAX);
}

#[test]
fn test_huge_damage_destroys_unit() {
    let mut game = game(&["Smite"], &["Knight"], ScriptedChoice::picks([0]));
    put(&mut game, 0, Zone::Hand);
    put(&mut game, 1, Zone::Board);
    game.deal_damage(CardId(1), 1).unwrap();

    cast_and_resolve(&mut game, 0);
    assert_eq!(zone_of(&game, 1), Zone::Pile);
}

#[test]
fn test_failed_effect_still_leaves_stack() {
    let mut game = game_with(
        RulesConfig::default().with_board_size(1),
        &["Scatter", "Knight", "Knight"],
        &[],
        Box::new(ScriptedChoice::default()),
    );
    put(&mut game, 0, Zone::Hand);
    put(&mut game, 1, Zone::Board);
    put(&mut game, 2, Zone::Hand);

    game.enter_phase(Phase::Play).unwrap();
    game.cast(P0, CardId(0), None).unwrap();
    // The board is full, so moving the second knight onto it fails.
    assert!(game.resolve_top().is_err());
    assert_eq!(zone_of(&game, 0), Zone::Pile);
    assert_eq!(zone_of(&game, 2), Zone::Hand);
    assert!(game.stack().is_empty());
}

#[test]
fn test_shuffle_objects_are_not_targeted() {
    let watcher = Watcher::default();
    let mut game = game_with(RulesConfig::default(), &["Reshuffle", "Knight"], &[], Box::new(watcher.shared()));
    put(&mut game, 0, Zone::Hand);
    put(&mut game, 1, Zone::Board);
    cast_and_resolve(&mut game, 0);

    assert_eq!(*watcher.targets.borrow(), 0);
    assert_eq!(zone_of(&game, 1), Zone::Board);
    assert_eq!(zone_of(&game, 0), Zone::Pile);
}

// =============================================================================
// Cost invariant
// =============================================================================

fn card_match(targeted: bool) -> CardMatch {
    if targeted {
        CardMatch::filter(CardFilter::default().with_selector(Selector::Target))
    } else {
        CardMatch::any()
    }
}

fn player_effect() -> impl Strategy<Value = PlayerEffect> {
    prop_oneof![
        (0i64..4).prop_map(|n| PlayerEffect::Draw { count: Quantity::Number(n) }),
        prop::sample::select(Essence::ALL.to_vec()).prop_map(|e| PlayerEffect::Add {
            essence: vec![CostType::Essence(e)],
        }),
        any::<i64>().prop_map(|n| PlayerEffect::GainLife { amount: Quantity::Number(n) }),
        any::<bool>().prop_map(|t| PlayerEffect::Destroy { target: card_match(t) }),
        any::<bool>().prop_map(|t| PlayerEffect::Shuffle {
            objects: Some(card_match(t)),
            zone: ZoneMatch::one(Zone::Deck),
        }),
    ]
}

fn card_effect() -> impl Strategy<Value = CardEffect> {
    prop_oneof![
        any::<bool>().prop_map(|t| CardEffect::Damage {
            amount: Quantity::Number(1),
            target: if t { AnyMatch::AnyTarget } else { AnyMatch::Card(CardMatch::any()) },
        }),
        Just(CardEffect::Gets {
            power_sign: Sign::Plus,
            power: Quantity::Number(1),
            health_sign: Sign::Minus,
            health: Quantity::Number(1),
        }),
    ]
}

fn effect() -> impl Strategy<Value = Effect> {
    prop_oneof![
        proptest::collection::vec(player_effect(), 1..4).prop_map(|effects| Effect::Player(PlayerSubject {
            subject: None,
            optional: false,
            effects,
        })),
        (any::<bool>(), proptest::collection::vec(card_effect(), 1..3)).prop_map(|(t, effects)| {
            Effect::Card(CardSubject {
                subject: t.then(|| card_match(true)),
                effects,
            })
        }),
    ]
}

proptest! {
    #[test]
    fn prop_cost_iff_untargeted_costs(effects in proptest::collection::vec(effect(), 1..4)) {
        let composed = Composed::new(effects);
        let expected = !composed.has_target() && composed.effects.iter().all(Effect::is_cost);
        prop_assert_eq!(composed.is_cost(), expected);
        if composed.effects.iter().any(Effect::has_target) {
            prop_assert!(!composed.is_cost());
        }

        let activated = Activated::new(vec![AbilityCost::Cost(CostType::Deactivate)], composed);
        prop_assert_eq!(activated.is_cost(), expected);
    }
}
