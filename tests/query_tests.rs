//! Query and pick integration tests.
//!
//! Matches are parsed from card text, then evaluated against a small
//! two-player board.

use ccg_rules::cards::CardRegistry;
use ccg_rules::core::{CardId, ObjectRef, PlayerId, RulesConfig};
use ccg_rules::effects::{
    Ability, AbilityInstance, Effect, InstanceId, InstanceKind, Match, PlayerEffect, ZoneMatch,
};
use ccg_rules::game::{Game, PlayerSetup, ScriptedChoice};
use ccg_rules::parser::parse;
use ccg_rules::query::MatchMode;
use ccg_rules::zones::{Zone, ZonePosition};

const CARDS: &str = "\
Knight {s}
Unit - Human Soldier
2/3

Miser {o}
Unit - Dwarf Merchant
1/1

Page {w}
Unit - Human
1/2

Guard {s}
Unit - Dwarf Soldier
2/2

Thief {o}
Unit - Elf Rogue
2/1
";

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);

/// Player 0 owns cards 0..3, player 1 owns 3..5. Page (2) is in hand, the
/// rest are on the boards.
fn game(script: ScriptedChoice) -> Game {
    let (registry, errors) = CardRegistry::load(CARDS);
    assert!(errors.is_empty(), "{errors:?}");
    let mut game = Game::new(
        RulesConfig::default(),
        vec![
            PlayerSetup::new(registry.deck(&["Knight", "Miser", "Page"])).with_choice(Box::new(script)),
            PlayerSetup::new(registry.deck(&["Guard", "Thief"])),
        ],
    ).unwrap();
    for card in [0, 1, 3, 4] {
        game.move_card(CardId(card), Zone::Board, ZonePosition::Top).unwrap();
    }
    game.move_card(CardId(2), Zone::Hand, ZonePosition::Top).unwrap();
    game
}

fn instance() -> AbilityInstance {
    AbilityInstance::new(InstanceId(0), InstanceKind::Cast, CardId(2), P0)
}

/// The match of the first player clause of a one-line spell.
fn clause(sentence: &str) -> (Option<Match>, PlayerEffect) {
    let card = parse(&format!("Sample\nSpell\n{sentence}")).unwrap();
    let Ability::Composed(composed) = &card.abilities[0] else {
        panic!("expected a composed ability");
    };
    let Effect::Player(subject) = &composed.effects[0] else {
        panic!("expected a player clause");
    };
    (subject.subject.clone().map(Match::Player), subject.effects[0].clone())
}

fn destroyed(sentence: &str) -> Match {
    match clause(sentence).1 {
        PlayerEffect::Destroy { target } => Match::Card(target),
        other => panic!("expected destroy, got {other:?}"),
    }
}

fn cards(ids: &[u32]) -> Vec<ObjectRef> {
    ids.iter().map(|&c| ObjectRef::Card(CardId(c))).collect()
}

// =============================================================================
// Query
// =============================================================================

#[test]
fn test_filters_combine() {
    let game = game(ScriptedChoice::default());
    let m = destroyed("Destroy target non-coin unit with health 2 or less.");
    let board = ZoneMatch::one(Zone::Board);

    let found = game.query(&instance(), Some(&m), Some(&board), None, MatchMode::Candidates);
    assert_eq!(found, cards(&[3]));
    // Nothing is picked yet.
    assert!(game.query(&instance(), Some(&m), None, None, MatchMode::Bound).is_empty());
}

#[test]
fn test_zone_order_and_limit() {
    let game = game(ScriptedChoice::default());
    let m = destroyed("Destroy units.");
    assert_eq!(m.target_count(), -1);

    let all = game.query(&instance(), Some(&m), None, None, MatchMode::Bound);
    assert_eq!(all, cards(&[0, 1, 2, 3, 4]));
    let first = game.query(&instance(), Some(&m), None, Some(2), MatchMode::Bound);
    assert_eq!(first, cards(&[0, 1]));
}

#[test]
fn test_player_matches() {
    let game = game(ScriptedChoice::default());

    let (each, _) = clause("Each player draws a card.");
    let found = game.query(&instance(), each.as_ref(), None, None, MatchMode::Bound);
    assert_eq!(found, vec![ObjectRef::Player(P0), ObjectRef::Player(P1)]);

    let (opponent, _) = clause("Your opponent draws a card.");
    let found = game.query(&instance(), opponent.as_ref(), None, None, MatchMode::Bound);
    assert_eq!(found, vec![ObjectRef::Player(P1)]);

    let (you, _) = clause("Draw a card.");
    assert!(you.is_none());
    let found = game.query(&instance(), None, None, None, MatchMode::Bound);
    assert_eq!(found, vec![ObjectRef::Player(P0)]);
}

// =============================================================================
// Pick
// =============================================================================

#[test]
fn test_pick_records_target() {
    // Board candidates: Knight, Miser, Guard, Thief.
    let mut game = game(ScriptedChoice::picks([1]));
    let m = destroyed("Destroy target unit.");
    assert_eq!(m.target_count(), 1);

    let mut inst = instance();
    let picked = game.pick(&mut inst, &m, None);
    assert_eq!(picked, cards(&[1]));
    assert_eq!(inst.targeting, cards(&[1]));
    assert_eq!(game.query(&inst, Some(&m), None, None, MatchMode::Bound), cards(&[1]));
}

#[test]
fn test_pick_decline_keeps_nothing() {
    let mut game = game(ScriptedChoice::default());
    let m = destroyed("Destroy target unit.");
    let mut inst = instance();
    assert!(game.pick(&mut inst, &m, None).is_empty());
    assert!(inst.targeting.is_empty());
}

#[test]
fn test_pick_untargeted_skips_prompt() {
    let mut game = game(ScriptedChoice::picks([0]));
    let m = destroyed("Destroy units with health 1 or less.");
    let mut inst = instance();
    assert_eq!(game.pick(&mut inst, &m, None), cards(&[1, 4]));
    assert!(inst.targeting.is_empty());
}
