//! Turns, phases and the priority loop.

use log::{info, warn};

use super::{GameResult, Phase};
use crate::core::{PlayerId, Result};
use crate::game::Game;
use crate::triggers::EventType;

impl Game {
    /// Play a whole game.
    ///
    /// A random seat starts. Everyone is set to `start_life` and draws
    /// `start_cards`, then turns run until at most one player remains (a
    /// one-player game runs until its player loses) or `max_turns` is hit.
    pub fn run(&mut self) -> GameResult {
        let count = self.player_count();
        let Some(first) = PlayerId::all(count).nth(self.rng.gen_range_usize(0..count.max(1))) else {
            return GameResult::Draw;
        };
        self.turn.active = first;
        for player in PlayerId::all(count) {
            self.players[player].life = self.config.start_life;
        }
        for player in PlayerId::all(count) {
            if let Err(e) = self.draw(player, self.config.start_cards as i64) {
                warn!("opening draw for {player} failed: {e}");
            }
        }
        info!("game start: {count} players, {first} begins");

        let mut current = first;
        while !self.is_over() {
            if self.config.max_turns.is_some_and(|max| self.turn.turn_number >= max) {
                info!("turn limit {} reached", self.turn.turn_number);
                break;
            }
            self.run_turn(current);

            let player = &mut self.players[current];
            if player.extra_turns > 0 && !player.lost {
                player.extra_turns -= 1;
            } else {
                current = self.next_seat(current);
            }
        }

        let result = self.result();
        for winner in result.winners() {
            self.emit(EventType::Win, winner);
        }
        info!("game over after {} turns: {result:?}", self.turn.turn_number);
        result
    }

    /// Run one turn of `player`.
    pub fn run_turn(&mut self, player: PlayerId) {
        self.turn.active = player;
        self.turn.turn_number += 1;
        info!("turn {}: {player}", self.turn.turn_number);

        for phase in Phase::ALL {
            if let Err(e) = self.enter_phase(phase) {
                warn!("{phase} phase of {player}: {e}");
            }
            self.run_phase();
            if self.is_over() {
                return;
            }
        }
    }

    /// Do what happens on entering `phase`, then emit its event.
    pub fn enter_phase(&mut self, phase: Phase) -> Result<()> {
        let active = self.turn.active;
        self.turn.phase = phase;
        self.stack.reset_priority(active);

        match phase {
            Phase::Start => {
                self.players[active].essence.clear();
                let permanents: Vec<_> = self.players[active].board.cards().collect();
                for card in permanents {
                    self.card_mut(card)?.activated = true;
                }
                self.turn.sources_played = 0;
                self.emit(EventType::StartPhase, active);
            }
            Phase::Draw => {
                self.draw(active, 1)?;
                self.emit(EventType::DrawPhase, active);
            }
            Phase::Play => self.emit(EventType::PlayPhase, active),
            Phase::End => self.emit(EventType::EndPhase, active),
        }
        Ok(())
    }

    /// Hand priority around until every player passes with an empty stack.
    ///
    /// The holder keeps acting until they pass or fail an action. After
    /// `max_actions_per_phase` actions in one window a pass is forced.
    /// Players who have lost always pass.
    pub fn run_phase(&mut self) {
        let mut actions = 0;
        loop {
            let holder = self.stack.priority();
            if !self.players[holder].lost {
                if actions < self.config.max_actions_per_phase {
                    if self.take_action(holder) {
                        actions += 1;
                        continue;
                    }
                } else {
                    warn!("{holder} took {actions} actions, forcing a pass");
                }
            }

            actions = 0;
            if !self.stack.pass() {
                continue;
            }
            if self.stack.is_empty() || self.is_over() {
                break;
            }
            if let Err(e) = self.resolve_top() {
                warn!("resolution failed: {e}");
            }
            self.stack.reset_priority(self.turn.active);
        }
    }

    /// Pop and resolve the top of the stack. `false` if it was empty.
    pub fn resolve_top(&mut self) -> Result<bool> {
        match self.stack.pop() {
            Some(inst) => {
                self.resolve_instance(inst)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Whether the game is decided.
    #[must_use]
    pub fn is_over(&self) -> bool {
        let remaining = self.remaining_players().len();
        if self.player_count() == 1 {
            remaining == 0
        } else {
            remaining <= 1
        }
    }

    /// Next seat after `player` that has not lost. Wraps around.
    fn next_seat(&self, player: PlayerId) -> PlayerId {
        let count = self.player_count();
        (1..=count)
            .map(|i| PlayerId::new(((player.index() + i) % count) as u8))
            .find(|&p| !self.players[p].lost)
            .unwrap_or(player)
    }

    fn result(&self) -> GameResult {
        let remaining = self.remaining_players();
        match remaining.as_slice() {
            [winner] if self.player_count() > 1 => GameResult::Winner(*winner),
            _ => GameResult::Draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardKind, CardType, CostType, Essence, Keyword, Quantity, Stats};
    use crate::core::{CardId, ObjectRef, RulesConfig};
    use crate::effects::Ability;
    use crate::game::{Choice, ChoiceResult, PlayerSetup};
    use crate::zones::{Zone, ZonePosition};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    /// Records who is asked for a card, then passes.
    struct Recorder(Rc<RefCell<Vec<PlayerId>>>);

    impl Choice for Recorder {
        fn card(&mut self, player: PlayerId, _: &[CardId]) -> ChoiceResult<usize> {
            self.0.borrow_mut().push(player);
            Ok(None)
        }
        fn mode(&mut self, _: PlayerId, _: &[String]) -> ChoiceResult<usize> {
            Ok(None)
        }
        fn field(&mut self, _: PlayerId, _: &[usize]) -> ChoiceResult<usize> {
            Ok(None)
        }
        fn ability(&mut self, _: PlayerId, _: CardId, _: &[String]) -> ChoiceResult<usize> {
            Ok(None)
        }
        fn target(&mut self, _: PlayerId, _: &[ObjectRef], _: usize) -> ChoiceResult<Vec<usize>> {
            Ok(None)
        }
        fn discard(&mut self, _: PlayerId, _: &[CardId], _: usize) -> ChoiceResult<Vec<usize>> {
            Ok(None)
        }
    }

    fn costly_unit() -> Arc<Card> {
        Arc::new(
            Card::new("Guard")
                .with_cost(CostType::Essence(Essence::Coin))
                .with_type(CardType::new(CardKind::Unit))
                .with_stats(Stats::new(Quantity::Number(1), Quantity::Number(1))),
        )
    }

    fn ambusher() -> Arc<Card> {
        Arc::new(
            Card::new("Lurker")
                .with_type(CardType::new(CardKind::Unit))
                .with_ability(Ability::Keyword(Keyword::Ambush))
                .with_stats(Stats::new(Quantity::Number(1), Quantity::Number(1))),
        )
    }

    fn decks(players: usize, cards: usize) -> Vec<PlayerSetup> {
        (0..players)
            .map(|_| PlayerSetup::new((0..cards).map(|_| costly_unit()).collect()))
            .collect()
    }

    #[test]
    fn test_priority_visits_seats_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let setups = (0..2)
            .map(|_| PlayerSetup::new(vec![ambusher()]).with_choice(Box::new(Recorder(Rc::clone(&log)))))
            .collect();
        let mut game = Game::new(RulesConfig::default(), setups).unwrap();
        for card in [0, 1] {
            game.move_card(CardId(card), Zone::Hand, ZonePosition::Top).unwrap();
        }

        game.run_phase();
        assert_eq!(*log.borrow(), vec![PlayerId(0), PlayerId(1)]);
        assert_eq!(game.stack().priority(), PlayerId(1));

        game.turn.active = PlayerId(1);
        game.stack.reset_priority(PlayerId(1));
        log.borrow_mut().clear();
        game.run_phase();
        assert_eq!(*log.borrow(), vec![PlayerId(1), PlayerId(0)]);
    }

    #[test]
    fn test_start_phase_resets_turn() {
        let mut game = Game::new(RulesConfig::default(), decks(2, 3)).unwrap();
        game.move_card(CardId(0), Zone::Board, ZonePosition::Top).unwrap();
        game.players[PlayerId(0)].add_essence(CostType::Essence(Essence::Cup), 0);
        game.turn.sources_played = 1;

        game.enter_phase(Phase::Start).unwrap();
        assert!(game.get_card(CardId(0)).unwrap().activated);
        assert_eq!(game.player(PlayerId(0)).unwrap().essence_count(), 0);
        assert_eq!(game.turn().sources_played, 0);

        game.enter_phase(Phase::Draw).unwrap();
        assert_eq!(game.player(PlayerId(0)).unwrap().hand.len(), 1);
        assert_eq!(game.turn().phase, Phase::Draw);
    }

    #[test]
    fn test_deck_out_decides_game() {
        let wins = Rc::new(RefCell::new(Vec::new()));
        let mut game = Game::new(RulesConfig::default(), decks(2, 5)).unwrap();
        let seen = Rc::clone(&wins);
        game.on(EventType::Win, move |e| seen.borrow_mut().push(e.subject));

        let result = game.run();
        let GameResult::Winner(winner) = result else {
            panic!("expected a single winner, got {result:?}");
        };
        assert!(!game.player(winner).unwrap().lost);
        assert!(game.player(PlayerId::new(1 - winner.0)).unwrap().lost);
        assert_eq!(*wins.borrow(), vec![ObjectRef::Player(winner)]);
    }

    #[test]
    fn test_turn_limit_is_a_draw() {
        let config = RulesConfig::default().with_max_turns(4);
        let mut game = Game::new(config, decks(2, 30)).unwrap();
        assert_eq!(game.run(), GameResult::Draw);
        assert_eq!(game.turn().turn_number, 4);
        for (_, player) in game.players() {
            assert_eq!(player.life, 20);
        }
    }

    #[test]
    fn test_single_player_runs_until_loss() {
        let mut game = Game::new(RulesConfig::default(), decks(1, 4)).unwrap();
        assert_eq!(game.run(), GameResult::Draw);
        assert!(game.player(PlayerId(0)).unwrap().lost);
        // 3 opening cards, then one draw per turn until the empty deck.
        assert_eq!(game.turn().turn_number, 2);
    }

    #[test]
    fn test_extra_turn_repeats_player() {
        let mut game = Game::new(RulesConfig::default().with_max_turns(3), decks(2, 30)).unwrap();
        let starts = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&starts);
        game.on(EventType::StartPhase, move |e| seen.borrow_mut().push(e.subject));
        game.players[PlayerId(0)].extra_turns = 1;
        game.players[PlayerId(1)].extra_turns = 1;

        game.run();
        let starts = starts.borrow();
        assert_eq!(starts.len(), 3);
        assert_eq!(starts[0], starts[1]);
        assert_ne!(starts[1], starts[2]);
    }
}
