//! Live game state.
//!
//! [`Game`] owns everything a running match needs: players and their
//! zones, the card arena, the stack, turn state, the event bus and the
//! seeded RNG. Its behaviour is split across modules that each add an
//! `impl Game` block:
//!
//! - `state`: zone transitions, drawing, damage and life
//! - `actions`: costs, casting, activating and playing sources
//! - `choice`: prompting players through their [`Choice`] collaborator
//! - `crate::query`: match evaluation and target picking
//! - `crate::effects`: playing and resolving ability instances
//! - `crate::triggers`: emitting events and firing triggers
//! - `crate::rules`: the turn and priority loop
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use ccg_rules::core::{PlayerId, RulesConfig};
//! use ccg_rules::game::{Game, PlayerSetup};
//! use ccg_rules::parser::parse;
//!
//! let land = Arc::new(parse("Land\nSource\n{t}: Add {s}.\n").unwrap());
//! let deck = vec![land.clone(), land.clone(), land];
//!
//! let game = Game::new(RulesConfig::default(), vec![PlayerSetup::new(deck)]).unwrap();
//! let player = game.player(PlayerId::new(0)).unwrap();
//! assert_eq!(player.deck.len(), 3);
//! assert_eq!(player.life, 20);
//! ```

mod actions;
pub mod choice;
pub mod player;
mod state;

pub use choice::{Answer, Choice, ChoiceError, ChoiceResult, FirstChoice, PassChoice, ScriptedChoice};
pub use player::{pay_from_pool, EssencePool, EssenceToken, Player};

use log::debug;
use std::sync::Arc;

use crate::cards::{BuiltinAbilities, Card, CardInstance};
use crate::core::{CardId, EngineError, GameRng, PlayerId, PlayerMap, Result, RulesConfig};
use crate::effects::InstanceId;
use crate::rules::TurnState;
use crate::stack::PriorityStack;
use crate::triggers::{EventBus, EventType, GameEvent, HandlerId};
use crate::zones::{Zone, ZonePosition};

/// One seat at game creation: a deck and a decision maker.
pub struct PlayerSetup {
    deck: Vec<Arc<Card>>,
    choice: Box<dyn Choice>,
}

impl PlayerSetup {
    /// A seat with `deck` (first card on top) that passes every decision.
    #[must_use]
    pub fn new(deck: Vec<Arc<Card>>) -> Self {
        Self {
            deck,
            choice: Box::new(PassChoice),
        }
    }

    #[must_use]
    pub fn with_choice(mut self, choice: Box<dyn Choice>) -> Self {
        self.choice = choice;
        self
    }
}

impl std::fmt::Debug for PlayerSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerSetup").field("deck", &self.deck.len()).finish_non_exhaustive()
    }
}

/// A game in progress.
pub struct Game {
    pub(crate) config: RulesConfig,
    pub(crate) builtins: Arc<BuiltinAbilities>,
    pub(crate) players: PlayerMap<Player>,
    pub(crate) choosers: PlayerMap<Box<dyn Choice>>,

    /// Card arena. A [`CardId`] is an index into it.
    pub(crate) cards: Vec<CardInstance>,

    pub(crate) stack: PriorityStack,
    pub(crate) turn: TurnState,

    /// Source of the instance currently resolving, stamped on events.
    pub(crate) resolving: Option<CardId>,

    pub(crate) events: EventBus,
    pub(crate) rng: GameRng,
    pub(crate) event_depth: usize,
    pub(crate) next_instance: u32,
}

impl Game {
    /// Create a game with one seat per setup.
    ///
    /// Decks are laid out in the given order, first card on top; call
    /// [`shuffle_decks`](Self::shuffle_decks) to randomize them.
    ///
    /// Fails with [`EngineError::PlayerCount`] unless there are 1 to 255
    /// setups.
    pub fn new(config: RulesConfig, setups: Vec<PlayerSetup>) -> Result<Self> {
        let player_count = setups.len();
        if !(1..=usize::from(u8::MAX)).contains(&player_count) {
            return Err(EngineError::PlayerCount(player_count));
        }
        let (decks, choices): (Vec<_>, Vec<_>) = setups.into_iter().map(|s| (s.deck, s.choice)).unzip();
        let choosers = PlayerMap::from_vec(choices);
        let players = PlayerMap::new(player_count, |id| Player::new(id, &config));
        let mut game = Self {
            builtins: Arc::new(BuiltinAbilities::new()),
            players,
            choosers,
            cards: Vec::new(),
            stack: PriorityStack::new(player_count),
            turn: TurnState::new(PlayerId::new(0)),
            resolving: None,
            events: EventBus::new(),
            rng: GameRng::new(config.seed),
            event_depth: 0,
            next_instance: 0,
            config,
        };

        for (owner, deck) in PlayerId::all(player_count).zip(decks) {
            for card in deck {
                let id = game.add_instance(owner, card, Zone::Deck);
                game.players[owner].deck.insert(id, ZonePosition::Bottom);
            }
        }
        Ok(game)
    }

    /// Share a registry's built-in abilities instead of a fresh set.
    #[must_use]
    pub fn with_builtins(mut self, builtins: Arc<BuiltinAbilities>) -> Self {
        self.builtins = builtins;
        self
    }

    /// Shuffle every deck.
    ///
    /// Each seat draws from its own stream of the game seed, so a deck's
    /// order does not depend on how many seats come before it.
    pub fn shuffle_decks(&mut self) {
        for (id, player) in self.players.iter_mut() {
            let mut rng = self.rng.for_context(&format!("deck-{id}"));
            player.deck.shuffle(&mut rng);
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn builtins(&self) -> &Arc<BuiltinAbilities> {
        &self.builtins
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players.iter()
    }

    #[must_use]
    pub fn get_card(&self, id: CardId) -> Option<&CardInstance> {
        self.cards.get(id.index())
    }

    /// Every card instance, indexed by id.
    #[must_use]
    pub fn cards(&self) -> &[CardInstance] {
        &self.cards
    }

    #[must_use]
    pub fn stack(&self) -> &PriorityStack {
        &self.stack
    }

    #[must_use]
    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.turn.active
    }

    /// Seats that have not lost, in seat order.
    #[must_use]
    pub fn remaining_players(&self) -> Vec<PlayerId> {
        self.players.iter().filter(|(_, p)| !p.lost).map(|(id, _)| id).collect()
    }

    // === Events ===

    /// Register a handler for `event_type`, or for every event with
    /// [`EventType::All`]. Handlers run after triggers have fired.
    pub fn on(&mut self, event_type: EventType, handler: impl FnMut(&GameEvent) + 'static) -> HandlerId {
        self.events.on(event_type, Box::new(handler))
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn off(&mut self, id: HandlerId) -> bool {
        self.events.off(id)
    }

    // === Cards ===

    /// Create a new card instance owned by `owner` and put it into `zone`.
    ///
    /// Board placement takes the first free slot and fails if there is
    /// none. Entering the board emits enter-board.
    pub fn create_card(&mut self, owner: PlayerId, card: Arc<Card>, zone: Zone) -> Result<CardId> {
        if self.players.get(owner).is_none() {
            return Err(EngineError::NotPlayable {
                card: CardId::new(self.cards.len() as u32),
                reason: "unknown owner",
            });
        }
        if zone == Zone::Board && self.players[owner].board.first_free().is_none() {
            return Err(EngineError::IllegalZoneTransition {
                card: CardId::new(self.cards.len() as u32),
                from: Zone::Stack,
                to: Zone::Board,
                reason: "board is full",
            });
        }
        let id = self.add_instance(owner, card, Zone::Stack);
        if zone != Zone::Stack {
            self.move_card(id, zone, ZonePosition::Bottom)?;
        }
        Ok(id)
    }

    /// Append an instance to the arena without placing it in a container.
    fn add_instance(&mut self, owner: PlayerId, card: Arc<Card>, zone: Zone) -> CardId {
        let id = CardId::new(self.cards.len() as u32);
        debug!("create {id} ({}) for {owner}", card.name);
        self.cards.push(CardInstance::new(id, card, owner, zone));
        id
    }

    pub(crate) fn card(&self, id: CardId) -> Result<&CardInstance> {
        self.cards.get(id.index()).ok_or(EngineError::UnknownCard(id))
    }

    pub(crate) fn card_mut(&mut self, id: CardId) -> Result<&mut CardInstance> {
        self.cards.get_mut(id.index()).ok_or(EngineError::UnknownCard(id))
    }

    pub(crate) fn next_instance_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        id
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("turn", &self.turn)
            .field("players", &self.players)
            .field("stack", &self.stack.len())
            .field("cards", &self.cards.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardKind, CardType};

    fn unit(name: &str) -> Arc<Card> {
        Arc::new(Card::new(name).with_type(CardType::new(CardKind::Unit)))
    }

    #[test]
    fn test_decks_in_given_order() {
        let game = Game::new(
            RulesConfig::default(),
            vec![
                PlayerSetup::new(vec![unit("A"), unit("B")]),
                PlayerSetup::new(vec![unit("C")]),
            ],
        ).unwrap();
        let p0 = game.player(PlayerId(0)).unwrap();
        assert_eq!(p0.deck.to_vec(), vec![CardId(0), CardId(1)]);
        assert_eq!(game.get_card(CardId(2)).unwrap().owner, PlayerId(1));
        assert_eq!(game.get_card(CardId(0)).unwrap().zone, Zone::Deck);
        assert_eq!(game.player_count(), 2);
    }

    #[test]
    fn test_create_card_on_board() {
        let mut game = Game::new(RulesConfig::default().with_board_size(1), vec![PlayerSetup::new(Vec::new())]).unwrap();
        let id = game.create_card(PlayerId(0), unit("A"), Zone::Board).unwrap();
        let card = game.get_card(id).unwrap();
        assert_eq!(card.zone, Zone::Board);
        assert_eq!(card.slot, Some(0));

        let err = game.create_card(PlayerId(0), unit("B"), Zone::Board).unwrap_err();
        assert!(matches!(err, EngineError::IllegalZoneTransition { reason: "board is full", .. }));
        assert_eq!(game.cards().len(), 1);
    }

    #[test]
    fn test_deck_shuffle_is_per_seat() {
        let deck = || (0..20).map(|i| unit(&format!("U{i}"))).collect::<Vec<_>>();
        let config = RulesConfig::default().with_seed(9);
        let mut solo = Game::new(config.clone(), vec![PlayerSetup::new(deck())]).unwrap();
        let mut pair = Game::new(config, vec![PlayerSetup::new(deck()), PlayerSetup::new(deck())]).unwrap();
        solo.shuffle_decks();
        pair.shuffle_decks();

        let order = |game: &Game, id| game.player(id).unwrap().deck.to_vec();
        assert_eq!(order(&solo, PlayerId(0)), order(&pair, PlayerId(0)));
        assert_ne!(order(&solo, PlayerId(0)), (0..20).map(CardId).collect::<Vec<_>>());
    }

    #[test]
    fn test_player_count_is_checked() {
        let err = Game::new(RulesConfig::default(), Vec::new()).unwrap_err();
        assert_eq!(err, EngineError::PlayerCount(0));

        let seats = |n: usize| -> Vec<PlayerSetup> { (0..n).map(|_| PlayerSetup::new(Vec::new())).collect() };
        assert_eq!(Game::new(RulesConfig::default(), seats(256)).unwrap_err(), EngineError::PlayerCount(256));
        let game = Game::new(RulesConfig::default(), seats(255)).unwrap();
        assert_eq!(game.players().last().map(|(id, _)| id), Some(PlayerId(254)));
    }

    #[test]
    fn test_instance_ids_increase() {
        let mut game = Game::new(RulesConfig::default(), vec![PlayerSetup::new(Vec::new())]).unwrap();
        assert_eq!(game.next_instance_id(), InstanceId(0));
        assert_eq!(game.next_instance_id(), InstanceId(1));
    }
}
