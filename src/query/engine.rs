//! `query` and `pick`.

use super::MatchMode;
use crate::core::ObjectRef;
use crate::effects::{AbilityInstance, Match, ZoneMatch};
use crate::game::Game;
use crate::triggers::EventType;
use crate::zones::Zone;

impl Game {
    /// Every object matching `m` for `inst`, in query order.
    ///
    /// Without a match the result is the controller alone. `zone` limits
    /// which zones are searched for cards; players are always considered.
    /// `limit` truncates the result.
    #[must_use]
    pub fn query(
        &self,
        inst: &AbilityInstance,
        m: Option<&Match>,
        zone: Option<&ZoneMatch>,
        limit: Option<usize>,
        mode: MatchMode,
    ) -> Vec<ObjectRef> {
        let Some(m) = m else {
            return vec![ObjectRef::Player(inst.controller)];
        };

        let mut found: Vec<ObjectRef> = self
            .players
            .player_ids()
            .map(ObjectRef::Player)
            .filter(|&p| self.matches(inst, m, p, mode))
            .collect();

        if !matches!(m, Match::Player(_)) {
            for (id, player) in self.players.iter() {
                for z in Zone::QUERY_ORDER {
                    if zone.is_some_and(|zm| !zm.contains(z)) {
                        continue;
                    }
                    let cards: Vec<_> = match z {
                        Zone::Board => player.board.cards().collect(),
                        Zone::Stack => self
                            .stack
                            .entries()
                            .iter()
                            .map(|e| e.source)
                            .filter(|&c| self.get_card(c).is_some_and(|c| c.owner == id))
                            .collect(),
                        _ => player.pile_of(z).map(|p| p.to_vec()).unwrap_or_default(),
                    };
                    for card in cards {
                        let object = ObjectRef::Card(card);
                        if !found.contains(&object) && self.matches(inst, m, object, mode) {
                            found.push(object);
                        }
                    }
                }
            }
        }

        if let Some(limit) = limit {
            found.truncate(limit);
        }
        found
    }

    /// Resolve `m` to concrete objects for `inst`.
    ///
    /// A targeted match asks the controller once per target, re-listing
    /// candidates each time without those already picked here. Cards are
    /// searched on the board unless `zone` says otherwise. Each pick is
    /// added to the instance's targets and emits target. A decline, or
    /// running out of candidates, stops early with what was picked.
    ///
    /// Untargeted matches return the bound query without prompting.
    pub fn pick(&mut self, inst: &mut AbilityInstance, m: &Match, zone: Option<&ZoneMatch>) -> Vec<ObjectRef> {
        let count = m.target_count();
        if count <= 0 {
            return self.query(inst, Some(m), zone, None, MatchMode::Bound);
        }

        let board = ZoneMatch::one(Zone::Board);
        let zone = zone.unwrap_or(&board);
        let player = inst.controller;
        let mut picked: Vec<ObjectRef> = Vec::new();
        for _ in 0..count {
            let candidates: Vec<ObjectRef> = self
                .query(inst, Some(m), Some(zone), None, MatchMode::Candidates)
                .into_iter()
                .filter(|o| !picked.contains(o))
                .collect();
            let chosen = self.choose_many(player, candidates.len(), 1, |c| c.target(player, &candidates, 1));
            let Some(&index) = chosen.first() else {
                break;
            };
            let target = candidates[index];
            picked.push(target);
            inst.targeting.push(target);
            self.emit(EventType::Target, target);
        }
        picked
    }
}
