//! # Duel
//!
//! A two player deck-building duel with hidden information. Each player owns a deck that is
//! shuffled into a concealed draw pile; five cards are drawn into a concealed hand every turn.
//! Playing cards yields coins, power and prestige; coins buy new cards from a visible market
//! that is refilled from a shuffled, concealed market deck. At the end of a turn unspent power
//! turns into prestige. The first player to 30 prestige wins, and the game is cut off after a
//! fixed number of turns.

use rand::{Rng, SeedableRng};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use crate::history::{Facet, MoveKey};
use crate::utils::*;

pub const WIN_PRESTIGE: u32 = 30;
pub const TURN_LIMIT: u32 = 60;
pub const HAND_SIZE: usize = 5;
pub const MARKET_SIZE: usize = 4;

// ---------- Cards ----------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardKind { Gold, Treasure, Soldier, Captain, Scout, Relic }

impl CardKind {
    pub const MARKET: [CardKind; 5] = [CardKind::Treasure, CardKind::Soldier, CardKind::Captain, CardKind::Scout, CardKind::Relic];

    #[inline] pub fn id(self) -> u32 { self as u32 }

    pub fn cost(self) -> u32 {
        match self {
            CardKind::Gold => 0,
            CardKind::Soldier => 2,
            CardKind::Treasure | CardKind::Scout => 3,
            CardKind::Captain => 5,
            CardKind::Relic => 6,
        }
    }
    pub fn coins(self) -> u32 {
        match self { CardKind::Gold | CardKind::Scout => 1, CardKind::Treasure => 2, _ => 0 }
    }
    pub fn power(self) -> u32 {
        match self { CardKind::Soldier => 1, CardKind::Captain => 2, _ => 0 }
    }
    pub fn prestige(self) -> u32 {
        match self { CardKind::Captain => 1, CardKind::Relic => 3, _ => 0 }
    }
    /// Cards drawn when played
    pub fn draws(self) -> usize {
        match self { CardKind::Scout => 1, _ => 0 }
    }
    /// Only produces coins, so playing it early never hurts
    #[inline] pub fn is_economy(self) -> bool {
        matches!(self, CardKind::Gold | CardKind::Treasure)
    }
}

/// One physical card. Instances of the same kind are interchangeable to the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueCard { pub uid: u32, pub kind: CardKind }

// ---------- Moves ----------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DuelMove {
    Play(UniqueCard),
    Buy(UniqueCard),
    EndTurn,
}

const PLAY: u8 = 0;
const BUY: u8 = 1;
const END_TURN: u8 = 2;

impl MoveI for DuelMove {
    fn isomorphism(&self) -> MoveKey {
        match self {
            DuelMove::Play(card) => MoveKey::command(PLAY).with(Facet::Card(card.kind.id())),
            DuelMove::Buy(card) => MoveKey::command(BUY).with(Facet::Card(card.kind.id())),
            DuelMove::EndTurn => MoveKey::command(END_TURN),
        }
    }
    fn ends_turn(&self) -> bool { matches!(self, DuelMove::EndTurn) }
}

// ---------- State ----------
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Side {
    pub hand: Vec<UniqueCard>,
    /// Top of the pile is the end of the vector
    pub draw_pile: Vec<UniqueCard>,
    pub discard: Vec<UniqueCard>,
    pub played: Vec<UniqueCard>,
    pub prestige: u32,
    pub coins: u32,
    pub power: u32,
}

impl Side {
    /// Every card the player owns
    pub fn cards(&self) -> impl Iterator<Item = &UniqueCard> {
        self.hand.iter().chain(&self.draw_pile).chain(&self.discard).chain(&self.played)
    }
}

#[derive(Debug, Clone)]
pub struct Duel {
    sides: [Side; 2],
    market: Vec<UniqueCard>,
    market_deck: Vec<UniqueCard>,
    turn: Player,
    turns: u32,
    /// Source of every future shuffle
    seed: Seed,
}

impl Duel {
    pub fn new(seed: Seed) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut uid = 0;
        let mut make = |kind: CardKind, n: usize| -> Vec<UniqueCard> {
            (0..n).map(|_| { uid += 1; UniqueCard { uid, kind } }).collect()
        };
        let mut sides: [Side; 2] = Default::default();
        for side in sides.iter_mut() {
            let mut deck = make(CardKind::Gold, 7);
            deck.extend(make(CardKind::Soldier, 2));
            deck.extend(make(CardKind::Scout, 1));
            deck.shuffle(&mut rng);
            side.draw_pile = deck;
        }
        let mut market_deck: Vec<UniqueCard> = CardKind::MARKET.iter().flat_map(|&kind| make(kind, 4)).collect();
        market_deck.shuffle(&mut rng);

        let mut game = Duel { sides, market: vec![], market_deck, turn: Player::P1, turns: 0, seed: rng.random() };
        game.refill_market();
        game.draw(Player::P1, HAND_SIZE);
        game.draw(Player::P2, HAND_SIZE);
        game
    }

    #[inline] pub fn side(&self, player: Player) -> &Side { &self.sides[player.index()] }
    #[inline] pub fn market(&self) -> &[UniqueCard] { &self.market }
    #[inline] pub fn market_deck(&self) -> &[UniqueCard] { &self.market_deck }
    #[inline] pub fn turns(&self) -> u32 { self.turns }

    pub fn winner(&self) -> Option<Player> {
        if !self.is_over() { return None; }
        let (p1, p2) = (self.sides[0].prestige, self.sides[1].prestige);
        match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => Some(Player::P1),
            std::cmp::Ordering::Less => Some(Player::P2),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn next_rng(&mut self) -> ChaCha20Rng {
        let mut rng = ChaCha20Rng::seed_from_u64(self.seed);
        self.seed = rng.random();
        rng
    }

    /// Draw up to `n` cards, reshuffling the discard pile when the draw pile runs out
    fn draw(&mut self, player: Player, n: usize) {
        for _ in 0..n {
            if self.sides[player.index()].draw_pile.is_empty() {
                let mut rng = self.next_rng();
                let side = &mut self.sides[player.index()];
                if side.discard.is_empty() { return; }
                side.draw_pile.append(&mut side.discard);
                side.draw_pile.shuffle(&mut rng);
            }
            let side = &mut self.sides[player.index()];
            if let Some(card) = side.draw_pile.pop() {
                side.hand.push(card);
            }
        }
    }

    fn refill_market(&mut self) {
        while self.market.len() < MARKET_SIZE {
            match self.market_deck.pop() {
                Some(card) => self.market.push(card),
                None => break,
            }
        }
    }

    fn end_turn(&mut self) {
        let player = self.turn;
        let side = &mut self.sides[player.index()];
        side.prestige += side.power;
        side.power = 0;
        side.coins = 0;
        let mut leftovers: Vec<UniqueCard> = side.played.drain(..).chain(side.hand.drain(..)).collect();
        side.discard.append(&mut leftovers);
        self.draw(player, HAND_SIZE);
        self.turn = player.other();
        self.turns += 1;
    }
}

impl Game for Duel {
    type Move = DuelMove;

    fn active_player(&self) -> Player { self.turn }

    fn legal_moves(&self) -> Vec<DuelMove> {
        if self.is_over() { return vec![]; }
        let side = self.side(self.turn);
        let mut moves: Vec<DuelMove> = side.hand.iter().map(|&c| DuelMove::Play(c)).collect();
        moves.extend(self.market.iter().filter(|c| c.kind.cost() <= side.coins).map(|&c| DuelMove::Buy(c)));
        moves.push(DuelMove::EndTurn);
        moves
    }

    fn play(&self, mv: &DuelMove) -> Self {
        let mut next = self.clone();
        let player = self.turn;
        match mv {
            DuelMove::Play(card) => {
                let side = &mut next.sides[player.index()];
                if let Some(pos) = side.hand.iter().position(|c| c == card) {
                    let card = side.hand.remove(pos);
                    side.coins += card.kind.coins();
                    side.power += card.kind.power();
                    side.prestige += card.kind.prestige();
                    side.played.push(card);
                    next.draw(player, card.kind.draws());
                }
            }
            DuelMove::Buy(card) => {
                if let Some(pos) = next.market.iter().position(|c| c == card) {
                    let card = next.market.remove(pos);
                    let side = &mut next.sides[player.index()];
                    side.coins = side.coins.saturating_sub(card.kind.cost());
                    side.discard.push(card);
                    next.refill_market();
                }
            }
            DuelMove::EndTurn => next.end_turn(),
        }
        next
    }

    fn is_over(&self) -> bool {
        self.turns >= TURN_LIMIT || self.sides.iter().any(|s| s.prestige >= WIN_PRESTIGE)
    }

    /// The observer knows their own hand and what they own, but not the order of their draw pile.
    /// Of the opponent they only know how many cards are in hand and which cards they own overall
    fn determinize(&self, observer: Player, seed: Seed) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut next = self.clone();

        next.sides[observer.index()].draw_pile.shuffle(&mut rng);

        let opponent = &mut next.sides[observer.other().index()];
        let in_hand = opponent.hand.len();
        let mut unseen: Vec<UniqueCard> = opponent.hand.drain(..).chain(opponent.draw_pile.drain(..)).collect();
        unseen.shuffle(&mut rng);
        opponent.draw_pile = unseen.split_off(in_hand);
        opponent.hand = unseen;

        next.market_deck.shuffle(&mut rng);
        next.seed = rng.random();
        next
    }
}

// ---------- Heuristic ----------
/// Squashed score in `[0, 1]` from prestige, pending power, coins in hand and deck quality.
/// Finished games score 1, 0 or one half
#[derive(Debug, Clone, Copy)]
pub struct DuelHeuristic {
    pub prestige_weight: f64,
    pub coin_weight: f64,
    pub deck_weight: f64,
}

impl Default for DuelHeuristic {
    fn default() -> Self {
        DuelHeuristic { prestige_weight: 0.2, coin_weight: 0.02, deck_weight: 0.05 }
    }
}

impl DuelHeuristic {
    fn deck_value(side: &Side) -> f64 {
        side.cards().map(|c| c.kind.cost() as f64).sum()
    }
}

impl Heuristic<Duel> for DuelHeuristic {
    fn evaluate(&self, game: &Duel, observer: Player) -> Reward {
        if game.is_over() {
            return match game.winner() {
                Some(p) if p == observer => 1.0,
                Some(_) => 0.0,
                None => 0.5,
            };
        }
        let me = game.side(observer);
        let them = game.side(observer.other());
        let prestige = (me.prestige + me.power) as f64 - (them.prestige + them.power) as f64;
        let deck = Self::deck_value(me) - Self::deck_value(them);
        let x = self.prestige_weight * prestige + self.coin_weight * me.coins as f64 + self.deck_weight * deck;
        1.0 / (1.0 + (-x).exp())
    }
}

// ---------- Move filter ----------
/// Plays the pure economy cards before anything else is considered
#[derive(Debug, Clone, Copy, Default)]
pub struct DuelFilter;

impl MoveFilter<Duel> for DuelFilter {
    fn filter(&self, _game: &Duel, moves: Vec<DuelMove>) -> Vec<DuelMove> {
        let economy: Vec<DuelMove> = moves
            .iter()
            .filter(|m| matches!(m, DuelMove::Play(card) if card.kind.is_economy()))
            .cloned()
            .collect();
        if economy.is_empty() { moves } else { economy }
    }
}
