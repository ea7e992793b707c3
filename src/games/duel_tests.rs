/// Tests for the Duel deck-builder and for SO-ISMCTS playing it
///
/// The search relies on two properties of the game: resampling hidden information never
/// changes what the observer sees or may do, and concrete card instances never split a node.

#[cfg(test)]
mod tests {
    use crate::config::SearchConfig;
    use crate::games::duel::*;
    use crate::history::{isomorphic, InfosetKey};
    use crate::ismcts::{Budget, Ismcts};
    use crate::player::SoIsmctsPlayer;
    use crate::utils::{Game, Heuristic, MoveFilter, MoveI, Player};
    use rand::seq::IndexedRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::time::{Duration, Instant};

    fn sorted_uids<'a>(cards: impl Iterator<Item = &'a UniqueCard>) -> Vec<u32> {
        let mut uids: Vec<u32> = cards.map(|c| c.uid).collect();
        uids.sort();
        uids
    }

    /// Play `n` random moves from a fresh game
    fn random_position(seed: u64, n: usize) -> Duel {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut game = Duel::new(seed);
        for _ in 0..n {
            if game.is_over() { break; }
            let moves = game.legal_moves();
            let mv = moves.choose(&mut rng).unwrap().clone();
            game = game.play(&mv);
        }
        game
    }

    #[test]
    fn test_duel_game_completion() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut game = Duel::new(11);
        let mut moves = 0;
        while !game.is_over() && moves < 5_000 {
            let actions = game.legal_moves();
            assert!(!actions.is_empty(), "Game not over but no moves available");
            game = game.play(actions.choose(&mut rng).unwrap());
            moves += 1;
        }
        assert!(game.is_over(), "Game should be over after random play");
        assert!(game.legal_moves().is_empty());
        let result = DuelHeuristic::default().evaluate(&game, Player::P1);
        assert!(result == 0.0 || result == 0.5 || result == 1.0, "Terminal result was {}", result);
    }

    #[test]
    fn test_new_game() {
        let game = Duel::new(3);
        assert_eq!(game.active_player(), Player::P1);
        assert_eq!(game.market().len(), MARKET_SIZE);
        for p in [Player::P1, Player::P2] {
            let side = game.side(p);
            assert_eq!(side.hand.len(), HAND_SIZE);
            assert_eq!(side.cards().count(), 10);
        }
        // every card has its own uid
        let mut all: Vec<u32> = sorted_uids(game.side(Player::P1).cards().chain(game.side(Player::P2).cards()));
        all.extend(game.market().iter().chain(game.market_deck()).map(|c| c.uid));
        let n = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), n);
    }

    #[test]
    fn test_cards_are_conserved() {
        for seed in 0..5 {
            let game = random_position(seed, 60);
            let start = Duel::new(seed);
            let count = |g: &Duel| {
                g.side(Player::P1).cards().count() + g.side(Player::P2).cards().count() + g.market().len() + g.market_deck().len()
            };
            assert_eq!(count(&game), count(&start));
        }
    }

    #[test]
    fn test_determinization_legality() {
        for seed in 0..8 {
            let game = random_position(seed, 7 * seed as usize);
            if game.is_over() { continue; }
            let observer = game.active_player();
            for sample in 0..10 {
                let det = game.determinize(observer, sample);
                assert_eq!(det.legal_moves(), game.legal_moves());
                assert_eq!(det.active_player(), observer);
                assert_eq!(det.market(), game.market());

                let mine = det.side(observer);
                assert_eq!(mine.hand, game.side(observer).hand);
                assert_eq!(sorted_uids(mine.draw_pile.iter()), sorted_uids(game.side(observer).draw_pile.iter()));

                let theirs = det.side(observer.other());
                let before = game.side(observer.other());
                assert_eq!(theirs.hand.len(), before.hand.len());
                assert_eq!(theirs.discard, before.discard);
                assert_eq!(theirs.prestige, before.prestige);
                assert_eq!(
                    sorted_uids(theirs.hand.iter().chain(&theirs.draw_pile)),
                    sorted_uids(before.hand.iter().chain(&before.draw_pile))
                );
                assert_eq!(sorted_uids(det.market_deck().iter()), sorted_uids(game.market_deck().iter()));
            }
        }
    }

    #[test]
    fn test_determinizations_differ() {
        let game = Duel::new(5);
        let a = game.determinize(Player::P1, 1);
        let b = game.determinize(Player::P1, 2);
        assert!(a.side(Player::P2).hand != b.side(Player::P2).hand || a.market_deck() != b.market_deck());
    }

    #[test]
    fn test_isomorphism_ignores_instances() {
        let gold_a = DuelMove::Play(UniqueCard { uid: 1, kind: CardKind::Gold });
        let gold_b = DuelMove::Play(UniqueCard { uid: 2, kind: CardKind::Gold });
        let buy_gold = DuelMove::Buy(UniqueCard { uid: 1, kind: CardKind::Gold });
        let scout = DuelMove::Play(UniqueCard { uid: 1, kind: CardKind::Scout });
        assert!(isomorphic(&gold_a, &gold_b));
        assert!(!isomorphic(&gold_a, &buy_gold));
        assert!(!isomorphic(&gold_a, &scout));
        assert!(DuelMove::EndTurn.ends_turn());
        assert!(!gold_a.ends_turn());
        assert_eq!(InfosetKey::from_moves(&[gold_a, scout.clone()]), InfosetKey::from_moves(&[gold_b, scout]));
    }

    #[test]
    fn test_play_and_buy() {
        let game = Duel::new(8);
        let gold = game.side(Player::P1).hand.iter().find(|c| c.kind == CardKind::Gold).copied();
        if let Some(gold) = gold {
            let next = game.play(&DuelMove::Play(gold));
            assert_eq!(next.side(Player::P1).coins, 1);
            assert_eq!(next.side(Player::P1).hand.len(), HAND_SIZE - 1);
            assert!(next.side(Player::P1).played.contains(&gold));
        }
        let end = game.play(&DuelMove::EndTurn);
        assert_eq!(end.active_player(), Player::P2);
        assert_eq!(end.turns(), 1);
        assert_eq!(end.side(Player::P1).hand.len(), HAND_SIZE);
        assert_eq!(end.side(Player::P1).coins, 0);
    }

    #[test]
    fn test_filter_plays_economy_first() {
        let game = Duel::new(2);
        let moves = game.legal_moves();
        let filtered = DuelFilter.filter(&game, moves.clone());
        let has_economy = game.side(Player::P1).hand.iter().any(|c| c.kind.is_economy());
        if has_economy {
            assert!(filtered.iter().all(|m| matches!(m, DuelMove::Play(c) if c.kind.is_economy())));
        } else {
            assert_eq!(filtered, moves);
        }
        assert!(!filtered.is_empty());
    }

    #[test]
    fn test_heuristic_bounds() {
        let heuristic = DuelHeuristic::default();
        for seed in 0..5 {
            let game = random_position(seed, 40);
            for p in [Player::P1, Player::P2] {
                let v = heuristic.evaluate(&game, p);
                assert!((0.0..=1.0).contains(&v), "{}", v);
            }
        }
        assert!((heuristic.evaluate(&Duel::new(1), Player::P1) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_engine_search_on_duel() {
        let game = random_position(4, 3);
        let moves = game.legal_moves();
        let mut search = Ismcts::with_filter(SearchConfig::for_testing(), DuelHeuristic::default(), DuelFilter);
        let tree = search.search(&game, &moves, Budget::iterations(150)).unwrap();
        let root = tree.get(tree.root());
        assert_eq!(root.visits, 150);
        assert_eq!(tree.children(tree.root()).map(|c| c.visits).sum::<u32>(), 150);
        // one root child per kind of move, whatever the hidden cards
        let mut kinds: Vec<_> = moves.iter().map(|m| m.isomorphism()).collect();
        kinds.sort();
        kinds.dedup();
        assert!(root.children().len() <= kinds.len());
        let mv = search.best_move(&tree, &moves).unwrap();
        assert!(moves.contains(&mv));
    }

    #[test]
    fn test_time_budget_is_respected() {
        let budget = Duration::from_millis(50);
        // one iteration never runs longer than this on a Duel position
        let slack = Duration::from_millis(250);
        let game = random_position(6, 4);
        let moves = game.legal_moves();
        assert!(moves.len() > 1);
        let mut search = Ismcts::with_filter(SearchConfig::for_testing(), DuelHeuristic::default(), DuelFilter);

        let start = Instant::now();
        let mv = search.choose_move_within(&game, &moves, Budget::time(budget)).unwrap();
        let wall = start.elapsed();
        assert!(moves.contains(&mv));
        assert!(search.statistics().iterations > 0);
        assert!(search.statistics().elapsed >= budget);
        assert!(search.statistics().elapsed < budget + slack, "{:?}", search.statistics().elapsed);
        assert!(wall < budget + slack, "{:?}", wall);

        // a single legal move comes back without searching
        let start = Instant::now();
        let only = search.choose_move_within(&game, &moves[..1], Budget::time(budget)).unwrap();
        assert!(start.elapsed() < budget);
        assert_eq!(only, moves[0]);
        assert_eq!(search.statistics().iterations, 0);
    }

    #[test]
    fn test_engine_plays_full_game() {
        let config = SearchConfig::for_testing().with_iterations(30);
        let mut bot = SoIsmctsPlayer::new("so-ismcts", config, DuelHeuristic::default());
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let mut game = Duel::new(21);
        while !game.is_over() {
            let moves = game.legal_moves();
            let mv = match game.active_player() {
                Player::P1 => bot.play(&game, &moves).unwrap(),
                Player::P2 => moves.choose(&mut rng).unwrap().clone(),
            };
            assert!(moves.contains(&mv), "{:?} is not legal", mv);
            game = game.play(&mv);
        }
        assert!(bot.session().turns > 0);
        assert!(bot.session().searches > 0);
        assert_eq!(bot.session().timeouts, 0);
        bot.game_end();
        assert_eq!(bot.session().games, 1);
    }
}
