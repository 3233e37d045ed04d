//! Concrete scenarios from spec.md §8 "Testable Properties" that aren't
//! perft (those live in `tests/perft.rs`): draw detection, a won endgame,
//! a forced mate, en-passant legality sequencing, and the halfmove-clock
//! Zobrist invariant.

use chess_engine::board::Board;
use chess_engine::eval::MaterialEvaluator;
use chess_engine::position::fen::parse_fen;
use chess_engine::rng::EngineRng;
use chess_engine::search::limiter::StrengthLimiter;
use chess_engine::search::time_control::TimeBudgetInput;
use chess_engine::search::SearchEngine;

/// Scenario 1: bare kings are an immediate draw, and a depth-1 search
/// reports a score of 0 regardless of static evaluation.
#[test]
fn bare_kings_is_a_terminal_draw_with_zero_score() {
    let board = Board::from_fen("8/8/8/8/8/8/4K3/4k3 w - - 0 1").unwrap();
    assert!(board.is_terminal_draw());

    let mut board = board;
    let mut engine = SearchEngine::new(MaterialEvaluator::new(), 16);
    let budget = TimeBudgetInput { depth_limit: Some(1), ..Default::default() };
    let mut last_score = None;
    engine.go(&mut board, budget, |progress| last_score = Some(progress.score));
    assert_eq!(last_score, Some(0));
}

/// Scenario 2: a clean rook-up endgame scores decisively in White's favor
/// and the engine actually picks up the rook rather than shuffling pawns.
#[test]
fn rook_up_endgame_scores_decisively_and_plays_a_rook_move() {
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
    let mut engine = SearchEngine::new(MaterialEvaluator::new(), 16);
    let budget = TimeBudgetInput { depth_limit: Some(6), ..Default::default() };

    let mut last_score = None;
    let best = engine.go(&mut board, budget, |progress| last_score = Some(progress.score));

    assert!(last_score.unwrap() >= 400, "expected score >= 400cp, got {:?}", last_score);
    let best = best.expect("a legal move exists");
    let attacker = best.attacker().expect("non-null move carries an attacker");
    assert_eq!(
        attacker,
        chess_engine::types::ColorlessPiece::Rook,
        "expected a rook move, got {}",
        best
    );
}

/// Scenario 3: Scholar's mate is one move away and must be found as a
/// forced mate at depth 4.
#[test]
fn finds_scholars_mate_in_one() {
    let mut board =
        Board::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 4 4")
            .unwrap();
    let mut engine = SearchEngine::new(MaterialEvaluator::new(), 16);
    let budget = TimeBudgetInput { depth_limit: Some(4), ..Default::default() };

    let mut last_score = None;
    let best = engine.go(&mut board, budget, |progress| last_score = Some(progress.score));

    let best = best.expect("a legal move exists");
    assert_eq!(best.to_string(), "f3f7", "expected Qxf7#, got {best}");
    let score = last_score.expect("search reports at least one iteration");
    assert!(
        score >= chess_engine::constants::MAX_NON_MATE_SCORE,
        "expected a mate score, got {score}"
    );
}

/// Scenario 5: the en-passant square is only live for the one reply right
/// after the double push, never before or after.
#[test]
fn en_passant_square_is_live_for_one_reply_only() {
    let mut board = Board::new();
    board.replay(&["e2e4"]).unwrap();
    // e4 was just played; the square behind the pawn is the ep target.
    assert_eq!(board.current().en_passant_square().to_string(), "e3");

    board.replay(&["e7e5", "g1f3"]).unwrap();
    // Two plies on, en passant on e3 is no longer available.
    assert_eq!(board.current().en_passant_square(), chess_engine::types::Square::ILLEGAL);
}

/// Scenario 6: two positions differing only in halfmove clock share a
/// Zobrist key (the clock is not part of the key).
#[test]
fn halfmove_clock_is_not_part_of_the_zobrist_key() {
    let a = parse_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    let b = parse_fen("4k3/8/8/8/8/8/8/4K2R w K - 17 1").unwrap();
    assert_eq!(a.zobrist(), b.zobrist());
}

/// Search determinism (spec.md §8): identical input, limits, and a fixed
/// strength-limiter seed produce bit-identical bestmove and PV across runs.
#[test]
fn search_is_deterministic_given_a_fixed_limiter_seed() {
    let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";
    let budget = TimeBudgetInput { depth_limit: Some(4), ..Default::default() };

    let run = || {
        let mut board = Board::from_fen(fen).unwrap();
        let mut engine = SearchEngine::new(MaterialEvaluator::new(), 16);
        engine.set_strength_limiter(StrengthLimiter::new(10, EngineRng::from_seed(7)));
        let mut pv = Vec::new();
        let best = engine.go(&mut board, budget, |progress| {
            pv = progress.pv.to_vec();
        });
        (best, pv)
    };

    let (best_a, pv_a) = run();
    let (best_b, pv_b) = run();
    assert_eq!(best_a, best_b);
    assert_eq!(pv_a, pv_b);
}
