//! Perft equivalence (spec.md §8 "Perft equivalence") against published
//! reference counts. Grounded on the teacher's `tests/board_tests.rs`
//! `perft_positions` test, trimmed to the two positions the spec names.

use chess_engine::board::Board;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const KIWIPETE_LIKE: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

#[test]
fn startpos_perft_matches_reference_counts() {
    let board = Board::new();
    let expected = [(1, 20), (2, 400), (3, 8_902), (4, 197_281), (5, 4_865_609)];
    for (depth, nodes) in expected {
        assert_eq!(board.perft(depth), nodes, "perft({depth}) from startpos");
    }
}

#[test]
fn kiwipete_perft_matches_reference_counts() {
    let board = Board::from_fen(KIWIPETE).unwrap();
    let expected = [(1, 48), (2, 2_039), (3, 97_862), (4, 4_085_603)];
    for (depth, nodes) in expected {
        assert_eq!(board.perft(depth), nodes, "perft({depth}) from Kiwipete");
    }
}

#[test]
fn kiwipete_like_perft_4_matches_spec_scenario() {
    let board = Board::from_fen(KIWIPETE_LIKE).unwrap();
    assert_eq!(board.perft(4), 43_238);
}
