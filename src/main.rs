use chess_engine::eval::MaterialEvaluator;
use chess_engine::uci;

/// Default transposition cache size, matching the teacher's `src/uci.rs`.
const DEFAULT_HASH_MB: usize = 64;

fn main() {
    uci::run_uci_loop(MaterialEvaluator::new(), DEFAULT_HASH_MB);
}
