use crate::engine::config::EngineConfig;
use crate::engine::eval::DistanceEvaluator;
use crate::engine::{Evaluator, Move, SearchLimit, SearchStats, Searcher};
use crate::logic::game::GameState;
use crate::logic::piece::Color;
use std::sync::Arc;

/// Larger than any evaluation. Returned (signed) by nodes that ran out of
/// time so that their parent never prefers them.
pub const SCORE_INF: i32 = 1_000_000_000;

pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: DistanceEvaluator,
    nodes_searched: u32,
    start_time: f64,
    time_limit: Option<f64>,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: DistanceEvaluator::new(config.clone()),
            config,
            nodes_searched: 0,
            start_time: 0.0,
            time_limit: None,
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = DistanceEvaluator::new(config.clone());
        self.config = config;
    }

    /// Monotonic milliseconds.
    fn now() -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            if let Some(window) = web_sys::window() {
                return window.performance().map(|p| p.now()).unwrap_or(0.0);
            }
            let global = js_sys::global();
            if let Ok(worker) = global.dyn_into::<web_sys::WorkerGlobalScope>() {
                return worker.performance().map(|p| p.now()).unwrap_or(0.0);
            }
            0.0 // Fail safe instead of panic
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::sync::OnceLock;
            use std::time::Instant;
            static EPOCH: OnceLock<Instant> = OnceLock::new();
            EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
        }
    }

    fn elapsed_ms(&self) -> f64 {
        Self::now() - self.start_time
    }

    fn timed_out(&self) -> bool {
        self.time_limit
            .is_some_and(|limit| self.elapsed_ms() >= limit)
    }

    /// Plain minimax with alpha-beta bounds; White maximizes.
    fn minimax(&mut self, state: &GameState, depth: u8, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes_searched = self.nodes_searched.saturating_add(1);

        if depth == 0 || state.is_game_over().is_some() {
            return self.evaluator.evaluate(state);
        }
        if self.timed_out() {
            return SCORE_INF * state.turn().sign();
        }

        let mut moves = state.all_legal_moves();
        if moves.is_empty() {
            return self.evaluator.evaluate(state);
        }
        self.evaluator.order_moves(state, &mut moves);

        let maximizing = state.turn() == Color::White;
        let mut best = -SCORE_INF * state.turn().sign();

        for mv in moves {
            let mut child = state.clone();
            if child.make_move(mv).is_err() {
                continue;
            }
            let score = self.minimax(&child, depth - 1, alpha, beta);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if alpha >= beta {
                break;
            }
        }
        best
    }

    /// One root iteration. Returns the best fully evaluated root move and
    /// whether the clock ran out before every move was searched.
    fn search_root(&mut self, state: &GameState, moves: &[Move], depth: u8) -> (Option<(Move, i32)>, bool) {
        let sign = state.turn().sign();
        let mut best: Option<(Move, i32)> = None;

        for &mv in moves {
            let mut child = state.clone();
            if child.make_move(mv).is_err() {
                continue;
            }

            // The best root score so far bounds the reply search.
            let bound = best.map_or(-SCORE_INF * sign, |(_, score)| score);
            let (alpha, beta) = if sign > 0 {
                (bound, SCORE_INF)
            } else {
                (-SCORE_INF, bound)
            };
            let score = self.minimax(&child, depth - 1, alpha, beta);

            // A score finished after the deadline may contain timeout sentinels.
            if self.timed_out() {
                return (best, true);
            }
            if best.is_none_or(|(_, best_score)| score * sign > best_score * sign) {
                best = Some((mv, score));
            }
        }
        (best, false)
    }
}

/// Picks between the last completed depth's move and the best move of an
/// interrupted depth. The interrupted one wins only when it is winning for the
/// side to move and the completed one is not.
const fn prefer_incomplete(favored: (Move, i32), incomplete: Option<(Move, i32)>, sign: i32) -> (Move, i32) {
    match incomplete {
        Some(candidate) if favored.1 * sign <= 0 && candidate.1 * sign > 0 => candidate,
        _ => favored,
    }
}

impl Searcher for AlphaBetaEngine {
    fn search(&mut self, state: &GameState, limit: SearchLimit) -> Option<(Move, SearchStats)> {
        self.nodes_searched = 0;
        self.start_time = Self::now();
        self.evaluator.reset();

        let (min_depth, max_depth, time_limit) = match limit {
            SearchLimit::Depth(d) => {
                let d = d.max(1);
                (self.config.min_depth.clamp(1, d), d, None)
            }
            #[allow(clippy::cast_precision_loss)]
            SearchLimit::Time(t) => {
                let min = self.config.min_depth.max(1);
                (min, self.config.max_depth.max(min), Some(t as f64))
            }
        };
        self.time_limit = time_limit;

        let mut moves = state.all_legal_moves();
        self.evaluator.order_moves(state, &mut moves);
        let Some(&first) = moves.first() else {
            log::warn!("{:?} has no legal moves", state.turn());
            return None;
        };

        let sign = state.turn().sign();
        let mut favored = (first, -SCORE_INF * sign);
        let mut incomplete: Option<(Move, i32)> = None;
        let mut completed_depth = 0;

        // Iterative deepening
        for depth in min_depth..=max_depth {
            let (best, interrupted) = self.search_root(state, &moves, depth);
            if interrupted {
                incomplete = best;
                log::info!(
                    "timeout during depth {depth} after {:.0} ms",
                    self.elapsed_ms()
                );
                break;
            }

            if let Some(best) = best {
                favored = best;
                completed_depth = depth;
                log::debug!(
                    "depth {depth} finished at {:.0} ms, favored move {}, score {}",
                    self.elapsed_ms(),
                    favored.0,
                    favored.1
                );
            }
            if favored.1.abs() >= self.config.victory_points - 1 {
                break;
            }
        }

        let chosen = prefer_incomplete(favored, incomplete, sign);
        if chosen != favored {
            log::info!(
                "using move {} from unfinished depth (score {}) over {} (score {})",
                chosen.0,
                chosen.1,
                favored.0,
                favored.1
            );
        }

        let elapsed = self.elapsed_ms();
        log::info!(
            "{:?} plays {} (score {}, depth {completed_depth}, {} nodes, {elapsed:.0} ms)",
            state.turn(),
            chosen.0,
            chosen.1,
            self.nodes_searched
        );

        Some((
            chosen.0,
            SearchStats {
                depth: completed_depth,
                nodes: self.nodes_searched,
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                time_ms: elapsed as u64,
                score: chosen.1,
            },
        ))
    }
}
