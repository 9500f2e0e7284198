//! Running searches off the interactive path: a web worker for the browser
//! build and a plain background thread for native callers. Either way the
//! search works on its own copy of the game state.

use crate::engine::config::EngineConfig;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Move, SearchLimit, SearchStats, Searcher};
use crate::logic::game::GameState;
use gloo_worker::{HandlerId, Worker, WorkerScope};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
pub enum Input {
    ComputeMove(GameState, SearchLimit, EngineConfig),
}

#[derive(Serialize, Deserialize)]
pub enum Output {
    MoveFound(Move, SearchStats),
    /// The side to move cannot move at all.
    NoLegalMoves,
}

pub struct SearchWorker {
    engine: Option<AlphaBetaEngine>,
}

impl Worker for SearchWorker {
    type Input = Input;
    type Message = ();
    type Output = Output;

    fn create(_scope: &WorkerScope<Self>) -> Self {
        Self { engine: None }
    }

    fn update(&mut self, _scope: &WorkerScope<Self>, _msg: Self::Message) {}

    fn received(&mut self, scope: &WorkerScope<Self>, msg: Self::Input, id: HandlerId) {
        match msg {
            Input::ComputeMove(game_state, limit, config) => {
                let config = Arc::new(config);
                let engine = self
                    .engine
                    .get_or_insert_with(|| AlphaBetaEngine::new(config.clone()));
                engine.update_config(config);

                let output = engine
                    .search(&game_state, limit)
                    .map_or(Output::NoLegalMoves, |(mv, stats)| Output::MoveFound(mv, stats));
                scope.respond(id, output);
            }
        }
    }
}

/// Searches `state` on a new thread and hands the result to `on_done` there.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_search<F>(
    state: GameState,
    limit: SearchLimit,
    config: EngineConfig,
    on_done: F,
) -> std::thread::JoinHandle<()>
where
    F: FnOnce(Option<(Move, SearchStats)>) + Send + 'static,
{
    std::thread::spawn(move || {
        let mut engine = AlphaBetaEngine::new(Arc::new(config));
        on_done(engine.search(&state, limit));
    })
}
