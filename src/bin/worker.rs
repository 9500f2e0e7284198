//! Web worker entry point for the browser build.

#[cfg(target_arch = "wasm32")]
fn main() {
    use gloo_worker::Registrable;
    notchess_core::worker::SearchWorker::registrar().register();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("the search worker only runs as a wasm32 web worker");
}
