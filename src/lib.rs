mod app;
mod app_state;
mod event_handler;
mod renderer;
mod state;
mod update_logic;

pub mod board;
pub mod config;
pub mod drawing;
pub mod export;
pub mod formation;
pub mod lineup;
pub mod mesh;
pub mod pitch;
pub mod raster;
pub mod scene;
pub mod store;
pub mod text_renderer;
pub mod ui;
pub mod vertex;

// Re-export the main public interface
pub use app::run;
pub use board::BoardState;
pub use config::BoardConfig;
pub use vertex::Vertex;

// Re-export for WASM compatibility
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn start() {
    run().await;
}
