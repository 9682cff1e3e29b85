//! A small slider/carousel controller. The core state machine is plain Rust
//! and runs anywhere; the DOM shell under `wasm/` only compiles on wasm32.

pub mod config;
pub mod deck;
pub mod dots;
pub mod engine;
pub mod transform;

// Only compile browser-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod controller;
    mod dom;

    pub use controller::Slider;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::Slider;
