//! Tower Guess core crate.
//!
//! Two halves share the catalog model:
//! - the native catalog builder (`builder`, plus the `generate-catalog` and
//!   `check-catalog` binaries behind the `builder` feature), and
//! - the quiz engine (`quiz`) with its browser front end (`web`, wasm only),
//!   exposed to JS through `start_quiz()`.

use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod config;
pub mod error;
pub mod quiz;

#[cfg(not(target_arch = "wasm32"))]
pub mod builder;

#[cfg(target_arch = "wasm32")]
mod web;

pub use catalog::{Catalog, CatalogEntry};
pub use error::{BuildError, CatalogError, QuizError};
pub use quiz::{GuessOutcome, Phase, QuizEngine};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    wasm_logger::init(wasm_logger::Config::default());
}
