pub mod bitmap;
pub mod cli;
pub mod colorings;
pub mod error;
pub mod fractal_image;
pub mod image;
pub mod presets;
pub mod rules;

pub use error::{FractalError, Result};
