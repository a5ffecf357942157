//! Canvas2D rendering module
//!
//! Everything is drawn as filled rectangles and arcs straight from `GameState`.

pub mod canvas;

pub use canvas::CanvasRenderer;
