//! Text renderer producing the final document

mod text;

pub use text::render;
