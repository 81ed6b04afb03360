pub mod fonts;
pub mod graphic;
pub mod layout;

pub use fonts::Fonts;
pub use graphic::{Renderer, decode_cover, encode_png};
pub use layout::{Block, row_height};
