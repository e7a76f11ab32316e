mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::{draw_item_rect, ScreenRect, Viewport};
