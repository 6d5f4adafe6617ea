pub mod renderer;
pub mod template;

pub use renderer::Renderer;
pub use template::{Placeholder, RenderTemplate, Token};
