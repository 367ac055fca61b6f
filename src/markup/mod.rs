pub mod escape;
pub mod render;
pub mod verb;

pub use escape::*;
pub use render::*;
pub use verb::*;
