pub mod console;
pub mod error;
pub mod mesh;
pub mod renderer;
pub mod text;
pub mod timing;
pub mod transform;
