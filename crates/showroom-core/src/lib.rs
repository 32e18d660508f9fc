pub mod camera;
pub mod constants;
pub mod controller;
pub mod error;
pub mod model;
pub mod reticle;
pub mod theme;

pub use camera::*;
pub use constants::*;
pub use controller::*;
pub use error::*;
pub use model::*;
pub use reticle::*;
pub use theme::*;
