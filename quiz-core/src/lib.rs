pub mod attempt;
pub mod events;
pub mod grading;
pub mod render;
pub mod scoring;
pub mod timer;
pub mod validation;

// Re-export main components
pub use attempt::*;
pub use events::*;
pub use grading::*;
pub use render::*;
pub use scoring::*;
pub use timer::*;
pub use validation::*;
