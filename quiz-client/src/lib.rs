pub mod api;
pub mod config;
pub mod error;
pub mod player;
pub mod terminal;

pub use api::{HttpQuizApi, QuizApi};
pub use config::{Config, ConfigError};
pub use error::ClientError;
pub use player::{PlayerCommand, PlayerHandle, PlayerSettings, QuizPlayer};
