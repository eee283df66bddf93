mod author;
mod backend;
mod conversation_state;
mod error;
mod loading;
mod message;
mod model_settings;
mod session;
mod slash_commands;
mod story;
mod textarea;

pub use author::*;
pub use backend::*;
pub use conversation_state::*;
pub use error::*;
pub use loading::*;
pub use message::*;
pub use model_settings::*;
pub use session::*;
pub use slash_commands::*;
pub use story::*;
pub use textarea::*;
