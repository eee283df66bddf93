mod app_state;
mod bubble;
mod bubble_list;
mod conversation;
mod scroll;
mod stories;
mod story_generator;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use conversation::*;
pub use scroll::*;
pub use stories::*;
pub use story_generator::*;
