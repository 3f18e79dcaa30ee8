mod audio;
pub use audio::*;

mod board;
pub use board::*;

mod command;
pub use command::*;

mod effects;
pub use effects::*;

mod error;
pub use error::RuntimeError;

mod loader;
pub use loader::load_bank;

mod orchestrator;
pub use orchestrator::*;
