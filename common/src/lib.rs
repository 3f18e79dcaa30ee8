mod question;
pub use question::*;

mod shuffle;
pub use shuffle::fisher_yates;

mod bank;
pub use bank::*;

pub mod validator;
pub use validator::Mapping;

mod session;
pub use session::*;

mod settings;
pub use settings::*;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

pub mod test_case;
