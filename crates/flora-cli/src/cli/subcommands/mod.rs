mod draft;
mod photo;
mod user;

pub use draft::DraftCommands;
pub use photo::PhotoCommands;
pub use user::UserCommands;
