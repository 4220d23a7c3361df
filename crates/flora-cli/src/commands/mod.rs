pub mod config;
pub mod dispatch;
pub mod draft;
pub mod inspect;
pub mod photo;
pub mod review;
pub mod shared;
pub mod user;
