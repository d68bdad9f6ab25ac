//! HTTP Handlers

mod admin;
mod auth;
mod kiosk;
mod ping;
mod survey;
mod transfer;

pub use admin::*;
pub use auth::*;
pub use kiosk::*;
pub use ping::*;
pub use survey::*;
pub use transfer::*;
