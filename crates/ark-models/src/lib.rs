//! Data models for The Ark.
//!
//! This crate holds the records the bot persists: users who have talked to
//! the bot and the library links they have submitted.

pub mod library;
pub mod user;

pub use library::{LibraryItem, NewLibraryItem};
pub use user::{UserId, UserPatch, UserRecord};
