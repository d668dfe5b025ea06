//! Domain types for the Phonebook user record service.

#![forbid(unsafe_code)]

mod user;

pub use user::{PhoneNumber, User, UserPatch};
