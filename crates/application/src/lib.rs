//! Application services and persistence ports for Phonebook.

#![forbid(unsafe_code)]

mod user_service;

pub use user_service::{NewUser, UserRepository, UserService};
