pub mod config;
pub mod menu;
pub mod movies;
pub mod progress;
pub mod prompts;
pub mod serve;
pub mod users;
pub mod website;
