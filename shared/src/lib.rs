pub mod assets;
pub mod clock;
pub mod commands;
pub mod config;
pub mod display_interface;
pub mod domain;
pub mod error;
pub mod events;
pub mod message_bus;
pub mod modules;
