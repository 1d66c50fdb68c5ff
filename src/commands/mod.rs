//! Server subcommands.

pub mod create_user;
