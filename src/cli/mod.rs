//! CLI module - Command-line interface for cardbox
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// cardbox - question/answer card catalog server
#[derive(Parser)]
#[command(name = "cardbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    Init,

    /// Create a user account
    CreateUser {
        username: String,
        #[arg(long)]
        password: String,
        /// Allow moderating and editing any card
        #[arg(long)]
        staff: bool,
    },

    /// Print card, user, category and tag counts
    Stats,
}

pub use commands::*;
