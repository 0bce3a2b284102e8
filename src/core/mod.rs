// Core module definitions for the Optimus capability probe

pub mod command;
pub mod config;
pub mod context;
pub mod distro;
pub mod switch_tool;
pub mod validator;
