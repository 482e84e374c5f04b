//! CLI commands for materia

pub mod compare;
pub mod config;
pub mod dispatch;
pub mod list;
pub mod normalize;
pub mod similar;
