//! configseek
//!
//! Upward discovery, loading and merging of configuration files, with a
//! single implementation usable from blocking and async callers.

pub mod cli;
pub mod config;
pub mod dual;
pub mod error;
pub mod host;
pub mod logging;
