//! Shared utilities for Linechat.
//!
//! Both the relay server and the CLI client depend on this crate for the
//! line-oriented wire protocol, logger setup and timestamp helpers.

pub mod logger;
pub mod protocol;
pub mod time;
