//! # Config Commands
//!
//! Read-only access to the desk configuration.

use tracing::debug;

use crate::state::DeskConfig;

/// Gets the current desk configuration.
///
/// ## When Used
/// - Bill printouts (store name)
/// - Currency formatting
pub fn get_config(config: &DeskConfig) -> DeskConfig {
    debug!("get_config command");
    config.clone()
}
