//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r##"// Sticky Windows Configuration File
// =================================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.
//
// Documentation: https://github.com/sticky-windows/sticky-windows

{
  // ============================================================================
  // Sticky Regions
  // ============================================================================
  // "sticky": {
  //   // Whether sticky regions are active when a layout starts
  //   "enabled": true,
  //
  //   // Size of a new sticky region when none is given.
  //   // Below 1: fraction of the frame (0.3 = 30%).
  //   // 1 or more: columns for left/right, lines for top/bottom.
  //   "defaultSize": 0.3
  // },

  // ============================================================================
  // Layout Simulator (`sticky run`)
  // ============================================================================
  // "simulator": {
  //   // Initial frame size
  //   "frameWidth": 160,
  //   "frameHeight": 48,
  //
  //   // Smallest size any region may take
  //   "minWidth": 10,
  //   "minHeight": 4
  // }
}
"##
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
