// ============================================================
// Layer 1 — CLI Argument Types
// ============================================================
// Value parsers and enums behind the command line flags.
//
// Boolean switches accept an optional value, so all of these
// are equivalent:
//   --debug          --debug true        --debug=yes
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::ValueEnum;

use crate::application::train_use_case::DataStrategy;

/// Parse a yes/no style value. Anything unrecognised is a usage error.
pub fn str2bool(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "t" | "y" | "1" => Ok(true),
        "no" | "false" | "f" | "n" | "0" => Ok(false),
        _ => Err(format!("Boolean value expected, got '{value}'")),
    }
}

/// Compute device for the run.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// GPU through wgpu
    #[default]
    Wgpu,
    /// CPU through ndarray
    Ndarray,
}

/// The three data switches as parsed from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataFlags {
    pub debug:                 bool,
    pub dummy_fixed_length:    bool,
    pub dummy_variable_length: bool,
}

impl From<DataFlags> for DataStrategy {
    fn from(flags: DataFlags) -> Self {
        DataStrategy::from_flags(flags.debug, flags.dummy_fixed_length, flags.dummy_variable_length)
    }
}
