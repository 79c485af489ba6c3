//! Configuration model.
//!
//! Every section has serde defaults so a partial `config.toml` (or an empty
//! one) is still a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Positions copied when no configuration overrides them.
pub const DEFAULT_TARGET_POSITIONS: [usize; 3] = [1, 3, 7];

/// Ordered list of zero-based message positions to copy.
///
/// Positions index the conversation *as captured when a duplication starts*,
/// not any persistent message id. Order is significant and duplicates are
/// kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetPositions(Vec<usize>);

impl TargetPositions {
    pub fn new(positions: Vec<usize>) -> Self {
        Self(positions)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses a comma separated list such as `"1, 3,7"`.
    pub fn parse_list(input: &str) -> Result<Self, std::num::ParseIntError> {
        input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<usize>)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Default for TargetPositions {
    fn default() -> Self {
        Self(DEFAULT_TARGET_POSITIONS.to_vec())
    }
}

impl From<Vec<usize>> for TargetPositions {
    fn from(positions: Vec<usize>) -> Self {
        Self(positions)
    }
}

impl std::fmt::Display for TargetPositions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[{joined}]")
    }
}

/// Settings for the duplication pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicationConfig {
    /// Positions to copy, in replay order.
    #[serde(default)]
    pub target_positions: TargetPositions,
    /// Whether an empty destination created on the degenerate paths
    /// (empty source, no matching positions) is persisted.
    #[serde(default = "default_persist_empty_destination")]
    pub persist_empty_destination: bool,
}

fn default_persist_empty_destination() -> bool {
    true
}

impl Default for DuplicationConfig {
    fn default() -> Self {
        Self {
            target_positions: TargetPositions::default(),
            persist_empty_destination: default_persist_empty_destination(),
        }
    }
}

/// Settings for the file-backed session store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the sessions directory. Defaults to `<data dir>/sessions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_dir: Option<PathBuf>,
}

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootConfig {
    #[serde(default)]
    pub duplication: DuplicationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}
