use flatworld_common::EntityId;

/// Why an insertion was refused.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RejectReason {
    #[error("spawn location overlaps {count} solid entities")]
    Overlap { count: usize },
    #[error("no free location within {radius} rings")]
    NoFreeSpace { radius: u32 },
}

/// Errors from world manager operations. None of them are fatal to the
/// simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    #[error("entity '{kind}' rejected: {reason}")]
    RejectedInsertion { kind: String, reason: RejectReason },
    #[error("entity {0} not found")]
    InvalidReference(EntityId),
    #[error("altitude {altitude} outside 0..={max}")]
    AltitudeOutOfRange { altitude: i32, max: i32 },
}

/// Errors from loading or validating a [`crate::WorldConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
