use thiserror::Error;

/// Why a search produced no route.
///
/// All variants are ordinary results, not fatal conditions: the agent layer
/// is expected to hold position and retry later. Callers cannot usefully
/// distinguish [`NoPath`](SearchError::NoPath) from
/// [`BudgetExceeded`](SearchError::BudgetExceeded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The destination tile is missing, too steep for the agent, or carries a
    /// blocking object. Detected before any node is expanded.
    #[error("destination tile is missing or not walkable")]
    UnreachableDestination,
    /// Every candidate node was exhausted without reaching the destination.
    #[error("no path to destination")]
    NoPath,
    /// The iteration budget ran out first.
    #[error("search iteration budget exceeded")]
    BudgetExceeded,
}
