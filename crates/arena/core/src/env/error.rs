//! Oracle access and catalog validation errors.

use crate::error::{CombatError, ErrorKind, ErrorSeverity};

use super::MoveId;

/// Errors that occur when accessing oracle data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("MoveOracle not available")]
    MovesNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("CombatConfig not available")]
    ConfigNotAvailable,

    #[error("move definition {0} not found")]
    MoveNotFound(MoveId),
}

impl CombatError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            MovesNotAvailable | RngNotAvailable | ConfigNotAvailable => ErrorSeverity::Fatal,
            MoveNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::Catalog
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            MovesNotAvailable => "ORACLE_MOVES_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            ConfigNotAvailable => "ORACLE_CONFIG_NOT_AVAILABLE",
            MoveNotFound(_) => "ORACLE_MOVE_NOT_FOUND",
        }
    }
}

/// Catalog construction errors.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("move '{name}': {field} = {value} is out of range")]
    OutOfRange {
        name: String,
        field: &'static str,
        value: f64,
    },

    #[error("duplicate move name '{0}'")]
    DuplicateName(String),

    #[error("move '{name}' has id {found} but sits at index {expected}")]
    IdMismatch {
        name: String,
        expected: MoveId,
        found: MoveId,
    },

    #[error("move '{name}' references unknown move {reference}")]
    UnknownReference { name: String, reference: MoveId },

    #[error("catalog is full ({0} moves)")]
    TooManyMoves(usize),
}

impl CombatError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::Catalog
    }

    fn error_code(&self) -> &'static str {
        use CatalogError::*;
        match self {
            OutOfRange { .. } => "CATALOG_OUT_OF_RANGE",
            DuplicateName(_) => "CATALOG_DUPLICATE_NAME",
            IdMismatch { .. } => "CATALOG_ID_MISMATCH",
            UnknownReference { .. } => "CATALOG_UNKNOWN_REFERENCE",
            TooManyMoves(_) => "CATALOG_TOO_MANY_MOVES",
        }
    }
}
