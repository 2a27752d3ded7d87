//! Error types for rule violations

/// Why an attempted action was rejected. The state it was attempted on is
/// left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("target cell is already occupied")]
    TargetNotEmpty,

    #[error("target cell touches a piece of the opposing color")]
    ColorConflict,

    /// Past turn one a placement must touch at least one friendly piece
    #[error("target cell touches no placed piece")]
    Isolated,

    #[error("piece is not available in the bag")]
    PieceNotInBag,

    #[error("target cell is not reachable from the hive")]
    UnknownCell,

    #[error("game is already over")]
    GameOver,

    #[error("cannot pass while a placement is available")]
    MovesAvailable,

    #[error("moving placed pieces is not supported")]
    MovementUnsupported,
}

/// Why no automated move could be produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NoLegalMove {
    #[error("bag is empty")]
    BagEmpty,

    #[error("no reachable empty cell satisfies the color rule")]
    NoReachableCell,

    #[error("game is already over")]
    GameOver,

    #[error("selector proposed an illegal move: {0}")]
    Rejected(#[from] IllegalMove),
}

/// Malformed `"{x}~{y}"` coordinate key.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate key: {0:?}")]
pub struct HexParseError(pub String);
