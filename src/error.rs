//! Error types shared across the crate.

use crate::protocol::RoomId;

/// A value outside the four directions reached the input boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectionError {
  #[error("invalid direction: {0}")]
  Invalid(String),
}

/// Failures while handling one relay message.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
  #[error("malformed message: {0}")]
  Malformed(#[from] serde_json::Error),

  #[error("message has no type")]
  MissingType,

  #[error("invalid message type: {0}")]
  UnknownType(String),

  #[error("room {0} not found")]
  RoomNotFound(RoomId),
}

impl RelayError {
  /// Whether the connection that produced this error must be closed.
  pub fn is_fatal(&self) -> bool {
    !matches!(self, RelayError::RoomNotFound(_))
  }

  pub fn code(&self) -> &'static str {
    match self {
      RelayError::Malformed(_) => "malformed",
      RelayError::MissingType => "missing_type",
      RelayError::UnknownType(_) => "invalid_type",
      RelayError::RoomNotFound(_) => "room_not_found",
    }
  }
}

/// Client-side relay connection failures.
#[derive(Debug, thiserror::Error)]
pub enum RelayLinkError {
  #[error("websocket error: {0}")]
  Socket(#[from] tokio_tungstenite::tungstenite::Error),

  #[error("could not encode message: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("relay rejected request: {code}: {message}")]
  Rejected { code: String, message: String },

  #[error("relay closed the connection")]
  Closed,

  #[error("unexpected reply from relay")]
  UnexpectedReply,
}
