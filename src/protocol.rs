use crate::error::RelayError;
use crate::game::types::Direction;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rooms are keyed by their creation time in unix milliseconds.
pub type RoomId = i64;

pub const TYPE_START: &str = "start";
pub const TYPE_JOIN: &str = "join";
pub const TYPE_MOVE: &str = "move";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
  pub ts: RoomId,
  pub players: Vec<PlayerInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
  Start {
    #[serde(default)]
    name: Option<String>,
  },
  Join {
    ts: RoomId,
    #[serde(default)]
    name: Option<String>,
  },
  Move {
    dir: Direction,
    ts: RoomId,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
  Start { game: RoomView },
  Join { game: RoomView },
  Move { dir: Direction, ts: RoomId },
  Error { code: String, message: String },
}

impl ServerMessage {
  pub fn error(error: &RelayError) -> Self {
    ServerMessage::Error {
      code: error.code().to_string(),
      message: error.to_string(),
    }
  }
}

/// Parses one text frame. The `type` tag is checked before the payload so
/// an unknown kind is reported as such rather than as a shape mismatch.
pub fn decode_client_message(text: &str) -> Result<ClientMessage, RelayError> {
  let value: Value = serde_json::from_str(text)?;
  let kind = value
    .get("type")
    .and_then(Value::as_str)
    .ok_or(RelayError::MissingType)?;
  if !matches!(kind, TYPE_START | TYPE_JOIN | TYPE_MOVE) {
    return Err(RelayError::UnknownType(kind.to_string()));
  }
  Ok(serde_json::from_value(value)?)
}

pub fn decode_server_message(text: &str) -> Result<ServerMessage, serde_json::Error> {
  serde_json::from_str(text)
}

pub fn encode<T: Serialize>(message: &T) -> Result<String, serde_json::Error> {
  serde_json::to_string(message)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn move_round_trips() {
    let message = ClientMessage::Move {
      dir: Direction::Left,
      ts: 1_700_000_000_123,
    };
    let text = encode(&message).unwrap();
    assert_eq!(decode_client_message(&text).unwrap(), message);

    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["type"], "move");
    assert_eq!(value["dir"], "LEFT");
    assert_eq!(value["ts"], 1_700_000_000_123i64);
  }

  #[test]
  fn decodes_start_and_join() {
    assert_eq!(
      decode_client_message(r#"{"type":"start","name":"ana"}"#).unwrap(),
      ClientMessage::Start {
        name: Some("ana".to_string())
      }
    );
    assert_eq!(
      decode_client_message(r#"{"type":"join","ts":42}"#).unwrap(),
      ClientMessage::Join { ts: 42, name: None }
    );
  }

  #[test]
  fn unknown_type_is_reported_by_name() {
    let err = decode_client_message(r#"{"type":"chat","text":"hi"}"#).unwrap_err();
    assert!(matches!(err, RelayError::UnknownType(ref kind) if kind == "chat"));
    assert!(err.is_fatal());
  }

  #[test]
  fn missing_type_and_bad_json_are_rejected() {
    assert!(matches!(
      decode_client_message(r#"{"name":"x"}"#),
      Err(RelayError::MissingType)
    ));
    assert!(matches!(
      decode_client_message("not json"),
      Err(RelayError::Malformed(_))
    ));
    assert!(matches!(
      decode_client_message(r#"{"type":"move","dir":"NORTH","ts":1}"#),
      Err(RelayError::Malformed(_))
    ));
  }

  #[test]
  fn server_start_carries_the_room() {
    let message = ServerMessage::Start {
      game: RoomView {
        ts: 7,
        players: vec![PlayerInfo {
          name: "ana".to_string(),
        }],
      },
    };
    let value: Value = serde_json::from_str(&encode(&message).unwrap()).unwrap();
    assert_eq!(value["type"], "start");
    assert_eq!(value["game"]["ts"], 7);
    assert_eq!(value["game"]["players"][0]["name"], "ana");
  }
}
