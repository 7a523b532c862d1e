use crate::app::time::now_millis;
use crate::error::RelayError;
use crate::protocol::{self, ClientMessage, PlayerInfo, RoomId, RoomView, ServerMessage};
use crate::shared::names::player_name;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Payloads buffered per connection before new ones are dropped.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Room registry and per-connection message handling for the direction relay.
///
/// Every room sits behind its own mutex so concurrent `join`s against the
/// same room are applied one at a time. Rooms live as long as the process.
#[derive(Debug, Default)]
pub struct Relay {
  rooms: DashMap<RoomId, Arc<Mutex<Room>>>,
  sessions: DashMap<String, SessionEntry>,
}

#[derive(Debug)]
struct Room {
  view: RoomView,
  members: Vec<String>,
}

#[derive(Debug)]
struct SessionEntry {
  sender: Sender<String>,
  rooms: Vec<RoomId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayStats {
  pub rooms: usize,
  pub sessions: usize,
}

impl Relay {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_session(&self, sender: Sender<String>) -> String {
    let session_id = Uuid::new_v4().to_string();
    self.sessions.insert(
      session_id.clone(),
      SessionEntry {
        sender,
        rooms: Vec::new(),
      },
    );
    session_id
  }

  pub async fn remove_session(&self, session_id: &str) {
    let Some((_, entry)) = self.sessions.remove(session_id) else { return };
    for ts in entry.rooms {
      let Some(room) = self.room(ts) else { continue };
      room.lock().await.members.retain(|member| member != session_id);
    }
  }

  pub fn stats(&self) -> RelayStats {
    RelayStats {
      rooms: self.rooms.len(),
      sessions: self.sessions.len(),
    }
  }

  pub async fn room_view(&self, ts: RoomId) -> Option<RoomView> {
    let room = self.room(ts)?;
    let view = room.lock().await.view.clone();
    Some(view)
  }

  /// Handles one text frame from `session_id`. Errors are reported back to
  /// the sender; the return value says whether the connection stays open.
  pub async fn handle_text_message(&self, session_id: &str, text: &str) -> bool {
    let result = match protocol::decode_client_message(text) {
      Ok(message) => self.handle_client_message(session_id, text, message).await,
      Err(error) => Err(error),
    };
    let Err(error) = result else { return true };

    let fatal = error.is_fatal();
    if fatal {
      tracing::warn!(session_id, %error, "closing relay connection");
    } else {
      tracing::debug!(session_id, %error, "relay request rejected");
    }
    self.send_message(session_id, &ServerMessage::error(&error));
    !fatal
  }

  async fn handle_client_message(
    &self,
    session_id: &str,
    raw: &str,
    message: ClientMessage,
  ) -> Result<(), RelayError> {
    match message {
      ClientMessage::Start { name } => {
        let game = self.start_room(session_id, player_name(name.as_deref())).await;
        self.send_message(session_id, &ServerMessage::Start { game });
        Ok(())
      }
      ClientMessage::Join { ts, name } => {
        let game = self.join_room(session_id, ts, player_name(name.as_deref())).await?;
        self.send_message(session_id, &ServerMessage::Join { game });
        Ok(())
      }
      ClientMessage::Move { dir, ts } => {
        tracing::debug!(session_id, ts, %dir, "relaying move");
        self.relay_move(session_id, ts, raw).await;
        Ok(())
      }
    }
  }

  async fn start_room(&self, session_id: &str, name: String) -> RoomView {
    let mut ts = now_millis();
    let room = loop {
      match self.rooms.entry(ts) {
        Entry::Vacant(entry) => {
          let room = Arc::new(Mutex::new(Room {
            view: RoomView {
              ts,
              players: Vec::new(),
            },
            members: Vec::new(),
          }));
          entry.insert(Arc::clone(&room));
          break room;
        }
        Entry::Occupied(_) => ts += 1,
      }
    };

    let view = {
      let mut room = room.lock().await;
      room.view.players.push(PlayerInfo { name: name.clone() });
      room.members.push(session_id.to_string());
      room.view.clone()
    };
    self.track_membership(session_id, ts);
    tracing::info!(ts, player = %name, "room started");
    view
  }

  async fn join_room(&self, session_id: &str, ts: RoomId, name: String) -> Result<RoomView, RelayError> {
    let room = self.room(ts).ok_or(RelayError::RoomNotFound(ts))?;
    let view = {
      let mut room = room.lock().await;
      room.view.players.push(PlayerInfo { name: name.clone() });
      if !room.members.iter().any(|member| member == session_id) {
        room.members.push(session_id.to_string());
      }
      room.view.clone()
    };
    self.track_membership(session_id, ts);
    tracing::info!(ts, player = %name, players = view.players.len(), "player joined room");
    Ok(view)
  }

  /// Echoes the frame verbatim to the sender, then forwards it to the other
  /// members of room `ts` when the sender belongs to that room.
  async fn relay_move(&self, session_id: &str, ts: RoomId, raw: &str) {
    self.send_raw(session_id, raw.to_string());

    let Some(room) = self.room(ts) else { return };
    let peers: Vec<String> = {
      let room = room.lock().await;
      if !room.members.iter().any(|member| member == session_id) {
        return;
      }
      room
        .members
        .iter()
        .filter(|member| member.as_str() != session_id)
        .cloned()
        .collect()
    };
    for peer in peers {
      self.send_raw(&peer, raw.to_string());
    }
  }

  fn room(&self, ts: RoomId) -> Option<Arc<Mutex<Room>>> {
    self.rooms.get(&ts).map(|room| Arc::clone(room.value()))
  }

  fn track_membership(&self, session_id: &str, ts: RoomId) {
    if let Some(mut entry) = self.sessions.get_mut(session_id) {
      if !entry.rooms.contains(&ts) {
        entry.rooms.push(ts);
      }
    }
  }

  fn send_message(&self, session_id: &str, message: &ServerMessage) {
    match protocol::encode(message) {
      Ok(payload) => self.send_raw(session_id, payload),
      Err(error) => tracing::error!(session_id, %error, "failed to encode relay reply"),
    }
  }

  /// Queues without waiting. A connection that stops reading loses payloads
  /// once its queue is full instead of growing it.
  fn send_raw(&self, session_id: &str, payload: String) {
    let Some(entry) = self.sessions.get(session_id) else { return };
    match entry.sender.try_send(payload) {
      Ok(()) => {}
      Err(TrySendError::Full(_)) => {
        tracing::warn!(session_id, "outbound queue full, dropping payload");
      }
      Err(TrySendError::Closed(_)) => {
        tracing::debug!(session_id, "dropping payload for closed session");
      }
    }
  }
}
