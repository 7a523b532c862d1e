use crate::error::RelayLinkError;
use crate::game::types::Direction;
use crate::protocol::{self, ClientMessage, RoomId, RoomView, ServerMessage};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Client end of the relay: one room, moves out, moves in.
#[derive(Debug)]
pub struct RelayLink {
  room: RoomView,
  outgoing: mpsc::UnboundedSender<String>,
  incoming: mpsc::UnboundedReceiver<Direction>,
  task: JoinHandle<()>,
}

impl RelayLink {
  /// Opens a new room at `url` (e.g. `ws://host:9898/api/relay`).
  pub async fn start(url: &str, name: &str) -> Result<Self, RelayLinkError> {
    Self::open(
      url,
      ClientMessage::Start {
        name: Some(name.to_string()),
      },
    )
    .await
  }

  pub async fn join(url: &str, ts: RoomId, name: &str) -> Result<Self, RelayLinkError> {
    Self::open(
      url,
      ClientMessage::Join {
        ts,
        name: Some(name.to_string()),
      },
    )
    .await
  }

  async fn open(url: &str, hello: ClientMessage) -> Result<Self, RelayLinkError> {
    let (socket, _) = connect_async(url).await?;
    let (mut sink, mut stream) = socket.split();
    sink.send(Message::Text(protocol::encode(&hello)?)).await?;
    let room = await_room(&mut stream).await?;
    tracing::info!(ts = room.ts, players = room.players.len(), "relay link established");

    let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
    let (incoming_tx, incoming) = mpsc::unbounded_channel();
    let task = tokio::spawn(pump(sink, stream, room.ts, outgoing_rx, incoming_tx));

    Ok(Self {
      room,
      outgoing,
      incoming,
      task,
    })
  }

  pub fn room(&self) -> &RoomView {
    &self.room
  }

  pub fn send_move(&self, dir: Direction) -> Result<(), RelayLinkError> {
    let payload = protocol::encode(&ClientMessage::Move { dir, ts: self.room.ts })?;
    self.outgoing.send(payload).map_err(|_| RelayLinkError::Closed)
  }

  /// Drains relayed moves. Reports `Closed` once the connection is gone and
  /// nothing is left to drain.
  pub fn poll_moves(&mut self) -> Result<Vec<Direction>, RelayLinkError> {
    let mut moves = Vec::new();
    loop {
      match self.incoming.try_recv() {
        Ok(dir) => moves.push(dir),
        Err(TryRecvError::Empty) => return Ok(moves),
        Err(TryRecvError::Disconnected) if moves.is_empty() => return Err(RelayLinkError::Closed),
        Err(TryRecvError::Disconnected) => return Ok(moves),
      }
    }
  }

  /// Waits for the next relayed move. `None` once the link is closed.
  pub async fn next_move(&mut self) -> Option<Direction> {
    self.incoming.recv().await
  }
}

impl Drop for RelayLink {
  fn drop(&mut self) {
    self.task.abort();
  }
}

async fn await_room(stream: &mut SplitStream<Socket>) -> Result<RoomView, RelayLinkError> {
  while let Some(message) = stream.next().await {
    let text = match message? {
      Message::Text(text) => text,
      Message::Close(_) => return Err(RelayLinkError::Closed),
      _ => continue,
    };
    match protocol::decode_server_message(&text) {
      Ok(ServerMessage::Start { game }) | Ok(ServerMessage::Join { game }) => return Ok(game),
      Ok(ServerMessage::Error { code, message }) => return Err(RelayLinkError::Rejected { code, message }),
      Ok(ServerMessage::Move { .. }) => continue,
      Err(_) => return Err(RelayLinkError::UnexpectedReply),
    }
  }
  Err(RelayLinkError::Closed)
}

async fn pump(
  mut sink: SplitSink<Socket, Message>,
  mut stream: SplitStream<Socket>,
  ts: RoomId,
  mut outgoing: mpsc::UnboundedReceiver<String>,
  incoming: mpsc::UnboundedSender<Direction>,
) {
  loop {
    tokio::select! {
      payload = outgoing.recv() => {
        let Some(payload) = payload else { break };
        if sink.send(Message::Text(payload)).await.is_err() {
          break;
        }
      }
      message = stream.next() => {
        let Some(Ok(message)) = message else { break };
        let text = match message {
          Message::Text(text) => text,
          Message::Close(_) => break,
          _ => continue,
        };
        match protocol::decode_server_message(&text) {
          Ok(ServerMessage::Move { dir, ts: room }) if room == ts => {
            if incoming.send(dir).is_err() {
              break;
            }
          }
          Ok(ServerMessage::Error { code, message }) => {
            tracing::warn!(%code, %message, "relay reported an error");
          }
          Ok(_) => {}
          Err(error) => tracing::debug!(%error, "ignoring unreadable relay frame"),
        }
      }
    }
  }
  let _ = sink.close().await;
  tracing::debug!(ts, "relay link closed");
}
