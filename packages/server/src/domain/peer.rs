//! Peer value objects and the handle stored in the registry.

use std::{
    fmt,
    net::{IpAddr, SocketAddr},
};

use hiroba_shared::time::timestamp_to_rfc3339;

use super::{Message, MessagePushError, PeerChannel};

/// Identifier of a connected peer.
///
/// Assigned at accept time starting at 1 and never reused within a server run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(u64);

impl PeerId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn to_rfc3339(&self) -> String {
        timestamp_to_rfc3339(self.0)
    }
}

/// A live connection as seen by the rest of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub id: PeerId,
    /// Remote address of the connection
    pub addr: SocketAddr,
    pub connected_at: Timestamp,
}

impl Peer {
    pub fn new(id: PeerId, addr: SocketAddr, connected_at: Timestamp) -> Self {
        Self {
            id,
            addr,
            connected_at,
        }
    }

    /// Remote IP, the form shown to other peers in notices
    pub fn ip(&self) -> IpAddr {
        self.addr.ip()
    }
}

/// Registry entry: a peer together with the channel feeding its writer task.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    pub peer: Peer,
    channel: PeerChannel,
}

impl PeerHandle {
    pub fn new(peer: Peer, channel: PeerChannel) -> Self {
        Self { peer, channel }
    }

    pub fn id(&self) -> PeerId {
        self.peer.id
    }

    /// Queue a message for this peer's socket without waiting.
    pub fn deliver(&self, message: Message) -> Result<(), MessagePushError> {
        self.channel.try_send(self.peer.id, message)
    }

    /// Ask this peer's session to shut the connection down after the queued messages.
    pub fn close(&self) {
        self.channel.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::peer_channel;

    fn test_peer(id: u64) -> Peer {
        Peer::new(
            PeerId::new(id),
            "127.0.0.1:40000".parse().unwrap(),
            Timestamp::new(1_000),
        )
    }

    #[test]
    fn test_peer_id_ordering_follows_value() {
        // テスト項目: PeerId は数値の大小で順序付けられる
        // given (前提条件):
        let first = PeerId::new(1);
        let second = PeerId::new(2);

        // when (操作):
        let ordered = first < second;

        // then (期待する結果):
        assert!(ordered);
        assert_eq!(second.to_string(), "2");
    }

    #[test]
    fn test_peer_ip_drops_port() {
        // テスト項目: 通知用の IP アドレスにはポート番号が含まれない
        // given (前提条件):
        let peer = test_peer(1);

        // when (操作):
        let ip = peer.ip();

        // then (期待する結果):
        assert_eq!(ip.to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_handle_delivers_then_signals_close() {
        // テスト項目: deliver したメッセージはキューに残り、close はシグナルで通知される
        // given (前提条件):
        let (channel, mut outbox) = peer_channel(4);
        let handle = PeerHandle::new(test_peer(1), channel);

        // when (操作):
        handle.deliver(Message::from("bye")).unwrap();
        handle.close();

        // then (期待する結果):
        assert_eq!(outbox.messages.recv().await, Some(Message::from("bye")));
        assert!(outbox.close.is_requested());
    }

    #[test]
    fn test_handle_drops_message_when_queue_is_full() {
        // テスト項目: キューが満杯なら待たずに QueueFull を返し、キューは増えない
        // given (前提条件):
        let (channel, mut outbox) = peer_channel(2);
        let handle = PeerHandle::new(test_peer(3), channel);
        handle.deliver(Message::from("one")).unwrap();
        handle.deliver(Message::from("two")).unwrap();

        // when (操作):
        let result = handle.deliver(Message::from("three"));

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::QueueFull(PeerId::new(3))));
        assert_eq!(outbox.messages.try_recv(), Ok(Message::from("one")));
        assert_eq!(outbox.messages.try_recv(), Ok(Message::from("two")));
        assert!(outbox.messages.try_recv().is_err());
    }

    #[test]
    fn test_handle_reports_closed_channel() {
        // テスト項目: 受信側が破棄されたチャンネルへの送信は ChannelClosed になる
        // given (前提条件):
        let (channel, outbox) = peer_channel(4);
        let handle = PeerHandle::new(test_peer(7), channel);
        drop(outbox);

        // when (操作):
        let result = handle.deliver(Message::from("hello"));

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::ChannelClosed(PeerId::new(7))));
    }
}
