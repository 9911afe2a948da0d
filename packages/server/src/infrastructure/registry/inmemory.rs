//! In-memory peer registry.
//!
//! A `BTreeMap` keyed by `PeerId` behind a single `tokio::sync::Mutex`, so
//! snapshots iterate in id order. The lock is only held for the map operation
//! itself; callers write to sockets after the snapshot is taken.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PeerHandle, PeerId, PeerRegistry};

/// In-memory implementation of `PeerRegistry`
#[derive(Debug, Default)]
pub struct InMemoryPeerRegistry {
    peers: Mutex<BTreeMap<PeerId, PeerHandle>>,
}

impl InMemoryPeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PeerRegistry for InMemoryPeerRegistry {
    async fn add(&self, handle: PeerHandle) {
        let mut peers = self.peers.lock().await;
        let peer_id = handle.id();
        peers.insert(peer_id, handle);
        tracing::debug!("Client {} registered ({} connected)", peer_id, peers.len());
    }

    async fn remove(&self, peer_id: PeerId) -> bool {
        let mut peers = self.peers.lock().await;
        let removed = peers.remove(&peer_id).is_some();
        if removed {
            tracing::debug!(
                "Client {} unregistered ({} connected)",
                peer_id,
                peers.len()
            );
        }
        removed
    }

    async fn get(&self, peer_id: PeerId) -> Option<PeerHandle> {
        self.peers.lock().await.get(&peer_id).cloned()
    }

    async fn snapshot(&self) -> Vec<PeerHandle> {
        self.peers.lock().await.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        self.peers.lock().await.len()
    }

    async fn drain(&self) -> Vec<PeerHandle> {
        let drained = std::mem::take(&mut *self.peers.lock().await);
        drained.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{Peer, PeerOutbox, Timestamp, peer_channel};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryPeerRegistry の add / remove / get / snapshot / count / drain
    // - 削除の冪等性、並行な追加・削除での件数の整合性
    //
    // 【なぜこのテストが必要か】
    // - Registry はブロードキャストの宛先を決める唯一の共有状態
    // - 二重削除や並行操作で件数が壊れるとブロードキャスト先がずれる
    // ========================================

    fn create_test_handle(id: u64) -> (PeerHandle, PeerOutbox) {
        let (tx, rx) = peer_channel(8);
        let peer = Peer::new(
            PeerId::new(id),
            "127.0.0.1:40000".parse().unwrap(),
            Timestamp::new(0),
        );
        (PeerHandle::new(peer, tx), rx)
    }

    #[tokio::test]
    async fn test_add_and_get() {
        // テスト項目: 追加したピアを ID で取得できる
        // given (前提条件):
        let registry = InMemoryPeerRegistry::new();
        let (handle, _rx) = create_test_handle(1);

        // when (操作):
        registry.add(handle).await;

        // then (期待する結果):
        assert_eq!(registry.count().await, 1);
        let found = registry.get(PeerId::new(1)).await;
        assert_eq!(found.map(|h| h.id()), Some(PeerId::new(1)));
        assert!(registry.get(PeerId::new(2)).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        // テスト項目: 存在しないピアの削除はエラーにならず件数も変わらない（冪等性）
        // given (前提条件):
        let registry = InMemoryPeerRegistry::new();
        let (alice, _rx1) = create_test_handle(1);
        let (bob, _rx2) = create_test_handle(2);
        registry.add(alice).await;
        registry.add(bob).await;

        // when (操作):
        let first = registry.remove(PeerId::new(1)).await;
        let second = registry.remove(PeerId::new(1)).await;
        let never_added = registry.remove(PeerId::new(99)).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert!(!never_added);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_snapshot_is_ordered_and_detached() {
        // テスト項目: スナップショットは ID 順で、取得後の変更の影響を受けない
        // given (前提条件):
        let registry = InMemoryPeerRegistry::new();
        let mut receivers = Vec::new();
        for id in [3, 1, 2] {
            let (handle, rx) = create_test_handle(id);
            receivers.push(rx);
            registry.add(handle).await;
        }

        // when (操作):
        let snapshot = registry.snapshot().await;
        registry.remove(PeerId::new(2)).await;

        // then (期待する結果):
        let ids: Vec<u64> = snapshot.iter().map(|h| h.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_drain_empties_registry() {
        // テスト項目: drain は全ピアを取り出し、Registry を空にする
        // given (前提条件):
        let registry = InMemoryPeerRegistry::new();
        let (alice, _rx1) = create_test_handle(1);
        let (bob, _rx2) = create_test_handle(2);
        registry.add(alice).await;
        registry.add(bob).await;

        // when (操作):
        let drained = registry.drain().await;

        // then (期待する結果):
        assert_eq!(drained.len(), 2);
        assert_eq!(registry.count().await, 0);
        assert!(registry.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_add_and_remove_keeps_count() {
        // テスト項目: K 件追加・J 件削除（重複削除を含む）を並行に行っても件数は K - J
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let adds = 50u64;
        let removes = 20u64;
        let mut receivers = Vec::new();
        let mut tasks = Vec::new();
        for id in 1..=adds {
            let (handle, rx) = create_test_handle(id);
            receivers.push(rx);
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move { registry.add(handle).await }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // when (操作): 同じ ID を 2 回ずつ並行に削除
        let mut tasks = Vec::new();
        for id in (1..=removes).chain(1..=removes) {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                registry.remove(PeerId::new(id)).await
            }));
        }
        let mut removed = 0;
        for task in tasks {
            if task.await.unwrap() {
                removed += 1;
            }
        }

        // then (期待する結果):
        assert_eq!(removed, removes);
        assert_eq!(registry.count().await as u64, adds - removes);
    }
}
