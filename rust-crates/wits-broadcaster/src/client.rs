use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, watch, Mutex};
use tracing::{debug, info, warn};

use crate::shutdown::stopped;

pub type ClientId = u64;

type SharedWriter = Arc<Mutex<OwnedWriteHalf>>;

/// Connected WITS consumer
struct Client {
    addr: SocketAddr,
    writer: SharedWriter,
    /// Dropping this wakes the client's monitor so it releases the read half
    _closed: oneshot::Sender<()>,
}

/// Write one whole frame
async fn send_frame(writer: &SharedWriter, frame: &[u8]) -> std::io::Result<()> {
    let mut writer = writer.lock().await;
    writer.write_all(frame).await?;
    writer.flush().await
}

/// Result of one broadcast step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    pub delivered: usize,
    pub dropped: usize,
}

/// Shared registry of connected clients
#[derive(Clone, Default)]
pub struct ClientRegistry {
    clients: Arc<Mutex<BTreeMap<ClientId, Client>>>,
    next_id: Arc<AtomicU64>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new connection and spawn its disconnect monitor.
    pub async fn register(
        &self,
        stream: TcpStream,
        addr: SocketAddr,
        running: watch::Receiver<bool>,
    ) -> ClientId {
        let (reader, writer) = stream.into_split();
        let (closed_tx, closed_rx) = oneshot::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let total = {
            let mut clients = self.clients.lock().await;
            clients.insert(
                id,
                Client {
                    addr,
                    writer: Arc::new(Mutex::new(writer)),
                    _closed: closed_tx,
                },
            );
            clients.len()
        };
        info!("[+] Client connected: {} (total: {})", addr, total);

        tokio::spawn(monitor(self.clone(), id, addr, reader, closed_rx, running));
        id
    }

    /// Remove a client, closing its connection. Returns false if already gone.
    pub async fn remove(&self, id: ClientId) -> bool {
        self.clients.lock().await.remove(&id).is_some()
    }

    /// Send `frame` to every client registered when the step begins.
    ///
    /// Returns `None` without sending if the registry is empty at that
    /// moment; the caller must not count the step. The registry lock is
    /// released before any network write, so a slow reader never holds up
    /// registration. A failed write drops only that client.
    pub async fn broadcast(&self, frame: &[u8]) -> Option<BroadcastOutcome> {
        let recipients: Vec<(ClientId, SocketAddr, SharedWriter)> = {
            let clients = self.clients.lock().await;
            if clients.is_empty() {
                return None;
            }
            clients
                .iter()
                .map(|(id, client)| (*id, client.addr, Arc::clone(&client.writer)))
                .collect()
        };

        let mut dead = Vec::new();
        for (id, addr, writer) in &recipients {
            if let Err(e) = send_frame(writer, frame).await {
                warn!("Failed to send to client {}: {}", addr, e);
                dead.push(*id);
            }
        }

        if !dead.is_empty() {
            let mut clients = self.clients.lock().await;
            for id in &dead {
                if let Some(client) = clients.remove(id) {
                    info!("[-] Dropped client {}. Remaining: {}", client.addr, clients.len());
                }
            }
        }

        Some(BroadcastOutcome {
            delivered: recipients.len() - dead.len(),
            dropped: dead.len(),
        })
    }

    /// Shut down and forget every connection.
    pub async fn close_all(&self) {
        let clients = std::mem::take(&mut *self.clients.lock().await);
        for (_, client) in clients {
            let mut writer = client.writer.lock().await;
            if let Err(e) = writer.shutdown().await {
                debug!("Error closing {}: {}", client.addr, e);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }
}

/// Read-and-discard until the peer goes away, then deregister.
async fn monitor(
    registry: ClientRegistry,
    id: ClientId,
    addr: SocketAddr,
    mut reader: OwnedReadHalf,
    mut closed: oneshot::Receiver<()>,
    mut running: watch::Receiver<bool>,
) {
    let mut buf = [0u8; 1024];

    loop {
        tokio::select! {
            result = reader.read(&mut buf) => match result {
                Ok(0) => break,
                Ok(n) => debug!("Discarded {} bytes from {}", n, addr),
                Err(e) => {
                    debug!("Read error from {}: {}", addr, e);
                    break;
                }
            },
            _ = &mut closed => return,
            _ = stopped(&mut running) => return,
        }
    }

    if registry.remove(id).await {
        info!("[-] Client disconnected: {}", addr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn connected_pair() -> (TcpStream, TcpStream, SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (server_side, peer) = listener.accept().await.unwrap();
        (server_side, client, peer)
    }

    #[tokio::test]
    async fn test_register_and_broadcast() {
        let (_tx, rx) = watch::channel(true);
        let registry = ClientRegistry::new();
        assert!(registry.is_empty().await);

        let (server_side, mut client, peer) = connected_pair().await;
        registry.register(server_side, peer, rx).await;
        assert_eq!(registry.len().await, 1);

        let outcome = registry.broadcast(b"&&\r\n!!\r\n").await;
        assert_eq!(outcome, Some(BroadcastOutcome { delivered: 1, dropped: 0 }));

        let mut buf = [0u8; 8];
        client.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"&&\r\n!!\r\n");
    }

    #[tokio::test]
    async fn test_monitor_removes_closed_client() {
        let (_tx, rx) = watch::channel(true);
        let registry = ClientRegistry::new();

        let (server_side, client, peer) = connected_pair().await;
        registry.register(server_side, peer, rx).await;
        drop(client);

        for _ in 0..50 {
            if registry.is_empty().await {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_incoming_bytes_discarded() {
        let (_tx, rx) = watch::channel(true);
        let registry = ClientRegistry::new();

        let (server_side, mut client, peer) = connected_pair().await;
        registry.register(server_side, peer, rx).await;

        client.write_all(b"hello server").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_close_all_sends_eof() {
        let (_tx, rx) = watch::channel(true);
        let registry = ClientRegistry::new();

        let (server_side, mut client, peer) = connected_pair().await;
        registry.register(server_side, peer, rx).await;
        registry.close_all().await;
        assert!(registry.is_empty().await);

        let mut buf = [0u8; 16];
        let n = tokio::time::timeout(std::time::Duration::from_secs(2), client.read(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_registry_is_none() {
        let registry = ClientRegistry::new();
        assert_eq!(registry.broadcast(b"&&\r\n!!\r\n").await, None);
    }

    #[tokio::test]
    async fn test_broadcast_after_last_client_left_is_none() {
        let (_tx, rx) = watch::channel(true);
        let registry = ClientRegistry::new();

        let (server_side, client, peer) = connected_pair().await;
        let id = registry.register(server_side, peer, rx).await;
        drop(client);
        registry.remove(id).await;

        assert_eq!(registry.broadcast(b"&&\r\n!!\r\n").await, None);
    }

    #[tokio::test]
    async fn test_stalled_reader_does_not_block_registration() {
        let (_tx, rx) = watch::channel(true);
        let registry = ClientRegistry::new();

        // Never reads, so its socket buffers fill and writes stall
        let (server_side, _stalled, peer) = connected_pair().await;
        registry.register(server_side, peer, rx.clone()).await;

        let feeder = {
            let registry = registry.clone();
            tokio::spawn(async move {
                let frame = vec![b'0'; 64 * 1024];
                loop {
                    registry.broadcast(&frame).await;
                }
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let (server_side, _client, peer) = connected_pair().await;
        let registered = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            registry.register(server_side, peer, rx),
        )
        .await;
        assert!(registered.is_ok(), "registration blocked behind a stalled write");
        assert_eq!(registry.len().await, 2);

        feeder.abort();
    }
}
