use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use wits_protocol::{encode_frame, CanonicalRecord};

use crate::client::ClientRegistry;
use crate::config::ServerConfig;
use crate::error::{BroadcasterError, Result};
use crate::playback::{Advance, Playback};
use crate::shutdown::stopped;

/// Back-off after a failed accept before trying again.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// How long `stop` waits for a task before aborting it.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Snapshot of replay progress
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayStats {
    /// Broadcast steps completed, across all passes
    pub frames_sent: u64,
    /// Current pass, starting at 1
    pub pass: u64,
    /// Index of the next record to send
    pub cursor: usize,
    /// Last record sent with looping off
    pub finished: bool,
    /// Connected clients
    pub clients: usize,
    /// Frame writes that reached a client, summed over all steps
    pub deliveries: u64,
    /// Frame writes that failed and dropped their client
    pub write_failures: u64,
    /// When the first client arrived and streaming began
    pub streaming_since: Option<DateTime<Utc>>,
}

/// State shared by the accept loop, client monitors and the feed loop.
struct ServerContext {
    records: Arc<[CanonicalRecord]>,
    clients: ClientRegistry,
    running: watch::Sender<bool>,
    stats: RwLock<ReplayStats>,
}

impl ServerContext {
    fn new(records: Arc<[CanonicalRecord]>) -> Self {
        let (running, _) = watch::channel(false);
        Self {
            records,
            clients: ClientRegistry::new(),
            running,
            stats: RwLock::new(ReplayStats {
                pass: 1,
                ..Default::default()
            }),
        }
    }

    fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.running.subscribe()
    }

    /// Sleep for `duration` unless shutdown comes first. Returns false on shutdown.
    async fn pause(&self, duration: Duration) -> bool {
        let mut running = self.subscribe();
        if !*running.borrow() {
            return false;
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => self.is_running(),
            _ = stopped(&mut running) => false,
        }
    }

    /// Poll until a client is connected. Returns false on shutdown.
    async fn wait_for_client(&self, poll: Duration) -> bool {
        while self.clients.is_empty().await {
            if !self.pause(poll).await {
                return false;
            }
        }
        self.is_running()
    }

    async fn wait_for_shutdown(&self) {
        stopped(&mut self.subscribe()).await;
    }
}

enum Lifecycle {
    Created,
    Running(Vec<JoinHandle<()>>),
    Stopped,
}

/// Paced WITS0 replay server
///
/// Streams one frame per record to every connected TCP client, pausing
/// while nobody is connected.
pub struct ReplayServer {
    config: ServerConfig,
    ctx: Arc<ServerContext>,
    lifecycle: Mutex<Lifecycle>,
}

impl ReplayServer {
    /// Create a server over a loaded record sequence.
    pub fn new(records: impl Into<Arc<[CanonicalRecord]>>, config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let records = records.into();
        if records.is_empty() {
            return Err(BroadcasterError::EmptySequence);
        }

        Ok(Self {
            config,
            ctx: Arc::new(ServerContext::new(records)),
            lifecycle: Mutex::new(Lifecycle::Created),
        })
    }

    /// Bind the listener and spawn the accept and feed loops.
    ///
    /// Returns the bound address (useful with port 0).
    pub async fn start(&self) -> Result<SocketAddr> {
        let mut lifecycle = self.lifecycle.lock().await;
        if !matches!(*lifecycle, Lifecycle::Created) {
            return Err(BroadcasterError::AlreadyRunning);
        }

        let addr = format!("{}:{}", self.config.bind_address, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| BroadcasterError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        info!("WITS Level 0 server listening on {}", local_addr);

        self.ctx.running.send_replace(true);

        let accept = tokio::spawn(accept_loop(Arc::clone(&self.ctx), listener));
        let feed = tokio::spawn(feed_loop(Arc::clone(&self.ctx), self.config.clone()));
        *lifecycle = Lifecycle::Running(vec![accept, feed]);

        Ok(local_addr)
    }

    /// Signal shutdown, wait for the loops, and close every connection.
    pub async fn stop(&self) -> Result<()> {
        let tasks = {
            let mut lifecycle = self.lifecycle.lock().await;
            match std::mem::replace(&mut *lifecycle, Lifecycle::Stopped) {
                Lifecycle::Running(tasks) => tasks,
                other => {
                    *lifecycle = other;
                    return Err(BroadcasterError::NotStarted);
                }
            }
        };

        self.ctx.running.send_replace(false);

        for mut task in tasks {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await.is_err() {
                warn!("Server task did not stop in time, aborting");
                task.abort();
            }
        }

        self.ctx.clients.close_all().await;

        let frames_sent = self.ctx.stats.read().await.frames_sent;
        info!("Replay server stopped ({} frames sent)", frames_sent);
        Ok(())
    }

    /// Run until `stop` resolves, then shut down.
    ///
    /// `stop` is whatever the host uses to request termination (signals,
    /// a channel, a timer).
    pub async fn serve<F>(&self, stop: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.start().await?;
        stop.await;
        info!("Shutting down...");
        self.stop().await
    }

    pub fn is_running(&self) -> bool {
        self.ctx.is_running()
    }

    pub fn record_count(&self) -> usize {
        self.ctx.records.len()
    }

    pub async fn client_count(&self) -> usize {
        self.ctx.clients.len().await
    }

    pub async fn stats(&self) -> ReplayStats {
        let mut stats = self.ctx.stats.read().await.clone();
        stats.clients = self.ctx.clients.len().await;
        stats
    }
}

impl Drop for ReplayServer {
    fn drop(&mut self) {
        // Let detached tasks wind down if stop() was never called
        self.ctx.running.send_replace(false);
    }
}

async fn accept_loop(ctx: Arc<ServerContext>, listener: TcpListener) {
    let mut running = ctx.subscribe();

    loop {
        tokio::select! {
            result = listener.accept() => match result {
                Ok((stream, addr)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!("Failed to set TCP_NODELAY for {}: {}", addr, e);
                    }
                    ctx.clients.register(stream, addr, ctx.subscribe()).await;
                }
                Err(e) => {
                    error!("Failed to accept client: {}", e);
                    if !ctx.pause(ACCEPT_RETRY_DELAY).await {
                        break;
                    }
                }
            },
            _ = stopped(&mut running) => break,
        }
    }

    info!("Client acceptance task stopped");
}

async fn feed_loop(ctx: Arc<ServerContext>, config: ServerConfig) {
    let interval = config.frame_interval();
    let mut playback = Playback::new(ctx.records.len(), config.loop_replay);

    if !ctx.wait_for_client(config.idle_poll).await {
        return;
    }

    ctx.stats.write().await.streaming_since = Some(Utc::now());
    info!(
        ">>> Streaming {} records (interval={:.3}s)",
        ctx.records.len(),
        interval.as_secs_f64()
    );

    while let Some(index) = playback.current() {
        if !ctx.is_running() {
            return;
        }

        // Emptiness is decided under the same lock as the send, so a record
        // is never counted or passed while nobody is connected
        let record = &ctx.records[index];
        let Some(outcome) = ctx.clients.broadcast(&encode_frame(record)).await else {
            info!("No clients connected, pausing at record {}", index);
            if !ctx.wait_for_client(config.idle_poll).await {
                return;
            }
            info!("Client connected, resuming at record {}", index);
            continue;
        };
        let advance = playback.advance();

        let frames_sent = {
            let mut stats = ctx.stats.write().await;
            stats.frames_sent += 1;
            stats.deliveries += outcome.delivered as u64;
            stats.write_failures += outcome.dropped as u64;
            stats.cursor = playback.cursor();
            stats.pass = playback.pass();
            stats.finished = playback.is_finished();
            stats.frames_sent
        };

        if config.progress_interval > 0 && frames_sent % config.progress_interval == 0 {
            info!(
                "[{:>8}] depth={:>6.0}ft  ROP={:.1}  WOB={:.1}  RPM={:.0}  clients={}",
                frames_sent,
                record.bit_depth,
                record.rop,
                record.wob,
                record.rpm,
                outcome.delivered
            );
        }

        match advance {
            Advance::Next => {}
            Advance::Wrapped(pass) => info!(">>> Loop pass #{}", pass),
            Advance::Finished => break,
        }

        if !ctx.pause(interval).await {
            return;
        }
    }

    let frames_sent = ctx.stats.read().await.frames_sent;
    info!(">>> Replay complete. {} records sent.", frames_sent);
    info!(">>> Server stays open; no further frames will be sent.");

    ctx.wait_for_shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<CanonicalRecord> {
        (0..n)
            .map(|i| CanonicalRecord {
                bit_depth: 1000.0 + i as f64,
                ..Default::default()
            })
            .collect()
    }

    fn local_config() -> ServerConfig {
        ServerConfig::default().bind("127.0.0.1").port(0).speed(50.0)
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let result = ReplayServer::new(Vec::<CanonicalRecord>::new(), local_config());
        assert!(matches!(result, Err(BroadcasterError::EmptySequence)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = ReplayServer::new(records(3), local_config().speed(0.0));
        assert!(matches!(result, Err(BroadcasterError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_lifecycle_errors() {
        let server = ReplayServer::new(records(3), local_config()).unwrap();
        assert!(!server.is_running());
        assert!(matches!(server.stop().await, Err(BroadcasterError::NotStarted)));

        server.start().await.unwrap();
        assert!(server.is_running());
        assert!(matches!(server.start().await, Err(BroadcasterError::AlreadyRunning)));

        server.stop().await.unwrap();
        assert!(!server.is_running());
        assert!(matches!(server.stop().await, Err(BroadcasterError::NotStarted)));
    }

    #[tokio::test]
    async fn test_initial_stats() {
        let server = ReplayServer::new(records(4), local_config()).unwrap();
        let stats = server.stats().await;
        assert_eq!(stats.frames_sent, 0);
        assert_eq!(stats.cursor, 0);
        assert_eq!(stats.pass, 1);
        assert_eq!(stats.deliveries, 0);
        assert_eq!(stats.write_failures, 0);
        assert!(!stats.finished);
        assert!(stats.streaming_since.is_none());
        assert_eq!(server.record_count(), 4);
    }

    #[tokio::test]
    async fn test_serve_returns_when_stop_resolves() {
        let server = ReplayServer::new(records(3), local_config()).unwrap();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            server.serve(tokio::time::sleep(Duration::from_millis(50))),
        )
        .await
        .expect("serve should return after stop input");

        assert!(result.is_ok());
        assert!(!server.is_running());
    }

    #[tokio::test]
    async fn test_bind_conflict_is_error() {
        let holder = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = holder.local_addr().unwrap().port();

        let server = ReplayServer::new(records(3), local_config().port(port)).unwrap();
        assert!(matches!(server.start().await, Err(BroadcasterError::Bind { .. })));
    }
}
