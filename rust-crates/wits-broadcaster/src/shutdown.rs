use tokio::sync::watch;

/// Resolve once the running flag is false or its sender is gone.
///
/// The `watch::Ref` from `wait_for` is released before this returns, so the
/// future stays `Send` when used as a `select!` branch in a spawned task.
pub(crate) async fn stopped(running: &mut watch::Receiver<bool>) {
    let _ = running.wait_for(|r| !*r).await;
}
