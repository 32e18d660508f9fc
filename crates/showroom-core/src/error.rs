use thiserror::Error;

/// Failures surfaced by the viewer's asynchronous boundaries. Both leave the
/// page usable: a failed load keeps the controller preloading, a failed
/// session negotiation means the reticle never appears.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to load model asset: {0}")]
    AssetLoad(String),

    #[error("AR session negotiation failed: {0}")]
    SessionNegotiation(String),
}
