use super::model_size::ModelSize;

/// Decides whether a missing model may be downloaded.
///
/// The desktop app implements this as a cross-thread rendezvous: the worker
/// blocks here until the UI thread has shown a confirmation dialog and sent
/// back exactly one answer.
pub trait DownloadPolicy {
    fn confirm_download(&self, model: ModelSize) -> bool;
}

/// Policy that accepts every download without asking.
pub struct AlwaysDownload;

impl DownloadPolicy for AlwaysDownload {
    fn confirm_download(&self, _model: ModelSize) -> bool {
        true
    }
}
