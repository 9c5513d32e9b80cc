//! Application state.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::info;

use odr_report::ReportBuilder;
use odr_storage::ScratchStore;
use odr_vision::ObjectDetector;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub detector: Arc<ObjectDetector>,
    pub scratch: ScratchStore,
    pub reports: ReportBuilder,
    /// Bounds the number of detections running on the blocking pool
    pub inference_permits: Arc<Semaphore>,
}

impl AppState {
    /// Load the detector and prepare the scratch root.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let detector_config = config.detector_config();
        info!(
            model = %detector_config.model_path.display(),
            labels = %detector_config.labels_path.display(),
            "Loading object detector"
        );

        let detector =
            tokio::task::spawn_blocking(move || ObjectDetector::from_config(detector_config))
                .await??;

        let state = Self::with_detector(config, detector);
        state.scratch.ensure_root().await?;
        Ok(state)
    }

    /// Build state around an already loaded detector.
    pub fn with_detector(config: ApiConfig, detector: ObjectDetector) -> Self {
        let permits = config.max_concurrent_inference.max(1);
        Self {
            scratch: ScratchStore::new(config.scratch_dir.clone()),
            detector: Arc::new(detector),
            reports: ReportBuilder::default(),
            inference_permits: Arc::new(Semaphore::new(permits)),
            config,
        }
    }
}
