//! Inference backends.
//!
//! The detector only needs a forward pass: given a normalized NCHW blob, return
//! one row matrix per output layer, each row laid out as
//! `[cx, cy, w, h, objectness, class scores...]` with box values normalized
//! to [0, 1].
//!
//! `OrtBackend` runs an ONNX model through ONNX Runtime with automatic
//! execution provider selection:
//! - CUDA on Linux with NVIDIA GPU (when `cuda` feature enabled)
//! - CoreML on macOS
//! - CPU fallback on all platforms

use std::path::Path;
use std::sync::Mutex;

use ndarray::{Array2, Array4};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};
use tracing::{debug, info};

use crate::error::{VisionError, VisionResult};

/// Number of leading box columns (cx, cy, w, h, objectness) in an output row.
pub const BOX_COLUMNS: usize = 5;

/// A forward pass over a preprocessed blob.
///
/// Implementations must be callable from several request tasks at once. A
/// backend whose native handle is not thread-safe serializes access itself.
pub trait InferenceBackend: Send + Sync {
    /// Run the network on a `[1, 3, S, S]` blob.
    fn forward(&self, blob: Array4<f32>) -> VisionResult<Vec<Array2<f32>>>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

/// ONNX Runtime backend.
///
/// The session is guarded by a mutex: ONNX Runtime sessions need `&mut` to
/// run, so concurrent requests queue on this lock for the forward pass only.
pub struct OrtBackend {
    session: Mutex<Session>,
    output_names: Vec<String>,
}

impl OrtBackend {
    /// Load an ONNX model.
    ///
    /// Returns error if model file doesn't exist or cannot be loaded.
    pub fn new(model_path: impl AsRef<Path>) -> VisionResult<Self> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(VisionError::model_not_found(model_path.display().to_string()));
        }

        let session = create_session(model_path)?;
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        if output_names.is_empty() {
            return Err(VisionError::model_mismatch("model has no outputs"));
        }

        info!(
            model_path = %model_path.display(),
            outputs = ?output_names,
            "ONNX detection model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            output_names,
        })
    }
}

impl InferenceBackend for OrtBackend {
    fn forward(&self, blob: Array4<f32>) -> VisionResult<Vec<Array2<f32>>> {
        let shape = blob.shape().to_vec();
        let data: Vec<f32> = blob.iter().copied().collect();

        let input: Value = Tensor::from_array((shape, data.into_boxed_slice()))
            .map(Value::from)
            .map_err(|e| VisionError::inference(format!("Failed to create tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| VisionError::inference("Session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| VisionError::inference(format!("ONNX inference failed: {}", e)))?;

        let mut layers = Vec::with_capacity(self.output_names.len());
        for name in &self.output_names {
            let output = outputs
                .get(name.as_str())
                .ok_or_else(|| VisionError::inference(format!("Missing {} tensor", name)))?;

            let (shape, data) = output
                .try_extract_tensor::<f32>()
                .map_err(|e| VisionError::inference(format!("Failed to extract tensor: {}", e)))?;

            let dims: Vec<i64> = shape.iter().copied().collect();
            layers.push(rows_from_tensor(&dims, data)?);
        }

        Ok(layers)
    }

    fn name(&self) -> &'static str {
        "onnxruntime"
    }
}

/// Flatten an output tensor of shape `[..., rows, cols]` into a row matrix.
pub fn rows_from_tensor(dims: &[i64], data: &[f32]) -> VisionResult<Array2<f32>> {
    let cols = match dims.last() {
        Some(&c) if c > BOX_COLUMNS as i64 => c as usize,
        _ => {
            return Err(VisionError::model_mismatch(format!(
                "Unexpected output shape: {:?}",
                dims
            )))
        }
    };

    if data.len() % cols != 0 {
        return Err(VisionError::model_mismatch(format!(
            "Output of {} values does not divide into rows of {}",
            data.len(),
            cols
        )));
    }

    let rows = data.len() / cols;
    Array2::from_shape_vec((rows, cols), data.to_vec())
        .map_err(|e| VisionError::model_mismatch(format!("Failed to reshape output: {}", e)))
}

/// Create ONNX Runtime session with automatic execution provider selection.
fn create_session(model_path: &Path) -> VisionResult<Session> {
    let model_bytes = std::fs::read(model_path)?;

    let builder = Session::builder()
        .map_err(|e| VisionError::inference(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| VisionError::inference(format!("Failed to set optimization level: {}", e)))?;

    #[cfg(all(target_os = "linux", feature = "cuda"))]
    {
        use ort::execution_providers::CUDAExecutionProvider;
        if let Ok(cuda_builder) = builder
            .clone()
            .with_execution_providers([CUDAExecutionProvider::default().build()])
        {
            if let Ok(session) = cuda_builder.commit_from_memory(&model_bytes) {
                info!("Using CUDA execution provider for object detection");
                return Ok(session);
            }
        }
        debug!("CUDA execution provider not available, trying alternatives");
    }

    #[cfg(target_os = "macos")]
    {
        use ort::execution_providers::CoreMLExecutionProvider;
        if let Ok(coreml_builder) = builder
            .clone()
            .with_execution_providers([CoreMLExecutionProvider::default().build()])
        {
            if let Ok(session) = coreml_builder.commit_from_memory(&model_bytes) {
                info!("Using CoreML execution provider for object detection");
                return Ok(session);
            }
        }
        debug!("CoreML execution provider not available, using CPU");
    }

    debug!("Using CPU execution provider for object detection");
    builder
        .commit_from_memory(&model_bytes)
        .map_err(|e| VisionError::inference(format!("Failed to load ONNX model: {}", e)))
}
