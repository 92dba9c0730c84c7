//! Live capture sessions.
//!
//! A session loads the model off the async runtime, opens the frame source
//! and classifies a frame on every tick until stopped. Model and source calls
//! all run on the blocking pool. The latest predictions are published on a
//! watch channel so any number of views can follow along.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use super::{Classifier, FrameSource, ModelLoader, Prediction, PredictionRow, ResizeStrategy};
use super::{format_predictions, prepare_frame};
use crate::error::{LottoError, Result};

/// Lifecycle of a capture session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Running,
    Stopped,
    Failed(String),
}

impl SessionStatus {
    /// User-facing status line.
    pub fn message(&self) -> String {
        match self {
            Self::Idle => "Press start to turn on the camera".to_string(),
            Self::Loading => "Loading model...".to_string(),
            Self::Running => "Camera running".to_string(),
            Self::Stopped => "Camera stopped".to_string(),
            Self::Failed(reason) => format!("Error: {reason}"),
        }
    }

    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Continuous classification of frames from a source.
pub struct CaptureSession {
    status: Arc<watch::Sender<SessionStatus>>,
    results: Arc<watch::Sender<Vec<Prediction>>>,
    stop: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
    interval: Duration,
    strategy: ResizeStrategy,
}

/// Shortest tick a session runs at; tokio intervals reject a zero period.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

impl CaptureSession {
    /// Idle session that classifies one frame per `interval` once started.
    ///
    /// Intervals below [`MIN_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        let (status, _) = watch::channel(SessionStatus::Idle);
        let (results, _) = watch::channel(Vec::new());
        Self {
            status: Arc::new(status),
            results: Arc::new(results),
            stop: None,
            task: None,
            interval: interval.max(MIN_INTERVAL),
            strategy: ResizeStrategy::default(),
        }
    }

    #[must_use]
    pub const fn with_strategy(mut self, strategy: ResizeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    pub fn subscribe_results(&self) -> watch::Receiver<Vec<Prediction>> {
        self.results.subscribe()
    }

    /// Latest predictions formatted for display.
    pub fn latest(&self) -> Vec<PredictionRow> {
        format_predictions(&self.results.borrow())
    }

    fn fail(&self, err: LottoError) -> LottoError {
        error!(error = %err, "Capture session failed");
        self.status.send_replace(SessionStatus::Failed(err.to_string()));
        err
    }

    /// Load the model, open the source and start classifying.
    #[instrument(skip_all)]
    pub async fn start<L, S>(&mut self, loader: L, source: S) -> Result<()>
    where
        L: ModelLoader,
        S: FrameSource,
    {
        if self.task.is_some() {
            return Err(LottoError::Other("capture session already running".to_string()));
        }

        self.status.send_replace(SessionStatus::Loading);
        let model = match tokio::task::spawn_blocking(move || loader.load()).await {
            Ok(Ok(model)) => model,
            Ok(Err(e)) => return Err(self.fail(e)),
            Err(e) => return Err(self.fail(LottoError::ModelLoad(e.to_string()))),
        };
        debug!(input = ?model.input_size(), "Model loaded");

        let opened = tokio::task::spawn_blocking(move || {
            let mut source = source;
            source.open().map(|()| source)
        })
        .await;
        let source = match opened {
            Ok(Ok(source)) => source,
            Ok(Err(e)) => return Err(self.fail(e)),
            Err(e) => return Err(self.fail(LottoError::CameraUnavailable(e.to_string()))),
        };

        let (stop_tx, stop_rx) = watch::channel(false);
        let frame_loop = FrameLoop {
            model: Arc::new(model),
            source: Some(source),
            interval: self.interval,
            strategy: self.strategy,
            results: Arc::clone(&self.results),
            status: Arc::clone(&self.status),
        };
        self.status.send_replace(SessionStatus::Running);
        self.task = Some(tokio::spawn(frame_loop.run(stop_rx)));
        self.stop = Some(stop_tx);
        info!(interval_ms = self.interval.as_millis(), "Capture session started");
        Ok(())
    }

    /// Stop classifying and release the source.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(stop) = self.stop.take() {
            stop.send_replace(true);
        }
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| LottoError::Other(format!("capture task panicked: {e}")))?;
        }
        Ok(())
    }
}

struct FrameLoop<M, S> {
    model: Arc<M>,
    source: Option<S>,
    interval: Duration,
    strategy: ResizeStrategy,
    results: Arc<watch::Sender<Vec<Prediction>>>,
    status: Arc<watch::Sender<SessionStatus>>,
}

impl<M: Classifier, S: FrameSource> FrameLoop<M, S> {
    async fn run(mut self, mut stop: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = stop.changed() => break,
                _ = ticker.tick() => {
                    if !self.tick().await {
                        return;
                    }
                }
            }
        }
        if let Some(mut source) = self.source.take() {
            source.release();
        }
        self.status.send_replace(SessionStatus::Stopped);
        info!("Capture session stopped");
    }

    /// Classify one frame on the blocking pool. Returns false once the source is lost.
    async fn tick(&mut self) -> bool {
        let Some(mut source) = self.source.take() else {
            return false;
        };
        let model = Arc::clone(&self.model);
        let strategy = self.strategy;
        let frame = tokio::task::spawn_blocking(move || {
            let result = classify_frame(&*model, &mut source, strategy);
            (source, result)
        })
        .await;

        match frame {
            Ok((source, result)) => {
                self.source = Some(source);
                match result {
                    Ok(predictions) => {
                        self.results.send_replace(predictions);
                    }
                    Err(e) => warn!(error = %e, "Skipping frame"),
                }
                true
            }
            Err(e) => {
                error!(error = %e, "Frame task aborted");
                self.status
                    .send_replace(SessionStatus::Failed(format!("frame task aborted: {e}")));
                false
            }
        }
    }
}

fn classify_frame<C, S>(
    model: &C,
    source: &mut S,
    strategy: ResizeStrategy,
) -> Result<Vec<Prediction>>
where
    C: Classifier,
    S: FrameSource,
{
    let image = source.next_frame()?;
    let (width, height) = model.input_size();
    model.predict(&prepare_frame(&image, width, height, strategy))
}

/// Classify a single frame from `source`.
pub fn classify_once<C, S>(model: &C, source: &mut S) -> Result<Vec<PredictionRow>>
where
    C: Classifier,
    S: FrameSource,
{
    source.open()?;
    let result = classify_frame(model, source, ResizeStrategy::default());
    source.release();
    Ok(format_predictions(&result?))
}
