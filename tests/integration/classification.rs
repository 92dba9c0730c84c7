//! Classification adapter wired to real image files.

use std::time::Duration;

use lotto::classify::{
    CaptureSession, Classifier, Frame, FrameSource, ModelLoader, Prediction, SessionStatus,
    StillImage, classify_once,
};
use lotto::error::{LottoError, Result};

use crate::common::fixtures::{Workspace, solid_image};

/// Scores "cat" by redness and "dog" by blueness of the centre pixel.
struct ColourModel;

impl Classifier for ColourModel {
    fn input_size(&self) -> (u32, u32) {
        (8, 8)
    }

    fn predict(&self, frame: &Frame) -> Result<Vec<Prediction>> {
        assert_eq!(frame.dimensions(), (8, 8));
        let px = frame.image().get_pixel(4, 4);
        let total = f32::from(px[0]) + f32::from(px[2]) + 1.0;
        Ok(vec![
            Prediction::new("dog", f32::from(px[2]) / total),
            Prediction::new("cat", f32::from(px[0]) / total),
        ])
    }
}

struct ColourLoader;

impl ModelLoader for ColourLoader {
    type Model = ColourModel;

    fn load(&self) -> Result<ColourModel> {
        Ok(ColourModel)
    }
}

#[test]
fn test_uploaded_picture_is_classified() {
    let ws = Workspace::new();
    let path = ws.solid_png("cat.png", 32, 20, [250, 10, 0]);

    let rows = classify_once(&ColourModel, &mut StillImage::new(path)).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].label, "cat");
    assert_eq!(rows[0].emoji, "🐱");
    assert!(rows[0].percent >= 95);
    assert!(rows[0].line().contains("cat"));
    assert_eq!(rows[1].emoji, "🐶");
}

#[test]
fn test_missing_picture_reports_not_found() {
    let ws = Workspace::new();
    let mut source = StillImage::new(ws.path().join("absent.png"));

    let err = classify_once(&ColourModel, &mut source).unwrap_err();
    assert!(matches!(err, LottoError::ImageNotFound { .. }));
}

#[test]
fn test_unopened_source_has_no_frame() {
    let ws = Workspace::new();
    let mut source = StillImage::new(ws.path().join("never-opened.png"));
    assert!(matches!(
        source.next_frame(),
        Err(LottoError::Classification(_))
    ));
}

#[tokio::test]
async fn test_session_over_still_image() {
    let source = StillImage::from_image(solid_image(16, 16, [0, 0, 255]));
    let mut session = CaptureSession::new(Duration::from_millis(5));
    let mut results = session.subscribe_results();

    session.start(ColourLoader, source).await.unwrap();
    assert_eq!(session.status(), SessionStatus::Running);

    tokio::time::timeout(Duration::from_secs(5), results.changed())
        .await
        .expect("no predictions published")
        .unwrap();
    let latest = session.latest();
    assert_eq!(latest[0].label, "dog");

    session.stop().await.unwrap();
    assert_eq!(session.status(), SessionStatus::Stopped);
    assert_eq!(session.status().message(), "Camera stopped");
}
