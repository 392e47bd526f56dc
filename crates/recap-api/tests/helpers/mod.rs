//! Test helpers: build AppState and router with a fake restoration client.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use recap_api::setup::routes;
use recap_api::state::AppState;
use recap_core::Config;
use recap_plugins::{RestorationClient, RestorationError, RestorationOutput, RestorationParams};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const RESULT_URL: &str = "https://replicate.delivery/pbxt/test/restored.png";

/// What the fake client answers with
#[derive(Clone, Copy, Debug)]
pub enum FakeOutcome {
    Success,
    EmptyOutput,
    Failed,
}

/// Restoration client that records calls instead of talking to Replicate
pub struct FakeRestoration {
    outcome: FakeOutcome,
    calls: AtomicUsize,
    last_image: Mutex<Option<Bytes>>,
}

impl FakeRestoration {
    pub fn new(outcome: FakeOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_image: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_image(&self) -> Option<Bytes> {
        self.last_image.lock().unwrap().clone()
    }
}

#[async_trait]
impl RestorationClient for FakeRestoration {
    async fn restore(
        &self,
        image: Bytes,
        _params: &RestorationParams,
    ) -> Result<RestorationOutput, RestorationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_image.lock().unwrap() = Some(image);

        match self.outcome {
            FakeOutcome::Success => Ok(RestorationOutput {
                result_url: RESULT_URL.to_string(),
                prediction_id: Some("pred-test".to_string()),
                predict_time: Some(1.5),
            }),
            FakeOutcome::EmptyOutput => Err(RestorationError::EmptyOutput),
            FakeOutcome::Failed => Err(RestorationError::PredictionFailed(
                "NSFW content detected".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub fn config_with_token() -> Config {
    let mut config = Config::default();
    config.replicate.api_token = Some("r8_test_token".to_string());
    config
}

/// Server without any restoration client (token missing)
pub fn server_without_token() -> TestServer {
    build_server(Config::default(), None)
}

/// Server backed by `fake`
pub fn server_with(fake: &Arc<FakeRestoration>) -> TestServer {
    build_server(
        config_with_token(),
        Some(fake.clone() as Arc<dyn RestorationClient>),
    )
}

pub fn build_server(config: Config, restoration: Option<Arc<dyn RestorationClient>>) -> TestServer {
    let state = Arc::new(AppState::new(config.clone(), restoration));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    TestServer::new(app).expect("Failed to create test server")
}

/// PNG photo with a non-uniform pattern
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("Failed to encode PNG");
    buffer
}

pub fn photo_form(data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(Bytes::from(data))
        .file_name(file_name)
        .mime_type(mime_type);
    MultipartForm::new().add_part("file", part)
}
