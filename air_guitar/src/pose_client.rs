//! Client for the pose-estimation service.
//!
//! Wire format:
//!
//! | Direction | Body |
//! |---|---|
//! | request  | `{"url": "data:image/png;base64,…"}` |
//! | response | `{"score": f, "keypoints": [{"part": s, "position": {"x": f, "y": f}, "score": f}]}` |
//!
//! Keypoints naming a body part we do not know are dropped.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use strum_gesture::{BodyPart, Keypoint, Point, Pose};
use tracing::debug;

use crate::error::SourceError;
use crate::frames::FrameSource;
use crate::source::PoseSource;

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Serialize)]
struct PoseRequest<'a> {
    url: &'a str,
}

/// One pose as the service reports it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseResponse {
    #[serde(default)]
    pub score:     f64,
    #[serde(default)]
    pub keypoints: Vec<KeypointDto>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeypointDto {
    pub part:     String,
    pub position: Point,
    #[serde(default)]
    pub score:    f64,
}

impl PoseResponse {
    pub fn into_pose(self) -> Pose {
        let keypoints = self
            .keypoints
            .into_iter()
            .filter_map(|k| {
                let part = k.part.parse::<BodyPart>().ok()?;
                Some(Keypoint { part, position: k.position, confidence: k.score })
            })
            .collect();
        Pose::new(self.score, keypoints)
    }
}

impl From<&Pose> for PoseResponse {
    fn from(pose: &Pose) -> Self {
        PoseResponse {
            score:     pose.overall_score,
            keypoints: pose
                .keypoints
                .iter()
                .map(|k| KeypointDto {
                    part:     k.part.name().to_string(),
                    position: k.position,
                    score:    k.confidence,
                })
                .collect(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PoseClient
// ════════════════════════════════════════════════════════════════════════════

/// Blocking HTTP client for one pose-service endpoint.
pub struct PoseClient {
    http: reqwest::blocking::Client,
    url:  String,
}

impl PoseClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(PoseClient { http, url: url.into() })
    }

    pub fn url(&self) -> &str { &self.url }

    /// Estimate the pose in an image given as a data URL.
    pub fn estimate(&self, data_url: &str) -> Result<Pose, SourceError> {
        let resp = self
            .http
            .post(&self.url)
            .json(&PoseRequest { url: data_url })
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        let parsed: PoseResponse = serde_json::from_str(&body)?;
        Ok(parsed.into_pose())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HttpPoseSource
// ════════════════════════════════════════════════════════════════════════════

/// Sends each frame from `F` to the pose service.
pub struct HttpPoseSource<F: FrameSource> {
    client:       PoseClient,
    frames:       F,
    last_request: Option<Duration>,
}

impl<F: FrameSource> HttpPoseSource<F> {
    pub fn new(client: PoseClient, frames: F) -> Self {
        HttpPoseSource { client, frames, last_request: None }
    }
}

impl<F: FrameSource> PoseSource for HttpPoseSource<F> {
    fn next_pose(&mut self) -> Result<Option<Pose>, SourceError> {
        let Some(frame) = self.frames.next_frame()? else {
            return Ok(None);
        };
        let started = Instant::now();
        let result = self.client.estimate(&frame.data_url());
        let took = started.elapsed();
        self.last_request = Some(took);
        debug!(frame = %frame.name, ms = took.as_millis() as u64, "pose request");
        result.map(Some)
    }

    fn last_request(&self) -> Option<Duration> { self.last_request }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
