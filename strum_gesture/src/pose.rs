//! Per-frame pose data as delivered by the pose estimator.
//!
//! Nothing here is owned across frames: a [`Pose`] is built, read by the
//! fretboard projector and strum detector, then dropped.

use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// BodyPart
// ════════════════════════════════════════════════════════════════════════════

/// The 17 keypoints reported by a PoseNet-style estimator.
///
/// Wire names are camelCase (`"leftShoulder"`), which is also how they are
/// written in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyPart {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    pub const ALL: [BodyPart; 17] = [
        BodyPart::Nose,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];

    /// Wire name, e.g. `"rightWrist"`.
    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Nose          => "nose",
            BodyPart::LeftEye       => "leftEye",
            BodyPart::RightEye      => "rightEye",
            BodyPart::LeftEar       => "leftEar",
            BodyPart::RightEar      => "rightEar",
            BodyPart::LeftShoulder  => "leftShoulder",
            BodyPart::RightShoulder => "rightShoulder",
            BodyPart::LeftElbow     => "leftElbow",
            BodyPart::RightElbow    => "rightElbow",
            BodyPart::LeftWrist     => "leftWrist",
            BodyPart::RightWrist    => "rightWrist",
            BodyPart::LeftHip       => "leftHip",
            BodyPart::RightHip      => "rightHip",
            BodyPart::LeftKnee      => "leftKnee",
            BodyPart::RightKnee     => "rightKnee",
            BodyPart::LeftAnkle     => "leftAnkle",
            BodyPart::RightAnkle    => "rightAnkle",
        }
    }
}

impl FromStr for BodyPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyPart::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown body part {:?}", s))
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Point
// ════════════════════════════════════════════════════════════════════════════

/// A position in frame pixels; y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Point { x, y } }

    pub fn length(self) -> f64 { self.x.hypot(self.y) }

    pub fn distance_to(self, other: Point) -> f64 { (self - other).length() }

    pub fn dot(self, other: Point) -> f64 { self.x * other.x + self.y * other.y }

    /// z-component of the 2-D cross product.
    pub fn cross(self, other: Point) -> f64 { self.x * other.y - self.y * other.x }

    pub fn is_finite(self) -> bool { self.x.is_finite() && self.y.is_finite() }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point { Point::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point { Point::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, k: f64) -> Point { Point::new(self.x * k, self.y * k) }
}

// ════════════════════════════════════════════════════════════════════════════
// Keypoint / Pose
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    pub part:       BodyPart,
    pub position:   Point,
    /// Estimator confidence, 0.0–1.0.
    pub confidence: f64,
}

impl Keypoint {
    pub fn new(part: BodyPart, x: f64, y: f64, confidence: f64) -> Self {
        Keypoint { part, position: Point::new(x, y), confidence }
    }
}

/// One frame's worth of keypoints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pose {
    pub overall_score: f64,
    pub keypoints:     Vec<Keypoint>,
}

impl Pose {
    pub fn new(overall_score: f64, keypoints: Vec<Keypoint>) -> Self {
        Pose { overall_score, keypoints }
    }

    /// First keypoint reported for `part`.
    pub fn keypoint(&self, part: BodyPart) -> Option<&Keypoint> {
        self.keypoints.iter().find(|k| k.part == part)
    }

    /// Position of `part` if it was reported with at least `min_confidence`
    /// and finite coordinates.
    pub fn confident(&self, part: BodyPart, min_confidence: f64) -> Option<Point> {
        self.keypoint(part)
            .filter(|k| k.confidence >= min_confidence && k.position.is_finite())
            .map(|k| k.position)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
