//! Virtual fretboard projection.
//!
//! The fretboard is a straight baseline anchored at the right shoulder and
//! laid along the shoulder line toward the left-shoulder side.  It is split
//! into N equal zones, one per chord; zone 0 starts at the far end of the
//! baseline (the "nut"), so chord-file order reads from the neck inward.
//!
//! ```text
//!   far end                                   anchor (right shoulder)
//!     │ zone 0  │ zone 1  │  …  │ zone N-1 │
//!     ●─────────┼─────────┼─────┼──────────●   ← baseline
//!     │         │         │     │          │
//!     └─────────┴─────────┴─────┴──────────┘   ← lower edge (fret_line_length below)
//! ```
//!
//! The fretting hand is located by its perpendicular distance `d` to the
//! baseline and its distance `b` to the far end; `sqrt(b² − d²)` is how far
//! along the baseline it sits, negative once the hand is past the far end.
//! A hand exactly on the baseline gives no reading.

use serde::{Deserialize, Serialize};

use crate::error::PoseIncomplete;
use crate::pose::{BodyPart, Point, Pose};

/// Shoulder x separation below which the shoulder slope is treated as undefined.
const MIN_SHOULDER_DX: f64 = 1e-6;

// ════════════════════════════════════════════════════════════════════════════
// FretboardConfig
// ════════════════════════════════════════════════════════════════════════════

/// Tunables for the fretboard overlay.  Lengths are in frame pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FretboardConfig {
    /// Length of the baseline.
    pub fretboard_length:   f64,
    /// Length of each fret (zone boundary) segment, drawn below the baseline.
    pub fret_line_length:   f64,
    /// Hand whose position selects the chord.
    pub fretting_hand:      BodyPart,
    /// Minimum overall pose score for a frame to be used.
    pub min_pose_score:     f64,
    /// Minimum per-keypoint confidence.
    pub min_keypoint_score: f64,
}

impl Default for FretboardConfig {
    fn default() -> Self {
        FretboardConfig {
            fretboard_length:   300.0,
            fret_line_length:   50.0,
            fretting_hand:      BodyPart::RightWrist,
            min_pose_score:     0.3,
            min_keypoint_score: 0.5,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Geometry
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end:   Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self { Segment { start, end } }
}

/// Everything needed to draw the fretboard for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FretboardGeometry {
    /// Anchor (right shoulder) → far end.
    pub baseline:      Segment,
    /// Shoulder-line orientation, radians.
    pub theta:         f64,
    /// Unit vector from anchor toward the far end.
    pub direction:     Point,
    /// Unit normal pointing down-frame.
    pub normal:        Point,
    /// The baseline shifted `fret_line_length` along the normal.
    pub lower_edge:    Segment,
    /// N + 1 zone boundaries, from the far end to the anchor.
    pub frets:         Vec<Segment>,
    /// Where to print each zone's chord name, one per zone.
    pub label_anchors: Vec<Point>,
    pub zones:         usize,
    pub length:        f64,
}

impl FretboardGeometry {
    /// Length of one zone along the baseline.
    pub fn zone_length(&self) -> f64 { self.length / self.zones as f64 }
}

/// Result of projecting one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FretboardReading {
    /// Zone the fretting hand falls in, always `< geometry.zones`.
    pub zone:          usize,
    pub geometry:      FretboardGeometry,
    pub hand:          Point,
    /// Signed distance of the hand along the baseline from the far end;
    /// negative past the far end.
    pub along:         f64,
    /// Perpendicular distance of the hand from the baseline.
    pub perpendicular: f64,
}

// ════════════════════════════════════════════════════════════════════════════
// FretboardProjector
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct FretboardProjector {
    config: FretboardConfig,
}

impl FretboardProjector {
    pub fn new(config: FretboardConfig) -> Self { FretboardProjector { config } }

    pub fn config(&self) -> &FretboardConfig { &self.config }

    /// Project the fretboard onto `pose` and find the fretting hand's zone.
    ///
    /// Any missing keypoint or degenerate configuration is reported as
    /// [`PoseIncomplete`]; this never panics on noisy input.
    pub fn project(&self, pose: &Pose, zones: usize) -> Result<FretboardReading, PoseIncomplete> {
        if zones == 0 {
            return Err(PoseIncomplete::NoZones);
        }
        if !(pose.overall_score >= self.config.min_pose_score) {
            return Err(PoseIncomplete::LowPoseScore {
                score: pose.overall_score,
                min:   self.config.min_pose_score,
            });
        }

        let min = self.config.min_keypoint_score;
        let required = |part: BodyPart| {
            pose.confident(part, min).ok_or(PoseIncomplete::MissingKeypoint(part))
        };
        let left_shoulder  = required(BodyPart::LeftShoulder)?;
        let right_shoulder = required(BodyPart::RightShoulder)?;
        let hand           = required(self.config.fretting_hand)?;

        let geometry = self.geometry(left_shoulder, right_shoulder, zones)?;
        let (zone, along, perpendicular) = locate(&geometry, hand)?;

        Ok(FretboardReading { zone, geometry, hand, along, perpendicular })
    }

    /// Build the overlay for the given shoulders.
    pub fn geometry(
        &self,
        left_shoulder:  Point,
        right_shoulder: Point,
        zones:          usize,
    ) -> Result<FretboardGeometry, PoseIncomplete> {
        if zones == 0 {
            return Err(PoseIncomplete::NoZones);
        }

        let dx = right_shoulder.x - left_shoulder.x;
        if !(dx.abs() >= MIN_SHOULDER_DX) {
            return Err(PoseIncomplete::DegenerateShoulders);
        }
        let slope = (right_shoulder.y - left_shoulder.y) / dx;
        let theta = slope.atan();

        // Along the shoulder line, heading for the left shoulder's side.
        let toward_left = if left_shoulder.x < right_shoulder.x { -1.0 } else { 1.0 };
        let direction = Point::new(theta.cos(), theta.sin()) * toward_left;

        let mut normal = Point::new(-direction.y, direction.x);
        if normal.y < 0.0 {
            normal = normal * -1.0;
        }

        let length = self.config.fretboard_length;
        let fret   = self.config.fret_line_length;
        let anchor = right_shoulder;
        let end    = anchor + direction * length;
        if !end.is_finite() {
            return Err(PoseIncomplete::NumericDomain);
        }

        let zone_length = length / zones as f64;
        let frets = (0..=zones)
            .map(|k| {
                let p = end - direction * (k as f64 * zone_length);
                Segment::new(p, p + normal * fret)
            })
            .collect();
        let label_anchors = (0..zones)
            .map(|k| end - direction * ((k as f64 + 0.5) * zone_length) + normal * fret)
            .collect();

        Ok(FretboardGeometry {
            baseline:   Segment::new(anchor, end),
            theta,
            direction,
            normal,
            lower_edge: Segment::new(anchor + normal * fret, end + normal * fret),
            frets,
            label_anchors,
            zones,
            length,
        })
    }
}

/// Zone index, along-baseline distance and perpendicular distance of `hand`.
pub fn locate(geometry: &FretboardGeometry, hand: Point) -> Result<(usize, f64, f64), PoseIncomplete> {
    let Segment { start, end } = geometry.baseline;

    let perpendicular = ((end - start).cross(hand - start)).abs() / geometry.length;
    if perpendicular == 0.0 {
        return Err(PoseIncomplete::HandOnBaseline);
    }
    let from_end = hand - end;
    let mut along = along_baseline(from_end.dot(from_end), perpendicular)?;
    // Beyond the far end: heading away from the anchor.
    if from_end.dot(geometry.direction) > 0.0 {
        along = -along;
    }

    let zone_length = geometry.zone_length();
    let raw = (along / zone_length).floor();
    if !raw.is_finite() {
        return Err(PoseIncomplete::NumericDomain);
    }
    let zone = if raw >= geometry.zones as f64 {
        geometry.zones - 1
    } else if raw < 0.0 {
        0
    } else {
        raw as usize
    };

    Ok((zone, along, perpendicular))
}

/// `sqrt(b² − d²)`: the leg of the right triangle formed by the hand, its
/// foot on the baseline, and the far end.
fn along_baseline(to_end_sq: f64, perpendicular: f64) -> Result<f64, PoseIncomplete> {
    let radicand = to_end_sq - perpendicular * perpendicular;
    if !radicand.is_finite() || radicand < 0.0 {
        return Err(PoseIncomplete::NumericDomain);
    }
    Ok(radicand.sqrt())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;
    use proptest::prelude::*;

    fn pose_with(left: Point, right: Point, hand: Point) -> Pose {
        Pose::new(0.9, vec![
            Keypoint::new(BodyPart::LeftShoulder,  left.x,  left.y,  0.9),
            Keypoint::new(BodyPart::RightShoulder, right.x, right.y, 0.9),
            Keypoint::new(BodyPart::RightWrist,    hand.x,  hand.y,  0.9),
        ])
    }

    fn level() -> (Point, Point) {
        (Point::new(100.0, 200.0), Point::new(300.0, 200.0))
    }

    fn zone_of(hand: Point, zones: usize) -> usize {
        let (l, r) = level();
        FretboardProjector::default().project(&pose_with(l, r, hand), zones).unwrap().zone
    }

    #[test]
    fn level_shoulders_baseline_runs_left() {
        let (l, r) = level();
        let g = FretboardProjector::default().geometry(l, r, 3).unwrap();
        assert_eq!(g.baseline.start, r);
        assert!((g.baseline.end.x - 0.0).abs() < 1e-9);
        assert!((g.baseline.end.y - 200.0).abs() < 1e-9);
        assert!(g.normal.y > 0.99);
        assert_eq!(g.frets.len(), 4);
        assert_eq!(g.label_anchors.len(), 3);
        assert!((g.frets[1].start.x - 100.0).abs() < 1e-9);
        assert!((g.frets[1].end.y - 250.0).abs() < 1e-9);
    }

    #[test]
    fn zones_from_far_end() {
        assert_eq!(zone_of(Point::new(50.0, 250.0), 3), 0);
        assert_eq!(zone_of(Point::new(150.0, 260.0), 3), 1);
        assert_eq!(zone_of(Point::new(280.0, 210.0), 3), 2);
    }

    #[test]
    fn along_and_perpendicular_distances() {
        let (l, r) = level();
        let reading = FretboardProjector::default()
            .project(&pose_with(l, r, Point::new(150.0, 260.0)), 3)
            .unwrap();
        assert!((reading.perpendicular - 60.0).abs() < 1e-9);
        assert!((reading.along - 150.0).abs() < 1e-9);
    }

    #[test]
    fn hand_past_anchor_clamps_to_last_zone() {
        assert_eq!(zone_of(Point::new(900.0, 210.0), 3), 2);
        assert_eq!(zone_of(Point::new(301.0, 1000.0), 4), 3);
    }

    #[test]
    fn hand_past_far_end_clamps_to_first_zone() {
        let (l, r) = level();
        let reading = FretboardProjector::default()
            .project(&pose_with(l, r, Point::new(-250.0, 201.0)), 3)
            .unwrap();
        assert_eq!(reading.zone, 0);
        assert!(reading.along < 0.0);
        assert_eq!(zone_of(Point::new(-10.0, 400.0), 5), 0);
    }

    #[test]
    fn hand_on_baseline_gives_no_reading() {
        let (l, r) = level();
        let p = FretboardProjector::default();
        for x in [150.0, 0.0, -250.0, 900.0] {
            assert_eq!(
                p.project(&pose_with(l, r, Point::new(x, 200.0)), 3).unwrap_err(),
                PoseIncomplete::HandOnBaseline
            );
        }
    }

    #[test]
    fn single_zone_always_zero() {
        assert_eq!(zone_of(Point::new(-500.0, -500.0), 1), 0);
        assert_eq!(zone_of(Point::new(250.0, 210.0), 1), 0);
    }

    #[test]
    fn tilted_shoulders() {
        let l = Point::new(100.0, 100.0);
        let r = Point::new(300.0, 300.0);
        let p = FretboardProjector::default();
        let g = p.geometry(l, r, 3).unwrap();
        let diag = std::f64::consts::FRAC_1_SQRT_2;
        assert!((g.direction.x + diag).abs() < 1e-9);
        assert!((g.direction.y + diag).abs() < 1e-9);
        assert!(g.normal.y > 0.0);

        // 150 px from the anchor is 150 px from the far end of a 300 px board.
        let hand = r + g.direction * 150.0 + g.normal * 40.0;
        let reading = p.project(&pose_with(l, r, hand), 3).unwrap();
        assert_eq!(reading.zone, 1);
        assert!((reading.perpendicular - 40.0).abs() < 1e-6);
    }

    #[test]
    fn mirrored_shoulders_still_point_at_left_side() {
        let g = FretboardProjector::default()
            .geometry(Point::new(400.0, 200.0), Point::new(200.0, 200.0), 2)
            .unwrap();
        assert!((g.baseline.end.x - 500.0).abs() < 1e-9);
        assert!(g.normal.y > 0.99);
    }

    #[test]
    fn vertical_shoulders_are_degenerate() {
        let l = Point::new(200.0, 100.0);
        let r = Point::new(200.0, 300.0);
        let err = FretboardProjector::default()
            .project(&pose_with(l, r, Point::new(10.0, 10.0)), 3)
            .unwrap_err();
        assert_eq!(err, PoseIncomplete::DegenerateShoulders);
    }

    #[test]
    fn negative_radicand_is_domain_error() {
        assert_eq!(along_baseline(1.0, 2.0), Err(PoseIncomplete::NumericDomain));
        assert_eq!(along_baseline(f64::INFINITY, 1.0), Err(PoseIncomplete::NumericDomain));
        assert_eq!(along_baseline(25.0, 3.0), Ok(4.0));
    }

    #[test]
    fn missing_and_low_confidence_keypoints() {
        let p = FretboardProjector::default();
        let mut pose = pose_with(Point::new(100.0, 200.0), Point::new(300.0, 200.0), Point::new(10.0, 10.0));
        pose.keypoints.retain(|k| k.part != BodyPart::RightWrist);
        assert_eq!(
            p.project(&pose, 3).unwrap_err(),
            PoseIncomplete::MissingKeypoint(BodyPart::RightWrist)
        );

        let mut pose = pose_with(Point::new(100.0, 200.0), Point::new(300.0, 200.0), Point::new(10.0, 10.0));
        pose.keypoints[0].confidence = 0.2;
        assert_eq!(
            p.project(&pose, 3).unwrap_err(),
            PoseIncomplete::MissingKeypoint(BodyPart::LeftShoulder)
        );
    }

    #[test]
    fn low_pose_score_rejected() {
        let mut pose = pose_with(Point::new(100.0, 200.0), Point::new(300.0, 200.0), Point::new(10.0, 10.0));
        pose.overall_score = 0.1;
        assert!(matches!(
            FretboardProjector::default().project(&pose, 3),
            Err(PoseIncomplete::LowPoseScore { .. })
        ));
    }

    #[test]
    fn zero_zones_rejected() {
        let (l, r) = level();
        assert_eq!(
            FretboardProjector::default().project(&pose_with(l, r, l), 0).unwrap_err(),
            PoseIncomplete::NoZones
        );
    }

    #[test]
    fn fretting_hand_is_configurable() {
        let cfg = FretboardConfig { fretting_hand: BodyPart::LeftWrist, ..FretboardConfig::default() };
        let pose = Pose::new(0.9, vec![
            Keypoint::new(BodyPart::LeftShoulder,  100.0, 200.0, 0.9),
            Keypoint::new(BodyPart::RightShoulder, 300.0, 200.0, 0.9),
            Keypoint::new(BodyPart::LeftWrist,     280.0, 210.0, 0.9),
        ]);
        assert_eq!(FretboardProjector::new(cfg).project(&pose, 3).unwrap().zone, 2);
    }

    proptest! {
        #[test]
        fn zone_always_in_range(
            lx in -2000.0f64..2000.0, ly in -2000.0f64..2000.0,
            rx in -2000.0f64..2000.0, ry in -2000.0f64..2000.0,
            hx in -1.0e5f64..1.0e5,   hy in -1.0e5f64..1.0e5,
            zones in 1usize..12,
        ) {
            let pose = pose_with(Point::new(lx, ly), Point::new(rx, ry), Point::new(hx, hy));
            match FretboardProjector::default().project(&pose, zones) {
                Ok(reading) => prop_assert!(reading.zone < zones),
                Err(e) => prop_assert!(matches!(
                    e,
                    PoseIncomplete::DegenerateShoulders
                        | PoseIncomplete::HandOnBaseline
                        | PoseIncomplete::NumericDomain
                )),
            }
        }

        #[test]
        fn equal_shoulder_x_never_panics(
            x in -2000.0f64..2000.0, ly in -2000.0f64..2000.0, ry in -2000.0f64..2000.0,
            hx in -2000.0f64..2000.0, hy in -2000.0f64..2000.0,
        ) {
            let pose = pose_with(Point::new(x, ly), Point::new(x, ry), Point::new(hx, hy));
            prop_assert_eq!(
                FretboardProjector::default().project(&pose, 4).unwrap_err(),
                PoseIncomplete::DegenerateShoulders
            );
        }
    }
}
