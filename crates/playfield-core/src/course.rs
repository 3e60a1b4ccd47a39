//! Courses: the navigable space a field game takes place in.
//!
//! A [`Course`] answers where the lane is at a given screen row and scroll
//! distance, where the ground is under a given column, and what surface the
//! craft is on. Scrolling shooters have banks, driving games have a curving
//! road, the helicopter game has a ground polyline.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Horizontal extent of the navigable lane at one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Left edge
    pub left: f32,
    /// Right edge
    pub right: f32,
}

impl Lane {
    /// A lane between two edges.
    #[must_use]
    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Midpoint.
    #[must_use]
    pub fn centre(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    /// Distance between edges.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// True when `[min, max]` lies inside the lane.
    #[must_use]
    pub fn contains_span(&self, min: f32, max: f32) -> bool {
        min >= self.left && max <= self.right
    }
}

/// Geometry a field simulation steers through.
pub trait Course: Send + Sync {
    /// Lane at screen row `y` after `scroll` pixels of travel. `None` means
    /// there are no lane edges.
    fn lane_at(&self, _y: f32, _scroll: f32) -> Option<Lane> {
        None
    }

    /// Ground height under column `x`. `None` means there is no ground.
    fn floor_at(&self, _x: f32) -> Option<f32> {
        None
    }

    /// Road surface, for courses that have one.
    fn environment(&self) -> Option<Environment> {
        None
    }
}

/// A course with no edges and no ground.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl Course for OpenField {}

// =============================================================================
// River
// =============================================================================

/// Banked river built from fixed-height segments.
///
/// Segment `i` has its left bank at `base_left + left_amplitude·sin(left_frequency·i)`
/// and width `base_width + width_amplitude·cos(width_frequency·i)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverCourse {
    /// Segment height in pixels
    pub segment_height: f32,
    /// Mean left bank
    pub base_left: f32,
    /// Left bank swing
    pub left_amplitude: f32,
    /// Left bank frequency per segment
    pub left_frequency: f32,
    /// Mean width
    pub base_width: f32,
    /// Width swing
    pub width_amplitude: f32,
    /// Width frequency per segment
    pub width_frequency: f32,
}

impl Default for RiverCourse {
    fn default() -> Self {
        Self {
            segment_height: 20.0,
            base_left: 100.0,
            left_amplitude: 50.0,
            left_frequency: 0.2,
            base_width: 600.0,
            width_amplitude: 100.0,
            width_frequency: 0.3,
        }
    }
}

impl RiverCourse {
    /// Segment index under screen row `y`. Segments are numbered upstream,
    /// so the index grows with scroll.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn segment_at(&self, y: f32, scroll: f32) -> i64 {
        ((scroll - y) / self.segment_height).floor() as i64
    }

    /// Lane of segment `index`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn segment_lane(&self, index: i64) -> Lane {
        let i = index as f32;
        let left = self.base_left + (i * self.left_frequency).sin() * self.left_amplitude;
        let width = self.base_width + (i * self.width_frequency).cos() * self.width_amplitude;
        Lane::new(left, left + width)
    }
}

impl Course for RiverCourse {
    fn lane_at(&self, y: f32, scroll: f32) -> Option<Lane> {
        Some(self.segment_lane(self.segment_at(y, scroll)))
    }
}

// =============================================================================
// Road
// =============================================================================

/// Road surface and scenery type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    /// Ice; very slippery
    Snow,
    /// Puddles; slippery
    Rain,
    /// Hairpins and grades
    Mountain,
    /// Heat and cacti
    Desert,
    /// Straight and grippy
    Plains,
    /// Narrow, tree-lined
    Forest,
    /// Ocean views
    Coastal,
    /// Dense traffic
    Urban,
}

impl Environment {
    /// Every environment.
    pub const ALL: [Environment; 8] = [
        Self::Snow,
        Self::Rain,
        Self::Mountain,
        Self::Desert,
        Self::Plains,
        Self::Forest,
        Self::Coastal,
        Self::Urban,
    ];

    /// Grip multiplier for acceleration and steering.
    #[must_use]
    pub const fn friction(self) -> f32 {
        match self {
            Self::Snow => 0.3,
            Self::Rain => 0.6,
            Self::Mountain => 0.9,
            Self::Desert => 0.85,
            Self::Plains | Self::Urban => 1.0,
            Self::Forest => 0.8,
            Self::Coastal => 0.95,
        }
    }

    /// Per-frame lateral velocity retention.
    #[must_use]
    pub const fn lateral_damping(self) -> f32 {
        match self {
            Self::Snow | Self::Rain => 0.95,
            _ => 0.85,
        }
    }

    /// Road width in pixels.
    #[must_use]
    pub const fn road_width(self) -> f32 {
        match self {
            Self::Urban => 280.0,
            Self::Plains => 260.0,
            Self::Coastal | Self::Rain => 240.0,
            Self::Desert => 220.0,
            Self::Forest | Self::Snow => 200.0,
            Self::Mountain => 180.0,
        }
    }

    /// Road curve as (amplitude px, frequency per px of scroll).
    #[must_use]
    pub const fn curve(self) -> (f32, f32) {
        match self {
            Self::Mountain | Self::Forest => (120.0, 0.008),
            Self::Plains => (30.0, 0.002),
            _ => (80.0, 0.005),
        }
    }

    /// Per-frame chance of an obstacle spawning.
    #[must_use]
    pub const fn traffic_density(self) -> f64 {
        match self {
            Self::Urban => 0.03,
            Self::Coastal => 0.015,
            Self::Plains | Self::Rain => 0.01,
            Self::Forest => 0.005,
            Self::Mountain => 0.003,
            Self::Desert => 0.001,
            Self::Snow => 0.002,
        }
    }

    /// Fuel consumption multiplier.
    #[must_use]
    pub const fn fuel_multiplier(self) -> f64 {
        match self {
            Self::Mountain => 1.5,
            Self::Snow => 1.3,
            Self::Desert => 1.2,
            Self::Urban | Self::Rain => 1.1,
            Self::Plains => 0.9,
            Self::Forest | Self::Coastal => 1.0,
        }
    }

    /// Per-frame score bonus for driving here.
    #[must_use]
    pub const fn score_bonus(self) -> f64 {
        match self {
            Self::Snow => 3.0,
            Self::Mountain | Self::Rain | Self::Urban => 2.0,
            Self::Desert | Self::Forest => 1.0,
            Self::Plains | Self::Coastal => 0.0,
        }
    }

    /// Roadside obstacle and the chance an obstacle is one, if any.
    #[must_use]
    pub const fn roadside(self) -> Option<(crate::entity::HostileKind, f64)> {
        use crate::entity::HostileKind;
        match self {
            Self::Desert => Some((HostileKind::Cactus, 0.3)),
            Self::Forest => Some((HostileKind::Tree, 0.4)),
            Self::Mountain => Some((HostileKind::Rock, 0.3)),
            Self::Urban => Some((HostileKind::Truck, 0.2)),
            _ => None,
        }
    }
}

/// A curving road whose shape depends only on scroll distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadCourse {
    /// Current surface
    pub environment: Environment,
    /// Screen x of the straight-road centre
    pub centre: f32,
    /// Distance kept from each road edge
    pub margin: f32,
}

impl RoadCourse {
    /// Road centred at `centre` through `environment`.
    #[must_use]
    pub const fn new(environment: Environment, centre: f32) -> Self {
        Self {
            environment,
            centre,
            margin: 20.0,
        }
    }

    /// Road centre after `scroll` pixels of travel.
    #[must_use]
    pub fn centre_at(&self, scroll: f32) -> f32 {
        let (amplitude, frequency) = self.environment.curve();
        self.centre + (scroll * frequency).sin() * amplitude
    }
}

impl Course for RoadCourse {
    fn lane_at(&self, _y: f32, scroll: f32) -> Option<Lane> {
        let centre = self.centre_at(scroll);
        let half = self.environment.road_width() * 0.5 - self.margin;
        Some(Lane::new(centre - half, centre + half))
    }

    fn environment(&self) -> Option<Environment> {
        Some(self.environment)
    }
}

// =============================================================================
// Terrain
// =============================================================================

/// Ground polyline with evenly spaced points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeliTerrain {
    points: Vec<Vec2>,
}

impl HeliTerrain {
    /// Ground from explicit points, sorted by x.
    #[must_use]
    pub fn from_points(mut points: Vec<Vec2>) -> Self {
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { points }
    }

    /// Rolling ground: `count` points `spacing` apart at
    /// `base + amplitude·sin(0.5·i) + jitter·u`, `u` uniform in `[0, 1)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn rolling<R: Rng>(
        count: usize,
        spacing: f32,
        base: f32,
        amplitude: f32,
        jitter: f32,
        rng: &mut R,
    ) -> Self {
        let points = (0..count)
            .map(|i| {
                let x = i as f32 * spacing;
                let y = base + (i as f32 * 0.5).sin() * amplitude + rng.gen::<f32>() * jitter;
                Vec2::new(x, y)
            })
            .collect();
        Self { points }
    }

    /// The polyline points.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Ground height at point `index`, if it exists.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }
}

impl Course for HeliTerrain {
    fn floor_at(&self, x: f32) -> Option<f32> {
        let first = self.points.first()?;
        if x <= first.x {
            return Some(first.y);
        }
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x >= a.x && x <= b.x {
                let span = b.x - a.x;
                if span <= f32::EPSILON {
                    return Some(a.y);
                }
                let t = (x - a.x) / span;
                return Some(a.y + (b.y - a.y) * t);
            }
        }
        self.points.last().map(|p| p.y)
    }
}
