//! Turns the detector's per-frame landmark sets into pinch observations.
//!
//! A [`HandIndex`] is the position of a hand in the detector's output for that frame, not a
//! tracked identity. If two hands cross and the detector swaps their order, strokes continue on the
//! wrong pen. We accept this and do not attempt re-identification.

use crate::config::DEFAULT_PINCH_THRESHOLD;
use glam::{vec2, Vec2};
use tracing::{debug, trace};

mod marker;
pub use marker::*;

pub const LANDMARKS_PER_HAND: usize = 21;
pub const MAX_HANDS: usize = 2;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
	pub x: f32,
	pub y: f32,
	pub z: f32,
	pub visibility: Option<f32>,
}

impl Landmark {
	pub fn new(x: f32, y: f32, z: f32) -> Self {
		Self {
			x,
			y,
			z,
			visibility: None,
		}
	}

	pub fn xy(&self) -> Vec2 {
		vec2(self.x, self.y)
	}

	fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("hand {_0}")]
pub struct HandIndex(pub usize);

impl HandIndex {
	pub fn all() -> impl Iterator<Item = HandIndex> {
		(0..MAX_HANDS).map(HandIndex)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
	pub hand: HandIndex,
	pub landmarks: Box<[Landmark; LANDMARKS_PER_HAND]>,
	pub cursor: Vec2,
	pub pinch_distance: f32,
	pub is_pinching: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct GestureInterpreter {
	pinch_threshold: f32,
}

impl Default for GestureInterpreter {
	fn default() -> Self {
		Self::new(DEFAULT_PINCH_THRESHOLD)
	}
}

impl GestureInterpreter {
	pub fn new(pinch_threshold: f32) -> Self {
		Self { pinch_threshold }
	}

	pub fn pinch_threshold(&self) -> f32 {
		self.pinch_threshold
	}

	/// Interprets one frame. Hands are returned in detector order; a hand whose landmark set is
	/// malformed is dropped as if it had not been detected, without shifting the indices of the
	/// others.
	pub fn interpret<H: AsRef<[Landmark]>>(&self, frame: &[H]) -> Vec<HandObservation> {
		frame
			.iter()
			.enumerate()
			.filter_map(|(index, landmarks)| self.observe(HandIndex(index), landmarks.as_ref()))
			.collect()
	}

	fn observe(&self, hand: HandIndex, landmarks: &[Landmark]) -> Option<HandObservation> {
		if hand.0 >= MAX_HANDS {
			debug!(%hand, "ignoring hand beyond the supported count");
			return None;
		}
		let Ok(landmarks) = <[Landmark; LANDMARKS_PER_HAND]>::try_from(landmarks) else {
			debug!(%hand, count = landmarks.len(), "dropping hand with wrong landmark count");
			return None;
		};
		if !landmarks.iter().all(Landmark::is_finite) {
			debug!(%hand, "dropping hand with non-finite landmarks");
			return None;
		}

		let cursor = landmarks[INDEX_TIP].xy();
		// Planar distance: depth from a monocular detector is too noisy to be useful here.
		let pinch_distance = cursor.distance(landmarks[THUMB_TIP].xy());
		let is_pinching = pinch_distance < self.pinch_threshold;
		trace!(%hand, ?cursor, pinch_distance, is_pinching);

		Some(HandObservation {
			hand,
			landmarks: Box::new(landmarks),
			cursor,
			pinch_distance,
			is_pinching,
		})
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum TrackingQuality {
	NoHands,
	Weak,
	Good,
	Excellent,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSummary {
	pub hand_count: usize,
	/// Mean landmark visibility over every detected hand, 0 when no hands are present.
	pub confidence: f32,
}

impl FrameSummary {
	pub fn of(hands: &[HandObservation]) -> Self {
		let confidence = if hands.is_empty() {
			0.0
		} else {
			hands
				.iter()
				.map(|hand| {
					hand
						.landmarks
						.iter()
						.map(|l| l.visibility.unwrap_or(0.0))
						.sum::<f32>()
						/ LANDMARKS_PER_HAND as f32
				})
				.sum::<f32>()
				/ hands.len() as f32
		};
		Self {
			hand_count: hands.len(),
			confidence,
		}
	}

	pub fn quality(&self) -> TrackingQuality {
		match self.confidence {
			_ if self.hand_count == 0 => TrackingQuality::NoHands,
			c if c > 0.7 => TrackingQuality::Excellent,
			c if c > 0.4 => TrackingQuality::Good,
			_ => TrackingQuality::Weak,
		}
	}
}
