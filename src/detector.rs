//! The hand-landmark detector is an external collaborator. This module defines the seam the game
//! pulls frames through, plus a scripted stand-in used by the demo binary and tests.

use crate::gesture::{Landmark, INDEX_TIP, LANDMARKS_PER_HAND, THUMB_TIP, WRIST};
use glam::{vec2, Vec2};
use std::collections::VecDeque;
use tracing::debug;

pub type RawHand = Vec<Landmark>;

/// Non-fatal detector status for the host to display.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum DetectorStatus {
	Initializing,
	Running,
	#[display("unavailable: {_0}")]
	Unavailable(String),
}

pub trait LandmarkSource {
	fn status(&self) -> DetectorStatus;

	/// `None` once the source has nothing more to report.
	fn next_frame(&mut self) -> Option<Vec<RawHand>>;
}

/// A plausible hand pose with the index fingertip at `cursor`. When `pinching` the thumb tip rests
/// against the index tip; otherwise it is spread well clear of it.
pub fn synthetic_hand(cursor: Vec2, pinching: bool) -> RawHand {
	let wrist = cursor + vec2(0.0, 0.3);
	let mut landmarks: RawHand = (0..LANDMARKS_PER_HAND)
		.map(|index| {
			if index == WRIST {
				return wrist;
			}
			let finger = (index - 1) / 4;
			let joint = (index - 1) % 4 + 1;
			wrist + vec2(0.04 * finger as f32 - 0.08, -0.07 * joint as f32)
		})
		.map(|p| Landmark::new(p.x, p.y, 0.0))
		.collect();
	let thumb = if pinching {
		cursor + vec2(0.02, 0.01)
	} else {
		cursor + vec2(-0.15, 0.1)
	};
	landmarks[THUMB_TIP] = Landmark::new(thumb.x, thumb.y, 0.0);
	landmarks[INDEX_TIP] = Landmark::new(cursor.x, cursor.y, 0.0);
	landmarks
}

#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
	frames: VecDeque<Vec<RawHand>>,
	started: bool,
	unavailable: Option<String>,
}

impl ScriptedSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// A source that failed to initialize and never yields a frame.
	pub fn unavailable(reason: impl Into<String>) -> Self {
		Self {
			unavailable: Some(reason.into()),
			..Self::default()
		}
	}

	pub fn len(&self) -> usize {
		self.frames.len()
	}

	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	pub fn frame(mut self, hands: Vec<RawHand>) -> Self {
		self.frames.push_back(hands);
		self
	}

	pub fn pinch_path(mut self, path: impl IntoIterator<Item = Vec2>) -> Self {
		self
			.frames
			.extend(path.into_iter().map(|p| vec![synthetic_hand(p, true)]));
		self
	}

	pub fn open_hand(mut self, cursor: Vec2, frames: usize) -> Self {
		self
			.frames
			.extend((0..frames).map(|_| vec![synthetic_hand(cursor, false)]));
		self
	}

	pub fn no_hands(mut self, frames: usize) -> Self {
		self.frames.extend((0..frames).map(|_| Vec::new()));
		self
	}

	/// A wandering pinch of `frames` steps starting at `start`, broken into strokes by occasional
	/// releases. Points stay inside the unit square.
	pub fn scribble(mut self, rng: &mut fastrand::Rng, start: Vec2, frames: usize) -> Self {
		let mut cursor = start.clamp(Vec2::ZERO, Vec2::ONE);
		for _ in 0..frames {
			let step = vec2(rng.f32() - 0.5, rng.f32() - 0.5) * 0.05;
			cursor = (cursor + step).clamp(Vec2::ZERO, Vec2::ONE);
			let pinching = rng.u8(..) >= 24;
			self.frames.push_back(vec![synthetic_hand(cursor, pinching)]);
		}
		self
	}
}

impl LandmarkSource for ScriptedSource {
	fn status(&self) -> DetectorStatus {
		match &self.unavailable {
			Some(reason) => DetectorStatus::Unavailable(reason.clone()),
			None if self.started => DetectorStatus::Running,
			None => DetectorStatus::Initializing,
		}
	}

	fn next_frame(&mut self) -> Option<Vec<RawHand>> {
		if self.unavailable.is_some() {
			return None;
		}
		self.started = true;
		let frame = self.frames.pop_front();
		if frame.is_none() {
			debug!("scripted source exhausted");
		}
		frame
	}
}
