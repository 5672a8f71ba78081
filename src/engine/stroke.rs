use super::{DrawTarget, Pen, Raster, Snapshot, SnapshotError};
use crate::config::SurfaceConfig;
use crate::geom::SurfaceTransform;
use crate::gesture::{HandIndex, HandObservation, MarkerStyle, MAX_HANDS};
use crate::util::Rgba;
use glam::Vec2;
use itertools::Itertools;
use tracing::{debug, trace, warn};

/// Pen state of one hand. A pen that is up has no last point, so a stroke can never resume from a
/// stale position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PenState {
	#[default]
	Up,
	Down {
		last_point: Vec2,
	},
}

impl PenState {
	pub fn is_down(&self) -> bool {
		matches!(self, PenState::Down { .. })
	}

	pub fn last_point(&self) -> Option<Vec2> {
		match *self {
			PenState::Up => None,
			PenState::Down { last_point } => Some(last_point),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeSegment {
	pub from: Vec2,
	pub to: Vec2,
	pub color: Rgba,
	pub hand: HandIndex,
}

/// A maximal run of connected segments drawn by the same hand.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
	pub hand: HandIndex,
	pub color: Rgba,
	pub points: Vec<Vec2>,
}

/// Groups `history` into strokes. Consecutive segments join only when they share a hand and an
/// endpoint; a change of hand always starts a new stroke.
pub fn strokes(history: &[StrokeSegment]) -> Vec<Stroke> {
	history
		.iter()
		.map(|segment| Stroke {
			hand: segment.hand,
			color: segment.color,
			points: vec![segment.from, segment.to],
		})
		.coalesce(|mut a, b| {
			if a.hand == b.hand && a.color == b.color && a.points.last() == b.points.first() {
				a.points.extend(b.points.into_iter().skip(1));
				Ok(a)
			} else {
				Err((a, b))
			}
		})
		.collect()
}

pub struct StrokeEngine {
	transform: SurfaceTransform,
	pen: Pen,
	background: Rgba,
	pens: [PenState; MAX_HANDS],
	history: Vec<StrokeSegment>,
	surface: Raster,
}

impl StrokeEngine {
	pub fn new(config: &SurfaceConfig) -> Self {
		Self {
			transform: SurfaceTransform::new(config.width(), config.height()),
			pen: Pen {
				color: config.stroke_color(),
				width: config.line_width(),
			},
			background: config.background(),
			pens: Default::default(),
			history: Vec::new(),
			surface: Raster::new(config.width(), config.height(), config.background()),
		}
	}

	pub fn transform(&self) -> &SurfaceTransform {
		&self.transform
	}

	pub fn history(&self) -> &[StrokeSegment] {
		&self.history
	}

	pub fn pen(&self, hand: HandIndex) -> PenState {
		self.pens.get(hand.0).copied().unwrap_or_default()
	}

	pub fn surface(&self) -> &Raster {
		&self.surface
	}

	/// Pinching hands draw only while `drawing_enabled`. Every other hand, and every hand absent
	/// from the frame, is released. Returns the number of segments appended.
	pub fn process_frame(&mut self, hands: &[HandObservation], drawing_enabled: bool) -> usize {
		let mut seen = [false; MAX_HANDS];
		let mut appended = 0;
		for observation in hands {
			if let Some(seen) = seen.get_mut(observation.hand.0) {
				*seen = true;
			}
			if observation.is_pinching && drawing_enabled {
				appended += self
					.on_pinch_frame(observation.hand, observation.cursor)
					.is_some() as usize;
			} else {
				self.on_release_frame(observation.hand);
			}
		}
		for hand in HandIndex::all().filter(|hand| !seen[hand.0]) {
			self.on_release_frame(hand);
		}
		appended
	}

	/// Pinch at `cursor` (normalized detector coordinates). The first point of a stroke only puts
	/// the pen down; every later one appends a segment from the previous point.
	pub fn on_pinch_frame(&mut self, hand: HandIndex, cursor: Vec2) -> Option<StrokeSegment> {
		let Some(pen) = self.pens.get_mut(hand.0) else {
			warn!(%hand, "no pen for hand");
			return None;
		};
		let point = self.transform.to_surface(cursor);
		let previous = std::mem::replace(pen, PenState::Down { last_point: point });
		let PenState::Down { last_point } = previous else {
			trace!(%hand, ?point, "pen down");
			return None;
		};
		let segment = StrokeSegment {
			from: last_point,
			to: point,
			color: self.pen.color,
			hand,
		};
		self.surface.draw_line(segment.from, segment.to, self.pen);
		self.history.push(segment);
		Some(segment)
	}

	pub fn on_release_frame(&mut self, hand: HandIndex) {
		if let Some(pen) = self.pens.get_mut(hand.0) {
			if pen.is_down() {
				trace!(%hand, "pen up");
			}
			*pen = PenState::Up;
		}
	}

	pub fn clear(&mut self) {
		debug!(segments = self.history.len(), "clearing strokes");
		self.history.clear();
		self.pens = Default::default();
		self.surface.clear();
	}

	pub fn replay(&self, target: &mut impl DrawTarget) {
		for stroke in strokes(&self.history) {
			let pen = Pen {
				color: stroke.color,
				..self.pen
			};
			for (from, to) in stroke.points.into_iter().tuple_windows() {
				target.draw_line(from, to, pen);
			}
		}
	}

	pub fn render_preview(&self, hands: &[HandObservation], target: &mut impl DrawTarget) {
		target.clear();
		self.replay(target);
		for hand in hands {
			for (index, landmark) in hand.landmarks.iter().enumerate() {
				target.draw_marker(
					self.transform.to_surface(landmark.xy()),
					MarkerStyle::for_landmark(hand.hand, index),
				);
			}
		}
	}

	pub fn blank_surface(&self) -> Raster {
		let size = self.transform.size();
		Raster::new(size.x as u32, size.y as u32, self.background)
	}

	/// Encodes the history as a PNG. Does not touch the history or the live surface.
	pub fn snapshot(&self) -> Result<Snapshot, SnapshotError> {
		if self.history.is_empty() {
			return Err(SnapshotError::NothingDrawn);
		}
		let mut raster = self.blank_surface();
		self.replay(&mut raster);
		Snapshot::encode(&raster)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test::*;
	use glam::vec2;

	fn engine() -> StrokeEngine {
		StrokeEngine::new(&SurfaceConfig::default())
	}

	#[test]
	fn test_single_hand_segment() {
		let mut engine = engine();
		let hand = HandIndex(0);
		assert!(engine.on_pinch_frame(hand, vec2(0.2, 0.3)).is_none());
		assert!(engine.pen(hand).is_down());
		let segment = engine.on_pinch_frame(hand, vec2(0.3, 0.3)).unwrap();

		let transform = engine.transform();
		assert_eq!(segment.from, transform.to_surface(vec2(0.2, 0.3)));
		assert_eq!(segment.to, transform.to_surface(vec2(0.3, 0.3)));
		assert_eq!(segment.hand, hand);
		assert_eq!(engine.history(), &[segment]);
		assert_eq!(engine.pen(hand).last_point(), Some(segment.to));
	}

	#[test]
	fn test_segment_count_matches_pinch_runs() {
		let mut rng = fastrand::Rng::with_seed(0x13371337);
		for _ in 0..32 {
			let mut engine = engine();
			let mut pinch_frames = 0;
			let mut runs = 0;
			let mut was_pinching = false;
			for _ in 0..rng.usize(1..64) {
				let pinching = rng.bool();
				let cursor = vec2(rng.f32(), rng.f32());
				if pinching {
					pinch_frames += 1;
					runs += !was_pinching as usize;
				}
				was_pinching = pinching;
				engine.process_frame(&[observation(0, cursor, pinching)], true);
				assert_eq!(engine.pen(HandIndex(0)).is_down(), pinching);
				assert_eq!(engine.pen(HandIndex(0)).last_point().is_some(), pinching);
			}
			assert_eq!(engine.history().len(), pinch_frames - runs);
		}
	}

	#[test]
	fn test_absent_hand_is_released() {
		let mut engine = engine();
		engine.process_frame(&[observation(0, vec2(0.1, 0.1), true)], true);
		engine.process_frame(&[], true);
		assert_eq!(engine.pen(HandIndex(0)), PenState::Up);
		engine.process_frame(&[observation(0, vec2(0.9, 0.9), true)], true);
		assert!(engine.history().is_empty());
	}

	#[test]
	fn test_disabled_drawing_releases() {
		let mut engine = engine();
		engine.process_frame(&[observation(0, vec2(0.1, 0.1), true)], false);
		engine.process_frame(&[observation(0, vec2(0.2, 0.1), true)], false);
		assert!(engine.history().is_empty());
		assert_eq!(engine.pen(HandIndex(0)), PenState::Up);
	}

	#[test]
	fn test_hands_are_independent() {
		let mut engine = engine();
		let frames = [
			[observation(0, vec2(0.1, 0.1), true), observation(1, vec2(0.8, 0.8), true)],
			[observation(0, vec2(0.2, 0.1), true), observation(1, vec2(0.8, 0.9), false)],
			[observation(0, vec2(0.3, 0.1), true), observation(1, vec2(0.7, 0.9), true)],
		];
		for frame in &frames {
			engine.process_frame(frame, true);
		}
		assert_eq!(engine.history().len(), 2);
		assert!(engine.history().iter().all(|s| s.hand == HandIndex(0)));
		assert!(engine.pen(HandIndex(1)).is_down());
	}

	#[test]
	fn test_strokes_break_between_hands() {
		let mut engine = engine();
		for step in 0..3 {
			let dx = 0.1 * step as f32;
			engine.process_frame(
				&[
					observation(0, vec2(0.1 + dx, 0.2), true),
					observation(1, vec2(0.1 + dx, 0.8), true),
				],
				true,
			);
		}
		// Segments interleave by hand, so no two consecutive ones may be joined.
		let strokes = strokes(engine.history());
		assert_eq!(strokes.len(), 4);
		assert!(strokes.iter().all(|s| s.points.len() == 2));
		assert_eq!(
			strokes.iter().map(|s| s.hand.0).collect::<Vec<_>>(),
			vec![0, 1, 0, 1]
		);
	}

	#[test]
	fn test_strokes_join_continuous_runs() {
		let mut engine = engine();
		for x in [0.1, 0.2, 0.3, 0.4] {
			engine.process_frame(&[observation(0, vec2(x, 0.5), true)], true);
		}
		engine.process_frame(&[observation(0, vec2(0.5, 0.5), false)], true);
		for x in [0.6, 0.7] {
			engine.process_frame(&[observation(0, vec2(x, 0.5), true)], true);
		}
		let strokes = strokes(engine.history());
		assert_eq!(strokes.len(), 2);
		assert_eq!(strokes[0].points.len(), 4);
		assert_eq!(strokes[1].points.len(), 2);
	}

	#[test]
	fn test_live_and_replay_pixels_match() {
		let mut engine = engine();
		let path = [(0.2, 0.3), (0.25, 0.35), (0.4, 0.5), (0.45, 0.45)];
		for (x, y) in path {
			engine.process_frame(
				&[
					observation(0, vec2(x, y), true),
					observation(1, vec2(1.0 - x, y), true),
				],
				true,
			);
		}
		let mut replayed = engine.blank_surface();
		engine.replay(&mut replayed);
		assert!(replayed.painted_pixels() > 0);
		assert_eq!(&replayed, engine.surface());
	}

	#[test]
	fn test_replay_is_idempotent() {
		let mut engine = engine();
		for x in [0.1, 0.2, 0.3] {
			engine.process_frame(&[observation(0, vec2(x, 0.4), true)], true);
		}
		let mut first = RecordingTarget::default();
		let mut second = RecordingTarget::default();
		engine.replay(&mut first);
		engine.replay(&mut second);
		assert_eq!(first.lines().len(), 2);
		assert_eq!(first, second);
	}

	#[test]
	fn test_preview_draws_markers() {
		let mut engine = engine();
		engine.process_frame(&[observation(0, vec2(0.1, 0.4), true)], true);
		engine.process_frame(&[observation(0, vec2(0.2, 0.4), true)], true);
		let hands = [observation(0, vec2(0.2, 0.4), true)];
		let mut target = RecordingTarget::default();
		engine.render_preview(&hands, &mut target);
		assert_eq!(target.ops.first(), Some(&DrawOp::Clear));
		assert_eq!(target.lines().len(), 1);
		assert_eq!(target.markers().len(), crate::gesture::LANDMARKS_PER_HAND);
	}

	#[test]
	fn test_snapshot() {
		let mut engine = engine();
		assert_eq!(engine.snapshot(), Err(SnapshotError::NothingDrawn));
		engine.on_pinch_frame(HandIndex(0), vec2(0.5, 0.5));
		assert_eq!(engine.snapshot(), Err(SnapshotError::NothingDrawn));
		engine.on_pinch_frame(HandIndex(0), vec2(0.6, 0.5));

		let history = engine.history().to_vec();
		let first = engine.snapshot().unwrap();
		let second = engine.snapshot().unwrap();
		assert_eq!(first, second);
		assert_eq!(engine.history(), history.as_slice());
		assert_eq!(first.width(), 700);
		assert_eq!(first.height(), 500);
	}

	#[test]
	fn test_clear() {
		let mut engine = engine();
		engine.process_frame(&[observation(0, vec2(0.1, 0.1), true)], true);
		engine.process_frame(&[observation(0, vec2(0.2, 0.2), true)], true);
		assert_eq!(engine.history().len(), 1);
		engine.clear();
		assert!(engine.history().is_empty());
		assert_eq!(engine.pen(HandIndex(0)), PenState::Up);
		assert_eq!(engine.surface().painted_pixels(), 0);
	}
}
