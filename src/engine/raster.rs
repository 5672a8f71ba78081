//! Pixel coverage for the primitives the surface draws. A pixel is covered when its center lies
//! within the primitive, with no anti-aliasing, so identical inputs always cover identical pixels.

use crate::geom::AABox;
use glam::{vec2, Vec2};

fn floor_as_i32(x: f32) -> i32 {
	x.floor() as i32
}

fn ceil_as_i32(x: f32) -> i32 {
	x.ceil() as i32
}

fn pixel_center(x: i32, y: i32) -> Vec2 {
	vec2(x as f32 + 0.5, y as f32 + 0.5)
}

pub fn pixels_in(bounds: AABox, clip: AABox) -> impl Iterator<Item = (i32, i32)> {
	let bounds = bounds.intersection(clip);
	let (x0, x1, y0, y1) = if bounds.is_empty() {
		(0, 0, 0, 0)
	} else {
		(
			floor_as_i32(bounds.min().x),
			ceil_as_i32(bounds.max().x),
			floor_as_i32(bounds.min().y),
			ceil_as_i32(bounds.max().y),
		)
	};
	(y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
}

pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
	let ab = b - a;
	let length_squared = ab.length_squared();
	let t = if length_squared > 0.0 {
		((p - a).dot(ab) / length_squared).clamp(0.0, 1.0)
	} else {
		0.0
	};
	p.distance(a + ab * t)
}

/// A line from `a` to `b` with round caps of the given `radius`.
pub fn capsule(a: Vec2, b: Vec2, radius: f32, clip: AABox) -> impl Iterator<Item = (i32, i32)> {
	let bounds = AABox::containing([a, b].into_iter()).inflated(radius);
	pixels_in(bounds, clip)
		.filter(move |&(x, y)| distance_to_segment(pixel_center(x, y), a, b) <= radius)
}

pub fn disc(center: Vec2, radius: f32, clip: AABox) -> impl Iterator<Item = (i32, i32)> {
	capsule(center, center, radius, clip)
}

/// The band of pixels between `inner` (exclusive) and `outer` (inclusive) from `center`.
pub fn ring(
	center: Vec2,
	inner: f32,
	outer: f32,
	clip: AABox,
) -> impl Iterator<Item = (i32, i32)> {
	disc(center, outer, clip).filter(move |&(x, y)| pixel_center(x, y).distance(center) > inner)
}

#[cfg(test)]
mod tests {
	use super::*;
	use itertools::Itertools;

	fn clip() -> AABox {
		AABox::new(Vec2::ZERO, vec2(16.0, 16.0))
	}

	#[test]
	fn test_horizontal_capsule() {
		assert_eq!(
			capsule(vec2(1.5, 1.5), vec2(5.5, 1.5), 0.5, clip()).collect_vec(),
			vec![(1, 1), (2, 1), (3, 1), (4, 1), (5, 1)],
		);
	}

	#[test]
	fn test_capsule_is_symmetric() {
		let forward = capsule(vec2(1.2, 3.7), vec2(9.1, 6.4), 1.5, clip()).collect_vec();
		let backward = capsule(vec2(9.1, 6.4), vec2(1.2, 3.7), 1.5, clip()).collect_vec();
		assert_eq!(forward, backward);
		assert!(!forward.is_empty());
	}

	#[test]
	fn test_disc() {
		assert_eq!(
			disc(vec2(2.0, 2.0), 1.0, clip()).collect_vec(),
			vec![(1, 1), (2, 1), (1, 2), (2, 2)],
		);
	}

	#[test]
	fn test_ring_excludes_interior() {
		let ring = ring(vec2(8.0, 8.0), 2.0, 3.0, clip()).collect_vec();
		assert!(!ring.is_empty());
		assert!(!ring.contains(&(7, 7)));
		assert!(ring
			.iter()
			.all(|&(x, y)| pixel_center(x, y).distance(vec2(8.0, 8.0)) > 2.0));
	}

	#[test]
	fn test_clipping() {
		assert!(disc(vec2(-10.0, -10.0), 2.0, clip()).next().is_none());
		assert!(capsule(vec2(-4.0, 0.5), vec2(30.0, 0.5), 0.5, clip()).all(|(x, y)| {
			(0..16).contains(&x) && y == 0
		}));
	}

	#[test]
	fn test_distance_to_segment() {
		assert_eq!(distance_to_segment(vec2(0.0, 1.0), vec2(-1.0, 0.0), vec2(1.0, 0.0)), 1.0);
		assert_eq!(distance_to_segment(vec2(3.0, 0.0), vec2(-1.0, 0.0), vec2(1.0, 0.0)), 2.0);
		assert_eq!(distance_to_segment(vec2(0.0, 2.0), Vec2::ZERO, Vec2::ZERO), 2.0);
	}
}
