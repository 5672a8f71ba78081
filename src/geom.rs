use glam::{vec2, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABox {
	min: Vec2,
	max: Vec2,
}

impl AABox {
	pub fn new(min: Vec2, max: Vec2) -> Self {
		Self { min, max }
	}

	pub fn empty() -> Self {
		Self::new(Vec2::MAX, Vec2::MIN)
	}

	pub fn is_empty(&self) -> bool {
		self.min.x > self.max.x || self.min.y > self.max.y
	}

	pub fn min(&self) -> Vec2 {
		self.min
	}

	pub fn max(&self) -> Vec2 {
		self.max
	}

	pub fn expanded_to_contain(self, point: Vec2) -> Self {
		Self::new(self.min.min(point), self.max.max(point))
	}

	pub fn containing(points: impl Iterator<Item = Vec2>) -> Self {
		points.fold(Self::empty(), |b, p| b.expanded_to_contain(p))
	}

	pub fn inflated(self, margin: f32) -> Self {
		if self.is_empty() {
			return self;
		}
		Self::new(self.min - Vec2::splat(margin), self.max + Vec2::splat(margin))
	}

	pub fn intersection(self, other: Self) -> Self {
		Self::new(self.min.max(other.min), self.max.min(other.max))
	}
}

/// Maps normalized detector coordinates onto the drawing surface.
///
/// The detector reports a selfie view, so the horizontal axis is mirrored:
/// `x' = (1 - x) * width`, `y' = y * height`. Everything that draws (live strokes, replay and
/// landmark markers) goes through [`SurfaceTransform::to_surface`] exactly once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceTransform {
	size: Vec2,
}

impl SurfaceTransform {
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			size: vec2(width as f32, height as f32),
		}
	}

	pub fn size(&self) -> Vec2 {
		self.size
	}

	pub fn bounds(&self) -> AABox {
		AABox::new(Vec2::ZERO, self.size)
	}

	pub fn to_surface(&self, normalized: Vec2) -> Vec2 {
		vec2((1.0 - normalized.x) * self.size.x, normalized.y * self.size.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;

	#[test]
	fn test_box_containing() {
		let b = AABox::containing([vec2(1.0, 5.0), vec2(3.0, 2.0)].into_iter());
		assert_eq!(b.min(), vec2(1.0, 2.0));
		assert_eq!(b.max(), vec2(3.0, 5.0));
		assert!(AABox::empty().is_empty());
		assert!(AABox::empty().inflated(2.0).is_empty());
	}

	#[test]
	fn test_intersection() {
		let a = AABox::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
		let b = AABox::new(vec2(5.0, -5.0), vec2(20.0, 5.0));
		assert_eq!(a.intersection(b), AABox::new(vec2(5.0, 0.0), vec2(10.0, 5.0)));
		let c = AABox::new(vec2(11.0, 11.0), vec2(12.0, 12.0));
		assert!(a.intersection(c).is_empty());
	}

	#[test]
	fn test_surface_transform_mirrors_x() {
		let transform = SurfaceTransform::new(700, 500);
		let p = transform.to_surface(vec2(0.2, 0.3));
		assert_abs_diff_eq!(p.x, 560.0, epsilon = 1e-3);
		assert_abs_diff_eq!(p.y, 150.0, epsilon = 1e-3);
		assert_eq!(transform.to_surface(vec2(1.0, 0.0)), Vec2::ZERO);
	}
}
