use super::raster;
use crate::geom::AABox;
use crate::gesture::MarkerStyle;
use crate::util::Rgba;
use glam::{vec2, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
	pub color: Rgba,
	pub width: f32,
}

/// Anything strokes and landmark markers can be drawn onto. All coordinates are surface pixels,
/// already transformed from detector space.
pub trait DrawTarget {
	fn clear(&mut self);
	fn draw_line(&mut self, from: Vec2, to: Vec2, pen: Pen);
	fn draw_marker(&mut self, center: Vec2, style: MarkerStyle);
}

/// RGBA8 software surface, row-major, straight alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
	width: u32,
	height: u32,
	background: Rgba,
	data: Vec<u8>,
}

impl Raster {
	pub fn new(width: u32, height: u32, background: Rgba) -> Self {
		let data = background.0.repeat((width * height) as usize);
		Self {
			width,
			height,
			background,
			data,
		}
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn data(&self) -> &[u8] {
		&self.data
	}

	fn bounds(&self) -> AABox {
		AABox::new(Vec2::ZERO, vec2(self.width as f32, self.height as f32))
	}

	pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
		if x >= self.width || y >= self.height {
			return None;
		}
		let offset = 4 * (y * self.width + x) as usize;
		let mut pixel = [0u8; 4];
		pixel.copy_from_slice(&self.data[offset..offset + 4]);
		Some(Rgba(pixel))
	}

	/// Number of pixels that differ from the background.
	pub fn painted_pixels(&self) -> usize {
		self
			.data
			.chunks_exact(4)
			.filter(|p| *p != self.background.0)
			.count()
	}

	fn fill(&mut self, pixels: impl Iterator<Item = (i32, i32)>, color: Rgba) {
		let width = self.width as usize;
		for (x, y) in pixels {
			// Coverage iterators are already clipped to `bounds`.
			let offset = 4 * (y as usize * width + x as usize);
			self.data[offset..offset + 4].copy_from_slice(&color.0);
		}
	}
}

impl DrawTarget for Raster {
	fn clear(&mut self) {
		let background = self.background;
		self
			.data
			.chunks_exact_mut(4)
			.for_each(|p| p.copy_from_slice(&background.0));
	}

	fn draw_line(&mut self, from: Vec2, to: Vec2, pen: Pen) {
		let pixels = raster::capsule(from, to, 0.5 * pen.width, self.bounds());
		self.fill(pixels, pen.color);
	}

	fn draw_marker(&mut self, center: Vec2, style: MarkerStyle) {
		let bounds = self.bounds();
		self.fill(raster::disc(center, style.radius, bounds), style.fill);
		self.fill(
			raster::ring(center, style.radius, style.radius + 1.0, bounds),
			style.outline,
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gesture::HandIndex;

	#[test]
	fn test_draw_line() {
		let mut raster = Raster::new(8, 4, Rgba::TRANSPARENT);
		assert_eq!(raster.painted_pixels(), 0);
		raster.draw_line(
			vec2(1.5, 1.5),
			vec2(5.5, 1.5),
			Pen {
				color: Rgba::BLACK,
				width: 1.0,
			},
		);
		assert_eq!(raster.painted_pixels(), 5);
		assert_eq!(raster.pixel(3, 1), Some(Rgba::BLACK));
		assert_eq!(raster.pixel(3, 2), Some(Rgba::TRANSPARENT));
		assert_eq!(raster.pixel(8, 0), None);

		raster.clear();
		assert_eq!(raster.painted_pixels(), 0);
	}

	#[test]
	fn test_draw_marker() {
		let mut raster = Raster::new(16, 16, Rgba::WHITE);
		let style = MarkerStyle::for_landmark(HandIndex(0), 8);
		raster.draw_marker(vec2(8.0, 8.0), style);
		assert_eq!(raster.pixel(7, 7), Some(style.fill));
		assert_eq!(raster.pixel(11, 7), Some(Rgba::BLACK));
		assert_eq!(raster.pixel(0, 0), Some(Rgba::WHITE));
	}
}
