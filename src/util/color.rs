use std::str::FromStr;

/// Straight-alpha 8-bit color as stored in a [`crate::engine::Raster`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
	pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);
	pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);
	pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self([r, g, b, 255])
	}

	pub fn parse(s: &str) -> Result<Self, csscolorparser::ParseColorError> {
		Ok(Self(csscolorparser::parse(s)?.to_rgba8()))
	}

	pub fn alpha(self) -> u8 {
		self.0[3]
	}

	pub fn to_hex(self) -> String {
		let [r, g, b, a] = self.0;
		if a == 255 {
			format!("#{r:02x}{g:02x}{b:02x}")
		} else {
			format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
		}
	}
}

impl FromStr for Rgba {
	type Err = csscolorparser::ParseColorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl std::fmt::Display for Rgba {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.to_hex())
	}
}
