use super::Raster;
use thiserror::Error;
use zune_core::colorspace::ColorSpace;
use zune_image::codecs::ImageFormat;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
	/// The stroke history is empty, as opposed to a blank image.
	#[error("nothing was drawn")]
	NothingDrawn,

	#[error("failed to encode snapshot: {0}")]
	Encode(String),
}

static_assertions::assert_impl_all!(SnapshotError: std::error::Error, Send, Sync);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
	width: u32,
	height: u32,
	png: Vec<u8>,
}

impl Snapshot {
	pub fn encode(raster: &Raster) -> Result<Self, SnapshotError> {
		let png = encode_png(raster)?;
		Ok(Self {
			width: raster.width(),
			height: raster.height(),
			png,
		})
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn png(&self) -> &[u8] {
		&self.png
	}

	pub fn data_url(&self) -> String {
		encode_data_url(&self.png, Some("image/png"))
	}
}

pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, SnapshotError> {
	let image = zune_image::image::Image::from_u8(
		raster.data(),
		raster.width() as usize,
		raster.height() as usize,
		ColorSpace::RGBA,
	);
	image
		.write_to_vec(ImageFormat::PNG)
		.map_err(|err| SnapshotError::Encode(format!("{err:?}")))
}

pub fn encode_data_url(data: &[u8], mediatype: Option<&str>) -> String {
	use base64::engine::*;
	let mediatype = mediatype.unwrap_or("");
	let data = general_purpose::STANDARD.encode(data);
	format!("data:{mediatype};base64,{data}")
}
