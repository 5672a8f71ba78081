use crate::util::Rgba;
use bon::bon;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const TURN_DURATION_RANGE: RangeInclusive<u32> = 1..=120;
pub const DEFAULT_TURN_DURATION: u32 = 60;

pub const ROUNDS_RANGE: RangeInclusive<u32> = 1..=5;
pub const DEFAULT_ROUNDS: u32 = 1;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 12;

/// Index-fingertip to thumb-tip distance, in normalized image units, below which a hand counts as
/// pinching. Not calibrated against hand size or camera distance.
pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.1;

pub const DEFAULT_SURFACE_WIDTH: u32 = 700;
pub const DEFAULT_SURFACE_HEIGHT: u32 = 500;
pub const DEFAULT_LINE_WIDTH: f32 = 3.0;
pub const DEFAULT_STROKE_COLOR: &str = "#000000";
pub const DEFAULT_BACKGROUND: &str = "transparent";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("turn duration {0}s outside {min}..={max}s", min = TURN_DURATION_RANGE.start(), max = TURN_DURATION_RANGE.end())]
	TurnDurationOutOfRange(u32),

	#[error("round count {0} outside {min}..={max}", min = ROUNDS_RANGE.start(), max = ROUNDS_RANGE.end())]
	RoundsOutOfRange(u32),

	#[error("pinch threshold must be a positive finite distance, got {0}")]
	InvalidPinchThreshold(f32),

	#[error("surface must have a non-zero size, got {0}x{1}")]
	EmptySurface(u32, u32),

	#[error("line width must be positive and finite, got {0}")]
	InvalidLineWidth(f32),

	#[error("invalid color {0:?}")]
	InvalidColor(String, #[source] csscolorparser::ParseColorError),
}

static_assertions::assert_impl_all!(ConfigError: std::error::Error, Send, Sync);

pub fn validate_turn_duration(seconds: u32) -> Result<u32, ConfigError> {
	TURN_DURATION_RANGE
		.contains(&seconds)
		.then_some(seconds)
		.ok_or(ConfigError::TurnDurationOutOfRange(seconds))
}

pub fn validate_rounds(rounds: u32) -> Result<u32, ConfigError> {
	ROUNDS_RANGE
		.contains(&rounds)
		.then_some(rounds)
		.ok_or(ConfigError::RoundsOutOfRange(rounds))
}

fn parse_color(s: &str) -> Result<Rgba, ConfigError> {
	Rgba::parse(s).map_err(|err| ConfigError::InvalidColor(s.to_owned(), err))
}

#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceConfig {
	width: u32,
	height: u32,
	line_width: f32,
	stroke_color: Rgba,
	background: Rgba,
}

#[bon]
impl SurfaceConfig {
	#[builder(finish_fn = build)]
	pub fn new(
		#[builder(default = DEFAULT_SURFACE_WIDTH)] width: u32,
		#[builder(default = DEFAULT_SURFACE_HEIGHT)] height: u32,
		#[builder(default = DEFAULT_LINE_WIDTH)] line_width: f32,
		#[builder(into)] stroke_color: Option<String>,
		#[builder(into)] background: Option<String>,
	) -> Result<Self, ConfigError> {
		use ConfigError::*;
		if width == 0 || height == 0 {
			Err(EmptySurface(width, height))?;
		}
		if !(line_width.is_finite() && line_width > 0.0) {
			Err(InvalidLineWidth(line_width))?;
		}
		Ok(Self {
			width,
			height,
			line_width,
			stroke_color: parse_color(stroke_color.as_deref().unwrap_or(DEFAULT_STROKE_COLOR))?,
			background: parse_color(background.as_deref().unwrap_or(DEFAULT_BACKGROUND))?,
		})
	}
}

impl SurfaceConfig {
	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn line_width(&self) -> f32 {
		self.line_width
	}

	pub fn stroke_color(&self) -> Rgba {
		self.stroke_color
	}

	pub fn background(&self) -> Rgba {
		self.background
	}
}

impl Default for SurfaceConfig {
	fn default() -> Self {
		Self {
			width: DEFAULT_SURFACE_WIDTH,
			height: DEFAULT_SURFACE_HEIGHT,
			line_width: DEFAULT_LINE_WIDTH,
			stroke_color: Rgba::BLACK,
			background: Rgba::TRANSPARENT,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
	turn_duration: u32,
	total_rounds: u32,
	pinch_threshold: f32,
	surface: SurfaceConfig,
}

#[bon]
impl GameConfig {
	#[builder(finish_fn = build)]
	pub fn new(
		#[builder(default = DEFAULT_TURN_DURATION)] turn_duration: u32,
		#[builder(default = DEFAULT_ROUNDS)] total_rounds: u32,
		#[builder(default = DEFAULT_PINCH_THRESHOLD)] pinch_threshold: f32,
		#[builder(default)] surface: SurfaceConfig,
	) -> Result<Self, ConfigError> {
		if !(pinch_threshold.is_finite() && pinch_threshold > 0.0) {
			Err(ConfigError::InvalidPinchThreshold(pinch_threshold))?;
		}
		Ok(Self {
			turn_duration: validate_turn_duration(turn_duration)?,
			total_rounds: validate_rounds(total_rounds)?,
			pinch_threshold,
			surface,
		})
	}
}

impl GameConfig {
	pub fn turn_duration(&self) -> u32 {
		self.turn_duration
	}

	pub fn total_rounds(&self) -> u32 {
		self.total_rounds
	}

	pub fn pinch_threshold(&self) -> f32 {
		self.pinch_threshold
	}

	pub fn surface(&self) -> &SurfaceConfig {
		&self.surface
	}
}

impl Default for GameConfig {
	fn default() -> Self {
		Self {
			turn_duration: DEFAULT_TURN_DURATION,
			total_rounds: DEFAULT_ROUNDS,
			pinch_threshold: DEFAULT_PINCH_THRESHOLD,
			surface: SurfaceConfig::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = GameConfig::builder().build().unwrap();
		assert_eq!(config, GameConfig::default());
		assert_eq!(config.turn_duration(), 60);
		assert_eq!(config.total_rounds(), 1);
		assert_eq!(config.surface().stroke_color(), Rgba::BLACK);
		assert_eq!(config.surface().background(), Rgba::TRANSPARENT);
	}

	#[test]
	fn test_bounds() {
		assert!(matches!(
			GameConfig::builder().turn_duration(0).build(),
			Err(ConfigError::TurnDurationOutOfRange(0))
		));
		assert!(matches!(
			GameConfig::builder().turn_duration(121).build(),
			Err(ConfigError::TurnDurationOutOfRange(121))
		));
		assert!(GameConfig::builder().turn_duration(120).build().is_ok());
		assert!(matches!(
			GameConfig::builder().total_rounds(6).build(),
			Err(ConfigError::RoundsOutOfRange(6))
		));
		assert!(matches!(
			GameConfig::builder().pinch_threshold(f32::NAN).build(),
			Err(ConfigError::InvalidPinchThreshold(_))
		));
	}

	#[test]
	fn test_surface() {
		let surface = SurfaceConfig::builder()
			.width(64)
			.height(32)
			.stroke_color("red")
			.build()
			.unwrap();
		assert_eq!(surface.stroke_color(), Rgba::rgb(255, 0, 0));
		assert!(matches!(
			SurfaceConfig::builder().width(0).build(),
			Err(ConfigError::EmptySurface(0, 500))
		));
		assert!(matches!(
			SurfaceConfig::builder().background("blurple").build(),
			Err(ConfigError::InvalidColor(..))
		));
	}
}
