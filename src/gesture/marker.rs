use super::{HandIndex, WRIST};
use crate::util::Rgba;

const FINGER_TIPS: [usize; 5] = [4, 8, 12, 16, 20];
const MIDDLE_JOINTS: [usize; 5] = [3, 6, 10, 14, 18];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LandmarkKind {
	Wrist,
	FingerTip,
	Joint,
	Other,
}

impl LandmarkKind {
	pub fn of(index: usize) -> Self {
		match index {
			WRIST => Self::Wrist,
			i if FINGER_TIPS.contains(&i) => Self::FingerTip,
			i if MIDDLE_JOINTS.contains(&i) => Self::Joint,
			_ => Self::Other,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
	pub fill: Rgba,
	pub radius: f32,
	pub outline: Rgba,
}

pub fn hand_color(hand: HandIndex) -> Rgba {
	match hand.0 {
		0 => Rgba::rgb(0x00, 0xff, 0x00),
		_ => Rgba::rgb(0xff, 0x88, 0x00),
	}
}

impl MarkerStyle {
	pub fn for_landmark(hand: HandIndex, index: usize) -> Self {
		let (fill, radius) = match LandmarkKind::of(index) {
			LandmarkKind::Wrist => (Rgba::rgb(0xff, 0x00, 0xff), 4.0),
			LandmarkKind::FingerTip => (Rgba::rgb(0xff, 0xff, 0x00), 3.0),
			LandmarkKind::Joint => (Rgba::rgb(0x00, 0xff, 0xff), 2.0),
			LandmarkKind::Other => (hand_color(hand), 2.0),
		};
		Self {
			fill,
			radius,
			outline: Rgba::BLACK,
		}
	}
}
