use crate::engine::{Snapshot, SnapshotError};
use crate::roster::{Player, PlayerId, Team};
use itertools::Itertools;
use std::time::SystemTime;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawingImage {
	Image(Snapshot),
	NothingDrawn,
	/// The surface had strokes but could not be encoded.
	Failed(SnapshotError),
}

impl DrawingImage {
	pub fn snapshot(&self) -> Option<&Snapshot> {
		match self {
			Self::Image(snapshot) => Some(snapshot),
			_ => None,
		}
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, Self::NothingDrawn)
	}

	pub fn is_failed(&self) -> bool {
		matches!(self, Self::Failed(_))
	}
}

impl From<Result<Snapshot, SnapshotError>> for DrawingImage {
	fn from(result: Result<Snapshot, SnapshotError>) -> Self {
		match result {
			Ok(snapshot) => Self::Image(snapshot),
			Err(SnapshotError::NothingDrawn) => Self::NothingDrawn,
			Err(err) => Self::Failed(err),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Drawing {
	pub id: u32,
	pub player_id: PlayerId,
	pub player_name: String,
	pub team: Team,
	pub round: u32,
	pub image: DrawingImage,
	pub timestamp: SystemTime,
}

/// Append-only record of finished turns, in the order they were played.
#[derive(Clone, Debug, Default)]
pub struct Archive {
	drawings: Vec<Drawing>,
}

impl Archive {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&mut self, player: &Player, round: u32, image: DrawingImage) -> &Drawing {
		let drawing = Drawing {
			id: self.drawings.len() as u32,
			player_id: player.id,
			player_name: player.name.clone(),
			team: player.team,
			round,
			image,
			timestamp: SystemTime::now(),
		};
		info!(
			player = %drawing.player_id,
			round,
			empty = drawing.image.is_empty(),
			failed = drawing.image.is_failed(),
			"recorded drawing"
		);
		self.drawings.push(drawing);
		&self.drawings[self.drawings.len() - 1]
	}

	pub fn drawings(&self) -> &[Drawing] {
		&self.drawings
	}

	pub fn len(&self) -> usize {
		self.drawings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.drawings.is_empty()
	}

	pub fn by_team(&self, team: Team) -> impl Iterator<Item = &Drawing> {
		self.drawings.iter().filter(move |d| d.team == team)
	}

	pub fn by_round(&self, round: u32) -> impl Iterator<Item = &Drawing> {
		self.drawings.iter().filter(move |d| d.round == round)
	}

	pub fn by_player(&self, player: PlayerId) -> impl Iterator<Item = &Drawing> {
		self.drawings.iter().filter(move |d| d.player_id == player)
	}

	/// Rounds that have at least one drawing, ascending.
	pub fn rounds(&self) -> Vec<u32> {
		self.drawings.iter().map(|d| d.round).unique().sorted().collect()
	}

	pub(crate) fn clear(&mut self) {
		self.drawings.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::Raster;
	use crate::util::Rgba;

	fn player(id: u32, team: Team) -> Player {
		Player {
			id: PlayerId(id),
			name: format!("p{id}"),
			team,
		}
	}

	#[test]
	fn test_record() {
		let mut archive = Archive::new();
		let image = Snapshot::encode(&Raster::new(2, 2, Rgba::WHITE)).unwrap();
		let drawing = archive.record(&player(3, Team::B), 1, Ok(image.clone()).into());
		assert_eq!(drawing.id, 0);
		assert_eq!(drawing.player_id, PlayerId(3));
		assert_eq!(drawing.player_name, "p3");
		assert_eq!(drawing.team, Team::B);
		assert_eq!(drawing.image.snapshot(), Some(&image));
		assert_eq!(
			archive.record(&player(4, Team::A), 1, DrawingImage::NothingDrawn).id,
			1
		);
		assert_eq!(archive.len(), 2);
	}

	#[test]
	fn test_image_from_snapshot_result() {
		let image = DrawingImage::from(Err(SnapshotError::NothingDrawn));
		assert!(image.is_empty());
		assert!(!image.is_failed());

		let err = SnapshotError::Encode("bad buffer".to_owned());
		let image = DrawingImage::from(Err(err.clone()));
		assert_eq!(image, DrawingImage::Failed(err));
		assert!(!image.is_empty());
		assert!(image.is_failed());
		assert_eq!(image.snapshot(), None);
	}

	#[test]
	fn test_grouping() {
		let mut archive = Archive::new();
		let (a, b) = (player(0, Team::A), player(1, Team::B));
		for round in 1..=3 {
			archive.record(&a, round, DrawingImage::NothingDrawn);
			archive.record(&b, round, DrawingImage::NothingDrawn);
		}
		assert_eq!(archive.rounds(), vec![1, 2, 3]);
		assert_eq!(archive.by_team(Team::A).count(), 3);
		assert!(archive.by_team(Team::B).all(|d| d.player_id == b.id));
		assert_eq!(
			archive.by_round(2).map(|d| d.player_id).collect_vec(),
			vec![a.id, b.id]
		);
		assert_eq!(archive.by_player(a.id).map(|d| d.round).collect_vec(), vec![1, 2, 3]);
	}
}
