use crate::config::{MAX_PLAYERS, MIN_PLAYERS};
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("player {_0}")]
pub struct PlayerId(pub u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum Team {
	#[default]
	A,
	B,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
	pub id: PlayerId,
	pub name: String,
	/// Team A until teams are assigned at the start of the game.
	pub team: Team,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RosterError {
	#[error("roster is full ({max} players)", max = MAX_PLAYERS)]
	Full,

	#[error("player name is empty")]
	EmptyName,

	#[error("no such player: {0}")]
	UnknownPlayer(PlayerId),

	#[error("need at least {min} players, have {0}", min = MIN_PLAYERS)]
	TooSmall(usize),
}

static_assertions::assert_impl_all!(RosterError: std::error::Error, Send, Sync);

/// Players in turn order. Once teams are assigned, every team A player precedes every team B
/// player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
	players: Vec<Player>,
	next_id: u32,
}

impl Roster {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn players(&self) -> &[Player] {
		&self.players
	}

	pub fn len(&self) -> usize {
		self.players.len()
	}

	pub fn is_empty(&self) -> bool {
		self.players.is_empty()
	}

	pub fn get(&self, id: PlayerId) -> Option<&Player> {
		self.players.iter().find(|p| p.id == id)
	}

	fn position(&self, id: PlayerId) -> Option<usize> {
		self.players.iter().position(|p| p.id == id)
	}

	pub fn team(&self, team: Team) -> impl Iterator<Item = &Player> {
		self.players.iter().filter(move |p| p.team == team)
	}

	pub fn add_player(&mut self, name: &str) -> Result<PlayerId, RosterError> {
		let name = name.trim();
		if name.is_empty() {
			return Err(RosterError::EmptyName);
		}
		if self.players.len() >= MAX_PLAYERS {
			debug!(name, "roster full");
			return Err(RosterError::Full);
		}
		let id = PlayerId(self.next_id);
		self.next_id += 1;
		self.players.push(Player {
			id,
			name: name.to_owned(),
			team: Team::default(),
		});
		debug!(%id, name, "added player");
		Ok(id)
	}

	pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, RosterError> {
		let index = self.position(id).ok_or(RosterError::UnknownPlayer(id))?;
		debug!(%id, "removed player");
		Ok(self.players.remove(index))
	}

	pub fn ensure_playable(&self) -> Result<(), RosterError> {
		if self.players.len() < MIN_PLAYERS {
			return Err(RosterError::TooSmall(self.players.len()));
		}
		Ok(())
	}

	/// Shuffles the roster uniformly and splits it in two, team A taking the extra player of an
	/// odd count.
	pub fn assign_teams(&mut self, rng: &mut fastrand::Rng) {
		rng.shuffle(&mut self.players);
		let team_a = self.players.len().div_ceil(2);
		for (index, player) in self.players.iter_mut().enumerate() {
			player.team = if index < team_a { Team::A } else { Team::B };
		}
		debug!(team_a, team_b = self.players.len() - team_a, "assigned teams");
	}

	/// The player after `current` in turn order, wrapping around. The first player when `current`
	/// is `None` or no longer on the roster.
	pub fn next_player(&self, current: Option<PlayerId>) -> Option<&Player> {
		let next = current
			.and_then(|id| self.position(id))
			.map_or(0, |index| (index + 1) % self.players.len());
		self.players.get(next)
	}

	pub fn is_last(&self, id: PlayerId) -> bool {
		self.players.last().is_some_and(|p| p.id == id)
	}

	pub fn clear(&mut self) {
		*self = Self::default();
	}
}
