//! Turn and round progression.
//!
//! The scheduler is driven by two inputs: operations requested by the host (setup, start, reset)
//! and one-second ticks. Every phase change goes through [`Scheduler::transition`], which cancels
//! whatever timer the old phase owned before the new phase may arm its own. Observers learn about
//! changes through [`SessionEvent`]s, drained between handlers, so they never see a half-applied
//! tick.

use crate::archive::{Archive, DrawingImage};
use crate::config::{validate_rounds, validate_turn_duration, ConfigError, GameConfig};
use crate::engine::{Snapshot, SnapshotError, StrokeEngine};
use crate::roster::{PlayerId, Roster, RosterError};
use thiserror::Error;
use tracing::{debug, error, info, trace};

mod timer;
pub use timer::*;

pub const COUNTDOWN_TICKS: u32 = 3;

pub trait Canvas {
	fn snapshot(&self) -> Result<Snapshot, SnapshotError>;
	fn clear(&mut self);
}

impl Canvas for StrokeEngine {
	fn snapshot(&self) -> Result<Snapshot, SnapshotError> {
		StrokeEngine::snapshot(self)
	}

	fn clear(&mut self) {
		StrokeEngine::clear(self)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Phase {
	#[default]
	Waiting,
	Setup,
	Countdown,
	Drawing,
	TurnFinished,
	RoundFinished,
	GameFinished,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
	PhaseChanged { from: Phase, to: Phase },
	TurnStarted { player: PlayerId, round: u32 },
	Countdown(u32),
	TimeLeft(u32),
	DrawingEnabled(bool),
	DrawingRecorded {
		drawing: u32,
		player: PlayerId,
		round: u32,
		empty: bool,
		failed: bool,
	},
	Reset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
	pub phase: Phase,
	pub current_player: Option<PlayerId>,
	/// 1-based.
	pub current_round: u32,
	pub total_rounds: u32,
	pub turn_duration: u32,
	pub drawing_enabled: bool,
	pub countdown: u32,
	pub time_left: u32,
}

impl SessionState {
	pub fn new(config: &GameConfig) -> Self {
		Self {
			phase: Phase::Waiting,
			current_player: None,
			current_round: 1,
			total_rounds: config.total_rounds(),
			turn_duration: config.turn_duration(),
			drawing_enabled: false,
			countdown: COUNTDOWN_TICKS,
			time_left: config.turn_duration(),
		}
	}
}

impl Default for SessionState {
	fn default() -> Self {
		Self::new(&GameConfig::default())
	}
}

#[derive(Debug, Error)]
pub enum SchedulerError {
	#[error("cannot {operation} during {phase}")]
	WrongPhase {
		operation: &'static str,
		phase: Phase,
	},

	#[error("the current player is not on the roster")]
	NoCurrentPlayer,

	#[error(transparent)]
	Roster(#[from] RosterError),

	#[error(transparent)]
	Config(#[from] ConfigError),
}

static_assertions::assert_impl_all!(SchedulerError: std::error::Error, Send, Sync);

#[derive(Debug)]
pub struct Scheduler {
	state: SessionState,
	initial: SessionState,
	timer: Option<Timer>,
	generation: u64,
	events: Vec<SessionEvent>,
}

impl Default for Scheduler {
	fn default() -> Self {
		Self::new(&GameConfig::default())
	}
}

impl Scheduler {
	pub fn new(config: &GameConfig) -> Self {
		let state = SessionState::new(config);
		Self {
			initial: state.clone(),
			state,
			timer: None,
			generation: 0,
			events: Vec::new(),
		}
	}

	pub fn state(&self) -> &SessionState {
		&self.state
	}

	pub fn phase(&self) -> Phase {
		self.state.phase
	}

	pub fn drawing_enabled(&self) -> bool {
		self.state.drawing_enabled
	}

	pub fn timer(&self) -> Option<&Timer> {
		self.timer.as_ref()
	}

	pub fn drain_events(&mut self) -> Vec<SessionEvent> {
		std::mem::take(&mut self.events)
	}

	pub(crate) fn require(
		&self,
		operation: &'static str,
		allowed: &[Phase],
	) -> Result<(), SchedulerError> {
		if allowed.contains(&self.state.phase) {
			Ok(())
		} else {
			debug!(operation, phase = %self.state.phase, "rejected");
			Err(SchedulerError::WrongPhase {
				operation,
				phase: self.state.phase,
			})
		}
	}

	/// The only place `phase` and `timer` change.
	fn transition(&mut self, to: Phase, timer: Option<TimerKind>) {
		if let Some(cancelled) = self.timer.take() {
			trace!(kind = %cancelled.kind(), generation = cancelled.generation(), "timer cancelled");
		}
		let from = std::mem::replace(&mut self.state.phase, to);
		info!(%from, %to, "phase changed");
		self.events.push(SessionEvent::PhaseChanged { from, to });
		if let Some(kind) = timer {
			self.generation += 1;
			trace!(%kind, generation = self.generation, "timer armed");
			self.timer = Some(Timer::arm(kind, self.generation));
		}
	}

	fn set_drawing_enabled(&mut self, enabled: bool) {
		if self.state.drawing_enabled != enabled {
			self.state.drawing_enabled = enabled;
			self.events.push(SessionEvent::DrawingEnabled(enabled));
		}
	}

	pub fn open_setup(&mut self) -> Result<(), SchedulerError> {
		self.require("open setup", &[Phase::Waiting])?;
		self.transition(Phase::Setup, None);
		Ok(())
	}

	pub fn set_turn_duration(&mut self, seconds: u32) -> Result<(), SchedulerError> {
		self.require("change the turn duration", &[Phase::Waiting, Phase::Setup])?;
		self.state.turn_duration = validate_turn_duration(seconds)?;
		self.state.time_left = seconds;
		Ok(())
	}

	pub fn set_total_rounds(&mut self, rounds: u32) -> Result<(), SchedulerError> {
		self.require("change the round count", &[Phase::Waiting, Phase::Setup])?;
		self.state.total_rounds = validate_rounds(rounds)?;
		Ok(())
	}

	/// Assigns teams and begins the first countdown. The roster must have at least two players; on
	/// any error the scheduler stays in `Setup` and the roster is untouched.
	pub fn start(
		&mut self,
		roster: &mut Roster,
		rng: &mut fastrand::Rng,
	) -> Result<(), SchedulerError> {
		self.require("start", &[Phase::Setup])?;
		roster.ensure_playable()?;
		roster.assign_teams(rng);
		self.state.current_round = 1;
		self.enter_countdown(roster);
		Ok(())
	}

	fn enter_countdown(&mut self, roster: &Roster) {
		if self.state.current_player.is_none() {
			self.state.current_player = roster.next_player(None).map(|p| p.id);
		}
		self.set_drawing_enabled(false);
		self.state.countdown = COUNTDOWN_TICKS;
		self.state.time_left = self.state.turn_duration;
		self.transition(Phase::Countdown, Some(TimerKind::Countdown));
		if let Some(player) = self.state.current_player {
			self.events.push(SessionEvent::TurnStarted {
				player,
				round: self.state.current_round,
			});
		}
		self.events.push(SessionEvent::Countdown(self.state.countdown));
	}

	/// Applies one second of elapsed time. Does nothing when no timer is armed.
	pub fn tick(
		&mut self,
		roster: &Roster,
		archive: &mut Archive,
		canvas: &mut impl Canvas,
	) -> Result<(), SchedulerError> {
		let Some(kind) = self.timer.as_ref().map(Timer::kind) else {
			trace!(phase = %self.state.phase, "tick with no timer");
			return Ok(());
		};
		match kind {
			TimerKind::Countdown => {
				self.state.countdown = self.state.countdown.saturating_sub(1);
				self.events.push(SessionEvent::Countdown(self.state.countdown));
				if self.state.countdown == 0 {
					self.set_drawing_enabled(true);
					self.state.time_left = self.state.turn_duration;
					self.transition(Phase::Drawing, Some(TimerKind::Drawing));
					self.events.push(SessionEvent::TimeLeft(self.state.time_left));
				}
			}
			TimerKind::Drawing => {
				self.state.time_left = self.state.time_left.saturating_sub(1);
				self.events.push(SessionEvent::TimeLeft(self.state.time_left));
				if self.state.time_left == 0 {
					// The pen must be locked before the surface is captured.
					self.set_drawing_enabled(false);
					self.transition(Phase::TurnFinished, None);
					self.finish_turn(roster, archive, canvas)?;
				}
			}
			TimerKind::Intermission => self.enter_countdown(roster),
		}
		Ok(())
	}

	fn finish_turn(
		&mut self,
		roster: &Roster,
		archive: &mut Archive,
		canvas: &mut impl Canvas,
	) -> Result<(), SchedulerError> {
		let current = self.state.current_player;
		let Some(player) = current.and_then(|id| roster.get(id)) else {
			// No turn order to resume from.
			error!(?current, "turn finished without a current player");
			self.transition(Phase::GameFinished, None);
			return Err(SchedulerError::NoCurrentPlayer);
		};

		let image = DrawingImage::from(canvas.snapshot());
		if let DrawingImage::Failed(err) = &image {
			error!(%err, player = %player.id, "archiving turn without an image");
		}
		let round = self.state.current_round;
		let drawing = archive.record(player, round, image);
		self.events.push(SessionEvent::DrawingRecorded {
			drawing: drawing.id,
			player: player.id,
			round,
			empty: drawing.image.is_empty(),
			failed: drawing.image.is_failed(),
		});

		let wrapped = roster.is_last(player.id);
		self.state.current_player = roster.next_player(Some(player.id)).map(|p| p.id);

		let expected = roster.len() * self.state.total_rounds as usize;
		if archive.len() >= expected {
			self.transition(Phase::GameFinished, None);
			return Ok(());
		}

		canvas.clear();
		if wrapped {
			self.state.current_round += 1;
			self.transition(Phase::RoundFinished, Some(TimerKind::Intermission));
		} else {
			self.enter_countdown(roster);
		}
		Ok(())
	}

	pub fn reset(&mut self, roster: &mut Roster, archive: &mut Archive, canvas: &mut impl Canvas) {
		if let Some(cancelled) = self.timer.take() {
			trace!(kind = %cancelled.kind(), "timer cancelled by reset");
		}
		let from = self.state.phase;
		self.state = self.initial.clone();
		roster.clear();
		archive.clear();
		canvas.clear();
		info!(%from, "session reset");
		self.events.push(SessionEvent::Reset);
		if from != Phase::Waiting {
			self.events.push(SessionEvent::PhaseChanged {
				from,
				to: Phase::Waiting,
			});
		}
	}
}
