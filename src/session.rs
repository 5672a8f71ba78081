use crate::archive::Archive;
use crate::config::{ConfigError, GameConfig};
use crate::engine::{DrawTarget, StrokeEngine};
use crate::gesture::{FrameSummary, GestureInterpreter, HandObservation, Landmark};
use crate::roster::{Player, PlayerId, Roster, RosterError};
use crate::scheduler::{Phase, Scheduler, SchedulerError, SessionEvent, SessionState};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum GameError {
	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Roster(#[from] RosterError),

	#[error(transparent)]
	Scheduler(#[from] SchedulerError),

	#[error("drawing is not enabled")]
	DrawingDisabled,
}

static_assertions::assert_impl_all!(GameError: std::error::Error, Send, Sync);

/// One game session: the only owner of every component. Frames and ticks are handled to
/// completion, one at a time.
pub struct Game {
	config: GameConfig,
	interpreter: GestureInterpreter,
	strokes: StrokeEngine,
	scheduler: Scheduler,
	roster: Roster,
	archive: Archive,
	last_hands: Vec<HandObservation>,
	rng: fastrand::Rng,
}

impl Game {
	pub fn new(config: GameConfig) -> Self {
		Self::with_rng(config, fastrand::Rng::new())
	}

	/// A game whose team assignment is reproducible.
	pub fn with_seed(config: GameConfig, seed: u64) -> Self {
		Self::with_rng(config, fastrand::Rng::with_seed(seed))
	}

	fn with_rng(config: GameConfig, rng: fastrand::Rng) -> Self {
		Self {
			interpreter: GestureInterpreter::new(config.pinch_threshold()),
			strokes: StrokeEngine::new(config.surface()),
			scheduler: Scheduler::new(&config),
			roster: Roster::new(),
			archive: Archive::new(),
			last_hands: Vec::new(),
			rng,
			config,
		}
	}

	pub fn config(&self) -> &GameConfig {
		&self.config
	}

	pub fn state(&self) -> &SessionState {
		self.scheduler.state()
	}

	pub fn phase(&self) -> Phase {
		self.scheduler.phase()
	}

	pub fn scheduler(&self) -> &Scheduler {
		&self.scheduler
	}

	pub fn roster(&self) -> &Roster {
		&self.roster
	}

	pub fn archive(&self) -> &Archive {
		&self.archive
	}

	pub fn strokes(&self) -> &StrokeEngine {
		&self.strokes
	}

	pub fn last_hands(&self) -> &[HandObservation] {
		&self.last_hands
	}

	pub fn current_player(&self) -> Option<&Player> {
		self
			.state()
			.current_player
			.and_then(|id| self.roster.get(id))
	}

	pub fn open_setup(&mut self) -> Result<(), GameError> {
		Ok(self.scheduler.open_setup()?)
	}

	pub fn add_player(&mut self, name: &str) -> Result<PlayerId, GameError> {
		if self.phase() == Phase::Waiting {
			self.scheduler.open_setup()?;
		}
		self.scheduler.require("add a player", &[Phase::Setup])?;
		Ok(self.roster.add_player(name)?)
	}

	pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, GameError> {
		self.scheduler.require("remove a player", &[Phase::Setup])?;
		Ok(self.roster.remove_player(id)?)
	}

	pub fn set_turn_duration(&mut self, seconds: u32) -> Result<(), GameError> {
		Ok(self.scheduler.set_turn_duration(seconds)?)
	}

	pub fn set_total_rounds(&mut self, rounds: u32) -> Result<(), GameError> {
		Ok(self.scheduler.set_total_rounds(rounds)?)
	}

	pub fn start(&mut self) -> Result<(), GameError> {
		self.scheduler.start(&mut self.roster, &mut self.rng)?;
		self.strokes.clear();
		Ok(())
	}

	pub fn on_frame<H: AsRef<[Landmark]>>(&mut self, frame: &[H]) -> FrameSummary {
		let hands = self.interpreter.interpret(frame);
		let appended = self
			.strokes
			.process_frame(&hands, self.scheduler.drawing_enabled());
		let summary = FrameSummary::of(&hands);
		trace!(hands = summary.hand_count, appended, "frame");
		self.last_hands = hands;
		summary
	}

	pub fn tick(&mut self) -> Result<(), GameError> {
		Ok(self
			.scheduler
			.tick(&self.roster, &mut self.archive, &mut self.strokes)?)
	}

	pub fn clear_canvas(&mut self) -> Result<(), GameError> {
		if !self.scheduler.drawing_enabled() {
			debug!(phase = %self.phase(), "clear rejected");
			return Err(GameError::DrawingDisabled);
		}
		self.strokes.clear();
		Ok(())
	}

	pub fn reset(&mut self) {
		self
			.scheduler
			.reset(&mut self.roster, &mut self.archive, &mut self.strokes);
		self.last_hands.clear();
	}

	pub fn drain_events(&mut self) -> Vec<SessionEvent> {
		self.scheduler.drain_events()
	}

	pub fn preview(&self, target: &mut impl DrawTarget) {
		self.strokes.render_preview(&self.last_hands, target);
	}
}
