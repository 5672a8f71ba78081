use anyhow::Context;
use clap::Parser;
use glam::vec2;
use pincel::archive::Drawing;
use pincel::config::{GameConfig, DEFAULT_ROUNDS};
use pincel::detector::{LandmarkSource, RawHand, ScriptedSource};
use pincel::roster::Team;
use pincel::scheduler::{Phase, SessionEvent, Ticker, TICK};
use pincel::Game;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

#[derive(thiserror::Error, Debug)]
#[error("no global tracing subscriber set")]
struct NoTracingSubscriber;

fn configure_tracing() -> anyhow::Result<()> {
	let result = Err(NoTracingSubscriber);

	let result = result.or_else(|_| {
		let max_level = if cfg!(debug_assertions) {
			tracing::Level::TRACE
		} else {
			tracing::Level::INFO
		};
		tracing::subscriber::set_global_default(
			tracing_subscriber::FmtSubscriber::builder()
				.with_max_level(max_level)
				.finish(),
		)
	});

	Ok(result?)
}

fn configure_logging() -> anyhow::Result<()> {
	configure_tracing()?;

	// Redirect `log` (used by zune-image) to `tracing`.
	#[cfg(feature = "log")]
	tracing_log::LogTracer::init()?;
	Ok(())
}

/// Plays a whole game with a simulated detector scribbling on every turn.
#[derive(Parser, Debug)]
#[command(name = "pincel", version, about)]
struct Args {
	/// Seconds per turn.
	#[arg(long, default_value_t = 5)]
	turn_seconds: u32,

	#[arg(long, default_value_t = DEFAULT_ROUNDS)]
	rounds: u32,

	#[arg(long, value_delimiter = ',', default_values = ["Ana", "Bo", "Cai", "Dee"])]
	players: Vec<String>,

	/// Seed for team assignment and the simulated hands.
	#[arg(long)]
	seed: Option<u64>,

	/// Detector frames per second.
	#[arg(long, default_value_t = 15)]
	fps: u32,

	/// Write every finished drawing as a PNG into this directory.
	#[arg(long)]
	out: Option<PathBuf>,

	/// Run against the wall clock instead of as fast as possible.
	#[arg(long)]
	realtime: bool,
}

fn next_frame(source: &mut ScriptedSource, rng: &mut fastrand::Rng, length: usize) -> Vec<RawHand> {
	loop {
		if let Some(frame) = source.next_frame() {
			return frame;
		}
		let start = vec2(rng.f32(), rng.f32());
		*source = ScriptedSource::new()
			.scribble(rng, start, length)
			.no_hands(rng.usize(1..4));
	}
}

fn report(game: &mut Game) {
	for event in game.drain_events() {
		match event {
			SessionEvent::TurnStarted { player, round } => {
				let name = game.roster().get(player).map_or("?", |p| p.name.as_str());
				info!(round, "{name} is up");
			}
			SessionEvent::DrawingRecorded {
				player,
				round,
				empty,
				failed,
				..
			} => info!(%player, round, empty, failed, "turn over"),
			SessionEvent::PhaseChanged { from, to } => debug!(%from, %to),
			event => debug!(?event),
		}
	}
}

fn drawing_file_name(drawing: &Drawing) -> String {
	format!("round{}-player{}.png", drawing.round, drawing.player_id.0)
}

fn write_drawings(game: &Game, out: &Path) -> anyhow::Result<()> {
	std::fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
	for drawing in game.archive().drawings() {
		let Some(image) = drawing.image.snapshot() else {
			continue;
		};
		let path = out.join(drawing_file_name(drawing));
		std::fs::write(&path, image.png()).with_context(|| format!("writing {}", path.display()))?;
		info!(path = %path.display(), "saved drawing");
	}
	Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
	let config = GameConfig::builder()
		.turn_duration(args.turn_seconds)
		.total_rounds(args.rounds)
		.build()?;
	let seed = args.seed.unwrap_or_else(|| fastrand::u64(..));
	info!(seed, "starting session");

	let mut game = Game::with_seed(config, seed);
	for name in &args.players {
		game.add_player(name)?;
	}
	game.start()?;
	report(&mut game);

	let fps = args.fps.max(1);
	let mut rng = fastrand::Rng::with_seed(seed);
	let mut source = ScriptedSource::new();
	let mut ticker = Ticker::new(Instant::now());
	while game.phase() != Phase::GameFinished {
		for _ in 0..fps {
			let frame = next_frame(&mut source, &mut rng, 2 * fps as usize);
			game.on_frame(&frame);
			if args.realtime {
				std::thread::sleep(TICK / fps);
			}
		}
		let ticks = if args.realtime {
			ticker.poll(Instant::now())
		} else {
			1
		};
		for _ in 0..ticks {
			game.tick()?;
		}
		report(&mut game);
	}

	for team in [Team::A, Team::B] {
		let drawings = game.archive().by_team(team).collect::<Vec<_>>();
		let drawn = drawings
			.iter()
			.filter(|d| d.image.snapshot().is_some())
			.count();
		println!("Team {team}: {drawn}/{} drawings", drawings.len());
		for drawing in drawings {
			let size = drawing.image.snapshot().map_or(0, |image| image.png().len());
			println!(
				"  round {} {:<12} {size} bytes",
				drawing.round, drawing.player_name
			);
		}
	}

	if let Some(out) = &args.out {
		write_drawings(&game, out)?;
	}
	Ok(())
}

fn main() -> anyhow::Result<()> {
	if let Err(error) = configure_logging() {
		// We can technically continue without logging.
		tracing::error!(error = error.to_string());
	}

	run(Args::parse())
}
