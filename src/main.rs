use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use cuedeck::audio::{self, AudioHandle};
use cuedeck::config;
use cuedeck::shared::InputEvent;
use cuedeck::tui;
use cuedeck::Middle;

// used to size silent clips when there is no device to ask
const FALLBACK_SAMPLE_RATE: u32 = 44100;

/// Terminal 8-track player and lie-detector sound board.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory holding cuedeck.json and the WAVs it names (defaults to the current directory)
    dir: Option<PathBuf>,

    /// Run the controls without opening an audio device
    #[arg(long)]
    no_audio: bool,
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("no current directory")?,
    };
    let config = config::load_config(&config_dir)
        .with_context(|| format!("reading config in {}", config_dir.display()))?;

    let audio: Option<AudioHandle> = if cli.no_audio {
        None
    } else {
        match audio::start_audio() {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("audio unavailable, running silent: {e:#}");
                None
            }
        }
    };
    let sample_rate = audio.as_ref().map_or(FALLBACK_SAMPLE_RATE, |a| a.sample_rate());

    let deck = Middle::from_config(&config, &config_dir, sample_rate, audio.as_ref().map(|a| a.sender()))
        .context("building deck")?;
    let mut middle = deck.middle;
    if let Some(audio) = &audio {
        for cmd in deck.registrations {
            audio.send(cmd);
        }
    }

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = config.tick_rate();
    let mut last_tick = Instant::now();
    let blink_start = Instant::now();
    let mut tui_state = tui::mode::TuiState::default();

    loop {
        let blink_on = (blink_start.elapsed().as_millis() / 250) % 2 == 0;
        let ds = middle.display_state();

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, &tui_state, blink_on);
        })?;

        let events = tui::input::poll_input(tick_rate, &mut tui_state)?;
        for event in events {
            if event == InputEvent::Quit {
                log::info!("quit");
                return Ok(());
            }
            middle.handle_input(event);
        }

        let elapsed = last_tick.elapsed().as_secs_f64();
        last_tick = Instant::now();
        middle.tick(elapsed);
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
