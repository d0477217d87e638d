mod display;

use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use tankz::compute::{final_score, handle_event, init_state, tick, EventOutcome, InputEvent};
use tankz::config::GameConfig;
use tankz::entities::GameStatus;
use tankz::highscore::HighScoreLog;
use tankz::input::{map_key, KeyTracker};
use tankz::render::draw_frame;

use display::TerminalCanvas;

const CONFIG_PATH: &str = "assets/tankz.json";
const HIGH_SCORE_PATH: &str = "assets/highscores.txt";
const LOG_PATH: &str = "tankz.log";

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the renderer, so logs go to a file.
fn init_tracing() -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_PATH)
        .with_context(|| format!("open log file {LOG_PATH}"))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    std::panic::set_hook(Box::new(|info| {
        let _ = terminal::disable_raw_mode();
        let _ = stdout().execute(terminal::LeaveAlternateScreen);
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    scores: &HighScoreLog,
) -> Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "T A N K Z";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(8),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let history = match scores.read_all() {
        Ok(lines) => lines,
        Err(e) => {
            tracing::warn!(error = %e, "could not read high scores");
            Vec::new()
        }
    };
    if !history.is_empty() {
        out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(6)))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print("Recent scores:"))?;
        for (i, line) in history.iter().rev().take(5).enumerate() {
            out.queue(cursor::MoveTo(cx.saturating_sub(8), cy.saturating_sub(5) + i as u16))?;
            out.queue(Print(line))?;
        }
    }

    match scores.best() {
        Ok(Some(best)) => {
            let text = format!("Best score: {best}");
            out.queue(cursor::MoveTo(
                cx.saturating_sub(text.chars().count() as u16 / 2),
                cy.saturating_sub(7),
            ))?;
            out.queue(style::SetForegroundColor(Color::Yellow))?;
            out.queue(Print(text))?;
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not read best score"),
    }

    let controls: &[(&str, &str)] = &[
        ("A / D", "Move (limited distance per turn)"),
        ("Q / E", "Rotate cannon"),
        ("SPACE", "Start charging, again to fire"),
        ("Click", "Blast the terrain"),
        ("ESC", "Quit"),
    ];
    for (i, (keys, desc)) in controls.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(20), cy + 1 + i as u16))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(format!("{:<7}", keys)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" - {}", desc)))?;
    }

    let hint = "ENTER - Start   ESC - Quit";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(hint.chars().count() as u16 / 2),
        cy + 8,
    ))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(hint))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        {
            match code {
                KeyCode::Enter => return Ok(MenuResult::Start),
                KeyCode::Esc => return Ok(MenuResult::Quit),
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program, `false` → back to menu.
///
/// One thread does everything in strict sequence each frame: drain input,
/// apply it, advance the simulation, draw, then sleep out the rest of the
/// frame.
fn game_loop<W: Write>(
    canvas: &mut TerminalCanvas<W>,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    enhanced: bool,
    scores: &HighScoreLog,
) -> Result<bool> {
    let mut rng = thread_rng();
    let mut state = init_state(config.clone());
    let mut keys = KeyTracker::new(enhanced);
    let frame = config.game_loop.frame();
    let mut recorded = false;

    canvas.out_mut().queue(terminal::Clear(terminal::ClearType::All))?;
    tracing::info!(ticks_per_second = config.game_loop.ticks_per_second, "match started");

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let mut events: Vec<InputEvent> = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => {
                    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(true);
                    }
                    if state.status != GameStatus::Playing && kind == KeyEventKind::Press {
                        match code {
                            KeyCode::Enter => return Ok(false),
                            KeyCode::Esc => return Ok(true),
                            _ => continue,
                        }
                    }
                    if let Some(key) = map_key(code) {
                        events.extend(keys.on_key(key, kind, frame_start));
                    }
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(_),
                    column,
                    row,
                    ..
                }) => {
                    let (x, y) = canvas.to_world(column, row);
                    events.push(InputEvent::Click { x, y });
                }
                Event::Resize(cols, rows) => canvas.resize(cols, rows),
                _ => {}
            }
        }
        events.extend(keys.expire(frame_start));

        for event in events {
            if handle_event(&mut state, event, Instant::now(), &mut rng) == EventOutcome::Quit {
                return Ok(true);
            }
        }

        tick(&mut state, &mut rng);

        if !recorded && state.status != GameStatus::Playing {
            recorded = true;
            if let Some(score) = final_score(&state) {
                if let Err(e) = scores.append(score) {
                    tracing::warn!(error = %e, "could not record high score");
                }
            }
        }

        draw_frame(canvas, &state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing()?;
    let config = GameConfig::load_or_default(CONFIG_PATH).context("load game config")?;
    let scores = HighScoreLog::new(HIGH_SCORE_PATH);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to KeyTracker's
    // hold window.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    tracing::info!(keyboard_enhanced, "terminal ready");

    // Blocking event reads live on their own thread so the game loop never
    // blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let (cols, rows) = terminal::size()?;
    let mut canvas = TerminalCanvas::new(out, cols, rows, config.world.width, config.world.height);

    let result = run(&mut canvas, &rx, &config, keyboard_enhanced, &scores);

    // Always restore the terminal
    let out = canvas.out_mut();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!(error = %e, "exiting with error");
    }
    result
}

fn run<W: Write>(
    canvas: &mut TerminalCanvas<W>,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    enhanced: bool,
    scores: &HighScoreLog,
) -> Result<()> {
    loop {
        match show_menu(canvas.out_mut(), rx, scores)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                if game_loop(canvas, rx, config, enhanced, scores)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
