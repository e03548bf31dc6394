//! # Greenthumb TUI
//!
//! Terminal user interface for the plant assistant.
//!
//! Usage: `cargo run --features tui --bin greenthumb-tui`

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotenvy::dotenv;
use log::{error, info};
use ratatui::prelude::*;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

use greenthumb::core::{user_message, InputError};
use greenthumb::features::speech::SpeechCapture;
use greenthumb::tui::app::{InputMode, InputPurpose};
use greenthumb::tui::event::{map_key_event, KeyAction};
use greenthumb::tui::{App, Event, EventHandler, Screen};
use greenthumb::{ChatMessage, Config, PlantAssistant, QueuedAlert};

/// TUI refresh rate
const TICK_RATE: Duration = Duration::from_millis(250);

type SharedAssistant = Arc<Mutex<PlantAssistant>>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Logs would draw over the screen, so stay quiet unless asked
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    info!("Starting Greenthumb TUI...");

    let config = Config::from_env()?;
    let alerts = QueuedAlert::new();
    let mut assistant = PlantAssistant::from_config(&config, Arc::new(alerts.clone()))?;

    let mut app = App::new();
    if let Err(e) = assistant.startup().await {
        app.error_message = Some(user_message(&e));
    }
    app.sync(&assistant);
    app.push_alerts(alerts.drain());
    let assistant: SharedAssistant = Arc::new(Mutex::new(assistant));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (mut events, event_tx) = EventHandler::new(TICK_RATE);

    // Main loop
    let result = run_app(&mut terminal, &mut app, &mut events, &event_tx, &assistant, &alerts).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        error!("Application error: {e}");
        return Err(e);
    }

    info!("Greenthumb TUI shutdown complete");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    tx: &mpsc::UnboundedSender<Event>,
    assistant: &SharedAssistant,
    alerts: &QueuedAlert,
) -> Result<()> {
    loop {
        app.push_alerts(alerts.drain());

        terminal.draw(|frame| {
            greenthumb::tui::ui::render(frame, app);
        })?;

        let Some(event) = events.next().await else {
            break;
        };

        match event {
            Event::Key(key) => {
                if is_force_quit(&key) {
                    app.should_quit = true;
                } else if app.pending.is_some() {
                    // Input is disabled until the outstanding call resolves
                } else if app.listening.is_some() {
                    if key.code == KeyCode::Esc {
                        app.stop_listening();
                    }
                } else {
                    let action = map_key_event(key, app.input_mode == InputMode::Editing);
                    handle_action(app, action, assistant, tx).await;
                }
            }
            Event::Done(result) => {
                app.finish_pending(result);
                app.chat_scroll = 0;
                let assistant = assistant.lock().await;
                app.sync(&assistant);
            }
            Event::Transcript(transcript_event) => {
                app.apply_transcript(transcript_event);
            }
            Event::Tick | Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn is_force_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Run an assistant call in the background and report back through `Event::Done`
fn spawn_call<F, Fut>(
    app: &mut App,
    label: &str,
    assistant: &SharedAssistant,
    tx: &mpsc::UnboundedSender<Event>,
    call: F,
) where
    F: FnOnce(SharedAssistant) -> Fut,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    app.start_pending(label);
    let future = call(assistant.clone());
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = future.await.map_err(|e| user_message(&e));
        let _ = tx.send(Event::Done(result));
    });
}

async fn handle_action(
    app: &mut App,
    action: KeyAction,
    assistant: &SharedAssistant,
    tx: &mpsc::UnboundedSender<Event>,
) {
    match action {
        KeyAction::Quit => {
            app.should_quit = true;
        }
        KeyAction::SwitchScreen(screen) => {
            app.switch_screen(screen);
            app.clear_error();
            app.clear_status();
            app.sync(&*assistant.lock().await);
        }
        KeyAction::Up => match app.current_screen {
            Screen::Reminders => app.select_previous(),
            _ => app.scroll_up(1),
        },
        KeyAction::Down => match app.current_screen {
            Screen::Reminders => app.select_next(),
            _ => app.scroll_down(1),
        },
        KeyAction::PageUp => app.scroll_up(10),
        KeyAction::PageDown => app.scroll_down(10),
        KeyAction::Back => {
            app.clear_error();
            app.clear_status();
        }
        KeyAction::StartMessageInput => app.start_input(InputPurpose::Message),
        KeyAction::ChoosePhoto => app.start_input(InputPurpose::ImagePath),
        KeyAction::StartReminderInput => {
            if app.plant_name.is_some() {
                app.start_input(InputPurpose::Interval);
            } else {
                app.error_message = Some(InputError::NoPlantIdentified.to_string());
            }
        }
        KeyAction::Listen => {
            if app.has_voice {
                app.start_input(InputPurpose::AudioPath);
            } else {
                app.error_message = Some(InputError::SpeechUnavailable.to_string());
            }
        }
        KeyAction::Identify => {
            app.switch_screen(Screen::Chat);
            spawn_call(app, "Identifying your plant...", assistant, tx, |assistant| async move {
                let mut assistant = assistant.lock().await;
                let result = assistant.identify().await?;
                Ok(match result.plant_name {
                    Some(name) => format!("Identified: {name}"),
                    None => "Identified, but no plant name was found".to_string(),
                })
            });
        }
        KeyAction::Share => {
            let assistant = assistant.lock().await;
            match assistant.share() {
                Ok(location) => app.status_message = Some(format!("📤 Shared to {location}")),
                Err(e) => app.error_message = Some(user_message(&e)),
            }
        }
        KeyAction::Delete => {
            if app.current_screen != Screen::Reminders {
                return;
            }
            let Some(row) = app.selected_reminder().cloned() else {
                return;
            };
            let assistant = assistant.lock().await;
            match assistant.delete_reminder(&row.plant_name) {
                Ok(()) => app.status_message = Some(format!("Removed reminder for {}", row.plant_name)),
                Err(e) => app.error_message = Some(user_message(&e)),
            }
            app.sync(&assistant);
        }
        KeyAction::Refresh => {
            let assistant = assistant.lock().await;
            let check = assistant.refresh_reminders();
            app.sync(&assistant);
            if check.alerted.is_empty() {
                app.status_message = Some(format!("{} reminder(s), none due", check.reminders.len()));
            }
        }
        KeyAction::Reset => {
            let mut assistant = assistant.lock().await;
            assistant.reset();
            app.sync(&assistant);
            app.chat_scroll = 0;
            app.status_message = Some("Starting over. Press p to choose a photo.".to_string());
        }
        KeyAction::SubmitInput => submit_input(app, assistant, tx).await,
        KeyAction::CancelInput => app.stop_editing(),
        KeyAction::Char(c) => app.input_char(c),
        KeyAction::Backspace => app.input_backspace(),
        KeyAction::None => {}
    }
}

async fn submit_input(app: &mut App, assistant: &SharedAssistant, tx: &mpsc::UnboundedSender<Event>) {
    let purpose = app.input_purpose;
    let text = app.take_input();

    match purpose {
        InputPurpose::Message => {
            if text.is_empty() {
                app.error_message = Some(InputError::EmptyMessage.to_string());
                return;
            }
            // Shown right away; the next sync drops it again if the send fails
            app.messages.push(ChatMessage::user(text.clone()));
            app.chat_scroll = 0;
            spawn_call(app, "Thinking...", assistant, tx, |assistant| async move {
                let mut assistant = assistant.lock().await;
                assistant.send(&text).await?;
                Ok(String::new())
            });
        }
        InputPurpose::ImagePath => {
            let path = PathBuf::from(text);
            spawn_call(app, "Loading photo...", assistant, tx, |assistant| async move {
                let mut assistant = assistant.lock().await;
                assistant.select_image_file(&path).await?;
                Ok("Photo selected. Press f to identify it.".to_string())
            });
        }
        InputPurpose::Interval => {
            let assistant = assistant.lock().await;
            match assistant.save_reminder(&text) {
                Ok(_) => {
                    app.sync(&assistant);
                    app.status_message = assistant
                        .reminder_for_current_plant()
                        .map(|r| format!("⏰ {}", r.describe(assistant.now())));
                }
                Err(e) => app.error_message = Some(user_message(&e)),
            }
        }
        InputPurpose::AudioPath => {
            if let Err(e) = start_listening(app, assistant, tx, PathBuf::from(text)).await {
                app.error_message = Some(user_message(&e));
            }
        }
    }
}

/// Start a capture and forward its events to the main loop
async fn start_listening(
    app: &mut App,
    assistant: &SharedAssistant,
    tx: &mpsc::UnboundedSender<Event>,
    path: PathBuf,
) -> Result<()> {
    let capture = assistant.lock().await.voice_capture(path)?;
    let mut stream = capture.start().await?;
    app.start_listening(stream.handle());

    let tx = tx.clone();
    tokio::spawn(async move {
        while let Some(event) = stream.next().await {
            if tx.send(Event::Transcript(event)).is_err() {
                break;
            }
        }
    });
    Ok(())
}
