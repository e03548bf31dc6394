//! # Greenthumb
//!
//! Line-oriented plant assistant: pick a photo, identify it, ask follow-up
//! questions and keep watering reminders.
//!
//! Usage: `cargo run --bin greenthumb`

use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use greenthumb::commands::{help_text, parse_command, Command};
use greenthumb::core::user_message;
use greenthumb::features::speech::{SpeechCapture, Transcript};
use greenthumb::{Config, PlantAssistant, QueuedAlert, TranscriptEvent};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Greenthumb...");

    let alerts = QueuedAlert::new();
    let mut assistant = PlantAssistant::from_config(&config, Arc::new(alerts.clone()))?;

    println!("🌱 Greenthumb, your plant care assistant. Type /help for commands.");
    match assistant.startup().await {
        Ok(check) => {
            if !check.reminders.is_empty() {
                println!("You have {} watering reminder(s).", check.reminders.len());
            }
        }
        Err(e) => error!("Could not open conversation: {e}"),
    }
    print_alerts(&alerts);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&assistant);
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        if let Err(e) = run_command(&mut assistant, command).await {
            println!("{}", user_message(&e));
        }
        print_alerts(&alerts);
    }

    info!("Greenthumb shutdown complete");
    Ok(())
}

fn prompt(assistant: &PlantAssistant) {
    let label = assistant.plant_name().unwrap_or("greenthumb");
    print!("{label}> ");
    let _ = std::io::stdout().flush();
}

fn print_alerts(alerts: &QueuedAlert) {
    for message in alerts.drain() {
        println!("{message}");
    }
}

async fn run_command(assistant: &mut PlantAssistant, command: Command) -> Result<()> {
    match command {
        Command::Image(path) => {
            assistant.select_image_file(&path).await?;
            println!("📷 Photo selected. Type /identify to identify it.");
        }
        Command::Identify => {
            println!("🔍 Identifying...");
            let result = assistant.identify().await?;
            println!("\n{}\n", result.first_reply);
            match &result.plant_name {
                Some(name) => {
                    println!("Identified as {name}. Ask me anything about it.");
                    if let Some(reminder) = assistant.reminder_for_current_plant() {
                        println!("⏰ {}", reminder.describe(assistant.now()));
                    } else {
                        println!("Use /remind <days> to set a watering reminder.");
                    }
                }
                None => println!("I couldn't pick out a plant name, so reminders and sharing are off."),
            }
        }
        Command::Remind(interval) => {
            assistant.save_reminder(&interval)?;
            if let Some(reminder) = assistant.reminder_for_current_plant() {
                println!("⏰ Saved. {}", reminder.describe(assistant.now()));
            }
        }
        Command::Reminders => {
            let check = assistant.refresh_reminders();
            if check.reminders.is_empty() {
                println!("No watering reminders yet.");
            }
            let now = assistant.now();
            for reminder in &check.reminders {
                println!("  • {}", reminder.describe(now));
            }
        }
        Command::Forget(name) => {
            assistant.delete_reminder(&name)?;
            println!("Removed any reminder for {name}.");
        }
        Command::Share => {
            let location = assistant.share()?;
            println!("📤 Shared to {location}");
        }
        Command::Listen(path) => {
            let capture = assistant.voice_capture(path.clone())?;
            let text = listen(&capture, &path).await?;
            if text.is_empty() {
                println!("I didn't catch anything.");
            } else {
                println!("🗣️ {text}");
                send(assistant, &text).await?;
            }
        }
        Command::Reset => {
            assistant.reset();
            println!("Starting over. Choose a new photo with /image <path>.");
        }
        Command::Help => println!("{}", help_text()),
        Command::Message(text) => send(assistant, &text).await?,
        Command::Quit => {}
    }
    Ok(())
}

async fn send(assistant: &mut PlantAssistant, text: &str) -> Result<()> {
    let reply = assistant.send(text).await?;
    println!("\n{reply}\n");
    Ok(())
}

/// Stream a capture, echoing interim text as it arrives
async fn listen(capture: &dyn SpeechCapture, path: &Path) -> Result<String> {
    println!("🎙️ Transcribing {}...", path.display());
    let mut stream = capture.start().await?;
    let mut transcript = Transcript::default();

    while let Some(event) = stream.next().await {
        if let TranscriptEvent::Error(message) = &event {
            return Err(anyhow::anyhow!("Voice input failed: {message}"));
        }
        transcript.apply(&event);
        if let TranscriptEvent::Interim(_) = event {
            print!("\r  {}", transcript.display());
            let _ = std::io::stdout().flush();
        }
    }

    Ok(transcript.committed().to_string())
}
