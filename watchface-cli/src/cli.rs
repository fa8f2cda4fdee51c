use std::path::PathBuf;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};
use log::{LevelFilter, info, warn};
use tokio::io::{AsyncBufRead, BufReader};
use watchface_core::{
    Config, DisplayMode, JsonLinesSource, UpdateError, UpdateSource, WatchFace, classify,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "watchface", version, about = "Sunshine watch face host")]
pub struct Cli {
    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure message key names and display preferences.
    Configure,

    /// Print the icon asset for a weather condition code.
    Icon {
        /// OpenWeatherMap condition code, e.g. 800.
        #[arg(allow_hyphen_values = true)]
        code: i32,

        /// Use the ambient (outline) icon variant.
        #[arg(long)]
        ambient: bool,
    },

    /// Apply weather messages (one JSON object per line) and print the resulting frame.
    Render {
        /// File with messages; stdin when absent.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Render in ambient mode.
        #[arg(long)]
        ambient: bool,

        /// Reject messages missing any key.
        #[arg(long)]
        strict: bool,

        /// Clock time to render, RFC 3339; if absent, means "now".
        #[arg(long)]
        at: Option<String>,

        /// Print the frame as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Icon { code, ambient } => {
                match classify(code, DisplayMode::from_ambient(ambient)) {
                    Some(icon) => println!("{icon}"),
                    None => println!("none"),
                }
                Ok(())
            }
            Command::Render { input, ambient, strict, at, json } => {
                let mut config = Config::load()?;
                config.ambient |= ambient;
                config.strict |= strict;

                let now = match at {
                    Some(text) => parse_clock(&text)?,
                    None => Local::now().naive_local(),
                };

                let mut face = config.face();
                match input {
                    Some(path) => {
                        let file = tokio::fs::File::open(&path)
                            .await
                            .with_context(|| format!("Failed to open {}", path.display()))?;
                        feed(&mut face, JsonLinesSource::new(BufReader::new(file))).await?;
                    }
                    None => {
                        let stdin = BufReader::new(tokio::io::stdin());
                        feed(&mut face, JsonLinesSource::new(stdin)).await?;
                    }
                }

                let frame = face.frame(now);
                if json {
                    println!("{}", serde_json::to_string_pretty(&frame)?);
                } else {
                    println!("{}", frame.time);
                    println!("{}", frame.date);
                    println!("{}", frame.temperatures);
                    println!("icon: {}", frame.icon.as_deref().unwrap_or("none"));
                }
                Ok(())
            }
        }
    }
}

/// Apply every message from `source` in order. Bad messages are logged and skipped.
async fn feed<R>(face: &mut WatchFace, mut source: JsonLinesSource<R>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut applied = 0usize;

    loop {
        let message = match source.next_message().await {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(UpdateError::Io(err)) => return Err(err).context("Failed to read messages"),
            Err(err) => {
                warn!("line {}: {err}", source.line_no());
                continue;
            }
        };

        match face.on_message(&message) {
            Ok(_) => applied += 1,
            Err(err) => warn!("line {}: {err}", source.line_no()),
        }
    }

    info!("Applied {applied} weather update(s)");
    Ok(())
}

fn parse_clock(text: &str) -> anyhow::Result<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_local());
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").map_err(|_| {
        anyhow!("Invalid --at value '{text}'. Expected RFC 3339, e.g. 2015-10-19T12:34:56Z.")
    })
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.keys.high = Text::new("Key for the high temperature:")
        .with_default(&config.keys.high)
        .prompt()?;
    config.keys.low = Text::new("Key for the low temperature:")
        .with_default(&config.keys.low)
        .prompt()?;
    config.keys.condition_code = Text::new("Key for the weather condition code:")
        .with_default(&config.keys.condition_code)
        .prompt()?;
    config.strict = Confirm::new("Reject messages missing any of these keys?")
        .with_default(config.strict)
        .prompt()?;
    config.show_seconds = Confirm::new("Show seconds in interactive mode?")
        .with_default(config.show_seconds)
        .prompt()?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
