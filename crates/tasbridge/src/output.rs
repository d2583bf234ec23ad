use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tasbridge_frame::Severity;
use tasbridge_movie::Movie;
use tasbridge_session::{DeviceInfo, SessionReport, SessionState, Status, StatusSink};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct StatusOutput<'a> {
    frame: usize,
    sample: Option<String>,
    severity: Option<Severity>,
    message: Option<&'a str>,
}

/// Session progress printer.
///
/// Device messages are always printed. Frame progress is printed at most
/// once every `interval` frames.
pub struct StatusPrinter {
    format: OutputFormat,
    interval: usize,
    next_frame: usize,
}

impl StatusPrinter {
    pub fn new(format: OutputFormat, interval: usize) -> Self {
        Self {
            format,
            interval: interval.max(1),
            next_frame: 0,
        }
    }

    fn due(&mut self, status: &Status<'_>) -> bool {
        if status.message.is_some() {
            return true;
        }
        if status.frame < self.next_frame {
            return false;
        }
        self.next_frame = status.frame.saturating_add(self.interval);
        true
    }
}

impl StatusSink for StatusPrinter {
    fn on_status(&mut self, status: &Status<'_>) {
        if !self.due(status) {
            return;
        }
        let sample = status.sample.map(|sample| sample.to_string());

        match self.format {
            OutputFormat::Json => {
                let out = StatusOutput {
                    frame: status.frame,
                    sample,
                    severity: status.message.map(|m| m.severity),
                    message: status.message.map(|m| m.text.as_str()),
                };
                println!(
                    "{}",
                    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Table => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["FRAME", "SAMPLE", "MESSAGE"])
                    .add_row(vec![
                        status.frame.to_string(),
                        sample.unwrap_or_default(),
                        status
                            .message
                            .map(|m| m.to_string())
                            .unwrap_or_default(),
                    ]);
                println!("{table}");
            }
            OutputFormat::Pretty => match (status.message, sample) {
                (Some(message), _) => println!("{message}"),
                (None, Some(sample)) => println!("frame {:>8}  {sample}", status.frame),
                (None, None) => println!("frame {:>8}", status.frame),
            },
            OutputFormat::Raw => {
                if let Some(message) = status.message {
                    println!("{}", message.text);
                }
            }
        }
    }
}

#[derive(Serialize)]
struct ReportOutput {
    state: &'static str,
    frame: usize,
    commands: u64,
    unrecognized: u64,
}

fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Dispatching => "dispatching",
        SessionState::ChannelClosed => "channel-closed",
        SessionState::Interrupted => "interrupted",
    }
}

pub fn print_report(report: &SessionReport, format: OutputFormat) {
    let out = ReportOutput {
        state: state_name(report.state),
        frame: report.frame,
        commands: report.commands,
        unrecognized: report.unrecognized,
    };
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("Session:");
            println!("  State:        {}", out.state);
            println!("  Frame:        {}", out.frame);
            println!("  Commands:     {}", out.commands);
            println!("  Unrecognized: {}", out.unrecognized);
        }
        OutputFormat::Raw => println!("{}", out.frame),
    }
}

#[derive(Serialize)]
struct MovieOutput<'a> {
    system: &'a str,
    game: &'a str,
    author: &'a str,
    description: &'a str,
    controllers: usize,
    frames: usize,
}

pub fn print_movie(movie: &Movie, format: OutputFormat) {
    let meta = movie.metadata();
    match format {
        OutputFormat::Json => {
            let out = MovieOutput {
                system: &meta.system,
                game: &meta.game,
                author: &meta.author,
                description: &meta.description,
                controllers: movie.controllers(),
                frames: movie.frames(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (label, value) in meta.describe() {
                table.add_row(vec![label.trim_end_matches(':').to_string(), value.to_string()]);
            }
            table.add_row(vec!["Controllers".to_string(), movie.controllers().to_string()]);
            table.add_row(vec!["Frames".to_string(), movie.frames().to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            movie.print();
            println!("{:<8} {}", "Frames:", movie.frames());
        }
        OutputFormat::Raw => println!("{}", movie.frames()),
    }
}

#[derive(Serialize)]
struct DeviceOutput<'a> {
    device: &'a str,
    description: &'a str,
    version: &'a str,
}

pub fn print_device(device: &str, info: &DeviceInfo, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = DeviceOutput {
                device,
                description: &info.description,
                version: &info.version,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("Device Info:");
            println!("  Device:      {device}");
            println!("  Description: {}", info.description);
            println!("  Version:     {}", info.version);
        }
        OutputFormat::Raw => println!("{}", info.version),
    }
}

#[cfg(test)]
mod tests {
    use tasbridge_frame::{InputSample, LogMessage};
    use tasbridge_movie::MovieMetadata;

    use super::*;

    fn movie() -> Movie {
        Movie::new(MovieMetadata {
            system: "Nintendo 64".to_string(),
            game: String::new(),
            controllers: 1,
            author: String::new(),
            description: String::new(),
        })
        .unwrap()
    }

    fn frame(movie: &Movie, frame: usize) -> Status<'_> {
        Status {
            movie,
            frame,
            sample: Some(InputSample::NEUTRAL),
            message: None,
        }
    }

    #[test]
    fn frame_progress_is_throttled() {
        let movie = movie();
        let mut printer = StatusPrinter::new(OutputFormat::Raw, 60);

        assert!(printer.due(&frame(&movie, 2)));
        assert!(!printer.due(&frame(&movie, 4)));
        assert!(!printer.due(&frame(&movie, 61)));
        assert!(printer.due(&frame(&movie, 62)));
    }

    #[test]
    fn messages_are_never_throttled() {
        let movie = movie();
        let message = LogMessage {
            severity: Severity::Info,
            text: "hello".to_string(),
        };
        let mut printer = StatusPrinter::new(OutputFormat::Raw, 60);
        printer.due(&frame(&movie, 2));

        let status = Status {
            movie: &movie,
            frame: 3,
            sample: None,
            message: Some(&message),
        };
        assert!(printer.due(&status));
        assert!(printer.due(&status));
    }

    #[test]
    fn state_names_are_kebab_case() {
        assert_eq!(state_name(SessionState::Dispatching), "dispatching");
        assert_eq!(state_name(SessionState::ChannelClosed), "channel-closed");
        assert_eq!(state_name(SessionState::Interrupted), "interrupted");
    }
}
