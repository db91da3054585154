use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use wst_frame::FrameConfig;
use wst_ipc::{connect_with_config, ClientConfig, RpcClient};

use crate::exit::{ipc_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod call;
pub mod compare;
pub mod ping;
pub mod press_key;
pub mod version;
pub mod views;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the compositor answers.
    Ping,
    /// Send one raw request and print the response.
    Call(CallArgs),
    /// List the compositor's views.
    Views(ViewsArgs),
    /// Press and release a key chord such as S-KEY_E.
    PressKey(PressKeyArgs),
    /// Compare two images.
    Compare(CompareArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::Ping => ping::run(ctx),
        Command::Call(args) => call::run(args, ctx),
        Command::Views(args) => views::run(args, ctx),
        Command::PressKey(args) => press_key::run(args, ctx),
        Command::Compare(args) => compare::run(args, ctx.format),
        Command::Version(args) => version::run(args),
    }
}

/// Options shared by every subcommand.
#[derive(Debug)]
pub struct Context {
    socket: Option<PathBuf>,
    read_timeout: Duration,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(socket: Option<PathBuf>, timeout: &str, format: OutputFormat) -> CliResult<Self> {
        Ok(Self {
            socket,
            read_timeout: parse_duration(timeout)?,
            format,
        })
    }

    /// Open the control connection.
    pub fn connect(&self) -> CliResult<RpcClient> {
        let path = self.socket.as_ref().ok_or_else(|| {
            CliError::new(
                USAGE,
                "no compositor socket: pass --socket or set WAYFIRE_SOCKET",
            )
        })?;
        let config = ClientConfig {
            frame: FrameConfig {
                read_timeout: self.read_timeout,
                ..FrameConfig::default()
            },
            ..ClientConfig::default()
        };
        connect_with_config(path, config).map_err(|err| ipc_error("connect failed", err))
    }
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Full method name, e.g. stipc/ping.
    pub method: String,
    /// Request data as a JSON object.
    #[arg(long, value_name = "JSON")]
    pub json: Option<String>,
    /// Treat an error response as a failure.
    #[arg(long)]
    pub checked: bool,
}

#[derive(Args, Debug)]
pub struct ViewsArgs {
    /// Only views with this app-id.
    #[arg(long, conflicts_with_all = ["title", "id"])]
    pub app_id: Option<String>,
    /// Only views with this title.
    #[arg(long, conflicts_with_all = ["app_id", "id"])]
    pub title: Option<String>,
    /// Only the view with this id.
    #[arg(long, conflicts_with_all = ["app_id", "title"])]
    pub id: Option<u64>,
}

#[derive(Args, Debug)]
pub struct PressKeyArgs {
    /// Key with optional modifier prefixes (S-, C-, A-).
    pub combo: String,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    pub first: PathBuf,
    pub second: PathBuf,
    /// Where to write the difference image when the images differ.
    #[arg(long, value_name = "PATH", default_value = "diff.png")]
    pub diff: PathBuf,
    /// Largest distance still considered the same image.
    #[arg(long, default_value_t = 0.0)]
    pub sensitivity: f64,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
