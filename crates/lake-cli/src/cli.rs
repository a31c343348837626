//! CLI argument definitions for `redcap-lake`.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use lake_model::LakeSettings;
use lake_uri::PlatformMode;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "redcap-lake",
    version,
    about = "Pull REDCap exports into a content-addressed data lake",
    long_about = "Pull REDCap exports into a content-addressed data lake.\n\n\
                  Resolves exportable fields from project metadata, writes EAV CSV\n\
                  exports under <LAKE_ROOT>/ingests, and registers them by SHA-256\n\
                  digest, file:// URI and git provenance."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with timestamps (pretty and compact formats).
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module in log lines.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,

    /// JSON settings file with `api_url`, `api_token` and `lake_root`.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long = "json", global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the exportable fields of a REDCap project.
    Fields(FieldsArgs),

    /// Export EAV records into the lake's ingest directory.
    Export(ExportArgs),

    /// Print the SHA-256 digest of a file.
    Digest(DigestArgs),

    /// Check a file against an expected SHA-256 digest.
    Verify(VerifyArgs),

    /// Convert an absolute path to a file:// URI.
    ToUri(ToUriArgs),

    /// Convert a file:// URI to a path.
    ToPath(ToPathArgs),

    /// Show git provenance for a script.
    Provenance(ProvenanceArgs),

    /// Export, digest and register records in the lake catalog.
    Ingest(IngestArgs),
}

/// REDCap connection flags shared by networked commands.
#[derive(Args, Debug, Clone)]
pub struct RedcapArgs {
    /// REDCap API endpoint, e.g. https://redcap.example.org/api/.
    #[arg(long = "api-url", env = "REDCAP_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// REDCap project API token.
    #[arg(
        long = "api-token",
        env = "REDCAP_API_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true
    )]
    pub api_token: Option<String>,

    /// Abort requests that take longer than this.
    #[arg(long = "timeout-secs", value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,
}

/// Lake location flag.
#[derive(Args, Debug, Clone)]
pub struct LakeArgs {
    /// Root directory of the data lake.
    #[arg(long = "lake-root", env = "LAKE_ROOT", value_name = "DIR")]
    pub lake_root: Option<PathBuf>,
}

/// Record selection shared by `export` and `ingest`.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Restrict to an instrument (repeatable).
    #[arg(long = "form", value_name = "FORM")]
    pub forms: Vec<String>,

    /// Export only these fields (repeatable). Resolved from metadata when omitted.
    #[arg(long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Transcode the payload from Windows-1252 to UTF-8.
    #[arg(long = "decode")]
    pub decode: bool,
}

#[derive(Parser, Debug)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub redcap: RedcapArgs,

    /// Restrict to an instrument (repeatable).
    #[arg(long = "form", value_name = "FORM")]
    pub forms: Vec<String>,

    /// Keep descriptive, file, sql and signature fields.
    #[arg(long = "include-nondata")]
    pub include_nondata: bool,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub redcap: RedcapArgs,

    #[command(flatten)]
    pub lake: LakeArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(Parser, Debug)]
pub struct DigestArgs {
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Expected digest, hex with an optional `sha256:` prefix.
    #[arg(value_name = "DIGEST")]
    pub expected: String,
}

#[derive(Parser, Debug)]
pub struct ToUriArgs {
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Path convention of the input.
    #[arg(long = "mode", value_enum, default_value = "host")]
    pub mode: ModeArg,
}

#[derive(Parser, Debug)]
pub struct ToPathArgs {
    #[arg(value_name = "URI")]
    pub uri: String,

    /// Path convention of the output.
    #[arg(long = "mode", value_enum, default_value = "host")]
    pub mode: ModeArg,
}

#[derive(Parser, Debug)]
pub struct ProvenanceArgs {
    /// Script whose commit is reported.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Directory inside the repository (default: current directory).
    #[arg(long = "repo-dir", value_name = "DIR", default_value = ".")]
    pub repo_dir: PathBuf,

    /// Report the full 40-character commit hash.
    #[arg(long = "full-commit")]
    pub full_commit: bool,
}

#[derive(Parser, Debug)]
pub struct IngestArgs {
    #[command(flatten)]
    pub redcap: RedcapArgs,

    #[command(flatten)]
    pub lake: LakeArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Study the asset belongs to.
    #[arg(long = "study", value_name = "STUDY")]
    pub study: String,

    /// Domain label within the study.
    #[arg(long = "domain", value_name = "DOMAIN", default_value = "redcap")]
    pub domain: String,

    /// Script recorded as the producer of this ingest.
    #[arg(long = "script", value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Directory inside the script's repository (default: current directory).
    #[arg(long = "repo-dir", value_name = "DIR", default_value = ".")]
    pub repo_dir: PathBuf,

    /// Record the full 40-character commit hash.
    #[arg(long = "full-commit")]
    pub full_commit: bool,

    /// Path convention for the recorded URI.
    #[arg(long = "uri-mode", value_enum, default_value = "host")]
    pub uri_mode: ModeArg,
}

/// CLI path convention choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Convention of the running OS.
    Host,
    Posix,
    Windows,
}

impl From<ModeArg> for PlatformMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Host => PlatformMode::host(),
            ModeArg::Posix => PlatformMode::Posix,
            ModeArg::Windows => PlatformMode::Windows,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl Cli {
    /// Build logging configuration from CLI flags with consistent precedence.
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig {
            level_filter: self.verbosity.tracing_level_filter(),
            with_timestamps: self.log_timestamps,
            with_target: self.log_target,
            ..LogConfig::default()
        };
        config.use_env_filter = !(self.verbosity.is_present() || self.log_level.is_some());
        if let Some(level) = self.log_level {
            config.level_filter = match level {
                LogLevelArg::Error => LevelFilter::ERROR,
                LogLevelArg::Warn => LevelFilter::WARN,
                LogLevelArg::Info => LevelFilter::INFO,
                LogLevelArg::Debug => LevelFilter::DEBUG,
                LogLevelArg::Trace => LevelFilter::TRACE,
            };
        }
        config.format = match self.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        };
        config.log_file = self.log_file.clone();
        config.with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        config
    }
}

impl RedcapArgs {
    /// Settings given on the command line or through the environment.
    pub fn settings(&self) -> LakeSettings {
        LakeSettings {
            api_url: self.api_url.clone(),
            api_token: self.api_token.clone(),
            lake_root: None,
        }
    }
}

impl LakeArgs {
    pub fn settings(&self) -> LakeSettings {
        LakeSettings {
            lake_root: self.lake_root.clone(),
            ..LakeSettings::default()
        }
    }
}
