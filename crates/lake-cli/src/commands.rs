//! Subcommand implementations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::{ContentArrangement, Table};
use lake_catalog::{IngestOutcome, IngestPipeline, IngestRequest, ManifestCatalog};
use lake_model::{CommitInfo, ExportedFile, LakeSettings, RedcapConfig};
use lake_redcap::{ExportOptions, RedcapClient};
use lake_uri::PlatformMode;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{
    DigestArgs, ExportArgs, FieldsArgs, IngestArgs, ProvenanceArgs, RedcapArgs, SelectionArgs,
    ToPathArgs, ToUriArgs, VerifyArgs,
};

/// User agent for clients built by the CLI.
const USER_AGENT: &str = concat!("redcap-lake/", env!("CARGO_PKG_VERSION"));

/// Options that apply to every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub json: bool,
}

/// Loads the settings file (if any) and overlays command-line values.
///
/// Flags and environment variables win over the file.
pub fn load_settings(config: Option<&Path>, overrides: LakeSettings) -> Result<LakeSettings> {
    let base = match config {
        Some(path) => LakeSettings::load(path).context("load settings file")?,
        None => LakeSettings::default(),
    };
    Ok(base.merged_with(overrides))
}

/// Builds a REDCap client, applying `--timeout-secs` when given.
pub fn build_client(config: RedcapConfig, timeout_secs: Option<u64>) -> Result<RedcapClient> {
    match timeout_secs {
        Some(secs) => {
            let http = reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(secs))
                .build()
                .context("build HTTP client")?;
            Ok(RedcapClient::with_http_client(config, http))
        }
        None => RedcapClient::new(config).context("build HTTP client"),
    }
}

fn redcap_client(options: &GlobalOptions, redcap: &RedcapArgs) -> Result<RedcapClient> {
    let settings = load_settings(options.config.as_deref(), redcap.settings())?;
    let config = settings.redcap().context("resolve REDCap settings")?;
    build_client(config, redcap.timeout_secs)
}

fn export_options(selection: &SelectionArgs) -> ExportOptions {
    ExportOptions::default()
        .with_forms(selection.forms.clone())
        .with_fields(selection.fields.clone())
        .with_decode(selection.decode)
}

pub fn run_fields(options: &GlobalOptions, args: &FieldsArgs) -> Result<()> {
    let client = redcap_client(options, &args.redcap)?;
    let fields = client
        .resolve_fields(&args.forms, args.include_nondata)
        .context("resolve exportable fields")?;

    if options.json {
        return print_json(&fields);
    }
    let mut table = Table::new();
    table.set_header(vec!["#", "Field"]);
    apply_table_style(&mut table);
    for (index, field) in fields.iter().enumerate() {
        table.add_row(vec![(index + 1).to_string(), field.clone()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_export(options: &GlobalOptions, args: &ExportArgs) -> Result<ExportedFile> {
    let settings = load_settings(
        options.config.as_deref(),
        args.redcap.settings().merged_with(args.lake.settings()),
    )?;
    let resolved = settings.resolve().context("resolve settings")?;
    let client = build_client(resolved.redcap, args.redcap.timeout_secs)?;

    let exported = client
        .export_records(&resolved.layout, &export_options(&args.selection))
        .context("export records")?;

    if options.json {
        print_json(&exported)?;
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Path", "Encoding", "Created"]);
        apply_table_style(&mut table);
        table.add_row(vec![
            exported.path.display().to_string(),
            format!("{:?}", exported.encoding).to_lowercase(),
            exported.created_at.to_rfc3339(),
        ]);
        println!("{table}");
    }
    Ok(exported)
}

pub fn run_digest(options: &GlobalOptions, args: &DigestArgs) -> Result<()> {
    let digest = lake_digest::digest_file(&args.path)
        .with_context(|| format!("digest {}", args.path.display()))?;
    if options.json {
        print_json(&digest)
    } else {
        println!("{}  {}", digest.hex, args.path.display());
        Ok(())
    }
}

#[derive(Serialize)]
struct VerifyReport<'a> {
    path: &'a Path,
    expected: &'a str,
    matches: bool,
}

/// Returns whether the file matched.
pub fn run_verify(options: &GlobalOptions, args: &VerifyArgs) -> Result<bool> {
    let matches = lake_digest::verify(&args.path, &args.expected)
        .with_context(|| format!("verify {}", args.path.display()))?;
    if options.json {
        print_json(&VerifyReport {
            path: &args.path,
            expected: &args.expected,
            matches,
        })?;
    } else if matches {
        println!("{}: OK", args.path.display());
    } else {
        println!("{}: MISMATCH", args.path.display());
    }
    Ok(matches)
}

#[derive(Serialize)]
struct Conversion<'a> {
    input: &'a str,
    output: &'a str,
    mode: PlatformMode,
}

pub fn run_to_uri(options: &GlobalOptions, args: &ToUriArgs) -> Result<()> {
    let mode = PlatformMode::from(args.mode);
    let uri = lake_uri::to_uri(&args.path, mode).context("convert path to URI")?;
    print_conversion(options, &args.path, &uri, mode)
}

pub fn run_to_path(options: &GlobalOptions, args: &ToPathArgs) -> Result<()> {
    let mode = PlatformMode::from(args.mode);
    let path = lake_uri::to_path(&args.uri, mode).context("convert URI to path")?;
    print_conversion(options, &args.uri, &path, mode)
}

fn print_conversion(
    options: &GlobalOptions,
    input: &str,
    output: &str,
    mode: PlatformMode,
) -> Result<()> {
    if options.json {
        print_json(&Conversion {
            input,
            output,
            mode,
        })
    } else {
        println!("{output}");
        Ok(())
    }
}

pub fn run_provenance(options: &GlobalOptions, args: &ProvenanceArgs) -> Result<CommitInfo> {
    let info = lake_provenance::git_commit_info(&args.repo_dir, &args.script, !args.full_commit);
    if info.is_absent() {
        warn!(script = %args.script.display(), "No git provenance available");
    }

    if options.json {
        print_json(&info)?;
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Repository", "Commit", "Script"]);
        apply_table_style(&mut table);
        table.add_row(vec![
            info.repo_url().unwrap_or("-"),
            info.commit().unwrap_or("-"),
            info.script_relpath().unwrap_or("-"),
        ]);
        println!("{table}");
    }
    Ok(info)
}

pub fn run_ingest(options: &GlobalOptions, args: &IngestArgs) -> Result<IngestOutcome> {
    let settings = load_settings(
        options.config.as_deref(),
        args.redcap.settings().merged_with(args.lake.settings()),
    )?;
    let resolved = settings.resolve().context("resolve settings")?;
    let client = build_client(resolved.redcap, args.redcap.timeout_secs)?;

    let mut request = IngestRequest::new(&args.study, &args.domain)
        .with_export(export_options(&args.selection))
        .with_short_commit(!args.full_commit)
        .with_uri_mode(args.uri_mode.into());
    if let Some(script) = &args.script {
        request = request.with_script(&args.repo_dir, script);
    }

    let mut catalog = ManifestCatalog::new(&resolved.layout);
    let pipeline = IngestPipeline::new(client, resolved.layout);
    let outcome = pipeline
        .run(&mut catalog, &request)
        .context("ingest REDCap export")?;
    info!(asset = %outcome.asset, manifest = %catalog.path().display(), "Catalog updated");

    if options.json {
        print_json(&outcome)?;
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Asset", "Digest", "URI", "Commit"]);
        apply_table_style(&mut table);
        table.add_row(vec![
            outcome.asset.to_string(),
            outcome.digest.to_string(),
            outcome.uri.clone(),
            outcome.provenance.commit().unwrap_or("-").to_string(),
        ]);
        println!("{table}");
    }
    Ok(outcome)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_settings_without_file() {
        let overrides = LakeSettings {
            api_url: Some("https://redcap.example.org/api/".to_string()),
            ..LakeSettings::default()
        };
        let settings = load_settings(None, overrides.clone()).unwrap();
        assert_eq!(settings, overrides);
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lake.json");
        std::fs::write(
            &path,
            r#"{"api_url":"https://file.example.org/api/","api_token":"FILE","lake_root":"/srv/lake"}"#,
        )
        .unwrap();

        let overrides = LakeSettings {
            api_token: Some("FLAG".to_string()),
            ..LakeSettings::default()
        };
        let settings = load_settings(Some(&path), overrides).unwrap();
        assert_eq!(settings.api_url.as_deref(), Some("https://file.example.org/api/"));
        assert_eq!(settings.api_token.as_deref(), Some("FLAG"));
        assert_eq!(settings.lake_root, Some(PathBuf::from("/srv/lake")));
    }

    #[test]
    fn test_missing_settings_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(load_settings(Some(&missing), LakeSettings::default()).is_err());
    }

    #[test]
    fn test_build_client_with_timeout() {
        let config = RedcapConfig::new("https://redcap.example.org/api/", "T").unwrap();
        let client = build_client(config, Some(5)).unwrap();
        assert_eq!(client.config().api_url(), "https://redcap.example.org/api/");
    }
}
