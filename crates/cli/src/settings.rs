use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use oid_engine::{RemapConfig, RemapJob};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_ENV: &str = "OID_REMAP_CONFIG";

/// Uploads larger than this are rejected unless `[server] upload_limit_bytes`
/// says otherwise.
pub(crate) const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 64 * 1024 * 1024;

/// `[remap]`, `[paths]` and `[server]` sections of the TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) remap: RemapConfig,
    pub(crate) paths: PathSettings,
    pub(crate) server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ServerSettings {
    /// Maximum request body accepted by the upload route
    pub(crate) upload_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            upload_limit_bytes: DEFAULT_UPLOAD_LIMIT_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PathSettings {
    pub(crate) mapping: PathBuf,
    pub(crate) table: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) unmapped: PathBuf,
    /// Published OID catalog served as-is by the catalog route
    pub(crate) catalog: PathBuf,
    /// Parent of the temporary per-request directories used by uploads
    pub(crate) work_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            mapping: PathBuf::from("./old_to_new_oid_barang.json"),
            table: PathBuf::from("./aiso_template_barang.csv"),
            output: PathBuf::from("./aiso_template_barang_fixed.csv"),
            unmapped: PathBuf::from("./unmapped_oid.txt"),
            catalog: PathBuf::from("./oidbaru2coa_perusahaan-barang.json"),
            work_dir: PathBuf::from("./.oid-remap/requests"),
        }
    }
}

/// Command-line overrides, applied on top of the configuration file
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct PathArgs {
    /// JSON mapping of old OID to new OID
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// CSV table to correct
    #[arg(long)]
    table: Option<PathBuf>,

    /// Where the corrected CSV is written
    #[arg(long)]
    output: Option<PathBuf>,

    /// Where unmapped identifiers are listed
    #[arg(long)]
    unmapped: Option<PathBuf>,

    /// JSON catalog served by the catalog route
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Directory for per-request upload jobs
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Identifier column name
    #[arg(long)]
    id_column: Option<String>,

    /// Parent identifier column name
    #[arg(long)]
    parent_column: Option<String>,
}

impl Settings {
    /// Load from `path`, falling back to `$OID_REMAP_CONFIG`, then defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let settings = Self::parse(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    pub(crate) fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub(crate) fn apply(&mut self, args: &PathArgs) {
        let paths = &mut self.paths;
        for (target, value) in [
            (&mut paths.mapping, &args.mapping),
            (&mut paths.table, &args.table),
            (&mut paths.output, &args.output),
            (&mut paths.unmapped, &args.unmapped),
            (&mut paths.catalog, &args.catalog),
            (&mut paths.work_dir, &args.work_dir),
        ] {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        if let Some(column) = &args.id_column {
            self.remap.id_column.clone_from(column);
        }
        if let Some(column) = &args.parent_column {
            self.remap.parent_column.clone_from(column);
        }
    }

    /// The job over the configured fixed paths
    pub(crate) fn fixed_job(&self) -> RemapJob {
        RemapJob {
            mapping_path: self.paths.mapping.clone(),
            table_path: self.paths.table.clone(),
            output_path: self.paths.output.clone(),
            unmapped_path: self.paths.unmapped.clone(),
        }
    }
}
