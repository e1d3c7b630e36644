use std::path::{Path, PathBuf};

use blossom::{Blob, BlobMeta};
use chrono::{DateTime, Utc};
use miette::{Context, IntoDiagnostic};
use serde::Serialize;

/// Print the metadata a server would record for a file
#[derive(Debug, clap::Parser)]
pub struct Opt {
    /// The file to inspect
    path: PathBuf,
}

#[derive(Debug, Serialize)]
struct Inspection {
    #[serde(flatten)]
    meta: BlobMeta,
    extension: String,
}

fn inspect_file(path: &Path) -> miette::Result<Inspection> {
    let file = fs_err::File::open(path).into_diagnostic()?;
    let modified = file
        .metadata()
        .and_then(|metadata| metadata.modified())
        .into_diagnostic()?;

    let mut blob = Blob::new(file);
    let meta = BlobMeta::from_blob(&mut blob, DateTime::<Utc>::from(modified))
        .into_diagnostic()
        .with_context(|| format!("failed to inspect {}", path.display()))?;

    Ok(Inspection {
        extension: meta.extension(),
        meta,
    })
}

/// Prints the [`BlobMeta`] of a file as JSON.
pub fn inspect(opts: Opt) -> miette::Result<()> {
    let inspection = inspect_file(&opts.path)?;
    tracing::debug!(hash = %inspection.meta.hash, "inspected {}", opts.path.display());
    println!(
        "{}",
        serde_json::to_string_pretty(&inspection).into_diagnostic()?
    );
    Ok(())
}
