use std::path::PathBuf;

use miette::{Context, IntoDiagnostic};

/// Compute the content address of one or more files
#[derive(Debug, clap::Parser)]
pub struct Opt {
    /// The files to hash
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

/// Prints the hash of every file in the same layout as `sha256sum`.
pub fn hash(opts: Opt) -> miette::Result<()> {
    for path in &opts.paths {
        let hash = blossom_hash::compute_reader_hash(fs_err::File::open(path).into_diagnostic()?)
            .into_diagnostic()
            .with_context(|| format!("failed to hash {}", path.display()))?;
        tracing::debug!(path = %path.display(), %hash, "hashed file");
        println!("{hash}  {}", path.display());
    }
    Ok(())
}
