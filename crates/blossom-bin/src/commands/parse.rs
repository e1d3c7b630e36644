use blossom_hash::Hash;
use miette::IntoDiagnostic;

/// Validate a hash and print its canonical form
#[derive(Debug, clap::Parser)]
pub struct Opt {
    /// The hexadecimal hash, for example taken from a blob URL
    hash: String,
}

/// Strips a file extension or URL prefix from a blob reference, as in
/// `https://cdn.example.com/<hash>.png`.
fn hash_part(reference: &str) -> &str {
    let name = reference.rsplit('/').next().unwrap_or(reference);
    name.split_once('.').map_or(name, |(hash, _)| hash)
}

/// Parses the hash and prints it in lowercase hex.
pub fn parse(opts: Opt) -> miette::Result<()> {
    let hash: Hash = hash_part(opts.hash.trim()).parse().into_diagnostic()?;
    println!("{hash}");
    Ok(())
}
