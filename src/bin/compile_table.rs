// Builds the mapping table once and saves it as a binary snapshot.
// The snapshot can be passed to `ipa2lex` in place of the mapping document.
use anyhow::Result;
use clap::Parser;
use ipa2lex::document::read_mapping;
use ipa2lex::persistence::save_table;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Compile an IPA -> phone mapping into a table snapshot")]
struct Args {
    /// Mapping document (.xml or .json)
    mapping: PathBuf,
    /// Where to write the snapshot
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args = Args::parse();

    let table = read_mapping(&args.mapping)?;
    save_table(&table, &args.output)
}
