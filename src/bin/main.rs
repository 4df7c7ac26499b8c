use anyhow::Result;
use clap::Parser;
use ipa2lex::document::{read_lexicon, read_mapping, write_lexicon};
use ipa2lex::LexiconConverter;
use std::path::PathBuf;

/// Select phoneset, lexicon, and output file
#[derive(Parser)]
#[command(version)]
struct Args {
    /// File that contains the mapping from IPA -> phones (.xml, .json or a .bin snapshot)
    mapping: PathBuf,
    /// File containing the lexicon with IPA to convert (.xml or .json)
    lexicon: PathBuf,
    /// Output file for storing the final lexicon
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args = Args::parse();

    let table = read_mapping(&args.mapping)?;
    let mut lexicon = read_lexicon(&args.lexicon)?;

    let converter = LexiconConverter::new(table);
    converter.convert_lexicon(&mut lexicon)?;

    write_lexicon(&lexicon, &args.output)
}
