use anyhow::Result;
use clap::Parser;
use ipa2lex::document::read_mapping;
use ipa2lex::LexiconConverter;
use std::io::{stdin, stdout, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Convert IPA typed on stdin, one word per line")]
struct Args {
    /// Mapping document (.xml, .json or a .bin snapshot)
    mapping: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args = Args::parse();
    let converter = LexiconConverter::new(read_mapping(&args.mapping)?);

    println!("IPA shell ({} symbols). Type 'exit' to quit.", converter.table().len());
    println!("---------------------------------------------------------------");

    let mut out = stdout();
    print!("> ");
    out.flush()?;

    for line in stdin().lock().lines() {
        let input = line?;
        let ipa = input.trim();

        match ipa {
            "exit" => break,
            "" => {}
            ipa => {
                let result = converter.convert_entry(ipa);
                println!("{} => {}", ipa, result.pron);
                for diagnostic in &result.diagnostics {
                    println!("  ! {}", diagnostic);
                }
            }
        }
        print!("> ");
        out.flush()?;
    }
    Ok(())
}
