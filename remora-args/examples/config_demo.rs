//! Populates a config schema from this process's command line, dumps the
//! result, and resolves an enum tag back to its declared name.
//!
//! ```bash
//! cargo run --example config_demo -- \
//!     --verbose=1 --retries=3 --mode=release --bind.host=0.0.0.0 --bind.port=8080
//!
//! # A bad numeric value aborts with a spanned diagnostic:
//! cargo run --example config_demo -- --retries=many
//! ```

use miette::{GraphicalReportHandler, GraphicalTheme};
use remora_args::{Populator, TokenOutcome};
use remora_core::{EnumDescriptor, Kind, MessageDescriptor, SchemaError};
use remora_pretty::dump;

fn main() -> Result<(), SchemaError> {
    remora_testhelpers::setup();

    println!("raw argument dump:");
    for (index, arg) in std::env::args().skip(1).enumerate() {
        println!("{index:>3} - '{arg}'");
    }
    println!();

    let mode = EnumDescriptor::builder("Mode")
        .value("DEBUG", 0)
        .value("RELEASE", 1)
        .build()?;
    let endpoint = MessageDescriptor::builder("Endpoint")
        .field("host", Kind::String)
        .field("port", Kind::UInt32)
        .build()?;
    let schema = MessageDescriptor::builder("Config")
        .field("verbose", Kind::Bool)
        .field("retries", Kind::Int32)
        .field("mode", Kind::Enum(mode))
        .field("bind", Kind::Message(endpoint))
        .build()?;
    let mut config = schema.new_message();

    let report = match Populator::new()
        .case_insensitive(true)
        .populate_std_args(&mut config)
    {
        Ok(report) => report,
        Err(e) => {
            let mut rendered = String::new();
            GraphicalReportHandler::new_themed(GraphicalTheme::unicode())
                .render_report(&mut rendered, &e)
                .unwrap();
            eprintln!("{rendered}");
            std::process::exit(1);
        }
    };

    for token in report.tokens() {
        if !matches!(token.outcome, TokenOutcome::Applied) {
            println!("skipped `{}': {}", token.raw, token.outcome);
        }
    }

    println!("{}", dump(&config));

    let tag = config.get_enum("mode");
    match config.enum_alias("mode", tag) {
        Some(alias) => println!("mode: {tag} ({alias})"),
        None => println!("mode: {tag} (no declared name)"),
    }
    Ok(())
}
