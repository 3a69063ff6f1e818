//! versicle - render a materialized entry stream through a reference sink

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use versicle::sink::{OsisSink, RecordingSink, TextSink};
use versicle::{Entry, RenderOptions, Renderer};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Plain text
    Text,
    /// OSIS-flavored XML
    Osis,
    /// One line per sink event, for debugging writer implementations
    Events,
}

#[derive(Parser)]
#[command(name = "versicle")]
#[command(version, about = "Scripture rendering engine", long_about = None)]
#[command(after_help = "EXAMPLES:
    versicle gen.json -f text -o gen.txt     Render to plain text
    versicle gen.json -f osis                Render OSIS XML to stdout
    versicle gen.json -f events              Dump the sink event stream")]
struct Cli {
    /// Input JSON entry stream (an object with "book" and "entries"), or - for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Override the book id from the input file
    #[arg(short, long)]
    book: Option<String>,

    /// Treat the first data-quality warning as an error
    #[arg(long)]
    strict: bool,

    /// Suppress warning output
    #[arg(short, long)]
    quiet: bool,
}

/// The on-disk shape of a materialized entry stream.
#[derive(serde::Deserialize)]
struct BookFile {
    book: String,
    entries: Vec<Entry>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let json = read_input(&cli.input).map_err(|e| format!("{}: {e}", cli.input))?;
    let file: BookFile =
        serde_json::from_str(&json).map_err(|e| format!("{}: {e}", cli.input))?;
    let book_id = cli.book.as_deref().unwrap_or(&file.book);

    let writer = open_output(cli.output.as_deref()).map_err(|e| e.to_string())?;
    let options = RenderOptions { strict: cli.strict };

    let report = match cli.format {
        Format::Text => {
            let mut sink = TextSink::new(writer);
            let mut renderer = Renderer::with_options(&mut sink, options);
            renderer
                .render_book(book_id, &file.entries)
                .map_err(|e| e.to_string())?
        }
        Format::Osis => {
            let mut sink = OsisSink::new(writer);
            let mut renderer = Renderer::with_options(&mut sink, options);
            renderer
                .render_book(book_id, &file.entries)
                .map_err(|e| e.to_string())?
        }
        Format::Events => {
            let mut sink = RecordingSink::new();
            let mut renderer = Renderer::with_options(&mut sink, options);
            let report = renderer
                .render_book(book_id, &file.entries)
                .map_err(|e| e.to_string())?;
            let mut writer = writer;
            for event in sink.events() {
                writeln!(writer, "{event:?}").map_err(|e| e.to_string())?;
            }
            report
        }
    };

    if !cli.quiet {
        for warning in &report.warnings {
            eprintln!("warning: {warning}");
        }
        eprintln!(
            "{book_id}: {} entries, {} verses, {} notes, {} warnings",
            report.entries,
            report.verses,
            report.notes,
            report.warnings.len()
        );
    }
    Ok(())
}

fn read_input(path: &str) -> io::Result<String> {
    let mut json = String::new();
    if path == "-" {
        io::stdin().read_to_string(&mut json)?;
    } else {
        File::open(path)?.read_to_string(&mut json)?;
    }
    Ok(json)
}

fn open_output(path: Option<&str>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}
