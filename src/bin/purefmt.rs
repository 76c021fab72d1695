use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use pure_richtext::codec::{
    RunDocument, export_plain, export_runs, from_native, import_plain, to_native,
};
use pure_richtext::{CodecSet, Document, FormatConfig, StructuredFormat};
use tracing::Level;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const USAGE: &str = "Usage: purefmt <input> [output] [--runs] [--config FILE] [-v]";
const PREVIEW_WIDTH: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DocumentFormat {
    Native,
    Plain,
    Structured(StructuredFormat),
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pwp") => Ok(DocumentFormat::Native),
            Some("txt") => Ok(DocumentFormat::Plain),
            Some(other) => StructuredFormat::from_extension(other)
                .map(DocumentFormat::Structured)
                .with_context(|| format!("unsupported file extension '.{other}'")),
            None => bail!("cannot tell the format of {} without an extension", path.display()),
        }
    }
}

#[derive(Debug, Default)]
struct Options {
    input: PathBuf,
    output: Option<PathBuf>,
    show_runs: bool,
    config: Option<PathBuf>,
    verbosity: u8,
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let Some(options) = parse_args(env::args().skip(1))? else {
        eprintln!("{USAGE}");
        return Ok(());
    };
    init_logging(options.verbosity);

    let config = match &options.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            FormatConfig::from_toml_str(&source)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => FormatConfig::default(),
    };

    let codecs = CodecSet::builtin();
    let document = load_document(&options.input, &codecs, config)?;
    tracing::info!(
        path = %options.input.display(),
        chars = document.len(),
        lines = document.line_count(),
        "loaded document"
    );

    if options.show_runs || options.output.is_none() {
        print_runs(&export_runs(&document));
    }
    if let Some(output) = &options.output {
        save_document(output, &codecs, &document)?;
        tracing::info!(path = %output.display(), "wrote document");
    }
    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Option<Options>> {
    let mut options = Options::default();
    let mut positional = Vec::new();
    let mut args = args.peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--runs" => options.show_runs = true,
            "-v" | "--verbose" => options.verbosity = options.verbosity.saturating_add(1),
            "-vv" => options.verbosity = options.verbosity.saturating_add(2),
            "--config" => {
                let path = args.next().context("--config needs a file argument")?;
                options.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') && flag.len() > 1 => bail!("unknown option {flag}"),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let mut positional = positional.into_iter();
    let Some(input) = positional.next() else {
        return Ok(None);
    };
    options.input = input;
    options.output = positional.next();
    if let Some(extra) = positional.next() {
        bail!("unexpected argument {}", extra.display());
    }
    Ok(Some(options))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_document(path: &Path, codecs: &CodecSet, config: FormatConfig) -> Result<Document> {
    let format = DocumentFormat::from_path(path)?;
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let document = match format {
        DocumentFormat::Native => {
            let source = String::from_utf8(bytes)
                .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
            from_native(&source, config)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        DocumentFormat::Plain => {
            let source = String::from_utf8(bytes)
                .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
            import_plain(&source, config)
        }
        DocumentFormat::Structured(format) => codecs
            .import(format, &bytes, config)
            .with_context(|| format!("failed to parse {} as {}", path.display(), format.name()))?,
    };
    Ok(document)
}

fn save_document(path: &Path, codecs: &CodecSet, document: &Document) -> Result<()> {
    let contents = match DocumentFormat::from_path(path)? {
        DocumentFormat::Native => to_native(document)
            .context("failed to render native document")?
            .into_bytes(),
        DocumentFormat::Plain => export_plain(document).into_bytes(),
        DocumentFormat::Structured(format) => codecs
            .export(format, document)
            .with_context(|| format!("failed to render {}", format.name()))?,
    };
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn print_runs(runs: &RunDocument) {
    for (index, paragraph) in runs.paragraphs.iter().enumerate() {
        let alignment = paragraph
            .alignment
            .map(|alignment| alignment.as_str())
            .unwrap_or("-");
        println!("¶{:<4} {alignment}", index + 1);
        for run in &paragraph.runs {
            let mut attributes = Vec::new();
            for (on, label) in [
                (run.bold, "bold"),
                (run.italic, "italic"),
                (run.underline, "underline"),
                (run.strike, "strike"),
            ] {
                if on {
                    attributes.push(label.to_string());
                }
            }
            if let Some(family) = &run.family {
                attributes.push(family.clone());
            }
            if let Some(size) = run.size {
                attributes.push(format!("{size}pt"));
            }
            if let Some(color) = run.foreground {
                attributes.push(format!("fg {color}"));
            }
            if let Some(color) = run.background {
                attributes.push(format!("bg {color}"));
            }
            println!(
                "      {} {}",
                preview(&run.text, PREVIEW_WIDTH),
                attributes.join(" ")
            );
        }
    }
}

/// `text` quoted and cut or padded to exactly `width` display columns.
fn preview(text: &str, width: usize) -> String {
    let inner = width.saturating_sub(2);
    let mut shown = String::new();
    let mut used = 0;
    let fits = text.width() <= inner;
    for ch in text.chars() {
        let ch = if ch == '\t' { ' ' } else { ch };
        let ch_width = ch.width().unwrap_or(0);
        let limit = if fits { inner } else { inner.saturating_sub(1) };
        if used + ch_width > limit {
            break;
        }
        shown.push(ch);
        used += ch_width;
    }
    if !fits {
        shown.push('…');
        used += 1;
    }
    let padding = inner.saturating_sub(used);
    format!("\"{shown}\"{}", " ".repeat(padding))
}
