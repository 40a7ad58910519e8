use std::{
    fmt::Display,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
    time::Instant,
};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use glimmer::{HighlightResult, Highlighter, Options};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The highlighted HTML fragment
    Html,
    /// The whole result, including the token tree
    Json,
    /// An indented dump of the token tree
    Tree,
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Highlight source code with regex driven grammars",
    long_about = None
)]
struct Cli {
    /// File to highlight, stdin if absent or `-`
    file: Option<PathBuf>,

    /// Highlight as this language or alias
    #[arg(short, long, conflicts_with = "auto")]
    language: Option<String>,

    /// Guess the language, this is the default without --language
    #[arg(short, long)]
    auto: bool,

    /// Languages auto-detection picks from
    #[arg(long, value_delimiter = ',')]
    subset: Option<Vec<String>>,

    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// JSON file with highlighter options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep going past illegal input instead of giving up on it
    #[arg(long)]
    ignore_illegals: bool,

    /// Report illegal input and internal faults as errors
    #[arg(long)]
    strict: bool,

    /// Print the registered languages and exit
    #[arg(long)]
    list: bool,

    /// Treat the input as the markup of a block with this class attribute
    #[arg(long, conflicts_with_all = ["language", "auto"])]
    block_class: Option<String>,

    /// Print timings to stderr
    #[arg(long)]
    bench: bool,

    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    iters: u32,
}

struct UnitPrinter {
    value: f64,
    suffixes: &'static [(&'static str, f64)],
}

#[allow(non_upper_case_globals)]
impl UnitPrinter {
    fn bytes(value: f64) -> Self {
        const KiB: f64 = 1.0 / 1024.0;
        Self {
            value,
            suffixes: &[("MiB", KiB * KiB), ("KiB", KiB), ("B", 1.0)],
        }
    }
    fn seconds(value: f64) -> Self {
        const ms: f64 = 1000.0;
        Self {
            value,
            suffixes: &[("s", 1.0), ("ms", ms), ("µs", ms * ms), ("ns", ms * ms * ms)],
        }
    }
}

impl Display for UnitPrinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut best: Option<(f64, &'static str)> = None;
        for &(name, factor) in self.suffixes {
            let value = self.value * factor;
            let new_best = match best {
                Some((best, _)) if best >= 1.0 => value < best && value >= 1.0,
                Some((best, _)) => value > best,
                None => true,
            };
            if new_best {
                best = Some((value, name));
            }
        }
        match best {
            Some((value, suffix)) => write!(f, "{value:.2} {suffix}"),
            None => write!(f, "{:.2}", self.value),
        }
    }
}

/// Runs `fun` the requested number of times and reports the average.
fn timed<T>(
    cli: &Cli,
    name: &str,
    bytes: usize,
    mut fun: impl FnMut() -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let start = Instant::now();
    let mut output = fun()?;
    for _ in 1..cli.iters {
        output = fun()?;
    }
    let elapsed = (start.elapsed() / cli.iters).as_secs_f64();

    if cli.bench {
        let time = UnitPrinter::seconds(elapsed);
        let throughput = UnitPrinter::bytes(bytes as f64 / elapsed.max(f64::EPSILON));
        eprintln!("{name}\t {time}\t {throughput}/s");
    }
    Ok(output)
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn load_options(cli: &Cli) -> anyhow::Result<Options> {
    let mut options = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            let value = serde_json::from_str(&text)
                .with_context(|| format!("`{}` is not valid JSON", path.display()))?;
            Options::from_json(value)
                .with_context(|| format!("invalid options in `{}`", path.display()))?
        }
        None => Options::default(),
    };
    if cli.strict {
        options.safe_mode = false;
    }
    Ok(options)
}

fn print_result(result: &HighlightResult, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Html => println!("{}", result.value),
        Format::Json => println!("{}", serde_json::to_string_pretty(result)?),
        Format::Tree => {
            let mut buf = String::new();
            result.tree.display_into(&mut buf)?;
            print!("{buf}");
        }
    }
    if let Some(illegal) = &result.illegal_by {
        log::warn!("stopped at illegal input: {}", illegal.message);
    }
    if let Some(error) = &result.error_raised {
        log::warn!("highlighting degraded: {error}");
    }
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut highlighter = Highlighter::with_options(load_options(cli)?);
    glimmer_languages::register_all(&mut highlighter)
        .context("failed to register the bundled languages")?;

    if cli.list {
        for name in highlighter.list_languages() {
            let Some(grammar) = highlighter.get_language(name) else {
                continue;
            };
            match grammar.aliases.is_empty() {
                true => println!("{name}\t{}", grammar.name),
                false => println!("{name}\t{} ({})", grammar.name, grammar.aliases.join(", ")),
            }
        }
        return Ok(());
    }

    let code = read_input(cli.file.as_deref())?;

    if let Some(class_name) = &cli.block_class {
        let block = timed(cli, "block", code.len(), || {
            Ok(highlighter.highlight_block(class_name, None, &code)?)
        })?;
        match block {
            Some(block) if cli.format == Format::Json => {
                println!("{}", serde_json::to_string_pretty(&block)?)
            }
            Some(block) => println!("{}", block.value),
            None => print!("{code}"),
        }
        return Ok(());
    }

    let result = match &cli.language {
        Some(language) if !cli.auto => {
            if highlighter.get_language(language).is_none() {
                bail!("unknown language `{language}`, see --list");
            }
            timed(cli, "highlight", code.len(), || {
                highlighter
                    .highlight(&code, language, cli.ignore_illegals)
                    .with_context(|| format!("failed to highlight as `{language}`"))
            })?
        }
        _ => timed(cli, "auto", code.len(), || {
            Ok(highlighter.highlight_auto(&code, cli.subset.as_deref()))
        })?,
    };

    if cli.language.is_none() {
        let second = result.second_best();
        log::info!(
            "detected {} with relevance {}, runner up {}",
            result.language.as_deref().unwrap_or("nothing"),
            result.relevance,
            second.and_then(|s| s.language.as_deref()).unwrap_or("nothing"),
        );
    }
    print_result(&result, cli.format)
}

fn main() -> anyhow::Result<()> {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "WARN".to_owned());
    let level = log::LevelFilter::from_str(&level)
        .with_context(|| format!("invalid RUST_LOG level `{level}`"))?;

    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    )
    .context("failed to install the logger")?;

    let cli = Cli::parse();
    run(&cli)
}
