//! Thicket CLI
//!
//! Parse a document or fragment and print what the parser built.
//!
//! ```text
//! thicket page.html                      # html5lib-style tree dump
//! thicket page.html --json               # the tree as JSON
//! thicket page.html --tokens --errors    # tokens, then the tree and errors
//! thicket --html '<td>x' --fragment tr   # fragment parse in a <tr>
//! ```

mod json;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use thicket_common::warning::set_warnings_enabled;
use thicket_dom::Namespace;
use thicket_html::dump::dump;
use thicket_html::tokenizer::TokenCollector;
use thicket_html::{HTMLParser, HTMLTokenizer, ParseError, ParseOutput, ParserConfig};

/// Thicket - parse HTML the way browsers do and show the result
#[derive(Parser, Debug)]
#[command(name = "thicket")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Dump the tree of a file
    thicket index.html

    # Parse inline HTML
    thicket --html '<p>Hello<b>world'

    # Parse a fragment as if it were the contents of <select> inside <table>
    thicket --html '<option>a' --fragment select --context-ancestor table

    # Foreign context elements take a namespace prefix
    thicket --html '<path/>' --fragment 'svg svg'
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE", conflicts_with = "html")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Parse a fragment in the context of this element (`svg NAME` and
    /// `math NAME` select a foreign namespace)
    #[arg(long, value_name = "TAG")]
    fragment: Option<String>,

    /// Ancestor of the fragment context, outermost first (repeatable)
    #[arg(long = "context-ancestor", value_name = "TAG", requires = "fragment")]
    context_ancestors: Vec<String>,

    /// Print the tree as JSON instead of the dump
    #[arg(short, long)]
    json: bool,

    /// Print the tokens before the tree
    #[arg(short, long)]
    tokens: bool,

    /// Print parse errors after the tree
    #[arg(short, long)]
    errors: bool,

    /// Feed the input in chunks of this many bytes
    #[arg(long, value_name = "N")]
    chunk_size: Option<NonZeroUsize>,

    /// Parse with the scripting flag set
    #[arg(long)]
    scripting: bool,

    /// Do not print parser warnings
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_warnings_enabled(!cli.quiet);
    let input = load_input(&cli)?;
    let chunks: Vec<&[u8]> = match cli.chunk_size {
        Some(size) => input.chunks(size.get()).collect(),
        None => vec![input.as_slice()],
    };

    if cli.tokens {
        print_tokens(&chunks);
    }

    let output = parse(&cli, &chunks)?;
    if cli.json {
        let mut out = BufWriter::new(io::stdout().lock());
        json::write_json(&output, &mut out)?;
        out.flush()?;
    } else {
        print!("{}", dump(&output));
    }

    if cli.errors {
        print_errors(&output.errors);
    }
    Ok(())
}

/// Read the input bytes from `--html` or the file argument.
fn load_input(cli: &Cli) -> Result<Vec<u8>> {
    if let Some(html) = &cli.html {
        return Ok(html.clone().into_bytes());
    }
    let Some(path) = &cli.path else {
        bail!("no input: pass a FILE or --html");
    };
    fs::read(path).with_context(|| format!("reading '{}'", path.display()))
}

/// `svg path` → (`path`, SVG); `div` → (`div`, HTML).
fn context_name(arg: &str) -> (&str, Namespace) {
    match arg.split_once(' ') {
        Some(("svg", name)) => (name, Namespace::Svg),
        Some(("math", name)) => (name, Namespace::MathMl),
        _ => (arg, Namespace::Html),
    }
}

fn parse(cli: &Cli, chunks: &[&[u8]]) -> Result<ParseOutput> {
    let config = ParserConfig::default().with_scripting(cli.scripting);
    let mut parser = HTMLParser::with_config(config);

    match &cli.fragment {
        Some(context) => {
            let (name, namespace) = context_name(context);
            let ancestors: Vec<(&str, Namespace)> = cli
                .context_ancestors
                .iter()
                .map(|a| context_name(a))
                .collect();
            parser.parse_fragment_chunk_begin_in(name, namespace, &ancestors)?;
        }
        None => parser.parse_chunk_begin()?,
    }
    for chunk in chunks {
        parser.parse_chunk(chunk)?;
    }
    Ok(parser.parse_chunk_end()?)
}

/// Run the tokenizer on its own. Without a tree constructor there is
/// nothing to switch it into RCDATA or RAWTEXT.
fn print_tokens(chunks: &[&[u8]]) {
    let mut tokenizer = HTMLTokenizer::new();
    let mut sink = TokenCollector::default();
    tokenizer.begin();
    for chunk in chunks {
        let Ok(()) = tokenizer.chunk(chunk, &mut sink);
    }
    let Ok(()) = tokenizer.end(&mut sink);

    println!("{}", format!("=== Tokens ({}) ===", sink.tokens.len()).bold());
    for (i, token) in sink.tokens.iter().enumerate() {
        println!("  {i:3}: {token}");
    }
    println!();
}

fn print_errors(errors: &[ParseError]) {
    println!();
    println!("{}", format!("=== Parse errors ({}) ===", errors.len()).bold());
    for error in errors {
        let token = error.token.as_deref().unwrap_or("");
        println!(
            "  {:>6}  {}  {}",
            error.position.dimmed(),
            error.kind.red(),
            token
        );
    }
}
