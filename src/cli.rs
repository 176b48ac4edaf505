use std::error::Error;
use std::fs;
use std::path::PathBuf;

use atty::Stream;
use clap::{Parser, Subcommand};
use cryptic_lens::client::{ClientConfig, SolverBackend};
use cryptic_lens::controller::{ClueSubmission, SolveMode};
use cryptic_lens::mock::mock_result;
use cryptic_lens::surface::{Element, ElementKind, RegionId, Surface, TooltipNode};
use cryptic_lens::timeline::SHOW_DELAY_MS;
use cryptic_lens::{GridLayout, Page, SolveResult};
use serde_json::json;
use termimad::{FmtText, MadSkin, terminal_size};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cryptic-lens",
    about = "Solve cryptic crossword clues and inspect the wordplay",
    version
)]
pub struct Cli {
    /// Emit JSON instead of the text breakdown.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a clue to the solving service and show the breakdown.
    Solve {
        /// Clue text. May be empty in mock mode.
        clue: Option<String>,
        /// Expected answer length, passed to the solver as given.
        #[arg(short, long)]
        length: Option<String>,
        /// Use the mock solving endpoint.
        #[arg(long)]
        mock: bool,
        /// Base URL of the solving service.
        #[arg(long, env = "CRYPTIC_LENS_SOLVER_URL")]
        solver_url: Option<String>,
    },
    /// Render a saved result and optionally hover one of its clue words.
    Explain {
        /// JSON solve result to load. Defaults to the built-in mock result.
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Token position to hover.
        #[arg(long)]
        hover: Option<usize>,
    },
    /// Serve the solving page over HTTP.
    #[cfg(feature = "web")]
    Serve {
        /// Address to bind.
        #[arg(long, env = "CRYPTIC_LENS_ADDR", default_value = "127.0.0.1:8080")]
        addr: std::net::SocketAddr,
        /// Base URL of the solving service.
        #[arg(long, env = "CRYPTIC_LENS_SOLVER_URL")]
        solver_url: Option<String>,
        /// Answer with the mock result unless a solver URL is given.
        #[arg(long)]
        mock: bool,
    },
}

impl Command {
    fn default_log_level(&self) -> &'static str {
        match self {
            #[cfg(feature = "web")]
            Command::Serve { .. } => "info",
            _ => "warn",
        }
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.command.default_log_level());
    match cli.command {
        Command::Solve {
            clue,
            length,
            mock,
            solver_url,
        } => handle_solve(clue.unwrap_or_default(), length, mock, solver_url, cli.json),
        Command::Explain { file, hover } => handle_explain(file, hover, cli.json),
        #[cfg(feature = "web")]
        Command::Serve {
            addr,
            solver_url,
            mock,
        } => handle_serve(addr, solver_url, mock),
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn runtime() -> Result<Runtime, Box<dyn Error>> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

fn mode_for(mock: bool) -> SolveMode {
    if mock { SolveMode::Mock } else { SolveMode::Standard }
}

fn solver_config(solver_url: Option<String>) -> Option<ClientConfig> {
    solver_url.map(|base_url| ClientConfig {
        base_url,
        ..ClientConfig::default()
    })
}

fn handle_solve(
    clue: String,
    length: Option<String>,
    mock: bool,
    solver_url: Option<String>,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let mode = mode_for(mock);
    let backend = SolverBackend::from_config(mode, solver_config(solver_url))?;
    let submission = ClueSubmission {
        clue,
        expected_length: length,
    };
    let mut page = Page::new(mode, GridLayout::default());
    runtime()?.block_on(page.solve(&backend, &submission))?;

    let Some(result) = page.result() else {
        return Err(page.surface().text(RegionId::Error).to_string().into());
    };
    if as_json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_surface(page.surface());
    }
    Ok(())
}

fn handle_explain(
    file: Option<PathBuf>,
    hover: Option<usize>,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let result: SolveResult = match &file {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
            serde_json::from_str(&raw)
                .map_err(|err| format!("Failed to parse {}: {err}", path.display()))?
        }
        None => mock_result(),
    };

    // Replays the result through the normal lifecycle; mock mode lets the
    // submission go through without a clue.
    let mut page = Page::new(SolveMode::Mock, GridLayout::default());
    let ticket = page.submit(&ClueSubmission::default())?;
    page.settle(&ticket, Ok(result));

    let hovered = match hover {
        Some(position) => {
            if page.hover_enter(position) == 0 {
                return Err(format!("Token {position} is not an annotated clue word").into());
            }
            page.advance(SHOW_DELAY_MS);
            Some(position)
        }
        None => None,
    };
    let tooltips: Vec<&TooltipNode> = page
        .surface()
        .tooltips_in(page.annotator().generation())
        .collect();

    if as_json {
        let payload = json!({
            "result": page.result(),
            "hover": hovered,
            "tooltips": tooltips.iter().map(|node| tooltip_json(node)).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_surface(page.surface());
        if let Some(position) = hovered {
            print_tooltips(page.surface(), position, &tooltips);
        }
    }
    Ok(())
}

#[cfg(feature = "web")]
fn handle_serve(
    addr: std::net::SocketAddr,
    solver_url: Option<String>,
    mock: bool,
) -> Result<(), Box<dyn Error>> {
    use cryptic_lens::web::{WebConfig, serve};

    let config = WebConfig {
        addr,
        solver: solver_config(solver_url),
        mode: mode_for(mock),
    };
    runtime()?.block_on(serve(config))?;
    Ok(())
}

fn print_surface(surface: &Surface) {
    println!("Answer: {}", surface.text(RegionId::Answer));
    println!("Confidence: {}%", surface.text(RegionId::Confidence));
    println!("Definition: {}", surface.text(RegionId::Definition));

    println!("\nWordplay:");
    print_blocks(surface.children(RegionId::Components));

    if surface.is_visible(RegionId::InteractiveSection) {
        println!("\nClue: {}", annotated_clue(surface));
    }

    if surface.is_visible(RegionId::AttemptsSection) {
        println!("\nAttempted Solutions:");
        print_blocks(surface.children(RegionId::AttemptsList));
    }

    if surface.is_visible(RegionId::ReasoningSection) {
        render_markdown_block("Reasoning", surface.text(RegionId::Reasoning));
    }
}

fn print_blocks(blocks: &[Element]) {
    for block in blocks {
        if block.children.is_empty() {
            println!("  {}", block.text_content());
            continue;
        }
        for child in &block.children {
            match child.kind {
                ElementKind::Heading => println!("  {}", child.text),
                _ if child.has_class("attempt-components") => {
                    for chip in &child.children {
                        println!("    - {}", chip.text_content());
                    }
                }
                _ => println!("    {}", child.text_content()),
            }
        }
    }
}

/// Clue words with their role, e.g. `raised[indicator]`.
fn annotated_clue(surface: &Surface) -> String {
    surface
        .tokens()
        .map(|token| {
            let role = token
                .classes
                .iter()
                .find_map(|class| class.strip_prefix("role-"));
            match role {
                Some(role) => format!("{}[{role}]", token.text),
                None => token.text.clone(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn style_value<'a>(node: &'a TooltipNode, property: &str) -> Option<&'a str> {
    node.element.style.get(property).map(String::as_str)
}

fn tooltip_json(node: &TooltipNode) -> serde_json::Value {
    json!({
        "anchor_position": node.instance.anchor_position,
        "placement": node.instance.placement.to_string(),
        "left": style_value(node, "left"),
        "top": style_value(node, "top"),
        "arrow_offset": style_value(node, "--arrow-offset"),
        "shown": node.is_shown(),
        "entry": node.instance.content,
    })
}

fn print_tooltips(surface: &Surface, hovered: usize, tooltips: &[&TooltipNode]) {
    let word = surface
        .token(hovered)
        .map(|token| token.text.as_str())
        .unwrap_or_default();
    println!("\nHovering \"{word}\" (position {hovered}):");
    for node in tooltips {
        let anchor = surface
            .token(node.instance.anchor_position)
            .map(|token| token.text.as_str())
            .unwrap_or_default();
        println!(
            "- {} tooltip on \"{anchor}\" at left {}, top {}{}",
            node.instance.placement,
            style_value(node, "left").unwrap_or("?"),
            style_value(node, "top").unwrap_or("?"),
            style_value(node, "--arrow-offset")
                .map(|offset| format!(", arrow {offset}"))
                .unwrap_or_default()
        );
        for line in &node.element.children {
            println!("    {}", line.text_content());
        }
    }
}

fn stdout_is_tty() -> bool {
    atty::is(Stream::Stdout)
}

fn markdown_width() -> usize {
    let (width, _) = terminal_size();
    width.max(60) as usize
}

fn render_markdown_block(title: &str, body: &str) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return;
    }
    println!("\n{title}:");
    if stdout_is_tty() {
        let skin = MadSkin::default();
        let formatted = FmtText::from(&skin, trimmed, Some(markdown_width()));
        println!("{formatted}");
    } else {
        println!("{trimmed}");
    }
}
