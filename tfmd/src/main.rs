//! tfmd - Terminal Friendly Markdown, a Markdown previewer for the terminal

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tfmd_core::pager::{decide, Environment, SystemHost};
use tfmd_core::render_config::FALLBACK_WIDTH;
use tfmd_core::{
    resolve_theme, Config, Document, PagerBackend, PagerMode, PagerOptions, PagingDecision,
    RenderConfig, ThemePreset, ThemeSelection,
};
use tfmd_tui::{open_pager, render_paged, viewer_availability};

/// Render Markdown in the terminal
#[derive(Parser, Debug)]
#[command(name = "tfmd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Markdown file to render; omit or pass `-` to read stdin
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// When to page the output
    #[arg(short, long, value_enum, value_name = "WHEN")]
    pager: Option<PagerArg>,

    /// Wrap long lines to the render width
    #[arg(long)]
    soft_wrap: bool,

    /// Show a table of contents before the document
    #[arg(long)]
    toc: bool,

    /// Show the raw front matter before the document
    #[arg(long = "show-fm")]
    show_fm: bool,

    /// Render width in columns (default: terminal width)
    #[arg(long)]
    width: Option<u16>,

    /// Style preset
    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,

    /// Disable the style preset
    #[arg(long)]
    no_style: bool,

    /// Palette for code blocks, e.g. solarized-dark
    #[arg(long, value_name = "NAME")]
    code_theme: Option<String>,

    /// Pager backend
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Keep the content on screen after the pager exits
    #[arg(long)]
    leave_on_exit: bool,

    /// Read defaults from this TOML file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PagerArg {
    Auto,
    Always,
    Never,
}

impl From<PagerArg> for PagerMode {
    fn from(arg: PagerArg) -> Self {
        match arg {
            PagerArg::Auto => PagerMode::Auto,
            PagerArg::Always => PagerMode::Always,
            PagerArg::Never => PagerMode::Never,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Default,
    Light,
    Dark,
    GithubDark,
    GithubLight,
}

impl From<ThemeArg> for ThemePreset {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Default => ThemePreset::Default,
            ThemeArg::Light | ThemeArg::GithubLight => ThemePreset::GithubLight,
            ThemeArg::Dark | ThemeArg::GithubDark => ThemePreset::GithubDark,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    Less,
    Tui,
}

impl From<BackendArg> for PagerBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Less => PagerBackend::Less,
            BackendArg::Tui => PagerBackend::Tui,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("tfmd: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let env = Environment::capture();

    let paging = decide(&pager_options(&args, &config), &SystemHost::new(&env), &env);
    if paging == PagingDecision::Viewer {
        if let Some(message) = viewer_availability(io::stdout().is_terminal()).message() {
            eprintln!("{message}");
            return Ok(ExitCode::from(1));
        }
    }

    let doc = load_document(args.file.as_deref())?;

    let render_config = RenderConfig {
        width: render_width(args.width.or(config.render.width)),
        soft_wrap: args.soft_wrap || config.render.soft_wrap,
        show_toc: args.toc || config.render.toc,
        show_front_matter: args.show_fm || config.render.show_front_matter,
        theme: theme_selection(&args, &config),
        paging,
    };
    log::debug!("render config: {:?}", render_config);

    let pager = open_pager(&render_config.paging, &doc.display_name())?;
    render_paged(&doc, &render_config, pager)?;

    Ok(ExitCode::SUCCESS)
}

fn load_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load().context("Failed to load configuration"),
    }
}

/// Command-line flags over config file values
fn pager_options(args: &Args, config: &Config) -> PagerOptions {
    PagerOptions {
        mode: args.pager.map(Into::into).unwrap_or(config.pager.mode),
        backend: args.backend.map(Into::into).unwrap_or(config.pager.backend),
        leave_on_exit: args.leave_on_exit || config.pager.leave_on_exit,
    }
}

fn theme_selection(args: &Args, config: &Config) -> ThemeSelection {
    let preset = args.theme.map(Into::into).unwrap_or(config.theme);
    let code_theme = args.code_theme.as_deref().or(config.code_theme.as_deref());
    resolve_theme(preset, args.no_style || config.no_style, code_theme)
}

fn render_width(explicit: Option<u16>) -> u16 {
    if let Some(width) = explicit.filter(|w| *w > 0) {
        return width;
    }
    if !io::stdout().is_terminal() {
        return FALLBACK_WIDTH;
    }
    crossterm::terminal::size()
        .map(|(cols, _)| cols)
        .unwrap_or(FALLBACK_WIDTH)
}

fn load_document(file: Option<&Path>) -> Result<Document> {
    match file {
        Some(path) if path != Path::new("-") => Document::load(path),
        _ => Document::from_reader(io::stdin().lock()),
    }
}
