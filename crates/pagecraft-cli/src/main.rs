//! `pagecraft` — command-line client for the Pagecraft server.
//!
//! Page, lead and stats commands talk to the server's REST API. The `theme`
//! and `highlights` commands run locally against `pagecraft-core`.

mod client;
mod output;

use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value, json};

use pagecraft_core::highlight::{cleanup_highlights, suggest_highlights, toggle_highlight};
use pagecraft_core::{classes_for, css_variables_for, resolve_theme, rgba};

use crate::client::Client;

// ── CLI structure ────────────────────────────────────────────────────

/// Pagecraft — AI landing pages from a single prompt.
#[derive(Parser)]
#[command(
    name = "pagecraft",
    version,
    about = "Pagecraft CLI — generate landing pages and read their leads and stats",
    long_about = None,
    after_help = "Environment variables:\n  \
         PAGECRAFT_ADDR    Server address (default: http://127.0.0.1:8300)\n  \
         PAGECRAFT_TOKEN   Session token\n\n\
         Examples:\n  \
         pagecraft generate \"A bakery that delivers sourdough before breakfast\"\n  \
         pagecraft stats 3f1c...\n  \
         pagecraft theme --mode black --accent '#FF6600' --opacity 0.2\n  \
         pagecraft highlights suggest \"Ship faster with AI\""
)]
struct Cli {
    /// Pagecraft server address.
    #[arg(long, env = "PAGECRAFT_ADDR", default_value = "http://127.0.0.1:8300")]
    addr: String,

    /// Session token.
    #[arg(long, env = "PAGECRAFT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print raw JSON instead of formatted output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is up.
    Status,
    /// Generate a landing page from a description.
    Generate {
        /// Plain-language description of the product.
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// List your pages.
    Pages,
    /// Show one page with its full config.
    Show {
        /// Page id.
        id: String,
    },
    /// List leads captured on a page.
    Leads {
        /// Page id.
        id: String,
    },
    /// Show event counts and conversion rate for a page.
    Stats {
        /// Page id.
        id: String,
    },
    /// Resolve a theme and print its classes and CSS variables.
    Theme {
        /// `white` or `black`.
        #[arg(long)]
        mode: Option<String>,
        /// Accent color as `#RRGGBB`.
        #[arg(long)]
        accent: Option<String>,
        /// Also print the accent as `rgba(...)` at this opacity.
        #[arg(long)]
        opacity: Option<f64>,
    },
    /// Headline highlight helpers.
    Highlights {
        #[command(subcommand)]
        action: HighlightCommands,
    },
}

#[derive(Subcommand)]
enum HighlightCommands {
    /// Suggest up to three words to highlight.
    Suggest {
        /// Headline text.
        text: String,
    },
    /// Add a word to the highlight set, or remove it if present.
    Toggle {
        /// Word to toggle.
        word: String,
        /// Current highlights.
        #[arg(long = "current", value_delimiter = ',')]
        current: Vec<String>,
    },
    /// Drop highlights that no longer appear in the text.
    Cleanup {
        /// Headline text.
        text: String,
        /// Current highlights.
        #[arg(long = "current", value_delimiter = ',')]
        current: Vec<String>,
    },
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Theme {
            mode,
            accent,
            opacity,
        } => cmd_theme(mode.as_deref(), accent.as_deref(), opacity, json),
        Commands::Highlights { action } => {
            cmd_highlights(action, json);
            Ok(())
        }
        command => {
            let client = Client::new(&cli.addr, cli.token)?;
            run_remote(&client, command, json).await
        }
    }
}

async fn run_remote(client: &Client, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Status => cmd_status(client, json).await,
        Commands::Generate { prompt } => cmd_generate(client, &prompt.join(" "), json).await,
        Commands::Pages => cmd_pages(client, json).await,
        Commands::Show { id } => cmd_show(client, &id).await,
        Commands::Leads { id } => cmd_leads(client, &id, json).await,
        Commands::Stats { id } => cmd_stats(client, &id, json).await,
        Commands::Theme { .. } | Commands::Highlights { .. } => {
            bail!("local command dispatched to the server")
        }
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("-")
}

/// Page URLs are relative unless the server knows its public address.
fn absolute_url(client: &Client, url: &str) -> String {
    if url.starts_with('/') {
        format!("{}{url}", client.addr())
    } else {
        url.to_owned()
    }
}

// ── Remote commands ──────────────────────────────────────────────────

async fn cmd_status(client: &Client, json: bool) -> Result<()> {
    let resp = client.get_no_auth("/v1/sys/health").await?;
    if json {
        output::print_json(&resp);
        return Ok(());
    }
    output::header("●", "Pagecraft Status");
    output::kv_line("Server", client.addr());
    output::kv_line("Status", str_field(&resp, "status"));
    output::kv_line("Version", str_field(&resp, "version"));
    Ok(())
}

async fn cmd_generate(client: &Client, prompt: &str, json: bool) -> Result<()> {
    if prompt.trim().is_empty() {
        bail!("prompt must not be empty");
    }
    let resp = client
        .post("/v1/pages/generate", &json!({ "prompt": prompt }))
        .await?;
    if json {
        output::print_json(&resp);
        return Ok(());
    }

    output::success("Page generated");
    output::blank();
    output::kv_line("Title", str_field(&resp, "title"));
    output::kv_line("Id", str_field(&resp, "id"));
    output::kv_line("Slug", str_field(&resp, "slug"));
    output::kv_line("URL", &absolute_url(client, str_field(&resp, "url")));
    if let Some(headline) = resp.pointer("/config/hero/headline").and_then(Value::as_str) {
        output::kv_line("Headline", headline);
    }
    Ok(())
}

async fn cmd_pages(client: &Client, json: bool) -> Result<()> {
    let resp = client.get("/v1/pages").await?;
    if json {
        output::print_json(&resp);
        return Ok(());
    }

    let pages = resp.get("pages").and_then(Value::as_array);
    output::header("▤", "Pages");
    match pages {
        Some(pages) if !pages.is_empty() => {
            for page in pages {
                output::kv_line(str_field(page, "title"), str_field(page, "id"));
                output::line(&format!(
                    "{:<20} {}",
                    "",
                    absolute_url(client, str_field(page, "url"))
                ));
            }
        }
        _ => output::warning("No pages yet. Try: pagecraft generate \"<your idea>\""),
    }
    Ok(())
}

async fn cmd_show(client: &Client, id: &str) -> Result<()> {
    let resp = client.get(&format!("/v1/pages/{id}")).await?;
    output::print_json(&resp);
    Ok(())
}

async fn cmd_leads(client: &Client, id: &str, json: bool) -> Result<()> {
    let resp = client.get(&format!("/v1/pages/{id}/leads")).await?;
    if json {
        output::print_json(&resp);
        return Ok(());
    }

    let leads = resp.get("leads").and_then(Value::as_array);
    output::header("✉", "Leads");
    match leads {
        Some(leads) if !leads.is_empty() => {
            for lead in leads {
                let name = lead.get("name").and_then(Value::as_str).unwrap_or("");
                output::kv_line(str_field(lead, "email"), name);
            }
        }
        _ => output::warning("No leads captured yet."),
    }
    Ok(())
}

async fn cmd_stats(client: &Client, id: &str, json: bool) -> Result<()> {
    let resp = client.get(&format!("/v1/pages/{id}/stats")).await?;
    if json {
        output::print_json(&resp);
        return Ok(());
    }

    let count = |key: &str| resp.get(key).map_or_else(|| "0".to_owned(), Value::to_string);
    output::header("▲", "Page Stats");
    output::kv_line("Page views", &count("page_views"));
    output::kv_line("CTA clicks", &count("cta_clicks"));
    output::kv_line("Form submits", &count("form_submits"));
    output::kv_line("Leads", &count("leads"));
    let rate = resp
        .get("conversion_rate")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    output::kv_line("Conversion", &format!("{:.1}%", rate * 100.0));
    Ok(())
}

// ── Local commands ───────────────────────────────────────────────────

fn cmd_theme(
    mode: Option<&str>,
    accent: Option<&str>,
    opacity: Option<f64>,
    json: bool,
) -> Result<()> {
    let mut raw = Map::new();
    if let Some(mode) = mode {
        raw.insert("mode".to_owned(), json!(mode));
    }
    if let Some(accent) = accent {
        raw.insert("accentColor".to_owned(), json!(accent));
    }
    let theme = resolve_theme(Some(&Value::Object(raw)), None);
    let classes = classes_for(&theme);
    let variables = css_variables_for(&theme);
    let accent_rgba = opacity
        .map(|o| rgba(&theme.accent_color, o))
        .transpose()?;

    if json {
        output::print_json(&json!({
            "theme": theme,
            "classes": classes,
            "css_variables": variables,
            "accent_rgba": accent_rgba,
        }));
        return Ok(());
    }

    if accent.is_some_and(|a| a != theme.accent_color) {
        output::warning("accent is not a #RRGGBB color; using the default");
    }
    output::header("◐", "Theme");
    output::kv_line("Mode", theme.mode.as_str());
    output::swatch("Accent", &theme.accent_color);
    if let Some(value) = &accent_rgba {
        output::kv_line("Accent (rgba)", value);
    }
    output::blank();
    for (role, class) in classes.roles() {
        output::kv_line(role, class);
    }
    output::blank();
    for variable in &variables {
        output::kv_line(variable.name, &variable.value);
    }
    Ok(())
}

fn cmd_highlights(action: HighlightCommands, json: bool) {
    let highlights = match action {
        HighlightCommands::Suggest { text } => suggest_highlights(&text),
        HighlightCommands::Toggle { word, current } => toggle_highlight(&word, &current),
        HighlightCommands::Cleanup { text, current } => cleanup_highlights(&current, &text),
    };

    if json {
        output::print_json(&json!({ "highlights": highlights }));
    } else if highlights.is_empty() {
        output::warning("No highlights.");
    } else {
        for word in &highlights {
            output::line(word);
        }
    }
}
