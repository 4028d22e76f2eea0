//! `contentlib` CLI — terminal client for the content library proxy.
//!
//! Browses the case-study listing, shows detail pages and the privacy
//! policy, and runs the lead and contact forms. Every request goes through
//! the proxy's `/api` surface.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod actions;
mod client;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};

use contentlib_core::fetch::{Fetcher, ItemQuery, ListQuery, PrivacyQuery, View};
use contentlib_core::filter::{
    ALL_CATEGORIES, CategoryFilter, SearchQuery, category_options, filter_items,
};
use contentlib_core::form::{
    ContactForm, DynamicLeadForm, LeadSource, LegacyLeadForm, Notice, PostSubmitAction,
};
use contentlib_core::model::{ContentItem, ContentKey, UtmParams};
use contentlib_core::urls::{DEFAULT_API_BASE_URL, UrlResolver};

use crate::client::ProxyClient;
use crate::render::{BOLD, CYAN, DIM, RED, RESET, success, warning};

// ── CLI structure ────────────────────────────────────────────────────

/// contentlib — gated content, one command away.
#[derive(Parser)]
#[command(
    name = "contentlib",
    version,
    about = "contentlib CLI — browse case studies, download gated content, and get in touch",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         CONTENTLIB_ADDR        Proxy address (default: http://127.0.0.1:3000)\n  \
         PUBLIC_IMAGE_API_URL   Base URL for relative media paths\n\n\
         {DIM}Examples:{RESET}\n  \
         contentlib list --category Hardware --search scanner\n  \
         contentlib show granit-ultra-series\n  \
         contentlib lead 12 --field 'Full Name=Ada Lovelace' --field 'Work Email=ada@example.com' --agree\n  \
         contentlib contact --name Ada --email ada@example.com --requirements 'Webinar' --agree"
    ),
)]
struct Cli {
    /// Content proxy address.
    #[arg(long, env = "CONTENTLIB_ADDR", default_value = "http://127.0.0.1:3000")]
    addr: String,

    /// Base URL that relative image and file paths are resolved against.
    #[arg(long, env = "PUBLIC_IMAGE_API_URL", default_value = DEFAULT_API_BASE_URL)]
    image_base: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List case studies, optionally filtered by category and search text.
    List {
        /// Listing page to fetch.
        #[arg(long, default_value = "1")]
        page: u32,
        /// Category to show ("All" for every category).
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
        /// Case-insensitive text matched against title, description and category.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one case study by numeric id or slug.
    Show {
        /// Numeric id or slug.
        key: String,
    },
    /// Submit the case study's lead form, then open its link or download its file.
    Lead {
        /// Numeric id or slug.
        key: String,
        /// Form value as `Field Name=value` (repeatable).
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
        /// Agree to the privacy policy.
        #[arg(long)]
        agree: bool,
        /// Directory downloaded files are saved to.
        #[arg(long, env = "CONTENTLIB_DOWNLOAD_DIR", default_value = ".")]
        download_dir: PathBuf,
        /// Print the external link instead of opening a browser.
        #[arg(long)]
        no_open: bool,
    },
    /// Submit the fixed-field lead form for a case study.
    LegacyLead {
        /// Numeric id or slug.
        key: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        job_title: Option<String>,
        /// download, website, referral, social or other.
        #[arg(long, default_value = "download")]
        lead_source: LeadSource,
        #[arg(long)]
        message: Option<String>,
        /// Agree to the privacy policy.
        #[arg(long)]
        agree: bool,
        /// Page URL whose `utm_*` parameters are attached to the lead.
        #[arg(long)]
        page_url: Option<String>,
    },
    /// Send the contact form.
    Contact {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        /// What you are looking for.
        #[arg(long)]
        requirements: Option<String>,
        /// Agree to the privacy policy.
        #[arg(long)]
        agree: bool,
        /// Page URL whose `utm_*` parameters are attached to the message.
        #[arg(long)]
        page_url: Option<String>,
    },
    /// Show the privacy policy.
    Privacy,
}

struct App {
    client: ProxyClient,
    resolver: UrlResolver,
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let app = App {
        client: ProxyClient::new(&cli.addr),
        resolver: UrlResolver::new(&cli.image_base),
    };

    match run(&app, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(app: &App, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::List {
            page,
            category,
            search,
        } => cmd_list(app, page, &category, &search).await,
        Commands::Show { key } => cmd_show(app, &key).await,
        Commands::Lead {
            key,
            fields,
            agree,
            download_dir,
            no_open,
        } => cmd_lead(app, &key, &fields, agree, &download_dir, no_open).await,
        Commands::LegacyLead {
            key,
            name,
            email,
            phone,
            company,
            job_title,
            lead_source,
            message,
            agree,
            page_url,
        } => {
            let mut form = LegacyLeadForm::with_utm(utm_from(page_url.as_deref()));
            form.name = name.unwrap_or_default();
            form.email = email.unwrap_or_default();
            form.phone = phone.unwrap_or_default();
            form.company = company.unwrap_or_default();
            form.job_title = job_title.unwrap_or_default();
            form.lead_source = lead_source;
            if let Some(message) = message {
                form.message = message;
            }
            form.agreed = agree;
            cmd_legacy_lead(app, &key, form).await
        }
        Commands::Contact {
            name,
            email,
            phone,
            company,
            requirements,
            agree,
            page_url,
        } => {
            let form = ContactForm {
                full_name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
                phone: phone.unwrap_or_default(),
                company: company.unwrap_or_default(),
                requirements: requirements.unwrap_or_default(),
                agreed: agree,
                utm: utm_from(page_url.as_deref()),
            };
            cmd_contact(app, form).await
        }
        Commands::Privacy => cmd_privacy(app).await,
    }
}

// ── Browsing ─────────────────────────────────────────────────────────

async fn cmd_list(app: &App, page: u32, category: &str, search: &str) -> Result<()> {
    let fetcher = Fetcher::new();
    fetcher.load(&app.client, &ListQuery { page }).await;
    let state = fetcher.snapshot().await;
    let listing = ready(state.view("No case studies found"))?;

    let category = CategoryFilter::from_label(category);
    let options = category_options(&listing.items);
    if !options.iter().any(|o| o == category.label()) {
        warning(&format!("no case studies in category '{}'", category.label()));
    }
    let shown = filter_items(&listing.items, &category, &SearchQuery::new(search));

    println!();
    render::print_listing(listing, &shown, &options, category.label(), &app.resolver);
    Ok(())
}

async fn cmd_show(app: &App, key: &str) -> Result<()> {
    let item = load_item(app, key).await?;
    println!();
    render::print_detail(&item, &app.resolver);
    println!();
    Ok(())
}

async fn cmd_privacy(app: &App) -> Result<()> {
    let fetcher = Fetcher::new();
    fetcher.load(&app.client, &PrivacyQuery).await;
    let state = fetcher.snapshot().await;

    println!();
    match ready(state.view("No privacy policy content available."))? {
        Some(policy) => render::print_privacy(policy),
        None => warning("No privacy policy content available."),
    }
    println!();
    Ok(())
}

// ── Forms ────────────────────────────────────────────────────────────

async fn cmd_lead(
    app: &App,
    key: &str,
    fields: &[String],
    agree: bool,
    download_dir: &Path,
    no_open: bool,
) -> Result<()> {
    let item = load_item(app, key).await?;
    let mut form = DynamicLeadForm::for_item(&item);

    for (name, value) in parse_field_pairs(fields)? {
        if !form.set_value_by_name(name, value) {
            let known: Vec<&str> = form.fields().iter().map(|f| f.field_name.as_str()).collect();
            bail!(
                "'{name}' is not a field of this form (fields: {})",
                known.join(", ")
            );
        }
    }
    form.set_agreed(agree);

    let outcome = form.submit(&app.client, Some(&item), &app.resolver).await;
    report(&outcome.notice)?;

    match outcome.action {
        Some(PostSubmitAction::OpenLink(url)) => {
            println!();
            println!("  {CYAN}{url}{RESET}");
            if !no_open {
                println!("  {DIM}Opening in your browser...{RESET}");
                actions::open_in_browser(&url);
            }
        }
        Some(PostSubmitAction::Download(url)) => {
            println!("  {DIM}Downloading {url}...{RESET}");
            let path = actions::download(app.client.http(), &url, download_dir).await?;
            success(&format!("Saved {}", path.display()));
        }
        None => {}
    }
    Ok(())
}

async fn cmd_legacy_lead(app: &App, key: &str, mut form: LegacyLeadForm) -> Result<()> {
    let item = load_item(app, key).await?;
    let outcome = form.submit(&app.client, Some(&item)).await;
    report(&outcome.notice)
}

async fn cmd_contact(app: &App, mut form: ContactForm) -> Result<()> {
    let outcome = form.submit(&app.client).await;
    report(&outcome.notice)
}

// ── Helpers ──────────────────────────────────────────────────────────

async fn load_item(app: &App, key: &str) -> Result<ContentItem> {
    let fetcher = Fetcher::new();
    fetcher
        .load(&app.client, &ItemQuery(ContentKey::parse(key)))
        .await;
    let state = fetcher.snapshot().await;
    ready(state.view("Case study not found")).cloned()
}

/// Turn a finished fetch view into its data or an error.
fn ready<'a, T>(view: View<'a, T>) -> Result<&'a T> {
    match view {
        View::Ready(data) => Ok(data),
        View::Failed(message) => Err(anyhow!("{message}")),
        View::Loading => Err(anyhow!("request did not complete")),
    }
}

fn report(notice: &Notice) -> Result<()> {
    match notice {
        Notice::Success(message) => {
            println!();
            success(message);
            Ok(())
        }
        Notice::Error(message) => Err(anyhow!("{message}")),
    }
}

fn utm_from(page_url: Option<&str>) -> UtmParams {
    page_url.map(UtmParams::from_url).unwrap_or_default()
}

fn parse_field_pairs(pairs: &[String]) -> Result<Vec<(&str, &str)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .ok_or_else(|| anyhow!("invalid NAME=VALUE pair: '{pair}'"))
        })
        .collect()
}
