//! Terminal client for the deals service.
//!
//! # Usage
//!
//! ```bash
//! # First page of every deal
//! cargo run --bin deals -- list
//!
//! # Won deals mentioning "acme", second page of 20
//! cargo run --bin deals -- list --search acme --stage won --limit 20 --page 2
//!
//! # One deal
//! cargo run --bin deals -- show 42
//!
//! # Interactive search with debounced fetching
//! cargo run --bin deals -- browse
//! ```
//!
//! # Environment Variables
//!
//! - `DEALS_API_URL`: service base URL (default: `http://localhost:3000`)
//! - `RUST_LOG`: log filter for diagnostics on stderr (default: `warn`)

use deals_service::client::{
    Action, BrowserState, DealsSource, FilterKey, HttpDealsClient, PAGE_SIZE_OPTIONS,
    PageControl, QueryBuilder, QueryParams, reduce,
};
use deals_service::domain::entities::{Deal, DealStage};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::{Input, Select};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Search, filter and page through deals.
#[derive(Parser)]
#[command(name = "deals")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the deals service
    #[arg(
        long,
        env = "DEALS_API_URL",
        default_value = "http://localhost:3000",
        global = true
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List deals matching the given filters
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Page to show (1-indexed)
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Deals per page
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Show a single deal
    Show {
        /// Deal ID
        id: i64,
    },

    /// Interactive search session
    Browse,
}

#[derive(Args)]
struct FilterArgs {
    /// Substring of the deal name, contact name or company
    #[arg(short, long)]
    search: Option<String>,

    /// new, in_progress, negotiation, won or lost
    #[arg(long)]
    stage: Option<String>,

    /// Minimum deal value
    #[arg(long)]
    min_value: Option<String>,

    /// Maximum deal value
    #[arg(long)]
    max_value: Option<String>,

    /// Earliest creation date (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// Latest close date (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<String>,
}

impl FilterArgs {
    fn into_actions(self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(search) = self.search {
            actions.push(Action::SetSearch(search));
        }
        let filters = [
            (FilterKey::Stage, self.stage),
            (FilterKey::MinValue, self.min_value),
            (FilterKey::MaxValue, self.max_value),
            (FilterKey::StartDate, self.start_date),
            (FilterKey::EndDate, self.end_date),
        ];
        for (key, value) in filters {
            if let Some(value) = value {
                actions.push(Action::SetFilter(key, value));
            }
        }
        actions
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = HttpDealsClient::new(&cli.api_url).context("Invalid --api-url")?;

    match cli.command {
        Commands::List {
            filters,
            page,
            limit,
        } => list_deals(&client, filters, page, limit).await?,
        Commands::Show { id } => show_deal(&client, id).await?,
        Commands::Browse => browse(client).await?,
    }

    Ok(())
}

/// One-shot listing. Runs the same reducer as `browse`, without debounce.
async fn list_deals(client: &HttpDealsClient, filters: FilterArgs, page: u32, limit: u32) -> Result<()> {
    let mut state = reduce(BrowserState::default(), Action::ChangeLimit(limit));
    if state.pagination.limit != limit {
        anyhow::bail!("--limit must be between 1 and 100, got {}", limit);
    }
    for action in filters.into_actions() {
        state = reduce(state, action);
    }

    let params = QueryParams::build(&state.criteria, page, state.pagination.limit);
    let result = client
        .fetch_deals(&params)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to fetch deals: {}", e))?;

    state = reduce(state, Action::FetchStarted { request_id: 1 });
    state = reduce(
        state,
        Action::FetchSucceeded {
            request_id: 1,
            page: result,
        },
    );

    if page != 1 {
        let before = state.pagination.page;
        state = reduce(state, Action::ChangePage(page));
        if state.pagination.page == before {
            println!(
                "{}",
                format!(
                    "⚠️  Page {} is out of range (1-{}), showing page {}",
                    page,
                    state.pagination.total_pages.max(1),
                    before
                )
                .yellow()
            );
        }
    }

    render_state(&state);
    Ok(())
}

async fn show_deal(client: &HttpDealsClient, id: i64) -> Result<()> {
    let deal = client
        .fetch_deal(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to fetch deal {}: {}", id, e))?;

    render_deal(&deal);
    Ok(())
}

#[derive(Clone, Copy)]
enum MenuItem {
    Search,
    Filter,
    NextPage,
    PreviousPage,
    GoToPage,
    PageSize,
    ShowDeal,
    ClearFilters,
    DismissError,
    Refresh,
    Quit,
}

impl MenuItem {
    fn label(&self) -> &'static str {
        match self {
            MenuItem::Search => "Search",
            MenuItem::Filter => "Set filter",
            MenuItem::NextPage => "Next page",
            MenuItem::PreviousPage => "Previous page",
            MenuItem::GoToPage => "Go to page",
            MenuItem::PageSize => "Page size",
            MenuItem::ShowDeal => "Show deal",
            MenuItem::ClearFilters => "Clear filters",
            MenuItem::DismissError => "Dismiss error",
            MenuItem::Refresh => "Refresh",
            MenuItem::Quit => "Quit",
        }
    }

    fn for_state(state: &BrowserState) -> Vec<MenuItem> {
        let mut items = vec![MenuItem::Search, MenuItem::Filter];
        if state.pagination.page < state.pagination.total_pages {
            items.push(MenuItem::NextPage);
        }
        if state.pagination.page > 1 {
            items.push(MenuItem::PreviousPage);
        }
        if state.pagination.total_pages > 1 {
            items.push(MenuItem::GoToPage);
        }
        items.extend([MenuItem::PageSize, MenuItem::ShowDeal]);
        if state.has_active_filters() {
            items.push(MenuItem::ClearFilters);
        }
        if state.error.is_some() {
            items.push(MenuItem::DismissError);
        }
        items.extend([MenuItem::Refresh, MenuItem::Quit]);
        items
    }
}

/// Interactive session driving the debounced [`QueryBuilder`].
async fn browse(client: HttpDealsClient) -> Result<()> {
    println!("{}", "📇 Deals".bright_blue().bold());
    println!("   {}", client.base_url().as_str().bright_black());
    println!();

    let mut builder = QueryBuilder::new(Arc::new(client));
    let mut rx = builder.subscribe();

    let seen = rx.borrow().latest_request;
    builder.refresh();
    let mut state = wait_for_fetch(&mut rx, seen).await?;

    loop {
        render_state(&state);

        let items = MenuItem::for_state(&state);
        let labels: Vec<&'static str> = items.iter().map(MenuItem::label).collect();
        let choice = prompt(move || {
            Select::new()
                .with_prompt("Action")
                .items(&labels)
                .default(0)
                .interact()
        })
        .await?;

        let seen = rx.borrow().latest_request;
        let changed = match items[choice] {
            MenuItem::Search => {
                let current = state.criteria.search.clone();
                let text: String = prompt(move || {
                    Input::<String>::new()
                        .with_prompt("Search name, contact or company")
                        .with_initial_text(current)
                        .allow_empty(true)
                        .interact_text()
                })
                .await?;
                builder.set_search(text)
            }
            MenuItem::Filter => {
                let (key, value) = prompt_filter(&state).await?;
                builder.set_filter(key, value)
            }
            MenuItem::NextPage => builder.change_page(state.pagination.page + 1),
            MenuItem::PreviousPage => builder.change_page(state.pagination.page - 1),
            MenuItem::GoToPage => {
                let total_pages = state.pagination.total_pages;
                let page: u32 = prompt(move || {
                    Input::<u32>::new()
                        .with_prompt(format!("Page (1-{total_pages})"))
                        .interact_text()
                })
                .await?;
                let accepted = builder.change_page(page);
                if !accepted && page != state.pagination.page {
                    println!("{}", format!("⚠️  No page {page}").yellow());
                }
                accepted
            }
            MenuItem::PageSize => {
                let labels: Vec<String> = PAGE_SIZE_OPTIONS.iter().map(u32::to_string).collect();
                let current = PAGE_SIZE_OPTIONS
                    .iter()
                    .position(|&size| size == state.pagination.limit)
                    .unwrap_or(0);
                let index = prompt(move || {
                    Select::new()
                        .with_prompt("Deals per page")
                        .items(&labels)
                        .default(current)
                        .interact()
                })
                .await?;
                builder.change_limit(PAGE_SIZE_OPTIONS[index])
            }
            MenuItem::ShowDeal => {
                let id: i64 = prompt(|| Input::<i64>::new().with_prompt("Deal ID").interact_text()).await?;
                match builder.fetch_deal(id).await {
                    Ok(deal) => render_deal(&deal),
                    Err(e) => println!("{}", format!("❌ {e}").red()),
                }
                false
            }
            MenuItem::ClearFilters => builder.clear_filters(),
            MenuItem::DismissError => {
                builder.dismiss_error();
                false
            }
            MenuItem::Refresh => {
                builder.refresh();
                true
            }
            MenuItem::Quit => break,
        };

        state = if changed {
            wait_for_fetch(&mut rx, seen).await?
        } else {
            rx.borrow().clone()
        };
    }

    Ok(())
}

/// Waits until a request newer than `seen` has completed.
async fn wait_for_fetch(rx: &mut watch::Receiver<BrowserState>, seen: u64) -> Result<BrowserState> {
    let state = rx
        .wait_for(|s| s.latest_request > seen && !s.loading)
        .await
        .context("Query builder stopped")?;
    Ok(state.clone())
}

async fn prompt_filter(state: &BrowserState) -> Result<(FilterKey, String)> {
    let keys: Vec<String> = FilterKey::ALL
        .iter()
        .map(|key| {
            let value = state.criteria.get(*key);
            if value.is_empty() {
                key.to_string()
            } else {
                format!("{key} = {value}")
            }
        })
        .collect();
    let index = prompt(move || Select::new().with_prompt("Filter").items(&keys).interact()).await?;
    let key = FilterKey::ALL[index];

    let value = match key {
        FilterKey::Stage => {
            let mut labels = vec!["(any)".to_string()];
            labels.extend(DealStage::ALL.iter().map(|s| s.label().to_string()));
            let index = prompt(move || {
                Select::new()
                    .with_prompt("Stage")
                    .items(&labels)
                    .default(0)
                    .interact()
            })
            .await?;
            index
                .checked_sub(1)
                .map(|i| DealStage::ALL[i].as_str().to_string())
                .unwrap_or_default()
        }
        _ => {
            let hint = match key {
                FilterKey::StartDate | FilterKey::EndDate => "YYYY-MM-DD, empty to clear",
                _ => "amount, empty to clear",
            };
            let current = state.criteria.get(key).to_string();
            prompt(move || {
                Input::<String>::new()
                    .with_prompt(format!("{key} ({hint})"))
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()
            })
            .await?
        }
    };

    Ok((key, value))
}

/// Runs a blocking dialoguer prompt off the async workers.
async fn prompt<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .context("Prompt task failed")?;
    Ok(result?)
}

fn render_state(state: &BrowserState) {
    println!();

    if let Some(error) = &state.error {
        println!("{}", format!("❌ {error}").red().bold());
        println!();
    }

    let active = describe_filters(state);
    if !active.is_empty() {
        println!("  {} {}", "Filters:".bright_white(), active.cyan());
        println!();
    }

    let deals = state.visible_deals();
    if deals.is_empty() {
        if state.error.is_none() {
            if state.has_active_filters() {
                println!("{}", "  No deals match your filters".yellow());
            } else {
                println!("{}", "  No deals found".yellow());
            }
        }
        println!();
        return;
    }

    println!(
        "  {:<6} {:<28} {:<22} {:<18} {:>12}  {:<13} {:<12} {:<12}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Company".bright_white().bold(),
        "Contact".bright_white().bold(),
        "Value".bright_white().bold(),
        "Stage".bright_white().bold(),
        "Created".bright_white().bold(),
        "Closes".bright_white().bold()
    );
    println!("  {}", "─".repeat(132).bright_black());

    for deal in deals {
        println!(
            "  {:<6} {:<28} {:<22} {:<18} {:>12}  {:<13} {:<12} {:<12}",
            deal.id.to_string().bright_black(),
            truncate(&deal.name, 28),
            truncate(&deal.company, 22).cyan(),
            truncate(&deal.contact_name, 18),
            format_currency(deal.value).bright_green(),
            stage_badge(deal.stage),
            deal.created_at.format("%b %d, %Y").to_string().bright_black(),
            format_close_date(deal).bright_black()
        );
    }

    println!();
    let pagination = &state.pagination;
    println!(
        "  Page {} of {}  ({} deals, {} per page)",
        pagination.page.to_string().bright_white().bold(),
        pagination.total_pages.max(1),
        pagination.total.to_string().bright_white().bold(),
        pagination.limit
    );
    if pagination.total_pages > 1 {
        println!("  {}", render_page_controls(&state.page_controls()));
    }
    println!();
}

fn render_deal(deal: &Deal) {
    println!();
    println!("{}", format!("📄 {}", deal.name).bright_blue().bold());
    println!();
    println!("  ID:       {}", deal.id.to_string().bright_black());
    println!("  Company:  {}", deal.company.cyan());
    println!("  Contact:  {}", deal.contact_name);
    println!("  Value:    {}", format_currency(deal.value).bright_green().bold());
    println!("  Stage:    {}", stage_badge(deal.stage));
    println!("  Created:  {}", deal.created_at.format("%b %d, %Y %H:%M"));
    println!("  Closes:   {}", format_close_date(deal));
    println!();
}

fn describe_filters(state: &BrowserState) -> String {
    let criteria = &state.criteria;
    let mut parts = Vec::new();
    if !criteria.search.trim().is_empty() {
        parts.push(format!("search \"{}\"", criteria.search.trim()));
    }
    for key in FilterKey::ALL {
        let value = criteria.get(key).trim();
        if !value.is_empty() {
            parts.push(format!("{key}={value}"));
        }
    }
    parts.join(", ")
}

fn render_page_controls(controls: &[PageControl]) -> String {
    controls
        .iter()
        .map(|control| match control {
            PageControl::Page {
                number,
                current: true,
            } => format!("[{number}]").bright_white().bold().to_string(),
            PageControl::Page { number, .. } => number.to_string().bright_black().to_string(),
            PageControl::Ellipsis => "…".bright_black().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn stage_badge(stage: DealStage) -> ColoredString {
    let label = format!("{:<13}", stage.label());
    match stage {
        DealStage::New => label.blue(),
        DealStage::InProgress => label.yellow(),
        DealStage::Negotiation => label.magenta(),
        DealStage::Won => label.green(),
        DealStage::Lost => label.red(),
    }
}

fn format_close_date(deal: &Deal) -> String {
    deal.close_date
        .map(|date| date.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "Not set".to_string())
}

/// Whole-dollar amount with thousands separators: `12500.5` -> `$12,501`.
fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
