use clap::Parser;
use flowtable_lib::error::BoxError;
use flowtable_lib::request::IdentityRequest;
use flowtable_lib::source::StaticSource;
use flowtable_lib::viewport::Viewport;
use flowtable_lib::LoadOutcome;
use flowtable_lib::LoaderConfig;
use flowtable_lib::LoaderStatus;
use flowtable_lib::PagedDataLoader;
use flowtable_lib::PaginationMode;
use serde::Serialize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

/// Page through an in-memory table and print each step as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "flowtable", version, about)]
struct Args {
    /// Pagination mode: offset, cursor or page
    #[arg(short, long, default_value = "offset")]
    mode: PaginationMode,

    /// Number of synthetic rows in the data set
    #[arg(short, long, default_value_t = 42)]
    rows: u32,

    /// Rows per page (ignored when --container-height is given)
    #[arg(short = 's', long, default_value_t = 10)]
    page_size: usize,

    /// How many pages to advance after the initial load
    #[arg(short, long, default_value_t = 2)]
    pages: usize,

    /// Only rows whose name contains this term
    #[arg(long)]
    search: Option<String>,

    /// Derive the page size from a container height in pixels
    #[arg(long)]
    container_height: Option<u32>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
struct Record {
    id: u32,
    name: String,
}

impl Record {
    fn new(id: u32) -> Self {
        Self {
            id,
            name: format!("Record {:03}", id),
        }
    }

    fn cursor(&self) -> Option<String> {
        Some(self.id.to_string())
    }
}

#[derive(Serialize)]
struct Step<'a> {
    step: &'a str,
    outcome: &'a str,
    status: LoaderStatus,
}

fn print_step(step: &str, outcome: LoadOutcome, status: LoaderStatus) -> Result<(), BoxError> {
    let outcome = if outcome.is_loaded() { "loaded" } else { "skipped" };
    let line = serde_json::to_string(&Step {
        step,
        outcome,
        status,
    })?;
    println!("{}", line);
    Ok(())
}

/// Assembles a loader over `args.rows` synthetic records.
fn build_loader(args: &Args) -> Result<PagedDataLoader<Record>, BoxError> {
    let records: Vec<Record> = (1..=args.rows).map(Record::new).collect();
    let source = StaticSource::new(records, args.mode)
        .with_cursor(Record::cursor)
        .with_search(|record: &Record, term: &str| record.name.contains(term));

    let mut config = LoaderConfig::new()
        .with_mode(args.mode)
        .with_page_size(args.page_size);
    if let Some(height) = args.container_height {
        config = config.with_viewport(Viewport::new(height));
    }
    if let Some(search) = &args.search {
        config = config.with_search(search.clone());
    }

    let mut builder = PagedDataLoader::builder()
        .config(config)
        .data_source(source)
        .request_builder(IdentityRequest);
    if args.mode == PaginationMode::Cursor {
        builder = builder.item_to_cursor(Record::cursor);
    }
    Ok(builder.build()?)
}

async fn run(args: Args) -> Result<(), BoxError> {
    let loader = build_loader(&args)?;

    log::info!(
        "Paging {} rows in {} mode, {} per page",
        args.rows,
        loader.mode(),
        loader.page_size()
    );

    let outcome = loader.load_initial().await?;
    print_step("load_initial", outcome, loader.status())?;

    for _ in 0..args.pages {
        let (step, outcome) = if loader.mode().accumulates() {
            ("show_more", loader.show_more().await?)
        } else {
            ("next_page", loader.next_page().await?)
        };
        print_step(step, outcome, loader.status())?;

        if outcome.is_skipped() {
            log::debug!("No more data after {} rows", loader.len());
            break;
        }
    }

    for record in loader.items() {
        println!("{}", serde_json::to_string(&record)?);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    run(args).await
}
