//! casetree CLI - case records and stage flow tree

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use casetree::book::{CaseBook, DEFAULT_COMPACT};
use casetree::case::{CaseForm, CustodyType};
use casetree::config::CaseTreeConfig;
use casetree::error::{CaseTreeError, FixSuggestion};
use casetree::render::{render, Density, FitToWidth};
use casetree::store::{CaseStore, FileStore};
use casetree::CASE_FLOW;

#[derive(Parser)]
#[command(name = "casetree")]
#[command(about = "Track criminal-case stages and render them as a flow tree")]
#[command(version)]
struct Cli {
    /// Path to the JSON store (overrides CASETREE_DATA)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Don't insert the sample case into an empty store
    #[arg(long, global = true)]
    no_seed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every stage in flow order
    Stages {
        /// Validate stage ids (unique snake_case tokens)
        #[arg(long)]
        check: bool,
    },

    /// List saved cases
    List,

    /// Show a case and its position in the flow
    Show {
        /// Case index (from `list`)
        index: usize,
    },

    /// Create a case
    Add(CaseArgs),

    /// Update a case (an index out of range creates a new one)
    Update {
        /// Case index (from `list`)
        #[arg(allow_hyphen_values = true)]
        index: i64,

        #[command(flatten)]
        fields: CaseArgs,
    },

    /// Delete a case
    Delete {
        /// Case index (from `list`)
        index: usize,
    },

    /// Render the flow tree for a stage
    Tree {
        /// Stage id to mark active
        #[arg(short, long, default_value = "")]
        stage: String,

        /// Force compact layout
        #[arg(long, conflicts_with = "standard")]
        compact: bool,

        /// Force standard layout
        #[arg(long)]
        standard: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = TreeFormat::Text)]
        format: TreeFormat,

        /// Available width in columns; HTML output is scaled down to fit
        #[arg(short, long)]
        width: Option<usize>,
    },

    /// Set the saved layout preference
    Compact {
        #[arg(value_enum)]
        mode: Toggle,
    },

    /// Open the terminal dashboard
    Tui,
}

#[derive(Args, Default)]
struct CaseArgs {
    /// Full name (required)
    #[arg(long)]
    name: Option<String>,

    /// Date of birth
    #[arg(long)]
    dob: Option<String>,

    /// Custody type: county, state or federal
    #[arg(long)]
    custody: Option<String>,

    /// Facility name
    #[arg(long)]
    facility: Option<String>,

    /// Next court date
    #[arg(long)]
    court_date: Option<String>,

    /// Current stage id (see `stages`)
    #[arg(long)]
    stage: Option<String>,
}

impl CaseArgs {
    /// Overlay the given flags onto `form`
    fn apply_to(self, mut form: CaseForm) -> Result<CaseForm, CaseTreeError> {
        if let Some(name) = self.name {
            form.full_name = name;
        }
        if let Some(dob) = self.dob {
            form.dob = dob;
        }
        if let Some(custody) = self.custody {
            form.custody_type = custody.parse::<CustodyType>()?;
        }
        if let Some(facility) = self.facility {
            form.facility = facility;
        }
        if let Some(date) = self.court_date {
            form.next_court_date = date;
        }
        if let Some(stage) = self.stage {
            form.current_stage = stage;
        }
        Ok(form)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TreeFormat {
    Text,
    Html,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

fn main() {
    let cli = Cli::parse();
    let config = CaseTreeConfig::from_env().with_overrides(cli.data.clone(), cli.no_seed);

    // The dashboard owns the screen; stay silent there unless asked
    let filter = match cli.command {
        Commands::Tui if config.log_filter_is_default() => "off".to_string(),
        _ => config.log_filter.clone(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let result: anyhow::Result<()> = match cli.command {
        Commands::Stages { check } => list_stages(check).map_err(Into::into),
        Commands::List => list_cases(&config).map_err(Into::into),
        Commands::Show { index } => show_case(&config, index).map_err(Into::into),
        Commands::Add(fields) => add_case(&config, fields).map_err(Into::into),
        Commands::Update { index, fields } => update_case(&config, index, fields).map_err(Into::into),
        Commands::Delete { index } => delete_case(&config, index).map_err(Into::into),
        Commands::Tree {
            stage,
            compact,
            standard,
            format,
            width,
        } => show_tree(&config, &stage, compact, standard, format, width).map_err(Into::into),
        Commands::Compact { mode } => set_compact(&config, mode).map_err(Into::into),
        Commands::Tui => casetree::tui::run(&config),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e
            .downcast_ref::<CaseTreeError>()
            .and_then(|e| e.fix_suggestion())
        {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn open_book(config: &CaseTreeConfig) -> Result<CaseBook<FileStore>, CaseTreeError> {
    tracing::debug!(path = %config.data_path.display(), "opening case store");
    CaseBook::open_with(FileStore::open(&config.data_path), config.seed_sample)
}

fn list_stages(check: bool) -> Result<(), CaseTreeError> {
    if check {
        CASE_FLOW.validate()?;
        println!("{} Flow is valid ({} stages)", "✓".green(), CASE_FLOW.len());
        return Ok(());
    }

    for entry in CASE_FLOW.flatten() {
        println!("{:<40} {}", entry.indented_label(), entry.id.dimmed());
    }
    Ok(())
}

fn list_cases(config: &CaseTreeConfig) -> Result<(), CaseTreeError> {
    let book = open_book(config)?;
    if book.is_empty() {
        println!("No cases.");
        return Ok(());
    }

    for (i, case) in book.cases().iter().enumerate() {
        let stage = case
            .stage_label(book.flow())
            .map(str::to_string)
            .unwrap_or_else(|| format!("({})", case.current_stage));
        println!(
            "{:>3}  {}  {}  {}",
            i.to_string().cyan(),
            case.full_name.bold(),
            if case.facility.is_empty() { "-" } else { case.facility.as_str() },
            stage.dimmed()
        );
    }
    Ok(())
}

fn show_case(config: &CaseTreeConfig, index: usize) -> Result<(), CaseTreeError> {
    let mut book = open_book(config)?;
    book.select(index);
    let view = book.view();

    println!("{}", view.meta.cyan().bold());
    if let Some(case) = book.active_case() {
        println!("  Custody: {}", case.custody_type);
        if !case.dob.is_empty() {
            println!("  DOB: {}", case.dob);
        }
        let path: Vec<&str> = book
            .flow()
            .path_to(&case.current_stage)
            .iter()
            .map(|n| n.label)
            .collect();
        if !path.is_empty() {
            println!("  Path: {}", path.join(" > "));
        }
    }
    if let Some(tree) = view.tree {
        println!();
        for line in tree.to_text() {
            println!("{}", line);
        }
    }
    Ok(())
}

fn add_case(config: &CaseTreeConfig, fields: CaseArgs) -> Result<(), CaseTreeError> {
    let mut book = open_book(config)?;
    let form = fields.apply_to(CaseForm {
        current_stage: CASE_FLOW.id.to_string(),
        ..CaseForm::default()
    })?;
    let index = book.submit(None, form)?;
    println!(
        "{} Created case #{}: {}",
        "✓".green(),
        index,
        book.cases()[index].full_name
    );
    Ok(())
}

fn update_case(config: &CaseTreeConfig, index: i64, fields: CaseArgs) -> Result<(), CaseTreeError> {
    let mut book = open_book(config)?;
    let existing = usize::try_from(index).ok().and_then(|i| book.get(i));
    let base = match existing {
        Some(record) => CaseForm::from_record(record),
        None => CaseForm {
            current_stage: CASE_FLOW.id.to_string(),
            ..CaseForm::default()
        },
    };
    let updating = existing.is_some();

    let form = fields.apply_to(base)?;
    let written = book.submit(Some(index), form)?;
    let verb = if updating { "Updated" } else { "Created" };
    println!(
        "{} {} case #{}: {}",
        "✓".green(),
        verb,
        written,
        book.cases()[written].full_name
    );
    Ok(())
}

fn delete_case(config: &CaseTreeConfig, index: usize) -> Result<(), CaseTreeError> {
    let mut book = open_book(config)?;
    if book.delete(index)? {
        println!("{} Deleted case #{}", "✓".green(), index);
    } else {
        println!("{} No case at index {} (nothing deleted)", "→".yellow(), index);
    }
    Ok(())
}

fn show_tree(
    config: &CaseTreeConfig,
    stage: &str,
    compact: bool,
    standard: bool,
    format: TreeFormat,
    width: Option<usize>,
) -> Result<(), CaseTreeError> {
    let density = if compact {
        Density::Compact
    } else if standard {
        Density::Standard
    } else {
        // Read-only: never seeds the store
        let store = CaseStore::new(FileStore::open(&config.data_path));
        Density::from_compact(store.load_compact().unwrap_or(DEFAULT_COMPACT))
    };

    let tree = render(&CASE_FLOW, stage, density);
    match format {
        TreeFormat::Text => {
            for line in tree.to_text() {
                println!("{}", line);
            }
        }
        TreeFormat::Html => {
            let scale = width.and_then(|w| FitToWidth::new().scale(tree.natural_width(), w));
            let title = match CASE_FLOW.find(stage) {
                Some(node) => format!("Case flow: {}", node.label),
                None => "Case flow".to_string(),
            };
            print!("{}", tree.to_html_document(&title, scale));
        }
    }
    Ok(())
}

fn set_compact(config: &CaseTreeConfig, mode: Toggle) -> Result<(), CaseTreeError> {
    let mut book = open_book(config)?;
    let compact = matches!(mode, Toggle::On);
    book.set_compact(compact)?;
    println!(
        "{} Layout set to {}",
        "✓".green(),
        if compact { "compact" } else { "standard" }
    );
    Ok(())
}
