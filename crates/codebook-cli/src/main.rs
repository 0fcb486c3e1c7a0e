use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use codebook_core::config::Config;
use codebook_core::{
    propose_import, CodebookError, ContentClassifier, FrameworkStore, KeywordTable, Record,
    Result, FALLBACK_CATEGORY,
};

mod args;
use args::{Cli, Commands, ConfigAction, RecordInput, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let base_dir = resolve_base_dir(cli.base_dir);

    let result = match cli.command {
        Some(Commands::Categories) => handle_categories(&base_dir),
        Some(Commands::List { category }) => handle_list(&base_dir, &category),
        Some(Commands::Show { category, index }) => handle_show(&base_dir, &category, index),
        Some(Commands::Add { category, input }) => handle_add(&base_dir, &category, input),
        Some(Commands::Edit {
            category,
            index,
            input,
        }) => handle_edit(&base_dir, &category, index, input),
        Some(Commands::Delete { category, index }) => handle_delete(&base_dir, &category, index),
        Some(Commands::Search { term, json }) => handle_search(&base_dir, &term, json),
        Some(Commands::Export { dest }) => handle_export(&base_dir, dest),
        Some(Commands::Import { source }) => handle_import(&base_dir, &source),
        Some(Commands::Analyze { json }) => handle_analyze(&base_dir, json),
        Some(Commands::Gaps) => handle_gaps(&base_dir),
        Some(Commands::AddCategory { name, description }) => {
            handle_add_category(&base_dir, &name, &description)
        }
        Some(Commands::Template { category }) => {
            let store = FrameworkStore::open(&base_dir);
            print!("{}", store.template_for(&category));
            Ok(())
        }
        Some(Commands::Classify {
            file,
            confirm,
            category,
            json,
        }) => handle_classify(&base_dir, &file, confirm, category, json),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over the flags
fn init_logging(verbose: bool, quiet: bool) {
    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "error",
        (false, false) => "warn",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "codebook", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("CODEBOOK_HOME") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".codebook"))
        .unwrap_or_else(|| PathBuf::from("codebook_data"))
}

fn require_category(store: &FrameworkStore, category: &str) -> Result<()> {
    if store.has_category(category) {
        Ok(())
    } else {
        Err(CodebookError::CategoryNotFound {
            name: category.to_string(),
        })
    }
}

fn require_index(store: &FrameworkStore, category: &str, index: usize) -> Result<()> {
    require_category(store, category)?;
    let len = store.items(category).len();
    if index < len {
        Ok(())
    } else {
        Err(CodebookError::IndexOutOfRange {
            category: category.to_string(),
            index,
            len,
        })
    }
}

fn read_record(input: RecordInput) -> Result<Record> {
    if let Some(text) = input.text {
        return Ok(Record::from(text));
    }

    let content = match input.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Record::from_yaml(&content)
}

fn handle_categories(base_dir: &Path) -> Result<()> {
    let store = FrameworkStore::open(base_dir);

    println!();
    println!("Framework categories:");
    println!();
    for category in store.categories() {
        let count = store.items(category).len();
        let custom = match store.category_meta(category) {
            Some(meta) if meta.custom => format!(" ({})", meta.display_name).dimmed().to_string(),
            _ => String::new(),
        };
        println!("  {:<20} {:>3} items{}", category.cyan().bold(), count, custom);
    }
    println!();
    Ok(())
}

fn handle_list(base_dir: &Path, category: &str) -> Result<()> {
    let store = FrameworkStore::open(base_dir);
    require_category(&store, category)?;

    let items = store.items(category);
    if items.is_empty() {
        println!("No items in {}.", category.cyan());
        println!();
        println!("Add one with: codebook add {} --file item.yaml", category);
        return Ok(());
    }

    println!();
    for (i, item) in items.iter().enumerate() {
        println!("  {:>3}  {}", i.to_string().dimmed(), item.label(i));
    }
    println!();
    Ok(())
}

fn handle_show(base_dir: &Path, category: &str, index: usize) -> Result<()> {
    let store = FrameworkStore::open(base_dir);
    require_index(&store, category, index)?;

    if let Some(item) = store.item(category, index) {
        print!("{}", item.to_yaml()?);
    }
    Ok(())
}

fn handle_add(base_dir: &Path, category: &str, input: RecordInput) -> Result<()> {
    let record = read_record(input)?;
    let mut store = FrameworkStore::open(base_dir);
    if !store.add_item(category, record) {
        return Err(CodebookError::ItemNotAdded {
            category: category.to_string(),
        });
    }

    let index = store.items(category).len().saturating_sub(1);
    println!("{} {}[{}]", "Added:".green(), category, index);
    Ok(())
}

fn handle_edit(base_dir: &Path, category: &str, index: usize, input: RecordInput) -> Result<()> {
    let mut store = FrameworkStore::open(base_dir);
    require_index(&store, category, index)?;

    let record = read_record(input)?;
    store.update_item(category, index, record);
    println!("{} {}[{}]", "Updated:".green(), category, index);
    Ok(())
}

fn handle_delete(base_dir: &Path, category: &str, index: usize) -> Result<()> {
    let mut store = FrameworkStore::open(base_dir);
    require_index(&store, category, index)?;

    store.delete_item(category, index);
    println!("{} {}[{}]", "Deleted:".yellow(), category, index);
    Ok(())
}

fn handle_search(base_dir: &Path, term: &str, json: bool) -> Result<()> {
    let store = FrameworkStore::open(base_dir);
    let hits = store.search(term);

    if json {
        println!("{}", serde_json::to_string_pretty(&hits).unwrap_or_default());
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results found for: {}", term);
        return Ok(());
    }

    println!();
    println!("{} {} result(s)", "Found:".cyan().bold(), hits.len());
    for hit in &hits {
        println!();
        println!("{}[{}]", hit.category.cyan().bold(), hit.index);
        println!("{}", "-".repeat(50).dimmed());
        print!("{}", hit.item.to_yaml()?);
    }
    println!();
    Ok(())
}

fn handle_export(base_dir: &Path, dest: Option<PathBuf>) -> Result<()> {
    let store = FrameworkStore::open(base_dir);
    let dest = dest.unwrap_or_else(|| store.default_export_path());

    match store.export(&dest) {
        Some(path) => {
            println!("{} {}", "Exported:".green(), path.display());
            Ok(())
        }
        None => Err(CodebookError::ExportFailed { path: dest }),
    }
}

fn handle_import(base_dir: &Path, source: &Path) -> Result<()> {
    let mut store = FrameworkStore::open(base_dir);
    if store.import(source) {
        println!("{} {}", "Imported:".green(), source.display());
        println!("Categories: {}", store.categories().len());
        Ok(())
    } else {
        Err(CodebookError::ImportFailed {
            path: source.to_path_buf(),
        })
    }
}

fn handle_analyze(base_dir: &Path, json: bool) -> Result<()> {
    let store = FrameworkStore::open(base_dir);
    let analysis = store.analyze_structure();

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis).unwrap_or_default());
        return Ok(());
    }

    println!();
    println!("Total categories: {}", analysis.total_categories);
    println!("Total items:      {}", analysis.total_items);
    println!();
    println!("{}", "Categories".cyan().bold());
    for c in &analysis.categories {
        println!("  {:<20} {:>3}", c.category, c.count);
    }

    let recommendations = analysis.recommendations();
    if !recommendations.is_empty() {
        println!();
        println!("{}", "Recommendations".cyan().bold());
        for rec in recommendations {
            println!("  {}", rec);
        }
    }
    println!();
    Ok(())
}

fn handle_gaps(base_dir: &Path) -> Result<()> {
    let store = FrameworkStore::open(base_dir);
    let report = store.analyze_gaps();

    println!();
    println!("{}", "Missing essential categories".cyan().bold());
    if report.is_complete() {
        println!("  {}", "All essential categories present".green());
    } else {
        for missing in &report.missing {
            println!("  {} {}", "x".red(), missing);
        }
    }

    println!();
    println!("{}", "Weakly populated categories".cyan().bold());
    for weak in &report.weak {
        println!("  {} {}: only {} item(s)", "!".yellow(), weak.category, weak.count);
    }
    println!();
    Ok(())
}

fn handle_add_category(base_dir: &Path, name: &str, description: &str) -> Result<()> {
    let mut store = FrameworkStore::open(base_dir);
    if store.add_category(name, description) {
        println!(
            "{} {}",
            "Created:".green(),
            codebook_core::category_key(name)
        );
    } else {
        println!(
            "{} category '{}' already exists or is not allowed",
            "Skipped:".yellow(),
            codebook_core::category_key(name)
        );
    }
    Ok(())
}

fn handle_classify(
    base_dir: &Path,
    file: &Path,
    confirm: bool,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let config = Config::load(base_dir)?;
    let classifier =
        ContentClassifier::new(KeywordTable::builtin().with_config(&config.classifier));
    let proposal = propose_import(file, &classifier)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&proposal).unwrap_or_default());
    } else {
        println!();
        println!(
            "{} {}",
            "Suggested category:".cyan().bold(),
            proposal.suggested_category()
        );
        println!();
        print!("{}", proposal.record.to_yaml()?);
        println!();
    }

    if !confirm {
        return Ok(());
    }

    let target = category.unwrap_or_else(|| proposal.suggested_category().to_string());
    if target == FALLBACK_CATEGORY {
        return Err(CodebookError::CategoryNotFound { name: target });
    }

    let mut store = FrameworkStore::new(base_dir, &config);
    if !store.add_item(&target, proposal.record) {
        return Err(CodebookError::ItemNotAdded { category: target });
    }
    println!("{} {}", "Added to:".green(), target);
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(CodebookError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
