use clap::{Parser, Subcommand};
use iban_book::preflight::{self, IssueLevel, PreflightIssue};
use iban_book::{
    check_iban, expected_check_digits, format_iban, get_bank_name, get_iban_info, logging,
    Category, IbanBook, IbanRecord,
};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "iban-book")]
#[command(about = "Store, search and validate IBANs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Validate(ValidateArgs),
    Format(IbanArg),
    Info(IbanArg),
    Add(AddArgs),
    Edit(EditArgs),
    Remove(RemoveArgs),
    List(ListArgs),
    Preflight(PreflightArgs),
}

#[derive(Parser)]
struct ValidateArgs {
    #[arg(required = true)]
    ibans: Vec<String>,
}

#[derive(Parser)]
struct IbanArg {
    iban: String,
}

#[derive(Parser)]
struct AddArgs {
    #[arg(long, default_value = "data/ibans.csv")]
    book: PathBuf,
    #[arg(long)]
    iban: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "Personal")]
    category: String,
}

#[derive(Parser)]
struct EditArgs {
    #[arg(long, default_value = "data/ibans.csv")]
    book: PathBuf,
    #[arg(long)]
    id: Uuid,
    #[arg(long)]
    iban: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
}

#[derive(Parser)]
struct RemoveArgs {
    #[arg(long, default_value = "data/ibans.csv")]
    book: PathBuf,
    #[arg(long)]
    id: Uuid,
}

#[derive(Parser)]
struct ListArgs {
    #[arg(long, default_value = "data/ibans.csv")]
    book: PathBuf,
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long)]
    country: Option<String>,
}

#[derive(Parser)]
struct PreflightArgs {
    #[arg(long, default_value = "data/ibans.csv")]
    book: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

impl Command {
    // Commands whose stdout is the result keep log lines off the console.
    fn logs_to_console(&self) -> bool {
        !matches!(
            self,
            Command::Validate(_) | Command::Format(_) | Command::Info(_)
        )
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    logging::init_logging("iban-book", cli.command.logs_to_console())?;
    match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Format(args) => {
            println!("{}", format_iban(&args.iban));
            Ok(())
        }
        Command::Info(args) => run_info(args),
        Command::Add(args) => run_add(args),
        Command::Edit(args) => run_edit(args),
        Command::Remove(args) => run_remove(args),
        Command::List(args) => run_list(args),
        Command::Preflight(args) => run_preflight(args),
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let (lines, invalid) = validation_lines(&args.ibans);
    for line in &lines {
        println!("{line}");
    }
    if invalid > 0 {
        return Err(format!("{} of {} IBAN(s) invalid", invalid, args.ibans.len()));
    }
    Ok(())
}

fn validation_lines(ibans: &[String]) -> (Vec<String>, usize) {
    let mut invalid = 0usize;
    let lines = ibans
        .iter()
        .map(|raw| match check_iban(raw) {
            Ok(canonical) => format!("VALID   {}", format_iban(&canonical)),
            Err(reason) => {
                invalid += 1;
                format!("INVALID {} ({})", raw.trim(), reason)
            }
        })
        .collect();
    (lines, invalid)
}

fn run_info(args: IbanArg) -> Result<(), String> {
    let info = get_iban_info(&args.iban);
    println!("IBAN:     {}", format_iban(&args.iban));
    println!("Country:  {} ({})", info.country_name, info.country_code);
    if !info.bank_code.is_empty() {
        println!("Bank:     {}", info.bank_code);
    }
    if info.country_code == "TR" {
        println!("Bank name: {}", get_bank_name(&args.iban));
    }
    println!("Valid:    {}", if info.is_valid { "yes" } else { "no" });
    if !info.is_valid {
        if let Some(expected) = expected_check_digits(&args.iban) {
            println!("Expected check digits: {}", expected);
        }
    }
    Ok(())
}

fn run_add(args: AddArgs) -> Result<(), String> {
    let mut book = IbanBook::load_csv(&args.book)?;
    let record = IbanRecord::new(
        &args.iban,
        &args.name,
        &args.description,
        Category::parse(&args.category),
    );
    let id = book.add(record)?;
    book.save_csv(&args.book)?;
    emit_info_line(&format!(
        "Added {} as {} ({} saved)",
        format_iban(&args.iban),
        id,
        book.len()
    ));
    Ok(())
}

fn run_edit(args: EditArgs) -> Result<(), String> {
    let mut book = IbanBook::load_csv(&args.book)?;
    let current = book
        .get(args.id)
        .ok_or_else(|| format!("no IBAN with id {}", args.id))?;
    let edit = merge_edit(current, &args);

    let updated = book.update(
        args.id,
        &edit.iban,
        &edit.name,
        &edit.description,
        edit.category,
    )?;
    let summary = format!("Updated {} ({})", format_iban(&updated.iban), updated.name);
    book.save_csv(&args.book)?;
    emit_info_line(&summary);
    Ok(())
}

#[derive(Debug, PartialEq)]
struct EditFields {
    iban: String,
    name: String,
    description: String,
    category: Category,
}

/// Fields given on the command line replace the saved ones; the rest are kept.
fn merge_edit(current: &IbanRecord, args: &EditArgs) -> EditFields {
    EditFields {
        iban: args.iban.clone().unwrap_or_else(|| current.iban.clone()),
        name: args.name.clone().unwrap_or_else(|| current.name.clone()),
        description: args
            .description
            .clone()
            .unwrap_or_else(|| current.description.clone()),
        category: args
            .category
            .as_deref()
            .map(Category::parse)
            .unwrap_or(current.category),
    }
}

fn run_remove(args: RemoveArgs) -> Result<(), String> {
    let mut book = IbanBook::load_csv(&args.book)?;
    let removed = book.remove(args.id)?;
    book.save_csv(&args.book)?;
    emit_info_line(&format!(
        "Removed {} ({})",
        format_iban(&removed.iban),
        removed.name
    ));
    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), String> {
    let book = IbanBook::load_csv(&args.book)?;
    if book.skipped_rows() > 0 {
        log::warn!(
            "{} row(s) in {} were not loaded; run preflight for details",
            book.skipped_rows(),
            args.book.display()
        );
    }
    let matches = book.search(&args.query, args.country.as_deref());
    for record in &matches {
        let stamp = if record.was_updated() {
            format!("updated {}", record.updated_at.format("%Y-%m-%d"))
        } else {
            format!("added {}", record.created_at.format("%Y-%m-%d"))
        };
        println!(
            "{}  {:<34}  {:<10}  {}  [{}]",
            record.id,
            format_iban(&record.iban),
            record.category.as_str(),
            record.name,
            stamp
        );
        if !record.description.is_empty() {
            println!("    {}", record.description);
        }
    }
    emit_info_line(&format!("Countries: {}", book.countries().join(", ")));
    emit_info_line(&format!("Showing {} of {} IBAN(s)", matches.len(), book.len()));
    Ok(())
}

fn run_preflight(args: PreflightArgs) -> Result<(), String> {
    let report = preflight::preflight_csv(&args.book)?;

    emit_info_line(&format!(
        "Preflight: records={} valid={} countries={}",
        report.total_records,
        report.valid_records,
        report.countries.join(",")
    ));
    emit_info_line(&format!(
        "Preflight issues: errors={} warnings={}",
        report.error_count(),
        report.warning_count()
    ));

    emit_issue_summary("error", &report.issues, IssueLevel::Error);
    emit_issue_summary("warning", &report.issues, IssueLevel::Warning);

    if report.error_count() > 0 {
        return Err(format!(
            "preflight failed with {} error(s)",
            report.error_count()
        ));
    }

    Ok(())
}

fn emit_issue_summary(label: &str, issues: &[PreflightIssue], level: IssueLevel) {
    let mut counts = std::collections::HashMap::new();
    for issue in issues.iter().filter(|issue| issue.level == level) {
        *counts.entry(issue.message.as_str()).or_insert(0usize) += 1;
    }
    if counts.is_empty() {
        return;
    }

    let mut items: Vec<(&str, usize)> = counts.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let max_items = 5usize;
    for (message, count) in items.iter().take(max_items) {
        emit_info_line(&format!("Preflight {}s: {} = {}", label, message, count));
    }
    if items.len() > max_items {
        emit_info_line(&format!(
            "Preflight {}s: {} additional issue types not shown",
            label,
            items.len() - max_items
        ));
    }
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        println!("{message}");
    }
}
