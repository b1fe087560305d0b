use clap::{Parser, Subcommand};
use rulesheet::cli::{self, OutputFormat};
use rulesheet::store::DEFAULT_RULES_PATH;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rulesheet")]
#[command(about = "Read, validate and write decision tables kept in spreadsheets.")]
#[command(long_about = "Rulesheet - decision tables in spreadsheets

A rule workbook holds optional metadata rows (RuleSet, Import, notes),
a 'RuleTable' marker row, a header row of NAME/CONDITION/ACTION columns,
a template row of $param expressions, then one row per rule.

COMMANDS:
  show       - Print the decision table as YAML or JSON
  validate   - Check column structure and template types
  save       - Validate a JSON table and write it to the rules workbook
  roundtrip  - Rewrite a workbook and confirm nothing changed

EXAMPLES:
  rulesheet show --format json
  rulesheet validate rules/DiscountRules.xlsx edited.json
  rulesheet save edited.json --rules rules/DiscountRules.xlsx")]
#[command(version)]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the decision table stored in a rules workbook
    Show {
        /// Rules workbook (.xlsx, .xls, .ods)
        #[arg(short, long, env = "RULES_PATH", default_value = DEFAULT_RULES_PATH)]
        rules: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },

    #[command(long_about = "Validate decision tables without writing anything.

CHECKS:
  - At least one CONDITION and one ACTION column
  - Every CONDITION/ACTION template contains $param
  - Cells under numeric templates (qty >= $param) hold numbers
  - Cells under boolean templates (vip == $param (true/false)) hold true/false

INPUTS:
  Workbooks (.xlsx, .xls, .ods) and table files (.json, .yaml).
  Every file is checked; the exit code is non-zero if any fails.")]
    /// Validate rules workbooks or table files
    Validate {
        /// Files to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    #[command(long_about = "Validate a decision table and save it to the rules workbook.

Nothing is written when validation fails. Otherwise the previous workbook
is copied to <rules>.bak, its metadata rows are kept, and the table is
written below them. RuleSet/Import rows are updated from the table's meta
section unless it names only the default rule set and no imports. A new workbook gets
RuleSet/Import rows built from the meta section.")]
    /// Validate and save a decision table to the rules workbook
    Save {
        /// Decision table file (.json or .yaml)
        table: PathBuf,

        /// Rules workbook to write (.xlsx)
        #[arg(short, long, env = "RULES_PATH", default_value = DEFAULT_RULES_PATH)]
        rules: PathBuf,

        /// Skip the .bak copy of the previous workbook
        #[arg(long)]
        no_backup: bool,
    },

    /// Rewrite a workbook and check the table survives unchanged
    Roundtrip {
        /// Workbook to read
        input: PathBuf,

        /// Workbook to write (.xlsx)
        output: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "rulesheet=debug" } else { "rulesheet=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Show { rules, format } => cli::show(rules, format)?,

        Commands::Validate { files } => cli::validate(files)?,

        Commands::Save {
            table,
            rules,
            no_backup,
        } => cli::save(table, rules, no_backup)?,

        Commands::Roundtrip { input, output } => cli::roundtrip(input, output)?,
    }
    Ok(())
}
