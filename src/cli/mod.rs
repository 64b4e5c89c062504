pub mod accounts;
pub mod backup;
pub mod categories;
pub mod classifiers;
pub mod demo;
pub mod export;
pub mod init;
pub mod keywords;
pub mod provision;
pub mod report;
pub mod salary;
pub mod status;
pub mod tx;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "foyer", about = "Household finance ledger CLI.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up foyer: choose a data directory and initialize the database.
    Init {
        /// Path for foyer data (default: ~/Documents/foyer)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Manage keyword rules mapping descriptions to categories.
    Keywords {
        #[command(subcommand)]
        command: KeywordsCommands,
    },
    /// Manage classifier patterns used by category reports.
    Classifiers {
        #[command(subcommand)]
        command: ClassifiersCommands,
    },
    /// Browse and edit movements.
    Tx {
        #[command(subcommand)]
        command: TxCommands,
    },
    /// Generate, inspect and close provisions.
    Provisions {
        #[command(subcommand)]
        command: ProvisionsCommands,
    },
    /// Salary decomposition from payslip data.
    Salary {
        #[command(subcommand)]
        command: SalaryCommands,
    },
    /// Generate reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Export the movement register to CSV.
    Export {
        /// Output path (default: <data_dir>/exports/register-YYYY-MM-DD.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Back up the database.
    Backup {
        /// Output path (default: <data_dir>/backups/foyer-YYYYMMDD-HHMMSS.db)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show current database and summary statistics.
    Status,
    /// Load sample household data to explore foyer.
    Demo,
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Add a new account.
    Add {
        /// Account name, e.g. 'Main Checking'
        name: String,
        /// Account kind: current, savings, cash
        #[arg(long)]
        kind: String,
    },
    /// List all accounts.
    List,
    /// Remove an account.
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// Add a new category.
    Add {
        /// Category name, e.g. 'Groceries'
        name: String,
        /// Group with a two-digit sort prefix, e.g. '04 Daily Life'
        #[arg(long)]
        group: String,
        /// Provision kind: current, savings, none
        #[arg(long = "provision-kind", default_value = "current")]
        provision_kind: String,
    },
    /// List all categories.
    List,
    /// Remove a category.
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum KeywordsCommands {
    /// Add a keyword rule.
    Add {
        /// Pattern to look for in movement descriptions
        keyword: String,
        /// Category to assign
        #[arg(long)]
        category: String,
        /// Match type: contains, starts_with, regex
        #[arg(long = "match-type", default_value = "contains")]
        match_type: String,
    },
    /// List all keyword rules.
    List,
    /// Categorize uncategorized movements from the keyword rules.
    Apply,
    /// Show the rules matching a description.
    Match { description: String },
}

#[derive(Subcommand)]
pub enum ClassifiersCommands {
    /// Add a classifier pattern.
    Add {
        /// Substring to look for in movement descriptions
        pattern: String,
        /// Class the matching movements report under
        #[arg(long)]
        class: String,
    },
    /// List all classifiers.
    List,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Record a new movement.
    Add {
        #[arg(long)]
        date: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        expense: Option<f64>,
        #[arg(long)]
        income: Option<f64>,
        /// Month the movement belongs to: YYYY-MM (default: month of the date)
        #[arg(long)]
        month: Option<String>,
    },
    /// Paged movement register.
    List {
        #[arg(long, default_value = "0")]
        offset: i64,
        #[arg(long, default_value = "20")]
        limit: i64,
        /// Filter on description substring
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        account: Option<String>,
        /// Expenses still lacking rate, label or event date
        #[arg(long)]
        reimbursable: bool,
        /// Incomes still lacking label or event date
        #[arg(long)]
        affectable: bool,
    },
    /// Re-assign category, label and month of a movement.
    Edit {
        id: i64,
        #[arg(long)]
        category: String,
        #[arg(long)]
        label: Option<String>,
        /// Month: YYYY-MM
        #[arg(long)]
        month: String,
    },
    /// Link a movement to a reimbursement event.
    Link {
        id: i64,
        /// Reimbursement rate in percent
        #[arg(long)]
        rate: Option<f64>,
        /// Event date: YYYY-MM-DD
        #[arg(long = "event-date")]
        event_date: Option<String>,
        #[arg(long)]
        label: Option<String>,
    },
    /// Exclude a movement from all aggregates.
    Deactivate { id: i64 },
    /// Split a movement over periods (yearly without --periods).
    Split {
        id: i64,
        /// Number of periods on the movement's own month
        #[arg(long)]
        periods: Option<u32>,
    },
    /// Split a movement into explicit parts.
    SplitValues {
        id: i64,
        /// Signed part as AMOUNT:YYYY-MM, repeatable; positive = income
        #[arg(long = "part")]
        parts: Vec<String>,
    },
    /// Apply label, reference and event date to a set of movements.
    MassUpdate {
        /// Comma-separated movement ids
        #[arg(long)]
        ids: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long = "event-date")]
        event_date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Reimbursement events of a category.
    Events { category: String },
}

#[derive(Subcommand)]
pub enum ProvisionsCommands {
    /// Create twelve monthly provision rows for a category.
    Generate {
        #[arg(long)]
        category: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        description: String,
        #[arg(long = "to-pay")]
        to_pay: Option<f64>,
        #[arg(long = "to-recover")]
        to_recover: Option<f64>,
    },
    /// Past months with unused expense provisions.
    Remaining,
    /// Close the remaining provision of a category-month.
    Close {
        /// Month: YYYY-MM
        #[arg(long)]
        month: String,
        #[arg(long)]
        category: String,
    },
}

#[derive(Subcommand)]
pub enum SalaryCommands {
    /// List the most recent payslip months.
    Months,
    /// Decompose a month's salary into ledger entries.
    Import {
        /// Month: YYYY-MM
        #[arg(long)]
        month: String,
        /// Defaults to the settings user name
        #[arg(long = "declared-by")]
        declared_by: Option<String>,
        /// Defaults to the settings salary account
        #[arg(long)]
        account: Option<String>,
        /// Run the import and roll it back
        #[arg(long)]
        simulate: bool,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Monthly expense/income/net balances.
    Balances {
        /// First month to include: YYYY-MM
        #[arg(long = "from")]
        from_month: Option<String>,
    },
    /// Account balances.
    Accounts {
        /// Filter by account kind
        #[arg(long)]
        kind: Option<String>,
    },
    /// Provision summary for one month.
    Provisions {
        /// Month: YYYY-MM
        #[arg(long)]
        month: String,
        /// Savings columns instead of current ones
        #[arg(long)]
        savings: bool,
    },
    /// Category breakdown by classifier class for one month.
    Category {
        category: String,
        /// Month: YYYY-MM
        #[arg(long)]
        month: String,
    },
}
