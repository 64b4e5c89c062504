mod categorizer;
mod cli;
mod dates;
mod db;
mod error;
mod fmt;
mod masterdata;
mod models;
mod movements;
mod provisions;
mod reports;
mod salary;
mod settings;
mod splitter;

use clap::Parser;

use cli::{
    AccountsCommands, CategoriesCommands, ClassifiersCommands, Cli, Commands, KeywordsCommands,
    ProvisionsCommands, ReportCommands, SalaryCommands, TxCommands,
};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Accounts { command } => match command {
            AccountsCommands::Add { name, kind } => cli::accounts::add(&name, &kind),
            AccountsCommands::List => cli::accounts::list(),
            AccountsCommands::Remove { name } => cli::accounts::remove(&name),
        },
        Commands::Categories { command } => match command {
            CategoriesCommands::Add {
                name,
                group,
                provision_kind,
            } => cli::categories::add(&name, &group, &provision_kind),
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Remove { name } => cli::categories::remove(&name),
        },
        Commands::Keywords { command } => match command {
            KeywordsCommands::Add {
                keyword,
                category,
                match_type,
            } => cli::keywords::add(&keyword, &category, &match_type),
            KeywordsCommands::List => cli::keywords::list(),
            KeywordsCommands::Apply => cli::keywords::apply(),
            KeywordsCommands::Match { description } => cli::keywords::matching(&description),
        },
        Commands::Classifiers { command } => match command {
            ClassifiersCommands::Add { pattern, class } => cli::classifiers::add(&pattern, &class),
            ClassifiersCommands::List => cli::classifiers::list(),
        },
        Commands::Tx { command } => match command {
            TxCommands::Add {
                date,
                description,
                account,
                category,
                expense,
                income,
                month,
            } => cli::tx::add(
                &date,
                &description,
                account.as_deref(),
                category.as_deref(),
                expense,
                income,
                month.as_deref(),
            ),
            TxCommands::List {
                offset,
                limit,
                search,
                category,
                account,
                reimbursable,
                affectable,
            } => cli::tx::list(offset, limit, search, category, account, reimbursable, affectable),
            TxCommands::Edit {
                id,
                category,
                label,
                month,
            } => cli::tx::edit(id, &category, label.as_deref(), &month),
            TxCommands::Link {
                id,
                rate,
                event_date,
                label,
            } => cli::tx::link(id, rate, event_date.as_deref(), label.as_deref()),
            TxCommands::Deactivate { id } => cli::tx::deactivate(id),
            TxCommands::Split { id, periods } => cli::tx::split(id, periods),
            TxCommands::SplitValues { id, parts } => cli::tx::split_values(id, &parts),
            TxCommands::MassUpdate {
                ids,
                label,
                reference,
                event_date,
                description,
                category,
            } => cli::tx::mass_update(&ids, label, reference, event_date, description, category),
            TxCommands::Events { category } => cli::tx::events(&category),
        },
        Commands::Provisions { command } => match command {
            ProvisionsCommands::Generate {
                category,
                year,
                description,
                to_pay,
                to_recover,
            } => cli::provision::generate(&category, year, &description, to_pay, to_recover),
            ProvisionsCommands::Remaining => cli::provision::remaining(),
            ProvisionsCommands::Close { month, category } => {
                cli::provision::close(&month, &category)
            }
        },
        Commands::Salary { command } => match command {
            SalaryCommands::Months => cli::salary::months(),
            SalaryCommands::Import {
                month,
                declared_by,
                account,
                simulate,
            } => cli::salary::import(&month, declared_by.as_deref(), account.as_deref(), simulate),
        },
        Commands::Report { command } => match command {
            ReportCommands::Balances { from_month } => cli::report::balances(from_month.as_deref()),
            ReportCommands::Accounts { kind } => cli::report::accounts(kind.as_deref()),
            ReportCommands::Provisions { month, savings } => {
                cli::report::provisions(&month, savings)
            }
            ReportCommands::Category { category, month } => {
                cli::report::category(&category, &month)
            }
        },
        Commands::Export { output } => cli::export::run(output),
        Commands::Backup { output } => cli::backup::run(output),
        Commands::Status => cli::status::run(),
        Commands::Demo => cli::demo::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
