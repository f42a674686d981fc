mod aggregate;
mod classifier;
mod cli;
mod db;
mod error;
mod export;
mod fmt;
mod importer;
mod models;
mod reports;
mod settings;

use clap::Parser;

use cli::{Cli, Commands, ExportCommands, MemberCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Member { command } => match command {
            MemberCommands::Add {
                name,
                relation,
                email,
            } => cli::members::add(name, relation, email),
            MemberCommands::List => cli::members::list(),
            MemberCommands::Remove { member } => cli::members::remove(member),
        },
        Commands::Add {
            kind,
            description,
            amount,
            member,
            date,
        } => cli::add::run(kind, description, amount, member, date),
        Commands::List { member, kind, year } => cli::list::run(member, kind, year),
        Commands::Stats { member, year } => cli::stats::run(member, year),
        Commands::Classify {
            description,
            amount,
        } => cli::classify::run(description, amount),
        Commands::Report { year, member } => cli::report::run(year, member),
        Commands::Export { command } => match command {
            ExportCommands::Csv {
                year,
                member,
                output,
            } => cli::export::csv(year, member, output),
            ExportCommands::Workbook {
                year,
                member,
                output_dir,
            } => cli::export::workbook(year, member, output_dir),
        },
        Commands::Import { file, member } => cli::import::run(&file, &member),
        Commands::Demo => cli::demo::run(),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
