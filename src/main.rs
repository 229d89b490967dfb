use clap::Parser;
use misional::cli::{handle_init, handle_serve, handle_show, handle_wards, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { db } => handle_init(cli.config, db),
        Commands::Serve { bind, db } => handle_serve(cli.config, bind, db),
        Commands::Wards { db, json } => handle_wards(cli.config, db, json),
        Commands::Show { id, db, json } => handle_show(cli.config, id, db, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
