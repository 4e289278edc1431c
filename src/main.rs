use std::env;
use std::process::ExitCode;

use casos_etl::commands::run::run;
use casos_etl::logging::init_logging;
use casos_etl::EtlConfig;
use tracing::error;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        help();
        return ExitCode::SUCCESS;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            if args.len() != 2 {
                eprintln!("Usage: casos_etl run");
                return ExitCode::FAILURE;
            }
            init_logging();

            let result = EtlConfig::from_env().and_then(|config| run(&config));
            match result {
                Ok(qc) => qc.print_report(),
                Err(e) => {
                    error!("{}", e);
                    eprintln!("❌ {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        "version" => {
            println!(
                "casos_etl v{} (built {}, {})",
                env!("CASOS_ETL_VERSION"),
                env!("BUILD_DATE"),
                env!("TARGET")
            );
        }
        "help" => {
            help();
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            help();
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

fn help() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Casos Fiscales ETL                                          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Commands:");
    println!("  run");
    println!("    Normalize every *.csv under data/raw into one table");
    println!("    - Reconciles header spellings to the canonical schema");
    println!("    - Parses mixed date formats and Spanish month names");
    println!("    - Derives fecha_corte_final, tasa_atencion, backlog and flags");
    println!("    - Writes data/processed/casos_fiscales_2019_2023.csv");
    println!("    - Writes db/casos_fiscales.sqlite (table casos_fiscales, indexed)");
    println!("    - Writes data/processed/qc_summary.json");
    println!();
    println!("  version");
    println!("    Print version and build date");
    println!();
    println!("ENVIRONMENT:");
    println!("  CASOS_BASE_DIR   Base directory (default: current directory)");
    println!("  CASOS_RAW_DIR    Override input directory");
    println!("  CASOS_OUT_DIR    Override CSV/QC output directory");
    println!("  CASOS_DB_DIR     Override SQLite directory");
    println!("  CASOS_TABLE      Override SQLite table name");
    println!("  RUST_LOG         Log filter (default: casos_etl=info)");
    println!();
    println!("EXAMPLES:");
    println!("  casos_etl run");
    println!("  CASOS_BASE_DIR=/data/mppf RUST_LOG=casos_etl=debug casos_etl run");
}
