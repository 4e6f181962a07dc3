use quire::app::{App, AppError, BackupSummary};
use quire::backup::ImportResult;
use quire::cli::{self, Commands};
use quire::config::Config;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization should work")
    );
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_env("QUIRE_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("warning: failed to initialize logging: {err}");
    }
}

fn run() -> Result<(), AppError> {
    use clap::Parser;

    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(&cli.config)?;
    let app = App::open(&cli.db, config)?;

    match cli.command {
        Commands::Projects(args) => {
            let projects = app.list_projects()?;
            if args.json {
                print_json(&projects);
            } else if projects.is_empty() {
                println!("no projects");
            } else {
                for project in &projects {
                    println!("{}  {}  {}", project.id, project.updated_at, project.title);
                }
            }
        }
        Commands::Export(args) => {
            let path = app.download_project_backup(&args.id, args.out_dir.as_deref())?;
            println!("{}", path.display());
        }
        Commands::ExportFull(args) => {
            let path = app.download_full_backup(args.out_dir.as_deref())?;
            println!("{}", path.display());
        }
        Commands::Inspect(args) => {
            let backup = app.read_backup_file(&args.file)?;
            let summary = BackupSummary::of(&backup);
            if args.json {
                print_json(&summary);
            } else {
                print_summary(&summary);
            }
        }
        Commands::Import(args) => {
            let backup = app.read_backup_file(&args.file)?;
            let options = app.import_options(args.conflict, args.restore_settings);
            let result = app.import_backup(&backup, &options);
            if args.json {
                print_json(&result);
            } else {
                print_import_result(&result);
            }
            if !result.success {
                return Err(AppError::ImportFailed(result.errors.join("; ")));
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &BackupSummary) {
    println!(
        "{} backup version={} exported_at={} projects={}{}",
        summary.kind,
        summary.version,
        summary.exported_at,
        summary.projects.len(),
        if summary.has_settings { " settings=yes" } else { "" }
    );
    for project in &summary.projects {
        println!("  {}  {} ({} records)", project.id, project.title, project.records);
    }
}

fn print_import_result(result: &ImportResult) {
    println!(
        "import success={} imported={} skipped={} replaced={} settings_restored={}",
        result.success,
        result.projects_imported,
        result.projects_skipped,
        result.projects_replaced,
        result.settings_restored
    );
    for error in &result.errors {
        println!("  - {error}");
    }
}

