use clap::Parser;
use srcdump::{cli, Cli, OutputFormatter, OutputMode, SrcDump, SrcDumpError, UserFriendlyError};
use std::path::Path;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return cli::handle_parse_error(e),
    };

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    // Usage errors exit successfully; only a bad input folder is a failure.
    let Some((input_dir, output_file)) = cli.paths() else {
        cli::print_usage();
        return 0;
    };

    if !input_dir.is_dir() {
        println!("Error: Input folder '{}' not found.", input_dir.display());
        return 1;
    }

    let srcdump = match SrcDump::from_cli(&cli) {
        Ok(srcdump) => srcdump,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&srcdump, input_dir, output_file);
    }

    match srcdump.collect(input_dir, output_file) {
        Ok(report) => {
            srcdump.output_formatter().print_collection_report(&report);
            0
        }
        Err(e) => {
            srcdump.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &SrcDumpError) -> i32 {
    match error {
        SrcDumpError::Config { .. } => 2,
        SrcDumpError::OutputDirectory { .. } => 3,
        SrcDumpError::OutputFile { .. } => 4,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "srcdump.toml".to_string());

    match SrcDump::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  srcdump <input_folder> <output_file> --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(srcdump: &SrcDump, input_dir: &Path, output_file: &Path) -> i32 {
    let formatter = srcdump.output_formatter();
    formatter.info("DRY RUN MODE - nothing will be written");

    match srcdump.plan(input_dir, output_file) {
        Ok(plan) => {
            formatter.print_plan(&plan.output_path, &plan.files);
            for warning in &plan.warnings {
                formatter.warning(warning);
            }
            0
        }
        Err(e) => {
            srcdump.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn print_startup_error(error: &SrcDumpError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
