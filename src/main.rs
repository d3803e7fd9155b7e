use clap::{Parser, Subcommand};
use std::fs;
use std::io;
use std::process::ExitCode;

use route_tracker::config::Config;
use route_tracker::script::{Action, Runner, Script};
use route_tracker::tracker::ConsoleNotifier;
use route_tracker::viewport::{JsonLinesSurface, ViewportFitter};

#[derive(Parser)]
#[command(name = "route-tracker")]
#[command(about = "Live route tracking over a map surface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a replay script
    Validate { script: String },
    /// Replay a script, writing map commands to stdout
    Run {
        script: String,
        /// YAML configuration file
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { script } => validate(&script),
        Commands::Run { script, config } => run(&script, config.as_deref()),
    }
}

fn load_script(path: &str) -> Option<Script> {
    let yaml = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return None;
        }
    };

    match Script::from_str(&yaml) {
        Ok(script) => Some(script),
        Err(e) => {
            eprintln!("Parse error: {}", e);
            None
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some(script) = load_script(path) else {
        return ExitCode::FAILURE;
    };

    println!("Script is valid ({} steps)", script.steps.len());
    for (i, step) in script.steps.iter().enumerate() {
        let time_str = match &step.time {
            Some(t) => t.to_string(),
            None => "immediate".to_string(),
        };
        println!("  {}: {} @ {}", i + 1, describe(&step.action), time_str);
    }
    ExitCode::SUCCESS
}

fn run(path: &str, config_path: Option<&str>) -> ExitCode {
    let Some(script) = load_script(path) else {
        return ExitCode::FAILURE;
    };

    let config = match config_path.map(Config::from_file).transpose() {
        Ok(c) => c.unwrap_or_default(),
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let fitter = ViewportFitter::new(JsonLinesSurface::new(io::stdout()))
        .with_zoom(config.viewport.single_point_zoom)
        .with_padding(config.viewport.padding_px);
    let mut runner = Runner::new(script, &config, Box::new(ConsoleNotifier));
    runner.observe(Box::new(fitter));

    let status = runtime.block_on(runner.run());

    match serde_json::to_string_pretty(&status) {
        Ok(json) => eprintln!("{}", json),
        Err(e) => log::error!("Failed to serialize status: {}", e),
    }
    ExitCode::SUCCESS
}

fn describe(action: &Action) -> String {
    match action {
        Action::Fix {
            latitude,
            longitude,
            ..
        } => format!("fix ({}, {})", latitude, longitude),
        Action::Error { code, .. } => format!("error (code {})", code),
        other => other.name().to_string(),
    }
}
