//! Couplehook CLI
//!
//! Usage:
//!   couplehook --script yard.txt --coupler knuckle   # Run a scenario script
//!   couplehook --interactive                          # Type commands one by one
//!   couplehook --serve                                # HTTP API server
//!   couplehook --script yard.txt --json               # JSON tick reports

use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::process;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use couplehook::core::{parse_line, run_server, AssetBundle, Simulation};
use couplehook::types::{CouplerType, CouplingError, HookConfig, TickReport};
use couplehook::VERSION;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CouplerArg {
    Chain,
    Knuckle,
}

impl From<CouplerArg> for CouplerType {
    fn from(arg: CouplerArg) -> Self {
        match arg {
            CouplerArg::Chain => CouplerType::Chain,
            CouplerArg::Knuckle => CouplerType::JanneyKnuckle,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "couplehook",
    version = VERSION,
    about = "Rigid knuckle hook coupling for chain-coupled rail vehicles",
    long_about = "Couplehook drives the coupling interaction of every coupler in a\n\
                  yard of cars and replaces the loose chain with a rigid hook when\n\
                  the knuckle coupler type is selected.\n\n\
                  Modes:\n  \
                  --script       Run a scenario script\n  \
                  --interactive  Read commands from stdin\n  \
                  --serve        HTTP API server mode\n\n\
                  States:\n  \
                  DISABLED        - Partner unresolved or not yet ticked\n  \
                  PARKED          - Not coupled\n  \
                  ATTACHED        - Coupled with a loose chain\n  \
                  ATTACHED_TIGHT  - Coupled with a rigid hook"
)]
struct Args {
    /// Scenario script to run
    #[arg(short, long)]
    script: Option<String>,

    /// Interactive mode - read commands from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Hook settings file (JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the coupler type from the settings
    #[arg(long, value_enum)]
    coupler: Option<CouplerArg>,

    /// Asset bundle holding the hook prefab (JSON)
    #[arg(long)]
    bundle: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show events and debug logs
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: logging already initialised");
    }

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(&args).await {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

async fn run(args: &Args) -> Result<(), CouplingError> {
    let config = load_config(args)?;
    let bundle = match &args.bundle {
        Some(path) => AssetBundle::load(path)?,
        None => AssetBundle::builtin(),
    };

    if args.serve {
        print_header("API Server", args.no_color);
        println!("Listening on http://{}", args.addr);
        println!("  GET  /health");
        println!("  POST /session/new");
        println!("  GET  /session/:id");
        println!("  POST /session/:id/command");
        println!("  WS   /ws/:id");
        println!();
        return run_server(&args.addr, config, bundle).await;
    }

    let mut sim = Simulation::with_assets(config, &bundle)?;
    if let Some(path) = &args.script {
        run_script(&mut sim, path, args)?;
        // --script with --interactive continues from the scripted yard
        if !args.interactive {
            return Ok(());
        }
    }
    run_interactive(&mut sim, args)
}

fn load_config(args: &Args) -> Result<HookConfig, CouplingError> {
    let mut config = match &args.config {
        Some(path) => HookConfig::load(path)?,
        None => HookConfig::default(),
    };
    if let Some(coupler) = args.coupler {
        config.coupler_type = coupler.into();
    }
    Ok(config)
}

/// Run a whole script file
fn run_script(sim: &mut Simulation, path: &str, args: &Args) -> Result<(), CouplingError> {
    let text = std::fs::read_to_string(path).map_err(|source| CouplingError::ScriptIo {
        path: path.to_string(),
        source,
    })?;
    for report in sim.run_script(&text)? {
        print_report(&report, args);
    }
    Ok(())
}

/// Read commands from stdin until EOF or `quit`
fn run_interactive(sim: &mut Simulation, args: &Args) -> Result<(), CouplingError> {
    print_header("Interactive", args.no_color);
    println!("Commands: spawn, despawn, move, couple, uncouple, activate, tick. Type 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line_no = 0;

    loop {
        print!("[tick {}] > ", sim.tick_count());
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }
        line_no += 1;

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended after {} ticks.", sim.tick_count());
            break;
        }

        // Mistakes are reported and the session continues
        let command = match parse_line(line_no, line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        match sim.apply(&command) {
            Ok(reports) => {
                for report in &reports {
                    print_report(report, args);
                }
            }
            Err(e) => eprintln!("{}", e),
        }
    }
    Ok(())
}

fn print_report(report: &TickReport, args: &Args) {
    if args.json {
        match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("could not encode tick {}: {}", report.tick, e),
        }
        return;
    }

    let header = format!("--- tick {} ({} changed) ---", report.tick, report.transition_count());
    if args.no_color {
        println!("{}", header);
    } else {
        println!("{}", header.dimmed());
    }
    for output in &report.outputs {
        if args.no_color {
            println!("{}", output.to_parseable_string());
        } else {
            println!("{}", output.to_terminal_string());
        }
    }
    if args.verbose {
        for event in &report.events {
            println!("    {}", event.label());
        }
    }
}

fn print_header(mode: &str, no_color: bool) {
    let title = format!("Couplehook v{} - {}", VERSION, mode);
    if no_color {
        println!("========================================");
        println!("  {}", title);
        println!("========================================");
    } else {
        println!("{}", "========================================".bold());
        println!("  {}", title.bold());
        println!("{}", "========================================".bold());
    }
    println!();
}
