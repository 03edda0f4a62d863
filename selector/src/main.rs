use anyhow::{Context, Result};
use clap::Parser;
use imesetting_selector::{
    load_config_or_default, AppType, FileService, ImeService, ProcessLauncher, RowAction,
    SelectorScreen,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "imesetting-selector")]
#[command(about = "Choose the active keyboard", long_about = None)]
struct Args {
    /// Input method service state file (JSON)
    #[arg(long)]
    state: PathBuf,

    /// Screen configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Launch extra: "settings", "settings_no_rotation" or anything else
    #[arg(long)]
    caller: Option<String>,

    /// Pick this row without prompting
    #[arg(long)]
    pick: Option<usize>,

    /// Keyboard list program launched by the "select keyboard" button
    #[arg(long, default_value = "imesetting-list")]
    list_bin: PathBuf,
}

fn print_screen<S: ImeService>(screen: &SelectorScreen<S, ProcessLauncher>) {
    println!("== {} ==", screen.title());
    for (i, row) in screen.rows().iter().enumerate() {
        println!("{:>3}  {}", i, row);
    }
    if let Some(button) = screen.button_label() {
        println!("  b  [{}]", button);
    }
}

fn run(args: Args) -> Result<bool> {
    let config = load_config_or_default(args.config.as_ref());

    let mut launcher_args = vec!["--state".to_string(), args.state.display().to_string()];
    if let Some(cfg) = &args.config {
        launcher_args.push("--config".into());
        launcher_args.push(cfg.display().to_string());
    }
    let launcher = ProcessLauncher::new()
        .register(config.list_app_id.clone(), args.list_bin.clone())
        .with_args(launcher_args);

    let service = FileService::open(&args.state);
    service
        .read_state()
        .with_context(|| format!("reading state file {}", args.state.display()))?;

    let app_type = AppType::from_caller(args.caller.as_deref());
    let mut screen = SelectorScreen::new(service, launcher, config, app_type);

    if let Some(index) = args.pick {
        return Ok(screen.pick(index) == RowAction::Close);
    }

    print_screen(&screen);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    while !screen.is_closed() {
        print!("pick> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            screen.dismiss();
            break;
        }
        match line.trim() {
            "" => continue,
            "q" | "quit" => screen.dismiss(),
            "b" => {
                if screen.press_button() {
                    if let Some(reply) = screen.launcher_mut().take_reply() {
                        screen.on_launch_reply(&reply);
                    }
                    print_screen(&screen);
                }
            }
            other => match other.parse::<usize>() {
                Ok(index) => {
                    if screen.pick(index) == RowAction::Close {
                        return Ok(true);
                    }
                    println!("cannot pick {}", index);
                }
                Err(_) => println!("unknown command: {}", other),
            },
        }
    }
    Ok(false)
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    // Exit status 0 tells the launching screen that the active keyboard changed.
    if run(args)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
