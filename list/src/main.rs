use anyhow::{Context, Result};
use clap::Parser;
use imesetting_list::{
    load_config_or_default, AppType, FileService, ImeService, ListScreen, ProcessLauncher,
    RowAction,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "imesetting-list")]
#[command(about = "Enable, disable and configure installed keyboards", long_about = None)]
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

    /// Selector program launched from the default keyboard row
    #[arg(long, default_value = "imesetting-selector")]
    selector_bin: PathBuf,
}

fn print_screen<S: ImeService + 'static>(screen: &ListScreen<S, ProcessLauncher>) {
    println!("== {} ==", screen.title());
    for (i, row) in screen.rows().iter().enumerate() {
        println!("{:>3}  {}", i, row);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config_or_default(args.config.as_ref());

    let mut launcher_args = vec!["--state".to_string(), args.state.display().to_string()];
    if let Some(cfg) = &args.config {
        launcher_args.push("--config".into());
        launcher_args.push(cfg.display().to_string());
    }
    let launcher = ProcessLauncher::new()
        .register(config.selector_app_id.clone(), args.selector_bin.clone())
        .with_args(launcher_args);

    let service = FileService::open(&args.state);
    service
        .read_state()
        .with_context(|| format!("reading state file {}", args.state.display()))?;

    let app_type = AppType::from_caller(args.caller.as_deref());
    let mut screen = ListScreen::new(service, launcher, config, app_type);

    print_screen(&screen);
    println!();
    println!("Commands: tap N, toggle N, yes, no, reload, list, quit");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else { continue };
        let row = parts.next().and_then(|n| n.parse::<usize>().ok());

        let action = match (cmd, row) {
            ("tap", Some(n)) => screen.tap(n),
            ("toggle", Some(n)) => screen.toggle(n),
            ("yes", _) => {
                if !screen.confirm_dialog() {
                    println!("nothing applied");
                }
                RowAction::Refresh
            }
            ("no", _) => {
                screen.cancel_dialog();
                RowAction::Refresh
            }
            ("reload", _) => {
                screen.update_window();
                RowAction::Refresh
            }
            ("list", _) => RowAction::Refresh,
            ("quit" | "q" | "exit", _) => break,
            _ => {
                println!("unknown command: {}", line.trim());
                continue;
            }
        };

        match action {
            RowAction::Confirm(_) => {
                if let Some(dialog) = screen.pending_dialog() {
                    println!("-- {} --", dialog.title);
                    println!("{}", dialog.text);
                    println!("[no] {}   [yes] {}", dialog.cancel_label, dialog.ok_label);
                }
                continue;
            }
            RowAction::LaunchSelector => {
                if let Some(reply) = screen.launcher_mut().take_reply() {
                    screen.on_launch_reply(&reply);
                }
            }
            RowAction::OpenOption(target) => println!("option window: {:?}", target),
            RowAction::None | RowAction::Refresh | RowAction::Withdraw | RowAction::Close => {}
        }
        print_screen(&screen);
    }

    Ok(())
}
