use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env, Target};
use log::{error, info, warn};
use std::io::Write;
use wifi_portal::{Layout, ReqwestDeviceClient, Shell, ShellConfig};
use wifi_portal_core::{DisplayValue, SaveState, ViewModel};

#[derive(Parser)]
#[command(version, about = "Configure a device through its wifi setup portal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current value of every control in the given regions (all if none)
    Show { regions: Vec<String> },
    /// Edit controls and save, which restarts the device
    Set {
        /// Assignments as ID=VALUE; multi-select values are comma-separated
        #[arg(required = true)]
        assignments: Vec<String>,
        /// Apply the edits without saving them to the device
        #[arg(long)]
        no_save: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let cli = Cli::parse();
    let config = ShellConfig::load()?;
    let layout = match &config.layout_path {
        Some(path) => Layout::from_file(path)?,
        None => Layout::default(),
    };

    let device = ReqwestDeviceClient::new(&config.device_url)?;
    let shell = Shell::new(device);
    shell.register(layout.controls().to_vec()).await?;

    let rejected = shell.view().rejected_controls;
    if !rejected.is_empty() {
        warn!("controls without binding: {}", rejected.join(", "));
    }

    match cli.command {
        Command::Show { regions } => {
            let regions = if regions.is_empty() {
                layout.regions()
            } else {
                regions
            };
            show(&shell, &regions).await
        }
        Command::Set {
            assignments,
            no_save,
        } => set(&shell, &layout, &assignments, no_save).await,
    }
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!("module version: {}", env!("CARGO_PKG_VERSION"));
}

async fn show(shell: &Shell<ReqwestDeviceClient>, regions: &[String]) -> Result<()> {
    for region in regions {
        shell.reveal(region).await?;
    }

    let view = shell.view();
    ensure_no_alert(&view)?;

    for control in view.controls.iter().filter(|c| regions.contains(&c.region)) {
        let value = match &control.display {
            Some(DisplayValue::Text(text)) => text.clone(),
            Some(DisplayValue::Selected(values)) => values.join(","),
            None => "(not loaded)".to_string(),
        };
        println!("{}\t{value}", control.id);
    }

    Ok(())
}

async fn set(
    shell: &Shell<ReqwestDeviceClient>,
    layout: &Layout,
    assignments: &[String],
    no_save: bool,
) -> Result<()> {
    for region in layout.regions() {
        shell.reveal(&region).await?;
    }
    ensure_no_alert(&shell.view())?;

    for assignment in assignments {
        let (id, value) = assignment
            .split_once('=')
            .context(format!("'{assignment}' is not of the form ID=VALUE"))?;
        let state = layout.control_state(id, value)?;
        shell.edit(id, state).await?;
    }

    if no_save {
        info!("edits applied, not saving");
        return Ok(());
    }

    shell.save().await?;

    let view = shell.view();
    match view.save_state {
        SaveState::Completed => {
            if let Some(message) = view.success_message {
                println!("{message}");
            }
            Ok(())
        }
        SaveState::Failed { message } => bail!(message),
        state => bail!("save pipeline stopped unexpectedly: {state:?}"),
    }
}

fn ensure_no_alert(view: &ViewModel) -> Result<()> {
    match &view.error_message {
        Some(message) => bail!("{message}"),
        None => Ok(()),
    }
}
