use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use overmark::export::{self, FileSaveConfig};
use overmark::input::InputState;
use overmark::{Config, script};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "overmark")]
#[command(version, about = "Pointer-driven screen annotation engine")]
struct Cli {
    /// Replay a JSON event script and render the result
    #[arg(long, short = 's', value_name = "FILE", required_unless_present = "print_config")]
    script: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1280)]
    width: i32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 720)]
    height: i32,

    /// Write the final PNG to this path
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Save the final PNG to the configured export directory
    #[arg(long, action = ArgAction::SetTrue)]
    save: bool,

    /// Use this config file instead of the default location
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long, action = ArgAction::SetTrue)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let Some(script_path) = cli.script.as_deref() else {
        bail!("No script given");
    };

    let steps = script::load(script_path)?;
    let mut state = InputState::from_config(&config, cli.width, cli.height)
        .context("Failed to create canvas")?;
    log::info!(
        "Replaying {} steps on a {}x{} canvas",
        steps.len(),
        cli.width,
        cli.height
    );

    let outcome = script::replay(&mut state, &steps)?;
    // Whatever is still open counts as released.
    state.on_focus_lost();

    let save_config = FileSaveConfig::from(&config.export);
    for png in &outcome.exports {
        let path = export::save_png(png, &save_config)?;
        println!("Exported {}", path.display());
    }

    let png = state.export_png().context("Failed to encode PNG")?;
    if let Some(path) = &cli.output {
        export::write_png(path, &png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    if cli.save {
        let path = export::save_png(&png, &save_config)?;
        println!("Saved {}", path.display());
    }

    println!(
        "{} steps, {} objects, {} undo steps",
        outcome.executed,
        state.document().len(),
        state.history().step()
    );

    Ok(())
}
