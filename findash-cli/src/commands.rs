// findash-cli/src/commands.rs
use clap::Subcommand;
use findash_core::{ConfigValue, Dashboard};
use findash_widgets::check_value;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Open the interactive dashboard (default)
    Tui,
    /// List widgets in layout order
    List,
    /// Show or hide a widget
    Toggle { id: String },
    /// Step a widget to its next size
    Resize { id: String },
    /// Move a widget onto another widget's position
    Move { from: String, to: String },
    /// Restore the default layout
    Reset,
    /// Per-widget settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ConfigCommand {
    /// Print a widget's settings
    Get { id: String },
    /// Set one key; `true`/`false` and numbers are stored as such, and known keys are checked
    Set { id: String, key: String, value: String },
    /// Clear one widget's settings, or every widget's when no id is given
    Reset { id: Option<String> },
}

/// Run a non-interactive command against a loaded dashboard
pub fn run(command: Command, dashboard: &mut Dashboard, out: &mut impl Write) -> io::Result<()> {
    match command {
        Command::Tui => Ok(()),
        Command::List => list(dashboard, out),
        Command::Toggle { id } => {
            if dashboard.layout_mut().toggle(&id) {
                let enabled = dashboard.layout().get(&id).is_some_and(|w| w.enabled);
                writeln!(out, "{id}: {}", if enabled { "shown" } else { "hidden" })
            } else {
                unknown(&id, out)
            }
        }
        Command::Resize { id } => {
            if dashboard.layout_mut().resize(&id) {
                if let Some(widget) = dashboard.layout().get(&id) {
                    writeln!(out, "{id}: {}", widget.current_size)?;
                }
                Ok(())
            } else if dashboard.layout().get(&id).is_some() {
                writeln!(out, "{id} has a single size")
            } else {
                unknown(&id, out)
            }
        }
        Command::Move { from, to } => {
            if dashboard.layout_mut().reorder(&from, &to) {
                list(dashboard, out)
            } else {
                writeln!(out, "No change")
            }
        }
        Command::Reset => {
            dashboard.layout_mut().reset();
            list(dashboard, out)
        }
        Command::Config(command) => config(command, dashboard, out),
    }
}

fn config(command: ConfigCommand, dashboard: &mut Dashboard, out: &mut impl Write) -> io::Result<()> {
    match command {
        ConfigCommand::Get { id } => {
            let bag = dashboard.config().get(&id);
            if bag.is_empty() {
                return writeln!(out, "{id}: no settings");
            }
            for (key, value) in &bag {
                writeln!(out, "{key} = {value}")?;
            }
            Ok(())
        }
        ConfigCommand::Set { id, key, value } => {
            let value = ConfigValue::parse_loose(&value);
            if let Err(used) = check_value(&id, &key, &value) {
                return writeln!(out, "{id}.{key}: {value} is not accepted, the widget would use {used}");
            }
            writeln!(out, "{id}.{key} = {value}")?;
            dashboard.config_mut().update(&id, [(key, value)]);
            Ok(())
        }
        ConfigCommand::Reset { id: Some(id) } => {
            if dashboard.config_mut().reset_one(&id) {
                writeln!(out, "{id}: settings cleared")
            } else {
                writeln!(out, "{id}: no settings")
            }
        }
        ConfigCommand::Reset { id: None } => {
            dashboard.config_mut().reset_all();
            writeln!(out, "All widget settings cleared")
        }
    }
}

fn list(dashboard: &Dashboard, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{:>2}  {:<22}{:<6}{:<8}TITLE", "#", "ID", "SIZE", "SHOWN")?;
    for (i, widget) in dashboard.layout().instances().iter().enumerate() {
        let title = dashboard
            .catalog()
            .get(&widget.id)
            .map_or("", |d| d.title.as_str());
        writeln!(
            out,
            "{:>2}  {:<22}{:<6}{:<8}{}",
            i + 1,
            widget.id,
            widget.current_size.as_str(),
            if widget.enabled { "yes" } else { "no" },
            title
        )?;
    }
    Ok(())
}

fn unknown(id: &str, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Unknown widget '{id}'")
}
