use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use fern::colors::{Color, ColoredLevelConfig};
use log::{info, LevelFilter};

mod activity;
mod add_command;
mod config;
mod console;
mod datetime;
mod error;
mod list_command;
mod query;
mod remove_command;
mod selection;
mod session;
mod show_command;
mod store;
mod update_command;

use add_command::{AddArgs, AddCommand};
use config::Config;
use console::{ConsoleActivityList, ConsolePresenter};
use list_command::{ListArgs, ListCommand};
use remove_command::{prompt_confirm, RemoveArgs, RemoveCommand};
use show_command::{ShowArgs, ShowCommand};
use store::JsonFileStore;
use update_command::{UpdateArgs, UpdateCommand};

/// activityをJSONファイルに記録するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- add --name Run --duration 30
/// $ cargo run -- list --sort duration --desc
/// $ cargo run -- update 1a2b3c4d --comment "felt good"
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(
        short = 'f',
        long = "file",
        global = true,
        help = "Activity file (default: $ACTIVITY_TRACKER_FILE or the user data directory)"
    )]
    file: Option<PathBuf>,

    #[clap(
        short = 'v',
        long = "verbose",
        global = true,
        parse(from_occurrences),
        help = "Increase log output (-v, -vv, -vvv)"
    )]
    verbose: u64,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    /// List activities
    List(ListArgs),
    /// Show one activity with its comments
    Show(ShowArgs),
    /// Record a new activity
    Add(AddArgs),
    /// Change an activity or add a comment to it
    Update(UpdateArgs),
    /// Remove an activity
    Remove(RemoveArgs),
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config =
        Config::resolve(args.file, args.verbose).context("Failed to load configuration")?;
    init_logger(config.log_level).context("Failed to initialize logger")?;

    let store = JsonFileStore::new(config.file);
    info!("Activity file: {}", store.path().display());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.subcommand {
        SubCommands::List(list) => {
            let activities = ListCommand::new(&store).run(list)?;
            ConsoleActivityList::new(&mut out).show_activities(&activities)?;
        }
        SubCommands::Show(show) => {
            let activity = ShowCommand::new(&store).run(show)?;
            ConsoleActivityList::new(&mut out).show_activity(&activity)?;
        }
        SubCommands::Add(add) => {
            let id = AddCommand::new(&store).run(add)?;
            writeln!(out, "Added {}", id).context("Failed to write result")?;
        }
        SubCommands::Update(update) => {
            let id = UpdateCommand::new(&store).run(update)?;
            writeln!(out, "Updated {}", id).context("Failed to write result")?;
        }
        SubCommands::Remove(remove) => {
            let removed = RemoveCommand::new(&store).run(remove, |activity| {
                prompt_confirm(&mut io::stdin().lock(), &mut io::stderr(), activity)
            })?;
            let written = match removed {
                Some(activity) => writeln!(out, "Removed {}", activity.id),
                None => writeln!(out, "Nothing removed"),
            };
            written.context("Failed to write result")?;
        }
    }

    Ok(())
}

/// ログの出力先と書式を設定する。ログは標準エラー出力に書き込む。
fn init_logger(level: LevelFilter) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()?;

    Ok(())
}
