use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::info;

use crate::activity::Activity;
use crate::console::format_activity;
use crate::selection::SelectorArgs;
use crate::session::Session;
use crate::store::ActivityRepository;

/// `remove`サブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct RemoveArgs {
    #[clap(flatten)]
    selector: SelectorArgs,

    #[clap(short = 'y', long = "yes", help = "Remove without asking for confirmation")]
    yes: bool,
}

pub struct RemoveCommand<'a, T: ActivityRepository> {
    repository: &'a T,
}

impl<'a, T: ActivityRepository> RemoveCommand<'a, T> {
    /// 新しい`RemoveCommand`を返す。
    ///
    /// # Arguments
    /// * `repository` - activityを保存しているリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `remove`サブコマンドの処理を行う。
    ///
    /// 削除の前に`confirm`で確認し、`false`が返された場合は何も変更しない。
    /// 削除した場合はそのactivityを返す。
    ///
    /// # Arguments
    ///
    /// * `remove` - `remove`サブコマンドの引数
    /// * `confirm` - 削除するactivityを受け取り、削除してよいかを返す
    pub fn run<F>(&self, remove: RemoveArgs, confirm: F) -> Result<Option<Activity>>
    where
        F: FnOnce(&Activity) -> Result<bool>,
    {
        let mut session = Session::open(self.repository)?;
        let selected = session
            .select(&remove.selector.selector())
            .context("Failed to select activity")?;

        if !remove.yes && !confirm(selected)? {
            info!("Removal of {} cancelled.", selected.id);
            return Ok(None);
        }

        let id = selected.id;
        let removed = session
            .remove(id)
            .with_context(|| format!("Failed to remove activity {}", id))?;

        Ok(Some(removed))
    }
}

/// 削除してよいかを`reader`から1行読み込んで確認する。
///
/// `y`または`yes`(大文字小文字は区別しない)の場合のみ`true`を返す。
pub fn prompt_confirm<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    activity: &Activity,
) -> Result<bool> {
    write!(
        writer,
        "{}\nAre you sure you want to remove the selected activity? [y/N] ",
        format_activity(activity)
    )
    .context("Failed to write confirmation prompt")?;
    writer.flush().context("Failed to flush confirmation prompt")?;

    let mut answer = String::new();
    reader
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
