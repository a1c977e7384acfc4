use anyhow::{Context, Result};

use crate::activity::Activity;
use crate::selection::SelectorArgs;
use crate::session::Session;
use crate::store::ActivityRepository;

/// `show`サブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct ShowArgs {
    #[clap(flatten)]
    selector: SelectorArgs,
}

pub struct ShowCommand<'a, T: ActivityRepository> {
    repository: &'a T,
}

impl<'a, T: ActivityRepository> ShowCommand<'a, T> {
    /// 新しい`ShowCommand`を返す。
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `show`サブコマンドの処理を行う。選択したactivityを返す。
    pub fn run(&self, show: ShowArgs) -> Result<Activity> {
        let session = Session::open(self.repository)?;
        let activity = session
            .select(&show.selector.selector())
            .context("Failed to select activity")?;

        Ok(activity.clone())
    }
}
