use anyhow::{Context, Result};
use log::info;

use crate::activity::{ActivityDraft, ActivityId};
use crate::datetime::{current_quarter_hour, parse_date, parse_time, today};
use crate::session::Session;
use crate::store::ActivityRepository;

/// `add`サブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct AddArgs {
    #[clap(short = 'n', long = "name", help = "Name of the activity")]
    name: String,

    #[clap(
        short = 'd',
        long = "date",
        help = "Date in the format YYYY-MM-DD (default: today)",
        parse(try_from_str = parse_date),
    )]
    date: Option<String>,

    #[clap(
        short = 't',
        long = "time",
        help = "Time in the format HH:MM, in 15 minute steps (default: now)",
        parse(try_from_str = parse_time),
    )]
    time: Option<String>,

    #[clap(short = 'm', long = "duration", help = "Duration in minutes")]
    duration: u32,

    #[clap(short = 'p', long = "photo", help = "Path to a photo of the activity")]
    photo: Option<String>,
}

pub struct AddCommand<'a, T: ActivityRepository> {
    repository: &'a T,
}

impl<'a, T: ActivityRepository> AddCommand<'a, T> {
    /// 新しい`AddCommand`を返す。
    ///
    /// # Arguments
    /// * `repository` - activityを保存するリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `add`サブコマンドの処理を行う。
    ///
    /// 日付が指定されていない場合は今日、時刻が指定されていない場合は現在時刻を15分単位に切り捨てた値を利用する。
    pub fn run(&self, add: AddArgs) -> Result<ActivityId> {
        let draft = ActivityDraft {
            name: add.name,
            date: add.date.unwrap_or_else(today),
            time: add.time.unwrap_or_else(current_quarter_hour),
            duration: add.duration.to_string(),
            photo: add.photo,
        };
        info!("New activity: {:?}", draft);

        let mut session = Session::open(self.repository)?;
        let id = session
            .add(draft)
            .context("Failed to add activity")?;

        Ok(id)
    }
}
