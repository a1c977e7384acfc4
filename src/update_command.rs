use anyhow::{Context, Result};
use log::info;

use crate::activity::{ActivityChanges, ActivityId, CommentChange};
use crate::datetime::{parse_date, parse_time};
use crate::selection::SelectorArgs;
use crate::session::Session;
use crate::store::ActivityRepository;

/// `update`サブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct UpdateArgs {
    #[clap(flatten)]
    selector: SelectorArgs,

    #[clap(short = 'n', long = "name", help = "New name")]
    name: Option<String>,

    #[clap(
        short = 'd',
        long = "date",
        help = "New date in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    date: Option<String>,

    #[clap(
        short = 't',
        long = "time",
        help = "New time in the format HH:MM, in 15 minute steps",
        parse(try_from_str = parse_time),
    )]
    time: Option<String>,

    #[clap(short = 'm', long = "duration", help = "New duration in minutes")]
    duration: Option<u32>,

    #[clap(
        short = 'p',
        long = "photo",
        help = "New path to a photo; an empty value removes the photo"
    )]
    photo: Option<String>,

    #[clap(short = 'c', long = "comment", help = "Comment to add")]
    comment: Option<String>,

    #[clap(
        long = "comment-index",
        help = "Replace the comment at this index (as shown by `show`) instead of adding one",
        requires = "comment"
    )]
    comment_index: Option<usize>,
}

impl UpdateArgs {
    fn changes(&self) -> ActivityChanges {
        let comment = match (&self.comment, self.comment_index) {
            (Some(text), Some(index)) => Some(CommentChange::Replace {
                index,
                text: text.clone(),
            }),
            (Some(text), None) => Some(CommentChange::Append(text.clone())),
            (None, _) => None,
        };

        ActivityChanges {
            name: self.name.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            duration: self.duration.map(|minutes| minutes.to_string()),
            photo: self.photo.clone(),
            comment,
        }
    }
}

pub struct UpdateCommand<'a, T: ActivityRepository> {
    repository: &'a T,
}

impl<'a, T: ActivityRepository> UpdateCommand<'a, T> {
    /// 新しい`UpdateCommand`を返す。
    ///
    /// # Arguments
    /// * `repository` - activityを保存しているリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `update`サブコマンドの処理を行う。
    ///
    /// 指定されたフィールドだけを置き換え、コメントを追加または書き換えて保存する。
    pub fn run(&self, update: UpdateArgs) -> Result<ActivityId> {
        let mut session = Session::open(self.repository)?;
        let id = session
            .select(&update.selector.selector())
            .context("Failed to select activity")?
            .id;

        let changes = update.changes();
        info!("Changes for {}: {:?}", id, changes);
        session
            .update(id, changes)
            .with_context(|| format!("Failed to update activity {}", id))?;

        Ok(id)
    }
}
