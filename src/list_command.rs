use anyhow::Result;
use log::info;

use crate::activity::Activity;
use crate::query::SortField;
use crate::session::{Session, ViewState};
use crate::store::ActivityRepository;

/// `list`サブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct ListArgs {
    #[clap(
        short = 's',
        long = "sort",
        help = "Sort by name, date or duration",
        default_value = "name"
    )]
    sort: SortField,

    #[clap(short = 'r', long = "desc", help = "Sort in descending order")]
    descending: bool,

    #[clap(
        short = 'q',
        long = "search",
        help = "Show only activities whose name or date contains the term (case-insensitive)"
    )]
    search: Option<String>,
}

pub struct ListCommand<'a, T: ActivityRepository> {
    repository: &'a T,
}

impl<'a, T: ActivityRepository> ListCommand<'a, T> {
    /// 新しい`ListCommand`を返す。
    ///
    /// # Arguments
    /// * `repository` - activityを保存しているリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `list`サブコマンドの処理を行う。
    ///
    /// 検索語で絞り込み、指定されたフィールドで並び替えたactivityを返す。
    pub fn run(&self, list: ListArgs) -> Result<Vec<Activity>> {
        let session = Session::open(self.repository)?;
        let state = ViewState::default()
            .sorted(list.sort, list.descending)
            .searched(list.search.unwrap_or_default());
        info!(
            "Sort by {} (descending: {}), search: '{}'",
            state.field, state.descending, state.term
        );

        let view = session.view(&state);
        info!(
            "{} of {} activities shown.",
            view.len(),
            session.activities().len()
        );

        Ok(view)
    }
}
