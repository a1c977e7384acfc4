use anyhow::{Context, Result};
use log::info;

use crate::activity::{Activity, ActivityChanges, ActivityDraft, ActivityId, CommentChange};
use crate::console::format_activity;
use crate::error::SelectError;
use crate::query::{search, SortField};
use crate::store::ActivityRepository;

/// IDの前方一致で選択する場合に必要な最小の文字数。
const MIN_ID_PREFIX_LEN: usize = 4;

/// 一覧表示の状態。
///
/// 操作ごとに受け取り、更新した値を返す。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub field: SortField,
    pub descending: bool,
    pub term: String,
}

impl ViewState {
    /// 並び順を変更した`ViewState`を返す。
    pub fn sorted(self, field: SortField, descending: bool) -> Self {
        Self {
            field,
            descending,
            ..self
        }
    }

    /// 検索語を変更した`ViewState`を返す。
    pub fn searched(self, term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..self
        }
    }
}

/// activityの選択方法。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// IDの全体、またはハイフンを除いた前方一致。
    Id(String),
    /// `format_activity`で表示される行。同じ行が複数ある場合は最初のactivityを選ぶ。
    Line(String),
}

/// 読み込んだactivityの一覧に対する操作。
///
/// 変更する操作は成功した場合のみ一覧全体を保存する。保存に失敗した場合は変更前の一覧が残る。
pub struct Session<'a, T: ActivityRepository> {
    repository: &'a T,
    activities: Vec<Activity>,
}

impl<'a, T: ActivityRepository> Session<'a, T> {
    /// activityの一覧を読み込み、新しい`Session`を返す。
    ///
    /// # Arguments
    ///
    /// * `repository` - activityを保存するリポジトリ
    pub fn open(repository: &'a T) -> Result<Self> {
        let activities = repository
            .load()
            .context("Failed to load activities")?;
        info!("{} activities loaded.", activities.len());

        Ok(Self {
            repository,
            activities,
        })
    }

    /// 保存されている順のactivityを返す。
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// `state`の検索語と並び順を適用した一覧を返す。
    pub fn view(&self, state: &ViewState) -> Vec<Activity> {
        search(&self.activities, &state.term, state.field, state.descending)
    }

    /// activityを1件選択する。
    pub fn select(&self, selector: &Selector) -> Result<&Activity, SelectError> {
        match selector {
            Selector::Id(id) => self.select_by_id(id),
            Selector::Line(line) => self
                .activities
                .iter()
                .find(|activity| format_activity(activity) == *line)
                .ok_or_else(|| SelectError::NoMatchingLine(line.clone())),
        }
    }

    fn select_by_id(&self, id: &str) -> Result<&Activity, SelectError> {
        if let Ok(id) = id.parse::<ActivityId>() {
            return self
                .activities
                .iter()
                .find(|activity| activity.id == id)
                .ok_or_else(|| SelectError::NotFound(id.to_string()));
        }

        let prefix = id.trim().to_lowercase().replace('-', "");
        if prefix.len() < MIN_ID_PREFIX_LEN {
            return Err(SelectError::PrefixTooShort(id.to_string()));
        }

        let mut matched = self
            .activities
            .iter()
            .filter(|activity| activity.id.simple().starts_with(&prefix));
        match (matched.next(), matched.count()) {
            (Some(activity), 0) => Ok(activity),
            (Some(_), rest) => Err(SelectError::Ambiguous {
                prefix: id.to_string(),
                count: rest + 1,
            }),
            (None, _) => Err(SelectError::NotFound(id.to_string())),
        }
    }

    fn position(&self, id: ActivityId) -> Result<usize, SelectError> {
        self.activities
            .iter()
            .position(|activity| activity.id == id)
            .ok_or_else(|| SelectError::NotFound(id.to_string()))
    }

    /// 一覧を保存し、成功した場合に`activities`で置き換える。
    fn commit(&mut self, activities: Vec<Activity>) -> Result<()> {
        self.repository
            .save(&activities)
            .context("Failed to save activities")?;
        self.activities = activities;

        Ok(())
    }

    /// 新しいactivityを末尾に追加して保存する。
    pub fn add(&mut self, draft: ActivityDraft) -> Result<ActivityId> {
        let activity = Activity::new(draft);
        let id = activity.id;

        let mut activities = self.activities.clone();
        activities.push(activity);
        self.commit(activities)?;
        info!("Activity {} added.", id);

        Ok(id)
    }

    /// activityを更新して保存する。
    ///
    /// `changes`で指定されていないフィールドと既存のコメントはそのまま残る。
    /// 追加するコメントは前後の空白を除き、空の場合は追加しない。
    /// 書き換えるコメントが空の場合はエラーとし、何も変更しない。
    pub fn update(&mut self, id: ActivityId, changes: ActivityChanges) -> Result<()> {
        let position = self.position(id)?;
        let mut activity = self.activities[position].clone();

        if let Some(name) = changes.name {
            activity.name = Some(name);
        }
        if let Some(date) = changes.date {
            activity.date = Some(date);
        }
        if let Some(time) = changes.time {
            activity.time = Some(time);
        }
        if let Some(duration) = changes.duration {
            activity.duration = Some(duration);
        }
        if let Some(photo) = changes.photo {
            activity.photo = Some(photo).filter(|photo| !photo.is_empty());
        }
        match changes.comment {
            Some(CommentChange::Append(text)) => {
                let text = text.trim();
                if !text.is_empty() {
                    activity.comments.push(text.to_string());
                }
            }
            Some(CommentChange::Replace { index, text }) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(SelectError::EmptyComment(index).into());
                }
                let len = activity.comments.len();
                let comment = activity
                    .comments
                    .get_mut(index)
                    .ok_or(SelectError::CommentIndexOutOfRange { index, len })?;
                *comment = text.to_string();
            }
            None => {}
        }

        let mut activities = self.activities.clone();
        activities[position] = activity;
        self.commit(activities)?;
        info!("Activity {} updated.", id);

        Ok(())
    }

    /// activityを削除して保存し、削除したactivityを返す。
    pub fn remove(&mut self, id: ActivityId) -> Result<Activity> {
        let position = self.position(id)?;

        let mut activities = self.activities.clone();
        let removed = activities.remove(position);
        self.commit(activities)?;
        info!("Activity {} removed.", id);

        Ok(removed)
    }
}
