use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Error};
use log::warn;

use crate::activity::Activity;

/// 並び替えに利用するフィールド。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    Date,
    Duration,
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "date" => Ok(Self::Date),
            "duration" => Ok(Self::Duration),
            other => bail!("Unknown sort field: {} (expected name, date or duration)", other),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Date => "date",
            Self::Duration => "duration",
        };
        write!(f, "{}", name)
    }
}

/// 並び替えのキー。
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Text(&'a str),
    Minutes(i64),
}

fn sort_key(activity: &Activity, field: SortField) -> Option<SortKey<'_>> {
    match field {
        SortField::Name => activity.name.as_deref().map(SortKey::Text),
        SortField::Date => activity.date.as_deref().map(SortKey::Text),
        SortField::Duration => activity.duration_minutes().map(SortKey::Minutes),
    }
}

/// activityを指定されたフィールドで安定ソートする。
///
/// 名前と日付は文字列として(大文字小文字を区別して)比較し、所要時間は整数として比較する。
/// 降順でも同じ値のactivityは元の順序を保つ。
/// いずれかのactivityにフィールドが無い場合、または所要時間が整数でない場合は並び替えずに返す。
///
/// # Arguments
///
/// * `activities` - 並び替えるactivity
/// * `field` - 並び替えに利用するフィールド
/// * `descending` - 降順にする場合は`true`
pub fn sort_by(activities: &[Activity], field: SortField, descending: bool) -> Vec<Activity> {
    let keys: Option<Vec<SortKey>> = activities
        .iter()
        .map(|activity| sort_key(activity, field))
        .collect();
    let Some(keys) = keys else {
        warn!("Some activities have no usable {}, keeping original order", field);
        return activities.to_vec();
    };

    let mut indices: Vec<usize> = (0..activities.len()).collect();
    indices.sort_by(|&a, &b| {
        let ordering: Ordering = keys[a].cmp(&keys[b]);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });

    indices
        .into_iter()
        .map(|index| activities[index].clone())
        .collect()
}

/// 名前または日付に検索語を含むactivityを抽出し、`sort_by`と同じ規則で並び替える。
///
/// 大文字小文字は区別しない。検索語が空の場合は全てのactivityが対象になる。
pub fn search(
    activities: &[Activity],
    term: &str,
    field: SortField,
    descending: bool,
) -> Vec<Activity> {
    let term = term.to_lowercase();
    let contains = |value: &Option<String>| {
        value
            .as_deref()
            .is_some_and(|value| value.to_lowercase().contains(&term))
    };

    let matched: Vec<Activity> = activities
        .iter()
        .filter(|activity| term.is_empty() || contains(&activity.name) || contains(&activity.date))
        .cloned()
        .collect();

    sort_by(&matched, field, descending)
}
