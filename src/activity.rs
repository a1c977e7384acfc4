use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// activityを一意に識別するためのID。
///
/// 作成時に割り当てられ、以降は変更されない。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(Uuid);

impl ActivityId {
    /// 新しい`ActivityId`を返す。
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// 一覧表示に利用する先頭8文字を返す。
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }

    /// ハイフンを除いた32文字の16進表記を返す。
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActivityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// 記録された1件のactivity。
///
/// `name`, `date`, `time`, `duration`は古いファイルでは欠けていることがあるため`Option`で持つ。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub id: ActivityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Activity {
    /// 新しい`Activity`を返す。コメントは空で作成される。
    pub fn new(draft: ActivityDraft) -> Self {
        Self {
            id: ActivityId::new(),
            name: Some(draft.name),
            date: Some(draft.date),
            time: Some(draft.time),
            duration: Some(draft.duration),
            comments: vec![],
            photo: draft.photo.filter(|photo| !photo.is_empty()),
        }
    }

    /// 写真が設定されているかを返す。空文字列は未設定として扱う。
    pub fn has_photo(&self) -> bool {
        self.photo.as_deref().is_some_and(|photo| !photo.is_empty())
    }

    /// `duration`を分単位の整数として返す。数値でない場合は`None`。
    pub fn duration_minutes(&self) -> Option<i64> {
        self.duration
            .as_deref()
            .and_then(|duration| duration.trim().parse().ok())
    }
}

/// 新しいactivityを作成するための入力値。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityDraft {
    pub name: String,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub photo: Option<String>,
}

/// 既存のactivityに対する変更内容。
///
/// `None`のフィールドは変更しない。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActivityChanges {
    pub name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<String>,
    pub photo: Option<String>,
    pub comment: Option<CommentChange>,
}

/// コメントの追加または書き換え。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommentChange {
    Append(String),
    Replace { index: usize, text: String },
}

/// `duration`は文字列で保存するが、数値で書かれた古いファイルも読み込めるようにする。
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    let raw = Option::<RawDuration>::deserialize(deserializer)?;
    Ok(raw.map(|raw| match raw {
        RawDuration::Text(text) => text,
        RawDuration::Integer(minutes) => minutes.to_string(),
        RawDuration::Float(minutes) => minutes.to_string(),
    }))
}
