use std::path::PathBuf;

use thiserror::Error;

/// 保存ファイルの読み書きで発生するエラー。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access activity file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Activity file {path} is not a valid activity list")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize activities")]
    Serialize(#[source] serde_json::Error),
}

/// activityの選択、更新で発生するエラー。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("No activity matches id '{0}'")]
    NotFound(String),
    #[error("Id prefix '{prefix}' matches {count} activities")]
    Ambiguous { prefix: String, count: usize },
    #[error("Id prefix '{0}' is too short")]
    PrefixTooShort(String),
    #[error("No activity is displayed as '{0}'")]
    NoMatchingLine(String),
    #[error("Comment index {index} is out of range (activity has {len} comments)")]
    CommentIndexOutOfRange { index: usize, len: usize },
    #[error("Comment {0} cannot be replaced with an empty comment")]
    EmptyComment(usize),
}
