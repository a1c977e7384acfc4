use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;

/// 保存先のファイル名。
pub const DEFAULT_FILE_NAME: &str = "activities.json";

/// 保存先を指定する環境変数。
pub const FILE_ENV: &str = "ACTIVITY_TRACKER_FILE";

/// ログレベルを指定する環境変数。
pub const LOG_ENV: &str = "ACTIVITY_TRACKER_LOG";

const APP_DIR_NAME: &str = "activity-tracker";

/// 起動時に決定する設定。
#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub file: PathBuf,
    pub log_level: LevelFilter,
}

impl Config {
    /// コマンドライン引数と環境変数から設定を作成する。
    ///
    /// 保存先は`--file`、`ACTIVITY_TRACKER_FILE`、データディレクトリの順に決定する。
    /// データディレクトリが取得できない場合はカレントディレクトリの`activities.json`を利用する。
    ///
    /// # Arguments
    ///
    /// * `file` - `--file`で指定されたパス
    /// * `verbose` - `-v`の指定回数
    pub fn resolve(file: Option<PathBuf>, verbose: u64) -> Result<Self> {
        Self::from_sources(
            file,
            env::var_os(FILE_ENV).map(PathBuf::from),
            env::var(LOG_ENV).ok(),
            verbose,
            dirs::data_dir().as_deref(),
        )
    }

    /// 取得済みの値から設定を作成する。
    fn from_sources(
        file: Option<PathBuf>,
        env_file: Option<PathBuf>,
        env_log: Option<String>,
        verbose: u64,
        data_dir: Option<&Path>,
    ) -> Result<Self> {
        let file = file
            .or(env_file)
            .unwrap_or_else(|| default_file(data_dir));

        let log_level = match env_log {
            Some(level) => level
                .parse()
                .with_context(|| format!("Invalid {}: {}", LOG_ENV, level))?,
            None => level_from_verbosity(verbose),
        };

        Ok(Self { file, log_level })
    }
}

fn default_file(data_dir: Option<&Path>) -> PathBuf {
    match data_dir {
        Some(dir) => dir.join(APP_DIR_NAME).join(DEFAULT_FILE_NAME),
        None => PathBuf::from(DEFAULT_FILE_NAME),
    }
}

fn level_from_verbosity(verbose: u64) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
