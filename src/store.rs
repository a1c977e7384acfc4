use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::activity::Activity;
use crate::error::StoreError;

/// activityの一覧を永続化するためのtrait。
#[cfg_attr(test, automock)]
pub trait ActivityRepository {
    /// 保存されている全てのactivityを読み込む。
    fn load(&self) -> Result<Vec<Activity>, StoreError>;

    /// 全てのactivityを書き込み、以前の内容を置き換える。
    fn save(&self, activities: &[Activity]) -> Result<(), StoreError>;
}

/// 1つのJSONファイルにactivityの一覧を保存する。
///
/// 書き込みは毎回ファイル全体を上書きする。書き込み途中で異常終了した場合はファイルが壊れる可能性がある。
///
/// # Examples
///
/// ```
/// let store = JsonFileStore::new("activities.json");
/// let activities = store.load().unwrap();
/// ```
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// 新しい`JsonFileStore`を返す。
    ///
    /// # Arguments
    ///
    /// * `path` - 保存先のファイルパス
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn parse_error(&self, source: serde_json::Error) -> StoreError {
        StoreError::Parse {
            path: self.path.clone(),
            source,
        }
    }

    /// 空の一覧を書き込んだファイルを作成する。親ディレクトリが無い場合は作成する。
    fn create_empty(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        self.save(&[])?;
        info!("Created empty activity file: {}", self.path.display());

        Ok(())
    }
}

impl ActivityRepository for JsonFileStore {
    /// ファイルが存在しない場合は空のファイルを作成し、空の一覧を返す。
    /// IDが無いactivityがある場合はIDを割り当てて保存し直す。
    fn load(&self) -> Result<Vec<Activity>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.create_empty()?;
                return Ok(vec![]);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let records: Vec<Value> =
            serde_json::from_str(&content).map_err(|e| self.parse_error(e))?;
        let missing_ids = records
            .iter()
            .filter(|record| record.get("id").is_none())
            .count();
        let activities: Vec<Activity> = records
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()
            .map_err(|e| self.parse_error(e))?;

        // IDが無いactivityには読み込み時にIDを割り当てたため、次回以降も同じIDになるよう書き戻す。
        if missing_ids > 0 {
            self.save(&activities)?;
            info!(
                "Assigned ids to {} activities in {}",
                missing_ids,
                self.path.display()
            );
        }
        debug!(
            "Loaded {} activities from {}",
            activities.len(),
            self.path.display()
        );

        Ok(activities)
    }

    fn save(&self, activities: &[Activity]) -> Result<(), StoreError> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        activities
            .serialize(&mut serializer)
            .map_err(StoreError::Serialize)?;

        fs::write(&self.path, buffer).map_err(|e| self.io_error(e))?;
        debug!(
            "Saved {} activities to {}",
            activities.len(),
            self.path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::{ActivityRepository, JsonFileStore};
    use crate::activity::{Activity, ActivityDraft};
    use crate::error::StoreError;

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("activities.json"))
    }

    fn run() -> Activity {
        Activity::new(ActivityDraft {
            name: "Run".to_string(),
            date: "2024-01-01".to_string(),
            time: "07:00".to_string(),
            duration: "30".to_string(),
            photo: None,
        })
    }

    /// ファイルが無い場合は空の一覧を返し、空のファイルを作成することを確認する。
    #[test]
    fn test_load_creates_empty_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let activities = store.load().unwrap();

        assert!(activities.is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
    }

    #[test]
    fn test_load_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("activities.json"));

        assert!(store.load().unwrap().is_empty());
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_then_load_single_activity() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_empty());
        let mut activity = run();
        activity.photo = Some(String::new());

        store.save(&[activity.clone()]).unwrap();

        assert_eq!(store.load().unwrap(), vec![activity]);
    }

    #[test]
    fn test_round_trip_keeps_order_and_values() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut second = run();
        second.name = Some("Swim".to_string());
        second.comments = vec!["cold water".to_string(), "50m pool".to_string()];
        second.photo = Some("/home/me/swim.png".to_string());
        let activities = vec![run(), second, run()];

        store.save(&activities).unwrap();

        assert_eq!(store.load().unwrap(), activities);
    }

    #[test]
    fn test_save_uses_four_space_indent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&[run()]).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.starts_with("[\n    {\n        \"id\": "));
    }

    /// IDが無い古い形式のファイルでも、読み込むたびに同じIDになることを確認する。
    #[test]
    fn test_load_assigns_stable_ids_to_legacy_records() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"[{"name": "Run", "date": "2024-01-01", "time": "07:00", "duration": "30", "comments": []},
                {"name": "Swim", "date": "2024-01-02", "time": "08:00", "duration": "45"}]"#,
        )
        .unwrap();

        let first = store.load().unwrap();
        let second = store.load().unwrap();

        assert_eq!(first, second);
        assert_ne!(first[0].id, first[1].id);
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains(&format!("\"id\": \"{}\"", first[0].id)));
        assert!(content.contains(&format!("\"id\": \"{}\"", first[1].id)));
    }

    #[test]
    fn test_load_does_not_rewrite_file_with_ids() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let content = r#"[{"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "name": "Run"}]"#;
        fs::write(store.path(), content).unwrap();

        let activities = store.load().unwrap();

        assert_eq!(activities[0].id.short(), "67e55044");
        assert_eq!(fs::read_to_string(store.path()).unwrap(), content);
    }

    /// 壊れたファイルは空の一覧として扱わず、エラーを返すことを確認する。
    #[rstest]
    #[case::not_json("not json at all")]
    #[case::truncated("[{\"name\": \"Run\"")]
    #[case::wrong_shape("{\"name\": \"Run\"}")]
    fn test_load_malformed_file(#[case] content: &str) {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), content).unwrap();

        let result = store.load();

        assert!(matches!(result, Err(StoreError::Parse { .. })));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), content);
    }
}
