use std::io::Write;

use anyhow::{Context, Result};

use crate::activity::Activity;

/// 写真が設定されているactivityの末尾に付ける表示。
const PHOTO_MARKER: &str = "[Photo]";

/// activityを1行の固定幅の文字列に変換する。
///
/// 名前は20桁、日付は10桁、時刻は5桁で左寄せ、所要時間は3桁で右寄せにする。
/// 桁数を超える値は切り詰めない。
pub fn format_activity(activity: &Activity) -> String {
    let line = format!(
        "{:<20} {:<10} {:<5} {:>3} min",
        activity.name.as_deref().unwrap_or_default(),
        activity.date.as_deref().unwrap_or_default(),
        activity.time.as_deref().unwrap_or_default(),
        activity.duration.as_deref().unwrap_or_default(),
    );

    if activity.has_photo() {
        format!("{} {}", line, PHOTO_MARKER)
    } else {
        line
    }
}

/// Consoleにactivityを表示するためのtrait。
pub trait ConsolePresenter {
    /// activityの一覧を表示する。
    ///
    /// # Arguments
    ///
    /// * `activities` - 表示する順に並んだactivity
    fn show_activities(&mut self, activities: &[Activity]) -> Result<()>;

    /// 1件のactivityをコメントを含めて表示する。
    fn show_activity(&mut self, activity: &Activity) -> Result<()>;
}

/// activityを固定幅の行で表示する。
pub struct ConsoleActivityList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleActivityList<'a, W> {
    /// 新しい`ConsoleActivityList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleActivityList<'a, W> {
    // 選択に使えるよう、各行の先頭にIDの先頭8文字を付ける。
    fn show_activities(&mut self, activities: &[Activity]) -> Result<()> {
        for activity in activities {
            writeln!(
                self.writer,
                "{}  {}",
                activity.id.short(),
                format_activity(activity)
            )
            .with_context(|| format!("Failed to write activity: {}", activity.id))?;
        }

        Ok(())
    }

    fn show_activity(&mut self, activity: &Activity) -> Result<()> {
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        let photo = if activity.has_photo() {
            field(&activity.photo)
        } else {
            "-".to_string()
        };

        let mut lines = vec![
            format!("id:       {}", activity.id),
            format!("name:     {}", field(&activity.name)),
            format!("date:     {}", field(&activity.date)),
            format!("time:     {}", field(&activity.time)),
            format!("duration: {} min", field(&activity.duration)),
            format!("photo:    {}", photo),
            "comments:".to_string(),
        ];
        lines.extend(
            activity
                .comments
                .iter()
                .enumerate()
                .map(|(index, comment)| format!("  {}. {}", index, comment)),
        );

        for line in lines {
            writeln!(self.writer, "{}", line)
                .with_context(|| format!("Failed to write activity: {}", activity.id))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{format_activity, ConsoleActivityList, ConsolePresenter};
    use crate::activity::{Activity, ActivityDraft};

    /// テスト用にダミーのActivityを作成する。
    fn dummy_activity(name: &str, duration: &str, photo: Option<&str>) -> Activity {
        Activity::new(ActivityDraft {
            name: name.to_string(),
            date: "2024-01-01".to_string(),
            time: "07:00".to_string(),
            duration: duration.to_string(),
            photo: photo.map(str::to_string),
        })
    }

    #[rstest]
    #[case::plain(
        dummy_activity("Run", "30", None),
        "Run                  2024-01-01 07:00  30 min"
    )]
    #[case::photo(
        dummy_activity("Run", "30", Some("run.jpg")),
        "Run                  2024-01-01 07:00  30 min [Photo]"
    )]
    #[case::long_duration(
        dummy_activity("Hike", "1440", None),
        "Hike                 2024-01-01 07:00 1440 min"
    )]
    #[case::long_name(
        dummy_activity("A very long activity name", "5", None),
        "A very long activity name 2024-01-01 07:00   5 min"
    )]
    fn test_format_activity(#[case] activity: Activity, #[case] expected: &str) {
        assert_eq!(format_activity(&activity), expected);
    }

    #[test]
    fn test_format_activity_with_empty_photo() {
        let mut activity = dummy_activity("Run", "30", None);
        activity.photo = Some(String::new());

        assert!(!format_activity(&activity).ends_with("[Photo]"));
    }

    #[test]
    fn test_format_activity_with_missing_fields() {
        let mut activity = dummy_activity("Run", "30", None);
        activity.date = None;
        activity.duration = None;

        assert_eq!(
            format_activity(&activity),
            "Run                             07:00     min"
        );
    }

    #[rstest]
    #[case::no_activity(vec![])]
    #[case::single(vec![dummy_activity("Run", "30", None)])]
    #[case::double(vec![dummy_activity("Swim", "45", None), dummy_activity("Run", "30", None)])]
    fn test_show_activities(#[case] input: Vec<Activity>) {
        let mut writer = Vec::new();
        let mut presenter = ConsoleActivityList::new(&mut writer);

        presenter.show_activities(&input).unwrap();

        let expected: String = input
            .iter()
            .map(|activity| format!("{}  {}\n", activity.id.short(), format_activity(activity)))
            .collect();
        assert_eq!(String::from_utf8(writer).unwrap(), expected);
    }

    #[test]
    fn test_show_activity_lists_comments() {
        let mut activity = dummy_activity("Run", "30", Some("run.jpg"));
        activity.comments = vec!["felt good".to_string(), "windy".to_string()];
        let mut writer = Vec::new();
        let mut presenter = ConsoleActivityList::new(&mut writer);

        presenter.show_activity(&activity).unwrap();

        let output = String::from_utf8(writer).unwrap();
        assert!(output.contains(&format!("id:       {}\n", activity.id)));
        assert!(output.contains("duration: 30 min\n"));
        assert!(output.contains("photo:    run.jpg\n"));
        assert!(output.ends_with("comments:\n  0. felt good\n  1. windy\n"));
    }
}
