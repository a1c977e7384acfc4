use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike};

/// 時刻を入力する際の刻み(分)。
const TIME_STEP_MINUTES: u32 = 15;

#[cfg(not(test))]
/// 現在のLocal時間を取得する。
pub fn now() -> DateTime<Local> {
    Local::now()
}


#[cfg(test)]
pub use mock_datetime::now;

/// 今日の日付を`YYYY-MM-DD`形式で返す。
pub fn today() -> String {
    now().format("%Y-%m-%d").to_string()
}

/// 現在時刻を15分単位に切り捨て、`HH:MM`形式で返す。
pub fn current_quarter_hour() -> String {
    let time = now().time();
    let minute = time.minute() - time.minute() % TIME_STEP_MINUTES;
    format!("{:02}:{:02}", time.hour(), minute)
}

/// 日付をパースし、`YYYY-MM-DD`形式に揃えた文字列を返す。
pub fn parse_date(s: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse date: {}", s))?;

    Ok(date.format("%Y-%m-%d").to_string())
}

/// 時刻をパースし、`HH:MM`形式に揃えた文字列を返す。
///
/// 15分単位でない時刻はエラーとする。
pub fn parse_time(s: &str) -> Result<String> {
    let time = NaiveTime::parse_from_str(s, "%H:%M")
        .with_context(|| format!("Failed to parse time: {}", s))?;
    if time.minute() % TIME_STEP_MINUTES != 0 {
        bail!(
            "Time must be in {} minute steps: {}",
            TIME_STEP_MINUTES,
            s
        );
    }

    Ok(time.format("%H:%M").to_string())
}
