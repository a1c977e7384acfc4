use crate::session::Selector;

/// activityを1件選択するための引数。
#[derive(Debug, clap::Args)]
pub struct SelectorArgs {
    #[clap(
        help = "Id of the activity (full id or at least 4 leading characters)",
        required_unless_present = "line"
    )]
    id: Option<String>,

    #[clap(
        long = "line",
        help = "Select by the line shown in `list` instead of the id; the first match wins",
        conflicts_with = "id"
    )]
    line: Option<String>,
}

impl SelectorArgs {
    pub fn selector(&self) -> Selector {
        match (&self.id, &self.line) {
            (_, Some(line)) => Selector::Line(line.clone()),
            (Some(id), None) => Selector::Id(id.clone()),
            (None, None) => Selector::Id(String::new()),
        }
    }
}

#[cfg(test)]
impl SelectorArgs {
    pub fn id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            line: None,
        }
    }

    pub fn line(line: &str) -> Self {
        Self {
            id: None,
            line: Some(line.to_string()),
        }
    }
}
