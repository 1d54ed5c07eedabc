use crate::data::{Field, Observation};
use crate::detect::ChangeReport;
use itertools::Itertools;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Markdown body for the notification.
///
/// Only the observation's own timestamp is echoed, so identical inputs always
/// render identically.
pub fn render(current: &Observation, report: &ChangeReport) -> String {
    let mut out = String::new();

    out.push_str("## プロジェクト更新情報\n\n");

    out.push_str("### 現在の状態\n\n");
    let status = Field::ALL
        .iter()
        .map(|field| {
            format!(
                "- {} {}: {}",
                field.emoji(),
                field.label(),
                field.display(current.get(*field))
            )
        })
        .join("\n");
    out.push_str(&status);
    out.push_str("\n\n");

    if report.is_first_run {
        out.push_str("### ベースライン記録\n\n");
        out.push_str("初回チェック - ベースラインデータを記録しました\n\n");
    } else if report.changed {
        out.push_str("### 変更内容\n\n");
        let changes = report
            .changes
            .iter()
            .map(|change| format!("- {}", change.rendered))
            .join("\n");
        out.push_str(&changes);
        out.push_str("\n\n");
    } else {
        out.push_str("### 変更なし\n\n");
        out.push_str("前回のチェックから変更はありません\n\n");
    }

    out.push_str("---\n");
    out.push_str(&format!(
        "**チェック日時:** {} (UTC{})\n",
        current.timestamp.format(TIMESTAMP_FORMAT),
        current.timestamp.offset()
    ));
    out.push_str(&format!("**URL:** {}\n", current.url));
    out.push_str("\n*このIssueは自動生成されました*\n");

    out
}

pub fn issue_title(project_name: &str, current: &Observation) -> String {
    format!(
        "[更新検知] {} - {}",
        current.timestamp.format("%Y/%m/%d"),
        project_name
    )
}
