//! # Zombie Reports
//!
//! Rendering of detected zombie Pods for the log and for notifications.
//! Everything here is pure string formatting.

use crate::constants::{
    DEFAULT_SUBJECT_TEMPLATE, REPORT_TIMESTAMP_FORMAT, SECONDS_PER_DAY, SUBJECT_COUNT_PLACEHOLDER,
};
use crate::controller::types::ZombieRecord;
use chrono::{DateTime, Utc};

const RULE_WIDTH: usize = 80;
const LOG_RULE_WIDTH: usize = 51;

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(REPORT_TIMESTAMP_FORMAT).to_string()
}

/// Render a run duration in days
///
/// Below one day two decimals are kept (`0.25 天`), from one day upwards the
/// value is rounded to whole days (`3 天`).
#[allow(clippy::cast_precision_loss, reason = "durations are far below 2^52 seconds")]
pub fn format_days(run_duration_seconds: i64) -> String {
    let days = run_duration_seconds as f64 / SECONDS_PER_DAY;
    if days < 1.0 {
        format!("{days:.2} 天")
    } else {
        format!("{days:.0} 天")
    }
}

/// Humanize a duration as hours, minutes and seconds, omitting leading zero units
pub fn humanize_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds / 60) % 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}小时{minutes}分钟{secs}秒")
    } else if minutes > 0 {
        format!("{minutes}分钟{secs}秒")
    } else {
        format!("{secs}秒")
    }
}

/// Lines written to the log when zombies are detected
///
/// A header, one line per zombie, and a closing rule.
pub fn zombie_report_lines(zombies: &[ZombieRecord]) -> Vec<String> {
    let mut lines = Vec::with_capacity(zombies.len() + 2);
    lines.push(format!(
        "========== 检测到 {} 个僵尸 Pod ==========",
        zombies.len()
    ));
    for (i, zombie) in zombies.iter().enumerate() {
        lines.push(format!(
            "[{}] {}/{} | 运行时长: {} | 状态: {} | 创建时间: {}",
            i + 1,
            zombie.namespace,
            zombie.name,
            format_days(zombie.run_duration_seconds()),
            zombie.status_label,
            format_timestamp(zombie.creation_time),
        ));
    }
    lines.push("=".repeat(LOG_RULE_WIDTH));
    lines
}

/// Render the notification subject
///
/// Every `{count}` in the template is substituted, then a fixed suffix with
/// the same count is appended. An empty template uses the default one.
pub fn render_subject(template: &str, count: usize) -> String {
    let template = if template.is_empty() {
        DEFAULT_SUBJECT_TEMPLATE
    } else {
        template
    };
    let subject = template.replace(SUBJECT_COUNT_PLACEHOLDER, &count.to_string());
    format!("{subject} - 发现 {count} 个僵尸 Pod")
}

/// Render the plain-text notification body
pub fn render_body(zombies: &[ZombieRecord], generated_at: DateTime<Utc>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut body = String::new();

    body.push_str("PodMonitor 检测到以下僵尸 Pod：\n\n");
    body.push_str(&rule);
    body.push_str("\n\n");

    for (i, pod) in zombies.iter().enumerate() {
        body.push_str(&format!("Pod #{}:\n", i + 1));
        body.push_str(&format!("  名称: {}\n", pod.name));
        body.push_str(&format!("  命名空间: {}\n", pod.namespace));
        body.push_str(&format!("  状态: {}\n", pod.status_label));
        body.push_str(&format!(
            "  运行时长: {}\n",
            humanize_duration(pod.run_duration_seconds())
        ));
        body.push_str(&format!(
            "  创建时间: {}\n\n",
            format_timestamp(pod.creation_time)
        ));
    }

    body.push_str(&rule);
    body.push_str("\n\n");
    body.push_str(&format!("总计: {} 个僵尸 Pod\n", zombies.len()));
    body.push_str(&format!(
        "报告时间: {}\n",
        format_timestamp(generated_at)
    ));
    body.push('\n');
    body.push_str("请及时处理这些 Pod，避免资源浪费。\n");

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }

    fn zombie(name: &str, run_secs: i64) -> ZombieRecord {
        // 2023-11-14 22:13:20 UTC
        let now = at(1_700_000_000);
        ZombieRecord {
            name: name.to_string(),
            namespace: "batch".to_string(),
            run_duration: TimeDelta::seconds(run_secs),
            creation_time: now - TimeDelta::seconds(run_secs),
            status_label: "Running".to_string(),
        }
    }

    #[test]
    fn test_subject_substitutes_placeholder_and_appends_count() {
        assert_eq!(render_subject("Alert-{count}", 3), "Alert-3 - 发现 3 个僵尸 Pod");
    }

    #[test]
    fn test_subject_replaces_every_placeholder() {
        assert_eq!(
            render_subject("{count}/{count}", 2),
            "2/2 - 发现 2 个僵尸 Pod"
        );
    }

    #[test]
    fn test_subject_without_placeholder_keeps_template() {
        assert_eq!(render_subject("Zombies", 1), "Zombies - 发现 1 个僵尸 Pod");
    }

    #[test]
    fn test_empty_subject_uses_default_template() {
        assert_eq!(
            render_subject("", 5),
            "PodMonitor 僵尸 Pod 告警 - 发现 5 个僵尸 Pod"
        );
    }

    #[test]
    fn test_humanize_duration_omits_leading_zero_units() {
        assert_eq!(humanize_duration(7200), "2小时0分钟0秒");
        assert_eq!(humanize_duration(3725), "1小时2分钟5秒");
        assert_eq!(humanize_duration(125), "2分钟5秒");
        assert_eq!(humanize_duration(42), "42秒");
        assert_eq!(humanize_duration(0), "0秒");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(21_600), "0.25 天");
        assert_eq!(format_days(7200), "0.08 天");
        assert_eq!(format_days(86_400), "1 天");
        assert_eq!(format_days(86_400 * 3), "3 天");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(at(1_700_000_000)), "2023-11-14 22:13:20");
    }

    #[test]
    fn test_report_lines_enumerate_each_zombie() {
        let zombies = vec![zombie("a", 7200), zombie("b", 86_400 * 2)];
        let lines = zombie_report_lines(&zombies);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("检测到 2 个僵尸 Pod"));
        assert_eq!(
            lines[1],
            "[1] batch/a | 运行时长: 0.08 天 | 状态: Running | 创建时间: 2023-11-14 20:13:20"
        );
        assert!(lines[2].starts_with("[2] batch/b | 运行时长: 2 天"));
        assert!(lines[3].chars().all(|c| c == '='));
        assert_eq!(lines[3].len(), LOG_RULE_WIDTH);
    }

    #[test]
    fn test_body_layout() {
        let zombies = vec![zombie("stuck-job", 3725)];
        let body = render_body(&zombies, at(1_700_000_000));

        assert!(body.starts_with("PodMonitor 检测到以下僵尸 Pod：\n\n"));
        assert!(body.contains("Pod #1:\n"));
        assert!(body.contains("  名称: stuck-job\n"));
        assert!(body.contains("  命名空间: batch\n"));
        assert!(body.contains("  状态: Running\n"));
        assert!(body.contains("  运行时长: 1小时2分钟5秒\n"));
        assert!(body.contains("  创建时间: 2023-11-14 21:11:15\n"));
        assert!(body.contains("总计: 1 个僵尸 Pod\n"));
        assert!(body.contains("报告时间: 2023-11-14 22:13:20\n"));
        assert!(body.ends_with("请及时处理这些 Pod，避免资源浪费。\n"));
        assert_eq!(body.matches(&"=".repeat(80)).count(), 2);
    }
}
