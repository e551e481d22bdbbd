//! Statistics command handlers.

use tabled::Tabled;

use cookiefy_core::{Console, Id, Stats};

use crate::cli::{GlobalOpts, StatsArgs, StatsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn metric_rows(stats: &Stats) -> Vec<MetricRow> {
    stats
        .0
        .iter()
        .map(|(key, value)| MetricRow {
            metric: key.clone(),
            value: match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => "-".into(),
                other => other.to_string(),
            },
        })
        .collect()
}

fn render_stats(stats: &Stats) -> String {
    if stats.0.is_empty() {
        return "No statistics".into();
    }
    output::render_table(&metric_rows(stats))
}

pub async fn handle(console: &Console, args: StatsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let stats = match args.command {
        StatsCommand::Overview => console.stats_overview().await?,
        StatsCommand::Restaurant { id } => console.restaurant_stats(&Id::from(id.as_str())).await?,
    };

    let out = output::render_single(&global.output, &stats, render_stats, |s| {
        metric_rows(s)
            .into_iter()
            .map(|r| format!("{}\t{}", r.metric, r.value))
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn metrics_render_sorted_with_plain_strings() {
        let stats: Stats = serde_json::from_value(serde_json::json!({
            "users": 120,
            "active_sites": 45,
            "top_city": "Madrid"
        }))
        .unwrap();
        let rows = metric_rows(&stats);
        assert_eq!(rows[0].metric, "active_sites");
        assert_eq!(rows[2].value, "Madrid");
    }
}
