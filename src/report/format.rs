//! Terminal formatting of pipeline results.

use crate::domain::{
    AxisDiagnostic, FeatureKey, FeatureValue, OffsetUnit, PipelineOutput, Prediction,
};

/// Format the full run summary (prediction + per-series diagnostics + features).
pub fn format_run_summary(output: &PipelineOutput, source: Option<&str>) -> String {
    let mut out = String::new();

    out.push_str("=== pb - price band forecast ===\n");
    if let Some(source) = source {
        out.push_str(&format!("Source: {source}\n"));
    }
    out.push_str(&format_prediction(&output.prediction));

    out.push_str("\nSeries:\n");
    if output.axis_diagnostics.is_empty() {
        out.push_str("  (none)\n");
    }
    for diag in &output.axis_diagnostics {
        out.push_str(&format_axis(diag));
    }

    if let Some(FeatureValue::Text(err)) = output.features.get(&FeatureKey::Error) {
        out.push_str(&format!("\nWarning: {err}\n"));
    }

    out.push_str(&format!("\nFeatures ({}):\n", output.features.len()));
    for (key, value) in output.features.iter() {
        out.push_str(&format!("  {:<32} {}\n", key.to_string(), fmt_value(value)));
    }

    out
}

/// Format the bounds and where they came from.
pub fn format_prediction(prediction: &Prediction) -> String {
    let mut out = format!(
        "Band: lower={:.2} upper={:.2}\n",
        prediction.lower, prediction.upper
    );
    match &prediction.meta.fallback_reason {
        Some(reason) => out.push_str(&format!("Model: fallback heuristic ({reason})\n")),
        None => out.push_str("Model: quantile regressors (q10/q90)\n"),
    }
    if prediction.upper < prediction.lower {
        out.push_str("Note: upper bound is below lower bound\n");
    }
    out
}

fn format_axis(diag: &AxisDiagnostic) -> String {
    let unit = match diag.slope_unit {
        Some(OffsetUnit::Days) => "/day",
        Some(OffsetUnit::Observations) => "/obs",
        None => "",
    };
    let growth = match diag.growth_pct {
        Some(v) if v.is_finite() => format!("{v:.2}%"),
        _ => "-".to_string(),
    };
    format!(
        "  [{}] {:<16} n={:<4} slope={:.4}{} mean={} std={} growth={}\n",
        diag.axis_index,
        diag.name,
        diag.y_values.len(),
        diag.slope,
        unit,
        fmt_opt(diag.mean),
        fmt_opt(diag.std),
        growth,
    )
}

fn fmt_value(value: &FeatureValue) -> String {
    match value {
        FeatureValue::Number(v) => format!("{v:.6}"),
        FeatureValue::Integer(v) => v.to_string(),
        FeatureValue::Text(s) => s.clone(),
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.4}"),
        _ => "-".to_string(),
    }
}
