pub(crate) const METRIC_SHUTDOWN_INITIATED: &str = "lifecycle_shutdown_initiated_total";
pub(crate) const METRIC_SHUTDOWN_COMPLETED: &str = "lifecycle_shutdown_completed_total";
pub(crate) const METRIC_ACTION_DURATION: &str = "lifecycle_action_duration_seconds";
pub(crate) const METRIC_ACTION_RESULT: &str = "lifecycle_action_result_total";

pub(crate) fn emit_shutdown_initiated(service_name: &str, trigger_reason: &str) {
    metrics::counter!(
        METRIC_SHUTDOWN_INITIATED,
        "service_name" => service_name.to_string(),
        "trigger_reason" => trigger_reason.to_string()
    )
    .increment(1);
}

pub(crate) fn emit_shutdown_completed(service_name: &str, clean: bool) {
    metrics::counter!(
        METRIC_SHUTDOWN_COMPLETED,
        "service_name" => service_name.to_string(),
        "clean" => clean.to_string()
    )
    .increment(1);
}

pub(crate) fn emit_action_duration(
    service_name: &str,
    action: &str,
    result: &str,
    duration_secs: f64,
) {
    metrics::histogram!(
        METRIC_ACTION_DURATION,
        "service_name" => service_name.to_string(),
        "action" => action.to_string(),
        "result" => result.to_string()
    )
    .record(duration_secs);
}

pub(crate) fn emit_action_result(service_name: &str, action: &str, result: &str) {
    metrics::counter!(
        METRIC_ACTION_RESULT,
        "service_name" => service_name.to_string(),
        "action" => action.to_string(),
        "result" => result.to_string()
    )
    .increment(1);
}
