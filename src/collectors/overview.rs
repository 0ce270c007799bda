use crate::derive::{liveness_code, partition_code, percentage};
use crate::metric::{MetricRecord, MetricValue, RecordStamp, OVERVIEW_PREFIX};
use crate::snapshot::{AliveSnapshot, NodeSnapshot, OverviewSnapshot};

/// Broker-wide metric set, in push order. Inputs may be zeroed defaults.
pub fn overview_records(
    stamp: &RecordStamp,
    ov: &OverviewSnapshot,
    node: &NodeSnapshot,
    alive: &AliveSnapshot,
) -> Vec<MetricRecord> {
    let totals = &ov.object_totals;
    let queued = &ov.queue_totals;
    let stats = &ov.message_stats;

    let values: [(&str, MetricValue); 25] = [
        ("queuesTotal", totals.queues.into()),
        ("channelsTotal", totals.channels.into()),
        ("connectionsTotal", totals.connections.into()),
        ("consumersTotal", totals.consumers.into()),
        ("exchangesTotal", totals.exchanges.into()),
        ("msgsTotal", queued.messages.into()),
        ("msgsReadyTotal", queued.messages_ready.into()),
        ("msgsUnackTotal", queued.messages_unacknowledged.into()),
        ("deliverTotal", stats.deliver_get.into()),
        ("publishTotal", stats.publish.into()),
        ("redeliverTotal", stats.redeliver.into()),
        ("statsDbEvent", ov.stats_db_events.into()),
        ("deliverRate", stats.deliver_get_details.rate.into()),
        ("publishRate", stats.publish_details.rate.into()),
        ("redeliverRate", stats.redeliver_details.rate.into()),
        ("ackRate", stats.ack_details.rate.into()),
        ("fdUsedPct", percentage(node.fd_used, node.fd_total).into()),
        ("memUsedPct", percentage(node.mem_used, node.mem_limit).into()),
        (
            "socketUsedPct",
            percentage(node.sockets_used, node.sockets_total).into(),
        ),
        (
            "erlProcsUsedPct",
            percentage(node.proc_used, node.proc_total).into(),
        ),
        (
            "dpRatio",
            percentage(stats.deliver_details.whole(), stats.publish_details.whole()).into(),
        ),
        ("runQueue", node.run_queue.into()),
        ("isAlive", liveness_code(&alive.status).into()),
        ("isPartition", partition_code(&node.partitions).into()),
        ("isUp", 1_i64.into()),
    ];

    values
        .into_iter()
        .map(|(suffix, value)| stamp.gauge(format!("{OVERVIEW_PREFIX}{suffix}"), value, ""))
        .collect()
}

/// The lone `isUp=0` record sent when the broker fails its liveness probe.
pub fn down_record(stamp: &RecordStamp) -> MetricRecord {
    stamp.gauge(format!("{OVERVIEW_PREFIX}isUp"), 0_i64, "")
}
