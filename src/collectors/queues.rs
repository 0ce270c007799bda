use crate::derive::{percentage, queue_health_code};
use crate::metric::{MetricRecord, MetricValue, RecordStamp, QUEUE_PREFIX};
use crate::snapshot::QueueSnapshot;

/// Number of records emitted per queue.
pub const RECORDS_PER_QUEUE: usize = 12;

/// One contiguous block of records per queue, in input order.
pub fn queue_records(
    stamp: &RecordStamp,
    queues: &[QueueSnapshot],
    healthy_states: &[String],
) -> Vec<MetricRecord> {
    let mut records = Vec::with_capacity(queues.len() * RECORDS_PER_QUEUE);
    for q in queues {
        let tags = q.tags();
        let stats = &q.message_stats;

        let values: [(&str, MetricValue); RECORDS_PER_QUEUE] = [
            ("messages", q.messages.into()),
            ("messages_ready", q.messages_ready.into()),
            ("messages_unacked", q.messages_unacknowledged.into()),
            ("deliver_get", stats.deliver_get_details.rate.into()),
            ("publish", stats.publish_details.rate.into()),
            ("redeliver", stats.redeliver_details.rate.into()),
            ("ack", stats.ack_details.rate.into()),
            ("memory", q.memory.into()),
            ("consumers", q.consumers.into()),
            ("consumer_utilisation", (q.consumer_utilisation * 100.0).into()),
            ("status", queue_health_code(&q.status, healthy_states).into()),
            (
                "dpratio",
                percentage(
                    stats.deliver_get_details.whole(),
                    stats.publish_details.whole(),
                )
                .into(),
            ),
        ];

        records.extend(values.into_iter().map(|(suffix, value)| {
            stamp.gauge(format!("{QUEUE_PREFIX}{suffix}"), value, tags.as_str())
        }));
    }
    records
}
