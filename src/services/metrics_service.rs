use std::collections::HashMap;
use statsd::Client;
use std::sync::Arc;

use crate::config::StatsdConfig;

/// Statsd counters and timers. Without a configured sink every call is a no-op.
#[derive(Clone)]
pub struct MetricsService {
    client: Option<Arc<Client>>,
}

impl MetricsService {
    pub fn new(config: Option<&StatsdConfig>) -> Self {
        let client = config.and_then(|c| {
            match Client::new(format!("{}:{}", c.host, c.port), &c.prefix) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    tracing::warn!(error = ?e, "statsd disabled");
                    None
                }
            }
        });
        Self { client }
    }

    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn increment(&self, metric: &str, tags: Option<HashMap<String, String>>) {
        if let Some(client) = &self.client {
            client.incr(&tagged(metric, tags));
        }
    }

    pub fn timing(&self, metric: &str, duration: std::time::Duration, tags: Option<HashMap<String, String>>) {
        if let Some(client) = &self.client {
            client.timer(&tagged(metric, tags), duration.as_millis() as f64);
        }
    }
}

fn tagged(metric: &str, tags: Option<HashMap<String, String>>) -> String {
    match tags {
        Some(tags) if !tags.is_empty() => {
            let mut pairs: Vec<String> = tags.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            pairs.sort();
            format!("{}#{}", metric, pairs.join(","))
        }
        _ => metric.to_string(),
    }
}
