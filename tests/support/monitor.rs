use std::sync::Arc;
use std::time::Duration;

use tradewatch::application::{DedupStore, Dispatcher, Monitor, MonitorSettings};
use tradewatch::port::{DisabledSink, NotificationSink};
use tradewatch::testkit::sink::RecordingSink;
use tradewatch::testkit::source::ScriptedSource;

/// Monitor settings with short, round numbers for paused-time tests.
pub fn settings() -> MonitorSettings {
    MonitorSettings {
        interval: Duration::from_secs(5),
        max_attempts: 3,
        max_concurrent_pages: 4,
        flush_interval: Duration::from_secs(60),
    }
}

/// A monitor over scripted collaborators with a memory-only dedup store.
pub struct Rig {
    pub monitor: Monitor,
    pub source: Arc<ScriptedSource>,
    pub sink: Arc<RecordingSink>,
}

impl Rig {
    pub fn new(source: ScriptedSource, sink: RecordingSink) -> Self {
        Self::with_settings(source, sink, settings())
    }

    pub fn with_settings(source: ScriptedSource, sink: RecordingSink, settings: MonitorSettings) -> Self {
        let source = Arc::new(source);
        let sink = Arc::new(sink);
        let dedup = Arc::new(DedupStore::new(Some(Duration::from_secs(3600)), 1000));
        let monitor = Monitor::new(
            source.clone(),
            Dispatcher::new(sink.clone() as Arc<dyn NotificationSink>),
            dedup,
            settings,
        );
        Self {
            monitor,
            source,
            sink,
        }
    }
}

/// A monitor whose sink is not configured.
pub fn unconfigured_monitor(source: ScriptedSource) -> (Monitor, Arc<ScriptedSource>) {
    let source = Arc::new(source);
    let monitor = Monitor::new(
        source.clone(),
        Dispatcher::new(Arc::new(DisabledSink)),
        Arc::new(DedupStore::new(None, 1000)),
        settings(),
    );
    (monitor, source)
}
