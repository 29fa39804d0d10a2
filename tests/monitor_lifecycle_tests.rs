mod support;

use std::sync::Arc;
use std::time::Duration;

use support::monitor::{settings, Rig};
use tradewatch::adapter::outbound::file::FileDeliveredLog;
use tradewatch::application::{DedupStore, Dispatcher, Monitor, CONSECUTIVE_FAILURE_WARN_THRESHOLD};
use tradewatch::error::SinkError;
use tradewatch::port::{ControlAction, MonitorControl};
use tradewatch::testkit::sink::RecordingSink;
use tradewatch::testkit::source::ScriptedSource;
use tradewatch::testkit::trade::{open_trades, trade};

#[tokio::test(start_paused = true)]
async fn start_runs_one_scan_immediately() {
    let rig = Rig::new(
        ScriptedSource::new(1).with_page(1, open_trades("t", 1)),
        RecordingSink::accepting(),
    );

    rig.monitor.start().await;

    assert!(rig.monitor.is_running());
    assert_eq!(rig.monitor.stats().total_scans, 1);
    assert_eq!(rig.sink.attempts(), 1);
    rig.monitor.stop().await;
}

#[tokio::test(start_paused = true)]
async fn loop_scans_every_interval() {
    let rig = Rig::new(ScriptedSource::new(1), RecordingSink::accepting());

    rig.monitor.start().await;
    tokio::time::sleep(Duration::from_secs(11)).await;
    rig.monitor.stop().await;

    // t=0 on start, then t=5 and t=10.
    assert_eq!(rig.monitor.stats().total_scans, 3);
}

#[tokio::test(start_paused = true)]
async fn start_twice_is_a_no_op() {
    let rig = Rig::new(ScriptedSource::new(1), RecordingSink::accepting());

    rig.monitor.start().await;
    rig.monitor.start().await;

    assert_eq!(rig.monitor.stats().total_scans, 1);
    rig.monitor.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_while_stopped_is_a_no_op() {
    let rig = Rig::new(ScriptedSource::new(1), RecordingSink::accepting());

    rig.monitor.stop().await;
    assert!(!rig.monitor.is_running());

    rig.monitor.start().await;
    rig.monitor.stop().await;
    rig.monitor.stop().await;
    assert!(!rig.monitor.is_running());
}

#[tokio::test(start_paused = true)]
async fn no_scans_after_stop() {
    let rig = Rig::new(ScriptedSource::new(1), RecordingSink::accepting());

    rig.monitor.start().await;
    rig.monitor.stop().await;
    let scans = rig.monitor.stats().total_scans;
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(rig.monitor.stats().total_scans, scans);
}

#[tokio::test(start_paused = true)]
async fn restart_keeps_counters_and_dedup() {
    let rig = Rig::new(
        ScriptedSource::new(1).with_page(1, vec![trade("T1", "OPEN")]),
        RecordingSink::accepting(),
    );

    rig.monitor.start().await;
    MonitorControl::restart(&rig.monitor).await;

    assert!(rig.monitor.is_running());
    assert_eq!(rig.monitor.stats().total_scans, 2);
    assert_eq!(rig.sink.attempts(), 1);
    rig.monitor.stop().await;
}

#[tokio::test(start_paused = true)]
async fn consecutive_failures_are_counted_without_stopping() {
    let rig = Rig::new(ScriptedSource::new(1), RecordingSink::accepting());
    rig.source.set_unavailable(true);

    rig.monitor.start().await;
    tokio::time::sleep(Duration::from_secs(21)).await;

    let stats = rig.monitor.stats();
    assert_eq!(stats.consecutive_failed_scans, CONSECUTIVE_FAILURE_WARN_THRESHOLD);
    assert_eq!(stats.errors, 5);
    assert!(stats.is_running);

    rig.source.set_unavailable(false);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(rig.monitor.stats().consecutive_failed_scans, 0);
    rig.monitor.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stats_reflect_lifecycle() {
    let rig = Rig::new(ScriptedSource::new(1), RecordingSink::accepting());
    assert_eq!(rig.monitor.stats().start_time, None);

    rig.monitor.start().await;
    let running = rig.monitor.stats();
    assert!(running.is_running);
    assert!(running.start_time.is_some());

    rig.monitor.stop().await;
    assert!(!rig.monitor.stats().is_running);
}

#[test]
fn control_actions_parse_from_url_segments() {
    assert_eq!(ControlAction::parse("restart"), Some(ControlAction::Restart));
    assert_eq!(ControlAction::Stop.acknowledgement(), "monitor stopped");
}

#[tokio::test]
async fn stop_flushes_durable_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("delivered.json");
    let dedup = DedupStore::open(None, 100, Box::new(FileDeliveredLog::new(&path))).unwrap();

    let monitor = Monitor::new(
        Arc::new(ScriptedSource::new(1).with_page(1, vec![trade("T1", "OPEN")])),
        Dispatcher::new(Arc::new(RecordingSink::accepting())),
        Arc::new(dedup),
        settings(),
    );

    monitor.start().await;
    monitor.stop().await;

    let reopened = DedupStore::open(None, 100, Box::new(FileDeliveredLog::new(&path))).unwrap();
    assert_eq!(reopened.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_after_interrupted_start_flushes_deliveries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("delivered.json");
    let dedup = DedupStore::open(None, 100, Box::new(FileDeliveredLog::new(&path))).unwrap();
    let rejected = || Err(SinkError::Rejected { status: 500 });
    let sink = RecordingSink::scripted(vec![Ok(200), rejected(), rejected(), rejected()]);

    let monitor = Monitor::new(
        Arc::new(ScriptedSource::new(1).with_page(1, vec![trade("T1", "OPEN"), trade("T2", "OPEN")])),
        Dispatcher::new(Arc::new(sink)),
        Arc::new(dedup),
        settings(),
    );

    // T2 is still backing off when the first scan is dropped.
    tokio::select! {
        () = monitor.start() => panic!("first scan should still be retrying T2"),
        () = tokio::time::sleep(Duration::from_secs(1)) => {}
    }
    monitor.stop().await;

    assert!(!monitor.is_running());
    let reopened = DedupStore::open(None, 100, Box::new(FileDeliveredLog::new(&path))).unwrap();
    assert_eq!(reopened.len(), 1);
    assert!(reopened.is_delivered(&trade("T1", "OPEN").id, None));
}

#[tokio::test(start_paused = true)]
async fn restart_with_concurrent_start_leaves_one_running_loop() {
    let rig = Rig::new(ScriptedSource::new(1), RecordingSink::accepting());
    rig.monitor.start().await;

    tokio::join!(rig.monitor.restart(), rig.monitor.start());

    assert!(rig.monitor.is_running());
    assert_eq!(rig.monitor.stats().total_scans, 2);

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(rig.monitor.stats().total_scans, 3);
    rig.monitor.stop().await;
}
