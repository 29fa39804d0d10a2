use std::time::Duration;

use tradewatch::adapter::outbound::file::FileDeliveredLog;
use tradewatch::adapter::outbound::sqlite::SqliteDeliveredLog;
use tradewatch::application::DedupStore;
use tradewatch::port::DeliveredLog;
use tradewatch::testkit::trade::trade;

fn file_log(dir: &tempfile::TempDir) -> Box<dyn DeliveredLog> {
    Box::new(FileDeliveredLog::new(dir.path().join("delivered.json")))
}

fn sqlite_log(dir: &tempfile::TempDir) -> Box<dyn DeliveredLog> {
    let path = dir.path().join("delivered.db");
    Box::new(SqliteDeliveredLog::open(&path.to_string_lossy()).unwrap())
}

fn assert_survives_reopen(open: fn(&tempfile::TempDir) -> Box<dyn DeliveredLog>) {
    let dir = tempfile::tempdir().unwrap();
    let t1 = trade("T1", "OPEN");
    let t2 = trade("T2", "PENDING");

    {
        let store = DedupStore::open(Some(Duration::from_secs(3600)), 100, open(&dir)).unwrap();
        store.mark_delivered(&t1);
        store.mark_delivered(&t2);
        assert!(store.flush().unwrap());
    }

    let reopened = DedupStore::open(Some(Duration::from_secs(3600)), 100, open(&dir)).unwrap();
    assert_eq!(reopened.len(), 2);
    assert!(reopened.is_delivered(&t1.id, Some(&t1.fingerprint())));
    assert!(reopened.is_delivered(&t2.id, Some(&t2.fingerprint())));

    let mut moved = t1.clone();
    moved.status = "PROCESSING".into();
    assert!(!reopened.is_delivered(&moved.id, Some(&moved.fingerprint())));
}

#[test]
fn file_backend_survives_reopen() {
    assert_survives_reopen(file_log);
}

#[test]
fn sqlite_backend_survives_reopen() {
    assert_survives_reopen(sqlite_log);
}

#[test]
fn reopen_honours_smaller_capacity() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = DedupStore::open(None, 100, sqlite_log(&dir)).unwrap();
        for i in 0..5 {
            store.mark_delivered(&trade(&format!("T{i}"), "OPEN"));
            std::thread::sleep(Duration::from_millis(2));
        }
        store.flush().unwrap();
    }

    let reopened = DedupStore::open(None, 3, sqlite_log(&dir)).unwrap();

    assert_eq!(reopened.len(), 3);
    assert!(!reopened.is_delivered(&trade("T0", "OPEN").id, None));
    assert!(reopened.is_delivered(&trade("T4", "OPEN").id, None));
}

#[test]
fn memory_store_flush_is_noop() {
    let store = DedupStore::new(None, 10);
    store.mark_delivered(&trade("T1", "OPEN"));
    assert!(!store.flush().unwrap());
}
