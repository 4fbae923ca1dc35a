//! The process-wide default container

use std::sync::Arc;

use elif_ioc::global;
use serial_test::serial;

struct Clock {
    offset: i64,
}

#[derive(Clone)]
struct RequestId(u64);

#[test]
#[serial]
fn test_global_singleton() {
    if !global::container().contains::<Arc<Clock>>() {
        global::bind_singleton(|| Arc::new(Clock { offset: 5 })).unwrap();
    }

    let first = global::resolve::<Arc<Clock>>().unwrap();
    let second = global::resolve::<Arc<Clock>>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.offset, 5);

    assert!(global::bind_singleton(|| Arc::new(Clock { offset: 0 }))
        .unwrap_err()
        .is_duplicate());
}

#[test]
#[serial]
fn test_global_transient() {
    if !global::container().contains::<RequestId>() {
        global::bind_transient(|| RequestId(42)).unwrap();
    }

    assert_eq!(global::resolve::<RequestId>().unwrap().0, 42);
    assert!(global::resolve::<String>().unwrap_err().is_unbound());
}
