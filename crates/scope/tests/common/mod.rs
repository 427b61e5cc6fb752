#![allow(dead_code)]

use rescope_core::Error;
use rescope_scope::ResourceSpec;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared, ordered record of every opener/body/closer call
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == event).count()
    }
}

/// A spec whose opener and closer both succeed; the handle is the name
pub fn tracked(log: &CallLog, name: &str) -> ResourceSpec<String, Error> {
    let open_log = log.clone();
    let close_log = log.clone();
    let name = name.to_string();
    ResourceSpec::new(
        name.clone(),
        move || async move {
            open_log.record(format!("open {name}"));
            Ok(name)
        },
        move |handle: String| async move {
            close_log.record(format!("close {handle}"));
            Ok(())
        },
    )
}

/// Like [`tracked`], but the opener sleeps first
pub fn slow(log: &CallLog, name: &str, delay: Duration) -> ResourceSpec<String, Error> {
    let open_log = log.clone();
    let close_log = log.clone();
    let name = name.to_string();
    ResourceSpec::new(
        name.clone(),
        move || async move {
            tokio::time::sleep(delay).await;
            open_log.record(format!("open {name}"));
            Ok(name)
        },
        move |handle: String| async move {
            close_log.record(format!("close {handle}"));
            Ok(())
        },
    )
}

/// A spec whose opener fails with a connection error
pub fn failing_open(log: &CallLog, name: &str, message: &str) -> ResourceSpec<String, Error> {
    let open_log = log.clone();
    let close_log = log.clone();
    let name = name.to_string();
    let message = message.to_string();
    ResourceSpec::new(
        name.clone(),
        move || async move {
            open_log.record(format!("open {name} (fails)"));
            Err(Error::connection(name, message))
        },
        move |handle: String| async move {
            close_log.record(format!("close {handle}"));
            Ok(())
        },
    )
}

/// A spec whose closer fails after recording the call
pub fn failing_close(log: &CallLog, name: &str, message: &str) -> ResourceSpec<String, Error> {
    let open_log = log.clone();
    let close_log = log.clone();
    let name = name.to_string();
    let message = message.to_string();
    ResourceSpec::new(
        name.clone(),
        move || async move {
            open_log.record(format!("open {name}"));
            Ok(name)
        },
        move |handle: String| async move {
            close_log.record(format!("close {handle}"));
            Err(Error::connection(handle, message))
        },
    )
}

/// A spec whose closer sleeps for `delay` before recording the close
pub fn slow_close(log: &CallLog, name: &str, delay: Duration) -> ResourceSpec<String, Error> {
    let open_log = log.clone();
    let close_log = log.clone();
    let name = name.to_string();
    ResourceSpec::new(
        name.clone(),
        move || async move {
            open_log.record(format!("open {name}"));
            Ok(name)
        },
        move |handle: String| async move {
            tokio::time::sleep(delay).await;
            close_log.record(format!("close {handle}"));
            Ok(())
        },
    )
}

/// A spec whose closer records the call and then panics
pub fn panicking_close(log: &CallLog, name: &str) -> ResourceSpec<String, Error> {
    let open_log = log.clone();
    let close_log = log.clone();
    let name = name.to_string();
    ResourceSpec::new(
        name.clone(),
        move || async move {
            open_log.record(format!("open {name}"));
            Ok(name)
        },
        move |handle: String| async move {
            close_log.record(format!("close {handle}"));
            if true {
                panic!("closer for {handle} exploded");
            }
            Ok(())
        },
    )
}

pub fn events(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
