//! Walk through one scope: open DB1 and DB2, query both at once, fail on
//! request, and release whatever was opened.

use crate::acquire_strategy;
use crate::database::{Faults, SimulatedDatabase};
use futures::FutureExt;
use rescope_config::Settings;
use rescope_core::Error;
use rescope_scope::{AcquireStrategy, ScopeError, ScopedResourceGroup};
use tracing::info;

pub const DEMO_DATABASES: [&str; 2] = ["DB1", "DB2"];

#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    /// Database whose opener should fail
    pub fail_open: Option<String>,
    pub fail_body: bool,
    pub concurrent: bool,
}

/// Run the demo scope and return the query results
pub async fn run(
    settings: &Settings,
    options: &DemoOptions,
) -> Result<Vec<String>, ScopeError<Error>> {
    let strategy = if options.concurrent {
        AcquireStrategy::Concurrent
    } else {
        acquire_strategy(settings.acquire)
    };

    let mut group = ScopedResourceGroup::new().acquire(strategy);
    if let Some(after) = settings.open_timeout {
        group = group.open_timeout(after);
    }
    for name in DEMO_DATABASES {
        let faults = Faults {
            open: options
                .fail_open
                .as_deref()
                .is_some_and(|target| target.eq_ignore_ascii_case(name)),
            ..Faults::default()
        };
        let db = SimulatedDatabase::new(name, settings.latency).with_faults(faults);
        group.push(db.into_spec(name));
    }

    let fail_body = options.fail_body;
    group
        .run(move |res| {
            async move {
                let (users, orders) = futures::try_join!(
                    res["DB1"].query("SELECT * FROM users"),
                    res["DB2"].query("SELECT * FROM orders"),
                )?;
                if fail_body {
                    return Err(Error::internal("simulated failure after both queries"));
                }
                Ok(vec![users, orders])
            }
            .boxed()
        })
        .await
}

pub async fn execute(settings: &Settings, options: DemoOptions) -> Result<(), ScopeError<Error>> {
    let outcome = run(settings, &options).await;
    info!("scope closed, every opened database was released");
    for row in outcome? {
        println!("{row}");
    }
    Ok(())
}
