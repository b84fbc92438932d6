//! Livecheck - Main Entry Point
//!
//! Wires the engine together: loads the plan, binds the console listeners,
//! hooks Ctrl-C to the stop handle and drives the run to completion.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use livecheck_application::ports::OutputSink;
use livecheck_application::{EventDispatcher, Listener, Runner, bind_listeners, stop_channel};
use livecheck_infrastructure::{
    ConsoleSink, ProgressListener, ReqwestProbeClient, SummaryListener, SystemClock, load_plan,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(all_passed) => {
            if all_passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("livecheck: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let plan_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "livecheck.yml".to_string());
    let plan = load_plan(&plan_path).await?;

    let client = Arc::new(ReqwestProbeClient::new()?);
    let sink: Arc<dyn OutputSink> = Arc::new(ConsoleSink::new());

    let mut dispatcher = EventDispatcher::new();
    let listeners: Vec<Box<dyn Listener>> = vec![
        Box::new(ProgressListener::new()),
        Box::new(SummaryListener::with_output(Arc::clone(&sink))),
    ];
    bind_listeners(&mut dispatcher, listeners)?;

    let (stop_handle, stop_token) = stop_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("stop requested, finishing current probe");
            stop_handle.stop();
        }
    });

    let mut runner = Runner::new(
        plan.tests,
        client,
        dispatcher,
        Arc::new(SystemClock::new()),
        plan.run,
        stop_token,
    );
    let summary = runner.run().await?;

    Ok(summary.all_passed())
}
