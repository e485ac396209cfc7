//! # workvisor harness
//!
//! Runs a handful of demo workers under a [`ServiceOrchestrator`], driven
//! either by OS signals or by an interactive console.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use workvisor::{
    BlockingWorkFn, CommandLoop, Config, LogWriter, Observe, RunMode, ServiceBuilder,
    ServiceOrchestrator, SignalHost, WorkContext, WorkError, WorkFn, run_hosted,
};

const UNIT_DURATION: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Runtime {
    /// Async tasks on the shared tokio pool.
    Pooled,
    /// Dedicated OS threads per worker.
    Thread,
}

#[derive(Parser, Debug)]
#[command(name = "workvisor-harness")]
#[command(about = "Run demo workers under the workvisor lifecycle controller")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Execution model for the demo workers
    #[arg(long, value_enum, default_value = "pooled")]
    runtime: Runtime,

    /// Number of workers
    #[arg(short, long, default_value_t = 3)]
    workers: usize,

    /// Threads per worker (thread runtime only)
    #[arg(long, default_value_t = 1)]
    threads_per_worker: usize,

    /// Gate poll interval in milliseconds
    #[arg(long, default_value_t = 100, env = "WORKVISOR_POLL_INTERVAL_MS")]
    poll_interval_ms: u64,

    /// Drain grace in milliseconds (0 = wait indefinitely)
    #[arg(long, default_value_t = 0, env = "WORKVISOR_GRACE_MS")]
    grace_ms: u64,

    /// Drive the service from the console instead of OS signals
    #[arg(short, long)]
    interactive: bool,

    /// Register the service with the host service manager
    #[arg(long)]
    install: bool,

    /// Remove the service registration
    #[arg(long)]
    uninstall: bool,

    /// Arguments passed to every worker on start
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("workvisor=info")),
        )
        .init();

    let cli = Cli::parse();
    let mode = RunMode::from_flags(cli.install, cli.uninstall)
        .and_then(|flag_mode| match flag_mode {
            RunMode::Service => RunMode::from_args(&cli.args),
            other => Ok(other),
        })
        .context("invalid run mode")?;

    match mode {
        RunMode::Install | RunMode::Uninstall => {
            info!(mode = %mode, "registration is handled by the host service manager; nothing to do");
            Ok(())
        }
        RunMode::Service => run_service(cli).await,
    }
}

async fn run_service(cli: Cli) -> anyhow::Result<()> {
    let cfg = Config {
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        grace: Duration::from_millis(cli.grace_ms),
        ..Config::default()
    };
    let ticks: Vec<Arc<AtomicU64>> = (0..cli.workers).map(|_| Arc::new(AtomicU64::new(0))).collect();

    let observers: Vec<Arc<dyn Observe>> = vec![Arc::new(LogWriter::new())];
    let builder = ticks.iter().enumerate().fold(
        ServiceOrchestrator::builder(cfg).with_observers(observers),
        |builder, (i, counter)| add_worker(builder, cli.runtime, cli.threads_per_worker, i, counter),
    );
    let svc = builder.build().context("building service")?;

    let args: Vec<String> = cli
        .args
        .into_iter()
        .filter(|a| !a.eq_ignore_ascii_case("/install") && !a.eq_ignore_ascii_case("/uninstall"))
        .collect();

    if cli.interactive {
        svc.start(&args).await.context("starting workers")?;
        CommandLoop::stdio().run(&svc).await.context("console loop")?;
    } else {
        let mut host = SignalHost::new(args).context("registering signal handlers")?;
        run_hosted(&svc, &mut host).await.context("hosted run")?;
    }

    for (worker, counter) in svc.workers().names().iter().zip(&ticks) {
        info!(worker = %worker, ticks = counter.load(Ordering::Relaxed), "worker finished");
    }
    Ok(())
}

fn add_worker(
    builder: ServiceBuilder,
    runtime: Runtime,
    threads: usize,
    index: usize,
    counter: &Arc<AtomicU64>,
) -> ServiceBuilder {
    let name = format!("worker-{}", index + 1);
    let counter = Arc::clone(counter);
    match runtime {
        Runtime::Pooled => builder.pooled(
            name,
            WorkFn::arc(move |ctx: WorkContext| {
                let counter = Arc::clone(&counter);
                async move {
                    tokio::select! {
                        _ = ctx.cancel_token().cancelled() => return Err(WorkError::Canceled),
                        _ = tokio::time::sleep(UNIT_DURATION) => {}
                    }
                    counter.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                }
            }),
        ),
        Runtime::Thread => builder.thread(
            name,
            BlockingWorkFn::arc(move |_: &WorkContext| {
                std::thread::sleep(UNIT_DURATION);
                counter.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }),
            threads,
        ),
    }
}
