//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Lifecycle** (`info`): node start/shutdown, actor start/shutdown, worker start/shutdown
//! - **Sends** (`debug`): destination, requestor, payload size
//! - **Suspensions** (`debug`/`trace`): continuation handles as they are issued and resumed
//! - **Intake outcomes** (`trace` only): delivered, dead-lettered, or dropped with a reason
//! - **Faults** (`error`): crypto engine faults, double resumes, dispatch to dead actors
//!
//! Dropped packets are deliberately invisible above `trace`.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=debug cargo run
//! RUST_LOG=secure_relay=trace,actor_framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` the demo shows roughly:
//!
//! ```text
//! INFO Node started node="node-a" signer=8a88e3dd7409f195 local_addr=None
//! INFO Node started node="node-b" signer=d75a980182b10ab7 local_addr=None
//! DEBUG Send destination=actor-7 requestor=pinger len=28
//! DEBUG Request service=crypto-worker-node-a handle=k#1 requestor=pinger request=Sign { .. }
//! DEBUG Request service=crypto-worker-node-b handle=k#1 requestor=intake-node-b request=Verify { .. }
//! INFO Received from=actor-7 text="ping"
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
