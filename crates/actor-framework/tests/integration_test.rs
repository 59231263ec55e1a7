use actor_framework::mock::MockService;
use actor_framework::{spawn, Actor, Context, FrameworkError, Service, ServiceWorker};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

// --- Test Service ---

/// Tags every request with a running sequence number so the tests can see the
/// order in which the single worker processed them.
struct Stamper {
    seq: u64,
}

impl Service for Stamper {
    type Request = String;
    type Response = (String, u64);

    fn call(&mut self, request: String) -> (String, u64) {
        self.seq += 1;
        (request, self.seq)
    }
}

// --- Test Actor ---

#[derive(Debug)]
enum WorkerMsg {
    Issue(String),
    Ping,
}

struct Requestor {
    name: String,
    client: actor_framework::ServiceClient<Stamper>,
    resumed: mpsc::UnboundedSender<(String, String)>,
    pings: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl Actor for Requestor {
    type Message = WorkerMsg;

    async fn handle(&mut self, msg: WorkerMsg, ctx: &mut Context<Self>) {
        match msg {
            WorkerMsg::Issue(request) => {
                let Some(myself) = ctx.myself() else { return };
                self.client
                    .suspend(&myself, request, |me: &mut Requestor, _ctx, (echo, _seq)| {
                        let _ = me.resumed.send((me.name.clone(), echo));
                    })
                    .unwrap();
            }
            WorkerMsg::Ping => {
                let _ = self.pings.send(self.name.clone());
            }
        }
    }
}

/// N actors suspend concurrently against one worker; each resumption fires exactly
/// once and carries that actor's own request back.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_exactly_once_delivery_without_cross_talk() {
    const N: usize = 100;
    let (client, worker) = ServiceWorker::spawn("stamper", Stamper { seq: 0 }).unwrap();
    let (resumed_tx, mut resumed_rx) = mpsc::unbounded_channel();
    let (pings_tx, _pings_rx) = mpsc::unbounded_channel();

    let mut actors = Vec::new();
    for i in 0..N {
        let name = format!("actor-{i}");
        let (actor, join) = spawn(
            name.clone(),
            Requestor {
                name: name.clone(),
                client: client.clone(),
                resumed: resumed_tx.clone(),
                pings: pings_tx.clone(),
            },
        );
        actors.push((actor, join));
    }
    drop(resumed_tx);

    for (i, (actor, _)) in actors.iter().enumerate() {
        actor.tell(WorkerMsg::Issue(format!("request-from-actor-{i}"))).unwrap();
    }

    let mut deliveries: HashMap<String, Vec<String>> = HashMap::new();
    for _ in 0..N {
        let (name, echo) = tokio::time::timeout(Duration::from_secs(5), resumed_rx.recv())
            .await
            .expect("resumption timed out")
            .expect("channel closed");
        deliveries.entry(name).or_default().push(echo);
    }

    assert_eq!(deliveries.len(), N);
    for (name, echoes) in &deliveries {
        assert_eq!(echoes.len(), 1, "{name} resumed {} times", echoes.len());
        assert_eq!(echoes[0], format!("request-from-{name}"));
    }
    assert_eq!(client.registry().pending(), 0);

    // No late duplicates.
    for (actor, join) in actors {
        drop(actor);
        join.await.unwrap();
    }
    drop(client);
    worker.shutdown_async().await.unwrap();
    assert!(resumed_rx.recv().await.is_none());
}

/// A resumption is just another mailbox item: messages sent after the resume are
/// processed after it, never concurrently.
#[tokio::test]
async fn test_resumption_interleaves_with_messages_in_order() {
    let (client, worker) = ServiceWorker::spawn("stamper", Stamper { seq: 0 }).unwrap();
    let (resumed_tx, mut resumed_rx) = mpsc::unbounded_channel();
    let (pings_tx, mut pings_rx) = mpsc::unbounded_channel();
    let (actor, join) = spawn(
        "solo",
        Requestor {
            name: "solo".into(),
            client: client.clone(),
            resumed: resumed_tx,
            pings: pings_tx,
        },
    );

    actor.tell(WorkerMsg::Issue("a".into())).unwrap();
    let (_, echo) = resumed_rx.recv().await.unwrap();
    assert_eq!(echo, "a");
    actor.tell(WorkerMsg::Ping).unwrap();
    assert_eq!(pings_rx.recv().await.unwrap(), "solo");

    drop(actor);
    join.await.unwrap();
    drop(client);
    worker.shutdown_async().await.unwrap();
}

/// Manually driving the registry the way a misbehaving service would.
#[tokio::test]
async fn test_second_resume_from_service_is_rejected() {
    let (client, worker) = ServiceWorker::spawn("stamper", Stamper { seq: 0 }).unwrap();
    let (resumed_tx, mut resumed_rx) = mpsc::unbounded_channel();
    let (pings_tx, _) = mpsc::unbounded_channel();
    let (actor, join) = spawn(
        "victim",
        Requestor {
            name: "victim".into(),
            client: client.clone(),
            resumed: resumed_tx,
            pings: pings_tx,
        },
    );

    let handle = client
        .suspend(&actor, "once".to_string(), |me: &mut Requestor, _, (echo, _)| {
            let _ = me.resumed.send((me.name.clone(), echo));
        })
        .unwrap();
    let (_, echo) = resumed_rx.recv().await.unwrap();
    assert_eq!(echo, "once");

    let again = client.registry().resume(handle, ("twice".into(), 0));
    assert_eq!(again, Err(FrameworkError::DoubleResume { handle }));

    drop(actor);
    join.await.unwrap();
    drop(client);
    worker.shutdown_async().await.unwrap();
    assert!(resumed_rx.recv().await.is_none());
}

struct Waiter {
    resumed: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl Actor for Waiter {
    type Message = ();

    async fn handle(&mut self, _msg: (), _ctx: &mut Context<Self>) {}
}

/// Expiring a continuation while its job is still at the worker: the late
/// result is discarded without a fault, and the actor never sees it.
#[tokio::test]
async fn test_result_for_expired_continuation_is_discarded() {
    let slow = MockService::<String, String>::new("slow");
    slow.expect()
        .after(Duration::from_millis(200))
        .respond_with("late".to_string());
    let (client, worker, expectations) = slow.spawn().unwrap();
    let (resumed_tx, mut resumed_rx) = mpsc::unbounded_channel();
    let (actor, join) = spawn("waiter", Waiter { resumed: resumed_tx });

    let handle = client
        .suspend(&actor, "work".to_string(), |me: &mut Waiter, _, r| {
            let _ = me.resumed.send(r);
        })
        .unwrap();
    assert_eq!(client.registry().expire_older_than(Duration::ZERO), 1);
    assert!(!client.registry().is_pending(handle));
    assert_eq!(client.registry().reclaimed(), 1);

    // The worker finishes the job and resumes into the tombstone.
    tokio::time::timeout(Duration::from_secs(5), async {
        while client.registry().reclaimed() != 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("late result never arrived");
    assert_eq!(expectations.received(), vec!["work".to_string()]);

    // A genuine second result is still a fault.
    assert_eq!(
        client.registry().resume(handle, "again".into()),
        Err(FrameworkError::DoubleResume { handle })
    );

    drop(actor);
    join.await.unwrap();
    drop(client);
    worker.shutdown_async().await.unwrap();
    expectations.verify();
    assert!(resumed_rx.recv().await.is_none());
}
