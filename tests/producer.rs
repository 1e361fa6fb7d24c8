use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use randcast::{
    EventKind, Producer, ProducerConfig, ProducerError, ReceiveError, RunState, StopOutcome,
    Subscriber,
};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

/// Records every value it receives.
#[derive(Default)]
struct Collector {
    seen: Mutex<Vec<String>>,
}

impl Collector {
    fn count(&self) -> usize {
        self.seen.lock().len()
    }

    fn values(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl Subscriber for Collector {
    async fn receive(&self, value: &str) -> Result<(), ReceiveError> {
        self.seen.lock().push(value.to_owned());
        Ok(())
    }

    fn name(&self) -> &str {
        "collector"
    }
}

/// Forwards values to a channel so tests can await them.
struct Forward(mpsc::UnboundedSender<String>);

#[async_trait]
impl Subscriber for Forward {
    async fn receive(&self, value: &str) -> Result<(), ReceiveError> {
        let _ = self.0.send(value.to_owned());
        Ok(())
    }
}

/// Always fails.
struct Broken;

#[async_trait]
impl Subscriber for Broken {
    async fn receive(&self, _value: &str) -> Result<(), ReceiveError> {
        Err(ReceiveError::rejected("broken on purpose"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

/// Signals entry, then holds the round for `hold`.
struct Slow {
    entered: mpsc::UnboundedSender<()>,
    hold: Duration,
    calls: Mutex<usize>,
}

#[async_trait]
impl Subscriber for Slow {
    async fn receive(&self, _value: &str) -> Result<(), ReceiveError> {
        *self.calls.lock() += 1;
        let _ = self.entered.send(());
        time::sleep(self.hold).await;
        Ok(())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

fn producer(seed: u64) -> Producer {
    Producer::builder().seed(seed).build().unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_subscriber_receives_within_max_interval() {
    let p = producer(1);
    let (tx, mut rx) = mpsc::unbounded_channel();
    p.subscribe(Arc::new(Forward(tx)));
    p.start().unwrap();

    let value = time::timeout(Duration::from_millis(6000), rx.recv())
        .await
        .expect("no value within 6s")
        .unwrap();
    assert!((8..=16).contains(&value.len()));
    assert!(value.bytes().all(|b| b.is_ascii_alphanumeric()));

    assert_eq!(p.stop().await, StopOutcome::Joined);
}

#[tokio::test(start_paused = true)]
async fn test_generated_values_are_well_formed() {
    let p = producer(2);
    let c = Arc::new(Collector::default());
    p.subscribe(c.clone());
    p.start().unwrap();

    time::sleep(Duration::from_secs(120)).await;
    p.stop().await;

    let values = c.values();
    assert!(values.len() >= 24, "only {} values in 120s", values.len());
    for v in values {
        assert!((8..=16).contains(&v.len()), "bad length: {v:?}");
        assert!(v.bytes().all(|b| b.is_ascii_alphanumeric()), "bad symbol: {v:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_unsubscribe_stops_delivery() {
    let p = producer(3);
    let c = Arc::new(Collector::default());
    let sub: Arc<dyn Subscriber> = c.clone();
    p.subscribe(sub.clone());
    p.start().unwrap();

    time::sleep(Duration::from_millis(100)).await;
    assert_eq!(c.count(), 1);

    assert!(p.unsubscribe(&sub));
    time::sleep(Duration::from_secs(30)).await;

    assert_eq!(c.count(), 1);
    assert_eq!(p.state(), RunState::Running);
    p.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_fan_out_delivers_identical_values() {
    let p = producer(4);
    let a = Arc::new(Collector::default());
    let b = Arc::new(Collector::default());
    p.subscribe(a.clone());
    p.subscribe(b.clone());
    p.start().unwrap();

    time::sleep(Duration::from_secs(20)).await;
    p.stop().await;

    assert!(a.count() >= 4);
    assert_eq!(a.values(), b.values());
}

#[tokio::test(start_paused = true)]
async fn test_failing_subscriber_does_not_suppress_others() {
    let p = producer(5);
    let mut events = p.bus().subscribe();
    let before = Arc::new(Collector::default());
    let after = Arc::new(Collector::default());
    p.subscribe(before.clone());
    p.subscribe(Arc::new(Broken));
    p.subscribe(after.clone());
    p.start().unwrap();

    time::sleep(Duration::from_secs(12)).await;
    p.stop().await;

    let rounds = before.count();
    assert!(rounds >= 3);
    assert_eq!(after.count(), rounds);

    let mut failures = 0;
    while let Ok(ev) = events.try_recv() {
        if ev.kind == EventKind::SubscriberFailed {
            assert_eq!(ev.subscriber.as_deref(), Some("broken"));
            assert_eq!(ev.reason.as_deref(), Some("rejected: broken on purpose"));
            failures += 1;
        }
    }
    assert_eq!(failures, rounds);
}

#[tokio::test(start_paused = true)]
async fn test_end_to_end_stop_freezes_delivery() {
    let p = producer(6);
    let c = Arc::new(Collector::default());
    p.subscribe(c.clone());
    p.start().unwrap();

    time::sleep(Duration::from_millis(7000)).await;
    assert!(c.count() >= 1);

    assert_eq!(p.stop().await, StopOutcome::Joined);
    let at_stop = c.count();
    assert_eq!(p.state(), RunState::Stopped);
    assert_eq!(p.subscriber_count(), 0);

    time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(c.count(), at_stop);
}

#[tokio::test(start_paused = true)]
async fn test_stop_interrupts_wait_immediately() {
    let p = producer(7);
    let c = Arc::new(Collector::default());
    p.subscribe(c.clone());
    p.start().unwrap();

    // Round 1 is done; the loop now waits at least 1s.
    time::sleep(Duration::from_millis(10)).await;
    assert_eq!(c.count(), 1);

    let started = Instant::now();
    assert_eq!(p.stop().await, StopOutcome::Joined);
    assert!(started.elapsed() < Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn test_stop_times_out_on_stuck_subscriber() {
    let p = producer(8);
    let mut events = p.bus().subscribe();
    let (tx, mut entered) = mpsc::unbounded_channel();
    let slow = Arc::new(Slow {
        entered: tx,
        hold: Duration::from_secs(3600),
        calls: Mutex::new(0),
    });
    p.subscribe(slow.clone());
    p.start().unwrap();
    entered.recv().await.unwrap();

    let started = Instant::now();
    assert_eq!(p.stop().await, StopOutcome::TimedOut);
    assert!(started.elapsed() >= Duration::from_millis(1000));
    assert_eq!(p.subscriber_count(), 0);
    assert_eq!(p.state(), RunState::Stopped);

    time::sleep(Duration::from_secs(30)).await;
    assert_eq!(*slow.calls.lock(), 1);

    let mut timed_out = false;
    while let Ok(ev) = events.try_recv() {
        if ev.kind == EventKind::StopTimedOut {
            assert_eq!(ev.timeout_ms, Some(1000));
            timed_out = true;
        }
    }
    assert!(timed_out);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_stops_both_wait_for_loop_exit() {
    let p = producer(16);
    let mut events = p.bus().subscribe();
    let (tx, mut entered) = mpsc::unbounded_channel();
    let slow = Arc::new(Slow {
        entered: tx,
        hold: Duration::from_millis(500),
        calls: Mutex::new(0),
    });
    p.subscribe(slow.clone());
    p.start().unwrap();
    entered.recv().await.unwrap();

    let started = Instant::now();
    let (first, second) = tokio::join!(p.stop(), p.stop());
    assert!(started.elapsed() >= Duration::from_millis(400));

    assert_eq!(first, StopOutcome::Joined);
    assert_eq!(second, StopOutcome::Joined);
    assert_eq!(p.state(), RunState::Stopped);
    assert_eq!(p.subscriber_count(), 0);

    let mut requested = 0;
    let mut stopped = 0;
    while let Ok(ev) = events.try_recv() {
        match ev.kind {
            EventKind::StopRequested => requested += 1,
            EventKind::ProducerStopped => stopped += 1,
            _ => {}
        }
    }
    assert_eq!((requested, stopped), (1, 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_restart_racing_stop_keeps_new_subscriber() {
    for seed in 0..50 {
        let p = Arc::new(
            Producer::builder()
                .seed(seed)
                .with_logging(false)
                .build()
                .unwrap(),
        );
        p.subscribe(Arc::new(Collector::default()));
        p.start().unwrap();

        let restarter = {
            let p = Arc::clone(&p);
            tokio::spawn(async move {
                let fresh: Arc<dyn Subscriber> = Arc::new(Collector::default());
                while p.start().is_err() {
                    tokio::task::yield_now().await;
                }
                p.subscribe(fresh.clone());
                fresh
            })
        };
        p.stop().await;
        let fresh = restarter.await.unwrap();

        // start() only succeeds once the registry has been cleared.
        assert_eq!(p.registrations_of(&fresh), 1);
        p.stop().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_subscriber_added_mid_round_waits_for_next_round() {
    let p = producer(9);
    let (tx, mut entered) = mpsc::unbounded_channel();
    let slow = Arc::new(Slow {
        entered: tx,
        hold: Duration::from_millis(200),
        calls: Mutex::new(0),
    });
    p.subscribe(slow.clone());
    p.start().unwrap();

    entered.recv().await.unwrap();
    let late = Arc::new(Collector::default());
    p.subscribe(late.clone());

    // Round 1 ends after 200ms; round 2 starts at least 1s later.
    time::sleep(Duration::from_millis(500)).await;
    assert_eq!(late.count(), 0);

    time::sleep(Duration::from_millis(5000)).await;
    assert!(late.count() >= 1);
    p.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_double_start_rejected_and_restart_allowed() {
    let p = producer(10);
    p.start().unwrap();
    assert!(matches!(
        p.start(),
        Err(ProducerError::InvalidState {
            state: RunState::Running
        })
    ));
    assert_eq!(p.stop().await, StopOutcome::Joined);

    let (tx, mut rx) = mpsc::unbounded_channel();
    p.subscribe(Arc::new(Forward(tx)));
    p.start().unwrap();
    assert_eq!(p.state(), RunState::Running);

    time::timeout(Duration::from_millis(6000), rx.recv())
        .await
        .expect("restarted producer delivers")
        .unwrap();
    assert_eq!(p.stop().await, StopOutcome::Joined);
}

#[tokio::test(start_paused = true)]
async fn test_stop_when_idle_clears_registry() {
    let p = producer(11);
    p.subscribe(Arc::new(Collector::default()));
    assert_eq!(p.stop().await, StopOutcome::NotRunning);
    assert_eq!(p.subscriber_count(), 0);
    assert_eq!(p.state(), RunState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_none_and_unknown_subscribers_are_noops() {
    let p = producer(12);
    p.subscribe_opt(None);
    assert!(!p.unsubscribe_opt(None));
    assert_eq!(p.subscriber_count(), 0);

    let stranger: Arc<dyn Subscriber> = Arc::new(Collector::default());
    assert!(!p.unsubscribe(&stranger));

    let known: Arc<dyn Subscriber> = Arc::new(Collector::default());
    p.subscribe_opt(Some(known.clone()));
    assert!(p.unsubscribe_opt(Some(&known)));
    assert_eq!(p.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_registration_delivers_twice() {
    let p = producer(13);
    let c = Arc::new(Collector::default());
    let sub: Arc<dyn Subscriber> = c.clone();
    p.subscribe(sub.clone());
    p.subscribe(sub.clone());
    assert_eq!(p.registrations_of(&sub), 2);
    p.start().unwrap();

    time::sleep(Duration::from_millis(100)).await;
    assert_eq!(c.count(), 2);

    assert!(p.unsubscribe(&sub));
    assert_eq!(p.registrations_of(&sub), 1);
    p.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registry_churn_while_running() {
    let cfg = ProducerConfig {
        min_interval: Duration::from_millis(1),
        max_interval: Duration::from_millis(3),
        ..ProducerConfig::default()
    };
    let p = Arc::new(
        Producer::builder()
            .config(cfg)
            .seed(14)
            .with_logging(false)
            .build()
            .unwrap(),
    );
    p.start().unwrap();

    let keep: Vec<Arc<dyn Subscriber>> = (0..10)
        .map(|_| Arc::new(Collector::default()) as Arc<dyn Subscriber>)
        .collect();

    let mut tasks = Vec::new();
    for k in keep.iter().cloned() {
        let p = Arc::clone(&p);
        tasks.push(tokio::spawn(async move {
            let churn: Arc<dyn Subscriber> = Arc::new(Collector::default());
            for _ in 0..50 {
                p.subscribe(churn.clone());
                tokio::task::yield_now().await;
                assert!(p.unsubscribe(&churn));
            }
            p.subscribe(k);
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    assert_eq!(p.subscriber_count(), 10);
    for k in &keep {
        assert_eq!(p.registrations_of(k), 1);
    }

    time::sleep(Duration::from_millis(50)).await;
    assert_eq!(p.stop().await, StopOutcome::Joined);
    assert_eq!(p.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_seeded_producers_generate_same_values() {
    let a = producer(15);
    let b = producer(15);
    let ca = Arc::new(Collector::default());
    let cb = Arc::new(Collector::default());
    a.subscribe(ca.clone());
    b.subscribe(cb.clone());
    a.start().unwrap();
    b.start().unwrap();

    time::sleep(Duration::from_secs(30)).await;
    a.stop().await;
    b.stop().await;

    let (va, vb) = (ca.values(), cb.values());
    let n = va.len().min(vb.len());
    assert!(n >= 5);
    assert_eq!(va[..n], vb[..n]);
}
