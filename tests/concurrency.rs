//! Chains shared between threads.

use std::{sync::Arc, thread};

use errtrail::{Chain, Code, Node, Registry, chain::shared::SharedChain, compat::ChainError};

static_assertions::assert_impl_all!(Chain: Send, Sync, Clone);
static_assertions::assert_impl_all!(Node: Send, Sync, Clone);
static_assertions::assert_impl_all!(SharedChain: Send, Sync);
static_assertions::assert_impl_all!(ChainError: Send, Sync, std::error::Error);
static_assertions::assert_impl_all!(Registry: Send, Sync, Clone);
static_assertions::assert_not_impl_any!(Chain: std::error::Error);

#[test]
fn test_copies_never_observe_each_other() {
    let base = Chain::new("root");
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let base = base.clone();
            thread::spawn(move || base.wrap(Code::new(300 + worker), format!("worker {worker}")))
        })
        .collect();

    for (worker, handle) in handles.into_iter().enumerate() {
        let chain = handle.join().unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.message(), format!("worker {worker}"));
        assert!(chain.has(&base));
    }
    assert_eq!(base.len(), 1);
}

#[test]
fn test_shared_chain_collects_every_update() {
    let shared = Arc::new(SharedChain::new(Chain::new("batch failed")));
    let handles: Vec<_> = (0..16)
        .map(|item| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let snapshot = shared.add(format!("item {item} rejected"));
                assert!(snapshot.len() >= 2);
                snapshot
            })
        })
        .collect();

    let snapshots: Vec<Chain> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let chain = shared.snapshot();
    assert_eq!(chain.len(), 17);
    assert_eq!(chain.message(), "batch failed");
    for snapshot in &snapshots {
        // Each snapshot's newest note sits right behind the outermost node.
        assert!(chain.has(snapshot.get(1).unwrap()));
    }

    let mut lengths: Vec<usize> = snapshots.iter().map(Chain::len).collect();
    lengths.sort_unstable();
    assert_eq!(lengths, (2..=17).collect::<Vec<_>>());
}

#[test]
fn test_shared_chain_wrap_and_track() {
    let shared = SharedChain::new(Chain::new("root"));
    thread::scope(|scope| {
        scope.spawn(|| shared.wrap(Code::FATAL, "outer"));
    });
    let tracked = shared.track();
    assert_eq!(tracked.len(), 3);
    assert_eq!(tracked.message(), "outer");
    assert_eq!(tracked.code(), Code::FATAL);
    assert_eq!(shared.into_inner().len(), 3);
}
