//! # Concurrent Transactions
//!
//! Several threads dispatch against one shared ledger. Commits are
//! validated optimistically, so a losing transaction is rejected and
//! retried by the caller, never merged.

#[cfg(test)]
mod tests {
    use asset_registry::prelude::*;
    use asset_registry::test_utils::args;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    const MAX_RETRIES: usize = 32;

    fn is_conflict(response: &Response) -> bool {
        matches!(response, Response::Error { code, message }
            if code == "INTERNAL" && message.contains("read conflict"))
    }

    /// Invoke until the outcome is not a commit conflict.
    fn invoke_with_retry(
        dispatcher: &Dispatcher,
        ledger: &InMemoryLedger,
        name: &str,
        values: &[&str],
        conflicts: &AtomicUsize,
    ) -> Response {
        for _ in 0..MAX_RETRIES {
            let response = dispatcher.invoke_in_transaction(ledger, name, &args(values));
            if !is_conflict(&response) {
                return response;
            }
            conflicts.fetch_add(1, Ordering::Relaxed);
        }
        panic!("{name} still conflicting after {MAX_RETRIES} attempts");
    }

    fn owners_of(dispatcher: &Dispatcher, ledger: &InMemoryLedger, users: &[String], asset: &str) -> Vec<String> {
        users
            .iter()
            .filter(|id| {
                let response = dispatcher.invoke_in_transaction(ledger, "queryUser", &args(&[id.as_str()]));
                let user: User = serde_json::from_slice(response.payload().unwrap()).unwrap();
                user.owns(asset)
            })
            .cloned()
            .collect()
    }

    #[test]
    fn test_racing_exchanges_have_one_winner() {
        let dispatcher = Dispatcher::default();
        let ledger = InMemoryLedger::new();
        let users: Vec<String> = (0..5).map(|i| format!("u{i}")).collect();
        for id in &users {
            dispatcher.invoke_in_transaction(&ledger, "userRegister", &args(&["user", id.as_str()]));
        }
        dispatcher.invoke_in_transaction(&ledger, "assetEnroll", &args(&["car", "a1", "red", "u0"]));

        let barrier = Barrier::new(4);
        let conflicts = AtomicUsize::new(0);
        let responses: Vec<Response> = thread::scope(|scope| {
            let handles: Vec<_> = users[1..]
                .iter()
                .map(|target| {
                    let (dispatcher, ledger, barrier, conflicts) =
                        (&dispatcher, &ledger, &barrier, &conflicts);
                    scope.spawn(move || {
                        barrier.wait();
                        invoke_with_retry(
                            dispatcher,
                            ledger,
                            "assetExchange",
                            &["u0", "a1", target.as_str()],
                            conflicts,
                        )
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners = responses.iter().filter(|r| r.is_success()).count();
        assert_eq!(winners, 1);
        for response in responses.iter().filter(|r| !r.is_success()) {
            assert_eq!(response.error_code(), Some("OWNERSHIP_MISMATCH"));
        }

        let owners = owners_of(&dispatcher, &ledger, &users, "a1");
        assert_eq!(owners.len(), 1);
        assert_ne!(owners[0], "u0");

        let history = dispatcher.invoke_in_transaction(&ledger, "queryAssetHistory", &args(&["a1"]));
        let records: Vec<AssetHistory> = serde_json::from_slice(history.payload().unwrap()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].current_owner_id, owners[0]);
    }

    #[test]
    fn test_disjoint_registrations_never_conflict() {
        let dispatcher = Dispatcher::default();
        let ledger = InMemoryLedger::new();
        let conflicts = AtomicUsize::new(0);

        thread::scope(|scope| {
            for worker in 0..4 {
                let (dispatcher, ledger, conflicts) = (&dispatcher, &ledger, &conflicts);
                scope.spawn(move || {
                    for i in 0..25 {
                        let id = format!("w{worker}-u{i}");
                        let response =
                            invoke_with_retry(dispatcher, ledger, "userRegister", &["user", id.as_str()], conflicts);
                        assert!(response.is_success(), "{id}: {response:?}");
                    }
                });
            }
        });

        assert_eq!(conflicts.load(Ordering::Relaxed), 0);
        assert_eq!(ledger.len(), 100);
        assert_eq!(ledger.height(), 100);
    }

    #[test]
    fn test_duplicate_registration_race() {
        let dispatcher = Dispatcher::default();
        let ledger = InMemoryLedger::new();
        let barrier = Barrier::new(8);
        let conflicts = AtomicUsize::new(0);

        let successes = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let (dispatcher, ledger, barrier, conflicts) =
                        (&dispatcher, &ledger, &barrier, &conflicts);
                    scope.spawn(move || {
                        let name = format!("claimant-{i}");
                        barrier.wait();
                        invoke_with_retry(dispatcher, ledger, "userRegister", &[name.as_str(), "u1"], conflicts)
                            .is_success()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });

        assert_eq!(successes, 1);
        assert_eq!(ledger.len(), 1);
    }
}
