//! # Ownership Model Check
//!
//! Random operation sequences are replayed against a plain in-test model of
//! who owns what. After every run the ledger must agree with the model:
//! each asset sits in exactly one ownership list, and its history lists the
//! owners in order.

#[cfg(test)]
mod tests {
    use asset_registry::prelude::*;
    use asset_registry::test_utils::args;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use std::collections::{BTreeMap, HashSet};

    const USERS: usize = 5;
    const STEPS: usize = 300;

    #[derive(Default)]
    struct Model {
        /// Asset id -> owner chain, enrollment owner first.
        chains: BTreeMap<String, Vec<String>>,
        /// (asset, origin, current) transfers already recorded.
        transfers: HashSet<(String, String, String)>,
    }

    impl Model {
        fn owner(&self, asset: &str) -> &str {
            self.chains[asset].last().unwrap()
        }
    }

    fn user_ids() -> Vec<String> {
        (0..USERS).map(|i| format!("u{i}")).collect()
    }

    fn run(seed: u64) -> (Dispatcher, InMemoryLedger, Model) {
        let mut rng = StdRng::seed_from_u64(seed);
        let dispatcher = Dispatcher::default();
        let ledger = InMemoryLedger::new();
        let users = user_ids();
        let mut model = Model::default();

        for id in &users {
            dispatcher.invoke_in_transaction(&ledger, "userRegister", &args(&["user", id.as_str()]));
        }

        for step in 0..STEPS {
            let roll = rng.gen_range(0..10);
            if roll < 3 || model.chains.is_empty() {
                let asset = format!("a{step}");
                let owner = users.choose(&mut rng).unwrap().clone();
                let response = dispatcher.invoke_in_transaction(
                    &ledger,
                    "assetEnroll",
                    &args(&["thing", asset.as_str(), "meta", owner.as_str()]),
                );
                assert!(response.is_success(), "{response:?}");
                model.chains.insert(asset, vec![owner]);
                continue;
            }

            let assets: Vec<String> = model.chains.keys().cloned().collect();
            let asset = assets.choose(&mut rng).unwrap().clone();
            let owner = model.owner(&asset).to_string();

            if roll == 9 {
                let intruder = users.iter().find(|id| **id != owner).unwrap().clone();
                let target = owner.clone();
                let response = dispatcher.invoke_in_transaction(
                    &ledger,
                    "assetExchange",
                    &args(&[intruder.as_str(), asset.as_str(), target.as_str()]),
                );
                assert_eq!(response.error_code(), Some("OWNERSHIP_MISMATCH"));
                continue;
            }

            // History keys are per (asset, origin, current); skip repeats.
            let targets: Vec<&String> = users
                .iter()
                .filter(|id| **id != owner)
                .filter(|id| !model.transfers.contains(&(asset.clone(), owner.clone(), (*id).clone())))
                .collect();
            let Some(target) = targets.choose(&mut rng).map(|t| (*t).clone()) else {
                continue;
            };

            let response = dispatcher.invoke_in_transaction(
                &ledger,
                "assetExchange",
                &args(&[owner.as_str(), asset.as_str(), target.as_str()]),
            );
            assert!(response.is_success(), "{response:?}");
            model.transfers.insert((asset.clone(), owner, target.clone()));
            if let Some(chain) = model.chains.get_mut(&asset) {
                chain.push(target);
            }
        }

        (dispatcher, ledger, model)
    }

    fn query<T: serde::de::DeserializeOwned>(
        dispatcher: &Dispatcher,
        ledger: &InMemoryLedger,
        name: &str,
        values: &[&str],
    ) -> T {
        let response = dispatcher.invoke_in_transaction(ledger, name, &args(values));
        serde_json::from_slice(response.payload().unwrap()).unwrap()
    }

    #[test]
    fn test_each_asset_has_exactly_one_owner() {
        for seed in [1, 7, 42] {
            let (dispatcher, ledger, model) = run(seed);
            let users: Vec<User> = user_ids()
                .iter()
                .map(|id| query(&dispatcher, &ledger, "queryUser", &[id.as_str()]))
                .collect();

            for asset in model.chains.keys() {
                let holders: Vec<&str> = users
                    .iter()
                    .filter(|u| u.owns(asset))
                    .map(|u| u.id.as_str())
                    .collect();
                assert_eq!(holders, vec![model.owner(asset)], "seed {seed}, asset {asset}");
            }
            let listed: usize = users.iter().map(|u| u.asset_ids.len()).sum();
            assert_eq!(listed, model.chains.len());
        }
    }

    #[test]
    fn test_history_matches_owner_chain() {
        for seed in [3, 11] {
            let (dispatcher, ledger, model) = run(seed);
            for (asset, chain) in &model.chains {
                let all: Vec<AssetHistory> =
                    query(&dispatcher, &ledger, "queryAssetHistory", &[asset.as_str()]);
                let owners: Vec<&str> = all.iter().map(|h| h.current_owner_id.as_str()).collect();
                assert_eq!(owners, *chain, "seed {seed}, asset {asset}");

                let exchanges: Vec<AssetHistory> = query(
                    &dispatcher,
                    &ledger,
                    "queryAssetHistory",
                    &[asset.as_str(), "exchange"],
                );
                assert_eq!(exchanges.len(), chain.len() - 1);
                for (record, pair) in exchanges.iter().zip(chain.windows(2)) {
                    assert_eq!(record.origin_owner_id, pair[0]);
                    assert_eq!(record.current_owner_id, pair[1]);
                }
            }
        }
    }
}
