//! # File Ledger Durability
//!
//! Committed operations survive closing and reopening the ledger; rejected
//! ones leave no trace on disk.

#[cfg(test)]
mod tests {
    use asset_registry::prelude::*;
    use asset_registry::test_utils::args;
    use tempfile::TempDir;

    fn call(ledger: &FileLedger, name: &str, values: &[&str]) -> Response {
        Dispatcher::default().invoke_in_transaction(ledger, name, &args(values))
    }

    #[test]
    fn test_registry_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let ledger = FileLedger::open(dir.path()).unwrap();
            assert!(call(&ledger, "userRegister", &["alice", "u1"]).is_success());
            assert!(call(&ledger, "userRegister", &["bob", "u2"]).is_success());
            assert!(call(&ledger, "assetEnroll", &["car", "a1", "red", "u1"]).is_success());
            assert!(call(&ledger, "assetExchange", &["u1", "a1", "u2"]).is_success());
        }

        let ledger = FileLedger::open(dir.path()).unwrap();
        assert_eq!(ledger.height(), 4);
        assert_eq!(
            call(&ledger, "queryUser", &["u2"]).payload(),
            Some(br#"{"name":"bob","id":"u2","asserts":["a1"]}"#.as_slice())
        );

        let response = call(&ledger, "queryAssetHistory", &["a1"]);
        let records: Vec<AssetHistory> = serde_json::from_slice(response.payload().unwrap()).unwrap();
        assert_eq!(
            records,
            vec![
                AssetHistory::new("a1", "originOwnerPlaceholder", "u1"),
                AssetHistory::new("a1", "u1", "u2"),
            ]
        );
    }

    #[test]
    fn test_rejected_operation_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        {
            let ledger = FileLedger::open(dir.path()).unwrap();
            call(&ledger, "userRegister", &["alice", "u1"]);
            let response = call(&ledger, "assetExchange", &["u1", "a1", "u2"]);
            assert_eq!(response.error_code(), Some("NOT_FOUND"));
        }

        let ledger = FileLedger::open(dir.path()).unwrap();
        assert_eq!(ledger.height(), 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_cascade_delete_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let ledger = FileLedger::open(dir.path()).unwrap();
            call(&ledger, "userRegister", &["alice", "u1"]);
            call(&ledger, "assetEnroll", &["car", "a1", "red", "u1"]);
            call(&ledger, "assetEnroll", &["boat", "a2", "blue", "u1"]);
            assert!(call(&ledger, "userDestroy", &["u1"]).is_success());
        }

        let ledger = FileLedger::open(dir.path()).unwrap();
        for (name, id) in [("queryUser", "u1"), ("queryAsset", "a1"), ("queryAsset", "a2")] {
            assert_eq!(call(&ledger, name, &[id]).error_code(), Some("NOT_FOUND"));
        }
        // Only the two history records remain.
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_failed_snapshot_is_not_visible() {
        let dir = TempDir::new().unwrap();
        let ledger = FileLedger::open(dir.path()).unwrap();
        let blocker = dir.path().join("ledger.tmp");
        std::fs::create_dir(&blocker).unwrap();

        let response = call(&ledger, "userRegister", &["alice", "u1"]);
        assert_eq!(response.error_code(), Some("INTERNAL"));
        assert_eq!(call(&ledger, "queryUser", &["u1"]).error_code(), Some("NOT_FOUND"));
        assert_eq!(ledger.height(), 0);

        std::fs::remove_dir(&blocker).unwrap();
        assert!(call(&ledger, "userRegister", &["alice", "u1"]).is_success());
        assert_eq!(ledger.height(), 1);
    }

    #[test]
    fn test_second_open_is_refused() {
        let dir = TempDir::new().unwrap();
        let _ledger = FileLedger::open(dir.path()).unwrap();
        match FileLedger::open(dir.path()) {
            Err(StoreError::Locked { message }) => {
                assert!(message.contains(&std::process::id().to_string()));
            }
            other => panic!("Expected Locked, got {other:?}"),
        }
    }
}
