//! Fixtures shared by unit and integration tests.

use crate::adapters::InMemoryLedger;
use crate::domain::config::RegistryConfig;
use crate::domain::errors::StoreError;
use crate::ports::inbound::AssetRegistryApi;
use crate::ports::outbound::{BatchOperation, ScanIter, StateStore};
use crate::service::RegistryService;

pub const ALICE: &str = "u1";
pub const BOB: &str = "u2";
pub const CAR: &str = "a1";

/// Owned argument list from string literals.
pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Service plus an auto-commit ledger holding users `u1` (alice) and
/// `u2` (bob), with asset `a1` (car) enrolled for `u1`.
pub fn seeded_service(config: RegistryConfig) -> (RegistryService, InMemoryLedger) {
    let service = match RegistryService::new(config) {
        Ok(service) => service,
        Err(err) => panic!("invalid test config: {err}"),
    };
    let mut ledger = InMemoryLedger::new();
    let seeded = service
        .register_user(&mut ledger, "alice", ALICE)
        .and_then(|_| service.register_user(&mut ledger, "bob", BOB))
        .and_then(|_| service.enroll_asset(&mut ledger, "car", CAR, "red", ALICE));
    if let Err(err) = seeded {
        panic!("seeding failed: {err}");
    }
    (service, ledger)
}

/// Store wrapper that fails selected calls with an I/O error.
#[derive(Debug, Clone, Default)]
pub struct FaultyStore<S> {
    inner: S,
    fail_gets: bool,
    fail_writes: bool,
    fail_scans: bool,
}

impl<S: StateStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_gets: false,
            fail_writes: false,
            fail_scans: false,
        }
    }

    pub fn failing_gets(mut self) -> Self {
        self.fail_gets = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn failing_scans(mut self) -> Self {
        self.fail_scans = true;
        self
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn injected(what: &str) -> StoreError {
        StoreError::Io {
            message: format!("injected {what} failure"),
        }
    }
}

impl<S: StateStore> StateStore for FaultyStore<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_gets {
            return Err(Self::injected("get"));
        }
        self.inner.get(key)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(Self::injected("put"));
        }
        self.inner.put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(Self::injected("delete"));
        }
        self.inner.delete(key)
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(Self::injected("batch write"));
        }
        self.inner.atomic_batch_write(operations)
    }

    fn scan_by_composite_prefix(
        &self,
        namespace: &str,
        prefix: &[&str],
    ) -> Result<ScanIter<'_>, StoreError> {
        if self.fail_scans {
            return Err(Self::injected("scan"));
        }
        self.inner.scan_by_composite_prefix(namespace, prefix)
    }
}
