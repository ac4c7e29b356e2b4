//! Integration tests for the pool CLI's engine wiring.
//!
//! These exercise complete end-to-end flows against a temp-dir-backed
//! `WalletConfig` — deposit → sync → withdraw, and bid → settle — the same
//! way `cli/src/integration_tests.rs` exercised the stealth-address flow
//! this workspace was transformed from.

#[cfg(test)]
mod e2e_tests {
    use pool_auction::{current_slot, AuctionCore, Bid, FakeBroadcastClient, RootOracle, SettleOutcome};
    use pool_core::{commitment_of, Field, Spend};
    use pool_wallet::{FakeProver, JsonFileStore, Prover, SecureSeedStorage, Wallet, WalletConfig, WalletSeed};
    use tempfile::tempdir;

    use crate::ledger::LocalLedger;

    fn fresh_config() -> (tempfile::TempDir, WalletConfig) {
        let dir = tempdir().unwrap();
        let cfg = WalletConfig::at(dir.path().to_path_buf());
        cfg.ensure_exists().unwrap();
        (dir, cfg)
    }

    fn open(cfg: &WalletConfig) -> Wallet<LocalLedger, JsonFileStore> {
        let ledger = LocalLedger::open(LocalLedger::default_path(cfg.root())).unwrap();
        let store = JsonFileStore::new(cfg.state_path());
        Wallet::open(ledger, store).unwrap()
    }

    #[test]
    fn keygen_then_reload_through_password() {
        let (_dir, cfg) = fresh_config();
        let storage = SecureSeedStorage::new(cfg.seed_path());
        assert!(!storage.exists());

        let seed = WalletSeed::generate();
        storage.save(&seed, "Test@Password123").unwrap();

        let storage = SecureSeedStorage::new(cfg.seed_path());
        assert!(storage.exists());
        let loaded = storage.load("Test@Password123").unwrap();
        assert_eq!(seed.as_bytes(), loaded.as_bytes());
        assert!(storage.load("wrong-password").is_err());
    }

    #[test]
    fn deposit_sync_withdraw_round_trip() {
        let (_dir, cfg) = fresh_config();
        let seed_bytes = [42u8; 32];

        // Deposit: mint a note for the wallet's own seed, record it on the
        // local ledger the way `pool deposit` does.
        let mut wallet = open(&cfg);
        wallet.unlock_seed(WalletSeed::from_bytes(seed_bytes));
        let (secret, nullifier) = wallet.peek_next_candidate().unwrap();
        let commitment = commitment_of(&secret, &nullifier, 1_000);

        let mut ledger = LocalLedger::open(LocalLedger::default_path(cfg.root())).unwrap();
        ledger.record_deposit(commitment, 1_000, 0).unwrap();
        drop(ledger);

        // Sync: the wallet should recognize the deposit as its own.
        let mut wallet = open(&cfg);
        wallet.unlock_seed(WalletSeed::from_bytes(seed_bytes));
        let report = wallet.sync().unwrap();
        assert_eq!(report.notes_recognized, 1);
        assert_eq!(wallet.balance(), 1_000);

        // Withdraw: build the spend, "prove" it, record the event, resync.
        let recipient = Field::from_u128(0xA0_01);
        let spend = wallet.prepare_withdraw(1_000, recipient).unwrap();
        let Spend::Withdraw(_, pub_in) = &spend else {
            panic!("expected withdraw");
        };
        assert_eq!(pub_in.withdraw_amount, 1_000);

        let proof_a = FakeProver.prove(&spend).unwrap();
        let proof_b = FakeProver.prove(&spend).unwrap();
        assert_eq!(proof_a, proof_b);

        let mut ledger = LocalLedger::open(LocalLedger::default_path(cfg.root())).unwrap();
        ledger
            .record_withdrawal(pub_in.nullifier_hash, pub_in.recipient, pub_in.withdraw_amount)
            .unwrap();
        drop(ledger);

        let report = wallet.sync().unwrap();
        assert_eq!(report.notes_spent, 1);
        assert_eq!(wallet.balance(), 0);
    }

    struct FixedOracle(bool);
    impl RootOracle for FixedOracle {
        fn is_known_root(&self, _root: Field) -> bool {
            self.0
        }
    }

    #[test]
    fn auction_bid_then_settle_spends_nullifier_once() {
        let nullifier_hash = Field::from_u128(7);
        let bid = Bid {
            id: uuid::Uuid::new_v4(),
            slot_id: 0,
            amount: 500,
            content: b"gm".to_vec(),
            images: 0,
            proof: vec![],
            public_inputs: vec![nullifier_hash, Field::from_u128(500)],
            nullifier_hash,
            claim_commitment: Field::from_u128(1),
        };

        let mut core = AuctionCore::new();
        core.submit_bid(0, bid, Field::zero(), &FixedOracle(true)).unwrap();
        assert_eq!(current_slot(0), 0);

        let outcome = core
            .settle(pool_auction::SLOT_SECONDS, 0, &FakeBroadcastClient)
            .unwrap();
        assert!(matches!(outcome, SettleOutcome::Settled(_)));

        // Resubmitting the same nullifier in a later slot is rejected.
        let mut rebid = Bid {
            id: uuid::Uuid::new_v4(),
            slot_id: 1,
            amount: 10,
            content: b"again".to_vec(),
            images: 0,
            proof: vec![],
            public_inputs: vec![nullifier_hash, Field::from_u128(10)],
            nullifier_hash,
            claim_commitment: Field::from_u128(1),
        };
        rebid.slot_id = 1;
        let result = core.submit_bid(
            pool_auction::SLOT_SECONDS,
            rebid,
            Field::zero(),
            &FixedOracle(true),
        );
        assert!(result.is_err());
    }
}
