//! The wallet engine (spec §4.F): note ownership bookkeeping, `sync`, and
//! the three `prepare*` operations that hand a ready-to-prove `Spend` back
//! to the caller. Reconciliation (spec §4.H) is folded into `sync` itself —
//! every call fully rebuilds the local accumulator mirror from the chain
//! mirror's event log, so a stale-root retry and a post-reorg recovery are
//! the same code path. See DESIGN.md for why that tradeoff was made.

use std::collections::HashMap;

use pool_core::{Field, MerkleAccumulator, Spend};

use crate::chain_mirror::{ChainEvent, ChainMirror};
use crate::error::EngineError;
use crate::keys::{WalletSeed, LOOKAHEAD};
use crate::storage::{NoteState, Store, StoredNote, WalletState};

/// Summary of one `sync` call, surfaced to the CLI for a human-readable log
/// line instead of silent background state mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub leaves_observed: u32,
    pub notes_recognized: u32,
    pub notes_spent: u32,
    pub notes_quarantined: u32,
    pub notes_reinstated: u32,
}

pub struct Wallet<M: ChainMirror, S: Store> {
    seed: Option<WalletSeed>,
    mirror: MerkleAccumulator,
    state: WalletState,
    chain: M,
    store: S,
}

impl<M: ChainMirror, S: Store> Wallet<M, S> {
    pub fn open(chain: M, store: S) -> Result<Self, EngineError> {
        let state = store.load()?;
        Ok(Self {
            seed: None,
            mirror: MerkleAccumulator::new(),
            state,
            chain,
            store,
        })
    }

    /// Unlock with an already-materialized seed (loaded from encrypted
    /// storage, or generated fresh by `keygen`).
    pub fn unlock_seed(&mut self, seed: WalletSeed) {
        self.seed = Some(seed);
    }

    /// Unlock by deriving the seed from a signature over the fixed domain
    /// message (spec §4.F, spec §6): `seed = KDF(signature || "anon-privacy-
    /// wallet-v1")`. Re-signing the same message with the same wallet key
    /// always reproduces the same seed, so nothing beyond the signing key
    /// itself needs to be stored to recover this wallet.
    pub fn unlock(&mut self, signature: &[u8]) -> Result<(), EngineError> {
        self.seed = Some(WalletSeed::from_signature(signature)?);
        Ok(())
    }

    pub fn is_unlocked(&self) -> bool {
        self.seed.is_some()
    }

    pub fn balance(&self) -> u128 {
        self.state
            .notes
            .iter()
            .filter(|n| n.state == NoteState::Owned)
            .map(|n| n.amount)
            .sum()
    }

    pub fn owned_notes(&self) -> Vec<&StoredNote> {
        self.state
            .notes
            .iter()
            .filter(|n| n.state == NoteState::Owned)
            .collect()
    }

    pub fn current_root(&self) -> Field {
        self.mirror.current_root()
    }

    /// Whether `root` is still inside the accumulator mirror's root-history
    /// window (spec §4.C). Exposed so a caller (the auction core's
    /// `RootOracle`, for one) can check a proof's root without this crate
    /// depending on that caller.
    pub fn is_known_root(&self, root: &Field) -> bool {
        self.mirror.is_known_root(root)
    }

    /// Rebuild the local accumulator mirror from the chain mirror's full
    /// event log and reconcile note ownership against it. Idempotent and
    /// safe to call on every tick, after a prover failure, or after a
    /// suspected reorg (spec §4.H) — there is no separate "reconcile" entry
    /// point because this operation already is one.
    pub fn sync(&mut self) -> Result<SyncReport, EngineError> {
        let seed = self.seed.as_ref().ok_or(EngineError::Locked)?;
        let events = self.chain.events_since(0)?;

        let mut rebuilt = MerkleAccumulator::new();
        let mut leaves_in_order: Vec<(Field, u128, u32)> = events
            .iter()
            .flat_map(|event| event.new_leaves())
            .collect();
        leaves_in_order.sort_by_key(|(_, _, idx)| *idx);
        for (commitment, _, expected_idx) in &leaves_in_order {
            let (idx, _) = rebuilt.append(*commitment)?;
            debug_assert_eq!(idx, *expected_idx, "chain mirror produced non-sequential leaf indices");
        }

        let mut report = SyncReport {
            leaves_observed: leaves_in_order.len() as u32,
            ..Default::default()
        };

        // 1. Re-home or quarantine every note the wallet previously placed.
        let mut still_placed = Vec::new();
        let mut freshly_quarantined = Vec::new();
        for note in self.state.notes.drain(..) {
            match note.leaf_index {
                Some(idx) if rebuilt.leaf(idx) == Some(note.commitment()) => still_placed.push(note),
                Some(_) => {
                    report.notes_quarantined += 1;
                    freshly_quarantined.push(StoredNote {
                        leaf_index: None,
                        ..note
                    });
                }
                None => still_placed.push(note),
            }
        }
        self.state.notes = still_placed;
        self.state.quarantine.extend(freshly_quarantined);

        // Index what the wallet already believes it owns, by commitment, so
        // recognition doesn't re-derive candidates for notes it already has
        // (either confirmed-elsewhere or freshly adopted by a prepare call).
        let mut known_by_commitment: HashMap<Field, usize> = HashMap::new();
        for (i, note) in self.state.notes.iter().enumerate() {
            known_by_commitment.insert(note.commitment(), i);
        }

        // 2. For each new leaf: reinstate a quarantined note, fill in a
        // pending adoption's leaf index, or run the candidate search.
        for (commitment, amount, leaf_index) in &leaves_in_order {
            if let Some(pos) = self
                .state
                .quarantine
                .iter()
                .position(|n| n.commitment() == *commitment)
            {
                let mut note = self.state.quarantine.remove(pos);
                note.leaf_index = Some(*leaf_index);
                self.state.notes.push(note);
                report.notes_reinstated += 1;
                continue;
            }

            if let Some(&i) = known_by_commitment.get(commitment) {
                if self.state.notes[i].leaf_index.is_none() {
                    self.state.notes[i].leaf_index = Some(*leaf_index);
                }
                continue;
            }

            if let Some((secret, nullifier, counter)) =
                find_candidate(seed, self.state.next_candidate_counter, *commitment, *amount)
            {
                self.state.notes.push(StoredNote {
                    secret,
                    nullifier,
                    amount: *amount,
                    leaf_index: Some(*leaf_index),
                    timestamp: None,
                    candidate_counter: counter,
                    state: NoteState::Owned,
                });
                self.state.next_candidate_counter =
                    self.state.next_candidate_counter.max(counter + 1);
                report.notes_recognized += 1;
            }
        }

        // 3. Apply spends.
        let spent: std::collections::HashSet<Field> = events
            .iter()
            .flat_map(|event| event.spent_nullifiers())
            .collect();
        for note in self.state.notes.iter_mut() {
            if note.state != NoteState::Spent && spent.contains(&note.nullifier_hash()) {
                note.state = NoteState::Spent;
                report.notes_spent += 1;
            }
        }

        self.mirror = rebuilt;
        self.state.last_scanned_leaf = self.mirror.next_leaf_index();
        self.store.save(&self.state)?;

        tracing::info!(
            leaves = report.leaves_observed,
            recognized = report.notes_recognized,
            spent = report.notes_spent,
            quarantined = report.notes_quarantined,
            reinstated = report.notes_reinstated,
            "wallet sync complete"
        );

        Ok(report)
    }

    /// Adopt a note the wallet just generated for itself (a transfer's
    /// output/change, or a consolidation's merged note) ahead of on-chain
    /// confirmation. `sync` will fill in its `leaf_index` once the
    /// corresponding event is observed.
    fn adopt_new_note(&mut self, secret: Field, nullifier: Field, amount: u128, counter: u64) {
        self.state.notes.push(StoredNote {
            secret,
            nullifier,
            amount,
            leaf_index: None,
            timestamp: None,
            candidate_counter: counter,
            state: NoteState::Owned,
        });
        self.state.next_candidate_counter = self.state.next_candidate_counter.max(counter + 1);
    }

    fn find_owned_mut(&mut self, commitment: Field) -> Option<&mut StoredNote> {
        self.state
            .notes
            .iter_mut()
            .find(|n| n.commitment() == commitment)
    }

    /// Build a withdraw spend for the smallest owned note whose amount
    /// covers `amount`. There are no partial withdraws (spec §4.E): the
    /// note's *entire* amount is withdrawn, which may exceed what was
    /// requested if no note matches exactly. Marks the note `Pending` for
    /// the duration of the call; rolls it back to `Owned` if witness
    /// assembly fails.
    pub fn prepare_withdraw(&mut self, amount: u128, recipient: Field) -> Result<Spend, EngineError> {
        let idx = self
            .state
            .notes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.state == NoteState::Owned && n.leaf_index.is_some() && n.amount >= amount)
            .min_by_key(|(_, n)| n.amount)
            .map(|(i, _)| i)
            .ok_or(EngineError::NoSuitableNote {
                requested: amount,
                largest: self.owned_notes().iter().map(|n| n.amount).max(),
            })?;
        self.state.notes[idx].state = NoteState::Pending;
        let commitment = self.state.notes[idx].commitment();

        let result = (|| {
            let note = self.state.notes[idx].to_note()?;
            let leaf_index = self.state.notes[idx].leaf_index.expect("checked above");
            let path = self.mirror.prove_leaf(leaf_index)?;
            let root = self.mirror.current_root();
            let (witness, pub_in) =
                pool_core::assemble_withdraw(&self.mirror, &note, recipient, root, path)?;
            Ok(Spend::Withdraw(witness, pub_in))
        })();

        if result.is_err() {
            if let Some(note) = self.find_owned_mut(commitment) {
                note.state = NoteState::Owned;
            }
        }
        self.store.save(&self.state)?;
        result
    }

    /// Build a transfer spend splitting the smallest owned note that
    /// strictly covers `send_amount` into a `send_amount` output bound to
    /// `(out_secret, out_nullifier)` and a change note the wallet keeps for
    /// itself. `out_secret`/`out_nullifier` are the recipient's half of the
    /// exchange — this pool has no on-chain address, so the recipient
    /// generates a one-time note key pair (see [`Wallet::reserve_receive_key`])
    /// and hands it to the sender out of band, the same way the teacher's
    /// stealth-address scheme hands over a one-time public key.
    #[allow(clippy::too_many_arguments)]
    pub fn prepare_transfer_to(
        &mut self,
        send_amount: u128,
        out_secret: Field,
        out_nullifier: Field,
    ) -> Result<Spend, EngineError> {
        if self.seed.is_none() {
            return Err(EngineError::Locked);
        }

        let idx = self
            .state
            .notes
            .iter()
            .enumerate()
            .filter(|(_, n)| {
                n.state == NoteState::Owned && n.leaf_index.is_some() && n.amount > send_amount
            })
            .min_by_key(|(_, n)| n.amount)
            .map(|(i, _)| i)
            .ok_or(EngineError::NoSuitableNote {
                requested: send_amount,
                largest: self.owned_notes().iter().map(|n| n.amount).max(),
            })?;

        self.state.notes[idx].state = NoteState::Pending;
        let commitment = self.state.notes[idx].commitment();

        let change_counter = self.state.next_candidate_counter;
        let seed = self.seed.as_ref().expect("checked above");
        let (change_secret, change_nullifier) = seed.candidate(change_counter);

        let result = (|| {
            let note = self.state.notes[idx].to_note()?;
            let leaf_index = self.state.notes[idx].leaf_index.expect("checked above");
            let change_amount = note.amount - send_amount;
            let path = self.mirror.prove_leaf(leaf_index)?;
            let root = self.mirror.current_root();
            let (witness, pub_in) = pool_core::assemble_transfer(
                &self.mirror,
                &note,
                root,
                path,
                out_secret,
                out_nullifier,
                send_amount,
                change_secret,
                change_nullifier,
                change_amount,
            )?;
            Ok((Spend::Transfer(witness, pub_in), change_amount))
        })();

        match result {
            Ok((spend, change_amount)) => {
                self.adopt_new_note(change_secret, change_nullifier, change_amount, change_counter);
                self.store.save(&self.state)?;
                Ok(spend)
            }
            Err(e) => {
                if let Some(note) = self.find_owned_mut(commitment) {
                    note.state = NoteState::Owned;
                }
                self.store.save(&self.state)?;
                Err(e)
            }
        }
    }

    /// Convenience wrapper over [`Wallet::prepare_transfer_to`] for a
    /// same-wallet transfer (e.g. splitting a note without involving another
    /// party): the output note is derived from this wallet's own seed, same
    /// as the change note.
    pub fn prepare_transfer(&mut self, send_amount: u128) -> Result<Spend, EngineError> {
        let (out_secret, out_nullifier, out_counter) = self.reserve_receive_key_inner()?;
        let spend = self.prepare_transfer_to(send_amount, out_secret, out_nullifier)?;
        self.adopt_new_note(out_secret, out_nullifier, send_amount, out_counter);
        self.store.save(&self.state)?;
        Ok(spend)
    }

    /// Preview the `(secret, nullifier)` pair `sync`'s candidate search would
    /// recognize next, without advancing `next_candidate_counter`. Used by a
    /// depositor minting a note for themselves: the commitment computed from
    /// this pair is handed to the chain (a real deposit transaction, or this
    /// workspace's `LocalLedger` stand-in); `sync`'s own lookahead then finds
    /// it and adopts it, the same path a counterparty's transfer takes.
    pub fn peek_next_candidate(&self) -> Result<(Field, Field), EngineError> {
        let seed = self.seed.as_ref().ok_or(EngineError::Locked)?;
        Ok(seed.candidate(self.state.next_candidate_counter))
    }

    /// Reserve and return the next `(secret, nullifier)` candidate pair for
    /// a counterparty to bind an incoming transfer to. The counter is
    /// advanced immediately so two reservations never collide; if the
    /// sender never follows through, the slot is simply never observed
    /// on-chain and costs nothing.
    pub fn reserve_receive_key(&mut self) -> Result<(Field, Field), EngineError> {
        let (secret, nullifier, _) = self.reserve_receive_key_inner()?;
        Ok((secret, nullifier))
    }

    fn reserve_receive_key_inner(&mut self) -> Result<(Field, Field, u64), EngineError> {
        let counter = self.state.next_candidate_counter;
        let (secret, nullifier) = self
            .seed
            .as_ref()
            .ok_or(EngineError::Locked)?
            .candidate(counter);
        self.state.next_candidate_counter = counter + 1;
        self.store.save(&self.state)?;
        Ok((secret, nullifier, counter))
    }

    /// Build a consolidation spend merging the owned notes matching
    /// `commitments` (must be `>= 2`, all currently `Owned` and placed).
    pub fn prepare_consolidate(&mut self, commitments: &[Field]) -> Result<Spend, EngineError> {
        let new_counter = self.state.next_candidate_counter;
        let (new_secret, new_nullifier) = self
            .seed
            .as_ref()
            .ok_or(EngineError::Locked)?
            .candidate(new_counter);

        let mut indices = Vec::with_capacity(commitments.len());
        for commitment in commitments {
            let idx = self
                .state
                .notes
                .iter()
                .position(|n| {
                    n.commitment() == *commitment
                        && n.state == NoteState::Owned
                        && n.leaf_index.is_some()
                })
                .ok_or_else(|| EngineError::NoteNotOwned(commitment.to_hex_short()))?;
            indices.push(idx);
        }

        for &idx in &indices {
            self.state.notes[idx].state = NoteState::Pending;
        }

        let result = (|| {
            let mirror = &self.mirror;
            let mut legs = Vec::with_capacity(indices.len());
            let owned: Vec<pool_core::Note> = indices
                .iter()
                .map(|&idx| self.state.notes[idx].to_note())
                .collect::<Result<Vec<_>, EngineError>>()?;
            for (i, &idx) in indices.iter().enumerate() {
                let leaf_index = self.state.notes[idx].leaf_index.expect("checked above");
                let path = mirror.prove_leaf(leaf_index)?;
                let root = mirror.current_root();
                legs.push((owned[i].clone(), root, path));
            }
            let inputs: Vec<pool_core::ConsolidateInput<'_>> = legs
                .iter()
                .map(|(note, root, path)| pool_core::ConsolidateInput {
                    note,
                    root: *root,
                    path: path.clone(),
                })
                .collect();
            let (witness, pub_in) =
                pool_core::assemble_consolidate(mirror, inputs, new_secret, new_nullifier)?;
            Ok((Spend::Consolidate(witness, pub_in), pub_in_total(&pub_in)))
        })();

        match result {
            Ok((spend, total_amount)) => {
                self.adopt_new_note(new_secret, new_nullifier, total_amount, new_counter);
                self.store.save(&self.state)?;
                Ok(spend)
            }
            Err(e) => {
                for &idx in &indices {
                    self.state.notes[idx].state = NoteState::Owned;
                }
                self.store.save(&self.state)?;
                Err(e)
            }
        }
    }

    /// Explicitly promote a `Pending` note to `Spent` once the caller has
    /// confirmed its spend landed, without waiting for the next `sync`.
    pub fn mark_note_spent(&mut self, commitment: Field) -> Result<(), EngineError> {
        let note = self
            .state
            .notes
            .iter_mut()
            .find(|n| n.commitment() == commitment)
            .ok_or_else(|| EngineError::NoteNotOwned(commitment.to_hex_short()))?;
        note.state = NoteState::Spent;
        self.store.save(&self.state)
    }

    /// Roll a `Pending` note back to `Owned` — used when a prepared spend's
    /// proof or broadcast failed outside of `prepare*`'s own error path
    /// (e.g. the caller held onto the witness and the broadcast later
    /// failed).
    pub fn cancel_pending(&mut self, commitment: Field) -> Result<(), EngineError> {
        let note = self
            .state
            .notes
            .iter_mut()
            .find(|n| n.commitment() == commitment && n.state == NoteState::Pending)
            .ok_or_else(|| EngineError::NoteNotOwned(commitment.to_hex_short()))?;
        note.state = NoteState::Owned;
        self.store.save(&self.state)
    }
}

fn pub_in_total(pub_in: &pool_core::ConsolidatePublicInputs) -> u128 {
    pub_in.total_amount
}

/// Probe `[from, from + LOOKAHEAD)` for a candidate matching `commitment`.
fn find_candidate(
    seed: &WalletSeed,
    from: u64,
    commitment: Field,
    amount: u128,
) -> Option<(Field, Field, u64)> {
    for counter in from..(from + LOOKAHEAD) {
        let (secret, nullifier) = seed.candidate(counter);
        if pool_core::commitment_of(&secret, &nullifier, amount) == commitment {
            return Some((secret, nullifier, counter));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_mirror::FakeChainMirror;
    use crate::storage::InMemoryStore;

    fn deposit_for(seed: &WalletSeed, counter: u64, amount: u128, leaf_index: u32) -> ChainEvent {
        let (secret, nullifier) = seed.candidate(counter);
        let commitment = pool_core::commitment_of(&secret, &nullifier, amount);
        ChainEvent::Deposit {
            commitment,
            amount,
            leaf_index,
            timestamp: 0,
        }
    }

    #[test]
    fn sync_recognizes_deposits_by_candidate_search() {
        let seed = WalletSeed::from_bytes([9u8; 32]);
        let events = vec![deposit_for(&seed, 0, 1_000, 0)];
        let mirror = FakeChainMirror::new(events);
        let mut wallet = Wallet::open(mirror, InMemoryStore::default()).unwrap();
        wallet.unlock_seed(WalletSeed::from_bytes([9u8; 32]));

        let report = wallet.sync().unwrap();
        assert_eq!(report.notes_recognized, 1);
        assert_eq!(wallet.balance(), 1_000);
    }

    #[test]
    fn sync_without_unlock_is_locked() {
        let mirror = FakeChainMirror::new(vec![]);
        let mut wallet = Wallet::open(mirror, InMemoryStore::default()).unwrap();
        assert!(matches!(wallet.sync(), Err(EngineError::Locked)));
    }

    #[test]
    fn sync_ignores_deposits_for_other_wallets() {
        let mine = WalletSeed::from_bytes([1u8; 32]);
        let theirs = WalletSeed::from_bytes([2u8; 32]);
        let events = vec![deposit_for(&theirs, 0, 500, 0)];
        let mirror = FakeChainMirror::new(events);
        let mut wallet = Wallet::open(mirror, InMemoryStore::default()).unwrap();
        wallet.unlock_seed(mine);
        let report = wallet.sync().unwrap();
        assert_eq!(report.notes_recognized, 0);
        assert_eq!(wallet.balance(), 0);
    }

    #[test]
    fn prepare_withdraw_selects_smallest_covering_note_and_takes_it_whole() {
        let seed_bytes = [3u8; 32];
        let seed = WalletSeed::from_bytes(seed_bytes);
        let events = vec![deposit_for(&seed, 0, 777, 0)];
        let mirror = FakeChainMirror::new(events);
        let mut wallet = Wallet::open(mirror, InMemoryStore::default()).unwrap();
        wallet.unlock_seed(WalletSeed::from_bytes(seed_bytes));
        wallet.sync().unwrap();

        assert!(matches!(
            wallet.prepare_withdraw(1_000, Field::from_u128(1)),
            Err(EngineError::NoSuitableNote { .. })
        ));

        let spend = wallet.prepare_withdraw(100, Field::from_u128(1)).unwrap();
        match spend {
            Spend::Withdraw(_, pub_in) => assert_eq!(pub_in.withdraw_amount, 777),
            _ => panic!("expected withdraw"),
        }
        assert_eq!(wallet.balance(), 0); // note is now Pending, not Owned
    }

    #[test]
    fn peek_next_candidate_is_what_sync_recognizes() {
        let seed_bytes = [11u8; 32];
        let seed = WalletSeed::from_bytes(seed_bytes);
        let mirror = FakeChainMirror::new(vec![]);
        let mut wallet = Wallet::open(mirror, InMemoryStore::default()).unwrap();
        wallet.unlock_seed(WalletSeed::from_bytes(seed_bytes));

        let (secret, nullifier) = wallet.peek_next_candidate().unwrap();
        let commitment = pool_core::commitment_of(&secret, &nullifier, 250);

        let events = vec![ChainEvent::Deposit {
            commitment,
            amount: 250,
            leaf_index: 0,
            timestamp: 0,
        }];
        let mut wallet = Wallet::open(FakeChainMirror::new(events), InMemoryStore::default()).unwrap();
        wallet.unlock_seed(seed);
        let report = wallet.sync().unwrap();
        assert_eq!(report.notes_recognized, 1);
        assert_eq!(wallet.balance(), 250);
    }

    #[test]
    fn prepare_transfer_splits_into_output_and_change() {
        let seed_bytes = [4u8; 32];
        let seed = WalletSeed::from_bytes(seed_bytes);
        let events = vec![deposit_for(&seed, 0, 1_000, 0)];
        let mirror = FakeChainMirror::new(events);
        let mut wallet = Wallet::open(mirror, InMemoryStore::default()).unwrap();
        wallet.unlock_seed(WalletSeed::from_bytes(seed_bytes));
        wallet.sync().unwrap();

        let spend = wallet.prepare_transfer(400).unwrap();
        match spend {
            Spend::Transfer(_, pub_in) => {
                assert_eq!(pub_in.out_amount, 400);
                assert_eq!(pub_in.change_amount, 600);
            }
            _ => panic!("expected transfer"),
        }
    }

    /// Spec §8 scenario S6: the wallet holds notes for leaves 0, 1, 2; the
    /// chain mirror rolls back to leaf 1 and appends two different leaves in
    /// 2 and 3's place. Reconciliation must drop the note that was at leaf 2
    /// without losing its secret material, and reinstate it if the same
    /// commitment is later re-observed.
    #[test]
    fn reorg_quarantines_orphaned_note_and_reinstates_on_reappearance() {
        let seed_bytes = [5u8; 32];
        let seed = WalletSeed::from_bytes(seed_bytes);

        let original = vec![
            deposit_for(&seed, 0, 100, 0),
            deposit_for(&seed, 1, 200, 1),
            deposit_for(&seed, 2, 300, 2),
        ];
        let mirror = FakeChainMirror::new(original);
        let mut wallet = Wallet::open(&mirror, InMemoryStore::default()).unwrap();
        wallet.unlock_seed(WalletSeed::from_bytes(seed_bytes));
        let report = wallet.sync().unwrap();
        assert_eq!(report.notes_recognized, 3);
        assert_eq!(wallet.balance(), 600);

        // Chain rolls back to leaf 1 and replays two unrelated leaves at
        // indices 2 and 3 — the wallet's leaf-2 note (amount 300) no longer
        // has a matching commitment anywhere on the new chain.
        let reorged = vec![
            deposit_for(&seed, 0, 100, 0),
            deposit_for(&seed, 1, 200, 1),
            ChainEvent::Deposit {
                commitment: Field::from_u128(0xDEAD),
                amount: 999,
                leaf_index: 2,
                timestamp: 0,
            },
            ChainEvent::Deposit {
                commitment: Field::from_u128(0xBEEF),
                amount: 999,
                leaf_index: 3,
                timestamp: 0,
            },
        ];
        mirror.replace_events(reorged);

        let report = wallet.sync().unwrap();
        assert_eq!(report.notes_quarantined, 1);
        assert_eq!(wallet.balance(), 300, "only the surviving leaf-0/leaf-1 notes count");

        // The secret material survives in quarantine, not destroyed.
        let quarantined_amount: u128 = wallet
            .state
            .quarantine
            .iter()
            .map(|n| n.amount)
            .sum();
        assert_eq!(quarantined_amount, 300);

        // The original leaf-2 commitment reappears (e.g. the reorg was
        // itself reorged back) at a new index — the note is reinstated, not
        // re-derived as a fresh candidate.
        let reinstated = vec![
            deposit_for(&seed, 0, 100, 0),
            deposit_for(&seed, 1, 200, 1),
            ChainEvent::Deposit {
                commitment: Field::from_u128(0xDEAD),
                amount: 999,
                leaf_index: 2,
                timestamp: 0,
            },
            deposit_for(&seed, 2, 300, 3),
        ];
        mirror.replace_events(reinstated);

        let report = wallet.sync().unwrap();
        assert_eq!(report.notes_reinstated, 1);
        assert_eq!(wallet.balance(), 600);
        assert!(wallet.state.quarantine.is_empty());
    }
}
