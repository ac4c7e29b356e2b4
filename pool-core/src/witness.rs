//! Witness assembler (spec §4.E): builds the private witness handed to the
//! external prover and the ordered public inputs the on-chain verifier binds,
//! for each of the three spend variants.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field::Field;
use crate::merkle::{MerkleAccumulator, MerklePath, TREE_DEPTH};
use crate::note::{commitment_of, Note};

/// Private witness for a withdraw spend.
#[derive(Clone, Serialize, Deserialize)]
pub struct WithdrawWitness {
    pub secret: Field,
    pub nullifier: Field,
    pub amount: u128,
    pub merkle_path: [Field; TREE_DEPTH],
    pub merkle_indices: [u8; TREE_DEPTH],
}

/// Ordered public inputs for a withdraw spend:
/// `[nullifierHash, merkleRoot, withdrawAmount, recipient]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawPublicInputs {
    pub nullifier_hash: Field,
    pub merkle_root: Field,
    pub withdraw_amount: u128,
    pub recipient: Field,
}

impl WithdrawPublicInputs {
    pub fn ordered(&self) -> Vec<Field> {
        vec![
            self.nullifier_hash,
            self.merkle_root,
            Field::from_u128(self.withdraw_amount),
            self.recipient,
        ]
    }
}

/// Private witness for a transfer spend.
#[derive(Clone, Serialize, Deserialize)]
pub struct TransferWitness {
    pub secret: Field,
    pub nullifier: Field,
    pub amount: u128,
    pub merkle_path: [Field; TREE_DEPTH],
    pub merkle_indices: [u8; TREE_DEPTH],
    pub out_secret: Field,
    pub out_nullifier: Field,
    pub out_amount: u128,
    pub change_secret: Field,
    pub change_nullifier: Field,
    pub change_amount: u128,
}

/// Ordered public inputs for a transfer spend:
/// `[nullifierHash, merkleRoot, outCommitment, outAmount, changeCommitment, changeAmount]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPublicInputs {
    pub nullifier_hash: Field,
    pub merkle_root: Field,
    pub out_commitment: Field,
    pub out_amount: u128,
    pub change_commitment: Field,
    pub change_amount: u128,
}

impl TransferPublicInputs {
    pub fn ordered(&self) -> Vec<Field> {
        vec![
            self.nullifier_hash,
            self.merkle_root,
            self.out_commitment,
            Field::from_u128(self.out_amount),
            self.change_commitment,
            Field::from_u128(self.change_amount),
        ]
    }
}

/// One input leg of a consolidation; identical shape to a withdraw witness.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConsolidateInputWitness {
    pub secret: Field,
    pub nullifier: Field,
    pub amount: u128,
    pub merkle_path: [Field; TREE_DEPTH],
    pub merkle_indices: [u8; TREE_DEPTH],
}

/// Public inputs for one consolidation leg: `[nullifierHash_i, merkleRoot_i, amount_i]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidateInputPublicInputs {
    pub nullifier_hash: Field,
    pub merkle_root: Field,
    pub amount: u128,
}

/// Full consolidation witness: N input legs plus the shared new-note material.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConsolidateWitness {
    pub inputs: Vec<ConsolidateInputWitness>,
    pub new_secret: Field,
    pub new_nullifier: Field,
    pub total_amount: u128,
}

/// Ordered public inputs for a consolidation: per-input triples followed by
/// the singular `[newCommitment, totalAmount]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatePublicInputs {
    pub per_input: Vec<ConsolidateInputPublicInputs>,
    pub new_commitment: Field,
    pub total_amount: u128,
}

impl ConsolidatePublicInputs {
    pub fn ordered(&self) -> Vec<Field> {
        let mut out = Vec::with_capacity(self.per_input.len() * 3 + 2);
        for leg in &self.per_input {
            out.push(leg.nullifier_hash);
            out.push(leg.merkle_root);
            out.push(Field::from_u128(leg.amount));
        }
        out.push(self.new_commitment);
        out.push(Field::from_u128(self.total_amount));
        out
    }
}

/// Tagged union over the three spend variants, each holding its own witness
/// and public inputs (spec §9 re-architecture note: no dynamic dispatch
/// needed, a single `public_inputs` accessor suffices).
pub enum Spend {
    Withdraw(WithdrawWitness, WithdrawPublicInputs),
    Transfer(TransferWitness, TransferPublicInputs),
    Consolidate(ConsolidateWitness, ConsolidatePublicInputs),
}

impl Spend {
    pub fn public_inputs(&self) -> Vec<Field> {
        match self {
            Spend::Withdraw(_, pub_in) => pub_in.ordered(),
            Spend::Transfer(_, pub_in) => pub_in.ordered(),
            Spend::Consolidate(_, pub_in) => pub_in.ordered(),
        }
    }
}

fn require_known_root(acc: &MerkleAccumulator, root: Field) -> Result<(), CoreError> {
    if acc.is_known_root(&root) {
        Ok(())
    } else {
        Err(CoreError::RootExpired)
    }
}

/// Build a withdraw witness. `withdraw_amount` must equal `note.amount`
/// bit-exactly — this variant has no partial withdraws.
pub fn assemble_withdraw(
    acc: &MerkleAccumulator,
    note: &Note,
    recipient: Field,
    root: Field,
    path: MerklePath,
) -> Result<(WithdrawWitness, WithdrawPublicInputs), CoreError> {
    require_known_root(acc, root)?;

    let witness = WithdrawWitness {
        secret: note.secret(),
        nullifier: note.nullifier(),
        amount: note.amount,
        merkle_path: path.siblings,
        merkle_indices: path.indices,
    };
    let public_inputs = WithdrawPublicInputs {
        nullifier_hash: note.nullifier_hash(),
        merkle_root: root,
        withdraw_amount: note.amount,
        recipient,
    };
    Ok((witness, public_inputs))
}

/// Build a transfer witness. Pre-flight conservation check mirrors the
/// circuit's canonical constraint: `out_amount + change_amount == input.amount`.
#[allow(clippy::too_many_arguments)]
pub fn assemble_transfer(
    acc: &MerkleAccumulator,
    note: &Note,
    root: Field,
    path: MerklePath,
    out_secret: Field,
    out_nullifier: Field,
    out_amount: u128,
    change_secret: Field,
    change_nullifier: Field,
    change_amount: u128,
) -> Result<(TransferWitness, TransferPublicInputs), CoreError> {
    require_known_root(acc, root)?;

    let sum = out_amount.checked_add(change_amount).ok_or(CoreError::AmountMismatch {
        lhs: note.amount,
        rhs: u128::MAX,
    })?;
    if sum != note.amount {
        return Err(CoreError::AmountMismatch {
            lhs: note.amount,
            rhs: sum,
        });
    }

    let witness = TransferWitness {
        secret: note.secret(),
        nullifier: note.nullifier(),
        amount: note.amount,
        merkle_path: path.siblings,
        merkle_indices: path.indices,
        out_secret,
        out_nullifier,
        out_amount,
        change_secret,
        change_nullifier,
        change_amount,
    };
    let public_inputs = TransferPublicInputs {
        nullifier_hash: note.nullifier_hash(),
        merkle_root: root,
        out_commitment: commitment_of(&out_secret, &out_nullifier, out_amount),
        out_amount,
        change_commitment: commitment_of(&change_secret, &change_nullifier, change_amount),
        change_amount,
    };
    Ok((witness, public_inputs))
}

/// One already-proved input note, ready to fold into a consolidation.
pub struct ConsolidateInput<'a> {
    pub note: &'a Note,
    pub root: Field,
    pub path: MerklePath,
}

/// Build a consolidation witness over N >= 2 input notes into a single new
/// note of the summed amount.
pub fn assemble_consolidate(
    acc: &MerkleAccumulator,
    inputs: Vec<ConsolidateInput<'_>>,
    new_secret: Field,
    new_nullifier: Field,
) -> Result<(ConsolidateWitness, ConsolidatePublicInputs), CoreError> {
    if inputs.len() < 2 {
        return Err(CoreError::ConsolidationTooSmall(inputs.len()));
    }

    let mut legs = Vec::with_capacity(inputs.len());
    let mut per_input = Vec::with_capacity(inputs.len());
    let mut total: u128 = 0;

    for input in &inputs {
        require_known_root(acc, input.root)?;
        total = total
            .checked_add(input.note.amount)
            .ok_or(CoreError::AmountMismatch { lhs: total, rhs: u128::MAX })?;

        legs.push(ConsolidateInputWitness {
            secret: input.note.secret(),
            nullifier: input.note.nullifier(),
            amount: input.note.amount,
            merkle_path: input.path.siblings,
            merkle_indices: input.path.indices,
        });
        per_input.push(ConsolidateInputPublicInputs {
            nullifier_hash: input.note.nullifier_hash(),
            merkle_root: input.root,
            amount: input.note.amount,
        });
    }

    let witness = ConsolidateWitness {
        inputs: legs,
        new_secret,
        new_nullifier,
        total_amount: total,
    };
    let public_inputs = ConsolidatePublicInputs {
        per_input,
        new_commitment: commitment_of(&new_secret, &new_nullifier, total),
        total_amount: total,
    };
    Ok((witness, public_inputs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_acc_with_note(amount: u128) -> (MerkleAccumulator, Note, Field, MerklePath) {
        let mut acc = MerkleAccumulator::new();
        let note = Note::new(amount).unwrap();
        let (idx, root) = acc.append(note.commitment()).unwrap();
        let path = acc.prove_leaf(idx).unwrap();
        (acc, note, root, path)
    }

    #[test]
    fn withdraw_public_inputs_order() {
        let (acc, note, root, path) = fresh_acc_with_note(1000);
        let recipient = Field::from_u128(0xA001);
        let (_, pub_in) = assemble_withdraw(&acc, &note, recipient, root, path).unwrap();
        assert_eq!(
            pub_in.ordered(),
            vec![
                note.nullifier_hash(),
                root,
                Field::from_u128(1000),
                recipient
            ]
        );
    }

    #[test]
    fn withdraw_against_expired_root_fails() {
        let (mut acc, note, root, path) = fresh_acc_with_note(1000);
        for i in 0..crate::merkle::ROOT_HISTORY_SIZE {
            acc.append(Field::from_u128(9000 + i as u128)).unwrap();
        }
        let recipient = Field::from_u128(1);
        assert_eq!(
            assemble_withdraw(&acc, &note, recipient, root, path),
            Err(CoreError::RootExpired)
        );
    }

    #[test]
    fn transfer_conservation_accepts_exact_split() {
        let (acc, note, root, path) = fresh_acc_with_note(500);
        let out_s = Field::from_u128(1);
        let out_n = Field::from_u128(2);
        let chg_s = Field::from_u128(3);
        let chg_n = Field::from_u128(4);
        let result = assemble_transfer(&acc, &note, root, path, out_s, out_n, 300, chg_s, chg_n, 200);
        assert!(result.is_ok());
    }

    #[test]
    fn transfer_conservation_rejects_mismatch() {
        let (acc, note, root, path) = fresh_acc_with_note(500);
        let out_s = Field::from_u128(1);
        let out_n = Field::from_u128(2);
        let chg_s = Field::from_u128(3);
        let chg_n = Field::from_u128(4);
        let result = assemble_transfer(&acc, &note, root, path, out_s, out_n, 300, chg_s, chg_n, 201);
        assert_eq!(
            result.err(),
            Some(CoreError::AmountMismatch { lhs: 500, rhs: 501 })
        );
    }

    #[test]
    fn consolidate_requires_at_least_two_inputs() {
        let mut acc = MerkleAccumulator::new();
        let note = Note::new(100).unwrap();
        let (idx, root) = acc.append(note.commitment()).unwrap();
        let path = acc.prove_leaf(idx).unwrap();
        let inputs = vec![ConsolidateInput { note: &note, root, path }];
        let result = assemble_consolidate(&acc, inputs, Field::from_u128(1), Field::from_u128(2));
        assert_eq!(result.err(), Some(CoreError::ConsolidationTooSmall(1)));
    }

    #[test]
    fn consolidate_sums_amounts_and_places_new_commitment() {
        let mut acc = MerkleAccumulator::new();
        let n1 = Note::new(100).unwrap();
        let n2 = Note::new(250).unwrap();
        let n3 = Note::new(150).unwrap();
        let (i1, r1) = acc.append(n1.commitment()).unwrap();
        let (i2, r2) = acc.append(n2.commitment()).unwrap();
        let (i3, r3) = acc.append(n3.commitment()).unwrap();
        let p1 = acc.prove_leaf(i1).unwrap();
        let p2 = acc.prove_leaf(i2).unwrap();
        let p3 = acc.prove_leaf(i3).unwrap();

        let inputs = vec![
            ConsolidateInput { note: &n1, root: r1, path: p1 },
            ConsolidateInput { note: &n2, root: r2, path: p2 },
            ConsolidateInput { note: &n3, root: r3, path: p3 },
        ];
        let new_secret = Field::from_u128(11);
        let new_nullifier = Field::from_u128(22);
        let (witness, pub_in) = assemble_consolidate(&acc, inputs, new_secret, new_nullifier).unwrap();

        assert_eq!(witness.total_amount, 500);
        assert_eq!(pub_in.total_amount, 500);
        assert_eq!(
            pub_in.new_commitment,
            commitment_of(&new_secret, &new_nullifier, 500)
        );
        assert_eq!(pub_in.per_input.len(), 3);
    }
}
