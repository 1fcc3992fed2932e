//! Circuit builder.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::operation::Operation;
use crate::qubit::QubitId;

/// An ordered list of operations over `num_qubits` logical qubits.
///
/// Operation order is program order. Qubit ids are checked on insertion,
/// so a circuit built through [`Circuit::push`] is always well-formed.
/// Circuits obtained by deserialization should be checked with
/// [`Circuit::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit<P> {
    num_qubits: u32,
    #[serde(default = "Vec::new")]
    operations: Vec<Operation<P>>,
}

impl<P> Circuit<P> {
    /// Create an empty circuit over `num_qubits` logical qubits.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            operations: Vec::new(),
        }
    }

    /// Build a circuit from a list of operations, validating every one.
    pub fn from_operations(
        num_qubits: u32,
        operations: impl IntoIterator<Item = Operation<P>>,
    ) -> IrResult<Self> {
        let mut circuit = Self::new(num_qubits);
        for op in operations {
            circuit.push(op)?;
        }
        Ok(circuit)
    }

    /// Append an operation.
    pub fn push(&mut self, op: Operation<P>) -> IrResult<&mut Self> {
        self.check(&op)?;
        self.operations.push(op);
        Ok(self)
    }

    /// Append a single-qubit operation.
    pub fn single(&mut self, qubit: impl Into<QubitId>, payload: P) -> IrResult<&mut Self> {
        self.push(Operation::single(qubit, payload))
    }

    /// Append a two-qubit operation.
    pub fn two_qubit(
        &mut self,
        control: impl Into<QubitId>,
        target: impl Into<QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Operation::two_qubit(control, target))
    }

    /// Number of logical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The operations in program order.
    #[inline]
    pub fn operations(&self) -> &[Operation<P>] {
        &self.operations
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Iterate over the `(control, target)` pairs of two-qubit operations,
    /// in program order.
    pub fn two_qubit_pairs(&self) -> impl Iterator<Item = (QubitId, QubitId)> + '_ {
        self.operations.iter().filter_map(Operation::as_pair)
    }

    /// Number of two-qubit operations.
    pub fn num_two_qubit_ops(&self) -> usize {
        self.two_qubit_pairs().count()
    }

    /// Re-check every operation against the declared qubit count.
    pub fn validate(&self) -> IrResult<()> {
        self.operations.iter().try_for_each(|op| self.check(op))
    }

    fn check(&self, op: &Operation<P>) -> IrResult<()> {
        match *op {
            Operation::Single { qubit, .. } => self.check_qubit(qubit),
            Operation::TwoQubit { control, target } => {
                self.check_qubit(control)?;
                self.check_qubit(target)?;
                if control == target {
                    return Err(IrError::DuplicateQubit { qubit: control });
                }
                Ok(())
            }
        }
    }

    fn check_qubit(&self, qubit: QubitId) -> IrResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(IrError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chains() {
        let mut circuit = Circuit::new(3);
        circuit
            .single(0_u32, "h")
            .unwrap()
            .two_qubit(0_u32, 1_u32)
            .unwrap()
            .two_qubit(1_u32, 2_u32)
            .unwrap();

        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.num_two_qubit_ops(), 2);
        let pairs: Vec<_> = circuit.two_qubit_pairs().collect();
        assert_eq!(
            pairs,
            vec![(QubitId(0), QubitId(1)), (QubitId(1), QubitId(2))]
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut circuit: Circuit<&str> = Circuit::new(2);
        let err = circuit.two_qubit(0_u32, 2_u32).unwrap_err();
        assert_eq!(
            err,
            IrError::QubitOutOfRange {
                qubit: QubitId(2),
                num_qubits: 2
            }
        );
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut circuit: Circuit<&str> = Circuit::new(2);
        let err = circuit.two_qubit(1_u32, 1_u32).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_validate_after_deserialize() {
        let bad: Circuit<String> = serde_json::from_str(
            r#"{"num_qubits": 2, "operations": [{"two_qubit": {"control": 0, "target": 4}}]}"#,
        )
        .unwrap();
        assert!(bad.validate().is_err());

        let good: Circuit<String> = serde_json::from_str(
            r#"{"num_qubits": 2, "operations": [{"single": {"qubit": 1, "payload": "x"}}]}"#,
        )
        .unwrap();
        assert!(good.validate().is_ok());
    }
}
