use crate::error::{BracketKind, EngineError};

/// Matching bracket positions for O(1) jumps.
///
/// `targets[i]` holds the partner index for a `[` or `]` at index `i`;
/// every other position is `None`. The mapping is symmetric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpTable {
    targets: Vec<Option<usize>>,
    pairs: usize,
}

impl JumpTable {
    /// Link every `[` with its `]` in one pass over `program`.
    ///
    /// Fails with [`EngineError::UnbalancedJump`] at the first `]` that has no
    /// open loop, or, after the pass, at the innermost `[` left open.
    pub fn build(program: &[u8]) -> Result<Self, EngineError> {
        let mut targets: Vec<Option<usize>> = vec![None; program.len()];
        let mut pairs = 0;
        let mut stack: Vec<usize> = Vec::new();

        for (i, &byte) in program.iter().enumerate() {
            if byte == b'[' {
                stack.push(i);
            } else if byte == b']' {
                let Some(open_index) = stack.pop() else {
                    return Err(EngineError::UnbalancedJump {
                        ip: i,
                        kind: BracketKind::Close,
                    });
                };
                targets[open_index] = Some(i);
                targets[i] = Some(open_index);
                pairs += 1;
            }
        }

        if let Some(unmatched_open) = stack.last().copied() {
            return Err(EngineError::UnbalancedJump {
                ip: unmatched_open,
                kind: BracketKind::Open,
            });
        }

        Ok(Self { targets, pairs })
    }

    /// Partner of the bracket at `index`.
    pub fn get(&self, index: usize) -> Option<usize> {
        self.targets.get(index).copied().flatten()
    }

    /// Number of mapped indices (twice the number of bracket pairs).
    pub fn len(&self) -> usize {
        self.pairs * 2
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    pub fn pairs(&self) -> usize {
        self.pairs
    }

    /// Mapped `(from, to)` entries in ascending `from` order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|j| (i, j)))
    }
}
