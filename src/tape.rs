use crate::error::TapeError;

/// Number of cells in a tape built with [`Tape::default`].
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// A fixed-capacity strip of byte cells with a single head.
///
/// Cells start at zero and never grow. Cell arithmetic wraps at 8 bits.
/// A zero-capacity tape is valid to construct but rejects every access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Box<[u8]>,
    head: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(DEFAULT_TAPE_SIZE)
    }
}

impl Tape {
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![0; capacity].into_boxed_slice(),
            head: 0,
        }
    }

    /// Like [`Tape::new`], but reports a size the allocator refuses instead
    /// of aborting.
    pub fn try_new(capacity: usize) -> Result<Self, TapeError> {
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(capacity)
            .map_err(|_| TapeError::Allocation { capacity })?;
        cells.resize(capacity, 0);
        Ok(Self {
            cells: cells.into_boxed_slice(),
            head: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Current head index. Always a valid cell index when `capacity() > 0`.
    pub fn current_address(&self) -> usize {
        self.head
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn move_to(&mut self, address: usize) -> Result<(), TapeError> {
        if self.cells.is_empty() {
            return Err(TapeError::HeadPointer);
        }
        if address >= self.cells.len() {
            return Err(TapeError::RangeOverflow {
                address,
                capacity: self.cells.len(),
            });
        }
        self.head = address;
        Ok(())
    }

    pub fn shift_right(&mut self) -> Result<(), TapeError> {
        if self.cells.is_empty() {
            return Err(TapeError::Shift);
        }
        if self.head >= self.cells.len() - 1 {
            return Err(TapeError::RangeOverflow {
                address: self.head + 1,
                capacity: self.cells.len(),
            });
        }
        self.head += 1;
        Ok(())
    }

    pub fn shift_left(&mut self) -> Result<(), TapeError> {
        if self.head == 0 {
            return Err(TapeError::RangeUnderflow);
        }
        self.head -= 1;
        Ok(())
    }

    pub fn increment(&mut self) -> Result<(), TapeError> {
        let cell = self.cell_mut()?;
        *cell = cell.wrapping_add(1);
        Ok(())
    }

    pub fn decrement(&mut self) -> Result<(), TapeError> {
        let cell = self.cell_mut()?;
        *cell = cell.wrapping_sub(1);
        Ok(())
    }

    pub fn write(&mut self, byte: u8) -> Result<(), TapeError> {
        *self.cell_mut()? = byte;
        Ok(())
    }

    pub fn read(&self) -> Result<u8, TapeError> {
        self.cells.get(self.head).copied().ok_or(TapeError::Read)
    }

    /// Zero every cell and park the head at 0.
    pub fn reset(&mut self) {
        self.cells.fill(0);
        self.head = 0;
    }

    fn cell_mut(&mut self) -> Result<&mut u8, TapeError> {
        self.cells.get_mut(self.head).ok_or(TapeError::Write)
    }
}
