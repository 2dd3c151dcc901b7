//! Bit-packed boolean matrix tracking forbidden edges
//!
//! Indexed by original `(src, dst)` node indices. A set bit means the edge
//! may no longer be committed.

const WORD_BITS: usize = u64::BITS as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolMatrix {
    size: usize,
    words: Vec<u64>,
}

impl BoolMatrix {
    /// All-clear `size x size` matrix
    pub fn new(size: usize) -> Self {
        let bits = size * size;
        Self {
            size,
            words: vec![0; bits.div_ceil(WORD_BITS)],
        }
    }

    /// Matrix with the diagonal already set, so no self-loop is eligible
    pub fn with_diagonal(size: usize) -> Self {
        let mut matrix = Self::new(size);
        for i in 0..size {
            matrix.set(i, i, true);
        }
        matrix
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> bool {
        let bit = self.bit(row, column);
        self.words[bit / WORD_BITS] & (1 << (bit % WORD_BITS)) != 0
    }

    #[inline]
    pub fn set(&mut self, row: usize, column: usize, value: bool) {
        let bit = self.bit(row, column);
        let mask = 1u64 << (bit % WORD_BITS);
        let word = &mut self.words[bit / WORD_BITS];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Number of set cells
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    #[inline]
    fn bit(&self, row: usize, column: usize) -> usize {
        debug_assert!(row < self.size && column < self.size);
        row * self.size + column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_initialisation() {
        let matrix = BoolMatrix::with_diagonal(5);
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(matrix.get(i, j), i == j);
            }
        }
        assert_eq!(matrix.count(), 5);
    }

    #[test]
    fn test_set_and_clear_across_word_boundary() {
        // 9 x 9 = 81 bits spans two words
        let mut matrix = BoolMatrix::new(9);
        matrix.set(7, 1, true);
        matrix.set(8, 8, true);
        assert!(matrix.get(7, 1));
        assert!(matrix.get(8, 8));
        assert!(!matrix.get(1, 7));

        matrix.set(7, 1, false);
        assert!(!matrix.get(7, 1));
        assert_eq!(matrix.count(), 1);
    }
}
