#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Ord, PartialOrd)]
pub struct SideLength(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellsCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct PassagesCount(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowIndex(pub usize);

impl SideLength {
    /// Number of cells in a square grid of this side length.
    /// Panics on overflow, check with `checked_cells` first for untrusted side lengths.
    #[inline]
    pub fn cells(&self) -> CellsCount {
        CellsCount(self.0 * self.0)
    }

    /// Number of cells, or None if it does not fit in a `usize`.
    #[inline]
    pub fn checked_cells(&self) -> Option<CellsCount> {
        self.0.checked_mul(self.0).map(CellsCount)
    }

    /// Passage count of a perfect maze on this grid, one less than the cell count.
    #[inline]
    pub fn spanning_tree_passages(&self) -> PassagesCount {
        PassagesCount(self.cells().0.saturating_sub(1))
    }
}
