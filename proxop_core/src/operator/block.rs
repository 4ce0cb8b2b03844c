//! Linear operator block

use num_traits::Float;
use crate::operator::{LinAlg, OpError};

/// Position of a block inside an enclosing operator.
///
/// The block contributes to result rows `row..row + nrows` and reads argument
/// columns `col..col + ncols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement
{
    pub row: usize,
    pub col: usize,
    pub nrows: usize,
    pub ncols: usize,
}

impl Placement
{
    /// Creates an instance.
    pub fn new(row: usize, col: usize, nrows: usize, ncols: usize) -> Self
    {
        Placement {row, col, nrows, ncols}
    }

    /// Checks that the block lies inside an operator of `nrows` rows and `ncols` columns.
    pub fn fits(&self, nrows: usize, ncols: usize) -> bool
    {
        self.row + self.nrows <= nrows && self.col + self.ncols <= ncols
    }

    /// Checks whether two blocks share any matrix entry.
    pub fn overlaps(&self, other: &Placement) -> bool
    {
        let rows = self.row < other.row + other.nrows && other.row < self.row + self.nrows;
        let cols = self.col < other.col + other.ncols && other.col < self.col + self.ncols;

        rows && cols
    }
}

/// Calculates \\(|v|^\alpha\\), exactly for \\(\alpha \in \lbrace 1, 2 \rbrace\\).
pub fn abs_pow<F: Float>(v: F, alpha: F) -> F
{
    let f1 = F::one();

    if alpha == f1 {
        v.abs()
    }
    else if alpha == f1 + f1 {
        v * v
    }
    else {
        v.abs().powf(alpha)
    }
}

/// Linear operator block trait.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Expresses a sub-matrix \\(M \in \mathbb{R}^{m \times n}\\) placed inside a larger block matrix.
/// Every block of an operator adds its contribution into a shared result array.
///
/// The device data of a block exists only between [`Block::initialize`] and [`Block::release`];
/// the `eval_*` methods fail with [`OpError::NotInitialized`] outside that window.
pub trait Block<L: LinAlg>
{
    /// Placement inside the enclosing operator.
    fn placement(&self) -> Placement;

    /// Allocates and uploads the device data.
    fn initialize(&mut self) -> Result<(), OpError>;

    /// Frees the device data.
    fn release(&mut self);

    /// Whether the device data is present.
    fn is_initialized(&self) -> bool;

    /// Calculates \\(\sum_j |M_{ij}|^\alpha\\) for a local row \\(i\\), starting at 0.
    fn row_sum(&self, row: usize, alpha: L::F) -> L::F;

    /// Calculates \\(\sum_i |M_{ij}|^\alpha\\) for a local column \\(j\\), starting at 0.
    fn col_sum(&self, col: usize, alpha: L::F) -> L::F;

    /// Bytes of device memory held while initialized.
    fn gpu_mem_amount(&self) -> usize;

    /// Calculates `res` \\(\leftarrow\\) `res` \\(+ M\\) `rhs` on local ranges.
    ///
    /// `res` has exactly \\(m\\) elements and `rhs` exactly \\(n\\).
    fn eval_local_add(&self, res: &mut [L::F], rhs: &[L::F]) -> Result<(), OpError>;

    /// Calculates `res` \\(\leftarrow\\) `res` \\(+ M^T\\) `rhs` on local ranges.
    ///
    /// `res` has exactly \\(n\\) elements and `rhs` exactly \\(m\\).
    fn eval_adjoint_local_add(&self, res: &mut [L::F], rhs: &[L::F]) -> Result<(), OpError>;

    fn row(&self) -> usize
    {
        self.placement().row
    }

    fn col(&self) -> usize
    {
        self.placement().col
    }

    fn nrows(&self) -> usize
    {
        self.placement().nrows
    }

    fn ncols(&self) -> usize
    {
        self.placement().ncols
    }

    /// Calculates `result[row..row + nrows]` \\(+= M\\) `rhs[col..col + ncols]`.
    ///
    /// Nothing outside those two ranges is read or written.
    fn eval_add(&self, result: &mut [L::F], rhs: &[L::F]) -> Result<(), OpError>
    {
        let p = self.placement();

        if !self.is_initialized() {
            log::error!("block at ({}, {}) evaluated while not initialized", p.row, p.col);
            return Err(OpError::NotInitialized);
        }
        if result.len() < p.row + p.nrows || rhs.len() < p.col + p.ncols {
            log::error!("block at ({}, {}) of size {}x{}: result {} / rhs {} too short",
                p.row, p.col, p.nrows, p.ncols, result.len(), rhs.len());
            return Err(OpError::OutOfRange);
        }

        self.eval_local_add(
            &mut result[p.row.. p.row + p.nrows],
            &rhs[p.col.. p.col + p.ncols]
        )
    }

    /// Calculates `result[col..col + ncols]` \\(+= M^T\\) `rhs[row..row + nrows]`.
    fn eval_adjoint_add(&self, result: &mut [L::F], rhs: &[L::F]) -> Result<(), OpError>
    {
        let p = self.placement();

        if !self.is_initialized() {
            log::error!("block at ({}, {}) evaluated while not initialized", p.row, p.col);
            return Err(OpError::NotInitialized);
        }
        if result.len() < p.col + p.ncols || rhs.len() < p.row + p.nrows {
            log::error!("adjoint of block at ({}, {}) of size {}x{}: result {} / rhs {} too short",
                p.row, p.col, p.nrows, p.ncols, result.len(), rhs.len());
            return Err(OpError::OutOfRange);
        }

        self.eval_adjoint_local_add(
            &mut result[p.col.. p.col + p.ncols],
            &rhs[p.row.. p.row + p.nrows]
        )
    }
}

//

#[test]
fn test_placement1()
{
    let a = Placement::new(0, 0, 2, 3);
    let b = Placement::new(2, 0, 1, 3);
    let c = Placement::new(1, 2, 4, 1);

    assert!(!a.overlaps(&b));
    assert!(a.overlaps(&c));
    assert!(b.overlaps(&c));
    assert!(a.fits(3, 3));
    assert!(!c.fits(4, 3));
}

#[test]
fn test_abs_pow1()
{
    assert_eq!(abs_pow(-3., 1.), 3.);
    assert_eq!(abs_pow(-3., 2.), 9.);
    assert_eq!(abs_pow(0.1_f64, 2.), 0.1 * 0.1);
}
