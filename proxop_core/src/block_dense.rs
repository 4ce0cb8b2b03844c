use num_traits::{One, Zero};
use alloc::vec::Vec;
use crate::operator::{Block, LinAlg, OpError, Placement, DevBuf, abs_pow};

//

/// Dense block
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Holds a general matrix \\(M\\) in column-major order and evaluates it by [`LinAlg::transform_ge`].
pub struct BlockDense<L: LinAlg>
{
    placement: Placement,
    host: Vec<L::F>,
    dev: Option<DevBuf<L::F>>,
}

impl<L: LinAlg> BlockDense<L>
{
    /// Creates an instance.
    ///
    /// Returns [`BlockDense`] instance, or `Err` with [`OpError::DimMismatch`]
    /// if `array` does not hold `nrows * ncols` elements.
    /// * `array` is column-major matrix data.
    pub fn new(row: usize, col: usize, nrows: usize, ncols: usize, array: &[L::F]) -> Result<Self, OpError>
    {
        if nrows == 0 || ncols == 0 || array.len() != nrows * ncols {
            log::error!("dense block {}x{} given {} elements", nrows, ncols, array.len());
            return Err(OpError::DimMismatch);
        }

        Ok(BlockDense {
            placement: Placement::new(row, col, nrows, ncols),
            host: array.to_vec(),
            dev: None,
        })
    }

    fn op_impl(&self, transpose: bool, res: &mut [L::F], rhs: &[L::F]) -> Result<(), OpError>
    {
        let dev = self.dev.as_ref().ok_or(OpError::NotInitialized)?;
        let (nr, nc) = (self.placement.nrows, self.placement.ncols);
        let f1 = L::F::one();

        L::transform_ge(transpose, nr, nc, f1, dev, rhs, f1, res);
        Ok(())
    }
}

impl<L: LinAlg> Block<L> for BlockDense<L>
{
    fn placement(&self) -> Placement
    {
        self.placement
    }

    fn initialize(&mut self) -> Result<(), OpError>
    {
        self.dev = Some(DevBuf::upload(&self.host)?);

        log::debug!("dense block at ({}, {}): {} bytes", self.placement.row, self.placement.col, self.gpu_mem_amount());
        Ok(())
    }

    fn release(&mut self)
    {
        self.dev = None;
    }

    fn is_initialized(&self) -> bool
    {
        self.dev.is_some()
    }

    fn row_sum(&self, row: usize, alpha: L::F) -> L::F
    {
        assert!(row < self.placement.nrows);
        let nr = self.placement.nrows;

        self.host.iter().skip(row).step_by(nr)
            .fold(L::F::zero(), |s, v| s + abs_pow(*v, alpha))
    }

    fn col_sum(&self, col: usize, alpha: L::F) -> L::F
    {
        assert!(col < self.placement.ncols);
        let nr = self.placement.nrows;

        self.host[col * nr.. (col + 1) * nr].iter()
            .fold(L::F::zero(), |s, v| s + abs_pow(*v, alpha))
    }

    fn gpu_mem_amount(&self) -> usize
    {
        self.host.len() * core::mem::size_of::<L::F>()
    }

    fn eval_local_add(&self, res: &mut [L::F], rhs: &[L::F]) -> Result<(), OpError>
    {
        self.op_impl(false, res, rhs)
    }

    fn eval_adjoint_local_add(&self, res: &mut [L::F], rhs: &[L::F]) -> Result<(), OpError>
    {
        self.op_impl(true, res, rhs)
    }
}

//

#[test]
fn test_block_dense1()
{
    use float_eq::assert_float_eq;

    type L = crate::FloatGeneric<f64>;

    let array = &[ // column-major
        1., 4.,
        2., 5.,
        3., -6.,
    ];
    let mut b = BlockDense::<L>::new(1, 1, 2, 3, array).unwrap();
    b.initialize().unwrap();

    let y = &mut[0., 1., 1.];
    b.eval_add(y, &[9., 1., 1., 1.]).unwrap();
    assert_float_eq!(y.as_ref(), [0., 7., 4.].as_ref(), abs_all <= 1e-12);

    let x = &mut[0.; 4];
    b.eval_adjoint_add(x, &[0., 1., -1.]).unwrap();
    assert_float_eq!(x.as_ref(), [0., -3., -3., 9.].as_ref(), abs_all <= 1e-12);

    assert_eq!(b.row_sum(1, 1.), 15.);
    assert_eq!(b.col_sum(2, 2.), 45.);
    assert_eq!(b.gpu_mem_amount(), 48);

    assert_eq!(BlockDense::<L>::new(0, 0, 2, 2, array).err(), Some(OpError::DimMismatch));
}

#[test]
#[should_panic]
fn test_block_dense_row_sum_out()
{
    type L = crate::FloatGeneric<f64>;

    let b = BlockDense::<L>::new(0, 0, 2, 2, &[1., 2., 3., 4.]).unwrap();
    b.row_sum(2, 1.);
}

#[test]
#[should_panic]
fn test_block_dense_col_sum_out()
{
    type L = crate::FloatGeneric<f64>;

    let b = BlockDense::<L>::new(0, 0, 2, 2, &[1., 2., 3., 4.]).unwrap();
    b.col_sum(2, 1.);
}
