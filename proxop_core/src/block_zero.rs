use num_traits::Zero;
use core::marker::PhantomData;
use crate::operator::{Block, LinAlg, OpError, Placement};

/// Zero block
///
/// Occupies a placement without contributing anything;
/// useful to pin the shape of an operator whose last rows or columns are empty.
pub struct BlockZero<L: LinAlg>
{
    ph_l: PhantomData<L>,
    placement: Placement,
    initialized: bool,
}

impl<L: LinAlg> BlockZero<L>
{
    /// Creates an instance.
    pub fn new(row: usize, col: usize, nrows: usize, ncols: usize) -> Self
    {
        BlockZero {
            ph_l: PhantomData,
            placement: Placement::new(row, col, nrows, ncols),
            initialized: false,
        }
    }
}

impl<L: LinAlg> Block<L> for BlockZero<L>
{
    fn placement(&self) -> Placement
    {
        self.placement
    }

    fn initialize(&mut self) -> Result<(), OpError>
    {
        self.initialized = true;
        Ok(())
    }

    fn release(&mut self)
    {
        self.initialized = false;
    }

    fn is_initialized(&self) -> bool
    {
        self.initialized
    }

    fn row_sum(&self, _row: usize, _alpha: L::F) -> L::F
    {
        L::F::zero()
    }

    fn col_sum(&self, _col: usize, _alpha: L::F) -> L::F
    {
        L::F::zero()
    }

    fn gpu_mem_amount(&self) -> usize
    {
        0
    }

    fn eval_local_add(&self, _res: &mut [L::F], _rhs: &[L::F]) -> Result<(), OpError>
    {
        // do nothing
        Ok(())
    }

    fn eval_adjoint_local_add(&self, _res: &mut [L::F], _rhs: &[L::F]) -> Result<(), OpError>
    {
        // do nothing
        Ok(())
    }
}

//

#[test]
fn test_block_zero1()
{
    type L = crate::FloatGeneric<f64>;

    let mut b = BlockZero::<L>::new(1, 0, 2, 2);
    let y = &mut[1., 2., 3.];

    assert_eq!(b.eval_add(y, &[5., 5.]), Err(OpError::NotInitialized));
    b.initialize().unwrap();
    b.eval_add(y, &[5., 5.]).unwrap();
    assert_eq!(y, &[1., 2., 3.]);
    assert_eq!(b.row_sum(0, 1.), 0.);
}
