use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;
use crate::operator::{Prox, LinAlg, OpError, SepGroup};

/// Prox of the zero function
///
/// Leaves its range as it is.
pub struct ProxZero<L: LinAlg>
{
    ph_l: PhantomData<L>,
    index: usize,
    size: usize,
    initialized: bool,
}

impl<L: LinAlg> ProxZero<L>
{
    /// Creates an instance on `index..index + size`.
    pub fn new(index: usize, size: usize) -> Self
    {
        ProxZero {
            ph_l: PhantomData,
            index,
            size,
            initialized: false,
        }
    }
}

impl<L: LinAlg> Prox<L> for ProxZero<L>
{
    fn index(&self) -> usize
    {
        self.index
    }

    fn size(&self) -> usize
    {
        self.size
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

    fn gpu_mem_amount(&self) -> usize
    {
        0
    }

    fn separable_structure(&self) -> Vec<SepGroup>
    {
        vec![(1, self.size, self.index)]
    }

    fn eval_local(&mut self, _x: &mut [L::F], _tau_diag: &[L::F], _tau_scal: L::F, _invert_tau: bool) -> Result<(), OpError>
    {
        // do nothing
        Ok(())
    }
}
