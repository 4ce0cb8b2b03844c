use num_traits::Zero;
use alloc::vec::Vec;
use core::mem::size_of;
use crate::operator::{Prox, LinAlg, OpError, DevBuf, SepGroup, SharedProx};
use crate::elemop::step_size;

/// Prox by Moreau's identity
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Evaluates the prox of \\(f\\) from the prox of its convex conjugate \\(f^\*\\):
/// \\[
/// {\bf prox}\_{\tau f}(x) = x - \tau\ {\bf prox}\_{f^\* / \tau}(x / \tau).
/// \\]
/// The conjugate is shared; it is initialized and released together with this prox,
/// and evaluated on a private scratch array with the opposite sense of `invert_tau`.
pub struct ProxMoreau<L: LinAlg>
{
    conjugate: SharedProx<L>,
    scaled_arg: Option<DevBuf<L::F>>,
}

impl<L: LinAlg> ProxMoreau<L>
{
    /// Creates an instance.
    ///
    /// * `conjugate` is the prox of \\(f^\*\\); it keeps its own index and size.
    pub fn new(conjugate: SharedProx<L>) -> Self
    {
        ProxMoreau {
            conjugate,
            scaled_arg: None,
        }
    }

    /// The conjugate prox.
    pub fn conjugate(&self) -> &SharedProx<L>
    {
        &self.conjugate
    }
}

impl<L: LinAlg> Prox<L> for ProxMoreau<L>
{
    fn index(&self) -> usize
    {
        self.conjugate.borrow().index()
    }

    fn size(&self) -> usize
    {
        self.conjugate.borrow().size()
    }

    fn initialize(&mut self) -> Result<(), OpError>
    {
        self.conjugate.borrow_mut().initialize()?;

        match DevBuf::filled(self.size(), L::F::zero()) {
            Ok(buf) => self.scaled_arg = Some(buf),
            Err(e) => {
                log::error!("moreau prox at {} failed to allocate: {}", self.index(), e);
                self.conjugate.borrow_mut().release();
                return Err(e);
            },
        }

        log::debug!("moreau prox at {}: {} bytes", self.index(), self.gpu_mem_amount());
        Ok(())
    }

    fn release(&mut self)
    {
        self.scaled_arg = None;
        self.conjugate.borrow_mut().release();
    }

    fn is_initialized(&self) -> bool
    {
        self.scaled_arg.is_some() && self.conjugate.borrow().is_initialized()
    }

    fn gpu_mem_amount(&self) -> usize
    {
        let conj = self.conjugate.borrow();

        conj.gpu_mem_amount() + conj.size() * size_of::<L::F>()
    }

    fn separable_structure(&self) -> Vec<SepGroup>
    {
        self.conjugate.borrow().separable_structure()
    }

    fn eval_local(&mut self, x: &mut [L::F], tau_diag: &[L::F], tau_scal: L::F, invert_tau: bool) -> Result<(), OpError>
    {
        let scaled_arg = self.scaled_arg.as_mut().ok_or(OpError::NotInitialized)?;

        // x / tau
        L::map_di(x, tau_diag, scaled_arg, |u, t, _| {
            u / step_size(tau_scal, t, invert_tau)
        });

        // prox of the conjugate with step 1 / tau
        self.conjugate.borrow_mut().eval_local(scaled_arg, tau_diag, tau_scal, !invert_tau)?;

        // x - tau * prox(x / tau)
        let scaled_arg: &[L::F] = scaled_arg;
        L::map_di(scaled_arg, tau_diag, x, |s, t, u| {
            u - step_size(tau_scal, t, invert_tau) * s
        });

        Ok(())
    }
}

//
