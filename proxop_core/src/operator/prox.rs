//! Proximal operator

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use crate::operator::{LinAlg, OpError};

/// One run of equally shaped groups: `(dim, count, index)`.
///
/// `count` groups of `dim` elements each, contiguous from `index`.
pub type SepGroup = (usize, usize, usize);

/// Prox held by shared ownership, e.g. as the conjugate of a [`crate::ProxMoreau`].
pub type SharedProx<L> = Rc<RefCell<dyn Prox<L>>>;

/// Proximal operator trait.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Evaluates \\({\bf prox}\_{\tau f}(x) = \arg\min_z f(z) + \frac{1}{2\tau}\\|z - x\\|^2\\)
/// on the index range `index..index + size` of a variable array,
/// where \\(\tau\\) is built per element from a scalar step and a diagonal.
pub trait Prox<L: LinAlg>
{
    /// Start offset into the variable array.
    fn index(&self) -> usize;

    /// Number of variables covered.
    fn size(&self) -> usize;

    /// Allocates and uploads the device data.
    fn initialize(&mut self) -> Result<(), OpError>;

    /// Frees the device data.
    fn release(&mut self);

    /// Whether the device data is present.
    fn is_initialized(&self) -> bool;

    /// Bytes of device memory held while initialized.
    fn gpu_mem_amount(&self) -> usize;

    /// Partition of the range into groups, as runs of [`SepGroup`].
    fn separable_structure(&self) -> Vec<SepGroup>;

    /// Evaluates the prox in place on the local range.
    ///
    /// * `x` has exactly [`Prox::size`] elements: the argument before entry, the result on exit.
    /// * `tau_diag` is the matching local range of the diagonal steps.
    /// * `tau_scal` is the scalar step.
    /// * If `invert_tau` is `true`, the step \\(1 / (\tau_{scal}\tau_{diag})\\) is used
    ///   instead of \\(\tau_{scal}\tau_{diag}\\).
    fn eval_local(&mut self, x: &mut [L::F], tau_diag: &[L::F], tau_scal: L::F, invert_tau: bool) -> Result<(), OpError>;

    /// Evaluates `result[index..index + size]` \\(\leftarrow {\bf prox}\\)(`arg[index..index + size]`).
    ///
    /// `result`, `arg` and `tau_diag` are full variable arrays;
    /// nothing outside the prox's range is read or written.
    fn eval(&mut self, result: &mut [L::F], arg: &[L::F], tau_diag: &[L::F], tau_scal: L::F, invert_tau: bool) -> Result<(), OpError>
    {
        let (sta, end) = self.range()?;

        if arg.len() < end || result.len() < end || tau_diag.len() < end {
            log::error!("prox on {}..{}: result {} / arg {} / tau_diag {} too short",
                sta, end, result.len(), arg.len(), tau_diag.len());
            return Err(OpError::OutOfRange);
        }

        L::copy(&arg[sta.. end], &mut result[sta.. end]);
        log::trace!("prox on {}..{}: tau {:?}, invert {}", sta, end, tau_scal, invert_tau);
        self.eval_local(&mut result[sta.. end], &tau_diag[sta.. end], tau_scal, invert_tau)
    }

    /// Same as [`Prox::eval`] with `result` holding the argument on entry.
    fn eval_inplace(&mut self, x: &mut [L::F], tau_diag: &[L::F], tau_scal: L::F, invert_tau: bool) -> Result<(), OpError>
    {
        let (sta, end) = self.range()?;

        if x.len() < end || tau_diag.len() < end {
            log::error!("prox on {}..{}: x {} / tau_diag {} too short", sta, end, x.len(), tau_diag.len());
            return Err(OpError::OutOfRange);
        }

        log::trace!("prox on {}..{}: tau {:?}, invert {}", sta, end, tau_scal, invert_tau);
        self.eval_local(&mut x[sta.. end], &tau_diag[sta.. end], tau_scal, invert_tau)
    }

    /// Range checked for evaluation.
    fn range(&self) -> Result<(usize, usize), OpError>
    {
        let sta = self.index();

        if !self.is_initialized() {
            log::error!("prox at {} evaluated while not initialized", sta);
            return Err(OpError::NotInitialized);
        }

        Ok((sta, sta + self.size()))
    }
}
