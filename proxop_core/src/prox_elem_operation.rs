use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;
use core::mem::size_of;
use crate::operator::{Prox, LinAlg, OpError, DevBuf, SepGroup};
use crate::elemop::{ElemOperation, ElemCoeffs, coeffs_of};

/// Separable prox of an element operation
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Splits `index..index + count * dim` into `count` contiguous groups of `dim` elements
/// and evaluates the element operation `E` on each of them, in parallel as the backend allows.
/// Coefficients are uploaded to the device on [`Prox::initialize`].
pub struct ProxElemOperation<L: LinAlg, E: ElemOperation<L::F>>
{
    ph_l: PhantomData<L>,
    index: usize,
    count: usize,
    dim: usize,
    coeffs: ElemCoeffs<L::F>,
    dev_coeffs: Option<Vec<DevBuf<L::F>>>,
    op: E,
}

impl<L: LinAlg, E: ElemOperation<L::F>> ProxElemOperation<L, E>
{
    /// Creates an instance.
    ///
    /// Returns [`ProxElemOperation`] instance,
    /// or `Err` with [`OpError::DimMismatch`] / [`OpError::InvalidCoeff`].
    /// * `index` is the start offset into the variable array.
    /// * `count` is the number of groups.
    /// * `dim` is the number of elements of each group; it shall agree with [`ElemOperation::DIM`] if fixed.
    /// * `coeffs` are checked by [`ElemCoeffs::validate`].
    pub fn new(index: usize, count: usize, dim: usize, coeffs: ElemCoeffs<L::F>) -> Result<Self, OpError>
    {
        if count == 0 || dim == 0 || E::DIM.map_or(false, |d| d != dim) {
            log::error!("element operation on {} groups of dim {} (fixed {:?})", count, dim, E::DIM);
            return Err(OpError::DimMismatch);
        }
        coeffs.validate(count)?;

        Ok(ProxElemOperation {
            ph_l: PhantomData,
            index,
            count,
            dim,
            coeffs,
            dev_coeffs: None,
            op: E::default(),
        })
    }

    /// Number of groups.
    pub fn count(&self) -> usize
    {
        self.count
    }

    /// Number of elements of each group.
    pub fn dim(&self) -> usize
    {
        self.dim
    }

    /// Host copy of the coefficients.
    pub fn coeffs(&self) -> &ElemCoeffs<L::F>
    {
        &self.coeffs
    }
}

impl<L: LinAlg, E: ElemOperation<L::F>> Prox<L> for ProxElemOperation<L, E>
{
    fn index(&self) -> usize
    {
        self.index
    }

    fn size(&self) -> usize
    {
        self.count * self.dim
    }

    fn initialize(&mut self) -> Result<(), OpError>
    {
        let mut dev_coeffs = Vec::with_capacity(self.coeffs.as_array().len());
        for v in self.coeffs.as_array() {
            dev_coeffs.push(DevBuf::upload(v)?);
        }
        self.dev_coeffs = Some(dev_coeffs);

        log::debug!("element operation prox at {}: {} x {}, {} bytes", self.index, self.count, self.dim, self.gpu_mem_amount());
        Ok(())
    }

    fn release(&mut self)
    {
        self.dev_coeffs = None;
    }

    fn is_initialized(&self) -> bool
    {
        self.dev_coeffs.is_some()
    }

    fn gpu_mem_amount(&self) -> usize
    {
        let len: usize = self.coeffs.as_array().iter().map(|v| v.len()).sum();

        len * size_of::<L::F>()
    }

    fn separable_structure(&self) -> Vec<SepGroup>
    {
        vec![(self.dim, self.count, self.index)]
    }

    fn eval_local(&mut self, x: &mut [L::F], tau_diag: &[L::F], tau_scal: L::F, invert_tau: bool) -> Result<(), OpError>
    {
        let dev_coeffs = self.dev_coeffs.as_ref().ok_or(OpError::NotInitialized)?;
        let op = &self.op;

        L::for_each_group(self.dim, E::scratch_len(self.dim), x, tau_diag, |g, x_g, tau_g, scratch| {
            let coeffs = coeffs_of(&dev_coeffs[..], g);
            op.eval(x_g, tau_g, tau_scal, invert_tau, &coeffs, scratch);
        });
        Ok(())
    }
}

//

#[test]
fn test_prox_elem1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;
    use crate::elemop::{ElemOperation1D, Function1DAbs};

    type L = FloatGeneric<f64>;

    let _ = env_logger::builder().is_test(true).try_init();

    // per-group c, shared tau
    let coeffs = ElemCoeffs::new().par(|p| p.c = vec![1., 0., 2.]);
    let mut p = ProxElemOperation::<L, ElemOperation1D<Function1DAbs>>::new(1, 3, 1, coeffs).unwrap();

    let arg = &[9., 3., 3., 3., 9.];
    let res = &mut[0.; 5];
    let tau = &[1.; 5];

    assert_eq!(p.eval(res, arg, tau, 1., false), Err(OpError::NotInitialized));

    p.initialize().unwrap();
    p.eval(res, arg, tau, 1., false).unwrap();
    assert_float_eq!(res.as_ref(), [0., 2., 3., 1., 0.].as_ref(), abs_all <= 1e-12);

    assert_eq!(p.separable_structure(), vec![(1, 3, 1)]);
    assert_eq!(p.gpu_mem_amount(), 9 * 8);

    assert_eq!(p.eval(res, &arg[.. 3], tau, 1., false), Err(OpError::OutOfRange));

    // nothing is written when a check fails
    let res = &mut[0.; 5];
    assert_eq!(p.eval(res, arg, &tau[.. 3], 1., false), Err(OpError::OutOfRange));
    assert_eq!(res, &[0.; 5]);

    p.release();
    assert!(!p.is_initialized());
}

#[test]
fn test_prox_elem_invalid1()
{
    use crate::FloatGeneric;
    use crate::elemop::{ElemOperation1D, ElemOperationSimplex, Function1DAbs};

    type L = FloatGeneric<f64>;

    let r = ProxElemOperation::<L, ElemOperation1D<Function1DAbs>>::new(0, 3, 2, ElemCoeffs::new());
    assert_eq!(r.err(), Some(OpError::DimMismatch));

    let coeffs = ElemCoeffs::new().par(|p| p.a = vec![1., 2.]);
    let r = ProxElemOperation::<L, ElemOperation1D<Function1DAbs>>::new(0, 3, 1, coeffs);
    assert_eq!(r.err(), Some(OpError::InvalidCoeff));

    let r = ProxElemOperation::<L, ElemOperationSimplex>::new(0, 2, 4, ElemCoeffs::new());
    assert!(r.is_ok());
}
