//! Element operations evaluated per group by [`crate::ProxElemOperation`].

use num_traits::Float;
use alloc::vec;
use alloc::vec::Vec;
use crate::operator::OpError;

mod function_1d;
mod elem_operation_1d;
mod elem_operation_norm2;
mod elem_operation_simplex;

pub use function_1d::*;
pub use elem_operation_1d::*;
pub use elem_operation_norm2::*;
pub use elem_operation_simplex::*;

/// Number of coefficients `(a, b, c, d, e, alpha, beta)` of an element operation.
pub const COEFFS_COUNT: usize = 7;

/// Element operation trait.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Evaluates the proximal map of one group from its coefficients.
/// An instance holds no per-group state; every group is evaluated independently,
/// possibly on different workers.
pub trait ElemOperation<F: Float>: Default + Sync
{
    /// Group dimension fixed by the operation, or `None` if chosen per prox.
    const DIM: Option<usize>;

    /// Length of worker-private scratch memory needed for groups of `dim` elements.
    fn scratch_len(_dim: usize) -> usize
    {
        0
    }

    /// Evaluates the prox of one group in place.
    ///
    /// * `x` is the group argument before entry, the result on exit.
    /// * `tau_diag` is the matching group of diagonal steps.
    /// * `coeffs` are `(a, b, c, d, e, alpha, beta)` of this group.
    /// * `scratch` has at least [`ElemOperation::scratch_len`] elements.
    fn eval(&self, x: &mut [F], tau_diag: &[F], tau_scal: F, invert_tau: bool, coeffs: &[F; COEFFS_COUNT], scratch: &mut [F]);
}

/// Effective step size \\(\tau_{scal}\tau_{diag}\\), or its reciprocal if `invert_tau`.
pub fn step_size<F: Float>(tau_scal: F, tau_diag: F, invert_tau: bool) -> F
{
    if invert_tau {
        (tau_scal * tau_diag).recip()
    }
    else {
        tau_scal * tau_diag
    }
}

//

/// Coefficients of element operations.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Parameterize the prox of \\(c f(ax - b) + dx + \frac{e}{2}x^2\\),
/// where `alpha` and `beta` are handed over to \\(f\\) itself.
/// Each vector has either one element, shared by every group, or one element per group.
#[derive(Debug, Clone, PartialEq)]
pub struct ElemCoeffs<F>
{
    pub a: Vec<F>,
    pub b: Vec<F>,
    pub c: Vec<F>,
    pub d: Vec<F>,
    pub e: Vec<F>,
    pub alpha: Vec<F>,
    pub beta: Vec<F>,
}

impl<F: Float> Default for ElemCoeffs<F>
{
    fn default() -> Self
    {
        let f0 = F::zero();
        let f1 = F::one();

        ElemCoeffs {
            a: vec![f1],
            b: vec![f0],
            c: vec![f1],
            d: vec![f0],
            e: vec![f0],
            alpha: vec![f0],
            beta: vec![f0],
        }
    }
}

impl<F: Float> ElemCoeffs<F>
{
    /// Creates an instance with `a = 1, c = 1` and the others zero.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Changes coefficients.
    ///
    /// Returns [`ElemCoeffs`] with its coefficients changed.
    /// * `f` is a function to change coefficients given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut ElemCoeffs<F>)
    {
        f(&mut self);
        self
    }

    /// Coefficient vectors in the order `a, b, c, d, e, alpha, beta`.
    pub fn as_array(&self) -> [&[F]; COEFFS_COUNT]
    {
        [&self.a, &self.b, &self.c, &self.d, &self.e, &self.alpha, &self.beta]
    }

    /// Checks coefficients for `count` groups.
    ///
    /// Returns `Err` with [`OpError::InvalidCoeff`] unless every vector has 1 or `count` elements,
    /// all values are finite, `a` is nonzero and `e` is nonnegative.
    /// The last condition keeps \\(1 + \tau e\\) positive for any step \\(\tau > 0\\).
    pub fn validate(&self, count: usize) -> Result<(), OpError>
    {
        const NAMES: [&str; COEFFS_COUNT] = ["a", "b", "c", "d", "e", "alpha", "beta"];

        for (name, v) in NAMES.iter().zip(self.as_array()) {
            if v.len() != 1 && v.len() != count {
                log::error!("coefficient {} has {} elements, expected 1 or {}", name, v.len(), count);
                return Err(OpError::InvalidCoeff);
            }
            if v.iter().any(|u| !u.is_finite()) {
                log::error!("coefficient {} not finite", name);
                return Err(OpError::InvalidCoeff);
            }
        }
        if self.a.iter().any(|u| *u == F::zero()) {
            log::error!("coefficient a must be nonzero");
            return Err(OpError::InvalidCoeff);
        }
        if self.e.iter().any(|u| *u < F::zero()) {
            log::error!("coefficient e must be nonnegative");
            return Err(OpError::InvalidCoeff);
        }

        Ok(())
    }
}

/// Gathers the coefficients of group `g` from coefficient vectors.
pub fn coeffs_of<F: Float, V: AsRef<[F]>>(vecs: &[V], g: usize) -> [F; COEFFS_COUNT]
{
    core::array::from_fn(|k| {
        let v = vecs[k].as_ref();
        if v.len() == 1 {v[0]} else {v[g]}
    })
}

//

#[test]
fn test_elem_coeffs1()
{
    let p = ElemCoeffs::<f64>::new().par(|p| {
        p.b = vec![1., 2., 3.];
        p.e = vec![0.5];
    });
    assert_eq!(p.validate(3), Ok(()));
    assert_eq!(p.validate(2), Err(OpError::InvalidCoeff));

    assert_eq!(coeffs_of(&p.as_array(), 2), [1., 3., 1., 0., 0.5, 0., 0.]);

    let p = p.par(|p| p.a = vec![0.]);
    assert_eq!(p.validate(3), Err(OpError::InvalidCoeff));

    let p = ElemCoeffs::<f64>::new().par(|p| p.e = vec![-1.]);
    assert_eq!(p.validate(1), Err(OpError::InvalidCoeff));

    let p = ElemCoeffs::<f64>::new().par(|p| p.d = vec![f64::NAN]);
    assert_eq!(p.validate(1), Err(OpError::InvalidCoeff));
}
