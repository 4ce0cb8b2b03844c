use num_traits::Float;
use core::marker::PhantomData;
use super::{ElemOperation, Function1D, COEFFS_COUNT, step_size};

/// Euclidean-norm element operation
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Evaluates the prox of \\(c f(\\|ax - b\mathbb{1}\\|_2) + d \mathbb{1}^T x + \frac{e}{2}\\|x\\|_2^2\\)
/// on groups of any dimension, where \\(f\\) is given by `FUN`.
/// The step is taken from the first diagonal entry of the group.
/// After the same change of variables as [`super::ElemOperation1D`],
/// the prox of \\(f\\) is applied to the norm and the direction is kept.
pub struct ElemOperationNorm2<FUN: Function1D>
{
    ph_fun: PhantomData<fn() -> FUN>,
}

impl<FUN: Function1D> Default for ElemOperationNorm2<FUN>
{
    fn default() -> Self
    {
        ElemOperationNorm2 {
            ph_fun: PhantomData,
        }
    }
}

impl<F: Float, FUN: Function1D> ElemOperation<F> for ElemOperationNorm2<FUN>
{
    const DIM: Option<usize> = None;

    fn eval(&self, x: &mut [F], tau_diag: &[F], tau_scal: F, invert_tau: bool, coeffs: &[F; COEFFS_COUNT], _scratch: &mut [F])
    {
        let [a, b, c, d, e, alpha, beta] = *coeffs;

        if c == F::zero() {
            return;
        }

        let tau = step_size(tau_scal, tau_diag[0], invert_tau);
        let denom = F::one() + tau * e;

        let mut sq = F::zero();
        for u in x.iter_mut() {
            *u = a * (*u - d * tau) / denom - b;
            sq = sq + *u * *u;
        }
        let norm = sq.sqrt();
        let step = c * a * a * tau / denom;

        let ratio = if norm > F::zero() {
            FUN::prox(norm, step, alpha, beta) / norm
        }
        else {
            F::zero()
        };

        for u in x.iter_mut() {
            *u = (*u * ratio + b) / a;
        }
    }
}

//

#[test]
fn test_elem_norm2_ball()
{
    use float_eq::assert_float_eq;
    use super::Function1DIndBox01;

    let op = ElemOperationNorm2::<Function1DIndBox01>::default();
    let coeffs = [1., 0., 1., 0., 0., 0., 0.];

    // projection onto the unit ball
    let x = &mut[3., 4.];
    op.eval(x, &[1., 1.], 1., false, &coeffs, &mut[]);
    assert_float_eq!(x.as_ref(), [0.6, 0.8].as_ref(), abs_all <= 1e-12);

    let x = &mut[0.3, -0.4];
    op.eval(x, &[1., 1.], 1., false, &coeffs, &mut[]);
    assert_float_eq!(x.as_ref(), [0.3, -0.4].as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_elem_norm2_shrink()
{
    use float_eq::assert_float_eq;
    use super::Function1DAbs;

    let op = ElemOperationNorm2::<Function1DAbs>::default();

    // group soft shrinkage of |(3, 4)| = 5 by 2
    let x = &mut[3., 4.];
    op.eval(x, &[0.5, 0.5], 4., false, &[1., 0., 1., 0., 0., 0., 0.], &mut[]);
    assert_float_eq!(x.as_ref(), [1.8, 2.4].as_ref(), abs_all <= 1e-12);

    let x = &mut[0.3, 0.4, 0.];
    op.eval(x, &[1., 1., 1.], 1., false, &[1., 0., 1., 0., 0., 0., 0.], &mut[]);
    assert_float_eq!(x.as_ref(), [0., 0., 0.].as_ref(), abs_all <= 1e-12);

    // c = 0 leaves the group alone
    let x = &mut[0.3, 0.4, 0.];
    op.eval(x, &[1., 1., 1.], 1., false, &[2., 1., 0., 1., 1., 0., 0.], &mut[]);
    assert_eq!(x, &[0.3, 0.4, 0.]);
}
