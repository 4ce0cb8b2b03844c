use num_traits::Float;
use core::marker::PhantomData;
use super::{ElemOperation, Function1D, COEFFS_COUNT, step_size};

/// Scalar element operation
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Evaluates the prox of \\(c f(ax - b) + dx + \frac{e}{2}x^2\\) on groups of one element,
/// where \\(f\\) is given by `FUN`.
/// By the change of variables \\(z = a x - b\\) this is reduced to the prox of \\(f\\) alone:
/// \\[
/// {\bf prox} (x) = \frac1a \left( {\bf prox}\_{\sigma f}\left(
/// \frac{a(x - d\tau)}{1 + \tau e} - b \right) + b \right),
/// \quad \sigma = \frac{c a^2 \tau}{1 + \tau e}.
/// \\]
/// With \\(c = 0\\) the argument is returned as it is.
pub struct ElemOperation1D<FUN: Function1D>
{
    ph_fun: PhantomData<fn() -> FUN>,
}

impl<FUN: Function1D> Default for ElemOperation1D<FUN>
{
    fn default() -> Self
    {
        ElemOperation1D {
            ph_fun: PhantomData,
        }
    }
}

impl<F: Float, FUN: Function1D> ElemOperation<F> for ElemOperation1D<FUN>
{
    const DIM: Option<usize> = Some(1);

    fn eval(&self, x: &mut [F], tau_diag: &[F], tau_scal: F, invert_tau: bool, coeffs: &[F; COEFFS_COUNT], _scratch: &mut [F])
    {
        let [a, b, c, d, e, alpha, beta] = *coeffs;

        if c == F::zero() {
            return;
        }

        let tau = step_size(tau_scal, tau_diag[0], invert_tau);
        let denom = F::one() + tau * e;

        let prox_arg = a * (x[0] - d * tau) / denom - b;
        let step = c * a * a * tau / denom;

        x[0] = (FUN::prox(prox_arg, step, alpha, beta) + b) / a;
    }
}

//

#[cfg(test)]
fn eval_1d<FUN: Function1D>(x: f64, tau_diag: f64, tau_scal: f64, invert_tau: bool, coeffs: [f64; COEFFS_COUNT]) -> f64
{
    let op = ElemOperation1D::<FUN>::default();
    let x = &mut[x];
    op.eval(x, &[tau_diag], tau_scal, invert_tau, &coeffs, &mut[]);
    x[0]
}

#[test]
fn test_elem_1d_zero_c()
{
    use super::Function1DIndEq0;

    for (tau_diag, tau_scal) in [(1., 1.), (0.1, 20.), (3., 1e-3)] {
        for invert_tau in [false, true] {
            let r = eval_1d::<Function1DIndEq0>(-2.5, tau_diag, tau_scal, invert_tau, [3., 1., 0., 2., 1., 0., 0.]);
            assert_eq!(r, -2.5);
        }
    }
}

#[test]
fn test_elem_1d_affine()
{
    use float_eq::assert_float_eq;
    use super::{Function1DSquare, Function1DAbs};

    // argmin_x  (c/2)(a x - b)^2 + d x + (e/2) x^2 + (x - x0)^2 / (2 tau)
    let (a, b, c, d, e) = (2., 1., 3., 0.5, 0.25);
    let (x0, tau) = (1.5, 0.4);
    let expect = (c * a * b - d + x0 / tau) / (c * a * a + e + 1. / tau);

    let r = eval_1d::<Function1DSquare>(x0, 0.8, 0.5, false, [a, b, c, d, e, 0., 0.]);
    assert_float_eq!(r, expect, abs <= 1e-12);

    // the same step given inverted
    let r = eval_1d::<Function1DSquare>(x0, 1.25, 2., true, [a, b, c, d, e, 0., 0.]);
    assert_float_eq!(r, expect, abs <= 1e-12);

    // soft shrinkage of 2 by 0.5
    let r = eval_1d::<Function1DAbs>(2., 1., 0.5, false, [1., 0., 1., 0., 0., 0., 0.]);
    assert_float_eq!(r, 1.5, abs <= 1e-12);
}
