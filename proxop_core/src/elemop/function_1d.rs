//! Base functions with closed-form scalar proximal maps.

use num_traits::Float;

/// Scalar convex function with a closed-form proximal map.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
pub trait Function1D
{
    /// Calculates \\({\bf prox}\_{\tau f}(x_0)\\).
    ///
    /// `alpha` and `beta` are parameters of \\(f\\), ignored by most functions.
    fn prox<F: Float>(x0: F, tau: F, alpha: F, beta: F) -> F;
}

/// \\(f(x) = 0\\)
pub struct Function1DZero;

impl Function1D for Function1DZero
{
    fn prox<F: Float>(x0: F, _tau: F, _alpha: F, _beta: F) -> F
    {
        x0
    }
}

/// \\(f(x) = |x|\\)
pub struct Function1DAbs;

impl Function1D for Function1DAbs
{
    fn prox<F: Float>(x0: F, tau: F, _alpha: F, _beta: F) -> F
    {
        (x0.abs() - tau).max(F::zero()) * x0.signum()
    }
}

/// \\(f(x) = \frac12 x^2\\)
pub struct Function1DSquare;

impl Function1D for Function1DSquare
{
    fn prox<F: Float>(x0: F, tau: F, _alpha: F, _beta: F) -> F
    {
        x0 / (F::one() + tau)
    }
}

/// Indicator of \\(x \le 0\\)
pub struct Function1DIndLeq0;

impl Function1D for Function1DIndLeq0
{
    fn prox<F: Float>(x0: F, _tau: F, _alpha: F, _beta: F) -> F
    {
        x0.min(F::zero())
    }
}

/// Indicator of \\(x \ge 0\\)
pub struct Function1DIndGeq0;

impl Function1D for Function1DIndGeq0
{
    fn prox<F: Float>(x0: F, _tau: F, _alpha: F, _beta: F) -> F
    {
        x0.max(F::zero())
    }
}

/// Indicator of \\(x = 0\\)
pub struct Function1DIndEq0;

impl Function1D for Function1DIndEq0
{
    fn prox<F: Float>(_x0: F, _tau: F, _alpha: F, _beta: F) -> F
    {
        F::zero()
    }
}

/// Indicator of \\(0 \le x \le 1\\)
pub struct Function1DIndBox01;

impl Function1D for Function1DIndBox01
{
    fn prox<F: Float>(x0: F, _tau: F, _alpha: F, _beta: F) -> F
    {
        x0.max(F::zero()).min(F::one())
    }
}

/// \\(f(x) = \max(0, x)\\)
pub struct Function1DMaxPos0;

impl Function1D for Function1DMaxPos0
{
    fn prox<F: Float>(x0: F, tau: F, _alpha: F, _beta: F) -> F
    {
        if x0 > tau {
            x0 - tau
        }
        else if x0 < F::zero() {
            x0
        }
        else {
            F::zero()
        }
    }
}

/// \\(f(x) = 0\\) if \\(x = 0\\), \\(1\\) otherwise
pub struct Function1DL0;

impl Function1D for Function1DL0
{
    fn prox<F: Float>(x0: F, tau: F, _alpha: F, _beta: F) -> F
    {
        if x0 * x0 > (tau + tau) {
            x0
        }
        else {
            F::zero()
        }
    }
}

/// Huber function of width \\(\alpha\\):
/// \\(f(x) = \frac{x^2}{2\alpha}\\) if \\(|x| \le \alpha\\), \\(|x| - \frac{\alpha}{2}\\) otherwise
pub struct Function1DHuber;

impl Function1D for Function1DHuber
{
    fn prox<F: Float>(x0: F, tau: F, alpha: F, _beta: F) -> F
    {
        if x0.abs() <= alpha + tau {
            x0 * alpha / (alpha + tau)
        }
        else {
            x0 - tau * x0.signum()
        }
    }
}

//

#[test]
fn test_function_1d1()
{
    assert_eq!(Function1DAbs::prox(3., 1., 0., 0.), 2.);
    assert_eq!(Function1DAbs::prox(-3., 1., 0., 0.), -2.);
    assert_eq!(Function1DAbs::prox(0.5, 1., 0., 0.), 0.);
    assert_eq!(Function1DSquare::prox(3., 2., 0., 0.), 1.);
    assert_eq!(Function1DIndLeq0::prox(3., 2., 0., 0.), 0.);
    assert_eq!(Function1DIndGeq0::prox(3., 2., 0., 0.), 3.);
    assert_eq!(Function1DIndEq0::prox(3., 2., 0., 0.), 0.);
    assert_eq!(Function1DIndBox01::prox(0.3, 2., 0., 0.), 0.3);
    assert_eq!(Function1DIndBox01::prox(1.3, 2., 0., 0.), 1.);
    assert_eq!(Function1DMaxPos0::prox(3., 1., 0., 0.), 2.);
    assert_eq!(Function1DMaxPos0::prox(0.5, 1., 0., 0.), 0.);
    assert_eq!(Function1DMaxPos0::prox(-0.5, 1., 0., 0.), -0.5);
    assert_eq!(Function1DL0::prox(1.5, 1., 0., 0.), 1.5);
    assert_eq!(Function1DL0::prox(1.2, 1., 0., 0.), 0.);
    assert_eq!(Function1DHuber::prox(1., 1., 1., 0.), 0.5);
    assert_eq!(Function1DHuber::prox(-5., 1., 1., 0.), -4.);
}
