use num_traits::Float;
use core::cmp::Ordering;
use super::{ElemOperation, COEFFS_COUNT};

/// Unit simplex element operation
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Euclidean projection of each group onto
/// \\(\Delta = \left\lbrace x \ \middle|\ x \ge 0, \mathbb{1}^T x = 1 \right\rbrace\\),
/// the prox of its indicator for any step. Coefficients are not used.
#[derive(Default)]
pub struct ElemOperationSimplex;

impl<F: Float> ElemOperation<F> for ElemOperationSimplex
{
    const DIM: Option<usize> = None;

    fn scratch_len(dim: usize) -> usize
    {
        dim
    }

    fn eval(&self, x: &mut [F], _tau_diag: &[F], _tau_scal: F, _invert_tau: bool, _coeffs: &[F; COEFFS_COUNT], scratch: &mut [F])
    {
        let f1 = F::one();
        let sorted = &mut scratch[.. x.len()];

        sorted.copy_from_slice(x);
        sorted.sort_unstable_by(|p, q| q.partial_cmp(p).unwrap_or(Ordering::Equal));

        // largest k with sorted[k] > (sum(sorted[..=k]) - 1) / (k + 1)
        let mut cumsum = F::zero();
        let mut theta = F::zero();
        let mut cnt = F::zero();
        for u in sorted.iter() {
            cumsum = cumsum + *u;
            cnt = cnt + f1;
            let t = (cumsum - f1) / cnt;
            if *u > t {
                theta = t;
            }
            else {
                break;
            }
        }

        for u in x.iter_mut() {
            *u = (*u - theta).max(F::zero());
        }
    }
}

//

#[test]
fn test_elem_simplex1()
{
    use float_eq::assert_float_eq;

    let op = ElemOperationSimplex;
    let coeffs = [1., 0., 1., 0., 0., 0., 0.];
    let w = &mut[0.; 3];

    let x = &mut[0.5, 1.5, -1.];
    op.eval(x, &[1.; 3], 1., false, &coeffs, w);
    assert_float_eq!(x.as_ref(), [0., 1., 0.].as_ref(), abs_all <= 1e-12);

    let x = &mut[0.2, 0.2, 0.2];
    op.eval(x, &[1.; 3], 1., false, &coeffs, w);
    assert_float_eq!(x.as_ref(), [1. / 3., 1. / 3., 1. / 3.].as_ref(), abs_all <= 1e-12);

    let x = &mut[0.6, 0.3, 0.1];
    op.eval(x, &[1.; 3], 1., false, &coeffs, w);
    assert_float_eq!(x.as_ref(), [0.6, 0.3, 0.1].as_ref(), abs_all <= 1e-12);
}
