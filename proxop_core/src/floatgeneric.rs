use num_traits::Float;
use core::fmt::Debug;
use core::marker::PhantomData;
use core::ops::Index;
use alloc::vec;
use crate::operator::LinAlg;

/// `num::Float`-generic [`LinAlg`] implementation
///
/// All kernels run sequentially on the calling thread, in pure Rust.
#[derive(Clone)]
pub struct FloatGeneric<F>
{
    ph_f: PhantomData<F>,
}

//

struct MatIdx<'a, F: Float>
{
    n_row: usize,
    n_col: usize,
    mat: &'a[F],
    transpose: bool,
}

impl<'a, F: Float> MatIdx<'a, F>
{
    fn idx(&self, (r, c): (usize, usize)) -> usize
    {
        let (r, c) = if !self.transpose {(r, c)} else {(c, r)};

        assert!(r < self.n_row);
        assert!(c < self.n_col);

        c * self.n_row + r
    }
}

impl<'a, F: Float> Index<(usize, usize)> for MatIdx<'a, F>
{
    type Output = F;

    fn index(&self, index: (usize, usize)) -> &Self::Output
    {
        &self.mat[self.idx(index)]
    }
}

//

impl<F: Float + Debug + Send + Sync> LinAlg for FloatGeneric<F>
{
    type F = F;

    fn norm(x: &[F]) -> F
    {
        Self::dot(x, x).sqrt()
    }

    fn dot(x: &[F], y: &[F]) -> F
    {
        assert_eq!(x.len(), y.len());

        let mut sum = F::zero();
        for (u, v) in x.iter().zip(y) {
            sum = sum + *u * *v;
        }
        sum
    }

    fn copy(x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        y.copy_from_slice(x);
    }

    fn scale(alpha: F, x: &mut[F])
    {
        for u in x {
            *u = alpha * *u;
        }
    }

    fn add(alpha: F, x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *v + alpha * *u;
        }
    }

    fn map_di<M>(x: &[F], d: &[F], y: &mut[F], map: M)
    where M: Fn(F, F, F) -> F + Sync + Send
    {
        assert_eq!(x.len(), y.len());
        assert_eq!(d.len(), y.len());

        for (i, v) in y.iter_mut().enumerate() {
            *v = map(x[i], d[i], *v);
        }
    }

    // y = a*mat*x + b*y
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: F, mat: &[F], x: &[F], beta: F, y: &mut[F])
    {
        assert_eq!(mat.len(), n_row * n_col);
        if transpose {
            assert_eq!(x.len(), n_row);
            assert_eq!(y.len(), n_col);
        } else {
            assert_eq!(x.len(), n_col);
            assert_eq!(y.len(), n_row);
        };

        let mat = MatIdx {
            n_row, n_col, mat, transpose,
        };

        for r in 0.. y.len() {
            let mut mat_x = F::zero();
            for c in 0.. x.len() {
                mat_x = mat_x + mat[(r, c)] * x[c];
            }
            y[r] = alpha * mat_x + beta * y[r];
        }
    }

    fn spmv_kron(diaglength: usize, ptr: &[i32], ind: &[i32], val: &[F], x: &[F], y: &mut[F])
    {
        assert!(diaglength > 0);
        assert_eq!(y.len(), (ptr.len() - 1) * diaglength);
        assert_eq!(ind.len(), val.len());

        for (r, y_chunk) in y.chunks_mut(diaglength).enumerate() {
            for k in ptr[r] as usize.. ptr[r + 1] as usize {
                let c = ind[k] as usize;
                let v = val[k];

                let x_chunk = &x[c * diaglength.. (c + 1) * diaglength];
                for (u, w) in y_chunk.iter_mut().zip(x_chunk) {
                    *u = *u + v * *w;
                }
            }
        }
    }

    fn for_each_group<K>(dim: usize, scratch_len: usize, x: &mut[F], tau_diag: &[F], kernel: K)
    where K: Fn(usize, &mut[F], &[F], &mut[F]) + Sync + Send
    {
        assert!(dim > 0);
        assert_eq!(x.len(), tau_diag.len());
        assert_eq!(x.len() % dim, 0);

        let mut scratch = vec![F::zero(); scratch_len];

        for (g, (x_g, tau_g)) in x.chunks_mut(dim).zip(tau_diag.chunks(dim)).enumerate() {
            kernel(g, x_g, tau_g, &mut scratch[..]);
        }
    }
}

//

#[test]
fn test_spmv_kron1()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    // A = [1 0; 2 3] compressed by rows
    let ptr = &[0, 1, 3];
    let ind = &[0, 0, 1];
    let val = &[1., 2., 3.];

    let x = &[1., 10., 2., 20.];
    let y = &mut[1., 1., 1., 1.];

    L::spmv_kron(2, ptr, ind, val, x, y);
    assert_float_eq!(y.as_ref(), [2., 11., 9., 81.].as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_for_each_group1()
{
    type L = FloatGeneric<f64>;

    let x = &mut[1., 2., 3., 4., 5., 6.];
    let t = &[1.; 6];

    L::for_each_group(3, 1, x, t, |g, x_g, _, w| {
        w[0] = x_g[0];
        for u in x_g.iter_mut() {
            *u = *u - w[0] + g as f64;
        }
    });
    assert_eq!(x, &[0., 1., 2., 1., 2., 3.]);
}
