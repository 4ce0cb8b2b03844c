//! Multi-threaded [`LinAlg`] backend of `proxop_core` by [rayon](https://crates.io/crates/rayon).
//!
//! [`RayonGeneric`] is a drop-in replacement of [`proxop_core::FloatGeneric`]:
//! every block and prox of `proxop_core` runs on it unchanged.
//! Each output element is written by exactly one worker.

use num_traits::Float;
use core::fmt::Debug;
use core::marker::PhantomData;
use rayon::prelude::*;
use proxop_core::operator::LinAlg;

/// Minimum number of elements a worker takes at once in elementwise kernels.
const MIN_LEN: usize = 1024;

/// `num::Float`-generic [`LinAlg`] implementation on the rayon global thread pool
#[derive(Clone)]
pub struct RayonGeneric<F>
{
    ph_f: PhantomData<F>,
}

impl<F: Float + Debug + Send + Sync> LinAlg for RayonGeneric<F>
{
    type F = F;

    fn norm(x: &[F]) -> F
    {
        Self::dot(x, x).sqrt()
    }

    fn dot(x: &[F], y: &[F]) -> F
    {
        assert_eq!(x.len(), y.len());

        x.par_iter().zip(y)
         .with_min_len(MIN_LEN)
         .map(|(u, v)| *u * *v)
         .reduce(F::zero, |a, b| a + b)
    }

    fn copy(x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        y.par_iter_mut().zip(x)
         .with_min_len(MIN_LEN)
         .for_each(|(v, u)| *v = *u);
    }

    fn scale(alpha: F, x: &mut[F])
    {
        x.par_iter_mut()
         .with_min_len(MIN_LEN)
         .for_each(|u| *u = alpha * *u);
    }

    fn add(alpha: F, x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        y.par_iter_mut().zip(x)
         .with_min_len(MIN_LEN)
         .for_each(|(v, u)| *v = *v + alpha * *u);
    }

    fn map_di<M>(x: &[F], d: &[F], y: &mut[F], map: M)
    where M: Fn(F, F, F) -> F + Sync + Send
    {
        assert_eq!(x.len(), y.len());
        assert_eq!(d.len(), y.len());

        y.par_iter_mut().zip(x).zip(d)
         .with_min_len(MIN_LEN)
         .for_each(|((v, u), t)| *v = map(*u, *t, *v));
    }

    // y = a*mat*x + b*y, one worker per element of y
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

        y.par_iter_mut().enumerate().for_each(|(r, v)| {
            let mut mat_x = F::zero();
            for (c, u) in x.iter().enumerate() {
                let m = if transpose {mat[r * n_row + c]} else {mat[c * n_row + r]};
                mat_x = mat_x + m * *u;
            }
            *v = alpha * mat_x + beta * *v;
        });
    }

    // one work item per output element, i.e. per (row of A, diagonal position)
    fn spmv_kron(diaglength: usize, ptr: &[i32], ind: &[i32], val: &[F], x: &[F], y: &mut[F])
    {
        assert!(diaglength > 0);
        assert_eq!(y.len(), (ptr.len() - 1) * diaglength);
        assert_eq!(ind.len(), val.len());

        y.par_iter_mut()
         .enumerate()
         .with_min_len(MIN_LEN)
         .for_each(|(i, u)| {
            let (r, k) = (i / diaglength, i % diaglength);

            for j in ptr[r] as usize.. ptr[r + 1] as usize {
                let c = ind[j] as usize;
                *u = *u + val[j] * x[c * diaglength + k];
            }
         });
    }

    fn for_each_group<K>(dim: usize, scratch_len: usize, x: &mut[F], tau_diag: &[F], kernel: K)
    where K: Fn(usize, &mut[F], &[F], &mut[F]) + Sync + Send
    {
        assert!(dim > 0);
        assert_eq!(x.len(), tau_diag.len());
        assert_eq!(x.len() % dim, 0);

        log::trace!("{} groups of dim {} on {} threads", x.len() / dim, dim, rayon::current_num_threads());

        x.par_chunks_mut(dim).zip(tau_diag.par_chunks(dim)).enumerate()
         .for_each_init(
             || vec![F::zero(); scratch_len],
             |scratch, (g, (x_g, tau_g))| kernel(g, x_g, tau_g, &mut scratch[..])
         );
    }
}
