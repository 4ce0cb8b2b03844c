//! Numeric backend

use num_traits::Float;
use core::fmt::Debug;

/// Numeric backend trait.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Every [`crate::operator::Block`] and [`crate::operator::Prox`] is generic over a backend
/// which launches the data-parallel kernels on the arrays it is given.
/// Kernels are independent per output element (or per group), so a backend is free
/// to run them sequentially or on as many workers as it has.
pub trait LinAlg: Clone
{
    /// Floating point data type used as scalars.
    type F: Float + Debug + Send + Sync;

    /// Calculate 2-norm \\(\\|x\\|_2=\sqrt{\sum_i x_i^2}\\).
    fn norm(x: &[Self::F]) -> Self::F;

    /// Calculate inner product \\(\langle x, y \rangle\\).
    ///
    /// `x` and `y` shall have the same length.
    fn dot(x: &[Self::F], y: &[Self::F]) -> Self::F;

    /// Copy from `x` to `y` of the same length.
    fn copy(x: &[Self::F], y: &mut [Self::F]);

    /// Calculate \\(\alpha x\\) in place.
    fn scale(alpha: Self::F, x: &mut [Self::F]);

    /// Calculate \\(\alpha x + y\\).
    ///
    /// * `y` is a vector \\(y\\) before entry, \\(\alpha x + y\\) on exit.
    ///   `x` and `y` shall have the same length.
    fn add(alpha: Self::F, x: &[Self::F], y: &mut [Self::F]);

    /// Elementwise map over a vector and a diagonal.
    ///
    /// * `y` is replaced with `map(x[i], d[i], y[i])` for every `i`.
    ///   `x`, `d` and `y` shall have the same length.
    fn map_di<M>(x: &[Self::F], d: &[Self::F], y: &mut [Self::F], map: M)
    where M: Fn(Self::F, Self::F, Self::F) -> Self::F + Sync + Send;

    /// Calculates \\(\alpha G x + \beta y\\), or \\(\alpha G^T x + \beta y\\) if `transpose`.
    ///
    /// * `mat` is a matrix \\(G\\) with `n_row` rows and `n_col` columns, stored in column-major.
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: Self::F, mat: &[Self::F], x: &[Self::F], beta: Self::F, y: &mut [Self::F]);

    /// Calculates \\(y + (A \otimes I_d) x\\) without expanding the Kronecker product.
    ///
    /// * `diaglength` is \\(d\\), the size of the identity factor.
    /// * `ptr`, `ind` and `val` are \\(A\\) compressed by rows of the result:
    ///   the stored entries of row `r` are `ind[k], val[k]` for `k` in `ptr[r]..ptr[r + 1]`.
    /// * `x` is split into chunks of `diaglength` elements, one per column of \\(A\\).
    /// * `y` is a vector \\(y\\) before entry, \\(y + (A \otimes I_d) x\\) on exit.
    ///   Its length shall be `(ptr.len() - 1) * diaglength`.
    fn spmv_kron(diaglength: usize, ptr: &[i32], ind: &[i32], val: &[Self::F], x: &[Self::F], y: &mut [Self::F]);

    /// Launches `kernel` once per contiguous group of `dim` elements.
    ///
    /// `kernel` receives the group number, the group of `x` to be modified in place,
    /// the matching group of `tau_diag`, and a scratch slice of `scratch_len` elements
    /// which is private to the worker running it.
    /// `x` and `tau_diag` shall have the same length, a multiple of `dim`.
    fn for_each_group<K>(dim: usize, scratch_len: usize, x: &mut [Self::F], tau_diag: &[Self::F], kernel: K)
    where K: Fn(usize, &mut [Self::F], &[Self::F], &mut [Self::F]) + Sync + Send;
}
