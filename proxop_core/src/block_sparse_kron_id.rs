use num_traits::{Float, Zero};
use alloc::vec;
use alloc::vec::Vec;
use core::mem::size_of;
use crate::operator::{Block, LinAlg, OpError, Placement, DevBuf, abs_pow};

//

/// Compressed-sparse-column storage.
///
/// Column `c` holds the entries `ind[k], val[k]` for `k` in `ptr[c]..ptr[c + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMat<F>
{
    pub nrows: usize,
    pub ncols: usize,
    pub val: Vec<F>,
    pub ptr: Vec<i32>,
    pub ind: Vec<i32>,
}

impl<F: Float> CscMat<F>
{
    /// Number of stored entries.
    pub fn nnz(&self) -> usize
    {
        self.val.len()
    }

    /// Entries of column `c` as `(row, value)` pairs.
    pub fn col_iter(&self, c: usize) -> impl Iterator<Item=(usize, F)> + '_
    {
        let (sta, end) = (self.ptr[c] as usize, self.ptr[c + 1] as usize);

        self.ind[sta.. end].iter().zip(&self.val[sta.. end]).map(|(r, v)| (*r as usize, *v))
    }

    /// CSC of the transposed matrix, by counting rows.
    ///
    /// Entries within each column of the result come out in ascending row order.
    pub fn transpose(&self) -> CscMat<F>
    {
        let (m, n) = (self.nrows, self.ncols);
        let nnz = self.nnz();

        let mut ptr_t = vec![0_i32; m + 1];
        for r in &self.ind {
            ptr_t[*r as usize + 1] += 1;
        }
        for r in 0.. m {
            ptr_t[r + 1] += ptr_t[r];
        }

        let mut next: Vec<usize> = ptr_t[.. m].iter().map(|p| *p as usize).collect();
        let mut ind_t = vec![0_i32; nnz];
        let mut val_t = vec![F::zero(); nnz];

        for c in 0.. n {
            for (r, v) in self.col_iter(c) {
                let dst = next[r];
                ind_t[dst] = c as i32;
                val_t[dst] = v;
                next[r] = dst + 1;
            }
        }

        CscMat {
            nrows: n,
            ncols: m,
            val: val_t,
            ptr: ptr_t,
            ind: ind_t,
        }
    }

    fn mem_bytes(&self) -> usize
    {
        self.val.len() * size_of::<F>() + (self.ptr.len() + self.ind.len()) * size_of::<i32>()
    }
}

struct CscDev<F>
{
    val: DevBuf<F>,
    ptr: DevBuf<i32>,
    ind: DevBuf<i32>,
}

impl<F: Float> CscDev<F>
{
    fn upload(host: &CscMat<F>) -> Result<Self, OpError>
    {
        Ok(CscDev {
            val: DevBuf::upload(&host.val)?,
            ptr: DevBuf::upload(&host.ptr)?,
            ind: DevBuf::upload(&host.ind)?,
        })
    }

    fn mem_bytes(&self) -> usize
    {
        self.val.mem_bytes() + self.ptr.mem_bytes() + self.ind.mem_bytes()
    }
}

//

/// Kronecker-with-identity sparse block
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Implements the block \\(M \otimes I_d\\), where \\(M\\) is a small sparse matrix
/// and \\(d\\) is `diaglength`. The expanded matrix is never formed:
/// chunk \\(i\\) of the result (elements `i * d..(i + 1) * d`) receives
/// \\(\sum_j M_{ij}\\) times chunk \\(j\\) of the argument.
///
/// \\(M\\) is kept in CSC form for the adjoint and its transpose in CSC form for the forward
/// evaluation, on the host permanently and on the device while initialized.
pub struct BlockSparseKronId<L: LinAlg>
{
    placement: Placement,
    diaglength: usize,

    host: CscMat<L::F>,
    host_t: CscMat<L::F>,

    dev: Option<(CscDev<L::F>, CscDev<L::F>)>,
}

impl<L: LinAlg> BlockSparseKronId<L>
{
    /// Creates an instance from a CSC matrix.
    ///
    /// Returns [`BlockSparseKronId`] instance of `m * diaglength` rows and `n * diaglength` columns,
    /// or `Err` with [`OpError::InvalidCsc`] / [`OpError::DimMismatch`] if the arrays are malformed.
    /// No device memory is touched.
    /// * `row`, `col` place the block inside its operator.
    /// * `diaglength` is the size of the identity factor.
    /// * `m`, `n` are the numbers of rows and columns of \\(M\\), `nnz` its number of stored entries.
    /// * `val`, `ptr`, `ind` are the CSC arrays of \\(M\\), 0-indexed.
    pub fn create_from_csc(
        row: usize, col: usize, diaglength: usize,
        m: usize, n: usize, nnz: usize,
        val: &[L::F], ptr: &[i32], ind: &[i32]
    ) -> Result<Self, OpError>
    {
        if diaglength == 0 || m == 0 || n == 0 {
            log::error!("empty block: diaglength {}, M {}x{}", diaglength, m, n);
            return Err(OpError::DimMismatch);
        }
        if ptr.len() != n + 1 || ind.len() != nnz || val.len() != nnz {
            log::error!("CSC lengths: ptr {} (expected {}), ind {} / val {} (expected {})",
                ptr.len(), n + 1, ind.len(), val.len(), nnz);
            return Err(OpError::InvalidCsc);
        }
        if ptr[0] != 0 || ptr[n] as usize != nnz {
            log::error!("CSC ptr must span 0..{}, got {}..{}", nnz, ptr[0], ptr[n]);
            return Err(OpError::InvalidCsc);
        }
        if let Some(c) = (0.. n).find(|c| ptr[*c] > ptr[c + 1]) {
            log::error!("CSC ptr decreasing at column {}", c);
            return Err(OpError::InvalidCsc);
        }
        if let Some(k) = ind.iter().position(|r| *r < 0 || *r as usize >= m) {
            log::error!("CSC row index {} at {} out of 0..{}", ind[k], k, m);
            return Err(OpError::InvalidCsc);
        }
        if val.iter().any(|v| v.is_zero()) {
            log::warn!("CSC values contain explicit zeros");
        }

        let host = CscMat {
            nrows: m,
            ncols: n,
            val: val.to_vec(),
            ptr: ptr.to_vec(),
            ind: ind.to_vec(),
        };
        let host_t = host.transpose();

        Ok(BlockSparseKronId {
            placement: Placement::new(row, col, m * diaglength, n * diaglength),
            diaglength,
            host,
            host_t,
            dev: None,
        })
    }

    /// Size of the identity factor.
    pub fn diaglength(&self) -> usize
    {
        self.diaglength
    }

    /// Host copy of \\(M\\).
    pub fn mat(&self) -> &CscMat<L::F>
    {
        &self.host
    }

    /// Host copy of \\(M^T\\).
    pub fn mat_t(&self) -> &CscMat<L::F>
    {
        &self.host_t
    }
}

impl<L: LinAlg> Block<L> for BlockSparseKronId<L>
{
    fn placement(&self) -> Placement
    {
        self.placement
    }

    fn initialize(&mut self) -> Result<(), OpError>
    {
        let dev = CscDev::upload(&self.host)?;
        let dev_t = CscDev::upload(&self.host_t)?;
        self.dev = Some((dev, dev_t));

        log::debug!("kron block at ({}, {}): M {}x{} nnz {}, d {}, {} bytes",
            self.placement.row, self.placement.col,
            self.host.nrows, self.host.ncols, self.host.nnz(), self.diaglength,
            self.gpu_mem_amount());
        Ok(())
    }

    fn release(&mut self)
    {
        self.dev = None;
    }

    fn is_initialized(&self) -> bool
    {
        self.dev.is_some()
    }

    fn row_sum(&self, row: usize, alpha: L::F) -> L::F
    {
        // column of M^T
        self.host_t.col_iter(row / self.diaglength)
            .fold(L::F::zero(), |s, (_, v)| s + abs_pow(v, alpha))
    }

    fn col_sum(&self, col: usize, alpha: L::F) -> L::F
    {
        self.host.col_iter(col / self.diaglength)
            .fold(L::F::zero(), |s, (_, v)| s + abs_pow(v, alpha))
    }

    fn gpu_mem_amount(&self) -> usize
    {
        match &self.dev {
            Some((dev, dev_t)) => dev.mem_bytes() + dev_t.mem_bytes(),
            None => self.host.mem_bytes() + self.host_t.mem_bytes(),
        }
    }

    fn eval_local_add(&self, res: &mut [L::F], rhs: &[L::F]) -> Result<(), OpError>
    {
        let (_, dev_t) = self.dev.as_ref().ok_or(OpError::NotInitialized)?;

        // rows of M are the columns of M^T
        L::spmv_kron(self.diaglength, &dev_t.ptr, &dev_t.ind, &dev_t.val, rhs, res);
        Ok(())
    }

    fn eval_adjoint_local_add(&self, res: &mut [L::F], rhs: &[L::F]) -> Result<(), OpError>
    {
        let (dev, _) = self.dev.as_ref().ok_or(OpError::NotInitialized)?;

        L::spmv_kron(self.diaglength, &dev.ptr, &dev.ind, &dev.val, rhs, res);
        Ok(())
    }
}

//

#[cfg(test)]
fn fixture_3x2() -> (usize, usize, usize, [f64; 4], [i32; 3], [i32; 4])
{
    // M = [1 0; 2 -3; 0 4]
    (3, 2, 4, [1., 2., -3., 4.], [0, 2, 4], [0, 1, 1, 2])
}

#[test]
fn test_kron_transpose1()
{
    type L = crate::FloatGeneric<f64>;

    let (m, n, nnz, val, ptr, ind) = fixture_3x2();
    let b = BlockSparseKronId::<L>::create_from_csc(0, 0, 1, m, n, nnz, &val, &ptr, &ind).unwrap();

    // M^T = [1 2 0; 0 -3 4]
    let t = b.mat_t();
    assert_eq!((t.nrows, t.ncols), (2, 3));
    assert_eq!(t.ptr, vec![0, 1, 3, 4]);
    assert_eq!(t.ind, vec![0, 0, 1, 1]);
    assert_eq!(t.val, vec![1., 2., -3., 4.]);

    assert_eq!(&t.transpose(), b.mat());
}

#[test]
fn test_kron_dense1()
{
    use float_eq::assert_float_eq;

    type L = crate::FloatGeneric<f64>;

    let _ = env_logger::builder().is_test(true).try_init();

    // M = [1 2; 0 3]
    let mut b = BlockSparseKronId::<L>::create_from_csc(0, 0, 3, 2, 2, 3, &[1., 2., 3.], &[0, 1, 3], &[0, 0, 1]).unwrap();
    b.initialize().unwrap();

    // kron(M, I_3) column-major
    let m_dense = |r: usize, c: usize| {
        let mv = [[1., 2.], [0., 3.]];
        if r % 3 == c % 3 {mv[r / 3][c / 3]} else {0.}
    };

    let x = [1., -2., 3., 0.5, 4., -1.];
    let y = &mut[0.; 6];
    b.eval_add(y, &x).unwrap();

    let mut y_ref = [0.; 6];
    for r in 0.. 6 {
        for c in 0.. 6 {
            y_ref[r] += m_dense(r, c) * x[c];
        }
    }
    assert_float_eq!(y.as_ref(), y_ref.as_ref(), abs_all <= 1e-12);

    let z = &mut[0.; 6];
    b.eval_adjoint_add(z, &x).unwrap();

    let mut z_ref = [0.; 6];
    for c in 0.. 6 {
        for r in 0.. 6 {
            z_ref[c] += m_dense(r, c) * x[r];
        }
    }
    assert_float_eq!(z.as_ref(), z_ref.as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_kron_sums1()
{
    type L = crate::FloatGeneric<f64>;

    let (m, n, nnz, val, ptr, ind) = fixture_3x2();
    let b1 = BlockSparseKronId::<L>::create_from_csc(0, 0, 1, m, n, nnz, &val, &ptr, &ind).unwrap();
    let b4 = BlockSparseKronId::<L>::create_from_csc(0, 0, 4, m, n, nnz, &val, &ptr, &ind).unwrap();

    assert_eq!(b1.row_sum(1, 1.), 5.);
    assert_eq!(b1.row_sum(1, 2.), 13.);
    assert_eq!(b1.col_sum(1, 1.), 7.);
    assert_eq!(b1.col_sum(1, 2.), 25.);

    // independent of the identity factor
    for k in 4.. 8 {
        assert_eq!(b4.row_sum(k, 2.), 13.);
        assert_eq!(b4.col_sum(k, 1.), 7.);
    }
    assert_eq!(b4.nrows(), 12);
    assert_eq!(b4.ncols(), 8);
}

#[test]
fn test_kron_lifecycle1()
{
    type L = crate::FloatGeneric<f64>;

    let (m, n, nnz, val, ptr, ind) = fixture_3x2();
    let mut b = BlockSparseKronId::<L>::create_from_csc(1, 2, 2, m, n, nnz, &val, &ptr, &ind).unwrap();

    let y = &mut[0.; 7];
    let x = &[1.; 6];
    assert_eq!(b.eval_add(y, x), Err(OpError::NotInitialized));

    let planned = b.gpu_mem_amount();
    b.initialize().unwrap();
    assert_eq!(b.gpu_mem_amount(), planned);
    assert_eq!(planned, 2 * (4 * 8 + 4 * 4) + (3 + 4) * 4);

    assert_eq!(b.eval_add(y, x), Ok(()));
    assert_eq!(y[0], 0.);
    assert_eq!(&y[1..], &[1., 1., -1., -1., 4., 4.]);

    assert_eq!(b.eval_add(&mut[0.; 6], x), Err(OpError::OutOfRange));

    b.release();
    assert_eq!(b.eval_adjoint_add(&mut[0.; 6], &[0.; 7]), Err(OpError::NotInitialized));

    b.initialize().unwrap();
    assert!(b.is_initialized());
}

#[test]
fn test_kron_invalid1()
{
    type L = crate::FloatGeneric<f64>;

    let val = [1., 2., -3., 4.];

    let r = BlockSparseKronId::<L>::create_from_csc(0, 0, 1, 3, 2, 4, &val, &[0, 2], &[0, 1, 1, 2]);
    assert_eq!(r.err(), Some(OpError::InvalidCsc));
    let r = BlockSparseKronId::<L>::create_from_csc(0, 0, 1, 3, 2, 4, &val, &[0, 3, 2], &[0, 1, 1, 2]);
    assert_eq!(r.err(), Some(OpError::InvalidCsc));
    let r = BlockSparseKronId::<L>::create_from_csc(0, 0, 1, 3, 2, 4, &val, &[0, 2, 4], &[0, 1, 1, 3]);
    assert_eq!(r.err(), Some(OpError::InvalidCsc));
    let r = BlockSparseKronId::<L>::create_from_csc(0, 0, 1, 3, 2, 4, &val, &[0, 2, 4], &[0, -1, 1, 2]);
    assert_eq!(r.err(), Some(OpError::InvalidCsc));
    let r = BlockSparseKronId::<L>::create_from_csc(0, 0, 1, 3, 2, 4, &val, &[0, 2, 3], &[0, 1, 1, 2]);
    assert_eq!(r.err(), Some(OpError::InvalidCsc));
    let r = BlockSparseKronId::<L>::create_from_csc(0, 0, 0, 3, 2, 4, &val, &[0, 2, 4], &[0, 1, 1, 2]);
    assert_eq!(r.err(), Some(OpError::DimMismatch));
}
