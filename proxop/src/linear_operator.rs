use num_traits::{Float, Zero, One, NumCast};
use proxop_core::operator::{Block, LinAlg, OpError};

/// Parameters of [`LinearOperator::normest`]
#[derive(Debug, Clone, PartialEq)]
pub struct NormEstParam<F: Float>
{
    /// Relative tolerance between successive estimates.
    pub tol: F,
    /// Max iteration number.
    pub max_iter: usize,
}

impl<F: Float> Default for NormEstParam<F>
{
    fn default() -> Self
    {
        let ten = F::from(10).unwrap();

        NormEstParam {
            tol: ten.powi(-6),
            max_iter: 250,
        }
    }
}

impl<F: Float> NormEstParam<F>
{
    /// Changes parameters.
    ///
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut NormEstParam<F>)
    {
        f(&mut self);
        self
    }
}

//

/// Linear operator assembled from blocks
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// A matrix \\(K\\) of `nrows` rows and `ncols` columns, which is the sum of
/// non-overlapping [`Block`]s placed at their own offsets; uncovered entries are zero.
pub struct LinearOperator<L: LinAlg>
{
    nrows: usize,
    ncols: usize,
    blocks: Vec<Box<dyn Block<L>>>,
    initialized: bool,
}

impl<L: LinAlg> LinearOperator<L>
{
    /// Creates an empty instance.
    pub fn new(nrows: usize, ncols: usize) -> Self
    {
        LinearOperator {
            nrows,
            ncols,
            blocks: Vec::new(),
            initialized: false,
        }
    }

    /// Adds a block.
    ///
    /// Placement is checked by [`LinearOperator::initialize`], which shall be called again afterwards.
    pub fn add_block(&mut self, block: Box<dyn Block<L>>)
    {
        self.blocks.push(block);
        self.initialized = false;
    }
    /// Builder pattern of [`LinearOperator::add_block`].
    pub fn block<B: Block<L> + 'static>(mut self, block: B) -> Self
    {
        self.add_block(Box::new(block));
        self
    }

    /// Size of the operator.
    ///
    /// Returns a tuple of a number of rows and columns.
    pub fn size(&self) -> (usize, usize)
    {
        (self.nrows, self.ncols)
    }

    /// Blocks in order of addition.
    pub fn blocks(&self) -> &[Box<dyn Block<L>>]
    {
        &self.blocks
    }

    /// Checks placement and initializes every block.
    ///
    /// Returns `Err` with [`OpError::InvalidPlacement`] if a block is empty, does not fit in the operator
    /// or overlaps another one, or with the error of a failing block, in which case all blocks are released.
    pub fn initialize(&mut self) -> Result<(), OpError>
    {
        for (i, b) in self.blocks.iter().enumerate() {
            let p = b.placement();

            if p.nrows == 0 || p.ncols == 0 {
                log::error!("block {} at ({}, {}) has zero size {}x{}", i, p.row, p.col, p.nrows, p.ncols);
                return Err(OpError::InvalidPlacement);
            }
            if !p.fits(self.nrows, self.ncols) {
                log::error!("block {} at ({}, {}) of size {}x{} out of {}x{}",
                    i, p.row, p.col, p.nrows, p.ncols, self.nrows, self.ncols);
                return Err(OpError::InvalidPlacement);
            }
            if let Some(j) = self.blocks[.. i].iter().position(|o| o.placement().overlaps(&p)) {
                log::error!("block {} overlaps block {}", i, j);
                return Err(OpError::InvalidPlacement);
            }
        }

        for i in 0.. self.blocks.len() {
            if let Err(e) = self.blocks[i].initialize() {
                log::error!("block {} failed to initialize: {}", i, e);
                self.release();
                return Err(e);
            }
        }
        self.initialized = true;

        log::debug!("linear operator {}x{}: {} blocks, {} bytes",
            self.nrows, self.ncols, self.blocks.len(), self.gpu_mem_amount());
        Ok(())
    }

    /// Releases every block.
    pub fn release(&mut self)
    {
        for b in self.blocks.iter_mut() {
            b.release();
        }
        self.initialized = false;
    }

    /// Whether [`LinearOperator::initialize`] has succeeded since the last change.
    pub fn is_initialized(&self) -> bool
    {
        self.initialized
    }

    fn check(&self, result_len: usize, rhs_len: usize) -> Result<(), OpError>
    {
        if !self.initialized {
            log::error!("linear operator evaluated while not initialized");
            return Err(OpError::NotInitialized);
        }
        if result_len != self.nrows || rhs_len != self.ncols {
            log::error!("linear operator {}x{}: result {} / rhs {}", self.nrows, self.ncols, result_len, rhs_len);
            return Err(OpError::DimMismatch);
        }
        Ok(())
    }

    /// Calculates `result` \\(= K\\) `rhs`.
    ///
    /// `result` has `nrows` elements and `rhs` has `ncols` elements.
    pub fn eval(&self, result: &mut [L::F], rhs: &[L::F]) -> Result<(), OpError>
    {
        self.check(result.len(), rhs.len())?;

        result.fill(L::F::zero());
        for b in self.blocks.iter() {
            b.eval_add(result, rhs)?;
        }
        Ok(())
    }

    /// Calculates `result` \\(= K^T\\) `rhs`.
    ///
    /// `result` has `ncols` elements and `rhs` has `nrows` elements.
    pub fn eval_adjoint(&self, result: &mut [L::F], rhs: &[L::F]) -> Result<(), OpError>
    {
        self.check(rhs.len(), result.len())?;

        result.fill(L::F::zero());
        for b in self.blocks.iter() {
            b.eval_adjoint_add(result, rhs)?;
        }
        Ok(())
    }

    /// Sums \\(\sum_j |K_{ij}|^\alpha\\) of every row \\(i\\).
    pub fn row_sums(&self, alpha: L::F) -> Vec<L::F>
    {
        let mut sums = vec![L::F::zero(); self.nrows];

        for b in self.blocks.iter() {
            let row = b.row();
            for r in 0.. b.nrows() {
                sums[row + r] = sums[row + r] + b.row_sum(r, alpha);
            }
        }
        sums
    }

    /// Sums \\(\sum_i |K_{ij}|^\alpha\\) of every column \\(j\\).
    pub fn col_sums(&self, alpha: L::F) -> Vec<L::F>
    {
        let mut sums = vec![L::F::zero(); self.ncols];

        for b in self.blocks.iter() {
            let col = b.col();
            for c in 0.. b.ncols() {
                sums[col + c] = sums[col + c] + b.col_sum(c, alpha);
            }
        }
        sums
    }

    /// Bytes of device memory held by the blocks.
    pub fn gpu_mem_amount(&self) -> usize
    {
        self.blocks.iter().map(|b| b.gpu_mem_amount()).sum()
    }

    /// Estimates the spectral norm \\(\\|K\\|\_2\\).
    ///
    /// Power iteration on \\(K^T K\\) from a fixed start vector,
    /// until two successive estimates agree within `param.tol` relatively
    /// or `param.max_iter` iterations are done.
    pub fn normest(&self, param: &NormEstParam<L::F>) -> Result<L::F, OpError>
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();

        let mut x = Vec::with_capacity(self.ncols);
        for i in 0.. self.ncols {
            x.push(<L::F as NumCast>::from(i + 1).ok_or(OpError::DimMismatch)?.sqrt());
        }
        let mut kx = vec![f0; self.nrows];

        let nx = L::norm(&x);
        if nx > f0 {
            L::scale(nx.recip(), &mut x);
        }

        let mut est = f0;
        for i in 0.. param.max_iter {
            self.eval(&mut kx, &x)?;
            self.eval_adjoint(&mut x, &kx)?;

            let n = L::norm(&x);
            if n == f0 {
                log::debug!("normest: zero at iteration {}", i);
                return Ok(f0);
            }
            L::scale(f1 / n, &mut x);

            let prev = est;
            est = n.sqrt();
            log::trace!("normest: {} {:?}", i, est);

            if (est - prev).abs() <= param.tol * est {
                log::debug!("normest: converged at iteration {}", i);
                return Ok(est);
            }
        }

        log::warn!("normest: not converged in {} iterations", param.max_iter);
        Ok(est)
    }
}

//

#[test]
fn test_normest_param1()
{
    let p = NormEstParam::<f64>::default().par(|p| p.max_iter = 10);
    assert_eq!(p.max_iter, 10);
    assert!((p.tol - 1e-6).abs() < 1e-15);
}
