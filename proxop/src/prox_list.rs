use proxop_core::operator::{LinAlg, OpError, SepGroup, SharedProx};

/// Separable sum of proximal operators
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Holds proxes on disjoint ranges partitioning one variable array of `nvars` elements,
/// which together evaluate the prox of \\(\sum_k f_k(x_{I_k})\\).
/// Use [`proxop_core::ProxZero`] for free variables.
pub struct ProxList<L: LinAlg>
{
    proxes: Vec<SharedProx<L>>,
    nvars: Option<usize>,
}

impl<L: LinAlg> Default for ProxList<L>
{
    fn default() -> Self
    {
        ProxList {
            proxes: Vec::new(),
            nvars: None,
        }
    }
}

impl<L: LinAlg> ProxList<L>
{
    /// Creates an empty instance.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Adds a prox.
    ///
    /// Its range is checked by [`ProxList::initialize`], which shall be called again afterwards.
    pub fn add(&mut self, prox: SharedProx<L>)
    {
        self.proxes.push(prox);
        self.nvars = None;
    }
    /// Builder pattern of [`ProxList::add`].
    pub fn prox(mut self, prox: SharedProx<L>) -> Self
    {
        self.add(prox);
        self
    }

    /// Proxes in order of addition.
    pub fn proxes(&self) -> &[SharedProx<L>]
    {
        &self.proxes
    }

    /// Checks ranges and initializes every prox.
    ///
    /// Returns `Err` with [`OpError::InvalidPlacement`] unless the ranges of the proxes
    /// tile `0..nvars` without overlap, or with the error of a failing prox, in which case all proxes are released.
    pub fn initialize(&mut self, nvars: usize) -> Result<(), OpError>
    {
        let mut ranges: Vec<(usize, usize, usize)> = self.proxes.iter().enumerate()
            .map(|(i, p)| {
                let p = p.borrow();
                (p.index(), p.index() + p.size(), i)
            })
            .collect();
        ranges.sort();

        if let Some((_, end, i)) = ranges.iter().find(|(_, end, _)| *end > nvars) {
            log::error!("prox {} reaches {} beyond {} variables", i, end, nvars);
            return Err(OpError::InvalidPlacement);
        }
        let mut covered = 0;
        for (sta, end, i) in ranges.iter() {
            if *sta < covered {
                log::error!("prox {} at {} overlaps variables up to {}", i, sta, covered);
                return Err(OpError::InvalidPlacement);
            }
            if *sta > covered {
                log::error!("variables {}..{} not covered by any prox", covered, sta);
                return Err(OpError::InvalidPlacement);
            }
            covered = *end;
        }
        if covered < nvars {
            log::error!("variables {}..{} not covered by any prox", covered, nvars);
            return Err(OpError::InvalidPlacement);
        }

        for i in 0.. self.proxes.len() {
            let r = self.proxes[i].borrow_mut().initialize();
            if let Err(e) = r {
                log::error!("prox {} failed to initialize: {}", i, e);
                self.release();
                return Err(e);
            }
        }
        self.nvars = Some(nvars);

        log::debug!("prox list on {} variables: {} proxes, {} bytes", nvars, self.proxes.len(), self.gpu_mem_amount());
        Ok(())
    }

    /// Releases every prox.
    pub fn release(&mut self)
    {
        for p in self.proxes.iter() {
            p.borrow_mut().release();
        }
        self.nvars = None;
    }

    /// Number of variables given to the last successful [`ProxList::initialize`].
    pub fn nvars(&self) -> Option<usize>
    {
        self.nvars
    }

    /// Evaluates every prox from `arg` into `result`.
    ///
    /// `result`, `arg` and `tau_diag` have `nvars` elements.
    pub fn eval(&self, result: &mut [L::F], arg: &[L::F], tau_diag: &[L::F], tau_scal: L::F, invert_tau: bool) -> Result<(), OpError>
    {
        let nvars = self.nvars.ok_or_else(|| {
            log::error!("prox list evaluated while not initialized");
            OpError::NotInitialized
        })?;

        if result.len() != nvars || arg.len() != nvars || tau_diag.len() != nvars {
            log::error!("prox list on {} variables: result {} / arg {} / tau_diag {}",
                nvars, result.len(), arg.len(), tau_diag.len());
            return Err(OpError::DimMismatch);
        }

        for p in self.proxes.iter() {
            p.borrow_mut().eval(result, arg, tau_diag, tau_scal, invert_tau)?;
        }
        Ok(())
    }

    /// Bytes of device memory held by the proxes.
    pub fn gpu_mem_amount(&self) -> usize
    {
        self.proxes.iter().map(|p| p.borrow().gpu_mem_amount()).sum()
    }

    /// Groups of every prox, sorted by start index.
    pub fn separable_structure(&self) -> Vec<SepGroup>
    {
        let mut groups: Vec<SepGroup> = self.proxes.iter()
            .flat_map(|p| p.borrow().separable_structure())
            .collect();
        groups.sort_by_key(|(_, _, index)| *index);
        groups
    }
}
