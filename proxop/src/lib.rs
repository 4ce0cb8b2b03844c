/*!
Linear operators and proximal operators for first-order primal-dual solvers.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

This crate assembles the building blocks of [`proxop_core`] into the two objects
a primal-dual algorithm such as PDHG iterates with:
a linear operator \\(K\\) and the prox of a separable function \\(\sum_k f_k\\).

# General usage

1. Choose a [`proxop_core::operator::LinAlg`] implementation to use:
   * [`prelude::FloatGeneric`] -
     `num::Float`-generic, pure Rust on a single thread.
   * [`proxop_rayon` crate](https://crates.io/crates/proxop_rayon) -
     `num::Float`-generic, multi-threaded by rayon.
1. Build sparse matrices with [`CscBuild`] and place them as blocks
   (e.g. [`prelude::BlockSparseKronId`]) of a [`LinearOperator`].
1. Configure proxes (e.g. [`prelude::ProxElemOperation`] with [`prelude::ElemCoeffs`])
   on disjoint ranges covering all the variables and collect them in a [`ProxList`].
1. `initialize` both, which uploads their data to the device, and evaluate them in your iteration.

# Examples

Finite differences \\(D\\) of a 2-channel signal of 3 samples, and soft thresholding:

```
use float_eq::assert_float_eq;
use proxop::prelude::*;
use proxop::*;
use std::rc::Rc;
use std::cell::RefCell;

//env_logger::init(); // Use any logger crate as `proxop` uses `log` crate.

type La = FloatGeneric<f64>;

// D = [-1 1 0; 0 -1 1], applied to each channel
let mat_d = CscBuild::new(2, 3).iter_rowmaj([
    -1., 1., 0.,
    0., -1., 1.,
]);

let mut op_k = LinearOperator::<La>::new(4, 6)
    .block(mat_d.kron_id(0, 0, 2).unwrap());
op_k.initialize().unwrap();

// samples (x0, x1, x2) of channels (a, b), interleaved
let x = [1., 5., 4., 5., 2., 7.];
let mut y = [0.; 4];
op_k.eval(&mut y, &x).unwrap();
assert_float_eq!(y, [3., 0., -2., 2.], abs_all <= 1e-12);

// |.| on every difference
let abs = ProxElemOperation::<La, ElemOperation1D<Function1DAbs>>::new(0, 4, 1, ElemCoeffs::new()).unwrap();
let mut prox_g = ProxList::<La>::new().prox(Rc::new(RefCell::new(abs)));
prox_g.initialize(4).unwrap();

let mut z = [0.; 4];
prox_g.eval(&mut z, &y, &[1.; 4], 1., false).unwrap();
assert_float_eq!(z, [2., 0., -1., 1.], abs_all <= 1e-12);
```

## Other examples

You can find other tests of the operators in the `tests` directory.
*/

mod linear_operator;

pub use linear_operator::*;

//

mod prox_list;

pub use prox_list::*;

//

mod csc_build;

pub use csc_build::*;

//

/// Prelude
pub mod prelude
{
    pub use proxop_core::operator::{Block, Prox, LinAlg, OpError, SharedProx};
    pub use proxop_core::elemop::*;
    pub use proxop_core::{FloatGeneric, BlockZero, BlockDense, BlockSparseKronId, ProxZero, ProxElemOperation, ProxMoreau};
}
