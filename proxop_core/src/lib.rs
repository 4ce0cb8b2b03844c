//! Core of the proxop crate: linear operator blocks, proximal operators and the backend trait.
//!
//! This crate is `no_std` with `alloc`.
//! See the `proxop` crate for assembling blocks into a linear operator and proxes into a separable function.

#![no_std]

extern crate alloc;

pub mod operator;
pub mod elemop;

//

mod floatgeneric;

pub use floatgeneric::*;

//

mod block_zero;
mod block_dense;
mod block_sparse_kron_id;

pub use block_zero::*;
pub use block_dense::*;
pub use block_sparse_kron_id::*;

//

mod prox_zero;
mod prox_elem_operation;
mod prox_moreau;

pub use prox_zero::*;
pub use prox_elem_operation::*;
pub use prox_moreau::*;
