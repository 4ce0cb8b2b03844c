use std::rc::Rc;
use std::cell::RefCell;
use float_eq::assert_float_eq;
use proxop::prelude::*;
use proxop::*;

type La = FloatGeneric<f64>;

fn shared<P: Prox<La> + 'static>(p: P) -> SharedProx<La>
{
    Rc::new(RefCell::new(p))
}

//

#[test]
fn test_prox_list1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // x0..2: |x - 1|, x2..4: free, x4..7: simplex, x7..9: indicator of x >= 0 via Moreau of x <= 0
    let abs = ProxElemOperation::<La, ElemOperation1D<Function1DAbs>>::new(0, 2, 1, ElemCoeffs::new().par(|p| {
        p.b = vec![1.];
    })).unwrap();
    let simplex = ProxElemOperation::<La, ElemOperationSimplex>::new(4, 1, 3, ElemCoeffs::new()).unwrap();
    let leq0 = ProxElemOperation::<La, ElemOperation1D<Function1DIndLeq0>>::new(7, 2, 1, ElemCoeffs::new()).unwrap();

    let mut list = ProxList::new()
        .prox(shared(simplex))
        .prox(shared(abs))
        .prox(shared(ProxZero::new(2, 2)))
        .prox(shared(ProxMoreau::new(shared(leq0))));

    assert_eq!(list.initialize(8), Err(OpError::InvalidPlacement));
    list.initialize(9).unwrap();
    assert_eq!(list.nvars(), Some(9));

    assert_eq!(list.separable_structure(), vec![(1, 2, 0), (1, 2, 2), (3, 1, 4), (1, 2, 7)]);

    let arg = [3., 0.5, -7., 8., 0.2, 0.2, 0.2, -2., 5.];
    let mut res = [f64::NAN; 9];
    list.eval(&mut res, &arg, &[1.; 9], 0.5, false).unwrap();
    assert_float_eq!(res.as_ref(), [2.5, 1., -7., 8., 1. / 3., 1. / 3., 1. / 3., 0., 5.].as_ref(), abs_all <= 1e-12);

    assert_eq!(list.eval(&mut res, &arg[.. 8], &[1.; 9], 0.5, false), Err(OpError::DimMismatch));

    list.release();
    assert_eq!(list.eval(&mut res, &arg, &[1.; 9], 0.5, false), Err(OpError::NotInitialized));
    assert!(list.proxes().iter().all(|p| !p.borrow().is_initialized()));
}

#[test]
fn test_prox_list_overlap()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut list = ProxList::<La>::new()
        .prox(shared(ProxZero::new(0, 3)))
        .prox(shared(ProxZero::new(5, 2)))
        .prox(shared(ProxZero::new(2, 2)));
    assert_eq!(list.initialize(10), Err(OpError::InvalidPlacement));

    let mut list = ProxList::<La>::new()
        .prox(shared(ProxZero::new(0, 3)))
        .prox(shared(ProxZero::new(5, 2)))
        .prox(shared(ProxZero::new(3, 2)));
    list.initialize(7).unwrap();
    assert_eq!(list.gpu_mem_amount(), 0);
    assert_eq!(list.separable_structure(), vec![(1, 3, 0), (1, 2, 3), (1, 2, 5)]);

    list.add(shared(ProxZero::new(7, 1)));
    assert_eq!(list.nvars(), None);
}

#[test]
fn test_prox_list_steps()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // (e/2) x^2 + d x with a per-element step; the inverted step gives the same result
    let sq = ProxElemOperation::<La, ElemOperation1D<Function1DZero>>::new(0, 3, 1, ElemCoeffs::new().par(|p| {
        p.d = vec![1., 0., -1.];
        p.e = vec![2.];
    })).unwrap();
    let mut list = ProxList::new().prox(shared(sq));
    list.initialize(3).unwrap();

    let arg = [1., 2., 3.];
    let tau = [0.5, 1., 2.];
    let expect: Vec<f64> = (0.. 3).map(|i| {
        let d = [1., 0., -1.][i];
        let t = tau[i] * 2.;
        (arg[i] - d * t) / (1. + t * 2.)
    }).collect();

    let mut r1 = [0.; 3];
    list.eval(&mut r1, &arg, &tau, 2., false).unwrap();
    assert_float_eq!(r1.as_ref(), expect.as_slice(), abs_all <= 1e-12);

    let tau_inv: Vec<f64> = tau.iter().map(|t| 1. / t).collect();
    let mut r2 = [0.; 3];
    list.eval(&mut r2, &arg, &tau_inv, 0.5, true).unwrap();
    assert_float_eq!(r2.as_ref(), expect.as_slice(), abs_all <= 1e-12);
}

#[test]
fn test_prox_list_gap()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let abs = || ProxElemOperation::<La, ElemOperation1D<Function1DAbs>>::new(0, 2, 1, ElemCoeffs::new()).unwrap();

    // trailing variables left out
    let mut list = ProxList::new().prox(shared(abs()));
    assert_eq!(list.initialize(4), Err(OpError::InvalidPlacement));
    assert_eq!(list.nvars(), None);
    assert!(!list.proxes()[0].borrow().is_initialized());

    let mut res = [f64::NAN; 4];
    assert_eq!(list.eval(&mut res, &[3., -3., 7., 8.], &[1.; 4], 1., false), Err(OpError::NotInitialized));

    // hole in the middle and at the head
    let mut list = ProxList::new()
        .prox(shared(abs()))
        .prox(shared(ProxZero::new(3, 1)));
    assert_eq!(list.initialize(4), Err(OpError::InvalidPlacement));

    let mut list = ProxList::<La>::new().prox(shared(ProxZero::new(1, 3)));
    assert_eq!(list.initialize(4), Err(OpError::InvalidPlacement));

    // free variables filled by the identity
    let mut list = ProxList::new()
        .prox(shared(abs()))
        .prox(shared(ProxZero::new(2, 2)));
    list.initialize(4).unwrap();
    list.eval(&mut res, &[3., -3., 7., 8.], &[1.; 4], 1., false).unwrap();
    assert_float_eq!(res.as_ref(), [2., -2., 7., 8.].as_ref(), abs_all <= 1e-12);

    let mut empty = ProxList::<La>::new();
    assert_eq!(empty.initialize(1), Err(OpError::InvalidPlacement));
    empty.initialize(0).unwrap();
}
