use float_eq::assert_float_eq;
use rand::prelude::*;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use proxop_core::operator::*;
use proxop_core::elemop::*;
use proxop_core::*;
use proxop_rayon::RayonGeneric;

type Lr = RayonGeneric<f64>;
type Ls = FloatGeneric<f64>;

fn rand_vec(rng: &mut Xoshiro256StarStar, n: usize) -> Vec<f64>
{
    (0.. n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

//

#[test]
fn test_rayon_level1()
{
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    let n = 5000;
    let x = rand_vec(&mut rng, n);
    let d: Vec<f64> = rand_vec(&mut rng, n).iter().map(|u| u.abs() + 0.5).collect();
    let y0 = rand_vec(&mut rng, n);

    assert_float_eq!(Lr::dot(&x, &y0), Ls::dot(&x, &y0), abs <= 1e-9);
    assert_float_eq!(Lr::norm(&x), Ls::norm(&x), abs <= 1e-9);

    let mut yr = y0.clone();
    let mut ys = y0.clone();
    Lr::add(-0.5, &x, &mut yr);
    Ls::add(-0.5, &x, &mut ys);
    assert_eq!(yr, ys);

    Lr::scale(3., &mut yr);
    Ls::scale(3., &mut ys);
    assert_eq!(yr, ys);

    Lr::map_di(&x, &d, &mut yr, |u, t, v| v - u / t);
    Ls::map_di(&x, &d, &mut ys, |u, t, v| v - u / t);
    assert_eq!(yr, ys);

    Lr::copy(&x, &mut yr);
    assert_eq!(yr, x);
}

#[test]
fn test_rayon_transform_ge()
{
    let mut rng = Xoshiro256StarStar::seed_from_u64(1);

    let (n_row, n_col) = (7, 4);
    let mat = rand_vec(&mut rng, n_row * n_col);

    for transpose in [false, true] {
        let (lx, ly) = if transpose {(n_row, n_col)} else {(n_col, n_row)};
        let x = rand_vec(&mut rng, lx);
        let y0 = rand_vec(&mut rng, ly);

        let mut yr = y0.clone();
        let mut ys = y0.clone();
        Lr::transform_ge(transpose, n_row, n_col, 2., &mat, &x, 0.5, &mut yr);
        Ls::transform_ge(transpose, n_row, n_col, 2., &mat, &x, 0.5, &mut ys);
        assert_float_eq!(yr.as_slice(), ys.as_slice(), abs_all <= 1e-12);
    }
}

#[test]
fn test_rayon_kron_block()
{
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Xoshiro256StarStar::seed_from_u64(2);

    // M = [1 0 5; 2 -3 0; 0 4 0; 0 0 -1], d = 3
    let val = [1., 2., -3., 4., 5., -1.];
    let ptr = [0, 2, 4, 6];
    let ind = [0, 1, 1, 2, 0, 3];

    let mut br = BlockSparseKronId::<Lr>::create_from_csc(0, 0, 3, 4, 3, 6, &val, &ptr, &ind).unwrap();
    let mut bs = BlockSparseKronId::<Ls>::create_from_csc(0, 0, 3, 4, 3, 6, &val, &ptr, &ind).unwrap();
    br.initialize().unwrap();
    bs.initialize().unwrap();

    let x = rand_vec(&mut rng, 9);
    let mut yr = vec![0.; 12];
    let mut ys = vec![0.; 12];
    br.eval_add(&mut yr, &x).unwrap();
    bs.eval_add(&mut ys, &x).unwrap();
    assert_float_eq!(yr.as_slice(), ys.as_slice(), abs_all <= 1e-12);

    let z = rand_vec(&mut rng, 12);
    let mut wr = vec![0.; 9];
    let mut ws = vec![0.; 9];
    br.eval_adjoint_add(&mut wr, &z).unwrap();
    bs.eval_adjoint_add(&mut ws, &z).unwrap();
    assert_float_eq!(wr.as_slice(), ws.as_slice(), abs_all <= 1e-12);
}

#[test]
fn test_rayon_kron_long_diag()
{
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Xoshiro256StarStar::seed_from_u64(4);

    // M = [2 -1; 0 3], d much larger than the number of rows
    let val = [2., -1., 3.];
    let ptr = [0, 1, 3];
    let ind = [0, 0, 1];
    let d = 5000;

    let mut br = BlockSparseKronId::<Lr>::create_from_csc(0, 0, d, 2, 2, 3, &val, &ptr, &ind).unwrap();
    let mut bs = BlockSparseKronId::<Ls>::create_from_csc(0, 0, d, 2, 2, 3, &val, &ptr, &ind).unwrap();
    br.initialize().unwrap();
    bs.initialize().unwrap();

    let x = rand_vec(&mut rng, 2 * d);
    let mut yr = vec![0.; 2 * d];
    let mut ys = vec![0.; 2 * d];
    br.eval_add(&mut yr, &x).unwrap();
    bs.eval_add(&mut ys, &x).unwrap();
    assert_float_eq!(yr.as_slice(), ys.as_slice(), abs_all <= 1e-12);

    for k in [0, 1, d - 1] {
        assert_float_eq!(yr[k], 2. * x[k] - x[d + k], abs <= 1e-12);
        assert_float_eq!(yr[d + k], 3. * x[d + k], abs <= 1e-12);
    }

    let z = rand_vec(&mut rng, 2 * d);
    let mut wr = vec![0.; 2 * d];
    let mut ws = vec![0.; 2 * d];
    br.eval_adjoint_add(&mut wr, &z).unwrap();
    bs.eval_adjoint_add(&mut ws, &z).unwrap();
    assert_float_eq!(wr.as_slice(), ws.as_slice(), abs_all <= 1e-12);
}

#[test]
fn test_rayon_prox()
{
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Xoshiro256StarStar::seed_from_u64(3);

    // per-group b and c, every tenth group with c = 0
    let (count, dim) = (600, 5);
    let n = count * dim;
    let b = rand_vec(&mut rng, count);
    let c: Vec<f64> = (0.. count).map(|g| if g % 10 == 0 {0.} else {rng.gen_range(0.5..2.0)}).collect();
    let coeffs = ElemCoeffs::new().par(|p| {
        p.b = b.clone();
        p.c = c.clone();
    });

    let mut pr = ProxElemOperation::<Lr, ElemOperationNorm2<Function1DAbs>>::new(0, count, dim, coeffs.clone()).unwrap();
    let mut ps = ProxElemOperation::<Ls, ElemOperationNorm2<Function1DAbs>>::new(0, count, dim, coeffs).unwrap();
    pr.initialize().unwrap();
    ps.initialize().unwrap();

    let x: Vec<f64> = rand_vec(&mut rng, n).iter().map(|u| u * 4.).collect();
    let tau: Vec<f64> = rand_vec(&mut rng, n).iter().map(|u| u.abs() + 0.2).collect();
    let mut rr = vec![0.; n];
    let mut rs = vec![0.; n];
    pr.eval(&mut rr, &x, &tau, 1.3, false).unwrap();
    ps.eval(&mut rs, &x, &tau, 1.3, false).unwrap();
    assert_float_eq!(rr.as_slice(), rs.as_slice(), abs_all <= 1e-12);

    for g in (0.. count).step_by(10) {
        assert_eq!(rr[g * dim.. (g + 1) * dim], x[g * dim.. (g + 1) * dim]);
    }
}

#[test]
fn test_rayon_prox_simplex()
{
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Xoshiro256StarStar::seed_from_u64(5);

    let (count, dim) = (600, 5);
    let n = count * dim;

    let mut pr = ProxElemOperation::<Lr, ElemOperationSimplex>::new(0, count, dim, ElemCoeffs::new()).unwrap();
    let mut ps = ProxElemOperation::<Ls, ElemOperationSimplex>::new(0, count, dim, ElemCoeffs::new()).unwrap();
    pr.initialize().unwrap();
    ps.initialize().unwrap();

    let x: Vec<f64> = rand_vec(&mut rng, n).iter().map(|u| u * 4.).collect();
    let tau = vec![0.7; n];
    let mut rr = vec![0.; n];
    let mut rs = vec![0.; n];
    pr.eval(&mut rr, &x, &tau, 1.3, false).unwrap();
    ps.eval(&mut rs, &x, &tau, 1.3, false).unwrap();
    assert_eq!(rr, rs);

    for g in rr.chunks(dim) {
        assert_float_eq!(g.iter().sum::<f64>(), 1., abs <= 1e-9);
        assert!(g.iter().all(|u| *u >= 0.));
    }
}
