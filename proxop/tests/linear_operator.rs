use float_eq::assert_float_eq;
use rand::prelude::*;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use proxop::prelude::*;
use proxop::*;
use proxop_rayon::RayonGeneric;

type La = FloatGeneric<f64>;

fn rand_vec(rng: &mut Xoshiro256StarStar, n: usize) -> Vec<f64>
{
    (0.. n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

// 7x9 operator:
//   rows 0..6, cols 0..4: M (3x2) kron I_2
//   rows 0..2, cols 4..7: dense
//   rows 6..7, cols 0..9: zero
//   rows 2..6, cols 4..9: dense
fn build<L: LinAlg<F=f64> + 'static>(rng: &mut Xoshiro256StarStar) -> (LinearOperator<L>, Vec<f64>)
{
    let m = CscBuild::new(3, 2).iter_rowmaj([
        1., 0.,
        2., -3.,
        0., 4.,
    ]);
    let d1 = rand_vec(rng, 2 * 3);
    let d2 = rand_vec(rng, 4 * 5);

    let op = LinearOperator::<L>::new(7, 9)
        .block(m.kron_id(0, 0, 2).unwrap())
        .block(BlockDense::new(0, 4, 2, 3, &d1).unwrap())
        .block(BlockZero::new(6, 0, 1, 9))
        .block(BlockDense::new(2, 4, 4, 5, &d2).unwrap());

    // dense reference in column-major
    let mut k = vec![0.; 7 * 9];
    for (r, c, v) in [(0, 0, 1.), (1, 0, 2.), (1, 1, -3.), (2, 1, 4.)] {
        for i in 0.. 2 {
            k[(c * 2 + i) * 7 + r * 2 + i] = v;
        }
    }
    for c in 0.. 3 {
        for r in 0.. 2 {
            k[(4 + c) * 7 + r] = d1[c * 2 + r];
        }
    }
    for c in 0.. 5 {
        for r in 0.. 4 {
            k[(4 + c) * 7 + 2 + r] = d2[c * 4 + r];
        }
    }

    (op, k)
}

//

#[test]
fn test_linop_dense()
{
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    let (mut op, k) = build::<La>(&mut rng);
    op.initialize().unwrap();
    assert_eq!(op.size(), (7, 9));

    let x = rand_vec(&mut rng, 9);
    let mut y = vec![f64::NAN; 7];
    op.eval(&mut y, &x).unwrap();

    let mut y_ref = vec![0.; 7];
    La::transform_ge(false, 7, 9, 1., &k, &x, 0., &mut y_ref);
    assert_float_eq!(y.as_slice(), y_ref.as_slice(), abs_all <= 1e-12);

    let z = rand_vec(&mut rng, 7);
    let mut w = vec![f64::NAN; 9];
    op.eval_adjoint(&mut w, &z).unwrap();

    let mut w_ref = vec![0.; 9];
    La::transform_ge(true, 7, 9, 1., &k, &z, 0., &mut w_ref);
    assert_float_eq!(w.as_slice(), w_ref.as_slice(), abs_all <= 1e-12);
}

#[test]
fn test_linop_adjoint()
{
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Xoshiro256StarStar::seed_from_u64(1);

    let (mut op, _) = build::<La>(&mut rng);
    op.initialize().unwrap();

    // <K x, z> == <x, K^T z>
    for _ in 0.. 10 {
        let x = rand_vec(&mut rng, 9);
        let z = rand_vec(&mut rng, 7);
        let mut kx = vec![0.; 7];
        let mut ktz = vec![0.; 9];
        op.eval(&mut kx, &x).unwrap();
        op.eval_adjoint(&mut ktz, &z).unwrap();

        assert_float_eq!(La::dot(&kx, &z), La::dot(&x, &ktz), abs <= 1e-12);
    }
}

#[test]
fn test_linop_sums()
{
    let mut rng = Xoshiro256StarStar::seed_from_u64(2);

    let (op, k) = build::<La>(&mut rng);

    for alpha in [1., 2., 0.5] {
        let rs = op.row_sums(alpha);
        let cs = op.col_sums(alpha);
        assert_eq!(rs.len(), 7);
        assert_eq!(cs.len(), 9);

        for r in 0.. 7 {
            let s: f64 = (0.. 9).map(|c| k[c * 7 + r].abs().powf(alpha)).sum();
            assert_float_eq!(rs[r], s, abs <= 1e-12);
        }
        for c in 0.. 9 {
            let s: f64 = (0.. 7).map(|r| k[c * 7 + r].abs().powf(alpha)).sum();
            assert_float_eq!(cs[c], s, abs <= 1e-12);
        }
    }
}

#[test]
fn test_linop_mem()
{
    let mut rng = Xoshiro256StarStar::seed_from_u64(3);

    let (mut op, _) = build::<La>(&mut rng);

    let mem = op.gpu_mem_amount();
    // M and M^T: 4 values, 4 indices and 3 + 4 pointers each; dense: 6 + 20 values
    assert_eq!(mem, 2 * (4 * 8 + 4 * 4) + (3 + 4) * 4 + (6 + 20) * 8);

    op.initialize().unwrap();
    assert_eq!(op.gpu_mem_amount(), mem);
}

#[test]
fn test_linop_placement()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut op = LinearOperator::<La>::new(4, 4)
        .block(BlockZero::new(0, 0, 2, 2))
        .block(BlockZero::new(1, 1, 2, 2));
    assert_eq!(op.initialize(), Err(OpError::InvalidPlacement));
    assert!(!op.is_initialized());

    let mut op = LinearOperator::<La>::new(4, 4)
        .block(BlockZero::new(0, 0, 2, 2))
        .block(BlockZero::new(2, 3, 2, 2));
    assert_eq!(op.initialize(), Err(OpError::InvalidPlacement));

    // empty blocks are rejected rather than skipped
    let mut op = LinearOperator::<La>::new(2, 2)
        .block(BlockZero::new(0, 0, 0, 0))
        .block(BlockZero::new(0, 0, 2, 2));
    assert_eq!(op.initialize(), Err(OpError::InvalidPlacement));

    let mut op = LinearOperator::<La>::new(2, 2)
        .block(BlockZero::new(0, 0, 2, 0));
    assert_eq!(op.initialize(), Err(OpError::InvalidPlacement));
    assert!(op.blocks().iter().all(|b| !b.is_initialized()));

    let mut op = LinearOperator::<La>::new(4, 4)
        .block(BlockZero::new(0, 0, 2, 2))
        .block(BlockZero::new(2, 2, 2, 2));
    op.initialize().unwrap();

    let mut y = [0.; 4];
    assert_eq!(op.eval(&mut y, &[1.; 3]), Err(OpError::DimMismatch));
    op.eval(&mut y, &[1.; 4]).unwrap();
    assert_eq!(y, [0.; 4]);

    op.add_block(Box::new(BlockZero::new(0, 2, 1, 1)));
    assert_eq!(op.eval(&mut y, &[1.; 4]), Err(OpError::NotInitialized));

    op.initialize().unwrap();
    op.release();
    assert!(op.blocks().iter().all(|b| !b.is_initialized()));
    assert_eq!(op.eval(&mut y, &[1.; 4]), Err(OpError::NotInitialized));
}

#[test]
fn test_linop_normest()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // singular values 3, 2 and 1, each twice
    let m = CscBuild::new(3, 3).iter_rowmaj([
        0., 3., 0.,
        0., 0., -2.,
        1., 0., 0.,
    ]);
    let mut op = LinearOperator::<La>::new(6, 6).block(m.kron_id(0, 0, 2).unwrap());
    op.initialize().unwrap();

    let est = op.normest(&NormEstParam::default()).unwrap();
    assert_float_eq!(est, 3., rmax <= 1e-5);

    let mut op = LinearOperator::<La>::new(3, 2).block(BlockZero::new(0, 0, 3, 2));
    op.initialize().unwrap();
    assert_eq!(op.normest(&NormEstParam::default()), Ok(0.));
}

#[test]
fn test_linop_rayon()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let (mut op_s, _) = build::<La>(&mut Xoshiro256StarStar::seed_from_u64(4));
    let (mut op_r, _) = build::<RayonGeneric<f64>>(&mut Xoshiro256StarStar::seed_from_u64(4));
    op_s.initialize().unwrap();
    op_r.initialize().unwrap();

    let mut rng = Xoshiro256StarStar::seed_from_u64(5);
    let x = rand_vec(&mut rng, 9);
    let mut ys = vec![0.; 7];
    let mut yr = vec![0.; 7];
    op_s.eval(&mut ys, &x).unwrap();
    op_r.eval(&mut yr, &x).unwrap();
    assert_float_eq!(ys.as_slice(), yr.as_slice(), abs_all <= 1e-12);

    let es = op_s.normest(&NormEstParam::default()).unwrap();
    let er = op_r.normest(&NormEstParam::default()).unwrap();
    assert_float_eq!(es, er, rmax <= 1e-5);
}
