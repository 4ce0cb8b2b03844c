use float_eq::assert_float_eq;
use rand::prelude::*;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use proxop_core::operator::*;
use proxop_core::*;

type La = FloatGeneric<f64>;

fn rand_vec(rng: &mut Xoshiro256StarStar, n: usize) -> Vec<f64>
{
    (0.. n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

// <M x, y> == <x, M^T y> for a block placed in an operator of size (m, n)
fn check_adjoint(block: &mut dyn Block<La>, m: usize, n: usize, rng: &mut Xoshiro256StarStar)
{
    block.initialize().unwrap();

    for _ in 0.. 5 {
        let x = rand_vec(rng, n);
        let y = rand_vec(rng, m);

        let mut mx = vec![0.; m];
        let mut mty = vec![0.; n];
        block.eval_add(&mut mx, &x).unwrap();
        block.eval_adjoint_add(&mut mty, &y).unwrap();

        assert_float_eq!(La::dot(&mx, &y), La::dot(&x, &mty), abs <= 1e-12);

        // nothing outside the placement is written
        let p = block.placement();
        for (i, v) in mx.iter().enumerate() {
            if i < p.row || i >= p.row + p.nrows {
                assert_eq!(*v, 0.);
            }
        }
        for (i, v) in mty.iter().enumerate() {
            if i < p.col || i >= p.col + p.ncols {
                assert_eq!(*v, 0.);
            }
        }
    }

    block.release();
    assert!(!block.is_initialized());
}

//

#[test]
fn test_adjoint_kron()
{
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    // random 5x4 sparse M, about half filled
    let (m, n) = (5, 4);
    let mut val = Vec::new();
    let mut ind = Vec::new();
    let mut ptr = vec![0];
    for _ in 0.. n {
        for r in 0.. m {
            if rng.gen_bool(0.5) {
                val.push(rng.gen_range(-2.0..2.0));
                ind.push(r as i32);
            }
        }
        ptr.push(val.len() as i32);
    }

    for d in [1, 3] {
        let mut b = BlockSparseKronId::<La>::create_from_csc(2, 1, d, m, n, val.len(), &val, &ptr, &ind).unwrap();
        check_adjoint(&mut b, 2 + m * d + 1, 1 + n * d + 2, &mut rng);
    }
}

#[test]
fn test_adjoint_dense()
{
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = Xoshiro256StarStar::seed_from_u64(1);

    let array = rand_vec(&mut rng, 3 * 4);
    let mut b = BlockDense::<La>::new(1, 2, 3, 4, &array).unwrap();
    check_adjoint(&mut b, 5, 7, &mut rng);
}

#[test]
fn test_adjoint_zero()
{
    let mut rng = Xoshiro256StarStar::seed_from_u64(2);

    let mut b = BlockZero::<La>::new(1, 1, 2, 2);
    check_adjoint(&mut b, 3, 4, &mut rng);
}
