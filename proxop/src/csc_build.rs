use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};
use num_traits::Float;
use proxop_core::operator::{LinAlg, OpError};
use proxop_core::BlockSparseKronId;

/// Sparse matrix builder
///
/// Collects entries of an `m` by `n` matrix in any order
/// and turns them into 0-indexed compressed-sparse-column arrays.
/// Entries set to zero are not stored.
#[derive(Debug, Clone)]
pub struct CscBuild<F: Float>
{
    nrows: usize,
    ncols: usize,
    // keyed by (column, row), so iteration order is the CSC order
    entries: BTreeMap<(usize, usize), F>,
    zero: F,
}

impl<F: Float> CscBuild<F>
{
    /// Creates an instance.
    ///
    /// Returns the [`CscBuild`] instance with no entries.
    /// * `m` is a number of rows.
    /// * `n` is a number of columns.
    pub fn new(m: usize, n: usize) -> Self
    {
        CscBuild {
            nrows: m,
            ncols: n,
            entries: BTreeMap::new(),
            zero: F::zero(),
        }
    }

    /// Size of the matrix.
    ///
    /// Returns a tuple of a number of rows and columns.
    pub fn size(&self) -> (usize, usize)
    {
        (self.nrows, self.ncols)
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize
    {
        self.entries.values().filter(|v| !v.is_zero()).count()
    }

    /// Sets an entry.
    ///
    /// * `r`, `c` are a row and a column of the entry, which shall be inside the matrix.
    /// * `v` is its value; zero removes the entry.
    pub fn set(&mut self, r: usize, c: usize, v: F)
    {
        self.check(r, c);

        if v.is_zero() {
            self.entries.remove(&(c, r));
        }
        else {
            self.entries.insert((c, r), v);
        }
    }

    /// Data by a function.
    ///
    /// * `func` takes a row and a column of the matrix and returns data of each element.
    pub fn set_by_fn<M>(&mut self, mut func: M)
    where M: FnMut(usize, usize) -> F
    {
        for c in 0.. self.ncols {
            for r in 0.. self.nrows {
                self.set(r, c, func(r, c));
            }
        }
    }
    /// Builder pattern of [`CscBuild::set_by_fn`].
    pub fn by_fn<M>(mut self, func: M) -> Self
    where M: FnMut(usize, usize) -> F
    {
        self.set_by_fn(func);
        self
    }

    /// Data by an iterator in row-major.
    ///
    /// * `iter` iterates matrix data in row-major, zeros included.
    pub fn set_iter_rowmaj<T>(&mut self, iter: T)
    where T: IntoIterator<Item=F>
    {
        let mut i = iter.into_iter();

        for r in 0.. self.nrows {
            for c in 0.. self.ncols {
                if let Some(v) = i.next() {
                    self.set(r, c, v);
                }
                else {
                    return;
                }
            }
        }
    }
    /// Builder pattern of [`CscBuild::set_iter_rowmaj`].
    pub fn iter_rowmaj<T>(mut self, iter: T) -> Self
    where T: IntoIterator<Item=F>
    {
        self.set_iter_rowmaj(iter);
        self
    }

    /// Compressed-sparse-column arrays.
    ///
    /// Returns a tuple of `val`, `ptr` of `n + 1` elements, and `ind`,
    /// with rows sorted in ascending order within each column.
    pub fn to_csc(&self) -> (Vec<F>, Vec<i32>, Vec<i32>)
    {
        let mut val = Vec::new();
        let mut ind = Vec::new();
        let mut ptr = vec![0; self.ncols + 1];

        for (&(c, r), &v) in self.entries.iter() {
            if v.is_zero() {
                continue;
            }
            val.push(v);
            ind.push(r as i32);
            ptr[c + 1] += 1;
        }
        for c in 0.. self.ncols {
            ptr[c + 1] += ptr[c];
        }

        (val, ptr, ind)
    }

    /// Builds \\(M \otimes I_d\\) of this matrix \\(M\\).
    ///
    /// Returns [`BlockSparseKronId`] instance, or `Err` as [`BlockSparseKronId::create_from_csc`].
    /// * `row`, `col` place the block inside its operator.
    /// * `diaglength` is the size of the identity factor \\(d\\).
    pub fn kron_id<L>(&self, row: usize, col: usize, diaglength: usize) -> Result<BlockSparseKronId<L>, OpError>
    where L: LinAlg<F=F>
    {
        let (val, ptr, ind) = self.to_csc();

        BlockSparseKronId::create_from_csc(
            row, col, diaglength,
            self.nrows, self.ncols, val.len(),
            &val, &ptr, &ind
        )
    }

    fn check(&self, r: usize, c: usize)
    {
        assert!(r < self.nrows);
        assert!(c < self.ncols);
    }
}

impl<F: Float> Index<(usize, usize)> for CscBuild<F>
{
    type Output = F;
    fn index(&self, (r, c): (usize, usize)) -> &Self::Output
    {
        self.check(r, c);

        self.entries.get(&(c, r)).unwrap_or(&self.zero)
    }
}

// Zeros written through this are dropped by `to_csc`.
impl<F: Float> IndexMut<(usize, usize)> for CscBuild<F>
{
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut Self::Output
    {
        self.check(r, c);

        self.entries.entry((c, r)).or_insert_with(F::zero)
    }
}

//

#[test]
fn test_csc_build1()
{
    // [1 0; 2 -3; 0 4]
    let mut b = CscBuild::<f64>::new(3, 2);
    b[(2, 1)] = 4.;
    b[(0, 0)] = 1.;
    b.set(1, 1, -3.);
    b[(1, 0)] = 2.;
    b[(0, 1)] = 0.;

    assert_eq!(b.nnz(), 4);
    assert_eq!(b[(2, 0)], 0.);
    assert_eq!(b[(1, 1)], -3.);

    let (val, ptr, ind) = b.to_csc();
    assert_eq!(val, vec![1., 2., -3., 4.]);
    assert_eq!(ptr, vec![0, 2, 4]);
    assert_eq!(ind, vec![0, 1, 1, 2]);

    let c = CscBuild::<f64>::new(3, 2).iter_rowmaj([
        1., 0.,
        2., -3.,
        0., 4.,
    ]);
    assert_eq!(c.to_csc(), (val, ptr, ind));
}

#[test]
fn test_csc_build_empty_col()
{
    let b = CscBuild::<f64>::new(2, 3).by_fn(|r, c| if c == 1 {0.} else {(r + c) as f64 + 1.});

    let (val, ptr, ind) = b.to_csc();
    assert_eq!(val, vec![1., 2., 3., 4.]);
    assert_eq!(ptr, vec![0, 2, 2, 4]);
    assert_eq!(ind, vec![0, 1, 0, 1]);
}
