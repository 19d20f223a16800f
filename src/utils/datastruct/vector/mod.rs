use std::fmt::{self, Debug};

use num::Num;
use serde::{Deserialize, Serialize};

/// ZeroSpVec is a sparse vector whose missing elements read as zero.
///
/// It keeps `inds` (element positions) and `vals` (element values) side by
/// side. `inds` is always strictly ascending, so lookups are a binary search.
/// Explicit zeros are never stored.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroSpVec<N>
where
    N: Num,
{
    len: usize,
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    /// Build from (index, value) pairs in any order
    ///
    /// # Arguments
    /// * `len` - logical length
    /// * `pairs` - non-zero candidates; zeros and out-of-range indices are dropped,
    ///   for a repeated index the last value wins
    pub fn from_pairs(len: usize, mut pairs: Vec<(u32, N)>) -> Self {
        pairs.retain(|(idx, val)| (*idx as usize) < len && !val.is_zero());
        // stable, so "last wins" below sees the original order among equal keys
        pairs.sort_by_key(|(idx, _)| *idx);

        let mut inds: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut vals: Vec<N> = Vec::with_capacity(pairs.len());
        for (idx, val) in pairs {
            if inds.last() == Some(&idx) {
                if let Some(last) = vals.last_mut() {
                    *last = val;
                }
                continue;
            }
            inds.push(idx);
            vals.push(val);
        }
        ZeroSpVec { len, inds, vals }
    }

    /// Build from a dense slice
    pub fn from_dense(dense: &[N]) -> Self {
        let pairs = dense
            .iter()
            .enumerate()
            .map(|(i, v)| (i as u32, *v))
            .collect();
        Self::from_pairs(dense.len(), pairs)
    }

    /// Logical length
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored non-zero elements
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// Element at `index`
    ///
    /// # Returns
    /// * `Some(zero)` for a position inside the vector with nothing stored
    /// * `None` when `index >= len`
    #[inline]
    pub fn get(&self, index: usize) -> Option<N> {
        if index >= self.len {
            return None;
        }
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => Some(self.vals[pos]),
            Err(_) => Some(N::zero()),
        }
    }

    /// Stored (index, value) pairs, ascending by index
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds
            .iter()
            .zip(self.vals.iter())
            .map(|(&i, &v)| (i as usize, v))
    }

    /// Every element including zeros
    pub fn iter(&self) -> impl Iterator<Item = N> + '_ {
        (0..self.len).map(move |i| self.get(i).unwrap_or_else(N::zero))
    }

    /// Apply `f(index, value)` to every stored element
    /// results that become zero are dropped
    pub fn map_nonzero<M, F>(&self, mut f: F) -> ZeroSpVec<M>
    where
        M: Num + Copy,
        F: FnMut(usize, N) -> M,
    {
        let mut inds = Vec::with_capacity(self.inds.len());
        let mut vals = Vec::with_capacity(self.vals.len());
        for (i, v) in self.raw_iter() {
            let mapped = f(i, v);
            if !mapped.is_zero() {
                inds.push(i as u32);
                vals.push(mapped);
            }
        }
        ZeroSpVec {
            len: self.len,
            inds,
            vals,
        }
    }
}

impl<N: Num + Copy + Debug> Debug for ZeroSpVec<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "ZeroSpVec(len: {}, ", self.len)?;
            f.debug_map().entries(self.raw_iter()).finish()?;
            write!(f, ")")
        } else {
            f.debug_list().entries(self.iter()).finish()
        }
    }
}
