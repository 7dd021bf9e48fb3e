// Modules
mod dendrogram;

// Re-exports
pub use dendrogram::{Coloring, Dendrogram, Link, LinkColor};

// Imports
use itertools::Itertools;
use ndarray::ArrayView2;
use nutype::nutype;
use thiserror::Error;

/// Distance at which two clusters were merged
#[nutype(
    default = 0.0,
    validate(finite, greater_or_equal = 0.0),
    derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deref, TryFrom, Display, Default)
)]
pub struct Height(f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Nearest point
    Single,
    /// Farthest point
    Complete,
    /// Size-weighted mean distance (UPGMA)
    Average,
    /// Minimum increase of the within-cluster variance
    #[default]
    Ward,
}

impl Method {
    pub const VALUES: [&'static str; 4] = ["single", "complete", "average", "ward"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Complete => "complete",
            Self::Average => "average",
            Self::Ward => "ward",
        }
    }

    /// Lance-Williams update, distance between the cluster `i` and the union of `x` and `y`
    #[inline]
    fn update(
        &self,
        d_xi: f64,
        d_yi: f64,
        d_xy: f64,
        size_x: usize,
        size_y: usize,
        size_i: usize,
    ) -> f64 {
        let (nx, ny, ni) = (size_x as f64, size_y as f64, size_i as f64);
        match self {
            Self::Single => d_xi.min(d_yi),
            Self::Complete => d_xi.max(d_yi),
            Self::Average => (nx * d_xi + ny * d_yi) / (nx + ny),
            Self::Ward => {
                let t = 1.0 / (nx + ny + ni);
                ((ni + nx) * t * d_xi * d_xi + (ni + ny) * t * d_yi * d_yi - ni * t * d_xy * d_xy)
                    .max(0.0)
                    .sqrt()
            }
        }
    }
}

impl std::str::FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "complete" => Ok(Self::Complete),
            "average" => Ok(Self::Average),
            "ward" => Ok(Self::Ward),
            _ => Err(Error::UnknownMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single agglomeration step, ids below the number of leaves are observations, id `nb_leaves + i` is the
/// cluster formed by the `i`-th merge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub height: Height,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Linkage {
    nb_leaves: usize,
    merges: Vec<Merge>,
}

impl Linkage {
    pub fn nb_leaves(&self) -> usize {
        self.nb_leaves
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    pub fn root(&self) -> usize {
        self.nb_leaves + self.merges.len() - 1
    }

    pub fn max_height(&self) -> Height {
        self.merges.iter().map(|merge| merge.height).max().unwrap_or_default()
    }

    /// Leaf order of a depth-first walk, left child first
    pub fn leaves(&self) -> Vec<usize> {
        let mut output = Vec::with_capacity(self.nb_leaves);
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            match id.checked_sub(self.nb_leaves) {
                Some(merge_idx) => {
                    let merge = &self.merges[merge_idx];
                    stack.push(merge.right);
                    stack.push(merge.left);
                }
                None => output.push(id),
            }
        }
        output
    }
}

/// Agglomerative clustering of the rows of `observations` under the Euclidean distance
pub fn linkage(
    observations: ArrayView2<f64>,
    method: Method,
) -> Result<Linkage, Error> {
    let nb_leaves = observations.nrows();
    if nb_leaves == 0 {
        return Err(Error::NoObservations);
    }

    let mut distances = CondensedMatrix::euclidean(observations);
    let mut raw_merges = nn_chain(&mut distances, method)?;

    // the chain finds merges out of order, the labelling below expects them sorted by height
    raw_merges.sort_by_key(|merge| merge.height);

    let mut uf = UnionFind::new(nb_leaves);
    let merges = raw_merges
        .into_iter()
        .map(|Merge { left, right, height, .. }| {
            let (a, b) = (uf.find(left), uf.find(right));
            let (left, right) = if a < b { (a, b) } else { (b, a) };
            let size = uf.merge(left, right);
            Merge { left, right, height, size }
        })
        .collect_vec();

    tracing::debug!(nb_leaves, %method, max_height = %merges.last().map(|m| m.height).unwrap_or_default(), "computed linkage");
    Ok(Linkage { nb_leaves, merges })
}

/// Nearest-neighbour chain, only valid for reducible methods (all of `Method`), the merges refer to the
/// slot of the surviving cluster and come out in no particular order
fn nn_chain(
    distances: &mut CondensedMatrix,
    method: Method,
) -> Result<Vec<Merge>, Error> {
    let n = distances.n;
    let mut sizes: Vec<usize> = vec![1; n];
    let mut chain: Vec<usize> = Vec::with_capacity(n);
    let mut merges: Vec<Merge> = Vec::with_capacity(n.saturating_sub(1));

    for _ in 1..n {
        if chain.is_empty() {
            let first = sizes.iter().position(|&size| size > 0).ok_or(Error::NoObservations)?;
            chain.push(first);
        }

        let (x, y, current_min) = loop {
            let x = chain[chain.len() - 1];
            let previous = chain.len().checked_sub(2).map(|idx| chain[idx]);
            let (mut y, mut current_min) = match previous {
                Some(prev) => (prev, distances.get(x, prev)),
                None => (x, f64::INFINITY),
            };
            for i in 0..n {
                if sizes[i] == 0 || i == x {
                    continue;
                }
                let dist = distances.get(x, i);
                if dist < current_min {
                    current_min = dist;
                    y = i;
                }
            }
            if y == x {
                return Err(Error::InvalidDistance(current_min));
            }
            if previous == Some(y) {
                break (x, y, current_min);
            }
            chain.push(y);
        };
        chain.truncate(chain.len() - 2);

        let (x, y) = (x.min(y), x.max(y));
        let (size_x, size_y) = (sizes[x], sizes[y]);
        let height = Height::try_new(current_min).map_err(|_| Error::InvalidDistance(current_min))?;
        merges.push(Merge { left: x, right: y, height, size: size_x + size_y });

        sizes[x] = 0;
        sizes[y] = size_x + size_y;
        for i in 0..n {
            let size_i = sizes[i];
            if size_i == 0 || i == y {
                continue;
            }
            let updated =
                method.update(distances.get(i, x), distances.get(i, y), current_min, size_x, size_y, size_i);
            distances.set(i, y, updated);
        }
    }

    Ok(merges)
}

/// Upper triangle of a symmetric distance matrix, without the diagonal
struct CondensedMatrix {
    n: usize,
    values: Vec<f64>,
}

impl CondensedMatrix {
    fn euclidean(observations: ArrayView2<f64>) -> Self {
        let n = observations.nrows();
        let values = (0..n)
            .tuple_combinations::<(usize, usize)>()
            .map(|(i, j)| {
                let (a, b) = (observations.row(i), observations.row(j));
                a.iter().zip_eq(b.iter()).map(|(a, b)| (a - b) * (a - b)).sum::<f64>().sqrt()
            })
            .collect_vec();
        Self { n, values }
    }

    #[inline]
    fn index(
        &self,
        i: usize,
        j: usize,
    ) -> usize {
        let (i, j) = (i.min(j), i.max(j));
        self.n * i - i * (i + 1) / 2 + (j - i - 1)
    }

    #[inline]
    fn get(
        &self,
        i: usize,
        j: usize,
    ) -> f64 {
        self.values[self.index(i, j)]
    }

    #[inline]
    fn set(
        &mut self,
        i: usize,
        j: usize,
        value: f64,
    ) {
        let idx = self.index(i, j);
        self.values[idx] = value;
    }
}

struct UnionFind {
    parents: Vec<usize>,
    sizes: Vec<usize>,
    next_label: usize,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        let len = 2 * n - 1;
        Self { parents: (0..len).collect_vec(), sizes: vec![1; len], next_label: n }
    }

    fn merge(
        &mut self,
        x: usize,
        y: usize,
    ) -> usize {
        self.parents[x] = self.next_label;
        self.parents[y] = self.next_label;
        let size = self.sizes[x] + self.sizes[y];
        self.sizes[self.next_label] = size;
        self.next_label += 1;
        size
    }

    fn find(
        &mut self,
        mut x: usize,
    ) -> usize {
        let mut root = x;
        while self.parents[root] != root {
            root = self.parents[root];
        }
        while self.parents[x] != root {
            let parent = self.parents[x];
            self.parents[x] = root;
            x = parent;
        }
        root
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Expected at least one observation to cluster")]
    NoObservations,
    #[error("Unknown linkage method '{0}', expected one of {values}", values = Method::VALUES.join(", "))]
    UnknownMethod(String),
    #[error("Encountered an invalid merge distance ({0})")]
    InvalidDistance(f64),
}
