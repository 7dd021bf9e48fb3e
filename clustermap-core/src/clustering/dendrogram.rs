// Imports
use crate::clustering::Linkage;

/// Default colour threshold, relative to the highest merge
pub const COLOR_THRESHOLD_FACTOR: f64 = 0.7;
/// Number of distinct cluster colours before cycling
pub const NB_CLUSTER_COLORS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coloring {
    /// Subtrees merged below the threshold (absolute height) share a colour, `None` picks
    /// `COLOR_THRESHOLD_FACTOR` times the highest merge
    Threshold(Option<f64>),
    Uniform,
}

impl Default for Coloring {
    fn default() -> Self {
        Self::Threshold(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkColor {
    AboveThreshold,
    /// In `1..=NB_CLUSTER_COLORS`
    Cluster(usize),
    Uniform,
}

/// U-shaped link joining two children, points are `(position, height)` pairs going from the left child up,
/// across, and down to the right child
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub points: [(f64, f64); 4],
    pub color: LinkColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    leaves: Vec<usize>,
    links: Vec<Link>,
    max_height: f64,
}

impl Dendrogram {
    /// Spacing between two consecutive leaves
    pub const LEAF_SPACING: f64 = 10.0;

    pub fn from_linkage(
        linkage: &Linkage,
        coloring: Coloring,
    ) -> Self {
        let max_height = *linkage.max_height();
        let threshold = match coloring {
            Coloring::Threshold(Some(threshold)) => Some(threshold),
            Coloring::Threshold(None) => Some(COLOR_THRESHOLD_FACTOR * max_height),
            Coloring::Uniform => None,
        };

        let mut walker = Walker {
            linkage,
            threshold,
            next_color: 0,
            leaves: Vec::with_capacity(linkage.nb_leaves()),
            links: Vec::with_capacity(linkage.merges().len()),
        };
        walker.walk(linkage.root(), None);

        Self { leaves: walker.leaves, links: walker.links, max_height }
    }

    /// Observation ids, in display order
    pub fn leaves(&self) -> &[usize] {
        &self.leaves
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    pub fn nb_leaves(&self) -> usize {
        self.leaves.len()
    }

    /// Extent of the position axis, leaf `i` sits at `LEAF_SPACING * (i + 0.5)`
    pub fn span(&self) -> f64 {
        Self::LEAF_SPACING * self.leaves.len() as f64
    }
}

struct Walker<'a> {
    linkage: &'a Linkage,
    threshold: Option<f64>,
    next_color: usize,
    leaves: Vec<usize>,
    links: Vec<Link>,
}

impl Walker<'_> {
    /// Returns the position and height of `id`
    fn walk(
        &mut self,
        id: usize,
        inherited: Option<LinkColor>,
    ) -> (f64, f64) {
        let Some(merge_idx) = id.checked_sub(self.linkage.nb_leaves()) else {
            let position = Dendrogram::LEAF_SPACING * (self.leaves.len() as f64 + 0.5);
            self.leaves.push(id);
            return (position, 0.0);
        };
        let merge = self.linkage.merges()[merge_idx];
        let height = *merge.height;

        let color = match (self.threshold, inherited) {
            (None, _) => LinkColor::Uniform,
            (Some(_), Some(color)) => color,
            (Some(threshold), None) if height < threshold => {
                self.next_color += 1;
                LinkColor::Cluster((self.next_color - 1) % NB_CLUSTER_COLORS + 1)
            }
            (Some(_), None) => LinkColor::AboveThreshold,
        };
        let passed_down = matches!(color, LinkColor::Cluster(_)).then_some(color);

        let (left_pos, left_height) = self.walk(merge.left, passed_down);
        let (right_pos, right_height) = self.walk(merge.right, passed_down);

        self.links.push(Link {
            points: [(left_pos, left_height), (left_pos, height), (right_pos, height), (right_pos, right_height)],
            color,
        });

        ((left_pos + right_pos) / 2.0, height)
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use ndarray::array;

    use super::*;
    use crate::{
        assert_float_eq,
        clustering::{Method, linkage},
    };

    fn five_points() -> Linkage {
        linkage(array![[0.0], [1.0], [5.0], [6.0], [20.0]].view(), Method::Ward).unwrap()
    }

    #[test]
    fn dendrogram_layout_test() {
        let dendrogram = Dendrogram::from_linkage(&five_points(), Coloring::default());

        assert_eq!(dendrogram.leaves(), [4, 0, 1, 2, 3]);
        assert_float_eq!(dendrogram.span(), 50.0);
        assert_eq!(dendrogram.links().len(), 4);

        // links come out children first, the root last
        let root = dendrogram.links().last().unwrap();
        assert_float_eq!(root.points[0].0, 5.0);
        assert_float_eq!(root.points[0].1, 0.0);
        // {0, 1} sits at 20, {2, 3} at 40, their union at 30
        assert_float_eq!(root.points[3].0, 30.0);
        assert_float_eq!(root.points[1].1, dendrogram.max_height());

        let first = &dendrogram.links()[0];
        assert_eq!(first.points.map(|(pos, _)| pos), [15.0, 15.0, 25.0, 25.0]);
        assert_eq!(first.points.map(|(_, h)| h), [0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn dendrogram_coloring_test() {
        let dendrogram = Dendrogram::from_linkage(&five_points(), Coloring::default());
        let colors = dendrogram.links().iter().map(|link| link.color).collect_vec();
        // max height ~21.5, threshold ~15: {0, 1, 2, 3} (height ~7.07) is one cluster, the root is above
        assert_eq!(colors, [
            LinkColor::Cluster(1),
            LinkColor::Cluster(1),
            LinkColor::Cluster(1),
            LinkColor::AboveThreshold
        ]);

        let dendrogram = Dendrogram::from_linkage(&five_points(), Coloring::Threshold(Some(5.0)));
        let colors = dendrogram.links().iter().map(|link| link.color).collect_vec();
        assert_eq!(colors, [
            LinkColor::Cluster(1),
            LinkColor::Cluster(2),
            LinkColor::AboveThreshold,
            LinkColor::AboveThreshold
        ]);

        let dendrogram = Dendrogram::from_linkage(&five_points(), Coloring::Uniform);
        assert!(dendrogram.links().iter().all(|link| link.color == LinkColor::Uniform));
    }
}
