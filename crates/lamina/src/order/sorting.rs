//! Left-to-right order of nodes per layer and of ports per node side.

use crate::layered::{Composition, flatten};
use lamina_graph::Orientation;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SortingOrder {
    layers: Vec<Vec<usize>>,
    position: Vec<usize>,
    north: Vec<Vec<Composition>>,
    south: Vec<Vec<Composition>>,
}

impl SortingOrder {
    pub(crate) fn new(layers: Vec<Vec<usize>>, node_count: usize) -> Self {
        let mut order = Self {
            layers,
            position: vec![0; node_count],
            north: vec![Vec::new(); node_count],
            south: vec![Vec::new(); node_count],
        };
        for r in 0..order.layers.len() {
            order.reindex(r);
        }
        order
    }

    pub(crate) fn layers(&self) -> &[Vec<usize>] {
        &self.layers
    }

    pub(crate) fn layer(&self, rank: usize) -> &[usize] {
        self.layers.get(rank).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub(crate) fn position(&self, node: usize) -> usize {
        self.position[node]
    }

    fn ensure(&mut self, node: usize) {
        if node >= self.position.len() {
            self.position.resize(node + 1, 0);
            self.north.resize(node + 1, Vec::new());
            self.south.resize(node + 1, Vec::new());
        }
    }

    fn reindex(&mut self, rank: usize) {
        for (i, &v) in self.layers[rank].iter().enumerate() {
            if v >= self.position.len() {
                self.position.resize(v + 1, 0);
                self.north.resize(v + 1, Vec::new());
                self.south.resize(v + 1, Vec::new());
            }
            self.position[v] = i;
        }
    }

    pub(crate) fn insert(&mut self, rank: usize, at: usize, node: usize) {
        self.ensure(node);
        let layer = &mut self.layers[rank];
        let at = at.min(layer.len());
        layer.insert(at, node);
        self.reindex(rank);
    }

    pub(crate) fn push(&mut self, rank: usize, node: usize) {
        let at = self.layers[rank].len();
        self.insert(rank, at, node);
    }

    /// Adds an empty layer below every existing one.
    pub(crate) fn insert_bottom_layer(&mut self) {
        self.layers.insert(0, Vec::new());
    }

    pub(crate) fn push_top_layer(&mut self) {
        self.layers.push(Vec::new());
    }

    pub(crate) fn set_compositions(
        &mut self,
        node: usize,
        side: Orientation,
        compositions: Vec<Composition>,
    ) {
        self.ensure(node);
        match side {
            Orientation::North => self.north[node] = compositions,
            _ => self.south[node] = compositions,
        }
    }

    pub(crate) fn compositions(&self, node: usize, side: Orientation) -> &[Composition] {
        match side {
            Orientation::North => &self.north[node],
            _ => &self.south[node],
        }
    }

    fn compositions_mut(&mut self, node: usize, side: Orientation) -> &mut Vec<Composition> {
        match side {
            Orientation::North => &mut self.north[node],
            _ => &mut self.south[node],
        }
    }

    /// Ports of `node` on `side`, left to right.
    pub(crate) fn ports(&self, node: usize, side: Orientation) -> Vec<usize> {
        flatten(self.compositions(node, side))
    }

    /// Ports on `side` of every node in layer `rank`, left to right.
    pub(crate) fn facing_ports(&self, rank: usize, side: Orientation) -> Vec<usize> {
        let mut out = Vec::new();
        for &v in self.layer(rank) {
            for c in self.compositions(v, side) {
                c.collect_ports(&mut out);
            }
        }
        out
    }

    /// Stable sort of a layer; nodes without a key keep their slot.
    pub(crate) fn sort_layer(&mut self, rank: usize, keys: &[Option<f64>]) {
        let layer = &mut self.layers[rank];
        let slots: Vec<usize> = (0..layer.len()).filter(|&i| keys[i].is_some()).collect();
        let mut keyed: Vec<(f64, usize)> = slots
            .iter()
            .map(|&i| (keys[i].unwrap_or_default(), layer[i]))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (&slot, (_, node)) in slots.iter().zip(keyed) {
            layer[slot] = node;
        }
        self.reindex(rank);
    }

    /// Reorders the ports on one side of `node` by `key`, moving whole compositions and
    /// leaving ordered groups' member order alone.
    pub(crate) fn reorder_ports(
        &mut self,
        node: usize,
        side: Orientation,
        key: &impl Fn(usize) -> Option<f64>,
    ) {
        sort_compositions(self.compositions_mut(node, side), true, key);
    }

    /// Random permutation of every layer and of every unordered composition list.
    pub(crate) fn shuffle(&mut self, rng: &mut StdRng) {
        for rank in 0..self.layers.len() {
            self.layers[rank].shuffle(rng);
            self.reindex(rank);
        }
        for rank in 0..self.layers.len() {
            for i in 0..self.layers[rank].len() {
                let v = self.layers[rank][i];
                shuffle_compositions(&mut self.north[v], true, rng);
                shuffle_compositions(&mut self.south[v], true, rng);
            }
        }
    }
}

fn composition_key(c: &Composition, key: &impl Fn(usize) -> Option<f64>) -> Option<f64> {
    let (sum, count) = c
        .ports()
        .into_iter()
        .filter_map(key)
        .fold((0.0, 0usize), |(s, n), k| (s + k, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn sort_compositions(
    list: &mut [Composition],
    reorder: bool,
    key: &impl Fn(usize) -> Option<f64>,
) {
    for c in list.iter_mut() {
        if let Composition::Group { ordered, members } = c {
            sort_compositions(members, !*ordered, key);
        }
    }
    if !reorder {
        return;
    }

    let keys: Vec<Option<f64>> = list.iter().map(|c| composition_key(c, key)).collect();
    let slots: Vec<usize> = (0..list.len()).filter(|&i| keys[i].is_some()).collect();
    let mut keyed: Vec<(f64, Composition)> = slots
        .iter()
        .map(|&i| (keys[i].unwrap_or_default(), list[i].clone()))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (&slot, (_, c)) in slots.iter().zip(keyed) {
        list[slot] = c;
    }
}

fn shuffle_compositions(list: &mut [Composition], reorder: bool, rng: &mut StdRng) {
    if reorder {
        list.shuffle(rng);
    }
    for c in list.iter_mut() {
        if let Composition::Group { ordered, members } = c {
            shuffle_compositions(members, !*ordered, rng);
        }
    }
}
