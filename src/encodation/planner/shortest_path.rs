use alloc::{collections::BinaryHeap, vec, vec::Vec};
use core::cmp::Reverse;
use core::ops::Range;

use super::Run;
use crate::encodation::Mode;
use crate::version::Version;

/// A candidate mode for a run.
#[derive(Debug, Clone, Copy)]
struct Node {
    mode: Mode,
    /// Length of the run in this mode
    len: usize,
    /// Characters of the segment up to and including this run,
    /// modulo the mode's group size
    carry: usize,
}

/// Number of characters packed together in `mode`.
///
/// The cost of appending to a segment only depends on its length
/// modulo this value.
fn group_size(mode: Mode) -> usize {
    match mode {
        Mode::Numeric => 3,
        Mode::Alphanumeric => 2,
        Mode::Byte | Mode::Kanji => 1,
    }
}

/// Layered graph, layer `k` holds the candidates of run `k`.
///
/// Every candidate mode of a run has one node per possible carry.
/// The nodes live in a flat arena, the virtual start and end
/// nodes are the two indices after the last candidate.
struct Graph {
    nodes: Vec<Node>,
    layers: Vec<Range<usize>>,
}

impl Graph {
    fn new(runs: &[Run]) -> Self {
        let mut nodes = Vec::with_capacity(runs.len() * 6);
        let mut layers = Vec::with_capacity(runs.len());
        for run in runs {
            let start = nodes.len();
            for mode in run.candidates() {
                let len = run.len_in(mode);
                nodes.extend((0..group_size(mode)).map(|carry| Node { mode, len, carry }));
            }
            layers.push(start..nodes.len());
        }
        Self { nodes, layers }
    }

    fn start(&self) -> usize {
        self.nodes.len()
    }

    fn end(&self) -> usize {
        self.nodes.len() + 1
    }

    fn layer_of(&self, idx: usize) -> usize {
        self.layers.partition_point(|l| l.end <= idx)
    }

    /// Call `f` with every successor of `idx` and the weight of the edge.
    fn for_each_edge(&self, idx: usize, version: Version, mut f: impl FnMut(usize, usize)) {
        let next_layer = if idx == self.start() {
            0
        } else {
            self.layer_of(idx) + 1
        };
        let Some(layer) = self.layers.get(next_layer) else {
            f(self.end(), 0);
            return;
        };
        let prev = self.nodes.get(idx);
        for next in layer.clone() {
            let b = self.nodes[next];
            let group = group_size(b.mode);
            match prev {
                // the segment continues, only the carried characters
                // change the packing of the new ones
                Some(a) if a.mode == b.mode => {
                    if b.carry == (a.carry + b.len) % group {
                        let mode = b.mode;
                        f(next, mode.bit_length(a.carry + b.len) - mode.bit_length(a.carry));
                    }
                }
                _ => {
                    if b.carry == b.len % group {
                        let header = 4 + b.mode.char_count_bits(version);
                        f(next, header + b.mode.bit_length(b.len));
                    }
                }
            }
        }
    }
}

/// Find the mode for each run which minimizes the total bit length.
///
/// Returns one mode per run.
pub(super) fn optimize(runs: &[Run], version: Version) -> Vec<Mode> {
    let graph = Graph::new(runs);
    let n = graph.nodes.len() + 2;
    let mut dist = vec![usize::MAX; n];
    let mut prev = vec![None; n];
    let mut heap = BinaryHeap::new();

    dist[graph.start()] = 0;
    heap.push(Reverse((0, graph.start())));
    while let Some(Reverse((cost, idx))) = heap.pop() {
        if idx == graph.end() {
            break;
        }
        if cost > dist[idx] {
            continue;
        }
        graph.for_each_edge(idx, version, |next, weight| {
            let new_cost = cost + weight;
            if new_cost < dist[next] {
                dist[next] = new_cost;
                prev[next] = Some(idx);
                heap.push(Reverse((new_cost, next)));
            }
        });
    }

    let mut modes = Vec::with_capacity(runs.len());
    let mut idx = prev[graph.end()];
    while let Some(node) = idx {
        if node == graph.start() {
            break;
        }
        modes.push(graph.nodes[node].mode);
        idx = prev[node];
    }
    modes.reverse();
    modes
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn plan(text: &str, version: u8) -> Vec<Mode> {
    let runs = super::runs(text, None);
    optimize(&runs, Version::new(version).unwrap())
}

/// Total bits of the segments when run `k` is encoded in `modes[k]`.
#[cfg(test)]
fn total_bits(runs: &[Run], modes: &[Mode], version: Version) -> usize {
    let mut bits = 0;
    let mut k = 0;
    while k < runs.len() {
        let mode = modes[k];
        let mut len = 0;
        while k < runs.len() && modes[k] == mode {
            len += runs[k].len_in(mode);
            k += 1;
        }
        bits += 4 + mode.char_count_bits(version) + mode.bit_length(len);
    }
    bits
}

/// Smallest bit count over all mode assignments.
#[cfg(test)]
fn exhaustive_minimum(runs: &[Run], version: Version) -> usize {
    let candidates: Vec<Vec<Mode>> = runs
        .iter()
        .map(|r| r.candidates().into_iter().collect())
        .collect();
    let mut choice = vec![0; runs.len()];
    let mut best = usize::MAX;
    loop {
        let modes: Vec<Mode> = choice
            .iter()
            .zip(candidates.iter())
            .map(|(i, c)| c[*i])
            .collect();
        best = best.min(total_bits(runs, &modes, version));
        // next assignment, odometer style
        let mut k = 0;
        while k < choice.len() {
            choice[k] += 1;
            if choice[k] < candidates[k].len() {
                break;
            }
            choice[k] = 0;
            k += 1;
        }
        if k == choice.len() {
            return best;
        }
    }
}

#[test]
fn test_empty() {
    assert_eq!(plan("", 1), Vec::<Mode>::new());
}

#[test]
fn test_single_runs() {
    assert_eq!(plan("0123456789", 1), vec![Mode::Numeric]);
    assert_eq!(plan("HELLO WORLD", 1), vec![Mode::Alphanumeric]);
    assert_eq!(plan("hello", 1), vec![Mode::Byte]);
}

#[test]
fn test_short_digits_join_alphanumeric() {
    // a separate numeric segment costs 4 + 10 + 4 for one digit,
    // inside the alphanumeric run the digit costs at most 6 bits
    assert_eq!(
        plan("ABC1DEF", 1),
        vec![Mode::Alphanumeric, Mode::Alphanumeric, Mode::Alphanumeric]
    );
}

#[test]
fn test_long_digits_stay_numeric() {
    let modes = plan("ABC0123456789012345678901234567890DEF", 1);
    assert_eq!(
        modes,
        vec![Mode::Alphanumeric, Mode::Numeric, Mode::Alphanumeric]
    );
}

#[test]
fn test_short_alphanumeric_in_bytes() {
    // the single "A" is cheaper inside the byte segment than in its own segment
    assert_eq!(plan("abcAdef", 1), vec![Mode::Byte, Mode::Byte, Mode::Byte]);
}

#[test]
fn test_kanji_candidates() {
    let mapper = |c: char| if c == '点' { Some(0x935Fu16) } else { None };
    let runs = super::runs("点点点点", Some(&mapper));
    assert_eq!(optimize(&runs, Version::MIN), vec![Mode::Kanji]);
}

#[test]
fn test_carry_over_between_runs() {
    // the alphanumeric runs around the digits can not share one segment
    // without also taking the digits, all bytes is the cheapest
    let runs = super::runs("aA1A11", None);
    let modes = optimize(&runs, Version::MIN);
    assert_eq!(total_bits(&runs, &modes, Version::MIN), 60);
    assert_eq!(modes, vec![Mode::Byte; 5]);
}

#[test]
fn test_optimal_for_short_strings() {
    let alphabet = ['1', 'A', 'a'];
    for version in [Version::MIN, Version::new(10).unwrap()] {
        for len in 0..=7u32 {
            for idx in 0..3usize.pow(len) {
                let text: alloc::string::String = (0..len)
                    .map(|k| alphabet[idx / 3usize.pow(k) % 3])
                    .collect();
                let runs = super::runs(&text, None);
                let modes = optimize(&runs, version);
                assert_eq!(
                    total_bits(&runs, &modes, version),
                    exhaustive_minimum(&runs, version),
                    "{:?} in version {}",
                    text,
                    version
                );
            }
        }
    }
}
