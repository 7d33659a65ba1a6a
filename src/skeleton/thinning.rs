//! Parallel two-subiteration thinning (Zhang & Suen, CACM 1984) with the
//! Lu & Wang neighbour bound and a final staircase pass.
//!
//! Neighbour labels around `P1`:
//!
//! ```text
//!   P9 P2 P3
//!   P8 P1 P4
//!   P7 P6 P5
//! ```
//!
//! A foreground pixel is deleted in a subiteration when it has 3..=6
//! foreground neighbours, exactly one 0→1 transition in the cyclic sequence
//! P2..P9, and the subiteration's directional condition holds:
//! - first:  `P2·P4·P6 = 0` and `P4·P6·P8 = 0` (south-east boundary, north-west corner)
//! - second: `P2·P4·P8 = 0` and `P2·P6·P8 = 0` (north-west boundary, south-east corner)
//!
//! Deletions within a subiteration are decided on the unmodified image and
//! applied together. The passes repeat until a full iteration deletes
//! nothing. Pixels outside the grid are background.
//!
//! With a lower bound of 2 neighbours the tips of two-pixel-thick diagonal
//! strokes are peeled one per pass until the stroke is gone; bounding at 3
//! keeps them, and leaves such strokes two pixels thick. The staircase pass
//! then walks the result once more in raster order and drops every pixel
//! with at least 3 neighbours whose removal keeps its neighbourhood
//! 8-connected (Yokoi connectivity number 1), until nothing changes.
//!
//! The plain scheme erases an isolated 2×2 block entirely; its top-left
//! pixel is kept instead so no component disappears.
//!
//! Only pixels on the current boundary can be deleted, so each subiteration
//! visits a candidate list (foreground pixels with a background neighbour)
//! instead of the whole grid.
use crate::mask::Mask;
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    First,
    Second,
}

const OFFSETS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Neighbours P2..P9 in clockwise order starting north.
#[inline]
fn neighbours(mask: &Mask, x: usize, y: usize) -> [bool; 8] {
    let (x, y) = (x as isize, y as isize);
    OFFSETS.map(|(dx, dy)| mask.is_set_at(x + dx, y + dy))
}

#[inline]
fn count(n: &[bool; 8]) -> usize {
    n.iter().filter(|&&v| v).count()
}

#[inline]
fn transitions(n: &[bool; 8]) -> usize {
    (0..8).filter(|&i| !n[i] && n[(i + 1) % 8]).count()
}

/// Yokoi connectivity number for 8-connected foreground.
fn connectivity(n: &[bool; 8]) -> usize {
    let bg = (*n).map(|v| !v);
    [0, 2, 4, 6]
        .iter()
        .filter(|&&k| bg[k] && !(bg[k + 1] && bg[(k + 2) % 8]))
        .count()
}

fn is_deletable(n: &[bool; 8], pass: Pass) -> bool {
    let [p2, _p3, p4, _p5, p6, _p7, p8, _p9] = *n;
    if !(3..=6).contains(&count(n)) || transitions(n) != 1 {
        return false;
    }
    match pass {
        Pass::First => !(p2 && p4 && p6) && !(p4 && p6 && p8),
        Pass::Second => !(p2 && p4 && p8) && !(p2 && p6 && p8),
    }
}

/// Top-left pixel of a 2×2 block whose four pixels are all marked for
/// deletion and have no other neighbours.
fn is_isolated_block_anchor(mask: &Mask, marked: &[bool], x: usize, y: usize) -> bool {
    let w = mask.width();
    if x + 1 >= w || y + 1 >= mask.height() {
        return false;
    }
    let block = [(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)];
    block
        .iter()
        .all(|&(bx, by)| marked[by * w + bx] && count(&neighbours(mask, bx, by)) == 3)
}

/// Scratch state shared by all subiterations of one `thin` call.
struct Thinning {
    mask: Mask,
    candidates: Vec<(usize, usize)>,
    marked: Vec<bool>,
    queued: Vec<bool>,
}

impl Thinning {
    fn new(source: &Mask) -> Self {
        let (w, h) = (source.width(), source.height());
        let candidates = source
            .foreground()
            .filter(|&(x, y)| count(&neighbours(source, x, y)) < 8)
            .collect();
        Self {
            mask: source.clone(),
            candidates,
            marked: vec![false; w * h],
            queued: vec![false; w * h],
        }
    }

    fn run_pass(&mut self, pass: Pass) -> usize {
        let w = self.mask.width();
        let marked: Vec<(usize, usize)> = self
            .candidates
            .iter()
            .copied()
            .filter(|&(x, y)| is_deletable(&neighbours(&self.mask, x, y), pass))
            .collect();
        if marked.is_empty() {
            return 0;
        }
        for &(x, y) in &marked {
            self.marked[y * w + x] = true;
        }
        let anchors: Vec<(usize, usize)> = marked
            .iter()
            .copied()
            .filter(|&(x, y)| is_isolated_block_anchor(&self.mask, &self.marked, x, y))
            .collect();
        for (x, y) in anchors {
            self.marked[y * w + x] = false;
        }

        let mut deleted = Vec::with_capacity(marked.len());
        for (x, y) in marked {
            if std::mem::take(&mut self.marked[y * w + x]) {
                deleted.push((x, y));
            }
        }
        for &(x, y) in &deleted {
            self.mask.set(x, y, false);
        }
        self.refresh_candidates(&deleted);
        deleted.len()
    }

    /// Surviving candidates plus the foreground neighbours of `deleted`,
    /// which are the only pixels that can have gained a background neighbour.
    fn refresh_candidates(&mut self, deleted: &[(usize, usize)]) {
        let (w, h) = (self.mask.width() as isize, self.mask.height() as isize);
        let mut next = Vec::with_capacity(self.candidates.len());
        let neighbours_of_deleted = deleted.iter().flat_map(|&(x, y)| {
            OFFSETS
                .iter()
                .map(move |&(dx, dy)| (x as isize + dx, y as isize + dy))
        });
        let survivors = self
            .candidates
            .iter()
            .map(|&(x, y)| (x as isize, y as isize));
        for (x, y) in survivors.chain(neighbours_of_deleted) {
            if x < 0 || y < 0 || x >= w || y >= h {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            let i = y * w as usize + x;
            if self.mask.is_set(x, y) && !self.queued[i] {
                self.queued[i] = true;
                next.push((x, y));
            }
        }
        for &(x, y) in &next {
            self.queued[y * w as usize + x] = false;
        }
        self.candidates = next;
    }

    /// Sequential raster sweeps removing redundant staircase pixels.
    fn remove_staircases(&mut self) -> usize {
        let pixels: Vec<(usize, usize)> = self.mask.foreground().collect();
        let mut removed = 0;
        loop {
            let mut changed = 0;
            for &(x, y) in &pixels {
                if !self.mask.is_set(x, y) {
                    continue;
                }
                let n = neighbours(&self.mask, x, y);
                if count(&n) >= 3 && connectivity(&n) == 1 {
                    self.mask.set(x, y, false);
                    changed += 1;
                }
            }
            if changed == 0 {
                return removed;
            }
            removed += changed;
        }
    }
}

/// Thin `mask` to a unit-width skeleton. Deterministic; a thinned result is
/// a fixed point of this function.
pub fn thin(mask: &Mask) -> Mask {
    let mut state = Thinning::new(mask);
    let mut iterations = 0usize;
    loop {
        let removed = state.run_pass(Pass::First) + state.run_pass(Pass::Second);
        iterations += 1;
        if removed == 0 {
            break;
        }
    }
    let staircase = state.remove_staircases();
    debug!(
        "thin: {} -> {} px in {} iterations ({} staircase px)",
        mask.count(),
        state.mask.count(),
        iterations,
        staircase
    );
    state.mask
}
