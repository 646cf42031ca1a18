use crate::FaceRect;

/// A disjoint-set (union-find) over detection indices.
struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    fn find(&mut self, mut id: usize) -> usize {
        let mut root = id;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // collapse the path
        while self.parent[id] != root {
            let next = self.parent[id];
            self.parent[id] = root;
            id = next;
        }

        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }

        if self.size[ra] >= self.size[rb] {
            self.parent[rb] = ra;
            self.size[ra] += self.size[rb];
        } else {
            self.parent[ra] = rb;
            self.size[rb] += self.size[ra];
        }
    }
}

/// Whether two detections describe the same object.
///
/// All four edges must be within `eps` times the mean of the smaller sides.
fn similar(a: &FaceRect, b: &FaceRect, eps: f64) -> bool {
    let delta = eps * (a.width.min(b.width) + a.height.min(b.height)) as f64 * 0.5;
    let close = |p: usize, q: usize| (p as f64 - q as f64).abs() <= delta;

    close(a.x, b.x)
        && close(a.y, b.y)
        && close(a.x + a.width, b.x + b.width)
        && close(a.y + a.height, b.y + b.height)
}

/// Cluster raw detections and average each cluster.
///
/// Clusters with `min_neighbors` detections or fewer are dropped. The
/// surviving rectangles carry their cluster size in `neighbors`. A cluster
/// lying inside a stronger one is suppressed. With `min_neighbors == 0` the
/// detections are returned untouched.
///
/// # Arguments
///
/// * `rects` - The raw detections.
/// * `min_neighbors` - The cluster size a detection must exceed.
/// * `eps` - Relative tolerance for two detections to be merged.
pub fn group_rectangles(rects: &[FaceRect], min_neighbors: usize, eps: f64) -> Vec<FaceRect> {
    if min_neighbors == 0 || rects.is_empty() {
        return rects.to_vec();
    }

    let mut uf = UnionFind::new(rects.len());
    for i in 0..rects.len() {
        for j in i + 1..rects.len() {
            if similar(&rects[i], &rects[j], eps) {
                uf.union(i, j);
            }
        }
    }

    // accumulate x, y, width, height and count per cluster root
    let mut acc = vec![[0.0f64; 4]; rects.len()];
    let mut counts = vec![0usize; rects.len()];
    for (i, r) in rects.iter().enumerate() {
        let root = uf.find(i);
        let a = &mut acc[root];
        a[0] += r.x as f64;
        a[1] += r.y as f64;
        a[2] += r.width as f64;
        a[3] += r.height as f64;
        counts[root] += 1;
    }

    let clusters: Vec<FaceRect> = acc
        .iter()
        .zip(&counts)
        .filter(|(_, &n)| n > 0)
        .map(|(a, &n)| {
            let s = 1.0 / n as f64;
            FaceRect {
                x: (a[0] * s).round() as usize,
                y: (a[1] * s).round() as usize,
                width: (a[2] * s).round() as usize,
                height: (a[3] * s).round() as usize,
                neighbors: n,
            }
        })
        .collect();

    clusters
        .iter()
        .enumerate()
        .filter(|(_, r)| r.neighbors > min_neighbors)
        .filter(|(i, r1)| {
            !clusters.iter().enumerate().any(|(j, r2)| {
                if j == *i || r2.neighbors <= min_neighbors {
                    return false;
                }
                let dx = (r2.width as f64 * eps).round();
                let dy = (r2.height as f64 * eps).round();
                let inside = r1.x as f64 >= r2.x as f64 - dx
                    && r1.y as f64 >= r2.y as f64 - dy
                    && (r1.x + r1.width) as f64 <= (r2.x + r2.width) as f64 + dx
                    && (r1.y + r1.height) as f64 <= (r2.y + r2.height) as f64 + dy;
                inside && (r2.neighbors > r1.neighbors.max(3) || r1.neighbors < 3)
            })
        })
        .map(|(_, r)| *r)
        .collect()
}
