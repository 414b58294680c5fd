const MAX_ITERATIONS: usize = 100;

/// Lloyd's k-means with deterministic seeding.
///
/// Centroids start at the first `k` distinct vectors in input order, so the
/// same input always yields the same labels. Returns one label per vector.
pub fn kmeans(vectors: &[Vec<f32>], k: usize) -> Result<Vec<usize>, String> {
    if vectors.is_empty() {
        return Err("k-means needs at least one vector".to_string());
    }
    let dims = vectors[0].len();
    if vectors.iter().any(|v| v.len() != dims) {
        return Err("embedding dimensions disagree".to_string());
    }

    let mut centroids: Vec<Vec<f32>> = Vec::new();
    for vector in vectors {
        if centroids.len() == k {
            break;
        }
        if !centroids.iter().any(|c| c == vector) {
            centroids.push(vector.clone());
        }
    }
    if centroids.is_empty() {
        return Err("k must be at least 1".to_string());
    }

    let mut labels = assign(vectors, &centroids);
    for _ in 0..MAX_ITERATIONS {
        for (index, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&Vec<f32>> = vectors
                .iter()
                .zip(&labels)
                .filter(|(_, label)| **label == index)
                .map(|(v, _)| v)
                .collect();
            // an emptied cluster keeps its previous centroid
            if members.is_empty() {
                continue;
            }
            for (d, value) in centroid.iter_mut().enumerate() {
                *value = members.iter().map(|m| m[d]).sum::<f32>() / members.len() as f32;
            }
        }

        let next = assign(vectors, &centroids);
        if next == labels {
            break;
        }
        labels = next;
    }
    Ok(labels)
}

fn assign(vectors: &[Vec<f32>], centroids: &[Vec<f32>]) -> Vec<usize> {
    vectors
        .iter()
        .map(|vector| {
            let mut best = 0;
            let mut best_distance = f32::INFINITY;
            for (index, centroid) in centroids.iter().enumerate() {
                let distance = squared_distance(vector, centroid);
                if distance < best_distance {
                    best = index;
                    best_distance = distance;
                }
            }
            best
        })
        .collect()
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
