pub fn distance(from: [f32; 2], to: [f32; 2]) -> f32 {
    (from[0] - to[0]).hypot(from[1] - to[1])
}

/// Fills `mask` for one instance and returns whether the instance is done.
///
/// A node is legal when its prize exceeds `min_prize` and going there and
/// then straight back to the depot fits in `remaining`. When nothing is
/// legal the depot is forced open so the episode can end.
pub fn feasibility_mask(
    locs: &[[f32; 2]],
    length_to_depot: &[f32],
    prize: &[f32],
    current_node: usize,
    remaining: f32,
    min_prize: f32,
    mask: &mut [bool],
) -> bool {
    let here = locs[current_node];
    let mut num_legal = 0;
    for (node, legal) in mask.iter_mut().enumerate() {
        *legal = prize[node] > min_prize
            && distance(here, locs[node]) + length_to_depot[node] <= remaining;
        num_legal += *legal as usize;
    }
    let done = num_legal == 0;
    mask[0] |= done;
    done
}
