//! Random derangements for assigning gift receivers.
use rand::Rng;

/// Returns a permutation of `items` in which every element has moved
/// (Sattolo's algorithm). The result is a single cycle through all items.
///
/// Fewer than two items cannot be deranged; callers must check that first.
pub fn sattolo_shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();

    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..i);
        shuffled.swap(i, j);
    }

    shuffled
}

/// Pairs each item (giver) with the item that landed in its position after a
/// Sattolo shuffle (receiver). No item is paired with itself when there are
/// at least two items.
pub fn draw_pairs<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Vec<(&'a T, &'a T)> {
    let positions: Vec<usize> = (0..items.len()).collect();
    let receivers = sattolo_shuffle(&positions, rng);

    items
        .iter()
        .zip(receivers)
        .map(|(giver, receiver)| (giver, &items[receiver]))
        .collect()
}
