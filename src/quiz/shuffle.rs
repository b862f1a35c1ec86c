use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly shuffled play order over `0..len`.
pub fn play_order<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}
