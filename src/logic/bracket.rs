//! Bracket building: bye padding, canonical seed placement and successor wiring.

use crate::models::{Bracket, BracketMatch, Opponent, PlayerId, TournamentError, MAX_SEEDS};
use rand::seq::SliceRandom;
use rand::Rng;

/// Canonical seed-slot order for a bracket of `size` slots, as 0-based slot indices.
///
/// Starting from `[1]`, every doubling step `i` replaces each seed `s` with `s, 2^i + 1 - s`.
/// For 8 slots this is `[0, 7, 3, 4, 1, 6, 2, 5]`: seed 1 meets seed 8 first and
/// seeds 1 and 2 sit in opposite halves. Sizes that are not a power of two get the
/// identity order.
pub fn seed_order(size: usize) -> Vec<usize> {
    if size <= 1 {
        return vec![0];
    }
    if !size.is_power_of_two() {
        return (0..size).collect();
    }
    let rounds = size.trailing_zeros();
    let mut seeds = vec![1usize];
    for i in 1..=rounds {
        let next = (1usize << i) + 1;
        seeds = seeds.iter().flat_map(|&s| [s, next - s]).collect();
    }
    seeds.into_iter().map(|s| s - 1).collect()
}

/// Build an unseeded bracket. Players are shuffled if asked, then padded with byes
/// up to the next power of two. Fewer than two players give an empty bracket.
pub fn build_bracket<R: Rng + ?Sized>(players: &[PlayerId], shuffle: bool, rng: &mut R) -> Bracket {
    if players.len() < 2 {
        return Bracket::default();
    }
    let mut list = players.to_vec();
    if shuffle {
        list.shuffle(rng);
    }
    let size = list.len().next_power_of_two();
    let mut slots: Vec<Option<PlayerId>> = list.into_iter().map(Some).collect();
    slots.resize(size, None);
    let mut bracket = bracket_from_slots(&slots);
    bracket.propagate();
    bracket
}

/// Build a bracket with up to 8 seeded players at their canonical slots.
/// `others` are shuffled into the remaining slots left to right, the rest become byes.
pub fn build_seeded_bracket<R: Rng + ?Sized>(
    seeded: &[PlayerId],
    others: &[PlayerId],
    rng: &mut R,
) -> Result<Bracket, TournamentError> {
    if seeded.len() > MAX_SEEDS {
        return Err(TournamentError::TooManySeeds {
            count: seeded.len(),
        });
    }
    let mut others = others.to_vec();
    others.shuffle(rng);
    Ok(seeded_bracket(seeded, &others))
}

/// Seeded placement without the seed limit; `others` are taken in the given order.
/// Used for the knockout bracket, where every group winner is seeded.
pub(crate) fn seeded_bracket(seeded: &[PlayerId], others: &[PlayerId]) -> Bracket {
    let total = seeded.len() + others.len();
    if total < 2 {
        return Bracket::default();
    }
    let size = total.next_power_of_two();
    let mut slots: Vec<Option<PlayerId>> = vec![None; size];
    for (&player, &slot) in seeded.iter().zip(seed_order(size).iter()) {
        slots[slot] = Some(player);
    }
    let mut rest = others.iter().copied();
    for slot in slots.iter_mut().filter(|s| s.is_none()) {
        match rest.next() {
            Some(p) => *slot = Some(p),
            None => break,
        }
    }
    log::debug!(
        "Seeded bracket: {} seeds, {} others, {} slots",
        seeded.len(),
        others.len(),
        size
    );
    let mut bracket = bracket_from_slots(&slots);
    bracket.propagate();
    bracket
}

/// Turn a power-of-two slot list (None = bye) into linked matches.
///
/// Round 1 pairs consecutive slots. Each later round has half the matches, all slots
/// unresolved. Match `m` of round `k` feeds match `ceil(m / 2)` of round `k + 1`.
fn bracket_from_slots(slots: &[Option<PlayerId>]) -> Bracket {
    let mut rounds: Vec<Vec<BracketMatch>> = Vec::new();
    let first: Vec<BracketMatch> = slots
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let slot_1 = Opponent::from(pair[0]);
            let slot_2 = Opponent::from(pair.get(1).copied().flatten());
            let mut m = BracketMatch::new(1, i as u32 + 1, slot_1, slot_2);
            // Round-1 walkovers are decided at build time.
            m.winner = m.walkover();
            m
        })
        .collect();
    rounds.push(first);

    while rounds.last().map_or(0, Vec::len) > 1 {
        let prev = rounds.len();
        let count = rounds[prev - 1].len().div_ceil(2);
        let next: Vec<BracketMatch> = (0..count)
            .map(|i| {
                BracketMatch::new(
                    prev as u32 + 1,
                    i as u32 + 1,
                    Opponent::Unresolved,
                    Opponent::Unresolved,
                )
            })
            .collect();
        for m in rounds[prev - 1].iter_mut() {
            let target = (m.match_number as usize).div_ceil(2) - 1;
            m.next_match_id = Some(next[target].id);
        }
        rounds.push(next);
    }

    Bracket::new(rounds.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_order_for_four_and_sixteen() {
        assert_eq!(seed_order(4), vec![0, 3, 1, 2]);
        let sixteen = seed_order(16);
        assert_eq!(sixteen[0], 0);
        assert_eq!(sixteen[1], 15);
        assert_eq!(sixteen.len(), 16);
        let mut sorted = sixteen.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn seed_order_falls_back_to_identity() {
        assert_eq!(seed_order(1), vec![0]);
        assert_eq!(seed_order(6), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn slots_wire_into_a_single_final() {
        let ids: Vec<Option<PlayerId>> = (0..8).map(|_| Some(uuid::Uuid::new_v4())).collect();
        let bracket = bracket_from_slots(&ids);
        assert_eq!(bracket.matches.len(), 7);
        assert_eq!(bracket.matches.iter().filter(|m| m.is_final()).count(), 1);
        let final_id = bracket.final_match().unwrap().id;
        for m in bracket.round(2) {
            assert_eq!(m.next_match_id, Some(final_id));
        }
    }
}
