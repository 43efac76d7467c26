//! Coverage-biased mapping of pseudorandom bytes onto an alphabet.
//!
//! Every byte selects `b mod L` in the concatenated alphabet.  Segments
//! that received no characters then borrow one position from the
//! largest segment, and a final left-to-right pass bumps any index that
//! equals its predecessor.  The result covers every character class
//! (once the output is long enough) and never repeats a character
//! back to back.
//!
//! The bias this introduces is deliberate and small; the entropy comes
//! from the KDF stage, not from here.

use zeroize::Zeroizing;

use crate::errors::{SecretaryError, Result};

use super::Strength;

/// Map `bytes` onto the alphabet formed by concatenating `segments`.
///
/// Each segment must be non-empty printable ASCII.  The output has
/// exactly `bytes.len()` characters.
///
/// Coverage is only guaranteed when the output is long enough for the
/// largest segment to donate to every empty one.  Shorter outputs may
/// miss a class; that is a known limitation, not an error.
pub fn translate(bytes: &[u8], segments: &[&str]) -> Result<Zeroizing<String>> {
    if segments.is_empty() {
        return Err(SecretaryError::InvalidParameter(
            "at least one alphabet segment is required".into(),
        ));
    }
    if let Some(bad) = segments
        .iter()
        .find(|s| s.is_empty() || !s.bytes().all(|b| b.is_ascii() && !b.is_ascii_control()))
    {
        return Err(SecretaryError::InvalidParameter(format!(
            "alphabet segment {bad:?} must be non-empty printable ASCII"
        )));
    }

    let alphabet = segments.concat().into_bytes();
    let total = alphabet.len();

    // Start offset of each segment inside the joined alphabet.
    let offsets: Vec<usize> = segments
        .iter()
        .scan(0, |acc, s| {
            let start = *acc;
            *acc += s.len();
            Some(start)
        })
        .collect();

    // Positions that landed in each segment, in output order.
    let mut buckets: Zeroizing<Vec<Vec<usize>>> =
        Zeroizing::new(vec![Vec::new(); segments.len()]);
    let mut indices: Zeroizing<Vec<usize>> = Zeroizing::new(Vec::with_capacity(bytes.len()));

    for (pos, &b) in bytes.iter().enumerate() {
        let c = usize::from(b) % total;
        buckets[segment_of(&offsets, c)].push(pos);
        indices.push(c);
    }

    backfill(&mut indices, &mut buckets, segments, &offsets);
    break_repeats(&mut indices, total);

    Ok(Zeroizing::new(
        indices.iter().map(|&i| char::from(alphabet[i])).collect(),
    ))
}

/// Map `bytes` with the segments selected by `strength`.
pub fn encode(bytes: &[u8], strength: Strength) -> Result<Zeroizing<String>> {
    translate(bytes, strength.segments())
}

/// First-generation mapping: every byte becomes ASCII `b mod 94 + 33`.
pub fn printable_94(bytes: &[u8]) -> Zeroizing<String> {
    Zeroizing::new(bytes.iter().map(|&b| char::from(b % 94 + 33)).collect())
}

/// Index of the segment whose offset range contains `c`.
fn segment_of(offsets: &[usize], c: usize) -> usize {
    offsets.iter().rposition(|&start| c >= start).unwrap_or(0)
}

/// Give every empty segment one position taken from the donor bucket.
///
/// The donor is the first of the largest buckets, chosen once before
/// any borrowing.  Once it runs dry the remaining segments stay empty.
fn backfill(
    indices: &mut [usize],
    buckets: &mut [Vec<usize>],
    segments: &[&str],
    offsets: &[usize],
) {
    let donor = (0..buckets.len()).fold(0, |best, j| {
        if buckets[j].len() > buckets[best].len() {
            j
        } else {
            best
        }
    });

    for j in 0..segments.len() {
        if !buckets[j].is_empty() {
            continue;
        }
        let Some(pos) = buckets[donor].pop() else {
            break;
        };
        let remapped = indices[pos] % segments[j].len() + offsets[j];
        indices[pos] = remapped;
        buckets[j].push(pos);
    }
}

/// Bump any index equal to the one before it, wrapping past the end.
///
/// The comparison is against the predecessor's final (possibly bumped)
/// index, so a run of three or more equal bytes still yields no two
/// identical neighbours.
fn break_repeats(indices: &mut [usize], total: usize) {
    let mut prev = None;
    for idx in indices.iter_mut() {
        if prev == Some(*idx) {
            *idx += 1;
            if *idx >= total {
                *idx = 0;
            }
        }
        prev = Some(*idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_length_matches_input() {
        let bytes: Vec<u8> = (0..=255).collect();
        for strength in Strength::ALL {
            assert_eq!(encode(&bytes, strength).unwrap().len(), bytes.len());
        }
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(encode(&[], Strength::Symbols29).unwrap().as_str(), "");
    }

    #[test]
    fn plain_modulo_when_no_backfill_or_repeat_needed() {
        // 0 -> '0', 10 -> 'a', 36 -> 'A', 62 -> '!'
        let out = translate(&[0, 10, 36, 62], Strength::Symbols29.segments()).unwrap();
        assert_eq!(out.as_str(), "0aA!");
    }

    #[test]
    fn empty_segment_borrows_from_largest_bucket() {
        // Everything lands in lowercase; digits borrow the last lowercase
        // position: index 12 ('c') becomes 12 % 10 + 0 = '2'.
        let out = translate(&[10, 11, 12], &["0123456789", "abcdefghijklmnopqrstuvwxyz"]).unwrap();
        assert_eq!(out.as_str(), "ab2");
    }

    #[test]
    fn backfill_stops_when_donor_runs_dry() {
        // One byte, four segments: the digit bucket donates its only
        // position to lowercase and then there is nothing left.
        let out = translate(&[3], Strength::Symbols29.segments()).unwrap();
        assert_eq!(out.as_str(), "d");
    }

    #[test]
    fn adjacent_repeats_are_bumped() {
        let out = translate(&[1, 1, 1, 1], &["0123456789"]).unwrap();
        assert_eq!(out.as_str(), "1212");
    }

    #[test]
    fn bump_compares_against_the_adjusted_predecessor() {
        // 1,1,1 -> 1,2,1: the third index is compared with the bumped 2,
        // so it stays 1 instead of also becoming 2.
        let out = translate(&[1, 1, 1], &["0123456789"]).unwrap();
        assert_eq!(out.as_str(), "121");
        // 1,1,2 -> 1,2,3: the bumped 2 now collides with its successor.
        let out = translate(&[1, 1, 2], &["0123456789"]).unwrap();
        assert_eq!(out.as_str(), "123");
    }

    #[test]
    fn bump_wraps_to_start_of_alphabet() {
        let out = translate(&[9, 9], &["0123456789"]).unwrap();
        assert_eq!(out.as_str(), "90");
    }

    #[test]
    fn legacy_mapping_is_printable_ascii() {
        let bytes: Vec<u8> = (0..=255).collect();
        let out = printable_94(&bytes);
        assert!(out.bytes().all(|b| (33..=126).contains(&b)));
        assert_eq!(&out[..3], "!\"#");
    }

    #[test]
    fn rejects_bad_segments() {
        assert!(translate(&[1], &[]).is_err());
        assert!(translate(&[1], &["abc", ""]).is_err());
        assert!(translate(&[1], &["\u{e9}"]).is_err());
    }
}
