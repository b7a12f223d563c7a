//! Splitting a password into readable blocks.
//!
//! Lengths below 6 stay in one block.  Otherwise the block count is
//! `len/5`, `len/4` or `len/3`, whichever divides first (falling back to
//! `len/5 + 1`); when that yields more than 4 blocks the divisors 8, 7, 6
//! and 5 are tried instead.  Leftover characters are spread evenly.

use zeroize::Zeroizing;

/// How many blocks a password of `len` characters is split into.
pub fn blocks_needed(len: usize) -> usize {
    if len < 6 {
        return 1;
    }

    let pick = |divisors: &[usize]| {
        divisors
            .iter()
            .find(|d| len % **d == 0)
            .map_or(len / 5 + 1, |d| len / d)
    };

    let blocks = pick(&[5, 4, 3]);
    if blocks > 4 {
        pick(&[8, 7, 6, 5])
    } else {
        blocks
    }
}

/// Sizes of each block, in order.  They sum to `len`.
pub fn block_sizes(len: usize) -> Vec<usize> {
    let blocks = blocks_needed(len);
    let base = len / blocks;
    let extra = len % blocks;
    (0..blocks)
        .map(|i| {
            let bonus = (i + 1) * extra / blocks - i * extra / blocks;
            base + bonus
        })
        .collect()
}

/// Insert `separator` between blocks.  With a non-zero `width`, a block
/// that would run past it starts a new line instead.
///
/// The text is a password, so every copy made here is wiped on drop.
pub fn group(text: &str, separator: char, width: usize) -> Zeroizing<String> {
    let chars: Zeroizing<Vec<char>> = Zeroizing::new(text.chars().collect());
    // Sized for the worst case so the buffer never reallocates.
    let mut out = Zeroizing::new(String::with_capacity(
        text.len() + chars.len() * separator.len_utf8(),
    ));
    let mut line = 0usize;
    let mut start = 0usize;

    for (i, size) in block_sizes(chars.len()).into_iter().enumerate() {
        if i > 0 {
            if width > 0 && line + 1 + size > width {
                out.push('\n');
                line = 0;
            } else {
                out.push(separator);
                line += 1;
            }
        }
        out.extend(&chars[start..start + size]);
        line += size;
        start += size;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_one_block() {
        assert_eq!(blocks_needed(0), 1);
        assert_eq!(blocks_needed(5), 1);
    }

    #[test]
    fn block_counts() {
        assert_eq!(blocks_needed(10), 2);
        assert_eq!(blocks_needed(12), 3);
        assert_eq!(blocks_needed(16), 4);
        assert_eq!(blocks_needed(20), 4);
        assert_eq!(blocks_needed(7), 2);
        // 30/5 = 6 blocks is too many, 30/6 = 5.
        assert_eq!(blocks_needed(30), 5);
        assert_eq!(blocks_needed(64), 8);
    }

    #[test]
    fn sizes_sum_to_length() {
        for len in 0..=128 {
            assert_eq!(block_sizes(len).iter().sum::<usize>(), len);
        }
    }

    #[test]
    fn leftovers_are_spread() {
        assert_eq!(block_sizes(7), vec![3, 4]);
        assert_eq!(block_sizes(11), vec![3, 4, 4]);
    }

    #[test]
    fn group_inserts_separators() {
        assert_eq!(group("abcdefghijkl", ' ', 0).as_str(), "abcd efgh ijkl");
        assert_eq!(group("abcde", '-', 0).as_str(), "abcde");
        assert_eq!(group("", ' ', 0).as_str(), "");
    }

    #[test]
    fn group_wraps_at_width() {
        assert_eq!(group("abcdefghijkl", ' ', 9).as_str(), "abcd efgh\nijkl");
    }

    #[test]
    fn wide_separator_and_wrapping_fit_without_regrowth() {
        let text = "Tr0ub4dor&3xyz";
        let worst_case = text.len() + text.chars().count() * '\u{b7}'.len_utf8();

        let grouped: Zeroizing<String> = group(text, '\u{b7}', 6);
        let stripped: Zeroizing<String> = Zeroizing::new(grouped.replace(['\u{b7}', '\n'], ""));
        assert_eq!(stripped.as_str(), text);
        assert!(grouped.len() <= worst_case);
    }
}
