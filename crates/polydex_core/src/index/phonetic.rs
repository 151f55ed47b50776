//! Soundex phonetic coding.

/// Returns the Soundex digit for a letter, or `None` for vowels, H, W, Y
/// and anything that is not a consonant in the table.
fn soundex_digit(c: char) -> Option<char> {
    match c.to_ascii_uppercase() {
        'B' | 'F' | 'P' | 'V' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        _ => None,
    }
}

/// Computes the four-character Soundex code of `word`.
///
/// The code is the uppercased first character followed by up to three
/// consonant-class digits, right-padded with `'0'`. Adjacent letters of the
/// same class collapse into one digit, and the first letter's class seeds
/// that de-duplication. Letters without a digit never reset it, so
/// "Tymczak" codes as `T520`.
///
/// The empty string has no code and returns an empty string.
pub fn soundex(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut code = String::with_capacity(4);
    code.push(first.to_uppercase().next().unwrap_or(first));

    let mut last = soundex_digit(first);
    let mut digits = 0;
    for c in chars {
        if digits == 3 {
            break;
        }
        if let Some(digit) = soundex_digit(c) {
            if last != Some(digit) {
                code.push(digit);
                digits += 1;
                last = Some(digit);
            }
        }
    }

    for _ in digits..3 {
        code.push('0');
    }
    code
}
