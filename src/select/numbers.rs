// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of parser for atom and residue numbers.

use crate::errors::SelectError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum NumberToken {
    Number(usize),
    Range,
    Lower,
    LowerOrEqual,
    Greater,
    GreaterOrEqual,
}

impl NumberToken {
    fn str2number(string: &str) -> Result<Self, SelectError> {
        string
            .parse::<usize>()
            .map(NumberToken::Number)
            .map_err(|_| SelectError::InvalidNumber("".to_string()))
    }

    fn extract_number(self) -> Result<usize, SelectError> {
        match self {
            NumberToken::Number(n) => Ok(n),
            _ => Err(SelectError::InvalidNumber("".to_string())),
        }
    }
}

/// Push the pending fragment (a number or a lone comparison operator) into the tokens.
fn flush(current: &mut String, tokens: &mut Vec<NumberToken>) -> Result<(), SelectError> {
    if current.is_empty() {
        return Ok(());
    }

    match current.as_str() {
        ">" => tokens.push(NumberToken::Greater),
        "<" => tokens.push(NumberToken::Lower),
        number => tokens.push(NumberToken::str2number(number)?),
    }

    current.clear();
    Ok(())
}

fn tokenize_numbers(token: &[String]) -> Result<Vec<NumberToken>, SelectError> {
    let mut tokens: Vec<NumberToken> = Vec::new();

    let mut current = String::new();
    let joined = token.join(" ");

    for c in joined.chars() {
        match c {
            '-' => {
                flush(&mut current, &mut tokens)?;
                tokens.push(NumberToken::Range);
            }
            '<' | '>' => {
                flush(&mut current, &mut tokens)?;
                current.push(c);
            }
            // '=' is only valid directly after '<' or '>'
            '=' => {
                match current.as_str() {
                    ">" => tokens.push(NumberToken::GreaterOrEqual),
                    "<" => tokens.push(NumberToken::LowerOrEqual),
                    _ => return Err(SelectError::InvalidNumber("".to_string())),
                }
                current.clear();
            }
            c if c.is_whitespace() => flush(&mut current, &mut tokens)?,
            c if c.is_ascii_digit() => {
                if current == "<" || current == ">" {
                    flush(&mut current, &mut tokens)?;
                }
                current.push(c);
            }
            _ => return Err(SelectError::InvalidNumber("".to_string())),
        }
    }

    flush(&mut current, &mut tokens)?;

    Ok(tokens)
}

/// Parse a sequence of numbers, ranges, and open intervals into a vector of closed ranges.
///
/// `lowest` is the smallest valid number for the selected property
/// (1 for residue and atom numbers, 0 for residue indices); it bounds open intervals from below.
pub fn parse_numbers(token: &[String], lowest: usize) -> Result<Vec<(usize, usize)>, SelectError> {
    let tokens = tokenize_numbers(token)?;

    let mut numbers: Vec<(usize, usize)> = Vec::new();
    let mut t = 0;
    while t < tokens.len() {
        let token = tokens[t];

        match token {
            NumberToken::Number(n) => {
                if tokens.get(t + 1) == Some(&NumberToken::Range) {
                    t += 1;
                    continue;
                }

                numbers.push((n, n));
                t += 1;
            }

            NumberToken::Range => {
                if t == 0 || t + 1 == tokens.len() {
                    return Err(SelectError::InvalidNumber("".to_string()));
                }

                let previous = tokens[t - 1].extract_number()?;
                let next = tokens[t + 1].extract_number()?;

                if previous > next {
                    return Err(SelectError::InvalidNumber("".to_string()));
                }

                numbers.push((previous, next));
                t += 2;
            }

            comparison => {
                let next = match tokens.get(t + 1) {
                    Some(x) => x.extract_number()?,
                    None => return Err(SelectError::InvalidNumber("".to_string())),
                };

                match comparison {
                    NumberToken::Greater => numbers.push((next + 1, usize::MAX)),
                    NumberToken::GreaterOrEqual => numbers.push((next, usize::MAX)),
                    NumberToken::Lower if next > lowest => numbers.push((lowest, next - 1)),
                    NumberToken::Lower => (),
                    NumberToken::LowerOrEqual if next >= lowest => numbers.push((lowest, next)),
                    NumberToken::LowerOrEqual => (),
                    _ => panic!("FATAL FLEXAN ERROR | numbers::parse_numbers | Impossible match condition reached."),
                }

                t += 2;
            }
        }
    }

    Ok(numbers)
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(string: &str) -> Vec<String> {
        string.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn single_numbers() {
        assert_eq!(
            parse_numbers(&tokens("1 5 17"), 1).unwrap(),
            vec![(1, 1), (5, 5), (17, 17)]
        );
    }

    #[test]
    fn ranges() {
        assert_eq!(
            parse_numbers(&tokens("1-5 10 - 12 20"), 1).unwrap(),
            vec![(1, 5), (10, 12), (20, 20)]
        );
    }

    #[test]
    fn open_intervals() {
        assert_eq!(
            parse_numbers(&tokens("<5 >= 20"), 1).unwrap(),
            vec![(1, 4), (20, usize::MAX)]
        );
        assert_eq!(parse_numbers(&tokens("<= 3"), 0).unwrap(), vec![(0, 3)]);
        assert_eq!(parse_numbers(&tokens("> 7"), 0).unwrap(), vec![(8, usize::MAX)]);
    }

    #[test]
    fn lower_than_lowest() {
        assert!(parse_numbers(&tokens("< 1"), 1).unwrap().is_empty());
        assert!(parse_numbers(&tokens("< 0"), 0).unwrap().is_empty());
    }

    #[test]
    fn invalid() {
        for query in ["5-", "-5", "10-5", "abc", "<", "=5", "1 2 >"] {
            assert_eq!(
                parse_numbers(&tokens(query), 1),
                Err(SelectError::InvalidNumber("".to_string())),
                "query `{}` should fail",
                query
            );
        }
    }
}
