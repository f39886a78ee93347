//! Safe evaluation of the fixed four-operand arithmetic grammar.
//!
//! Players submit expressions built from exactly four single digits 1–9 and
//! three binary operators. Two notations exist: the strict 7-character
//! postfix form the game accepts today, and the older infix-with-parentheses
//! form kept for the evaluator's legacy contract. Both are evaluated with a
//! plain value stack - never a general-purpose expression engine.

use thiserror::Error;

/// The value every scoring expression must produce.
pub const TARGET: f64 = 10.0;

/// Absolute tolerance for float comparisons against the target.
pub const EPSILON: f64 = 1e-9;

/// Number of operand digits in a valid expression.
pub const OPERAND_COUNT: usize = 4;

/// Length of a valid postfix expression: 4 operands + 3 operators.
pub const POSTFIX_LEN: usize = 7;

/// Every digit/operator arrangement reachable by fully parenthesizing four
/// operands left-to-right, with `x` = operand and `o` = operator.
const POSTFIX_SHAPES: [&str; 5] = [
    "xxxxooo", "xxxoxoo", "xxxooxo", "xxoxxoo", "xxoxoxo",
];

/// Which grammar an expression is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    /// Infix with parentheses, e.g. `(1+2+3)+4`. Legacy form.
    Infix,
    /// Strict 7-character reverse Polish, e.g. `1234+++`.
    Postfix,
}

/// Rejection reasons for malformed expressions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("invalid character {0:?} in expression")]
    InvalidCharacter(char),

    #[error("expression must contain exactly {OPERAND_COUNT} digits 1-9, found {0}")]
    WrongDigitCount(usize),

    #[error("postfix expression must be exactly {POSTFIX_LEN} characters, got {0}")]
    WrongLength(usize),

    #[error("operand/operator arrangement is not a valid postfix shape")]
    InvalidShape,

    #[error("unbalanced parentheses")]
    UnbalancedParens,

    #[error("division by zero")]
    DivisionByZero,

    /// Catch-all for stack underflow or leftover operands - an expression
    /// that passed the charset checks but is not arithmetically well formed.
    #[error("malformed expression")]
    Malformed,
}

/// Classification of an evaluation result, for differentiated feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultClass {
    /// Exactly the target value.
    Ten,
    /// An integer, but not the target.
    WrongInteger(i64),
    /// Not an integer at all (e.g. 10.5).
    NotInteger,
}

/// Evaluates `expression` under the given notation.
pub fn evaluate(expression: &str, notation: Notation) -> Result<f64, ExprError> {
    match notation {
        Notation::Infix => evaluate_infix(expression),
        Notation::Postfix => evaluate_postfix(expression),
    }
}

/// Returns `true` if `result` equals the target within tolerance.
pub fn is_target(result: f64) -> bool {
    (result - TARGET).abs() < EPSILON
}

/// Classifies a result as target / wrong integer / non-integer.
pub fn classify(result: f64) -> ResultClass {
    let rounded = result.round();
    if (result - rounded).abs() < EPSILON {
        if (rounded - TARGET).abs() < EPSILON {
            ResultClass::Ten
        } else {
            ResultClass::WrongInteger(rounded as i64)
        }
    } else {
        ResultClass::NotInteger
    }
}

/// Pulls the four operand digits out of an expression, in order of
/// appearance. Notation-agnostic: the matcher only cares about the operand
/// multiset, not the operator arrangement.
pub fn extract_operands(expression: &str) -> Result<[u8; 4], ExprError> {
    let mut digits = Vec::with_capacity(OPERAND_COUNT);
    for c in expression.chars() {
        match c {
            '1'..='9' => digits.push(c as u8 - b'0'),
            '0' => return Err(ExprError::InvalidCharacter('0')),
            _ => {}
        }
    }
    let arr: [u8; 4] = digits
        .as_slice()
        .try_into()
        .map_err(|_| ExprError::WrongDigitCount(digits.len()))?;
    Ok(arr)
}

// ---------------------------------------------------------------------------
// Postfix
// ---------------------------------------------------------------------------

/// Validates and evaluates a strict postfix expression.
pub fn evaluate_postfix(expression: &str) -> Result<f64, ExprError> {
    validate_postfix(expression)?;
    eval_rpn(expression)
}

/// Checks the three structural rules of the postfix grammar: charset,
/// length, and one of the five valid digit/operator shapes.
fn validate_postfix(expression: &str) -> Result<(), ExprError> {
    let mut shape = String::with_capacity(POSTFIX_LEN);
    let mut digit_count = 0usize;
    for c in expression.chars() {
        match c {
            '1'..='9' => {
                digit_count += 1;
                shape.push('x');
            }
            '+' | '-' | '*' | '/' => shape.push('o'),
            other => return Err(ExprError::InvalidCharacter(other)),
        }
    }
    if shape.len() != POSTFIX_LEN {
        return Err(ExprError::WrongLength(shape.len()));
    }
    if digit_count != OPERAND_COUNT {
        return Err(ExprError::WrongDigitCount(digit_count));
    }
    if !POSTFIX_SHAPES.contains(&shape.as_str()) {
        return Err(ExprError::InvalidShape);
    }
    Ok(())
}

/// Raw reverse-Polish stack evaluation over single-digit operands.
///
/// No shape enforcement - any well-formed RPN string evaluates. The room
/// path goes through [`evaluate_postfix`], which validates first.
pub fn eval_rpn(expression: &str) -> Result<f64, ExprError> {
    let mut stack: Vec<f64> = Vec::with_capacity(4);
    for c in expression.chars() {
        match c {
            '1'..='9' => stack.push(f64::from(c as u8 - b'0')),
            '+' | '-' | '*' | '/' => {
                let second = stack.pop().ok_or(ExprError::Malformed)?;
                let first = stack.pop().ok_or(ExprError::Malformed)?;
                stack.push(apply(first, second, c)?);
            }
            other => return Err(ExprError::InvalidCharacter(other)),
        }
    }
    if stack.len() != 1 {
        return Err(ExprError::Malformed);
    }
    Ok(stack[0])
}

// ---------------------------------------------------------------------------
// Infix
// ---------------------------------------------------------------------------

/// Evaluates an infix expression: charset and digit-count checks, then
/// shunting-yard conversion to RPN, then stack evaluation.
///
/// Consecutive digits group into one multi-digit number, so `12+3` reads as
/// twelve-plus-three (and then fails the digit-count rule, which counts
/// digit characters).
pub fn evaluate_infix(expression: &str) -> Result<f64, ExprError> {
    let expression: String = expression.chars().filter(|c| *c != ' ').collect();

    let mut digit_count = 0usize;
    for c in expression.chars() {
        match c {
            '1'..='9' => digit_count += 1,
            '+' | '-' | '*' | '/' | '(' | ')' => {}
            other => return Err(ExprError::InvalidCharacter(other)),
        }
    }
    if digit_count != OPERAND_COUNT {
        return Err(ExprError::WrongDigitCount(digit_count));
    }

    let rpn = to_rpn(&expression)?;
    eval_rpn_tokens(&rpn)
}

/// A token in converted infix output: a (possibly multi-digit) number or
/// an operator.
enum Token {
    Number(f64),
    Op(char),
}

fn precedence(op: char) -> u8 {
    match op {
        '+' | '-' => 1,
        _ => 2,
    }
}

/// Shunting-yard: infix to RPN with standard precedence and left
/// associativity.
fn to_rpn(expression: &str) -> Result<Vec<Token>, ExprError> {
    let mut output = Vec::new();
    let mut operators: Vec<char> = Vec::new();

    let chars: Vec<char> = expression.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '1'..='9' => {
                let mut value = f64::from(c as u8 - b'0');
                while i + 1 < chars.len() && chars[i + 1].is_ascii_digit() {
                    i += 1;
                    value = value * 10.0 + f64::from(chars[i] as u8 - b'0');
                }
                output.push(Token::Number(value));
            }
            '(' => operators.push(c),
            ')' => {
                loop {
                    match operators.pop() {
                        Some('(') => break,
                        Some(op) => output.push(Token::Op(op)),
                        None => return Err(ExprError::UnbalancedParens),
                    }
                }
            }
            '+' | '-' | '*' | '/' => {
                while let Some(&top) = operators.last() {
                    if top != '(' && precedence(top) >= precedence(c) {
                        output.push(Token::Op(top));
                        operators.pop();
                    } else {
                        break;
                    }
                }
                operators.push(c);
            }
            other => return Err(ExprError::InvalidCharacter(other)),
        }
        i += 1;
    }

    while let Some(op) = operators.pop() {
        if op == '(' {
            return Err(ExprError::UnbalancedParens);
        }
        output.push(Token::Op(op));
    }

    Ok(output)
}

fn eval_rpn_tokens(tokens: &[Token]) -> Result<f64, ExprError> {
    let mut stack: Vec<f64> = Vec::with_capacity(4);
    for token in tokens {
        match token {
            Token::Number(n) => stack.push(*n),
            Token::Op(op) => {
                let second = stack.pop().ok_or(ExprError::Malformed)?;
                let first = stack.pop().ok_or(ExprError::Malformed)?;
                stack.push(apply(first, second, *op)?);
            }
        }
    }
    if stack.len() != 1 {
        return Err(ExprError::Malformed);
    }
    Ok(stack[0])
}

fn apply(first: f64, second: f64, op: char) -> Result<f64, ExprError> {
    Ok(match op {
        '+' => first + second,
        '-' => first - second,
        '*' => first * second,
        '/' => {
            if second == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            first / second
        }
        _ => return Err(ExprError::Malformed),
    })
}

// ---------------------------------------------------------------------------
// Impossible combinations
// ---------------------------------------------------------------------------

/// The 48 sorted digit multisets from which 10 cannot be formed with
/// `+ - * /`. Useful for client-side hints; the core never consults it.
const IMPOSSIBLE_COMBINATIONS: [&str; 48] = [
    "1111", "1112", "1113", "1122", "1159", "1169", "1177", "1178", "1179",
    "1188", "1399", "1444", "1499", "1666", "1667", "1677", "1699", "1777",
    "2257", "3444", "3669", "3779", "3999", "4444", "4459", "4477", "4558",
    "4899", "4999", "5668", "5788", "5799", "5899", "6666", "6667", "6677",
    "6777", "6778", "6888", "6899", "6999", "7777", "7788", "7789", "7799",
    "7888", "7999", "8899",
];

/// Returns `true` if no expression over these four digits can reach 10.
pub fn is_impossible_combination(digits: &[u8; 4]) -> bool {
    let mut sorted = *digits;
    sorted.sort_unstable();
    let key: String = sorted.iter().map(|d| (b'0' + d) as char).collect();
    IMPOSSIBLE_COMBINATIONS.contains(&key.as_str())
}

// =========================================================================
// Tests
// =========================================================================
