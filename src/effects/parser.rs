//! Operand expressions.
//!
//! Effect options such as `value=op.hp/4` or `add=me.skill.power*2+10`
//! are small arithmetic expressions over numbers and named identifiers.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := '-' unary | primary
//! primary := NUMBER | IDENT | '(' expr ')'
//! ```
//!
//! Identifiers are dotted paths resolved against the lhs/rhs units:
//!
//! - `me.<path>` / `op.<path>`; an unscoped path means `me.<path>`
//! - `last.me.<path>` / `last.op.<path>`: the previous turn's state
//! - `state.turn`, `state.weather`, `state.phase`
//! - `source.<name>`: the owning buff or the invoker's current skill
//!
//! A unit path is `pet.<name>` or a bare `<name>` (battle pet, then
//! progression pet), `skill.<name>`, `system.<name>`, `cursor`, or
//! `buff(<id>).<name>`.
//!
//! Evaluation never fails loudly: an unknown identifier, a syntax error
//! or a division by zero makes the whole expression `None`
//! (`NOT_FOUND` through [`evaluate`]).

use tracing::trace;

use super::effect::{Effect, EffectSource};
use super::identifier::{NamedAttributeAccessor, NOT_FOUND};
use crate::battle::{BattleState, Unit};

/// Everything an expression may refer to.
#[derive(Clone, Copy)]
pub struct OperandContext<'a> {
    pub effect: &'a Effect,
    pub lhs: &'a Unit,
    pub rhs: &'a Unit,
    /// State the units belong to, for `state.*` and `last.*`.
    pub state: Option<&'a BattleState>,
}

impl<'a> OperandContext<'a> {
    /// Context over the units of a state, `lhs` first.
    #[must_use]
    pub fn new(effect: &'a Effect, state: &'a BattleState, lhs: &'a Unit, rhs: &'a Unit) -> Self {
        Self {
            effect,
            lhs,
            rhs,
            state: Some(state),
        }
    }

    /// Evaluate an expression, `NOT_FOUND` on failure.
    #[must_use]
    pub fn evaluate(&self, expression: &str) -> f64 {
        evaluate(expression, self)
    }

    /// Evaluate an expression.
    #[must_use]
    pub fn try_evaluate(&self, expression: &str) -> Option<f64> {
        try_evaluate(expression, self)
    }
}

/// Evaluate an expression, `NOT_FOUND` on failure.
#[must_use]
pub fn evaluate(expression: &str, ctx: &OperandContext<'_>) -> f64 {
    try_evaluate(expression, ctx).unwrap_or(NOT_FOUND)
}

/// Evaluate an expression.
#[must_use]
pub fn try_evaluate(expression: &str, ctx: &OperandContext<'_>) -> Option<f64> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        ctx,
    };
    let value = parser.expr()?;
    let value = (parser.pos == tokens.len()).then_some(value);
    trace!(expression, ?value, "operand evaluated");
    value
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    Open,
    Close,
}

fn tokenize(input: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '+' | '-' | '*' | '/' | '%' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            ')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(Token::Number(text.parse().ok()?));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() {
                    let c = chars[i];
                    if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                        i += 1;
                    } else if c == '(' {
                        // Call-shaped segment: glue everything up to the
                        // closing paren onto the identifier.
                        let close = chars[i..].iter().position(|&c| c == ')')?;
                        i += close + 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            _ => return None,
        }
    }
    Some(tokens)
}

struct Parser<'t, 'c> {
    tokens: &'t [Token],
    pos: usize,
    ctx: &'c OperandContext<'c>,
}

impl Parser<'_, '_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.unary()?;
        while let Some(Token::Op(op @ ('*' | '/' | '%'))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                '*' => value * rhs,
                _ if rhs == 0.0 => return None,
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Some(value)
    }

    fn unary(&mut self) -> Option<f64> {
        if let Some(Token::Op('-')) = self.peek() {
            self.pos += 1;
            return self.unary().map(|v| -v);
        }
        self.primary()
    }

    fn primary(&mut self) -> Option<f64> {
        match self.next()?.clone() {
            Token::Number(n) => Some(n),
            Token::Ident(name) => resolve(&name, self.ctx),
            Token::Open => {
                let value = self.expr()?;
                match self.next()? {
                    Token::Close => Some(value),
                    _ => None,
                }
            }
            Token::Op(_) | Token::Close => None,
        }
    }
}

/// Resolve a dotted identifier path.
fn resolve(path: &str, ctx: &OperandContext<'_>) -> Option<f64> {
    if let Some(rest) = path.strip_prefix("last.") {
        let last = ctx.state?.previous_turn()?;
        let lhs = last.unit(ctx.lhs.id)?;
        let rhs = last.unit(ctx.rhs.id)?;
        return scoped(rest, lhs, rhs);
    }
    if let Some(name) = path.strip_prefix("state.") {
        let state = ctx.state?;
        return match name {
            "turn" => Some(f64::from(state.turn)),
            "weather" => Some(f64::from(state.weather as i32)),
            "phase" => Some(f64::from(state.phase as i32)),
            _ => None,
        };
    }
    if let Some(name) = path.strip_prefix("source.") {
        return source_value(name, ctx);
    }
    scoped(path, ctx.lhs, ctx.rhs)
}

fn scoped(path: &str, lhs: &Unit, rhs: &Unit) -> Option<f64> {
    if let Some(rest) = path.strip_prefix("me.") {
        unit_value(rest, lhs)
    } else if let Some(rest) = path.strip_prefix("op.") {
        unit_value(rest, rhs)
    } else {
        unit_value(path, lhs)
    }
}

fn unit_value(path: &str, unit: &Unit) -> Option<f64> {
    if let Some(name) = path.strip_prefix("skill.") {
        return unit.skill().try_get(name);
    }
    if let Some(name) = path.strip_prefix("system.") {
        return unit.skill_system.try_get(name);
    }
    if path == "cursor" {
        return Some(unit.pet_system.cursor as f64);
    }

    let pet = unit.pet()?;
    if let Some(name) = path.strip_prefix("pet.") {
        return pet.try_get(name);
    }
    if let Some((call, name)) = path.split_once(").") {
        let id: i32 = call.strip_prefix("buff(")?.trim().parse().ok()?;
        return pet.buffs.get_buff(id)?.try_get(name);
    }
    pet.try_get(path)
}

fn source_value(name: &str, ctx: &OperandContext<'_>) -> Option<f64> {
    let invoker = ctx.effect.invoker?;
    let unit = [ctx.lhs, ctx.rhs].into_iter().find(|u| u.id == invoker)?;
    match ctx.effect.source {
        EffectSource::Buff(id) => unit.pet()?.buffs.get_buff(id)?.try_get(name),
        EffectSource::Skill(_) => unit.skill().try_get(name),
        EffectSource::None => None,
    }
}
