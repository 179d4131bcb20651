use crate::ast::{BodyDecl, Scenario, SimulateDecl};
use crate::body::BodyKind;
use crate::diagnostics::Span;
use crate::engine::DEFAULT_SAMPLES;
use crate::integrator::UpdateOrder;
use crate::physics::PhysicsSet;
use thiserror::Error;

/// Parse error with optional span information
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{message}")]
    SyntaxError {
        message: String,
        span: Option<Span>,
    },
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span: None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::SyntaxError { span, .. } => *span,
        }
    }
}

/// Helper to track byte offsets while parsing
struct ParseContext {
    line_offsets: Vec<usize>, // Byte offset of start of each line
    len: usize,
}

impl ParseContext {
    fn new(source: &str) -> Self {
        let mut line_offsets = vec![0];
        let mut offset = 0;
        for ch in source.chars() {
            offset += ch.len_utf8();
            if ch == '\n' {
                line_offsets.push(offset);
            }
        }
        Self {
            line_offsets,
            len: source.len(),
        }
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_offsets.get(line).copied().unwrap_or(self.len)
    }

    /// Create a span for the entire line
    fn full_line_span(&self, line: usize) -> Span {
        Span::new(self.line_start(line), self.line_start(line + 1))
    }
}

/// Parse a scenario from source text
pub fn parse_scenario(source: &str) -> Result<Scenario, ParseError> {
    let ctx = ParseContext::new(source);
    let mut simulate: Option<SimulateDecl> = None;
    let mut physics = PhysicsSet::empty();
    let mut bodies = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line = raw.trim();
        let span = Some(ctx.full_line_span(i));

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (keyword, rest) = split_word(line);
        match keyword {
            "simulate" => {
                if simulate.is_some() {
                    return Err(ParseError::new("Duplicate 'simulate' declaration", span));
                }
                simulate = Some(parse_simulate(rest, span)?);
            }
            "physics" => {
                let set: PhysicsSet = rest
                    .parse()
                    .map_err(|e| ParseError::new(format!("{}", e), span))?;
                for p in set.iter() {
                    physics.insert(p);
                }
            }
            "body" => bodies.push(parse_body(rest, span)?),
            other => {
                return Err(ParseError::new(format!("Unexpected token: {}", other), span));
            }
        }
    }

    let simulate =
        simulate.ok_or_else(|| ParseError::message("Missing 'simulate' declaration"))?;

    Ok(Scenario {
        simulate,
        physics,
        bodies,
    })
}

/// Parse `dims = d t_max = t [samples = n] [order = snapshot|sequential]`
fn parse_simulate(rest: &str, span: Option<Span>) -> Result<SimulateDecl, ParseError> {
    let spaced = rest.replace('=', " = ");
    let tokens: Vec<&str> = spaced.split_whitespace().collect();

    let mut dims = None;
    let mut t_max = None;
    let mut samples = None;
    let mut order = None;

    for setting in tokens.chunks(3) {
        let [key, eq, value] = setting else {
            return Err(ParseError::new(
                format!("Expected 'key = value' in simulate declaration, got '{}'", setting.join(" ")),
                span,
            ));
        };
        if *eq != "=" {
            return Err(ParseError::new(format!("Expected '=' after '{}'", key), span));
        }

        let duplicate = match *key {
            "dims" => dims.replace(parse_count(value, span)?).is_some(),
            "t_max" => t_max.replace(parse_number(value, span)?).is_some(),
            "samples" => samples.replace(parse_count(value, span)?).is_some(),
            "order" => order
                .replace(value.parse::<UpdateOrder>().map_err(|e| ParseError::new(e, span))?)
                .is_some(),
            other => {
                return Err(ParseError::new(format!("Unknown simulate setting '{}'", other), span));
            }
        };
        if duplicate {
            return Err(ParseError::new(format!("Duplicate simulate setting '{}'", key), span));
        }
    }

    Ok(SimulateDecl {
        dims: dims.ok_or_else(|| ParseError::new("Expected 'dims' in simulate declaration", span))?,
        t_max: t_max
            .ok_or_else(|| ParseError::new("Expected 't_max' in simulate declaration", span))?,
        samples: samples.unwrap_or(DEFAULT_SAMPLES),
        order: order.unwrap_or_default(),
        span,
    })
}

/// Parse `name at (..) mass m [charge q] [kind k] [velocity (..)] [acceleration (..)] [force (..)]`
fn parse_body(rest: &str, span: Option<Span>) -> Result<BodyDecl, ParseError> {
    let (name, rest) = split_word(rest);
    if name.is_empty() {
        return Err(ParseError::new("Expected body name", span));
    }

    let (at, rest) = split_word(rest);
    if at != "at" {
        return Err(ParseError::new(
            format!("Expected 'at' after body name '{}'", name),
            span,
        ));
    }
    let (position, mut rest) = take_tuple(rest, "position", span)?;

    let mut mass = None;
    let mut charge = None;
    let mut kind = None;
    let mut velocity = None;
    let mut acceleration = None;
    let mut force = None;

    loop {
        let (attribute, after) = split_word(rest);
        if attribute.is_empty() {
            break;
        }

        let duplicate = match attribute {
            "mass" | "charge" => {
                let (value, after) = split_word(after);
                let value = parse_number(value, span)?;
                rest = after;
                let slot = if attribute == "mass" { &mut mass } else { &mut charge };
                slot.replace(value).is_some()
            }
            "kind" => {
                let (value, after) = split_word(after);
                rest = after;
                let value = value
                    .parse::<BodyKind>()
                    .map_err(|e| ParseError::new(e, span))?;
                kind.replace(value).is_some()
            }
            "velocity" | "acceleration" | "force" => {
                let (value, after) = take_tuple(after, attribute, span)?;
                rest = after;
                let slot = match attribute {
                    "velocity" => &mut velocity,
                    "acceleration" => &mut acceleration,
                    _ => &mut force,
                };
                slot.replace(value).is_some()
            }
            other => {
                return Err(ParseError::new(
                    format!("Unknown body attribute '{}' on '{}'", other, name),
                    span,
                ));
            }
        };
        if duplicate {
            return Err(ParseError::new(
                format!("Duplicate attribute '{}' on body '{}'", attribute, name),
                span,
            ));
        }
    }

    let mass = mass.ok_or_else(|| {
        ParseError::new(format!("Expected 'mass' in body declaration '{}'", name), span)
    })?;

    Ok(BodyDecl {
        name: name.to_string(),
        kind: kind.unwrap_or_default(),
        mass,
        charge: charge.unwrap_or(0.0),
        position,
        velocity,
        acceleration,
        force,
        span,
    })
}

/// Split off the first whitespace-delimited word
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}

/// Parse a parenthesised, comma separated vector literal at the start of `s`
fn take_tuple<'a>(
    s: &'a str,
    what: &str,
    span: Option<Span>,
) -> Result<(Vec<f64>, &'a str), ParseError> {
    let s = s.trim_start();
    let inner = s.strip_prefix('(').ok_or_else(|| {
        ParseError::new(format!("Expected '(' to start {}", what), span)
    })?;
    let close = inner.find(')').ok_or_else(|| {
        ParseError::new(format!("Expected ')' to close {}", what), span)
    })?;

    let components = inner[..close]
        .split(',')
        .map(|c| parse_number(c.trim(), span))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((components, &inner[close + 1..]))
}

fn parse_number(text: &str, span: Option<Span>) -> Result<f64, ParseError> {
    let value: f64 = text
        .parse()
        .map_err(|_| ParseError::new(format!("Invalid number '{}'", text), span))?;
    if !value.is_finite() {
        return Err(ParseError::new(format!("Number must be finite, got '{}'", text), span));
    }
    Ok(value)
}

fn parse_count(text: &str, span: Option<Span>) -> Result<usize, ParseError> {
    text.parse()
        .map_err(|_| ParseError::new(format!("Expected a non-negative integer, got '{}'", text), span))
}
