//! Positional `%`-verb rendering for formatted errors
//!
//! Rendering never fails. Anything that does not line up between the
//! template and the arguments is written out as a marker:
//!
//! | problem            | output                      |
//! |--------------------|-----------------------------|
//! | missing argument   | `%!d(MISSING)`              |
//! | wrong type         | `%!d(string=foo)`           |
//! | unknown verb       | `%!z(int=3)`                |
//! | unused arguments   | `%!(EXTRA string=x, int=3)` |
//! | trailing `%`       | `%!(NOVERB)`                |
//! | width over 1e6     | `%!(BADWIDTH)`              |
//! | precision over 1e6 | `%!(BADPREC)`               |
//!
//! `%v` and `%g` print floats in their shortest form, switching to an
//! exponent outside `1e-4 <= |x| < 1e6` (`1e+21`, `1e-07`).

use crate::Arg;
use std::fmt::{self, Write};
use std::iter::Peekable;
use std::str::Chars;

/// Largest width or precision a template may ask for
const MAX_WIDTH: usize = 1_000_000;

#[derive(Debug, Default)]
struct Spec {
    minus: bool,
    plus: bool,
    zero: bool,
    space: bool,
    sharp: bool,
    width: Option<usize>,
    precision: Option<usize>,
    bad_width: bool,
    bad_precision: bool,
}

/// Render `template` with `args` substituted positionally
pub(crate) fn write<W: Write>(out: &mut W, template: &str, args: &[Arg]) -> fmt::Result {
    let mut chars = template.chars().peekable();
    let mut next = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.write_char(c)?;
            continue;
        }

        let spec = parse_spec(&mut chars);
        if spec.bad_width {
            out.write_str("%!(BADWIDTH)")?;
        }
        if spec.bad_precision {
            out.write_str("%!(BADPREC)")?;
        }
        let Some(verb) = chars.next() else {
            out.write_str("%!(NOVERB)")?;
            break;
        };
        if verb == '%' {
            out.write_char('%')?;
            continue;
        }

        let Some(arg) = args.get(next) else {
            write!(out, "%!{}(MISSING)", verb)?;
            continue;
        };
        next += 1;

        match render(verb, &spec, arg) {
            Some(body) => pad(out, &spec, &body, arg.is_numeric())?,
            None => write!(out, "%!{}({}={})", verb, arg.type_name(), arg)?,
        }
    }

    if next < args.len() {
        out.write_str("%!(EXTRA ")?;
        for (i, arg) in args[next..].iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            write!(out, "{}={}", arg.type_name(), arg)?;
        }
        out.write_char(')')?;
    }

    Ok(())
}

fn parse_spec(chars: &mut Peekable<Chars<'_>>) -> Spec {
    let mut spec = Spec::default();
    while let Some(&flag) = chars.peek() {
        match flag {
            '-' => spec.minus = true,
            '+' => spec.plus = true,
            '0' => spec.zero = true,
            ' ' => spec.space = true,
            '#' => spec.sharp = true,
            _ => break,
        }
        chars.next();
    }
    spec.width = parse_number(chars);
    if spec.width.is_some_and(|width| width > MAX_WIDTH) {
        spec.width = None;
        spec.bad_width = true;
    }
    if chars.peek() == Some(&'.') {
        chars.next();
        match parse_number(chars).unwrap_or(0) {
            precision if precision > MAX_WIDTH => spec.bad_precision = true,
            precision => spec.precision = Some(precision),
        }
    }
    spec
}

fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
        chars.next();
    }
    value
}

/// Render one argument; `None` means the verb does not accept it
fn render(verb: char, spec: &Spec, arg: &Arg) -> Option<String> {
    let body = match (verb, arg) {
        ('v', Arg::Int(i)) => signed(spec, *i < 0, i.unsigned_abs().to_string()),
        ('v', Arg::Uint(u)) => signed(spec, false, u.to_string()),
        ('v', Arg::Float(x)) => float(spec, *x, |m| general(m, None)),
        ('v', other) => truncate(spec, other.to_string()),

        ('s', Arg::Str(_) | Arg::Char(_) | Arg::Display { .. }) => truncate(spec, arg.to_string()),
        ('q', Arg::Str(s)) => format!("{:?}", s),
        ('q', Arg::Char(c)) => format!("{:?}", c),
        ('q', Arg::Display { value, .. }) => format!("{:?}", value.to_string()),

        ('d', Arg::Int(i)) => signed(spec, *i < 0, i.unsigned_abs().to_string()),
        ('d', Arg::Uint(u)) => signed(spec, false, u.to_string()),

        ('x' | 'X' | 'o' | 'b', Arg::Int(i)) => radix(spec, verb, *i < 0, i.unsigned_abs()),
        ('x' | 'X' | 'o' | 'b', Arg::Uint(u)) => radix(spec, verb, false, *u),
        ('x', Arg::Str(s)) => s.bytes().map(|b| format!("{:02x}", b)).collect(),
        ('X', Arg::Str(s)) => s.bytes().map(|b| format!("{:02X}", b)).collect(),

        ('c', Arg::Char(c)) => c.to_string(),
        ('c', Arg::Int(i)) => char_of(u32::try_from(*i).ok()),
        ('c', Arg::Uint(u)) => char_of(u32::try_from(*u).ok()),

        ('t', Arg::Bool(b)) => b.to_string(),

        ('f' | 'F', Arg::Float(x)) => {
            let precision = spec.precision.unwrap_or(6);
            float(spec, *x, |m| format!("{:.*}", precision, m))
        }
        ('e' | 'E', Arg::Float(x)) => {
            let precision = spec.precision.unwrap_or(6);
            let body = float(spec, *x, |m| exponent(&format!("{:.*e}", precision, m)));
            if verb == 'E' {
                body.to_uppercase()
            } else {
                body
            }
        }
        ('g' | 'G', Arg::Float(x)) => {
            let body = float(spec, *x, |m| general(m, spec.precision));
            if verb == 'G' {
                body.to_uppercase()
            } else {
                body
            }
        }

        _ => return None,
    };
    Some(body)
}

fn signed(spec: &Spec, negative: bool, digits: String) -> String {
    let sign = if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    };
    format!("{}{}", sign, digits)
}

fn radix(spec: &Spec, verb: char, negative: bool, magnitude: u64) -> String {
    let (prefix, digits) = match verb {
        'x' => ("0x", format!("{:x}", magnitude)),
        'X' => ("0X", format!("{:X}", magnitude)),
        'o' => ("0", format!("{:o}", magnitude)),
        _ => ("0b", format!("{:b}", magnitude)),
    };
    let digits = if spec.sharp {
        format!("{}{}", prefix, digits)
    } else {
        digits
    };
    signed(spec, negative, digits)
}

fn float(spec: &Spec, x: f64, magnitude: impl Fn(f64) -> String) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        let inf = if x < 0.0 { "-Inf" } else { "+Inf" };
        return inf.to_string();
    }
    signed(spec, x.is_sign_negative(), magnitude(x.abs()))
}

/// The `%v` rendering of a float, as used in markers
pub(crate) fn shortest(x: f64) -> String {
    float(&Spec::default(), x, |m| general(m, None))
}

/// `%g`: the shortest digits, or `precision` significant digits, laid out
/// plainly unless the exponent is below -4 or too large for the digits
fn general(x: f64, precision: Option<usize>) -> String {
    let rendered = match precision {
        Some(p) => format!("{:.*e}", p.max(1) - 1, x),
        None => format!("{:e}", x),
    };
    let Some((mantissa, exp)) = rendered.split_once('e') else {
        return rendered;
    };
    let exp: i64 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = match digits.trim_end_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };

    let count = digits.len() as i64;
    let limit = match precision {
        None => 6,
        Some(p) => {
            let p = p.max(1) as i64;
            if p > count && count >= exp + 1 {
                count
            } else {
                p
            }
        }
    };

    if exp < -4 || exp >= limit {
        let (first, rest) = digits.split_at(1);
        let mantissa = if rest.is_empty() {
            first.to_string()
        } else {
            format!("{}.{}", first, rest)
        };
        return exponent(&format!("{}e{}", mantissa, exp));
    }
    if exp < 0 {
        return format!("0.{}{}", "0".repeat((-exp - 1) as usize), digits);
    }
    let point = exp as usize + 1;
    if digits.len() <= point {
        format!("{}{}", digits, "0".repeat(point - digits.len()))
    } else {
        format!("{}.{}", &digits[..point], &digits[point..])
    }
}

/// `1.5e3` becomes `1.5e+03`
fn exponent(rendered: &str) -> String {
    match rendered.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => rendered.to_string(),
    }
}

fn char_of(code: Option<u32>) -> String {
    code.and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}

fn truncate(spec: &Spec, text: String) -> String {
    match spec.precision {
        Some(precision) if text.chars().count() > precision => text.chars().take(precision).collect(),
        _ => text,
    }
}

fn pad<W: Write>(out: &mut W, spec: &Spec, body: &str, numeric: bool) -> fmt::Result {
    let len = body.chars().count();
    let fill = spec.width.unwrap_or(0).saturating_sub(len);
    if fill == 0 {
        return out.write_str(body);
    }

    if spec.minus {
        out.write_str(body)?;
        (0..fill).try_for_each(|_| out.write_char(' '))
    } else if spec.zero && numeric {
        // zeros go between the sign and the digits
        let split = body
            .char_indices()
            .find(|(_, c)| !matches!(c, '-' | '+' | ' '))
            .map_or(body.len(), |(i, _)| i);
        out.write_str(&body[..split])?;
        (0..fill).try_for_each(|_| out.write_char('0'))?;
        out.write_str(&body[split..])
    } else {
        (0..fill).try_for_each(|_| out.write_char(' '))?;
        out.write_str(body)
    }
}
