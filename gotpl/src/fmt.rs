//! Printf-style formatting over template values.
//!
//! A self-contained verb formatter in the style of Go's `fmt` package:
//! `%v %T %t %b %c %d %o %O %q %x %X %U %e %E %f %F %g %G %s` with the
//! flags `- + # 0 space`, widths, precisions, `*` star operands, and
//! `[n]` explicit argument indexes (1-based).  Formatting never fails:
//! problems render as inline `%!(...)` markers.
//!
//! Nothing in the pipeline evaluator reaches this module yet; the
//! `printf` keyword is reserved but unimplemented.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::Value;

/// One `%` directive: `%[flags][width][.prec][\[n\]]verb`.
static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%([\-+# 0]*)((?:\[\d+\])?\*|\d*)(?:\.((?:\[\d+\])?\*|\d*))?(?:\[(\d+)\])?(.?)")
        .unwrap_or_else(|e| panic!("directive pattern: {e}"))
});

// ── Flags ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Flags {
    /// `-`: left-justify within the width.
    pub minus: bool,
    /// `+`: always print a numeric sign.
    pub plus: bool,
    /// `#`: alternate form (radix prefixes, per-byte `0x` for string hex).
    pub alt: bool,
    /// `0`: pad numbers with zeros after the sign.
    pub zero: bool,
    /// space: leave a space for an elided sign; separate hex bytes.
    pub space: bool,
}

impl Flags {
    fn parse(spec: &str) -> Flags {
        let mut flags = Flags::default();
        for c in spec.chars() {
            match c {
                '-' => flags.minus = true,
                '+' => flags.plus = true,
                '#' => flags.alt = true,
                '0' => flags.zero = true,
                ' ' => flags.space = true,
                _ => {}
            }
        }
        flags
    }
}

// ── Number helpers ────────────────────────────────────────────────────────────

/// `{:e}` in this language prints `1.5e3`; rewrite the exponent to the
/// `e+03` convention.
fn exponential(n: f64, prec: usize) -> String {
    let raw = format!("{n:.prec$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(rest) => ('-', rest),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    }
}

/// Round to `prec` significant digits, switching to exponential notation
/// for very small or very large magnitudes.
fn to_precision(n: f64, prec: usize) -> String {
    let prec = prec.max(1);
    if n == 0.0 {
        return if prec > 1 {
            format!("{:.*}", prec - 1, 0.0)
        } else {
            "0".to_owned()
        };
    }
    let exp = n.abs().log10().floor() as i32;
    if exp < -6 || exp >= prec as i32 {
        exponential(n, prec - 1)
    } else {
        let frac = (prec as i32 - 1 - exp).max(0) as usize;
        format!("{n:.frac$}")
    }
}

/// Shortest natural rendering: integral values lose the fraction.
fn shortest(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn fmt_number(flags: Flags, prec: Option<usize>, verb: char, value: f64) -> Option<String> {
    let mut prefix = if flags.plus {
        "+"
    } else if flags.space {
        " "
    } else {
        ""
    };
    let mut n = value;
    if n < 0.0 {
        n = -n;
        prefix = "-";
    }
    // Radix and character verbs use the integer value.
    let int = n as i64;
    let formatted = match verb {
        'T' => "float64".to_owned(),
        'b' => format!("{}{}{:b}", prefix, if flags.alt { "0b" } else { "" }, int),
        'c' => char::from_u32(int as u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
            .to_string(),
        'd' => format!("{prefix}{}", shortest(n)),
        'o' => format!("{}{}{:o}", prefix, if flags.alt { "0" } else { "" }, int),
        'O' => format!("{prefix}0o{int:o}"),
        'q' => format!(
            "'{}'",
            char::from_u32(int as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
        ),
        'x' => format!("{}{}{:x}", prefix, if flags.alt { "0x" } else { "" }, int),
        'X' => format!("{}{}{:X}", prefix, if flags.alt { "0X" } else { "" }, int),
        'U' => format!("U+{:04X}", int as u32),
        'e' => format!("{prefix}{}", exponential(n, prec.unwrap_or(6))),
        'E' => format!("{prefix}{}", exponential(n, prec.unwrap_or(6)).to_uppercase()),
        'f' | 'F' => {
            let p = prec.unwrap_or(6);
            format!("{prefix}{n:.p$}")
        }
        'v' | 'g' | 'G' => {
            let body = match prec {
                Some(p) => to_precision(n, p),
                None => shortest(n),
            };
            let body = if verb == 'G' { body.to_uppercase() } else { body };
            format!("{prefix}{body}")
        }
        _ => return None,
    };
    Some(formatted)
}

fn fmt_bool(verb: char, value: bool) -> Option<String> {
    match verb {
        'T' => Some("bool".to_owned()),
        'v' | 't' => Some(value.to_string()),
        _ => None,
    }
}

/// Hex-dump the string's bytes, optionally space-separated and per-byte
/// prefixed.
fn to_hex_string(value: &str, sep: &str, byte_prefix: &str, upper: bool) -> String {
    value
        .bytes()
        .map(|b| {
            if upper {
                format!("{byte_prefix}{b:02X}")
            } else {
                format!("{byte_prefix}{b:02x}")
            }
        })
        .collect::<Vec<_>>()
        .join(sep)
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn fmt_string(flags: Flags, verb: char, value: &str) -> Option<String> {
    let byte_prefix = if flags.alt { "0x" } else { "" };
    let sep = if flags.alt || flags.space { " " } else { "" };
    match verb {
        'T' => Some("string".to_owned()),
        'v' | 's' => Some(value.to_owned()),
        'q' => Some(quote(value)),
        'x' => Some(to_hex_string(value, sep, byte_prefix, false)),
        'X' => Some(to_hex_string(value, sep, byte_prefix, true)),
        _ => None,
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Format one value with one verb.  `None` means the verb does not apply
/// to the value's category.
pub fn format(
    flags: Flags,
    width: usize,
    prec: Option<usize>,
    verb: char,
    value: &Value,
) -> Option<String> {
    let body = match value {
        Value::Num(n) => fmt_number(flags, prec, verb, *n)?,
        Value::Bool(b) => fmt_bool(verb, *b)?,
        Value::Str(s) => fmt_string(flags, verb, s)?,
        Value::Nil => match verb {
            'v' | 'T' => "<nil>".to_owned(),
            _ => return None,
        },
    };
    Some(pad(body, width, flags, matches!(value, Value::Num(_))))
}

fn pad(body: String, width: usize, flags: Flags, numeric: bool) -> String {
    let len = body.chars().count();
    if len >= width {
        return body;
    }
    let fill = width - len;
    if flags.minus {
        let mut out = body;
        out.extend(std::iter::repeat(' ').take(fill));
        out
    } else if flags.zero && numeric {
        // Zeros go between the sign and the digits.
        let split = body
            .find(|c: char| c != '+' && c != '-' && c != ' ')
            .unwrap_or(0);
        let (sign, digits) = body.split_at(split);
        format!("{sign}{}{digits}", "0".repeat(fill))
    } else {
        format!("{}{body}", " ".repeat(fill))
    }
}

/// A width or precision operand.
fn parse_arg(spec: &str, values: &[Value], index: &mut usize) -> Option<usize> {
    if spec.is_empty() {
        return None;
    }
    if spec == "*" {
        let value = values.get(*index);
        *index += 1;
        return match value {
            Some(Value::Num(n)) if *n >= 0.0 => Some(*n as usize),
            _ => Some(0),
        };
    }
    if let Some(rest) = spec.strip_prefix('[') {
        // `[n]*`: star operand taken from the n-th value, 1-based.
        let n: usize = rest
            .trim_end_matches(&[']', '*'][..])
            .parse()
            .unwrap_or(0);
        return match n.checked_sub(1).and_then(|i| values.get(i)) {
            Some(Value::Num(v)) if *v >= 0.0 => Some(*v as usize),
            _ => Some(0),
        };
    }
    spec.parse().ok()
}

/// Render `format_str`, replacing each `%` directive with the matching
/// value from `values`.  Problems become inline markers, never errors.
pub fn sprintf(format_str: &str, values: &[Value]) -> String {
    let mut out = String::new();
    let mut copied = 0;
    let mut index = 0usize;
    for caps in DIRECTIVE_RE.captures_iter(format_str) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&format_str[copied..whole.start()]);
        copied = whole.end();

        let flags = Flags::parse(caps.get(1).map_or("", |m| m.as_str()));
        let width = parse_arg(caps.get(2).map_or("", |m| m.as_str()), values, &mut index);
        let prec = match caps.get(3) {
            None => None,
            // `%.f` means precision zero.
            Some(m) => parse_arg(m.as_str(), values, &mut index).or(Some(0)),
        };
        let verb = caps.get(5).and_then(|m| m.as_str().chars().next());
        let Some(verb) = verb else {
            out.push_str("%!(NOVERB)");
            continue;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }
        if let Some(m) = caps.get(4) {
            // Explicit 1-based argument index; later directives continue
            // from there.
            let n: usize = m.as_str().parse().unwrap_or(1);
            index = n.saturating_sub(1);
        }
        let Some(value) = values.get(index) else {
            out.push_str("%!(MISSING)");
            continue;
        };
        index += 1;
        match format(flags, width.unwrap_or(0), prec, verb, value) {
            Some(s) => out.push_str(&s),
            None => out.push_str("%!(BADVERB)"),
        }
    }
    out.push_str(&format_str[copied..]);
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
